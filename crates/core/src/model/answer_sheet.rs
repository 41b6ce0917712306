use serde::Serialize;

/// The user's responses, one slot per question; `None` means unanswered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSheet {
    slots: Vec<Option<String>>,
}

impl AnswerSheet {
    /// A sheet of `len` unanswered slots.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Stores `answer` at `index`, replacing any earlier response.
    ///
    /// Returns `false` if `index` is outside the sheet.
    pub fn record(&mut self, index: usize, answer: String) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(answer);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|slot| slot.as_deref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.slots.iter().map(|slot| slot.as_deref())
    }
}
