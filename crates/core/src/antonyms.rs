//! Word→antonym mapping consumed by the Opposites topic.
//!
//! The resource is TOML, not YAML: word lists kept in the older
//! `Opposites:` YAML layout must be converted once. The table keeps the
//! same name in either spelling, `[opposites]` or `[Opposites]`:
//!
//! ```toml
//! [opposites]
//! hot = "cold"
//! up = "down"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use crate::error::ResourceError;

#[derive(Debug, Deserialize)]
struct AntonymFile {
    #[serde(alias = "Opposites")]
    opposites: BTreeMap<String, String>,
}

/// Immutable word→antonym pairs, sorted by word.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Antonyms {
    pairs: Vec<(String, String)>,
}

impl Antonyms {
    /// Build a mapping from pairs. Later duplicates of a word win.
    pub fn from_pairs<W, A>(pairs: impl IntoIterator<Item = (W, A)>) -> Self
    where
        W: Into<String>,
        A: Into<String>,
    {
        let map: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(word, antonym)| (word.into(), antonym.into()))
            .collect();
        Self {
            pairs: map.into_iter().collect(),
        }
    }

    /// Parse the TOML resource format.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Parse` for malformed documents and
    /// `ResourceError::Empty` if the table has no entries.
    pub fn from_toml_str(source: &str) -> Result<Self, ResourceError> {
        let file: AntonymFile = toml::from_str(source)?;
        if file.opposites.is_empty() {
            return Err(ResourceError::Empty);
        }
        Ok(Self {
            pairs: file.opposites.into_iter().collect(),
        })
    }

    /// Read and parse the resource at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Io` if the file cannot be read, otherwise the
    /// errors of [`Antonyms::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let antonyms = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), entries = antonyms.len(), "loaded antonyms");
        Ok(antonyms)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Uniformly draw one `(word, antonym)` pair.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Option<(&str, &str)> {
        if self.pairs.is_empty() {
            return None;
        }
        let (word, antonym) = &self.pairs[rng.random_range(0..self.pairs.len())];
        Some((word.as_str(), antonym.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Write;

    fn lookup<'a>(antonyms: &'a Antonyms, word: &str) -> Option<&'a str> {
        antonyms
            .pairs
            .iter()
            .find(|(w, _)| w == word)
            .map(|(_, a)| a.as_str())
    }

    #[test]
    fn parses_opposites_table() {
        let antonyms = Antonyms::from_toml_str(
            r#"
            [opposites]
            hot = "cold"
            up = "down"
            "#,
        )
        .unwrap();
        assert_eq!(antonyms.len(), 2);
        assert_eq!(lookup(&antonyms, "hot"), Some("cold"));
        assert_eq!(lookup(&antonyms, "down"), None);
    }

    #[test]
    fn accepts_capitalized_table_name() {
        let antonyms = Antonyms::from_toml_str("[Opposites]\nearly = \"late\"\n").unwrap();
        assert_eq!(lookup(&antonyms, "early"), Some("late"));
    }

    #[test]
    fn empty_table_is_an_error() {
        let err = Antonyms::from_toml_str("[opposites]\n").unwrap_err();
        assert!(matches!(err, ResourceError::Empty));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = Antonyms::from_toml_str("opposites = 3").unwrap_err();
        assert!(matches!(err, ResourceError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[opposites]\nfast = \"slow\"").unwrap();
        let antonyms = Antonyms::load(file.path()).unwrap();
        assert_eq!(lookup(&antonyms, "fast"), Some("slow"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Antonyms::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
    }

    #[test]
    fn choose_returns_existing_pair() {
        let antonyms = Antonyms::from_pairs([("big", "small"), ("wet", "dry")]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let (word, antonym) = antonyms.choose(&mut rng).unwrap();
            assert_eq!(lookup(&antonyms, word), Some(antonym));
        }
        assert!(Antonyms::default().choose(&mut rng).is_none());
    }
}
