//! Per-topic question generators.
//!
//! Each generator is a pure function of its random source and inputs.

use rand::Rng;

use crate::antonyms::Antonyms;
use crate::error::ResourceError;
use crate::model::{Question, Topic};

/// Upper bounds (inclusive) for arithmetic operands; lower bound is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticBounds {
    /// Operand bound for Addition and Subtraction.
    pub sum_max: u32,
    /// Operand bound for Multiplication.
    pub product_max: u32,
}

impl Default for ArithmeticBounds {
    fn default() -> Self {
        Self {
            sum_max: 10,
            product_max: 10,
        }
    }
}

/// Generate one question for `topic`.
///
/// `antonyms` is only consulted for [`Topic::Opposites`].
pub(crate) fn generate<R: Rng>(
    topic: Topic,
    rng: &mut R,
    bounds: ArithmeticBounds,
    antonyms: Option<&Antonyms>,
) -> Result<Question, ResourceError> {
    match topic {
        Topic::Addition => Ok(addition(rng, bounds.sum_max)),
        Topic::Subtraction => Ok(subtraction(rng, bounds.sum_max)),
        Topic::Multiplication => Ok(multiplication(rng, bounds.product_max)),
        Topic::Opposites => opposites(rng, antonyms.ok_or(ResourceError::NotConfigured)?),
    }
}

fn operands<R: Rng>(rng: &mut R, max: u32) -> (u64, u64) {
    (
        u64::from(rng.random_range(0..=max)),
        u64::from(rng.random_range(0..=max)),
    )
}

fn addition<R: Rng>(rng: &mut R, max: u32) -> Question {
    let (a, b) = operands(rng, max);
    Question::new(format!("{a} + {b} = "), (a + b).to_string())
}

fn subtraction<R: Rng>(rng: &mut R, max: u32) -> Question {
    let (v1, v2) = operands(rng, max);
    let (a, b) = (v1.max(v2), v1.min(v2));
    Question::new(format!("{a} - {b} = "), (a - b).to_string())
}

fn multiplication<R: Rng>(rng: &mut R, max: u32) -> Question {
    let (a, b) = operands(rng, max);
    Question::new(format!("{a} \u{2715} {b} = "), (a * b).to_string())
}

fn opposites<R: Rng>(rng: &mut R, antonyms: &Antonyms) -> Result<Question, ResourceError> {
    let (word, antonym) = antonyms.choose(rng).ok_or(ResourceError::Empty)?;
    Ok(Question::new(
        format!("The opposite of '{word}' is "),
        antonym,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn operands_of(text: &str, op: &str) -> (u64, u64) {
        let body = text.strip_suffix(" = ").unwrap();
        let (a, b) = body.split_once(op).unwrap();
        (a.parse().unwrap(), b.parse().unwrap())
    }

    #[test]
    fn addition_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let q = addition(&mut rng, 10);
            let (a, b) = operands_of(q.text(), " + ");
            assert!(a <= 10 && b <= 10);
            assert_eq!(q.answer(), (a + b).to_string());
        }
    }

    #[test]
    fn subtraction_never_goes_negative() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let q = subtraction(&mut rng, 10);
            let (a, b) = operands_of(q.text(), " - ");
            assert!(a >= b);
            assert_eq!(q.answer(), (a - b).to_string());
        }
    }

    #[test]
    fn multiplication_uses_cross_glyph() {
        let mut rng = StdRng::seed_from_u64(3);
        let q = multiplication(&mut rng, 10);
        let (a, b) = operands_of(q.text(), " \u{2715} ");
        assert_eq!(q.answer(), (a * b).to_string());
    }

    #[test]
    fn large_bounds_do_not_overflow() {
        let mut rng = StdRng::seed_from_u64(4);
        let q = multiplication(&mut rng, u32::MAX);
        let (a, b) = operands_of(q.text(), " \u{2715} ");
        assert_eq!(q.answer(), (u128::from(a) * u128::from(b)).to_string());
    }

    #[test]
    fn zero_bound_yields_zero_questions() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(addition(&mut rng, 0).text(), "0 + 0 = ");
    }

    #[test]
    fn opposites_render_word_and_answer() {
        let antonyms = Antonyms::from_pairs([("hot", "cold")]);
        let mut rng = StdRng::seed_from_u64(6);
        let q = generate(Topic::Opposites, &mut rng, ArithmeticBounds::default(), Some(&antonyms))
            .unwrap();
        assert_eq!(q.text(), "The opposite of 'hot' is ");
        assert_eq!(q.answer(), "cold");
    }

    #[test]
    fn opposites_without_mapping_fail() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = generate(Topic::Opposites, &mut rng, ArithmeticBounds::default(), None)
            .unwrap_err();
        assert!(matches!(err, ResourceError::NotConfigured));

        let empty = Antonyms::default();
        let err = generate(Topic::Opposites, &mut rng, ArithmeticBounds::default(), Some(&empty))
            .unwrap_err();
        assert!(matches!(err, ResourceError::Empty));
    }
}
