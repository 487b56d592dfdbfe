use crate::cards::BITS;

/// Reconstructs the guessed number from one answer per bit, least-significant first.
///
/// # Panics
///
/// Panics if `answers` does not hold exactly [`BITS`] answers. The session
/// only calls this once all questions have been answered.
#[must_use]
pub fn accumulate(answers: &[bool]) -> u8 {
    assert_eq!(
        answers.len(),
        BITS,
        "accumulate() needs {BITS} answers, got {}",
        answers.len()
    );
    answers
        .iter()
        .enumerate()
        .filter(|&(_, &yes)| yes)
        .map(|(bit, _)| 1u8 << bit)
        .sum()
}
