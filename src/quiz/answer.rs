use icu_normalizer::ComposingNormalizerBorrowed;

use crate::lesson::Question;

/// Trim and NFKC-fold operator input so IME full-width digits (`１`) and
/// half-width kana compare equal to their plain forms.
pub fn normalize_input(raw: &str) -> String {
    ComposingNormalizerBorrowed::new_nfkc()
        .normalize(raw.trim())
        .trim()
        .to_string()
}

/// A numeric token is a 1-based choice number. Anything else, including a
/// number that does not point at the correct choice, is compared against the
/// literal text of the correct choice.
pub fn is_correct(question: &Question, raw: &str, delimiter: &str) -> bool {
    let input = normalize_input(raw);
    if input.is_empty() {
        return false;
    }

    if let Ok(number) = input.parse::<usize>() {
        if number >= 1 && number - 1 == question.correct {
            return true;
        }
    }

    question
        .correct_choice(delimiter)
        .is_some_and(|choice| normalize_input(choice) == input)
}
