pub mod kanji;
pub mod translate;
pub mod words;

use std::path::Path;

use log::warn;

pub use kanji::{KanjiDictionary, KanjiEntry};
pub use translate::{Translation, Translator};
pub use words::{WordDictionary, WordEntry};

/// Everything the `dict` and `kanji` commands consult.
#[derive(Default)]
pub struct Lookups {
    pub words: WordDictionary,
    pub kanji: KanjiDictionary,
    pub translator: Option<Box<dyn Translator>>,
}

impl Lookups {
    /// Load both dictionaries; a missing or broken source leaves that one empty.
    pub fn load(word_dir: &Path, kanji_file: &Path) -> Self {
        let words = WordDictionary::load_dir(word_dir).unwrap_or_else(|e| {
            warn!("word dictionary unavailable: {e}");
            WordDictionary::default()
        });
        let kanji = KanjiDictionary::load(kanji_file).unwrap_or_else(|e| {
            warn!("kanji list unavailable: {e}");
            KanjiDictionary::default()
        });
        Self {
            words,
            kanji,
            translator: None,
        }
    }

    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }
}
