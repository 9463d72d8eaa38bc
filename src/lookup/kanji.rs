use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Deserializer};

use crate::error::StudyError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KanjiExample {
    pub w: String,
    pub p: String,
    pub h: String,
    pub m: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct KanjiEntry {
    pub word: String,
    pub mean: String,
    pub onyomi: String,
    pub kunyomi: String,
    #[serde(deserialize_with = "lenient_string")]
    pub stroke_count: String,
    #[serde(deserialize_with = "lenient_string")]
    pub level: String,
    #[serde(deserialize_with = "lenient_string")]
    pub freq: String,
    #[serde(alias = "GiaiNghia")]
    pub explanation: String,
    pub examples: Vec<KanjiExample>,
}

/// Kanji lists mix numbers, numeric strings and nulls in the same column.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Null(()) => String::new(),
    })
}

#[derive(Default)]
pub struct KanjiDictionary {
    entries: Vec<KanjiEntry>,
    by_word: HashMap<String, usize>,
}

impl KanjiDictionary {
    pub fn load(path: &Path) -> Result<Self, StudyError> {
        let content = fs::read_to_string(path).map_err(|e| StudyError::io(path, e))?;
        let entries: Vec<KanjiEntry> =
            serde_json::from_str(&content).map_err(|e| StudyError::parse(path, e))?;
        debug!("loaded {} kanji from {}", entries.len(), path.display());
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<KanjiEntry>) -> Self {
        let mut by_word = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            by_word.entry(entry.word.clone()).or_insert(i);
        }
        Self { entries, by_word }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn search_kanji(&self, kanji: &str) -> Option<&KanjiEntry> {
        self.by_word
            .get(kanji.trim())
            .map(|&i| &self.entries[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_and_search() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kanji.json");
        fs::write(
            &path,
            r#"[
                {"Word": "日", "Mean": "NHẬT", "Onyomi": "ニチ", "Kunyomi": "ひ",
                 "StrokeCount": 4, "Level": "5", "Freq": null, "GiaiNghia": "sun",
                 "Examples": [{"w": "日本", "p": "にほん", "h": "NHẬT BẢN", "m": "Japan"}]},
                {"Word": "月", "Mean": "NGUYỆT"}
            ]"#,
        )
        .unwrap();

        let dict = KanjiDictionary::load(&path).unwrap();
        assert_eq!(dict.len(), 2);

        let sun = dict.search_kanji("日").unwrap();
        assert_eq!(sun.stroke_count, "4");
        assert_eq!(sun.level, "5");
        assert_eq!(sun.freq, "");
        assert_eq!(sun.explanation, "sun");
        assert_eq!(sun.examples[0].w, "日本");

        let moon = dict.search_kanji(" 月 ").unwrap();
        assert_eq!(moon.onyomi, "");
        assert!(dict.search_kanji("火").is_none());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let first = KanjiEntry {
            word: "山".to_string(),
            mean: "SƠN".to_string(),
            ..KanjiEntry::default()
        };
        let second = KanjiEntry {
            word: "山".to_string(),
            mean: "other".to_string(),
            ..KanjiEntry::default()
        };
        let dict = KanjiDictionary::from_entries(vec![first, second]);
        assert_eq!(dict.search_kanji("山").unwrap().mean, "SƠN");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            KanjiDictionary::load(&dir.path().join("none.json")),
            Err(StudyError::Io { .. })
        ));
    }
}
