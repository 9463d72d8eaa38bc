use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::StudyError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WordEntry {
    pub word: String,
    pub phonetic: Option<String>,
    pub means: Vec<String>,
    pub content: String,
}

/// Word entries from every JSON file of a dictionary directory.
#[derive(Default)]
pub struct WordDictionary {
    entries: Vec<WordEntry>,
    by_word: HashMap<String, Vec<usize>>,
}

impl WordDictionary {
    pub fn load_dir(dir: &Path) -> Result<Self, StudyError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| StudyError::io(dir, e))? {
            let path = entry.map_err(|e| StudyError::io(dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let mut entries = Vec::new();
        for path in &files {
            let content = fs::read_to_string(path).map_err(|e| StudyError::io(path, e))?;
            let words: Vec<WordEntry> =
                serde_json::from_str(&content).map_err(|e| StudyError::parse(path, e))?;
            entries.extend(words);
        }
        debug!("loaded {} words from {} files", entries.len(), files.len());
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<WordEntry>) -> Self {
        let mut by_word: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            by_word.entry(entry.word.clone()).or_default().push(i);
        }
        Self { entries, by_word }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact headword matches, with duplicate definitions dropped.
    pub fn search_word(&self, word: &str) -> Vec<&WordEntry> {
        let Some(indices) = self.by_word.get(word.trim()) else {
            return Vec::new();
        };
        let mut found: Vec<&WordEntry> = Vec::new();
        for &i in indices {
            let entry = &self.entries[i];
            let duplicate = found
                .iter()
                .any(|seen| seen.means == entry.means && seen.content == entry.content);
            if !duplicate {
                found.push(entry);
            }
        }
        found
    }
}
