use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ANSWER_DELIMITER: &str = "※";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_lesson_dir")]
    pub lesson_dir: String,
    #[serde(default = "default_session_file")]
    pub session_file: String,
    #[serde(default = "default_word_dict_dir")]
    pub word_dict_dir: String,
    #[serde(default = "default_kanji_file")]
    pub kanji_file: String,
    #[serde(default = "default_answer_delimiter")]
    pub answer_delimiter: String,
    #[serde(default = "default_confirm_resume")]
    pub confirm_resume: bool,
    #[serde(default)]
    pub emotions_file: Option<String>,
}

fn data_path(name: &str) -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("benkyo")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn default_lesson_dir() -> String {
    data_path("lessons")
}
fn default_session_file() -> String {
    data_path("session.json")
}
fn default_word_dict_dir() -> String {
    data_path("dict")
}
fn default_kanji_file() -> String {
    data_path("kanji.json")
}
fn default_answer_delimiter() -> String {
    DEFAULT_ANSWER_DELIMITER.to_string()
}
fn default_confirm_resume() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lesson_dir: default_lesson_dir(),
            session_file: default_session_file(),
            word_dict_dir: default_word_dict_dir(),
            kanji_file: default_kanji_file(),
            answer_delimiter: default_answer_delimiter(),
            confirm_resume: default_confirm_resume(),
            emotions_file: None,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("benkyo")
            .join("config.toml")
    }

    /// Repair values that would make the quiz unplayable.
    pub fn normalize(&mut self) {
        if self.answer_delimiter.is_empty() {
            self.answer_delimiter = default_answer_delimiter();
        }
    }
}
