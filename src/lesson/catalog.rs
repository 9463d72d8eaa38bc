use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::StudyError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: usize,
    pub name: String,
    /// `<topic_id>_<lesson_id>`, the identifier persisted in the session file.
    pub key: String,
    pub topic_id: usize,
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topic {
    pub id: usize,
    pub name: String,
    pub lessons: Vec<Lesson>,
}

pub fn lesson_key(topic_id: usize, lesson_id: usize) -> String {
    format!("{topic_id}_{lesson_id}")
}

pub fn parse_lesson_key(key: &str) -> Option<(usize, usize)> {
    let (topic, lesson) = key.trim().split_once('_')?;
    Some((topic.parse().ok()?, lesson.parse().ok()?))
}

/// Topic directories and their lesson files under one root.
///
/// The listing is scanned on first use and kept until [`invalidate`](Self::invalidate).
/// Topics and lessons are sorted by name so ordinal keys only change when
/// the tree itself does.
pub struct LessonCatalog {
    root: PathBuf,
    topics: Option<Vec<Topic>>,
}

impl LessonCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            topics: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn list(&mut self) -> Result<&[Topic], StudyError> {
        let topics = match self.topics.take() {
            Some(topics) => topics,
            None => scan(&self.root)?,
        };
        Ok(self.topics.insert(topics).as_slice())
    }

    pub fn resolve(&mut self, key: &str) -> Result<Lesson, StudyError> {
        let (topic_id, lesson_id) =
            parse_lesson_key(key).ok_or_else(|| StudyError::NotFound(key.to_string()))?;
        self.list()?
            .get(topic_id)
            .and_then(|topic| topic.lessons.get(lesson_id))
            .cloned()
            .ok_or_else(|| StudyError::NotFound(key.to_string()))
    }

    pub fn invalidate(&mut self) {
        self.topics = None;
    }
}

fn scan(root: &Path) -> Result<Vec<Topic>, StudyError> {
    let topic_dirs = sorted_entries(root, |path| path.is_dir())?;
    let mut topics = Vec::with_capacity(topic_dirs.len());

    for (topic_id, dir) in topic_dirs.into_iter().enumerate() {
        let files = sorted_entries(&dir, |path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == "json")
        })?;
        let lessons = files
            .into_iter()
            .enumerate()
            .map(|(lesson_id, path)| Lesson {
                id: lesson_id,
                name: path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default(),
                key: lesson_key(topic_id, lesson_id),
                topic_id,
                path,
            })
            .collect();

        topics.push(Topic {
            id: topic_id,
            name: dir
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default(),
            lessons,
        });
    }

    debug!("scanned {} topics under {}", topics.len(), root.display());
    Ok(topics)
}

fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>, StudyError> {
    let entries = fs::read_dir(dir).map_err(|e| StudyError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| StudyError::io(dir, e))?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
