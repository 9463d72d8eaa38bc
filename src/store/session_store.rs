use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};

use crate::lesson::LessonInfo;
use crate::store::schema::{PlayingState, SessionBlob, SessionMeta};

/// Owns the persisted [`SessionBlob`] for the lifetime of the process.
pub struct SessionStore {
    path: PathBuf,
    blob: SessionBlob,
}

impl SessionStore {
    /// Open the session file, substituting (and writing) defaults when it is
    /// missing, unreadable, malformed or from another schema version.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            blob: SessionBlob::default(),
        };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn blob(&self) -> &SessionBlob {
        &self.blob
    }

    pub fn meta(&self) -> &SessionMeta {
        &self.blob.meta
    }

    pub fn playing(&self) -> Option<&PlayingState> {
        self.blob.playing.as_ref()
    }

    pub fn load(&mut self) -> &SessionBlob {
        self.blob = match self.read() {
            Ok(blob) if !blob.needs_reset() => blob,
            Ok(blob) => {
                warn!(
                    "session schema version {} is not supported, starting fresh",
                    blob.schema_version
                );
                self.reset()
            }
            Err(e) => {
                info!("no usable session at {}: {e}", self.path.display());
                self.reset()
            }
        };
        &self.blob
    }

    fn read(&self) -> Result<SessionBlob> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn reset(&self) -> SessionBlob {
        let blob = SessionBlob::default();
        if let Err(e) = write_blob(&self.path, &blob) {
            warn!("could not write default session to {}: {e}", self.path.display());
        }
        blob
    }

    pub fn save(&self) -> Result<()> {
        write_blob(&self.path, &self.blob)
    }

    /// Pick up where the stored lesson left off, or start `info` from the top.
    ///
    /// Stored progress only resumes while it is short of both the stored and
    /// the freshly loaded total; a lesson that shrank below it starts over.
    pub fn start_or_resume(&mut self, info: &LessonInfo) -> PlayingState {
        let lesson = &info.lesson;
        let resumable = self
            .blob
            .playing
            .as_ref()
            .filter(|p| p.key == lesson.key && p.curr < p.total && p.curr < info.total);

        let playing = match resumable {
            Some(stored) => PlayingState {
                key: lesson.key.clone(),
                name: lesson.name.clone(),
                path: lesson.path.clone(),
                total: info.total,
                curr: stored.curr,
                correct: stored.correct,
                incorrect: stored.incorrect,
            },
            None => PlayingState {
                key: lesson.key.clone(),
                name: lesson.name.clone(),
                path: lesson.path.clone(),
                total: info.total,
                curr: 0,
                correct: 0,
                incorrect: 0,
            },
        };

        self.blob.meta.viewed.insert(lesson.key.clone());
        self.blob.playing = Some(playing.clone());
        playing
    }

    pub fn commit_progress(&mut self, playing: &PlayingState) -> Result<()> {
        if playing.is_complete() {
            self.blob.meta.completed.insert(playing.key.clone());
        }
        self.blob.meta.last_played = Some(Utc::now());
        self.blob.playing = Some(playing.clone());
        self.save()
    }

    pub fn record_answer(&mut self, correct: bool) {
        self.blob.meta.record_answer(correct);
    }
}

fn write_blob(path: &Path, blob: &SessionBlob) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = path.with_extension("tmp");

    let json = serde_json::to_string_pretty(blob)?;
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::Lesson;
    use crate::store::schema::SCHEMA_VERSION;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, SessionStore) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        (dir, store)
    }

    fn info(key: &str, total: usize) -> LessonInfo {
        LessonInfo {
            lesson: Lesson {
                id: 0,
                name: format!("lesson {key}"),
                key: key.to_string(),
                topic_id: 0,
                path: PathBuf::from(format!("quest/{key}.json")),
            },
            total,
        }
    }

    #[test]
    fn test_fresh_store_writes_defaults() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.blob(), &SessionBlob::default());

        let raw = fs::read_to_string(store.path()).unwrap();
        let on_disk: SessionBlob = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk, SessionBlob::default());
        assert_eq!(on_disk.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SessionStore::open(&path);
        assert_eq!(store.blob(), &SessionBlob::default());
        let raw = fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<SessionBlob>(&raw).is_ok());
    }

    #[test]
    fn test_foreign_json_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"working": null}"#).unwrap();

        let store = SessionStore::open(&path);
        assert_eq!(store.blob(), &SessionBlob::default());
    }

    #[test]
    fn test_stale_schema_version_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut blob = SessionBlob::default();
        blob.schema_version = SCHEMA_VERSION + 1;
        blob.meta.score = 99;
        fs::write(&path, serde_json::to_string(&blob).unwrap()).unwrap();

        let store = SessionStore::open(&path);
        assert_eq!(store.meta().score, 0);
        assert!(!store.blob().needs_reset());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (dir, mut store) = make_test_store();
        let mut playing = store.start_or_resume(&info("0_1", 4));
        playing.curr = 2;
        store.record_answer(true);
        store.record_answer(false);
        store.commit_progress(&playing).unwrap();

        let saved = store.blob().clone();
        let reopened = SessionStore::open(dir.path().join("session.json"));
        assert_eq!(reopened.blob(), &saved);
        assert!((reopened.meta().accuracy - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_start_fresh_records_viewed() {
        let (_dir, mut store) = make_test_store();
        let playing = store.start_or_resume(&info("1_2", 5));

        assert_eq!(playing.curr, 0);
        assert_eq!(playing.total, 5);
        assert_eq!(playing.key, "1_2");
        assert!(store.meta().viewed.contains("1_2"));
        assert_eq!(store.playing(), Some(&playing));
    }

    #[test]
    fn test_resume_is_idempotent() {
        let (_dir, mut store) = make_test_store();
        let first = store.start_or_resume(&info("0_0", 3));
        let second = store.start_or_resume(&info("0_0", 3));
        assert_eq!(first, second);
        assert_eq!(store.meta().viewed.len(), 1);
    }

    #[test]
    fn test_resume_keeps_stored_progress() {
        let (_dir, mut store) = make_test_store();
        let mut playing = store.start_or_resume(&info("0_0", 3));
        playing.curr = 2;
        playing.correct = 2;
        store.commit_progress(&playing).unwrap();

        let resumed = store.start_or_resume(&info("0_0", 3));
        assert_eq!(resumed.curr, 2);
        assert_eq!(resumed.correct, 2);
    }

    #[test]
    fn test_shrunken_lesson_starts_over() {
        let (_dir, mut store) = make_test_store();
        let mut playing = store.start_or_resume(&info("0_0", 5));
        playing.curr = 4;
        playing.correct = 4;
        store.commit_progress(&playing).unwrap();

        let resumed = store.start_or_resume(&info("0_0", 2));
        assert_eq!(resumed.total, 2);
        assert_eq!(resumed.curr, 0);
        assert_eq!(resumed.correct, 0);
        assert!(!resumed.is_complete());
        assert!(!store.meta().completed.contains("0_0"));
    }

    #[test]
    fn test_resume_within_shrunken_lesson() {
        let (_dir, mut store) = make_test_store();
        let mut playing = store.start_or_resume(&info("0_0", 5));
        playing.curr = 1;
        store.commit_progress(&playing).unwrap();

        let resumed = store.start_or_resume(&info("0_0", 2));
        assert_eq!(resumed.curr, 1);
        assert_eq!(resumed.total, 2);
    }

    #[test]
    fn test_finished_lesson_restarts() {
        let (_dir, mut store) = make_test_store();
        let mut playing = store.start_or_resume(&info("0_0", 3));
        playing.curr = 3;
        store.commit_progress(&playing).unwrap();

        let again = store.start_or_resume(&info("0_0", 3));
        assert_eq!(again.curr, 0);
    }

    #[test]
    fn test_other_lesson_starts_fresh() {
        let (_dir, mut store) = make_test_store();
        let mut playing = store.start_or_resume(&info("0_0", 3));
        playing.curr = 1;
        store.commit_progress(&playing).unwrap();

        let other = store.start_or_resume(&info("0_1", 3));
        assert_eq!(other.curr, 0);
        assert_eq!(store.meta().viewed.len(), 2);
    }

    #[test]
    fn test_completion_is_monotonic() {
        let (dir, mut store) = make_test_store();
        let mut playing = store.start_or_resume(&info("2_0", 2));
        playing.curr = 2;
        store.commit_progress(&playing).unwrap();
        store.commit_progress(&playing).unwrap();
        assert_eq!(store.meta().completed.len(), 1);

        // Replaying and quitting early keeps the lesson completed.
        let mut replay = store.start_or_resume(&info("2_0", 2));
        replay.curr = 1;
        store.commit_progress(&replay).unwrap();

        let reopened = SessionStore::open(dir.path().join("session.json"));
        assert!(reopened.meta().completed.contains("2_0"));
        assert_eq!(reopened.meta().completed.len(), 1);
    }

    #[test]
    fn test_unfinished_commit_does_not_complete() {
        let (_dir, mut store) = make_test_store();
        let mut playing = store.start_or_resume(&info("0_0", 3));
        playing.curr = 2;
        store.commit_progress(&playing).unwrap();
        assert!(store.meta().completed.is_empty());
        assert!(store.meta().last_played.is_some());
    }

    #[test]
    fn test_no_tmp_file_left_after_save() {
        let (dir, store) = make_test_store();
        store.save().unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = SessionStore::open(&path);
        assert!(path.exists());
        assert_eq!(store.blob(), &SessionBlob::default());
    }
}
