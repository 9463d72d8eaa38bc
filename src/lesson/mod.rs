pub mod catalog;
pub mod loader;

pub use catalog::{Lesson, LessonCatalog, Topic};
pub use loader::{LessonInfo, LoadedLesson, Question};
