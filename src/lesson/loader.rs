use std::fs;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StudyError;
use crate::lesson::catalog::Lesson;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    /// Answer choices joined by the configured delimiter.
    pub answer: String,
    /// Index of the correct choice. Lesson files carry it as a number or a numeric string.
    #[serde(deserialize_with = "choice_index")]
    pub correct: usize,
}

impl Question {
    pub fn choices<'a>(&'a self, delimiter: &str) -> Vec<&'a str> {
        self.answer.split(delimiter).collect()
    }

    pub fn correct_choice<'a>(&'a self, delimiter: &str) -> Option<&'a str> {
        self.answer.split(delimiter).nth(self.correct)
    }
}

fn choice_index<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIndex {
        Number(usize),
        Text(String),
    }

    match RawIndex::deserialize(deserializer)? {
        RawIndex::Number(n) => Ok(n),
        RawIndex::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// A catalog lesson together with its question count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonInfo {
    pub lesson: Lesson,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedLesson {
    pub info: LessonInfo,
    pub questions: Vec<Question>,
}

/// Read a lesson file. Every question's `correct` must point at one of the
/// choices split on `delimiter`.
pub fn load(lesson: &Lesson, delimiter: &str) -> Result<LoadedLesson, StudyError> {
    let content = fs::read_to_string(&lesson.path).map_err(|e| StudyError::io(&lesson.path, e))?;
    let questions: Vec<Question> =
        serde_json::from_str(&content).map_err(|e| StudyError::parse(&lesson.path, e))?;
    for (index, question) in questions.iter().enumerate() {
        let choices = question.choices(delimiter).len();
        if question.correct >= choices {
            return Err(StudyError::ChoiceOutOfRange {
                path: lesson.path.clone(),
                index,
                correct: question.correct,
                choices,
            });
        }
    }
    debug!("loaded lesson {} with {} questions", lesson.key, questions.len());

    Ok(LoadedLesson {
        info: LessonInfo {
            lesson: lesson.clone(),
            total: questions.len(),
        },
        questions,
    })
}
