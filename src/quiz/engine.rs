use crate::lesson::Question;
use crate::quiz::answer;
use crate::store::PlayingState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizStatus {
    Presenting,
    Finished,
    Interrupted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizCommand {
    Answer(String),
    Next,
    Back,
    Hint,
    Reset,
    Quit,
}

/// What happened after a command, for the rendering step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    /// `index` is the question that was just answered; check
    /// [`QuizEngine::is_over`] to see whether it was the last one.
    Correct { index: usize },
    Incorrect { index: usize },
    Moved,
    Hint { index: usize },
    Restarted,
    Finished,
    Interrupted,
    /// The command arrived after the lesson was already over.
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
}

/// Playing state of one lesson.
///
/// `curr` always stays within `[0, total]`; reaching `total` finishes the
/// lesson. The engine performs no I/O: callers persist
/// [`playing`](Self::playing) once [`is_over`](Self::is_over) turns true.
pub struct QuizEngine {
    playing: PlayingState,
    questions: Vec<Question>,
    delimiter: String,
    status: QuizStatus,
}

impl QuizEngine {
    pub fn new(mut playing: PlayingState, questions: Vec<Question>, delimiter: &str) -> Self {
        playing.total = questions.len();
        playing.curr = playing.curr.min(playing.total);
        let status = if playing.is_complete() {
            QuizStatus::Finished
        } else {
            QuizStatus::Presenting
        };
        Self {
            playing,
            questions,
            delimiter: delimiter.to_string(),
            status,
        }
    }

    pub fn playing(&self) -> &PlayingState {
        &self.playing
    }

    pub fn status(&self) -> QuizStatus {
        self.status
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn is_over(&self) -> bool {
        self.status != QuizStatus::Presenting
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.playing.curr)
    }

    pub fn submit_answer(&mut self, raw: &str) -> AnswerOutcome {
        if self.is_over() {
            return AnswerOutcome { correct: false };
        }
        let Some(question) = self.current_question() else {
            return AnswerOutcome { correct: false };
        };

        let correct = answer::is_correct(question, raw, &self.delimiter);
        if correct {
            self.playing.correct += 1;
            self.move_to(self.playing.curr + 1);
        } else {
            self.playing.incorrect += 1;
        }
        AnswerOutcome { correct }
    }

    pub fn skip_forward(&mut self) {
        self.move_to(self.playing.curr.saturating_add(1));
    }

    pub fn skip_backward(&mut self) {
        self.move_to(self.playing.curr.saturating_sub(1));
    }

    pub fn restart(&mut self) {
        self.playing.curr = 0;
        self.status = if self.questions.is_empty() {
            QuizStatus::Finished
        } else {
            QuizStatus::Presenting
        };
    }

    pub fn quit(&mut self) {
        if self.status == QuizStatus::Presenting {
            self.status = QuizStatus::Interrupted;
        }
    }

    fn move_to(&mut self, curr: usize) {
        self.playing.curr = curr.min(self.playing.total);
        if self.playing.is_complete() {
            self.status = QuizStatus::Finished;
        }
    }

    fn moved_event(&self) -> QuizEvent {
        if self.status == QuizStatus::Finished {
            QuizEvent::Finished
        } else {
            QuizEvent::Moved
        }
    }

    pub fn apply(&mut self, command: QuizCommand) -> QuizEvent {
        if self.is_over() && command != QuizCommand::Reset {
            return QuizEvent::Ignored;
        }

        let index = self.playing.curr;
        match command {
            QuizCommand::Answer(raw) => {
                if self.submit_answer(&raw).correct {
                    QuizEvent::Correct { index }
                } else {
                    QuizEvent::Incorrect { index }
                }
            }
            QuizCommand::Next => {
                self.skip_forward();
                self.moved_event()
            }
            QuizCommand::Back => {
                self.skip_backward();
                self.moved_event()
            }
            QuizCommand::Hint => QuizEvent::Hint { index },
            QuizCommand::Reset => {
                self.restart();
                QuizEvent::Restarted
            }
            QuizCommand::Quit => {
                self.quit();
                QuizEvent::Interrupted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn question(text: &str, answer: &str, correct: usize) -> Question {
        Question {
            question: text.to_string(),
            answer: answer.to_string(),
            correct,
        }
    }

    fn three_questions() -> Vec<Question> {
        vec![
            question("猫", "ねこ※いぬ", 0),
            question("犬", "ねこ※いぬ", 1),
            question("空", "そら※うみ", 0),
        ]
    }

    fn fresh_playing() -> PlayingState {
        PlayingState {
            key: "0_0".to_string(),
            name: "animals".to_string(),
            path: PathBuf::from("quest/animals.json"),
            total: 0,
            curr: 0,
            correct: 0,
            incorrect: 0,
        }
    }

    fn engine() -> QuizEngine {
        QuizEngine::new(fresh_playing(), three_questions(), "※")
    }

    #[test]
    fn test_new_takes_total_from_questions() {
        let quiz = engine();
        assert_eq!(quiz.playing().total, 3);
        assert_eq!(quiz.status(), QuizStatus::Presenting);
        assert_eq!(quiz.current_question().unwrap().question, "猫");
    }

    #[test]
    fn test_numeric_answers_finish_lesson() {
        let mut quiz = engine();
        assert!(quiz.submit_answer("1").correct);
        assert!(quiz.submit_answer("2").correct);
        assert!(quiz.submit_answer("1").correct);
        assert_eq!(quiz.playing().curr, 3);
        assert_eq!(quiz.status(), QuizStatus::Finished);
        assert!(quiz.current_question().is_none());
        assert_eq!(quiz.playing().correct, 3);
    }

    #[test]
    fn test_literal_answers_finish_lesson() {
        let mut quiz = engine();
        for text in ["ねこ", "いぬ", "そら"] {
            assert!(quiz.submit_answer(text).correct, "{text}");
        }
        assert_eq!(quiz.status(), QuizStatus::Finished);
    }

    #[test]
    fn test_wrong_answer_repeats_question() {
        let mut quiz = engine();
        assert!(!quiz.submit_answer("xyz").correct);
        assert!(!quiz.submit_answer("2").correct);
        assert_eq!(quiz.playing().curr, 0);
        assert_eq!(quiz.playing().incorrect, 2);
        assert_eq!(quiz.status(), QuizStatus::Presenting);
    }

    #[test]
    fn test_skip_stays_in_bounds() {
        let mut quiz = engine();
        for _ in 0..5 {
            quiz.skip_backward();
            assert_eq!(quiz.playing().curr, 0);
        }
        quiz.skip_forward();
        quiz.skip_forward();
        assert_eq!(quiz.playing().curr, 2);
        quiz.skip_forward();
        assert_eq!(quiz.playing().curr, 3);
        quiz.skip_forward();
        assert_eq!(quiz.playing().curr, 3);
        assert_eq!(quiz.status(), QuizStatus::Finished);
    }

    #[test]
    fn test_mixed_navigation_keeps_invariant() {
        let mut quiz = engine();
        let moves = [
            QuizCommand::Back,
            QuizCommand::Next,
            QuizCommand::Back,
            QuizCommand::Back,
            QuizCommand::Next,
            QuizCommand::Next,
            QuizCommand::Back,
            QuizCommand::Next,
            QuizCommand::Next,
            QuizCommand::Next,
            QuizCommand::Back,
        ];
        for command in moves {
            quiz.apply(command);
            let p = quiz.playing();
            assert!(p.curr <= p.total);
        }
    }

    #[test]
    fn test_apply_reports_events() {
        let mut quiz = engine();
        assert_eq!(
            quiz.apply(QuizCommand::Answer("2".to_string())),
            QuizEvent::Incorrect { index: 0 }
        );
        assert_eq!(quiz.apply(QuizCommand::Hint), QuizEvent::Hint { index: 0 });
        assert_eq!(
            quiz.apply(QuizCommand::Answer("1".to_string())),
            QuizEvent::Correct { index: 0 }
        );
        assert_eq!(quiz.apply(QuizCommand::Next), QuizEvent::Moved);
        assert_eq!(
            quiz.apply(QuizCommand::Answer("そら".to_string())),
            QuizEvent::Correct { index: 2 }
        );
        assert!(quiz.is_over());
        assert_eq!(quiz.apply(QuizCommand::Next), QuizEvent::Ignored);
    }

    #[test]
    fn test_quit_interrupts_and_keeps_position() {
        let mut quiz = engine();
        quiz.submit_answer("1");
        assert_eq!(quiz.apply(QuizCommand::Quit), QuizEvent::Interrupted);
        assert_eq!(quiz.status(), QuizStatus::Interrupted);
        assert_eq!(quiz.playing().curr, 1);
        assert!(!quiz.submit_answer("2").correct);
        assert_eq!(quiz.playing().curr, 1);
    }

    #[test]
    fn test_reset_restarts_finished_lesson() {
        let mut quiz = engine();
        quiz.skip_forward();
        quiz.skip_forward();
        quiz.skip_forward();
        assert!(quiz.is_over());
        assert_eq!(quiz.apply(QuizCommand::Reset), QuizEvent::Restarted);
        assert_eq!(quiz.playing().curr, 0);
        assert_eq!(quiz.status(), QuizStatus::Presenting);
    }

    #[test]
    fn test_resumed_position_is_clamped() {
        let mut playing = fresh_playing();
        playing.curr = 10;
        let quiz = QuizEngine::new(playing, three_questions(), "※");
        assert_eq!(quiz.playing().curr, 3);
        assert_eq!(quiz.status(), QuizStatus::Finished);
    }

    #[test]
    fn test_empty_lesson_is_finished() {
        let quiz = QuizEngine::new(fresh_playing(), Vec::new(), "※");
        assert!(quiz.is_over());
        assert!(quiz.current_question().is_none());
    }
}
