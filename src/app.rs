use std::io::{BufRead, Write};
use std::mem;
use std::path::Path;

use anyhow::Result;
use log::{debug, info, warn};

use crate::command::{self, CommandTable, Flow, LineSource, LoopExit, LoopHooks};
use crate::config::Config;
use crate::lesson::{Lesson, LessonCatalog, loader};
use crate::lookup::Lookups;
use crate::quiz::{Flavor, QuizCommand, QuizEngine, QuizEvent, QuizStatus};
use crate::store::SessionStore;
use crate::ui::console::{Console, Selection};
use crate::ui::render;

const MENU_ALIASES: [&str; 5] = ["menu", "quiz", "top", "home", "m"];

/// Interactive study session: the top-level command prompt plus whatever
/// lesson is being played.
pub struct App<R, W> {
    pub config: Config,
    console: Console<R, W>,
    catalog: LessonCatalog,
    store: SessionStore,
    lookups: Lookups,
    flavor: Flavor,
    quiz: Option<QuizEngine>,
    retrying: bool,
    reopen_menu: bool,
    should_quit: bool,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(config: Config, input: R, output: W) -> Self {
        let catalog = LessonCatalog::new(&config.lesson_dir);
        let store = SessionStore::open(&config.session_file);
        let lookups = Lookups::load(
            Path::new(&config.word_dict_dir),
            Path::new(&config.kanji_file),
        );
        let flavor = Flavor::load(config.emotions_file.as_deref().map(Path::new));
        info!(
            "lessons at {}, session at {}",
            config.lesson_dir, config.session_file
        );

        Self {
            config,
            console: Console::new(input, output),
            catalog,
            store,
            lookups,
            flavor,
            quiz: None,
            retrying: false,
            reopen_menu: false,
            should_quit: false,
        }
    }

    pub fn with_lookups(mut self, lookups: Lookups) -> Self {
        self.lookups = lookups;
        self
    }

    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn into_output(self) -> W {
        self.console.into_output()
    }

    /// Offer to resume, serve commands until `quit` or end of input, then persist.
    pub fn run(&mut self) -> Result<()> {
        self.try_restore()?;

        if !self.should_quit {
            render::greeting(self.console.out())?;
            let hooks = LoopHooks {
                before: None,
                complete_if: Some(Self::quitting),
            };
            let exit = command::run(self, &Self::base_commands(), &hooks)?;
            debug!("command loop ended: {exit:?}");
        }

        self.store.save()?;
        render::bye(self.console.out())?;
        Ok(())
    }

    fn try_restore(&mut self) -> Result<()> {
        if !self.config.confirm_resume {
            return Ok(());
        }
        let Some(playing) = self.store.playing().filter(|p| !p.is_complete()).cloned() else {
            return Ok(());
        };

        let message = format!(
            "You are playing lesson {}, at: {}/{}\nDo you want to continue? [y/N]",
            playing.name, playing.curr, playing.total
        );
        if !self.console.yes_no(&message)? {
            info!("not resuming {}", playing.key);
            return Ok(());
        }
        info!("resuming {} at {}/{}", playing.key, playing.curr, playing.total);

        match self.catalog.resolve(&playing.key) {
            Ok(lesson) => {
                if lesson.path != playing.path {
                    warn!(
                        "lesson {} moved from {} to {}",
                        playing.key,
                        playing.path.display(),
                        lesson.path.display()
                    );
                }
                self.play(&lesson)?;
                if !self.should_quit && mem::take(&mut self.reopen_menu) {
                    self.browse()?;
                }
            }
            Err(e) => {
                warn!("cannot resume {}: {e}", playing.key);
                render::failure(self.console.out(), &e)?;
            }
        }
        Ok(())
    }

    fn base_commands() -> CommandTable<Self> {
        CommandTable::new()
            .command(&MENU_ALIASES, Self::open_menu)
            .command(&["dict", "d", "t"], Self::dict)
            .command(&["kanji", "look", "info", "k"], Self::kanji)
            .command(&["stats", "s"], Self::stats)
            .command(&["help", "h"], Self::help)
            .command(&["quit", "exit"], Self::quit)
    }

    fn quiz_commands() -> CommandTable<Self> {
        Self::base_commands().layered(
            CommandTable::new()
                .command(&["next", "n"], Self::quiz_next)
                .command(&["back", "b"], Self::quiz_back)
                .command(&["hint", "h"], Self::quiz_hint)
                .command(&["reset", "r"], Self::quiz_reset)
                .command(&["quit"], Self::quiz_quit)
                .command(&["exit"], Self::quiz_exit)
                .command(&MENU_ALIASES, Self::quiz_switch)
                .fallback(Self::quiz_answer),
        )
    }

    fn quitting(app: &Self) -> bool {
        app.should_quit
    }

    fn quiz_done(app: &Self) -> bool {
        app.should_quit || app.quiz.as_ref().is_none_or(QuizEngine::is_over)
    }

    // Lesson browsing

    /// Pick and play lessons until the operator cancels or stops switching.
    fn browse(&mut self) -> Result<()> {
        loop {
            let Some(lesson) = self.choose_lesson()? else {
                return Ok(());
            };
            self.play(&lesson)?;
            if self.should_quit || !mem::take(&mut self.reopen_menu) {
                return Ok(());
            }
        }
    }

    fn choose_lesson(&mut self) -> Result<Option<Lesson>> {
        let topics = match self.catalog.list() {
            Ok(topics) => topics,
            Err(e) => {
                warn!("lesson catalog unavailable: {e}");
                render::failure(self.console.out(), &e)?;
                return Ok(None);
            }
        };
        if topics.is_empty() {
            let message = format!("No lessons under {}", self.catalog.root().display());
            render::notice(self.console.out(), &message)?;
            return Ok(None);
        }

        let names: Vec<String> = topics
            .iter()
            .map(|t| format!("{} ({})", t.name, t.lessons.len()))
            .collect();
        let Selection::Chosen(t) = self.console.select_key(&names, "Which topic?", true)? else {
            render::cancelled(self.console.out())?;
            return Ok(None);
        };
        let topic = &topics[t];
        if topic.lessons.is_empty() {
            render::notice(self.console.out(), &format!("{} has no lessons", topic.name))?;
            return Ok(None);
        }

        let completed = &self.store.meta().completed;
        let names: Vec<String> = topic
            .lessons
            .iter()
            .map(|l| {
                if completed.contains(&l.key) {
                    format!("{} ✓", l.name)
                } else {
                    l.name.clone()
                }
            })
            .collect();
        let Selection::Chosen(l) = self.console.select_key(&names, "Which lesson?", true)? else {
            render::cancelled(self.console.out())?;
            return Ok(None);
        };
        Ok(Some(topic.lessons[l].clone()))
    }

    // Playing

    fn play(&mut self, lesson: &Lesson) -> Result<()> {
        let loaded = match loader::load(lesson, &self.config.answer_delimiter) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("cannot load lesson {}: {e}", lesson.key);
                render::failure(self.console.out(), &e)?;
                return Ok(());
            }
        };
        if loaded.questions.is_empty() {
            info!("lesson {} has no questions", lesson.key);
            render::notice(self.console.out(), &format!("{} has no questions", lesson.name))?;
            return Ok(());
        }

        let playing = self.store.start_or_resume(&loaded.info);
        render::lesson_start(self.console.out(), &loaded.info, &playing)?;
        let engine = QuizEngine::new(playing, loaded.questions, &self.config.answer_delimiter);
        self.quiz = Some(engine);
        self.retrying = false;

        let mut exit = LoopExit::Completed;
        if !Self::quiz_done(self) {
            let hooks = LoopHooks {
                before: Some(Self::show_question),
                complete_if: Some(Self::quiz_done),
            };
            exit = command::run(self, &Self::quiz_commands(), &hooks)?;
        }

        let Some(mut engine) = self.quiz.take() else {
            return Ok(());
        };
        engine.quit();
        self.store.commit_progress(engine.playing())?;

        let out = self.console.out();
        if engine.status() == QuizStatus::Finished {
            render::lesson_clear(out, &lesson.name, engine.playing())?;
        } else {
            render::lesson_left(out, engine.playing())?;
        }
        if exit == LoopExit::EndOfInput {
            self.should_quit = true;
        }
        Ok(())
    }

    fn show_question(app: &mut Self) -> Result<()> {
        let Some(quiz) = app.quiz.as_ref() else {
            return Ok(());
        };
        if let Some(question) = quiz.current_question() {
            let playing = quiz.playing();
            render::question(
                app.console.out(),
                question,
                quiz.delimiter(),
                playing.curr,
                playing.total,
                app.retrying,
            )?;
        }
        Ok(())
    }

    fn quiz_step(&mut self, command: QuizCommand) -> Result<()> {
        let Some(quiz) = self.quiz.as_mut() else {
            return Ok(());
        };
        let event = quiz.apply(command);
        let out = self.console.out();
        let total = quiz.playing().total;

        match event {
            QuizEvent::Correct { index } => {
                self.store.record_answer(true);
                self.retrying = false;
                if let Some(question) = quiz.question(index) {
                    render::reveal(out, question, quiz.delimiter(), index, total)?;
                }
                render::cheer(out, self.flavor.pick(true), !quiz.is_over())?;
            }
            QuizEvent::Incorrect { .. } => {
                self.store.record_answer(false);
                self.retrying = true;
                render::jeer(out, self.flavor.pick(false))?;
            }
            QuizEvent::Hint { index } => {
                if let Some(question) = quiz.question(index) {
                    render::reveal(out, question, quiz.delimiter(), index, total)?;
                }
            }
            QuizEvent::Moved | QuizEvent::Restarted => self.retrying = false,
            QuizEvent::Finished | QuizEvent::Interrupted | QuizEvent::Ignored => {}
        }
        Ok(())
    }

    // Top-level commands

    fn open_menu(&mut self, _args: &str) -> Result<Flow> {
        self.catalog.invalidate();
        self.browse()?;
        Ok(Flow::Continue)
    }

    fn dict(&mut self, args: &str) -> Result<Flow> {
        let mut word = args.trim().to_string();
        if word.is_empty() {
            if let Some(question) = self.quiz.as_ref().and_then(QuizEngine::current_question) {
                word = question.question.clone();
            }
        }
        let out = self.console.out();
        if word.is_empty() {
            render::notice(out, "usage: dict <word>")?;
            return Ok(Flow::Continue);
        }

        let entries = self.lookups.words.search_word(&word);
        if !entries.is_empty() {
            render::word_entries(out, &word, &entries)?;
            return Ok(Flow::Continue);
        }

        match self.lookups.translator.as_deref() {
            Some(translator) => match translator.translate(&word, None, None) {
                Ok(translation) => render::translation(out, &word, &translation)?,
                Err(e) => {
                    warn!("translation of {word} failed: {e}");
                    render::not_found(out, &word)?;
                }
            },
            None => render::not_found(out, &word)?,
        }
        Ok(Flow::Continue)
    }

    fn kanji(&mut self, args: &str) -> Result<Flow> {
        let kanji = args.trim();
        let out = self.console.out();
        if !kanji.is_empty() {
            match self.lookups.kanji.search_kanji(kanji) {
                Some(entry) => render::kanji(out, entry)?,
                None => render::not_found(out, kanji)?,
            }
            return Ok(Flow::Continue);
        }

        // Bare `k` in a lesson: every known kanji of the current question.
        let Some(question) = self.quiz.as_ref().and_then(QuizEngine::current_question) else {
            render::notice(out, "usage: kanji <character>")?;
            return Ok(Flow::Continue);
        };
        let mut seen = Vec::new();
        for ch in question.question.chars() {
            let mut buf = [0; 4];
            let Some(entry) = self.lookups.kanji.search_kanji(ch.encode_utf8(&mut buf)) else {
                continue;
            };
            if !seen.contains(&ch) {
                seen.push(ch);
                render::kanji(out, entry)?;
            }
        }
        if seen.is_empty() {
            render::not_found(out, &question.question)?;
        }
        Ok(Flow::Continue)
    }

    fn stats(&mut self, _args: &str) -> Result<Flow> {
        let playing = self
            .quiz
            .as_ref()
            .map(QuizEngine::playing)
            .or(self.store.playing());
        render::stats(self.console.out(), self.store.meta(), playing)?;
        Ok(Flow::Continue)
    }

    fn help(&mut self, _args: &str) -> Result<Flow> {
        let table = if self.quiz.is_some() {
            Self::quiz_commands()
        } else {
            Self::base_commands()
        };
        render::usage(self.console.out(), &table.usage_names())?;
        Ok(Flow::Continue)
    }

    fn quit(&mut self, _args: &str) -> Result<Flow> {
        self.should_quit = true;
        Ok(Flow::Complete)
    }

    // In-lesson commands

    fn quiz_answer(&mut self, raw: &str) -> Result<Flow> {
        self.quiz_step(QuizCommand::Answer(raw.to_string()))?;
        Ok(Flow::Continue)
    }

    fn quiz_next(&mut self, _args: &str) -> Result<Flow> {
        self.quiz_step(QuizCommand::Next)?;
        Ok(Flow::Continue)
    }

    fn quiz_back(&mut self, _args: &str) -> Result<Flow> {
        self.quiz_step(QuizCommand::Back)?;
        Ok(Flow::Continue)
    }

    fn quiz_hint(&mut self, _args: &str) -> Result<Flow> {
        self.quiz_step(QuizCommand::Hint)?;
        Ok(Flow::Continue)
    }

    fn quiz_reset(&mut self, _args: &str) -> Result<Flow> {
        self.quiz_step(QuizCommand::Reset)?;
        Ok(Flow::Continue)
    }

    /// Leave the lesson, back to the top-level prompt.
    fn quiz_quit(&mut self, _args: &str) -> Result<Flow> {
        self.quiz_step(QuizCommand::Quit)?;
        Ok(Flow::Complete)
    }

    fn quiz_exit(&mut self, _args: &str) -> Result<Flow> {
        self.quiz_step(QuizCommand::Quit)?;
        self.should_quit = true;
        Ok(Flow::Complete)
    }

    fn quiz_switch(&mut self, _args: &str) -> Result<Flow> {
        self.quiz_step(QuizCommand::Quit)?;
        self.reopen_menu = true;
        Ok(Flow::Complete)
    }
}

impl<R: BufRead, W: Write> LineSource for App<R, W> {
    fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.console.prompt("> ")?)
    }

    fn report_unknown(&mut self, raw: &str, usage: &[&'static str]) -> Result<()> {
        let out = self.console.out();
        render::unknown(out, raw)?;
        render::usage(out, usage)?;
        Ok(())
    }
}
