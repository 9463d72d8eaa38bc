use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::lesson::{LessonInfo, Question};
use crate::lookup::{KanjiEntry, Translation, WordEntry};
use crate::store::{PlayingState, SessionMeta};

pub fn greeting(out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{} type {} to pick a lesson, {} for every command",
        "勉強しよう!".bold(),
        "menu".cyan(),
        "help".cyan()
    )
}

pub fn lesson_start(out: &mut impl Write, info: &LessonInfo, playing: &PlayingState) -> io::Result<()> {
    writeln!(out, "Quest total: {}", info.total)?;
    writeln!(out, "Selected lesson: {} ({})", info.lesson.name.as_str().bold(), info.lesson.key)?;
    if playing.curr > 0 && !playing.is_complete() {
        writeln!(out, "Resuming at {}/{}", playing.curr + 1, playing.total)?;
    }
    Ok(())
}

/// `Q[n/total]: question` followed by the choices numbered from 1.
pub fn question(
    out: &mut impl Write,
    question: &Question,
    delimiter: &str,
    index: usize,
    total: usize,
    retry: bool,
) -> io::Result<()> {
    let marker = if retry { "[R] " } else { "" };
    writeln!(out)?;
    writeln!(
        out,
        "{}{} {}",
        marker.red(),
        format!("Q[{}/{}]:", index + 1, total).yellow(),
        question.question.as_str().bold()
    )?;
    for (i, choice) in question.choices(delimiter).iter().enumerate() {
        writeln!(out, "  {} : {}", i + 1, choice)?;
    }
    Ok(())
}

/// Same layout as [`question`] with the correct choice highlighted.
pub fn reveal(
    out: &mut impl Write,
    question: &Question,
    delimiter: &str,
    index: usize,
    total: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "{} {}",
        format!("A[{}/{}]:", index + 1, total).green(),
        question.question.as_str().bold()
    )?;
    for (i, choice) in question.choices(delimiter).iter().enumerate() {
        if i == question.correct {
            writeln!(out, "  {} : {}", i + 1, choice.green().underlined())?;
        } else {
            writeln!(out, "  {} : {}", i + 1, choice.dark_grey())?;
        }
    }
    Ok(())
}

pub fn cheer(out: &mut impl Write, line: &str, has_next: bool) -> io::Result<()> {
    if has_next {
        writeln!(out, "{} 次へ", line.green())
    } else {
        writeln!(out, "{}", line.green())
    }
}

pub fn jeer(out: &mut impl Write, line: &str) -> io::Result<()> {
    writeln!(out, "{} もう一回", line.red())
}

pub fn lesson_clear(out: &mut impl Write, name: &str, playing: &PlayingState) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", format!("{name} clear!").green().bold())?;
    writeln!(
        out,
        "correct: {}  incorrect: {}",
        playing.correct, playing.incorrect
    )
}

pub fn lesson_left(out: &mut impl Write, playing: &PlayingState) -> io::Result<()> {
    writeln!(
        out,
        "Saved {} at {}/{}",
        playing.name, playing.curr, playing.total
    )
}

pub fn cancelled(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "Cancelled!".yellow())
}

pub fn bye(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "Bye bye!".cyan())
}

pub fn notice(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.yellow())
}

pub fn failure(out: &mut impl Write, error: &dyn std::fmt::Display) -> io::Result<()> {
    writeln!(out, "{} {error}", "error:".red().bold())
}

pub fn unknown(out: &mut impl Write, raw: &str) -> io::Result<()> {
    writeln!(out, "{} {raw}", "Unknown cmd".red())
}

pub fn usage(out: &mut impl Write, names: &[&str]) -> io::Result<()> {
    writeln!(out, "{}", format!("usage: [{}]", names.join(", ")).blue())
}

pub fn word_entries(out: &mut impl Write, word: &str, entries: &[&WordEntry]) -> io::Result<()> {
    writeln!(out, "{} {}", "translate for:".blue(), word.bold())?;
    for entry in entries {
        match &entry.phonetic {
            Some(phonetic) if !phonetic.is_empty() => {
                writeln!(out, "{} 「{}」", entry.word.as_str().bold(), phonetic)?
            }
            _ => writeln!(out, "{}", entry.word.as_str().bold())?,
        }
        for mean in &entry.means {
            writeln!(out, "  - {mean}")?;
        }
        if !entry.content.is_empty() {
            writeln!(out, "  {}", entry.content.as_str().dark_grey())?;
        }
    }
    Ok(())
}

pub fn translation(out: &mut impl Write, word: &str, translation: &Translation) -> io::Result<()> {
    writeln!(out, "{} {}", "translate for:".blue(), word.bold())?;
    match &translation.detected_source {
        Some(lang) => writeln!(out, "  {} ({lang})", translation.text),
        None => writeln!(out, "  {}", translation.text),
    }
}

pub fn kanji(out: &mut impl Write, entry: &KanjiEntry) -> io::Result<()> {
    writeln!(out, "{}  {}", entry.word.as_str().bold(), entry.mean)?;
    let fields = [
        ("onyomi", &entry.onyomi),
        ("kunyomi", &entry.kunyomi),
        ("strokes", &entry.stroke_count),
        ("level", &entry.level),
        ("freq", &entry.freq),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            writeln!(out, "  {} {value}", format!("{label}:").cyan())?;
        }
    }
    if !entry.explanation.is_empty() {
        writeln!(out, "  {}", entry.explanation)?;
    }
    for example in &entry.examples {
        writeln!(
            out,
            "  {} 「{}」 {} {}",
            example.w.as_str().bold(),
            example.p,
            example.h.as_str().dark_grey(),
            example.m
        )?;
    }
    Ok(())
}

pub fn not_found(out: &mut impl Write, what: &str) -> io::Result<()> {
    writeln!(out, "{} {what}", "not found:".yellow())
}

pub fn stats(out: &mut impl Write, meta: &SessionMeta, playing: Option<&PlayingState>) -> io::Result<()> {
    writeln!(out, "{}", "stats".bold())?;
    writeln!(out, "  lessons viewed:    {}", meta.viewed.len())?;
    writeln!(out, "  lessons completed: {}", meta.completed.len())?;
    writeln!(out, "  score:             {}", meta.score)?;
    writeln!(
        out,
        "  answers:           {} correct / {} incorrect ({:.1}%)",
        meta.correct,
        meta.incorrect,
        meta.accuracy * 100.0
    )?;
    if let Some(at) = meta.last_played {
        writeln!(out, "  last played:       {}", at.format("%Y-%m-%d %H:%M"))?;
    }
    if let Some(p) = playing.filter(|p| !p.is_complete()) {
        writeln!(out, "  in progress:       {} {}/{}", p.name, p.curr, p.total)?;
    }
    Ok(())
}
