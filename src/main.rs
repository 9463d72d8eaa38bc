use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::warn;

use benkyo::app::App;
use benkyo::config::Config;

#[derive(Parser)]
#[command(name = "benkyo", version, about = "Terminal Japanese study quizzes with dictionary lookups")]
struct Cli {
    #[arg(short, long, help = "Config file (default: <config dir>/benkyo/config.toml)")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Lesson directory, one sub-directory per topic")]
    lessons: Option<String>,

    #[arg(short, long, help = "Session file")]
    session: Option<String>,

    #[arg(short, long, help = "Word dictionary directory")]
    dict: Option<String>,

    #[arg(short, long, help = "Kanji list file")]
    kanji: Option<String>,

    #[arg(long, help = "Start at the prompt without offering to resume")]
    no_resume: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("ignoring unreadable config: {e}");
            Config::default()
        }),
    };
    if let Some(lessons) = cli.lessons {
        config.lesson_dir = lessons;
    }
    if let Some(session) = cli.session {
        config.session_file = session;
    }
    if let Some(dict) = cli.dict {
        config.word_dict_dir = dict;
    }
    if let Some(kanji) = cli.kanji {
        config.kanji_file = kanji;
    }
    if cli.no_resume {
        config.confirm_resume = false;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut app = App::new(config, stdin.lock(), stdout.lock());
    app.run()
}
