//! Quizdrop — timed drag-and-drop matching quiz in the terminal.

mod app;
mod game;
mod input;
mod quiz;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use quiz::Quiz;
use theme::{Palette, Theme};

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let quiz = match &args.quiz {
        Some(path) => Quiz::load(path)
            .with_context(|| format!("failed to load quiz {}", path.display()))?,
        None => Quiz::builtin(),
    };
    let mut app = App::new(args, quiz, theme);
    app.run()?;
    Ok(())
}

/// Timed drag-and-drop matching quiz in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "quizdrop",
    version,
    about = "Timed drag-and-drop quiz in the terminal. Drag answer blocks into their dropzones before the clock runs out.",
    long_about = "Quizdrop is a terminal matching game: a set of answer blocks and a set of \
        dropzones, each expecting one block. Drag blocks into zones with the mouse before the \
        countdown expires; each correct match is worth 5 points.\n\n\
        CONTROLS:\n  Mouse drag   Place a block      Click filled zone   Take the block back\n  Enter/Space  Start / confirm    R                   Restart (results)\n  Q / Esc      Quit / quit menu\n\n\
        Quizzes are plain text files: block[A]=\"Stack: last in, first out\" and \
        zone[d1]=\"A|Browser back button history\". Use --theme to load a btop-style theme."
)]
pub struct Args {
    /// Quiz definition file. Uses the built-in data-structures quiz if not set.
    #[arg(short, long, value_name = "FILE")]
    pub quiz: Option<std::path::PathBuf>,

    /// Countdown duration in seconds. Default 180 (3 minutes).
    #[arg(short, long, value_name = "SECS")]
    pub duration: Option<u32>,

    /// Path to theme file (btop-style theme[key]="value"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Skip the menu and start the countdown immediately.
    #[arg(long)]
    pub no_menu: bool,
}
