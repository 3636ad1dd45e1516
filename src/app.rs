//! App: terminal init, main loop, key and mouse handling.

use crate::Args;
use crate::game::{DEFAULT_DURATION_SECS, Gesture, Session, SessionEvent};
use crate::input::{Action, key_to_action};
use crate::quiz::Quiz;
use crate::theme::Theme;
use crate::ui::{self, GameLayout};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Target frame time for event polling (~60 FPS).
const FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    QuitMenu,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    MainMenu,
    Exit,
}

pub struct App {
    args: Args,
    theme: Theme,
    quiz: Quiz,
    session: Session,
    screen: Screen,
    /// Last formatted time the session published; "Time's up!" after expiry.
    timer_text: String,
    quit_selected: QuitOption,
    /// Last seen mouse position, for the carried-block label.
    cursor: Option<(u16, u16)>,
    results_effect: Option<Effect>,
    results_effect_time: Option<Instant>,
}

impl App {
    pub fn new(args: Args, quiz: Quiz, theme: Theme) -> Self {
        let duration = args.duration.unwrap_or(DEFAULT_DURATION_SECS);
        let session = Session::new(&quiz, duration);
        let timer_text = session.clock().display();
        Self {
            args,
            theme,
            quiz,
            session,
            screen: Screen::Menu,
            timer_text,
            quit_selected: QuitOption::Resume,
            cursor: None,
            results_effect: None,
            results_effect_time: None,
        }
    }

    /// Fresh idle session for the same quiz.
    fn reset_session(&mut self) {
        let duration = self.args.duration.unwrap_or(DEFAULT_DURATION_SECS);
        self.session = Session::new(&self.quiz, duration);
        self.timer_text = self.session.clock().display();
        self.results_effect = None;
        self.results_effect_time = None;
    }

    fn begin_play(&mut self, now: Instant) {
        self.reset_session();
        self.session.start(now);
        self.screen = Screen::Playing;
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        if self.args.no_menu {
            self.begin_play(Instant::now());
        }

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();

            // Drive the countdown; the session publishes ticks and, once,
            // the expiry with its report.
            while let Some(ev) = self.session.poll(now) {
                match ev {
                    SessionEvent::Tick { display, .. } => self.timer_text = display,
                    SessionEvent::TimeUp { .. } => {
                        self.timer_text = "Time's up!".to_string();
                        self.screen = Screen::Results;
                        self.cursor = None;
                    }
                }
            }

            let size = terminal.size()?;
            let area = Rect::new(0, 0, size.width, size.height);
            let layout = ui::game_layout(area, self.session.board());

            terminal.draw(|f| {
                ui::draw(
                    f,
                    self.screen,
                    &self.session,
                    &self.quiz.title,
                    &self.theme,
                    &layout,
                    &self.timer_text,
                    self.cursor,
                    (self.screen == Screen::QuitMenu).then_some(self.quit_selected),
                    &mut self.results_effect,
                    &mut self.results_effect_time,
                    now,
                )
            })?;

            let timeout = Duration::from_millis(FRAME_MS);
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            if self.handle_key(key_to_action(key)) {
                                return Ok(());
                            }
                        }
                        Event::Mouse(m) => self.handle_mouse(m, &layout),
                        _ => {}
                    }
                }
            }
        }
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, action: Action) -> bool {
        match self.screen {
            Screen::Menu => match action {
                Action::Quit => return true,
                Action::Confirm => self.begin_play(Instant::now()),
                _ => {}
            },
            Screen::Playing => {
                if action == Action::Quit {
                    self.screen = Screen::QuitMenu;
                    self.quit_selected = QuitOption::Resume;
                }
            }
            Screen::QuitMenu => match action {
                Action::NavDown => {
                    self.quit_selected = match self.quit_selected {
                        QuitOption::Resume => QuitOption::MainMenu,
                        QuitOption::MainMenu => QuitOption::Exit,
                        QuitOption::Exit => QuitOption::Resume,
                    };
                }
                Action::NavUp => {
                    self.quit_selected = match self.quit_selected {
                        QuitOption::Resume => QuitOption::Exit,
                        QuitOption::MainMenu => QuitOption::Resume,
                        QuitOption::Exit => QuitOption::MainMenu,
                    };
                }
                Action::Confirm => match self.quit_selected {
                    QuitOption::Resume => self.screen = Screen::Playing,
                    QuitOption::MainMenu => {
                        self.reset_session();
                        self.screen = Screen::Menu;
                    }
                    QuitOption::Exit => return true,
                },
                Action::Quit => self.screen = Screen::Playing,
                _ => {}
            },
            Screen::Results => match action {
                Action::Quit => return true,
                Action::Restart => self.begin_play(Instant::now()),
                Action::Confirm => {
                    self.reset_session();
                    self.screen = Screen::Menu;
                }
                _ => {}
            },
        }
        false
    }

    /// Translate mouse events into engine gestures via layout hit-testing.
    /// The session rejects anything invalid, so this stays mechanical.
    fn handle_mouse(&mut self, m: MouseEvent, layout: &GameLayout) {
        self.cursor = Some((m.column, m.row));
        if self.screen != Screen::Playing {
            return;
        }
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(key) = layout.block_at(m.column, m.row) {
                    let key = key.to_string();
                    self.session.gesture(Gesture::PickUp { block: key });
                } else if let Some(zone) = layout.zone_at(m.column, m.row) {
                    // Click path: a filled zone gives its block back; an
                    // empty one is an observable no-op.
                    let zone = zone.to_string();
                    self.session.gesture(Gesture::Clear { zone });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.session.drag().carrying().is_some() {
                    let zone = layout.zone_at(m.column, m.row).map(str::to_string);
                    self.session.gesture(Gesture::Hover { zone });
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(carried) = self.session.drag().carrying().map(str::to_string) {
                    match layout.zone_at(m.column, m.row).map(str::to_string) {
                        Some(zone) => {
                            self.session.gesture(Gesture::Drop {
                                block: carried,
                                zone,
                            });
                        }
                        None => {
                            self.session.gesture(Gesture::CancelDrag);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}
