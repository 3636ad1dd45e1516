//! Layout and drawing: menu, quiz panel, quit menu, results, timer gauge.

use crate::app::{QuitOption, Screen};
use crate::game::{Board, Phase, Session};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Quiz panel width in terminal cells (clamped to the terminal).
const PANEL_WIDTH: u16 = 66;

/// Duration of the results fade-in (TachyonFX).
const RESULTS_FADE_MS: u32 = 450;

/// Screen positions of every interactive row, computed once per frame and
/// shared between drawing and mouse hit-testing so the two cannot diverge.
#[derive(Debug, Clone)]
pub struct GameLayout {
    pub panel: Rect,
    pub header: Rect,
    pub gauge: Rect,
    pub zone_rows: Vec<(String, Rect)>,
    pub block_rows: Vec<(String, Rect)>,
    pub status: Rect,
}

impl GameLayout {
    pub fn zone_at(&self, x: u16, y: u16) -> Option<&str> {
        self.zone_rows
            .iter()
            .find(|(_, r)| r.contains(Position::new(x, y)))
            .map(|(id, _)| id.as_str())
    }

    pub fn block_at(&self, x: u16, y: u16) -> Option<&str> {
        self.block_rows
            .iter()
            .find(|(_, r)| r.contains(Position::new(x, y)))
            .map(|(key, _)| key.as_str())
    }
}

/// Centered column: header, gauge, one bordered box of zone rows, one of
/// block rows, and a status line. Rows degrade to zero-size rects when the
/// terminal is too small; hit-testing then simply misses them.
pub fn game_layout(area: Rect, board: &Board) -> GameLayout {
    let zones = board.zones().len() as u16;
    let blocks = board.blocks().len() as u16;
    let width = PANEL_WIDTH.min(area.width);
    // header 3 + gauge 1 + zones box + blocks box + status 1
    let height = (3 + 1 + (zones + 2) + (blocks + 2) + 1).min(area.height);
    let panel = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let clamp_row = |y: u16, h: u16| -> Rect {
        let bottom = panel.y + panel.height;
        if y >= bottom || panel.width < 3 {
            return Rect::new(panel.x, bottom.saturating_sub(1), 0, 0);
        }
        Rect::new(panel.x, y, panel.width, h.min(bottom - y))
    };

    let mut y = panel.y;
    let header = clamp_row(y, 3);
    y += 3;
    let gauge = clamp_row(y, 1);
    y += 1;

    // Inner rows of the zones box, skipping its border.
    let mut zone_rows = Vec::with_capacity(board.zones().len());
    {
        let mut ry = y + 1;
        for z in board.zones() {
            let r = clamp_row(ry, 1);
            let inner = Rect {
                x: r.x + 1,
                width: r.width.saturating_sub(2),
                ..r
            };
            zone_rows.push((z.id.clone(), inner));
            ry += 1;
        }
    }
    y += zones + 2;

    let mut block_rows = Vec::with_capacity(board.blocks().len());
    {
        let mut ry = y + 1;
        for b in board.blocks() {
            let r = clamp_row(ry, 1);
            let inner = Rect {
                x: r.x + 1,
                width: r.width.saturating_sub(2),
                ..r
            };
            block_rows.push((b.key.clone(), inner));
            ry += 1;
        }
    }
    y += blocks + 2;

    let status = clamp_row(y, 1);

    GameLayout {
        panel,
        header,
        gauge,
        zone_rows,
        block_rows,
        status,
    }
}

/// Draw the current screen. `timer_text` is whatever the session last
/// published (`MM:SS` per tick, then "Time's up!").
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    session: &Session,
    quiz_title: &str,
    theme: &Theme,
    layout: &GameLayout,
    timer_text: &str,
    cursor: Option<(u16, u16)>,
    quit_selected: Option<QuitOption>,
    results_effect: &mut Option<Effect>,
    results_effect_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    Block::default()
        .style(Style::default().bg(theme.bg))
        .render(area, frame.buffer_mut());

    match screen {
        Screen::Menu => draw_menu(frame, quiz_title, session, theme, area),
        Screen::Playing => {
            draw_board(frame, session, quiz_title, theme, layout, timer_text);
            draw_carried(frame, session, theme, cursor, area);
        }
        Screen::QuitMenu => {
            draw_board(frame, session, quiz_title, theme, layout, timer_text);
            if let Some(opt) = quit_selected {
                draw_quit_menu(frame, theme, opt, area);
            }
        }
        Screen::Results => {
            draw_board(frame, session, quiz_title, theme, layout, timer_text);
            draw_results(
                frame,
                session,
                theme,
                area,
                results_effect,
                results_effect_time,
                now,
            );
        }
    }
}

fn draw_menu(frame: &mut Frame, quiz_title: &str, session: &Session, theme: &Theme, area: Rect) {
    let popup_w = 52u16;
    let popup_h = 16u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let counts = format!(
        " {} blocks · {} dropzones · {} ",
        session.board().blocks().len(),
        session.board().zones().len(),
        crate::game::format_mmss(session.clock().duration_secs()),
    );
    let accent = Style::default().fg(theme.highlight);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(" Quizdrop ", Style::default().fg(theme.title).bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {} ", quiz_title),
            Style::default().fg(theme.main_fg).bold(),
        )),
        Line::from(Span::styled(counts, Style::default().fg(theme.used))),
        Line::from(""),
        Line::from(Span::styled(
            " Drag blocks into their dropzones before ",
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            " the clock runs out. ",
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" MOUSE ", accent),
            Span::styled("drag to place, click a filled zone", Style::default().fg(theme.main_fg)),
        ]),
        Line::from(Span::styled(
            " to take the block back ",
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" ENTER ", accent),
            Span::styled("start   ", Style::default().fg(theme.main_fg)),
            Span::styled(" Q ", accent),
            Span::styled("quit", Style::default().fg(theme.main_fg)),
        ]),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

/// Timer + gauge + zone and block rows at the rects the layout picked.
fn draw_board(
    frame: &mut Frame,
    session: &Session,
    quiz_title: &str,
    theme: &Theme,
    layout: &GameLayout,
    timer_text: &str,
) {
    let ended = session.phase() == Phase::Ended;

    // Header: quiz title left, timer right.
    let timer_style = if ended {
        Style::default().fg(theme.incorrect).bold()
    } else if session.clock().remaining_secs() <= 10 {
        Style::default().fg(theme.incorrect).bold()
    } else {
        Style::default().fg(theme.title).bold()
    };
    let header_line = Line::from(vec![
        Span::styled(format!(" {} ", quiz_title), Style::default().fg(theme.title).bold()),
        Span::styled("· ", Style::default().fg(theme.div_line)),
        Span::styled(timer_text.to_string(), timer_style),
    ]);
    Paragraph::new(header_line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line)),
        )
        .render(layout.header, frame.buffer_mut());

    let duration = session.clock().duration_secs().max(1);
    let ratio = f64::from(session.clock().remaining_secs()) / f64::from(duration);
    Gauge::default()
        .ratio(ratio.clamp(0.0, 1.0))
        .label("")
        .gauge_style(Style::default().fg(theme.highlight).bg(theme.div_line))
        .render(layout.gauge, frame.buffer_mut());

    // Zones box.
    let zones_outer = Rect {
        x: layout.panel.x,
        y: layout.gauge.y + 1,
        width: layout.panel.width,
        height: (session.board().zones().len() as u16 + 2)
            .min(layout.panel.height.saturating_sub(4)),
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line))
        .title(Span::styled(" Dropzones ", Style::default().fg(theme.title)))
        .render(zones_outer, frame.buffer_mut());

    for (id, rect) in &layout.zone_rows {
        let Some(zone) = session.board().zone(id) else {
            continue;
        };
        if rect.width == 0 {
            continue;
        }
        let highlighted = session.drag().highlight() == Some(id.as_str());
        let occupant_display = zone
            .occupant
            .as_deref()
            .and_then(|k| session.board().block(k))
            .map(|b| b.display.clone());

        let slot = match (&occupant_display, ended) {
            (Some(text), true) if zone.is_correct() => {
                Span::styled(format!("✓ {}", text), Style::default().fg(theme.correct).bold())
            }
            (Some(text), true) => {
                Span::styled(format!("✗ {}", text), Style::default().fg(theme.incorrect).bold())
            }
            (None, true) => Span::styled("✗ (empty)", Style::default().fg(theme.incorrect)),
            (Some(text), false) => Span::styled(text.clone(), Style::default().fg(theme.block).bold()),
            (None, false) if highlighted => {
                Span::styled("▼ drop here", Style::default().fg(theme.highlight).bold())
            }
            (None, false) => Span::styled("· · ·", Style::default().fg(theme.used)),
        };

        let hint = if zone.hint.is_empty() {
            id.clone()
        } else {
            zone.hint.clone()
        };
        let hint_width = (rect.width as usize).saturating_sub(2) / 2;
        let line = Line::from(vec![
            Span::styled(
                format!(" {:<w$.w$} ", hint, w = hint_width),
                Style::default().fg(theme.main_fg),
            ),
            slot,
        ]);
        let row_style = if highlighted {
            Style::default().bg(theme.div_line)
        } else {
            Style::default()
        };
        Paragraph::new(line)
            .style(row_style)
            .render(*rect, frame.buffer_mut());
    }

    // Tray box.
    let tray_outer = Rect {
        x: layout.panel.x,
        y: zones_outer.y + zones_outer.height,
        width: layout.panel.width,
        height: (session.board().blocks().len() as u16 + 2)
            .min((layout.panel.y + layout.panel.height).saturating_sub(zones_outer.y + zones_outer.height)),
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line))
        .title(Span::styled(" Blocks ", Style::default().fg(theme.title)))
        .render(tray_outer, frame.buffer_mut());

    for (key, rect) in &layout.block_rows {
        let Some(block) = session.board().block(key) else {
            continue;
        };
        if rect.width == 0 {
            continue;
        }
        let carrying = session.drag().carrying() == Some(key.as_str());
        let style = if carrying {
            Style::default().fg(theme.highlight).bold()
        } else if block.placed {
            Style::default().fg(theme.used).dim().crossed_out()
        } else {
            Style::default().fg(theme.block)
        };
        let marker = if carrying {
            "▣ "
        } else if block.placed {
            "▢ "
        } else {
            "▮ "
        };
        let line = Line::from(vec![
            Span::styled(format!(" {}", marker), style),
            Span::styled(block.display.clone(), style),
        ]);
        Paragraph::new(line).render(*rect, frame.buffer_mut());
    }

    let status = if ended {
        " R restart · ENTER menu · Q quit ".to_string()
    } else if let Some(key) = session.drag().carrying() {
        let name = session
            .board()
            .block(key)
            .map_or(key, |b| b.display.as_str());
        format!(" carrying: {} — release over a dropzone ", name)
    } else {
        " drag a block into a zone · click a filled zone to clear · Q quit ".to_string()
    };
    Paragraph::new(Line::from(Span::styled(
        status,
        Style::default().fg(theme.used),
    )))
    .alignment(Alignment::Center)
    .render(layout.status, frame.buffer_mut());
}

/// Floating label following the mouse while a block is carried.
fn draw_carried(
    frame: &mut Frame,
    session: &Session,
    theme: &Theme,
    cursor: Option<(u16, u16)>,
    area: Rect,
) {
    let (Some(key), Some((cx, cy))) = (session.drag().carrying(), cursor) else {
        return;
    };
    let Some(block) = session.board().block(key) else {
        return;
    };
    let text = format!(" {} ", block.display);
    let w = (text.chars().count() as u16).min(area.width);
    // One row above the pointer so the pointer row itself stays visible.
    let x = cx.min(area.width.saturating_sub(w));
    let y = cy.saturating_sub(1);
    let rect = Rect::new(x, y, w, area.height.min(1));
    Paragraph::new(Span::styled(
        text,
        Style::default().fg(Color::Black).bg(theme.highlight).bold(),
    ))
    .render(rect, frame.buffer_mut());
}

fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption, area: Rect) {
    let popup_w = 30u16;
    let popup_h = 7u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let item = |label: &str, this: QuitOption| {
        if selected == this {
            Line::from(Span::styled(
                format!(" ▶ {} ", label),
                Style::default().fg(Color::Black).bg(theme.title).bold(),
            ))
        } else {
            Line::from(Span::styled(
                format!("   {} ", label),
                Style::default().fg(theme.main_fg),
            ))
        }
    };
    let lines = vec![
        Line::from(""),
        item("Resume", QuitOption::Resume),
        item("Main menu", QuitOption::MainMenu),
        item("Exit", QuitOption::Exit),
        Line::from(""),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" Leaving? ", Style::default().fg(theme.title))),
        )
        .render(popup, frame.buffer_mut());
}

/// Score popup over the reviewed board, faded in with TachyonFX.
fn draw_results(
    frame: &mut Frame,
    session: &Session,
    theme: &Theme,
    area: Rect,
    results_effect: &mut Option<Effect>,
    results_effect_time: &mut Option<Instant>,
    now: Instant,
) {
    let Some(report) = session.report() else {
        return;
    };
    let (earned, possible) = report.points();
    let popup_w = 34u16;
    let popup_h = 9u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + 1,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let verdict_style = if report.is_perfect() {
        Style::default().fg(theme.correct).bold()
    } else {
        Style::default().fg(theme.incorrect).bold()
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Time's up! ",
            Style::default().fg(Color::White).bg(theme.incorrect).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {}/{} ", earned, possible),
            verdict_style,
        )),
        Line::from(Span::styled(
            format!(" {} of {} matched ", report.correct, report.total),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " R — Restart    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" Quizdrop ", Style::default().fg(theme.title))),
        )
        .render(popup, frame.buffer_mut());

    // Effect is created lazily on the first results frame and fed the
    // elapsed delta on every subsequent one.
    let delta = results_effect_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    *results_effect_time = Some(now);
    if results_effect.is_none() {
        *results_effect = Some(
            fx::fade_from(theme.bg, theme.bg, (RESULTS_FADE_MS, Interpolation::Linear))
                .with_area(popup),
        );
    }
    if let Some(effect) = results_effect {
        frame.render_effect(effect, popup, TfxDuration::from_millis(delta_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;
    use crate::quiz::Quiz;

    fn board() -> Board {
        Board::new(&Quiz::builtin())
    }

    #[test]
    fn layout_rows_are_disjoint_and_inside_panel() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = game_layout(area, &board());
        let mut rects: Vec<Rect> = layout.zone_rows.iter().map(|(_, r)| *r).collect();
        rects.extend(layout.block_rows.iter().map(|(_, r)| *r));
        for (i, a) in rects.iter().enumerate() {
            assert!(a.width > 0 && a.height == 1);
            assert!(a.y >= layout.panel.y);
            assert!(a.y < layout.panel.y + layout.panel.height);
            for b in &rects[i + 1..] {
                assert!(a.intersection(*b).is_empty(), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn hit_testing_resolves_rows() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = game_layout(area, &board());
        let (zone_id, zr) = layout.zone_rows[0].clone();
        assert_eq!(layout.zone_at(zr.x, zr.y), Some(zone_id.as_str()));
        let (block_key, br) = layout.block_rows[2].clone();
        assert_eq!(layout.block_at(br.x + 1, br.y), Some(block_key.as_str()));
        // A point outside every row resolves to nothing.
        assert_eq!(layout.zone_at(0, 0), None);
        assert_eq!(layout.block_at(0, 0), None);
    }

    #[test]
    fn tiny_terminal_degrades_without_panicking() {
        let area = Rect::new(0, 0, 4, 3);
        let layout = game_layout(area, &board());
        assert!(layout.panel.width <= 4);
        // Rows outside the clamped panel are zero-sized and never hit.
        for (_, r) in &layout.zone_rows {
            assert!(r.width == 0 || r.y < layout.panel.y + layout.panel.height);
        }
    }
}
