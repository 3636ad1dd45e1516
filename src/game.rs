//! Core engine: countdown clock, placement board, drag gestures, session, scoring.

use crate::quiz::Quiz;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Countdown length in seconds when not overridden (3 minutes).
pub const DEFAULT_DURATION_SECS: u32 = 180;

/// Display multiplier: each correct zone is worth this many points.
pub const POINTS_PER_MATCH: u32 = 5;

/// Zero-padded `MM:SS`.
pub fn format_mmss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockEvent {
    Tick { remaining: u32, display: String },
    Expired,
}

/// One-second countdown driven by polling against `Instant` deadlines.
///
/// The tick that reaches zero still emits `Tick` (so `00:00` is displayed);
/// `Expired` fires on the following cadence interval, exactly once, after
/// which the clock is stopped.
#[derive(Debug, Clone)]
pub struct Clock {
    duration_secs: u32,
    remaining_secs: u32,
    next_tick: Option<Instant>,
}

impl Clock {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            next_tick: None,
        }
    }

    /// Reset to the full duration and schedule the first tick one second out.
    pub fn start(&mut self, now: Instant) {
        self.remaining_secs = self.duration_secs;
        self.next_tick = Some(now + Duration::from_secs(1));
    }

    /// Cancel any pending tick. Idempotent.
    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn display(&self) -> String {
        format_mmss(self.remaining_secs)
    }

    /// At most one event per call; the host loop polls every frame, so a
    /// stalled frame catches up one tick per subsequent poll.
    pub fn poll(&mut self, now: Instant) -> Option<ClockEvent> {
        let deadline = self.next_tick?;
        if now < deadline {
            return None;
        }
        if self.remaining_secs == 0 {
            self.next_tick = None;
            return Some(ClockEvent::Expired);
        }
        self.remaining_secs -= 1;
        self.next_tick = Some(deadline + Duration::from_secs(1));
        Some(ClockEvent::Tick {
            remaining: self.remaining_secs,
            display: format_mmss(self.remaining_secs),
        })
    }
}

/// Draggable answer unit. `placed` flips as the block enters/leaves a zone.
#[derive(Debug, Clone)]
pub struct Block {
    pub key: String,
    pub display: String,
    pub placed: bool,
}

/// Placement target. `occupant` holds the key of the block currently dropped
/// here; `expected` is the key that scores.
#[derive(Debug, Clone)]
pub struct Dropzone {
    pub id: String,
    pub expected: String,
    /// Prompt text shown next to the slot. Not consulted when scoring.
    pub hint: String,
    pub occupant: Option<String>,
}

impl Dropzone {
    pub fn is_filled(&self) -> bool {
        self.occupant.is_some()
    }

    /// An empty zone never matches.
    pub fn is_correct(&self) -> bool {
        self.occupant.as_deref() == Some(self.expected.as_str())
    }
}

/// Placement registry: blocks, zones, and key-indexed lookup for both.
///
/// Invariants: at most one occupant per zone, and a block occupies at most
/// one zone (`place` refuses placed blocks; eviction clears the flag).
#[derive(Debug, Clone)]
pub struct Board {
    blocks: Vec<Block>,
    zones: Vec<Dropzone>,
    block_index: HashMap<String, usize>,
    zone_index: HashMap<String, usize>,
}

impl Board {
    /// Quiz definitions are validated at load time (unique keys/ids), so the
    /// indices here are total.
    pub fn new(quiz: &Quiz) -> Self {
        let blocks: Vec<Block> = quiz
            .blocks
            .iter()
            .map(|b| Block {
                key: b.key.clone(),
                display: b.display.clone(),
                placed: false,
            })
            .collect();
        let zones: Vec<Dropzone> = quiz
            .zones
            .iter()
            .map(|z| Dropzone {
                id: z.id.clone(),
                expected: z.expected.clone(),
                hint: z.hint.clone(),
                occupant: None,
            })
            .collect();
        let block_index = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (b.key.clone(), i))
            .collect();
        let zone_index = zones
            .iter()
            .enumerate()
            .map(|(i, z)| (z.id.clone(), i))
            .collect();
        Self {
            blocks,
            zones,
            block_index,
            zone_index,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn zones(&self) -> &[Dropzone] {
        &self.zones
    }

    pub fn block(&self, key: &str) -> Option<&Block> {
        self.block_index.get(key).map(|&i| &self.blocks[i])
    }

    pub fn zone(&self, id: &str) -> Option<&Dropzone> {
        self.zone_index.get(id).map(|&i| &self.zones[i])
    }

    pub fn is_placed(&self, key: &str) -> bool {
        self.block(key).is_some_and(|b| b.placed)
    }

    pub fn occupant_of(&self, id: &str) -> Option<&str> {
        self.zone(id).and_then(|z| z.occupant.as_deref())
    }

    fn set_placed(&mut self, key: &str, placed: bool) {
        if let Some(&i) = self.block_index.get(key) {
            self.blocks[i].placed = placed;
        }
    }

    /// Assign `key` to `id`, evicting any current occupant (its `placed`
    /// flag is cleared first). Caller has checked both exist and the block
    /// is not placed elsewhere. Returns the evicted key, if any.
    fn place(&mut self, key: &str, id: &str) -> Option<String> {
        let zi = self.zone_index[id];
        let evicted = self.zones[zi].occupant.replace(key.to_string());
        if let Some(prev) = evicted.clone() {
            self.set_placed(&prev, false);
        }
        self.set_placed(key, true);
        evicted
    }

    /// Empty the zone and return its occupant to the tray.
    fn clear_zone(&mut self, id: &str) -> Option<String> {
        let zi = *self.zone_index.get(id)?;
        let evicted = self.zones[zi].occupant.take()?;
        self.set_placed(&evicted, false);
        Some(evicted)
    }
}

/// Low-level pick-up/drag/drop commands, decoupled from the input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Start dragging a tray block.
    PickUp { block: String },
    /// Cursor moved while dragging; `None` means no zone under it.
    Hover { zone: Option<String> },
    /// Release the carried identity over a zone.
    Drop { block: String, zone: String },
    /// Release outside any zone.
    CancelDrag,
    /// Click on a filled zone: return its occupant to the tray.
    Clear { zone: String },
}

/// Every gesture produces an outcome; invalid ones are observable no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    DragStarted {
        block: String,
    },
    DragCanceled,
    HoverChanged {
        zone: Option<String>,
    },
    Placed {
        block: String,
        zone: String,
        evicted: Option<String>,
    },
    Cleared {
        block: String,
        zone: String,
    },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotRunning,
    UnknownBlock,
    UnknownZone,
    AlreadyPlaced,
    NotDragging,
    EmptyZone,
}

/// Transient drag state: the carried block and the zone lit as a drop target.
/// Both are presentation affordances the board never stores.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    carrying: Option<String>,
    highlight: Option<String>,
}

impl DragController {
    pub fn carrying(&self) -> Option<&str> {
        self.carrying.as_deref()
    }

    pub fn highlight(&self) -> Option<&str> {
        self.highlight.as_deref()
    }

    fn pick_up(&mut self, board: &Board, key: &str) -> GestureOutcome {
        match board.block(key) {
            None => GestureOutcome::Ignored(IgnoreReason::UnknownBlock),
            Some(b) if b.placed => GestureOutcome::Ignored(IgnoreReason::AlreadyPlaced),
            Some(_) => {
                self.carrying = Some(key.to_string());
                self.highlight = None;
                GestureOutcome::DragStarted {
                    block: key.to_string(),
                }
            }
        }
    }

    /// Only empty zones light up as targets; a filled zone under the cursor
    /// stays unlit (dropping there still works, via eviction).
    fn hover(&mut self, board: &Board, zone: Option<&str>) -> GestureOutcome {
        if self.carrying.is_none() {
            return GestureOutcome::Ignored(IgnoreReason::NotDragging);
        }
        let lit = zone
            .filter(|id| board.zone(id).is_some_and(|z| !z.is_filled()))
            .map(str::to_string);
        self.highlight = lit.clone();
        GestureOutcome::HoverChanged { zone: lit }
    }

    /// The drop carries the block identity itself (not the controller's
    /// carry), so an unresolvable identity is rejected without touching the
    /// board. Any drop ends the drag.
    fn drop_on(&mut self, board: &mut Board, key: &str, zone_id: &str) -> GestureOutcome {
        self.carrying = None;
        self.highlight = None;
        if board.block(key).is_none() {
            return GestureOutcome::Ignored(IgnoreReason::UnknownBlock);
        }
        if board.zone(zone_id).is_none() {
            return GestureOutcome::Ignored(IgnoreReason::UnknownZone);
        }
        if board.is_placed(key) {
            return GestureOutcome::Ignored(IgnoreReason::AlreadyPlaced);
        }
        let evicted = board.place(key, zone_id);
        GestureOutcome::Placed {
            block: key.to_string(),
            zone: zone_id.to_string(),
            evicted,
        }
    }

    fn cancel(&mut self) -> GestureOutcome {
        if self.carrying.take().is_none() {
            return GestureOutcome::Ignored(IgnoreReason::NotDragging);
        }
        self.highlight = None;
        GestureOutcome::DragCanceled
    }

    fn clear(&mut self, board: &mut Board, zone_id: &str) -> GestureOutcome {
        if board.zone(zone_id).is_none() {
            return GestureOutcome::Ignored(IgnoreReason::UnknownZone);
        }
        match board.clear_zone(zone_id) {
            None => GestureOutcome::Ignored(IgnoreReason::EmptyZone),
            Some(block) => GestureOutcome::Cleared {
                block,
                zone: zone_id.to_string(),
            },
        }
    }

    fn reset(&mut self) {
        self.carrying = None;
        self.highlight = None;
    }
}

/// Final tally, computed once when the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    pub correct: usize,
    pub total: usize,
}

impl ScoreReport {
    /// Presentation points: `(earned, possible)` at `POINTS_PER_MATCH` each.
    pub fn points(&self) -> (u32, u32) {
        (
            self.correct as u32 * POINTS_PER_MATCH,
            self.total as u32 * POINTS_PER_MATCH,
        )
    }

    pub fn is_perfect(&self) -> bool {
        self.correct == self.total
    }
}

/// Compare each zone's occupant to its expected key. Pure.
pub fn score(zones: &[Dropzone]) -> ScoreReport {
    ScoreReport {
        correct: zones.iter().filter(|z| z.is_correct()).count(),
        total: zones.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Tick { remaining: u32, display: String },
    TimeUp { report: ScoreReport },
}

/// One timed play-through: owns the clock, the board, and the drag state.
/// idle -> running on `start`, running -> ended on clock expiry; gestures
/// are accepted only while running.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    clock: Clock,
    board: Board,
    drag: DragController,
    report: Option<ScoreReport>,
}

impl Session {
    pub fn new(quiz: &Quiz, duration_secs: u32) -> Self {
        Self {
            phase: Phase::Idle,
            clock: Clock::new(duration_secs),
            board: Board::new(quiz),
            drag: DragController::default(),
            report: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Present once the session has ended.
    pub fn report(&self) -> Option<ScoreReport> {
        self.report
    }

    /// idle -> running. Returns false (and does nothing) in any other phase.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Running;
        self.clock.start(now);
        true
    }

    /// Dispatch a gesture. Everything outside `running` is rejected.
    pub fn gesture(&mut self, gesture: Gesture) -> GestureOutcome {
        if self.phase != Phase::Running {
            return GestureOutcome::Ignored(IgnoreReason::NotRunning);
        }
        match gesture {
            Gesture::PickUp { block } => self.drag.pick_up(&self.board, &block),
            Gesture::Hover { zone } => self.drag.hover(&self.board, zone.as_deref()),
            Gesture::Drop { block, zone } => self.drag.drop_on(&mut self.board, &block, &zone),
            Gesture::CancelDrag => self.drag.cancel(),
            Gesture::Clear { zone } => self.drag.clear(&mut self.board, &zone),
        }
    }

    /// Drive the clock. Expiry ends the session and yields the one report.
    pub fn poll(&mut self, now: Instant) -> Option<SessionEvent> {
        if self.phase != Phase::Running {
            return None;
        }
        match self.clock.poll(now)? {
            ClockEvent::Tick { remaining, display } => {
                Some(SessionEvent::Tick { remaining, display })
            }
            ClockEvent::Expired => Some(SessionEvent::TimeUp { report: self.end() }),
        }
    }

    fn end(&mut self) -> ScoreReport {
        self.phase = Phase::Ended;
        self.clock.stop();
        self.drag.reset();
        let report = score(self.board.zones());
        self.report = Some(report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Quiz;

    fn stack_queue_quiz() -> Quiz {
        Quiz::parse(
            r#"
            title = "Data structures"
            block[A]="Stack: LIFO"
            block[B]="Queue: FIFO"
            zone[d1]="A|Undo history"
            zone[d2]="B|Printer jobs"
            "#,
        )
        .unwrap()
    }

    fn running_session() -> (Session, Instant) {
        let quiz = stack_queue_quiz();
        let mut s = Session::new(&quiz, 3);
        let now = Instant::now();
        assert!(s.start(now));
        (s, now)
    }

    fn drop_block(s: &mut Session, block: &str, zone: &str) -> GestureOutcome {
        s.gesture(Gesture::Drop {
            block: block.to_string(),
            zone: zone.to_string(),
        })
    }

    fn tick(s: &mut Session, now: Instant, secs: u64) -> Option<SessionEvent> {
        s.poll(now + Duration::from_secs(secs))
    }

    #[test]
    fn format_mmss_pads() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(59), "00:59");
        assert_eq!(format_mmss(180), "03:00");
        assert_eq!(format_mmss(3599), "59:59");
    }

    #[test]
    fn clock_decrements_once_per_tick() {
        let mut c = Clock::new(3);
        let now = Instant::now();
        c.start(now);
        assert_eq!(c.remaining_secs(), 3);
        assert_eq!(c.poll(now), None);
        assert_eq!(
            c.poll(now + Duration::from_secs(1)),
            Some(ClockEvent::Tick {
                remaining: 2,
                display: "00:02".into()
            })
        );
        // Polling again inside the same second yields nothing.
        assert_eq!(c.poll(now + Duration::from_millis(1500)), None);
        assert!(matches!(
            c.poll(now + Duration::from_secs(2)),
            Some(ClockEvent::Tick { remaining: 1, .. })
        ));
        assert!(matches!(
            c.poll(now + Duration::from_secs(3)),
            Some(ClockEvent::Tick { remaining: 0, .. })
        ));
        assert_eq!(c.remaining_secs(), 0);
        // Expiry fires once on the next interval, then the clock is stopped.
        assert_eq!(
            c.poll(now + Duration::from_secs(4)),
            Some(ClockEvent::Expired)
        );
        assert_eq!(c.poll(now + Duration::from_secs(5)), None);
        assert_eq!(c.remaining_secs(), 0);
    }

    #[test]
    fn clock_stop_is_idempotent_and_start_resets() {
        let mut c = Clock::new(10);
        let now = Instant::now();
        c.start(now);
        assert!(c.poll(now + Duration::from_secs(1)).is_some());
        c.stop();
        c.stop();
        assert_eq!(c.poll(now + Duration::from_secs(30)), None);
        c.start(now + Duration::from_secs(30));
        assert_eq!(c.remaining_secs(), 10);
        assert_eq!(c.display(), "00:10");
    }

    #[test]
    fn gestures_rejected_before_start() {
        let quiz = stack_queue_quiz();
        let mut s = Session::new(&quiz, 3);
        let out = s.gesture(Gesture::PickUp {
            block: "A".to_string(),
        });
        assert_eq!(out, GestureOutcome::Ignored(IgnoreReason::NotRunning));
        let out = drop_block(&mut s, "A", "d1");
        assert_eq!(out, GestureOutcome::Ignored(IgnoreReason::NotRunning));
        assert_eq!(s.board().occupant_of("d1"), None);
    }

    #[test]
    fn start_only_from_idle() {
        let quiz = stack_queue_quiz();
        let mut s = Session::new(&quiz, 3);
        let now = Instant::now();
        assert!(s.start(now));
        assert!(!s.start(now));
        for secs in 1..=4 {
            tick(&mut s, now, secs);
        }
        assert_eq!(s.phase(), Phase::Ended);
        assert!(!s.start(now + Duration::from_secs(700)));
    }

    #[test]
    fn place_marks_block_and_zone() {
        let (mut s, _) = running_session();
        let out = drop_block(&mut s, "A", "d1");
        assert_eq!(
            out,
            GestureOutcome::Placed {
                block: "A".to_string(),
                zone: "d1".to_string(),
                evicted: None,
            }
        );
        assert!(s.board().is_placed("A"));
        assert_eq!(s.board().occupant_of("d1"), Some("A"));
    }

    #[test]
    fn placed_block_cannot_be_picked_up_or_dropped_again() {
        let (mut s, _) = running_session();
        drop_block(&mut s, "A", "d1");
        let out = s.gesture(Gesture::PickUp {
            block: "A".to_string(),
        });
        assert_eq!(out, GestureOutcome::Ignored(IgnoreReason::AlreadyPlaced));
        let out = drop_block(&mut s, "A", "d2");
        assert_eq!(out, GestureOutcome::Ignored(IgnoreReason::AlreadyPlaced));
        // Exclusivity: A occupies exactly one zone.
        let holders = s
            .board()
            .zones()
            .iter()
            .filter(|z| z.occupant.as_deref() == Some("A"))
            .count();
        assert_eq!(holders, 1);
    }

    #[test]
    fn eviction_returns_prior_occupant_and_touches_nothing_else() {
        let (mut s, _) = running_session();
        drop_block(&mut s, "A", "d1");
        drop_block(&mut s, "B", "d2");
        // Clear d2 so B is available, then overwrite d1 with it.
        s.gesture(Gesture::Clear {
            zone: "d2".to_string(),
        });
        let out = drop_block(&mut s, "B", "d1");
        assert_eq!(
            out,
            GestureOutcome::Placed {
                block: "B".to_string(),
                zone: "d1".to_string(),
                evicted: Some("A".to_string()),
            }
        );
        assert!(!s.board().is_placed("A"));
        assert!(s.board().is_placed("B"));
        assert_eq!(s.board().occupant_of("d1"), Some("B"));
        // No other zone was altered by the overwrite.
        assert_eq!(s.board().occupant_of("d2"), None);
    }

    #[test]
    fn clear_on_empty_zone_is_a_noop() {
        let (mut s, _) = running_session();
        let out = s.gesture(Gesture::Clear {
            zone: "d1".to_string(),
        });
        assert_eq!(out, GestureOutcome::Ignored(IgnoreReason::EmptyZone));
        let again = s.gesture(Gesture::Clear {
            zone: "d1".to_string(),
        });
        assert_eq!(again, GestureOutcome::Ignored(IgnoreReason::EmptyZone));
    }

    #[test]
    fn clear_returns_block_to_tray() {
        let (mut s, _) = running_session();
        drop_block(&mut s, "A", "d1");
        let out = s.gesture(Gesture::Clear {
            zone: "d1".to_string(),
        });
        assert_eq!(
            out,
            GestureOutcome::Cleared {
                block: "A".to_string(),
                zone: "d1".to_string(),
            }
        );
        assert!(!s.board().is_placed("A"));
        assert_eq!(s.board().occupant_of("d1"), None);
    }

    #[test]
    fn unknown_identities_are_ignored() {
        let (mut s, _) = running_session();
        assert_eq!(
            drop_block(&mut s, "nope", "d1"),
            GestureOutcome::Ignored(IgnoreReason::UnknownBlock)
        );
        assert_eq!(
            drop_block(&mut s, "A", "nowhere"),
            GestureOutcome::Ignored(IgnoreReason::UnknownZone)
        );
        assert_eq!(s.board().occupant_of("d1"), None);
        assert!(!s.board().is_placed("A"));
    }

    #[test]
    fn hover_lights_only_empty_zones_while_dragging() {
        let (mut s, _) = running_session();
        // Not dragging yet.
        let out = s.gesture(Gesture::Hover {
            zone: Some("d1".to_string()),
        });
        assert_eq!(out, GestureOutcome::Ignored(IgnoreReason::NotDragging));
        drop_block(&mut s, "A", "d1");
        s.gesture(Gesture::PickUp {
            block: "B".to_string(),
        });
        // d1 is filled: no highlight.
        let out = s.gesture(Gesture::Hover {
            zone: Some("d1".to_string()),
        });
        assert_eq!(out, GestureOutcome::HoverChanged { zone: None });
        let out = s.gesture(Gesture::Hover {
            zone: Some("d2".to_string()),
        });
        assert_eq!(
            out,
            GestureOutcome::HoverChanged {
                zone: Some("d2".to_string())
            }
        );
        assert_eq!(s.drag().highlight(), Some("d2"));
        s.gesture(Gesture::CancelDrag);
        assert_eq!(s.drag().carrying(), None);
        assert_eq!(s.drag().highlight(), None);
    }

    #[test]
    fn scoring_is_deterministic() {
        let (mut s, _) = running_session();
        drop_block(&mut s, "A", "d1");
        let a = score(s.board().zones());
        let b = score(s.board().zones());
        assert_eq!(a, b);
        assert_eq!(
            a,
            ScoreReport {
                correct: 1,
                total: 2
            }
        );
    }

    #[test]
    fn timer_expiry_scores_all_correct() {
        let (mut s, now) = running_session();
        drop_block(&mut s, "A", "d1");
        drop_block(&mut s, "B", "d2");
        assert!(matches!(
            tick(&mut s, now, 1),
            Some(SessionEvent::Tick { remaining: 2, .. })
        ));
        assert!(matches!(
            tick(&mut s, now, 2),
            Some(SessionEvent::Tick { remaining: 1, .. })
        ));
        assert!(matches!(
            tick(&mut s, now, 3),
            Some(SessionEvent::Tick { remaining: 0, .. })
        ));
        let end = tick(&mut s, now, 4);
        assert_eq!(
            end,
            Some(SessionEvent::TimeUp {
                report: ScoreReport {
                    correct: 2,
                    total: 2
                }
            })
        );
        assert_eq!(s.phase(), Phase::Ended);
        assert_eq!(s.report().unwrap().points(), (10, 10));
        // Occupants stay visible for review after the end.
        assert_eq!(s.board().occupant_of("d1"), Some("A"));
    }

    #[test]
    fn swapped_answers_score_zero() {
        let (mut s, now) = running_session();
        drop_block(&mut s, "B", "d1");
        drop_block(&mut s, "A", "d2");
        for secs in 1..=4 {
            tick(&mut s, now, secs);
        }
        assert_eq!(
            s.report(),
            Some(ScoreReport {
                correct: 0,
                total: 2
            })
        );
        assert!(!s.report().unwrap().is_perfect());
    }

    #[test]
    fn post_expiry_gestures_are_noops_and_report_is_stable() {
        let (mut s, now) = running_session();
        drop_block(&mut s, "A", "d1");
        for secs in 1..=4 {
            tick(&mut s, now, secs);
        }
        let report = s.report().unwrap();
        assert_eq!(
            drop_block(&mut s, "B", "d2"),
            GestureOutcome::Ignored(IgnoreReason::NotRunning)
        );
        assert_eq!(
            s.gesture(Gesture::Clear {
                zone: "d1".to_string()
            }),
            GestureOutcome::Ignored(IgnoreReason::NotRunning)
        );
        assert_eq!(s.board().occupant_of("d1"), Some("A"));
        assert_eq!(s.board().occupant_of("d2"), None);
        assert_eq!(s.report(), Some(report));
        assert_eq!(tick(&mut s, now, 10), None);
    }

    #[test]
    fn remaining_never_negative() {
        let (mut s, now) = running_session();
        for secs in 1..=20 {
            tick(&mut s, now, secs);
            assert!(s.clock().remaining_secs() <= 3);
        }
        assert_eq!(s.clock().remaining_secs(), 0);
    }
}
