use crate::bounds::InkBounds;
use crate::buffer::PixelBuffer;
use crate::capture;
use crate::geometry::{scaled_width, Point};
use crate::history::SnapshotHistory;
use crate::model::Color;
use crate::pointer::{self, PointerEvent, PointerKind};
use crate::recognition::{CalculateRequest, CalculateResponse, RecognitionBackend};
use crate::settings::CanvasSettings;
use crate::shortcuts::{map_shortcut, HistoryCommand, ShortcutEvent};
use crate::stroke::{BrushStyle, StrokeEngine};
use crate::surface::{reduce, SurfaceAction, SurfaceDefaults, SurfaceState};
use anyhow::Result;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Anchor used when a solve finds no ink to center the overlay on.
pub const DEFAULT_OVERLAY_ANCHOR: Point = Point::new(10.0, 200.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Drawing,
    AwaitingRecognition,
    RevealingResults,
}

/// Legal phase transitions. Drawing and recognition never overlap: a
/// stroke cannot begin while a call is in flight, and a solve cannot
/// begin mid-stroke.
pub fn can_transition(from: SessionPhase, to: SessionPhase) -> bool {
    use SessionPhase::*;
    matches!(
        (from, to),
        (Idle, Drawing)
            | (Drawing, Idle)
            | (Drawing, RevealingResults)
            | (Idle, AwaitingRecognition)
            | (AwaitingRecognition, RevealingResults)
            | (AwaitingRecognition, Idle)
            | (RevealingResults, AwaitingRecognition)
            | (RevealingResults, Drawing)
            | (RevealingResults, Idle)
    ) || from == to
}

/// A recognized result placed over the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultOverlay {
    pub expression: String,
    pub answer: String,
    pub position: Point,
}

impl ResultOverlay {
    pub fn label(&self) -> String {
        format!("{} = {}", self.expression, self.answer)
    }
}

/// Brush outline echoed under the hovering cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPreview {
    pub position: Point,
    pub width: f32,
}

/// Payload for one recognition call, tagged with the generation that must
/// match when the response comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRequest {
    pub generation: u64,
    pub request: CalculateRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStart {
    Started(SolveRequest),
    /// A call is already in flight, or the canvas is mid-stroke.
    Busy,
}

#[derive(Debug, Clone)]
struct PendingReveal {
    overlay: ResultOverlay,
    due: Instant,
}

/// Owns the canvas and every piece of per-session state: ink, history,
/// tool selection, the variable dictionary, and the recognition lifecycle.
///
/// All methods run on the caller's thread; the recognition call itself is
/// split into [`CanvasSession::begin_solve`] and
/// [`CanvasSession::complete_solve`] so hosts can run it wherever they
/// like, with [`CanvasSession::solve`] as the blocking convenience.
pub struct CanvasSession {
    buffer: PixelBuffer,
    history: SnapshotHistory,
    surface: SurfaceState,
    defaults: SurfaceDefaults,
    stroke: StrokeEngine,
    phase: SessionPhase,
    captured_pointer: Option<u64>,
    pending_snapshot: Option<PixelBuffer>,
    dict_of_vars: HashMap<String, String>,
    overlays: Vec<ResultOverlay>,
    pending_reveals: VecDeque<PendingReveal>,
    generation: u64,
    in_flight: Option<u64>,
    reveal_delay: Duration,
    pressure_enabled: bool,
    cursor_preview: Option<CursorPreview>,
}

impl CanvasSession {
    pub fn new(width: u32, height: u32, settings: &CanvasSettings) -> Self {
        let defaults = SurfaceDefaults::from_settings(settings);
        CanvasSession {
            buffer: PixelBuffer::new(width, height, Color::TRANSPARENT),
            history: SnapshotHistory::new(settings.history_depth),
            surface: SurfaceState::new(&defaults),
            defaults,
            stroke: StrokeEngine::new(),
            phase: SessionPhase::Idle,
            captured_pointer: None,
            pending_snapshot: None,
            dict_of_vars: HashMap::new(),
            overlays: Vec::new(),
            pending_reveals: VecDeque::new(),
            generation: 0,
            in_flight: None,
            reveal_delay: Duration::from_millis(settings.reveal_delay_ms),
            pressure_enabled: settings.enable_pressure,
            cursor_preview: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn surface(&self) -> SurfaceState {
        self.surface
    }

    pub fn overlays(&self) -> &[ResultOverlay] {
        &self.overlays
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.dict_of_vars
    }

    pub fn cursor_preview(&self) -> Option<CursorPreview> {
        self.cursor_preview
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn pending_reveal_count(&self) -> usize {
        self.pending_reveals.len()
    }

    /// Position passthrough for dragging a revealed overlay.
    pub fn move_overlay(&mut self, index: usize, position: Point) {
        if let Some(overlay) = self.overlays.get_mut(index) {
            overlay.position = position;
        }
    }

    pub fn apply(&mut self, action: SurfaceAction) {
        self.surface = reduce(self.surface, action, &self.defaults);
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) {
        self.refresh_preview(event);
        if !pointer::accepts(event) {
            tracing::debug!(id = event.id, "rejected pointer down");
            return;
        }
        if self.phase == SessionPhase::AwaitingRecognition {
            tracing::debug!("ignoring stroke while recognition is in flight");
            return;
        }
        if self.captured_pointer.is_some() {
            return;
        }
        self.pending_snapshot = Some(self.buffer.clone());
        self.captured_pointer = Some(event.id);
        self.set_phase(SessionPhase::Drawing);
        let style = self.brush_style();
        self.stroke
            .start(&mut self.buffer, event.position, event.pressure, style);
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) {
        self.refresh_preview(event);
        if !pointer::accepts(event) {
            return;
        }
        if self.captured_pointer != Some(event.id) {
            return;
        }
        let style = self.brush_style();
        self.stroke
            .extend(&mut self.buffer, event.position, event.pressure, style);
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) {
        if self.captured_pointer != Some(event.id) {
            return;
        }
        self.finish_stroke();
    }

    /// A cancelled pointer ends the stroke like a release; the ink drawn
    /// so far stays and is committed to history.
    pub fn pointer_cancel(&mut self, event: &PointerEvent) {
        if self.captured_pointer == Some(event.id) {
            self.finish_stroke();
        }
        self.cursor_preview = None;
    }

    pub fn pointer_left(&mut self) {
        self.cursor_preview = None;
    }

    pub fn undo(&mut self) {
        if !self.history_available() {
            return;
        }
        if let Some(target) = self.history.undo(&self.buffer) {
            self.buffer = target;
        }
    }

    pub fn redo(&mut self) {
        if !self.history_available() {
            return;
        }
        if let Some(target) = self.history.redo(&self.buffer) {
            self.buffer = target;
        }
    }

    pub fn handle_shortcut(&mut self, event: ShortcutEvent) {
        match map_shortcut(event) {
            Some(HistoryCommand::Undo) => self.undo(),
            Some(HistoryCommand::Redo) => self.redo(),
            None => {}
        }
    }

    /// Wipes the session back to a blank canvas: ink, history, variable
    /// dictionary, overlays, and any reveals still queued. A response to a
    /// recognition call still in flight will be discarded when it lands.
    pub fn reset(&mut self) {
        if self.stroke.is_drawing() {
            self.stroke.end();
        }
        if self.in_flight.take().is_some() {
            tracing::debug!("dropping in-flight recognition on reset");
        }
        self.captured_pointer = None;
        self.pending_snapshot = None;
        self.buffer.clear(Color::TRANSPARENT);
        self.history.clear();
        self.dict_of_vars.clear();
        self.overlays.clear();
        self.pending_reveals.clear();
        self.set_phase(SessionPhase::Idle);
    }

    /// Captures the canvas and opens a recognition call. Returns
    /// [`SolveStart::Busy`] when a call is already outstanding or a stroke
    /// is still in progress.
    pub fn begin_solve(&mut self) -> Result<SolveStart> {
        if self.in_flight.is_some()
            || !can_transition(self.phase, SessionPhase::AwaitingRecognition)
        {
            return Ok(SolveStart::Busy);
        }
        let image = capture::png_data_url(&self.buffer)?;
        self.generation += 1;
        let generation = self.generation;
        self.in_flight = Some(generation);
        self.set_phase(SessionPhase::AwaitingRecognition);
        Ok(SolveStart::Started(SolveRequest {
            generation,
            request: CalculateRequest {
                image,
                dict_of_vars: self.dict_of_vars.clone(),
            },
        }))
    }

    /// Feeds the outcome of a recognition call back into the session.
    ///
    /// Responses whose generation no longer matches the outstanding call
    /// are discarded, so a reset while a call is in flight cannot be
    /// overwritten by a late response. On success the variable dictionary
    /// absorbs assignment entries, the overlay anchor is computed from the
    /// ink bounding box, the canvas and old overlays are cleared, and one
    /// reveal per entry is queued at a growing delay. On failure the ink
    /// stays untouched.
    pub fn complete_solve(
        &mut self,
        generation: u64,
        result: Result<CalculateResponse>,
        now: Instant,
    ) {
        if self.in_flight != Some(generation) {
            tracing::debug!(generation, "discarding stale recognition result");
            return;
        }
        self.in_flight = None;

        let fallback = if self.pending_reveals.is_empty() {
            SessionPhase::Idle
        } else {
            SessionPhase::RevealingResults
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(?err, "recognition request failed; keeping ink");
                self.set_phase(fallback);
                return;
            }
        };

        for entry in response.data.iter().filter(|entry| entry.assign) {
            self.dict_of_vars
                .insert(entry.expr.clone(), entry.result.clone());
        }

        if response.data.is_empty() {
            tracing::debug!("recognition returned no entries");
            self.set_phase(fallback);
            return;
        }

        let anchor = InkBounds::scan(&self.buffer)
            .center()
            .unwrap_or(DEFAULT_OVERLAY_ANCHOR);
        self.buffer.clear(Color::TRANSPARENT);
        self.overlays.clear();
        self.pending_reveals.clear();
        for (index, entry) in response.data.iter().enumerate() {
            self.pending_reveals.push_back(PendingReveal {
                overlay: ResultOverlay {
                    expression: entry.expr.clone(),
                    answer: entry.result.clone(),
                    position: anchor,
                },
                due: now + self.reveal_delay * (index as u32 + 1),
            });
        }
        self.set_phase(SessionPhase::RevealingResults);
    }

    /// Blocking convenience that runs the whole solve cycle against a
    /// backend on the current thread.
    pub fn solve(&mut self, backend: &dyn RecognitionBackend, now: Instant) -> Result<SolveStart> {
        let start = self.begin_solve()?;
        if let SolveStart::Started(ref solve) = start {
            let result = backend.calculate(&solve.request);
            self.complete_solve(solve.generation, result, now);
        }
        Ok(start)
    }

    /// Promotes every reveal whose delay has elapsed, oldest first, and
    /// returns the phase to idle once the queue drains.
    pub fn tick(&mut self, now: Instant) {
        while let Some(front) = self.pending_reveals.front() {
            if front.due > now {
                break;
            }
            if let Some(reveal) = self.pending_reveals.pop_front() {
                self.overlays.push(reveal.overlay);
            }
        }
        if self.phase == SessionPhase::RevealingResults && self.pending_reveals.is_empty() {
            self.set_phase(SessionPhase::Idle);
        }
    }

    fn brush_style(&self) -> BrushStyle {
        BrushStyle {
            color: self.surface.stroke_color,
            width: self.surface.base_width,
            pressure_enabled: self.pressure_enabled,
        }
    }

    fn refresh_preview(&mut self, event: &PointerEvent) {
        if event.kind == PointerKind::Touch {
            self.cursor_preview = None;
            return;
        }
        self.cursor_preview = Some(CursorPreview {
            position: event.position,
            width: scaled_width(self.surface.base_width, event.pressure, self.pressure_enabled),
        });
    }

    fn history_available(&self) -> bool {
        !self.stroke.is_drawing() && self.phase != SessionPhase::AwaitingRecognition
    }

    fn finish_stroke(&mut self) {
        self.stroke.end();
        if let Some(snapshot) = self.pending_snapshot.take() {
            self.history.commit(snapshot);
        }
        self.captured_pointer = None;
        let next = if self.pending_reveals.is_empty() {
            SessionPhase::Idle
        } else {
            SessionPhase::RevealingResults
        };
        self.set_phase(next);
    }

    fn set_phase(&mut self, next: SessionPhase) {
        if self.phase == next {
            return;
        }
        if !can_transition(self.phase, next) {
            tracing::warn!(from = ?self.phase, to = ?next, "refusing session phase transition");
            return;
        }
        self.phase = next;
    }
}
