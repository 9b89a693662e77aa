//! session.rs
//!
//! Сессия редактора схемы: текущая схема, выбранный в палитре тип, жест
//! протягивания и история правок. Принимает события от поверхности отрисовки
//! (клик, нажатие, вход курсора в ячейку, правый клик) и переводит их в
//! операции редактора.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::error::LayoutError;
use crate::models::layout::{SeatLayout, SeatStats};
use crate::models::room::PersistedLayout;
use crate::models::seat::SeatType;
use crate::services::editor::{self, DragMode};
use crate::services::gesture::{DragGesture, Release};
use crate::services::{reconcile, transfer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    layout: SeatLayout,
    selected: SeatType,
    gesture: DragGesture,
    /// Layout before the running drag; the whole drag is one history step.
    drag_snapshot: Option<SeatLayout>,
    undo: VecDeque<SeatLayout>,
    redo: Vec<SeatLayout>,
    history_limit: usize,
    long_press: Duration,
}

impl EditorSession {
    pub fn new(layout: SeatLayout, config: &EditorConfig) -> Self {
        Self {
            layout,
            selected: SeatType::Normal,
            gesture: DragGesture::new(),
            drag_snapshot: None,
            undo: VecDeque::new(),
            redo: Vec::new(),
            history_limit: config.history_limit,
            long_press: Duration::from_millis(config.long_press_ms),
        }
    }

    pub fn from_persisted(persisted: &PersistedLayout, config: &EditorConfig) -> Result<Self, LayoutError> {
        Ok(Self::new(reconcile::from_persisted(persisted)?, config))
    }

    pub fn layout(&self) -> &SeatLayout {
        &self.layout
    }

    pub fn stats(&self) -> SeatStats {
        self.layout.stats()
    }

    pub fn to_persisted(&self) -> PersistedLayout {
        reconcile::to_persisted(&self.layout)
    }

    pub fn selected(&self) -> SeatType {
        self.selected
    }

    pub fn select(&mut self, seat_type: SeatType) {
        self.selected = seat_type;
    }

    /// How long the surface waits after a press before calling [`Self::on_long_press`].
    pub fn long_press_threshold(&self) -> Duration {
        self.long_press
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Returns whether the layout changed.
    pub fn on_seat_click(&mut self, row: usize, col: usize) -> Result<bool, LayoutError> {
        if self.gesture.take_suppressed_click() {
            debug!(row, col, "click after drag ignored");
            return Ok(false);
        }
        let next = editor::toggle_seat_at_click(&self.layout, row, col, self.selected)?;
        Ok(self.commit(next))
    }

    pub fn on_seat_mouse_down(&mut self, row: usize, col: usize, button: PointerButton) {
        let mode = match (button, self.selected) {
            (PointerButton::Secondary, _) | (_, SeatType::Empty) => DragMode::Erase,
            (PointerButton::Primary, selected) => DragMode::Paint(selected),
        };
        self.gesture.press(row, col, mode);
    }

    /// Long-press timer fired: the press becomes a drag and paints its origin cell.
    pub fn on_long_press(&mut self) -> Result<bool, LayoutError> {
        let Some((row, col, mode)) = self.gesture.timer_fired() else {
            return Ok(false);
        };
        self.drag_snapshot = Some(self.layout.clone());
        debug!(row, col, ?mode, "drag started");
        self.drag_to(row, col, mode)
    }

    pub fn on_seat_mouse_enter(&mut self, row: usize, col: usize) -> Result<bool, LayoutError> {
        match self.gesture.enter() {
            Some(mode) => self.drag_to(row, col, mode),
            None => Ok(false),
        }
    }

    pub fn on_mouse_up(&mut self) -> Release {
        let release = self.gesture.release();
        if release == Release::DragEnded {
            self.finish_drag();
        }
        release
    }

    /// Pointer left the grid mid-gesture. Paint applied so far is kept.
    pub fn on_pointer_leave(&mut self) {
        if self.gesture.is_dragging() {
            self.finish_drag();
        }
        self.gesture.cancel();
    }

    /// Quick erase of a single cell.
    pub fn on_seat_right_click(&mut self, row: usize, col: usize) -> Result<bool, LayoutError> {
        let next = editor::drag_paint(&self.layout, row, col, DragMode::Erase)?;
        Ok(self.commit(next))
    }

    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<bool, LayoutError> {
        let next = editor::resize_grid(&self.layout, rows, cols)?;
        Ok(self.commit(next))
    }

    pub fn clear(&mut self) -> bool {
        let next = editor::clear_layout(&self.layout);
        self.commit(next)
    }

    pub fn apply(&mut self, command: &editor::EditCommand) -> Result<bool, LayoutError> {
        let next = editor::apply(&self.layout, command)?;
        Ok(self.commit(next))
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop_back() else { return false };
        let current = std::mem::replace(&mut self.layout, previous);
        self.redo.push(current);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else { return false };
        let current = std::mem::replace(&mut self.layout, next);
        self.push_undo(current);
        true
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        transfer::export_json(&self.layout)
    }

    /// Replaces the layout with an imported file. A malformed file leaves the
    /// session untouched.
    pub fn import_json(&mut self, text: &str) -> Result<bool, LayoutError> {
        let imported = transfer::import_json(text)?;
        info!(rows = imported.rows(), cols = imported.cols(), "layout replaced by import");
        Ok(self.commit(imported))
    }

    fn drag_to(&mut self, row: usize, col: usize, mode: DragMode) -> Result<bool, LayoutError> {
        let next = editor::drag_paint(&self.layout, row, col, mode)?;
        if next == self.layout {
            return Ok(false);
        }
        self.layout = next;
        Ok(true)
    }

    fn finish_drag(&mut self) {
        if let Some(before) = self.drag_snapshot.take() {
            if before != self.layout {
                self.push_undo(before);
                self.redo.clear();
            }
        }
    }

    fn commit(&mut self, next: SeatLayout) -> bool {
        if next == self.layout {
            return false;
        }
        let previous = std::mem::replace(&mut self.layout, next);
        self.push_undo(previous);
        self.redo.clear();
        true
    }

    fn push_undo(&mut self, layout: SeatLayout) {
        if self.history_limit == 0 {
            return;
        }
        if self.undo.len() == self.history_limit {
            self.undo.pop_front();
        }
        self.undo.push_back(layout);
    }
}
