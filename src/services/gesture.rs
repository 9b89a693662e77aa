//! Press / long-press / drag disambiguation for the seat grid.
//!
//! The machine does not own a clock. The rendering surface starts a timer on
//! press (see `EditorConfig::long_press_ms`) and reports it back through
//! [`DragGesture::timer_fired`], so every transition is a plain method call.

use crate::services::editor::DragMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    PressPending {
        row: usize,
        col: usize,
        mode: DragMode,
    },
    Dragging {
        mode: DragMode,
    },
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Short press: the following click should be handled.
    Click { row: usize, col: usize },
    /// A drag ended: the click the surface fires next must be swallowed.
    DragEnded,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    state: GestureState,
    suppress_click: bool,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    pub fn press(&mut self, row: usize, col: usize, mode: DragMode) {
        self.state = GestureState::PressPending { row, col, mode };
        self.suppress_click = false;
    }

    /// Long-press threshold reached. Returns the origin cell and mode to paint
    /// when this switches the gesture into dragging.
    pub fn timer_fired(&mut self) -> Option<(usize, usize, DragMode)> {
        match self.state {
            GestureState::PressPending { row, col, mode } => {
                self.state = GestureState::Dragging { mode };
                Some((row, col, mode))
            }
            _ => None,
        }
    }

    /// Pointer entered a cell. Only a running drag reacts.
    pub fn enter(&mut self) -> Option<DragMode> {
        match self.state {
            GestureState::Dragging { mode } => Some(mode),
            _ => None,
        }
    }

    pub fn release(&mut self) -> Release {
        let released = match self.state {
            GestureState::Idle => Release::Ignored,
            GestureState::PressPending { row, col, .. } => Release::Click { row, col },
            GestureState::Dragging { .. } => {
                self.suppress_click = true;
                Release::DragEnded
            }
        };
        self.state = GestureState::Idle;
        released
    }

    /// Pointer left the grid or the surface lost focus.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Consumes the "swallow next click" flag set by a finished drag.
    pub fn take_suppressed_click(&mut self) -> bool {
        std::mem::take(&mut self.suppress_click)
    }
}
