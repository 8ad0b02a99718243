//! Two-region horizontal split with a draggable divider.
//!
//! The divider keeps the left region's share of the width inside
//! configured bounds no matter what the pointer does. Drag state lives on
//! the instance, and its lifetime is the instance's own; mouse capture is
//! the application's to enable and disable alongside the terminal itself.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::trace;

pub const DEFAULT_MIN_FRACTION: f64 = 0.20;
pub const DEFAULT_MAX_FRACTION: f64 = 0.80;
pub const DEFAULT_INITIAL_FRACTION: f64 = 0.35;

/// Keyboard nudge step, as a fraction of the width.
const NUDGE_STEP: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging,
}

#[derive(Debug, Clone)]
pub struct SplitPane {
    fraction: f64,
    min: f64,
    max: f64,
    drag: DragState,
}

impl Default for SplitPane {
    fn default() -> Self {
        Self::new(
            DEFAULT_INITIAL_FRACTION,
            DEFAULT_MIN_FRACTION,
            DEFAULT_MAX_FRACTION,
        )
    }
}

impl SplitPane {
    /// Bounds are reordered if reversed and the initial fraction is
    /// clamped into them, so the invariant holds from the first render.
    pub fn new(initial: f64, min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            fraction: initial.clamp(min, max),
            min,
            max,
            drag: DragState::Idle,
        }
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    pub fn set_fraction(&mut self, fraction: f64) {
        self.fraction = fraction.clamp(self.min, self.max);
    }

    /// Keyboard resize: `<` and `>` move the divider one step.
    pub fn nudge(&mut self, steps: i32) {
        self.set_fraction(self.fraction + f64::from(steps) * NUDGE_STEP);
    }

    /// Carve `area` into (left, divider, right). The divider is one column
    /// wide; the regions' contents are the caller's business.
    pub fn split(&self, area: Rect) -> (Rect, Rect, Rect) {
        if area.width < 3 {
            let empty = Rect::new(area.x, area.y, 0, area.height);
            return (empty, area, empty);
        }
        let usable = area.width - 1;
        let left_width = ((f64::from(usable) * self.fraction).round() as u16).clamp(1, usable - 1);

        let left = Rect::new(area.x, area.y, left_width, area.height);
        let divider = Rect::new(area.x + left_width, area.y, 1, area.height);
        let right = Rect::new(
            area.x + left_width + 1,
            area.y,
            usable - left_width,
            area.height,
        );
        (left, divider, right)
    }

    /// Route one mouse event. Press on the divider starts a drag; every
    /// move while dragging recomputes the fraction from the pointer
    /// column; release anywhere ends the drag. Returns true when the event
    /// was consumed.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent, area: Rect) -> bool {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let (_, divider, _) = self.split(area);
                if point_in_rect(divider, mouse.column, mouse.row) {
                    self.drag = DragState::Dragging;
                    return true;
                }
                false
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.drag != DragState::Dragging {
                    return false;
                }
                self.drag_to(area, mouse.column);
                true
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag == DragState::Dragging {
                    self.drag = DragState::Idle;
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    fn drag_to(&mut self, area: Rect, column: u16) {
        if area.width == 0 {
            return;
        }
        let offset = column.saturating_sub(area.x);
        let raw = f64::from(offset) / f64::from(area.width);
        self.set_fraction(raw);
        trace!(fraction = self.fraction, "divider dragged");
    }
}

/// Returns true if the point `(x, y)` is inside the rectangle.
pub const fn point_in_rect(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x
        && x < area.x.saturating_add(area.width)
        && y >= area.y
        && y < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_initial_fraction_clamped_into_bounds() {
        let pane = SplitPane::new(0.05, 0.20, 0.80);
        assert_eq!(pane.fraction(), 0.20);
        let pane = SplitPane::new(0.95, 0.20, 0.80);
        assert_eq!(pane.fraction(), 0.80);
        let pane = SplitPane::default();
        assert_eq!(pane.fraction(), 0.35);
    }

    #[test]
    fn test_drag_to_left_edge_clamps_to_min() {
        let area = Rect::new(0, 0, 1000, 30);
        let mut pane = SplitPane::default();
        let (_, divider, _) = pane.split(area);

        assert!(pane.handle_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), divider.x, 5),
            area
        ));
        assert!(pane.is_dragging());

        pane.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 0, 5), area);
        assert_eq!(pane.fraction(), 0.20);

        pane.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 999, 5), area);
        assert_eq!(pane.fraction(), 0.80);
    }

    #[test]
    fn test_release_anywhere_ends_drag() {
        let area = Rect::new(0, 0, 80, 24);
        let mut pane = SplitPane::default();
        let (_, divider, _) = pane.split(area);
        pane.handle_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), divider.x, 3),
            area,
        );
        assert!(pane.is_dragging());

        // Release far from the divider still ends the drag.
        pane.handle_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 70, 20), area);
        assert!(!pane.is_dragging());

        // Moves after release are ignored.
        let before = pane.fraction();
        pane.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 10, 5), area);
        assert_eq!(pane.fraction(), before);
    }

    #[test]
    fn test_press_off_divider_does_not_drag() {
        let area = Rect::new(0, 0, 80, 24);
        let mut pane = SplitPane::default();
        assert!(!pane.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 2), area));
        assert!(!pane.is_dragging());
    }

    #[test]
    fn test_split_regions_partition_area() {
        let area = Rect::new(5, 2, 91, 30);
        let pane = SplitPane::default();
        let (left, divider, right) = pane.split(area);

        assert_eq!(left.x, area.x);
        assert_eq!(divider.width, 1);
        assert_eq!(divider.x, left.x + left.width);
        assert_eq!(right.x, divider.x + 1);
        assert_eq!(left.width + divider.width + right.width, area.width);
    }

    #[test]
    fn test_nudge_respects_bounds() {
        let mut pane = SplitPane::default();
        for _ in 0..100 {
            pane.nudge(1);
        }
        assert_eq!(pane.fraction(), 0.80);
        for _ in 0..100 {
            pane.nudge(-1);
        }
        assert_eq!(pane.fraction(), 0.20);
    }
}
