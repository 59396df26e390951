//! Clipboard list hit-testing and terminal mouse translation.
//!
//! The gesture thresholds are in pixels; a terminal reports cell coordinates, so
//! [`ListGeometry`] carries a nominal cell size used to convert between the two.

use super::clipboard::ClipboardEntry;
use super::gesture::{GestureEvent, Point, PointerId};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

/// Layout of the rendered clipboard list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListGeometry {
    /// Screen area holding the rows, in cells.
    pub area: Rect,
    /// Height of one entry in cells (at least 1).
    pub row_height: u16,
    /// Pixel width of one terminal cell.
    pub cell_width_px: f32,
    /// Pixel height of one terminal cell.
    pub cell_height_px: f32,
}

impl ListGeometry {
    /// Rows of `row_height` cells starting at the top of `area`.
    pub fn new(area: Rect, row_height: u16) -> Self {
        Self {
            area,
            row_height: row_height.max(1),
            cell_width_px: 8.0,
            cell_height_px: 16.0,
        }
    }

    /// Override the pixel size of a cell.
    pub fn with_cell_size(mut self, width_px: f32, height_px: f32) -> Self {
        self.cell_width_px = width_px;
        self.cell_height_px = height_px;
        self
    }

    /// List position of the row at cell (`column`, `row`), if it is inside the area
    /// and below `len`.
    pub fn index_at(&self, column: u16, row: u16, len: usize) -> Option<usize> {
        let area = self.area;
        if column < area.x
            || column >= area.x.saturating_add(area.width)
            || row < area.y
            || row >= area.y.saturating_add(area.height)
        {
            return None;
        }
        let index = usize::from((row - area.y) / self.row_height);
        (index < len).then_some(index)
    }

    /// List position under a pixel coordinate.
    pub fn index_at_point(&self, at: Point, len: usize) -> Option<usize> {
        if at.x < 0.0 || at.y < 0.0 {
            return None;
        }
        let column = (at.x / self.cell_width_px).floor() as u16;
        let row = (at.y / self.cell_height_px).floor() as u16;
        self.index_at(column, row, len)
    }

    /// Centre of the cell (`column`, `row`) in pixels.
    pub fn to_point(&self, column: u16, row: u16) -> Point {
        Point::new(
            (f32::from(column) + 0.5) * self.cell_width_px,
            (f32::from(row) + 0.5) * self.cell_height_px,
        )
    }
}

/// Translate a left-button terminal mouse event into a pointer event.
///
/// `Down` on a row starts a gesture for that row's entry; `Drag` and `Up` continue
/// it. The drop index on `Up` is the row under the cursor. Other buttons, scrolling
/// and presses outside the list yield `None`.
pub fn pointer_from_mouse(
    event: &MouseEvent,
    pointer: PointerId,
    geometry: &ListGeometry,
    entries: &[ClipboardEntry],
) -> Option<GestureEvent> {
    let at = geometry.to_point(event.column, event.row);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let index = geometry.index_at(event.column, event.row, entries.len())?;
            Some(GestureEvent::PointerDown {
                pointer,
                entry: entries[index].id().clone(),
                at,
            })
        }
        MouseEventKind::Drag(MouseButton::Left) => Some(GestureEvent::PointerMove { pointer, at }),
        MouseEventKind::Up(MouseButton::Left) => Some(GestureEvent::PointerUp {
            pointer,
            at,
            drop_index: geometry.index_at(event.column, event.row, entries.len()),
        }),
        _ => None,
    }
}
