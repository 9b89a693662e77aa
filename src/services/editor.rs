//! editor.rs
//!
//! Операции редактора схемы зала. Каждая операция получает текущую схему и
//! возвращает новую; исходная схема не меняется, а при ошибке вызывающий
//! продолжает работать со старой версией.
//!
//! Парные места создаются и удаляются только целиком: любая операция,
//! задевающая половину пары, сначала разбивает пару.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LayoutError;
use crate::models::layout::{check_dimensions, SeatLayout};
use crate::models::seat::{Seat, SeatType};

/// Что делает протягивание курсора с зажатой кнопкой.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragMode {
    Paint(SeatType),
    Erase,
}

/// Одна правка схемы в том виде, в котором её присылает клиент.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditCommand {
    Paint {
        row: usize,
        col: usize,
        #[serde(rename = "type")]
        seat_type: SeatType,
    },
    Click {
        row: usize,
        col: usize,
        selected: SeatType,
    },
    CreateCouple {
        row: usize,
        col_a: usize,
        col_b: usize,
    },
    BreakCouple {
        row: usize,
        col: usize,
    },
    DragPaint {
        row: usize,
        col: usize,
        mode: DragMode,
    },
    Resize {
        rows: usize,
        cols: usize,
    },
    Clear,
}

pub fn apply(layout: &SeatLayout, command: &EditCommand) -> Result<SeatLayout, LayoutError> {
    match *command {
        EditCommand::Paint { row, col, seat_type } => paint_seat(layout, row, col, seat_type),
        EditCommand::Click { row, col, selected } => toggle_seat_at_click(layout, row, col, selected),
        EditCommand::CreateCouple { row, col_a, col_b } => create_couple(layout, row, col_a, col_b),
        EditCommand::BreakCouple { row, col } => break_couple(layout, row, col),
        EditCommand::DragPaint { row, col, mode } => drag_paint(layout, row, col, mode),
        EditCommand::Resize { rows, cols } => resize_grid(layout, rows, cols),
        EditCommand::Clear => Ok(clear_layout(layout)),
    }
}

/// Sets a cell to a single-seat type (or `EMPTY`). A couple half is broken
/// first so its sibling never dangles.
pub fn paint_seat(
    layout: &SeatLayout,
    row: usize,
    col: usize,
    seat_type: SeatType,
) -> Result<SeatLayout, LayoutError> {
    if seat_type == SeatType::Couple {
        return Err(LayoutError::CoupleNotPaintable);
    }
    let current = layout.require(row, col)?;

    let mut next = if current.is_couple() {
        break_couple(layout, row, col)?
    } else {
        layout.clone()
    };
    next.set(row, col, Seat::plain(seat_type)?)?;
    Ok(next)
}

/// Empties a couple half together with its sibling. On any other cell it
/// only empties that cell, so repeating it is harmless.
pub fn break_couple(layout: &SeatLayout, row: usize, col: usize) -> Result<SeatLayout, LayoutError> {
    let current = layout.require(row, col)?;
    let mut next = layout.clone();
    next.set(row, col, Seat::Empty)?;

    if let Some(partner) = current.partner_col(col) {
        if layout.seat(row, partner).is_some_and(|s| s.is_couple()) {
            next.set(row, partner, Seat::Empty)?;
        }
        debug!(row, col, partner, "couple broken");
    }
    Ok(next)
}

pub fn create_couple(
    layout: &SeatLayout,
    row: usize,
    col_a: usize,
    col_b: usize,
) -> Result<SeatLayout, LayoutError> {
    let first = layout.require(row, col_a)?;
    let second = layout.require(row, col_b)?;

    if col_a.abs_diff(col_b) != 1 {
        return Err(LayoutError::CoupleNotAdjacent);
    }
    if !first.is_empty() || !second.is_empty() {
        return Err(LayoutError::CoupleSeatsOccupied);
    }

    let mut next = layout.clone();
    next.link_couple(row, col_a.min(col_b))?;
    debug!(row, col_a, col_b, "couple created");
    Ok(next)
}

/// Обработка клика по ячейке с выбранным в палитре типом.
pub fn toggle_seat_at_click(
    layout: &SeatLayout,
    row: usize,
    col: usize,
    selected: SeatType,
) -> Result<SeatLayout, LayoutError> {
    let current = layout.require(row, col)?;

    match (current, selected) {
        (Seat::CoupleHalf { .. }, _) => break_couple(layout, row, col),
        (Seat::Empty, SeatType::Couple) => pair_with_neighbour(layout, row, col),
        (Seat::Empty, SeatType::Empty) => Ok(layout.clone()),
        // пара требует двух пустых ячеек, занятое место её не получит
        (_, SeatType::Couple) => Err(LayoutError::CoupleSeatsOccupied),
        (_, seat_type) => paint_seat(layout, row, col, seat_type),
    }
}

/// Left neighbour first, then right.
fn pair_with_neighbour(layout: &SeatLayout, row: usize, col: usize) -> Result<SeatLayout, LayoutError> {
    let is_free = |c: usize| layout.seat(row, c) == Some(Seat::Empty);

    if let Some(left) = col.checked_sub(1).filter(|&c| is_free(c)) {
        return create_couple(layout, row, left, col);
    }
    if is_free(col + 1) {
        return create_couple(layout, row, col, col + 1);
    }
    Err(LayoutError::NoCouplePartner)
}

/// Applies a drag gesture to the cell the pointer just entered.
///
/// Paint mode never creates couples and leaves existing pairs alone; erase
/// mode breaks a pair it passes over.
pub fn drag_paint(
    layout: &SeatLayout,
    row: usize,
    col: usize,
    mode: DragMode,
) -> Result<SeatLayout, LayoutError> {
    let current = layout.require(row, col)?;

    match mode {
        DragMode::Erase if current.is_empty() => Ok(layout.clone()),
        DragMode::Erase => break_couple(layout, row, col),
        DragMode::Paint(SeatType::Couple) => Ok(layout.clone()),
        DragMode::Paint(_) if current.is_couple() => Ok(layout.clone()),
        DragMode::Paint(seat_type) if current.seat_type() == seat_type => Ok(layout.clone()),
        DragMode::Paint(seat_type) => paint_seat(layout, row, col, seat_type),
    }
}

/// Builds a grid of the new size and copies the overlapping top-left
/// rectangle. A pair cut by the new column bound is dropped as a whole.
pub fn resize_grid(layout: &SeatLayout, rows: usize, cols: usize) -> Result<SeatLayout, LayoutError> {
    check_dimensions(rows, cols)?;

    let mut next = SeatLayout::empty(rows, cols)?;
    let copy_rows = rows.min(layout.rows());
    let copy_cols = cols.min(layout.cols());

    for row in 0..copy_rows {
        for col in 0..copy_cols {
            let Some(seat) = layout.seat(row, col) else { continue };
            match seat {
                Seat::Empty => {}
                Seat::Single(_) => next.set(row, col, seat)?,
                Seat::CoupleHalf { .. } => match seat.partner_col(col) {
                    // пару переносим один раз, по левой половине
                    Some(partner) if partner == col + 1 && partner < copy_cols => {
                        next.link_couple(row, col)?;
                    }
                    Some(partner) if partner >= copy_cols => {
                        debug!(row, col, partner, "couple split by resize, dropped");
                    }
                    _ => {}
                },
            }
        }
    }

    debug!(
        from_rows = layout.rows(),
        from_cols = layout.cols(),
        rows,
        cols,
        "layout resized"
    );
    Ok(next)
}

pub fn clear_layout(layout: &SeatLayout) -> SeatLayout {
    layout.blank_like()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::layout::create_empty_layout;

    fn grid(rows: usize, cols: usize) -> SeatLayout {
        create_empty_layout(rows, cols).unwrap()
    }

    #[test]
    fn create_couple_links_both_cells() {
        let layout = create_couple(&grid(2, 3), 0, 0, 1).unwrap();

        let left = layout.cell(0, 0).unwrap();
        let right = layout.cell(0, 1).unwrap();
        assert_eq!(left.seat_type, SeatType::Couple);
        assert_eq!(right.seat_type, SeatType::Couple);
        assert_eq!(left.seat_number.as_deref(), Some("A1-2"));
        assert_eq!(right.seat_number.as_deref(), Some("A1-2"));
        assert_eq!(left.couple_with, Some(1));
        assert_eq!(right.couple_with, Some(0));
        assert_eq!(layout.seat_type(0, 2), Some(SeatType::Empty));
    }

    #[test]
    fn create_couple_rejects_gap_and_occupied_cells() {
        let layout = grid(1, 4);
        assert_eq!(create_couple(&layout, 0, 0, 2), Err(LayoutError::CoupleNotAdjacent));

        let painted = paint_seat(&layout, 0, 1, SeatType::Vip).unwrap();
        assert_eq!(
            create_couple(&painted, 0, 0, 1),
            Err(LayoutError::CoupleSeatsOccupied)
        );
        assert_eq!(painted.seat_type(0, 1), Some(SeatType::Vip));
    }

    #[test]
    fn create_couple_accepts_reversed_columns() {
        let layout = create_couple(&grid(1, 3), 0, 2, 1).unwrap();
        assert_eq!(layout.seat_number(0, 1).as_deref(), Some("A2-3"));
        assert!(layout.check_invariants().is_ok());
    }

    #[test]
    fn create_couple_out_of_bounds() {
        assert_eq!(
            create_couple(&grid(1, 2), 0, 1, 2),
            Err(LayoutError::CellOutOfBounds { row: 0, col: 2 })
        );
    }

    #[test]
    fn painting_a_couple_half_breaks_the_pair() {
        let layout = create_couple(&grid(1, 3), 0, 0, 1).unwrap();
        let painted = paint_seat(&layout, 0, 1, SeatType::Normal).unwrap();

        assert_eq!(painted.seat_type(0, 0), Some(SeatType::Empty));
        assert_eq!(painted.seat_type(0, 1), Some(SeatType::Normal));
        assert_eq!(painted.seat_number(0, 1).as_deref(), Some("A2"));
        assert!(painted.check_invariants().is_ok());
    }

    #[test]
    fn paint_refuses_couple_type() {
        assert_eq!(
            paint_seat(&grid(1, 2), 0, 0, SeatType::Couple),
            Err(LayoutError::CoupleNotPaintable)
        );
    }

    #[test]
    fn paint_empty_removes_seat_number() {
        let layout = paint_seat(&grid(1, 1), 0, 0, SeatType::Blocked).unwrap();
        assert_eq!(layout.seat_number(0, 0).as_deref(), Some("A1"));
        let cleared = paint_seat(&layout, 0, 0, SeatType::Empty).unwrap();
        assert_eq!(cleared.seat_number(0, 0), None);
    }

    #[test]
    fn break_couple_is_idempotent() {
        let paired = create_couple(&grid(1, 2), 0, 0, 1).unwrap();
        let once = break_couple(&paired, 0, 0).unwrap();
        let twice = break_couple(&once, 0, 0).unwrap();

        assert!(once.is_blank());
        assert_eq!(once, twice);
        assert_eq!(break_couple(&grid(1, 2), 0, 1).unwrap(), grid(1, 2));
    }

    #[test]
    fn click_pairs_with_left_neighbour_first() {
        let layout = toggle_seat_at_click(&grid(1, 3), 0, 1, SeatType::Couple).unwrap();
        assert_eq!(layout.seat_type(0, 0), Some(SeatType::Couple));
        assert_eq!(layout.seat_type(0, 1), Some(SeatType::Couple));
        assert_eq!(layout.seat_type(0, 2), Some(SeatType::Empty));
    }

    #[test]
    fn click_falls_back_to_right_neighbour() {
        let layout = paint_seat(&grid(1, 3), 0, 0, SeatType::Normal).unwrap();
        let layout = toggle_seat_at_click(&layout, 0, 1, SeatType::Couple).unwrap();
        assert_eq!(layout.cell(0, 1).unwrap().couple_with, Some(2));
        assert_eq!(layout.seat_type(0, 0), Some(SeatType::Normal));
    }

    #[test]
    fn click_without_free_neighbour_is_rejected() {
        let layout = paint_seat(&grid(1, 2), 0, 1, SeatType::Vip).unwrap();
        assert_eq!(
            toggle_seat_at_click(&layout, 0, 0, SeatType::Couple),
            Err(LayoutError::NoCouplePartner)
        );
        assert_eq!(
            toggle_seat_at_click(&grid(1, 1), 0, 0, SeatType::Couple),
            Err(LayoutError::NoCouplePartner)
        );
    }

    #[test]
    fn click_decision_table() {
        let empty = grid(1, 2);
        assert_eq!(toggle_seat_at_click(&empty, 0, 0, SeatType::Empty).unwrap(), empty);

        let vip = toggle_seat_at_click(&empty, 0, 0, SeatType::Vip).unwrap();
        assert_eq!(vip.seat_type(0, 0), Some(SeatType::Vip));

        let normal = toggle_seat_at_click(&vip, 0, 0, SeatType::Normal).unwrap();
        assert_eq!(normal.seat_type(0, 0), Some(SeatType::Normal));

        let erased = toggle_seat_at_click(&normal, 0, 0, SeatType::Empty).unwrap();
        assert!(erased.is_blank());

        let paired = create_couple(&empty, 0, 0, 1).unwrap();
        let broken = toggle_seat_at_click(&paired, 0, 1, SeatType::Vip).unwrap();
        assert!(broken.is_blank());
    }

    #[test]
    fn drag_paint_skips_couples() {
        let paired = create_couple(&grid(1, 3), 0, 0, 1).unwrap();

        let painted = drag_paint(&paired, 0, 0, DragMode::Paint(SeatType::Vip)).unwrap();
        assert_eq!(painted, paired);

        let untouched = drag_paint(&paired, 0, 2, DragMode::Paint(SeatType::Couple)).unwrap();
        assert_eq!(untouched.seat_type(0, 2), Some(SeatType::Empty));

        let painted = drag_paint(&paired, 0, 2, DragMode::Paint(SeatType::Disabled)).unwrap();
        assert_eq!(painted.seat_type(0, 2), Some(SeatType::Disabled));
    }

    #[test]
    fn drag_erase_breaks_couples() {
        let paired = create_couple(&grid(1, 3), 0, 1, 2).unwrap();
        let erased = drag_paint(&paired, 0, 2, DragMode::Erase).unwrap();
        assert!(erased.is_blank());
    }

    #[test]
    fn resize_bounds() {
        let layout = grid(5, 5);
        assert!(resize_grid(&layout, 0, 5).is_err());
        assert!(resize_grid(&layout, 16, 10).is_err());
        assert!(resize_grid(&layout, 15, 15).is_ok());
    }

    #[test]
    fn resize_keeps_overlap() {
        let layout = paint_seat(&grid(3, 3), 2, 2, SeatType::Vip).unwrap();
        let layout = paint_seat(&layout, 0, 1, SeatType::Normal).unwrap();
        let layout = create_couple(&layout, 1, 0, 1).unwrap();

        let grown = resize_grid(&layout, 4, 5).unwrap();
        assert_eq!(grown.seat_type(2, 2), Some(SeatType::Vip));
        assert_eq!(grown.seat_number(1, 1).as_deref(), Some("B1-2"));
        assert_eq!(grown.seat_type(3, 4), Some(SeatType::Empty));

        let shrunk = resize_grid(&layout, 2, 2).unwrap();
        assert_eq!(shrunk.seat_type(0, 1), Some(SeatType::Normal));
        assert!(shrunk.cell(1, 0).unwrap().is_couple_seat);
    }

    #[test]
    fn resize_drops_split_couple() {
        let layout = create_couple(&grid(1, 4), 0, 1, 2).unwrap();
        let shrunk = resize_grid(&layout, 1, 2).unwrap();
        assert!(shrunk.is_blank());
        assert!(shrunk.check_invariants().is_ok());
    }

    #[test]
    fn clear_keeps_dimensions() {
        let layout = paint_seat(&grid(4, 6), 3, 5, SeatType::Normal).unwrap();
        let cleared = clear_layout(&layout);
        assert_eq!((cleared.rows(), cleared.cols()), (4, 6));
        assert!(cleared.is_blank());
    }

    #[test]
    fn failed_operation_leaves_input_untouched() {
        let layout = paint_seat(&grid(1, 2), 0, 0, SeatType::Vip).unwrap();
        let before = layout.clone();
        assert!(create_couple(&layout, 0, 0, 1).is_err());
        assert!(resize_grid(&layout, 20, 1).is_err());
        assert_eq!(layout, before);
    }

    #[test]
    fn commands_deserialize_from_client_json() {
        let command: EditCommand = serde_json::from_value(serde_json::json!({
            "op": "createCouple", "row": 0, "colA": 1, "colB": 2
        }))
        .unwrap();
        assert_eq!(command, EditCommand::CreateCouple { row: 0, col_a: 1, col_b: 2 });

        let command: EditCommand = serde_json::from_value(serde_json::json!({
            "op": "dragPaint", "row": 0, "col": 0, "mode": {"paint": "VIP"}
        }))
        .unwrap();
        assert_eq!(
            command,
            EditCommand::DragPaint { row: 0, col: 0, mode: DragMode::Paint(SeatType::Vip) }
        );

        let command: EditCommand =
            serde_json::from_value(serde_json::json!({"op": "paint", "row": 0, "col": 0, "type": "BLOCKED"}))
                .unwrap();
        let layout = apply(&grid(1, 1), &command).unwrap();
        assert_eq!(layout.seat_type(0, 0), Some(SeatType::Blocked));
    }
}
