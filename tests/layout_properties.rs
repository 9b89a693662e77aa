//! Property tests for seat layouts.
//!
//! Properties:
//! - any sequence of edits keeps every couple half linked to an adjacent
//!   sibling in the same row, with matching seat numbers
//! - a failed edit leaves the layout unchanged
//! - flatten then reconstruct restores any layout built by edits
//! - stats count each pair once
//! - resize accepts exactly the 1..=15 range

use proptest::prelude::*;

use cinema_seating::models::layout::{create_empty_layout, SeatLayout};
use cinema_seating::models::SeatType;
use cinema_seating::services::editor::{self, DragMode, EditCommand};
use cinema_seating::services::reconcile;

fn seat_type() -> impl Strategy<Value = SeatType> {
    prop_oneof![
        Just(SeatType::Empty),
        Just(SeatType::Normal),
        Just(SeatType::Vip),
        Just(SeatType::Couple),
        Just(SeatType::Disabled),
        Just(SeatType::Blocked),
    ]
}

fn single_type() -> impl Strategy<Value = SeatType> {
    seat_type().prop_filter("couples are not painted", |t| *t != SeatType::Couple)
}

fn drag_mode() -> impl Strategy<Value = DragMode> {
    prop_oneof![Just(DragMode::Erase), single_type().prop_map(DragMode::Paint)]
}

/// Coordinates may fall slightly outside the grid so rejections are exercised too.
fn command() -> impl Strategy<Value = EditCommand> {
    let coord = 0usize..9;
    prop_oneof![
        (coord.clone(), coord.clone(), single_type())
            .prop_map(|(row, col, seat_type)| EditCommand::Paint { row, col, seat_type }),
        (coord.clone(), coord.clone(), seat_type())
            .prop_map(|(row, col, selected)| EditCommand::Click { row, col, selected }),
        (coord.clone(), coord.clone(), coord.clone())
            .prop_map(|(row, col_a, col_b)| EditCommand::CreateCouple { row, col_a, col_b }),
        (coord.clone(), coord.clone()).prop_map(|(row, col)| EditCommand::BreakCouple { row, col }),
        (coord.clone(), coord.clone(), drag_mode())
            .prop_map(|(row, col, mode)| EditCommand::DragPaint { row, col, mode }),
        (1usize..9, 1usize..9).prop_map(|(rows, cols)| EditCommand::Resize { rows, cols }),
        Just(EditCommand::Clear),
    ]
}

fn assert_couples_consistent(layout: &SeatLayout) {
    layout.check_invariants().expect("couple invariant");
    for cell in layout.cells() {
        if let Some(partner) = cell.couple_with {
            assert_eq!(cell.seat_type, SeatType::Couple);
            assert_eq!(cell.col.abs_diff(partner), 1);
            let sibling = layout.cell(cell.row, partner).expect("partner in bounds");
            assert_eq!(sibling.couple_with, Some(cell.col));
            assert_eq!(sibling.seat_number, cell.seat_number);
        } else {
            assert_ne!(cell.seat_type, SeatType::Couple);
        }
    }
}

proptest! {
    #[test]
    fn edits_preserve_couple_symmetry(commands in proptest::collection::vec(command(), 1..40)) {
        let mut layout = create_empty_layout(6, 6).unwrap();
        for command in &commands {
            if let Ok(next) = editor::apply(&layout, command) {
                layout = next;
            }
            assert_couples_consistent(&layout);
        }
    }

    #[test]
    fn failed_edit_leaves_layout_unchanged(commands in proptest::collection::vec(command(), 1..20)) {
        let mut layout = create_empty_layout(4, 4).unwrap();
        for command in &commands {
            let before = layout.clone();
            match editor::apply(&layout, command) {
                Ok(next) => layout = next,
                Err(_) => prop_assert_eq!(&layout, &before),
            }
        }
    }

    #[test]
    fn persisted_round_trip_restores_layout(commands in proptest::collection::vec(command(), 1..30)) {
        let mut layout = create_empty_layout(5, 7).unwrap();
        for command in &commands {
            if let Ok(next) = editor::apply(&layout, command) {
                layout = next;
            }
        }

        let restored = reconcile::from_persisted(&reconcile::to_persisted(&layout)).unwrap();
        assert_couples_consistent(&restored);
        // пары всегда целые, поэтому жадная склейка даёт те же пары
        prop_assert_eq!(&restored, &layout);
        prop_assert_eq!(restored.stats(), layout.stats());
    }

    #[test]
    fn stats_count_pairs_once(row in 0usize..4, col in 0usize..5) {
        let layout = editor::create_couple(&create_empty_layout(4, 6).unwrap(), row, col, col + 1).unwrap();
        let stats = layout.stats();
        prop_assert_eq!(stats.couple, 1);
        prop_assert_eq!(stats.total, 1);
        prop_assert_eq!(stats.empty, 4 * 6 - 2);
    }

    #[test]
    fn resize_accepts_only_supported_sizes(rows in 0usize..20, cols in 0usize..20) {
        let layout = create_empty_layout(3, 3).unwrap();
        let result = editor::resize_grid(&layout, rows, cols);
        let valid = (1..=15).contains(&rows) && (1..=15).contains(&cols);
        prop_assert_eq!(result.is_ok(), valid);
        if let Ok(resized) = result {
            prop_assert_eq!((resized.rows(), resized.cols()), (rows, cols));
        }
    }
}
