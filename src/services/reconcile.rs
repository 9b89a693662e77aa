//! reconcile.rs
//!
//! Перевод схемы зала между памятью и плоским форматом бэкенда
//! `{row: "A", col: 1, type: "VIP"}[]`.
//!
//! В плоском формате нет поля пары: при загрузке пары восстанавливаются по
//! соседству - две соседние ячейки `COUPLE` в одном ряду сливаются в одно
//! парное место, слева направо.

use tracing::{debug, warn};

use crate::error::LayoutError;
use crate::models::layout::SeatLayout;
use crate::models::room::PersistedLayout;
use crate::models::seat::{row_letter, FlatSeat, Seat, SeatType, MAX_DIMENSION, MIN_DIMENSION};

/// Row-major list of every non-empty cell. Empty cells are simply absent.
pub fn flatten(layout: &SeatLayout) -> Vec<FlatSeat> {
    let mut seats = Vec::new();
    for row in 0..layout.rows() {
        for col in 0..layout.cols() {
            match layout.seat_type(row, col) {
                None | Some(SeatType::Empty) => {}
                Some(seat_type) => seats.push(FlatSeat::new(row_letter(row), col + 1, seat_type)),
            }
        }
    }
    seats
}

pub fn to_persisted(layout: &SeatLayout) -> PersistedLayout {
    PersistedLayout {
        rows: layout.rows(),
        cols: layout.cols(),
        seats: flatten(layout),
    }
}

/// Rebuilds a grid sized to fit the furthest seat. An empty list yields a 1x1 grid.
pub fn reconstruct(seats: &[FlatSeat]) -> Result<SeatLayout, LayoutError> {
    reconstruct_sized(MIN_DIMENSION, MIN_DIMENSION, seats)
}

/// Same as [`reconstruct`], with `rows`/`cols` as the lower bound of the grid size.
pub fn reconstruct_sized(rows: usize, cols: usize, seats: &[FlatSeat]) -> Result<SeatLayout, LayoutError> {
    // 1. Границы
    let mut positions = Vec::with_capacity(seats.len());
    let (mut max_rows, mut max_cols) = (rows.max(MIN_DIMENSION), cols.max(MIN_DIMENSION));
    for seat in seats {
        let (row, col) = seat
            .position()
            .filter(|&(r, c)| r < MAX_DIMENSION && c < MAX_DIMENSION)
            .ok_or(LayoutError::InvalidFlatSeat { row: seat.row, col: seat.col })?;
        max_rows = max_rows.max(row + 1);
        max_cols = max_cols.max(col + 1);
        positions.push((row, col, seat.seat_type));
    }

    let mut layout = SeatLayout::empty(max_rows, max_cols)?;
    let cols = layout.cols();

    // 2. Расстановка по типам, повторная запись в ту же ячейку побеждает
    let mut types = vec![SeatType::Empty; layout.rows() * cols];
    for (row, col, seat_type) in positions {
        types[row * cols + col] = seat_type;
    }

    // 3. Восстановление пар
    let mut paired = 0usize;
    for (row, line) in types.chunks(cols).enumerate() {
        let mut col = 0;
        while col < cols {
            match line[col] {
                SeatType::Couple if line.get(col + 1) == Some(&SeatType::Couple) => {
                    layout.link_couple(row, col)?;
                    paired += 1;
                    col += 2;
                    continue;
                }
                SeatType::Couple => {
                    warn!(
                        seat = %format!("{}{}", row_letter(row), col + 1),
                        "couple seat without a partner, stored as NORMAL"
                    );
                    layout.set(row, col, Seat::Single(SeatType::Normal))?;
                }
                other => layout.set(row, col, Seat::plain(other)?)?,
            }
            col += 1;
        }
    }

    debug!(
        rows = layout.rows(),
        cols = layout.cols(),
        seats = seats.len(),
        couples = paired,
        "layout reconstructed"
    );
    Ok(layout)
}

/// Stored dimensions are authoritative here: a seat outside `rows x cols` is
/// rejected rather than growing the grid.
pub fn from_persisted(persisted: &PersistedLayout) -> Result<SeatLayout, LayoutError> {
    let outside = persisted.seats.iter().find(|seat| {
        !matches!(seat.position(), Some((r, c)) if r < persisted.rows && c < persisted.cols)
    });
    if let Some(seat) = outside {
        return Err(LayoutError::InvalidFlatSeat { row: seat.row, col: seat.col });
    }
    reconstruct_sized(persisted.rows, persisted.cols, &persisted.seats)
}

/// Reconstruct then flatten: what the service stores is always a list whose
/// couples pair up unambiguously.
pub fn normalize(persisted: &PersistedLayout) -> Result<PersistedLayout, LayoutError> {
    from_persisted(persisted).map(|layout| to_persisted(&layout))
}
