use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::LayoutError;
use crate::models::seat::{
    couple_label, single_label, PairId, Seat, SeatCell, SeatType, Side, MAX_DIMENSION,
    MIN_DIMENSION,
};

/// Схема зала: матрица rows x cols, хранится плоским вектором `row * cols + col`.
///
/// Хранилище разделяется между копиями через `Arc` и клонируется только при
/// первой записи, поэтому история правок обходится дёшево.
#[derive(Debug, Clone)]
pub struct SeatLayout {
    rows: usize,
    cols: usize,
    seats: Arc<Vec<Seat>>,
    next_pair: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeatStats {
    pub normal: usize,
    pub vip: usize,
    /// Pairs, not halves.
    pub couple: usize,
    pub disabled: usize,
    pub blocked: usize,
    pub empty: usize,
    /// Purchasable units.
    pub total: usize,
}

pub fn check_dimensions(rows: usize, cols: usize) -> Result<(), LayoutError> {
    let range = MIN_DIMENSION..=MAX_DIMENSION;
    if range.contains(&rows) && range.contains(&cols) {
        Ok(())
    } else {
        Err(LayoutError::ResizeOutOfBounds { rows, cols })
    }
}

/// All cells `EMPTY`, no seat numbers.
pub fn create_empty_layout(rows: usize, cols: usize) -> Result<SeatLayout, LayoutError> {
    SeatLayout::empty(rows, cols)
}

pub fn get_seat_stats(layout: &SeatLayout) -> SeatStats {
    layout.stats()
}

impl SeatLayout {
    pub fn empty(rows: usize, cols: usize) -> Result<Self, LayoutError> {
        check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            seats: Arc::new(vec![Seat::Empty; rows * cols]),
            next_pair: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.index(row, col).is_some()
    }

    pub fn seat(&self, row: usize, col: usize) -> Option<Seat> {
        self.index(row, col).map(|i| self.seats[i])
    }

    pub(crate) fn require(&self, row: usize, col: usize) -> Result<Seat, LayoutError> {
        self.seat(row, col)
            .ok_or(LayoutError::CellOutOfBounds { row, col })
    }

    pub fn seat_type(&self, row: usize, col: usize) -> Option<SeatType> {
        self.seat(row, col).map(|s| s.seat_type())
    }

    /// Derived label; never stored.
    pub fn seat_number(&self, row: usize, col: usize) -> Option<String> {
        match self.seat(row, col)? {
            Seat::Empty => None,
            Seat::Single(_) => Some(single_label(row, col)),
            seat @ Seat::CoupleHalf { .. } => {
                let partner = seat.partner_col(col)?;
                Some(couple_label(row, col, partner))
            }
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<SeatCell> {
        let seat = self.seat(row, col)?;
        Some(SeatCell {
            row,
            col,
            seat_type: seat.seat_type(),
            seat_number: self.seat_number(row, col),
            is_couple_seat: seat.is_couple(),
            couple_with: seat.partner_col(col),
        })
    }

    /// Row-major cell views.
    pub fn cells(&self) -> impl Iterator<Item = SeatCell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).filter_map(move |col| self.cell(row, col)))
    }

    pub fn matrix(&self) -> Vec<Vec<SeatCell>> {
        (0..self.rows)
            .map(|row| (0..self.cols).filter_map(|col| self.cell(row, col)).collect())
            .collect()
    }

    pub fn stats(&self) -> SeatStats {
        let mut stats = SeatStats::default();
        let mut seen_pairs = HashSet::new();

        for row in 0..self.rows {
            for col in 0..self.cols {
                let Some(seat) = self.seat(row, col) else { continue };
                match seat.seat_type() {
                    SeatType::Empty => stats.empty += 1,
                    SeatType::Normal => stats.normal += 1,
                    SeatType::Vip => stats.vip += 1,
                    SeatType::Disabled => stats.disabled += 1,
                    SeatType::Blocked => stats.blocked += 1,
                    SeatType::Couple => {
                        // одна пара - одна единица, ключ по левой колонке
                        let partner = seat.partner_col(col).unwrap_or(col);
                        if seen_pairs.insert((row, col.min(partner))) {
                            stats.couple += 1;
                        }
                    }
                }
            }
        }

        stats.total = stats.normal + stats.vip + stats.couple + stats.disabled;
        stats
    }

    /// Verifies couple symmetry: every half has an in-row neighbour carrying the
    /// same pair id on the opposite side.
    pub fn check_invariants(&self) -> Result<(), LayoutError> {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let seat = self.require(row, col)?;
                match seat {
                    Seat::Empty => {}
                    Seat::Single(t) => {
                        if matches!(t, SeatType::Empty | SeatType::Couple) {
                            return Err(LayoutError::BrokenCouple { row, col });
                        }
                    }
                    Seat::CoupleHalf { pair, side } => {
                        let partner = seat
                            .partner_col(col)
                            .and_then(|c| self.seat(row, c));
                        match partner {
                            Some(Seat::CoupleHalf { pair: other, side: other_side })
                                if other == pair && other_side != side => {}
                            _ => return Err(LayoutError::BrokenCouple { row, col }),
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn is_blank(&self) -> bool {
        self.seats.iter().all(Seat::is_empty)
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, seat: Seat) -> Result<(), LayoutError> {
        let index = self
            .index(row, col)
            .ok_or(LayoutError::CellOutOfBounds { row, col })?;
        Arc::make_mut(&mut self.seats)[index] = seat;
        Ok(())
    }

    fn allocate_pair(&mut self) -> PairId {
        let id = PairId(self.next_pair);
        self.next_pair = self.next_pair.wrapping_add(1);
        id
    }

    /// Turns `(row, left)` and `(row, left + 1)` into the two halves of a fresh pair.
    /// Whatever the cells held before is overwritten.
    pub(crate) fn link_couple(&mut self, row: usize, left: usize) -> Result<(), LayoutError> {
        let right = left + 1;
        if !self.contains(row, right) {
            return Err(LayoutError::CellOutOfBounds { row, col: right });
        }
        let pair = self.allocate_pair();
        self.set(row, left, Seat::CoupleHalf { pair, side: Side::Left })?;
        self.set(row, right, Seat::CoupleHalf { pair, side: Side::Right })
    }

    /// Same dimensions, every cell `EMPTY`.
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            seats: Arc::new(vec![Seat::Empty; self.rows * self.cols]),
            next_pair: 0,
        }
    }
}

/// Equality is structural: same shape, same types and the same pairings.
/// Pair identifiers are not compared since they are allocated per session.
impl PartialEq for SeatLayout {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && (0..self.rows).all(|row| {
                (0..self.cols).all(|col| {
                    let (a, b) = (self.seat(row, col), other.seat(row, col));
                    a.map(|s| (s.seat_type(), s.partner_col(col)))
                        == b.map(|s| (s.seat_type(), s.partner_col(col)))
                })
            })
    }
}

impl Eq for SeatLayout {}
