use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Максимальное число рядов и мест в ряду у зала.
pub const MAX_DIMENSION: usize = 15;
pub const MIN_DIMENSION: usize = 1;

/// Категория ячейки схемы зала.
///
/// `Empty` - структурная дыра (проход), `Blocked` - препятствие в форме кресла
/// (колонна). Оба не продаются.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatType {
    Empty,
    Normal,
    Vip,
    Couple,
    Disabled,
    Blocked,
}

impl SeatType {
    pub fn is_purchasable(self) -> bool {
        matches!(self, Self::Normal | Self::Vip | Self::Couple | Self::Disabled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::Normal => "NORMAL",
            Self::Vip => "VIP",
            Self::Couple => "COUPLE",
            Self::Disabled => "DISABLED",
            Self::Blocked => "BLOCKED",
        }
    }
}

impl std::fmt::Display for SeatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier shared by the two halves of a couple seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One grid position as it lives in memory.
///
/// Pairing is explicit here; adjacency inference only happens when
/// reading the flat wire format. Inside the crate seats are built with
/// [`Seat::plain`] and `SeatLayout::link_couple`; a layout assembled any
/// other way is validated by `SeatLayout::check_invariants`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seat {
    #[default]
    Empty,
    /// Never carries `Empty` or `Couple`.
    Single(SeatType),
    CoupleHalf { pair: PairId, side: Side },
}

impl Seat {
    /// Seat for a non-couple type, `Empty` stays a hole. Couple halves are
    /// only ever created in pairs, so `Couple` is refused.
    pub fn plain(seat_type: SeatType) -> Result<Seat, LayoutError> {
        match seat_type {
            SeatType::Empty => Ok(Seat::Empty),
            SeatType::Couple => Err(LayoutError::CoupleNotPaintable),
            other => Ok(Seat::Single(other)),
        }
    }

    pub fn seat_type(&self) -> SeatType {
        match self {
            Seat::Empty => SeatType::Empty,
            Seat::Single(t) => *t,
            Seat::CoupleHalf { .. } => SeatType::Couple,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Seat::Empty)
    }

    pub fn is_couple(&self) -> bool {
        matches!(self, Seat::CoupleHalf { .. })
    }

    /// Column of the sibling half, if this is a couple half sitting at `col`.
    pub fn partner_col(&self, col: usize) -> Option<usize> {
        match self {
            Seat::CoupleHalf { side: Side::Left, .. } => Some(col + 1),
            Seat::CoupleHalf { side: Side::Right, .. } => col.checked_sub(1),
            _ => None,
        }
    }
}

/// Rendering view of a cell: the `{row, col, type, seatNumber, isCoupleSeat, coupleWith}`
/// shape used by the export document and the grid endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatCell {
    pub row: usize,
    pub col: usize,
    #[serde(rename = "type")]
    pub seat_type: SeatType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_couple_seat: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couple_with: Option<usize>,
}

/// Backend record: one per non-empty seat, letter row and 1-based column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatSeat {
    pub row: char,
    pub col: usize,
    #[serde(rename = "type")]
    pub seat_type: SeatType,
}

impl FlatSeat {
    pub fn new(row: char, col: usize, seat_type: SeatType) -> Self {
        Self { row, col, seat_type }
    }

    /// Zero-based `(row, col)` of this record, `None` when the letter or the
    /// column cannot address a cell.
    pub fn position(&self) -> Option<(usize, usize)> {
        let row = row_index(self.row)?;
        let col = self.col.checked_sub(1)?;
        Some((row, col))
    }
}

pub fn row_letter(row: usize) -> char {
    char::from_u32(u32::from(b'A') + row as u32).unwrap_or('?')
}

pub fn row_index(letter: char) -> Option<usize> {
    letter
        .is_ascii_uppercase()
        .then(|| (letter as u8 - b'A') as usize)
}

/// `"B7"` для одиночного места.
pub fn single_label(row: usize, col: usize) -> String {
    format!("{}{}", row_letter(row), col + 1)
}

/// `"B3-4"` для парного места, порядок колонок не важен.
pub fn couple_label(row: usize, col_a: usize, col_b: usize) -> String {
    let (lo, hi) = if col_a <= col_b { (col_a, col_b) } else { (col_b, col_a) };
    format!("{}{}-{}", row_letter(row), lo + 1, hi + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_use_letter_rows_and_one_based_columns() {
        assert_eq!(single_label(0, 0), "A1");
        assert_eq!(single_label(14, 14), "O15");
        assert_eq!(couple_label(1, 3, 2), "B3-4");
    }

    #[test]
    fn row_letters_round_trip() {
        for row in 0..MAX_DIMENSION {
            assert_eq!(row_index(row_letter(row)), Some(row));
        }
        assert_eq!(row_index('a'), None);
        assert_eq!(row_index('1'), None);
    }

    #[test]
    fn flat_seat_wire_shape() {
        let seat = FlatSeat::new('A', 1, SeatType::Normal);
        let json = serde_json::to_value(&seat).unwrap();
        assert_eq!(json, serde_json::json!({"row": "A", "col": 1, "type": "NORMAL"}));

        let parsed: FlatSeat =
            serde_json::from_value(serde_json::json!({"row": "C", "col": 4, "type": "VIP"})).unwrap();
        assert_eq!(parsed.position(), Some((2, 3)));
    }

    #[test]
    fn zero_column_has_no_position() {
        assert_eq!(FlatSeat::new('A', 0, SeatType::Vip).position(), None);
    }

    #[test]
    fn couple_half_knows_its_partner() {
        let left = Seat::CoupleHalf { pair: PairId(1), side: Side::Left };
        let right = Seat::CoupleHalf { pair: PairId(1), side: Side::Right };
        assert_eq!(left.partner_col(3), Some(4));
        assert_eq!(right.partner_col(4), Some(3));
        assert_eq!(Seat::Single(SeatType::Vip).partner_col(4), None);
        assert_eq!(left.seat_type(), SeatType::Couple);
    }

    #[test]
    fn plain_seats_never_hold_couples() {
        assert_eq!(Seat::plain(SeatType::Empty), Ok(Seat::Empty));
        assert_eq!(Seat::plain(SeatType::Vip), Ok(Seat::Single(SeatType::Vip)));
        assert_eq!(Seat::plain(SeatType::Couple), Err(LayoutError::CoupleNotPaintable));
    }
}
