//! Export/import of a whole layout as a JSON file.
//!
//! Unlike the flat backend format, the file carries the full in-memory shape
//! `{rows, cols, seats: SeatCell[][]}` including explicit pairing.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LayoutError;
use crate::models::layout::{check_dimensions, SeatLayout};
use crate::models::seat::{Seat, SeatCell, SeatType};

const REQUIRED_KEYS: [&str; 3] = ["rows", "cols", "seats"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub rows: usize,
    pub cols: usize,
    pub seats: Vec<Vec<SeatCell>>,
}

pub fn export(layout: &SeatLayout) -> LayoutDocument {
    LayoutDocument {
        rows: layout.rows(),
        cols: layout.cols(),
        seats: layout.matrix(),
    }
}

pub fn export_json(layout: &SeatLayout) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&export(layout))
}

/// Parses an exported file. Nothing is returned unless the whole file is
/// valid, so the caller's current layout stays as it is on failure.
pub fn import_json(text: &str) -> Result<SeatLayout, LayoutError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| LayoutError::MalformedImport(format!("not a JSON document: {e}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| LayoutError::MalformedImport("expected a JSON object".to_string()))?;
    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
        return Err(LayoutError::MalformedImport(format!("missing `{missing}`")));
    }

    let document: LayoutDocument = serde_json::from_value(value)
        .map_err(|e| LayoutError::MalformedImport(e.to_string()))?;
    let layout = from_document(&document)?;
    info!(rows = layout.rows(), cols = layout.cols(), "layout imported");
    Ok(layout)
}

/// Rebuilds a layout from its document form. Seat numbers in the document are
/// ignored since they are derived; pairing must be symmetric.
pub fn from_document(document: &LayoutDocument) -> Result<SeatLayout, LayoutError> {
    check_dimensions(document.rows, document.cols)?;
    if document.seats.len() != document.rows
        || document.seats.iter().any(|line| line.len() != document.cols)
    {
        return Err(LayoutError::MalformedImport(format!(
            "seat matrix does not match {}x{}",
            document.rows, document.cols
        )));
    }

    let mut layout = SeatLayout::empty(document.rows, document.cols)?;
    for (row, line) in document.seats.iter().enumerate() {
        for (col, cell) in line.iter().enumerate() {
            if cell.row != row || cell.col != col {
                return Err(LayoutError::MalformedImport(format!(
                    "cell at ({row}, {col}) is labelled ({}, {})",
                    cell.row, cell.col
                )));
            }

            match (cell.seat_type, cell.is_couple_seat, cell.couple_with) {
                (SeatType::Couple, true, Some(partner)) if partner == col + 1 => {
                    let sibling = line.get(partner);
                    let linked = sibling.is_some_and(|s| {
                        s.seat_type == SeatType::Couple && s.is_couple_seat && s.couple_with == Some(col)
                    });
                    if !linked {
                        return Err(LayoutError::BrokenCouple { row, col });
                    }
                    layout.link_couple(row, col)?;
                }
                // правая половина уже связана вместе с левой
                (SeatType::Couple, true, Some(partner)) if col.checked_sub(1) == Some(partner) => {
                    if !layout.seat(row, col).is_some_and(|s| s.is_couple()) {
                        return Err(LayoutError::BrokenCouple { row, col });
                    }
                }
                (seat_type, false, None) if seat_type != SeatType::Couple => {
                    layout.set(row, col, Seat::plain(seat_type)?)?;
                }
                // половина пары без соседа или coupleWith у одиночного места
                _ => return Err(LayoutError::BrokenCouple { row, col }),
            }
        }
    }
    Ok(layout)
}
