//! booking.rs
//!
//! Представление схемы для экрана бронирования: список продаваемых единиц.
//! Парное место продаётся целиком, поэтому две ячейки пары дают одну единицу
//! с общим номером и ценой пары.

use serde::Serialize;

use crate::models::layout::SeatLayout;
use crate::models::room::Room;
use crate::models::seat::{row_letter, Seat, SeatType};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub base_price: f64,
    pub vip_price: f64,
    pub couple_price: f64,
}

impl Pricing {
    pub fn for_room(room: &Room, base_price: f64) -> Self {
        Self {
            base_price,
            vip_price: room.vip_price,
            couple_price: room.couple_price,
        }
    }

    pub fn price_of(&self, seat_type: SeatType) -> Option<f64> {
        match seat_type {
            SeatType::Normal | SeatType::Disabled => Some(self.base_price),
            SeatType::Vip => Some(self.vip_price),
            SeatType::Couple => Some(self.couple_price),
            SeatType::Empty | SeatType::Blocked => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookableSeat {
    pub seat_number: String,
    pub row: char,
    /// 1-based columns covered by this unit.
    pub cols: Vec<usize>,
    #[serde(rename = "type")]
    pub seat_type: SeatType,
    pub price: f64,
}

/// Purchasable units in row-major order.
pub fn bookable_seats(layout: &SeatLayout, pricing: &Pricing) -> Vec<BookableSeat> {
    let mut units = Vec::new();
    for row in 0..layout.rows() {
        for col in 0..layout.cols() {
            let Some(seat) = layout.seat(row, col) else { continue };
            let Some(price) = pricing.price_of(seat.seat_type()) else { continue };

            let cols = match seat {
                Seat::CoupleHalf { .. } => match seat.partner_col(col) {
                    Some(partner) if partner > col => vec![col + 1, partner + 1],
                    // правую половину уже учли вместе с левой
                    _ => continue,
                },
                _ => vec![col + 1],
            };
            let Some(seat_number) = layout.seat_number(row, col) else { continue };

            units.push(BookableSeat {
                seat_number,
                row: row_letter(row),
                cols,
                seat_type: seat.seat_type(),
                price,
            });
        }
    }
    units
}
