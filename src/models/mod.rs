pub mod seat;
pub mod layout;
pub mod room;

pub use seat::{FlatSeat, Seat, SeatCell, SeatType};
pub use layout::{SeatLayout, SeatStats};
pub use room::{PersistedLayout, Room, RoomConfig};
