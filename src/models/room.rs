use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::seat::FlatSeat;

/// Схема зала в том виде, в котором она хранится: размеры плюс плоский список мест.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PersistedLayout {
    #[validate(range(min = 1, max = 15))]
    pub rows: usize,
    #[validate(range(min = 1, max = 15))]
    pub cols: usize,
    #[serde(default)]
    pub seats: Vec<FlatSeat>,
}

/// Тело запроса на создание или замену зала.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1))]
    pub cinema_id: String,
    #[validate(nested)]
    pub seat_layout: PersistedLayout,
    #[validate(range(min = 0.0))]
    pub vip_price: f64,
    #[validate(range(min = 0.0))]
    pub couple_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub cinema_id: String,
    pub seat_layout: PersistedLayout,
    pub vip_price: f64,
    pub couple_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn from_config(config: RoomConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: config.name,
            cinema_id: config.cinema_id,
            seat_layout: config.seat_layout,
            vip_price: config.vip_price,
            couple_price: config.couple_price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Применить новую конфигурацию, сохранив id и дату создания.
    pub fn apply(&mut self, config: RoomConfig) {
        self.name = config.name;
        self.cinema_id = config.cinema_id;
        self.seat_layout = config.seat_layout;
        self.vip_price = config.vip_price;
        self.couple_price = config.couple_price;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seat::SeatType;

    fn config() -> RoomConfig {
        RoomConfig {
            name: "Hall 1".to_string(),
            cinema_id: "cinema-7".to_string(),
            seat_layout: PersistedLayout {
                rows: 2,
                cols: 2,
                seats: vec![FlatSeat::new('A', 1, SeatType::Normal)],
            },
            vip_price: 12.5,
            couple_price: 20.0,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn negative_price_and_oversized_layout_are_rejected() {
        let mut bad = config();
        bad.vip_price = -1.0;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.seat_layout.rows = 16;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.name.clear();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_value(config()).unwrap();
        assert!(json.get("cinemaId").is_some());
        assert!(json.get("seatLayout").is_some());
        assert!(json.get("vipPrice").is_some());
        assert!(json.get("couplePrice").is_some());
    }
}
