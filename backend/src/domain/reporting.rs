//! Rows of the two aggregate reporting views.

use serde::Serialize;

use super::HotelId;

/// Count of bookable rooms in one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableRoomsPerCity {
    /// City parsed from hotel addresses.
    pub city: String,
    /// Rooms with status Available.
    pub available_rooms: i64,
}

/// Sum of capacity tiers across one hotel's rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotelCapacity {
    /// Hotel key.
    pub hotel_id: HotelId,
    /// Hotel name.
    pub hotel_name: String,
    /// Total guest capacity.
    pub total_capacity: i64,
}
