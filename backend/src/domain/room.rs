//! Rooms and their management ordering.

use std::cmp::Ordering;

use serde::Serialize;

use super::field::field_error;
use super::sort_key::define_sort_key;
use super::{Error, HotelId, RoomCapacity, RoomId, RoomStatus, ViewType};

/// Persisted room. `id` is unique across every hotel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    /// Globally unique room number.
    pub id: RoomId,
    /// Hotel the room belongs to.
    pub hotel_id: HotelId,
    /// Capacity class.
    pub capacity: RoomCapacity,
    /// View from the room.
    pub view_type: ViewType,
    /// Whether an extra bed can be added.
    pub extendable: bool,
    /// Nightly price.
    pub price: f64,
    /// Operational status.
    pub status: RoomStatus,
}

/// Validated input for creating or editing a room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomDraft {
    id: RoomId,
    hotel_id: HotelId,
    capacity: RoomCapacity,
    view_type: ViewType,
    extendable: bool,
    price: f64,
    status: RoomStatus,
}

impl RoomDraft {
    /// Validate the room fields.
    pub fn new(
        id: RoomId,
        hotel_id: HotelId,
        capacity: RoomCapacity,
        view_type: ViewType,
        extendable: bool,
        price: f64,
        status: RoomStatus,
    ) -> Result<Self, Error> {
        if !price.is_finite() || price < 0.0 {
            return Err(field_error("price", "negative", "Price cannot be negative."));
        }
        Ok(Self {
            id,
            hotel_id,
            capacity,
            view_type,
            extendable,
            price,
            status,
        })
    }

    /// Room number.
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Owning hotel.
    pub fn hotel_id(&self) -> HotelId {
        self.hotel_id
    }

    /// Capacity class.
    pub fn capacity(&self) -> RoomCapacity {
        self.capacity
    }

    /// View.
    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// Extra bed flag.
    pub fn extendable(&self) -> bool {
        self.extendable
    }

    /// Nightly price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Operational status.
    pub fn status(&self) -> RoomStatus {
        self.status
    }

    /// Materialise the draft as a room row.
    #[must_use]
    pub fn into_room(self) -> Room {
        Room {
            id: self.id,
            hotel_id: self.hotel_id,
            capacity: self.capacity,
            view_type: self.view_type,
            extendable: self.extendable,
            price: self.price,
            status: self.status,
        }
    }
}

define_sort_key! {
    /// Orderings offered on the room management screen.
    pub enum RoomSort {
        /// Room number ascending.
        RoomIdAsc => "roomid_asc",
        /// Room number descending.
        RoomIdDesc => "roomid_desc",
        /// Cheapest first.
        PriceAsc => "price_asc",
        /// Dearest first.
        PriceDesc => "price_desc",
        /// Smallest capacity tier first.
        Capacity => "capacity",
        /// By status label.
        Status => "status",
        /// By view label.
        ViewType => "viewtype",
    }
    default = RoomIdAsc;
}

impl RoomSort {
    /// Compare two rooms; ties fall back to the room number.
    #[must_use]
    pub fn compare(self, a: &Room, b: &Room) -> Ordering {
        let primary = match self {
            Self::RoomIdAsc => Ordering::Equal,
            Self::RoomIdDesc => return b.id.cmp(&a.id),
            Self::PriceAsc => a.price.total_cmp(&b.price),
            Self::PriceDesc => b.price.total_cmp(&a.price),
            Self::Capacity => a.capacity.tier().cmp(&b.capacity.tier()),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::ViewType => a.view_type.as_str().cmp(b.view_type.as_str()),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn room(id: i32, capacity: RoomCapacity, price: f64) -> Room {
        Room {
            id: RoomId::new(id),
            hotel_id: HotelId::new(1),
            capacity,
            view_type: ViewType::Sea,
            extendable: false,
            price,
            status: RoomStatus::Available,
        }
    }

    #[rstest]
    #[case(-0.01)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_prices(#[case] price: f64) {
        let err = RoomDraft::new(
            RoomId::new(101),
            HotelId::new(1),
            RoomCapacity::Double,
            ViewType::Plain,
            true,
            price,
            RoomStatus::Available,
        )
        .expect_err("invalid price");
        assert_eq!(err.message(), "Price cannot be negative.");
    }

    #[rstest]
    fn capacity_sort_uses_tiers_not_labels() {
        let mut rows = vec![
            room(1, RoomCapacity::Suite, 10.0),
            room(2, RoomCapacity::Double, 10.0),
            room(3, RoomCapacity::Family, 10.0),
            room(4, RoomCapacity::Single, 10.0),
        ];
        rows.sort_by(|a, b| RoomSort::Capacity.compare(a, b));
        let ids: Vec<i32> = rows.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[rstest]
    fn price_desc_breaks_ties_by_room() {
        let mut rows = vec![
            room(7, RoomCapacity::Single, 80.0),
            room(3, RoomCapacity::Single, 120.0),
            room(5, RoomCapacity::Single, 80.0),
        ];
        rows.sort_by(|a, b| RoomSort::PriceDesc.compare(a, b));
        let ids: Vec<i32> = rows.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![3, 5, 7]);
    }
}
