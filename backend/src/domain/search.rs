//! Room availability search: criteria, result rows, and orderings.

use std::cmp::Ordering;

use serde::Serialize;

use super::booking::StayDates;
use super::sort_key::define_sort_key;
use super::{HotelCategory, HotelId, RoomCapacity, RoomId, ViewType};

/// Optional narrowing filters; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    /// Exact capacity class.
    pub capacity: Option<RoomCapacity>,
    /// Case-insensitive substring of the hotel address.
    pub area: Option<String>,
    /// Case-insensitive substring of the chain name.
    pub chain: Option<String>,
    /// Exact hotel category.
    pub category: Option<HotelCategory>,
    /// Highest acceptable nightly price.
    pub max_price: Option<f64>,
    /// Smallest acceptable hotel room count.
    pub min_rooms: Option<i32>,
    /// Exact view.
    pub view_type: Option<ViewType>,
}

/// A complete availability query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    /// Requested stay.
    pub stay: StayDates,
    /// Narrowing filters.
    pub filters: SearchFilters,
}

/// Bookable room annotated with hotel details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableRoom {
    /// Room number.
    pub room_id: RoomId,
    /// Hotel key.
    pub hotel_id: HotelId,
    /// Hotel name.
    pub hotel_name: String,
    /// Hotel address.
    pub hotel_address: String,
    /// Chain name.
    pub chain_name: String,
    /// Hotel star rating.
    pub rating: i32,
    /// Hotel category.
    pub category: HotelCategory,
    /// Capacity class.
    pub capacity: RoomCapacity,
    /// View.
    pub view_type: ViewType,
    /// Extra bed flag.
    pub extendable: bool,
    /// Nightly price.
    pub price: f64,
    /// Amenity names, alphabetical.
    pub amenities: Vec<String>,
    /// Most recent unresolved problem, if any.
    pub open_problem: Option<String>,
}

impl AvailableRoom {
    /// Amenities as one comma-separated string.
    #[must_use]
    pub fn amenity_list(&self) -> String {
        self.amenities.join(", ")
    }
}

define_sort_key! {
    /// Orderings offered on the search results page.
    pub enum SearchSort {
        /// Cheapest first.
        PriceAsc => "price_asc",
        /// Dearest first.
        PriceDesc => "price_desc",
        /// Best rated first.
        RatingDesc => "rating_desc",
        /// Lowest rated first.
        RatingAsc => "rating_asc",
        /// By category label.
        CategoryAsc => "category_asc",
        /// Largest capacity tier first.
        CapacityDesc => "capacity_desc",
        /// Smallest capacity tier first.
        CapacityAsc => "capacity_asc",
        /// Most amenities first.
        AmenitiesDesc => "amenities_desc",
        /// Fewest amenities first.
        AmenitiesAsc => "amenities_asc",
    }
    default = PriceAsc;
}

impl SearchSort {
    /// Compare two results. The order is total: ties break on hotel then room.
    #[must_use]
    pub fn compare(self, a: &AvailableRoom, b: &AvailableRoom) -> Ordering {
        let primary = match self {
            Self::PriceAsc => a.price.total_cmp(&b.price),
            Self::PriceDesc => b.price.total_cmp(&a.price),
            Self::RatingDesc => b.rating.cmp(&a.rating),
            Self::RatingAsc => a.rating.cmp(&b.rating),
            Self::CategoryAsc => a.category.as_str().cmp(b.category.as_str()),
            Self::CapacityDesc => b.capacity.tier().cmp(&a.capacity.tier()),
            Self::CapacityAsc => a.capacity.tier().cmp(&b.capacity.tier()),
            Self::AmenitiesDesc => b.amenities.len().cmp(&a.amenities.len()),
            Self::AmenitiesAsc => a.amenities.len().cmp(&b.amenities.len()),
        };
        primary
            .then(a.hotel_id.cmp(&b.hotel_id))
            .then(a.room_id.cmp(&b.room_id))
    }

    /// Sort `rooms` in place.
    pub fn apply(self, rooms: &mut [AvailableRoom]) {
        rooms.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn result(
        hotel: i32,
        room: i32,
        price: f64,
        capacity: RoomCapacity,
        amenities: &[&str],
    ) -> AvailableRoom {
        AvailableRoom {
            room_id: RoomId::new(room),
            hotel_id: HotelId::new(hotel),
            hotel_name: format!("Hotel {hotel}"),
            hotel_address: "1 Bay St, Toronto".to_owned(),
            chain_name: "Atlas".to_owned(),
            rating: hotel,
            category: HotelCategory::Luxury,
            capacity,
            view_type: ViewType::Plain,
            extendable: false,
            price,
            amenities: amenities.iter().map(|a| (*a).to_owned()).collect(),
            open_problem: None,
        }
    }

    fn sample() -> Vec<AvailableRoom> {
        vec![
            result(2, 201, 150.0, RoomCapacity::Suite, &["TV"]),
            result(1, 102, 90.0, RoomCapacity::Double, &["TV", "WiFi", "Minibar"]),
            result(1, 101, 90.0, RoomCapacity::Single, &[]),
            result(3, 301, 120.0, RoomCapacity::Family, &["WiFi", "TV"]),
        ]
    }

    fn keys(rows: &[AvailableRoom]) -> Vec<i32> {
        rows.iter().map(|r| r.room_id.get()).collect()
    }

    #[rstest]
    #[case(SearchSort::PriceAsc, vec![101, 102, 301, 201])]
    #[case(SearchSort::PriceDesc, vec![201, 301, 101, 102])]
    #[case(SearchSort::RatingDesc, vec![301, 201, 101, 102])]
    #[case(SearchSort::CapacityDesc, vec![201, 301, 102, 101])]
    #[case(SearchSort::CapacityAsc, vec![101, 102, 301, 201])]
    #[case(SearchSort::AmenitiesDesc, vec![102, 301, 201, 101])]
    #[case(SearchSort::AmenitiesAsc, vec![101, 201, 301, 102])]
    fn sort_orders(#[case] sort: SearchSort, #[case] expected: Vec<i32>) {
        let mut rows = sample();
        sort.apply(&mut rows);
        assert_eq!(keys(&rows), expected);
    }

    #[rstest]
    fn sorting_is_independent_of_input_order() {
        for sort in SearchSort::ALL {
            let mut forward = sample();
            let mut reversed = sample();
            reversed.reverse();
            sort.apply(&mut forward);
            sort.apply(&mut reversed);
            assert_eq!(keys(&forward), keys(&reversed), "sort {}", sort.key());
        }
    }

    #[rstest]
    fn amenities_join_with_commas() {
        let row = result(1, 1, 1.0, RoomCapacity::Single, &["TV", "WiFi"]);
        assert_eq!(row.amenity_list(), "TV, WiFi");
    }
}
