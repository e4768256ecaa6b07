//! Hotel chains, hotels, and the orderings used to list them.

use std::cmp::Ordering;

use serde::Serialize;

use super::field::{field_error, required};
use super::sort_key::define_sort_key;
use super::{Error, HotelCategory, HotelChainId, HotelId};

/// Parent brand of a set of hotels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotelChain {
    /// Primary key.
    pub id: HotelChainId,
    /// Brand name.
    pub name: String,
}

/// Hotel joined with its chain name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hotel {
    /// Primary key.
    pub id: HotelId,
    /// Display name.
    pub name: String,
    /// Street address; the city is its second comma-separated part.
    pub address: String,
    /// Owning chain.
    pub chain_id: HotelChainId,
    /// Owning chain's name.
    pub chain_name: String,
    /// Category.
    pub category: HotelCategory,
    /// Advertised room count.
    pub num_rooms: i32,
    /// Star rating, 1 to 5.
    pub rating: i32,
}

/// Validated input for creating or editing a hotel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelDraft {
    name: String,
    address: String,
    chain_id: HotelChainId,
    category: HotelCategory,
    num_rooms: i32,
    rating: i32,
}

impl HotelDraft {
    /// Validate the hotel fields. Chain existence is checked by the service.
    pub fn new(
        name: &str,
        address: &str,
        chain_id: HotelChainId,
        category: HotelCategory,
        num_rooms: i32,
        rating: i32,
    ) -> Result<Self, Error> {
        let name = required("hotel_name", name)?;
        let address = required("address", address)?;
        if num_rooms < 0 {
            return Err(field_error(
                "num_rooms",
                "negative",
                "Number of rooms must be non-negative.",
            ));
        }
        if !(1..=5).contains(&rating) {
            return Err(field_error("rating", "out_of_range", "Rating must be between 1 and 5."));
        }
        Ok(Self {
            name,
            address,
            chain_id,
            category,
            num_rooms,
            rating,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Street address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Owning chain.
    pub fn chain_id(&self) -> HotelChainId {
        self.chain_id
    }

    /// Category.
    pub fn category(&self) -> HotelCategory {
        self.category
    }

    /// Advertised room count.
    pub fn num_rooms(&self) -> i32 {
        self.num_rooms
    }

    /// Star rating.
    pub fn rating(&self) -> i32 {
        self.rating
    }
}

/// Result of a guarded hotel delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelDeletion {
    /// The hotel was removed.
    Deleted,
    /// At least one booking references the hotel.
    HasBookings,
    /// No such hotel.
    NotFound,
}

define_sort_key! {
    /// Orderings offered on the hotel management screen.
    pub enum HotelSort {
        /// By key.
        Id => "id",
        /// By name.
        Name => "name",
        /// By address.
        Address => "address",
        /// By category label.
        Category => "category",
        /// Largest first.
        NumRooms => "num_rooms",
        /// Highest rated first.
        Rating => "rating",
    }
    default = Id;
}

impl HotelSort {
    /// Compare two hotels; ties fall back to the key.
    #[must_use]
    pub fn compare(self, a: &Hotel, b: &Hotel) -> Ordering {
        let primary = match self {
            Self::Id => Ordering::Equal,
            Self::Name => a.name.cmp(&b.name),
            Self::Address => a.address.cmp(&b.address),
            Self::Category => a.category.as_str().cmp(b.category.as_str()),
            Self::NumRooms => b.num_rooms.cmp(&a.num_rooms),
            Self::Rating => b.rating.cmp(&a.rating),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

define_sort_key! {
    /// Orderings offered on the public hotel catalogue.
    pub enum CatalogueSort {
        /// Name A to Z.
        NameAsc => "name_asc",
        /// Name Z to A.
        NameDesc => "name_desc",
        /// Best rated first.
        RatingDesc => "rating_desc",
        /// Lowest rated first.
        RatingAsc => "rating_asc",
        /// Chain A to Z.
        ChainAsc => "chain_asc",
        /// Chain Z to A.
        ChainDesc => "chain_desc",
        /// Category A to Z.
        CategoryAsc => "category_asc",
        /// Category Z to A.
        CategoryDesc => "category_desc",
    }
    default = NameAsc;
}

impl CatalogueSort {
    /// Compare two catalogue entries; ties fall back to name then key.
    #[must_use]
    pub fn compare(self, a: &Hotel, b: &Hotel) -> Ordering {
        let primary = match self {
            Self::NameAsc => a.name.cmp(&b.name),
            Self::NameDesc => b.name.cmp(&a.name),
            Self::RatingDesc => b.rating.cmp(&a.rating),
            Self::RatingAsc => a.rating.cmp(&b.rating),
            Self::ChainAsc => a.chain_name.cmp(&b.chain_name),
            Self::ChainDesc => b.chain_name.cmp(&a.chain_name),
            Self::CategoryAsc => a.category.as_str().cmp(b.category.as_str()),
            Self::CategoryDesc => b.category.as_str().cmp(a.category.as_str()),
        };
        primary.then_with(|| a.name.cmp(&b.name)).then(a.id.cmp(&b.id))
    }
}
