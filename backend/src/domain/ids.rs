//! Strongly typed identifiers for persisted entities.
//!
//! Every table uses a PostgreSQL `SERIAL` key, so identifiers wrap `i32`.
//! Keeping them distinct stops a `RoomId` from being passed where a
//! `HotelId` is expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database key.
            #[must_use]
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Return the raw database key.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Primary key of a customer.
    CustomerId
);
define_id!(
    /// Primary key of an employee.
    EmployeeId
);
define_id!(
    /// Primary key of a hotel chain.
    HotelChainId
);
define_id!(
    /// Primary key of a hotel.
    HotelId
);
define_id!(
    /// Primary key of a room; unique across hotels.
    RoomId
);
define_id!(
    /// Primary key of a booking.
    BookingId
);
define_id!(
    /// Primary key of a rental.
    RentalId
);
define_id!(
    /// Surrogate key of a reported room problem.
    ProblemId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialise_as_bare_integers() {
        let json = serde_json::to_string(&HotelId::new(3)).expect("serialise id");
        assert_eq!(json, "3");
        let parsed: RoomId = serde_json::from_str("17").expect("deserialise id");
        assert_eq!(parsed.get(), 17);
    }
}
