//! Closed vocabularies stored as text columns.
//!
//! Each enum round-trips through the exact label the database stores, so
//! form input, persistence rows, and JSON pages all share one spelling.

use serde::{Deserialize, Serialize};

/// A value did not belong to the expected vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    /// Name of the vocabulary.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

macro_rules! define_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stored label.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($label => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_vocabulary! {
    /// Employee role tier; decides authorisation scope.
    Position ("position") {
        /// Global scope.
        Admin => "Admin",
        /// Scoped to one hotel; manages staff below Manager.
        Manager => "Manager",
        /// Front-desk operations only.
        Receptionist => "Receptionist",
    }
}

define_vocabulary! {
    /// Hotel category.
    HotelCategory ("category") {
        /// Luxury hotel.
        Luxury => "Luxury",
        /// Resort.
        Resort => "Resort",
        /// Boutique hotel.
        Boutique => "Boutique",
    }
}

define_vocabulary! {
    /// Room capacity class.
    RoomCapacity ("capacity") {
        /// One guest.
        Single => "single",
        /// Two guests.
        Double => "double",
        /// Three guests.
        Triple => "triple",
        /// Family room.
        Family => "family",
        /// Suite.
        Suite => "suite",
    }
}

define_vocabulary! {
    /// Room view.
    ViewType ("view type") {
        /// No notable view.
        Plain => "none",
        /// Mountain view.
        Mountain => "mountain_view",
        /// Sea view.
        Sea => "sea_view",
        /// Mountain and sea.
        Both => "both",
    }
}

define_vocabulary! {
    /// Operational status of a room.
    RoomStatus ("room status") {
        /// Bookable.
        Available => "Available",
        /// Currently occupied.
        Occupied => "Occupied",
        /// Unusable until repaired.
        OutOfOrder => "Out-Of-Order",
    }
}

define_vocabulary! {
    /// Lifecycle of a booking.
    BookingStatus ("booking status") {
        /// Awaiting check-in.
        Pending => "Pending",
        /// Confirmed by staff.
        Confirmed => "Confirmed",
        /// Converted to a rental.
        CheckedIn => "Checked-in",
        /// Cancelled by the customer.
        Cancelled => "Cancelled",
    }
}

define_vocabulary! {
    /// Lifecycle of a rental.
    RentalStatus ("rental status") {
        /// Stay in progress or upcoming.
        Ongoing => "Ongoing",
        /// Stay finished.
        Completed => "Completed",
    }
}

impl Position {
    /// Admins and Managers may open management screens.
    #[must_use]
    pub const fn is_management(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl RoomCapacity {
    /// Ordinal used when sorting by capacity: single=1 through suite=5.
    #[must_use]
    pub const fn tier(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Family => 4,
            Self::Suite => 5,
        }
    }
}

impl BookingStatus {
    /// Whether the booking still occupies its room for its date range.
    #[must_use]
    pub const fn blocks_room(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RoomCapacity::Single, 1)]
    #[case(RoomCapacity::Double, 2)]
    #[case(RoomCapacity::Triple, 3)]
    #[case(RoomCapacity::Family, 4)]
    #[case(RoomCapacity::Suite, 5)]
    fn capacity_tiers_are_ordinal(#[case] capacity: RoomCapacity, #[case] tier: u8) {
        assert_eq!(capacity.tier(), tier);
    }

    #[rstest]
    #[case("Out-Of-Order", RoomStatus::OutOfOrder)]
    #[case("Available", RoomStatus::Available)]
    fn parses_stored_labels(#[case] label: &str, #[case] expected: RoomStatus) {
        assert_eq!(label.parse::<RoomStatus>(), Ok(expected));
        assert_eq!(expected.as_str(), label);
    }

    #[rstest]
    fn rejects_labels_with_wrong_case() {
        let err = "luxury".parse::<HotelCategory>().expect_err("case-sensitive");
        assert_eq!(err.to_string(), "unknown category 'luxury'");
    }

    #[rstest]
    fn serde_uses_stored_labels() {
        let json = serde_json::to_string(&BookingStatus::CheckedIn).expect("serialise");
        assert_eq!(json, "\"Checked-in\"");
        let view: ViewType = serde_json::from_str("\"sea_view\"").expect("deserialise");
        assert_eq!(view, ViewType::Sea);
    }

    #[rstest]
    fn only_admin_and_manager_manage() {
        assert!(Position::Admin.is_management());
        assert!(Position::Manager.is_management());
        assert!(!Position::Receptionist.is_management());
    }
}
