//! Fixed sort-key enumerations for listings.
//!
//! Listing pages accept a `sort` query parameter. The raw value is never
//! interpolated into SQL: it is mapped onto a closed enum, and unknown or
//! absent keys fall back to the listing's default ordering.

macro_rules! define_sort_key {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $key:literal ),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every accepted key in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Query-string spelling of this key.
            #[must_use]
            pub const fn key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            /// Resolve a raw query value, falling back to the default.
            #[must_use]
            pub fn from_key(raw: Option<&str>) -> Self {
                match raw.map(str::trim) {
                    $(Some($key) => Self::$variant,)+
                    _ => Self::$default,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.key())
            }
        }
    };
}

pub(crate) use define_sort_key;
