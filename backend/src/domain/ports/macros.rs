//! Helper macros for generating repository port error enums.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

/// Map a repository error with `Connection`, `Query` and `Constraint`
/// variants onto the domain error taxonomy.
///
/// Connection failures become `ServiceUnavailable`, query failures become
/// `InternalError`, and constraint violations become `Conflict` carrying the
/// adapter's user-facing message.
macro_rules! map_port_error_into_domain {
    ($name:ident, $label:literal) => {
        impl From<$name> for $crate::domain::Error {
            fn from(error: $name) -> Self {
                match error {
                    $name::Connection { message } => $crate::domain::Error::service_unavailable(
                        format!(concat!($label, " unavailable: {}"), message),
                    ),
                    $name::Query { message } => $crate::domain::Error::internal(format!(
                        concat!($label, " error: {}"),
                        message
                    )),
                    $name::Constraint { message } => $crate::domain::Error::conflict(message),
                }
            }
        }
    };
}

pub(crate) use define_port_error;
pub(crate) use map_port_error_into_domain;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use crate::domain::{Error, ErrorCode};

    define_port_error! {
        pub enum SamplePortError {
            Connection { message: String } => "sample connection failed: {message}",
            Query { message: String } => "sample query failed: {message}",
            Constraint { message: String } => "sample constraint violated: {message}",
        }
    }

    map_port_error_into_domain!(SamplePortError, "sample repository");

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::query("boom");
        assert_eq!(err.to_string(), "sample query failed: boom");
    }

    #[test]
    fn connection_maps_to_service_unavailable() {
        let err: Error = SamplePortError::connection("refused").into();
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(err.message(), "sample repository unavailable: refused");
    }

    #[test]
    fn query_maps_to_internal() {
        let err: Error = SamplePortError::query("syntax").into();
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[test]
    fn constraint_keeps_adapter_message() {
        let err: Error = SamplePortError::constraint("Room 101 already exists.").into();
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Room 101 already exists.");
    }
}
