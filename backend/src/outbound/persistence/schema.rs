//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration, then re-add the two
//! view declarations at the bottom, which `print-schema` does not emit.

diesel::table! {
    /// Hotel chains.
    hotel_chain (hotel_chain_id) {
        hotel_chain_id -> Int4,
        chain_name -> Varchar,
    }
}

diesel::table! {
    /// Hotels; `category` is one of Luxury, Resort or Boutique.
    hotel (hotel_id) {
        hotel_id -> Int4,
        hotel_name -> Varchar,
        address -> Varchar,
        hotel_chain_id -> Int4,
        category -> Varchar,
        num_rooms -> Int4,
        rating -> Int4,
    }
}

diesel::table! {
    /// Rooms; `room_id` is unique across hotels.
    room (room_id) {
        room_id -> Int4,
        hotel_id -> Int4,
        capacity -> Varchar,
        view_type -> Varchar,
        extendable -> Bool,
        price -> Float8,
        status -> Varchar,
    }
}

diesel::table! {
    /// Amenities, many per room.
    room_amenity (room_id, amenity) {
        hotel_id -> Int4,
        room_id -> Int4,
        amenity -> Varchar,
    }
}

diesel::table! {
    /// Registered customers.
    customer (customer_id) {
        customer_id -> Int4,
        full_name -> Varchar,
        address -> Varchar,
        id_type -> Varchar,
        id_number -> Varchar,
        registration_date -> Date,
    }
}

diesel::table! {
    /// Staff members and their home hotel.
    employee (employee_id) {
        employee_id -> Int4,
        full_name -> Varchar,
        address -> Varchar,
        position -> Varchar,
        ssn -> Varchar,
        hotel_id -> Int4,
    }
}

diesel::table! {
    /// Reservations made by customers.
    booking (booking_id) {
        booking_id -> Int4,
        customer_id -> Int4,
        hotel_id -> Int4,
        room_id -> Int4,
        booking_date -> Date,
        check_in_date -> Date,
        check_out_date -> Date,
        status -> Varchar,
    }
}

diesel::table! {
    /// Stays registered at the desk, converted or walk-in.
    rental (rental_id) {
        rental_id -> Int4,
        customer_id -> Int4,
        hotel_id -> Int4,
        room_id -> Int4,
        employee_id -> Int4,
        booking_id -> Nullable<Int4>,
        check_in_date -> Date,
        check_out_date -> Date,
        status -> Varchar,
        payment_amount -> Float8,
        payment_date -> Nullable<Date>,
        payment_method -> Varchar,
    }
}

diesel::table! {
    /// Reported room problems.
    room_problem (problem_id) {
        problem_id -> Int4,
        hotel_id -> Int4,
        room_id -> Int4,
        problem -> Text,
        report_date -> Date,
        resolved -> Bool,
    }
}

diesel::table! {
    /// Snapshots of deleted bookings.
    booking_archive (archive_id) {
        archive_id -> Int4,
        booking_id -> Int4,
        customer_name -> Varchar,
        hotel_id -> Int4,
        hotel_name -> Varchar,
        room_id -> Int4,
        booking_date -> Date,
        check_in_date -> Date,
        check_out_date -> Date,
        status -> Varchar,
        archive_date -> Date,
    }
}

diesel::table! {
    /// Snapshots of deleted rentals.
    rental_archive (archive_id) {
        archive_id -> Int4,
        rental_id -> Int4,
        customer_name -> Varchar,
        hotel_id -> Int4,
        hotel_name -> Varchar,
        room_id -> Int4,
        employee_name -> Varchar,
        check_in_date -> Date,
        check_out_date -> Date,
        status -> Varchar,
        payment_amount -> Float8,
        payment_date -> Nullable<Date>,
        payment_method -> Varchar,
        archive_date -> Date,
    }
}

diesel::table! {
    /// Read-only view: available rooms grouped by city.
    view_available_rooms_per_city (city) {
        city -> Text,
        available_rooms -> Int8,
    }
}

diesel::table! {
    /// Read-only view: summed capacity tiers per hotel.
    view_total_capacity_per_hotel (hotel_id) {
        hotel_id -> Int4,
        hotel_name -> Varchar,
        total_capacity -> Int8,
    }
}

diesel::joinable!(hotel -> hotel_chain (hotel_chain_id));
diesel::joinable!(room -> hotel (hotel_id));
diesel::joinable!(employee -> hotel (hotel_id));
diesel::joinable!(booking -> customer (customer_id));
diesel::joinable!(booking -> hotel (hotel_id));
diesel::joinable!(rental -> customer (customer_id));
diesel::joinable!(rental -> hotel (hotel_id));
diesel::joinable!(rental -> employee (employee_id));
diesel::joinable!(room_problem -> hotel (hotel_id));

diesel::allow_tables_to_appear_in_same_query!(
    hotel_chain,
    hotel,
    room,
    room_amenity,
    customer,
    employee,
    booking,
    rental,
    room_problem,
    booking_archive,
    rental_archive,
);
