//! HTTP inbound adapter: session-backed pages for customers and staff.
//!
//! Handlers parse forms, rebuild the [`Principal`](crate::domain::Principal)
//! from the session, call one service and finish with either a JSON page or
//! a flash-and-redirect.

use actix_web::web;

pub mod auth;
pub mod customer;
pub mod employee;
pub mod error;
pub mod flash;
mod forms;
pub mod health;
pub mod reports;
mod respond;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiResult, redirect_server_errors};

/// Register every session-backed route.
///
/// Mount inside a scope wrapped by the session middleware and, within it,
/// [`redirect_server_errors`]. Health probes are registered separately.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use employee::{customers, front_desk, hotels, problems, rooms, staff};

    cfg.service(auth::index)
        .service(auth::login_page)
        .service(auth::login)
        .service(auth::register_page)
        .service(auth::register)
        .service(auth::logout)
        .service(customer::search)
        .service(customer::book)
        .service(customer::cancel_booking)
        .service(customer::my_bookings)
        .service(customer::my_rentings)
        .service(customer::hotels)
        .service(front_desk::dashboard)
        .service(front_desk::convert_booking)
        .service(front_desk::rent_form)
        .service(front_desk::rent_room)
        .service(front_desk::bookings)
        .service(front_desk::booking_archive)
        .service(front_desk::delete_booking)
        .service(front_desk::rentals)
        .service(front_desk::rental_archive)
        .service(front_desk::delete_rental)
        .service(front_desk::add_payment)
        .service(reports::available_rooms)
        .service(reports::room_capacity);

    // Management screens share the list/add/edit/delete shape.
    cfg.service(customers::list)
        .service(customers::add_form)
        .service(customers::add)
        .service(customers::edit_form)
        .service(customers::edit)
        .service(customers::delete)
        .service(staff::list)
        .service(staff::add_form)
        .service(staff::add)
        .service(staff::edit_form)
        .service(staff::edit)
        .service(staff::delete)
        .service(hotels::list)
        .service(hotels::add_form)
        .service(hotels::add)
        .service(hotels::edit_form)
        .service(hotels::edit)
        .service(hotels::delete)
        .service(rooms::list)
        .service(rooms::add_form)
        .service(rooms::add)
        .service(rooms::edit_form)
        .service(rooms::edit)
        .service(rooms::delete)
        .service(problems::list)
        .service(problems::add_form)
        .service(problems::add)
        .service(problems::edit_form)
        .service(problems::edit)
        .service(problems::delete);
}
