//! Tests for login and registration.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    CustomerRepositoryError, MockCustomerRepository, MockEmployeeRepository,
};
use crate::domain::{Employee, ErrorCode, HotelId};
use crate::test_support::FixedClock;

fn registration_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
}

fn ann_lee() -> Customer {
    Customer {
        id: CustomerId::new(12),
        full_name: "Ann Lee".to_owned(),
        address: "1 Elm St, Ottawa".to_owned(),
        id_type: "passport".to_owned(),
        id_number: "P123".to_owned(),
        registration_date: registration_day(),
    }
}

fn manager() -> Employee {
    Employee {
        id: EmployeeId::new(7),
        full_name: "Mira Stone".to_owned(),
        address: "9 Pine Rd".to_owned(),
        position: Position::Manager,
        ssn: "111-22-3333".to_owned(),
        hotel_id: HotelId::new(3),
    }
}

fn service(customers: MockCustomerRepository, employees: MockEmployeeRepository) -> AuthService {
    AuthService::new(
        Arc::new(customers),
        Arc::new(employees),
        Arc::new(FixedClock::on(registration_day())),
    )
}

fn customer_login(name: &str, password: &str) -> LoginRequest {
    LoginRequest {
        user_type: UserType::Customer,
        full_name: name.to_owned(),
        user_id: 12,
        password: password.to_owned(),
        position: None,
    }
}

#[rstest]
#[case(Some(Position::Admin), "admin")]
#[case(Some(Position::Manager), "employee")]
#[case(Some(Position::Receptionist), "employee")]
#[case(None, "customer")]
fn shared_passwords(#[case] position: Option<Position>, #[case] password: &str) {
    assert_eq!(expected_password(position), password);
}

#[rstest]
#[case("ann lee")]
#[case("ANN LEE")]
#[tokio::test]
async fn customer_login_succeeds_with_any_name_case(#[case] name: &str) {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_by_login()
        .withf(|_, id| *id == CustomerId::new(12))
        .times(1)
        .returning(|_, _| Ok(Some(ann_lee())));
    let principal = service(customers, MockEmployeeRepository::new())
        .login(&customer_login(name, "customer"))
        .await
        .expect("login succeeds");
    let customer = principal.customer().expect("customer principal");
    assert_eq!(customer.id, CustomerId::new(12));
    assert_eq!(customer.name, "Ann Lee");
}

#[tokio::test]
async fn wrong_customer_password_is_rejected() {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_by_login()
        .returning(|_, _| Ok(Some(ann_lee())));
    let err = service(customers, MockEmployeeRepository::new())
        .login(&customer_login("Ann Lee", "wrong"))
        .await
        .expect_err("bad password");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Incorrect password.");
}

#[tokio::test]
async fn unknown_customer_is_reported() {
    let mut customers = MockCustomerRepository::new();
    customers.expect_find_by_login().returning(|_, _| Ok(None));
    let err = service(customers, MockEmployeeRepository::new())
        .login(&customer_login("Nobody", "customer"))
        .await
        .expect_err("not found");
    assert_eq!(err.message(), "Customer not found.");
}

#[rstest]
#[case(Some(Position::Receptionist), "employee", "Position does not match our records.")]
#[case(None, "employee", "Position does not match our records.")]
#[case(Some(Position::Manager), "admin", "Incorrect password.")]
#[tokio::test]
async fn employee_login_failures(
    #[case] position: Option<Position>,
    #[case] password: &str,
    #[case] message: &str,
) {
    let mut employees = MockEmployeeRepository::new();
    employees
        .expect_find_by_login()
        .returning(|_, _| Ok(Some(manager())));
    let request = LoginRequest {
        user_type: UserType::Employee,
        full_name: "mira stone".to_owned(),
        user_id: 7,
        password: password.to_owned(),
        position,
    };
    let err = service(MockCustomerRepository::new(), employees)
        .login(&request)
        .await
        .expect_err("login refused");
    assert_eq!(err.message(), message);
}

#[tokio::test]
async fn employee_login_records_hotel() {
    let mut employees = MockEmployeeRepository::new();
    employees
        .expect_find_by_login()
        .returning(|_, _| Ok(Some(manager())));
    let request = LoginRequest {
        user_type: UserType::Employee,
        full_name: "Mira Stone".to_owned(),
        user_id: 7,
        password: "employee".to_owned(),
        position: Some(Position::Manager),
    };
    let principal = service(MockCustomerRepository::new(), employees)
        .login(&request)
        .await
        .expect("login succeeds");
    let staff = principal.staff().expect("staff principal");
    assert_eq!(staff.hotel_id, Some(HotelId::new(3)));
}

fn registration() -> RegistrationRequest {
    RegistrationRequest {
        full_name: "Ann Lee".to_owned(),
        address: "1 Elm St, Ottawa".to_owned(),
        id_type: "passport".to_owned(),
        id_number: "P123".to_owned(),
    }
}

#[tokio::test]
async fn registration_is_dated_today() {
    let mut customers = MockCustomerRepository::new();
    customers.expect_exists_with_identity().returning(|_, _| Ok(false));
    customers
        .expect_insert()
        .withf(|draft| draft.registration_date() == registration_day())
        .times(1)
        .returning(|_| Ok(ann_lee()));
    let customer = service(customers, MockEmployeeRepository::new())
        .register(&registration())
        .await
        .expect("registered");
    assert_eq!(customer.id, CustomerId::new(12));
}

#[tokio::test]
async fn duplicate_identity_is_rejected() {
    let mut customers = MockCustomerRepository::new();
    customers.expect_exists_with_identity().returning(|_, _| Ok(true));
    customers.expect_insert().times(0);
    let err = service(customers, MockEmployeeRepository::new())
        .register(&registration())
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn connection_failures_surface_as_unavailable() {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_by_login()
        .returning(|_, _| Err(CustomerRepositoryError::connection("refused")));
    let err = service(customers, MockEmployeeRepository::new())
        .login(&customer_login("Ann Lee", "customer"))
        .await
        .expect_err("store down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
