//! `DieselRentalRepository` against embedded PostgreSQL: walk-ins, payments,
//! archival and the status reconciliation pass.

#[path = "support/pg_embed.rs"]
mod pg_embed;

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use ehotels::domain::ports::RentalRepository;
use ehotels::domain::{
    CustomerId, EmployeeId, HotelId, HotelScope, Payment, ReconciliationReport, Rental,
    RentalArchiveSort, RentalId, RentalOutcome, RentalSort, RentalStatus, RoomId, StayDates,
    StayRejection, WalkIn,
};
use ehotels::outbound::persistence::DieselRentalRepository;

use pg_embed::StoreContext;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
}

fn walk_in(hotel: i32, room: i32, employee: i32, check_in: u32, check_out: u32) -> WalkIn {
    WalkIn {
        customer_id: CustomerId::new(1),
        hotel_id: HotelId::new(hotel),
        room_id: RoomId::new(room),
        employee_id: EmployeeId::new(employee),
        stay: StayDates::new(day(check_in), day(check_out)).expect("valid stay"),
        payment: Payment::new(300.0, "cash").expect("valid payment"),
        today: day(1),
    }
}

#[fixture]
fn db() -> Option<StoreContext> {
    pg_embed::store()
}

fn rent(context: &StoreContext, repo: &DieselRentalRepository, request: &WalkIn) -> Rental {
    match context
        .runtime
        .block_on(repo.create_walk_in(request))
        .expect("walk-in settles")
    {
        RentalOutcome::Rented(rental) => rental,
        RentalOutcome::Rejected(rejection) => panic!("walk-in refused: {rejection:?}"),
    }
}

fn stored(context: &StoreContext, repo: &DieselRentalRepository, id: i32) -> Rental {
    context
        .runtime
        .block_on(repo.find_by_id(RentalId::new(id)))
        .expect("lookup succeeds")
        .expect("rental exists")
}

#[rstest]
fn walk_ins_are_stored_completed_and_paid(db: Option<StoreContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: walk-in test skipped");
        return;
    };
    let repo = DieselRentalRepository::new(context.pool.clone());

    let rental = rent(&context, &repo, &walk_in(1, 101, 1, 10, 12));

    assert_eq!(rental.status, RentalStatus::Completed);
    assert_eq!(rental.booking_id, None);
    assert_eq!(rental.payment_amount, 300.0);
    assert_eq!(rental.payment_method, "cash");
    assert_eq!(rental.payment_date, Some(day(1)));
}

#[rstest]
fn walk_ins_respect_existing_bookings(db: Option<StoreContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: walk-in overlap test skipped");
        return;
    };
    context.seed(
        "INSERT INTO booking (customer_id, hotel_id, room_id, booking_date, check_in_date, \
         check_out_date, status) VALUES (2, 2, 201, '2025-05-01', '2025-06-11', '2025-06-14', \
         'Pending');",
    );
    let repo = DieselRentalRepository::new(context.pool.clone());

    let outcome = context
        .runtime
        .block_on(repo.create_walk_in(&walk_in(2, 201, 2, 10, 12)))
        .expect("walk-in settles");
    assert_eq!(outcome, RentalOutcome::Rejected(StayRejection::Overlap));

    rent(&context, &repo, &walk_in(2, 201, 2, 14, 16));
}

/// Rentals 1 to 4 around the 10 June reconciliation day.
const RECONCILE_FIXTURES: &str = r"
INSERT INTO rental (rental_id, customer_id, hotel_id, room_id, employee_id, check_in_date, check_out_date, status, payment_amount, payment_date, payment_method) VALUES
    (1, 1, 1, 101, 1, '2025-06-01', '2025-06-03', 'Ongoing', 100, '2025-06-01', 'Pending'),
    (2, 1, 1, 101, 1, '2025-06-09', '2025-06-12', 'Ongoing', 300, '2025-06-09', 'card'),
    (3, 2, 2, 201, 2, '2025-06-08', '2025-06-11', 'Completed', 200, '2025-06-08', 'cash'),
    (4, 2, 1, 101, 1, '2025-06-20', '2025-06-22', 'Ongoing', 0, '2025-06-09', 'Pending');
SELECT setval('rental_rental_id_seq', 4);
";

#[rstest]
fn reconciliation_moves_statuses_forward(db: Option<StoreContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: reconciliation test skipped");
        return;
    };
    context.seed(RECONCILE_FIXTURES);
    let repo = DieselRentalRepository::new(context.pool.clone());

    let report = context
        .runtime
        .block_on(repo.reconcile_statuses(day(10)))
        .expect("reconciliation runs");

    assert_eq!(
        report,
        ReconciliationReport {
            completed: 1,
            ongoing: 1
        }
    );
    assert_eq!(stored(&context, &repo, 1).status, RentalStatus::Completed);
    assert_eq!(stored(&context, &repo, 2).status, RentalStatus::Ongoing);
    assert_eq!(stored(&context, &repo, 4).status, RentalStatus::Ongoing);
}

#[rstest]
fn walk_ins_spanning_today_stay_completed(db: Option<StoreContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: walk-in reconciliation test skipped");
        return;
    };
    let repo = DieselRentalRepository::new(context.pool.clone());
    let rental = rent(&context, &repo, &walk_in(2, 201, 2, 1, 4));

    let report = context
        .runtime
        .block_on(repo.reconcile_statuses(day(2)))
        .expect("reconciliation runs");

    assert_eq!(report, ReconciliationReport::default());
    assert_eq!(
        stored(&context, &repo, rental.id.get()).status,
        RentalStatus::Completed
    );
}

#[rstest]
fn payments_overwrite_the_payment_fields(db: Option<StoreContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: payment test skipped");
        return;
    };
    context.seed(RECONCILE_FIXTURES);
    let repo = DieselRentalRepository::new(context.pool.clone());
    let payment = Payment::new(450.0, "card").expect("valid payment");

    let updated = context
        .runtime
        .block_on(repo.record_payment(RentalId::new(4), &payment, day(9)))
        .expect("payment runs");
    assert!(updated);
    let rental = stored(&context, &repo, 4);
    assert_eq!(rental.payment_amount, 450.0);
    assert_eq!(rental.payment_method, "card");
    assert_eq!(rental.payment_date, Some(day(9)));

    let missing = context
        .runtime
        .block_on(repo.record_payment(RentalId::new(99), &payment, day(9)))
        .expect("payment runs");
    assert!(!missing);
}

#[rstest]
#[case(HotelScope::All, RentalSort::Payment, vec![2, 3, 1, 4])]
#[case(HotelScope::All, RentalSort::PaymentAsc, vec![4, 1, 3, 2])]
#[case(HotelScope::All, RentalSort::CheckInDesc, vec![4, 2, 3, 1])]
#[case(HotelScope::All, RentalSort::Customer, vec![1, 2, 3, 4])]
#[case(HotelScope::Hotel(HotelId::new(2)), RentalSort::CheckInDesc, vec![3])]
fn lists_follow_scope_and_order(
    db: Option<StoreContext>,
    #[case] scope: HotelScope,
    #[case] sort: RentalSort,
    #[case] expected: Vec<i32>,
) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: rental list test skipped");
        return;
    };
    context.seed(RECONCILE_FIXTURES);
    let repo = DieselRentalRepository::new(context.pool.clone());

    let listed = context
        .runtime
        .block_on(repo.list(scope, sort))
        .expect("list loads");
    let ids: Vec<i32> = listed.iter().map(|row| row.id.get()).collect();
    assert_eq!(ids, expected);
}

#[rstest]
fn deletion_archives_the_employee_name(db: Option<StoreContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: rental archive test skipped");
        return;
    };
    let repo = DieselRentalRepository::new(context.pool.clone());
    let rental = rent(&context, &repo, &walk_in(2, 201, 2, 10, 12));

    let removed = context
        .runtime
        .block_on(repo.delete_and_archive(rental.id, day(3)))
        .expect("archival runs");
    assert!(removed);
    let again = context
        .runtime
        .block_on(repo.delete_and_archive(rental.id, day(3)))
        .expect("archival runs");
    assert!(!again);

    let archived = context
        .runtime
        .block_on(repo.list_archive(HotelScope::All, RentalArchiveSort::default()))
        .expect("archive loads");
    assert_eq!(archived.len(), 1);
    let snapshot = &archived[0];
    assert_eq!(snapshot.rental_id, rental.id);
    assert_eq!(snapshot.employee_name, "Dev Patel");
    assert_eq!(snapshot.customer_name, "Ann Lee");
    assert_eq!(snapshot.status, RentalStatus::Completed);
    assert_eq!(snapshot.payment_amount, 300.0);
}
