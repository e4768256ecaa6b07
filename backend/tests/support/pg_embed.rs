//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Every suite shares one cluster per test binary. Each test gets its own
//! database cloned from a template that already carries the migrations, so
//! tests never see each other's rows.
//!
//! When the cluster cannot start, tests fail unless `SKIP_TEST_CLUSTER` is
//! truthy, in which case they print a skip marker and return.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::{Connection, PgConnection};
use ehotels::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "ehotels_template";
const SHARED_CLUSTER_RETRIES: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Hotels, rooms, people and one open problem shared by the adapter suites.
///
/// Rooms 101 and 102 belong to the Harbour Inn (Ottawa), 201 to the Summit
/// Lodge (Banff). Room 102 has an unresolved problem.
pub const BASE_FIXTURES: &str = r"
INSERT INTO hotel_chain (hotel_chain_id, chain_name) VALUES
    (1, 'Harbour Group'),
    (2, 'Summit Stays');
INSERT INTO hotel (hotel_id, hotel_name, address, hotel_chain_id, category, num_rooms, rating) VALUES
    (1, 'Harbour Inn', '1 Bay Street, Ottawa', 1, 'Boutique', 2, 4),
    (2, 'Summit Lodge', '9 Ridge Road, Banff', 2, 'Resort', 40, 5);
INSERT INTO room (room_id, hotel_id, capacity, view_type, extendable, price, status) VALUES
    (101, 1, 'double', 'sea_view', TRUE, 150, 'Available'),
    (102, 1, 'suite', 'none', FALSE, 320, 'Available'),
    (201, 2, 'family', 'mountain_view', TRUE, 210, 'Available');
INSERT INTO room_amenity (hotel_id, room_id, amenity) VALUES
    (1, 101, 'WiFi'),
    (1, 101, 'Minibar'),
    (2, 201, 'WiFi');
INSERT INTO customer (customer_id, full_name, address, id_type, id_number, registration_date) VALUES
    (1, 'Ann Lee', '4 Elm Road, Ottawa', 'Passport', 'P100', '2025-01-02'),
    (2, 'Bo Chen', '8 Oak Lane, Banff', 'Driver License', 'D200', '2025-01-03');
INSERT INTO employee (employee_id, full_name, address, position, ssn, hotel_id) VALUES
    (1, 'Cara Diaz', '2 Pine Court, Ottawa', 'Receptionist', '111-11-1111', 1),
    (2, 'Dev Patel', '6 Birch Way, Banff', 'Manager', '222-22-2222', 2);
INSERT INTO room_problem (hotel_id, room_id, problem, report_date, resolved) VALUES
    (1, 102, 'Broken heater', '2025-05-30', FALSE);
SELECT setval('hotel_chain_hotel_chain_id_seq', 2);
SELECT setval('hotel_hotel_id_seq', 2);
SELECT setval('customer_customer_id_seq', 2);
SELECT setval('employee_employee_id_seq', 2);
";

/// Returns true when `SKIP_TEST_CLUSTER` is "1", "true" or "yes".
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when allowed, otherwise fail loudly so CI breakage is not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Keep `PG_PASSWORD` stable so a reused data directory still accepts us.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns any thread.
        unsafe {
            std::env::set_var("PG_PASSWORD", "ehotels_embedded_test");
        }
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt < SHARED_CLUSTER_RETRIES => {
                eprintln!("pg-embed: attempt {attempt}/{SHARED_CLUSTER_RETRIES} failed: {error:?}");
                std::thread::sleep(RETRY_DELAY);
                attempt += 1;
            }
            Err(error) => return Err(format!("shared cluster: {error:?}")),
        }
    }
}

fn template_database_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Create the migrated template once per migration set.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        run_pending_migrations(&url).map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(template_name)
}

fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let template_name = ensure_template_database(cluster)?;
    let db_name = format!("test_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|err| format!("create database from template: {err:?}"))
}

/// Run raw SQL against the test database outside any pool.
pub fn execute_sql(url: &str, sql: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.batch_execute(sql)
        .map_err(|err| format!("execute fixture sql: {err}"))
}

/// A migrated, seeded database with a pool and a runtime to drive it.
pub struct StoreContext {
    /// Runtime used to block on adapter calls.
    pub runtime: Runtime,
    /// Pool shared by the adapters under test.
    pub pool: DbPool,
    /// Connection string for raw fixture SQL.
    pub database_url: String,
    _database: TemporaryDatabase,
}

impl StoreContext {
    /// Run extra fixture SQL.
    pub fn seed(&self, sql: &str) {
        execute_sql(&self.database_url, sql).expect("fixture sql applies");
    }
}

fn setup_store(max_pool_size: u32) -> Result<StoreContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_database(cluster)?;
    let database_url = database.url().to_string();
    execute_sql(&database_url, BASE_FIXTURES)?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(max_pool_size)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(StoreContext {
        runtime,
        pool,
        database_url,
        _database: database,
    })
}

/// Database for tests that make one call at a time.
pub fn store() -> Option<StoreContext> {
    match setup_store(2) {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

/// Database with enough connections for concurrent writers.
#[allow(dead_code, reason = "Only suites that race writers call this")]
pub fn busy_store() -> Option<StoreContext> {
    match setup_store(10) {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
