//! Moves rental statuses forward as days pass.
//!
//! Runs once at startup, on a fixed interval, and after every rental write.
//! Each pass is idempotent for a given day.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::{debug, info, warn};

use super::ports::RentalRepository;
use super::{Error, ReconciliationReport, today};

/// Applies the rental status rules for the clock's current day.
#[derive(Clone)]
pub struct RentalReconciler {
    rentals: Arc<dyn RentalRepository>,
    clock: Arc<dyn Clock>,
}

impl RentalReconciler {
    /// Create the reconciler.
    pub fn new(rentals: Arc<dyn RentalRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { rentals, clock }
    }

    /// Run one pass for today.
    pub async fn reconcile(&self) -> Result<ReconciliationReport, Error> {
        let today = today(self.clock.as_ref());
        let report = self.rentals.reconcile_statuses(today).await?;
        if report.completed > 0 {
            info!(%today, completed = report.completed, ongoing = report.ongoing, "rentals reconciled");
        } else {
            debug!(%today, ongoing = report.ongoing, "rentals reconciled");
        }
        Ok(report)
    }

    /// Run one pass after a write, logging rather than propagating failure.
    pub async fn reconcile_after_write(&self) {
        if let Err(error) = self.reconcile().await {
            warn!(%error, "rental reconciliation after write failed");
        }
    }

    /// Reconcile forever, once per `interval`, starting immediately.
    pub async fn run_every(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.reconcile_after_write().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockRentalRepository, RentalRepositoryError};
    use crate::test_support::FixedClock;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 4).expect("valid date")
    }

    #[tokio::test]
    async fn passes_the_clock_day_to_the_store() {
        let mut rentals = MockRentalRepository::new();
        rentals
            .expect_reconcile_statuses()
            .withf(|today| *today == day())
            .times(1)
            .returning(|_| {
                Ok(ReconciliationReport {
                    completed: 2,
                    ongoing: 1,
                })
            });
        let reconciler = RentalReconciler::new(Arc::new(rentals), Arc::new(FixedClock::on(day())));
        let report = reconciler.reconcile().await.expect("reconciled");
        assert_eq!(report.completed, 2);
    }

    #[tokio::test]
    async fn store_failures_map_to_domain_errors() {
        let mut rentals = MockRentalRepository::new();
        rentals
            .expect_reconcile_statuses()
            .returning(|_| Err(RentalRepositoryError::connection("pool closed")));
        let reconciler = RentalReconciler::new(Arc::new(rentals), Arc::new(FixedClock::on(day())));
        let err = reconciler.reconcile().await.expect_err("store down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        reconciler.reconcile_after_write().await;
    }
}
