//! Deferred resolution of payouts.
//!
//! A payout is acknowledged as `PENDING` with a persisted `settle_after`
//! deadline. The `SettlementWorker` polls for due rows and moves each one to
//! `SUCCESS` or `FAILED` exactly once.
//!
//! # Atomicity Guarantees
//!
//! The status change, the refund (on failure) and the notification are
//! written in one database transaction. The status update is conditioned on
//! `status = 'PENDING'`, so a row that was already resolved is skipped and
//! the refund can never be applied twice.

use std::{ops::Range, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use rand::{Rng, seq::IndexedRandom};
use tokio::{sync::watch, time::MissedTickBehavior};

use crate::{
    db::DbPool,
    error::AppError,
    ids,
    models::{
        notification::NotificationType,
        transaction::{Transaction, TransactionStatus},
    },
    money,
    services::notification_service,
};

/// Reasons reported for simulated settlement failures.
pub const FAILURE_REASONS: [&str; 6] = [
    "Insufficient balance in source account",
    "Invalid beneficiary account number",
    "Bank server temporarily unavailable",
    "Transaction limit exceeded",
    "Account temporarily blocked",
    "Network timeout during processing",
];

const DEFAULT_SUCCESS_RATE: f64 = 0.9;
const DEFAULT_DELAY_MS: Range<u64> = 2_000..5_000;

/// Result of settling one payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Success,
    Failed { reason: &'static str },
}

/// Source of settlement timing and outcomes.
///
/// Production uses `RandomOracle`; tests plug in a deterministic one.
pub trait SettlementOracle: Send + Sync {
    /// How long after submission a payout becomes eligible for settlement.
    fn settlement_delay(&self) -> Duration;

    /// Outcome for a payout that is being settled now.
    fn decide(&self) -> SettlementOutcome;
}

/// Random outcomes: succeeds with probability `success_rate`, otherwise
/// fails with a uniformly chosen reason. Delays are uniform in `delay_ms`.
#[derive(Debug, Clone)]
pub struct RandomOracle {
    success_rate: f64,
    delay_ms: Range<u64>,
}

impl RandomOracle {
    /// Out-of-range inputs fall back to the defaults (90% success, 2-5 s).
    pub fn new(success_rate: f64, delay_ms: Range<u64>) -> Self {
        let success_rate = if (0.0..=1.0).contains(&success_rate) {
            success_rate
        } else {
            DEFAULT_SUCCESS_RATE
        };
        let delay_ms = if delay_ms.is_empty() {
            DEFAULT_DELAY_MS
        } else {
            delay_ms
        };

        Self {
            success_rate,
            delay_ms,
        }
    }
}

impl Default for RandomOracle {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_RATE, DEFAULT_DELAY_MS)
    }
}

impl SettlementOracle for RandomOracle {
    fn settlement_delay(&self) -> Duration {
        Duration::from_millis(rand::rng().random_range(self.delay_ms.clone()))
    }

    fn decide(&self) -> SettlementOutcome {
        let mut rng = rand::rng();
        if rng.random_bool(self.success_rate) {
            SettlementOutcome::Success
        } else {
            let reason = FAILURE_REASONS
                .choose(&mut rng)
                .copied()
                .unwrap_or(FAILURE_REASONS[0]);
            SettlementOutcome::Failed { reason }
        }
    }
}

/// Background task resolving due payouts.
pub struct SettlementWorker {
    pool: DbPool,
    oracle: Arc<dyn SettlementOracle>,
    poll_interval: Duration,
    batch_size: i64,
}

impl SettlementWorker {
    pub fn new(pool: DbPool, oracle: Arc<dyn SettlementOracle>, poll_interval: Duration) -> Self {
        Self {
            pool,
            oracle,
            poll_interval,
            batch_size: 100,
        }
    }

    /// Poll until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "settlement worker started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.settle_due(Utc::now()).await {
                        tracing::error!(error = %e, "settlement poll failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("settlement worker stopped");
    }

    /// Resolve every `PENDING` payout whose deadline is at or before `now`.
    ///
    /// A failure on one row is logged and leaves that row `PENDING` for the
    /// next poll; the rest of the batch still settles. Returns the number of
    /// rows resolved by this call.
    pub async fn settle_due(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let due = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE status = ? AND settle_after IS NOT NULL AND settle_after <= ?
            ORDER BY settle_after, rowid
            LIMIT ?
            "#,
        )
        .bind(TransactionStatus::Pending.as_str())
        .bind(now)
        .bind(self.batch_size)
        .fetch_all(&self.pool)
        .await?;

        let mut settled = 0;
        for transaction in &due {
            let outcome = self.oracle.decide();
            match self.settle_one(transaction, outcome, Utc::now()).await {
                Ok(true) => settled += 1,
                Ok(false) => {
                    tracing::debug!(transfer_id = %transaction.transfer_id, "already resolved, skipping");
                }
                Err(e) => {
                    tracing::error!(
                        transfer_id = %transaction.transfer_id,
                        error = %e,
                        "settlement failed, will retry"
                    );
                }
            }
        }

        Ok(settled)
    }

    /// Apply one outcome. Returns `false` if the row was no longer `PENDING`.
    async fn settle_one(
        &self,
        transaction: &Transaction,
        outcome: SettlementOutcome,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let amount = money::format_rupees(transaction.amount_paise);
        let mut tx = self.pool.begin().await?;

        // Both branches write before reading so the write lock is taken up front
        match outcome {
            SettlementOutcome::Success => {
                let utr = ids::generate_utr(now);
                let updated = sqlx::query(
                    r#"
                    UPDATE transactions
                    SET status = ?, utr = ?, processed_at = ?
                    WHERE id = ? AND status = ?
                    "#,
                )
                .bind(TransactionStatus::Success.as_str())
                .bind(&utr)
                .bind(now)
                .bind(transaction.id)
                .bind(TransactionStatus::Pending.as_str())
                .execute(&mut *tx)
                .await?
                .rows_affected();

                if updated == 0 {
                    return Ok(false);
                }

                notification_service::create_notification(
                    &mut *tx,
                    transaction.user_id,
                    NotificationType::WithdrawalSuccess,
                    "Withdrawal Successful",
                    &format!(
                        "Your withdrawal of {amount} has been processed successfully. UTR: {utr}"
                    ),
                    transaction.created_at,
                )
                .await?;

                tx.commit().await?;
                tracing::info!(transfer_id = %transaction.transfer_id, %utr, "payout settled");
            }
            SettlementOutcome::Failed { reason } => {
                let updated = sqlx::query(
                    r#"
                    UPDATE transactions
                    SET status = ?, failure_reason = ?, processed_at = ?
                    WHERE id = ? AND status = ?
                    "#,
                )
                .bind(TransactionStatus::Failed.as_str())
                .bind(reason)
                .bind(now)
                .bind(transaction.id)
                .bind(TransactionStatus::Pending.as_str())
                .execute(&mut *tx)
                .await?
                .rows_affected();

                if updated == 0 {
                    return Ok(false);
                }

                // Refund exactly what was debited at submission
                sqlx::query(
                    r#"
                    UPDATE users
                    SET wallet_balance_paise = wallet_balance_paise + ?,
                        updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(transaction.amount_paise)
                .bind(now)
                .bind(transaction.user_id)
                .execute(&mut *tx)
                .await?;

                notification_service::create_notification(
                    &mut *tx,
                    transaction.user_id,
                    NotificationType::WithdrawalFailed,
                    "Withdrawal Failed",
                    &format!(
                        "Your withdrawal of {amount} failed. Reason: {reason}. Amount refunded to wallet."
                    ),
                    transaction.created_at,
                )
                .await?;

                tx.commit().await?;
                tracing::warn!(transfer_id = %transaction.transfer_id, reason, "payout failed and refunded");
            }
        }

        Ok(true)
    }
}
