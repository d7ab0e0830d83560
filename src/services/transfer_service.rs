//! Payout submission and status lookup.
//!
//! This service handles the synchronous phase of a payout:
//! - Request validation and amount bounds
//! - Balance and duplicate-id checks
//! - Beneficiary resolution
//! - Atomic debit plus `PENDING` transaction
//!
//! Resolution happens later in `services::settlement`.

use chrono::{TimeDelta, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, is_unique_violation},
    models::{
        notification::NotificationType,
        transaction::{
            CreateTransferRequest, Transaction, TransactionStatus, TransferAck, TransferMode,
        },
    },
    money,
    services::{beneficiary_service, notification_service, settlement::SettlementOracle},
    validation::required,
};

/// Accept a payout and debit the wallet.
///
/// # Process
///
/// 1. Check required fields and amount bounds (0 < amount ≤ ₹2,00,000)
/// 2. Check balance and that `transferId` is unused
/// 3. Start database transaction
/// 4. Debit the wallet (guarded so it can never go negative)
/// 5. Find or create the beneficiary
/// 6. Insert the `PENDING` transaction with its settlement deadline
/// 7. Raise `LOW_BALANCE` if the new balance is under ₹1,000
/// 8. Commit
///
/// The debit is the first statement of the transaction, so the SQLite write
/// lock is taken before anything is read. Concurrent submissions queue on
/// the busy timeout instead of failing a read-to-write lock upgrade.
///
/// # Errors
///
/// - `Validation`: missing fields, bad amount, bad beneficiary details
/// - `InsufficientBalance`: wallet holds less than the amount
/// - `DuplicateTransfer`: `transferId` already used
pub async fn submit_transfer(
    pool: &DbPool,
    oracle: &dyn SettlementOracle,
    user_id: Uuid,
    request: CreateTransferRequest,
) -> Result<TransferAck, AppError> {
    let (Some(transfer_id), Some(amount), Some(bene_details)) = (
        required(&request.transfer_id),
        request.amount,
        request.bene_details.as_ref(),
    ) else {
        return Err(AppError::Validation(
            "Missing required fields: transferId, amount, beneDetails".to_string(),
        ));
    };

    if amount <= Decimal::ZERO {
        return Err(AppError::Validation(
            "Amount must be greater than 0".to_string(),
        ));
    }
    if amount > money::from_paise(money::MAX_TRANSFER_PAISE) {
        return Err(AppError::Validation(
            "Amount exceeds maximum limit of ₹2,00,000".to_string(),
        ));
    }
    let amount_paise = money::to_paise(amount)?;

    let balance: i64 = sqlx::query_scalar("SELECT wallet_balance_paise FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::UserNotFound)?;
    if balance < amount_paise {
        return Err(AppError::InsufficientBalance);
    }

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE transfer_id = ?")
        .bind(transfer_id)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Err(AppError::DuplicateTransfer);
    }

    let now = Utc::now();
    let settle_after = now
        + TimeDelta::from_std(oracle.settlement_delay())
            .map_err(|e| AppError::Internal(format!("Invalid settlement delay: {e}")))?;
    let mode = TransferMode::from_request(request.transfer_mode.as_deref());
    let remarks = request.remarks.clone().unwrap_or_default();

    let mut tx = pool.begin().await?;

    // A concurrent payout may have spent the balance since the check above
    let new_balance: i64 = sqlx::query_scalar(
        r#"
        UPDATE users
        SET wallet_balance_paise = wallet_balance_paise - ?,
            updated_at = ?
        WHERE id = ? AND wallet_balance_paise >= ?
        RETURNING wallet_balance_paise
        "#,
    )
    .bind(amount_paise)
    .bind(now)
    .bind(user_id)
    .bind(amount_paise)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::InsufficientBalance)?;

    let beneficiary = beneficiary_service::find_or_create(&mut *tx, user_id, bene_details, now).await?;

    let bank_account_id: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM bank_accounts WHERE user_id = ? AND account_number = ?",
    )
    .bind(user_id)
    .bind(&beneficiary.bank_account)
    .fetch_optional(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, user_id, transfer_id, amount_paise, status, transfer_mode, remarks,
            beneficiary_id, bank_account_id, settle_after, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(transfer_id)
    .bind(amount_paise)
    .bind(TransactionStatus::Pending.as_str())
    .bind(mode.as_str())
    .bind(&remarks)
    .bind(beneficiary.id)
    .bind(bank_account_id)
    .bind(settle_after)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::DuplicateTransfer
        } else {
            AppError::Database(e)
        }
    })?;

    if new_balance < money::LOW_BALANCE_THRESHOLD_PAISE {
        notification_service::create_notification(
            &mut *tx,
            user_id,
            NotificationType::LowBalance,
            "Low Wallet Balance",
            &format!(
                "Your wallet balance is low ({}). Please add money to continue transactions.",
                money::format_rupees(new_balance)
            ),
            now,
        )
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        %user_id,
        transfer_id,
        amount_paise,
        mode = mode.as_str(),
        bene_id = %beneficiary.bene_id,
        %settle_after,
        "payout accepted"
    );

    Ok(TransferAck {
        reference_id: transfer_id.to_string(),
        acknowledged: 1,
    })
}

/// Look up one of the caller's payouts by its client-chosen id.
pub async fn get_transfer_status(
    pool: &DbPool,
    user_id: Uuid,
    transfer_id: &str,
) -> Result<Transaction, AppError> {
    sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE transfer_id = ? AND user_id = ?",
    )
    .bind(transfer_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::TransferNotFound)
}
