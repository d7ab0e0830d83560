//! Wallet operations: balance, add-money, saved bank accounts and history.
//!
//! # Atomicity Guarantees
//!
//! Add-money credits the balance, records the deposit transaction and writes
//! the notification in a single database transaction.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, is_unique_violation},
    ids,
    models::{
        bank_account::{ACCOUNT_TYPES, BankAccount, CreateBankAccountRequest},
        notification::NotificationType,
        response::{PageQuery, Pagination},
        transaction::{
            AddMoneyRequest, AddMoneyResponse, TransactionHistoryResponse, TransactionHistoryRow,
            TransactionStatus, TransferMode,
        },
    },
    money,
    services::notification_service,
    validation::{is_valid_account_number, is_valid_ifsc, required},
};

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Current wallet balance in paise.
pub async fn get_balance(pool: &DbPool, user_id: Uuid) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT wallet_balance_paise FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Credit the wallet (testing aid for topping up).
///
/// # Process
///
/// 1. Validate amount: present, positive, at most ₹50,000, at most 2 decimals
/// 2. Start database transaction
/// 3. Increment the balance in SQL and read the new value back
/// 4. Record a `SUCCESS` `DEPOSIT` transaction
/// 5. Record a `DEPOSIT_SUCCESS` notification
/// 6. Commit
pub async fn add_money(
    pool: &DbPool,
    user_id: Uuid,
    request: AddMoneyRequest,
) -> Result<AddMoneyResponse, AppError> {
    let amount = match request.amount {
        Some(amount) if amount > Decimal::ZERO => amount,
        _ => return Err(AppError::Validation("Valid amount is required".to_string())),
    };
    let amount_paise = money::to_paise(amount)?;
    if amount_paise > money::MAX_DEPOSIT_PAISE {
        return Err(AppError::AmountLimitExceeded(
            "Amount cannot exceed ₹50,000".to_string(),
        ));
    }

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let new_balance: i64 = sqlx::query_scalar(
        r#"
        UPDATE users
        SET wallet_balance_paise = wallet_balance_paise + ?,
            updated_at = ?
        WHERE id = ?
        RETURNING wallet_balance_paise
        "#,
    )
    .bind(amount_paise)
    .bind(now)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::UserNotFound)?;

    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, user_id, transfer_id, amount_paise, status, transfer_mode,
            remarks, created_at, processed_at
        )
        VALUES (?, ?, ?, ?, ?, ?, 'Money added to wallet', ?, ?)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(ids::generate_deposit_transfer_id(now))
    .bind(amount_paise)
    .bind(TransactionStatus::Success.as_str())
    .bind(TransferMode::Deposit.as_str())
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    notification_service::create_notification(
        &mut *tx,
        user_id,
        NotificationType::DepositSuccess,
        "Money Added Successfully",
        &format!(
            "{} has been added to your wallet successfully.",
            money::format_rupees(amount_paise)
        ),
        now,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(%user_id, amount_paise, new_balance, "wallet credited");

    Ok(AddMoneyResponse {
        amount_added: money::from_paise(amount_paise),
        new_balance: money::from_paise(new_balance),
        currency: money::CURRENCY,
    })
}

/// The caller's saved bank accounts, newest first (unmasked; masking happens
/// in the response conversion).
pub async fn list_bank_accounts(pool: &DbPool, user_id: Uuid) -> Result<Vec<BankAccount>, AppError> {
    let accounts = sqlx::query_as::<_, BankAccount>(
        "SELECT * FROM bank_accounts WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(accounts)
}

/// Save a bank account and raise an `ACCOUNT_ADDED` notification.
///
/// # Errors
///
/// - `Validation`: missing fields, bad account number/IFSC, unknown account type
/// - `BankAccountExists`: the caller already saved this account number
pub async fn add_bank_account(
    pool: &DbPool,
    user_id: Uuid,
    request: CreateBankAccountRequest,
) -> Result<BankAccount, AppError> {
    let (Some(holder), Some(account_number), Some(ifsc), Some(bank_name)) = (
        required(&request.account_holder_name),
        required(&request.account_number),
        required(&request.ifsc_code),
        required(&request.bank_name),
    ) else {
        return Err(AppError::Validation("All fields are required".to_string()));
    };

    if !is_valid_account_number(account_number) {
        return Err(AppError::Validation(
            "Invalid account number format".to_string(),
        ));
    }
    if !is_valid_ifsc(ifsc) {
        return Err(AppError::Validation("Invalid IFSC code format".to_string()));
    }

    let account_type = required(&request.account_type).unwrap_or(ACCOUNT_TYPES[0]);
    if !ACCOUNT_TYPES.contains(&account_type) {
        return Err(AppError::Validation(
            "Account type must be savings or current".to_string(),
        ));
    }

    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bank_accounts WHERE user_id = ? AND account_number = ?",
    )
    .bind(user_id)
    .bind(account_number)
    .fetch_one(pool)
    .await?;
    if existing > 0 {
        return Err(AppError::BankAccountExists);
    }

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let account = sqlx::query_as::<_, BankAccount>(
        r#"
        INSERT INTO bank_accounts (
            id, user_id, account_holder_name, account_number, ifsc_code,
            bank_name, account_type, verified, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(holder)
    .bind(account_number)
    .bind(ifsc)
    .bind(bank_name)
    .bind(account_type)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::BankAccountExists
        } else {
            AppError::Database(e)
        }
    })?;

    let last_four: String = {
        let len = account_number.chars().count();
        account_number.chars().skip(len.saturating_sub(4)).collect()
    };
    notification_service::create_notification(
        &mut *tx,
        user_id,
        NotificationType::AccountAdded,
        "Bank Account Added",
        &format!(
            "Your {bank_name} account ending with {last_four} has been successfully added."
        ),
        now,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(%user_id, account_id = %account.id, "bank account added");
    Ok(account)
}

pub async fn delete_bank_account(
    pool: &DbPool,
    user_id: Uuid,
    account_id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM bank_accounts WHERE id = ? AND user_id = ?")
        .bind(account_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::BankAccountNotFound);
    }

    Ok(())
}

/// Newest-first page of the caller's deposits and payouts.
///
/// Destination details come from the matching saved bank account when there
/// is one, otherwise from the beneficiary.
pub async fn transaction_history(
    pool: &DbPool,
    user_id: Uuid,
    query: &PageQuery,
) -> Result<TransactionHistoryResponse, AppError> {
    let (page, limit, offset) = query.resolve(DEFAULT_PAGE_SIZE);

    let rows = sqlx::query_as::<_, TransactionHistoryRow>(
        r#"
        SELECT
            t.id, t.transfer_id, t.amount_paise, t.status, t.transfer_mode, t.remarks,
            t.utr, t.failure_reason, t.created_at, t.processed_at,
            COALESCE(ba.account_holder_name, b.name) AS account_holder_name,
            ba.bank_name AS bank_name,
            COALESCE(ba.account_number, b.bank_account) AS account_number
        FROM transactions t
        LEFT JOIN bank_accounts ba ON t.bank_account_id = ba.id
        LEFT JOIN beneficiaries b ON t.beneficiary_id = b.id
        WHERE t.user_id = ?
        ORDER BY t.created_at DESC, t.rowid DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(TransactionHistoryResponse {
        transactions: rows.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page, limit, total),
    })
}
