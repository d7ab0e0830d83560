//! Beneficiary registration and lookup.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, is_unique_violation},
    ids,
    models::beneficiary::{Beneficiary, BeneficiaryRequest},
    validation::{is_valid_account_number, is_valid_ifsc, required},
};

/// Validated beneficiary fields ready to insert.
struct NewBeneficiary<'a> {
    bene_id: String,
    name: &'a str,
    bank_account: &'a str,
    ifsc: &'a str,
}

fn validate(request: &BeneficiaryRequest) -> Result<NewBeneficiary<'_>, AppError> {
    let (Some(name), Some(bank_account), Some(ifsc)) = (
        required(&request.name),
        required(&request.bank_account),
        required(&request.ifsc),
    ) else {
        return Err(AppError::Validation(
            "Missing required fields: name, bankAccount, ifsc".to_string(),
        ));
    };

    if !is_valid_account_number(bank_account) {
        return Err(AppError::Validation(
            "Invalid bank account number format".to_string(),
        ));
    }
    if !is_valid_ifsc(ifsc) {
        return Err(AppError::Validation("Invalid IFSC code format".to_string()));
    }

    let bene_id = required(&request.bene_id)
        .map(str::to_string)
        .unwrap_or_else(ids::generate_bene_id);

    Ok(NewBeneficiary {
        bene_id,
        name,
        bank_account,
        ifsc,
    })
}

async fn insert(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    new: &NewBeneficiary<'_>,
    request: &BeneficiaryRequest,
    now: DateTime<Utc>,
) -> Result<Beneficiary, AppError> {
    let optional = |v: &Option<String>| v.clone().unwrap_or_default();

    sqlx::query_as::<_, Beneficiary>(
        r#"
        INSERT INTO beneficiaries (
            id, user_id, bene_id, name, email, phone, bank_account, ifsc,
            address1, city, state, pincode, status, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'ACTIVE', ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&new.bene_id)
    .bind(new.name)
    .bind(optional(&request.email))
    .bind(optional(&request.phone))
    .bind(new.bank_account)
    .bind(new.ifsc)
    .bind(optional(&request.address1))
    .bind(optional(&request.city))
    .bind(optional(&request.state))
    .bind(optional(&request.pincode))
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::BeneficiaryExists
        } else {
            AppError::Database(e)
        }
    })
}

/// Register a beneficiary for the caller.
///
/// # Errors
///
/// - `Validation`: missing name/bankAccount/ifsc or bad formats
/// - `BeneficiaryExists`: the caller already has this account number, or the beneId is taken
pub async fn add_beneficiary(
    pool: &DbPool,
    user_id: Uuid,
    request: BeneficiaryRequest,
) -> Result<Beneficiary, AppError> {
    let new = validate(&request)?;

    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM beneficiaries WHERE user_id = ? AND bank_account = ?",
    )
    .bind(user_id)
    .bind(new.bank_account)
    .fetch_one(pool)
    .await?;
    if existing > 0 {
        return Err(AppError::BeneficiaryExists);
    }

    let mut conn = pool.acquire().await?;
    let beneficiary = insert(&mut conn, user_id, &new, &request, Utc::now()).await?;

    tracing::info!(%user_id, bene_id = %beneficiary.bene_id, "beneficiary added");
    Ok(beneficiary)
}

/// All of the caller's beneficiaries, newest first.
pub async fn list_beneficiaries(pool: &DbPool, user_id: Uuid) -> Result<Vec<Beneficiary>, AppError> {
    let beneficiaries = sqlx::query_as::<_, Beneficiary>(
        "SELECT * FROM beneficiaries WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(beneficiaries)
}

/// Resolve the destination of a payout inside the payout's database transaction.
///
/// Looks the beneficiary up by `beneId` (or, when no `beneId` is given, by
/// account number). If none exists, one is created from the supplied details.
pub async fn find_or_create(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    details: &BeneficiaryRequest,
    now: DateTime<Utc>,
) -> Result<Beneficiary, AppError> {
    let existing = if let Some(bene_id) = required(&details.bene_id) {
        sqlx::query_as::<_, Beneficiary>(
            "SELECT * FROM beneficiaries WHERE user_id = ? AND bene_id = ?",
        )
        .bind(user_id)
        .bind(bene_id)
        .fetch_optional(&mut *conn)
        .await?
    } else if let Some(bank_account) = required(&details.bank_account) {
        sqlx::query_as::<_, Beneficiary>(
            "SELECT * FROM beneficiaries WHERE user_id = ? AND bank_account = ? ORDER BY created_at LIMIT 1",
        )
        .bind(user_id)
        .bind(bank_account)
        .fetch_optional(&mut *conn)
        .await?
    } else {
        None
    };

    if let Some(beneficiary) = existing {
        return Ok(beneficiary);
    }

    let new = validate(details)?;
    let beneficiary = insert(conn, user_id, &new, details, now).await?;

    tracing::info!(%user_id, bene_id = %beneficiary.bene_id, "beneficiary created from transfer details");
    Ok(beneficiary)
}
