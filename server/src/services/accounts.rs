//! Account directory — existence pre-check against mirrored account records.
//!
//! The `users` table is kept in sync by the identity backend; this service
//! only ever reads it, and only to answer "does this email already have an
//! account" ahead of a registration call.

use sqlx::{PgPool, Row};
use uuid::Uuid;

/// A registered-account record as mirrored from the identity backend.
#[derive(Clone, Debug, serde::Serialize)]
pub struct AccountRecord {
    pub id: Uuid,
    pub email: String,
}

/// Query-by-email capability of the account records store.
#[async_trait::async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Return every account record matching the given email (zero or more).
    async fn find_by_email(&self, email: &str) -> Result<Vec<AccountRecord>, sqlx::Error>;
}

/// Postgres-backed directory over the mirrored `users` table.
pub struct PgAccounts {
    pool: PgPool,
}

impl PgAccounts {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AccountDirectory for PgAccounts {
    async fn find_by_email(&self, email: &str) -> Result<Vec<AccountRecord>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, email FROM users WHERE email = $1")
            .bind(email)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| AccountRecord { id: row.get("id"), email: row.get("email") })
            .collect())
    }
}
