//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `UserStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use doclens_core::domain::{User, UserCredentials};
use doclens_core::ports::{PortError, PortResult, UserStore};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `UserStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps `sqlx` failures onto the port taxonomy. Postgres signals a unique
/// constraint violation with SQLSTATE 23505.
fn map_db_error(e: sqlx::Error, what: &str) -> PortError {
    match &e {
        sqlx::Error::RowNotFound => PortError::NotFound(what.to_string()),
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            PortError::Conflict(what.to_string())
        }
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            PortError::Unavailable(e.to_string())
        }
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: String,
    is_payment: bool,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            is_payment: self.is_payment,
            created_at: self.created_at,
        }
    }
}

const USER_COLUMNS: &str = "id, name, email, is_payment, created_at";

//=========================================================================================
// `UserStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserStore for DbAdapter {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        let record: UserRecord = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, &format!("User with email {email}")))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let row = sqlx::query("SELECT id, email, password_hash FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, &format!("User with email {email}")))?;

        Ok(UserCredentials {
            user_id: row.get("id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
        })
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let record: UserRecord = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, &format!("User {user_id}")))?;
        Ok(record.to_domain())
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC");
        let records: Vec<UserRecord> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "users"))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, &format!("User {user_id}")))?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {user_id}")));
        }
        Ok(())
    }

    async fn mark_payment_complete(&self, user_id: Uuid) -> PortResult<User> {
        let sql = format!(
            "UPDATE users SET is_payment = TRUE WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let record: UserRecord = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, &format!("User {user_id}")))?;
        Ok(record.to_domain())
    }
}
