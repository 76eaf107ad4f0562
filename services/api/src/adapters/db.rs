//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ProfileSource` port from the `core` crate. It reads the `profiles`
//! table from PostgreSQL using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use swipe_feed_core::domain::{RawProfileRecord, Role};
use swipe_feed_core::ports::{PortError, PortResult, ProfileSource};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ProfileSource` port.
#[derive(Clone)]
pub struct PgProfileSource {
    pool: PgPool,
}

impl PgProfileSource {
    /// Creates a new `PgProfileSource`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProfileRecord {
    user_id: Uuid,
    role: Option<String>,
    company_name: Option<String>,
    company_size: Option<String>,
    company_description: Option<String>,
    full_name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    qualification: Option<String>,
    resume_uri: Option<String>,
    resume_file_name: Option<String>,
    profile_img: Option<String>,
    created_at: DateTime<Utc>,
}
impl ProfileRecord {
    fn to_domain(self) -> RawProfileRecord {
        RawProfileRecord {
            user_id: self.user_id.to_string(),
            role: self.role,
            company_name: self.company_name,
            company_size: self.company_size,
            company_description: self.company_description,
            full_name: self.full_name,
            first_name: self.first_name,
            last_name: self.last_name,
            qualification: self.qualification,
            resume_uri: self.resume_uri,
            resume_file_name: self.resume_file_name,
            profile_img: self.profile_img,
            created_at: Some(self.created_at),
        }
    }
}

const PAGE_QUERY: &str = "SELECT user_id, role, company_name, company_size, company_description, \
     full_name, first_name, last_name, qualification, resume_uri, resume_file_name, \
     profile_img, created_at \
     FROM profiles \
     WHERE role = $1 AND user_id::text <> $2 \
     ORDER BY created_at ASC, user_id ASC \
     OFFSET $3 LIMIT $4";

fn to_i64(value: usize, what: &str) -> PortResult<i64> {
    i64::try_from(value)
        .map_err(|_| PortError::Unexpected(format!("{} {} out of range", what, value)))
}

//=========================================================================================
// `ProfileSource` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProfileSource for PgProfileSource {
    async fn query(
        &self,
        role: Role,
        exclude_id: &str,
        offset: usize,
        limit: usize,
    ) -> PortResult<Vec<RawProfileRecord>> {
        let records = sqlx::query_as::<_, ProfileRecord>(PAGE_QUERY)
            .bind(role.as_str())
            .bind(exclude_id)
            .bind(to_i64(offset, "offset")?)
            .bind(to_i64(limit, "limit")?)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
