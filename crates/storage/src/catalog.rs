//! Relational profile store using PostgreSQL.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use argo_common::{ProfileRecord, QcFlag};

use crate::error::{PersistenceError, PersistenceResult};

/// Identity of a stored profile, as needed for duplicate handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StoredProfile {
    pub id: Uuid,
    pub platform_number: String,
    pub cycle_number: i32,
    pub measurement_date: DateTime<Utc>,
}

/// A (platform, cycle) pair stored more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub platform_number: String,
    pub cycle_number: i32,
    pub count: u64,
}

/// Durable storage for sanitized profile records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Persist one record and return its new identifier.
    async fn insert_profile(&self, record: &ProfileRecord) -> PersistenceResult<Uuid>;

    /// Total number of stored profiles.
    async fn count_profiles(&self) -> PersistenceResult<u64>;

    /// Profile counts keyed by ocean region label.
    async fn regional_distribution(&self) -> PersistenceResult<BTreeMap<String, u64>>;

    /// All (platform, cycle) pairs with more than one stored profile.
    async fn duplicate_groups(&self) -> PersistenceResult<Vec<DuplicateGroup>>;

    /// Stored profiles of one platform cycle, newest measurement first.
    async fn profiles_for(
        &self,
        platform_number: &str,
        cycle_number: i32,
    ) -> PersistenceResult<Vec<StoredProfile>>;

    /// Remove a batch of profiles as one unit and return how many were removed.
    ///
    /// Either every id is removed or none is. An unknown id fails the batch
    /// with `NotFound`.
    async fn delete_profiles(&self, ids: &[Uuid]) -> PersistenceResult<u64>;
}

/// Profile store backed by a PostgreSQL pool.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    /// Create a new store connection from database URL.
    pub async fn connect(database_url: &str, max_connections: u32) -> PersistenceResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| PersistenceError::DatabaseError(format!("Connection failed: {}", e)))?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for sharing with [`PgSearchIndex`](crate::PgSearchIndex).
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> PersistenceResult<()> {
        // Split SQL statements and execute them individually
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| {
                        PersistenceError::DatabaseError(format!("Migration failed: {}", e))
                    })?;
            }
        }

        info!("Profile store schema ready");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn insert_profile(&self, record: &ProfileRecord) -> PersistenceResult<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO argo_profiles (
                profile_id, platform_number, cycle_number,
                latitude, longitude, measurement_date,
                pressure_levels, temperature, salinity,
                temp_qc, psal_qc,
                absolute_salinity, conservative_temperature, potential_density,
                mixed_layer_depth, max_depth, ocean_region,
                data_source, processing_date, profile_metadata
            ) VALUES (
                $1, $2, $3,
                $4, $5, $6,
                $7, $8, $9,
                $10, $11,
                $12, $13, $14,
                $15, $16, $17,
                $18, $19, $20
            )
            "#,
        )
        .bind(id)
        .bind(&record.platform_number)
        .bind(record.cycle_number)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.measurement_date)
        .bind(&record.pressure_levels)
        .bind(&record.temperature)
        .bind(&record.salinity)
        .bind(qc_codes(&record.temp_qc))
        .bind(qc_codes(&record.psal_qc))
        .bind(&record.absolute_salinity)
        .bind(&record.conservative_temperature)
        .bind(&record.potential_density)
        .bind(record.mixed_layer_depth)
        .bind(record.max_depth)
        .bind(record.ocean_region.as_str())
        .bind(&record.data_source)
        .bind(Utc::now())
        .bind(&record.metadata)
        .execute(&self.pool)
        .await
        .map_err(|e| PersistenceError::DatabaseError(format!("Insert failed: {}", e)))?;

        debug!(
            profile_id = %id,
            platform = %record.platform_number,
            cycle = record.cycle_number,
            "Inserted profile"
        );
        Ok(id)
    }

    async fn count_profiles(&self) -> PersistenceResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM argo_profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PersistenceError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(count.max(0) as u64)
    }

    async fn regional_distribution(&self) -> PersistenceResult<BTreeMap<String, u64>> {
        let rows = sqlx::query_as::<_, (Option<String>, i64)>(
            "SELECT ocean_region, COUNT(*) FROM argo_profiles GROUP BY ocean_region",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(region, count)| {
                (
                    region.unwrap_or_else(|| "Unknown".to_string()),
                    count.max(0) as u64,
                )
            })
            .collect())
    }

    async fn duplicate_groups(&self) -> PersistenceResult<Vec<DuplicateGroup>> {
        let rows = sqlx::query_as::<_, (String, i32, i64)>(
            "SELECT platform_number, cycle_number, COUNT(*) FROM argo_profiles \
             GROUP BY platform_number, cycle_number \
             HAVING COUNT(*) > 1 \
             ORDER BY platform_number, cycle_number",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(platform_number, cycle_number, count)| DuplicateGroup {
                platform_number,
                cycle_number,
                count: count.max(0) as u64,
            })
            .collect())
    }

    async fn profiles_for(
        &self,
        platform_number: &str,
        cycle_number: i32,
    ) -> PersistenceResult<Vec<StoredProfile>> {
        sqlx::query_as::<_, StoredProfile>(
            "SELECT profile_id AS id, platform_number, cycle_number, measurement_date \
             FROM argo_profiles \
             WHERE platform_number = $1 AND cycle_number = $2 \
             ORDER BY measurement_date DESC",
        )
        .bind(platform_number)
        .bind(cycle_number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::DatabaseError(format!("Query failed: {}", e)))
    }

    async fn delete_profiles(&self, ids: &[Uuid]) -> PersistenceResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PersistenceError::DatabaseError(format!("Begin failed: {}", e)))?;

        // Dropping `tx` on an early return rolls the batch back.
        for &id in ids {
            let result = sqlx::query("DELETE FROM argo_profiles WHERE profile_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| PersistenceError::DatabaseError(format!("Delete failed: {}", e)))?;

            if result.rows_affected() == 0 {
                return Err(PersistenceError::NotFound(id));
            }
        }

        tx.commit()
            .await
            .map_err(|e| PersistenceError::DatabaseError(format!("Commit failed: {}", e)))?;

        debug!(count = ids.len(), "Deleted profiles");
        Ok(ids.len() as u64)
    }
}

/// QC flags as stored: numeric codes, NULL where the flag was unreadable.
fn qc_codes(flags: &[Option<QcFlag>]) -> Vec<Option<i32>> {
    flags
        .iter()
        .map(|flag| flag.map(|f| f.code() as i32))
        .collect()
}

/// Database schema SQL.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS argo_profiles (
    profile_id UUID PRIMARY KEY,
    platform_number VARCHAR(20) NOT NULL,
    cycle_number INTEGER NOT NULL,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    measurement_date TIMESTAMPTZ NOT NULL,

    pressure_levels DOUBLE PRECISION[] NOT NULL,
    temperature DOUBLE PRECISION[] NOT NULL,
    salinity DOUBLE PRECISION[] NOT NULL,

    temp_qc INTEGER[],
    psal_qc INTEGER[],

    absolute_salinity DOUBLE PRECISION[],
    conservative_temperature DOUBLE PRECISION[],
    potential_density DOUBLE PRECISION[],

    mixed_layer_depth DOUBLE PRECISION,
    max_depth DOUBLE PRECISION,
    ocean_region VARCHAR(50),

    data_source VARCHAR(100),
    processing_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    profile_metadata JSONB
);

CREATE INDEX IF NOT EXISTS idx_argo_profiles_platform ON argo_profiles(platform_number, cycle_number);
CREATE INDEX IF NOT EXISTS idx_argo_profiles_position ON argo_profiles(latitude, longitude);
CREATE INDEX IF NOT EXISTS idx_argo_profiles_date ON argo_profiles(measurement_date DESC);
CREATE INDEX IF NOT EXISTS idx_argo_profiles_region ON argo_profiles(ocean_region)
"#;
