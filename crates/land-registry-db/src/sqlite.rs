//! SQLite implementation of RegistryRepository
//!
//! Each write runs in a single transaction on the pool. A transaction that is
//! dropped before `commit` rolls back, so early returns through `?` never
//! leave partial rows behind.
//!
//! Every write transaction opens with a write statement. SQLite can wait on
//! the busy timeout for a writer lock, but a transaction that has already
//! read from a WAL snapshot fails with `SQLITE_BUSY` when it tries to write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use land_registry_core::{
    Asset, AssetId, AssetVersion, Evidence, EvidenceId, NewAsset, NewEvidence, NewVersion, Page,
    VersionId,
};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use tracing::{debug, instrument};

use crate::error::{DbError, DbResult};
use crate::repository::{RegistryRepository, RegistryStats};

const ASSET_COLUMNS: &str =
    "id, name, owner, location_lat, location_lon, size_hectares, created_at";

const VERSION_COLUMNS: &str = "id, asset_id, name, owner, change_reason, changed_at";

const EVIDENCE_COLUMNS: &str =
    "id, asset_id, evidence_type, description, gps_lat, gps_lon, timestamp";

/// SQLite implementation of RegistryRepository
#[derive(Debug, Clone)]
pub struct SqliteRegistryRepository {
    pool: SqlitePool,
}

impl SqliteRegistryRepository {
    /// Create a new SQLite registry repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RegistryRepository for SqliteRegistryRepository {
    #[instrument(skip(self, asset, genesis), fields(asset_name = %asset.name))]
    async fn create_asset(
        &self,
        asset: &NewAsset,
        genesis: &NewVersion,
    ) -> DbResult<(Asset, AssetVersion)> {
        debug!("Creating asset with genesis version");

        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let asset_id = sqlx::query(
            r#"
            INSERT INTO assets (name, owner, location_lat, location_lon, size_hectares, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&asset.name)
        .bind(&asset.owner)
        .bind(asset.location_lat)
        .bind(asset.location_lon)
        .bind(asset.size_hectares)
        .bind(created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let asset_id = AssetId::new(asset_id);
        let version = insert_version(&mut tx, asset_id, genesis, created_at).await?;
        let stored = fetch_asset(&mut tx, asset_id).await?;

        commit(tx).await?;

        debug!(asset_id = %stored.id, version_id = %version.id, "Asset created");
        Ok((stored, version))
    }

    #[instrument(skip(self, version), fields(asset_id = %id))]
    async fn record_change(
        &self,
        id: AssetId,
        version: &NewVersion,
    ) -> DbResult<(Asset, AssetVersion)> {
        debug!("Recording asset change");

        let mut tx = self.pool.begin().await?;

        // Takes the write lock and doubles as the existence check
        let updated = sqlx::query("UPDATE assets SET name = ?, owner = ? WHERE id = ?")
            .bind(&version.name)
            .bind(&version.owner)
            .bind(id.get())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(DbError::NotFound(format!("asset {}", id)));
        }

        // Per-asset history timestamps never go backwards, even if the clock does
        let latest: Option<DateTime<Utc>> = sqlx::query(
            "SELECT changed_at FROM asset_versions WHERE asset_id = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await?
        .map(|row| row.try_get("changed_at"))
        .transpose()?;

        let now = Utc::now();
        let changed_at = latest.map_or(now, |latest| latest.max(now));

        let appended = insert_version(&mut tx, id, version, changed_at).await?;
        let asset = fetch_asset(&mut tx, id).await?;

        commit(tx).await?;

        debug!(version_id = %appended.id, "Asset change recorded");
        Ok((asset, appended))
    }

    #[instrument(skip(self), fields(asset_id = %id))]
    async fn find_asset(&self, id: AssetId) -> DbResult<Option<Asset>> {
        debug!("Finding asset by ID");

        let row = sqlx::query(&format!("SELECT {} FROM assets WHERE id = ?", ASSET_COLUMNS))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_asset).transpose()
    }

    #[instrument(skip(self), fields(offset = page.offset(), limit = page.limit()))]
    async fn list_assets(&self, page: Page) -> DbResult<Vec<Asset>> {
        debug!("Listing assets");

        let rows = sqlx::query(&format!(
            "SELECT {} FROM assets ORDER BY id ASC LIMIT ? OFFSET ?",
            ASSET_COLUMNS
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_asset).collect()
    }

    #[instrument(skip(self, evidence), fields(asset_id = %evidence.asset_id, evidence_type = %evidence.evidence_type))]
    async fn insert_evidence(&self, evidence: &NewEvidence) -> DbResult<Evidence> {
        debug!("Logging evidence");

        let timestamp = Utc::now();
        let mut tx = self.pool.begin().await?;

        // The existence check rides on the INSERT so the write lock is taken first
        let inserted = sqlx::query(
            r#"
            INSERT INTO evidence (asset_id, evidence_type, description, gps_lat, gps_lon, timestamp)
            SELECT ?, ?, ?, ?, ?, ?
            WHERE EXISTS (SELECT 1 FROM assets WHERE id = ?)
            "#,
        )
        .bind(evidence.asset_id.get())
        .bind(&evidence.evidence_type)
        .bind(&evidence.description)
        .bind(evidence.gps_lat)
        .bind(evidence.gps_lon)
        .bind(timestamp)
        .bind(evidence.asset_id.get())
        .execute(&mut *tx)
        .await?;
        if inserted.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("asset {}", evidence.asset_id)));
        }
        let evidence_id = inserted.last_insert_rowid();

        let row = sqlx::query(&format!(
            "SELECT {} FROM evidence WHERE id = ?",
            EVIDENCE_COLUMNS
        ))
        .bind(evidence_id)
        .fetch_one(&mut *tx)
        .await?;
        let stored = row_to_evidence(row)?;

        commit(tx).await?;

        debug!(evidence_id = %stored.id, "Evidence logged");
        Ok(stored)
    }

    #[instrument(skip(self), fields(offset = page.offset(), limit = page.limit()))]
    async fn list_evidence(&self, page: Page) -> DbResult<Vec<Evidence>> {
        debug!("Listing evidence");

        let rows = sqlx::query(&format!(
            "SELECT {} FROM evidence ORDER BY id ASC LIMIT ? OFFSET ?",
            EVIDENCE_COLUMNS
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_evidence).collect()
    }

    #[instrument(skip(self), fields(asset_id = %id))]
    async fn versions_for_asset(&self, id: AssetId) -> DbResult<Vec<AssetVersion>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM asset_versions WHERE asset_id = ? ORDER BY id ASC",
            VERSION_COLUMNS
        ))
        .bind(id.get())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_version).collect()
    }

    #[instrument(skip(self), fields(asset_id = %id))]
    async fn evidence_for_asset(&self, id: AssetId) -> DbResult<Vec<Evidence>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM evidence WHERE asset_id = ? ORDER BY id ASC",
            EVIDENCE_COLUMNS
        ))
        .bind(id.get())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_evidence).collect()
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> DbResult<RegistryStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM assets) AS assets,
                (SELECT COUNT(*) FROM asset_versions) AS versions,
                (SELECT COUNT(*) FROM evidence) AS evidence
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(RegistryStats {
            assets: row.try_get("assets")?,
            versions: row.try_get("versions")?,
            evidence: row.try_get("evidence")?,
        })
    }

    async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::Connection(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

async fn commit(tx: Transaction<'_, Sqlite>) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(|e| DbError::Transaction(format!("Commit failed: {}", e)))
}

async fn insert_version(
    tx: &mut Transaction<'_, Sqlite>,
    asset_id: AssetId,
    version: &NewVersion,
    changed_at: DateTime<Utc>,
) -> DbResult<AssetVersion> {
    let id = sqlx::query(
        r#"
        INSERT INTO asset_versions (asset_id, name, owner, change_reason, changed_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(asset_id.get())
    .bind(&version.name)
    .bind(&version.owner)
    .bind(&version.change_reason)
    .bind(changed_at)
    .execute(&mut **tx)
    .await?
    .last_insert_rowid();

    let row = sqlx::query(&format!(
        "SELECT {} FROM asset_versions WHERE id = ?",
        VERSION_COLUMNS
    ))
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    row_to_version(row)
}

async fn fetch_asset(tx: &mut Transaction<'_, Sqlite>, id: AssetId) -> DbResult<Asset> {
    let row = sqlx::query(&format!("SELECT {} FROM assets WHERE id = ?", ASSET_COLUMNS))
        .bind(id.get())
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("asset {}", id)))?;

    row_to_asset(row)
}

fn row_to_asset(row: SqliteRow) -> DbResult<Asset> {
    Ok(Asset {
        id: AssetId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        owner: row.try_get("owner")?,
        location_lat: row.try_get("location_lat")?,
        location_lon: row.try_get("location_lon")?,
        size_hectares: row.try_get("size_hectares")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_version(row: SqliteRow) -> DbResult<AssetVersion> {
    Ok(AssetVersion {
        id: VersionId::new(row.try_get("id")?),
        asset_id: AssetId::new(row.try_get("asset_id")?),
        name: row.try_get("name")?,
        owner: row.try_get("owner")?,
        change_reason: row.try_get("change_reason")?,
        changed_at: row.try_get("changed_at")?,
    })
}

fn row_to_evidence(row: SqliteRow) -> DbResult<Evidence> {
    Ok(Evidence {
        id: EvidenceId::new(row.try_get("id")?),
        asset_id: AssetId::new(row.try_get("asset_id")?),
        evidence_type: row.try_get("evidence_type")?,
        description: row.try_get("description")?,
        gps_lat: row.try_get("gps_lat")?,
        gps_lon: row.try_get("gps_lon")?,
        timestamp: row.try_get("timestamp")?,
    })
}
