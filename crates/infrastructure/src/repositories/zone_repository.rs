use async_trait::async_trait;
use ferrous_zones_application::ports::ZoneRepository;
use ferrous_zones_domain::{DomainError, Record, RecordType, Zone, ZONE_VERSION_SEQ_KEY};
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;
use tracing::{error, instrument, warn};

use super::now_text;

type ZoneRow = (i64, String, i64, i64, String, String, i64, i64, i64, i64, i64);

type RecordRow = (i64, i64, String, String, String, i64, Option<i64>);

const SELECT_ZONE: &str = "SELECT id, name, enabled, ttl, ns, admin, serial, refresh, retry, expire, version FROM zones";

const SELECT_RECORD: &str =
    "SELECT id, zone_id, name, type, value, ttl, priority FROM records";

/// SQLite zone storage. Every local write stamps the zone with the next value
/// of the `zone_version_seq` counter inside its transaction.
pub struct SqliteZoneRepository {
    pool: SqlitePool,
}

impl SqliteZoneRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_zone(row: ZoneRow) -> Zone {
        let (id, name, enabled, ttl, ns, admin, serial, refresh, retry, expire, version) = row;
        Zone {
            id: Some(id),
            name: Arc::from(name.as_str()),
            enabled: enabled != 0,
            ttl: ttl as u32,
            ns: Arc::from(ns.as_str()),
            admin: Arc::from(admin.as_str()),
            serial: serial as u32,
            refresh: refresh as u32,
            retry: retry as u32,
            expire: expire as u32,
            version,
        }
    }

    fn row_to_record(row: RecordRow) -> Option<Record> {
        let (id, zone_id, name, record_type, value, ttl, priority) = row;
        let record_type = match record_type.parse::<RecordType>() {
            Ok(rt) => rt,
            Err(e) => {
                warn!(record_id = id, error = %e, "Skipping stored record with unknown type");
                return None;
            }
        };
        Some(Record {
            id: Some(id),
            zone_id,
            name: Arc::from(name.as_str()),
            record_type,
            value: Arc::from(value.as_str()),
            ttl: ttl as u32,
            priority: priority.and_then(|p| u16::try_from(p).ok()),
        })
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        error!(error = %e, "{}", context);
        DomainError::DatabaseError(e.to_string())
    }
}

/// Allocate the next zone version. Never goes below the highest stored version,
/// so versions received from a former master are respected.
async fn next_version(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (version,) = sqlx::query_as::<_, (i64,)>(
        "INSERT INTO config (key, value, updated_at)
         VALUES (?, (SELECT COALESCE(MAX(version), 0) + 1 FROM zones), ?)
         ON CONFLICT(key) DO UPDATE SET
             value = MAX(CAST(config.value AS INTEGER), (SELECT COALESCE(MAX(version), 0) FROM zones)) + 1,
             updated_at = excluded.updated_at
         RETURNING CAST(value AS INTEGER)",
    )
    .bind(ZONE_VERSION_SEQ_KEY)
    .bind(now_text())
    .fetch_one(&mut *conn)
    .await?;

    Ok(version)
}

/// Stamp a zone with a fresh version; `false` when the zone does not exist.
async fn bump_zone(conn: &mut SqliteConnection, zone_id: i64) -> Result<bool, sqlx::Error> {
    let version = next_version(conn).await?;
    let result = sqlx::query("UPDATE zones SET version = ?, updated_at = ? WHERE id = ?")
        .bind(version)
        .bind(now_text())
        .bind(zone_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn insert_records(
    conn: &mut SqliteConnection,
    zone_id: i64,
    records: &[Record],
) -> Result<(), sqlx::Error> {
    for record in records {
        sqlx::query(
            "INSERT INTO records (zone_id, name, type, value, ttl, priority)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(zone_id)
        .bind(record.name.as_ref())
        .bind(record.record_type.as_str())
        .bind(record.value.as_ref())
        .bind(record.ttl as i64)
        .bind(record.priority.map(i64::from))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn fetch_zone(conn: &mut SqliteConnection, zone_id: i64) -> Result<Option<ZoneRow>, sqlx::Error> {
    sqlx::query_as::<_, ZoneRow>(&format!("{} WHERE id = ?", SELECT_ZONE))
        .bind(zone_id)
        .fetch_optional(&mut *conn)
        .await
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}

#[async_trait]
impl ZoneRepository for SqliteZoneRepository {
    #[instrument(skip(self))]
    async fn list_zones(&self) -> Result<Vec<Zone>, DomainError> {
        let rows = sqlx::query_as::<_, ZoneRow>(&format!("{} ORDER BY name ASC", SELECT_ZONE))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list zones"))?;

        Ok(rows.into_iter().map(Self::row_to_zone).collect())
    }

    #[instrument(skip(self))]
    async fn get_zone(&self, id: i64) -> Result<Option<Zone>, DomainError> {
        let row = sqlx::query_as::<_, ZoneRow>(&format!("{} WHERE id = ?", SELECT_ZONE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to query zone by id"))?;

        Ok(row.map(Self::row_to_zone))
    }

    #[instrument(skip(self))]
    async fn get_zone_by_name(&self, name: &str) -> Result<Option<Zone>, DomainError> {
        let name = Zone::normalize_name(name)?;
        let row = sqlx::query_as::<_, ZoneRow>(&format!("{} WHERE name = ?", SELECT_ZONE))
            .bind(&name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to query zone by name"))?;

        Ok(row.map(Self::row_to_zone))
    }

    #[instrument(skip(self, zone), fields(zone = %zone.name))]
    async fn create_zone(&self, zone: &Zone) -> Result<Zone, DomainError> {
        zone.validate()?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let version = next_version(&mut tx)
            .await
            .map_err(db_error("Failed to allocate zone version"))?;
        let now = now_text();

        let row = sqlx::query_as::<_, ZoneRow>(
            "INSERT INTO zones (name, enabled, ttl, ns, admin, serial, refresh, retry, expire, version, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id, name, enabled, ttl, ns, admin, serial, refresh, retry, expire, version",
        )
        .bind(zone.name.as_ref())
        .bind(zone.enabled as i64)
        .bind(zone.ttl as i64)
        .bind(zone.ns.as_ref())
        .bind(zone.admin.as_ref())
        .bind(zone.serial as i64)
        .bind(zone.refresh as i64)
        .bind(zone.retry as i64)
        .bind(zone.expire as i64)
        .bind(version)
        .bind(&now)
        .bind(&now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::ZoneAlreadyExists(zone.name.to_string())
            } else {
                error!(error = %e, "Failed to create zone");
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit zone creation"))?;

        Ok(Self::row_to_zone(row))
    }

    #[instrument(skip(self, zone), fields(zone = %zone.name))]
    async fn update_zone(&self, zone: &Zone) -> Result<Zone, DomainError> {
        zone.validate()?;
        let id = zone
            .id
            .ok_or_else(|| DomainError::InvalidZone("update requires a zone id".to_string()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let version = next_version(&mut tx)
            .await
            .map_err(db_error("Failed to allocate zone version"))?;

        let row = sqlx::query_as::<_, ZoneRow>(
            "UPDATE zones SET name = ?, enabled = ?, ttl = ?, ns = ?, admin = ?, serial = ?,
                 refresh = ?, retry = ?, expire = ?, version = ?, updated_at = ?
             WHERE id = ?
             RETURNING id, name, enabled, ttl, ns, admin, serial, refresh, retry, expire, version",
        )
        .bind(zone.name.as_ref())
        .bind(zone.enabled as i64)
        .bind(zone.ttl as i64)
        .bind(zone.ns.as_ref())
        .bind(zone.admin.as_ref())
        .bind(zone.serial as i64)
        .bind(zone.refresh as i64)
        .bind(zone.retry as i64)
        .bind(zone.expire as i64)
        .bind(version)
        .bind(now_text())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::ZoneAlreadyExists(zone.name.to_string())
            } else {
                error!(error = %e, "Failed to update zone");
                DomainError::DatabaseError(e.to_string())
            }
        })?
        .ok_or(DomainError::ZoneNotFound(id))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit zone update"))?;

        Ok(Self::row_to_zone(row))
    }

    #[instrument(skip(self))]
    async fn delete_zone(&self, id: i64) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        sqlx::query("DELETE FROM records WHERE zone_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete zone records"))?;

        let result = sqlx::query("DELETE FROM zones WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete zone"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ZoneNotFound(id));
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit zone deletion"))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_records_by_zone(&self, zone_id: i64) -> Result<Vec<Record>, DomainError> {
        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            "{} WHERE zone_id = ? ORDER BY id ASC",
            SELECT_RECORD
        ))
        .bind(zone_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list records"))?;

        Ok(rows.into_iter().filter_map(Self::row_to_record).collect())
    }

    #[instrument(skip(self, record), fields(zone_id = record.zone_id, name = %record.name))]
    async fn create_record(&self, record: &Record) -> Result<Record, DomainError> {
        record.validate()?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        if !bump_zone(&mut tx, record.zone_id)
            .await
            .map_err(db_error("Failed to version zone"))?
        {
            return Err(DomainError::ZoneNotFound(record.zone_id));
        }

        let row = sqlx::query_as::<_, RecordRow>(
            "INSERT INTO records (zone_id, name, type, value, ttl, priority)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id, zone_id, name, type, value, ttl, priority",
        )
        .bind(record.zone_id)
        .bind(record.name.as_ref())
        .bind(record.record_type.as_str())
        .bind(record.value.as_ref())
        .bind(record.ttl as i64)
        .bind(record.priority.map(i64::from))
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to create record"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit record creation"))?;

        Self::row_to_record(row)
            .ok_or_else(|| DomainError::InvalidRecord("stored record is unreadable".to_string()))
    }

    #[instrument(skip(self))]
    async fn delete_record(&self, id: i64) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let (zone_id,) =
            sqlx::query_as::<_, (i64,)>("DELETE FROM records WHERE id = ? RETURNING zone_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to delete record"))?
                .ok_or_else(|| DomainError::NotFound(format!("Record {}", id)))?;

        bump_zone(&mut tx, zone_id)
            .await
            .map_err(db_error("Failed to version zone"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit record deletion"))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn zones_since(&self, version: i64) -> Result<Vec<Zone>, DomainError> {
        let rows = sqlx::query_as::<_, ZoneRow>(&format!(
            "{} WHERE version > ? ORDER BY version ASC",
            SELECT_ZONE
        ))
        .bind(version)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to query zones by version"))?;

        Ok(rows.into_iter().map(Self::row_to_zone).collect())
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn replace_records(
        &self,
        zone_id: i64,
        records: &[Record],
    ) -> Result<Zone, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        if !bump_zone(&mut tx, zone_id)
            .await
            .map_err(db_error("Failed to version zone"))?
        {
            return Err(DomainError::ZoneNotFound(zone_id));
        }

        sqlx::query("DELETE FROM records WHERE zone_id = ?")
            .bind(zone_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to clear zone records"))?;

        insert_records(&mut tx, zone_id, records)
            .await
            .map_err(db_error("Failed to insert zone records"))?;

        let row = fetch_zone(&mut tx, zone_id)
            .await
            .map_err(db_error("Failed to reload zone"))?
            .ok_or(DomainError::ZoneNotFound(zone_id))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit record replacement"))?;

        Ok(Self::row_to_zone(row))
    }

    #[instrument(skip(self, zone, records), fields(zone = %zone.name, version = zone.version, count = records.len()))]
    async fn apply_synced_zone(
        &self,
        zone: &Zone,
        records: &[Record],
    ) -> Result<Zone, DomainError> {
        zone.validate()?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;
        let now = now_text();

        let existing = sqlx::query_as::<_, (i64,)>("SELECT id FROM zones WHERE name = ?")
            .bind(zone.name.as_ref())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("Failed to look up synced zone"))?;

        let zone_id = match existing {
            Some((id,)) => {
                sqlx::query(
                    "UPDATE zones SET enabled = ?, ttl = ?, ns = ?, admin = ?, serial = ?,
                         refresh = ?, retry = ?, expire = ?, version = ?, updated_at = ?
                     WHERE id = ?",
                )
                .bind(zone.enabled as i64)
                .bind(zone.ttl as i64)
                .bind(zone.ns.as_ref())
                .bind(zone.admin.as_ref())
                .bind(zone.serial as i64)
                .bind(zone.refresh as i64)
                .bind(zone.retry as i64)
                .bind(zone.expire as i64)
                .bind(zone.version)
                .bind(&now)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to update synced zone"))?;

                sqlx::query("DELETE FROM records WHERE zone_id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error("Failed to clear synced zone records"))?;
                id
            }
            None => {
                let (id,) = sqlx::query_as::<_, (i64,)>(
                    "INSERT INTO zones (name, enabled, ttl, ns, admin, serial, refresh, retry, expire, version, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                     RETURNING id",
                )
                .bind(zone.name.as_ref())
                .bind(zone.enabled as i64)
                .bind(zone.ttl as i64)
                .bind(zone.ns.as_ref())
                .bind(zone.admin.as_ref())
                .bind(zone.serial as i64)
                .bind(zone.refresh as i64)
                .bind(zone.retry as i64)
                .bind(zone.expire as i64)
                .bind(zone.version)
                .bind(&now)
                .bind(&now)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("Failed to insert synced zone"))?;
                id
            }
        };

        insert_records(&mut tx, zone_id, records)
            .await
            .map_err(db_error("Failed to insert synced records"))?;

        let row = fetch_zone(&mut tx, zone_id)
            .await
            .map_err(db_error("Failed to reload synced zone"))?
            .ok_or(DomainError::ZoneNotFound(zone_id))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit synced zone"))?;

        Ok(Self::row_to_zone(row))
    }
}
