//! Per-request unit of work over the valve table

use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{Row, Transaction};

use super::errors::StorageResult;
use crate::model::{Valve, ValveFields};

const SELECT_VALVE: &str = "SELECT pk_valve, name, description, type, flow_rate FROM valve";

/// A transaction on one pooled connection.
///
/// Nothing is visible to other sessions until [`Session::commit`]. Dropping
/// an uncommitted session rolls it back.
pub struct Session {
    tx: Transaction<'static, Sqlite>,
}

// =============================================================================
// Row Mapping
// =============================================================================

fn row_to_valve(row: &SqliteRow) -> StorageResult<Valve> {
    let id: i64 = row.try_get("pk_valve")?;
    let name: String = row.try_get("name")?;
    let description: String = row.try_get("description")?;
    let valve_type: String = row.try_get("type")?;
    let flow_rate: f64 = row.try_get("flow_rate")?;

    Ok(Valve::new(
        id,
        ValveFields {
            name,
            description,
            valve_type,
            flow_rate,
        },
    ))
}

impl Session {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    /// Insert a new valve and return it with its assigned id.
    pub async fn insert(&mut self, fields: &ValveFields) -> StorageResult<Valve> {
        let result = sqlx::query(
            "INSERT INTO valve (name, description, type, flow_rate) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.valve_type)
        .bind(fields.flow_rate)
        .execute(&mut *self.tx)
        .await?;

        Ok(Valve::new(result.last_insert_rowid(), fields.clone()))
    }

    /// All valves in insertion order.
    pub async fn list(&mut self) -> StorageResult<Vec<Valve>> {
        let rows = sqlx::query(&format!("{SELECT_VALVE} ORDER BY pk_valve"))
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter().map(row_to_valve).collect()
    }

    pub async fn find_by_id(&mut self, id: i64) -> StorageResult<Option<Valve>> {
        let row = sqlx::query(&format!("{SELECT_VALVE} WHERE pk_valve = ?1"))
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(row_to_valve).transpose()
    }

    /// Overwrite every mutable column of `valve`'s row.
    ///
    /// Returns whether a row with that id existed.
    pub async fn save(&mut self, valve: &Valve) -> StorageResult<bool> {
        let result = sqlx::query(
            "UPDATE valve SET name = ?1, description = ?2, type = ?3, flow_rate = ?4 \
             WHERE pk_valve = ?5",
        )
        .bind(&valve.fields.name)
        .bind(&valve.fields.description)
        .bind(&valve.fields.valve_type)
        .bind(valve.fields.flow_rate)
        .bind(valve.id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every valve called `name`, returning how many went.
    pub async fn delete_by_name(&mut self, name: &str) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM valve WHERE name = ?1")
            .bind(name)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn ping(&mut self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&mut *self.tx).await?;
        Ok(())
    }

    pub async fn commit(self) -> StorageResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
