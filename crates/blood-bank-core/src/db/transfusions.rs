//! Transfusion database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{DbError, DbResult, Database};
use crate::models::{Transfusion, TransfusionStatus};

const TRANSFUSION_COLUMNS: &str = "id, donor_id, recipient_id, blood_group, transfusion_date, \
                                   status, created_at, updated_at";

impl Database {
    /// Insert a new transfusion.
    pub fn insert_transfusion(&self, transfusion: &Transfusion) -> DbResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO transfusions ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                TRANSFUSION_COLUMNS
            ),
            params![
                transfusion.id,
                transfusion.donor_id,
                transfusion.recipient_id,
                transfusion.blood_group.label(),
                transfusion.transfusion_date,
                status_to_string(&transfusion.status),
                transfusion.created_at,
                transfusion.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a transfusion by ID.
    pub fn get_transfusion(&self, id: &str) -> DbResult<Option<Transfusion>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM transfusions WHERE id = ?", TRANSFUSION_COLUMNS),
                [id],
                TransfusionRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all transfusions in insertion order.
    pub fn list_transfusions(&self) -> DbResult<Vec<Transfusion>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM transfusions ORDER BY rowid",
            TRANSFUSION_COLUMNS
        ))?;

        let rows = stmt.query_map([], TransfusionRow::from_row)?;

        let mut transfusions = Vec::new();
        for row in rows {
            transfusions.push(row?.try_into()?);
        }
        Ok(transfusions)
    }
}

struct TransfusionRow {
    id: String,
    donor_id: String,
    recipient_id: String,
    blood_group: String,
    transfusion_date: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TransfusionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            donor_id: row.get(1)?,
            recipient_id: row.get(2)?,
            blood_group: row.get(3)?,
            transfusion_date: row.get(4)?,
            status: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl TryFrom<TransfusionRow> for Transfusion {
    type Error = DbError;

    fn try_from(row: TransfusionRow) -> Result<Self, Self::Error> {
        Ok(Transfusion {
            id: row.id,
            donor_id: row.donor_id,
            recipient_id: row.recipient_id,
            blood_group: super::parse_column("blood_group", &row.blood_group)?,
            transfusion_date: row.transfusion_date,
            status: string_to_status(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn status_to_string(status: &TransfusionStatus) -> &'static str {
    status.label()
}

fn string_to_status(s: &str) -> Result<TransfusionStatus, DbError> {
    match s {
        "Successful" => Ok(TransfusionStatus::Successful),
        "Failed" => Ok(TransfusionStatus::Failed),
        _ => Err(DbError::Constraint(format!("Unknown transfusion status: {}", s))),
    }
}
