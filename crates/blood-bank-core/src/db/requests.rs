//! Blood request database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_column, Database, DbError, DbResult};
use crate::models::{BloodRequest, RequestStatus};

const REQUEST_COLUMNS: &str =
    "id, recipient_id, blood_group, quantity, status, request_date, created_at, updated_at";

impl Database {
    /// Insert a new blood request.
    pub fn insert_request(&self, request: &BloodRequest) -> DbResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO blood_requests ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                REQUEST_COLUMNS
            ),
            params![
                request.id,
                request.recipient_id,
                request.blood_group.label(),
                request.quantity,
                request.status.label(),
                request.request_date,
                request.created_at,
                request.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a request by ID.
    pub fn get_request(&self, id: &str) -> DbResult<Option<BloodRequest>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM blood_requests WHERE id = ?", REQUEST_COLUMNS),
                [id],
                RequestRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all requests in insertion order.
    pub fn list_requests(&self) -> DbResult<Vec<BloodRequest>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM blood_requests ORDER BY rowid",
            REQUEST_COLUMNS
        ))?;

        let rows = stmt.query_map([], RequestRow::from_row)?;

        let mut requests = Vec::new();
        for row in rows {
            requests.push(row?.try_into()?);
        }
        Ok(requests)
    }

    /// List requests with the given status.
    pub fn list_requests_by_status(&self, status: RequestStatus) -> DbResult<Vec<BloodRequest>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM blood_requests WHERE status = ? ORDER BY rowid",
            REQUEST_COLUMNS
        ))?;

        let rows = stmt.query_map([status.label()], RequestRow::from_row)?;

        let mut requests = Vec::new();
        for row in rows {
            requests.push(row?.try_into()?);
        }
        Ok(requests)
    }

    /// Move a request to a new status.
    pub fn update_request_status(&self, id: &str, status: RequestStatus) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE blood_requests SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.label(), chrono::Utc::now().to_rfc3339(), id],
        )?;
        Ok(rows_affected > 0)
    }
}

struct RequestRow {
    id: String,
    recipient_id: String,
    blood_group: String,
    quantity: u32,
    status: String,
    request_date: String,
    created_at: String,
    updated_at: String,
}

impl RequestRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            recipient_id: row.get(1)?,
            blood_group: row.get(2)?,
            quantity: row.get(3)?,
            status: row.get(4)?,
            request_date: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl TryFrom<RequestRow> for BloodRequest {
    type Error = DbError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        Ok(BloodRequest {
            id: row.id,
            recipient_id: row.recipient_id,
            blood_group: parse_column("blood_group", &row.blood_group)?,
            quantity: row.quantity,
            status: parse_column("status", &row.status)?,
            request_date: row.request_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
