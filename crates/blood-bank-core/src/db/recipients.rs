//! Recipient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_column, Database, DbError, DbResult};
use crate::models::Recipient;

impl Database {
    /// Insert a new recipient.
    pub fn insert_recipient(&self, recipient: &Recipient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO recipients (
                id, name, blood_group, phone, city, gender, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                recipient.id,
                recipient.name,
                recipient.blood_group.label(),
                recipient.phone,
                recipient.city,
                recipient.gender.label(),
                recipient.created_at,
                recipient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a recipient by ID.
    pub fn get_recipient(&self, id: &str) -> DbResult<Option<Recipient>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, blood_group, phone, city, gender, created_at, updated_at
                FROM recipients
                WHERE id = ?
                "#,
                [id],
                RecipientRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all recipients in registration order.
    pub fn list_recipients(&self) -> DbResult<Vec<Recipient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, blood_group, phone, city, gender, created_at, updated_at
            FROM recipients
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([], RecipientRow::from_row)?;

        let mut recipients = Vec::new();
        for row in rows {
            recipients.push(row?.try_into()?);
        }
        Ok(recipients)
    }
}

struct RecipientRow {
    id: String,
    name: String,
    blood_group: String,
    phone: String,
    city: String,
    gender: String,
    created_at: String,
    updated_at: String,
}

impl RecipientRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            blood_group: row.get(2)?,
            phone: row.get(3)?,
            city: row.get(4)?,
            gender: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl TryFrom<RecipientRow> for Recipient {
    type Error = DbError;

    fn try_from(row: RecipientRow) -> Result<Self, Self::Error> {
        Ok(Recipient {
            id: row.id,
            name: row.name,
            blood_group: parse_column("blood_group", &row.blood_group)?,
            phone: row.phone,
            city: row.city,
            gender: parse_column("gender", &row.gender)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
