//! Donation database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_column, Database, DbError, DbResult};
use crate::models::Donation;

const DONATION_COLUMNS: &str =
    "id, donor_id, blood_group, donation_date, expiry_date, created_at, updated_at";

impl Database {
    /// Insert a new donation.
    pub fn insert_donation(&self, donation: &Donation) -> DbResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO donations ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                DONATION_COLUMNS
            ),
            params![
                donation.id,
                donation.donor_id,
                donation.blood_group.label(),
                donation.donation_date,
                donation.expiry_date,
                donation.created_at,
                donation.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a donation by ID.
    pub fn get_donation(&self, id: &str) -> DbResult<Option<Donation>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM donations WHERE id = ?", DONATION_COLUMNS),
                [id],
                DonationRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all donations in insertion order.
    pub fn list_donations(&self) -> DbResult<Vec<Donation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM donations ORDER BY rowid",
            DONATION_COLUMNS
        ))?;

        let rows = stmt.query_map([], DonationRow::from_row)?;

        let mut donations = Vec::new();
        for row in rows {
            donations.push(row?.try_into()?);
        }
        Ok(donations)
    }

    /// List donations made by a donor.
    pub fn list_donations_for_donor(&self, donor_id: &str) -> DbResult<Vec<Donation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM donations WHERE donor_id = ? ORDER BY rowid",
            DONATION_COLUMNS
        ))?;

        let rows = stmt.query_map([donor_id], DonationRow::from_row)?;

        let mut donations = Vec::new();
        for row in rows {
            donations.push(row?.try_into()?);
        }
        Ok(donations)
    }

    /// Delete a donation.
    pub fn delete_donation(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM donations WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

struct DonationRow {
    id: String,
    donor_id: String,
    blood_group: String,
    donation_date: String,
    expiry_date: String,
    created_at: String,
    updated_at: String,
}

impl DonationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            donor_id: row.get(1)?,
            blood_group: row.get(2)?,
            donation_date: row.get(3)?,
            expiry_date: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl TryFrom<DonationRow> for Donation {
    type Error = DbError;

    fn try_from(row: DonationRow) -> Result<Self, Self::Error> {
        Ok(Donation {
            id: row.id,
            donor_id: row.donor_id,
            blood_group: parse_column("blood_group", &row.blood_group)?,
            donation_date: row.donation_date,
            expiry_date: row.expiry_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
