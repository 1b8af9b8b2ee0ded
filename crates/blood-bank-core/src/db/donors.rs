//! Donor database operations.

use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::{map_constraint, parse_column, Database, DbError, DbResult};
use crate::models::{BloodGroup, Coordinates, Donor};

const DONOR_COLUMNS: &str = "id, name, email, phone, blood_group, gender, last_donated, \
                             address, city, longitude, latitude, created_at, updated_at";

/// Optional donor search criteria; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonorFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Exact blood group
    pub blood_group: Option<BloodGroup>,
    /// Case-insensitive substring of the city
    pub city: Option<String>,
}

impl Database {
    /// Insert a new donor. Fails with a constraint error on a duplicate email.
    pub fn insert_donor(&self, donor: &Donor) -> DbResult<()> {
        self.conn
            .execute(
                &format!(
                    "INSERT INTO donors ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    DONOR_COLUMNS
                ),
                params![
                    donor.id,
                    donor.name,
                    donor.email,
                    donor.phone,
                    donor.blood_group.label(),
                    donor.gender.label(),
                    donor.last_donated,
                    donor.address,
                    donor.city,
                    donor.coordinates.map(|c| c.longitude),
                    donor.coordinates.map(|c| c.latitude),
                    donor.created_at,
                    donor.updated_at,
                ],
            )
            .map_err(|e| {
                map_constraint(e, &format!("a donor with email {} already exists", donor.email))
            })?;
        Ok(())
    }

    /// Get a donor by ID.
    pub fn get_donor(&self, id: &str) -> DbResult<Option<Donor>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM donors WHERE id = ?", DONOR_COLUMNS),
                [id],
                DonorRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all donors in registration order.
    pub fn list_donors(&self) -> DbResult<Vec<Donor>> {
        self.search_donors(&DonorFilter::default())
    }

    /// Search donors by name, blood group and city.
    pub fn search_donors(&self, filter: &DonorFilter) -> DbResult<Vec<Donor>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {}
            FROM donors
            WHERE (?1 IS NULL OR instr(lower(name), lower(?1)) > 0)
              AND (?2 IS NULL OR blood_group = ?2)
              AND (?3 IS NULL OR instr(lower(city), lower(?3)) > 0)
            ORDER BY rowid
            "#,
            DONOR_COLUMNS
        ))?;

        let rows = stmt.query_map(
            params![
                filter.name.as_deref().filter(|s| !s.is_empty()),
                filter.blood_group.map(|g| g.label()),
                filter.city.as_deref().filter(|s| !s.is_empty()),
            ],
            DonorRow::from_row,
        )?;

        let mut donors = Vec::new();
        for row in rows {
            donors.push(row?.try_into()?);
        }
        Ok(donors)
    }

    /// Mappable donors whose city contains `city` (case-insensitive).
    pub fn list_mappable_donors(&self, city: &str) -> DbResult<Vec<Donor>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {}
            FROM donors
            WHERE instr(lower(city), lower(?1)) > 0
            ORDER BY rowid
            "#,
            DONOR_COLUMNS
        ))?;

        let rows = stmt.query_map([city], DonorRow::from_row)?;

        let mut donors = Vec::new();
        for row in rows {
            let donor: Donor = row?.try_into()?;
            if donor.is_mappable() {
                donors.push(donor);
            }
        }
        Ok(donors)
    }
}

/// Intermediate row struct for database mapping.
struct DonorRow {
    id: String,
    name: String,
    email: String,
    phone: String,
    blood_group: String,
    gender: String,
    last_donated: Option<String>,
    address: String,
    city: String,
    longitude: Option<f64>,
    latitude: Option<f64>,
    created_at: String,
    updated_at: String,
}

impl DonorRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            blood_group: row.get(4)?,
            gender: row.get(5)?,
            last_donated: row.get(6)?,
            address: row.get(7)?,
            city: row.get(8)?,
            longitude: row.get(9)?,
            latitude: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }
}

impl TryFrom<DonorRow> for Donor {
    type Error = DbError;

    fn try_from(row: DonorRow) -> Result<Self, Self::Error> {
        let coordinates = match (row.longitude, row.latitude) {
            (Some(longitude), Some(latitude)) => Some(Coordinates {
                longitude,
                latitude,
            }),
            _ => None,
        };

        Ok(Donor {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            blood_group: parse_column("blood_group", &row.blood_group)?,
            gender: parse_column("gender", &row.gender)?,
            last_donated: row.last_donated,
            address: row.address,
            city: row.city,
            coordinates,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
