//! SQLite schema definition.

/// Complete database schema for the blood bank.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Donors
-- ============================================================================

CREATE TABLE IF NOT EXISTS donors (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,                  -- stored lowercased
    phone TEXT NOT NULL,
    blood_group TEXT NOT NULL
        CHECK (blood_group IN ('O-', 'O+', 'A-', 'A+', 'B-', 'B+', 'AB-', 'AB+')),
    gender TEXT NOT NULL CHECK (gender IN ('Male', 'Female', 'Other')),
    last_donated TEXT,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    longitude REAL,                              -- NULL when not supplied
    latitude REAL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_donors_blood_group ON donors(blood_group);
CREATE INDEX IF NOT EXISTS idx_donors_city ON donors(city);

-- ============================================================================
-- Recipients
-- ============================================================================

CREATE TABLE IF NOT EXISTS recipients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    blood_group TEXT NOT NULL
        CHECK (blood_group IN ('O-', 'O+', 'A-', 'A+', 'B-', 'B+', 'AB-', 'AB+')),
    phone TEXT NOT NULL,
    city TEXT NOT NULL,
    gender TEXT NOT NULL CHECK (gender IN ('Male', 'Female', 'Other')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Donations (immutable; removed only by delete)
-- ============================================================================

CREATE TABLE IF NOT EXISTS donations (
    id TEXT PRIMARY KEY,
    donor_id TEXT NOT NULL REFERENCES donors(id),
    blood_group TEXT NOT NULL,                   -- copied from donor
    donation_date TEXT NOT NULL,
    expiry_date TEXT NOT NULL,                   -- donation_date + 42 days
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_donations_donor ON donations(donor_id);
CREATE INDEX IF NOT EXISTS idx_donations_blood_group ON donations(blood_group);

CREATE TRIGGER IF NOT EXISTS donations_immutable BEFORE UPDATE ON donations
BEGIN
    SELECT RAISE(ABORT, 'Donations cannot be modified');
END;

-- ============================================================================
-- Blood Requests
-- ============================================================================

CREATE TABLE IF NOT EXISTS blood_requests (
    id TEXT PRIMARY KEY,
    recipient_id TEXT NOT NULL REFERENCES recipients(id),
    blood_group TEXT NOT NULL,
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    status TEXT NOT NULL DEFAULT 'Pending'
        CHECK (status IN ('Pending', 'Fulfilled', 'Cancelled')),
    request_date TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_requests_status ON blood_requests(status);
CREATE INDEX IF NOT EXISTS idx_requests_recipient ON blood_requests(recipient_id);

-- ============================================================================
-- Transfusions
-- ============================================================================

CREATE TABLE IF NOT EXISTS transfusions (
    id TEXT PRIMARY KEY,
    donor_id TEXT NOT NULL REFERENCES donors(id),
    recipient_id TEXT NOT NULL REFERENCES recipients(id),
    blood_group TEXT NOT NULL,                   -- donor's group
    transfusion_date TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('Successful', 'Failed')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_transfusions_donor ON transfusions(donor_id);
CREATE INDEX IF NOT EXISTS idx_transfusions_recipient ON transfusions(recipient_id);
"#;
