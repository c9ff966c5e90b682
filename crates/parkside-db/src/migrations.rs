use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS realtors (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL,
            phone       TEXT NOT NULL,
            photo       TEXT NOT NULL DEFAULT '',
            hire_date   TEXT NOT NULL DEFAULT (datetime('now')),
            is_mvp      INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS listings (
            id           INTEGER PRIMARY KEY,
            realtor_id   INTEGER NOT NULL REFERENCES realtors(id),
            title        TEXT NOT NULL,
            description  TEXT NOT NULL DEFAULT '',
            address      TEXT NOT NULL,
            city         TEXT NOT NULL,
            province     TEXT NOT NULL,
            postal_code  TEXT NOT NULL,
            price        INTEGER NOT NULL CHECK (price >= 0),
            bedrooms     INTEGER NOT NULL CHECK (bedrooms >= 0),
            bathrooms    REAL NOT NULL DEFAULT 1,
            square_feet  INTEGER NOT NULL DEFAULT 0,
            photo_main   TEXT NOT NULL DEFAULT '',
            is_published INTEGER NOT NULL DEFAULT 1,
            list_date    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_listings_published
            ON listings(is_published, list_date);

        -- No UNIQUE(listing_id, user_id): the duplicate-inquiry rule is a
        -- best-effort pre-check in the contact handler, not a storage
        -- constraint, and anonymous submitters share user_id = ''.
        CREATE TABLE IF NOT EXISTS contacts (
            id          INTEGER PRIMARY KEY,
            listing_id  INTEGER NOT NULL REFERENCES listings(id),
            listing     TEXT NOT NULL,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL,
            phone       TEXT NOT NULL,
            message     TEXT NOT NULL,
            user_id     TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_contacts_listing_user
            ON contacts(listing_id, user_id);

        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            email       TEXT NOT NULL,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
