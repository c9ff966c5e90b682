use crate::Database;
use crate::models::{ContactRow, ListingRow, NewContact, NewListing, NewRealtor, RealtorRow, UserRow};
use crate::search::{ListingQuery, PageWindow};
use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params_from_iter};

const LISTING_COLUMNS: &str = "id, realtor_id, title, description, address, city, province, \
     postal_code, price, bedrooms, bathrooms, square_feet, photo_main, is_published, list_date";

impl Database {
    // -- Listings --

    pub fn insert_listing(&self, listing: &NewListing) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO listings (realtor_id, title, description, address, city, province,
                     postal_code, price, bedrooms, bathrooms, square_feet, photo_main,
                     is_published, list_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                rusqlite::params![
                    listing.realtor_id,
                    listing.title,
                    listing.description,
                    listing.address,
                    listing.city,
                    listing.province,
                    listing.postal_code,
                    listing.price,
                    listing.bedrooms,
                    listing.bathrooms,
                    listing.square_feet,
                    listing.photo_main,
                    listing.is_published,
                    listing.list_date,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_listing(&self, id: i64) -> Result<Option<ListingRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            stmt.query_row([id], map_listing).optional()
        })
    }

    pub fn count_listings(&self, query: &ListingQuery) -> Result<i64> {
        self.with_conn(|conn| {
            let (clause, params) = query.where_clause();
            let sql = format!("SELECT COUNT(*) FROM listings {clause}");
            let count = conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?;
            Ok(count)
        })
    }

    /// One page of the filtered result, always newest first.
    pub fn search_listings(
        &self,
        query: &ListingQuery,
        window: &PageWindow,
    ) -> Result<Vec<ListingRow>> {
        self.with_conn(|conn| {
            let (clause, mut params) = query.where_clause();
            let sql = format!(
                "SELECT {LISTING_COLUMNS} FROM listings {clause}
                 ORDER BY list_date DESC, id DESC
                 LIMIT ? OFFSET ?"
            );
            params.push(Value::Integer(window.per_page));
            params.push(Value::Integer(window.offset()));
            query_listings(conn, &sql, params)
        })
    }

    /// Newest published listings for the home-page preview. No pagination.
    pub fn latest_published(&self, limit: i64) -> Result<Vec<ListingRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {LISTING_COLUMNS} FROM listings
                 WHERE is_published = 1
                 ORDER BY list_date DESC, id DESC
                 LIMIT ?"
            );
            query_listings(conn, &sql, vec![Value::Integer(limit)])
        })
    }

    // -- Realtors --

    pub fn insert_realtor(&self, realtor: &NewRealtor) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO realtors (name, email, phone, photo, hire_date, is_mvp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    realtor.name,
                    realtor.email,
                    realtor.phone,
                    realtor.photo,
                    realtor.hire_date,
                    realtor.is_mvp,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_realtors(&self) -> Result<Vec<RealtorRow>> {
        self.with_conn(|conn| {
            query_realtors(
                conn,
                "SELECT id, name, email, phone, photo, hire_date, is_mvp
                 FROM realtors ORDER BY hire_date DESC, id DESC",
            )
        })
    }

    pub fn mvp_realtors(&self) -> Result<Vec<RealtorRow>> {
        self.with_conn(|conn| {
            query_realtors(
                conn,
                "SELECT id, name, email, phone, photo, hire_date, is_mvp
                 FROM realtors WHERE is_mvp = 1 ORDER BY hire_date DESC, id DESC",
            )
        })
    }

    // -- Contacts --

    pub fn insert_contact(&self, contact: &NewContact) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO contacts (listing_id, listing, name, email, phone, message, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    contact.listing_id,
                    contact.listing,
                    contact.name,
                    contact.email,
                    contact.phone,
                    contact.message,
                    contact.user_id,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Best-effort duplicate pre-check; read-then-write, no transactional
    /// isolation against a concurrent submission.
    pub fn has_contacted(&self, listing_id: i64, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM contacts WHERE listing_id = ?1 AND user_id = ?2",
                rusqlite::params![listing_id, user_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }

    pub fn contacts_for_user(&self, user_id: &str) -> Result<Vec<ContactRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, listing_id, listing, name, email, phone, message, user_id, created_at
                 FROM contacts WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([user_id], map_contact)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, email: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password) VALUES (?1, ?2, ?3, ?4)",
                (id, username, email, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }
}

fn map_listing(row: &Row) -> rusqlite::Result<ListingRow> {
    Ok(ListingRow {
        id: row.get(0)?,
        realtor_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        address: row.get(4)?,
        city: row.get(5)?,
        province: row.get(6)?,
        postal_code: row.get(7)?,
        price: row.get(8)?,
        bedrooms: row.get(9)?,
        bathrooms: row.get(10)?,
        square_feet: row.get(11)?,
        photo_main: row.get(12)?,
        is_published: row.get(13)?,
        list_date: row.get(14)?,
    })
}

fn map_contact(row: &Row) -> rusqlite::Result<ContactRow> {
    Ok(ContactRow {
        id: row.get(0)?,
        listing_id: row.get(1)?,
        listing: row.get(2)?,
        name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        message: row.get(6)?,
        user_id: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn query_listings(conn: &Connection, sql: &str, params: Vec<Value>) -> Result<Vec<ListingRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params_from_iter(params), map_listing)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_realtors(conn: &Connection, sql: &str) -> Result<Vec<RealtorRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RealtorRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
                photo: row.get(4)?,
                hire_date: row.get(5)?,
                is_mvp: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, username, email, password, created_at FROM users WHERE {column} = ?1"
    );
    let mut stmt = conn.prepare(&sql)?;
    stmt.query_row([value], |row| {
        Ok(UserRow {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            created_at: row.get(4)?,
        })
    })
    .optional()
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(realtor_id: i64, title: &str) -> NewListing {
        NewListing {
            realtor_id,
            title: title.to_string(),
            description: format!("A lovely home called {title}"),
            address: "100 Main St".to_string(),
            city: "Toronto".to_string(),
            province: "Ontario".to_string(),
            postal_code: "M5V 2T6".to_string(),
            price: 450_000,
            bedrooms: 3,
            bathrooms: 2.0,
            square_feet: 1_400,
            photo_main: String::new(),
            is_published: true,
            list_date: "2024-03-01 12:00:00".to_string(),
        }
    }

    fn realtor(name: &str, is_mvp: bool, hire_date: &str) -> NewRealtor {
        NewRealtor {
            name: name.to_string(),
            email: format!("{}@parkside.example", name.to_lowercase()),
            phone: "416-555-0100".to_string(),
            photo: String::new(),
            hire_date: hire_date.to_string(),
            is_mvp,
        }
    }

    fn seeded() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let realtor_id = db.insert_realtor(&realtor("Jane", true, "2021-06-01 09:00:00")).unwrap();
        (db, realtor_id)
    }

    #[test]
    fn filters_combine_with_and() {
        let (db, rid) = seeded();
        let mut a = listing(rid, "Condo downtown");
        a.bedrooms = 2;
        a.price = 250_000;
        let mut b = listing(rid, "Family house");
        b.bedrooms = 2;
        b.price = 600_000;
        let mut c = listing(rid, "Starter bungalow");
        c.bedrooms = 4;
        c.price = 250_000;
        for l in [&a, &b, &c] {
            db.insert_listing(l).unwrap();
        }

        let query = ListingQuery {
            max_bedrooms: Some(2),
            max_price: Some(300_000),
            ..ListingQuery::default()
        };
        let total = db.count_listings(&query).unwrap();
        assert_eq!(total, 1);

        let window = PageWindow::resolve(None, 6, total);
        let rows = db.search_listings(&query, &window).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Condo downtown");
    }

    #[test]
    fn unsupplied_criteria_exclude_nothing() {
        let (db, rid) = seeded();
        let mut hidden = listing(rid, "Unlisted");
        hidden.is_published = false;
        db.insert_listing(&listing(rid, "Visible")).unwrap();
        db.insert_listing(&hidden).unwrap();

        // The search flow does not set published_only, so unpublished rows
        // show up there.
        let query = ListingQuery::default();
        assert_eq!(db.count_listings(&query).unwrap(), 2);
    }

    #[test]
    fn browse_excludes_unpublished() {
        let (db, rid) = seeded();
        let mut hidden = listing(rid, "Unlisted");
        hidden.is_published = false;
        db.insert_listing(&listing(rid, "Visible")).unwrap();
        db.insert_listing(&hidden).unwrap();

        let query = ListingQuery::published();
        let window = PageWindow::resolve(None, 6, db.count_listings(&query).unwrap());
        let rows = db.search_listings(&query, &window).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_published);
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let (db, rid) = seeded();
        let mut l = listing(rid, "Loft");
        l.description = "Bright loft with EXPOSED brick".to_string();
        db.insert_listing(&l).unwrap();

        let query = ListingQuery {
            keywords: Some("exposed brick".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(db.count_listings(&query).unwrap(), 1);

        let query = ListingQuery {
            keywords: Some("garage".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(db.count_listings(&query).unwrap(), 0);
    }

    #[test]
    fn city_match_is_exact_but_case_insensitive() {
        let (db, rid) = seeded();
        db.insert_listing(&listing(rid, "Toronto condo")).unwrap();

        let exact = ListingQuery {
            city: Some("toronto".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(db.count_listings(&exact).unwrap(), 1);

        let prefix = ListingQuery {
            city: Some("Tor".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(db.count_listings(&prefix).unwrap(), 0);
    }

    #[test]
    fn results_sort_newest_first() {
        let (db, rid) = seeded();
        let mut old = listing(rid, "Old");
        old.list_date = "2024-01-01 08:00:00".to_string();
        let mut mid = listing(rid, "Mid");
        mid.list_date = "2024-02-01 08:00:00".to_string();
        let mut new = listing(rid, "New");
        new.list_date = "2024-03-01 08:00:00".to_string();
        for l in [&old, &new, &mid] {
            db.insert_listing(l).unwrap();
        }

        let query = ListingQuery::published();
        let window = PageWindow::resolve(None, 6, 3);
        let titles: Vec<String> = db
            .search_listings(&query, &window)
            .unwrap()
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(titles, vec!["New", "Mid", "Old"]);
    }

    #[test]
    fn windows_cut_six_per_page() {
        let (db, rid) = seeded();
        for n in 0..13 {
            let mut l = listing(rid, &format!("Listing {n}"));
            l.list_date = format!("2024-03-{:02} 10:00:00", n + 1);
            db.insert_listing(&l).unwrap();
        }

        let query = ListingQuery::published();
        let total = db.count_listings(&query).unwrap();
        assert_eq!(total, 13);

        let first = db
            .search_listings(&query, &PageWindow::resolve(Some(1), 6, total))
            .unwrap();
        assert_eq!(first.len(), 6);
        assert_eq!(first[0].title, "Listing 12");

        // Past-the-end clamps to the last page, which holds the remainder.
        let last = db
            .search_listings(&query, &PageWindow::resolve(Some(50), 6, total))
            .unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].title, "Listing 0");
    }

    #[test]
    fn home_preview_is_published_and_capped() {
        let (db, rid) = seeded();
        for n in 0..5 {
            let mut l = listing(rid, &format!("Listing {n}"));
            l.list_date = format!("2024-03-{:02} 10:00:00", n + 1);
            l.is_published = n != 4;
            db.insert_listing(&l).unwrap();
        }

        let preview = db.latest_published(3).unwrap();
        assert_eq!(preview.len(), 3);
        assert!(preview.iter().all(|l| l.is_published));
        // Listing 4 is the newest but unpublished.
        assert_eq!(preview[0].title, "Listing 3");
    }

    #[test]
    fn realtor_listings_split_mvp() {
        let (db, _) = seeded();
        db.insert_realtor(&realtor("Sam", false, "2023-01-15 09:00:00"))
            .unwrap();

        let all = db.list_realtors().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Sam");

        let mvps = db.mvp_realtors().unwrap();
        assert_eq!(mvps.len(), 1);
        assert_eq!(mvps[0].name, "Jane");
    }

    #[test]
    fn contact_roundtrip_and_duplicate_check() {
        let (db, rid) = seeded();
        let listing_id = db.insert_listing(&listing(rid, "Condo")).unwrap();

        let contact = NewContact {
            listing_id,
            listing: "Condo".to_string(),
            name: "Pat".to_string(),
            email: "pat@example.com".to_string(),
            phone: "416-555-0199".to_string(),
            message: "Is it still available?".to_string(),
            user_id: "user-1".to_string(),
        };
        db.insert_contact(&contact).unwrap();

        assert!(db.has_contacted(listing_id, "user-1").unwrap());
        assert!(!db.has_contacted(listing_id, "user-2").unwrap());

        let mine = db.contacts_for_user("user-1").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].listing, "Condo");
    }

    #[test]
    fn users_lookup_by_username_and_email() {
        let (db, _) = seeded();
        db.create_user("u-1", "pat", "pat@example.com", "hash").unwrap();

        assert!(db.get_user_by_username("pat").unwrap().is_some());
        assert!(db.get_user_by_email("pat@example.com").unwrap().is_some());
        assert!(db.get_user_by_id("u-2").unwrap().is_none());
    }

    #[test]
    fn missing_listing_is_none() {
        let (db, _) = seeded();
        assert!(db.get_listing(42).unwrap().is_none());
    }
}
