/// Row structs mapping one-to-one onto SQLite rows. Kept separate from the
/// parkside-types API models so the DB layer stays independent.

pub struct ListingRow {
    pub id: i64,
    pub realtor_id: i64,
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub price: i64,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub square_feet: i64,
    pub photo_main: String,
    pub is_published: bool,
    pub list_date: String,
}

/// Insert payload for a listing. Listings are normally created through the
/// admin tooling, so this is exercised by tests and seed scripts.
pub struct NewListing {
    pub realtor_id: i64,
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub price: i64,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub square_feet: i64,
    pub photo_main: String,
    pub is_published: bool,
    pub list_date: String,
}

pub struct RealtorRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub photo: String,
    pub hire_date: String,
    pub is_mvp: bool,
}

pub struct NewRealtor {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub photo: String,
    pub hire_date: String,
    pub is_mvp: bool,
}

pub struct ContactRow {
    pub id: i64,
    pub listing_id: i64,
    pub listing: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub user_id: String,
    pub created_at: String,
}

pub struct NewContact {
    pub listing_id: i64,
    pub listing: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub user_id: String,
}

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}
