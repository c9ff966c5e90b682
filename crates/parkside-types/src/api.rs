use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::choices::SearchChoices;

// -- JWT Claims --

/// JWT claims shared between token creation (accounts handlers) and the
/// auth middleware. Canonical definition lives here in parkside-types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Accounts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Listings --

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingResponse {
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

/// One page of listings plus the window it was cut from.
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

// -- Pages --

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub listings: Vec<ListingResponse>,
    pub search_choices: SearchChoices,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AboutResponse {
    pub realtors: Vec<RealtorResponse>,
    pub mvp_realtors: Vec<RealtorResponse>,
}

// -- Realtors --

#[derive(Debug, Serialize, Deserialize)]
pub struct RealtorResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub photo: String,
    pub hire_date: String,
    pub is_mvp: bool,
}

// -- Contacts --

/// Form body of an inquiry submission. Field names match the public
/// contact form; `listing` is the listing title as shown to the submitter.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub user_id: String,
    pub realtor_email: String,
    pub listing_id: i64,
    pub listing: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactCreatedResponse {
    pub message: String,
    pub listing_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DuplicateInquiryResponse {
    pub error: String,
    pub listing_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
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
