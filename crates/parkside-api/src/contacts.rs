use axum::{
    Extension, Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use parkside_db::models::{ContactRow, NewContact};
use parkside_mailer::OutboundEmail;
use parkside_types::api::{
    ContactCreatedResponse, ContactRequest, ContactResponse, DuplicateInquiryResponse,
};

use crate::accounts::AppState;
use crate::middleware::MaybeClaims;

const INQUIRY_SUBJECT: &str = "Property Listing Inquiry";
const OPERATOR_EMAIL: &str = "inquiries@parkside.example";
const DUPLICATE_MESSAGE: &str = "You have already made an inquiry for this listing";
const CONFIRMATION_MESSAGE: &str =
    "Your request has been submitted, a realtor will get back to you soon";

/// `POST /contacts/contact`: persist an inquiry and notify the realtor.
///
/// An authenticated submitter's id overrides the form `user_id` and triggers
/// the duplicate pre-check. The check is read-then-write; two concurrent
/// submissions from the same user can both land.
pub async fn submit(
    State(state): State<AppState>,
    Extension(MaybeClaims(claims)): Extension<MaybeClaims>,
    Form(form): Form<ContactRequest>,
) -> Result<Response, StatusCode> {
    let user_id = match &claims {
        Some(claims) => claims.sub.to_string(),
        None => form.user_id.clone(),
    };

    if let Some(claims) = &claims {
        let db = state.clone();
        let listing_id = form.listing_id;
        let uid = claims.sub.to_string();
        let already = tokio::task::spawn_blocking(move || db.db.has_contacted(listing_id, &uid))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .map_err(|e| {
                error!("duplicate check failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

        if already {
            let payload = DuplicateInquiryResponse {
                error: DUPLICATE_MESSAGE.to_string(),
                listing_id: form.listing_id,
            };
            return Ok((StatusCode::CONFLICT, Json(payload)).into_response());
        }
    }

    let contact = NewContact {
        listing_id: form.listing_id,
        listing: form.listing.clone(),
        name: form.name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        message: form.message.clone(),
        user_id,
    };
    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.insert_contact(&contact))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("contact insert failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    // The row is committed by now; a transport failure below surfaces as a
    // server error with the inquiry already persisted.
    let email = OutboundEmail {
        from: state.mail_sender.clone(),
        to: vec![form.realtor_email.clone(), OPERATOR_EMAIL.to_string()],
        subject: INQUIRY_SUBJECT.to_string(),
        body: format!(
            "There has been an inquiry for {}. Sign into the admin panel for more info",
            form.listing
        ),
    };
    state.mailer.send(&email).await.map_err(|e| {
        error!("inquiry notification failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let payload = ContactCreatedResponse {
        message: CONFIRMATION_MESSAGE.to_string(),
        listing_id: form.listing_id,
    };
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) fn contact_response(row: ContactRow) -> ContactResponse {
    ContactResponse {
        id: row.id,
        listing_id: row.listing_id,
        listing: row.listing,
        name: row.name,
        email: row.email,
        phone: row.phone,
        message: row.message,
        user_id: row.user_id,
        created_at: row.created_at,
    }
}
