use axum::{
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use parkside_types::api::Claims;

fn jwt_secret() -> String {
    std::env::var("PARKSIDE_JWT_SECRET").unwrap_or_else(|_| "insecure-dev-secret".into())
}

fn claims_from_header(req: &Request) -> Option<Claims> {
    let auth_header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

/// Extract and validate JWT from Authorization header.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let claims = claims_from_header(&req).ok_or(StatusCode::UNAUTHORIZED)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Identity of the submitter when a valid token was presented. The contact
/// form also works for anonymous visitors, so a missing or invalid token is
/// not an error here.
#[derive(Debug, Clone)]
pub struct MaybeClaims(pub Option<Claims>);

pub async fn optional_auth(mut req: Request, next: Next) -> Response {
    let claims = claims_from_header(&req);
    req.extensions_mut().insert(MaybeClaims(claims));
    next.run(req).await
}
