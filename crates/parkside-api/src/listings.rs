use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::error;

use parkside_db::Database;
use parkside_db::models::ListingRow;
use parkside_db::search::{ListingQuery, PageWindow};
use parkside_types::api::{ListingResponse, Paginated};

use crate::accounts::AppState;

pub const LISTINGS_PER_PAGE: i64 = 6;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keywords: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub bedrooms: Option<String>,
    pub price: Option<String>,
    pub page: Option<String>,
}

/// `GET /listings`: published listings, newest first, six per page.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<ListingResponse>>, StatusCode> {
    let page = parse_number(query.page.as_deref());

    // Run blocking DB queries off the async runtime
    let db = state.clone();
    let (rows, window) =
        tokio::task::spawn_blocking(move || paged(&db.db, &ListingQuery::published(), page))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .map_err(|e| {
                error!("listing query failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

    Ok(Json(paginated(rows, window)))
}

/// `GET /listings/{listing_id}`: single listing, 404 when absent.
pub async fn detail(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
) -> Result<Json<ListingResponse>, StatusCode> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_listing(listing_id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("listing lookup failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let row = row.ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(listing_response(row)))
}

/// `GET /listings/search`: filtered listings. Blank parameters are no-ops
/// and unparsable numbers are treated as absent; nothing here rejects a
/// request. Unlike the browse and home views, search does not filter on
/// publication status.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Paginated<ListingResponse>>, StatusCode> {
    let listing_query = ListingQuery {
        keywords: non_empty(query.keywords),
        city: non_empty(query.city),
        province: non_empty(query.province),
        max_bedrooms: parse_number(query.bedrooms.as_deref()),
        max_price: parse_number(query.price.as_deref()),
        published_only: false,
    };
    let page = parse_number(query.page.as_deref());

    let db = state.clone();
    let (rows, window) =
        tokio::task::spawn_blocking(move || paged(&db.db, &listing_query, page))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .map_err(|e| {
                error!("search query failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

    Ok(Json(paginated(rows, window)))
}

fn paged(
    db: &Database,
    query: &ListingQuery,
    page: Option<i64>,
) -> anyhow::Result<(Vec<ListingRow>, PageWindow)> {
    let total = db.count_listings(query)?;
    let window = PageWindow::resolve(page, LISTINGS_PER_PAGE, total);
    let rows = db.search_listings(query, &window)?;
    Ok((rows, window))
}

fn paginated(rows: Vec<ListingRow>, window: PageWindow) -> Paginated<ListingResponse> {
    Paginated {
        items: rows.into_iter().map(listing_response).collect(),
        page: window.page,
        per_page: window.per_page,
        total_pages: window.total_pages,
        total_count: window.total_count,
    }
}

pub(crate) fn listing_response(row: ListingRow) -> ListingResponse {
    ListingResponse {
        id: row.id,
        realtor_id: row.realtor_id,
        title: row.title,
        description: row.description,
        address: row.address,
        city: row.city,
        province: row.province,
        postal_code: row.postal_code,
        price: row.price,
        bedrooms: row.bedrooms,
        bathrooms: row.bathrooms,
        square_feet: row.square_feet,
        photo_main: row.photo_main,
        is_published: row.is_published,
        list_date: row.list_date,
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AppStateInner;
    use axum::{Router, body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use parkside_db::models::{NewListing, NewRealtor};
    use parkside_mailer::RecordingMailer;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        let realtor_id = db
            .insert_realtor(&NewRealtor {
                name: "Jane".to_string(),
                email: "jane@parkside.example".to_string(),
                phone: "416-555-0100".to_string(),
                photo: String::new(),
                hire_date: "2021-06-01 09:00:00".to_string(),
                is_mvp: true,
            })
            .unwrap();

        for n in 0..8i64 {
            db.insert_listing(&NewListing {
                realtor_id,
                title: format!("Listing {n}"),
                description: format!("Home number {n} with a sunny porch"),
                address: format!("{n} Main St"),
                city: "Toronto".to_string(),
                province: "Ontario".to_string(),
                postal_code: "M5V 2T6".to_string(),
                price: 200_000 + n * 50_000,
                bedrooms: 1 + n % 4,
                bathrooms: 1.5,
                square_feet: 900 + n as i64 * 100,
                photo_main: String::new(),
                // Listing 7 is the newest but not yet published.
                is_published: n != 7,
                list_date: format!("2024-03-{:02} 10:00:00", n + 1),
            })
            .unwrap();
        }
        db
    }

    fn test_app() -> Router {
        let state: AppState = Arc::new(AppStateInner {
            db: seeded_db(),
            jwt_secret: "insecure-dev-secret".to_string(),
            mail_sender: "noreply@parkside.example".to_string(),
            mailer: Arc::new(RecordingMailer::default()),
        });
        Router::new()
            .route("/listings", get(index))
            .route("/listings/{listing_id}", get(detail))
            .route("/listings/search", get(search))
            .with_state(state)
    }

    async fn get_page(app: Router, uri: &str) -> Paginated<ListingResponse> {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn browse_shows_published_newest_first() {
        let page = get_page(test_app(), "/listings").await;
        assert_eq!(page.total_count, 7);
        assert_eq!(page.items.len(), 6);
        assert!(page.items.iter().all(|l| l.is_published));
        assert_eq!(page.items[0].title, "Listing 6");
    }

    #[tokio::test]
    async fn non_numeric_page_lands_on_first() {
        let page = get_page(test_app(), "/listings?page=abc").await;
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 6);
    }

    #[tokio::test]
    async fn past_the_end_page_clamps_to_last() {
        let page = get_page(test_app(), "/listings?page=99").await;
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Listing 0");
    }

    #[tokio::test]
    async fn missing_listing_is_404() {
        let res = test_app()
            .oneshot(Request::builder().uri("/listings/999").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_filters_combine_with_and() {
        let page = get_page(test_app(), "/listings/search?bedrooms=2&price=300000").await;
        assert!(!page.items.is_empty());
        assert!(page.items.iter().all(|l| l.bedrooms <= 2 && l.price <= 300_000));
    }

    #[tokio::test]
    async fn search_spans_unpublished_rows() {
        let page = get_page(test_app(), "/listings/search").await;
        assert_eq!(page.total_count, 8);
    }

    #[tokio::test]
    async fn blank_params_filter_nothing() {
        let page =
            get_page(test_app(), "/listings/search?keywords=&city=&province=&bedrooms=&price=")
                .await;
        assert_eq!(page.total_count, 8);
    }

    #[tokio::test]
    async fn city_filter_is_case_insensitive() {
        let page = get_page(test_app(), "/listings/search?city=toronto").await;
        assert_eq!(page.total_count, 8);

        let page = get_page(test_app(), "/listings/search?city=Ottawa").await;
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn numbers_parse_leniently() {
        assert_eq!(parse_number(Some("3")), Some(3));
        assert_eq!(parse_number(Some(" 3 ")), Some(3));
        assert_eq!(parse_number(Some("abc")), None);
        assert_eq!(parse_number(Some("")), None);
        assert_eq!(parse_number(None), None);
    }
}
