//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::{bookings, health, metrics, revenue, slots};
use crate::application::BookingServices;
use crate::auth::{admin_middleware, auth_middleware, AuthState, JwtConfig};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handlers::health_check,
        slots::handlers::list_free_slots,
        slots::handlers::slot_board,
        bookings::handlers::create_booking,
        bookings::handlers::list_my_bookings,
        bookings::handlers::get_booking,
        bookings::handlers::booking_history,
        bookings::handlers::confirm_booking,
        bookings::handlers::cancel_booking,
        bookings::handlers::complete_booking,
        bookings::handlers::list_charger_bookings,
        bookings::handlers::list_owner_bookings,
        revenue::handlers::owner_revenue,
        revenue::handlers::list_revenue,
        revenue::handlers::reconcile_revenue,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            slots::SlotDto,
            slots::SlotBoardEntryDto,
            slots::FreeSlotsResponse,
            slots::SlotBoardResponse,
            bookings::CreateBookingRequest,
            bookings::BookingDto,
            bookings::PaymentDto,
            bookings::BookingDetailsDto,
            bookings::BookingEventDto,
            revenue::RevenueDto,
            revenue::ReconciliationDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Slots", description = "Slot generation and availability per charger and day"),
        (name = "Bookings", description = "Overlap-safe booking and the booking/payment lifecycle"),
        (name = "Revenue", description = "Per-owner revenue totals and reconciliation"),
    ),
    info(
        title = "ChargeSlot Booking API",
        version = "1.0.0",
        description = "Charger slot reservation and booking conflict engine",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

pub fn create_api_router(
    services: BookingServices,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState { jwt_config };

    // Admin routes: admin check runs inside the auth layer added below
    let admin_routes = Router::new()
        .route(
            "/bookings/{booking_id}/complete",
            post(bookings::complete_booking),
        )
        .route(
            "/chargers/{charger_id}/bookings",
            get(bookings::list_charger_bookings),
        )
        .route("/revenue", get(revenue::list_revenue))
        .route("/revenue/reconcile", get(revenue::reconcile_revenue))
        .route_layer(middleware::from_fn(admin_middleware));

    let api_routes = Router::new()
        .route(
            "/bookings",
            get(bookings::list_my_bookings).post(bookings::create_booking),
        )
        .route("/bookings/{booking_id}", get(bookings::get_booking))
        .route(
            "/bookings/{booking_id}/history",
            get(bookings::booking_history),
        )
        .route(
            "/bookings/{booking_id}/confirm",
            post(bookings::confirm_booking),
        )
        .route("/bookings/{booking_id}/cancel", put(bookings::cancel_booking))
        .route("/chargers/{charger_id}/slots", get(slots::list_free_slots))
        .route("/chargers/{charger_id}/slots/board", get(slots::slot_board))
        .route(
            "/owners/{owner_id}/bookings",
            get(bookings::list_owner_bookings),
        )
        .route("/owners/{owner_id}/revenue", get(revenue::owner_revenue))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(services.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db,
            clock: services.clock.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};

    use crate::auth::create_token;
    use crate::config::BookingConfig;
    use crate::domain::RepositoryProvider;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::test_support::{clock, seeded_db};

    async fn app() -> Router {
        let db = seeded_db().await;
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let services = BookingServices::new(repos, &BookingConfig::default(), clock()).unwrap();
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_api_router(services, db, JwtConfig::default(), handle)
    }

    fn token(user_id: &str, role: &str) -> String {
        create_token(user_id, user_id, role, &JwtConfig::default()).unwrap()
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        use tower::Service;

        let mut req = Request::builder().method(method).uri(uri);
        if let Some(bearer) = bearer {
            req = req.header("authorization", format!("Bearer {}", bearer));
        }
        let req = match body {
            Some(body) => req
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let resp = app.clone().into_service().call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn booking_body(start: &str, end: &str) -> Value {
        json!({
            "charger_id": "CH-1",
            "date": "2026-10-16",
            "start_time": start,
            "end_time": end,
        })
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app().await;
        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["local_date"], "2026-10-16");
    }

    #[tokio::test]
    async fn api_requires_bearer_token() {
        let app = app().await;
        let (status, body) = send(&app, "GET", "/api/v1/bookings", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "MISSING_TOKEN");

        let (status, _) = send(&app, "GET", "/api/v1/bookings", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn free_slots_accept_day_first_dates() {
        let app = app().await;
        let user = token("user-1", "user");

        let (status, body) = send(
            &app,
            "GET",
            "/api/v1/chargers/CH-1/slots?date=16-10-2026",
            Some(&user),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["date"], "2026-10-16");
        assert_eq!(body["data"]["slots"].as_array().unwrap().len(), 32);
        assert_eq!(body["data"]["slots"][0]["start_time"], "06:00:00");

        let (status, body) = send(
            &app,
            "GET",
            "/api/v1/chargers/CH-404/slots?date=2026-10-16",
            Some(&user),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "RESOURCE_NOT_FOUND");

        let (status, _) = send(
            &app,
            "GET",
            "/api/v1/chargers/CH-1/slots?date=someday",
            Some(&user),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn overlapping_booking_is_409_and_slot_disappears() {
        let app = app().await;
        let user = token("user-1", "user");

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(&user),
            Some(booking_body("13:00", "13:30")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["booking"]["total_amount"], "50.00");
        assert_eq!(body["data"]["booking"]["requester_id"], "user-1");
        assert_eq!(body["data"]["booking"]["status"], "pending");
        assert_eq!(body["data"]["payment"]["status"], "pending");

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(&token("user-2", "user")),
            Some(booking_body("13:15:00", "14:00:00")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "SLOT_CONFLICT");

        let (_, body) = send(
            &app,
            "GET",
            "/api/v1/chargers/CH-1/slots/board?date=2026-10-16",
            Some(&user),
            None,
        )
        .await;
        let board = body["data"]["slots"].as_array().unwrap();
        let taken: Vec<_> = board.iter().filter(|s| s["available"] == false).collect();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0]["start_time"], "13:00:00");
    }

    #[tokio::test]
    async fn bad_requests_are_distinguished_from_conflicts() {
        let app = app().await;
        let user = token("user-1", "user");

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(&user),
            Some(booking_body("11:00", "10:00")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_WINDOW");

        let mut far = booking_body("10:00", "11:00");
        far["date"] = json!("19-10-2026");
        let (status, body) = send(&app, "POST", "/api/v1/bookings", Some(&user), Some(far)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "DATE_OUT_OF_WINDOW");

        let mut empty = booking_body("10:00", "11:00");
        empty["charger_id"] = json!("");
        let (status, body) = send(&app, "POST", "/api/v1/bookings", Some(&user), Some(empty)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn only_the_requester_or_admin_may_cancel() {
        let app = app().await;
        let owner = token("user-1", "user");
        let stranger = token("user-2", "user");

        let (_, body) = send(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(&owner),
            Some(booking_body("09:00", "10:00")),
        )
        .await;
        let id = body["data"]["booking"]["id"].as_str().unwrap().to_string();
        let cancel = format!("/api/v1/bookings/{}/cancel", id);

        let (status, body) = send(&app, "PUT", &cancel, Some(&stranger), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "ACCESS_DENIED");

        let (status, body) = send(&app, "PUT", &cancel, Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "cancelled");

        let (status, body) = send(&app, "PUT", &cancel, Some(&owner), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ALREADY_CANCELLED");

        let (_, body) = send(&app, "GET", &format!("/api/v1/bookings/{}", id), Some(&owner), None).await;
        assert_eq!(body["data"]["payment"]["status"], "refunded");

        let (_, body) = send(
            &app,
            "GET",
            &format!("/api/v1/bookings/{}/history", id),
            Some(&owner),
            None,
        )
        .await;
        let events = body["data"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1]["to_status"], "cancelled");

        let (status, _) = send(&app, "GET", "/api/v1/bookings/nope", Some(&owner), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn completion_is_admin_only_and_feeds_owner_revenue() {
        let app = app().await;
        let user = token("user-1", "user");
        let admin = token("root", "admin");

        let (_, body) = send(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(&user),
            Some(booking_body("13:00", "13:30")),
        )
        .await;
        let id = body["data"]["booking"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/v1/bookings/{}/confirm", id),
            Some(&user),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let complete = format!("/api/v1/bookings/{}/complete", id);
        let (status, _) = send(&app, "POST", &complete, Some(&user), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, body) = send(&app, "POST", &complete, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "completed");

        let (status, body) = send(
            &app,
            "GET",
            "/api/v1/owners/owner-1/revenue",
            Some(&token("owner-1", "owner")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], "50.00");

        let (status, _) = send(&app, "GET", "/api/v1/owners/owner-1/revenue", Some(&user), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, "GET", "/api/v1/revenue/reconcile", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let reports = body["data"].as_array().unwrap();
        assert!(reports.iter().all(|r| r["consistent"] == true));

        let (_, body) = send(&app, "GET", "/api/v1/chargers/CH-1/bookings", Some(&admin), None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_public() {
        use tower::Service;

        let app = app().await;
        let req = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let resp = app.into_service().call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
