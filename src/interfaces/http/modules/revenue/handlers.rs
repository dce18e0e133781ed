//! Revenue handlers

use axum::extract::{Path, State};
use axum::{Extension, Json};

use super::dto::*;
use crate::application::BookingServices;
use crate::auth::AuthenticatedUser;
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::modules::bookings::handlers::ensure_owner_or_admin;

#[utoipa::path(
    get,
    path = "/api/v1/owners/{owner_id}/revenue",
    tag = "Revenue",
    security(("bearer_auth" = [])),
    params(("owner_id" = String, Path, description = "Charger owner ID")),
    responses(
        (status = 200, description = "Running revenue total", body = ApiResponse<RevenueDto>),
        (status = 403, description = "Neither that owner nor an admin")
    )
)]
pub async fn owner_revenue(
    State(services): State<BookingServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(owner_id): Path<String>,
) -> ApiResult<RevenueDto> {
    ensure_owner_or_admin(&user, &owner_id)?;
    let total = services.revenue.total_for(&owner_id).await?;
    Ok(Json(ApiResponse::success(total.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/revenue",
    tag = "Revenue",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stored totals of every owner", body = ApiResponse<Vec<RevenueDto>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_revenue(State(services): State<BookingServices>) -> ApiResult<Vec<RevenueDto>> {
    let totals = services.revenue.totals().await?;
    Ok(Json(ApiResponse::success(
        totals.into_iter().map(RevenueDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/revenue/reconcile",
    tag = "Revenue",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stored totals checked against completed bookings", body = ApiResponse<Vec<ReconciliationDto>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn reconcile_revenue(
    State(services): State<BookingServices>,
) -> ApiResult<Vec<ReconciliationDto>> {
    let reports = services.revenue.reconcile_all().await?;
    Ok(Json(ApiResponse::success(
        reports.into_iter().map(ReconciliationDto::from).collect(),
    )))
}
