//! Booking handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::application::{BookingRequest, BookingServices};
use crate::auth::AuthenticatedUser;
use crate::domain::{BookingFilter, DomainError};
use crate::interfaces::http::common::{
    parse_date, parse_time, ApiError, ApiResponse, ApiResult, ValidatedJson,
};

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking and pending payment created", body = ApiResponse<BookingDetailsDto>),
        (status = 400, description = "Invalid window, date out of range or inactive charger"),
        (status = 404, description = "Charger not found"),
        (status = 409, description = "Window overlaps an active booking"),
        (status = 422, description = "Body failed validation")
    )
)]
pub async fn create_booking(
    State(services): State<BookingServices>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDetailsDto>>), ApiError> {
    let request = BookingRequest {
        charger_id: request.charger_id,
        requester_id: user.user_id,
        date: parse_date(&request.date)?,
        start: parse_time(&request.start_time)?,
        end: parse_time(&request.end_time)?,
    };

    let record = services.reservations.book(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(BookingDetailsDto::from(record))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's bookings, latest window first", body = ApiResponse<Vec<BookingDto>>)
    )
)]
pub async fn list_my_bookings(
    State(services): State<BookingServices>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<BookingDto>> {
    let bookings = services
        .lifecycle
        .list(&BookingFilter::Requester(user.user_id))
        .await?;
    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking with its payment", body = ApiResponse<BookingDetailsDto>),
        (status = 403, description = "Booking belongs to another requester"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(services): State<BookingServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> ApiResult<BookingDetailsDto> {
    let record = services.lifecycle.get(&booking_id, &user.actor).await?;
    Ok(Json(ApiResponse::success(record.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}/history",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Status changes, oldest first", body = ApiResponse<Vec<BookingEventDto>>),
        (status = 403, description = "Booking belongs to another requester"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn booking_history(
    State(services): State<BookingServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> ApiResult<Vec<BookingEventDto>> {
    let events = services.lifecycle.history(&booking_id, &user.actor).await?;
    Ok(Json(ApiResponse::success(
        events.into_iter().map(BookingEventDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/confirm",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = ApiResponse<BookingDto>),
        (status = 403, description = "Booking belongs to another requester"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is not pending")
    )
)]
pub async fn confirm_booking(
    State(services): State<BookingServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> ApiResult<BookingDto> {
    let booking = services.lifecycle.confirm(&booking_id, &user.actor).await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{booking_id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled, payment refunded", body = ApiResponse<BookingDto>),
        (status = 403, description = "Booking belongs to another requester"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already cancelled or completed")
    )
)]
pub async fn cancel_booking(
    State(services): State<BookingServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> ApiResult<BookingDto> {
    let booking = services.lifecycle.cancel(&booking_id, &user.actor).await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/complete",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking completed", body = ApiResponse<BookingDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is not confirmed")
    )
)]
pub async fn complete_booking(
    State(services): State<BookingServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> ApiResult<BookingDto> {
    let booking = services
        .lifecycle
        .complete(&booking_id, Some(&user.actor))
        .await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/chargers/{charger_id}/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("charger_id" = String, Path, description = "Charger ID")),
    responses(
        (status = 200, description = "Every booking on the charger", body = ApiResponse<Vec<BookingDto>>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Charger not found")
    )
)]
pub async fn list_charger_bookings(
    State(services): State<BookingServices>,
    Path(charger_id): Path<String>,
) -> ApiResult<Vec<BookingDto>> {
    let charger = services.availability.charger(&charger_id).await?;
    let bookings = services
        .lifecycle
        .list(&BookingFilter::Charger(charger.id))
        .await?;
    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/owners/{owner_id}/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("owner_id" = String, Path, description = "Charger owner ID")),
    responses(
        (status = 200, description = "Every booking on the owner's chargers", body = ApiResponse<Vec<BookingDto>>),
        (status = 403, description = "Neither that owner nor an admin")
    )
)]
pub async fn list_owner_bookings(
    State(services): State<BookingServices>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(owner_id): Path<String>,
) -> ApiResult<Vec<BookingDto>> {
    ensure_owner_or_admin(&user, &owner_id)?;
    let bookings = services
        .lifecycle
        .list(&BookingFilter::Owner(owner_id))
        .await?;
    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}

pub(crate) fn ensure_owner_or_admin(user: &AuthenticatedUser, owner_id: &str) -> Result<(), ApiError> {
    if user.is_admin() || user.user_id == owner_id {
        Ok(())
    } else {
        Err(DomainError::AccessDenied(format!("{} is not owner {}", user.user_id, owner_id)).into())
    }
}
