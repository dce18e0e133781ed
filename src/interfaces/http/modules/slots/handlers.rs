//! Availability handlers

use axum::extract::{Path, Query, State};
use axum::Json;

use super::dto::*;
use crate::application::BookingServices;
use crate::interfaces::http::common::{parse_date, ApiResponse, ApiResult};

#[utoipa::path(
    get,
    path = "/api/v1/chargers/{charger_id}/slots",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("charger_id" = String, Path, description = "Charger ID"), SlotQuery),
    responses(
        (status = 200, description = "Free slots, ascending by start time", body = ApiResponse<FreeSlotsResponse>),
        (status = 400, description = "Unparseable date"),
        (status = 404, description = "Charger not found")
    )
)]
pub async fn list_free_slots(
    State(services): State<BookingServices>,
    Path(charger_id): Path<String>,
    Query(query): Query<SlotQuery>,
) -> ApiResult<FreeSlotsResponse> {
    let date = parse_date(&query.date)?;
    let slots = services.availability.list_free(&charger_id, date).await?;

    Ok(Json(ApiResponse::success(FreeSlotsResponse {
        charger_id,
        date: date.format("%Y-%m-%d").to_string(),
        slots: slots.into_iter().map(SlotDto::from).collect(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/chargers/{charger_id}/slots/board",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("charger_id" = String, Path, description = "Charger ID"), SlotQuery),
    responses(
        (status = 200, description = "Every slot of the day with its availability", body = ApiResponse<SlotBoardResponse>),
        (status = 404, description = "Charger not found")
    )
)]
pub async fn slot_board(
    State(services): State<BookingServices>,
    Path(charger_id): Path<String>,
    Query(query): Query<SlotQuery>,
) -> ApiResult<SlotBoardResponse> {
    let date = parse_date(&query.date)?;
    let board = services.availability.slot_board(&charger_id, date).await?;

    Ok(Json(ApiResponse::success(SlotBoardResponse {
        charger_id,
        date: date.format("%Y-%m-%d").to_string(),
        slots: board.into_iter().map(SlotBoardEntryDto::from).collect(),
    })))
}
