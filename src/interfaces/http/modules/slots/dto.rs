//! Slot DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Slot, SlotAvailability};

/// `?date=` accepts `YYYY-MM-DD`, `DD-MM-YYYY` or `DD/MM/YYYY`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotQuery {
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotDto {
    /// `HH:MM:SS`
    pub start_time: String,
    pub end_time: String,
}

impl From<Slot> for SlotDto {
    fn from(slot: Slot) -> Self {
        Self {
            start_time: slot.window.start.format("%H:%M:%S").to_string(),
            end_time: slot.window.end.format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotBoardEntryDto {
    pub start_time: String,
    pub end_time: String,
    /// Derived from active bookings at request time
    pub available: bool,
}

impl From<SlotAvailability> for SlotBoardEntryDto {
    fn from(entry: SlotAvailability) -> Self {
        let SlotDto {
            start_time,
            end_time,
        } = SlotDto::from(entry.slot);
        Self {
            start_time,
            end_time,
            available: entry.available,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FreeSlotsResponse {
    pub charger_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub slots: Vec<SlotDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotBoardResponse {
    pub charger_id: String,
    pub date: String,
    pub slots: Vec<SlotBoardEntryDto>,
}
