// Error types for the rules engine
// State-conflict errors are genuine business-rule violations and are reported
// verbatim to the caller; nothing here is retried automatically. Locally
// corrected conditions (discount clamping) are warnings, not errors.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::BookingStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AvailabilityError {
    #[error("check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("check-in {check_in} is in the past (today is {today})")]
    PastDateRejected {
        check_in: NaiveDate,
        today: NaiveDate,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("cancellation window of {window_hours}h has expired")]
    CancellationWindowExpired { window_hours: i64 },

    #[error("booking cannot be cancelled from status {status:?}")]
    InvalidStateForCancellation { status: BookingStatus },

    #[error("check-in date {check_in} has not been reached (today is {today})")]
    TooEarlyToCheckIn {
        check_in: NaiveDate,
        today: NaiveDate,
    },

    #[error("cannot {operation} a booking in status {from:?}")]
    InvalidTransition {
        from: BookingStatus,
        operation: &'static str,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("validation failed on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("room {room_id} is no longer available for {check_in}..{check_out}")]
    RoomUnavailable {
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("promotion {id} has reached its usage limit")]
    UsageLimitReached { id: i64 },
}

impl EngineError {
    // Machine-readable code surfaced on the JSON boundary.
    pub fn reason_code(&self) -> &'static str {
        match self {
            EngineError::Availability(AvailabilityError::InvalidDateRange { .. }) => {
                "INVALID_DATE_RANGE"
            }
            EngineError::Availability(AvailabilityError::PastDateRejected { .. }) => {
                "PAST_DATE_REJECTED"
            }
            EngineError::Lifecycle(LifecycleError::CancellationWindowExpired { .. }) => {
                "CANCELLATION_WINDOW_EXPIRED"
            }
            EngineError::Lifecycle(LifecycleError::InvalidStateForCancellation { .. }) => {
                "INVALID_STATE_FOR_CANCELLATION"
            }
            EngineError::Lifecycle(LifecycleError::TooEarlyToCheckIn { .. }) => {
                "TOO_EARLY_TO_CHECK_IN"
            }
            EngineError::Lifecycle(LifecycleError::InvalidTransition { .. }) => {
                "INVALID_TRANSITION"
            }
            EngineError::Validation { .. } => "VALIDATION_ERROR",
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::RoomUnavailable { .. } => "ROOM_UNAVAILABLE",
            EngineError::UsageLimitReached { .. } => "USAGE_LIMIT_REACHED",
        }
    }
}
