// Booking lifecycle state machine
// pending -> confirmed -> checked-in -> checked-out, with cancelled reachable
// from pending and confirmed inside the cancellation window. checked-out and
// cancelled are terminal. The cancel guard re-derives elapsed time from the
// clock on every call; time_remaining_to_cancel is advisory only.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::error::LifecycleError;
use crate::model::{Booking, BookingId, BookingStatus, RoomId};

pub const DEFAULT_CANCELLATION_WINDOW_HOURS: i64 = 24;

pub struct BookingLifecycle {
    clock: Arc<dyn Clock>,
    cancellation_window: Duration,
}

impl BookingLifecycle {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_cancellation_window(clock, Duration::hours(DEFAULT_CANCELLATION_WINDOW_HOURS))
    }

    pub fn with_cancellation_window(clock: Arc<dyn Clock>, window: Duration) -> Self {
        Self {
            clock,
            cancellation_window: window,
        }
    }

    // Caller decides the initial status: Confirmed when payment is
    // synchronous, Pending when it settles later.
    pub fn create(
        &self,
        id: BookingId,
        room_id: RoomId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
        total_amount: Decimal,
        initial_status: BookingStatus,
    ) -> Result<Booking, LifecycleError> {
        if !matches!(
            initial_status,
            BookingStatus::Pending | BookingStatus::Confirmed
        ) {
            return Err(LifecycleError::InvalidTransition {
                from: initial_status,
                operation: "create",
            });
        }

        Ok(Booking {
            id,
            room_id,
            check_in,
            check_out,
            guests,
            status: initial_status,
            created_at: self.clock.now(),
            total_amount,
        })
    }

    pub fn confirm(&self, booking: &mut Booking) -> Result<(), LifecycleError> {
        if booking.status != BookingStatus::Pending {
            return Err(LifecycleError::InvalidTransition {
                from: booking.status,
                operation: "confirm",
            });
        }
        booking.status = BookingStatus::Confirmed;
        Ok(())
    }

    pub fn cancel(&self, booking: &mut Booking) -> Result<(), LifecycleError> {
        match booking.status {
            BookingStatus::Pending | BookingStatus::Confirmed => {}
            status => {
                return Err(LifecycleError::InvalidStateForCancellation { status });
            }
        }

        let elapsed = self.clock.now() - booking.created_at;
        if elapsed > self.cancellation_window {
            return Err(LifecycleError::CancellationWindowExpired {
                window_hours: self.cancellation_window.num_hours(),
            });
        }

        booking.status = BookingStatus::Cancelled;
        tracing::debug!(booking_id = booking.id, "booking cancelled");
        Ok(())
    }

    // Date-only comparison: check-in opens at midnight of the stay's first
    // day, not at a time of day.
    pub fn check_in(&self, booking: &mut Booking) -> Result<(), LifecycleError> {
        if booking.status != BookingStatus::Confirmed {
            return Err(LifecycleError::InvalidTransition {
                from: booking.status,
                operation: "check in",
            });
        }
        let today = self.clock.today();
        if today < booking.check_in {
            return Err(LifecycleError::TooEarlyToCheckIn {
                check_in: booking.check_in,
                today,
            });
        }
        booking.status = BookingStatus::CheckedIn;
        Ok(())
    }

    pub fn check_out(&self, booking: &mut Booking) -> Result<(), LifecycleError> {
        if booking.status != BookingStatus::CheckedIn {
            return Err(LifecycleError::InvalidTransition {
                from: booking.status,
                operation: "check out",
            });
        }
        booking.status = BookingStatus::CheckedOut;
        Ok(())
    }

    // Countdown helper for guest-facing UIs. Not an authoritative guard:
    // cancel() recomputes from the clock.
    pub fn time_remaining_to_cancel(&self, booking: &Booking) -> Option<Duration> {
        if !matches!(
            booking.status,
            BookingStatus::Pending | BookingStatus::Confirmed
        ) {
            return None;
        }
        let deadline = booking.created_at + self.cancellation_window;
        let remaining = deadline - self.clock.now();
        // Inclusive at the deadline: cancel() still succeeds at exactly
        // created_at + window, so the countdown reports zero, not None.
        if remaining >= Duration::zero() {
            Some(remaining)
        } else {
            None
        }
    }
}
