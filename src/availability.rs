// Availability calculation over a booking snapshot
// A room is available for [check_in, check_out) iff no blocking booking on it
// overlaps that half-open window. Pure given the snapshot; "today" comes from
// the injected clock.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::error::AvailabilityError;
use crate::model::{Booking, Room, RoomType};

#[derive(Debug, Clone, Default)]
pub struct RoomFilters {
    pub room_type: Option<RoomType>,
    pub min_capacity: Option<u32>,
}

// Half-open interval overlap: a checkout on the same day as a new check-in
// does not collide.
pub fn windows_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && a_end > b_start
}

pub struct AvailabilityCalculator {
    clock: Arc<dyn Clock>,
    // Administrative back-dating: when set, stays starting before today are
    // accepted instead of rejected.
    allow_past_check_in: bool,
}

impl AvailabilityCalculator {
    pub fn new(clock: Arc<dyn Clock>, allow_past_check_in: bool) -> Self {
        Self {
            clock,
            allow_past_check_in,
        }
    }

    pub fn validate_window(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<(), AvailabilityError> {
        if check_in >= check_out {
            return Err(AvailabilityError::InvalidDateRange {
                check_in,
                check_out,
            });
        }
        let today = self.clock.today();
        if !self.allow_past_check_in && check_in < today {
            return Err(AvailabilityError::PastDateRejected { check_in, today });
        }
        Ok(())
    }

    pub fn find_available_rooms(
        &self,
        rooms: &[Room],
        bookings: &[Booking],
        check_in: NaiveDate,
        check_out: NaiveDate,
        filters: &RoomFilters,
    ) -> Result<Vec<Room>, AvailabilityError> {
        self.validate_window(check_in, check_out)?;

        let available: Vec<Room> = rooms
            .iter()
            .filter(|room| {
                let type_ok = filters.room_type.map_or(true, |t| room.room_type == t);
                let capacity_ok = filters.min_capacity.map_or(true, |c| room.capacity >= c);
                type_ok && capacity_ok
            })
            .filter(|room| {
                !bookings.iter().any(|b| {
                    b.room_id == room.id
                        && b.status.is_blocking()
                        && windows_overlap(b.check_in, b.check_out, check_in, check_out)
                })
            })
            .cloned()
            .collect();

        tracing::debug!(
            %check_in,
            %check_out,
            total = rooms.len(),
            available = available.len(),
            "availability search"
        );

        Ok(available)
    }
}
