// Concurrent in-memory store
// The one concurrency-sensitive resource in the engine. Three guarantees:
// reserve() serializes the overlap check and insert per room, bill numbers
// come from an atomic per-day counter, and promotion usage is a
// compare-and-increment under the record's entry lock.

use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::availability::windows_overlap;
use crate::billing::format_bill_number;
use crate::error::{EngineError, LifecycleError};
use crate::model::{Booking, BookingId, Promotion, PromotionId, Room, RoomId};

#[derive(Default)]
pub struct EngineStore {
    rooms: DashMap<RoomId, Room>,
    bookings: DashMap<BookingId, Booking>,
    promotions: DashMap<PromotionId, Promotion>,
    room_locks: DashMap<RoomId, Arc<Mutex<()>>>,
    bill_counters: DashMap<NaiveDate, AtomicU32>,
    next_booking_id: AtomicI64,
}

impl EngineStore {
    pub fn new() -> Self {
        Self {
            next_booking_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    pub fn allocate_booking_id(&self) -> BookingId {
        self.next_booking_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn insert_room(&self, room: Room) {
        self.rooms.insert(room.id, room);
    }

    pub fn room(&self, id: RoomId) -> Option<Room> {
        self.rooms.get(&id).map(|r| r.clone())
    }

    pub fn rooms_snapshot(&self) -> Vec<Room> {
        self.rooms.iter().map(|r| r.clone()).collect()
    }

    pub fn insert_promotion(&self, promotion: Promotion) {
        self.promotions.insert(promotion.id, promotion);
    }

    pub fn promotion(&self, id: PromotionId) -> Option<Promotion> {
        self.promotions.get(&id).map(|p| p.clone())
    }

    pub fn promotions_snapshot(&self) -> Vec<Promotion> {
        self.promotions.iter().map(|p| p.clone()).collect()
    }

    pub fn booking(&self, id: BookingId) -> Option<Booking> {
        self.bookings.get(&id).map(|b| b.clone())
    }

    pub fn bookings_snapshot(&self) -> Vec<Booking> {
        self.bookings.iter().map(|b| b.clone()).collect()
    }

    fn room_lock(&self, room_id: RoomId) -> Arc<Mutex<()>> {
        self.room_locks
            .entry(room_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // Transactional check-and-insert. Holding the room's mutex across the
    // overlap scan and the insert is what prevents two concurrent requests
    // from both passing the in-memory overlap test.
    pub fn reserve(&self, booking: Booking) -> Result<Booking, EngineError> {
        let lock = self.room_lock(booking.room_id);
        let _guard = lock.lock();

        let conflict = self.bookings.iter().any(|existing| {
            existing.room_id == booking.room_id
                && existing.status.is_blocking()
                && windows_overlap(
                    existing.check_in,
                    existing.check_out,
                    booking.check_in,
                    booking.check_out,
                )
        });
        if conflict {
            return Err(EngineError::RoomUnavailable {
                room_id: booking.room_id,
                check_in: booking.check_in,
                check_out: booking.check_out,
            });
        }

        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    // Confirming a pending booking makes it blocking, so it runs under the
    // same room mutex as reserve(): the overlap re-scan and the status flip
    // must not interleave with a concurrent reserve or confirm on the room.
    // A sibling pending booking may have been confirmed since this one was
    // reserved; in that case the room is no longer available.
    pub fn confirm_reserved<F>(&self, id: BookingId, transition: F) -> Result<Booking, EngineError>
    where
        F: FnOnce(&mut Booking) -> Result<(), LifecycleError>,
    {
        let pending = self.booking(id).ok_or(EngineError::NotFound {
            entity: "booking",
            id,
        })?;
        let lock = self.room_lock(pending.room_id);
        let _guard = lock.lock();

        let conflict = self.bookings.iter().any(|existing| {
            existing.id != id
                && existing.room_id == pending.room_id
                && existing.status.is_blocking()
                && windows_overlap(
                    existing.check_in,
                    existing.check_out,
                    pending.check_in,
                    pending.check_out,
                )
        });
        if conflict {
            return Err(EngineError::RoomUnavailable {
                room_id: pending.room_id,
                check_in: pending.check_in,
                check_out: pending.check_out,
            });
        }

        let mut entry = self
            .bookings
            .get_mut(&id)
            .ok_or(EngineError::NotFound {
                entity: "booking",
                id,
            })?;
        transition(entry.value_mut())?;
        Ok(entry.clone())
    }

    // Row-level locking for lifecycle transitions: the closure runs under the
    // entry's exclusive lock, so two concurrent cancel/check-in attempts
    // cannot interleave.
    pub fn update_booking<F>(&self, id: BookingId, transition: F) -> Result<Booking, EngineError>
    where
        F: FnOnce(&mut Booking) -> Result<(), LifecycleError>,
    {
        let mut entry = self
            .bookings
            .get_mut(&id)
            .ok_or(EngineError::NotFound {
                entity: "booking",
                id,
            })?;
        transition(entry.value_mut())?;
        Ok(entry.clone())
    }

    // Monotonic per-day sequence; the first bill of a day is 001.
    pub fn next_bill_number(&self, today: NaiveDate) -> String {
        let counter = self
            .bill_counters
            .entry(today)
            .or_insert_with(|| AtomicU32::new(0));
        let sequence = counter.fetch_add(1, Ordering::Relaxed) + 1;
        format_bill_number(today, sequence)
    }

    // Compare-and-increment under the entry lock. Fails closed at the cap so
    // a capped promotion can never be applied one extra time.
    pub fn try_consume_promotion_usage(&self, id: PromotionId) -> Result<(), EngineError> {
        let mut entry = self
            .promotions
            .get_mut(&id)
            .ok_or(EngineError::NotFound {
                entity: "promotion",
                id,
            })?;
        let promo = entry.value_mut();
        if matches!(promo.max_usage, Some(max) if promo.usage_count >= max) {
            return Err(EngineError::UsageLimitReached { id });
        }
        promo.usage_count += 1;
        Ok(())
    }
}
