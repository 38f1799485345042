// JSON boundary types and the engine facade
// Wire framing (HTTP, sessions, payments) is owned by external collaborators;
// this module only defines the request/response shapes and wires the
// calculator, lifecycle, evaluator and store together.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::availability::{AvailabilityCalculator, RoomFilters};
use crate::billing::{self, BillTotals, DEFAULT_SERVICE_CHARGE_PCT, DEFAULT_VAT_PCT};
use crate::clock::Clock;
use crate::error::EngineError;
use crate::lifecycle::{BookingLifecycle, DEFAULT_CANCELLATION_WINDOW_HOURS};
use crate::model::{
    Booking, BookingId, BookingStatus, OrderLine, Promotion, Room, RoomId, RoomType,
};
use crate::promotion::PromotionEvaluator;
use crate::store::EngineStore;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    // Administrative back-dating of stays; off for guest-facing traffic.
    pub allow_past_check_in: bool,
    pub cancellation_window_hours: i64,
    pub service_charge_pct: Decimal,
    pub vat_pct: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_past_check_in: false,
            cancellation_window_hours: DEFAULT_CANCELLATION_WINDOW_HOURS,
            service_charge_pct: Decimal::from(DEFAULT_SERVICE_CHARGE_PCT),
            vat_pct: Decimal::from(DEFAULT_VAT_PCT),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySearchRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub room_type: Option<RoomType>,
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySearchResponse {
    pub available_rooms: Vec<Room>,
    pub total_available: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    // Payment settles asynchronously: start Pending instead of Confirmed.
    #[serde(default)]
    pub deferred_payment: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub booking_id: BookingId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingResponse {
    pub booking_id: BookingId,
    pub cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBillRequest {
    pub lines: Vec<OrderLine>,
    pub service_charge_percentage: Option<Decimal>,
    pub vat_percentage: Option<Decimal>,
    // Explicit manual discount; suppresses promotion matching.
    pub discount: Option<Decimal>,
    pub discount_reason: Option<String>,
    // Order category used for category-scoped promotions.
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBillResponse {
    pub bill_number: String,
    pub pricing: BillTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_reason: Option<String>,
}

// Wire-supplied counts; the sum must stay a u32.
fn guest_count(adults: u32, children: u32) -> Result<u32, EngineError> {
    adults
        .checked_add(children)
        .ok_or_else(|| EngineError::Validation {
            field: "adults".to_string(),
            message: "guest count is out of range".to_string(),
        })
}

pub struct Engine {
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    store: EngineStore,
    availability: AvailabilityCalculator,
    lifecycle: BookingLifecycle,
    evaluator: PromotionEvaluator,
}

impl Engine {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let availability = AvailabilityCalculator::new(clock.clone(), config.allow_past_check_in);
        let lifecycle = BookingLifecycle::with_cancellation_window(
            clock.clone(),
            Duration::hours(config.cancellation_window_hours),
        );
        Self {
            clock,
            config,
            store: EngineStore::new(),
            availability,
            lifecycle,
            evaluator: PromotionEvaluator::new(),
        }
    }

    pub fn store(&self) -> &EngineStore {
        &self.store
    }

    // Reference data, maintained by external inventory/admin collaborators.
    pub fn add_room(&self, room: Room) {
        self.store.insert_room(room);
    }

    pub fn add_promotion(&self, promotion: Promotion) -> Result<(), EngineError> {
        promotion.validate()?;
        self.store.insert_promotion(promotion);
        Ok(())
    }

    pub fn search_availability(
        &self,
        request: &AvailabilitySearchRequest,
    ) -> Result<AvailabilitySearchResponse, EngineError> {
        let filters = RoomFilters {
            room_type: request.room_type,
            min_capacity: match guest_count(request.adults, request.children)? {
                0 => None,
                n => Some(n),
            },
        };
        let rooms = self.store.rooms_snapshot();
        let bookings = self.store.bookings_snapshot();
        let available = self.availability.find_available_rooms(
            &rooms,
            &bookings,
            request.check_in,
            request.check_out,
            &filters,
        )?;

        Ok(AvailabilitySearchResponse {
            total_available: available.len(),
            available_rooms: available,
        })
    }

    // The room's availability is re-checked inside reserve() under the room
    // lock; the snapshot test in search_availability is advisory only.
    pub fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, EngineError> {
        self.availability
            .validate_window(request.check_in, request.check_out)?;

        let room = self
            .store
            .room(request.room_id)
            .ok_or(EngineError::NotFound {
                entity: "room",
                id: request.room_id,
            })?;

        let guests = guest_count(request.adults, request.children)?;
        if guests == 0 {
            return Err(EngineError::Validation {
                field: "adults".to_string(),
                message: "booking needs at least one guest".to_string(),
            });
        }
        if guests > room.capacity {
            return Err(EngineError::Validation {
                field: "adults".to_string(),
                message: format!("room {} sleeps at most {}", room.id, room.capacity),
            });
        }

        let nights = (request.check_out - request.check_in).num_days();
        let total_amount = room.base_rate * Decimal::from(nights);
        let initial_status = if request.deferred_payment {
            BookingStatus::Pending
        } else {
            BookingStatus::Confirmed
        };

        let booking = self.lifecycle.create(
            self.store.allocate_booking_id(),
            room.id,
            request.check_in,
            request.check_out,
            guests,
            total_amount,
            initial_status,
        )?;
        self.store.reserve(booking)
    }

    // Pending bookings do not block the room, so availability is re-checked
    // at confirmation time; a room taken since the reservation is a state
    // conflict, not a silent promotion.
    pub fn confirm_booking(&self, id: BookingId) -> Result<Booking, EngineError> {
        self.store
            .confirm_reserved(id, |b| self.lifecycle.confirm(b))
    }

    pub fn cancel_booking(&self, request: &CancelBookingRequest) -> CancelBookingResponse {
        let result = self
            .store
            .update_booking(request.booking_id, |b| self.lifecycle.cancel(b));

        match result {
            Ok(_) => CancelBookingResponse {
                booking_id: request.booking_id,
                cancelled: true,
                reason_code: None,
                message: None,
            },
            Err(err) => CancelBookingResponse {
                booking_id: request.booking_id,
                cancelled: false,
                reason_code: Some(err.reason_code().to_string()),
                message: Some(err.to_string()),
            },
        }
    }

    pub fn check_in(&self, id: BookingId) -> Result<Booking, EngineError> {
        self.store
            .update_booking(id, |b| self.lifecycle.check_in(b))
    }

    pub fn check_out(&self, id: BookingId) -> Result<Booking, EngineError> {
        self.store
            .update_booking(id, |b| self.lifecycle.check_out(b))
    }

    pub fn time_remaining_to_cancel(&self, id: BookingId) -> Result<Option<Duration>, EngineError> {
        let booking = self.store.booking(id).ok_or(EngineError::NotFound {
            entity: "booking",
            id,
        })?;
        Ok(self.lifecycle.time_remaining_to_cancel(&booking))
    }

    // When no manual discount is given, candidate promotions compete and the
    // single largest discount wins (ties break on the lower id). Usage is
    // consumed atomically before the discount lands on the bill; a candidate
    // capped out by a concurrent bill is skipped.
    pub fn generate_bill(
        &self,
        request: &GenerateBillRequest,
    ) -> Result<GenerateBillResponse, EngineError> {
        let service_pct = request
            .service_charge_percentage
            .unwrap_or(self.config.service_charge_pct);
        let vat_pct = request.vat_percentage.unwrap_or(self.config.vat_pct);

        let subtotal: Decimal = request
            .lines
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum();

        let (discount, discount_reason) = match request.discount {
            Some(manual) => {
                if manual < Decimal::ZERO {
                    return Err(EngineError::Validation {
                        field: "discount".to_string(),
                        message: "must not be negative".to_string(),
                    });
                }
                (manual, request.discount_reason.clone())
            }
            None => self.best_promotion_discount(subtotal, request.category.as_deref()),
        };

        let pricing = billing::compute_totals(&request.lines, service_pct, vat_pct, discount);
        let bill_number = self.store.next_bill_number(self.clock.today());

        Ok(GenerateBillResponse {
            bill_number,
            pricing,
            discount_reason,
        })
    }

    fn best_promotion_discount(
        &self,
        subtotal: Decimal,
        category: Option<&str>,
    ) -> (Decimal, Option<String>) {
        let now = self.clock.now();

        let mut candidates: Vec<(Decimal, Promotion)> = self
            .store
            .promotions_snapshot()
            .into_iter()
            .filter(|p| category.map_or(true, |c| self.evaluator.applies_to_category(p, c)))
            .filter_map(|p| {
                let amount = self.evaluator.calculate_discount(&p, subtotal, now);
                (amount > Decimal::ZERO).then_some((amount, p))
            })
            .collect();

        // Largest discount first, lower id breaking ties.
        candidates.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.id.cmp(&b.1.id)));

        for (amount, promo) in candidates {
            match self.store.try_consume_promotion_usage(promo.id) {
                Ok(()) => return (amount, Some(promo.name)),
                Err(EngineError::UsageLimitReached { id }) => {
                    tracing::warn!(promotion_id = id, "promotion capped out, trying next");
                }
                Err(err) => {
                    tracing::warn!(promotion_id = promo.id, %err, "skipping promotion");
                }
            }
        }
        (Decimal::ZERO, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::model::PromotionKind;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine_at(now: NaiveDateTime) -> (Arc<FixedClock>, Engine) {
        let clock = Arc::new(FixedClock::new(now));
        let engine = Engine::new(EngineConfig::default(), clock.clone());
        engine.add_room(Room {
            id: 1,
            room_type: RoomType::Double,
            capacity: 2,
            base_rate: dec!(12000),
        });
        engine.add_room(Room {
            id: 2,
            room_type: RoomType::Suite,
            capacity: 4,
            base_rate: dec!(30000),
        });
        (clock, engine)
    }

    fn percentage_promo(id: i64, name: &str, pct: u32) -> Promotion {
        Promotion {
            id,
            name: name.to_string(),
            discount_percentage: pct,
            kind: PromotionKind::Percentage,
            min_order_amount: dec!(0),
            max_discount_amount: None,
            is_active: true,
            usage_count: 0,
            max_usage: None,
        }
    }

    #[test]
    fn search_then_book_then_room_disappears_from_search() {
        let (_, engine) = engine_at(at(2025, 3, 1, 10));

        let search = AvailabilitySearchRequest {
            check_in: date(2025, 3, 10),
            check_out: date(2025, 3, 12),
            room_type: None,
            adults: 2,
            children: 0,
        };
        let response = engine.search_availability(&search).unwrap();
        assert_eq!(response.total_available, 2);

        let booking = engine
            .create_booking(&CreateBookingRequest {
                room_id: 1,
                check_in: date(2025, 3, 10),
                check_out: date(2025, 3, 12),
                adults: 2,
                children: 0,
                deferred_payment: false,
            })
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.total_amount, dec!(24000));

        let response = engine.search_availability(&search).unwrap();
        assert_eq!(response.total_available, 1);
        assert_eq!(response.available_rooms[0].id, 2);
    }

    #[test]
    fn double_booking_rejected_at_reserve_time() {
        let (_, engine) = engine_at(at(2025, 3, 1, 10));
        let request = CreateBookingRequest {
            room_id: 1,
            check_in: date(2025, 3, 10),
            check_out: date(2025, 3, 12),
            adults: 2,
            children: 0,
            deferred_payment: false,
        };
        engine.create_booking(&request).unwrap();
        let err = engine.create_booking(&request).unwrap_err();
        assert_eq!(err.reason_code(), "ROOM_UNAVAILABLE");
    }

    #[test]
    fn booking_rejects_overflowing_guest_count() {
        let (_, engine) = engine_at(at(2025, 3, 1, 10));
        let err = engine
            .create_booking(&CreateBookingRequest {
                room_id: 1,
                check_in: date(2025, 3, 10),
                check_out: date(2025, 3, 12),
                adults: 2,
                children: 1,
                deferred_payment: false,
            })
            .unwrap_err();
        assert_eq!(err.reason_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn overflowing_guest_counts_are_rejected_not_panicked() {
        let (_, engine) = engine_at(at(2025, 3, 1, 10));

        let err = engine
            .search_availability(&AvailabilitySearchRequest {
                check_in: date(2025, 3, 10),
                check_out: date(2025, 3, 12),
                room_type: None,
                adults: u32::MAX,
                children: 1,
            })
            .unwrap_err();
        assert_eq!(err.reason_code(), "VALIDATION_ERROR");

        let err = engine
            .create_booking(&CreateBookingRequest {
                room_id: 1,
                check_in: date(2025, 3, 10),
                check_out: date(2025, 3, 12),
                adults: u32::MAX,
                children: 1,
                deferred_payment: false,
            })
            .unwrap_err();
        assert_eq!(err.reason_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn cancel_response_carries_reason_code_after_window() {
        let (clock, engine) = engine_at(at(2025, 3, 1, 10));
        let booking = engine
            .create_booking(&CreateBookingRequest {
                room_id: 1,
                check_in: date(2025, 3, 10),
                check_out: date(2025, 3, 12),
                adults: 2,
                children: 0,
                deferred_payment: false,
            })
            .unwrap();

        clock.advance(Duration::hours(25));
        let response = engine.cancel_booking(&CancelBookingRequest {
            booking_id: booking.id,
        });
        assert!(!response.cancelled);
        assert_eq!(
            response.reason_code.as_deref(),
            Some("CANCELLATION_WINDOW_EXPIRED")
        );
    }

    #[test]
    fn cancelled_booking_frees_the_room() {
        let (_, engine) = engine_at(at(2025, 3, 1, 10));
        let request = CreateBookingRequest {
            room_id: 1,
            check_in: date(2025, 3, 10),
            check_out: date(2025, 3, 12),
            adults: 2,
            children: 0,
            deferred_payment: false,
        };
        let booking = engine.create_booking(&request).unwrap();

        let response = engine.cancel_booking(&CancelBookingRequest {
            booking_id: booking.id,
        });
        assert!(response.cancelled);

        // Availability is derived from booking state, never cached.
        engine.create_booking(&request).unwrap();
    }

    #[test]
    fn deferred_payment_flow_pending_confirm_check_in_out() {
        let (clock, engine) = engine_at(at(2025, 3, 1, 10));
        let booking = engine
            .create_booking(&CreateBookingRequest {
                room_id: 1,
                check_in: date(2025, 3, 10),
                check_out: date(2025, 3, 12),
                adults: 1,
                children: 0,
                deferred_payment: true,
            })
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);

        let booking = engine.confirm_booking(booking.id).unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);

        let err = engine.check_in(booking.id).unwrap_err();
        assert_eq!(err.reason_code(), "TOO_EARLY_TO_CHECK_IN");

        clock.set(at(2025, 3, 10, 14));
        let booking = engine.check_in(booking.id).unwrap();
        assert_eq!(booking.status, BookingStatus::CheckedIn);

        let booking = engine.check_out(booking.id).unwrap();
        assert_eq!(booking.status, BookingStatus::CheckedOut);
    }

    #[test]
    fn second_pending_booking_cannot_confirm_once_room_is_taken() {
        let (_, engine) = engine_at(at(2025, 3, 1, 10));
        let request = CreateBookingRequest {
            room_id: 1,
            check_in: date(2025, 3, 10),
            check_out: date(2025, 3, 12),
            adults: 2,
            children: 0,
            deferred_payment: true,
        };

        // Two deferred-payment guests race for the same room and window;
        // neither blocks the other at reservation time.
        let first = engine.create_booking(&request).unwrap();
        let second = engine.create_booking(&request).unwrap();

        let first = engine.confirm_booking(first.id).unwrap();
        assert_eq!(first.status, BookingStatus::Confirmed);

        // Confirmed bookings on a room must have non-overlapping windows, so
        // the losing guest gets a state conflict instead of a double booking.
        let err = engine.confirm_booking(second.id).unwrap_err();
        assert_eq!(err.reason_code(), "ROOM_UNAVAILABLE");
        assert_eq!(
            engine.store().booking(second.id).unwrap().status,
            BookingStatus::Pending
        );
    }

    #[test]
    fn pending_booking_confirms_after_rival_cancels() {
        let (_, engine) = engine_at(at(2025, 3, 1, 10));
        let request = CreateBookingRequest {
            room_id: 1,
            check_in: date(2025, 3, 10),
            check_out: date(2025, 3, 12),
            adults: 2,
            children: 0,
            deferred_payment: true,
        };
        let first = engine.create_booking(&request).unwrap();
        let second = engine.create_booking(&request).unwrap();

        engine.confirm_booking(first.id).unwrap();
        let response = engine.cancel_booking(&CancelBookingRequest {
            booking_id: first.id,
        });
        assert!(response.cancelled);

        let second = engine.confirm_booking(second.id).unwrap();
        assert_eq!(second.status, BookingStatus::Confirmed);
    }

    #[test]
    fn unknown_booking_is_not_found() {
        let (_, engine) = engine_at(at(2025, 3, 1, 10));
        let response = engine.cancel_booking(&CancelBookingRequest { booking_id: 404 });
        assert!(!response.cancelled);
        assert_eq!(response.reason_code.as_deref(), Some("NOT_FOUND"));

        let err = engine.time_remaining_to_cancel(404).unwrap_err();
        assert_eq!(err.reason_code(), "NOT_FOUND");
    }

    #[test]
    fn bill_uses_defaults_and_sequential_numbers() {
        let (_, engine) = engine_at(at(2025, 1, 20, 12));
        let request = GenerateBillRequest {
            lines: vec![OrderLine {
                name: "set menu".to_string(),
                unit_price: dec!(500),
                quantity: 2,
            }],
            service_charge_percentage: None,
            vat_percentage: None,
            discount: None,
            discount_reason: None,
            category: None,
        };

        let first = engine.generate_bill(&request).unwrap();
        assert_eq!(first.bill_number, "BH20250120001");
        assert_eq!(first.pricing.subtotal, dec!(1000));
        assert_eq!(first.pricing.service_charge, dec!(100));
        assert_eq!(first.pricing.vat, dec!(165));
        assert_eq!(first.pricing.total, dec!(1265));

        let second = engine.generate_bill(&request).unwrap();
        assert_eq!(second.bill_number, "BH20250120002");
    }

    #[test]
    fn largest_discount_wins_and_consumes_usage() {
        let (_, engine) = engine_at(at(2025, 1, 20, 12));
        engine.add_promotion(percentage_promo(1, "small", 5)).unwrap();
        engine.add_promotion(percentage_promo(2, "big", 20)).unwrap();

        let response = engine
            .generate_bill(&GenerateBillRequest {
                lines: vec![OrderLine {
                    name: "dinner".to_string(),
                    unit_price: dec!(1000),
                    quantity: 1,
                }],
                service_charge_percentage: None,
                vat_percentage: None,
                discount: None,
                discount_reason: None,
                category: None,
            })
            .unwrap();

        assert_eq!(response.pricing.discount, dec!(200));
        assert_eq!(response.discount_reason.as_deref(), Some("big"));
        assert_eq!(engine.store().promotion(2).unwrap().usage_count, 1);
        assert_eq!(engine.store().promotion(1).unwrap().usage_count, 0);
    }

    #[test]
    fn capped_out_promotion_falls_back_to_next_best() {
        let (_, engine) = engine_at(at(2025, 1, 20, 12));
        let mut big = percentage_promo(1, "big", 20);
        big.max_usage = Some(1);
        big.usage_count = 1;
        // Capped promotions are invalid for new discounts, so only "small"
        // can land on the bill.
        engine.add_promotion(big).unwrap();
        engine.add_promotion(percentage_promo(2, "small", 5)).unwrap();

        let response = engine
            .generate_bill(&GenerateBillRequest {
                lines: vec![OrderLine {
                    name: "dinner".to_string(),
                    unit_price: dec!(1000),
                    quantity: 1,
                }],
                service_charge_percentage: None,
                vat_percentage: None,
                discount: None,
                discount_reason: None,
                category: None,
            })
            .unwrap();

        assert_eq!(response.pricing.discount, dec!(50));
        assert_eq!(response.discount_reason.as_deref(), Some("small"));
    }

    #[test]
    fn category_scoped_promotion_only_applies_to_its_category() {
        let (_, engine) = engine_at(at(2025, 1, 20, 12));
        engine
            .add_promotion(Promotion {
                id: 1,
                name: "drinks offer".to_string(),
                discount_percentage: 10,
                kind: PromotionKind::Category {
                    categories: vec!["beverages".to_string()],
                },
                min_order_amount: dec!(0),
                max_discount_amount: None,
                is_active: true,
                usage_count: 0,
                max_usage: None,
            })
            .unwrap();

        let bill = |category: Option<&str>| {
            engine
                .generate_bill(&GenerateBillRequest {
                    lines: vec![OrderLine {
                        name: "order".to_string(),
                        unit_price: dec!(800),
                        quantity: 1,
                    }],
                    service_charge_percentage: None,
                    vat_percentage: None,
                    discount: None,
                    discount_reason: None,
                    category: category.map(str::to_string),
                })
                .unwrap()
        };

        assert_eq!(bill(Some("beverages")).pricing.discount, dec!(80));
        assert_eq!(bill(Some("mains")).pricing.discount, dec!(0));
    }

    #[test]
    fn manual_discount_suppresses_promotions_and_validates() {
        let (_, engine) = engine_at(at(2025, 1, 20, 12));
        engine.add_promotion(percentage_promo(1, "promo", 50)).unwrap();

        let response = engine
            .generate_bill(&GenerateBillRequest {
                lines: vec![OrderLine {
                    name: "dinner".to_string(),
                    unit_price: dec!(1000),
                    quantity: 1,
                }],
                service_charge_percentage: None,
                vat_percentage: None,
                discount: Some(dec!(100)),
                discount_reason: Some("manager goodwill".to_string()),
                category: None,
            })
            .unwrap();
        assert_eq!(response.pricing.discount, dec!(100));
        assert_eq!(response.discount_reason.as_deref(), Some("manager goodwill"));
        assert_eq!(engine.store().promotion(1).unwrap().usage_count, 0);

        let err = engine
            .generate_bill(&GenerateBillRequest {
                lines: vec![],
                service_charge_percentage: None,
                vat_percentage: None,
                discount: Some(dec!(-5)),
                discount_reason: None,
                category: None,
            })
            .unwrap_err();
        assert_eq!(err.reason_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn add_promotion_rejects_invalid_records() {
        let (_, engine) = engine_at(at(2025, 1, 20, 12));
        let err = engine
            .add_promotion(percentage_promo(1, "zero", 0))
            .unwrap_err();
        assert_eq!(err.reason_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn wire_shapes_are_camel_case() {
        let request: AvailabilitySearchRequest = serde_json::from_str(
            r#"{"checkIn":"2025-03-10","checkOut":"2025-03-12","roomType":"double","adults":2,"children":0}"#,
        )
        .unwrap();
        assert_eq!(request.room_type, Some(RoomType::Double));

        let (_, engine) = engine_at(at(2025, 3, 1, 10));
        let response = engine.search_availability(&request).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["totalAvailable"], 1);
        assert_eq!(json["availableRooms"][0]["roomType"], "double");
    }
}
