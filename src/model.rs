// Domain entities for the reservation & pricing rules engine
// Rooms are immutable reference data, bookings mutate only through lifecycle
// transitions, and promotions are read-only snapshots at evaluation time.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub type RoomId = i64;
pub type BookingId = i64;
pub type PromotionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Double,
    Deluxe,
    Suite,
    Family,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub room_type: RoomType,
    pub capacity: u32,
    pub base_rate: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    // A blocking booking occupies its room for availability purposes.
    pub fn is_blocking(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::CheckedIn)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::CheckedOut | BookingStatus::Cancelled)
    }
}

// Stay window is the half-open interval [check_in, check_out).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub total_amount: Decimal,
}

impl Booking {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

// A single day/time slot a time-based promotion is active in. Days are full
// lowercase English names; times are zero-padded 24h "HH:MM" strings compared
// lexicographically. Windows never cross midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PromotionKind {
    Percentage,
    Category {
        categories: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Seasonal {
        season_date_start: NaiveDate,
        season_date_end: NaiveDate,
    },
    #[serde(rename_all = "camelCase")]
    TimeBased {
        time_ranges: Vec<TimeWindow>,
    },
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: PromotionId,
    pub name: String,
    pub discount_percentage: u32,
    #[serde(flatten)]
    pub kind: PromotionKind,
    pub min_order_amount: Decimal,
    pub max_discount_amount: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub usage_count: u32,
    pub max_usage: Option<u32>,
}

const DAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

fn is_valid_hhmm(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let (hh, mm) = (&s[0..2], &s[3..5]);
    match (hh.parse::<u32>(), mm.parse::<u32>()) {
        (Ok(h), Ok(m)) => h < 24 && m < 60,
        _ => false,
    }
}

impl Promotion {
    // Field-level validation applied at creation/edit time. The typed kind
    // already guarantees the structural invariants (seasonal has both dates,
    // every time range has both endpoints); this checks the residual ones.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |field: &str, message: &str| {
            Err(EngineError::Validation {
                field: field.to_string(),
                message: message.to_string(),
            })
        };

        if self.discount_percentage == 0 || self.discount_percentage > 100 {
            return invalid("discountPercentage", "must be between 1 and 100");
        }
        if self.min_order_amount < Decimal::ZERO {
            return invalid("minOrderAmount", "must not be negative");
        }
        if matches!(self.max_discount_amount, Some(cap) if cap <= Decimal::ZERO) {
            return invalid("maxDiscountAmount", "must be positive when set");
        }

        match &self.kind {
            PromotionKind::Percentage => {}
            PromotionKind::Category { categories } => {
                if categories.is_empty() {
                    return invalid("categories", "category promotion needs at least one category");
                }
            }
            PromotionKind::Seasonal {
                season_date_start,
                season_date_end,
            } => {
                if season_date_start > season_date_end {
                    return invalid("seasonDateEnd", "season end precedes season start");
                }
            }
            PromotionKind::TimeBased { time_ranges } => {
                if time_ranges.is_empty() {
                    return invalid("timeRanges", "time-based promotion needs at least one range");
                }
                for range in time_ranges {
                    if range.days.is_empty() {
                        return invalid("days", "time range needs at least one day");
                    }
                    if let Some(day) = range.days.iter().find(|d| !DAY_NAMES.contains(&d.as_str()))
                    {
                        return Err(EngineError::Validation {
                            field: "days".to_string(),
                            message: format!("unknown day name '{day}'"),
                        });
                    }
                    if !is_valid_hhmm(&range.start_time) {
                        return invalid("startTime", "expected zero-padded 24h HH:MM");
                    }
                    if !is_valid_hhmm(&range.end_time) {
                        return invalid("endTime", "expected zero-padded 24h HH:MM");
                    }
                    // No wraparound across midnight; 22:00-02:00 must be two ranges.
                    if range.start_time > range.end_time {
                        return invalid("endTime", "time range must not cross midnight");
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}
