// Promotion evaluation
// Stateless: validity, category match and discount amount are computed
// against an immutable promotion snapshot. The usage counter is incremented
// by the store around the discount application, never here.

use chrono::{Datelike, NaiveDateTime, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{Promotion, PromotionKind};

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PromotionEvaluator;

impl PromotionEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn is_currently_valid(&self, promo: &Promotion, now: NaiveDateTime) -> bool {
        if !promo.is_active {
            return false;
        }
        // A capped-out promotion is invalid for new discounts.
        if matches!(promo.max_usage, Some(max) if promo.usage_count >= max) {
            return false;
        }

        match &promo.kind {
            // Percentage and category promotions have no temporal restriction.
            PromotionKind::Percentage | PromotionKind::Category { .. } => true,
            PromotionKind::Seasonal {
                season_date_start,
                season_date_end,
            } => {
                let today = now.date();
                *season_date_start <= today && today <= *season_date_end
            }
            PromotionKind::TimeBased { time_ranges } => {
                let day = weekday_name(now.weekday());
                // Zero-padded "HH:MM" compares correctly as a string.
                let clock_time = now.format("%H:%M").to_string();
                time_ranges.iter().any(|range| {
                    range.days.iter().any(|d| d == day)
                        && range.start_time.as_str() <= clock_time.as_str()
                        && clock_time.as_str() <= range.end_time.as_str()
                })
            }
        }
    }

    pub fn applies_to_category(&self, promo: &Promotion, category: &str) -> bool {
        match &promo.kind {
            PromotionKind::Category { categories } => {
                categories.iter().any(|c| c == category)
            }
            _ => true,
        }
    }

    // Zero when the promotion is not currently valid or the order is below
    // the minimum; otherwise the percentage cut, clamped to the cap and
    // rounded half-up to two decimal places.
    pub fn calculate_discount(
        &self,
        promo: &Promotion,
        order_amount: Decimal,
        now: NaiveDateTime,
    ) -> Decimal {
        if !self.is_currently_valid(promo, now) {
            return Decimal::ZERO;
        }
        if order_amount < promo.min_order_amount {
            return Decimal::ZERO;
        }

        let mut raw =
            order_amount * Decimal::from(promo.discount_percentage) / Decimal::from(100);
        if let Some(cap) = promo.max_discount_amount {
            if raw > cap {
                raw = cap;
            }
        }
        raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}
