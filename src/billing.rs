// Bill totals and numbering
// VAT compounds on subtotal plus service charge, in that order. Surcharges
// round half-up to whole currency units (no cents in the target market);
// a discount can never push the total below zero.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::model::OrderLine;

pub const DEFAULT_SERVICE_CHARGE_PCT: u32 = 10;
pub const DEFAULT_VAT_PCT: u32 = 15;

pub const BILL_NUMBER_PREFIX: &str = "BH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingWarning {
    DiscountExceedsTotal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTotals {
    pub subtotal: Decimal,
    pub service_charge: Decimal,
    pub vat: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<BillingWarning>,
}

fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub fn compute_totals(
    lines: &[OrderLine],
    service_charge_pct: Decimal,
    vat_pct: Decimal,
    discount: Decimal,
) -> BillTotals {
    let subtotal: Decimal = lines
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum();

    let service_charge = round_whole(subtotal * service_charge_pct / Decimal::from(100));
    let vat = round_whole((subtotal + service_charge) * vat_pct / Decimal::from(100));

    let gross = subtotal + service_charge + vat;
    let (total, warning) = if discount > gross {
        tracing::warn!(%discount, %gross, "discount exceeds bill total, clamping to zero");
        (Decimal::ZERO, Some(BillingWarning::DiscountExceedsTotal))
    } else {
        (gross - discount, None)
    };

    BillTotals {
        subtotal,
        service_charge,
        vat,
        discount,
        total,
        warning,
    }
}

// Human-readable bill identifier: prefix, date stamp, same-day sequence.
// e.g. BH20250120003. The sequence must come from an atomic counter.
pub fn format_bill_number(date: NaiveDate, sequence: u32) -> String {
    format!(
        "{}{}{:03}",
        BILL_NUMBER_PREFIX,
        date.format("%Y%m%d"),
        sequence
    )
}
