//! Rental duration and cost arithmetic

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    config::SameDayPolicy,
    error::{AppError, AppResult},
    models::rental::RentalQuote,
};

/// Whole days between two calendar dates, in either order.
///
/// Calendar dates carry no time of day, so the elapsed time is always an exact
/// number of days and rounding up is a no-op. Equal dates give zero days
/// unless the policy bills the same-day case as one day.
pub fn rental_days(start: NaiveDate, end: NaiveDate, policy: SameDayPolicy) -> i64 {
    let days = (end - start).num_days().abs();
    match policy {
        SameDayPolicy::ChargeOneDay if days == 0 => 1,
        _ => days,
    }
}

/// Duration and total cost at `daily_rate`. A cost outside the decimal
/// range is a validation failure.
pub fn quote(start: NaiveDate, end: NaiveDate, daily_rate: Decimal, policy: SameDayPolicy) -> AppResult<RentalQuote> {
    let total_days = rental_days(start, end, policy);
    let total_cost = Decimal::from(total_days)
        .checked_mul(daily_rate)
        .ok_or_else(|| AppError::Validation("Rental cost is too large".to_string()))?;
    Ok(RentalQuote {
        total_days,
        total_cost,
    })
}
