//! Booking requests and the pure admission rules applied to each of them.

use time::{Date, Weekday};

use crate::domain::types::ReserveErrorCode;

/// Longest span of business days a single reservation may cover.
pub const MAX_BUSINESS_DAYS: i64 = 5;

/// One product + date-range entry within an incoming batch. Identity for error
/// reporting is positional within the batch, never by field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub product_id: i32,
    pub start_date: Date,
    pub end_date: Date,
}

impl BookingRequest {
    pub fn period(&self) -> ReservationPeriod {
        ReservationPeriod {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// A half-open date interval `[start_date, end_date)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationPeriod {
    pub start_date: Date,
    pub end_date: Date,
}

impl ReservationPeriod {
    /// Half-open interval intersection.
    pub fn overlaps(&self, other: &ReservationPeriod) -> bool {
        other.start_date < self.end_date && self.start_date < other.end_date
    }
}

/// Evaluate every admission rule against one request.
///
/// All checks run; a failing check never suppresses the others, and the order
/// of the returned codes is the fixed evaluation order the wire contract
/// exposes.
pub fn booking_rule_errors(request: &BookingRequest, today: Date) -> Vec<ReserveErrorCode> {
    let mut codes = Vec::new();

    if request.product_id <= 0 {
        codes.push(ReserveErrorCode::ProductNoId);
    }
    if request.start_date < today {
        codes.push(ReserveErrorCode::InvalidStartDate);
    }
    if request.end_date < today {
        codes.push(ReserveErrorCode::InvalidEndDate);
    }
    if request.end_date < request.start_date {
        codes.push(ReserveErrorCode::EndDateBeforeStartDate);
    }
    if is_weekend(request.start_date) {
        codes.push(ReserveErrorCode::StartDateInWeekend);
    }
    if is_weekend(request.end_date) {
        codes.push(ReserveErrorCode::EndDateInWeekend);
    }

    let calendar_days = (request.end_date - request.start_date).whole_days();
    let business_days = calendar_days - weekend_days_within(request.start_date, request.end_date);
    if business_days > MAX_BUSINESS_DAYS {
        codes.push(ReserveErrorCode::ReservationTimeTooLong);
    }

    codes
}

fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Count Saturdays and Sundays in `[start, end)`. Returns zero for inverted
/// ranges.
pub fn weekend_days_within(start: Date, end: Date) -> i64 {
    let mut count = 0;
    let mut day = start;
    while day < end {
        if is_weekend(day) {
            count += 1;
        }
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }
    count
}
