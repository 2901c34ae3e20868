//! Restaurant discovery: list filtering and the express "now / tonight"
//! search.
//!
//! DESIGN
//! ======
//! Filtering is pure and runs over an already fetched list. Express slot
//! computation takes the current local time as an argument so callers (and
//! tests) decide what "now" is; only `express_search` touches the network.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use time::{Duration, PrimitiveDateTime, Time};
use tracing::debug;

use crate::error::{BookingError, BookingResult};
use crate::net::api::ReservationApi;
use crate::net::types::{ExpressMatch, Restaurant};

/// Category value that matches every restaurant.
pub const ALL_CATEGORIES: &str = "Todo";

const TONIGHT: Time = time::macros::time!(20:00);

/// Restaurants whose name or cuisine contains `query` (case-insensitive)
/// and whose cuisine or category equals `category`.
#[must_use]
pub fn filter_restaurants<'a>(restaurants: &'a [Restaurant], query: &str, category: &str) -> Vec<&'a Restaurant> {
    let needle = query.trim().to_lowercase();
    restaurants
        .iter()
        .filter(|r| matches_text(r, &needle) && matches_category(r, category))
        .collect()
}

fn matches_text(restaurant: &Restaurant, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    restaurant.name.to_lowercase().contains(needle)
        || restaurant
            .cuisine
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(needle))
}

fn matches_category(restaurant: &Restaurant, category: &str) -> bool {
    category == ALL_CATEGORIES
        || restaurant.cuisine.as_deref() == Some(category)
        || restaurant.category.as_deref() == Some(category)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpressWindow {
    /// The next half-hour slot from now.
    Now,
    /// 20:00 today.
    Tonight,
}

/// The `(date, time)` pair to search for, formatted `YYYY-MM-DD` / `HH:MM`.
#[must_use]
pub fn express_slot(now: PrimitiveDateTime, window: ExpressWindow) -> (String, String) {
    let slot = match window {
        ExpressWindow::Tonight => now.replace_time(TONIGHT),
        ExpressWindow::Now => {
            let hour_start = now.replace_time(Time::MIDNIGHT) + Duration::hours(i64::from(now.hour()));
            if now.minute() < 30 {
                hour_start + Duration::minutes(30)
            } else {
                hour_start + Duration::hours(1)
            }
        }
    };
    let date = slot.date();
    (
        format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day()),
        format!("{:02}:{:02}", slot.hour(), slot.minute()),
    )
}

/// Search every restaurant for a table in the given window.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] for zero guests, otherwise whatever
/// the backend reports.
pub async fn express_search(
    api: &dyn ReservationApi,
    window: ExpressWindow,
    guests: u32,
    now: PrimitiveDateTime,
) -> BookingResult<Vec<ExpressMatch>> {
    if guests == 0 {
        return Err(BookingError::Validation("guests must be at least 1".into()));
    }
    let (date, time) = express_slot(now, window);
    debug!(%date, %time, guests, ?window, "express search");
    api.search_express(&date, &time, guests).await
}
