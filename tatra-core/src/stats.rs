use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::booking::{Booking, BookingStatus};

/// Counters shown at the top of the admin dashboard
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub completed: usize,
    /// Bookings created in the calendar month (UTC) of `now`
    pub this_month: usize,
}

impl BookingStats {
    pub fn collect(bookings: &[Booking], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total: bookings.len(),
            ..Self::default()
        };

        for booking in bookings {
            match booking.status {
                BookingStatus::Pending => stats.pending += 1,
                BookingStatus::Confirmed => stats.confirmed += 1,
                BookingStatus::Cancelled => stats.cancelled += 1,
                BookingStatus::Completed => stats.completed += 1,
            }
            if booking.created_at.year() == now.year() && booking.created_at.month() == now.month() {
                stats.this_month += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Map;

    fn booking(id: &str, status: BookingStatus, created_at: DateTime<Utc>) -> Booking {
        let mut b = Booking::new(id.to_string(), Map::new(), created_at);
        b.status = status;
        b
    }

    #[test]
    fn counts_statuses_and_current_month() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let bookings = vec![
            booking("1", BookingStatus::Pending, now),
            booking("2", BookingStatus::Confirmed, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()),
            booking("3", BookingStatus::Confirmed, Utc.with_ymd_and_hms(2026, 9, 30, 23, 59, 59).unwrap()),
            booking("4", BookingStatus::Cancelled, Utc.with_ymd_and_hms(2025, 10, 15, 0, 0, 0).unwrap()),
        ];

        let stats = BookingStats::collect(&bookings, now);

        assert_eq!(
            stats,
            BookingStats {
                total: 4,
                pending: 1,
                confirmed: 2,
                cancelled: 1,
                completed: 0,
                this_month: 2,
            }
        );
    }

    #[test]
    fn empty_collection() {
        assert_eq!(BookingStats::collect(&[], Utc::now()), BookingStats::default());
    }
}
