//! Calendar projection of bookings

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Booking, BookingId, BookingStatus, BookingWindow};

/// One entry in the booking calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub id: BookingId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
}

impl From<&Booking> for CalendarEvent {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.clone(),
            title: format!("{} ({} Pers.)", booking.customer.name, booking.participants),
            start: booking.start_date,
            end: booking.end_date,
            status: booking.status,
        }
    }
}

/// Calendar events for all bookings, or only those overlapping `range`
pub fn events(bookings: &[Booking], range: Option<&BookingWindow>) -> Vec<CalendarEvent> {
    bookings
        .iter()
        .filter(|booking| range.map_or(true, |range| range.overlaps(&booking.window())))
        .map(CalendarEvent::from)
        .collect()
}
