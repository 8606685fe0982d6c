//! Availability of boats and captains for a candidate booking.
//!
//! Both queries are pure: they only read the given collections and return the
//! eligible subset in input order. An empty result is a valid answer which the
//! caller has to present as "nothing available", not an error.

use serde::Deserialize;

use crate::models::{Boat, BoatId, Booking, BookingId, BookingWindow, Captain};

/// Parameters of an availability query
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    /// Requested window, `None` while no time is selected
    #[serde(default)]
    pub window: Option<BookingWindow>,
    #[serde(default = "one")]
    pub participants: u32,
    /// Boat chosen so far, restricts captains to those qualified for it
    #[serde(default)]
    pub boat_id: Option<BoatId>,
    /// Booking being edited; it never conflicts with itself
    #[serde(default)]
    pub exclude_booking_id: Option<BookingId>,
}

fn one() -> u32 {
    1
}

/// True if a confirmed booking other than `exclude` matching `holds` overlaps `window`
fn is_blocked<F>(
    bookings: &[Booking],
    window: &BookingWindow,
    exclude: Option<&BookingId>,
    holds: F,
) -> bool
where
    F: Fn(&Booking) -> bool,
{
    bookings.iter().any(|booking| {
        exclude != Some(&booking.id)
            && holds(booking)
            && booking.is_confirmed()
            && window.overlaps(&booking.window())
    })
}

/// Boats that can take `participants` people during `window`.
///
/// A boat qualifies if it is flagged available, its capacity is at least
/// `participants`, and, when a window is given, no other confirmed booking
/// holds it during an overlapping window.
pub fn eligible_boats<'a>(
    boats: &'a [Boat],
    bookings: &[Booking],
    window: Option<&BookingWindow>,
    participants: u32,
    exclude_booking_id: Option<&BookingId>,
) -> Vec<&'a Boat> {
    boats
        .iter()
        .filter(|boat| boat.available && boat.capacity >= participants)
        .filter(|boat| match window {
            None => true,
            Some(window) => !is_blocked(bookings, window, exclude_booking_id, |b| {
                b.boat_id == boat.id
            }),
        })
        .collect()
}

/// Captains that can run the selected boat during `window`.
///
/// With a boat selected only captains qualified for it are considered; with
/// none selected qualification is ignored. When a window is given, captains
/// held by another overlapping confirmed booking are excluded.
pub fn eligible_captains<'a>(
    captains: &'a [Captain],
    bookings: &[Booking],
    selected_boat_id: Option<&BoatId>,
    window: Option<&BookingWindow>,
    exclude_booking_id: Option<&BookingId>,
) -> Vec<&'a Captain> {
    captains
        .iter()
        .filter(|captain| selected_boat_id.map_or(true, |boat| captain.is_qualified_for(boat)))
        .filter(|captain| match window {
            None => true,
            Some(window) => !is_blocked(bookings, window, exclude_booking_id, |b| {
                b.captain_id == captain.id
            }),
        })
        .collect()
}

impl AvailabilityQuery {
    pub fn boats<'a>(&self, boats: &'a [Boat], bookings: &[Booking]) -> Vec<&'a Boat> {
        eligible_boats(
            boats,
            bookings,
            self.window.as_ref(),
            self.participants,
            self.exclude_booking_id.as_ref(),
        )
    }

    pub fn captains<'a>(&self, captains: &'a [Captain], bookings: &[Booking]) -> Vec<&'a Captain> {
        eligible_captains(
            captains,
            bookings,
            self.boat_id.as_ref(),
            self.window.as_ref(),
            self.exclude_booking_id.as_ref(),
        )
    }
}
