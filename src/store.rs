//! In-memory store owning boats, captains and bookings for one session.
//!
//! Every mutating operation either applies fully or leaves the store
//! untouched: validation runs before anything is written. Updates and
//! deletes of unknown ids are no-ops and are reported through the return
//! value instead of an error.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    availability::{eligible_boats, eligible_captains, AvailabilityQuery},
    errors::ValidationError,
    models::{
        Boat, BoatDraft, BoatId, Booking, BookingId, Captain, CaptainDraft, CaptainId, NewBooking,
    },
};

/// A reference to a boat or captain that no longer exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DanglingReference {
    #[serde(rename_all = "camelCase")]
    BookingBoat {
        booking_id: BookingId,
        boat_id: BoatId,
    },
    #[serde(rename_all = "camelCase")]
    BookingCaptain {
        booking_id: BookingId,
        captain_id: CaptainId,
    },
    #[serde(rename_all = "camelCase")]
    CaptainBoat {
        captain_id: CaptainId,
        boat_id: BoatId,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    boats: Vec<Boat>,
    captains: Vec<Captain>,
    bookings: Vec<Booking>,
}

impl Store {
    pub fn new(boats: Vec<Boat>, captains: Vec<Captain>, bookings: Vec<Booking>) -> Self {
        info!(
            "Initializing store: boats={}, captains={}, bookings={}",
            boats.len(),
            captains.len(),
            bookings.len()
        );
        Self {
            boats,
            captains,
            bookings,
        }
    }

    pub fn boats(&self) -> &[Boat] {
        &self.boats
    }

    pub fn captains(&self) -> &[Captain] {
        &self.captains
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn boat(&self, id: &BoatId) -> Option<&Boat> {
        self.boats.iter().find(|boat| &boat.id == id)
    }

    pub fn captain(&self, id: &CaptainId) -> Option<&Captain> {
        self.captains.iter().find(|captain| &captain.id == id)
    }

    pub fn booking(&self, id: &BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|booking| &booking.id == id)
    }

    /// Validate and add a boat under a fresh id
    pub fn create_boat(&mut self, draft: BoatDraft) -> Result<Boat, ValidationError> {
        draft.validate()?;
        let boat = draft.into_boat(BoatId::generate());
        info!("Created boat {} ({})", boat.id, boat.name);
        self.boats.push(boat.clone());
        Ok(boat)
    }

    /// Validate and replace the boat with the given id.
    ///
    /// Returns `Ok(None)` if no such boat exists.
    pub fn update_boat(
        &mut self,
        id: &BoatId,
        draft: BoatDraft,
    ) -> Result<Option<Boat>, ValidationError> {
        draft.validate()?;
        let Some(slot) = self.boats.iter_mut().find(|boat| &boat.id == id) else {
            debug!("Update of unknown boat {} ignored", id);
            return Ok(None);
        };
        *slot = draft.into_boat(id.clone());
        info!("Updated boat {}", id);
        Ok(Some(slot.clone()))
    }

    /// Remove a boat. Bookings and captains referring to it are left as they are.
    pub fn delete_boat(&mut self, id: &BoatId) -> bool {
        let before = self.boats.len();
        self.boats.retain(|boat| &boat.id != id);
        if self.boats.len() == before {
            debug!("Delete of unknown boat {} ignored", id);
            return false;
        }

        let bookings = self.bookings.iter().filter(|b| &b.boat_id == id).count();
        let captains = self.captains.iter().filter(|c| c.is_qualified_for(id)).count();
        if bookings > 0 || captains > 0 {
            warn!(
                "Deleted boat {} is still referenced by {} booking(s) and {} captain(s)",
                id, bookings, captains
            );
        }
        info!("Deleted boat {}", id);
        true
    }

    /// Validate and add a captain under a fresh id
    pub fn create_captain(&mut self, draft: CaptainDraft) -> Result<Captain, ValidationError> {
        draft.validate()?;
        let captain = draft.into_captain(CaptainId::generate());
        info!("Created captain {} ({})", captain.id, captain.name);
        self.captains.push(captain.clone());
        Ok(captain)
    }

    /// Validate and replace the captain with the given id.
    ///
    /// Returns `Ok(None)` if no such captain exists.
    pub fn update_captain(
        &mut self,
        id: &CaptainId,
        draft: CaptainDraft,
    ) -> Result<Option<Captain>, ValidationError> {
        draft.validate()?;
        let Some(slot) = self.captains.iter_mut().find(|captain| &captain.id == id) else {
            debug!("Update of unknown captain {} ignored", id);
            return Ok(None);
        };
        *slot = draft.into_captain(id.clone());
        info!("Updated captain {}", id);
        Ok(Some(slot.clone()))
    }

    /// Remove a captain. Bookings assigned to the captain are left as they are.
    pub fn delete_captain(&mut self, id: &CaptainId) -> bool {
        let before = self.captains.len();
        self.captains.retain(|captain| &captain.id != id);
        if self.captains.len() == before {
            debug!("Delete of unknown captain {} ignored", id);
            return false;
        }

        let bookings = self.bookings.iter().filter(|b| &b.captain_id == id).count();
        if bookings > 0 {
            warn!(
                "Deleted captain {} is still assigned to {} booking(s)",
                id, bookings
            );
        }
        info!("Deleted captain {}", id);
        true
    }

    /// Add a booking under a fresh id, stamped with the current time.
    ///
    /// No capacity or overlap checks happen here, see [`Store::submit_booking`].
    pub fn create_booking(&mut self, booking: NewBooking) -> Booking {
        let booking = booking.into_booking(BookingId::generate(), Utc::now());
        info!(
            "Created booking {}: boat={}, captain={}, {} - {}",
            booking.id, booking.boat_id, booking.captain_id, booking.start_date, booking.end_date
        );
        self.bookings.push(booking.clone());
        booking
    }

    /// Replace the booking with the same id, keeping its creation time.
    ///
    /// Returns `false` if no such booking exists.
    pub fn update_booking(&mut self, booking: Booking) -> bool {
        let Some(slot) = self.bookings.iter_mut().find(|b| b.id == booking.id) else {
            debug!("Update of unknown booking {} ignored", booking.id);
            return false;
        };
        let created_at = slot.created_at;
        *slot = Booking {
            created_at,
            ..booking
        };
        info!("Updated booking {}", slot.id);
        true
    }

    pub fn delete_booking(&mut self, id: &BookingId) -> bool {
        let before = self.bookings.len();
        self.bookings.retain(|booking| &booking.id != id);
        if self.bookings.len() == before {
            debug!("Delete of unknown booking {} ignored", id);
            return false;
        }
        info!("Deleted booking {}", id);
        true
    }

    pub fn eligible_boats(&self, query: &AvailabilityQuery) -> Vec<&Boat> {
        query.boats(&self.boats, &self.bookings)
    }

    pub fn eligible_captains(&self, query: &AvailabilityQuery) -> Vec<&Captain> {
        query.captains(&self.captains, &self.bookings)
    }

    /// Validate a booking as entered in the booking form and store it.
    ///
    /// With `editing` set the booking with that id is replaced, keeping its id
    /// and creation time, and it is ignored in the overlap checks. Returns
    /// `Ok(None)` if the edited booking no longer exists.
    pub fn submit_booking(
        &mut self,
        editing: Option<&BookingId>,
        booking: NewBooking,
    ) -> Result<Option<Booking>, ValidationError> {
        self.check_submission(editing, &booking)?;

        match editing {
            None => Ok(Some(self.create_booking(booking))),
            Some(id) => {
                let Some(existing) = self.booking(id) else {
                    debug!("Submission for unknown booking {} ignored", id);
                    return Ok(None);
                };
                let updated = booking.into_booking(id.clone(), existing.created_at);
                self.update_booking(updated.clone());
                Ok(Some(updated))
            }
        }
    }

    fn check_submission(
        &self,
        editing: Option<&BookingId>,
        booking: &NewBooking,
    ) -> Result<(), ValidationError> {
        booking.customer.validate()?;
        if booking.boat_id.as_str().trim().is_empty() {
            return Err(ValidationError::MissingField("boatId"));
        }
        if booking.captain_id.as_str().trim().is_empty() {
            return Err(ValidationError::MissingField("captainId"));
        }
        if booking.participants < 1 {
            return Err(ValidationError::InvalidParticipants);
        }
        let window = booking.window();
        if window.is_empty() {
            return Err(ValidationError::InvalidWindow);
        }
        if self.boat(&booking.boat_id).is_none() {
            return Err(ValidationError::UnknownBoat(booking.boat_id.clone()));
        }
        if self.captain(&booking.captain_id).is_none() {
            return Err(ValidationError::UnknownCaptain(booking.captain_id.clone()));
        }

        let boats = eligible_boats(
            &self.boats,
            &self.bookings,
            Some(&window),
            booking.participants,
            editing,
        );
        if !boats.iter().any(|boat| boat.id == booking.boat_id) {
            return Err(ValidationError::BoatUnavailable(booking.boat_id.clone()));
        }

        let captains = eligible_captains(
            &self.captains,
            &self.bookings,
            Some(&booking.boat_id),
            Some(&window),
            editing,
        );
        if !captains.iter().any(|captain| captain.id == booking.captain_id) {
            return Err(ValidationError::CaptainUnavailable(
                booking.captain_id.clone(),
            ));
        }
        Ok(())
    }

    /// References from bookings and captains to boats or captains that do not exist
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for booking in &self.bookings {
            if self.boat(&booking.boat_id).is_none() {
                dangling.push(DanglingReference::BookingBoat {
                    booking_id: booking.id.clone(),
                    boat_id: booking.boat_id.clone(),
                });
            }
            if self.captain(&booking.captain_id).is_none() {
                dangling.push(DanglingReference::BookingCaptain {
                    booking_id: booking.id.clone(),
                    captain_id: booking.captain_id.clone(),
                });
            }
        }
        for captain in &self.captains {
            for boat_id in &captain.available_boats {
                if self.boat(boat_id).is_none() {
                    dangling.push(DanglingReference::CaptainBoat {
                        captain_id: captain.id.clone(),
                        boat_id: boat_id.clone(),
                    });
                }
            }
        }
        dangling
    }
}
