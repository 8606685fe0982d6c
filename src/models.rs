//! Data models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

mod window;

pub use window::BookingWindow;

/// Boat types offered as suggestions when registering a boat.
///
/// The type of a boat is free text, this list is not enforced.
pub const BOAT_TYPES: [&str; 6] = [
    "Ausflugsschiff",
    "Kanalboot",
    "Wassertaxi",
    "Sportboot",
    "Segelboot",
    "Motorboot",
];

/// Certifications commonly held by captains
pub const COMMON_CERTIFICATIONS: [&str; 7] = [
    "Sportbootführerschein Binnen",
    "Sportbootführerschein See",
    "Kapitänspatent",
    "Funkzeugnis",
    "Erste Hilfe",
    "Fischereischein",
    "Personenbeförderung",
];

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, unique identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Get the raw identifier value
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a boat
    BoatId
);
string_id!(
    /// Identifier of a captain
    CaptainId
);
string_id!(
    /// Identifier of a booking
    BookingId
);

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

/// A boat that can be assigned to bookings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boat {
    pub id: BoatId,
    pub name: String,
    /// Maximum number of participants
    pub capacity: u32,
    /// Boat type, see [`BOAT_TYPES`] for the usual values
    #[serde(rename = "type")]
    pub boat_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Boats flagged unavailable are never offered for a booking
    pub available: bool,
}

/// Boat fields as entered in the boat form, without an identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoatDraft {
    pub name: String,
    pub capacity: u32,
    #[serde(rename = "type")]
    pub boat_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl BoatDraft {
    /// Check required fields: name, type and a capacity of at least one
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")?;
        require(&self.boat_type, "type")?;
        if self.capacity < 1 {
            return Err(ValidationError::InvalidCapacity);
        }
        Ok(())
    }

    pub(crate) fn into_boat(self, id: BoatId) -> Boat {
        Boat {
            id,
            name: self.name,
            capacity: self.capacity,
            boat_type: self.boat_type,
            description: self.description.filter(|d| !d.trim().is_empty()),
            available: self.available,
        }
    }
}

impl From<Boat> for BoatDraft {
    fn from(boat: Boat) -> Self {
        Self {
            name: boat.name,
            capacity: boat.capacity,
            boat_type: boat.boat_type,
            description: boat.description,
            available: boat.available,
        }
    }
}

/// A captain qualified to operate a set of boats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captain {
    pub id: CaptainId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Boats this captain may operate. Ids are not checked against the fleet.
    #[serde(default)]
    pub available_boats: Vec<BoatId>,
}

impl Captain {
    pub fn is_qualified_for(&self, boat_id: &BoatId) -> bool {
        self.available_boats.contains(boat_id)
    }

    /// Names of the boats this captain may operate, in qualification order.
    ///
    /// Ids that no longer resolve to a boat are skipped.
    pub fn boat_names<'a>(&self, boats: &'a [Boat]) -> Vec<&'a str> {
        self.available_boats
            .iter()
            .filter_map(|id| boats.iter().find(|boat| &boat.id == id))
            .map(|boat| boat.name.as_str())
            .collect()
    }
}

/// Captain fields as entered in the captain form, without an identifier
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptainDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub available_boats: Vec<BoatId>,
}

impl CaptainDraft {
    /// Check required fields: name, email and phone
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")?;
        require(&self.email, "email")?;
        require(&self.phone, "phone")?;
        Ok(())
    }

    /// Add a certification, trimmed. Blank and duplicate entries are ignored.
    ///
    /// Returns `true` if the certification was added.
    pub fn add_certification(&mut self, certification: &str) -> bool {
        let certification = certification.trim();
        if certification.is_empty() || self.certifications.iter().any(|c| c == certification) {
            return false;
        }
        self.certifications.push(certification.to_string());
        true
    }

    pub fn remove_certification(&mut self, certification: &str) {
        self.certifications.retain(|c| c != certification);
    }

    /// Grant or revoke the qualification for a boat
    pub fn set_boat(&mut self, boat_id: &BoatId, qualified: bool) {
        if qualified {
            if !self.available_boats.contains(boat_id) {
                self.available_boats.push(boat_id.clone());
            }
        } else {
            self.available_boats.retain(|id| id != boat_id);
        }
    }

    pub(crate) fn into_captain(self, id: CaptainId) -> Captain {
        Captain {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            certifications: self.certifications,
            available_boats: self.available_boats,
        }
    }
}

impl From<Captain> for CaptainDraft {
    fn from(captain: Captain) -> Self {
        Self {
            name: captain.name,
            email: captain.email,
            phone: captain.phone,
            certifications: captain.certifications,
            available_boats: captain.available_boats,
        }
    }
}

/// Customer details embedded in a booking
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl Customer {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "customer.name")?;
        require(&self.email, "customer.email")?;
        require(&self.phone, "customer.phone")?;
        Ok(())
    }
}

/// Booking status. Only confirmed bookings block boats and captains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Pending,
    Cancelled,
}

/// A boat tour booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub start_date: DateTime<Utc>,
    /// Expected to be after `start_date`; not checked for stored bookings
    pub end_date: DateTime<Utc>,
    pub customer: Customer,
    pub participants: u32,
    pub boat_id: BoatId,
    pub captain_id: CaptainId,
    pub catering: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: BookingStatus,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn window(&self) -> BookingWindow {
        BookingWindow::new(self.start_date, self.end_date)
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// Strip identity and creation time, e.g. to edit the booking
    pub fn to_new_booking(&self) -> NewBooking {
        NewBooking {
            start_date: self.start_date,
            end_date: self.end_date,
            customer: self.customer.clone(),
            participants: self.participants,
            boat_id: self.boat_id.clone(),
            captain_id: self.captain_id.clone(),
            catering: self.catering,
            notes: self.notes.clone(),
            status: self.status,
        }
    }
}

/// Booking fields without id and creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub customer: Customer,
    pub participants: u32,
    pub boat_id: BoatId,
    pub captain_id: CaptainId,
    #[serde(default)]
    pub catering: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
}

impl NewBooking {
    pub fn window(&self) -> BookingWindow {
        BookingWindow::new(self.start_date, self.end_date)
    }

    pub(crate) fn into_booking(self, id: BookingId, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            start_date: self.start_date,
            end_date: self.end_date,
            customer: self.customer,
            participants: self.participants,
            boat_id: self.boat_id,
            captain_id: self.captain_id,
            catering: self.catering,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            status: self.status,
            created_at,
        }
    }
}
