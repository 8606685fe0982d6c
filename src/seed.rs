//! Seed data loaded once at startup

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    errors::AppError,
    models::{
        Boat, BoatDraft, BoatId, Booking, BookingId, BookingStatus, Captain, CaptainDraft,
        CaptainId, Customer,
    },
    store::Store,
};

/// Initial content of the boats, captains and bookings collections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub boats: Vec<Boat>,
    #[serde(default)]
    pub captains: Vec<Captain>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

fn time(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0)
        .single()
        .expect("built-in seed times are valid UTC times")
}

/// First id occurring more than once
fn duplicate<'a, I>(ids: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

fn boat(
    id: &str,
    name: &str,
    capacity: u32,
    boat_type: &str,
    description: &str,
    available: bool,
) -> Boat {
    Boat {
        id: BoatId::from(id),
        name: name.to_string(),
        capacity,
        boat_type: boat_type.to_string(),
        description: Some(description.to_string()),
        available,
    }
}

fn captain(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    certifications: &[&str],
    boats: &[&str],
) -> Captain {
    Captain {
        id: CaptainId::from(id),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        certifications: certifications.iter().map(|c| c.to_string()).collect(),
        available_boats: boats.iter().map(|b| BoatId::from(*b)).collect(),
    }
}

impl Seed {
    /// The demo fleet, crew and bookings of the tour operator
    pub fn builtin() -> Self {
        let boats = vec![
            boat(
                "1",
                "MS Nordhorn",
                50,
                "Ausflugsschiff",
                "Großes Ausflugsschiff für Gruppenfahrten",
                true,
            ),
            boat(
                "2",
                "Wassertaxi",
                12,
                "Wassertaxi",
                "Kleines wendiges Boot für private Touren",
                true,
            ),
            boat(
                "3",
                "Kanalboot Clara",
                25,
                "Kanalboot",
                "Traditionelles Kanalboot mit überdachtem Bereich",
                true,
            ),
            boat(
                "4",
                "Sportboot Ems",
                8,
                "Sportboot",
                "Schnelles Boot für Sportgruppen",
                false,
            ),
        ];

        let captains = vec![
            captain(
                "1",
                "Klaus Müller",
                "k.mueller@bootstour.de",
                "+49 5921 123456",
                &["Sportbootführerschein See", "Funkzeugnis"],
                &["1", "2", "3"],
            ),
            captain(
                "2",
                "Andrea Schmidt",
                "a.schmidt@bootstour.de",
                "+49 5921 234567",
                &["Sportbootführerschein Binnen", "Erste Hilfe"],
                &["2", "3", "4"],
            ),
            captain(
                "3",
                "Thomas Weber",
                "t.weber@bootstour.de",
                "+49 5921 345678",
                &["Kapitänspatent", "Funkzeugnis", "Erste Hilfe"],
                &["1", "2", "3", "4"],
            ),
        ];

        let bookings = vec![
            Booking {
                id: BookingId::from("1"),
                start_date: time(8, 15, 10),
                end_date: time(8, 15, 14),
                customer: Customer {
                    name: "Firma Nordhorn GmbH".to_string(),
                    email: "info@nordhorn-gmbh.de".to_string(),
                    phone: "+49 5921 987654".to_string(),
                    company: None,
                },
                participants: 35,
                boat_id: BoatId::from("1"),
                captain_id: CaptainId::from("3"),
                catering: true,
                notes: Some("Firmenausflug mit Mittagessen".to_string()),
                status: BookingStatus::Confirmed,
                created_at: time(8, 1, 0),
            },
            Booking {
                id: BookingId::from("2"),
                start_date: time(8, 16, 9),
                end_date: time(8, 16, 11),
                customer: Customer {
                    name: "Familie Janssen".to_string(),
                    email: "janssen@email.de".to_string(),
                    phone: "+49 5921 456789".to_string(),
                    company: None,
                },
                participants: 8,
                boat_id: BoatId::from("2"),
                captain_id: CaptainId::from("1"),
                catering: false,
                notes: Some("Familienausflug zum Geburtstag".to_string()),
                status: BookingStatus::Confirmed,
                created_at: time(8, 5, 0),
            },
        ];

        Self {
            boats,
            captains,
            bookings,
        }
    }

    /// Read a seed from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        info!("Loading seed data from {}", path.display());
        let file = File::open(path).map_err(|e| AppError::SeedError {
            path: path.display().to_string(),
            origin: e.to_string(),
        })?;
        let seed: Self = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            AppError::SeedError {
                path: path.display().to_string(),
                origin: e.to_string(),
            }
        })?;
        seed.check().map_err(|origin| AppError::SeedError {
            path: path.display().to_string(),
            origin,
        })?;
        Ok(seed)
    }

    /// Ids must be unique per collection; boats and captains must pass the
    /// same checks as their forms. Bookings are stored as is.
    fn check(&self) -> Result<(), String> {
        if let Some(id) = duplicate(self.boats.iter().map(|b| b.id.as_str())) {
            return Err(format!("Duplicate boat id {}", id));
        }
        if let Some(id) = duplicate(self.captains.iter().map(|c| c.id.as_str())) {
            return Err(format!("Duplicate captain id {}", id));
        }
        if let Some(id) = duplicate(self.bookings.iter().map(|b| b.id.as_str())) {
            return Err(format!("Duplicate booking id {}", id));
        }
        for boat in &self.boats {
            BoatDraft::from(boat.clone())
                .validate()
                .map_err(|e| format!("Boat {}: {}", boat.id, e))?;
        }
        for captain in &self.captains {
            CaptainDraft::from(captain.clone())
                .validate()
                .map_err(|e| format!("Captain {}: {}", captain.id, e))?;
        }
        Ok(())
    }

    /// Seed file if a path is given, built-in seed otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                info!("Using built-in seed data");
                Ok(Self::builtin())
            }
        }
    }

    pub fn into_store(self) -> Store {
        Store::new(self.boats, self.captains, self.bookings)
    }
}
