//! Line-oriented JSON command session
//!
//! Each input line holds one command object tagged by `command`, each output
//! line holds one response object. A line that cannot be parsed or a command
//! that is rejected produces an error response; the session carries on.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::{
    availability::AvailabilityQuery,
    calendar,
    errors::{AppError, ValidationError},
    models::{
        BoatDraft, BoatId, BookingId, BookingStatus, BookingWindow, CaptainDraft,
        CaptainId, Customer, NewBooking, BOAT_TYPES, COMMON_CERTIFICATIONS,
    },
    store::Store,
};

/// Booking as entered in the booking form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub start_date: DateTime<Utc>,
    /// Defaults to start plus the configured slot length
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub customer: Customer,
    pub participants: u32,
    #[serde(default)]
    pub boat_id: BoatId,
    #[serde(default)]
    pub captain_id: CaptainId,
    #[serde(default)]
    pub catering: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingForm {
    /// Bookings entered through the form are always confirmed
    fn into_new_booking(self, default_slot: Duration) -> Result<NewBooking, ValidationError> {
        let window = match self.end_date {
            Some(end) => BookingWindow::new(self.start_date, end),
            None => BookingWindow::starting_at(self.start_date, default_slot)
                .ok_or(ValidationError::InvalidWindow)?,
        };
        Ok(NewBooking {
            start_date: window.start(),
            end_date: window.end(),
            customer: self.customer,
            participants: self.participants,
            boat_id: self.boat_id,
            captain_id: self.captain_id,
            catering: self.catering,
            notes: self.notes,
            status: BookingStatus::Confirmed,
        })
    }
}

/// Commands understood by the session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    ListBoats,
    ListCaptains,
    ListBookings,
    CreateBoat {
        boat: BoatDraft,
    },
    UpdateBoat {
        id: BoatId,
        boat: BoatDraft,
    },
    DeleteBoat {
        id: BoatId,
    },
    CreateCaptain {
        captain: CaptainDraft,
    },
    UpdateCaptain {
        id: CaptainId,
        captain: CaptainDraft,
    },
    DeleteCaptain {
        id: CaptainId,
    },
    /// Store a booking as is, without availability checks
    CreateBooking {
        booking: NewBooking,
    },
    /// Replace a booking as is; its creation time is kept
    UpdateBooking {
        id: BookingId,
        booking: NewBooking,
    },
    DeleteBooking {
        id: BookingId,
    },
    EligibleBoats(AvailabilityQuery),
    EligibleCaptains(AvailabilityQuery),
    /// Validated create, or update when `id` is given
    SubmitBooking {
        #[serde(default)]
        id: Option<BookingId>,
        form: BookingForm,
    },
    Calendar {
        #[serde(default)]
        range: Option<BookingWindow>,
    },
    DanglingReferences,
    Suggestions,
}

/// One response line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn ok(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(error: &AppError) -> Self {
        let message = match error {
            AppError::SerdeError(e) => format!("{}: {}", error, e),
            other => other.to_string(),
        };
        Self {
            ok: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Parse one command line
pub fn parse_command(line: &str) -> Result<Command, AppError> {
    Ok(serde_json::from_str(line)?)
}

pub struct Session {
    store: Store,
    default_slot: Duration,
}

impl Session {
    pub fn new(store: Store, default_slot: Duration) -> Self {
        Self {
            store,
            default_slot,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Apply a command to the store
    pub fn handle(&mut self, command: Command) -> Result<Value, AppError> {
        debug!("Handling command: {:?}", command);
        let store = &mut self.store;
        let data = match command {
            Command::ListBoats => serde_json::to_value(store.boats())?,
            Command::ListCaptains => serde_json::to_value(store.captains())?,
            Command::ListBookings => serde_json::to_value(store.bookings())?,
            Command::CreateBoat { boat } => serde_json::to_value(store.create_boat(boat)?)?,
            Command::UpdateBoat { id, boat } => {
                serde_json::to_value(store.update_boat(&id, boat)?)?
            }
            Command::DeleteBoat { id } => json!({ "deleted": store.delete_boat(&id) }),
            Command::CreateCaptain { captain } => {
                serde_json::to_value(store.create_captain(captain)?)?
            }
            Command::UpdateCaptain { id, captain } => {
                serde_json::to_value(store.update_captain(&id, captain)?)?
            }
            Command::DeleteCaptain { id } => json!({ "deleted": store.delete_captain(&id) }),
            Command::CreateBooking { booking } => {
                serde_json::to_value(store.create_booking(booking))?
            }
            Command::UpdateBooking { id, booking } => {
                match store.booking(&id).map(|existing| existing.created_at) {
                    Some(created_at) => {
                        let updated = booking.into_booking(id, created_at);
                        store.update_booking(updated.clone());
                        serde_json::to_value(updated)?
                    }
                    None => Value::Null,
                }
            }
            Command::DeleteBooking { id } => json!({ "deleted": store.delete_booking(&id) }),
            Command::EligibleBoats(query) => serde_json::to_value(store.eligible_boats(&query))?,
            Command::EligibleCaptains(query) => {
                serde_json::to_value(store.eligible_captains(&query))?
            }
            Command::SubmitBooking { id, form } => {
                let booking = form.into_new_booking(self.default_slot)?;
                serde_json::to_value(store.submit_booking(id.as_ref(), booking)?)?
            }
            Command::Calendar { range } => {
                serde_json::to_value(calendar::events(store.bookings(), range.as_ref()))?
            }
            Command::DanglingReferences => serde_json::to_value(store.dangling_references())?,
            Command::Suggestions => json!({
                "boatTypes": BOAT_TYPES,
                "certifications": COMMON_CERTIFICATIONS,
            }),
        };
        Ok(data)
    }

    /// Parse and apply one input line
    pub fn handle_line(&mut self, line: &str) -> Response {
        match parse_command(line).and_then(|command| self.handle(command)) {
            Ok(data) => Response::ok(data),
            Err(e) => {
                warn!("Command rejected: {}", e);
                Response::error(&e)
            }
        }
    }

    /// Serve commands from `reader` until end of input
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let response = self.handle_line(line);
            let mut output = serde_json::to_vec(&response)?;
            output.push(b'\n');
            writer.write_all(&output).await?;
            writer.flush().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;
    use chrono::TimeZone;

    fn session() -> Session {
        Session::new(Seed::builtin().into_store(), Duration::hours(2))
    }

    #[test]
    fn parse_list_command() {
        let command = parse_command(r#"{"command": "list_boats"}"#).unwrap();
        assert_eq!(command, Command::ListBoats);
    }

    #[test]
    fn parse_eligible_boats_command() {
        let line = r#"{
            "command": "eligible_boats",
            "window": {"start": "2024-08-15T11:00:00Z", "end": "2024-08-15T13:00:00Z"},
            "participants": 20
        }"#;
        let command = parse_command(line).unwrap();

        let expected = Command::EligibleBoats(AvailabilityQuery {
            window: Some(BookingWindow::new(
                Utc.with_ymd_and_hms(2024, 8, 15, 11, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 8, 15, 13, 0, 0).unwrap(),
            )),
            participants: 20,
            boat_id: None,
            exclude_booking_id: None,
        });
        assert_eq!(command, expected);
    }

    #[test]
    fn parse_unknown_command() {
        assert!(matches!(
            parse_command(r#"{"command": "launch"}"#),
            Err(AppError::SerdeError(_))
        ));
    }

    #[test]
    fn form_without_end_uses_default_slot() {
        let form: BookingForm = serde_json::from_str(
            r#"{
                "startDate": "2024-08-20T10:00:00Z",
                "customer": {"name": "Verein", "email": "v@example.de", "phone": "123"},
                "participants": 10,
                "boatId": "3",
                "captainId": "2"
            }"#,
        )
        .unwrap();
        let booking = form.into_new_booking(Duration::hours(2)).unwrap();
        assert_eq!(
            booking.end_date,
            Utc.with_ymd_and_hms(2024, 8, 20, 12, 0, 0).unwrap()
        );
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn default_slot_past_end_of_time_is_rejected() {
        let mut session = session();
        let response = session.handle_line(
            r#"{"command": "submit_booking", "form": {
                "startDate": "+262142-12-31T23:00:00Z",
                "customer": {"name": "Verein", "email": "v@example.de", "phone": "123"},
                "participants": 10,
                "boatId": "3",
                "captainId": "2"
            }}"#,
        );
        assert!(!response.ok);
        assert_eq!(
            response.error.as_deref(),
            Some("End time must be after start time")
        );
        assert_eq!(session.store().bookings().len(), 2);
    }

    #[test]
    fn oversized_slot_is_rejected() {
        let mut session = Session::new(Seed::builtin().into_store(), Duration::MAX);
        let response = session.handle_line(
            r#"{"command": "submit_booking", "form": {
                "startDate": "2024-08-20T10:00:00Z",
                "customer": {"name": "Verein", "email": "v@example.de", "phone": "123"},
                "participants": 10,
                "boatId": "3",
                "captainId": "2"
            }}"#,
        );
        assert!(!response.ok);
        assert_eq!(session.store().bookings().len(), 2);
    }

    #[test]
    fn update_booking_keeps_created_at() {
        let mut session = session();
        let created_at = session.store().booking(&BookingId::from("2")).unwrap().created_at;

        let response = session.handle_line(
            r#"{"command": "update_booking", "id": "2", "booking": {
                "startDate": "2024-08-16T13:00:00Z",
                "endDate": "2024-08-16T15:00:00Z",
                "customer": {"name": "Familie Janssen", "email": "janssen@email.de",
                    "phone": "+49 5921 456789"},
                "participants": 6,
                "boatId": "2",
                "captainId": "1"
            }}"#,
        );
        assert!(response.ok, "{:?}", response.error);

        let stored = session.store().booking(&BookingId::from("2")).unwrap();
        assert_eq!(stored.created_at, created_at);
        assert_eq!(stored.participants, 6);
        assert_eq!(
            stored.start_date,
            Utc.with_ymd_and_hms(2024, 8, 16, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn update_of_unknown_booking_returns_null() {
        let mut session = session();
        let response = session.handle_line(
            r#"{"command": "update_booking", "id": "99", "booking": {
                "startDate": "2024-08-16T13:00:00Z",
                "endDate": "2024-08-16T15:00:00Z",
                "customer": {"name": "X", "email": "x@example.de", "phone": "1"},
                "participants": 1,
                "boatId": "2",
                "captainId": "1"
            }}"#,
        );
        assert_eq!(response.data, Some(Value::Null));
        assert_eq!(session.store().bookings().len(), 2);
    }

    #[test]
    fn eligible_boats_excludes_busy_boat() {
        let mut session = session();
        let response = session.handle_line(
            r#"{"command": "eligible_boats", "participants": 10,
                "window": {"start": "2024-08-15T11:00:00Z", "end": "2024-08-15T13:00:00Z"}}"#,
        );
        assert!(response.ok);
        let names: Vec<String> = response
            .data
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|boat| boat["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Wassertaxi", "Kanalboot Clara"]);
    }

    #[test]
    fn rejected_submission_reports_error() {
        let mut session = session();
        let response = session.handle_line(
            r#"{"command": "submit_booking", "form": {
                "startDate": "2024-08-15T12:00:00Z",
                "endDate": "2024-08-15T13:00:00Z",
                "customer": {"name": "Verein", "email": "v@example.de", "phone": "123"},
                "participants": 10,
                "boatId": "1",
                "captainId": "1"
            }}"#,
        );
        assert!(!response.ok);
        assert_eq!(
            response.error.as_deref(),
            Some("Boat 1 is not available for this booking")
        );
        assert_eq!(session.store().bookings().len(), 2);
    }

    #[test]
    fn delete_reports_whether_found() {
        let mut session = session();
        let first = session.handle_line(r#"{"command": "delete_booking", "id": "2"}"#);
        assert_eq!(first.data, Some(json!({ "deleted": true })));
        let second = session.handle_line(r#"{"command": "delete_booking", "id": "2"}"#);
        assert_eq!(second.data, Some(json!({ "deleted": false })));
    }

    #[test]
    fn invalid_boat_is_rejected() {
        let mut session = session();
        let response = session.handle_line(
            r#"{"command": "create_boat", "boat": {"name": "Möwe", "capacity": 0, "type": "Segelboot"}}"#,
        );
        assert!(!response.ok);
        assert_eq!(
            response.error.as_deref(),
            Some("Capacity must be at least 1")
        );
        assert_eq!(session.store().boats().len(), 4);
    }

    #[test]
    fn calendar_lists_events() {
        let mut session = session();
        let response = session.handle_line(r#"{"command": "calendar"}"#);
        let data = response.data.unwrap();
        assert_eq!(data[0]["title"], "Firma Nordhorn GmbH (35 Pers.)");
        assert_eq!(data[1]["status"], "confirmed");
    }

    #[tokio::test]
    async fn run_answers_each_line() {
        let mut session = session();
        let input = b"{\"command\": \"list_captains\"}\n\nnot json\n{\"command\": \"suggestions\"}\n";
        let mut output = Vec::new();

        session.run(&input[..], &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["ok"], true);
        assert_eq!(lines[0]["data"].as_array().unwrap().len(), 3);
        assert_eq!(lines[1]["ok"], false);
        assert_eq!(lines[2]["data"]["boatTypes"][0], "Ausflugsschiff");
    }
}
