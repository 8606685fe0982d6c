use chrono::{DateTime, TimeZone, Utc};

use boat_bookings::{
    availability::{eligible_boats, eligible_captains, AvailabilityQuery},
    models::{BoatId, BookingId, BookingStatus, BookingWindow, CaptainId, Customer, NewBooking},
    seed::Seed,
};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, day, hour, 0, 0).unwrap()
}

fn names<'a, T>(items: &[&'a T], name: impl Fn(&'a T) -> &'a str) -> Vec<&'a str> {
    items.iter().map(|item| name(*item)).collect()
}

#[test]
fn test_seed_boat_and_captain_eligible() {
    let store = Seed::builtin().into_store();
    let query = AvailabilityQuery {
        window: Some(BookingWindow::new(at(20, 10), at(20, 14))),
        participants: 35,
        boat_id: Some(BoatId::from("1")),
        exclude_booking_id: None,
    };

    let boats = store.eligible_boats(&query);
    assert_eq!(names(&boats, |b| b.name.as_str()), vec!["MS Nordhorn"]);

    let captains = store.eligible_captains(&query);
    assert!(names(&captains, |c| c.name.as_str()).contains(&"Thomas Weber"));
    assert!(!names(&captains, |c| c.name.as_str()).contains(&"Andrea Schmidt"));
}

#[test]
fn test_seed_booking_blocks_overlap_only() {
    let seed = Seed::builtin();
    let nordhorn = BoatId::from("1");

    let overlapping = BookingWindow::new(at(15, 13), at(15, 16));
    let boats = eligible_boats(&seed.boats, &seed.bookings, Some(&overlapping), 1, None);
    assert!(boats.iter().all(|b| b.id != nordhorn));

    let adjacent = BookingWindow::new(at(15, 14), at(15, 16));
    let boats = eligible_boats(&seed.boats, &seed.bookings, Some(&adjacent), 1, None);
    assert!(boats.iter().any(|b| b.id == nordhorn));

    // Thomas Weber runs the seed booking on the 15th.
    let captains = eligible_captains(
        &seed.captains,
        &seed.bookings,
        Some(&nordhorn),
        Some(&overlapping),
        None,
    );
    assert_eq!(names(&captains, |c| c.name.as_str()), vec!["Klaus Müller"]);

    let own = BookingId::from("1");
    let captains = eligible_captains(
        &seed.captains,
        &seed.bookings,
        Some(&nordhorn),
        Some(&overlapping),
        Some(&own),
    );
    assert_eq!(
        names(&captains, |c| c.name.as_str()),
        vec!["Klaus Müller", "Thomas Weber"]
    );
}

#[test]
fn test_results_respect_availability_and_capacity() {
    let seed = Seed::builtin();
    for participants in 1..=60 {
        let boats = eligible_boats(&seed.boats, &seed.bookings, None, participants, None);
        assert!(boats.iter().all(|b| b.available));
        assert!(boats.iter().all(|b| b.capacity >= participants));
    }
    assert!(eligible_boats(&seed.boats, &seed.bookings, None, 51, None).is_empty());
}

#[test]
fn test_cancelled_booking_frees_boat() {
    let mut store = Seed::builtin().into_store();
    let id = BookingId::from("1");
    let mut booking = store.booking(&id).unwrap().clone();
    booking.status = BookingStatus::Cancelled;
    assert!(store.update_booking(booking));

    let query = AvailabilityQuery {
        window: Some(BookingWindow::new(at(15, 11), at(15, 12))),
        participants: 40,
        ..Default::default()
    };
    let boats = store.eligible_boats(&query);
    assert_eq!(names(&boats, |b| b.name.as_str()), vec!["MS Nordhorn"]);
}

#[test]
fn test_submitted_booking_becomes_conflict() {
    let mut store = Seed::builtin().into_store();
    let booking = NewBooking {
        start_date: at(21, 9),
        end_date: at(21, 12),
        customer: Customer {
            name: "Ruderclub Vechte".to_string(),
            email: "info@ruderclub.de".to_string(),
            phone: "+49 5921 111222".to_string(),
            company: Some("Ruderclub Vechte e.V.".to_string()),
        },
        participants: 20,
        boat_id: BoatId::from("3"),
        captain_id: CaptainId::from("2"),
        catering: true,
        notes: None,
        status: BookingStatus::Confirmed,
    };
    let created = store.submit_booking(None, booking).unwrap().unwrap();

    let query = AvailabilityQuery {
        window: Some(BookingWindow::new(at(21, 11), at(21, 13))),
        participants: 20,
        boat_id: Some(BoatId::from("3")),
        exclude_booking_id: None,
    };
    let boats = store.eligible_boats(&query);
    assert_eq!(names(&boats, |b| b.name.as_str()), vec!["MS Nordhorn"]);
    let captains = store.eligible_captains(&query);
    assert_eq!(
        names(&captains, |c| c.name.as_str()),
        vec!["Klaus Müller", "Thomas Weber"]
    );

    let editing = AvailabilityQuery {
        exclude_booking_id: Some(created.id.clone()),
        ..query
    };
    assert_eq!(store.eligible_boats(&editing).len(), 2);

    assert!(store.delete_booking(&created.id));
    assert!(store.booking(&created.id).is_none());
    assert!(!store.delete_booking(&created.id));
}
