use super::*;
use crate::Controller;
use crate::FlightPlan;
use crate::Participant;
use crate::Pilot;

fn pilot_with_position(
    lat: f64,
    lon: f64,
) -> Pilot {
    Pilot {
        cid: 123456,
        name: "John Smith".to_string(),
        callsign: "UAL123".to_string(),
        server: Some("USA-EAST".to_string()),
        pilot_rating: 1,
        latitude: Some(lat),
        longitude: Some(lon),
        altitude: Some(36000),
        groundspeed: Some(450),
        transponder: Some("2200".to_string()),
        logon_time: Some("2025-01-01T00:00:00Z".to_string()),
        flight_plan: Some(FlightPlan {
            aircraft_short: Some("B738".to_string()),
            aircraft_faa: Some("B738/L".to_string()),
            aircraft: Some("B738/M".to_string()),
            departure: Some("KJFK".to_string()),
            arrival: Some("KSFO".to_string()),
            route: Some("GREKI JUDDS CAM".to_string()),
            ..FlightPlan::default()
        }),
        ..Pilot::default()
    }
}

#[test]
fn pilot_fingerprints_exclude_position() {
    let a = pilot_with_position(40.64, -73.78);
    let b = pilot_with_position(41.00, -74.20);

    let fp_a = build_fingerprint(&Participant::Pilot(&a));
    let fp_b = build_fingerprint(&Participant::Pilot(&b));

    // Two participants differing only in position produce equal fingerprints
    assert_eq!(fp_a, fp_b);
    assert!(fp_a.get("latitude").is_none());
    assert!(fp_a.get("longitude").is_none());
}

#[test]
fn pilot_fingerprint_carries_flight_plan_fields() {
    let pilot = pilot_with_position(40.64, -73.78);
    let fp = build_fingerprint(&Participant::Pilot(&pilot));

    assert_eq!(fp.get("status"), Some("pilot"));
    assert_eq!(fp.get("callsign"), Some("UAL123"));
    assert_eq!(fp.get("rating"), Some("PPL"));
    assert_eq!(fp.get("departure"), Some("KJFK"));
    assert_eq!(fp.get("arrival"), Some("KSFO"));
    assert_eq!(fp.get("route"), Some("GREKI JUDDS CAM"));
    // No flight-rules filed: rendered as placeholder, not omitted
    assert_eq!(fp.get("flight_rules"), Some(MISSING));
}

#[test]
fn aircraft_resolution_prefers_short_then_faa_then_free_text() {
    let mut pilot = pilot_with_position(0.0, 0.0);
    let fp = build_fingerprint(&Participant::Pilot(&pilot));
    assert_eq!(fp.get("aircraft"), Some("B738"));

    pilot.flight_plan.as_mut().unwrap().aircraft_short = None;
    let fp = build_fingerprint(&Participant::Pilot(&pilot));
    assert_eq!(fp.get("aircraft"), Some("B738/L"));

    pilot.flight_plan.as_mut().unwrap().aircraft_faa = None;
    let fp = build_fingerprint(&Participant::Pilot(&pilot));
    assert_eq!(fp.get("aircraft"), Some("B738/M"));

    pilot.flight_plan = None;
    let fp = build_fingerprint(&Participant::Pilot(&pilot));
    assert_eq!(fp.get("aircraft"), Some(MISSING));
}

#[test]
fn controller_fingerprint_joins_broadcast_text() {
    let controller = Controller {
        cid: 654321,
        name: "Jane Doe".to_string(),
        callsign: "BOS_CTR".to_string(),
        server: Some("USA-EAST".to_string()),
        rating: 7,
        frequency: Some("134.700".to_string()),
        facility: Some(6),
        visual_range: Some(600),
        text_atis: Some(vec!["Boston Center".to_string(), "Online until 0300Z".to_string()]),
        last_updated: Some("2025-01-01T00:10:00Z".to_string()),
        logon_time: Some("2025-01-01T00:00:00Z".to_string()),
        atis_code: None,
    };

    let fp = build_fingerprint(&Participant::Controller(&controller));

    assert_eq!(fp.get("status"), Some("controller"));
    assert_eq!(fp.get("rating"), Some("C3"));
    assert_eq!(fp.get("facility"), Some("CTR"));
    assert_eq!(fp.get("visual_range"), Some("600"));
    assert_eq!(fp.get("text_atis"), Some("Boston Center\nOnline until 0300Z"));
    assert_eq!(fp.get("atis_code"), Some(MISSING));
    // Pilot-only fields do not leak into broadcast fingerprints
    assert!(fp.get("transponder").is_none());
}

#[test]
fn unrecognized_rating_renders_as_unknown() {
    let mut pilot = pilot_with_position(0.0, 0.0);
    pilot.pilot_rating = 42;

    let fp = build_fingerprint(&Participant::Pilot(&pilot));
    assert_eq!(fp.get("rating"), Some("Unknown (42)"));
}
