//! Shared helpers for unit tests: canned HTTP endpoints and sample
//! snapshot records.

use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use crate::Controller;
use crate::FlightPlan;
use crate::Pilot;

/// Serves exactly one canned HTTP response on a local port and returns the
/// base URL to reach it.
pub async fn serve_once(
    status_line: &'static str,
    body: String,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 8192];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{}", addr)
}

pub fn sample_pilot(
    cid: u64,
    callsign: &str,
) -> Pilot {
    Pilot {
        cid,
        name: "John Smith".to_string(),
        callsign: callsign.to_string(),
        server: Some("USA-EAST".to_string()),
        pilot_rating: 1,
        latitude: Some(40.64),
        longitude: Some(-73.78),
        altitude: Some(36000),
        groundspeed: Some(450),
        transponder: Some("2200".to_string()),
        logon_time: Some("2025-01-01T00:00:00Z".to_string()),
        flight_plan: Some(FlightPlan {
            flight_rules: Some("I".to_string()),
            aircraft_short: Some("B738".to_string()),
            departure: Some("KJFK".to_string()),
            arrival: Some("KSFO".to_string()),
            route: Some("GREKI JUDDS CAM".to_string()),
            remarks: Some("/v/".to_string()),
            ..FlightPlan::default()
        }),
        ..Pilot::default()
    }
}

pub fn sample_controller(
    cid: u64,
    callsign: &str,
) -> Controller {
    Controller {
        cid,
        name: "Jane Doe".to_string(),
        callsign: callsign.to_string(),
        server: Some("USA-EAST".to_string()),
        rating: 7,
        frequency: Some("134.700".to_string()),
        facility: Some(6),
        visual_range: Some(600),
        text_atis: Some(vec!["Boston Center".to_string()]),
        last_updated: Some("2025-01-01T00:10:00Z".to_string()),
        logon_time: Some("2025-01-01T00:00:00Z".to_string()),
        atis_code: None,
    }
}
