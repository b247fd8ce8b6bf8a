//! Serde models of the third-party network snapshot.
//!
//! The feed publishes the full participant list each cycle and replaces the
//! prior snapshot wholesale; there is no participant identity across cycles
//! beyond the account id. Every field that can be absent is optional or
//! defaulted so one malformed record never rejects the whole feed.

use serde::Deserialize;

/// One publication of the live network state, partitioned by role.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub pilots: Vec<Pilot>,
    #[serde(default)]
    pub controllers: Vec<Controller>,
    #[serde(default)]
    pub atis: Vec<Controller>,
}

/// A connected pilot and their filed flight plan, if any.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pilot {
    #[serde(default)]
    pub cid: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub callsign: String,
    pub server: Option<String>,
    #[serde(default = "default_rating")]
    pub pilot_rating: i64,
    pub military_rating: Option<i64>,
    pub transponder: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<i64>,
    pub groundspeed: Option<i64>,
    pub heading: Option<i64>,
    pub qnh_i_hg: Option<f64>,
    pub qnh_mb: Option<i64>,
    pub flight_plan: Option<FlightPlan>,
    pub logon_time: Option<String>,
}

/// A connected controller or broadcast (ATIS) station.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Controller {
    #[serde(default)]
    pub cid: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub callsign: String,
    pub server: Option<String>,
    #[serde(default = "default_rating")]
    pub rating: i64,
    pub frequency: Option<String>,
    pub facility: Option<i64>,
    pub visual_range: Option<i64>,
    pub text_atis: Option<Vec<String>>,
    pub last_updated: Option<String>,
    pub logon_time: Option<String>,
    pub atis_code: Option<String>,
}

/// Filed flight-plan details. All free text, all optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightPlan {
    pub flight_rules: Option<String>,
    pub aircraft: Option<String>,
    pub aircraft_faa: Option<String>,
    pub aircraft_short: Option<String>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub alternate: Option<String>,
    pub cruise_tas: Option<String>,
    pub altitude: Option<String>,
    pub deptime: Option<String>,
    pub enroute_time: Option<String>,
    pub fuel_time: Option<String>,
    pub remarks: Option<String>,
    pub route: Option<String>,
    pub assigned_transponder: Option<String>,
}

fn default_rating() -> i64 {
    -1
}

/// Role tag carried by every participant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Pilot,
    Controller,
    Atis,
}

impl Role {
    /// Lowercase tag used in fingerprints and rendered panels.
    pub fn tag(&self) -> &'static str {
        match self {
            Role::Pilot => "pilot",
            Role::Controller => "controller",
            Role::Atis => "atis",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Role-tagged borrowed view over one snapshot record.
///
/// Gives the matcher and the fingerprint builder uniform access to the
/// fields shared by every role.
#[derive(Debug, Clone, Copy)]
pub enum Participant<'a> {
    Pilot(&'a Pilot),
    Controller(&'a Controller),
    Atis(&'a Controller),
}

impl<'a> Participant<'a> {
    pub fn role(&self) -> Role {
        match self {
            Participant::Pilot(_) => Role::Pilot,
            Participant::Controller(_) => Role::Controller,
            Participant::Atis(_) => Role::Atis,
        }
    }

    pub fn cid(&self) -> u64 {
        match self {
            Participant::Pilot(p) => p.cid,
            Participant::Controller(c) | Participant::Atis(c) => c.cid,
        }
    }

    pub fn callsign(&self) -> &'a str {
        match self {
            Participant::Pilot(p) => &p.callsign,
            Participant::Controller(c) | Participant::Atis(c) => &c.callsign,
        }
    }

    pub fn display_name(&self) -> &'a str {
        match self {
            Participant::Pilot(p) => &p.name,
            Participant::Controller(c) | Participant::Atis(c) => &c.name,
        }
    }

    pub fn server(&self) -> Option<&'a str> {
        match self {
            Participant::Pilot(p) => p.server.as_deref(),
            Participant::Controller(c) | Participant::Atis(c) => c.server.as_deref(),
        }
    }

    pub fn logon_time(&self) -> Option<&'a str> {
        match self {
            Participant::Pilot(p) => p.logon_time.as_deref(),
            Participant::Controller(c) | Participant::Atis(c) => c.logon_time.as_deref(),
        }
    }

    /// Live position, pilots only.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Participant::Pilot(p) => match (p.latitude, p.longitude) {
                (Some(lat), Some(lon)) => Some((lat, lon)),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn frequency(&self) -> Option<&'a str> {
        match self {
            Participant::Pilot(_) => None,
            Participant::Controller(c) | Participant::Atis(c) => c.frequency.as_deref(),
        }
    }
}

impl Snapshot {
    /// Pilots then controllers, in feed order. Broadcast stations are
    /// excluded: watches never match on ATIS records.
    pub fn live_participants(&self) -> impl Iterator<Item = Participant<'_>> {
        self.pilots
            .iter()
            .map(Participant::Pilot)
            .chain(self.controllers.iter().map(Participant::Controller))
    }

    /// Every record in the snapshot, broadcast stations included.
    pub fn all_participants(&self) -> impl Iterator<Item = Participant<'_>> {
        self.live_participants().chain(self.atis.iter().map(Participant::Atis))
    }
}
