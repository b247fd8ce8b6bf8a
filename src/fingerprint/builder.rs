use super::facility_label;
use super::controller_rating_label;
use super::pilot_rating_label;
use super::Fingerprint;
use crate::Controller;
use crate::Participant;
use crate::Pilot;
use crate::Role;

/// Projects a matched participant into its comparable fact set.
///
/// Pilot-kind and broadcast-kind records produce different field sets; both
/// deliberately exclude live position so that movement alone never reads as
/// a change.
pub fn build_fingerprint(participant: &Participant<'_>) -> Fingerprint {
    match participant {
        Participant::Pilot(pilot) => pilot_fingerprint(pilot),
        Participant::Controller(controller) => controller_fingerprint(controller, Role::Controller),
        Participant::Atis(station) => controller_fingerprint(station, Role::Atis),
    }
}

/// Aircraft type resolved by preference order: short code, then FAA code,
/// then the free-text code.
pub(crate) fn resolve_aircraft(pilot: &Pilot) -> Option<&str> {
    let plan = pilot.flight_plan.as_ref()?;
    plan.aircraft_short
        .as_deref()
        .or(plan.aircraft_faa.as_deref())
        .or(plan.aircraft.as_deref())
}

fn pilot_fingerprint(pilot: &Pilot) -> Fingerprint {
    let mut fp = Fingerprint::default();
    fp.set("status", Role::Pilot.tag());
    fp.set("callsign", &pilot.callsign);
    fp.set("rating", pilot_rating_label(pilot.pilot_rating));
    fp.set_opt("server", pilot.server.as_deref());
    fp.set_opt("start_time", pilot.logon_time.as_deref());
    fp.set_opt("transponder", pilot.transponder.as_deref());
    fp.set_opt("aircraft", resolve_aircraft(pilot));

    let plan = pilot.flight_plan.as_ref();
    fp.set_opt("assigned_transponder", plan.and_then(|p| p.assigned_transponder.as_deref()));
    fp.set_opt("flight_rules", plan.and_then(|p| p.flight_rules.as_deref()));
    fp.set_opt("departure", plan.and_then(|p| p.departure.as_deref()));
    fp.set_opt("arrival", plan.and_then(|p| p.arrival.as_deref()));
    fp.set_opt("alternate", plan.and_then(|p| p.alternate.as_deref()));
    fp.set_opt("cruise_tas", plan.and_then(|p| p.cruise_tas.as_deref()));
    fp.set_opt("altitude", plan.and_then(|p| p.altitude.as_deref()));
    fp.set_opt("deptime", plan.and_then(|p| p.deptime.as_deref()));
    fp.set_opt("enroute_time", plan.and_then(|p| p.enroute_time.as_deref()));
    fp.set_opt("fuel_time", plan.and_then(|p| p.fuel_time.as_deref()));
    fp.set_opt("route", plan.and_then(|p| p.route.as_deref()));
    fp.set_opt("remarks", plan.and_then(|p| p.remarks.as_deref()));
    fp
}

fn controller_fingerprint(
    controller: &Controller,
    role: Role,
) -> Fingerprint {
    let mut fp = Fingerprint::default();
    fp.set("status", role.tag());
    fp.set("callsign", &controller.callsign);
    fp.set("rating", controller_rating_label(controller.rating));
    fp.set_opt("server", controller.server.as_deref());
    fp.set_opt("start_time", controller.logon_time.as_deref());
    fp.set_opt("frequency", controller.frequency.as_deref());
    fp.set_opt("facility", controller.facility.map(facility_label));
    fp.set_opt("visual_range", controller.visual_range.map(|r| r.to_string()));
    fp.set_opt(
        "text_atis",
        controller.text_atis.as_ref().map(|lines| lines.join("\n")),
    );
    fp.set_opt("last_updated", controller.last_updated.as_deref());
    fp.set_opt("atis_code", controller.atis_code.as_deref());
    fp
}
