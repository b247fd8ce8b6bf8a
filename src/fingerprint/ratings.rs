//! Fixed rating and facility lookup tables.
//!
//! Numeric codes in the feed are opaque; their interpretation depends on
//! the participant's role. An unrecognized code renders as `Unknown (<code>)`
//! rather than failing.

fn unknown(code: i64) -> String {
    format!("Unknown ({})", code)
}

pub fn controller_rating_label(code: i64) -> String {
    match code {
        -1 => "INA".to_string(),
        0 => "SUS".to_string(),
        1 => "OBS".to_string(),
        2 => "S1".to_string(),
        3 => "S2".to_string(),
        4 => "S3".to_string(),
        5 => "C1".to_string(),
        6 => "C2".to_string(),
        7 => "C3".to_string(),
        8 => "I1".to_string(),
        9 => "I2".to_string(),
        10 => "I3".to_string(),
        11 => "SUP".to_string(),
        12 => "ADM".to_string(),
        other => unknown(other),
    }
}

pub fn pilot_rating_label(code: i64) -> String {
    match code {
        -1 => "INA".to_string(),
        0 => "P0".to_string(),
        1 => "PPL".to_string(),
        3 => "IR".to_string(),
        7 => "CMEL".to_string(),
        15 => "ATPL".to_string(),
        31 => "FI".to_string(),
        63 => "FE".to_string(),
        other => unknown(other),
    }
}

pub fn military_rating_label(code: i64) -> String {
    match code {
        0 => "M0".to_string(),
        1 => "M1".to_string(),
        3 => "M2".to_string(),
        7 => "M3".to_string(),
        15 => "M4".to_string(),
        other => unknown(other),
    }
}

pub fn facility_label(code: i64) -> String {
    match code {
        0 => "OBS".to_string(),
        1 => "FSS".to_string(),
        2 => "DEL".to_string(),
        3 => "GND".to_string(),
        4 => "TWR".to_string(),
        5 => "APP".to_string(),
        6 => "CTR".to_string(),
        other => unknown(other),
    }
}
