use std::fmt;

use serde_json::Value;

use crate::record::RadarRecord;

/// Canonical radar frequency band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    S,
    C,
    X,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::S, Band::C, Band::X];

    pub fn as_str(self) -> &'static str {
        match self {
            Band::S => "S",
            Band::C => "C",
            Band::X => "X",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical operational status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Operational,
    Planned,
    UnderConstruction,
    Decommissioned,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Operational,
        Status::Planned,
        Status::UnderConstruction,
        Status::Decommissioned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Operational => "Operational",
            Status::Planned => "Planned",
            Status::UnderConstruction => "Under Construction",
            Status::Decommissioned => "Decommissioned",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coerce a JSON value to text the way the upstream fields are read:
/// strings pass through, numbers and bools print themselves, everything
/// else (null, arrays, objects) is treated as absent.
pub fn coerce_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Canonical band code from a free-text band field.
///
/// Total over any JSON shape; unknown bands map to `None`.
pub fn normalize_band(value: &Value) -> Option<Band> {
    normalize_band_str(&coerce_str(value))
}

/// [`normalize_band`] over plain text (CLI flags, request params).
pub fn normalize_band_str(value: &str) -> Option<Band> {
    let s: String = value.trim().to_uppercase().replace(['-', ' '], "");
    match s.chars().next() {
        Some('S') => Some(Band::S),
        Some('C') => Some(Band::C),
        Some('X') => Some(Band::X),
        _ => None,
    }
}

/// Canonical status from a free-text status field.
///
/// Classification is by substring containment, first match wins:
/// operational, planned, construction, decommission.
pub fn normalize_status(value: &Value) -> Option<Status> {
    normalize_status_str(&coerce_str(value))
}

/// [`normalize_status`] over plain text (CLI flags, request params).
pub fn normalize_status_str(value: &str) -> Option<Status> {
    let s = value.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }
    if s.contains("operational") {
        Some(Status::Operational)
    } else if s.contains("planned") {
        Some(Status::Planned)
    } else if s.contains("construction") {
        Some(Status::UnderConstruction)
    } else if s.contains("decommission") {
        Some(Status::Decommissioned)
    } else {
        None
    }
}

/// Canonical country token for a record.
///
/// Tries, in order: the ISO3 code field, the country-name field, the
/// nested country object's alpha3 code, then its name. A resolved value
/// of exactly three alphabetic characters is uppercased as an ISO3 code;
/// anything else is kept as a free-text country name.
pub fn normalize_country(record: &RadarRecord) -> Option<String> {
    let nested = record.country.as_ref();
    let raw = record
        .country_iso3
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(record.country_name.as_deref())
        .or_else(|| nested.and_then(|c| c.alpha3.as_deref()))
        .or_else(|| nested.and_then(|c| c.name.as_deref()))
        .unwrap_or("");

    let s = raw.trim();
    if s.is_empty() {
        None
    } else if s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(s.to_ascii_uppercase())
    } else {
        Some(s.to_string())
    }
}

/// Split a query into lowercase tokens on whitespace runs.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn band_takes_first_char_after_stripping() {
        assert_eq!(normalize_band(&json!("S-band")), Some(Band::S));
        assert_eq!(normalize_band(&json!(" c band ")), Some(Band::C));
        assert_eq!(normalize_band(&json!("X")), Some(Band::X));
        assert_eq!(normalize_band(&json!("- s")), Some(Band::S));
    }

    #[test]
    fn band_unknown_or_malformed_is_none() {
        assert_eq!(normalize_band(&json!("L-band")), None);
        assert_eq!(normalize_band(&json!("")), None);
        assert_eq!(normalize_band(&Value::Null), None);
        assert_eq!(normalize_band(&json!(5)), None);
        assert_eq!(normalize_band(&json!({"band": "C"})), None);
        assert_eq!(normalize_band(&json!(["C"])), None);
    }

    #[test]
    fn band_canonical_codes_are_fixed_points() {
        for raw in ["S-Band", "c", "X band", "ku", ""] {
            let once = normalize_band(&json!(raw));
            let code = once.map(Band::as_str).unwrap_or("");
            assert_eq!(normalize_band(&json!(code)), once);
        }
    }

    #[test]
    fn status_classifies_by_substring_priority() {
        assert_eq!(
            normalize_status(&json!("fully OPERATIONAL since 1998")),
            Some(Status::Operational)
        );
        // Both substrings present: first match wins.
        assert_eq!(
            normalize_status(&json!("operational (was planned)")),
            Some(Status::Operational)
        );
        assert_eq!(
            normalize_status(&json!("Under Construction")),
            Some(Status::UnderConstruction)
        );
        assert_eq!(
            normalize_status(&json!("DECOMMISSIONED 2020")),
            Some(Status::Decommissioned)
        );
    }

    #[test]
    fn status_unmatched_text_is_none() {
        assert_eq!(normalize_status(&json!("standby")), None);
        assert_eq!(normalize_status(&json!("")), None);
        assert_eq!(normalize_status(&Value::Null), None);
        assert_eq!(normalize_status(&json!(42)), None);
    }

    #[test]
    fn country_fallback_chain_first_nonempty_wins() {
        let from = |v: Value| RadarRecord::from_value(&v).unwrap();

        let r = from(json!({"id": "a", "country_iso3": "JPN", "country_name": "Japan"}));
        assert_eq!(normalize_country(&r), Some("JPN".into()));

        // Empty ISO3 falls through to the name.
        let r = from(json!({"id": "a", "country_iso3": "", "country_name": "Japan"}));
        assert_eq!(normalize_country(&r), Some("Japan".into()));

        let r = from(json!({"id": "a", "country": {"alpha3": "fra"}}));
        assert_eq!(normalize_country(&r), Some("FRA".into()));

        let r = from(json!({"id": "a", "country": {"name": "United States"}}));
        assert_eq!(normalize_country(&r), Some("United States".into()));

        let r = from(json!({"id": "a"}));
        assert_eq!(normalize_country(&r), None);
    }

    #[test]
    fn country_three_letter_codes_are_uppercased() {
        let r = RadarRecord::from_value(&json!({"id": "a", "country_name": "jpn"})).unwrap();
        assert_eq!(normalize_country(&r), Some("JPN".into()));
        // Four letters is a name, not a code.
        let r = RadarRecord::from_value(&json!({"id": "a", "country_name": "Chad "})).unwrap();
        assert_eq!(normalize_country(&r), Some("Chad".into()));
    }

    #[test]
    fn tokenize_lowercases_and_drops_empties() {
        assert_eq!(tokenize("  Japan   C "), vec!["japan", "c"]);
        assert_eq!(tokenize(""), Vec::<String>::new());
        assert_eq!(tokenize("   "), Vec::<String>::new());
        assert_eq!(tokenize("TOKYO\ttower"), vec!["tokyo", "tower"]);
    }
}
