//! Reference data: the US state universe.
//!
//! The code→name table has 51 entries (50 states + DC) and is the strict
//! lookup used during normalization. The 50-state list is the universe
//! state-keyed choropleth tables are completed against.

/// State code to full name, sorted by code
pub const US_STATES: &[(&str, &str)] = &[
    ("AK", "Alaska"),
    ("AL", "Alabama"),
    ("AR", "Arkansas"),
    ("AZ", "Arizona"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DC", "District of Columbia"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("IA", "Iowa"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("MA", "Massachusetts"),
    ("MD", "Maryland"),
    ("ME", "Maine"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MO", "Missouri"),
    ("MS", "Mississippi"),
    ("MT", "Montana"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("NE", "Nebraska"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NV", "Nevada"),
    ("NY", "New York"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VA", "Virginia"),
    ("VT", "Vermont"),
    ("WA", "Washington"),
    ("WI", "Wisconsin"),
    ("WV", "West Virginia"),
    ("WY", "Wyoming"),
];

/// Codes that are mapped but not part of the 50-state universe
const NON_STATE_CODES: &[&str] = &["DC"];

/// Look up the canonical `(code, name)` pair for a state code.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn lookup_state(code: &str) -> Option<(&'static str, &'static str)> {
    let code = code.trim();
    if code.len() != 2 {
        return None;
    }
    let upper = code.to_ascii_uppercase();
    US_STATES
        .binary_search_by(|(c, _)| (*c).cmp(upper.as_str()))
        .ok()
        .map(|idx| US_STATES[idx])
}

/// Full name for a state code
pub fn state_name(code: &str) -> Option<&'static str> {
    lookup_state(code).map(|(_, name)| name)
}

/// The 50-state universe as `(code, name)` pairs, sorted by full name
pub fn state_universe() -> Vec<(&'static str, &'static str)> {
    let mut states: Vec<_> = US_STATES
        .iter()
        .filter(|(code, _)| !NON_STATE_CODES.contains(code))
        .copied()
        .collect();
    states.sort_by(|a, b| a.1.cmp(b.1));
    states
}
