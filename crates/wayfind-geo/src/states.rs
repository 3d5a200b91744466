//! US state lookup table.
//!
//! Stored listings spell states inconsistently ("NJ", "New Jersey",
//! "new-jersey"). Everything here resolves those spellings to one canonical
//! two-letter code.

use ahash::AHashMap as HashMap;
use once_cell::sync::Lazy;

/// One row of the state table.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsState {
    /// Two-letter postal code, e.g. `"NJ"`
    pub code: &'static str,
    /// Display name, e.g. `"New Jersey"`
    pub name: &'static str,
}

impl UsState {
    /// URL slug form of the name, e.g. `"new-jersey"`.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(self.name)
    }
}

/// Both spellings of a state, for callers whose storage mixes codes and names.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateForms {
    pub name: &'static str,
    pub code: &'static str,
}

#[rustfmt::skip]
pub const US_STATES: &[UsState] = &[
    UsState { code: "AL", name: "Alabama" },
    UsState { code: "AK", name: "Alaska" },
    UsState { code: "AZ", name: "Arizona" },
    UsState { code: "AR", name: "Arkansas" },
    UsState { code: "CA", name: "California" },
    UsState { code: "CO", name: "Colorado" },
    UsState { code: "CT", name: "Connecticut" },
    UsState { code: "DE", name: "Delaware" },
    UsState { code: "DC", name: "District of Columbia" },
    UsState { code: "FL", name: "Florida" },
    UsState { code: "GA", name: "Georgia" },
    UsState { code: "HI", name: "Hawaii" },
    UsState { code: "ID", name: "Idaho" },
    UsState { code: "IL", name: "Illinois" },
    UsState { code: "IN", name: "Indiana" },
    UsState { code: "IA", name: "Iowa" },
    UsState { code: "KS", name: "Kansas" },
    UsState { code: "KY", name: "Kentucky" },
    UsState { code: "LA", name: "Louisiana" },
    UsState { code: "ME", name: "Maine" },
    UsState { code: "MD", name: "Maryland" },
    UsState { code: "MA", name: "Massachusetts" },
    UsState { code: "MI", name: "Michigan" },
    UsState { code: "MN", name: "Minnesota" },
    UsState { code: "MS", name: "Mississippi" },
    UsState { code: "MO", name: "Missouri" },
    UsState { code: "MT", name: "Montana" },
    UsState { code: "NE", name: "Nebraska" },
    UsState { code: "NV", name: "Nevada" },
    UsState { code: "NH", name: "New Hampshire" },
    UsState { code: "NJ", name: "New Jersey" },
    UsState { code: "NM", name: "New Mexico" },
    UsState { code: "NY", name: "New York" },
    UsState { code: "NC", name: "North Carolina" },
    UsState { code: "ND", name: "North Dakota" },
    UsState { code: "OH", name: "Ohio" },
    UsState { code: "OK", name: "Oklahoma" },
    UsState { code: "OR", name: "Oregon" },
    UsState { code: "PA", name: "Pennsylvania" },
    UsState { code: "PR", name: "Puerto Rico" },
    UsState { code: "RI", name: "Rhode Island" },
    UsState { code: "SC", name: "South Carolina" },
    UsState { code: "SD", name: "South Dakota" },
    UsState { code: "TN", name: "Tennessee" },
    UsState { code: "TX", name: "Texas" },
    UsState { code: "UT", name: "Utah" },
    UsState { code: "VT", name: "Vermont" },
    UsState { code: "VA", name: "Virginia" },
    UsState { code: "WA", name: "Washington" },
    UsState { code: "WV", name: "West Virginia" },
    UsState { code: "WI", name: "Wisconsin" },
    UsState { code: "WY", name: "Wyoming" },
];

/// Every accepted spelling (lowercased code, name and slug) mapped to its row.
static STATE_INDEX: Lazy<HashMap<String, &'static UsState>> = Lazy::new(|| {
    let mut index = HashMap::with_capacity(US_STATES.len() * 3);
    for state in US_STATES {
        index.insert(state.code.to_ascii_lowercase(), state);
        index.insert(state.name.to_lowercase(), state);
        index.insert(state.slug(), state);
    }
    index
});

fn slugify(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Resolves a code, full name or slug to its table row (case-insensitive).
///
/// ```rust
/// use wayfind_geo::lookup_state;
///
/// assert_eq!(lookup_state("new-jersey").map(|s| s.code), Some("NJ"));
/// assert_eq!(lookup_state("New  Jersey").map(|s| s.code), Some("NJ"));
/// assert_eq!(lookup_state("nj").map(|s| s.name), Some("New Jersey"));
/// assert!(lookup_state("Atlantis").is_none());
/// ```
#[must_use]
pub fn lookup_state(input: &str) -> Option<&'static UsState> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Slug form covers codes, single-word names and collapsed whitespace
    let slug = slugify(trimmed);
    STATE_INDEX
        .get(&slug)
        .or_else(|| STATE_INDEX.get(&trimmed.to_lowercase()))
        .copied()
}

/// `"new-jersey"` / `"New Jersey"` / `"nj"` → `"NJ"`.
#[must_use]
pub fn state_code(input: &str) -> Option<&'static str> {
    lookup_state(input).map(|state| state.code)
}

/// `"NJ"` / `"new-jersey"` → `"New Jersey"`.
#[must_use]
pub fn state_name(input: &str) -> Option<&'static str> {
    lookup_state(input).map(|state| state.name)
}

/// `"NJ"` / `"New Jersey"` → `"new-jersey"`.
#[must_use]
pub fn state_slug(input: &str) -> Option<String> {
    lookup_state(input).map(UsState::slug)
}

#[must_use]
pub fn state_forms(input: &str) -> Option<StateForms> {
    lookup_state(input).map(|state| StateForms {
        name: state.name,
        code: state.code,
    })
}
