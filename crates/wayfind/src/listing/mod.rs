//! Candidate records consumed by search.
//!
//! A [`Candidate`] is a flat, already-fetched listing: a provider location in
//! the directory or a posting on the job board. Search never mutates or
//! persists candidates; it only reads them.

use std::fmt;

use chrono::{DateTime, Utc};
use wayfind_geo::{NormalizedLocation, RawLocation, normalize_location};

/// Stable listing identifier. Ordering is the final ranking tie-break.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CandidateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Paid placement. Variant order is ranking order: `Featured` sorts first.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PlacementTier {
    Featured,
    Premium,
    #[default]
    Free,
}

impl PlacementTier {
    /// Derives the tier a listing ranks at from its owner's billing state.
    ///
    /// A paid plan only counts while its subscription is active or trialing;
    /// a lapsed subscription ranks as free.
    ///
    /// ```rust
    /// use wayfind::{PlacementTier, PlanTier, SubscriptionStatus};
    ///
    /// let tier = PlacementTier::effective(PlanTier::Pro, Some(SubscriptionStatus::PastDue), false);
    /// assert_eq!(tier, PlacementTier::Free);
    /// ```
    #[must_use]
    pub fn effective(
        plan: PlanTier,
        subscription: Option<SubscriptionStatus>,
        is_featured: bool,
    ) -> Self {
        if is_featured {
            return Self::Featured;
        }
        let active = subscription.is_some_and(SubscriptionStatus::is_active);
        match plan {
            PlanTier::Pro | PlanTier::Enterprise if active => Self::Premium,
            _ => Self::Free,
        }
    }

    /// Badge text shown on result cards; `None` for free listings.
    #[must_use]
    pub fn badge(self) -> Option<&'static str> {
        match self {
            Self::Featured => Some("Featured"),
            Self::Premium => Some("Premium"),
            Self::Free => None,
        }
    }
}

impl fmt::Display for PlacementTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Featured => "featured",
            Self::Premium => "premium",
            Self::Free => "free",
        };
        f.write_str(name)
    }
}

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Incomplete,
}

impl SubscriptionStatus {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active | Self::Trialing)
    }
}

/// Lifecycle state of a listing. Only `Published` is visible to search.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListingStatus {
    Draft,
    #[default]
    Published,
    Paused,
    Closed,
    Archived,
}

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CandidateKind {
    #[default]
    ProviderLocation,
    JobPosting,
}

/// How a provider delivers service.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServiceMode {
    /// Clients come to the location; always within service range
    #[default]
    CenterBased,
    /// The provider travels to clients within a service radius
    InHome,
    Hybrid,
}

/// A filterable category or attribute value, with an optional display label
/// used for relevance scoring.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub key: String,
    pub value: String,
    pub label: Option<String>,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Text matched against queries: the label when present, else the value.
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

/// A listing or job posting eligible for search.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: CandidateId,
    pub kind: CandidateKind,
    pub name: String,
    pub headline: Option<String>,
    pub tier: PlacementTier,
    pub status: ListingStatus,
    pub location: RawLocation,
    /// Accepting new clients (directory) or applicants (job board)
    pub accepting: Option<bool>,
    pub attributes: Vec<Attribute>,
    /// States served beyond the listing's own location
    pub service_states: Vec<String>,
    pub service_mode: ServiceMode,
    pub service_radius_miles: Option<f64>,
    pub published_at: Option<DateTime<Utc>>,
    pub remote: bool,
}

impl Candidate {
    /// A published, free-tier provider location with no location data.
    pub fn new(id: impl Into<CandidateId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: CandidateKind::default(),
            name: name.into(),
            headline: None,
            tier: PlacementTier::default(),
            status: ListingStatus::default(),
            location: RawLocation::default(),
            accepting: None,
            attributes: Vec::new(),
            service_states: Vec::new(),
            service_mode: ServiceMode::default(),
            service_radius_miles: None,
            published_at: None,
            remote: false,
        }
    }

    pub fn with_kind(mut self, kind: CandidateKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_headline(mut self, headline: impl Into<String>) -> Self {
        self.headline = Some(headline.into());
        self
    }

    pub fn with_tier(mut self, tier: PlacementTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_location(mut self, location: RawLocation) -> Self {
        self.location = location;
        self
    }

    pub fn with_accepting(mut self, accepting: bool) -> Self {
        self.accepting = Some(accepting);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_service_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_service_mode(mut self, mode: ServiceMode, radius_miles: Option<f64>) -> Self {
        self.service_mode = mode;
        self.service_radius_miles = radius_miles;
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote = remote;
        self
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == ListingStatus::Published
    }

    #[must_use]
    pub fn normalized_location(&self) -> NormalizedLocation {
        normalize_location(&self.location)
    }

    /// Values of every attribute under `key` (case-insensitive key match).
    pub fn attribute_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |attr| attr.key.eq_ignore_ascii_case(key))
            .map(|attr| attr.value.as_str())
    }
}
