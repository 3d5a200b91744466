use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeDelta, Utc};
use wayfind_geo::Coordinates;

/// Where a search is measured from, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum OriginInput {
    /// Free text such as `"Edison, NJ"`, `"08817"` or `"new-jersey"`
    Text(String),
    /// Pre-supplied coordinates, e.g. from the browser's location API
    Coordinates(Coordinates),
}

/// Recency window for job postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostedWithin {
    Day,
    Week,
    Month,
}

impl PostedWithin {
    #[must_use]
    pub fn window(self) -> TimeDelta {
        match self {
            Self::Day => TimeDelta::days(1),
            Self::Week => TimeDelta::days(7),
            Self::Month => TimeDelta::days(30),
        }
    }
}

/// Attribute constraints: key to the set of acceptable values.
///
/// A candidate satisfies a key when any of its values for that key is in the
/// set; every key must be satisfied. Keys and values are stored lowercased.
pub type AttributeFilters = BTreeMap<String, BTreeSet<String>>;

/// An immutable, normalized search request.
///
/// Build one with [`SearchRequest::builder`]. Pages are zero-based.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub origin: Option<OriginInput>,
    /// Hard radius filter in miles; `None` means unbounded but still sorted
    pub radius_miles: Option<f64>,
    pub filters: AttributeFilters,
    /// State (any spelling) the candidate must be located in or serve
    pub service_area: Option<String>,
    pub accepting_only: Option<bool>,
    pub posted_within: Option<PostedWithin>,
    pub remote_only: bool,
    pub page: usize,
    /// `None` uses the configured default page size
    pub page_size: Option<usize>,
    /// Expose tier badges on results; never affects filtering or order
    pub show_tier_badges: bool,
    /// "Now" for recency filters
    pub reference_time: DateTime<Utc>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            origin: None,
            radius_miles: None,
            filters: AttributeFilters::new(),
            service_area: None,
            accepting_only: None,
            posted_within: None,
            remote_only: false,
            page: 0,
            page_size: None,
            show_tier_badges: false,
            reference_time: Utc::now(),
        }
    }
}

impl SearchRequest {
    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::default()
    }

    /// The query trimmed, or `None` when empty or whitespace.
    #[must_use]
    pub fn query_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Builder for [`SearchRequest`]
#[derive(Debug, Clone, Default)]
pub struct SearchRequestBuilder {
    request: SearchRequest,
}

impl SearchRequestBuilder {
    /// Set the free-text query
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.request.query = Some(query.into());
        self
    }

    /// Measure from a free-text location
    pub fn near(mut self, location: impl Into<String>) -> Self {
        self.request.origin = Some(OriginInput::Text(location.into()));
        self
    }

    /// Measure from known coordinates
    pub fn near_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.request.origin = Some(OriginInput::Coordinates(coordinates));
        self
    }

    /// Exclude candidates farther than `miles`. Negative or non-finite values
    /// leave the radius unset.
    pub fn radius(mut self, miles: f64) -> Self {
        self.request.radius_miles = Some(miles).filter(|r| r.is_finite() && *r >= 0.0);
        self
    }

    /// Require `key` to equal `value` (adds to any values already accepted
    /// for `key`)
    pub fn filter(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.request
            .filters
            .entry(key.as_ref().trim().to_lowercase())
            .or_default()
            .insert(value.as_ref().trim().to_lowercase());
        self
    }

    /// Require `key` to take any of `values`. An empty `values` still adds the
    /// key, which then matches no candidate.
    pub fn filter_any<I, S>(mut self, key: impl AsRef<str>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = key.as_ref().trim().to_lowercase();
        let accepted = self.request.filters.entry(key).or_default();
        accepted.extend(values.into_iter().map(|v| v.as_ref().trim().to_lowercase()));
        self
    }

    /// Restrict to candidates located in, or serving, a state
    pub fn service_area(mut self, state: impl Into<String>) -> Self {
        self.request.service_area = Some(state.into());
        self
    }

    /// Require the accepting-new-clients flag to equal `accepting`
    pub fn accepting_only(mut self, accepting: bool) -> Self {
        self.request.accepting_only = Some(accepting);
        self
    }

    pub fn posted_within(mut self, window: PostedWithin) -> Self {
        self.request.posted_within = Some(window);
        self
    }

    pub fn remote_only(mut self, remote: bool) -> Self {
        self.request.remote_only = remote;
        self
    }

    /// Zero-based page index
    pub fn page(mut self, page: usize) -> Self {
        self.request.page = page;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.request.page_size = Some(size);
        self
    }

    pub fn show_tier_badges(mut self, show: bool) -> Self {
        self.request.show_tier_badges = show;
        self
    }

    /// Pin "now" for recency filters
    pub fn reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.request.reference_time = now;
        self
    }

    pub fn build(self) -> SearchRequest {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_normalizes_filters() {
        let request = SearchRequest::builder()
            .filter("Category", " ABA ")
            .filter("category", "speech")
            .filter_any("insurance", ["Aetna", "Cigna"])
            .build();

        let category = &request.filters["category"];
        assert!(category.contains("aba"));
        assert!(category.contains("speech"));
        assert_eq!(request.filters["insurance"].len(), 2);
    }

    #[test]
    fn test_radius_rejects_invalid() {
        assert_eq!(SearchRequest::builder().radius(-1.0).build().radius_miles, None);
        assert_eq!(
            SearchRequest::builder().radius(f64::NAN).build().radius_miles,
            None
        );
        assert_eq!(
            SearchRequest::builder().radius(10.0).build().radius_miles,
            Some(10.0)
        );
    }

    #[test]
    fn test_query_text() {
        assert_eq!(SearchRequest::builder().query("   ").build().query_text(), None);
        assert_eq!(
            SearchRequest::builder().query(" aba ").build().query_text(),
            Some("aba")
        );
        assert_eq!(SearchRequest::default().query_text(), None);
    }

    #[test]
    fn test_posted_within_windows() {
        assert_eq!(PostedWithin::Day.window(), TimeDelta::days(1));
        assert_eq!(PostedWithin::Month.window(), TimeDelta::days(30));
    }
}
