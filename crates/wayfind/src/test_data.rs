//! Deterministic candidate pools for tests, doctests and examples.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tracing::info;
use wayfind_geo::RawLocation;

use crate::listing::{
    Attribute, Candidate, CandidateKind, ListingStatus, PlacementTier, ServiceMode,
};

/// Fixed "now" that fixture publish dates are relative to.
#[must_use]
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Configuration for test pool generation
#[derive(Debug, Clone)]
pub struct TestPoolConfig {
    /// Number of provider locations to generate
    pub providers: usize,
    /// Number of job postings to generate
    pub jobs: usize,
    /// Every n-th generated listing is a draft (0 disables drafts)
    pub draft_every: usize,
    /// Every n-th generated listing has no coordinates (0 disables)
    pub missing_coordinates_every: usize,
}

impl Default for TestPoolConfig {
    fn default() -> Self {
        Self {
            providers: 40,
            jobs: 20,
            draft_every: 9,
            missing_coordinates_every: 7,
        }
    }
}

impl TestPoolConfig {
    /// Minimal pool for unit tests
    pub fn minimal() -> Self {
        Self {
            providers: 6,
            jobs: 3,
            draft_every: 0,
            missing_coordinates_every: 4,
        }
    }

    /// Sample pool for integration tests
    pub fn sample() -> Self {
        Self {
            providers: 120,
            jobs: 60,
            draft_every: 11,
            missing_coordinates_every: 6,
        }
    }

    /// Picks a size from `TEST_POOL_SIZE` (`minimal` unless set to `sample`).
    pub fn from_env() -> Self {
        match std::env::var("TEST_POOL_SIZE").as_deref() {
            Ok("sample") => Self::sample(),
            _ => Self::minimal(),
        }
    }
}

/// New Jersey and New York towns used for fixture locations.
const TOWNS: &[(&str, &str, f64, f64)] = &[
    ("Edison", "NJ", 40.5187, -74.4121),
    ("New Brunswick", "new-jersey", 40.4862, -74.4518),
    ("Princeton", "New Jersey", 40.3573, -74.6672),
    ("Newark", "nj", 40.7357, -74.1724),
    ("Trenton", "NJ", 40.2206, -74.7597),
    ("Brooklyn", "NY", 40.6782, -73.9442),
    ("Staten Island", "new-york", 40.5795, -74.1502),
    ("Philadelphia", "PA", 39.9526, -75.1652),
];

const SERVICES: &[(&str, &str)] = &[
    ("aba", "ABA Therapy"),
    ("speech", "Speech Therapy"),
    ("occupational", "Occupational Therapy"),
    ("counseling", "Counseling"),
];

const JOB_TYPES: &[(&str, &str)] = &[
    ("full-time", "Full Time"),
    ("part-time", "Part Time"),
    ("contract", "Contract"),
];

const INSURANCE: &[&str] = &["aetna", "cigna", "medicaid"];

fn tier_for(index: usize) -> PlacementTier {
    match index % 10 {
        0 => PlacementTier::Featured,
        1 | 4 | 7 => PlacementTier::Premium,
        _ => PlacementTier::Free,
    }
}

fn location_for(index: usize, config: &TestPoolConfig) -> RawLocation {
    let (city, state, lat, lng) = TOWNS[index % TOWNS.len()];
    let location = RawLocation::new(city, state);
    if config.missing_coordinates_every > 0 && index % config.missing_coordinates_every == 3 {
        return location;
    }
    // Spread listings a little around each town so distances differ
    let jitter = (index / TOWNS.len()) as f64 * 0.01;
    location.with_coordinates(lat + jitter, lng - jitter)
}

fn status_for(index: usize, config: &TestPoolConfig) -> ListingStatus {
    if config.draft_every > 0 && index % config.draft_every == config.draft_every - 1 {
        ListingStatus::Draft
    } else {
        ListingStatus::Published
    }
}

/// Builds a deterministic pool of providers followed by job postings.
pub fn create_test_pool(config: &TestPoolConfig) -> Vec<Candidate> {
    info!("Creating test pool with config: {:?}", config);
    let now = reference_time();

    let providers = (0..config.providers).map(|i| {
        let (service, label) = SERVICES[i % SERVICES.len()];
        let mode = match i % 3 {
            0 => ServiceMode::CenterBased,
            1 => ServiceMode::InHome,
            _ => ServiceMode::Hybrid,
        };
        Candidate::new(format!("provider-{i:03}"), format!("{label} Center {i}"))
            .with_headline(format!("Caring {} for families", label.to_lowercase()))
            .with_tier(tier_for(i))
            .with_status(status_for(i, config))
            .with_location(location_for(i, config))
            .with_accepting(i % 4 != 2)
            .with_attribute(Attribute::new("category", service).with_label(label))
            .with_attribute(Attribute::new("insurance", INSURANCE[i % INSURANCE.len()]))
            .with_service_mode(mode, (i % 2 == 0).then_some(15.0))
            .with_published_at(now - TimeDelta::days(i as i64))
    });

    let jobs = (0..config.jobs).map(|i| {
        let (job_type, label) = JOB_TYPES[i % JOB_TYPES.len()];
        let (service, service_label) = SERVICES[i % SERVICES.len()];
        let offset = config.providers + i;
        Candidate::new(format!("job-{i:03}"), format!("{service_label} Technician"))
            .with_kind(CandidateKind::JobPosting)
            .with_headline(format!("{label} role in {service_label}"))
            .with_tier(tier_for(offset))
            .with_status(status_for(offset, config))
            .with_location(location_for(offset, config))
            .with_accepting(true)
            .with_attribute(Attribute::new("job_type", job_type).with_label(label))
            .with_attribute(Attribute::new("category", service).with_label(service_label))
            .with_remote(i % 5 == 0)
            .with_published_at(now - TimeDelta::hours(i as i64 * 20))
    });

    providers.chain(jobs).collect()
}
