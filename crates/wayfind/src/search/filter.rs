//! Hard filters that narrow the candidate pool before ranking.
//!
//! Every constraint is default-deny: a candidate missing the data a present
//! constraint asks about fails it. The single exception is the radius, which
//! only excludes candidates whose distance is known.

use tracing::{debug, instrument};
use wayfind_geo::{distance_miles, state_code, within_radius};

use crate::{
    listing::{Candidate, CandidateKind},
    origin::ResolvedOrigin,
    search::request::{AttributeFilters, SearchRequest},
};

/// Narrows `pool` to the candidates visible for `request`. Output order
/// follows input order and carries no ranking meaning.
#[instrument(name = "Filter candidates", level = "debug", skip_all, fields(pool = pool.len()))]
pub fn filter_candidates<'a>(
    pool: &'a [Candidate],
    request: &SearchRequest,
    origin: &ResolvedOrigin,
) -> Vec<&'a Candidate> {
    let service_area = request.service_area.as_deref().map(|area| {
        let code = state_code(area);
        if code.is_none() {
            debug!(area, "Unrecognised service area, no candidate can match");
        }
        code
    });

    let filtered: Vec<_> = pool
        .iter()
        .filter(|candidate| candidate.is_published())
        .filter(|candidate| matches_attributes(candidate, &request.filters))
        .filter(|candidate| {
            service_area.is_none_or(|code| code.is_some_and(|code| serves_state(candidate, code)))
        })
        .filter(|candidate| {
            request
                .accepting_only
                .is_none_or(|wanted| candidate.accepting == Some(wanted))
        })
        .filter(|candidate| is_recent_enough(candidate, request))
        .filter(|candidate| !request.remote_only || is_remote_posting(candidate))
        .filter(|candidate| inside_radius(candidate, request.radius_miles, origin))
        .collect();

    debug!(kept = filtered.len(), "Candidates filtered");
    filtered
}

/// Every key must be satisfied by at least one of the candidate's values. A
/// key with no accepted values matches nothing.
fn matches_attributes(candidate: &Candidate, filters: &AttributeFilters) -> bool {
    filters.iter().all(|(key, accepted)| {
        candidate
            .attribute_values(key)
            .any(|value| accepted.contains(&value.trim().to_lowercase()))
    })
}

fn serves_state(candidate: &Candidate, code: &str) -> bool {
    candidate.normalized_location().state_code == Some(code)
        || candidate
            .service_states
            .iter()
            .any(|state| state_code(state) == Some(code))
}

fn is_recent_enough(candidate: &Candidate, request: &SearchRequest) -> bool {
    let Some(window) = request.posted_within else {
        return true;
    };
    candidate
        .published_at
        .is_some_and(|published| request.reference_time - published <= window.window())
}

fn is_remote_posting(candidate: &Candidate) -> bool {
    candidate.kind == CandidateKind::JobPosting && candidate.remote
}

fn inside_radius(candidate: &Candidate, radius: Option<f64>, origin: &ResolvedOrigin) -> bool {
    let (Some(radius), Some(origin)) = (radius, origin.coordinates) else {
        return true;
    };
    candidate
        .normalized_location()
        .coordinates
        .is_none_or(|point| within_radius(distance_miles(origin, point), radius))
}
