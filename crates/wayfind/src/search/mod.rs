mod filter;
mod ranking;
mod relevance;
mod request;

pub use filter::filter_candidates;
pub use ranking::{
    RankedResult, ResultPage, ResultSection, SectionCounts, rank, rank_bulk, search_pool,
};
pub use relevance::RelevanceScorer;
pub use request::{AttributeFilters, OriginInput, PostedWithin, SearchRequest, SearchRequestBuilder};
