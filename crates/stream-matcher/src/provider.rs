//! Seams to the external search and stream services.
//!
//! Production code plugs in the HTTP clients; tests plug in scripted fakes.

use async_trait::async_trait;
use models::{Candidate, SearchKind, VariantListing};

use crate::error::{ResolutionError, SearchError};

#[async_trait]
pub trait CandidateSearch: Send + Sync {
    /// May return fewer than `limit` results, or none. "No results" is not
    /// an error.
    async fn search(
        &self,
        query: &str,
        limit: usize,
        kind: SearchKind,
    ) -> Result<Vec<Candidate>, SearchError>;
}

#[async_trait]
pub trait StreamResolver: Send + Sync {
    async fn get_variants(&self, identifier: &str) -> Result<VariantListing, ResolutionError>;
}
