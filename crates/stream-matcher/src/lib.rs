pub mod config;
pub mod error;
pub mod fuzzy;
pub mod provider;
pub mod ranker;
pub mod resolver;
pub mod scorer;
pub mod selector;

pub use config::MatchConfig;
pub use error::{ResolutionError, SearchError};
pub use provider::{CandidateSearch, StreamResolver};
pub use selector::{build_query, StreamSelector};
