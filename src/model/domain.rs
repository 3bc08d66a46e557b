//! Domain state - business/data state separate from UI concerns

use super::submission::Submission;

/// Domain state containing all fetched data
#[derive(Default)]
pub struct DomainState {
    /// The user's own submissions, newest first as returned by the service
    pub submissions: Vec<Submission>,

    /// Submissions the user has favorited
    pub favorites: Vec<Submission>,

    /// Whether favorites have been fetched at least once this session
    pub favorites_fetched: bool,

    /// Whether submissions have been fetched at least once this session
    pub submissions_fetched: bool,
}

impl DomainState {
    pub fn new() -> Self {
        Self::default()
    }
}
