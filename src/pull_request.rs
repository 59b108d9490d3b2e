use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    pub title: String,
    pub url: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub username: String,
}

impl PullRequest {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        author: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        PullRequest {
            title: title.into(),
            url: url.into(),
            author: Author {
                username: author.into(),
            },
            created_at,
        }
    }
}

/// Orders pull requests oldest first. The sort is stable, so entries sharing a
/// timestamp keep their relative order.
pub fn sort_by_created_at(pull_requests: &mut [PullRequest]) {
    pull_requests.sort_by_key(|pr| pr.created_at);
}
