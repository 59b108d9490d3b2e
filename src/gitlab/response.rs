use crate::pull_request::PullRequest;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MergeRequestResponse {
    pub title: String,
    pub web_url: String,
    pub author: AuthorResponse,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorResponse {
    pub username: String,
}

impl From<MergeRequestResponse> for PullRequest {
    fn from(value: MergeRequestResponse) -> Self {
        PullRequest::new(
            value.title,
            value.web_url,
            value.author.username,
            value.created_at,
        )
    }
}
