pub mod filter;
mod response;

use self::{filter::MergeRequestFilter, response::MergeRequestResponse};
use crate::{
    context::RunContext,
    error::Result,
    http::{Endpoint, Headers, HttpClient},
    pull_request::PullRequest,
    report::PullRequestSource,
};

pub struct GitlabClient {
    http: HttpClient,
    endpoint: Endpoint,
}

impl GitlabClient {
    pub fn new(base_url: &str, bearer: impl Into<String>) -> Result<Self> {
        Ok(GitlabClient {
            http: HttpClient::new()?,
            endpoint: Endpoint::new(base_url, bearer)?,
        })
    }
}

impl PullRequestSource for GitlabClient {
    async fn list_pull_requests(
        &self,
        ctx: &RunContext,
        project_id: &str,
        filter: &MergeRequestFilter,
    ) -> Result<Vec<PullRequest>> {
        let query = filter.to_query()?;
        let url = self
            .endpoint
            .url(&["api", "v4", "projects", project_id, "merge_requests"]);

        log::debug!("listing merge requests for project {}", project_id);
        let request = self
            .http
            .get(url)
            .default_headers(self.endpoint.bearer())
            .query(&query);

        let merge_requests: Vec<MergeRequestResponse> =
            self.http.send(ctx, request).await?.collect()?;

        Ok(merge_requests.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        gitlab::filter::{Scope, Sort, State, TriState},
    };
    use chrono::{DateTime, Utc};
    use mockito::{Matcher, Server};

    const OK_RESPONSE: &str = r#"[
        {
            "id": 2,
            "iid": 14,
            "title": "Add upload",
            "web_url": "https://gitlab.com/group/repo/-/merge_requests/14",
            "author": { "id": 1, "username": "epels", "name": "Eli" },
            "created_at": "2019-03-06T14:00:56.380Z"
        },
        {
            "id": 1,
            "iid": 13,
            "title": "Strip trailing newlines from log statements.",
            "web_url": "https://gitlab.com/group/repo/-/merge_requests/13",
            "author": { "id": 1, "username": "epels", "name": "Eli" },
            "created_at": "2019-03-02T14:54:51.051Z"
        }
    ]"#;

    fn parse_time(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn should_reject_invalid_endpoint() {
        assert!(GitlabClient::new("https://example.com", "bearer").is_ok());
        assert!(matches!(
            GitlabClient::new("ftp://example.com", "bearer"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GitlabClient::new("https://example.com", ""),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn should_list_pull_requests() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/1234/merge_requests")
            .match_header("authorization", "Bearer super-secret")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("scope".into(), "all".into()),
                Matcher::UrlEncoded("state".into(), "opened".into()),
                Matcher::UrlEncoded("wip".into(), "no".into()),
                Matcher::UrlEncoded("approved_by_ids".into(), "None".into()),
                Matcher::UrlEncoded("assignee_id".into(), "None".into()),
                Matcher::UrlEncoded("reviewer_id".into(), "None".into()),
                Matcher::UrlEncoded("sort".into(), "desc".into()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(OK_RESPONSE)
            .expect(1)
            .create_async()
            .await;

        let client = GitlabClient::new(&server.url(), "super-secret").unwrap();
        let filter = MergeRequestFilter {
            scope: Some(Scope::All),
            state: Some(State::Opened),
            sort: Some(Sort::Desc),
            is_draft: TriState::False,
            has_assignee: TriState::False,
            has_been_approved: TriState::False,
            has_reviewer: TriState::False,
            per_page: None,
        };

        let prs = client
            .list_pull_requests(&RunContext::default(), "1234", &filter)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            prs,
            vec![
                PullRequest::new(
                    "Add upload",
                    "https://gitlab.com/group/repo/-/merge_requests/14",
                    "epels",
                    parse_time("2019-03-06T14:00:56.380Z"),
                ),
                PullRequest::new(
                    "Strip trailing newlines from log statements.",
                    "https://gitlab.com/group/repo/-/merge_requests/13",
                    "epels",
                    parse_time("2019-03-02T14:54:51.051Z"),
                ),
            ]
        );
    }

    #[tokio::test]
    async fn should_encode_namespaced_project_ids() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/group%2Frepo/merge_requests")
            .match_query(Matcher::Any)
            .with_body("[]")
            .create_async()
            .await;

        let client = GitlabClient::new(&server.url(), "super-secret").unwrap();
        let prs = client
            .list_pull_requests(
                &RunContext::default(),
                "group/repo",
                &MergeRequestFilter::default(),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(prs.is_empty());
    }

    #[tokio::test]
    async fn should_fail_with_transport_error_when_unreachable() {
        let client = GitlabClient::new("http://127.0.0.1:1", "super-secret").unwrap();

        let result = client
            .list_pull_requests(&RunContext::default(), "1234", &MergeRequestFilter::default())
            .await;

        assert!(matches!(result, Err(Error::Transport { cause: Some(_), .. })));
    }

    #[tokio::test]
    async fn should_fail_with_remote_error_on_internal_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/projects/1234/merge_requests")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = GitlabClient::new(&server.url(), "super-secret").unwrap();
        let result = client
            .list_pull_requests(&RunContext::default(), "1234", &MergeRequestFilter::default())
            .await;

        assert!(matches!(result, Err(Error::Remote { status: 500, .. })));
    }

    #[tokio::test]
    async fn should_fail_with_decode_error_on_unexpected_shape() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/projects/1234/merge_requests")
            .match_query(Matcher::Any)
            .with_body(r#"{"message": "not an array"}"#)
            .create_async()
            .await;

        let client = GitlabClient::new(&server.url(), "super-secret").unwrap();
        let result = client
            .list_pull_requests(&RunContext::default(), "1234", &MergeRequestFilter::default())
            .await;

        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[tokio::test]
    async fn should_not_call_remote_with_invalid_filter() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = GitlabClient::new(&server.url(), "super-secret").unwrap();
        let filter = MergeRequestFilter {
            per_page: Some(0),
            ..Default::default()
        };
        let result = client
            .list_pull_requests(&RunContext::default(), "1234", &filter)
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }
}
