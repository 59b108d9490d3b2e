mod request;
mod response;

use self::{request::PostMessageRequest, response::PostMessageResponse};
use crate::{
    context::RunContext,
    error::{Error, Result},
    http::{Endpoint, Headers, HttpClient},
    report::Notifier,
};
use reqwest::header::CONTENT_TYPE;

pub struct SlackNotifier {
    http: HttpClient,
    endpoint: Endpoint,
}

impl SlackNotifier {
    pub fn new(base_url: &str, bearer: impl Into<String>) -> Result<Self> {
        Ok(SlackNotifier {
            http: HttpClient::new()?,
            endpoint: Endpoint::new(base_url, bearer)?,
        })
    }
}

impl Notifier for SlackNotifier {
    async fn notify(&self, ctx: &RunContext, channel: &str, content: &str) -> Result<()> {
        let body = serde_json::to_string(&PostMessageRequest::markdown(channel, content))?;
        let url = self.endpoint.url(&["api", "chat.postMessage"]);

        log::debug!("posting message to channel {}", channel);
        let request = self
            .http
            .post(url)
            .default_headers(self.endpoint.bearer())
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body);

        let response: PostMessageResponse = self.http.send(ctx, request).await?.collect()?;

        if !response.ok {
            return Err(Error::RemoteRejected {
                reason: response.error.unwrap_or_else(|| "unknown".to_owned()),
            });
        }

        Ok(())
    }
}
