pub mod response;

use crate::{
    context::{RunContext, DEFAULT_TIMEOUT},
    error::{Error, Result},
};
use reqwest::{header::USER_AGENT, Client, RequestBuilder, Url};
use response::{AsyncFrom, Response};
use std::ops::Deref;

const USER_AGENT_NAME: &str = "prdigest";

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| Error::config(format!("cannot build http client: {}", err)))?;

        Ok(HttpClient { client })
    }

    /// Sends the request, giving up as soon as the run is cancelled.
    pub async fn send(&self, ctx: &RunContext, request: RequestBuilder) -> Result<Response> {
        let request = request.timeout(ctx.request_timeout());

        tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(Error::cancelled()),
            response = async {
                let response = request.send().await?;
                Response::async_from(response).await
            } => response,
        }
    }
}

impl Deref for HttpClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

pub trait Headers {
    fn default_headers(self, bearer: &str) -> RequestBuilder;
}

impl Headers for RequestBuilder {
    fn default_headers(self, bearer: &str) -> RequestBuilder {
        self.bearer_auth(bearer).header(USER_AGENT, USER_AGENT_NAME)
    }
}

/// Base URL and bearer credential of a remote API.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: Url,
    bearer: String,
}

impl Endpoint {
    pub fn new(base_url: &str, bearer: impl Into<String>) -> Result<Self> {
        let bearer = bearer.into();
        if base_url.is_empty() {
            return Err(Error::config("base url must not be empty"));
        }
        if bearer.is_empty() {
            return Err(Error::config("bearer must not be empty"));
        }

        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base())
            .ok_or_else(|| Error::config(format!("{} is not a valid http(s) url", base_url)))?;

        Ok(Endpoint { base_url, bearer })
    }

    pub fn bearer(&self) -> &str {
        &self.bearer
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
