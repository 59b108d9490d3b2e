use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid filter options: {0}")]
    InvalidOptions(String),
    #[error("transport failure: {message}")]
    Transport {
        message: String,
        #[source]
        cause: Option<reqwest::Error>,
    },
    #[error("unexpected status code {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("failed to decode response")]
    Decode {
        #[source]
        cause: serde_json::Error,
    },
    #[error("request was rejected by the remote: {reason}")]
    RemoteRejected { reason: String },
    #[error("template error: {0}")]
    Template(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn cancelled() -> Self {
        Error::Transport {
            message: "request cancelled".to_owned(),
            cause: None,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(cause: reqwest::Error) -> Self {
        let message = if cause.is_timeout() {
            "request timed out".to_owned()
        } else {
            cause.to_string()
        };

        Error::Transport {
            message,
            cause: Some(cause),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(cause: serde_json::Error) -> Self {
        Error::Decode { cause }
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(err: handlebars::TemplateError) -> Self {
        Error::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(err: handlebars::RenderError) -> Self {
        Error::Template(err.to_string())
    }
}
