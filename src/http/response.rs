use crate::error::{Error, Result};
use serde::de::DeserializeOwned;

pub struct Response {
    pub status: u16,
    pub payload_str: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fails with a remote error on a non-success status, otherwise decodes
    /// the body as `T`.
    pub fn collect<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if !self.is_success() {
            return Err(Error::Remote {
                status: self.status,
                body: self.payload_str,
            });
        }

        let payload = serde_json::from_str::<T>(&self.payload_str)?;

        Ok(payload)
    }
}

pub trait AsyncFrom<T>: Sized {
    async fn async_from(value: T) -> Result<Self>;
}

impl AsyncFrom<reqwest::Response> for Response {
    async fn async_from(value: reqwest::Response) -> Result<Self> {
        let status = value.status().as_u16();
        let payload_str = value.text().await?;

        Ok(Response {
            status,
            payload_str,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        ok: bool,
    }

    fn response(status: u16, body: &str) -> Response {
        Response {
            status,
            payload_str: body.to_owned(),
        }
    }

    #[test]
    fn should_collect_json_payload() {
        let payload: Payload = response(200, r#"{"ok": true}"#).collect().unwrap();

        assert!(payload.ok);
    }

    #[test]
    fn should_fail_with_remote_error_on_bad_status() {
        let result = response(503, "unavailable").collect::<Payload>();

        match result {
            Err(Error::Remote { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "unavailable");
            }
            _ => panic!("expected a remote error"),
        }
    }

    #[test]
    fn should_fail_with_decode_error_on_bad_body() {
        let result = response(200, "<html>").collect::<Payload>();

        assert!(matches!(result, Err(Error::Decode { .. })));
    }
}
