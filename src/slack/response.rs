use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PostMessageResponse {
    #[serde(default)]
    pub ok: bool,
    pub error: Option<String>,
}
