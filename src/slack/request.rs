use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PostMessageRequest<'a> {
    pub channel: &'a str,
    pub blocks: Vec<Block<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Block<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: TextBlock<'a>,
}

#[derive(Debug, Serialize)]
pub struct TextBlock<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
}

impl<'a> PostMessageRequest<'a> {
    /// A message made of one markdown section holding `text` as is.
    pub fn markdown(channel: &'a str, text: &'a str) -> Self {
        PostMessageRequest {
            channel,
            blocks: vec![Block {
                kind: "section",
                text: TextBlock {
                    kind: "mrkdwn",
                    text,
                },
            }],
        }
    }
}
