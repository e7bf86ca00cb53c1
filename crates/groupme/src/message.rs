use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Each reply posted on its own task; arrival order is not guaranteed.
    Async,
    /// Replies posted one after another in list order.
    Ordered,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub picture_url: Option<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), picture_url: None }
    }

    pub fn picture(url: impl Into<String>) -> Self {
        Self { text: String::new(), picture_url: Some(url.into()) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub delivery: Delivery,
    pub replies: Vec<Reply>,
}

impl Response {
    pub fn single(reply: Reply) -> Self {
        Self { delivery: Delivery::Async, replies: vec![reply] }
    }

    pub fn ordered(replies: Vec<Reply>) -> Self {
        Self { delivery: Delivery::Ordered, replies }
    }
}

/// Body of `POST /bots/post`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub bot_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

impl OutboundMessage {
    pub fn new(bot_id: impl Into<String>, reply: Reply) -> Self {
        Self { bot_id: bot_id.into(), text: reply.text, picture_url: reply.picture_url }
    }
}

impl fmt::Debug for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundMessage")
            .field("bot_id", &"[REDACTED]")
            .field("text", &self.text)
            .field("picture_url", &self.picture_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{OutboundMessage, Reply};

    #[test]
    fn picture_posts_carry_empty_text() {
        let message = OutboundMessage::new("bot-1", Reply::picture("https://i.groupme.com/x"));

        assert_eq!(
            serde_json::to_value(&message).expect("serializes"),
            json!({"bot_id": "bot-1", "text": "", "picture_url": "https://i.groupme.com/x"})
        );
    }

    #[test]
    fn text_posts_skip_picture_url() {
        let message = OutboundMessage::new("bot-1", Reply::text("👍"));

        assert_eq!(
            serde_json::to_value(&message).expect("serializes"),
            json!({"bot_id": "bot-1", "text": "👍"})
        );
    }

    #[test]
    fn debug_hides_bot_id() {
        let message = OutboundMessage::new("secret-bot", Reply::text("hi"));
        assert!(!format!("{message:?}").contains("secret-bot"));
    }
}
