use serde::{Deserialize, Serialize};

/// A message posted in a group, as delivered to the bot's callback URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub group_id: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub sender_type: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source_guid: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub system: bool,
}

impl Callback {
    /// A user message with only the fields responders read.
    pub fn user_message(
        group_id: impl Into<String>,
        sender_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let sender_id = sender_id.into();
        Self {
            text: text.into(),
            group_id: group_id.into(),
            user_id: sender_id.clone(),
            sender_id,
            sender_type: "user".to_owned(),
            ..Self::default()
        }
    }

    /// Messages the bot must never answer: its own posts, other bots, and system notices.
    pub fn is_from_bot(&self, bot_user_id: Option<&str>) -> bool {
        if self.system || self.sender_type.eq_ignore_ascii_case("bot") {
            return true;
        }
        if self.sender_type.eq_ignore_ascii_case("system") {
            return true;
        }
        bot_user_id.is_some_and(|bot| bot == self.sender_id || bot == self.user_id)
    }
}
