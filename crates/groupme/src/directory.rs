use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};

use memebot_core::config::GroupBotConfig;
use memebot_core::{DomainError, GroupId};

#[derive(Clone, Debug)]
pub struct BotEntry {
    bot_id: SecretString,
    bot_user_id: Option<String>,
}

impl BotEntry {
    pub fn bot_id(&self) -> &str {
        self.bot_id.expose_secret()
    }

    pub fn bot_user_id(&self) -> Option<&str> {
        self.bot_user_id.as_deref()
    }
}

/// Group → bot table. Built once at startup and never mutated.
#[derive(Clone, Debug, Default)]
pub struct BotDirectory {
    bots: HashMap<GroupId, BotEntry>,
}

impl BotDirectory {
    pub fn from_config(groups: &[GroupBotConfig]) -> Result<Self, DomainError> {
        let mut bots = HashMap::with_capacity(groups.len());
        for group in groups {
            let group_id = group.group_id.parse::<GroupId>()?;
            bots.insert(
                group_id,
                BotEntry { bot_id: group.bot_id.clone(), bot_user_id: group.bot_user_id.clone() },
            );
        }
        Ok(Self { bots })
    }

    pub fn bot(&self, group_id: GroupId) -> Option<&BotEntry> {
        self.bots.get(&group_id)
    }

    /// Looks up the raw `group_id` carried by a callback.
    pub fn resolve(&self, raw_group_id: &str) -> Option<(GroupId, &BotEntry)> {
        let group_id = raw_group_id.parse::<GroupId>().ok()?;
        self.bots.get(&group_id).map(|entry| (group_id, entry))
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }
}
