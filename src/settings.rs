/// Settings record persisted in synced storage
use crate::channel::ChannelId;
use crate::operations::clean_channel_list;
use crate::reaction::Reaction;
use serde::{Deserialize, Serialize};

/// Storage keys, in the order they are requested
pub const SETTINGS_KEYS: [&str; 4] = ["enableLikes", "enableDislikes", "likeChannels", "dislikeChannels"];

/// The full settings record.
///
/// A channel appears in at most one of the two lists; every mutator below
/// keeps it that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "enableLikes")]
    pub likes_enabled: bool,
    #[serde(rename = "enableDislikes")]
    pub dislikes_enabled: bool,
    #[serde(rename = "likeChannels")]
    pub like_list: Vec<ChannelId>,
    #[serde(rename = "dislikeChannels")]
    pub dislike_list: Vec<ChannelId>,
}

/// Result of adding a channel to a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// Present in the requested list already; nothing changed
    AlreadyListed,
}

/// Membership of one channel in both lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatus {
    pub in_like_list: bool,
    pub in_dislike_list: bool,
}

impl ChannelStatus {
    pub fn contains(&self, list: Reaction) -> bool {
        match list {
            Reaction::Like => self.in_like_list,
            Reaction::Dislike => self.in_dislike_list,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Settings {
            likes_enabled: true,
            dislikes_enabled: true,
            like_list: Vec::new(),
            dislike_list: Vec::new(),
        }
    }

    pub fn list(&self, list: Reaction) -> &[ChannelId] {
        match list {
            Reaction::Like => &self.like_list,
            Reaction::Dislike => &self.dislike_list,
        }
    }

    fn list_mut(&mut self, list: Reaction) -> &mut Vec<ChannelId> {
        match list {
            Reaction::Like => &mut self.like_list,
            Reaction::Dislike => &mut self.dislike_list,
        }
    }

    /// Append to `list`, dropping the channel from the opposite list
    pub fn add_channel(&mut self, channel: ChannelId, list: Reaction) -> AddOutcome {
        if self.list(list).contains(&channel) {
            return AddOutcome::AlreadyListed;
        }

        self.list_mut(list.opposite()).retain(|c| *c != channel);
        self.list_mut(list).push(channel);
        AddOutcome::Added
    }

    pub fn remove_channel(&mut self, channel: &ChannelId, list: Reaction) -> bool {
        let channels = self.list_mut(list);
        let original_len = channels.len();
        channels.retain(|c| c != channel);
        channels.len() < original_len
    }

    pub fn status(&self, channel: &ChannelId) -> ChannelStatus {
        ChannelStatus {
            in_like_list: self.like_list.contains(channel),
            in_dislike_list: self.dislike_list.contains(channel),
        }
    }

    /// Copy with blank and duplicate entries removed from both lists.
    /// A channel found in both lists stays in the like list only.
    pub fn cleaned(&self) -> Settings {
        let like_list = clean_channel_list(&self.like_list);
        let dislike_list = clean_channel_list(&self.dislike_list)
            .into_iter()
            .filter(|channel| !like_list.contains(channel))
            .collect();

        Settings {
            like_list,
            dislike_list,
            ..self.clone()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Subset of the settings, as read from or written to storage.
///
/// Missing keys stay `None`; `with_defaults` fills them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSettings {
    #[serde(rename = "enableLikes", default, skip_serializing_if = "Option::is_none")]
    pub likes_enabled: Option<bool>,
    #[serde(rename = "enableDislikes", default, skip_serializing_if = "Option::is_none")]
    pub dislikes_enabled: Option<bool>,
    #[serde(rename = "likeChannels", default, skip_serializing_if = "Option::is_none")]
    pub like_list: Option<Vec<ChannelId>>,
    #[serde(rename = "dislikeChannels", default, skip_serializing_if = "Option::is_none")]
    pub dislike_list: Option<Vec<ChannelId>>,
}

impl PartialSettings {
    /// Both toggles only
    pub fn toggles(likes_enabled: bool, dislikes_enabled: bool) -> Self {
        PartialSettings {
            likes_enabled: Some(likes_enabled),
            dislikes_enabled: Some(dislikes_enabled),
            ..PartialSettings::default()
        }
    }

    /// Both channel lists only
    pub fn lists(settings: &Settings) -> Self {
        PartialSettings {
            like_list: Some(settings.like_list.clone()),
            dislike_list: Some(settings.dislike_list.clone()),
            ..PartialSettings::default()
        }
    }

    /// A single channel list
    pub fn list(settings: &Settings, list: Reaction) -> Self {
        let channels = Some(settings.list(list).to_vec());
        match list {
            Reaction::Like => PartialSettings {
                like_list: channels,
                ..PartialSettings::default()
            },
            Reaction::Dislike => PartialSettings {
                dislike_list: channels,
                ..PartialSettings::default()
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == PartialSettings::default()
    }

    pub fn has_lists(&self) -> bool {
        self.like_list.is_some() || self.dislike_list.is_some()
    }

    pub fn with_defaults(self) -> Settings {
        let defaults = Settings::new();
        Settings {
            likes_enabled: self.likes_enabled.unwrap_or(defaults.likes_enabled),
            dislikes_enabled: self.dislikes_enabled.unwrap_or(defaults.dislikes_enabled),
            like_list: self.like_list.unwrap_or(defaults.like_list),
            dislike_list: self.dislike_list.unwrap_or(defaults.dislike_list),
        }
    }

    /// Overlay the present fields onto `settings`
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(enabled) = self.likes_enabled {
            settings.likes_enabled = enabled;
        }
        if let Some(enabled) = self.dislikes_enabled {
            settings.dislikes_enabled = enabled;
        }
        if let Some(channels) = &self.like_list {
            settings.like_list = channels.clone();
        }
        if let Some(channels) = &self.dislike_list {
            settings.dislike_list = channels.clone();
        }
    }
}

impl From<&Settings> for PartialSettings {
    fn from(settings: &Settings) -> Self {
        PartialSettings {
            likes_enabled: Some(settings.likes_enabled),
            dislikes_enabled: Some(settings.dislikes_enabled),
            like_list: Some(settings.like_list.clone()),
            dislike_list: Some(settings.dislike_list.clone()),
        }
    }
}
