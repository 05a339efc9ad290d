/// Channel list operations: uniqueness and cleanup

use crate::channel::ChannelId;
use std::collections::HashSet;

/// Make a channel list unique (keep first occurrence)
pub fn dedupe_channels(channels: &[ChannelId]) -> Vec<ChannelId> {
    let mut seen = HashSet::new();
    channels
        .iter()
        .filter(|channel| seen.insert(*channel))
        .cloned()
        .collect()
}

/// Drop blank entries, then duplicates
pub fn clean_channel_list(channels: &[ChannelId]) -> Vec<ChannelId> {
    let non_blank: Vec<ChannelId> = channels
        .iter()
        .filter(|channel| !channel.is_blank())
        .cloned()
        .collect();

    dedupe_channels(&non_blank)
}
