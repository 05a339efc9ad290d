/// Like/dislike reactions and the page profile each one is driven by
use crate::poll::PollConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    pub fn profile(self) -> &'static ReactionProfile {
        match self {
            Reaction::Like => &LIKE_PROFILE,
            Reaction::Dislike => &DISLIKE_PROFILE,
        }
    }

    pub fn opposite(self) -> Reaction {
        match self {
            Reaction::Like => Reaction::Dislike,
            Reaction::Dislike => Reaction::Like,
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reaction::Like => f.write_str("like"),
            Reaction::Dislike => f.write_str("dislike"),
        }
    }
}

/// Timings, selectors and activation markers for one reaction control
#[derive(Debug)]
pub struct ReactionProfile {
    pub reaction: Reaction,
    /// Wait before the first lookup
    pub initial_delay_ms: u32,
    /// Wait between clicking and re-reading the activation state
    pub verify_delay_ms: u32,
    /// Bounded poll used when the one-shot lookup finds nothing
    pub poll: PollConfig,
    /// One-shot lookup, current layout first, legacy layouts last
    pub probe_selectors: &'static [&'static str],
    /// Selectors retried while polling
    pub poll_selectors: &'static [&'static str],
    /// Custom element wrapping the toggle button
    pub view_model_tag: &'static str,
    /// `like-status` value of an activated view model
    pub active_status: &'static str,
    /// Path fragment of the filled icon, where one is known
    pub icon_path_fragment: Option<&'static str>,
}

pub static LIKE_PROFILE: ReactionProfile = ReactionProfile {
    reaction: Reaction::Like,
    initial_delay_ms: 1000,
    verify_delay_ms: 500,
    poll: PollConfig {
        interval_ms: 200,
        timeout_ms: 5000,
    },
    probe_selectors: &[
        "#top-level-buttons-computed > segmented-like-dislike-button-view-model > yt-smartimation > div > div > like-button-view-model > toggle-button-view-model > button-view-model > button > yt-touch-feedback-shape > div.yt-spec-touch-feedback-shape__fill",
        "#top-level-buttons-computed > segmented-like-dislike-button-view-model > yt-smartimation > div > div > like-button-view-model > toggle-button-view-model > button-view-model > button",
        "like-button-view-model > toggle-button-view-model > button-view-model > button > yt-touch-feedback-shape > div.yt-spec-touch-feedback-shape__fill",
        "like-button-view-model > toggle-button-view-model > button-view-model > button",
        "segmented-like-dislike-button-view-model like-button-view-model button",
        "#top-level-buttons-computed button[title*=\"like\"]:not([title*=\"dislike\"])",
        "#top-level-buttons button[aria-label*=\"like\"]:not([aria-label*=\"dislike\"])",
        ".ytd-toggle-button-renderer button[title*=\"like\"]:not([title*=\"dislike\"])",
        "#segmented-like-button button",
        "ytd-toggle-button-renderer:first-child button",
    ],
    poll_selectors: &[
        "#top-level-buttons-computed > segmented-like-dislike-button-view-model > yt-smartimation > div > div > like-button-view-model > toggle-button-view-model > button-view-model > button > yt-touch-feedback-shape > div.yt-spec-touch-feedback-shape__fill",
        "#top-level-buttons-computed > segmented-like-dislike-button-view-model > yt-smartimation > div > div > like-button-view-model > toggle-button-view-model > button-view-model > button",
        "like-button-view-model > toggle-button-view-model > button-view-model > button",
    ],
    view_model_tag: "like-button-view-model",
    active_status: "LIKE",
    icon_path_fragment: Some("8.59"),
};

// The dislike control renders with the secondary engagement buttons, later
// than the like control.
pub static DISLIKE_PROFILE: ReactionProfile = ReactionProfile {
    reaction: Reaction::Dislike,
    initial_delay_ms: 2000,
    verify_delay_ms: 500,
    poll: PollConfig {
        interval_ms: 200,
        timeout_ms: 10000,
    },
    probe_selectors: &[
        "#top-level-buttons-computed > segmented-like-dislike-button-view-model > yt-smartimation > div > div > dislike-button-view-model > toggle-button-view-model > button-view-model > button > yt-touch-feedback-shape > div.yt-spec-touch-feedback-shape__fill",
        "#top-level-buttons-computed > segmented-like-dislike-button-view-model > yt-smartimation > div > div > dislike-button-view-model > toggle-button-view-model > button-view-model > button",
        "dislike-button-view-model > toggle-button-view-model > button-view-model > button > yt-touch-feedback-shape > div.yt-spec-touch-feedback-shape__fill",
        "dislike-button-view-model > toggle-button-view-model > button-view-model > button",
        "segmented-like-dislike-button-view-model dislike-button-view-model button",
        "#top-level-buttons-computed button[title*=\"dislike\"]",
        "#top-level-buttons button[aria-label*=\"dislike\"]",
        ".ytd-toggle-button-renderer button[title*=\"dislike\"]",
        "#segmented-dislike-button button",
        "ytd-toggle-button-renderer:last-child button",
    ],
    poll_selectors: &[
        "#top-level-buttons-computed > segmented-like-dislike-button-view-model > yt-smartimation > div > div > dislike-button-view-model > toggle-button-view-model > button-view-model > button > yt-touch-feedback-shape > div.yt-spec-touch-feedback-shape__fill",
        "#top-level-buttons-computed > segmented-like-dislike-button-view-model > yt-smartimation > div > div > dislike-button-view-model > toggle-button-view-model > button-view-model > button",
        "dislike-button-view-model > toggle-button-view-model > button-view-model > button",
    ],
    view_model_tag: "dislike-button-view-model",
    active_status: "DISLIKE",
    icon_path_fragment: None,
};
