/// Per-navigation page state for the content script
use crate::channel::ChannelInfo;
use crate::reaction::Reaction;
use log::debug;
use url::Url;

/// Where the current navigation is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePhase {
    Idle,
    Resolving,
    Deciding,
    Reacting(Reaction),
}

/// State of one navigation. Replaced, never reused, when the URL changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    pub navigation: u64,
    pub url: String,
    pub channel: Option<ChannelInfo>,
    pub phase: PagePhase,
    processing: bool,
}

impl PageContext {
    fn new(navigation: u64, url: &str) -> PageContext {
        PageContext {
            navigation,
            url: url.to_string(),
            channel: None,
            phase: PagePhase::Idle,
            processing: false,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }
}

/// Owns the current PageContext and hands out navigation ids.
///
/// Every update names the navigation it belongs to; updates for a
/// navigation that has since been replaced are dropped.
#[derive(Debug)]
pub struct PageTracker {
    current: PageContext,
}

impl PageTracker {
    pub fn new(url: &str) -> PageTracker {
        PageTracker {
            current: PageContext::new(0, url),
        }
    }

    pub fn current(&self) -> &PageContext {
        &self.current
    }

    pub fn current_channel(&self) -> Option<&ChannelInfo> {
        self.current.channel.as_ref()
    }

    /// Start a new navigation if `url` differs from the current one
    pub fn observe(&mut self, url: &str) -> Option<u64> {
        if self.current.url == url {
            return None;
        }
        Some(self.restart(url))
    }

    /// Start a new navigation unconditionally
    pub fn restart(&mut self, url: &str) -> u64 {
        let navigation = self.current.navigation + 1;
        self.current = PageContext::new(navigation, url);
        navigation
    }

    pub fn is_current(&self, navigation: u64) -> bool {
        self.current.navigation == navigation
    }

    pub fn set_phase(&mut self, navigation: u64, phase: PagePhase) -> bool {
        if !self.is_current(navigation) {
            return false;
        }
        self.transition(phase);
        true
    }

    fn transition(&mut self, phase: PagePhase) {
        if self.current.phase != phase {
            debug!(
                "Navigation {}: {:?} -> {:?}",
                self.current.navigation, self.current.phase, phase
            );
            self.current.phase = phase;
        }
    }

    pub fn set_channel(&mut self, navigation: u64, channel: Option<ChannelInfo>) -> bool {
        if !self.is_current(navigation) {
            return false;
        }
        self.current.channel = channel;
        true
    }

    /// Claim the in-flight slot; false if stale or already claimed
    pub fn try_begin(&mut self, navigation: u64) -> bool {
        if !self.is_current(navigation) || self.current.processing {
            return false;
        }
        self.current.processing = true;
        self.transition(PagePhase::Deciding);
        true
    }

    pub fn finish(&mut self, navigation: u64) {
        if self.is_current(navigation) {
            self.current.processing = false;
            self.transition(PagePhase::Idle);
        }
    }
}

/// Watch pages: `/watch` with a `v=` query parameter
pub fn is_video_page(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.path() == "/watch" && parsed.query().is_some_and(|q| q.contains("v=")),
        Err(_) => false,
    }
}

/// Whether a tab URL belongs to the video site
pub fn is_video_site(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| host == "youtube.com" || host.ends_with(".youtube.com")))
        .unwrap_or(false)
}
