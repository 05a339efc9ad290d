/// Channel identifiers and the channel resolver for video pages
use crate::page::{PageDocument, PageElement};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Owner-link candidates, current layout first
pub const CHANNEL_LINK_SELECTORS: &[&str] = &[
    "#owner #channel-name a",
    "#upload-info #owner-text a",
    "ytd-channel-name a",
    "#channel-name a",
    ".ytd-video-owner-renderer a",
];

/// Canonical channel identifier, usually of the form `@handle`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Wrap a string verbatim
    pub fn new(id: impl Into<String>) -> ChannelId {
        ChannelId(id.into())
    }

    /// Normalize user input into a handle: trims, then prefixes `@` if missing.
    /// Returns None for blank input.
    pub fn from_input(raw: &str) -> Option<ChannelId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.starts_with('@') {
            Some(ChannelId(trimmed.to_string()))
        } else {
            Some(ChannelId(format!("@{}", trimmed)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The channel owning the video on the current page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub name: String,
    pub handle: ChannelId,
    pub url: String,
}

impl ChannelInfo {
    /// Display name, falling back to the handle when the link text is empty
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            self.handle.as_str()
        } else {
            &self.name
        }
    }
}

/// The historical address shapes a channel link can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressShape {
    Handle,
    NumericId,
    CustomUrl,
    Username,
}

impl AddressShape {
    /// Checked in this order; the first marker present wins
    const PRIORITY: [AddressShape; 4] = [
        AddressShape::Handle,
        AddressShape::NumericId,
        AddressShape::CustomUrl,
        AddressShape::Username,
    ];

    fn marker(self) -> &'static str {
        match self {
            AddressShape::Handle => "/@",
            AddressShape::NumericId => "/channel/",
            AddressShape::CustomUrl => "/c/",
            AddressShape::Username => "/user/",
        }
    }

    /// Numeric ids are not valid handles and pass through unprefixed
    fn prefixed(self) -> bool {
        !matches!(self, AddressShape::NumericId)
    }
}

/// Classify a channel address and turn it into a ChannelId
///
/// Examples:
/// - https://www.youtube.com/@handle/videos → @handle
/// - https://www.youtube.com/channel/UC123?x=1 → UC123
/// - https://www.youtube.com/c/Custom → @Custom
/// - https://www.youtube.com/user/name → @name
pub fn channel_id_from_href(href: &str) -> Option<ChannelId> {
    let shape = AddressShape::PRIORITY
        .into_iter()
        .find(|shape| href.contains(shape.marker()))?;

    let (_, rest) = href.split_once(shape.marker())?;
    let segment = rest.split(['?', '/']).next().unwrap_or_default();

    if shape.prefixed() {
        Some(ChannelId(format!("@{}", segment)))
    } else {
        Some(ChannelId(segment.to_string()))
    }
}

/// Find the owner link on the page and resolve the channel it points to
pub fn resolve_channel<D: PageDocument>(document: &D) -> Option<ChannelInfo> {
    let Some((link, selector)) = document.first_match(CHANNEL_LINK_SELECTORS) else {
        info!("Could not find channel element");
        return None;
    };
    debug!("Channel link matched selector {}", selector);

    let url = link.href().unwrap_or_default();
    let name = link.text().trim().to_string();

    match channel_id_from_href(&url) {
        Some(handle) => Some(ChannelInfo { name, handle, url }),
        None => {
            info!("Could not extract channel handle from {}", url);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::fake::{FakeDocument, FakeElement};

    #[test]
    fn test_from_input_prefixes_handle() {
        assert_eq!(ChannelId::from_input("foo"), Some(ChannelId::new("@foo")));
        assert_eq!(ChannelId::from_input("@foo"), Some(ChannelId::new("@foo")));
        assert_eq!(ChannelId::from_input("  bar  "), Some(ChannelId::new("@bar")));
    }

    #[test]
    fn test_from_input_blank() {
        assert_eq!(ChannelId::from_input(""), None);
        assert_eq!(ChannelId::from_input("   "), None);
    }

    #[test]
    fn test_no_case_folding() {
        assert_ne!(ChannelId::from_input("Foo"), ChannelId::from_input("foo"));
    }

    #[test]
    fn test_href_handle() {
        assert_eq!(
            channel_id_from_href("https://www.youtube.com/@handle/videos"),
            Some(ChannelId::new("@handle"))
        );
        assert_eq!(
            channel_id_from_href("https://www.youtube.com/@handle?si=abc"),
            Some(ChannelId::new("@handle"))
        );
    }

    #[test]
    fn test_href_numeric_id_is_not_prefixed() {
        assert_eq!(
            channel_id_from_href("https://site/channel/UC123?x=1"),
            Some(ChannelId::new("UC123"))
        );
    }

    #[test]
    fn test_href_custom_and_user() {
        assert_eq!(
            channel_id_from_href("https://www.youtube.com/c/SomeShow/featured"),
            Some(ChannelId::new("@SomeShow"))
        );
        assert_eq!(
            channel_id_from_href("https://www.youtube.com/user/oldname"),
            Some(ChannelId::new("@oldname"))
        );
    }

    #[test]
    fn test_href_priority_handle_wins() {
        // both markers present; the handle shape is checked first
        assert_eq!(
            channel_id_from_href("https://www.youtube.com/channel/UC1/@alias"),
            Some(ChannelId::new("@alias"))
        );
    }

    #[test]
    fn test_href_unknown_shape() {
        assert_eq!(channel_id_from_href("https://www.youtube.com/watch?v=abc"), None);
        assert_eq!(channel_id_from_href(""), None);
    }

    #[test]
    fn test_resolve_channel_first_selector_wins() {
        let document = FakeDocument::new();
        document.insert(
            "ytd-channel-name a",
            FakeElement::new("a")
                .with_href("https://www.youtube.com/@later")
                .with_text("Later"),
        );
        document.insert(
            "#owner #channel-name a",
            FakeElement::new("a")
                .with_href("https://www.youtube.com/@first/videos")
                .with_text("  First Channel \n"),
        );

        let info = resolve_channel(&document).unwrap();

        assert_eq!(info.handle, ChannelId::new("@first"));
        assert_eq!(info.name, "First Channel");
        assert_eq!(info.url, "https://www.youtube.com/@first/videos");
    }

    #[test]
    fn test_resolve_channel_missing() {
        let document = FakeDocument::new();
        assert_eq!(resolve_channel(&document), None);

        document.insert(
            "#channel-name a",
            FakeElement::new("a").with_href("https://www.youtube.com/feed/trending"),
        );
        assert_eq!(resolve_channel(&document), None);
    }

    #[test]
    fn test_label_falls_back_to_handle() {
        let info = ChannelInfo {
            name: String::new(),
            handle: ChannelId::new("@h"),
            url: String::new(),
        };
        assert_eq!(info.label(), "@h");
    }
}
