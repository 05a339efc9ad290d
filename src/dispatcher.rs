/// Deciding on a reaction and clicking the matching control
use crate::activation::is_active;
use crate::channel::ChannelId;
use crate::page::{PageDocument, PageElement};
use crate::poll::{Clock, poll_until};
use crate::reaction::{Reaction, ReactionProfile};
use crate::settings::Settings;
use log::{debug, error, info, warn};

/// Pick the reaction for a channel. Like wins if both lists hold the
/// channel, which only happens when storage was edited externally.
pub fn decide(settings: &Settings, channel: &ChannelId) -> Option<Reaction> {
    let like = settings.likes_enabled && settings.like_list.contains(channel);
    let dislike = settings.dislikes_enabled && settings.dislike_list.contains(channel);

    if like {
        Some(Reaction::Like)
    } else if dislike {
        Some(Reaction::Dislike)
    } else {
        None
    }
}

/// How one reaction sequence ended. Only used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clicked,
    AlreadyActive,
    NotFound,
    FallbackClicked,
    Failed,
}

/// Runs like/dislike sequences against a page
pub struct ActionDispatcher<'a, D, C> {
    document: &'a D,
    clock: &'a C,
}

impl<'a, D, C> ActionDispatcher<'a, D, C>
where
    D: PageDocument,
    C: Clock,
{
    pub fn new(document: &'a D, clock: &'a C) -> Self {
        ActionDispatcher { document, clock }
    }

    /// Find the control, skip it if already active, otherwise click it once.
    /// Never fails; every problem is logged and swallowed.
    pub async fn perform(&self, reaction: Reaction) -> Outcome {
        let profile = reaction.profile();
        let started = self.clock.now_ms();

        self.clock.sleep(profile.initial_delay_ms).await;

        let Some(control) = self.locate(profile).await else {
            return Outcome::NotFound;
        };
        debug!(
            "Found {} control after {}ms",
            reaction,
            self.clock.now_ms() - started
        );

        if is_active(&control, profile) {
            info!("{} control already active, skipping", reaction);
            return Outcome::AlreadyActive;
        }

        match control.click() {
            Ok(()) => {
                info!("Clicked {} control at {}ms", reaction, self.clock.now_ms() - started);
                self.clock.sleep(profile.verify_delay_ms).await;
                debug!(
                    "{} control active after click: {}",
                    reaction,
                    is_active(&control, profile)
                );
                Outcome::Clicked
            }
            Err(err) => {
                error!("Error clicking {} control: {}", reaction, err);
                self.fallback_click(profile)
            }
        }
    }

    async fn locate(&self, profile: &ReactionProfile) -> Option<D::Element> {
        if let Some((control, _)) = self.document.first_match(profile.probe_selectors) {
            return Some(control);
        }

        info!("{} control not found immediately, polling", profile.reaction);
        let document = self.document;
        match poll_until(self.clock, profile.poll, || document.first_match(profile.poll_selectors)).await {
            Ok(((control, selector), elapsed_ms)) => {
                debug!("{} control appeared after {}ms ({})", profile.reaction, elapsed_ms, selector);
                Some(control)
            }
            Err(timeout) => {
                warn!("{} control not found: {}", profile.reaction, timeout);
                None
            }
        }
    }

    /// One more lookup and click after the first click raised
    fn fallback_click(&self, profile: &ReactionProfile) -> Outcome {
        info!("Trying fallback {} click", profile.reaction);

        let Some((control, _)) = self.document.first_match(profile.probe_selectors) else {
            return Outcome::Failed;
        };
        if is_active(&control, profile) {
            return Outcome::Failed;
        }

        match control.click() {
            Ok(()) => {
                info!("Fallback {} click attempted", profile.reaction);
                Outcome::FallbackClicked
            }
            Err(err) => {
                error!("Fallback {} also failed: {}", profile.reaction, err);
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::fake::{FakeDocument, FakeElement};
    use crate::poll::testing::ManualClock;
    use crate::reaction::{DISLIKE_PROFILE, LIKE_PROFILE};
    use futures::executor::block_on;

    const LIKE_VIEW_MODEL_BUTTON: &str = "like-button-view-model > toggle-button-view-model > button-view-model > button";
    const DISLIKE_VIEW_MODEL_BUTTON: &str =
        "dislike-button-view-model > toggle-button-view-model > button-view-model > button";

    fn settings_with(likes: &[&str], dislikes: &[&str]) -> Settings {
        Settings {
            like_list: likes.iter().map(|c| ChannelId::new(*c)).collect(),
            dislike_list: dislikes.iter().map(|c| ChannelId::new(*c)).collect(),
            ..Settings::new()
        }
    }

    fn toggle_button() -> FakeElement {
        FakeElement::new("button").pressed_on_click()
    }

    #[test]
    fn test_decide_like() {
        let settings = settings_with(&["@a"], &[]);
        assert_eq!(decide(&settings, &ChannelId::new("@a")), Some(Reaction::Like));
        assert_eq!(decide(&settings, &ChannelId::new("@b")), None);
    }

    #[test]
    fn test_decide_like_has_priority() {
        let settings = settings_with(&["@a"], &["@a"]);
        assert_eq!(decide(&settings, &ChannelId::new("@a")), Some(Reaction::Like));
    }

    #[test]
    fn test_decide_respects_toggles() {
        let mut settings = settings_with(&["@a"], &["@b"]);
        settings.likes_enabled = false;
        assert_eq!(decide(&settings, &ChannelId::new("@a")), None);
        assert_eq!(decide(&settings, &ChannelId::new("@b")), Some(Reaction::Dislike));

        settings.dislikes_enabled = false;
        assert_eq!(decide(&settings, &ChannelId::new("@b")), None);
    }

    #[test]
    fn test_decide_disabled_like_falls_through_to_dislike() {
        let mut settings = settings_with(&["@a"], &["@a"]);
        settings.likes_enabled = false;
        assert_eq!(decide(&settings, &ChannelId::new("@a")), Some(Reaction::Dislike));
    }

    #[test]
    fn test_decide_numeric_id_never_matches_handle() {
        let settings = settings_with(&["@UC123"], &[]);
        assert_eq!(decide(&settings, &ChannelId::new("UC123")), None);
    }

    #[test]
    fn test_like_clicks_once() {
        let document = FakeDocument::new();
        let button = toggle_button();
        document.insert(LIKE_PROFILE.probe_selectors[0], button.clone());
        let clock = ManualClock::new();

        let outcome = block_on(ActionDispatcher::new(&document, &clock).perform(Reaction::Like));

        assert_eq!(outcome, Outcome::Clicked);
        assert_eq!(button.clicks(), 1);
        assert_eq!(clock.sleeps(), vec![1000, 500]);
    }

    #[test]
    fn test_like_twice_is_idempotent() {
        let document = FakeDocument::new();
        let button = toggle_button();
        document.insert(LIKE_VIEW_MODEL_BUTTON, button.clone());
        let clock = ManualClock::new();
        let dispatcher = ActionDispatcher::new(&document, &clock);

        let first = block_on(dispatcher.perform(Reaction::Like));
        let second = block_on(dispatcher.perform(Reaction::Like));

        assert_eq!(first, Outcome::Clicked);
        assert_eq!(second, Outcome::AlreadyActive);
        assert_eq!(button.clicks(), 1);
    }

    #[test]
    fn test_already_active_is_not_clicked() {
        let document = FakeDocument::new();
        let view_model = FakeElement::new("dislike-button-view-model").with_attribute("like-status", "DISLIKE");
        let button = FakeElement::new("button").with_parent(&view_model);
        document.insert(DISLIKE_VIEW_MODEL_BUTTON, button.clone());
        let clock = ManualClock::new();

        let outcome = block_on(ActionDispatcher::new(&document, &clock).perform(Reaction::Dislike));

        assert_eq!(outcome, Outcome::AlreadyActive);
        assert_eq!(button.clicks(), 0);
    }

    #[test]
    fn test_clicks_touch_feedback_fill() {
        let document = FakeDocument::new();
        let button = FakeElement::new("button");
        let fill = FakeElement::new("div").with_parent(&button);
        document.insert(LIKE_PROFILE.probe_selectors[0], fill.clone());
        let clock = ManualClock::new();

        let outcome = block_on(ActionDispatcher::new(&document, &clock).perform(Reaction::Like));

        assert_eq!(outcome, Outcome::Clicked);
        assert_eq!(fill.clicks(), 1);
    }

    #[test]
    fn test_legacy_selector_is_accepted() {
        let document = FakeDocument::new();
        let button = toggle_button();
        document.insert("ytd-toggle-button-renderer:last-child button", button.clone());
        let clock = ManualClock::new();

        let outcome = block_on(ActionDispatcher::new(&document, &clock).perform(Reaction::Dislike));

        assert_eq!(outcome, Outcome::Clicked);
        assert_eq!(button.clicks(), 1);
    }

    #[test]
    fn test_control_appears_while_polling() {
        let document = FakeDocument::new();
        let button = toggle_button();
        // hidden from the one-shot lookup and the first two poll rounds
        document.insert_after(LIKE_VIEW_MODEL_BUTTON, button.clone(), 3);
        let clock = ManualClock::new();

        let outcome = block_on(ActionDispatcher::new(&document, &clock).perform(Reaction::Like));

        assert_eq!(outcome, Outcome::Clicked);
        assert_eq!(button.clicks(), 1);
        assert_eq!(clock.sleeps(), vec![1000, 200, 200, 500]);
    }

    #[test]
    fn test_like_gives_up_after_timeout() {
        let document = FakeDocument::new();
        let clock = ManualClock::new();

        let outcome = block_on(ActionDispatcher::new(&document, &clock).perform(Reaction::Like));

        assert_eq!(outcome, Outcome::NotFound);
        assert_eq!(clock.elapsed(), f64::from(1000 + LIKE_PROFILE.poll.timeout_ms));
    }

    #[test]
    fn test_dislike_waits_longer_before_giving_up() {
        let document = FakeDocument::new();
        let clock = ManualClock::new();

        let outcome = block_on(ActionDispatcher::new(&document, &clock).perform(Reaction::Dislike));

        assert_eq!(outcome, Outcome::NotFound);
        assert_eq!(clock.elapsed(), f64::from(2000 + DISLIKE_PROFILE.poll.timeout_ms));
    }

    #[test]
    fn test_failed_click_retries_once() {
        let document = FakeDocument::new();
        let button = toggle_button().failing_clicks(1);
        document.insert(LIKE_VIEW_MODEL_BUTTON, button.clone());
        let clock = ManualClock::new();

        let outcome = block_on(ActionDispatcher::new(&document, &clock).perform(Reaction::Like));

        assert_eq!(outcome, Outcome::FallbackClicked);
        assert_eq!(button.clicks(), 1);
    }

    #[test]
    fn test_failed_fallback_is_swallowed() {
        let document = FakeDocument::new();
        let button = toggle_button().failing_clicks(5);
        document.insert(LIKE_VIEW_MODEL_BUTTON, button.clone());
        let clock = ManualClock::new();

        let outcome = block_on(ActionDispatcher::new(&document, &clock).perform(Reaction::Like));

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(button.clicks(), 0);
    }
}
