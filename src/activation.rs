/// Activation state of a like/dislike control
use crate::page::PageElement;
use crate::reaction::ReactionProfile;
use log::debug;

/// Which marker showed the control as already active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationSignal {
    AriaPressed,
    DefaultActiveClass,
    ViewModelStatus,
    FilledIcon,
    ViewModelActivated,
}

/// Inspect the control for the first activation marker present.
///
/// The matched element may be the touch-feedback fill inside the button, so
/// the nearest enclosing `<button>` is inspected. No button means inactive.
pub fn activation_signal<E: PageElement>(element: &E, profile: &ReactionProfile) -> Option<ActivationSignal> {
    let button = if element.is_button() {
        element.clone()
    } else {
        match element.closest("button") {
            Some(button) => button,
            None => {
                debug!("No button element around the {} control", profile.reaction);
                return None;
            }
        }
    };

    if button.attribute("aria-pressed").as_deref() == Some("true") {
        return Some(ActivationSignal::AriaPressed);
    }

    if button.has_class("style-default-active") {
        return Some(ActivationSignal::DefaultActiveClass);
    }

    let view_model = button.closest(profile.view_model_tag);
    if let Some(view_model) = &view_model {
        if view_model.attribute("like-status").as_deref() == Some(profile.active_status) {
            return Some(ActivationSignal::ViewModelStatus);
        }
    }

    if let Some(fragment) = profile.icon_path_fragment {
        if button.query(&format!("svg path[d*=\"{}\"]", fragment)).is_some() {
            return Some(ActivationSignal::FilledIcon);
        }
    }

    view_model
        .filter(|vm| vm.has_class("activated") || vm.attribute("is-activated").as_deref() == Some("true"))
        .map(|_| ActivationSignal::ViewModelActivated)
}

pub fn is_active<E: PageElement>(element: &E, profile: &ReactionProfile) -> bool {
    match activation_signal(element, profile) {
        Some(signal) => {
            debug!("{} control already active ({:?})", profile.reaction, signal);
            true
        }
        None => false,
    }
}
