/// Content script: follows navigation on the video site and reacts to videos
/// from listed channels
use crate::channel::{CHANNEL_LINK_SELECTORS, resolve_channel};
use crate::chrome::{onRuntimeMessage, to_js};
use crate::dispatcher::{ActionDispatcher, Outcome, decide};
use crate::messages::{Payload, Request, Response, parse_request};
use crate::navigation::{PagePhase, PageTracker, is_video_page};
use crate::page::{BrowserDocument, PageDocument};
use crate::poll::{BrowserClock, Clock, PollConfig, PollTimeout, poll_until};
use crate::service::SettingsService;
use crate::storage::{ChromeSyncStore, SettingsStore, changes_to_patch};
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{MutationObserver, MutationObserverInit};

/// Wait for the player, title and owner link before resolving the channel
const VIDEO_READY: PollConfig = PollConfig {
    interval_ms: 500,
    timeout_ms: 30000,
};

/// Settle time after an in-page navigation before looking at the new page
const NAVIGATION_SETTLE_MS: u32 = 1000;

type SharedTracker = Rc<RefCell<PageTracker>>;

pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let url = window.location().href()?;
    let tracker: SharedTracker = Rc::new(RefCell::new(PageTracker::new(&url)));

    listen_for_messages(tracker.clone());
    observe_navigation(tracker.clone())?;

    spawn_local(handle_navigation(tracker, 0));
    Ok(())
}

fn current_href() -> Option<String> {
    web_sys::window()?.location().href().ok()
}

/// Single-page navigation never reloads the document, so watch the DOM and
/// compare the URL on every mutation batch
fn observe_navigation(tracker: SharedTracker) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;

    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(move |_records, _observer| {
        let Some(url) = current_href() else {
            return;
        };
        let navigation = tracker.borrow_mut().observe(&url);
        if let Some(navigation) = navigation {
            debug!("Navigation {} to {}", navigation, url);
            let tracker = tracker.clone();
            spawn_local(async move {
                BrowserClock.sleep(NAVIGATION_SETTLE_MS).await;
                handle_navigation(tracker, navigation).await;
            });
        }
    });

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&document, &options)?;

    // lives as long as the page
    callback.forget();
    Ok(())
}

async fn handle_navigation(tracker: SharedTracker, navigation: u64) {
    let Some(document) = BrowserDocument::current() else {
        return;
    };
    let service = SettingsService::new(ChromeSyncStore);

    if let Some(outcome) = process_navigation(&tracker, navigation, &document, &BrowserClock, &service).await {
        debug!("Navigation {} ended with {:?}", navigation, outcome);
    }
}

/// Resolve the channel of one navigation and react to it if listed.
///
/// Returns the outcome when a reaction sequence ran. A navigation that was
/// superseded before the channel is known is dropped; one that is superseded
/// while reacting runs to completion.
async fn process_navigation<D, C, S>(
    tracker: &RefCell<PageTracker>,
    navigation: u64,
    document: &D,
    clock: &C,
    service: &SettingsService<S>,
) -> Option<Outcome>
where
    D: PageDocument,
    C: Clock,
    S: SettingsStore,
{
    let url = {
        let tracker = tracker.borrow();
        if !tracker.is_current(navigation) {
            return None;
        }
        tracker.current().url.clone()
    };
    if !is_video_page(&url) {
        return None;
    }

    tracker.borrow_mut().set_phase(navigation, PagePhase::Resolving);
    if let Err(timeout) = wait_for_video_load(document, clock).await {
        warn!("Video page did not finish loading: {}", timeout);
        tracker.borrow_mut().set_phase(navigation, PagePhase::Idle);
        return None;
    }

    let channel = resolve_channel(document);
    if !tracker.borrow_mut().set_channel(navigation, channel.clone()) {
        debug!("Navigation {} superseded while resolving", navigation);
        return None;
    }
    let Some(channel) = channel else {
        tracker.borrow_mut().set_phase(navigation, PagePhase::Idle);
        return None;
    };

    if !tracker.borrow_mut().try_begin(navigation) {
        return None;
    }

    let outcome = match service.load().await {
        Ok(settings) => match decide(&settings, &channel.handle) {
            Some(reaction) => {
                info!("Attempting to {} video from {}", reaction, channel.handle);
                tracker
                    .borrow_mut()
                    .set_phase(navigation, PagePhase::Reacting(reaction));
                Some(ActionDispatcher::new(document, clock).perform(reaction).await)
            }
            None => {
                info!("No action needed for {}", channel.handle);
                None
            }
        },
        Err(e) => {
            error!("Error checking action: {}", e);
            None
        }
    };

    tracker.borrow_mut().finish(navigation);
    outcome
}

async fn wait_for_video_load<D: PageDocument, C: Clock>(document: &D, clock: &C) -> Result<(), PollTimeout> {
    poll_until(clock, VIDEO_READY, || {
        let ready = document.query("video").is_some()
            && document.query("#title h1").is_some()
            && document.first_match(&CHANNEL_LINK_SELECTORS[..3]).is_some();
        ready.then_some(())
    })
    .await
    .map(|_| ())
}

/// Reply for a message addressed to this page, if it takes one
fn reply_to(tracker: &RefCell<PageTracker>, request: Option<Request>) -> Option<Response> {
    match request {
        Some(Request::GetCurrentChannel) => Some(Response::with(Payload::Channel {
            channel: tracker.borrow().current_channel().cloned(),
        })),
        Some(Request::SettingsUpdated { changes }) => {
            info!("Settings updated: {:?}", changes_to_patch(&changes));
            None
        }
        _ => None,
    }
}

/// The handler tells the bridge whether it answered, so notifications do not
/// leave the sender waiting
fn listen_for_messages(tracker: SharedTracker) {
    let handler = Closure::<dyn FnMut(JsValue, js_sys::Function) -> bool>::new(
        move |request: JsValue, send_response: js_sys::Function| {
            let raw = serde_wasm_bindgen::from_value::<serde_json::Value>(request).unwrap_or_default();

            let Some(response) = reply_to(&tracker, parse_request(raw)) else {
                return false;
            };

            match to_js(&response) {
                Ok(reply) => {
                    if let Err(e) = send_response.call1(&JsValue::NULL, &reply) {
                        error!("Failed to reply: {:?}", e);
                    }
                    true
                }
                Err(e) => {
                    error!("Failed to serialize reply: {}", e);
                    false
                }
            }
        },
    );

    onRuntimeMessage(handler.as_ref().unchecked_ref());
    handler.forget();
}
