/// Background worker: settings requests, install/update lifecycle, change
/// broadcast and periodic cleanup.
///
/// The worker script registers the platform listeners synchronously and
/// forwards each event here once the module is loaded.
use crate::chrome::{createAlarm, manifestVersion, openOptionsPage, sendTabMessage, tabs_matching, to_js};
use crate::messages::{Request, Response, parse_request, route};
use crate::service::SettingsService;
use crate::storage::{ChromeSyncStore, SettingsChanges};
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub const CLEANUP_ALARM: &str = "cleanup";
const CLEANUP_PERIOD_MINUTES: f64 = 1440.0;
const VIDEO_SITE_TABS: &str = "*://www.youtube.com/*";

fn service() -> SettingsService<ChromeSyncStore> {
    SettingsService::new(ChromeSyncStore)
}

fn schedule_cleanup() {
    createAlarm(CLEANUP_ALARM, CLEANUP_PERIOD_MINUTES);
}

pub fn on_installed(reason: String, previous: Option<String>) {
    spawn_local(async move {
        match reason.as_str() {
            "install" => match service().install_defaults().await {
                Ok(_) => {
                    info!("Extension installed with default settings");
                    schedule_cleanup();
                    openOptionsPage();
                }
                Err(e) => error!("Failed to write default settings: {}", e),
            },
            "update" => {
                info!("Extension updated to version {}", manifestVersion());
                match service().migrate().await {
                    Ok(_) => info!(
                        "Settings migrated from version {}",
                        previous.as_deref().unwrap_or("unknown")
                    ),
                    Err(e) => error!("Failed to migrate settings: {}", e),
                }
            }
            other => debug!("Ignoring install event {}", other),
        }
    });
}

pub fn on_startup() {
    schedule_cleanup();
}

pub fn on_alarm(name: String) {
    if name != CLEANUP_ALARM {
        return;
    }
    spawn_local(async {
        if let Err(e) = service().cleanup().await {
            error!("Error during cleanup: {}", e);
        }
    });
}

/// Whether the worker answers this request. Notifications and
/// content-script queries are not ours; undecodable requests get
/// "Unknown action".
fn answers(request: Option<&Request>) -> bool {
    !matches!(
        request,
        Some(Request::SettingsUpdated { .. }) | Some(Request::GetCurrentChannel)
    )
}

/// Route a runtime message. Returns whether `send_response` will be called.
pub fn on_message(request: JsValue, send_response: js_sys::Function) -> bool {
    let raw = serde_wasm_bindgen::from_value::<serde_json::Value>(request).unwrap_or_default();
    let request = parse_request(raw);

    if !answers(request.as_ref()) {
        return false;
    }

    spawn_local(async move {
        let response = match request {
            Some(request) => route(&service(), request).await,
            None => Response::unknown_action(),
        };
        reply(&send_response, &response);
    });
    true
}

fn reply(send_response: &js_sys::Function, response: &Response) {
    match to_js(response) {
        Ok(value) => {
            if let Err(e) = send_response.call1(&JsValue::NULL, &value) {
                error!("Failed to send response: {:?}", e);
            }
        }
        Err(e) => error!("Failed to serialize response: {}", e),
    }
}

pub fn on_storage_changed(changes: JsValue, area: String) {
    if area != "sync" {
        return;
    }

    let changes: SettingsChanges = match serde_wasm_bindgen::from_value(changes) {
        Ok(changes) => changes,
        Err(e) => {
            error!("Unreadable storage change: {}", e);
            return;
        }
    };
    info!("Settings updated: {:?}", changes.keys().collect::<Vec<_>>());

    spawn_local(notify_video_tabs(changes));
}

/// Forward a change set to every open tab of the video site
async fn notify_video_tabs(changes: SettingsChanges) {
    let tabs = match tabs_matching(VIDEO_SITE_TABS).await {
        Ok(tabs) => tabs,
        Err(e) => {
            error!("Error notifying tabs: {}", e);
            return;
        }
    };

    let message = match to_js(&Request::SettingsUpdated { changes }) {
        Ok(message) => message,
        Err(e) => {
            error!("Failed to serialize notification: {}", e);
            return;
        }
    };

    for tab_id in tabs.iter().filter_map(|tab| tab.id) {
        // tabs without the content script reject; that is expected
        if sendTabMessage(tab_id, message.clone()).await.is_err() {
            debug!("Tab {} did not take the notification", tab_id);
        }
    }
}
