/// Popup UI: the current tab's channel and quick list toggles

use crate::channel::ChannelInfo;
use crate::chrome::{active_tab, openOptionsPage, sendTabMessage, to_js};
use crate::messages::{CurrentChannelReply, Request};
use crate::navigation::is_video_site;
use crate::reaction::Reaction;
use crate::service::SettingsService;
use crate::settings::ChannelStatus;
use crate::storage::ChromeSyncStore;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
enum Detection {
    Loading,
    NotOnSite,
    Undetected,
    Found(ChannelInfo),
}

#[function_component(App)]
pub fn app() -> Html {
    let detection = use_state(|| Detection::Loading);
    let status = use_state(ChannelStatus::default);
    let error = use_state(|| None::<String>);

    // Ask the content script of the active tab for its channel
    {
        let detection = detection.clone();
        let status = status.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let found = detect_channel().await;
                if let Detection::Found(channel) = &found {
                    match SettingsService::new(ChromeSyncStore).status(&channel.handle).await {
                        Ok(current) => status.set(current),
                        Err(e) => log::error!("Failed to read channel status: {}", e),
                    }
                }
                detection.set(found);
            });
            || ()
        });
    }

    let on_toggle = {
        let detection = detection.clone();
        let status = status.clone();
        let error = error.clone();

        move |list: Reaction| {
            let detection = detection.clone();
            let status = status.clone();
            let error = error.clone();

            Callback::from(move |_| {
                let Detection::Found(channel) = (*detection).clone() else {
                    return;
                };
                let status = status.clone();
                let error = error.clone();

                spawn_local(async move {
                    match SettingsService::new(ChromeSyncStore).toggle(&channel.handle, list).await {
                        Ok(updated) => {
                            status.set(updated);
                            error.set(None);
                        }
                        Err(e) => error.set(Some(e.to_string())),
                    }
                });
            })
        }
    };

    let on_open_settings = Callback::from(|_| openOptionsPage());

    let channel_found = matches!(*detection, Detection::Found(_));
    let channel_label = match &*detection {
        Detection::Loading => "Detecting channel...".to_string(),
        Detection::NotOnSite => "Not on YouTube".to_string(),
        Detection::Undetected => "Unable to detect channel".to_string(),
        Detection::Found(channel) => channel.label().to_string(),
    };

    let like_label = if status.in_like_list {
        "👍 Remove from Auto-Like"
    } else {
        "👍 Add to Auto-Like"
    };
    let dislike_label = if status.in_dislike_list {
        "👎 Remove from Auto-Dislike"
    } else {
        "👎 Add to Auto-Dislike"
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"YouTube Auto Like/Dislike"}</h1>

            <div class="channel-info">
                if *detection == Detection::Loading {
                    <Spinner />
                }
                <p class="channel-name">{channel_label}</p>
            </div>

            if status.in_like_list {
                <div class="channel-status">{"✓ Channel in Auto-Like list"}</div>
            } else if status.in_dislike_list {
                <div class="channel-status in-dislike">{"✓ Channel in Auto-Dislike list"}</div>
            }

            if let Some(message) = (*error).clone() {
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {message}
                </Alert>
            }

            <div class="flex-column-gap">
                <Button onclick={on_toggle(Reaction::Like)} disabled={!channel_found} variant={ButtonVariant::Primary} block={true}>
                    {like_label}
                </Button>
                <Button onclick={on_toggle(Reaction::Dislike)} disabled={!channel_found} variant={ButtonVariant::Secondary} block={true}>
                    {dislike_label}
                </Button>
                <Button onclick={on_open_settings} variant={ButtonVariant::Link} block={true}>
                    {"⚙️ Settings"}
                </Button>
            </div>
        </div>
    }
}

// Helper functions

async fn detect_channel() -> Detection {
    let tab = match active_tab().await {
        Ok(Some(tab)) => tab,
        Ok(None) => return Detection::NotOnSite,
        Err(e) => {
            log::error!("{}", e);
            return Detection::NotOnSite;
        }
    };

    let on_site = tab.url.as_deref().is_some_and(is_video_site);
    let Some(tab_id) = tab.id.filter(|_| on_site) else {
        return Detection::NotOnSite;
    };

    match current_channel(tab_id).await {
        Ok(Some(channel)) => Detection::Found(channel),
        Ok(None) => Detection::Undetected,
        Err(e) => {
            log::warn!("{}", e);
            Detection::Undetected
        }
    }
}

async fn current_channel(tab_id: i32) -> Result<Option<ChannelInfo>, String> {
    let message = to_js(&Request::GetCurrentChannel).map_err(|e| format!("Failed to serialize: {:?}", e))?;

    let reply_js = sendTabMessage(tab_id, message)
        .await
        .map_err(|e| format!("Content script unavailable: {:?}", e))?;

    if reply_js.is_null() || reply_js.is_undefined() {
        return Ok(None);
    }

    let reply: CurrentChannelReply =
        serde_wasm_bindgen::from_value(reply_js).map_err(|e| format!("Failed to parse reply: {:?}", e))?;
    Ok(reply.channel)
}
