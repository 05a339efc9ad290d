/// Messages exchanged between the background worker, content scripts and
/// extension pages
use crate::channel::{ChannelId, ChannelInfo};
use crate::reaction::Reaction;
use crate::service::SettingsService;
use crate::settings::{ChannelStatus, PartialSettings, Settings};
use crate::storage::{SettingsChanges, SettingsStore};
use log::{error, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetSettings,
    SaveSettings {
        settings: PartialSettings,
    },
    AddChannel {
        channel: String,
        #[serde(rename = "type")]
        list: Reaction,
    },
    RemoveChannel {
        channel: ChannelId,
        #[serde(rename = "type")]
        list: Reaction,
    },
    CheckChannelStatus {
        channel: ChannelId,
    },
    GetCurrentChannel,
    /// Notification; never answered
    SettingsUpdated {
        changes: SettingsChanges,
    },
}

/// Success payloads, flattened next to `success`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Settings {
        settings: Settings,
    },
    #[serde(rename_all = "camelCase")]
    Lists {
        like_channels: Vec<ChannelId>,
        dislike_channels: Vec<ChannelId>,
    },
    Channels {
        channels: Vec<ChannelId>,
    },
    Status {
        status: ChannelStatus,
    },
    Channel {
        channel: Option<ChannelInfo>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: Option<Payload>,
}

impl Response {
    pub fn ok() -> Response {
        Response {
            success: true,
            error: None,
            payload: None,
        }
    }

    pub fn with(payload: Payload) -> Response {
        Response {
            success: true,
            error: None,
            payload: Some(payload),
        }
    }

    pub fn failure(message: impl Into<String>) -> Response {
        Response {
            success: false,
            error: Some(message.into()),
            payload: None,
        }
    }

    pub fn unknown_action() -> Response {
        Response::failure("Unknown action")
    }
}

/// Reply shape of `getCurrentChannel`, as read by the popup
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentChannelReply {
    #[serde(default)]
    pub channel: Option<ChannelInfo>,
}

/// Parse an incoming message; anything outside the closed set is `None`
pub fn parse_request(raw: serde_json::Value) -> Option<Request> {
    match serde_json::from_value(raw) {
        Ok(request) => Some(request),
        Err(e) => {
            warn!("Unknown action: {}", e);
            None
        }
    }
}

/// Answer a settings request on behalf of the background worker.
///
/// `getCurrentChannel` belongs to content scripts and notifications carry no
/// reply, so both come back as unknown here.
pub async fn route<S: SettingsStore>(service: &SettingsService<S>, request: Request) -> Response {
    let result = match request {
        Request::GetSettings => service
            .load()
            .await
            .map(|settings| Response::with(Payload::Settings { settings })),
        Request::SaveSettings { settings } => service.save(&settings).await.map(|_| Response::ok()),
        Request::AddChannel { channel, list } => service.add_channel(&channel, list).await.map(|settings| {
            Response::with(Payload::Lists {
                like_channels: settings.like_list,
                dislike_channels: settings.dislike_list,
            })
        }),
        Request::RemoveChannel { channel, list } => service
            .remove_channel(&channel, list)
            .await
            .map(|channels| Response::with(Payload::Channels { channels })),
        Request::CheckChannelStatus { channel } => service
            .status(&channel)
            .await
            .map(|status| Response::with(Payload::Status { status })),
        Request::GetCurrentChannel | Request::SettingsUpdated { .. } => return Response::unknown_action(),
    };

    result.unwrap_or_else(|e| {
        error!("Settings request failed: {}", e);
        Response::failure(e.to_string())
    })
}
