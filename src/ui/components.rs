/// Reusable UI components

use crate::channel::ChannelId;
use crate::reaction::Reaction;
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ChannelListProps {
    pub list: Reaction,
    pub channels: Vec<ChannelId>,
    pub on_remove: Callback<(ChannelId, Reaction)>,
}

#[function_component(ChannelList)]
pub fn channel_list(props: &ChannelListProps) -> Html {
    if props.channels.is_empty() {
        return html! {
            <div class="no-channels">{format!("No channels in {} list", props.list)}</div>
        };
    }

    html! {
        <div class="channel-list">
            {for props.channels.iter().map(|channel| {
                let list = props.list;
                let on_remove = props.on_remove.reform({
                    let channel = channel.clone();
                    move |_| (channel.clone(), list)
                });

                html! {
                    <div key={channel.to_string()} class="channel-item">
                        <span class="channel-name">{channel.to_string()}</span>
                        <Button onclick={on_remove} variant={ButtonVariant::Danger} size={ButtonSize::Small}>
                            {"Remove"}
                        </Button>
                    </div>
                }
            })}
        </div>
    }
}

/// Outcome of the last user action
#[derive(Clone, PartialEq, Debug)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Status {
        Status {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Status {
        Status {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusMessageProps {
    pub status: Option<Status>,
}

#[function_component(StatusMessage)]
pub fn status_message(props: &StatusMessageProps) -> Html {
    match &props.status {
        Some(status) => {
            let alert_type = match status.kind {
                StatusKind::Success => AlertType::Success,
                StatusKind::Error => AlertType::Danger,
            };
            html! {
                <div class="status-message">
                    <Alert r#type={alert_type} title={status.message.clone()} inline={true}>
                    </Alert>
                </div>
            }
        }
        None => html! {},
    }
}
