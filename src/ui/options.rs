/// Options page: toggles, channel lists, export and import

use crate::channel::ChannelId;
use crate::chrome::exportToFile;
use crate::export::export_filename;
use crate::reaction::Reaction;
use crate::service::SettingsService;
use crate::settings::{PartialSettings, Settings};
use crate::storage::ChromeSyncStore;
use crate::ui::components::{ChannelList, Status, StatusMessage};
use chrono::{DateTime, Utc};
use gloo_timers::future::TimeoutFuture;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

const STATUS_VISIBLE_MS: u32 = 3000;

fn service() -> SettingsService<ChromeSyncStore> {
    SettingsService::new(ChromeSyncStore)
}

#[derive(Clone, PartialEq)]
enum PageState {
    Loading,
    Ready,
    Error(String),
}

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let state = use_state(|| PageState::Loading);
    let settings = use_state(Settings::new);
    let like_input = use_state(String::new);
    let dislike_input = use_state(String::new);
    let status = use_state(|| None::<Status>);
    // bumps on every status so an older timer does not hide a newer message
    let status_generation = use_mut_ref(|| 0u32);
    let import_ref = use_node_ref();

    let show_status = {
        let status = status.clone();
        let status_generation = status_generation.clone();

        Callback::from(move |next: Status| {
            let generation = {
                let mut current = status_generation.borrow_mut();
                *current += 1;
                *current
            };
            status.set(Some(next));

            let status = status.clone();
            let status_generation = status_generation.clone();
            spawn_local(async move {
                TimeoutFuture::new(STATUS_VISIBLE_MS).await;
                if *status_generation.borrow() == generation {
                    status.set(None);
                }
            });
        })
    };

    // Load settings on mount
    {
        let state = state.clone();
        let settings = settings.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match service().load().await {
                    Ok(loaded) => {
                        settings.set(loaded);
                        state.set(PageState::Ready);
                    }
                    Err(e) => state.set(PageState::Error(format!("Failed to load: {}", e))),
                }
            });
            || ()
        });
    }

    let on_toggle = {
        let settings = settings.clone();
        let show_status = show_status.clone();

        move |reaction: Reaction| {
            let settings = settings.clone();
            let show_status = show_status.clone();

            Callback::from(move |e: Event| {
                let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                    return;
                };
                let mut updated = (*settings).clone();
                match reaction {
                    Reaction::Like => updated.likes_enabled = input.checked(),
                    Reaction::Dislike => updated.dislikes_enabled = input.checked(),
                }
                settings.set(updated.clone());

                let show_status = show_status.clone();
                spawn_local(async move {
                    let patch = PartialSettings::toggles(updated.likes_enabled, updated.dislikes_enabled);
                    match service().save(&patch).await {
                        Ok(_) => show_status.emit(Status::success("Settings saved successfully!")),
                        Err(e) => show_status.emit(Status::error(format!("Failed to save: {}", e))),
                    }
                });
            })
        }
    };

    let add_channel = {
        let settings = settings.clone();
        let like_input = like_input.clone();
        let dislike_input = dislike_input.clone();
        let show_status = show_status.clone();

        Callback::from(move |list: Reaction| {
            let input = match list {
                Reaction::Like => like_input.clone(),
                Reaction::Dislike => dislike_input.clone(),
            };
            let raw = (*input).clone();
            let settings = settings.clone();
            let show_status = show_status.clone();

            spawn_local(async move {
                match service().add_channel(&raw, list).await {
                    Ok(updated) => {
                        settings.set(updated);
                        input.set(String::new());
                        show_status.emit(Status::success(format!("Channel added to {} list", list)));
                    }
                    Err(e) => show_status.emit(Status::error(e.to_string())),
                }
            });
        })
    };

    let on_remove = {
        let settings = settings.clone();
        let show_status = show_status.clone();

        Callback::from(move |(channel, list): (ChannelId, Reaction)| {
            let settings = settings.clone();
            let show_status = show_status.clone();

            spawn_local(async move {
                match service().remove_channel(&channel, list).await {
                    Ok(_) => match service().load().await {
                        Ok(updated) => {
                            settings.set(updated);
                            show_status.emit(Status::success(format!("Channel removed from {} list", list)));
                        }
                        Err(e) => show_status.emit(Status::error(e.to_string())),
                    },
                    Err(e) => show_status.emit(Status::error(e.to_string())),
                }
            });
        })
    };

    let on_input = |handle: UseStateHandle<String>| {
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                handle.set(input.value());
            }
        })
    };

    let on_enter = |list: Reaction| {
        let add_channel = add_channel.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                add_channel.emit(list);
            }
        })
    };

    let on_export = {
        let show_status = show_status.clone();

        Callback::from(move |_| {
            let show_status = show_status.clone();
            spawn_local(async move {
                let Some(now) = DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64) else {
                    show_status.emit(Status::error("Export failed: invalid clock"));
                    return;
                };
                match service().export(now).await {
                    Ok(json) => {
                        exportToFile(&json, &export_filename(now));
                        show_status.emit(Status::success("Settings exported successfully!"));
                    }
                    Err(e) => show_status.emit(Status::error(format!("Export failed: {}", e))),
                }
            });
        })
    };

    let on_import_click = {
        let import_ref = import_ref.clone();
        Callback::from(move |_| {
            if let Some(input) = import_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_import_file = {
        let settings = settings.clone();
        let show_status = show_status.clone();

        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            // allow picking the same file again
            input.set_value("");

            let settings = settings.clone();
            let show_status = show_status.clone();
            spawn_local(async move {
                let text = match JsFuture::from(file.text()).await {
                    Ok(text) => text.as_string().unwrap_or_default(),
                    Err(e) => {
                        show_status.emit(Status::error(format!("Error importing settings: {:?}", e)));
                        return;
                    }
                };

                match service().import(&text).await {
                    Ok(imported) => {
                        settings.set(imported);
                        show_status.emit(Status::success("Settings imported successfully!"));
                    }
                    Err(e) => show_status.emit(Status::error(format!("Error importing settings: {}", e))),
                }
            });
        })
    };

    let add_like = add_channel.reform(|_: MouseEvent| Reaction::Like);
    let add_dislike = add_channel.reform(|_: MouseEvent| Reaction::Dislike);

    html! {
        <div class="container">
            <div class="header">
                <h1 class="main-title">{"YouTube Auto Like/Dislike Settings"}</h1>
            </div>

            {match &*state {
                PageState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading settings..."}</p>
                    </div>
                },
                PageState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                PageState::Ready => html! {}
            }}

            <StatusMessage status={(*status).clone()} />

            <section class="settings-section">
                <h2 class="section-title">{"General"}</h2>
                <label class="toggle">
                    <input
                        type="checkbox"
                        id="enable-likes"
                        checked={settings.likes_enabled}
                        onchange={on_toggle(Reaction::Like)}
                    />
                    {" Enable auto-like"}
                </label>
                <label class="toggle">
                    <input
                        type="checkbox"
                        id="enable-dislikes"
                        checked={settings.dislikes_enabled}
                        onchange={on_toggle(Reaction::Dislike)}
                    />
                    {" Enable auto-dislike"}
                </label>
            </section>

            <section class="settings-section">
                <h2 class="section-title">{"Auto-Like Channels"}</h2>
                <div class="add-channel">
                    <input
                        type="text"
                        placeholder="@channelhandle"
                        value={(*like_input).clone()}
                        oninput={on_input(like_input.clone())}
                        onkeypress={on_enter(Reaction::Like)}
                        class="channel-input"
                    />
                    <Button onclick={add_like}>{"Add"}</Button>
                </div>
                <ChannelList list={Reaction::Like} channels={settings.like_list.clone()} on_remove={on_remove.clone()} />
            </section>

            <section class="settings-section">
                <h2 class="section-title">{"Auto-Dislike Channels"}</h2>
                <div class="add-channel">
                    <input
                        type="text"
                        placeholder="@channelhandle"
                        value={(*dislike_input).clone()}
                        oninput={on_input(dislike_input.clone())}
                        onkeypress={on_enter(Reaction::Dislike)}
                        class="channel-input"
                    />
                    <Button onclick={add_dislike}>{"Add"}</Button>
                </div>
                <ChannelList list={Reaction::Dislike} channels={settings.dislike_list.clone()} on_remove={on_remove} />
            </section>

            <section class="settings-section">
                <h2 class="section-title">{"Backup"}</h2>
                <div class="flex-row-gap">
                    <Button onclick={on_export} variant={ButtonVariant::Secondary}>
                        {"📥 Export Settings"}
                    </Button>
                    <Button onclick={on_import_click} variant={ButtonVariant::Secondary}>
                        {"📤 Import Settings"}
                    </Button>
                    <input
                        type="file"
                        accept=".json,application/json"
                        class="hidden"
                        ref={import_ref}
                        onchange={on_import_file}
                    />
                </div>
            </section>
        </div>
    }
}
