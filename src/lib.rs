/// YouTube Auto Like/Dislike - Chrome Extension
/// Built with Rust + WASM + Yew

mod activation;
mod background;
mod channel;
mod chrome;
mod content;
mod dispatcher;
mod export;
mod messages;
mod navigation;
mod operations;
mod page;
mod poll;
mod reaction;
mod service;
mod settings;
mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the channel resolver for JavaScript access
#[wasm_bindgen]
pub fn channel_id_from_href(href: &str) -> Option<String> {
    channel::channel_id_from_href(href).map(|id| id.to_string())
}

// Background worker events, forwarded by the worker script's listeners
#[wasm_bindgen]
pub fn background_installed(reason: String, previous_version: Option<String>) {
    background::on_installed(reason, previous_version);
}

#[wasm_bindgen]
pub fn background_startup() {
    background::on_startup();
}

#[wasm_bindgen]
pub fn background_alarm(name: String) {
    background::on_alarm(name);
}

#[wasm_bindgen]
pub fn background_storage_changed(changes: JsValue, area_name: String) {
    background::on_storage_changed(changes, area_name);
}

// Returns whether `send_response` will be called
#[wasm_bindgen]
pub fn background_message(request: JsValue, send_response: js_sys::Function) -> bool {
    background::on_message(request, send_response)
}

// Start the content script on a video site page
#[wasm_bindgen]
pub fn start_content_script() -> Result<(), JsValue> {
    content::start()
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}
