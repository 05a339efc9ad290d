/// Bindings to the extension platform APIs, through the `chrome.js` bridge
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/chrome.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    pub async fn storageSyncGet(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    pub async fn storageSyncSet(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    pub async fn getActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    pub async fn queryTabs(url_pattern: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    pub async fn sendTabMessage(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    /// Handler receives `(request, sendResponse)` and returns whether it
    /// answers; the channel stays open only then
    pub fn onRuntimeMessage(handler: &js_sys::Function);

    pub fn createAlarm(name: &str, period_minutes: f64);

    pub fn openOptionsPage();

    pub fn manifestVersion() -> String;

    pub fn exportToFile(data: &str, filename: &str);
}

/// The parts of a `chrome.tabs.Tab` the extension reads
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TabRef {
    pub id: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
}

pub async fn active_tab() -> Result<Option<TabRef>, String> {
    let tab_js = getActiveTab()
        .await
        .map_err(|e| format!("Failed to query active tab: {:?}", e))?;

    if tab_js.is_null() || tab_js.is_undefined() {
        return Ok(None);
    }

    serde_wasm_bindgen::from_value(tab_js)
        .map(Some)
        .map_err(|e| format!("Failed to parse tab: {:?}", e))
}

pub async fn tabs_matching(url_pattern: &str) -> Result<Vec<TabRef>, String> {
    let tabs_js = queryTabs(url_pattern)
        .await
        .map_err(|e| format!("Failed to query tabs: {:?}", e))?;

    serde_wasm_bindgen::from_value(tabs_js).map_err(|e| format!("Failed to parse tabs: {:?}", e))
}

/// Serialize `value` into a plain JS object (not a `Map`)
pub fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}
