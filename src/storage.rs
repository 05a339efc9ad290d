/// Settings persistence over chrome.storage.sync

use crate::chrome::{storageSyncGet, storageSyncSet, to_js};
use crate::settings::{PartialSettings, SETTINGS_KEYS};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("storage request failed: {0}")]
    Request(String),
    #[error("malformed stored settings: {0}")]
    Decode(String),
}

/// Key-value settings store. Missing keys come back as `None`; callers
/// supply defaults. Writes are last-write-wins.
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    async fn get(&self) -> Result<PartialSettings, StoreError>;
    async fn set(&self, patch: &PartialSettings) -> Result<(), StoreError>;
}

/// The extension's synced storage area
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeSyncStore;

impl SettingsStore for ChromeSyncStore {
    async fn get(&self) -> Result<PartialSettings, StoreError> {
        let keys = to_js(&SETTINGS_KEYS).map_err(|e| StoreError::Request(e.to_string()))?;
        let stored = storageSyncGet(keys)
            .await
            .map_err(|e| StoreError::Request(format!("{:?}", e)))?;

        if stored.is_null() || stored.is_undefined() {
            return Ok(PartialSettings::default());
        }

        serde_wasm_bindgen::from_value(stored).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn set(&self, patch: &PartialSettings) -> Result<(), StoreError> {
        let items = to_js(patch).map_err(|e| StoreError::Request(e.to_string()))?;
        storageSyncSet(items)
            .await
            .map_err(|e| StoreError::Request(format!("{:?}", e)))
    }
}

/// One entry of a `chrome.storage.onChanged` notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// Changed keys with their old and new values
pub type SettingsChanges = BTreeMap<String, StorageChange>;

/// New values of the changed settings keys, as a patch
pub fn changes_to_patch(changes: &SettingsChanges) -> PartialSettings {
    let new_values: serde_json::Map<String, Value> = changes
        .iter()
        .filter(|(key, _)| SETTINGS_KEYS.contains(&key.as_str()))
        .filter_map(|(key, change)| change.new_value.clone().map(|value| (key.clone(), value)))
        .collect();

    serde_json::from_value(Value::Object(new_values)).unwrap_or_default()
}
