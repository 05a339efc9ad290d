/// Settings operations shared by the background router, the popup and the
/// options page
use crate::channel::ChannelId;
use crate::export::{ExportFile, ImportError, parse_import};
use crate::reaction::Reaction;
use crate::settings::{AddOutcome, ChannelStatus, PartialSettings, Settings};
use crate::storage::{SettingsStore, StoreError};
use chrono::{DateTime, Utc};
use log::info;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettingsError {
    #[error("Please enter a channel handle")]
    EmptyHandle,
    #[error("Channel already in {0} list")]
    AlreadyListed(Reaction),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("export failed: {0}")]
    Export(String),
}

pub struct SettingsService<S> {
    store: S,
}

impl<S: SettingsStore> SettingsService<S> {
    pub fn new(store: S) -> Self {
        SettingsService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current settings with defaults for missing keys
    pub async fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self.store.get().await?.with_defaults())
    }

    /// Write a patch. Patches carrying lists are merged with the stored
    /// record and cleaned first, so both lists are written together.
    pub async fn save(&self, patch: &PartialSettings) -> Result<(), SettingsError> {
        if !patch.has_lists() {
            return Ok(self.store.set(patch).await?);
        }

        let mut settings = self.load().await?;
        patch.apply_to(&mut settings);
        let cleaned = settings.cleaned();

        let merged = PartialSettings {
            likes_enabled: patch.likes_enabled,
            dislikes_enabled: patch.dislikes_enabled,
            ..PartialSettings::lists(&cleaned)
        };
        Ok(self.store.set(&merged).await?)
    }

    /// Add user input to a list; the input is normalized to `@handle`
    pub async fn add_channel(&self, raw: &str, list: Reaction) -> Result<Settings, SettingsError> {
        let channel = ChannelId::from_input(raw).ok_or(SettingsError::EmptyHandle)?;
        self.insert(channel, list).await
    }

    /// Add a resolved channel verbatim
    pub async fn insert(&self, channel: ChannelId, list: Reaction) -> Result<Settings, SettingsError> {
        let mut settings = self.load().await?;

        match settings.add_channel(channel, list) {
            AddOutcome::AlreadyListed => Err(SettingsError::AlreadyListed(list)),
            AddOutcome::Added => {
                self.store.set(&PartialSettings::lists(&settings)).await?;
                Ok(settings)
            }
        }
    }

    /// Remove an exact entry; returns the updated list
    pub async fn remove_channel(&self, channel: &ChannelId, list: Reaction) -> Result<Vec<ChannelId>, SettingsError> {
        let mut settings = self.load().await?;
        settings.remove_channel(channel, list);
        self.store.set(&PartialSettings::list(&settings, list)).await?;
        Ok(settings.list(list).to_vec())
    }

    pub async fn status(&self, channel: &ChannelId) -> Result<ChannelStatus, SettingsError> {
        Ok(self.load().await?.status(channel))
    }

    /// Remove the channel from `list` if present, otherwise add it there
    pub async fn toggle(&self, channel: &ChannelId, list: Reaction) -> Result<ChannelStatus, SettingsError> {
        let mut settings = self.load().await?;

        if settings.status(channel).contains(list) {
            settings.remove_channel(channel, list);
            self.store.set(&PartialSettings::list(&settings, list)).await?;
        } else {
            settings.add_channel(channel.clone(), list);
            self.store.set(&PartialSettings::lists(&settings)).await?;
        }

        Ok(settings.status(channel))
    }

    /// Write the full default record, replacing whatever is stored
    pub async fn install_defaults(&self) -> Result<Settings, SettingsError> {
        let settings = Settings::new();
        self.store.set(&PartialSettings::from(&settings)).await?;
        Ok(settings)
    }

    /// Back-fill missing keys after an update
    pub async fn migrate(&self) -> Result<Settings, SettingsError> {
        let settings = self.load().await?;
        self.store.set(&PartialSettings::from(&settings)).await?;
        Ok(settings)
    }

    /// Drop blank and duplicate entries. Returns whether anything was written.
    pub async fn cleanup(&self) -> Result<bool, SettingsError> {
        let settings = self.load().await?;
        let cleaned = settings.cleaned();

        if cleaned == settings {
            return Ok(false);
        }

        self.store.set(&PartialSettings::lists(&cleaned)).await?;
        info!("Storage cleaned up");
        Ok(true)
    }

    pub async fn export(&self, now: DateTime<Utc>) -> Result<String, SettingsError> {
        let settings = self.load().await?;
        ExportFile::new(settings, now)
            .to_json()
            .map_err(|e| SettingsError::Export(e.to_string()))
    }

    /// Replace all four fields from an export file; nothing is written on error
    pub async fn import(&self, text: &str) -> Result<Settings, SettingsError> {
        let settings = parse_import(text)?;
        self.store.set(&PartialSettings::from(&settings)).await?;
        Ok(settings)
    }
}
