/// Settings export and import files
use crate::settings::{PartialSettings, Settings};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Literal schema version written into every export
pub const EXPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImportError {
    #[error("file is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Invalid settings file format")]
    MissingToggles,
    #[error("malformed settings: {0}")]
    Malformed(String),
}

/// On-disk shape of an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    #[serde(flatten)]
    pub settings: Settings,
    pub export_date: String,
    pub version: String,
}

impl ExportFile {
    pub fn new(settings: Settings, now: DateTime<Utc>) -> ExportFile {
        ExportFile {
            settings,
            export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: EXPORT_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Download name, e.g. `youtube-auto-like-dislike-settings-2024-05-01.json`
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("youtube-auto-like-dislike-settings-{}.json", now.format("%Y-%m-%d"))
}

/// Parse an export file back into settings.
///
/// Both toggle keys must be present. A `null` toggle means enabled; missing
/// or `null` lists are empty. Unknown keys (`exportDate`, `version`) are
/// ignored. The lists come back cleaned, so a file cannot break list
/// uniqueness or put a channel in both lists.
pub fn parse_import(text: &str) -> Result<Settings, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;

    let has_toggles = value
        .as_object()
        .map(|object| object.contains_key("enableLikes") && object.contains_key("enableDislikes"))
        .unwrap_or(false);
    if !has_toggles {
        return Err(ImportError::MissingToggles);
    }

    let partial: PartialSettings =
        serde_json::from_value(value).map_err(|e| ImportError::Malformed(e.to_string()))?;

    Ok(partial.with_defaults().cleaned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelId;
    use crate::reaction::Reaction;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 28, 10, 30, 0).unwrap()
    }

    fn sample_settings() -> Settings {
        let mut settings = Settings::new();
        settings.dislikes_enabled = false;
        settings.add_channel(ChannelId::new("@liked"), Reaction::Like);
        settings.add_channel(ChannelId::new("UC123"), Reaction::Like);
        settings.add_channel(ChannelId::new("@disliked"), Reaction::Dislike);
        settings
    }

    #[test]
    fn test_export_shape() {
        let json = ExportFile::new(sample_settings(), fixed_now()).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["enableLikes"], true);
        assert_eq!(value["enableDislikes"], false);
        assert_eq!(value["likeChannels"], serde_json::json!(["@liked", "UC123"]));
        assert_eq!(value["dislikeChannels"], serde_json::json!(["@disliked"]));
        assert_eq!(value["exportDate"], "2024-10-28T10:30:00.000Z");
        assert_eq!(value["version"], "1.0.0");
    }

    #[test]
    fn test_round_trip() {
        let settings = sample_settings();
        let json = ExportFile::new(settings.clone(), fixed_now()).to_json().unwrap();

        assert_eq!(parse_import(&json), Ok(settings));
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename(fixed_now()),
            "youtube-auto-like-dislike-settings-2024-10-28.json"
        );
    }

    #[test]
    fn test_import_requires_both_toggles() {
        assert_eq!(
            parse_import(r#"{"enableLikes": true, "likeChannels": []}"#),
            Err(ImportError::MissingToggles)
        );
        assert_eq!(parse_import(r#"{"likeChannels": ["@a"]}"#), Err(ImportError::MissingToggles));
        assert_eq!(parse_import("[1, 2]"), Err(ImportError::MissingToggles));
    }

    #[test]
    fn test_import_defaults() {
        let settings = parse_import(r#"{"enableLikes": null, "enableDislikes": false}"#).unwrap();

        assert!(settings.likes_enabled);
        assert!(!settings.dislikes_enabled);
        assert!(settings.like_list.is_empty());
        assert!(settings.dislike_list.is_empty());
    }

    #[test]
    fn test_import_cleans_lists() {
        let settings = parse_import(
            r#"{"enableLikes": true, "enableDislikes": true,
                "likeChannels": ["@a", "@a", " "], "dislikeChannels": ["@a"]}"#,
        )
        .unwrap();

        assert_eq!(settings.like_list, vec![ChannelId::new("@a")]);
        assert!(settings.dislike_list.is_empty());
    }

    #[test]
    fn test_import_invalid_json() {
        assert!(matches!(parse_import("{not json"), Err(ImportError::InvalidJson(_))));
    }

    #[test]
    fn test_import_wrong_types() {
        let result = parse_import(r#"{"enableLikes": true, "enableDislikes": true, "likeChannels": "@a"}"#);
        assert!(matches!(result, Err(ImportError::Malformed(_))));
    }
}
