use chrono::{FixedOffset, Local};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use shared::prayer_times::Prayer;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const ENV_VAR_PREFIX: &str = "SALAH_ALARM__";
pub const SETTINGS_PATH_VAR: &str = "SALAH_ALARM_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "AlarmSettings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Figment(#[from] figment::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ringtone {
    #[default]
    Adhan,
    Bell,
    Chime,
    Gong,
    Soft,
}

impl Ringtone {
    pub fn description(self) -> &'static str {
        match self {
            Self::Adhan => "Traditional call to prayer",
            Self::Bell => "Classic bell sound",
            Self::Chime => "Gentle chime tone",
            Self::Gong => "Deep gong sound",
            Self::Soft => "Soft bell ring",
        }
    }
}

/// Per-prayer alarm switches. All off until the user turns them on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmToggles {
    pub fajr: bool,
    pub dhuhr: bool,
    pub asr: bool,
    pub maghrib: bool,
    pub isha: bool,
}

impl AlarmToggles {
    pub fn is_enabled(&self, prayer: Prayer) -> bool {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }
}

// `alarms` stays last so it serializes as a trailing TOML table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub mosque_id: Option<String>,
    #[serde(default)]
    pub ringtone: Ringtone,
    #[serde(default)]
    pub dark_mode: bool,
    /// Minutes east of UTC. Falls back to the system offset when unset.
    pub utc_offset_minutes: Option<i32>,
    #[serde(default)]
    pub alarms: AlarmToggles,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            mosque_id: None,
            ringtone: Ringtone::default(),
            dark_mode: false,
            utc_offset_minutes: None,
            alarms: AlarmToggles::default(),
        }
    }
}

impl ClientSettings {
    pub fn offset(&self) -> FixedOffset {
        if let Some(minutes) = self.utc_offset_minutes {
            if let Some(offset) = FixedOffset::east_opt(minutes * 60) {
                return offset;
            }
            warn!(
                name: "settings.offset.invalid",
                utc_offset_minutes = minutes,
                "ignoring out-of-range utc offset, using system offset"
            );
        }
        *Local::now().offset()
    }
}

/// TOML-backed settings file. Environment variables prefixed with
/// [`ENV_VAR_PREFIX`] override file values on load but are never saved.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `SALAH_ALARM_SETTINGS`, or `AlarmSettings.toml` in the working
    /// directory.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os(SETTINGS_PATH_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE), PathBuf::from),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ClientSettings, SettingsError> {
        Ok(Figment::from(Serialized::defaults(ClientSettings::default()))
            .merge(Toml::file(&self.path))
            .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
            .extract()?)
    }

    pub fn save(&self, settings: &ClientSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(settings)?)?;
        Ok(())
    }

    /// Writes the defaults on first run so there is a file to edit, then loads.
    pub fn load_or_init(&self) -> Result<ClientSettings, SettingsError> {
        if !self.path.exists() {
            self.save(&ClientSettings::default())?;
            info!(name: "settings.initialized", path = %self.path.display(), "wrote default settings");
        }
        self.load()
    }
}
