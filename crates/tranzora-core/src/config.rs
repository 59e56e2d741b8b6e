use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Target-language code as the translation service expects it
/// (full lowercase names, e.g. "english", "japanese").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn default_target_lang() -> Lang {
    Lang::new(DEFAULT_TARGET_LANG)
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Translation endpoint configuration.
///
/// Points at the remote translation service; the service itself is opaque
/// (it does the text extraction and translation work).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Base URL of the translation service (e.g. "http://localhost:3000")
    pub api_base: String,
    pub api_key: Option<String>,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl TranslatorConfig {
    pub fn new(api_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key,
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

const fn default_retry_count() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3000".to_string(),
            api_key: None,
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// History store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// History database directory (defaults to the XDG data dir)
    pub path: Option<PathBuf>,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target language
    #[serde(default = "default_target_lang")]
    pub target_lang: Lang,

    /// Ask the service to return per-page layout structure
    #[serde(default = "default_true")]
    pub preserve_layout: bool,

    /// Translation endpoint configuration
    #[serde(default)]
    pub translator: TranslatorConfig,

    /// History store configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Delay between progress checkpoints in milliseconds.
    /// The checkpoints are UI feedback, not tied to real transfer progress.
    #[serde(default = "default_stage_delay_ms")]
    pub stage_delay_ms: u64,

    /// Delay after the final checkpoint in milliseconds
    #[serde(default = "default_complete_delay_ms")]
    pub complete_delay_ms: u64,
}

const fn default_true() -> bool {
    true
}

const fn default_stage_delay_ms() -> u64 {
    800
}

const fn default_complete_delay_ms() -> u64 {
    600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_lang: default_target_lang(),
            preserve_layout: true,
            translator: TranslatorConfig::default(),
            history: HistoryConfig::default(),
            stage_delay_ms: default_stage_delay_ms(),
            complete_delay_ms: default_complete_delay_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}")))
    }

    /// Load from default locations (~/.config/tranzora/config.toml, ./tranzora.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("tranzora").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("tranzora.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./tranzora.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./tranzora.toml: {}", e);
                }
            }
        }

        // Return defaults
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}

/// A target-language option for UI dropdowns
#[derive(Debug, Clone)]
pub struct LanguageOption {
    /// Language code the service expects (e.g. "english")
    pub code: &'static str,
    /// Display name (e.g. "English")
    pub name: &'static str,
    /// Flag emoji
    pub flag: &'static str,
}

/// Languages available as translation target.
///
/// Adding a language means adding a tuple here; no other code path depends
/// on the size of this set.
pub fn target_languages() -> Vec<LanguageOption> {
    vec![
        LanguageOption { code: "english", name: "English", flag: "🇺🇸" },
        LanguageOption { code: "spanish", name: "Spanish", flag: "🇪🇸" },
        LanguageOption { code: "french", name: "French", flag: "🇫🇷" },
        LanguageOption { code: "german", name: "German", flag: "🇩🇪" },
        LanguageOption { code: "italian", name: "Italian", flag: "🇮🇹" },
        LanguageOption { code: "portuguese", name: "Portuguese", flag: "🇵🇹" },
        LanguageOption { code: "russian", name: "Russian", flag: "🇷🇺" },
        LanguageOption { code: "japanese", name: "Japanese", flag: "🇯🇵" },
        LanguageOption { code: "chinese", name: "Chinese", flag: "🇨🇳" },
        LanguageOption { code: "korean", name: "Korean", flag: "🇰🇷" },
        LanguageOption { code: "hindi", name: "Hindi", flag: "🇮🇳" },
        LanguageOption { code: "arabic", name: "Arabic", flag: "🇸🇦" },
    ]
}

/// Default target language code
pub const DEFAULT_TARGET_LANG: &str = "english";

/// Whether a language code is in the supported target set.
pub fn is_supported_language(code: &str) -> bool {
    target_languages().iter().any(|l| l.code == code)
}

/// Get the display name for a language code.
///
/// Returns "Unknown" for codes outside the supported set.
pub fn language_name(code: &str) -> &'static str {
    target_languages()
        .iter()
        .find(|l| l.code == code)
        .map_or("Unknown", |l| l.name)
}

/// Get flag emoji for a language code.
///
/// Returns a globe emoji for unknown language codes.
pub fn flag_for_lang(code: &str) -> &'static str {
    target_languages()
        .iter()
        .find(|l| l.code == code)
        .map_or("🌐", |l| l.flag)
}
