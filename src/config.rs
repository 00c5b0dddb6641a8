//! Application configuration
//!
//! Centralizes everything resolved at startup: the required API credential,
//! model identifiers, the synthesis voice, and interface defaults. The API
//! key is the only hard requirement; its absence blocks session start and is
//! surfaced by the start screen rather than treated as a fatal error.

use crate::language::Language;
use crate::{Error, Result};

/// Default chat-completion model
pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-pro-preview";

/// Default text-to-speech model
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default prebuilt synthesis voice
pub const DEFAULT_VOICE: &str = "Kore";

/// Base URL of the hosted model API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Configuration for the complete application
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// API key for the hosted AI service, if one could be resolved
    pub api_key: Option<String>,

    /// Chat-completion model identifier
    pub chat_model: String,

    /// Text-to-speech model identifier
    pub tts_model: String,

    /// Prebuilt voice profile for synthesis
    pub voice: String,

    /// Base URL of the model API
    pub base_url: String,

    /// Interface language
    pub language: Language,

    /// Whether a patient profile must be captured before the chat starts
    pub require_patient_form: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: Language::default(),
            require_patient_form: false,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    ///
    /// `GEMINI_API_KEY` is preferred, `API_KEY` accepted as a fallback.
    /// `MEDGRID_LANGUAGE` may be `en` or `zh`; `MEDGRID_PATIENT_FORM=1`
    /// enables the mandatory patient profile form.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let language = match std::env::var("MEDGRID_LANGUAGE").as_deref() {
            Ok("zh") => Language::Zh,
            _ => Language::En,
        };

        let require_patient_form = matches!(
            std::env::var("MEDGRID_PATIENT_FORM").as_deref(),
            Ok("1") | Ok("true")
        );

        Self {
            api_key,
            language,
            require_patient_form,
            ..Default::default()
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the interface language
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Require the patient profile form before session start
    pub fn with_patient_form(mut self) -> Self {
        self.require_patient_form = true;
        self
    }

    /// Whether a session can be started with this configuration
    pub fn can_start(&self) -> bool {
        self.api_key.is_some()
    }

    /// Get the API key, or a configuration error when none was resolved
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Config("No API key configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_models() {
        let config = AppConfig::default();
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.tts_model, DEFAULT_TTS_MODEL);
        assert_eq!(config.voice, "Kore");
    }

    #[test]
    fn test_missing_key_blocks_start() {
        let config = AppConfig::default();
        assert!(!config.can_start());
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_with_api_key() {
        let config = AppConfig::default().with_api_key("test-key");
        assert!(config.can_start());
        assert_eq!(config.require_api_key().unwrap(), "test-key");
    }

    #[test]
    fn test_builder_setters() {
        let config = AppConfig::default()
            .with_language(crate::language::Language::Zh)
            .with_patient_form();
        assert_eq!(config.language, crate::language::Language::Zh);
        assert!(config.require_patient_form);
    }
}
