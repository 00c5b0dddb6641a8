pub mod audio;
pub mod config;
pub mod gateway;
pub mod integration;
pub mod language;
pub mod messages;
pub mod session;
pub mod speech;
pub mod ui;

use language::Language;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone)]
pub enum Error {
    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Speech capture error: {0}")]
    Capture(String),

    #[error("Speech capture is not available on this platform")]
    CapabilityUnavailable,

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Check if this error is recoverable by simply retrying the action
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Network-facing calls may succeed on the next attempt
            Error::Gateway(_) => true,
            Error::Synthesis(_) => true,
            Error::Capture(_) => true,
            // The platform either has speech support or it doesn't
            Error::CapabilityUnavailable => false,
            Error::AudioDevice(_) => false,
            Error::AudioProcessing(_) => true,
            Error::Config(_) => false,
            Error::Channel(_) => false,
            Error::InvalidInput(_) => false,
        }
    }

    /// Get a user-friendly description in the interface language
    pub fn user_message(&self, language: Language) -> &'static str {
        let (en, zh) = match self {
            Error::Gateway(_) => (
                "Connection to the medical grid failed. Please try again.",
                "连接医疗网络失败，请重试。",
            ),
            Error::Synthesis(_) => (
                "Speech synthesis failed. The response is available as text.",
                "语音合成失败。回复仍可以文字形式查看。",
            ),
            Error::Capture(_) => (
                "Speech recognition failed. Please try again.",
                "语音识别失败，请重试。",
            ),
            Error::CapabilityUnavailable => (
                "Voice input is not supported on this device.",
                "此设备不支持语音输入。",
            ),
            Error::AudioDevice(_) => (
                "Audio device error. Please check your speakers.",
                "音频设备错误，请检查您的扬声器。",
            ),
            Error::AudioProcessing(_) => (
                "Audio processing failed. Please try again.",
                "音频处理失败，请重试。",
            ),
            Error::Config(_) => (
                "Configuration error. Please check the API key and settings.",
                "配置错误，请检查 API 密钥和设置。",
            ),
            Error::Channel(_) => (
                "Internal communication error. Please restart the application.",
                "内部通信错误，请重启应用程序。",
            ),
            Error::InvalidInput(_) => (
                "Invalid input. Please check the entered values.",
                "输入无效，请检查填写的内容。",
            ),
        };
        match language {
            Language::En => en,
            Language::Zh => zh,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_follows_language() {
        let err = Error::Gateway("timeout".into());
        assert_ne!(err.user_message(Language::En), err.user_message(Language::Zh));
        assert_eq!(
            Error::CapabilityUnavailable.user_message(Language::Zh),
            "此设备不支持语音输入。"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(Error::Gateway("x".into()).is_recoverable());
        assert!(!Error::CapabilityUnavailable.is_recoverable());
        assert!(!Error::Config("x".into()).is_recoverable());
    }
}
