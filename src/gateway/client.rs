//! Gemini REST API client
//!
//! Implements both gateway traits over the `generateContent` endpoint: the
//! chat model receives the turn history plus the system instruction, the TTS
//! model is called with an audio-only response modality and a fixed prebuilt
//! voice. One attempt per call; no retry.

use crate::config::AppConfig;
use crate::gateway::{prompts, ChatGateway, SpeechSynthesizer};
use crate::language::Language;
use crate::messages::{ImageAttachment, Message};
use crate::session::PatientInfo;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Client for the hosted chat and speech-synthesis endpoints
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    chat_model: String,
    tts_model: String,
    voice: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let config = AppConfig::default();
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            chat_model: config.chat_model,
            tts_model: config.tts_model,
            voice: config.voice,
            base_url: config.base_url,
        }
    }

    /// Build a client from resolved application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        Ok(Self {
            client: Client::new(),
            api_key,
            chat_model: config.chat_model.clone(),
            tts_model: config.tts_model.clone(),
            voice: config.voice.clone(),
            base_url: config.base_url.clone(),
        })
    }

    /// Override the chat model after construction
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Override the synthesis voice after construction
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    async fn send_request(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint(model))
            .json(body)
            .send()
            .await
            .map_err(|err| Error::Gateway(format!("Request failed: {}", err)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(Error::Gateway(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_message(&body_text)
            )));
        }

        response
            .json()
            .await
            .map_err(|err| Error::Gateway(format!("Failed to parse response: {}", err)))
    }
}

#[async_trait]
impl ChatGateway for GeminiClient {
    async fn converse(
        &self,
        history: &[Message],
        new_text: &str,
        language: Language,
        attachment: Option<&ImageAttachment>,
        patient: Option<&PatientInfo>,
    ) -> Result<String> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| Content {
                role: m.role.wire_name().to_string(),
                parts: vec![Part::Text {
                    text: m.text.clone(),
                }],
            })
            .collect();

        let mut parts = Vec::new();
        if let Some(image) = attachment {
            parts.push(Part::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                },
            });
        }
        parts.push(Part::Text {
            text: new_text.to_string(),
        });
        contents.push(Content {
            role: "user".to_string(),
            parts,
        });

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content {
                role: "system".to_string(),
                parts: vec![Part::Text {
                    text: prompts::system_instruction(language, patient),
                }],
            }),
            generation_config: None,
        };

        debug!("Sending chat turn with {} history messages", history.len());
        let response = self.send_request(&self.chat_model, &request).await?;
        extract_text(response)
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiClient {
    async fn synthesize(&self, text: &str) -> Option<Vec<u8>> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::Text {
                    text: text.to_string(),
                }],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                }),
            }),
        };

        let response = match self.send_request(&self.tts_model, &request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Speech synthesis request failed: {}", e);
                return None;
            }
        };

        match extract_audio(response) {
            Some(payload) => match BASE64_STANDARD.decode(payload) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!("Speech synthesis returned invalid audio payload: {}", e);
                    None
                }
            },
            None => {
                warn!("Speech synthesis returned no audio data");
                None
            }
        }
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Option<Vec<PartResponse>>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineDataResponse>,
}

#[derive(Deserialize)]
struct InlineDataResponse {
    data: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn first_parts(response: GenerateContentResponse) -> Option<Vec<PartResponse>> {
    response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.remove(0))
            }
        })
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
}

fn extract_text(response: GenerateContentResponse) -> Result<String> {
    first_parts(response)
        .and_then(|parts| parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| Error::Gateway("Backend returned no usable text".into()))
}

fn extract_audio(response: GenerateContentResponse) -> Option<String> {
    first_parts(response)
        .and_then(|parts| parts.into_iter().find_map(|part| part.inline_data))
        .and_then(|inline| inline.data)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status = wrapper.error.status.unwrap_or_default();
            let message = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status.is_empty() {
                message
            } else {
                format!("{}: {}", status, message)
            }
        })
        .unwrap_or_else(|_| body.to_string())
}
