//! Locale selection for the diagnostic interface
//!
//! Every fixed user-visible string, the system-instruction variant, the
//! recognizer language tag, and the transcript word-boundary convention are
//! derived from the single [`Language`] value carried by the session.

use serde::{Deserialize, Serialize};

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    /// English
    En,
    /// Simplified Chinese
    Zh,
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl Language {
    /// BCP-47 tag used for speech recognition
    pub fn recognition_tag(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Zh => "zh-CN",
        }
    }

    /// Whether words are separated by spaces in this language
    pub fn uses_word_spacing(&self) -> bool {
        match self {
            Language::En => true,
            Language::Zh => false,
        }
    }

    /// Append a speech transcript to a text draft, inserting a separating
    /// space only where the language's word-boundary convention requires it.
    pub fn join_transcript(&self, draft: &str, transcript: &str) -> String {
        if draft.is_empty() || !self.uses_word_spacing() {
            format!("{}{}", draft, transcript)
        } else {
            format!("{} {}", draft, transcript)
        }
    }

    /// The assistant greeting seeded into a fresh conversation log
    pub fn greeting(&self) -> &'static str {
        match self {
            Language::En => {
                "Greetings. I am Dr. Constantine Petersen, your diagnostic unit. \
                 I am ready to analyze your symptoms. Please describe your condition \
                 or upload a visual scan."
            }
            Language::Zh => {
                "您好。我是康斯坦丁·皮特森医生，您的诊断单元。\
                 我已准备好分析您的症状。请描述您的状况或上传影像扫描。"
            }
        }
    }

    /// Fixed assistant message appended when the chat gateway fails
    pub fn gateway_error_text(&self) -> &'static str {
        match self {
            Language::En => {
                "Critical Error: Connection to medical database interrupted. Please try again."
            }
            Language::Zh => "严重错误：与医疗数据库的连接中断，请重试。",
        }
    }

    /// Cosmetic label shown in the log for a formal-document request
    pub fn document_request_label(&self) -> &'static str {
        match self {
            Language::En => "Requesting a formal diagnostic report...",
            Language::Zh => "正在请求正式诊断报告……",
        }
    }

    /// The literal directive sent to the backend for a formal-document request
    pub fn document_request_directive(&self) -> &'static str {
        match self {
            Language::En => {
                "Please generate a formal medical prescription document for this \
                 consultation, using Markdown headings, with sections for patient \
                 details, diagnosis, prescribed medication (dosage, frequency, \
                 duration), and advice."
            }
            Language::Zh => {
                "请为本次问诊生成一份正式的医疗处方文件，使用 Markdown 标题，\
                 包含患者详情、诊断结果、处方药物（剂量、频率、持续时间）以及建议。"
            }
        }
    }

    /// Header line naming a structured-data category
    pub fn data_header(&self, label: &str) -> String {
        match self {
            Language::En => format!("[{} Data]", label),
            Language::Zh => format!("【{}数据】", label),
        }
    }

    /// Fixed interface chrome strings for this locale
    pub fn ui(&self) -> &'static UiText {
        match self {
            Language::En => &EN_UI,
            Language::Zh => &ZH_UI,
        }
    }
}

/// Interface chrome strings: titles, hints, buttons, tooltips
pub struct UiText {
    pub subtitle: &'static str,
    pub missing_key_hint: &'static str,
    pub begin_consultation: &'static str,
    pub patient_profile_title: &'static str,
    pub patient_profile_hint: &'static str,
    pub field_name: &'static str,
    pub field_age: &'static str,
    pub field_gender: &'static str,
    pub field_phone: &'static str,
    pub continue_button: &'static str,
    pub end_consultation_tooltip: &'static str,
    pub switch_language_tooltip: &'static str,
    pub report_button: &'static str,
    pub report_tooltip: &'static str,
    pub attached_scan: &'static str,
    pub remove_attachment: &'static str,
    pub dictate_tooltip: &'static str,
    pub stop_listening_tooltip: &'static str,
    pub input_hint: &'static str,
    pub send_tooltip: &'static str,
    pub you_label: &'static str,
    pub doctor_name: &'static str,
    pub read_aloud_tooltip: &'static str,
    pub stop_playback_tooltip: &'static str,
    pub data_entry_hint: &'static str,
    pub submit_button: &'static str,
    pub cancel_button: &'static str,
    pub confirm_end_title: &'static str,
    pub confirm_end_body: &'static str,
    pub end_session_button: &'static str,
    pub keep_going_button: &'static str,
    pub capture_notice_title: &'static str,
    pub capture_notice_body: &'static str,
    pub ok_button: &'static str,
    pub error_title: &'static str,
    pub dismiss_button: &'static str,
}

static EN_UI: UiText = UiText {
    subtitle: "Diagnostic Interface",
    missing_key_hint: "No API key configured. Set GEMINI_API_KEY and restart.",
    begin_consultation: "Begin Consultation",
    patient_profile_title: "Patient Profile",
    patient_profile_hint: "Required before the consultation can begin",
    field_name: "Name",
    field_age: "Age",
    field_gender: "Gender",
    field_phone: "Phone",
    continue_button: "Continue",
    end_consultation_tooltip: "End consultation",
    switch_language_tooltip: "Switch language",
    report_button: "📋 Report",
    report_tooltip: "Request a formal diagnostic report",
    attached_scan: "Attached scan",
    remove_attachment: "Remove attachment",
    dictate_tooltip: "Dictate",
    stop_listening_tooltip: "Stop listening",
    input_hint: "Describe your condition...",
    send_tooltip: "Send (Enter)",
    you_label: "You",
    doctor_name: "Dr. Petersen",
    read_aloud_tooltip: "Read aloud",
    stop_playback_tooltip: "Stop playback",
    data_entry_hint: "Enter the measured values...",
    submit_button: "Submit",
    cancel_button: "Cancel",
    confirm_end_title: "End consultation?",
    confirm_end_body: "The conversation log and patient profile will be discarded.",
    end_session_button: "End session",
    keep_going_button: "Keep going",
    capture_notice_title: "Voice input unavailable",
    capture_notice_body: "Speech recognition is not supported on this device.",
    ok_button: "OK",
    error_title: "Error",
    dismiss_button: "Dismiss",
};

static ZH_UI: UiText = UiText {
    subtitle: "诊断界面",
    missing_key_hint: "未配置 API 密钥。请设置 GEMINI_API_KEY 后重启。",
    begin_consultation: "开始问诊",
    patient_profile_title: "患者信息",
    patient_profile_hint: "开始问诊前必须填写",
    field_name: "姓名",
    field_age: "年龄",
    field_gender: "性别",
    field_phone: "电话",
    continue_button: "继续",
    end_consultation_tooltip: "结束问诊",
    switch_language_tooltip: "切换语言",
    report_button: "📋 报告",
    report_tooltip: "请求正式诊断报告",
    attached_scan: "已附加扫描件",
    remove_attachment: "移除附件",
    dictate_tooltip: "语音输入",
    stop_listening_tooltip: "停止聆听",
    input_hint: "请描述您的状况……",
    send_tooltip: "发送（回车）",
    you_label: "您",
    doctor_name: "皮特森医生",
    read_aloud_tooltip: "朗读",
    stop_playback_tooltip: "停止播放",
    data_entry_hint: "请输入测量数值……",
    submit_button: "提交",
    cancel_button: "取消",
    confirm_end_title: "结束问诊？",
    confirm_end_body: "对话记录和患者信息将被清除。",
    end_session_button: "结束会话",
    keep_going_button: "继续问诊",
    capture_notice_title: "语音输入不可用",
    capture_notice_body: "此设备不支持语音识别。",
    ok_button: "确定",
    error_title: "错误",
    dismiss_button: "关闭",
};
