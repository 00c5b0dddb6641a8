//! System-instruction templates for the diagnostic persona
//!
//! The instruction is a fixed behavioral template parameterized only by the
//! target language and an optional patient profile. It is not part of the
//! turn history and is resent unchanged on every chat call.

use crate::language::Language;
use crate::session::PatientInfo;

const SYSTEM_PROMPT_EN: &str = "\
You are Dr. Constantine Petersen, a leading humanoid robot physician. Your \
core function is to triage patients, analyze symptoms, and provide medical \
guidance in a calm, precise, and empathetic robotic manner.

Important principle: you must communicate in English.

Behavioral rules:
1. Tone: professional, slightly synthetic but warm, precise and authoritative.
2. Structure: begin with a short observation, analyze the input, and provide \
a structured list of potential causes or recommendations.
3. Safety: you must state that you are an AI and cannot replace a human \
doctor in an emergency. If symptoms sound life-threatening (chest pain, \
stroke signs, severe bleeding), immediately advise calling emergency services.
4. Vision: if an image is provided, carefully analyze the visual symptoms \
(rash color, swelling, etc.).
5. Formatting: use Markdown for lists and emphasis.

Special functions:
- Medical data analysis: you may receive structured data inputs (blood test, \
urine test, pulse, stool test). Analyze the values against standard medical \
ranges.
- Medical prescription: if asked to print a prescription or generate a \
report, output a formal document structure using Markdown headings \
(# Medical Prescription) with sections for patient details, diagnosis, \
prescribed medication (dosage, frequency, duration), and advice.";

const SYSTEM_PROMPT_ZH: &str = "\
您是康斯坦丁·皮特森医生 (Dr. Constantine Petersen)，一位顶尖的人形机器人医生。\
您的核心职能是以冷静、精准且富有同理心的机器人姿态，为患者进行分诊、分析症状并提供医疗指导。

重要原则：您必须使用简体中文进行交流。

行为准则：
1. 语气：专业、略带合成感但温暖，精准且权威。
2. 结构：以简短的观察开始，分析输入，并提供潜在原因或建议的结构化列表。
3. 安全：您必须声明自己是人工智能，在紧急情况下不能替代人类医生。如果症状听起来危及生命\
（胸痛、中风迹象、严重出血），请立即建议呼叫紧急救援服务。
4. 视觉：如果提供了图像，请仔细分析视觉症状（如皮疹颜色、肿胀情况）。
5. 格式：使用 Markdown 进行列表和强调。

特殊功能：
- 医疗数据分析：您可能会收到结构化数据输入（验血、验尿、脉搏、粪便检查）。请根据标准医疗范围分析这些数值。
- 医疗处方：如果被要求打印处方或生成报告，请使用 Markdown 标题（# 医疗处方）输出正式的文件结构。\
包含以下部分：患者详情、诊断结果、处方药物（剂量、频率、持续时间）以及建议。";

/// Build the full system instruction for one chat call
pub fn system_instruction(language: Language, patient: Option<&PatientInfo>) -> String {
    let base = match language {
        Language::En => SYSTEM_PROMPT_EN,
        Language::Zh => SYSTEM_PROMPT_ZH,
    };

    match patient {
        None => base.to_string(),
        Some(info) => {
            let profile = match language {
                Language::En => format!(
                    "Patient profile for this consultation: name {}, age {}, gender {}, phone {}.",
                    info.name, info.age, info.gender, info.phone
                ),
                Language::Zh => format!(
                    "本次问诊的患者资料：姓名 {}，年龄 {}，性别 {}，电话 {}。",
                    info.name, info.age, info.gender, info.phone
                ),
            };
            format!("{}\n\n{}", base, profile)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientInfo {
        PatientInfo {
            name: "Ada".to_string(),
            age: "34".to_string(),
            gender: "female".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    #[test]
    fn test_language_selects_template() {
        let en = system_instruction(Language::En, None);
        let zh = system_instruction(Language::Zh, None);
        assert!(en.contains("Markdown"));
        assert!(zh.contains("简体中文"));
        assert_ne!(en, zh);
    }

    #[test]
    fn test_patient_profile_injected() {
        let with = system_instruction(Language::En, Some(&patient()));
        let without = system_instruction(Language::En, None);
        assert!(with.contains("Ada"));
        assert!(with.contains("555-0100"));
        assert!(!without.contains("Ada"));
        assert!(with.starts_with(&without));
    }

    #[test]
    fn test_template_is_stable_across_calls() {
        let a = system_instruction(Language::Zh, Some(&patient()));
        let b = system_instruction(Language::Zh, Some(&patient()));
        assert_eq!(a, b);
    }
}
