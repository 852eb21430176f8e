use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 프로토콜이 가져야 하는 Step 개수이다.
pub const STEP_COUNT: usize = 4;

/// 바이너리에 포함된 기본 프로토콜 YAML이다.
const BUILTIN_PROTOCOL_YAML: &str = include_str!("../protocols/awakening.yaml");

static BUILTIN_PROTOCOL: Lazy<Protocol> = Lazy::new(|| {
    parse_protocol(BUILTIN_PROTOCOL_YAML).expect("내장 프로토콜 파싱 실패")
});

/// 입력 필드의 종류를 표현한다.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// 한 줄 입력.
    ShortText,
    /// 여러 줄 입력.
    LongText,
    /// 체크박스.
    Checkbox,
}

impl FieldKind {
    /// 문자열 길이 조건이 적용되는 종류인지 확인한다.
    pub fn is_text(self) -> bool {
        matches!(self, FieldKind::ShortText | FieldKind::LongText)
    }
}

/// 하나의 입력 필드가 만족해야 하는 조건이다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRequirement {
    /// 프로토콜 전체에서 유일한 필드 ID.
    pub id: String,
    /// 필드 종류.
    pub kind: FieldKind,
    /// 공백 제거 후 필요한 최소 글자 수. 체크박스에는 지정할 수 없다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// 화면 표시용 이름.
    pub label: String,
}

impl FieldRequirement {
    /// 최소 글자 수를 반환한다. 지정되지 않았으면 0이다.
    pub fn min_length(&self) -> usize {
        self.min_length.unwrap_or(0)
    }
}

/// 한 Step의 정적 정의이다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    /// 화면 표시용 이름.
    pub name: String,
    /// Step 카드에 표시할 짧은 설명.
    #[serde(default)]
    pub summary: Option<String>,
    /// 순서가 있는 필수 필드 목록.
    pub required_fields: Vec<FieldRequirement>,
}

/// 순서가 고정된 Step 묶음 전체이다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Protocol {
    /// 화면 상단 제목.
    pub title: String,
    /// 1번부터 시작하는 Step 목록.
    pub steps: Vec<StepDefinition>,
}

impl Protocol {
    /// 바이너리에 포함된 기본 프로토콜을 반환한다.
    pub fn builtin() -> Protocol {
        BUILTIN_PROTOCOL.clone()
    }

    /// Step 개수를 반환한다.
    pub fn step_count(&self) -> u8 {
        self.steps.len() as u8
    }

    /// 1 기반 순번으로 Step 정의를 조회한다.
    pub fn step(&self, step: u8) -> Option<&StepDefinition> {
        if step == 0 {
            return None;
        }
        self.steps.get(usize::from(step) - 1)
    }

    /// 1 기반 순번과 Step 정의를 함께 순회한다.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &StepDefinition)> {
        self.steps
            .iter()
            .enumerate()
            .map(|(idx, def)| (idx as u8 + 1, def))
    }

    /// 필드 ID가 속한 Step 순번을 찾는다.
    pub fn owner_of(&self, field_id: &str) -> Option<u8> {
        self.iter()
            .find(|(_, def)| def.required_fields.iter().any(|f| f.id == field_id))
            .map(|(step, _)| step)
    }

    /// 구조적 제약을 검사한다.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.steps.len() != STEP_COUNT {
            return Err(ProtocolError::StepCount {
                expected: STEP_COUNT,
                actual: self.steps.len(),
            });
        }
        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.required_fields.is_empty() {
                return Err(ProtocolError::EmptyStep(step.name.clone()));
            }
            for field in &step.required_fields {
                if field.id.trim().is_empty() {
                    return Err(ProtocolError::EmptyFieldId(step.name.clone()));
                }
                if !seen.insert(field.id.as_str()) {
                    return Err(ProtocolError::DuplicateFieldId(field.id.clone()));
                }
                if !field.kind.is_text() && field.min_length.is_some() {
                    return Err(ProtocolError::LengthOnCheckbox(field.id.clone()));
                }
            }
        }
        Ok(())
    }
}

/// 프로토콜 정의를 읽는 중 발생할 수 있는 오류이다.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// YAML 구문 또는 스키마 오류이다.
    #[error("프로토콜 YAML을 해석할 수 없습니다: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Step 개수가 맞지 않는 경우이다.
    #[error("Step은 정확히 {expected}개여야 합니다 (현재 {actual}개).")]
    StepCount { expected: usize, actual: usize },
    /// 필수 필드가 없는 Step이다.
    #[error("필수 필드가 없는 Step입니다: {0}")]
    EmptyStep(String),
    /// 필드 ID가 비어 있는 경우이다.
    #[error("ID가 비어 있는 필드가 있습니다 (Step: {0}).")]
    EmptyFieldId(String),
    /// 필드 ID가 중복된 경우이다.
    #[error("중복된 필드 ID가 존재합니다: {0}")]
    DuplicateFieldId(String),
    /// 체크박스에 길이 조건이 지정된 경우이다.
    #[error("체크박스 필드에는 min_length를 지정할 수 없습니다: {0}")]
    LengthOnCheckbox(String),
}

/// YAML 문자열을 프로토콜로 변환하고 구조를 검사한다.
pub fn parse_protocol(text: &str) -> Result<Protocol, ProtocolError> {
    let protocol: Protocol = serde_yaml::from_str(text)?;
    protocol.validate()?;
    Ok(protocol)
}

/// 파일 경로에서 프로토콜을 읽는다.
pub fn load_protocol_from_file(path: &Path) -> anyhow::Result<Protocol> {
    let mut file =
        File::open(path).with_context(|| format!("프로토콜 파일 열기 실패: {}", path.display()))?;
    let mut buf = String::new();
    file.read_to_string(&mut buf)
        .with_context(|| format!("프로토콜 파일 읽기 실패: {}", path.display()))?;
    let protocol = parse_protocol(&buf)
        .with_context(|| format!("프로토콜 파일 검증 실패: {}", path.display()))?;
    Ok(protocol)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 내장 프로토콜이 네 개의 Step과 원래의 필드 구성을 가지는지 확인한다.
    #[test]
    fn builtin_protocol_has_four_steps() {
        let protocol = Protocol::builtin();
        assert_eq!(protocol.step_count(), 4);
        let first = protocol.step(1).expect("1번 Step 없음");
        assert_eq!(first.name, "Recognition");
        let mins: Vec<usize> = first.required_fields.iter().map(|f| f.min_length()).collect();
        assert_eq!(mins, vec![3, 1, 10]);
        let last = protocol.step(4).expect("4번 Step 없음");
        assert_eq!(last.required_fields.len(), 4);
        assert_eq!(
            last.required_fields.last().map(|f| (f.id.as_str(), f.kind)),
            Some(("step4-commitment", FieldKind::Checkbox))
        );
        assert!(protocol.step(0).is_none());
        assert!(protocol.step(5).is_none());
    }

    /// 필드 ID로 소속 Step을 찾을 수 있어야 한다.
    #[test]
    fn owner_lookup_resolves_step() {
        let protocol = Protocol::builtin();
        assert_eq!(protocol.owner_of("step3-q2"), Some(3));
        assert_eq!(protocol.owner_of("missing"), None);
    }

    /// Step 개수가 넷이 아니면 거부한다.
    #[test]
    fn rejects_wrong_step_count() {
        let yaml = r#"
title: short
steps:
  - name: Only
    required_fields:
      - { id: a, kind: short_text, min_length: 1, label: A }
"#;
        let err = parse_protocol(yaml).expect_err("Step 개수 검증 누락");
        assert!(matches!(
            err,
            ProtocolError::StepCount {
                expected: 4,
                actual: 1
            }
        ));
    }

    /// 중복된 필드 ID와 체크박스 길이 조건을 거부한다.
    #[test]
    fn rejects_duplicate_ids_and_checkbox_length() {
        let mut protocol = Protocol::builtin();
        protocol.steps[1].required_fields[0].id = "step1-q1".into();
        assert!(matches!(
            protocol.validate(),
            Err(ProtocolError::DuplicateFieldId(id)) if id == "step1-q1"
        ));

        let mut protocol = Protocol::builtin();
        protocol.steps[3].required_fields[3].min_length = Some(1);
        assert!(matches!(
            protocol.validate(),
            Err(ProtocolError::LengthOnCheckbox(id)) if id == "step4-commitment"
        ));
    }

    /// 알 수 없는 필드 종류는 YAML 오류로 보고된다.
    #[test]
    fn rejects_unknown_field_kind() {
        let yaml = r#"
title: bad
steps:
  - name: One
    required_fields:
      - { id: a, kind: slider, label: A }
"#;
        assert!(matches!(parse_protocol(yaml), Err(ProtocolError::Yaml(_))));
    }
}
