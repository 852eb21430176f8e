use crate::protocol::{FieldKind, FieldRequirement, StepDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 입력 필드 하나의 현재 값이다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 체크박스 상태.
    Checked(bool),
    /// 텍스트 입력 값.
    Text(String),
}

impl FieldValue {
    /// 텍스트 값이면 문자열 슬라이스를 반환한다.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_str()),
            FieldValue::Checked(_) => None,
        }
    }

    /// 체크박스 값이면 체크 여부를 반환한다.
    pub fn as_checked(&self) -> Option<bool> {
        match self {
            FieldValue::Checked(checked) => Some(*checked),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Checked(value)
    }
}

/// 화면 입력 위젯들이 보유한 현재 값 모음이다.
#[derive(Debug, Clone, Default)]
pub struct FormInputs {
    values: HashMap<String, FieldValue>,
}

impl FormInputs {
    /// 빈 입력 모음을 생성한다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드 값을 설정한다.
    pub fn set(&mut self, field_id: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(field_id.into(), value.into());
    }

    /// 필드 값을 조회한다. 입력 위젯이 없으면 `None`이다.
    pub fn get(&self, field_id: &str) -> Option<&FieldValue> {
        self.values.get(field_id)
    }

    /// 텍스트 값을 조회한다. 없으면 빈 문자열이다.
    pub fn text(&self, field_id: &str) -> &str {
        self.get(field_id).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// 체크 여부를 조회한다. 없으면 `false`이다.
    pub fn checked(&self, field_id: &str) -> bool {
        self.get(field_id)
            .and_then(FieldValue::as_checked)
            .unwrap_or(false)
    }
}

/// 필드 하나의 검사 결과이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    /// 필드 ID.
    pub id: String,
    /// 유효 여부. 화면에서 valid/invalid 표시에 사용한다.
    pub valid: bool,
    /// 유효한 경우 저장할 정규화된 값.
    pub captured: Option<FieldValue>,
}

/// Step 전체 검사 결과이다.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepValidation {
    /// Step 순번.
    pub step: u8,
    /// 통과한 필드 수.
    pub valid_count: usize,
    /// 전체 필드 수.
    pub total_count: usize,
    /// 필드별 결과. 정의 순서를 따른다.
    pub checks: Vec<FieldCheck>,
}

impl StepValidation {
    /// 모든 필드가 통과했는지 확인한다. 필드가 없는 Step은 통과로 보지 않는다.
    pub fn is_valid(&self) -> bool {
        self.total_count > 0 && self.valid_count == self.total_count
    }

    /// 통과하지 못한 필드 ID 목록이다.
    pub fn invalid_fields(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter(|check| !check.valid)
            .map(|check| check.id.clone())
            .collect()
    }

    /// 특정 필드의 통과 여부를 조회한다.
    pub fn is_field_valid(&self, field_id: &str) -> Option<bool> {
        self.checks
            .iter()
            .find(|check| check.id == field_id)
            .map(|check| check.valid)
    }

    /// 진행 막대에 쓰는 0.0..=1.0 비율이다.
    pub fn ratio(&self) -> f32 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.valid_count as f32 / self.total_count as f32
    }

    /// `"2/3 fields completed"` 형식의 카운터 문구이다.
    pub fn counter_label(&self) -> String {
        format!("{}/{} fields completed", self.valid_count, self.total_count)
    }
}

/// 필드 하나의 유효성을 판정한다.
///
/// 입력 위젯이 없거나 종류가 맞지 않는 값은 오류가 아니라 `false`로 처리한다.
pub fn validate_field(requirement: &FieldRequirement, value: Option<&FieldValue>) -> bool {
    match (requirement.kind, value) {
        (kind, Some(FieldValue::Text(text))) if kind.is_text() => {
            text.trim().chars().count() >= requirement.min_length()
        }
        (FieldKind::Checkbox, Some(FieldValue::Checked(checked))) => *checked,
        _ => false,
    }
}

/// 저장용으로 값을 정규화한다. 텍스트는 앞뒤 공백을 제거한다.
fn normalize(value: &FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(text) => FieldValue::Text(text.trim().to_string()),
        FieldValue::Checked(checked) => FieldValue::Checked(*checked),
    }
}

/// Step의 모든 필드를 빠짐없이 검사한다.
pub fn evaluate_step(step: u8, definition: &StepDefinition, inputs: &FormInputs) -> StepValidation {
    let checks: Vec<FieldCheck> = definition
        .required_fields
        .iter()
        .map(|requirement| {
            let value = inputs.get(&requirement.id);
            let valid = validate_field(requirement, value);
            FieldCheck {
                id: requirement.id.clone(),
                valid,
                captured: if valid { value.map(normalize) } else { None },
            }
        })
        .collect();
    StepValidation {
        step,
        valid_count: checks.iter().filter(|check| check.valid).count(),
        total_count: checks.len(),
        checks,
    }
}
