use super::validator::FieldValue;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Step 하나에서 수집한 필드 값 맵이다.
pub type StepValues = BTreeMap<String, FieldValue>;

/// Step 순번별 수집 값이다.
pub type CollectedValues = BTreeMap<u8, StepValues>;

/// Step의 진행 상태를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// 이전 Step이 끝나지 않아 접근할 수 없다.
    Locked,
    /// 진행 가능한 Step.
    Active,
    /// 완료된 Step.
    Completed,
}

impl StepStatus {
    /// 완료 개수로부터 Step 상태를 계산한다.
    ///
    /// 완료된 Step은 항상 1..=completed 구간이므로 상태는 완료 개수만으로 결정된다.
    pub fn derive(step: u8, completed_steps: u8) -> Self {
        if step <= completed_steps {
            StepStatus::Completed
        } else if step == completed_steps + 1 {
            StepStatus::Active
        } else {
            StepStatus::Locked
        }
    }
}

/// 완료 개수에서 파생되는 표시용 의식 수준이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsciousnessLevel {
    Low,
    Medium,
    High,
}

impl ConsciousnessLevel {
    /// 완료 개수로부터 수준을 계산한다.
    pub fn from_completed(completed_steps: u8) -> Self {
        match completed_steps {
            0..=1 => ConsciousnessLevel::Low,
            2..=3 => ConsciousnessLevel::Medium,
            _ => ConsciousnessLevel::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConsciousnessLevel::Low => "LOW",
            ConsciousnessLevel::Medium => "MEDIUM",
            ConsciousnessLevel::High => "HIGH",
        }
    }
}

/// 세션 동안 엔진이 단독으로 소유하는 상태이다.
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// 현재 열려 있는 Step. 0이면 없음.
    pub current_step_in_focus: u8,
    /// 완료된 Step 개수.
    pub completed_steps: u8,
    /// 마지막 검사에서 유효했던 값만 보관한다.
    pub collected_values: CollectedValues,
    /// Step별로 값 변경을 감시 중인 필드 ID.
    pub active_watchers: HashMap<u8, BTreeSet<String>>,
}

impl RuntimeState {
    /// 저장된 진행 정보로 상태를 복원한다.
    pub fn restored(completed_steps: u8, collected_values: CollectedValues) -> Self {
        Self {
            completed_steps,
            collected_values,
            ..Self::default()
        }
    }

    /// Step 상태를 조회한다.
    pub fn status_of(&self, step: u8) -> StepStatus {
        StepStatus::derive(step, self.completed_steps)
    }

    /// 특정 필드를 감시 중인지 확인한다.
    pub fn is_watching(&self, step: u8, field_id: &str) -> bool {
        self.active_watchers
            .get(&step)
            .is_some_and(|fields| fields.contains(field_id))
    }
}
