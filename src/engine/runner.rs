use super::events::{Effect, EffectTarget, EngineEvent, Notice, Notifier};
use super::persistence::ProgressStore;
use super::scheduler::{ScheduledAction, Scheduler};
use super::state::{ConsciousnessLevel, RuntimeState, StepStatus};
use super::validator::{FieldValue, FormInputs, StepValidation, evaluate_step};
use crate::protocol::Protocol;
use std::collections::{BTreeMap, BTreeSet};

/// Step 진입 후 다음 Step 잠금 해제 연출까지의 지연이다.
const UNLOCK_REVEAL_MS: u64 = 300;
/// 전체 완료 후 완료 모달까지의 지연이다.
const COMPLETION_ALERT_MS: u64 = 2_000;
/// 미완성 완료 시도 표시 유지 시간이다.
const INCOMPLETE_CUE_MS: u64 = 500;
/// 잠긴 Step 접근 표시 유지 시간이다.
const BLOCKED_CUE_MS: u64 = 2_000;
const NOTICE_MS: u64 = 4_000;
const ERROR_NOTICE_MS: u64 = 5_000;
const GLITCH_MS: u64 = 300;
const INTENSE_GLITCH_MS: u64 = 500;

/// `start_step` 호출 결과이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Step이 열렸다.
    Started,
    /// 이전 Step이 끝나지 않아 거부되었다.
    Locked,
    /// 존재하지 않는 Step 순번이다.
    UnknownStep,
}

/// `complete_step` 호출 결과이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteOutcome {
    /// Step이 완료되었다.
    Completed,
    /// 유효하지 않은 필드가 남아 있다.
    Incomplete { invalid_fields: Vec<String> },
    /// 아직 잠긴 Step이다.
    Locked,
    /// 이미 완료된 Step이다. 상태는 바뀌지 않는다.
    AlreadyCompleted,
    /// 존재하지 않는 Step 순번이다.
    UnknownStep,
}

/// 화면 표시에만 쓰이는 일시적인 Step 표시 상태이다.
#[derive(Debug, Default)]
struct Cues {
    incomplete: BTreeSet<u8>,
    blocked: BTreeSet<u8>,
    unlocking: BTreeSet<u8>,
}

/// 네 단계 각성 절차의 검증과 진행을 담당하는 엔진이다.
pub struct AwakeningEngine {
    protocol: Protocol,
    state: RuntimeState,
    inputs: FormInputs,
    validations: BTreeMap<u8, StepValidation>,
    cues: Cues,
    scheduler: Scheduler,
    store: ProgressStore,
    notifier: Option<Box<dyn Notifier>>,
    events: Vec<EngineEvent>,
    awakening_announced: bool,
}

impl AwakeningEngine {
    /// 저장된 진행 정보를 한 번 읽어 엔진을 구성한다.
    ///
    /// 복원된 값은 입력 칸에도 채워져 이어서 작성할 수 있다.
    pub fn new(
        protocol: Protocol,
        store: ProgressStore,
        notifier: Option<Box<dyn Notifier>>,
    ) -> Self {
        let record = store.load(protocol.step_count());
        let mut inputs = FormInputs::new();
        for values in record.step_data.values() {
            for (field_id, value) in values {
                inputs.set(field_id.clone(), value.clone());
            }
        }
        tracing::info!(
            completed_steps = record.completed_steps,
            "각성 시퀀스 검증 엔진 초기화"
        );
        let awakening_announced = record.completed_steps == protocol.step_count();
        Self {
            state: RuntimeState::restored(record.completed_steps, record.step_data),
            protocol,
            inputs,
            validations: BTreeMap::new(),
            cues: Cues::default(),
            scheduler: Scheduler::new(),
            store,
            notifier,
            events: Vec::new(),
            awakening_announced,
        }
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn step_status(&self, step: u8) -> StepStatus {
        self.state.status_of(step)
    }

    pub fn completed_steps(&self) -> u8 {
        self.state.completed_steps
    }

    /// 전체 진행률(0..=100)이다.
    pub fn progress_percent(&self) -> u8 {
        let total = u32::from(self.protocol.step_count().max(1));
        (u32::from(self.state.completed_steps) * 100 / total) as u8
    }

    pub fn consciousness_level(&self) -> ConsciousnessLevel {
        ConsciousnessLevel::from_completed(self.state.completed_steps)
    }

    /// 모든 Step이 완료되었는지 확인한다.
    pub fn is_awakened(&self) -> bool {
        self.state.completed_steps >= self.protocol.step_count()
    }

    /// 마지막으로 계산된 Step 검사 결과이다.
    pub fn last_validation(&self, step: u8) -> Option<&StepValidation> {
        self.validations.get(&step)
    }

    /// 완료 버튼 활성화 여부이다.
    pub fn is_complete_enabled(&self, step: u8) -> bool {
        self.step_status(step) == StepStatus::Active
            && self.last_validation(step).is_some_and(StepValidation::is_valid)
    }

    pub fn is_incomplete_attempt(&self, step: u8) -> bool {
        self.cues.incomplete.contains(&step)
    }

    pub fn is_blocked(&self, step: u8) -> bool {
        self.cues.blocked.contains(&step)
    }

    pub fn is_unlocking(&self, step: u8) -> bool {
        self.cues.unlocking.contains(&step)
    }

    /// 쌓인 엔진 이벤트를 모두 가져간다.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Step의 모든 필드를 검사하고 유효한 값을 수집한다.
    ///
    /// 같은 입력으로 반복 호출해도 결과와 수집 값이 바뀌지 않는다.
    pub fn validate_step(&mut self, step: u8) -> StepValidation {
        let Some(definition) = self.protocol.step(step) else {
            return StepValidation {
                step,
                ..StepValidation::default()
            };
        };
        let validation = evaluate_step(step, definition, &self.inputs);
        let collected = self.state.collected_values.entry(step).or_default();
        for check in &validation.checks {
            if let Some(value) = &check.captured {
                collected.insert(check.id.clone(), value.clone());
            }
        }
        self.validations.insert(step, validation.clone());
        validation
    }

    /// 입력 위젯 값 변경을 반영한다.
    ///
    /// 필드가 감시 중인 Step에 속하면 그 Step을 다시 검사해 결과를 반환한다.
    pub fn set_field(
        &mut self,
        field_id: &str,
        value: impl Into<FieldValue>,
    ) -> Option<StepValidation> {
        self.inputs.set(field_id, value);
        let step = self.protocol.owner_of(field_id)?;
        if !self.state.is_watching(step, field_id) {
            return None;
        }
        let validation = self.validate_step(step);
        self.events.push(EngineEvent::ValidationUpdated {
            step,
            valid_count: validation.valid_count,
            total_count: validation.total_count,
        });
        Some(validation)
    }

    /// Step을 연다. 이전 Step이 끝나지 않았으면 거부하고 상태를 바꾸지 않는다.
    pub fn start_step(&mut self, step: u8) -> StartOutcome {
        let Some(name) = self.protocol.step(step).map(|def| def.name.clone()) else {
            tracing::warn!(step, "알 수 없는 Step 진입 요청");
            return StartOutcome::UnknownStep;
        };
        if self.state.completed_steps < step - 1 {
            tracing::info!(step, completed = self.state.completed_steps, "잠긴 Step 진입 거부");
            self.cues.blocked.insert(step);
            self.scheduler
                .schedule(BLOCKED_CUE_MS, ScheduledAction::ClearBlockedCue(step));
            self.events.push(EngineEvent::StepLocked { step });
            self.notify(
                Notice::warning(
                    "STEP LOCKED",
                    format!("Complete Step {} before accessing this step.", step - 1),
                )
                .lasting(NOTICE_MS),
            );
            return StartOutcome::Locked;
        }

        self.state.current_step_in_focus = step;
        self.attach_watchers(step);
        self.validate_step(step);
        tracing::info!(step, name = %name, "Step 진입");
        self.events.push(EngineEvent::StepStarted { step });
        self.notify(
            Notice::info("STEP INITIATED", format!("Beginning Step {step}: {name}"))
                .lasting(NOTICE_MS),
        );
        self.effect(EffectTarget::StepCard(step), Effect::Glitch, GLITCH_MS);
        StartOutcome::Started
    }

    /// Step 완료를 시도한다.
    ///
    /// 미완성 입력은 오류가 아니라 거부 결과로 돌려주며 진행 상태를 바꾸지 않는다.
    pub fn complete_step(&mut self, step: u8) -> CompleteOutcome {
        let Some(name) = self.protocol.step(step).map(|def| def.name.clone()) else {
            return CompleteOutcome::UnknownStep;
        };
        match self.step_status(step) {
            StepStatus::Completed => {
                tracing::debug!(step, "이미 완료된 Step 완료 요청 무시");
                return CompleteOutcome::AlreadyCompleted;
            }
            StepStatus::Locked => {
                tracing::info!(step, "잠긴 Step 완료 요청 거부");
                return CompleteOutcome::Locked;
            }
            StepStatus::Active => {}
        }

        let validation = self.validate_step(step);
        if !validation.is_valid() {
            let invalid_fields = validation.invalid_fields();
            tracing::info!(step, invalid = ?invalid_fields, "미완성 Step 완료 시도");
            self.cues.incomplete.insert(step);
            self.scheduler
                .schedule(INCOMPLETE_CUE_MS, ScheduledAction::ClearIncompleteCue(step));
            self.effect(
                EffectTarget::CompleteButton(step),
                Effect::IntenseGlitch,
                INTENSE_GLITCH_MS,
            );
            self.notify(
                Notice::error(
                    "INCOMPLETE DATA",
                    "All fields must be completed before progressing. The truth requires your full commitment.",
                )
                .lasting(ERROR_NOTICE_MS),
            );
            self.events.push(EngineEvent::IncompleteAttempt {
                step,
                invalid_fields: invalid_fields.clone(),
            });
            return CompleteOutcome::Incomplete { invalid_fields };
        }

        self.cues.incomplete.remove(&step);
        self.state.completed_steps += 1;
        debug_assert_eq!(self.state.completed_steps, step);
        self.store.save(&self.state);
        tracing::info!(step, completed = self.state.completed_steps, "Step 완료");
        self.close_step_content();
        self.events.push(EngineEvent::StepCompleted { step });
        self.notify(
            Notice::success(
                "STEP COMPLETED",
                format!("Step {step}: {name} completed successfully."),
            )
            .lasting(NOTICE_MS),
        );

        if step < self.protocol.step_count() {
            self.cues.unlocking.insert(step + 1);
            self.scheduler
                .schedule(UNLOCK_REVEAL_MS, ScheduledAction::RevealUnlock(step + 1));
        } else if !self.awakening_announced {
            self.awakening_announced = true;
            tracing::info!("각성 시퀀스 전체 완료");
            self.events.push(EngineEvent::AwakeningComplete);
            self.scheduler
                .schedule(COMPLETION_ALERT_MS, ScheduledAction::AnnounceCompletion);
        }
        CompleteOutcome::Completed
    }

    /// 열린 Step을 닫고 감시를 해제한다.
    pub fn close_step_content(&mut self) {
        let step = self.state.current_step_in_focus;
        if step != 0 {
            self.state.active_watchers.remove(&step);
        }
        self.state.current_step_in_focus = 0;
    }

    /// 가상 시각을 진행시키고 만기된 지연 작업을 실행한다.
    pub fn advance_to(&mut self, now_ms: u64) {
        for action in self.scheduler.advance_to(now_ms) {
            self.run_scheduled(action);
        }
    }

    fn run_scheduled(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::RevealUnlock(step) => {
                self.cues.unlocking.remove(&step);
                let name = self
                    .protocol
                    .step(step)
                    .map(|def| def.name.clone())
                    .unwrap_or_default();
                self.events.push(EngineEvent::StepUnlocked { step });
                self.effect(
                    EffectTarget::StepCard(step),
                    Effect::IntenseGlitch,
                    INTENSE_GLITCH_MS,
                );
                self.notify(
                    Notice::info(
                        "STEP UNLOCKED",
                        format!("Step {step}: {name} is now available."),
                    )
                    .lasting(NOTICE_MS),
                );
            }
            ScheduledAction::ClearIncompleteCue(step) => {
                self.cues.incomplete.remove(&step);
            }
            ScheduledAction::ClearBlockedCue(step) => {
                self.cues.blocked.remove(&step);
            }
            ScheduledAction::AnnounceCompletion => {
                if let Some(notifier) = self.notifier.as_mut() {
                    notifier.show_alert(
                        "AWAKENING COMPLETE",
                        "You have completed the awakening sequence. Your consciousness has been elevated. Continue to the Liberation Protocol to take action.",
                    );
                }
            }
        }
    }

    /// Step의 모든 필드에 대한 감시를 새로 구성한다.
    fn attach_watchers(&mut self, step: u8) {
        let fields: BTreeSet<String> = self
            .protocol
            .step(step)
            .map(|def| def.required_fields.iter().map(|f| f.id.clone()).collect())
            .unwrap_or_default();
        self.state.active_watchers.insert(step, fields);
    }

    fn notify(&mut self, notice: Notice) {
        if let Some(notifier) = self.notifier.as_mut() {
            notifier.notify(notice);
        }
    }

    fn effect(&mut self, target: EffectTarget, effect: Effect, duration_ms: u64) {
        if let Some(notifier) = self.notifier.as_mut() {
            notifier.apply_transient_effect(target, effect, duration_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::events::NoticeLevel;
    use crate::engine::persistence::{
        BrokenStore, KeyValueStore, MemoryStore, PROGRESS_KEY, StoreError,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 호출된 알림과 효과를 기록하는 목업 협력자이다.
    #[derive(Default, Clone)]
    struct RecordingNotifier {
        notices: Rc<RefCell<Vec<Notice>>>,
        effects: Rc<RefCell<Vec<(EffectTarget, Effect)>>>,
        alerts: Rc<RefCell<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, notice: Notice) {
            self.notices.borrow_mut().push(notice);
        }

        fn apply_transient_effect(&mut self, target: EffectTarget, effect: Effect, _: u64) {
            self.effects.borrow_mut().push((target, effect));
        }

        fn show_alert(&mut self, title: &str, _message: &str) {
            self.alerts.borrow_mut().push(title.to_string());
        }
    }

    /// 여러 엔진 인스턴스가 같은 내용을 공유하는 저장소이다.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
            self.0.borrow_mut().set(key, value)
        }
    }

    fn engine() -> AwakeningEngine {
        AwakeningEngine::new(Protocol::builtin(), ProgressStore::in_memory(), None)
    }

    fn engine_with_notifier() -> (AwakeningEngine, RecordingNotifier) {
        let notifier = RecordingNotifier::default();
        let engine = AwakeningEngine::new(
            Protocol::builtin(),
            ProgressStore::in_memory(),
            Some(Box::new(notifier.clone())),
        );
        (engine, notifier)
    }

    /// Step의 모든 필드를 유효한 값으로 채운다.
    fn fill_step(engine: &mut AwakeningEngine, step: u8) {
        let fields = engine
            .protocol()
            .step(step)
            .expect("Step 없음")
            .required_fields
            .clone();
        for field in fields {
            if field.kind.is_text() {
                engine.set_field(&field.id, "x".repeat(field.min_length().max(1)));
            } else {
                engine.set_field(&field.id, true);
            }
        }
    }

    /// 1번 Step의 세 필드 중 두 개만 채우면 완료가 거부된다.
    #[test]
    fn partial_step_one_is_rejected() {
        let mut engine = engine();
        engine.set_field("step1-q1", "abc");
        engine.set_field("step1-q2", "2h");
        let outcome = engine.complete_step(1);
        assert_eq!(
            outcome,
            CompleteOutcome::Incomplete {
                invalid_fields: vec!["step1-q3".into()]
            }
        );
        assert_eq!(engine.completed_steps(), 0);
        assert!(engine.is_incomplete_attempt(1));
        engine.advance_to(INCOMPLETE_CUE_MS);
        assert!(!engine.is_incomplete_attempt(1));
    }

    /// 1번 Step을 모두 채워 완료하면 2번 Step이 열린다.
    #[test]
    fn completing_step_one_unlocks_step_two() {
        let mut engine = engine();
        assert_eq!(engine.step_status(2), StepStatus::Locked);
        fill_step(&mut engine, 1);
        assert_eq!(engine.complete_step(1), CompleteOutcome::Completed);
        assert_eq!(engine.completed_steps(), 1);
        assert_eq!(engine.step_status(1), StepStatus::Completed);
        assert_eq!(engine.step_status(2), StepStatus::Active);
        assert!(engine.is_unlocking(2));
        assert_eq!(engine.state().current_step_in_focus, 0);
    }

    /// 완료 개수보다 두 단계 이상 앞선 Step 진입은 항상 거부된다.
    #[test]
    fn starting_ahead_is_rejected_without_mutation() {
        for completed in 0..=2u8 {
            let mut engine = engine();
            for step in 1..=completed {
                fill_step(&mut engine, step);
                assert_eq!(engine.complete_step(step), CompleteOutcome::Completed);
            }
            for step in (completed + 2)..=4 {
                let before_focus = engine.state().current_step_in_focus;
                assert_eq!(engine.start_step(step), StartOutcome::Locked);
                assert_eq!(engine.state().current_step_in_focus, before_focus);
                assert_eq!(engine.completed_steps(), completed);
                assert!(!engine.state().active_watchers.contains_key(&step));
                assert_eq!(engine.step_status(step), StepStatus::Locked);
            }
        }
    }

    /// 아무것도 완료하지 않은 상태에서 3번 Step 진입은 거부되고 경고가 나간다.
    #[test]
    fn step_three_locked_on_fresh_session() {
        let (mut engine, notifier) = engine_with_notifier();
        assert_eq!(engine.start_step(3), StartOutcome::Locked);
        assert_eq!(engine.step_status(3), StepStatus::Locked);
        assert!(engine.is_blocked(3));
        assert_eq!(engine.drain_events(), vec![EngineEvent::StepLocked { step: 3 }]);
        let notices = notifier.notices.borrow();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[0].message, "Complete Step 2 before accessing this step.");
        drop(notices);
        engine.advance_to(BLOCKED_CUE_MS);
        assert!(!engine.is_blocked(3));
    }

    /// 네 Step을 순서대로 완료하면 전체 완료 신호는 정확히 한 번 발생한다.
    #[test]
    fn full_run_emits_single_completion_signal() {
        let (mut engine, notifier) = engine_with_notifier();
        let mut now = 0;
        for step in 1..=4 {
            assert_eq!(engine.start_step(step), StartOutcome::Started);
            fill_step(&mut engine, step);
            assert_eq!(engine.complete_step(step), CompleteOutcome::Completed);
            now += 1_000;
            engine.advance_to(now);
        }
        assert_eq!(engine.completed_steps(), 4);
        assert_eq!(engine.complete_step(4), CompleteOutcome::AlreadyCompleted);
        assert_eq!(engine.complete_step(4), CompleteOutcome::AlreadyCompleted);
        engine.advance_to(now + COMPLETION_ALERT_MS);

        let events = engine.drain_events();
        let completions = events
            .iter()
            .filter(|e| **e == EngineEvent::AwakeningComplete)
            .count();
        assert_eq!(completions, 1);
        assert_eq!(engine.completed_steps(), 4);
        assert_eq!(engine.progress_percent(), 100);
        assert_eq!(engine.consciousness_level(), ConsciousnessLevel::High);
        assert_eq!(*notifier.alerts.borrow(), vec!["AWAKENING COMPLETE".to_string()]);
    }

    /// 완료 개수는 어떤 호출 순서에서도 줄지 않고 4를 넘지 않는다.
    #[test]
    fn completed_count_is_monotonic_and_bounded() {
        let mut engine = engine();
        let mut last = 0;
        let script: [(bool, u8); 12] = [
            (false, 3),
            (true, 1),
            (false, 1),
            (true, 1),
            (true, 3),
            (true, 2),
            (false, 4),
            (true, 3),
            (true, 4),
            (true, 4),
            (false, 2),
            (true, 1),
        ];
        for (complete, step) in script {
            if complete {
                fill_step(&mut engine, step);
                engine.complete_step(step);
            } else {
                engine.start_step(step);
            }
            let current = engine.completed_steps();
            assert!(current >= last);
            assert!(current <= 4);
            last = current;
        }
        assert_eq!(last, 4);
    }

    /// 같은 입력으로 두 번 검사해도 결과와 수집 값이 같다.
    #[test]
    fn validate_step_is_idempotent() {
        let mut engine = engine();
        engine.set_field("step1-q1", "  scroll ");
        engine.set_field("step1-q3", "short");
        let first = engine.validate_step(1);
        let collected = engine.state().collected_values.clone();
        let second = engine.validate_step(1);
        assert_eq!(first, second);
        assert_eq!(engine.state().collected_values, collected);
        assert_eq!((first.valid_count, first.total_count), (1, 3));
        assert_eq!(
            collected[&1].get("step1-q1"),
            Some(&FieldValue::from("scroll"))
        );
        assert!(!collected[&1].contains_key("step1-q3"));
    }

    /// 무효가 된 필드는 이전에 수집된 값을 그대로 둔다.
    #[test]
    fn invalid_field_keeps_stale_capture() {
        let mut engine = engine();
        engine.set_field("step1-q1", "phone");
        engine.validate_step(1);
        engine.set_field("step1-q1", "");
        let validation = engine.validate_step(1);
        assert_eq!(validation.is_field_valid("step1-q1"), Some(false));
        assert_eq!(
            engine.state().collected_values[&1].get("step1-q1"),
            Some(&FieldValue::from("phone"))
        );
    }

    /// 감시 중인 필드만 입력 즉시 재검사된다.
    #[test]
    fn watchers_drive_revalidation() {
        let mut engine = engine();
        assert!(engine.set_field("step1-q1", "abc").is_none());
        engine.start_step(1);
        engine.start_step(1);
        assert_eq!(engine.state().active_watchers[&1].len(), 3);
        let validation = engine.set_field("step1-q2", "1").expect("재검사 누락");
        assert_eq!(validation.valid_count, 2);
        assert!(!engine.is_complete_enabled(1));
        engine.set_field("step1-q3", "yesterday evening");
        assert!(engine.is_complete_enabled(1));
        assert!(engine.drain_events().contains(&EngineEvent::ValidationUpdated {
            step: 1,
            valid_count: 3,
            total_count: 3
        }));
        engine.close_step_content();
        assert_eq!(engine.state().current_step_in_focus, 0);
        assert!(engine.set_field("step1-q3", "").is_none());
    }

    /// 잠금 해제 연출은 300ms 뒤에 한 번만 실행된다.
    #[test]
    fn unlock_reveal_fires_once_after_delay() {
        let (mut engine, notifier) = engine_with_notifier();
        fill_step(&mut engine, 1);
        engine.complete_step(1);
        engine.drain_events();
        engine.advance_to(UNLOCK_REVEAL_MS - 1);
        assert!(engine.drain_events().is_empty());
        engine.advance_to(UNLOCK_REVEAL_MS);
        assert_eq!(engine.drain_events(), vec![EngineEvent::StepUnlocked { step: 2 }]);
        engine.advance_to(UNLOCK_REVEAL_MS * 10);
        assert!(engine.drain_events().is_empty());
        assert!(!engine.is_unlocking(2));
        assert!(
            notifier
                .effects
                .borrow()
                .contains(&(EffectTarget::StepCard(2), Effect::IntenseGlitch))
        );
        let titles: Vec<String> = notifier
            .notices
            .borrow()
            .iter()
            .map(|n| n.title.clone())
            .collect();
        assert_eq!(titles, vec!["STEP COMPLETED", "STEP UNLOCKED"]);
    }

    /// 연출 대기 중 같은 Step을 다시 완료해도 아무 일도 일어나지 않는다.
    #[test]
    fn rapid_second_completion_is_ignored() {
        let mut engine = engine();
        fill_step(&mut engine, 1);
        assert_eq!(engine.complete_step(1), CompleteOutcome::Completed);
        assert_eq!(engine.complete_step(1), CompleteOutcome::AlreadyCompleted);
        assert_eq!(engine.completed_steps(), 1);
        assert_eq!(engine.complete_step(3), CompleteOutcome::Locked);
        assert_eq!(engine.complete_step(9), CompleteOutcome::UnknownStep);
        assert_eq!(engine.start_step(0), StartOutcome::UnknownStep);
    }

    /// 저장 후 새 세션에서 완료 개수와 수집 값, 입력 값이 복원된다.
    #[test]
    fn progress_survives_new_session() {
        let shared = SharedStore::default();
        let mut engine = AwakeningEngine::new(
            Protocol::builtin(),
            ProgressStore::new(Box::new(shared.clone())),
            None,
        );
        fill_step(&mut engine, 1);
        engine.complete_step(1);
        fill_step(&mut engine, 2);
        engine.complete_step(2);
        let collected = engine.state().collected_values.clone();

        let restored = AwakeningEngine::new(
            Protocol::builtin(),
            ProgressStore::new(Box::new(shared)),
            None,
        );
        assert_eq!(restored.completed_steps(), 2);
        assert_eq!(restored.state().collected_values, collected);
        assert_eq!(restored.step_status(3), StepStatus::Active);
        assert_eq!(restored.inputs().text("step1-q1"), "xxx");
        assert_eq!(restored.state().current_step_in_focus, 0);
    }

    /// 손상된 저장 데이터로 시작하면 처음 상태가 된다.
    #[test]
    fn corrupt_record_starts_fresh() {
        let shared = SharedStore::default();
        shared
            .clone()
            .set(PROGRESS_KEY, "{{{".into())
            .expect("쓰기 실패");
        let engine = AwakeningEngine::new(
            Protocol::builtin(),
            ProgressStore::new(Box::new(shared)),
            None,
        );
        assert_eq!(engine.completed_steps(), 0);
        assert_eq!(engine.step_status(1), StepStatus::Active);
        assert!(engine.state().collected_values.is_empty());
    }

    /// 완료된 Step은 다시 열어 볼 수 있지만 진행 상태는 바뀌지 않는다.
    #[test]
    fn completed_step_can_be_reviewed() {
        let mut engine = engine();
        fill_step(&mut engine, 1);
        engine.complete_step(1);
        assert_eq!(engine.start_step(1), StartOutcome::Started);
        assert_eq!(engine.state().current_step_in_focus, 1);
        assert!(!engine.is_complete_enabled(1));
        assert_eq!(engine.completed_steps(), 1);
    }

    /// 저장에 실패해도 완료는 반영되고 메모리 상태가 기준으로 유지된다.
    #[test]
    fn completion_survives_failing_store() {
        let mut engine = AwakeningEngine::new(
            Protocol::builtin(),
            ProgressStore::new(Box::new(BrokenStore)),
            None,
        );
        assert_eq!(engine.completed_steps(), 0);
        fill_step(&mut engine, 1);
        assert_eq!(engine.complete_step(1), CompleteOutcome::Completed);
        assert_eq!(engine.completed_steps(), 1);
        assert_eq!(engine.step_status(1), StepStatus::Completed);
        assert_eq!(engine.step_status(2), StepStatus::Active);
        assert_eq!(engine.start_step(2), StartOutcome::Started);
    }
}
