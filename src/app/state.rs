use super::effects::EffectBoard;
use super::intro::IntroSequence;
use super::modal::{ConfirmPurpose, ModalResponse, ModalStack};
use super::toast::ToastQueue;
use crate::engine::{
    AwakeningEngine, CompleteOutcome, Effect, EffectTarget, EngineEvent, FieldValue,
    KeyValueStore, Notice, Notifier, ProgressStore, StartOutcome,
};
use crate::protocol::Protocol;
use crate::theme::Theme;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// 처음 방문한 사용자에게 시작 확인을 묻기까지의 지연이다.
const WELCOME_PROMPT_DELAY_MS: u64 = 2_000;

/// 엔진 알림을 화면의 토스트, 모달, 효과로 연결한다.
struct UiNotifier {
    toasts: Rc<RefCell<ToastQueue>>,
    modals: Rc<RefCell<ModalStack>>,
    effects: Rc<RefCell<EffectBoard>>,
}

impl Notifier for UiNotifier {
    fn notify(&mut self, notice: Notice) {
        self.toasts.borrow_mut().push(notice);
    }

    fn apply_transient_effect(&mut self, target: EffectTarget, effect: Effect, duration_ms: u64) {
        self.effects.borrow_mut().apply(target, effect, duration_ms);
    }

    fn show_alert(&mut self, title: &str, message: &str) {
        self.modals.borrow_mut().alert(title, message);
    }
}

/// egui 애플리케이션의 전체 상태를 보관한다.
pub struct AwakeningApp {
    /// UI 테마 정보.
    pub(crate) theme: Theme,
    /// Step 검증 엔진.
    pub(crate) engine: AwakeningEngine,
    pub(crate) toasts: Rc<RefCell<ToastQueue>>,
    pub(crate) modals: Rc<RefCell<ModalStack>>,
    pub(crate) effects: Rc<RefCell<EffectBoard>>,
    /// 진행 중인 인트로. 입장하면 `None`이 된다.
    pub(crate) intro: Option<IntroSequence>,
    /// 시작 확인 모달을 띄울 시각.
    pub(crate) welcome_prompt_at: Option<u64>,
    /// 상단 시스템 상태 문구.
    pub(crate) system_status: &'static str,
    /// 다음 프레임에 포커스를 옮길 필드.
    pub(crate) focus_field: Option<String>,
    /// 효과 설정 패널 표시 여부.
    pub(crate) show_effects_panel: bool,
    pub(crate) now_ms: u64,
    started_at: Instant,
}

impl AwakeningApp {
    /// egui Context를 받아 초기 상태를 구성한다.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        protocol: Protocol,
        store: impl KeyValueStore + Clone + 'static,
        skip_intro: bool,
    ) -> Self {
        let app = Self::with_store(protocol, store, skip_intro);
        app.theme.apply(&cc.egui_ctx);
        app
    }

    /// egui 없이 상태만 구성한다.
    pub(crate) fn with_store(
        protocol: Protocol,
        store: impl KeyValueStore + Clone + 'static,
        skip_intro: bool,
    ) -> Self {
        let toasts = Rc::new(RefCell::new(ToastQueue::default()));
        let modals = Rc::new(RefCell::new(ModalStack::default()));
        let effects = Rc::new(RefCell::new(EffectBoard::load(Box::new(store.clone()))));
        let notifier = UiNotifier {
            toasts: toasts.clone(),
            modals: modals.clone(),
            effects: effects.clone(),
        };
        let engine = AwakeningEngine::new(
            protocol,
            ProgressStore::new(Box::new(store)),
            Some(Box::new(notifier)),
        );
        let mut app = Self {
            theme: Theme::default(),
            engine,
            toasts,
            modals,
            effects,
            intro: None,
            welcome_prompt_at: None,
            system_status: "STANDBY",
            focus_field: None,
            show_effects_panel: false,
            now_ms: 0,
            started_at: Instant::now(),
        };
        if app.engine.is_awakened() {
            app.system_status = "AWAKENED";
        }
        if skip_intro {
            app.schedule_welcome_prompt();
        } else {
            app.intro = Some(IntroSequence::start(0));
        }
        app
    }

    /// 앱 시작 후 경과 시간(ms)이다.
    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    /// 모든 시간 기반 구성 요소를 같은 시각으로 진행시킨다.
    pub(crate) fn tick(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;
        self.engine.advance_to(now);
        self.toasts.borrow_mut().tick(now);
        self.effects.borrow_mut().tick(now);
        if let Some(intro) = self.intro.as_mut() {
            intro.tick(now);
        }
        if self.welcome_prompt_at.is_some_and(|due| now >= due) {
            self.welcome_prompt_at = None;
            self.modals.borrow_mut().confirm(
                "BEGIN AWAKENING?",
                "This sequence will permanently change how you see your digital life. Once you begin, there is no going back to ignorance. Do you wish to proceed?",
                ConfirmPurpose::BeginAwakening,
            );
        }
        self.drain_events();
    }

    /// 엔진 이벤트를 모두 소비하여 UI 상태를 동기화한다.
    pub(crate) fn drain_events(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                EngineEvent::StepStarted { .. } if !self.engine.is_awakened() => {
                    self.system_status = "IN PROGRESS";
                }
                EngineEvent::IncompleteAttempt { invalid_fields, .. } => {
                    self.focus_field = invalid_fields.into_iter().next();
                }
                EngineEvent::StepCompleted { .. } => {
                    self.effects
                        .borrow_mut()
                        .apply(EffectTarget::Progress, Effect::Glitch, 1_000);
                }
                EngineEvent::AwakeningComplete => {
                    self.system_status = "AWAKENED";
                }
                EngineEvent::StepStarted { .. }
                | EngineEvent::StepLocked { .. }
                | EngineEvent::ValidationUpdated { .. }
                | EngineEvent::StepUnlocked { .. } => {}
            }
        }
    }

    /// Step 카드 클릭을 처리한다.
    pub(crate) fn open_step(&mut self, step: u8) {
        if self.engine.start_step(step) == StartOutcome::Started {
            self.focus_field = None;
        }
        self.drain_events();
    }

    /// 완료 버튼 클릭을 처리한다.
    pub(crate) fn submit_step(&mut self, step: u8) -> CompleteOutcome {
        let outcome = self.engine.complete_step(step);
        self.drain_events();
        outcome
    }

    /// 열린 Step 닫기 버튼을 처리한다.
    pub(crate) fn close_step(&mut self) {
        self.engine.close_step_content();
        self.focus_field = None;
    }

    /// 입력 위젯 변경을 엔진에 전달한다.
    pub(crate) fn edit_field(&mut self, field_id: &str, value: FieldValue) {
        self.engine.set_field(field_id, value);
        self.drain_events();
    }

    /// 인트로를 건너뛴다.
    pub(crate) fn skip_intro(&mut self) {
        let now = self.now_ms;
        if let Some(intro) = self.intro.as_mut() {
            intro.skip(now);
        }
    }

    /// 인트로를 닫고 본 화면으로 들어간다.
    pub(crate) fn enter_system(&mut self) {
        if self.intro.take().is_none() {
            return;
        }
        tracing::info!("인트로 종료, 본 화면 진입");
        self.toasts.borrow_mut().push(
            Notice::system("INITIALIZATION", "Vigil system online. Awakening in progress...")
                .lasting(4_000),
        );
        self.effects
            .borrow_mut()
            .apply(EffectTarget::Progress, Effect::IntenseGlitch, 500);
        self.schedule_welcome_prompt();
    }

    /// 진행 정보를 디스크에 남길 수 없음을 닫기 전까지 알린다.
    pub(crate) fn report_volatile_storage(&mut self) {
        self.toasts.borrow_mut().push(
            Notice::error(
                "STORAGE OFFLINE",
                "Progress cannot be saved. It will be lost when this session ends.",
            )
            .persistent(),
        );
    }

    fn schedule_welcome_prompt(&mut self) {
        if self.engine.completed_steps() == 0 {
            self.welcome_prompt_at = Some(self.now_ms + WELCOME_PROMPT_DELAY_MS);
        }
    }

    /// 모달 버튼 응답을 처리한다.
    pub(crate) fn respond_modal(&mut self, id: u64, accepted: bool) {
        let response = self.modals.borrow_mut().respond(id, accepted);
        if let Some(response) = response {
            self.handle_modal_response(response);
        }
    }

    /// Esc 키로 맨 위 모달을 닫는다.
    pub(crate) fn dismiss_top_modal(&mut self) {
        let response = self.modals.borrow_mut().dismiss_top();
        if let Some(response) = response {
            self.handle_modal_response(response);
        }
    }

    fn handle_modal_response(&mut self, response: ModalResponse) {
        match (response.purpose, response.accepted) {
            (ConfirmPurpose::BeginAwakening, true) => {
                self.system_status = "CONNECTED";
                self.toasts.borrow_mut().push(
                    Notice::success("ACCESS GRANTED", "Your awakening journey begins now.")
                        .lasting(4_000),
                );
            }
            (ConfirmPurpose::BeginAwakening, false) => {
                self.toasts.borrow_mut().push(
                    Notice::warning(
                        "SEQUENCE POSTPONED",
                        "The truth will be waiting when you're ready.",
                    )
                    .lasting(5_000),
                );
            }
        }
    }
}
