/// 엔진에서 UI로 전달되는 주요 이벤트 모델이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Step 진입 알림.
    StepStarted { step: u8 },
    /// 잠긴 Step 접근 거부.
    StepLocked { step: u8 },
    /// 감시 중인 필드 변경으로 재검사한 결과.
    ValidationUpdated {
        step: u8,
        valid_count: usize,
        total_count: usize,
    },
    /// 미완성 상태로 완료를 시도했다.
    IncompleteAttempt {
        step: u8,
        invalid_fields: Vec<String>,
    },
    /// Step 완료.
    StepCompleted { step: u8 },
    /// 다음 Step 잠금 해제 연출이 끝났다.
    StepUnlocked { step: u8 },
    /// 모든 Step 완료. 세션당 한 번만 발생한다.
    AwakeningComplete,
}

/// 알림의 종류이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
    System,
}

/// 토스트로 표시할 알림 한 건이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    /// 표시 시간. 없으면 수신 측 기본값을 쓴다.
    pub duration_ms: Option<u64>,
    /// 자동으로 닫히지 않는 알림인지 여부.
    pub persistent: bool,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            duration_ms: None,
            persistent: false,
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }

    pub fn system(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::System, title, message)
    }

    /// 표시 시간을 지정한다.
    pub fn lasting(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// 사용자가 닫을 때까지 유지한다.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

/// 일시적인 시각 효과의 종류이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Glitch,
    IntenseGlitch,
}

/// 시각 효과를 적용할 화면 요소이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectTarget {
    /// 좌측 Step 카드.
    StepCard(u8),
    /// Step 완료 버튼.
    CompleteButton(u8),
    /// 상단 진행률 영역.
    Progress,
}

/// 엔진이 호출하는 알림/효과 협력자이다.
///
/// 모든 메서드는 반환 값이 없는 단방향 호출이며 기본 구현은 아무 것도 하지 않는다.
pub trait Notifier {
    /// 토스트 알림을 띄운다.
    fn notify(&mut self, _notice: Notice) {}

    /// 화면 요소에 일시적인 효과를 건다.
    fn apply_transient_effect(&mut self, _target: EffectTarget, _effect: Effect, _duration_ms: u64) {}

    /// 확인 버튼 하나짜리 모달을 띄운다.
    fn show_alert(&mut self, _title: &str, _message: &str) {}
}
