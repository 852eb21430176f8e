use super::*;

/// StepStatus를 화면 문구로 바꾼다.
pub(super) fn status_indicator(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Locked => "[LOCKED]",
        StepStatus::Active => "[AVAILABLE]",
        StepStatus::Completed => "[COMPLETED]",
    }
}

/// 입력 폼을 수정할 수 있는 상태인지 확인한다. 완료된 Step은 열람만 가능하다.
pub(super) fn form_editable(status: StepStatus) -> bool {
    status == StepStatus::Active
}

/// 글리치 효과 중인 요소의 가로 흔들림 폭이다.
pub(super) fn glitch_jitter(effect: Option<Effect>, now_ms: u64) -> f32 {
    let amplitude = match effect {
        Some(Effect::Glitch) => 2.0,
        Some(Effect::IntenseGlitch) => 5.0,
        None => return 0.0,
    };
    // 30ms마다 -1, 0, 1 순으로 흔든다.
    (((now_ms / 30) % 3) as f32 - 1.0) * amplitude
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 효과가 없으면 흔들리지 않고 강한 글리치일수록 크게 흔들린다.
    #[test]
    fn jitter_scales_with_effect() {
        assert_eq!(glitch_jitter(None, 90), 0.0);
        assert_eq!(glitch_jitter(Some(Effect::Glitch), 0), -2.0);
        assert_eq!(glitch_jitter(Some(Effect::IntenseGlitch), 60), 5.0);
        assert_eq!(glitch_jitter(Some(Effect::IntenseGlitch), 30), 0.0);
    }

    /// 진행 중인 Step만 입력을 받고 완료되거나 잠긴 Step은 읽기 전용이다.
    #[test]
    fn only_active_step_form_is_editable() {
        assert!(form_editable(StepStatus::Active));
        assert!(!form_editable(StepStatus::Completed));
        assert!(!form_editable(StepStatus::Locked));
    }
}
