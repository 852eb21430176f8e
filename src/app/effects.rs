use crate::engine::{Effect, EffectTarget, KeyValueStore};
use serde::{Deserialize, Serialize};

/// 효과 설정을 저장하는 키이다.
pub(crate) const EFFECTS_KEY: &str = "awakening_effects_preferences";

/// 사용자가 켜고 끄는 시각 효과 설정이다. 빠진 항목은 켜짐으로 본다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct EffectPreferences {
    pub(crate) enabled: bool,
    pub(crate) glitch: bool,
    pub(crate) scanlines: bool,
    pub(crate) cyber_grid: bool,
}

impl Default for EffectPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            glitch: true,
            scanlines: true,
            cyber_grid: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveEffect {
    target: EffectTarget,
    effect: Effect,
    until_ms: u64,
}

/// 오버레이 효과 토글과 일시 효과를 관리한다.
pub(crate) struct EffectBoard {
    prefs: EffectPreferences,
    store: Box<dyn KeyValueStore>,
    active: Vec<ActiveEffect>,
    now_ms: u64,
}

impl EffectBoard {
    /// 저장된 설정을 읽어 구성한다. 읽기 실패나 손상은 기본값으로 대체한다.
    pub(crate) fn load(store: Box<dyn KeyValueStore>) -> Self {
        let prefs = match store.get(EFFECTS_KEY) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "손상된 효과 설정을 무시합니다.");
                EffectPreferences::default()
            }),
            Ok(None) => EffectPreferences::default(),
            Err(err) => {
                tracing::error!(error = %err, "효과 설정 읽기 실패");
                EffectPreferences::default()
            }
        };
        Self {
            prefs,
            store,
            active: Vec::new(),
            now_ms: 0,
        }
    }

    pub(crate) fn preferences(&self) -> EffectPreferences {
        self.prefs
    }

    pub(crate) fn glitch_on(&self) -> bool {
        self.prefs.enabled && self.prefs.glitch
    }

    pub(crate) fn scanlines_on(&self) -> bool {
        self.prefs.enabled && self.prefs.scanlines
    }

    pub(crate) fn cyber_grid_on(&self) -> bool {
        self.prefs.enabled && self.prefs.cyber_grid
    }

    /// 글리치 효과를 켜거나 끈다. `None`이면 반전한다.
    pub(crate) fn toggle_glitch(&mut self, enabled: Option<bool>) {
        self.prefs.glitch = enabled.unwrap_or(!self.prefs.glitch);
        if !self.prefs.glitch {
            self.active.clear();
        }
        tracing::info!(on = self.prefs.glitch, "글리치 효과 전환");
        self.save();
    }

    pub(crate) fn toggle_scanlines(&mut self, enabled: Option<bool>) {
        self.prefs.scanlines = enabled.unwrap_or(!self.prefs.scanlines);
        tracing::info!(on = self.prefs.scanlines, "스캔라인 효과 전환");
        self.save();
    }

    pub(crate) fn toggle_cyber_grid(&mut self, enabled: Option<bool>) {
        self.prefs.cyber_grid = enabled.unwrap_or(!self.prefs.cyber_grid);
        tracing::info!(on = self.prefs.cyber_grid, "사이버 그리드 효과 전환");
        self.save();
    }

    pub(crate) fn enable_all(&mut self) {
        self.prefs = EffectPreferences::default();
        self.save();
    }

    pub(crate) fn disable_all(&mut self) {
        self.prefs = EffectPreferences {
            enabled: false,
            glitch: false,
            scanlines: false,
            cyber_grid: false,
        };
        self.active.clear();
        self.save();
    }

    /// 화면 요소에 일시 효과를 건다. 글리치가 꺼져 있으면 무시한다.
    pub(crate) fn apply(&mut self, target: EffectTarget, effect: Effect, duration_ms: u64) {
        if !self.glitch_on() {
            return;
        }
        self.active.retain(|active| active.target != target);
        self.active.push(ActiveEffect {
            target,
            effect,
            until_ms: self.now_ms.saturating_add(duration_ms),
        });
    }

    /// 대상에 걸린 효과가 있으면 반환한다.
    pub(crate) fn effect_on(&self, target: EffectTarget) -> Option<Effect> {
        self.active
            .iter()
            .find(|active| active.target == target)
            .map(|active| active.effect)
    }

    #[cfg(test)]
    pub(crate) fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// 만료된 효과를 제거한다.
    pub(crate) fn tick(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;
        self.active.retain(|active| active.until_ms > now);
    }

    fn save(&mut self) {
        let body = match serde_json::to_string(&self.prefs) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(error = %err, "효과 설정 직렬화 실패");
                return;
            }
        };
        if let Err(err) = self.store.set(EFFECTS_KEY, body) {
            tracing::error!(error = %err, "효과 설정 저장 실패");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FileStore;

    /// 설정을 바꾸면 저장되고 다시 열어도 유지된다.
    #[test]
    fn preferences_persist_across_sessions() {
        let dir = tempfile::tempdir().expect("임시 디렉터리 생성 실패");
        let mut board = EffectBoard::load(Box::new(FileStore::open(dir.path())));
        assert_eq!(board.preferences(), EffectPreferences::default());
        board.toggle_scanlines(None);
        board.toggle_cyber_grid(Some(false));

        let reopened = EffectBoard::load(Box::new(FileStore::open(dir.path())));
        assert!(!reopened.scanlines_on());
        assert!(!reopened.cyber_grid_on());
        assert!(reopened.glitch_on());
    }

    /// 빠진 항목은 켜짐으로, 손상된 값은 기본값으로 읽는다.
    #[test]
    fn lenient_preference_loading() {
        let mut store = crate::engine::MemoryStore::new();
        store
            .set(EFFECTS_KEY, r#"{"glitch": false}"#.into())
            .expect("쓰기 실패");
        let board = EffectBoard::load(Box::new(store));
        assert!(!board.glitch_on());
        assert!(board.scanlines_on());

        let mut store = crate::engine::MemoryStore::new();
        store.set(EFFECTS_KEY, "nope".into()).expect("쓰기 실패");
        let board = EffectBoard::load(Box::new(store));
        assert_eq!(board.preferences(), EffectPreferences::default());
    }

    /// 일시 효과는 지정 시간 뒤 사라지고 글리치가 꺼져 있으면 걸리지 않는다.
    #[test]
    fn transient_effects_expire_and_respect_toggle() {
        let mut board = EffectBoard::load(Box::new(crate::engine::MemoryStore::new()));
        board.apply(EffectTarget::StepCard(1), Effect::Glitch, 300);
        assert_eq!(board.effect_on(EffectTarget::StepCard(1)), Some(Effect::Glitch));
        board.tick(299);
        assert!(board.has_active());
        board.tick(300);
        assert_eq!(board.effect_on(EffectTarget::StepCard(1)), None);

        board.disable_all();
        board.apply(EffectTarget::Progress, Effect::IntenseGlitch, 500);
        assert!(!board.has_active());
        assert!(!board.scanlines_on());

        board.enable_all();
        board.apply(EffectTarget::Progress, Effect::IntenseGlitch, 500);
        board.toggle_glitch(Some(false));
        assert!(!board.has_active());
    }
}
