use crate::engine::{Notice, NoticeLevel};
use std::collections::VecDeque;

/// 동시에 표시할 수 있는 최대 토스트 수이다.
pub(crate) const MAX_VISIBLE_TOASTS: usize = 5;
/// 표시 시간이 지정되지 않은 알림의 기본값이다.
const DEFAULT_DURATION_MS: u64 = 5_000;
/// 표시 시간이 지정되지 않은 오류 알림의 기본값이다.
const ERROR_DURATION_MS: u64 = 7_000;

/// 화면에 떠 있는 토스트 한 건이다.
#[derive(Debug, Clone)]
pub(crate) struct Toast {
    pub(crate) id: u64,
    pub(crate) notice: Notice,
    pub(crate) shown_at_ms: u64,
    pub(crate) duration_ms: u64,
}

impl Toast {
    /// 남은 표시 시간 비율(1.0 → 0.0)이다. 고정 토스트는 항상 1.0이다.
    pub(crate) fn remaining_ratio(&self, now_ms: u64) -> f32 {
        if self.notice.persistent || self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.shown_at_ms) as f32;
        (1.0 - elapsed / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    fn is_expired(&self, now_ms: u64) -> bool {
        !self.notice.persistent && now_ms >= self.shown_at_ms.saturating_add(self.duration_ms)
    }
}

/// 표시 개수를 제한하는 토스트 큐이다.
///
/// 가득 차면 가장 오래된 비고정 토스트를 밀어내고, 모두 고정이면 대기열에 넣는다.
#[derive(Debug)]
pub(crate) struct ToastQueue {
    visible: Vec<Toast>,
    waiting: VecDeque<Notice>,
    next_id: u64,
    now_ms: u64,
    max_visible: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_capacity(MAX_VISIBLE_TOASTS)
    }
}

impl ToastQueue {
    pub(crate) fn with_capacity(max_visible: usize) -> Self {
        Self {
            visible: Vec::new(),
            waiting: VecDeque::new(),
            next_id: 1,
            now_ms: 0,
            max_visible: max_visible.max(1),
        }
    }

    /// 알림을 추가한다. 대기열로 들어가면 `None`을 반환한다.
    pub(crate) fn push(&mut self, notice: Notice) -> Option<u64> {
        if self.visible.len() >= self.max_visible {
            match self.visible.iter().position(|toast| !toast.notice.persistent) {
                Some(oldest) => {
                    self.visible.remove(oldest);
                }
                None => {
                    self.waiting.push_back(notice);
                    return None;
                }
            }
        }
        Some(self.show(notice))
    }

    fn show(&mut self, notice: Notice) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let duration_ms = notice.duration_ms.unwrap_or(match notice.level {
            NoticeLevel::Error => ERROR_DURATION_MS,
            _ => DEFAULT_DURATION_MS,
        });
        tracing::debug!(id, title = %notice.title, "토스트 표시");
        self.visible.push(Toast {
            id,
            notice,
            shown_at_ms: self.now_ms,
            duration_ms,
        });
        id
    }

    /// 토스트를 닫고 대기열을 채운다.
    pub(crate) fn dismiss(&mut self, id: u64) {
        self.visible.retain(|toast| toast.id != id);
        self.fill_from_waiting();
    }

    /// 시각을 진행시켜 만료된 토스트를 제거한다.
    pub(crate) fn tick(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;
        self.visible.retain(|toast| !toast.is_expired(now));
        self.fill_from_waiting();
    }

    fn fill_from_waiting(&mut self) {
        while self.visible.len() < self.max_visible {
            let Some(notice) = self.waiting.pop_front() else {
                break;
            };
            self.show(notice);
        }
    }

    pub(crate) fn visible(&self) -> &[Toast] {
        &self.visible
    }

    /// 자리가 나기를 기다리는 알림 수이다.
    pub(crate) fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub(crate) fn now(&self) -> u64 {
        self.now_ms
    }
}
