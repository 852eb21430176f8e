/// 지연 실행이 필요한 엔진 작업이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// 다음 Step 잠금 해제 연출을 마무리한다.
    RevealUnlock(u8),
    /// 미완성 완료 시도 표시를 지운다.
    ClearIncompleteCue(u8),
    /// 잠긴 Step 접근 표시를 지운다.
    ClearBlockedCue(u8),
    /// 전체 완료 모달을 띄운다.
    AnnounceCompletion,
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    due_ms: u64,
    seq: u64,
    action: ScheduledAction,
}

/// 엔진이 소유하는 지연 작업 목록이다.
///
/// 시간은 호출자가 `advance_to`로 넘겨주는 가상 밀리초이므로 테스트에서 결정적으로 재현된다.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 가상 시각이다.
    #[cfg(test)]
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// 작업을 예약한다. 같은 작업이 이미 대기 중이면 새 시각으로 다시 예약한다.
    pub fn schedule(&mut self, delay_ms: u64, action: ScheduledAction) {
        self.tasks.retain(|task| task.action != action);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(ScheduledTask {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            action,
        });
    }

    /// 시각을 진행시키고 만기된 작업을 예약 시각, 예약 순서대로 반환한다.
    ///
    /// 과거 시각이 들어오면 시간은 그대로 두고 만기 작업만 확인한다.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<ScheduledAction> {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;
        let (mut due, pending): (Vec<ScheduledTask>, Vec<ScheduledTask>) =
            self.tasks.drain(..).partition(|task| task.due_ms <= now);
        self.tasks = pending;
        due.sort_by_key(|task| (task.due_ms, task.seq));
        due.into_iter().map(|task| task.action).collect()
    }

    /// 작업이 대기 중인지 확인한다.
    #[cfg(test)]
    pub fn is_pending(&self, action: ScheduledAction) -> bool {
        self.tasks.iter().any(|task| task.action == action)
    }

    /// 대기 중인 작업 수이다.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}
