/// 인트로 화면에 표시할 선언문 한 건이다.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Statement {
    pub(crate) text: &'static str,
    pub(crate) duration_ms: u64,
    pub(crate) is_final: bool,
}

const fn statement(text: &'static str) -> Statement {
    Statement {
        text,
        duration_ms: 7_000,
        is_final: false,
    }
}

pub(crate) const STATEMENTS: [Statement; 11] = [
    statement("Technology is not at your service. You are at the service of technology."),
    statement("Your notifications are chains you wear willingly."),
    statement("You connect with a thousand people while losing the connection with yourself."),
    statement("Every click you make feeds the system that controls you."),
    statement("Your attention has been hacked. It is time to take it back."),
    statement("You are not browsing freely. You are following a programmed path."),
    statement("Algorithms do not know you. They build you."),
    statement("Every free service makes you the product."),
    statement("Your digital identity is a commodity sold to the highest bidder."),
    statement("How long ago did you live a day without looking at a screen?"),
    Statement {
        text: "It is time to wake up and take back control.",
        duration_ms: 8_000,
        is_final: true,
    },
];

/// 마지막 선언문이 나타난 뒤 입장 버튼이 보일 때까지의 지연이다.
const ENTER_DELAY_MS: u64 = 2_000;

/// 선언문을 차례로 보여 주는 전체 화면 인트로 진행 상태이다.
#[derive(Debug, Clone)]
pub(crate) struct IntroSequence {
    index: usize,
    shown_at_ms: u64,
    skipped: bool,
}

impl IntroSequence {
    pub(crate) fn start(now_ms: u64) -> Self {
        Self {
            index: 0,
            shown_at_ms: now_ms,
            skipped: false,
        }
    }

    pub(crate) fn current(&self) -> &'static Statement {
        &STATEMENTS[self.index]
    }

    /// `"3/11"` 형식의 카운터이다.
    pub(crate) fn counter(&self) -> String {
        format!("{}/{}", self.index + 1, STATEMENTS.len())
    }

    /// 경과 시간만큼 다음 선언문으로 넘긴다. 마지막 선언문에서 멈춘다.
    pub(crate) fn tick(&mut self, now_ms: u64) {
        while !self.current().is_final {
            let due = self.shown_at_ms.saturating_add(self.current().duration_ms);
            if now_ms < due {
                break;
            }
            self.index += 1;
            self.shown_at_ms = due;
        }
    }

    /// 마지막 선언문으로 바로 건너뛴다. 입장 버튼은 즉시 보인다.
    pub(crate) fn skip(&mut self, now_ms: u64) {
        self.index = STATEMENTS.len() - 1;
        self.shown_at_ms = now_ms;
        self.skipped = true;
    }

    #[cfg(test)]
    pub(crate) fn is_skipped(&self) -> bool {
        self.skipped
    }

    /// 입장 버튼 표시 여부이다.
    pub(crate) fn enter_visible(&self, now_ms: u64) -> bool {
        self.current().is_final
            && (self.skipped || now_ms >= self.shown_at_ms.saturating_add(ENTER_DELAY_MS))
    }

    /// 현재 선언문의 진행 비율(0.0..=1.0)이다.
    pub(crate) fn statement_progress(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.shown_at_ms) as f32;
        (elapsed / self.current().duration_ms as f32).clamp(0.0, 1.0)
    }
}
