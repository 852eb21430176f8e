/// 확인 모달의 응답에 따라 수행할 후속 작업이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfirmPurpose {
    /// 첫 방문 시 각성 시작 여부 확인.
    BeginAwakening,
}

/// 모달 종류이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ModalKind {
    /// 확인 버튼만 있는 알림.
    Alert,
    /// 확인/취소 선택.
    Confirm(ConfirmPurpose),
}

/// 표시 대기 중인 모달 한 건이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModalRequest {
    pub(crate) id: u64,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) kind: ModalKind,
}

/// 사용자가 확인 모달에 답한 결과이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModalResponse {
    pub(crate) purpose: ConfirmPurpose,
    pub(crate) accepted: bool,
}

/// 모달 스택. 가장 마지막에 열린 모달만 화면에 보인다.
#[derive(Debug, Default)]
pub(crate) struct ModalStack {
    stack: Vec<ModalRequest>,
    next_id: u64,
}

impl ModalStack {
    fn open(&mut self, title: &str, message: &str, kind: ModalKind) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.stack.push(ModalRequest {
            id,
            title: title.to_string(),
            message: message.to_string(),
            kind,
        });
        id
    }

    pub(crate) fn alert(&mut self, title: &str, message: &str) -> u64 {
        self.open(title, message, ModalKind::Alert)
    }

    pub(crate) fn confirm(&mut self, title: &str, message: &str, purpose: ConfirmPurpose) -> u64 {
        self.open(title, message, ModalKind::Confirm(purpose))
    }

    /// 현재 보이는 모달이다.
    pub(crate) fn top(&self) -> Option<&ModalRequest> {
        self.stack.last()
    }

    pub(crate) fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    /// 모달을 닫는다. 확인 모달이었다면 응답을 반환한다.
    pub(crate) fn respond(&mut self, id: u64, accepted: bool) -> Option<ModalResponse> {
        let index = self.stack.iter().position(|modal| modal.id == id)?;
        let modal = self.stack.remove(index);
        match modal.kind {
            ModalKind::Alert => None,
            ModalKind::Confirm(purpose) => Some(ModalResponse { purpose, accepted }),
        }
    }

    /// Esc 처리. 맨 위 모달을 취소로 닫는다.
    pub(crate) fn dismiss_top(&mut self) -> Option<ModalResponse> {
        let id = self.top()?.id;
        self.respond(id, false)
    }
}
