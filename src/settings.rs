use crate::protocol::{Protocol, load_protocol_from_file};
use std::path::PathBuf;

/// 프로토콜 YAML 경로를 지정하는 환경 변수이다.
pub const PROTOCOL_ENV: &str = "AWAKENING_PROTOCOL";
/// 저장 디렉터리를 지정하는 환경 변수이다.
pub const DATA_DIR_ENV: &str = "AWAKENING_DATA_DIR";
/// 인트로 시퀀스 생략 여부를 지정하는 환경 변수이다.
pub const SKIP_INTRO_ENV: &str = "AWAKENING_SKIP_INTRO";

/// 실행 시점에 한 번 읽는 애플리케이션 설정이다.
#[derive(Debug, Clone)]
pub struct Settings {
    /// 사용자 지정 프로토콜 경로. 없으면 내장 프로토콜을 쓴다.
    pub protocol_path: Option<PathBuf>,
    /// 진행 정보와 효과 설정을 저장할 디렉터리.
    pub data_dir: PathBuf,
    /// 인트로 시퀀스를 건너뛸지 여부.
    pub skip_intro: bool,
}

impl Settings {
    /// 프로세스 환경 변수에서 설정을 읽는다.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정을 구성한다.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let protocol_path = non_empty(PROTOCOL_ENV).map(PathBuf::from);
        let data_dir = non_empty(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let skip_intro = non_empty(SKIP_INTRO_ENV)
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self {
            protocol_path,
            data_dir,
            skip_intro,
        }
    }

    /// 설정에 맞는 프로토콜을 읽는다.
    pub fn load_protocol(&self) -> anyhow::Result<Protocol> {
        match &self.protocol_path {
            Some(path) => load_protocol_from_file(path),
            None => Ok(Protocol::builtin()),
        }
    }
}

/// 플랫폼 데이터 디렉터리 아래의 기본 저장 위치이다.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("awakening")
}
