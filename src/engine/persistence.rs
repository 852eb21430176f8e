use super::state::{CollectedValues, RuntimeState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// 진행 정보를 저장하는 키이다.
pub const PROGRESS_KEY: &str = "awakening_progress";

/// 파일 저장소가 사용하는 파일 이름이다.
const STORE_FILE_NAME: &str = "storage.json";

/// 키-값 저장소 접근 중 발생할 수 있는 오류이다.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 파일 입출력 실패.
    #[error("저장소 파일 입출력 실패 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 직렬화 실패 또는 저장소 파일 손상.
    #[error("저장소 직렬화 실패: {0}")]
    Serde(#[from] serde_json::Error),
}

/// 문자열 키와 문자열 값을 보관하는 단일 네임스페이스 저장소이다.
pub trait KeyValueStore {
    /// 값을 읽는다. 키가 없으면 `None`이다.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// 값을 쓴다.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// 항상 실패하는 저장소이다.
#[cfg(test)]
pub(super) struct BrokenStore;

#[cfg(test)]
impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(BrokenStore::error())
    }

    fn set(&mut self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(BrokenStore::error())
    }
}

#[cfg(test)]
impl BrokenStore {
    fn error() -> StoreError {
        StoreError::Io {
            path: PathBuf::from("broken"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
    }
}

/// 메모리 기반 저장소. 테스트와 저장 경로가 없는 환경에서 사용한다.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// 디렉터리 안의 JSON 파일 하나에 모든 키를 보관하는 저장소이다.
///
/// 호출마다 파일을 새로 읽으므로 같은 디렉터리를 가리키는 인스턴스 여러 개가
/// 한 스레드 안에서 번갈아 써도 서로의 키를 덮어쓰지 않는다.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// 디렉터리 경로로 저장소를 연다. 디렉터리는 첫 쓰기 때 만들어진다.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORE_FILE_NAME),
        }
    }

    /// 실제 저장 파일 경로이다.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }
}

/// 저장소에 기록되는 진행 정보 스냅샷이다.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    /// 완료된 Step 개수.
    pub completed_steps: u8,
    /// Step별 수집 값.
    pub step_data: CollectedValues,
    /// 마지막 저장 시각.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

/// 읽기 전용 느슨한 형태. 빠진 필드와 null을 기본값으로 받아들인다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default)]
    completed_steps: Option<u8>,
    #[serde(default)]
    step_data: Option<CollectedValues>,
    #[serde(default)]
    last_update: Option<DateTime<Utc>>,
}

/// 진행 정보를 키-값 저장소에 읽고 쓰는 어댑터이다.
pub struct ProgressStore {
    store: Box<dyn KeyValueStore>,
}

impl ProgressStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 메모리 저장소를 사용하는 어댑터를 만든다.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// 저장된 진행 정보를 읽는다.
    ///
    /// 값이 없거나 손상되었으면 빈 기록을 반환하며 실패로 취급하지 않는다.
    /// `step_count`를 넘는 완료 개수는 잘라내고 범위 밖 Step 데이터는 버린다.
    pub fn load(&self, step_count: u8) -> PersistedRecord {
        let text = match self.store.get(PROGRESS_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return PersistedRecord::default(),
            Err(err) => {
                tracing::error!(error = %err, "진행 정보 읽기 실패, 빈 상태로 시작합니다.");
                return PersistedRecord::default();
            }
        };
        let raw: RawRecord = match serde_json::from_str(&text) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "손상된 진행 정보를 무시합니다.");
                return PersistedRecord::default();
            }
        };
        let mut completed_steps = raw.completed_steps.unwrap_or(0);
        if completed_steps > step_count {
            tracing::warn!(
                completed_steps,
                step_count,
                "저장된 완료 개수가 Step 수를 넘어 잘라냅니다."
            );
            completed_steps = step_count;
        }
        let mut step_data = raw.step_data.unwrap_or_default();
        step_data.retain(|step, _| (1..=step_count).contains(step));
        PersistedRecord {
            completed_steps,
            step_data,
            last_update: raw.last_update,
        }
    }

    /// 현재 상태를 저장한다.
    ///
    /// 실패는 로그로만 남기며 메모리 상태가 세션의 기준으로 유지된다.
    pub fn save(&mut self, state: &RuntimeState) {
        let record = PersistedRecord {
            completed_steps: state.completed_steps,
            step_data: state.collected_values.clone(),
            last_update: Some(Utc::now()),
        };
        if let Err(err) = self.write(&record) {
            tracing::error!(error = %err, "진행 정보 저장 실패");
        }
    }

    fn write(&mut self, record: &PersistedRecord) -> Result<(), StoreError> {
        let body = serde_json::to_string(record)?;
        self.store.set(PROGRESS_KEY, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::validator::FieldValue;

    fn sample_state() -> RuntimeState {
        let mut values = CollectedValues::new();
        values
            .entry(1)
            .or_default()
            .insert("step1-q1".into(), FieldValue::from("phone"));
        values
            .entry(4)
            .or_default()
            .insert("step4-commitment".into(), FieldValue::Checked(true));
        RuntimeState::restored(2, values)
    }

    /// 저장 후 다시 읽으면 완료 개수와 수집 값이 같아야 한다.
    #[test]
    fn save_then_load_restores_progress() {
        let mut progress = ProgressStore::in_memory();
        let state = sample_state();
        progress.save(&state);
        let record = progress.load(4);
        assert_eq!(record.completed_steps, 2);
        assert_eq!(record.step_data, state.collected_values);
        assert!(record.last_update.is_some());
    }

    /// 저장 형식은 원래 키 이름과 문자열 Step 키를 사용한다.
    #[test]
    fn persisted_layout_uses_camel_case_keys() {
        let mut progress = ProgressStore::in_memory();
        progress.save(&sample_state());
        let body = progress
            .store
            .get(PROGRESS_KEY)
            .expect("읽기 실패")
            .expect("값 없음");
        let json: serde_json::Value = serde_json::from_str(&body).expect("JSON 파싱 실패");
        assert_eq!(json["completedSteps"], 2);
        assert_eq!(json["stepData"]["1"]["step1-q1"], "phone");
        assert_eq!(json["stepData"]["4"]["step4-commitment"], true);
        assert!(json["lastUpdate"].is_string());
    }

    /// 손상되었거나 없는 기록은 빈 기록으로 대체한다.
    #[test]
    fn malformed_or_missing_record_yields_default() {
        let progress = ProgressStore::in_memory();
        assert_eq!(progress.load(4), PersistedRecord::default());

        for body in ["not json", "{\"completedSteps\": -1}", "[1,2]", "{\"completedSteps\": \"two\"}"] {
            let mut store = MemoryStore::new();
            store.set(PROGRESS_KEY, body.into()).expect("쓰기 실패");
            let progress = ProgressStore::new(Box::new(store));
            assert_eq!(progress.load(4), PersistedRecord::default(), "body={body}");
        }
    }

    /// null 필드는 기본값으로, 범위를 넘는 값은 잘라서 읽는다.
    #[test]
    fn lenient_fields_are_normalized() {
        let mut store = MemoryStore::new();
        store
            .set(
                PROGRESS_KEY,
                r#"{"completedSteps": 9, "stepData": {"2": {"a": "x"}, "7": {"b": true}}}"#.into(),
            )
            .expect("쓰기 실패");
        let record = ProgressStore::new(Box::new(store)).load(4);
        assert_eq!(record.completed_steps, 4);
        assert_eq!(record.step_data.keys().copied().collect::<Vec<_>>(), vec![2]);

        let mut store = MemoryStore::new();
        store
            .set(PROGRESS_KEY, r#"{"completedSteps": null, "stepData": null}"#.into())
            .expect("쓰기 실패");
        let record = ProgressStore::new(Box::new(store)).load(4);
        assert_eq!(record, PersistedRecord::default());
    }

    /// 저장소 장애는 전파되지 않는다.
    #[test]
    fn broken_store_never_panics() {
        let mut progress = ProgressStore::new(Box::new(BrokenStore));
        progress.save(&sample_state());
        assert_eq!(progress.load(4), PersistedRecord::default());
    }

    /// 파일 저장소는 키별로 값을 보존하고 재시작 후에도 읽을 수 있다.
    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().expect("임시 디렉터리 생성 실패");
        let mut first = FileStore::open(dir.path().join("nested"));
        let mut second = first.clone();
        first.set("a", "1".into()).expect("쓰기 실패");
        second.set("b", "2".into()).expect("쓰기 실패");

        let reopened = FileStore::open(dir.path().join("nested"));
        assert_eq!(reopened.get("a").expect("읽기 실패").as_deref(), Some("1"));
        assert_eq!(reopened.get("b").expect("읽기 실패").as_deref(), Some("2"));

        first.set("a", "3".into()).expect("쓰기 실패");
        assert_eq!(reopened.get("a").expect("읽기 실패").as_deref(), Some("3"));
        assert_eq!(reopened.get("c").expect("읽기 실패"), None);
    }

    /// 손상된 저장 파일은 직렬화 오류로 보고된다.
    #[test]
    fn corrupt_file_store_reports_error() {
        let dir = tempfile::tempdir().expect("임시 디렉터리 생성 실패");
        let store = FileStore::open(dir.path());
        fs::write(store.path(), "{oops").expect("파일 작성 실패");
        assert!(matches!(store.get("a"), Err(StoreError::Serde(_))));
        let progress = ProgressStore::new(Box::new(store));
        assert_eq!(progress.load(4), PersistedRecord::default());
    }
}
