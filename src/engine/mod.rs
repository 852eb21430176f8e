mod events;
mod persistence;
mod runner;
mod scheduler;
mod state;
mod validator;

pub use events::{Effect, EffectTarget, EngineEvent, Notice, NoticeLevel, Notifier};
pub use persistence::{FileStore, KeyValueStore, MemoryStore, ProgressStore};
pub use runner::{AwakeningEngine, CompleteOutcome, StartOutcome};
pub use state::StepStatus;
pub use validator::FieldValue;
