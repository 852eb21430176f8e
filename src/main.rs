#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod engine;
mod protocol;
mod settings;
mod theme;

use app::AwakeningApp;
use eframe::egui;
use engine::{FileStore, KeyValueStore, MemoryStore};
use protocol::Protocol;
use settings::Settings;
use tracing_subscriber::EnvFilter;

/// egui 애플리케이션을 초기화하고 실행하는 진입점입니다.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env();
    // 사용자 프로토콜을 읽지 못하면 내장 프로토콜로 계속 진행한다.
    let protocol = settings.load_protocol().unwrap_or_else(|err| {
        tracing::error!(error = %format!("{err:#}"), "프로토콜 로드 실패, 내장 프로토콜 사용");
        Protocol::builtin()
    });
    tracing::info!(
        data_dir = %settings.data_dir.display(),
        steps = protocol.step_count(),
        "각성 프로토콜 시작"
    );

    // 저장 디렉터리를 만들 수 없으면 이번 세션은 메모리에만 기록한다.
    match std::fs::create_dir_all(&settings.data_dir) {
        Ok(()) => {
            let store = FileStore::open(&settings.data_dir);
            tracing::info!(path = %store.path().display(), "진행 정보 저장 파일");
            launch(protocol, store, settings.skip_intro, true)
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                data_dir = %settings.data_dir.display(),
                "저장 디렉터리 생성 실패, 메모리 저장소 사용"
            );
            launch(protocol, MemoryStore::new(), settings.skip_intro, false)
        }
    }
}

/// 주어진 저장소로 egui 창을 띄운다. `durable`이 거짓이면 저장 불가 경고를 고정으로 띄운다.
fn launch(
    protocol: Protocol,
    store: impl KeyValueStore + Clone + 'static,
    skip_intro: bool,
    durable: bool,
) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_app_id("The Awakening")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "The Awakening",
        native_options,
        Box::new(move |cc| {
            let mut app = AwakeningApp::new(cc, protocol, store, skip_intro);
            if !durable {
                app.report_volatile_storage();
            }
            Box::new(app)
        }),
    )
}
