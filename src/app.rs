mod effects;
mod intro;
mod modal;
mod state;
mod toast;
mod ui;
mod widgets;

pub use state::AwakeningApp;

use eframe::egui;
use std::time::Duration;

/// 타이머 기반 연출이 부드럽게 보이도록 주기적으로 다시 그린다.
const REPAINT_INTERVAL: Duration = Duration::from_millis(50);

impl eframe::App for AwakeningApp {
    /// 매 프레임 시각을 진행시키고 화면을 그린다.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick(self.elapsed_ms());
        let modal_open = self.modals.borrow().is_open();
        if modal_open && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.dismiss_top_modal();
        }
        self.render(ctx);
        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
