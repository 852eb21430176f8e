use super::*;
use crate::app::modal::ModalKind;

impl AwakeningApp {
    /// 맨 위 모달을 렌더링해 사용자 응답을 수집한다.
    pub(super) fn render_modal(&mut self, ctx: &egui::Context) {
        let Some(request) = self.modals.borrow().top().cloned() else {
            return;
        };
        let palette = *self.theme.palette();
        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("modal_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.allocate_rect(screen, egui::Sense::click());
                ui.painter().rect_filled(
                    screen,
                    egui::Rounding::ZERO,
                    egui::Color32::from_black_alpha(170),
                );
            });

        let mut answer = None;
        egui::Area::new(egui::Id::new(("modal", request.id)))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                egui::Frame::window(&ctx.style()).show(ui, |ui| {
                    ui.set_width(440.0);
                    ui.label(
                        RichText::new(&request.title)
                            .size(20.0)
                            .monospace()
                            .color(palette.accent_primary)
                            .strong(),
                    );
                    ui.add_space(10.0);
                    ui.label(RichText::new(&request.message).color(palette.fg_text_primary));
                    ui.add_space(16.0);
                    ui.horizontal(|ui| match request.kind {
                        ModalKind::Alert => {
                            if ui.add(PrimaryButton::new(&self.theme, "OK")).clicked() {
                                answer = Some(true);
                            }
                        }
                        ModalKind::Confirm(_) => {
                            if ui.add(PrimaryButton::new(&self.theme, "PROCEED")).clicked() {
                                answer = Some(true);
                            }
                            if ui
                                .add(
                                    PrimaryButton::new(&self.theme, "CANCEL")
                                        .fill(palette.border_soft),
                                )
                                .clicked()
                            {
                                answer = Some(false);
                            }
                        }
                    });
                });
            });
        if let Some(accepted) = answer {
            self.respond_modal(request.id, accepted);
        }
    }
}
