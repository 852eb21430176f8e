use super::*;

/// 스캔라인 간격(px)이다.
const SCANLINE_GAP: f32 = 4.0;
const TOAST_WIDTH: f32 = 320.0;

impl AwakeningApp {
    /// 우측 상단에 토스트 알림을 쌓아 그린다.
    pub(super) fn render_toasts(&mut self, ctx: &egui::Context) {
        let palette = *self.theme.palette();
        let toasts = self.toasts.borrow().visible().to_vec();
        if toasts.is_empty() {
            return;
        }
        let now = self.toasts.borrow().now();
        let waiting = self.toasts.borrow().waiting_len();
        let mut dismissed = None;
        egui::Area::new(egui::Id::new("toast_stack"))
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .show(ctx, |ui| {
                ui.set_width(TOAST_WIDTH);
                ui.spacing_mut().item_spacing.y = 8.0;
                for toast in &toasts {
                    let accent = self.theme.notice_color(toast.notice.level);
                    egui::Frame::none()
                        .fill(palette.bg_panel)
                        .stroke(egui::Stroke::new(1.0, accent))
                        .inner_margin(egui::Margin::same(10.0))
                        .rounding(egui::Rounding::same(self.theme.decorations().card_rounding))
                        .show(ui, |ui| {
                            ui.set_width(TOAST_WIDTH - 20.0);
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(&toast.notice.title)
                                        .monospace()
                                        .strong()
                                        .color(accent),
                                );
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui.small_button("×").clicked() {
                                            dismissed = Some(toast.id);
                                        }
                                    },
                                );
                            });
                            ui.label(
                                RichText::new(&toast.notice.message)
                                    .color(palette.fg_text_primary),
                            );
                            if !toast.notice.persistent {
                                let (bar, _) = ui.allocate_exact_size(
                                    egui::vec2(ui.available_width(), 3.0),
                                    egui::Sense::hover(),
                                );
                                let mut remaining = bar;
                                remaining.set_width(bar.width() * toast.remaining_ratio(now));
                                ui.painter().rect_filled(bar, egui::Rounding::ZERO, palette.border_soft);
                                ui.painter().rect_filled(remaining, egui::Rounding::ZERO, accent);
                            }
                        });
                }
                if waiting > 0 {
                    ui.label(
                        RichText::new(format!("+{waiting} QUEUED"))
                            .monospace()
                            .small()
                            .color(palette.fg_text_secondary),
                    );
                }
            });
        if let Some(id) = dismissed {
            self.toasts.borrow_mut().dismiss(id);
        }
    }

    /// 화면 전체에 스캔라인 오버레이를 그린다.
    pub(super) fn render_scanlines(&self, ctx: &egui::Context) {
        if !self.effects.borrow().scanlines_on() {
            return;
        }
        let color = self.theme.palette().scanline;
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("scanlines"),
        ));
        let rect = ctx.screen_rect();
        let mut y = rect.min.y;
        while y < rect.max.y {
            painter.hline(rect.x_range(), y, egui::Stroke::new(1.0, color));
            y += SCANLINE_GAP;
        }
    }
}
