use super::*;

impl AwakeningApp {
    /// 본 화면 레이아웃을 렌더링한다.
    pub(super) fn render_main(&mut self, ctx: &egui::Context) {
        let palette = *self.theme.palette();
        let decorations = *self.theme.decorations();
        let header_frame = egui::Frame {
            fill: palette.bg_panel,
            stroke: egui::Stroke::new(1.0, palette.border_soft),
            inner_margin: decorations.card_inner_margin,
            ..Default::default()
        };
        egui::TopBottomPanel::top("progress_header")
            .frame(header_frame)
            .resizable(false)
            .show(ctx, |ui| {
                self.render_header(ui);
                if self.show_effects_panel {
                    ui.separator();
                    self.render_effects_panel(ui);
                }
            });
        let sidebar_frame = egui::Frame {
            fill: palette.bg_sidebar,
            stroke: egui::Stroke::new(1.0, palette.border_soft),
            inner_margin: decorations.card_inner_margin,
            ..Default::default()
        };
        egui::SidePanel::left("protocol_steps")
            .resizable(false)
            .default_width(340.0)
            .frame(sidebar_frame)
            .show(ctx, |ui| {
                self.render_step_panel(ui);
            });
        let central_frame = egui::Frame {
            fill: palette.bg_main,
            inner_margin: egui::Margin::same(18.0),
            ..Default::default()
        };
        egui::CentralPanel::default()
            .frame(central_frame)
            .show(ctx, |ui| {
                if self.effects.borrow().cyber_grid_on() {
                    paint_grid(ui, palette.grid);
                }
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        self.render_step_form(ui);
                    });
            });
    }

    /// 전체 화면 인트로를 렌더링한다.
    pub(super) fn render_intro(&mut self, ctx: &egui::Context) {
        let Some(intro) = self.intro.clone() else {
            return;
        };
        let palette = *self.theme.palette();
        let now = self.now_ms;
        let mut skip = false;
        let mut enter = false;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().text(
                    egui::pos2(rect.max.x - 24.0, rect.min.y + 20.0),
                    egui::Align2::RIGHT_TOP,
                    intro.counter(),
                    egui::FontId::monospace(14.0),
                    palette.fg_text_secondary,
                );
                // 선언문이 바뀔 때 화면 전체가 짧게 번쩍인다.
                let progress = intro.statement_progress(now);
                if progress < 0.02 && self.effects.borrow().glitch_on() {
                    ui.painter().rect_filled(
                        rect,
                        egui::Rounding::ZERO,
                        egui::Color32::from_white_alpha(20),
                    );
                }
                ui.vertical_centered(|ui| {
                    ui.add_space(rect.height() * 0.35);
                    ui.label(
                        RichText::new(intro.current().text)
                            .size(30.0)
                            .color(palette.fg_text_primary)
                            .strong(),
                    );
                    ui.add_space(36.0);
                    if intro.enter_visible(now) {
                        if ui.add(PrimaryButton::new(&self.theme, "ENTER THE SYSTEM")).clicked() {
                            enter = true;
                        }
                    } else if ui
                        .add(
                            PrimaryButton::new(&self.theme, "SKIP SEQUENCE")
                                .fill(palette.border_soft),
                        )
                        .clicked()
                    {
                        skip = true;
                    }
                });
            });
        if skip {
            self.skip_intro();
        }
        if enter {
            self.enter_system();
        }
    }
}

/// 중앙 패널 배경에 사이버 그리드를 그린다.
fn paint_grid(ui: &egui::Ui, color: egui::Color32) {
    const CELL: f32 = 40.0;
    let rect = ui.max_rect();
    let painter = ui.painter();
    let stroke = egui::Stroke::new(1.0, color);
    let mut x = rect.min.x;
    while x <= rect.max.x {
        painter.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], stroke);
        x += CELL;
    }
    let mut y = rect.min.y;
    while y <= rect.max.y {
        painter.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], stroke);
        y += CELL;
    }
}
