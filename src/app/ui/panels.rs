use super::*;

/// Step 폼에서 한 프레임 동안 모인 입력 변경이다.
struct FieldEdit {
    id: String,
    value: FieldValue,
}

impl AwakeningApp {
    /// 상단 진행 헤더를 그린다.
    pub(super) fn render_header(&mut self, ui: &mut egui::Ui) {
        let palette = *self.theme.palette();
        let percent = self.engine.progress_percent();
        let completed = self.engine.completed_steps();
        let total = self.engine.protocol().step_count();
        let level = self.engine.consciousness_level();
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(self.engine.protocol().title.to_uppercase())
                    .size(22.0)
                    .monospace()
                    .strong()
                    .color(palette.accent_primary),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let toggle_label = if self.show_effects_panel {
                    "EFFECTS ▲"
                } else {
                    "EFFECTS ▼"
                };
                if ui.button(RichText::new(toggle_label).monospace()).clicked() {
                    self.show_effects_panel = !self.show_effects_panel;
                }
                ui.add_space(12.0);
                ui.label(
                    RichText::new(format!("SYSTEM: {}", self.system_status))
                        .monospace()
                        .color(palette.fg_text_secondary),
                );
            });
        });
        ui.add_space(8.0);
        let bar_fill = match self.effects.borrow().effect_on(EffectTarget::Progress) {
            Some(Effect::IntenseGlitch) => palette.accent_danger,
            Some(Effect::Glitch) => blend_color(palette.accent_primary, palette.accent_danger, 0.5),
            None => palette.accent_primary,
        };
        ui.add(
            egui::ProgressBar::new(f32::from(percent) / 100.0)
                .fill(bar_fill)
                .text(RichText::new(format!("{percent}%")).monospace()),
        );
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("STEPS COMPLETED: {completed}/{total}"))
                    .monospace()
                    .color(palette.fg_text_secondary),
            );
            ui.add_space(24.0);
            ui.label(
                RichText::new(format!("CONSCIOUSNESS LEVEL: {}", level.label()))
                    .monospace()
                    .color(self.theme.counter_color(usize::from(completed), usize::from(total))),
            );
        });
    }

    /// 시각 효과 토글 패널을 그린다.
    pub(super) fn render_effects_panel(&mut self, ui: &mut egui::Ui) {
        let prefs = self.effects.borrow().preferences();
        ui.horizontal_wrapped(|ui| {
            let mut enabled = prefs.enabled;
            if ui.checkbox(&mut enabled, "ALL EFFECTS").changed() {
                let mut effects = self.effects.borrow_mut();
                if enabled {
                    effects.enable_all();
                } else {
                    effects.disable_all();
                }
            }
            ui.add_enabled_ui(prefs.enabled, |ui| {
                let mut glitch = prefs.glitch;
                if ui.checkbox(&mut glitch, "GLITCH").changed() {
                    self.effects.borrow_mut().toggle_glitch(Some(glitch));
                }
                let mut scanlines = prefs.scanlines;
                if ui.checkbox(&mut scanlines, "SCANLINES").changed() {
                    self.effects.borrow_mut().toggle_scanlines(Some(scanlines));
                }
                let mut grid = prefs.cyber_grid;
                if ui.checkbox(&mut grid, "CYBER GRID").changed() {
                    self.effects.borrow_mut().toggle_cyber_grid(Some(grid));
                }
            });
        });
    }

    /// 좌측 Step 카드 목록을 그린다.
    pub(super) fn render_step_panel(&mut self, ui: &mut egui::Ui) {
        let palette = *self.theme.palette();
        solid_section_header(ui, &self.theme, "PROTOCOL STEPS");
        ui.add_space(12.0);
        ui.spacing_mut().item_spacing.y = 12.0;

        let focused = self.engine.state().current_step_in_focus;
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (step, definition) in self.engine.protocol().iter() {
                    let status = self.engine.step_status(step);
                    let status_color = if self.engine.is_blocked(step) {
                        palette.accent_danger
                    } else {
                        self.theme.status_color(status)
                    };
                    let status_text = if self.engine.is_blocked(step) {
                        "[ACCESS DENIED]"
                    } else if self.engine.is_unlocking(step) {
                        "[UNLOCKING...]"
                    } else {
                        status_indicator(status)
                    };
                    let effect = self.effects.borrow().effect_on(EffectTarget::StepCard(step));
                    let response = ui.add(
                        StepCard::new(&self.theme, step, &definition.name)
                            .summary(definition.summary.as_deref())
                            .status(status_text, status_color)
                            .selected(focused == step)
                            .jitter(glitch_jitter(effect, self.now_ms)),
                    );
                    if response.clicked() {
                        clicked = Some(step);
                    }
                }
            });
        if let Some(step) = clicked {
            self.open_step(step);
        }
    }

    /// 열린 Step의 입력 폼을 그린다.
    pub(super) fn render_step_form(&mut self, ui: &mut egui::Ui) {
        let palette = *self.theme.palette();
        let step = self.engine.state().current_step_in_focus;
        let Some(definition) = self.engine.protocol().step(step).cloned() else {
            ui.add_space(40.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("SELECT AN AVAILABLE STEP TO BEGIN.")
                        .monospace()
                        .color(palette.fg_text_secondary)
                        .italics(),
                );
            });
            return;
        };
        let status = self.engine.step_status(step);
        let validation = self.engine.last_validation(step).cloned();
        let incomplete = self.engine.is_incomplete_attempt(step);
        let editable = form_editable(status);

        solid_section_header(
            ui,
            &self.theme,
            &format!("STEP {step:02} // {}", definition.name.to_uppercase()),
        );
        ui.add_space(10.0);
        if let Some(summary) = &definition.summary {
            ui.label(RichText::new(summary).color(palette.fg_text_secondary));
            ui.add_space(10.0);
        }

        let mut edits = Vec::new();
        let mut focused_now = false;
        for field in &definition.required_fields {
            let field_valid = validation
                .as_ref()
                .and_then(|validation| validation.is_field_valid(&field.id));
            let mark_color = match field_valid {
                Some(true) => self.theme.completed,
                Some(false) if incomplete => palette.accent_danger,
                _ => palette.fg_text_secondary,
            };
            let response = match field.kind {
                FieldKind::Checkbox => {
                    let mut checked = self.engine.inputs().checked(&field.id);
                    let response = ui.add_enabled(
                        editable,
                        egui::Checkbox::new(
                            &mut checked,
                            RichText::new(&field.label).color(palette.fg_text_primary),
                        ),
                    );
                    if response.changed() {
                        edits.push(FieldEdit {
                            id: field.id.clone(),
                            value: FieldValue::Checked(checked),
                        });
                    }
                    response
                }
                FieldKind::ShortText | FieldKind::LongText => {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&field.label).color(palette.fg_text_primary));
                        if field.min_length() > 0 {
                            ui.label(
                                RichText::new(format!("(min {})", field.min_length()))
                                    .small()
                                    .color(mark_color),
                            );
                        }
                    });
                    let mut text = self.engine.inputs().text(&field.id).to_string();
                    let editor = if field.kind == FieldKind::LongText {
                        egui::TextEdit::multiline(&mut text).desired_rows(3)
                    } else {
                        egui::TextEdit::singleline(&mut text)
                    };
                    let response = ui.add(
                        editor
                            .desired_width(f32::INFINITY)
                            .interactive(editable),
                    );
                    if response.changed() {
                        edits.push(FieldEdit {
                            id: field.id.clone(),
                            value: FieldValue::Text(text),
                        });
                    }
                    response
                }
            };
            if self.focus_field.as_deref() == Some(field.id.as_str()) {
                response.request_focus();
                response.scroll_to_me(Some(egui::Align::Center));
                focused_now = true;
            }
            ui.add_space(8.0);
        }
        if focused_now {
            self.focus_field = None;
        }
        for edit in edits {
            self.edit_field(&edit.id, edit.value);
        }

        ui.add_space(8.0);
        if let Some(validation) = self.engine.last_validation(step) {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(validation.counter_label())
                        .monospace()
                        .color(
                            self.theme
                                .counter_color(validation.valid_count, validation.total_count),
                        ),
                );
            });
            ui.add(egui::ProgressBar::new(validation.ratio()).fill(self.theme.status_color(status)));
        }
        ui.add_space(14.0);

        let ready = self.engine.is_complete_enabled(step);
        let mut fill = if ready {
            self.theme.completed
        } else {
            blend_color(palette.accent_primary, palette.bg_panel, 0.55)
        };
        if let Some(effect) = self.effects.borrow().effect_on(EffectTarget::CompleteButton(step)) {
            let amount = if effect == Effect::IntenseGlitch { 0.8 } else { 0.5 };
            fill = blend_color(fill, palette.accent_danger, amount);
        }
        let mut complete = false;
        let mut close = false;
        ui.horizontal(|ui| {
            let label = if status == StepStatus::Completed {
                "COMPLETED"
            } else {
                "COMPLETE STEP"
            };
            let response = ui.add_enabled(
                status == StepStatus::Active,
                PrimaryButton::new(&self.theme, label).fill(fill),
            );
            if response.clicked() {
                complete = true;
            }
            if ui
                .add(PrimaryButton::new(&self.theme, "CLOSE").fill(palette.border_soft))
                .clicked()
            {
                close = true;
            }
        });
        if complete {
            self.submit_step(step);
        }
        if close {
            self.close_step();
        }
    }
}
