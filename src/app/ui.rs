use crate::engine::{Effect, EffectTarget, FieldValue, StepStatus};
use crate::protocol::FieldKind;
use crate::theme::blend_color;
use eframe::egui::{self, RichText};

use super::state::AwakeningApp;
use super::widgets::{PrimaryButton, StepCard, solid_section_header};

mod layout;
mod modal;
mod overlay;
mod panels;
mod status;

use status::{form_editable, glitch_jitter, status_indicator};

impl AwakeningApp {
    /// 한 프레임 전체를 그린다. 모달과 토스트는 항상 맨 위에 그린다.
    pub(super) fn render(&mut self, ctx: &egui::Context) {
        if self.intro.is_some() {
            self.render_intro(ctx);
        } else {
            self.render_main(ctx);
        }
        self.render_scanlines(ctx);
        self.render_toasts(ctx);
        self.render_modal(ctx);
    }
}
