use crate::engine::{NoticeLevel, StepStatus};
use eframe::egui::{self, Color32};

include!(concat!(env!("OUT_DIR"), "/custom_font.rs"));

/// 화면 전체에서 쓰는 색상표이다.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_main: Color32,
    pub bg_panel: Color32,
    pub bg_sidebar: Color32,
    pub border_soft: Color32,
    pub fg_text_primary: Color32,
    pub fg_text_secondary: Color32,
    pub accent_primary: Color32,
    pub accent_danger: Color32,
    pub scanline: Color32,
    pub grid: Color32,
}

/// 모서리, 여백 등 장식 수치이다.
#[derive(Debug, Clone, Copy)]
pub struct Decorations {
    pub card_rounding: f32,
    pub container_rounding: f32,
    pub button_rounding: f32,
    pub button_height: f32,
    pub button_min_width: f32,
    pub header_height: f32,
    pub header_fill: Color32,
    pub header_text: Color32,
    pub card_inner_margin: egui::Margin,
}

/// UI 전체에서 참조할 공통 테마 정보.
pub struct Theme {
    palette: Palette,
    decorations: Decorations,
    /// 잠긴 Step 색상.
    pub locked: Color32,
    /// 진행 가능한 Step 색상.
    pub active: Color32,
    /// 완료된 Step 색상.
    pub completed: Color32,
    /// 경고 색상.
    pub warning: Color32,
}

impl Default for Theme {
    /// 터미널 느낌의 어두운 녹색 테마를 정의한다.
    fn default() -> Self {
        let palette = Palette {
            bg_main: Color32::from_rgb(6, 10, 8),
            bg_panel: Color32::from_rgb(12, 20, 16),
            bg_sidebar: Color32::from_rgb(9, 15, 12),
            border_soft: Color32::from_rgb(28, 56, 40),
            fg_text_primary: Color32::from_rgb(200, 255, 220),
            fg_text_secondary: Color32::from_rgb(110, 160, 130),
            accent_primary: Color32::from_rgb(0, 200, 110),
            accent_danger: Color32::from_rgb(255, 40, 90),
            scanline: Color32::from_rgba_unmultiplied(0, 0, 0, 60),
            grid: Color32::from_rgba_unmultiplied(0, 255, 140, 14),
        };
        Self {
            decorations: Decorations {
                card_rounding: 4.0,
                container_rounding: 2.0,
                button_rounding: 2.0,
                button_height: 32.0,
                button_min_width: 140.0,
                header_height: 38.0,
                header_fill: Color32::from_rgb(14, 32, 22),
                header_text: palette.accent_primary,
                card_inner_margin: egui::Margin::symmetric(14.0, 10.0),
            },
            palette,
            locked: Color32::from_rgb(90, 100, 95),
            active: Color32::from_rgb(0, 220, 255),
            completed: Color32::from_rgb(0, 230, 120),
            warning: Color32::from_rgb(255, 190, 40),
        }
    }
}

impl Theme {
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    /// egui Context에 테마 기반 스타일을 적용한다.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.window_rounding = egui::Rounding::same(self.decorations.card_rounding);
        visuals.window_fill = self.palette.bg_panel;
        visuals.panel_fill = self.palette.bg_main;
        visuals.extreme_bg_color = Color32::from_rgb(4, 8, 6);
        visuals.widgets.inactive.bg_fill = self.palette.bg_sidebar;
        visuals.selection.bg_fill = self.palette.border_soft;
        visuals.override_text_color = Some(self.palette.fg_text_primary);
        ctx.set_visuals(visuals);
        install_custom_font(ctx);
    }

    /// StepStatus에 대응하는 색상을 반환한다.
    pub fn status_color(&self, status: StepStatus) -> Color32 {
        match status {
            StepStatus::Locked => self.locked,
            StepStatus::Active => self.active,
            StepStatus::Completed => self.completed,
        }
    }

    /// 알림 종류에 대응하는 색상을 반환한다.
    pub fn notice_color(&self, level: NoticeLevel) -> Color32 {
        match level {
            NoticeLevel::Info => self.active,
            NoticeLevel::Success => self.completed,
            NoticeLevel::Warning => self.warning,
            NoticeLevel::Error => self.palette.accent_danger,
            NoticeLevel::System => self.palette.accent_primary,
        }
    }

    /// 유효 필드 수에 따른 카운터 색상이다.
    pub fn counter_color(&self, valid: usize, total: usize) -> Color32 {
        if valid == 0 {
            self.palette.accent_danger
        } else if valid < total {
            self.warning
        } else {
            self.completed
        }
    }
}

/// 두 색을 `t` 비율로 섞는다.
pub fn blend_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (f32::from(x) * (1.0 - t) + f32::from(y) * t).round() as u8;
    Color32::from_rgba_unmultiplied(
        mix(a.r(), b.r()),
        mix(a.g(), b.g()),
        mix(a.b(), b.b()),
        mix(a.a(), b.a()),
    )
}

/// build.rs에서 찾은 고정폭 폰트를 egui에 등록한다.
pub fn install_custom_font(ctx: &egui::Context) {
    if let Some(bytes) = embedded_font_bytes() {
        let mut fonts = egui::FontDefinitions::default();
        fonts
            .font_data
            .insert("terminal".into(), egui::FontData::from_static(bytes));
        fonts
            .families
            .entry(egui::FontFamily::Proportional)
            .or_default()
            .insert(0, "terminal".into());
        fonts
            .families
            .entry(egui::FontFamily::Monospace)
            .or_default()
            .insert(0, "terminal".into());
        ctx.set_fonts(fonts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 혼합 비율 양 끝은 원래 색이다.
    #[test]
    fn blend_endpoints() {
        let a = Color32::from_rgb(0, 0, 0);
        let b = Color32::from_rgb(200, 100, 50);
        assert_eq!(blend_color(a, b, 0.0), a);
        assert_eq!(blend_color(a, b, 1.0), b);
        assert_eq!(blend_color(a, b, 0.5), Color32::from_rgb(100, 50, 25));
    }

    /// 카운터 색상은 0개, 일부, 전부 세 구간으로 나뉜다.
    #[test]
    fn counter_color_bands() {
        let theme = Theme::default();
        assert_eq!(theme.counter_color(0, 3), theme.palette().accent_danger);
        assert_eq!(theme.counter_color(1, 3), theme.warning);
        assert_eq!(theme.counter_color(3, 3), theme.completed);
    }
}
