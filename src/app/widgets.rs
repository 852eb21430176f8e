use crate::theme::{Theme, blend_color};
use eframe::egui::{self, Color32, RichText, Widget};

/// 단색 배경과 일정한 간격을 제공하는 기본 버튼 위젯.
pub(super) struct PrimaryButton<'a> {
    theme: &'a Theme,
    label: &'a str,
    fill: Option<Color32>,
}

impl<'a> PrimaryButton<'a> {
    pub(super) fn new(theme: &'a Theme, label: &'a str) -> Self {
        Self {
            theme,
            label,
            fill: None,
        }
    }

    /// 배경색을 바꾼다. 글리치 중인 버튼 표시에 쓴다.
    pub(super) fn fill(mut self, fill: Color32) -> Self {
        self.fill = Some(fill);
        self
    }
}

impl<'a> Widget for PrimaryButton<'a> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let decorations = self.theme.decorations();
        let palette = self.theme.palette();
        let enabled = ui.is_enabled();

        let rich = RichText::new(self.label)
            .size(15.0)
            .strong()
            .monospace()
            .color(if enabled {
                palette.bg_main
            } else {
                blend_color(palette.fg_text_secondary, palette.bg_panel, 0.4)
            });

        let base_fill = self.fill.unwrap_or(palette.accent_primary);
        let fill = if enabled {
            base_fill
        } else {
            blend_color(base_fill, palette.border_soft, 0.7)
        };
        let button = egui::Button::new(rich)
            .min_size(egui::vec2(decorations.button_min_width, decorations.button_height))
            .rounding(egui::Rounding::same(decorations.button_rounding))
            .fill(fill);
        let response = ui.add(button);

        // 비활성 버튼은 금지 커서로 표시한다.
        let cursor = if enabled {
            egui::CursorIcon::PointingHand
        } else {
            egui::CursorIcon::NotAllowed
        };
        response.on_hover_cursor(cursor)
    }
}

/// 좌측 Step 목록에 쓰는 카드 위젯.
pub(super) struct StepCard<'a> {
    theme: &'a Theme,
    ordinal: u8,
    title: &'a str,
    summary: Option<&'a str>,
    status_text: &'a str,
    status_color: Color32,
    selected: bool,
    jitter: f32,
}

impl<'a> StepCard<'a> {
    pub(super) fn new(theme: &'a Theme, ordinal: u8, title: &'a str) -> Self {
        Self {
            theme,
            ordinal,
            title,
            summary: None,
            status_text: "",
            status_color: theme.locked,
            selected: false,
            jitter: 0.0,
        }
    }

    pub(super) fn summary(mut self, summary: Option<&'a str>) -> Self {
        self.summary = summary;
        self
    }

    pub(super) fn status(mut self, text: &'a str, color: Color32) -> Self {
        self.status_text = text;
        self.status_color = color;
        self
    }

    pub(super) fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// 글리치 연출용 가로 흔들림 폭이다.
    pub(super) fn jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }
}

impl<'a> Widget for StepCard<'a> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let palette = self.theme.palette();
        let decorations = self.theme.decorations();
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(ui.available_width(), 78.0), egui::Sense::click());
        if ui.is_rect_visible(rect) {
            let rect = rect.translate(egui::vec2(self.jitter, 0.0));
            let fill = if self.selected {
                palette.bg_panel
            } else {
                palette.bg_sidebar
            };
            let stroke = if self.selected || response.hovered() {
                self.status_color
            } else {
                palette.border_soft
            };
            let painter = ui.painter();
            painter.rect(
                rect,
                egui::Rounding::same(decorations.card_rounding),
                fill,
                egui::Stroke::new(1.5, stroke),
            );
            let indicator =
                egui::Rect::from_min_max(rect.min, egui::pos2(rect.min.x + 4.0, rect.max.y));
            painter.rect_filled(indicator, egui::Rounding::ZERO, self.status_color);

            let left = rect.min.x + 18.0;
            painter.text(
                egui::pos2(left, rect.min.y + 12.0),
                egui::Align2::LEFT_TOP,
                format!("STEP {:02} // {}", self.ordinal, self.title.to_uppercase()),
                egui::FontId::monospace(15.0),
                palette.fg_text_primary,
            );
            if let Some(summary) = self.summary {
                painter.text(
                    egui::pos2(left, rect.min.y + 34.0),
                    egui::Align2::LEFT_TOP,
                    summary,
                    egui::FontId::proportional(12.5),
                    palette.fg_text_secondary,
                );
            }
            painter.text(
                egui::pos2(left, rect.max.y - 10.0),
                egui::Align2::LEFT_BOTTOM,
                self.status_text,
                egui::FontId::monospace(12.0),
                self.status_color,
            );
        }
        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    }
}

/// 단색 헤더를 그려 정보 영역의 시각적 위계를 만든다.
pub(super) fn solid_section_header(ui: &mut egui::Ui, theme: &Theme, title: &str) {
    let decorations = theme.decorations();
    let palette = theme.palette();
    let size = egui::vec2(ui.available_width(), decorations.header_height);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    ui.painter().rect(
        rect,
        egui::Rounding::same(decorations.container_rounding),
        decorations.header_fill,
        egui::Stroke::new(1.0, blend_color(decorations.header_fill, palette.accent_primary, 0.3)),
    );
    ui.painter().text(
        egui::pos2(rect.min.x + 14.0, rect.center().y),
        egui::Align2::LEFT_CENTER,
        format!("> {title}"),
        egui::FontId::monospace(16.0),
        decorations.header_text,
    );
}
