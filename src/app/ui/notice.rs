use egui::{Color32, RichText};

use crate::app::types::NoticeLevel;

impl crate::app::EventExtractor {
    /// Modal notice; the rest of the window ignores input until OK is pressed.
    pub(in crate::app) fn ui_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notice.clone() else {
            return;
        };
        let modal = egui::Modal::new(egui::Id::new("notice_modal")).show(ctx, |ui| {
            ui.set_min_width(260.0);
            ui.heading(&notice.title);
            let color = match notice.level {
                NoticeLevel::Warning => Color32::from_rgb(240, 190, 80),
                NoticeLevel::Error => Color32::from_rgb(235, 90, 80),
            };
            ui.label(RichText::new(&notice.message).color(color));
            ui.add_space(6.0);
            ui.vertical_centered(|ui| ui.button("OK").clicked()).inner
        });
        if modal.inner {
            self.dismiss_notice();
        }
    }
}
