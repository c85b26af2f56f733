use egui::{Color32, RichText};

use crate::config::{DURATION_MAX_SECS, DURATION_MIN_SECS, DURATION_STEP_SECS};

impl crate::app::EventExtractor {
    pub(in crate::app) fn ui_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("mseed file:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.file_path_text)
                        .desired_width(360.0)
                        .interactive(false),
                );
                let busy = self.is_loading();
                if ui
                    .add_enabled(!busy, egui::Button::new("Open…"))
                    .clicked()
                {
                    self.open_file_clicked();
                }
            });
            ui.horizontal(|ui| {
                ui.label(RichText::new(&self.file_info_text).monospace());
                if let Some(msg) = self.loading_label() {
                    ui.add(egui::Spinner::new());
                    ui.label(RichText::new(msg).weak());
                }
            });
            ui.separator();
            egui::Grid::new("preview_params")
                .num_columns(4)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Start time (hh:mm:ss):");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.start_time_text)
                            .desired_width(110.0),
                    );
                    ui.label("Duration (s):");
                    ui.add(
                        egui::DragValue::new(&mut self.duration_secs)
                            .range(DURATION_MIN_SECS..=DURATION_MAX_SECS)
                            .speed(DURATION_STEP_SECS)
                            .fixed_decimals(1),
                    );
                    ui.end_row();

                    ui.label("Shift (s):");
                    ui.add(egui::TextEdit::singleline(&mut self.shift_text).desired_width(110.0));
                    ui.label("Channel:");
                    let options = self.channel_options();
                    egui::ComboBox::from_id_salt("channel")
                        .selected_text(self.channel.clone())
                        .show_ui(ui, |ui| {
                            for opt in options {
                                ui.selectable_value(&mut self.channel, opt.clone(), opt);
                            }
                        });
                    ui.end_row();
                });
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Preview").clicked() {
                    self.run_preview();
                }
                let center_btn = egui::Button::new(self.centering.button_text())
                    .selected(self.centering.is_active());
                if ui.add(center_btn).clicked() {
                    self.toggle_centering();
                }
                let quit = egui::Button::new(RichText::new("Quit").color(Color32::WHITE))
                    .fill(Color32::from_rgb(180, 40, 40));
                if ui.add(quit).clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                ui.separator();
                ui.label(RichText::new(&self.center_text).monospace());
                ui.separator();
                ui.label(RichText::new(&self.position_text).monospace());
            });
            ui.add_space(4.0);
        });
    }
}
