use egui::{Color32, RichText};
use egui_plot::{Corner, Legend, Line, Plot, VLine};

impl crate::app::EventExtractor {
    pub(in crate::app) fn ui_plot_area(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(plot) = self.plot.as_mut() else {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("Open a file and press Preview.").weak());
                });
                return;
            };
            ui.vertical_centered(|ui| {
                ui.heading(&plot.title);
            });
            let duration = plot.duration;
            let reset = std::mem::take(&mut plot.reset_bounds);
            let traces = &plot.traces;
            let (x, clicked) = Plot::new("segment_plot")
                .legend(Legend::default().position(Corner::RightTop))
                .x_axis_label("Time (s)")
                .y_axis_label("Amplitude")
                .include_x(0.0)
                .include_x(duration)
                .show(ui, |plot_ui| {
                    if reset {
                        plot_ui.set_plot_bounds_x(0.0..=duration);
                    }
                    for tr in traces {
                        plot_ui.line(Line::new(tr.label.clone(), tr.points.clone()));
                    }
                    plot_ui.vline(
                        VLine::new("", duration / 2.0)
                            .color(Color32::RED)
                            .width(1.0),
                    );
                    let x = plot_ui.pointer_coordinate().map(|p| p.x);
                    (x, plot_ui.response().clicked())
                })
                .inner;
            self.handle_plot_pointer(x, clicked);
        });
    }
}
