impl super::EventExtractor {
    /// Pointer feedback for the plot. `x` is in plot seconds, `None` when the
    /// pointer is outside.
    pub fn handle_plot_pointer(&mut self, x: Option<f64>, clicked: bool) {
        let duration = self.duration_secs;
        if clicked {
            if let Some(shift) = x.and_then(|x| self.centering.click(x, duration)) {
                log::debug!("centering shift {shift}");
                self.shift_text = shift;
                self.position_text = self.centering.idle_label();
                return;
            }
        }
        self.position_text = self.centering.hover_label(x, duration);
    }
}
