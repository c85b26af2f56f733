use std::path::PathBuf;

use super::EventExtractor;

#[cfg(feature = "kittest")]
use std::collections::VecDeque;

pub const MSEED_EXTS: &[&str] = &["mseed", "miniseed", "ms"];

#[cfg(feature = "kittest")]
#[derive(Default)]
pub struct TestDialogQueue {
    files: VecDeque<Option<PathBuf>>,
}

#[cfg(feature = "kittest")]
impl TestDialogQueue {
    fn next_file(&mut self) -> Option<PathBuf> {
        self.files.pop_front().unwrap_or(None)
    }

    fn push_file(&mut self, path: Option<PathBuf>) {
        self.files.push_back(path);
    }
}

impl EventExtractor {
    pub(super) fn pick_mseed_dialog(&mut self) -> Option<PathBuf> {
        #[cfg(feature = "kittest")]
        {
            return self.test_dialogs.next_file();
        }
        #[cfg(not(feature = "kittest"))]
        {
            let dir = self.config.mseed_dir();
            let mut dialog = rfd::FileDialog::new()
                .set_title("Select an mseed file")
                .add_filter("MiniSEED", MSEED_EXTS)
                .add_filter("All", &["*"]);
            if dir.is_dir() {
                dialog = dialog.set_directory(&dir);
            } else {
                log::warn!("mseed directory {} does not exist", dir.display());
            }
            dialog.pick_file()
        }
    }

    /// Answer for the next "Open…" click; `None` behaves like a cancelled dialog.
    #[cfg(feature = "kittest")]
    pub fn test_queue_open_dialog(&mut self, path: Option<PathBuf>) {
        self.test_dialogs.push_file(path);
    }
}
