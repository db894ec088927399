use std::sync::Mutex;

use indicatif::ProgressBar;

use crate::api::VideoFormat;

/// Shown in the quality list when a lookup failed or returned nothing.
pub const NO_FORMATS_PLACEHOLDER: &str = "No hay formatos disponibles";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchInfo,
    Download,
}

/// The three visual states of the status area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
    Info,
}

/// Presentation port. The controller drives one of these instead of
/// touching any rendering surface directly, so the control logic stays
/// testable without a terminal.
pub trait Presenter: Send + Sync {
    /// Busy-state change for one operation; `false` restores the
    /// default, interactive state.
    fn set_busy(&self, operation: Operation, busy: bool);

    fn show_status(&self, kind: StatusKind, message: &str);

    /// Repopulates the selectable quality list.
    fn show_formats(&self, title: &str, formats: &[VideoFormat]);

    /// Resets the quality list to its placeholder.
    fn clear_formats(&self);

    fn download_progress(&self, downloaded: u64, total: Option<u64>);
}

/// Terminal presenter: status lines on stdout, download progress as an
/// indicatif bar (spinner when the payload size is unknown).
pub struct ConsolePresenter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl Default for ConsolePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for ConsolePresenter {
    fn set_busy(&self, operation: Operation, busy: bool) {
        if operation == Operation::Download && !busy {
            if let Ok(mut bar) = self.bar.lock() {
                if let Some(bar) = bar.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }

    fn show_status(&self, kind: StatusKind, message: &str) {
        match kind {
            StatusKind::Success => println!("✅ {}", message),
            StatusKind::Error => eprintln!("❌ {}", message),
            StatusKind::Info => println!("ℹ️  {}", message),
        }
    }

    fn show_formats(&self, title: &str, formats: &[VideoFormat]) {
        println!("🎬 {}", title);
        for format in formats {
            println!("  {:>8}  {}", format.format_id, format.label());
        }
    }

    fn clear_formats(&self) {
        println!("{}", NO_FORMATS_PLACEHOLDER);
    }

    fn download_progress(&self, downloaded: u64, total: Option<u64>) {
        if let Ok(mut slot) = self.bar.lock() {
            let bar = slot.get_or_insert_with(|| match total {
                Some(total) => ProgressBar::new(total),
                None => ProgressBar::new_spinner(),
            });
            bar.set_position(downloaded);
        }
    }
}
