//! Notices, clipboard and share sheet for a terminal session.

use std::io::Write;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use leakhere_core::ports::{Clipboard, Notice, NoticeLevel, Notifier, ShareError, ShareSheet};

/// Prints notices to stderr, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn format(notice: &Notice) -> String {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        format!("[{tag}] {}", notice.message)
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", Self::format(&notice));
    }
}

/// Sets the system clipboard through the OSC 52 escape sequence, which most terminal
/// emulators (and tmux with `set-clipboard on`) forward to the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    pub fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
    }
}

#[async_trait]
impl Clipboard for Osc52Clipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(Self::sequence(text).as_bytes())?;
        stderr.flush()?;
        Ok(())
    }
}

/// Terminals have no native share sheet; sharing falls back to the clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableShareSheet;

#[async_trait]
impl ShareSheet for UnavailableShareSheet {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _title: &str, _url: &str) -> Result<(), ShareError> {
        Err(ShareError::Failed("no share sheet in a terminal".to_string()))
    }
}
