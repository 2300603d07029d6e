//! Terminal implementations of the platform ports plus small output helpers for the
//! `leakhere` binary.

pub mod files;
pub mod session_store;
pub mod terminal;

pub use files::load_selected_file;
pub use session_store::FileSessionStore;
pub use terminal::{Osc52Clipboard, TerminalNotifier, UnavailableShareSheet};

/// Truncate to `max_len` characters, ending with "..." when shortened.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Initialize tracing for the CLI. Logs go to stderr so JSON output stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,leakhere=info")),
        )
        .init();
}
