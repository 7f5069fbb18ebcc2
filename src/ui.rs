// UI layer: progress lines, JSON output, the spinner shown while polling a
// draft and the hidden password prompt. Everything that talks to the
// terminal lives here so the commands stay plain request sequences.

use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::api::{ApiError, DraftStatus};

/// Print one `[ok]` progress line.
pub fn ok(message: impl AsRef<str>) {
    println!("[ok] {}", message.as_ref());
}

/// Pretty-print a JSON-serialisable value on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ApiError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::UnexpectedResponse(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}

/// Ask for a password without echoing it. `None` if the prompt fails.
pub fn prompt_password(username: &str) -> Option<String> {
    Password::new()
        .with_prompt(format!("Password for {username}"))
        .interact()
        .ok()
}

/// Spinner on stderr while waiting for a draft. It is ticked once per poll,
/// so it never needs a background thread; indicatif hides it when stderr is
/// not a terminal.
pub struct PollSpinner {
    bar: ProgressBar,
}

impl PollSpinner {
    pub fn start(uuid: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(format!("Waiting for draft {uuid} to become ready..."));
        PollSpinner { bar }
    }

    pub fn update(&self, poll: u32, status: &DraftStatus) {
        self.bar.set_message(format!(
            "poll #{poll}: credentials_ready={}, trustees_ready={}",
            status.credentials_ready(),
            status.trustees_ready()
        ));
        self.bar.tick();
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
