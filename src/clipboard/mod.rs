//! Copying assistant replies to the system clipboard.

use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::models::{Message, Role};

/// Largest reply we hand to the clipboard (1MB)
const MAX_CLIPBOARD_BYTES: usize = 1024 * 1024;

/// Seam over the system clipboard so the copy flow can be tested headless
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

/// The newest assistant message, if any
pub fn latest_reply(messages: &[Message]) -> Option<&str> {
    messages.iter().rev().find(|m| m.role == Role::Assistant).map(|m| m.content.as_str())
}

fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Nothing to copy");
    }
    if text.len() > MAX_CLIPBOARD_BYTES {
        anyhow::bail!(
            "Reply too large to copy ({} bytes, max {})",
            text.len(),
            MAX_CLIPBOARD_BYTES
        );
    }
    Ok(())
}

fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)
}

/// Copy text to the system clipboard.
///
/// Validation runs before the clipboard is opened, so headless environments still
/// report empty or oversized input precisely.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    validate_clipboard_text(text)?;
    let mut clipboard = SystemClipboard::new()?;
    copy_with_provider(text, &mut clipboard)
}
