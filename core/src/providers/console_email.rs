//! Console email provider for development and testing.

use tracing::info;

use crate::error::Result;
use crate::providers::EmailProvider;

/// Console email provider.
///
/// This provider logs emails to the console instead of sending them.
/// Useful for development where you don't want to send real emails.
#[derive(Clone, Debug, Default)]
pub struct ConsoleEmailProvider;

impl ConsoleEmailProvider {
    /// Create a new console email provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EmailProvider for ConsoleEmailProvider {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        info!(
            to = %to,
            subject = %subject,
            "📧 Email (Development Mode)"
        );
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                   TRANSACTIONAL EMAIL                        ║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ To: {to:<57}║");
        println!("║ Subject: {subject:<52}║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        for line in body.lines() {
            for chunk in wrap_line(line, 60) {
                println!("║ {chunk:<61}║");
            }
        }
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        Ok(())
    }
}

/// Split a line into chunks of at most `width` characters, always on a
/// character boundary.
fn wrap_line(line: &str, width: usize) -> Vec<&str> {
    if line.is_empty() {
        return vec![""];
    }
    let mut chunks = Vec::new();
    let mut rest = line;
    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(width)
            .map_or(rest.len(), |(i, _)| i);
        chunks.push(&rest[..split]);
        rest = &rest[split..];
    }
    chunks
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wrap_preserves_short_lines() {
        assert_eq!(wrap_line("hello", 60), vec!["hello"]);
        assert_eq!(wrap_line("", 60), vec![""]);
    }

    #[test]
    fn wrap_splits_long_ascii_lines() {
        let line = "a".repeat(125);
        let chunks = wrap_line(&line, 60);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 60);
        assert_eq!(chunks[2].len(), 5);
        assert_eq!(chunks.concat(), line);
    }

    #[test]
    fn wrap_splits_multibyte_lines_on_char_boundaries() {
        let line = "é".repeat(61);
        let chunks = wrap_line(&line, 60);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 60);
        assert_eq!(chunks[1], "é");
        assert_eq!(chunks.concat(), line);
    }
}
