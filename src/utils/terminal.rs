//! Sanitizing server-provided text before it reaches the terminal.
//!
//! Conversation titles and message bodies come from the backend verbatim. Escape
//! sequences inside them would be interpreted by the terminal when rendered, so every
//! piece of server text passes through [`sanitize_server_text`] first.

/// Removes ANSI CSI/OSC escape sequences and stray control characters.
///
/// Tabs and newlines survive, carriage returns are dropped.
///
/// # Examples
///
/// ```
/// use policy_keeper::utils::terminal::sanitize_server_text;
///
/// assert_eq!(sanitize_server_text("\x1b[31mclaim\x1b[0m"), "claim");
/// ```
pub fn sanitize_server_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            match chars.peek() {
                // CSI: ESC [ params final-letter
                Some('[') => {
                    chars.next();
                    for next in chars.by_ref() {
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                // OSC: ESC ] ... terminated by BEL or ESC \
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' {
            continue;
        }
        result.push(ch);
    }

    result
}

/// Single-line form used for titles and list rows
pub fn single_line(text: &str) -> String {
    sanitize_server_text(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_color_codes() {
        assert_eq!(sanitize_server_text("\x1b[1;32mApproved\x1b[0m claim"), "Approved claim");
    }

    #[test]
    fn test_strips_screen_clear() {
        assert_eq!(sanitize_server_text("\x1b[2J\x1b[HHello"), "Hello");
    }

    #[test]
    fn test_strips_osc_title_change() {
        assert_eq!(sanitize_server_text("a\x1b]0;pwned\x07b"), "ab");
        assert_eq!(sanitize_server_text("a\x1b]8;;http://x\x1b\\b"), "ab");
    }

    #[test]
    fn test_keeps_newlines_and_tabs() {
        assert_eq!(sanitize_server_text("line 1\r\nline 2\tend"), "line 1\nline 2\tend");
    }

    #[test]
    fn test_drops_bell_and_backspace() {
        assert_eq!(sanitize_server_text("ok\x07\x08"), "ok");
    }

    #[test]
    fn test_keeps_unicode() {
        assert_eq!(sanitize_server_text("家庭保险 🤖"), "家庭保险 🤖");
    }

    #[test]
    fn test_single_line_collapses_whitespace() {
        assert_eq!(single_line("  Car\n insurance\t\x1b[31mquestion\x1b[0m "), "Car insurance question");
    }
}
