//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use booktrack_core::{Book, Screen, User};
use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single book
    pub fn print_book(&self, book: &Book) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", book.id);
                println!("Title:       {}", book.title);
                println!("Author:      {}", book.author);
                println!("Genre:       {}", book.genre);
                println!("Description: {}", book.description);
            }
            OutputFormat::Json => print_json(book),
            OutputFormat::Quiet => {
                println!("{}", book.id);
            }
        }
    }

    /// Print a list of books
    pub fn print_books(&self, books: &[Book]) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books found.");
                    return;
                }
                for book in books {
                    println!(
                        "{} | {} by {} ({})",
                        short_id(&book.id),
                        truncate(&book.title, 35),
                        truncate(&book.author, 25),
                        book.genre
                    );
                    println!("           {}", truncate_line(&book.description, 60));
                }
                println!("\n{} book(s)", books.len());
            }
            OutputFormat::Json => print_json(&books),
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    /// Print the signed-in user's profile, or note that there is none
    pub fn print_profile(&self, user: Option<&User>) {
        match (self.format, user) {
            (OutputFormat::Human, Some(user)) => {
                println!("Username: {}", user.username);
                println!("Email:    {}", user.email);
            }
            (OutputFormat::Human, None) => println!("No user data available."),
            (OutputFormat::Json, user) => print_json(&user),
            (OutputFormat::Quiet, Some(user)) => println!("{}", user.username),
            (OutputFormat::Quiet, None) => {}
        }
    }

    /// Print the top-level screens
    pub fn print_screens(&self, screens: &[Screen], logged_in: bool, api_url: &str) {
        match self.format {
            OutputFormat::Human => {
                println!("BookTrack");
                println!("=========");
                println!();
                for screen in screens {
                    println!("  {} {}", screen.icon().glyph(), screen.label());
                }
                println!();
                println!("Server:  {}", api_url);
                println!(
                    "Session: {}",
                    if logged_in { "logged in" } else { "not logged in" }
                );
            }
            OutputFormat::Json => {
                let screens: Vec<_> = screens
                    .iter()
                    .map(|s| serde_json::json!({"label": s.label(), "icon": s.icon().name()}))
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "screens": screens,
                        "logged_in": logged_in,
                        "api_url": api_url
                    })
                );
            }
            OutputFormat::Quiet => {
                for screen in screens {
                    println!("{}", screen.label());
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode JSON: {}", e),
    }
}

/// First 8 characters of an id
fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        // Multi-byte characters are never split
        assert_eq!(truncate("ééééééééééé", 5), "éé...");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("single line", 20), "single line");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("65f1c2a9b4e3d2c1a0f9e8d7"), "65f1c2a9");
        assert_eq!(short_id("42"), "42");
    }
}
