use console::style;

/// Styled text output for the human-readable format
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// `  label: value` with a dimmed label
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {} {}", style(format!("{}:", label)).dim(), value);
    }

    pub fn item(&self, text: impl std::fmt::Display) {
        println!("  • {}", text);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
