//! Visual theme and styling.

use console::Style;

/// Terminal theme for run output and step listings.
#[derive(Debug, Clone)]
pub struct SetupTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for headers (magenta bold).
    pub header: Style,
    /// Style for commands shown in output (dim italic).
    pub command: Style,
    /// Style for pending work (orange).
    pub pending: Style,
}

impl Default for SetupTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().magenta(),
            command: Style::new().dim().italic(),
            pending: Style::new().color256(208),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            command: Style::new(),
            pending: Style::new(),
        }
    }

    /// Pick the colored or plain theme for the current terminal.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format an error line (red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(msg))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!("{} {}", self.header.apply_to("◆"), self.highlight.apply_to(title))
    }

    /// Format a step line with its status marker.
    pub fn format_step(&self, name: &str, title: &str, satisfied: bool) -> String {
        if satisfied {
            format!(
                "{} {} {}",
                self.success.apply_to("✓"),
                self.highlight.apply_to(name),
                self.dim.apply_to(format!("({} present)", title))
            )
        } else {
            format!(
                "{} {} {}",
                self.pending.apply_to("○"),
                self.highlight.apply_to(name),
                self.dim.apply_to(format!("({} pending)", title))
            )
        }
    }

    /// Format a command preview line.
    pub fn format_command(&self, command: &str) -> String {
        format!("    {}", self.command.apply_to(command))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_error_is_unstyled() {
        let theme = SetupTheme::plain();
        assert_eq!(theme.format_error("Failed"), "Failed");
    }

    #[test]
    fn header_contains_title() {
        let theme = SetupTheme::plain();
        let msg = theme.format_header("Provisioning");
        assert!(msg.contains("◆"));
        assert!(msg.contains("Provisioning"));
    }

    #[test]
    fn step_marks_satisfied_and_pending() {
        let theme = SetupTheme::plain();
        assert!(theme.format_step("editor", "NeoVim", true).starts_with("✓ editor"));
        assert!(theme.format_step("editor", "NeoVim", false).starts_with("○ editor"));
    }

    #[test]
    fn command_preview_is_indented() {
        let theme = SetupTheme::plain();
        assert_eq!(theme.format_command("git --version"), "    git --version");
    }

    #[test]
    fn default_impl_matches_new() {
        let default = SetupTheme::default();
        let new = SetupTheme::new();
        assert_eq!(default.format_header("x"), new.format_header("x"));
    }
}
