//! Console printer with ANSI color support, used by the CLI.

use serde::{Deserialize, Serialize};

/// Available colors for printed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterColor {
    Red,
    Green,
    Yellow,
    Cyan,
    BoldGreen,
    BoldYellow,
    BoldCyan,
    BoldMagenta,
}

impl PrinterColor {
    fn ansi_code(&self) -> &'static str {
        match self {
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Cyan => "\x1b[36m",
            Self::BoldGreen => "\x1b[1;32m",
            Self::BoldYellow => "\x1b[1;33m",
            Self::BoldCyan => "\x1b[1;36m",
            Self::BoldMagenta => "\x1b[1;35m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Printer for console output.
///
/// With `plain` set, colors are dropped (for pipes and tests).
#[derive(Debug, Clone, Default)]
pub struct Printer {
    pub plain: bool,
}

impl Printer {
    pub fn new(plain: bool) -> Self {
        Self { plain }
    }

    /// Wrap `content` in the escape codes for `color`.
    pub fn paint(&self, content: &str, color: PrinterColor) -> String {
        if self.plain {
            content.to_string()
        } else {
            format!("{}{}{}", color.ansi_code(), content, RESET)
        }
    }

    pub fn print(&self, content: &str, color: PrinterColor) {
        println!("{}", self.paint(content, color));
    }

    /// Print a section heading followed by its body.
    pub fn section(&self, heading: &str, body: &str) {
        self.print(heading, PrinterColor::BoldCyan);
        println!("{}\n", body);
    }

    /// Print one attributed conversation line (`speaker: text`).
    pub fn turn(&self, speaker: &str, text: &str, color: PrinterColor) {
        println!("{} {}", self.paint(&format!("{}:", speaker), color), text);
    }

    pub fn notice(&self, content: &str) {
        self.print(content, PrinterColor::Yellow);
    }

    pub fn error(&self, content: &str) {
        eprintln!("{}", self.paint(content, PrinterColor::Red));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_plain() {
        let printer = Printer::new(true);
        assert_eq!(printer.paint("hi", PrinterColor::Red), "hi");
    }

    #[test]
    fn test_paint_colored() {
        let printer = Printer::new(false);
        assert_eq!(printer.paint("hi", PrinterColor::Green), "\x1b[32mhi\x1b[0m");
    }
}
