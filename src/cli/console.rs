use colored::*;
use std::io::{self, BufRead, Write};

use crate::client::HealthReport;

/// Console handles all terminal I/O with colored formatting
pub struct Console {
    user_color: Color,
    assistant_color: Color,
    tool_color: Color,
}

impl Console {
    /// Create a new Console with default colors
    pub fn new() -> Self {
        Self {
            user_color: Color::Cyan,
            assistant_color: Color::Green,
            tool_color: Color::Magenta,
        }
    }

    /// Print a complete assistant message with colored formatting
    pub fn print_assistant(&self, message: &str) {
        println!(
            "{} {}",
            "Assistant:".color(self.assistant_color).bold(),
            message.color(self.assistant_color)
        );
    }

    /// Print a newline
    pub fn println(&self) {
        println!();
    }

    /// Print a system message (status, info, etc.)
    pub fn print_system(&self, message: &str) {
        println!("{} {}", "System:".yellow().bold(), message);
    }

    /// Print an error message
    pub fn print_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }

    /// Read a line of input from stdin; `None` on end of input
    pub fn read_input(&self) -> io::Result<Option<String>> {
        print!("{} ", "You:".color(self.user_color).bold());
        io::stdout().flush()?;
        read_line(&mut io::stdin().lock())
    }

    /// Print a welcome banner
    pub fn print_banner(&self, tenant_id: &str) {
        println!("{}", "=".repeat(60).bright_blue());
        println!("{}", "  Reltio MCP Chat".bright_blue().bold());
        println!("{}", "=".repeat(60).bright_blue());
        println!("Tenant: {}", tenant_id.bold());
        println!();
        println!("Type your questions or requests below.");
        println!("Commands: 'quit', 'exit' to stop | 'health' for health check | 'clear' to clear screen");
        println!();
    }

    /// List the tools discovered on the server
    pub fn print_tools(&self, tool_names: &[String]) {
        println!(
            "{} {} tools available",
            "Tools:".color(self.tool_color).bold(),
            tool_names.len()
        );
        for name in tool_names {
            println!("  {}", name.color(self.tool_color));
        }
        println!();
    }

    /// Print a health report
    pub fn print_health(&self, report: &HealthReport) {
        if report.is_healthy() {
            println!("{}", "✓ System is healthy".green().bold());
        } else {
            println!("{}", "✗ System is unhealthy".red().bold());
        }
    }

    /// Print a separator line
    pub fn print_separator(&self) {
        println!("{}", "-".repeat(60).bright_black());
    }

    /// Print a thinking indicator
    pub fn print_thinking(&self) {
        print!("{}", "Thinking...".bright_black());
        let _ = io::stdout().flush();
    }

    /// Clear the thinking indicator
    pub fn clear_thinking(&self) {
        print!("\r{}\r", " ".repeat(20));
        let _ = io::stdout().flush();
    }

    /// Clear the terminal
    pub fn clear_screen(&self) {
        print!("\x1B[2J\x1B[1;1H");
        let _ = io::stdout().flush();
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one trimmed line; `None` once the reader is exhausted
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}
