use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for entry in registry.list() {
        output::line(format!("  {:<16} {}", entry.name, entry.description));
    }
    output::line("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::line(format!("  Description: {}", entry.description));
    output::line(format!("  Usage: {}", entry.usage));
}
