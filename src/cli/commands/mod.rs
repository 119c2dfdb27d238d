pub mod config;
pub mod insurance;
pub mod navigation;
pub mod results;
pub mod system;
pub mod wizard;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "view",
    "demo",
    "status",
    "set",
    "chip",
    "category",
    "upload",
    "remove-file",
    "next",
    "back",
    "goto",
    "restart",
    "submit",
    "results",
    "details",
    "save-match",
    "not-relevant",
    "book",
    "slot",
    "confirm-booking",
    "close-booking",
    "consent",
    "policy-upload",
    "analyze",
    "no-policy",
    "cities",
    "toasts",
    "dismiss",
    "wait",
    "config",
    "help",
    "version",
    "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(navigation::definitions());
    commands.extend(wizard::definitions());
    commands.extend(results::definitions());
    commands.extend(insurance::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

/// Argument at `index`, or a usage error naming it.
pub(crate) fn required<'a>(args: &[&'a str], index: usize, name: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("Missing argument `{}`.", name)))
}

/// Remaining arguments joined with spaces, for free-text values.
pub(crate) fn rest(args: &[&str], from: usize) -> String {
    args.iter().skip(from).copied().collect::<Vec<_>>().join(" ")
}

pub(crate) fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` must be a number, got `{}`.", name, raw)))
}
