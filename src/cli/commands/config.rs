use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change session settings",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(
                    "usage: config set <key> <value>".into(),
                ));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            let mut config = context.config_manager.load()?;
            config.set_value(key, value.trim())?;
            context.config_manager.save(&config)?;
            output::success(format!("{} = {}", key, value.trim()));
            output::hint("Changes apply the next time the shell starts.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "Unknown config action `{}`.",
            other
        ))),
    }
}

fn show_config(context: &mut ShellContext) -> CommandResult {
    let config = context.config_manager.load()?;
    output::section(format!("Config ({})", context.config_manager.path().display()));
    let value = serde_json::to_value(&config)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    if let serde_json::Value::Object(entries) = value {
        for (key, value) in entries {
            output::line(format!("  {:<24} {}", key, value));
        }
    }
    if config.availability_seed.is_none() {
        output::line(format!("  {:<24} none", "availability_seed"));
    }
    Ok(())
}
