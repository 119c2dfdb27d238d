use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;
use crate::domain::{guess_mime, FileDescriptor};

use super::{parse_number, required, rest};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "consent",
            "Allow or withdraw consent to analyze the policy",
            "consent <on|off>",
            cmd_consent,
        ),
        CommandEntry::new(
            "policy-upload",
            "Load an insurance policy document",
            "policy-upload <name> <size-bytes> [mime]",
            cmd_policy_upload,
        ),
        CommandEntry::new(
            "analyze",
            "Analyze the loaded policy",
            "analyze",
            cmd_analyze,
        ),
        CommandEntry::new(
            "no-policy",
            "Fill or send the \"no policy\" request form",
            "no-policy <field> <value...> | no-policy send",
            cmd_no_policy,
        ),
    ]
}

fn cmd_consent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let consent = match required(args, 0, "on|off")?.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => true,
        "off" | "no" | "false" => false,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Expected `on` or `off`, got `{}`.",
                other
            )))
        }
    };
    context.session.set_policy_consent(consent);
    Ok(())
}

fn cmd_policy_upload(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = required(args, 0, "name")?;
    let size: u64 = parse_number(required(args, 1, "size-bytes")?, "size-bytes")?;
    let mime = args.get(2).copied().unwrap_or_else(|| guess_mime(name));
    let status = context
        .session
        .upload_policy(FileDescriptor::new(name, size, mime));
    output::line(status);
    Ok(())
}

fn cmd_analyze(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.analyze_policy()?;
    output::line(render::analysis_status(context.session.insurance().status()));
    Ok(())
}

fn cmd_no_policy(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let first = required(args, 0, "field")?;
    if first.eq_ignore_ascii_case("send") && args.len() == 1 {
        context.session.submit_no_policy()?;
        return Ok(());
    }
    context.session.set_no_policy_field(first, &rest(args, 1));
    Ok(())
}
