use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;
use crate::domain::{guess_mime, FileDescriptor, FlowKind};
use crate::wizard::{FlowOutcome, StepChange};

use super::{parse_number, required, rest};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "set",
            "Enter a field value",
            "set [flow] <field> <value...>",
            cmd_set,
        ),
        CommandEntry::new(
            "chip",
            "Toggle a chip in a chip group",
            "chip [flow] <group> <label...>",
            cmd_chip,
        ),
        CommandEntry::new(
            "category",
            "Choose or clear a therapist category for slot 1-3",
            "category <slot> <category|none>",
            cmd_category,
        ),
        CommandEntry::new(
            "upload",
            "Attach a document to a flow",
            "upload [flow] <name> <size-bytes> [mime]",
            cmd_upload,
        ),
        CommandEntry::new(
            "remove-file",
            "Remove an uploaded document",
            "remove-file [flow] <name>",
            cmd_remove_file,
        ),
        CommandEntry::new("next", "Go to the next step", "next [flow]", cmd_next),
        CommandEntry::new("back", "Go to the previous step", "back [flow]", cmd_back),
        CommandEntry::new("goto", "Jump to a step", "goto [flow] <step>", cmd_goto),
        CommandEntry::new("restart", "Start a flow over", "restart [flow]", cmd_restart),
        CommandEntry::new("submit", "Finish a flow", "submit [flow]", cmd_submit),
    ]
}

/// Leading flow name when present, otherwise the flow of the current view.
fn split_flow<'a, 'b>(
    context: &ShellContext,
    args: &'a [&'b str],
) -> Result<(FlowKind, &'a [&'b str]), CommandError> {
    if let Some(flow) = args.first().and_then(|raw| raw.parse::<FlowKind>().ok()) {
        return Ok((flow, &args[1..]));
    }
    Ok((context.flow_arg(None)?, args))
}

fn report_change(change: StepChange) {
    match change {
        StepChange::Moved { from, to } => output::success(format!("Step {} -> {}", from, to)),
        StepChange::Unchanged(step) => output::info(format!("Still on step {}", step)),
    }
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (flow, args) = split_flow(context, args)?;
    let field = required(args, 0, "field")?;
    context.session.set_field(flow, field, &rest(args, 1))?;
    Ok(())
}

fn cmd_chip(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (flow, args) = split_flow(context, args)?;
    let group = required(args, 0, "group")?;
    let label = rest(args, 1);
    if label.is_empty() {
        let options = context
            .session
            .chip_options(flow, group)
            .ok_or_else(|| CommandError::InvalidArguments(format!("`{}` is not a chip group.", group)))?;
        let active = context.session.state().flow(flow).tags(group).to_vec();
        for option in options {
            let mark = if active.contains(&option) { "[x]" } else { "[ ]" };
            output::line(format!("{} {}", mark, option));
        }
        return Ok(());
    }
    let active = context.session.toggle_chip(flow, group, &label)?;
    let state = if active { "on" } else { "off" };
    output::info(format!("{}: {}", label, state));
    Ok(())
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let slot: usize = parse_number(required(args, 0, "slot")?, "slot")?;
    if slot == 0 {
        return Err(CommandError::InvalidArguments("Slots are numbered from 1.".into()));
    }
    let category = rest(args, 1);
    if category.is_empty() {
        return Err(CommandError::InvalidArguments("Missing argument `category`.".into()));
    }
    if category == "none" {
        context.session.clear_category_slot(slot - 1)?;
    } else {
        context.session.select_category_slot(slot - 1, &category)?;
    }
    let options = context.session.category_slots().options();
    output::info(format!("Sub-specialties: {}", options.join(", ")));
    Ok(())
}

fn cmd_upload(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (flow, args) = split_flow(context, args)?;
    let name = required(args, 0, "name")?;
    let size: u64 = parse_number(required(args, 1, "size-bytes")?, "size-bytes")?;
    let mime = args.get(2).copied().unwrap_or_else(|| guess_mime(name));
    context
        .session
        .upload_file(flow, FileDescriptor::new(name, size, mime))?;
    Ok(())
}

fn cmd_remove_file(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (flow, args) = split_flow(context, args)?;
    let name = rest(args, 0);
    if name.is_empty() {
        return Err(CommandError::InvalidArguments("Missing argument `name`.".into()));
    }
    context.session.remove_file(flow, &name)?;
    Ok(())
}

fn cmd_next(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let flow = context.flow_arg(args.first())?;
    let change = context.session.next(flow)?;
    report_change(change);
    Ok(())
}

fn cmd_back(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let flow = context.flow_arg(args.first())?;
    let change = context.session.back(flow)?;
    report_change(change);
    Ok(())
}

fn cmd_goto(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (flow, args) = split_flow(context, args)?;
    let step: u8 = parse_number(required(args, 0, "step")?, "step")?;
    let change = context.session.goto(flow, step)?;
    report_change(change);
    Ok(())
}

fn cmd_restart(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let flow = context.flow_arg(args.first())?;
    context.session.restart(flow);
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let flow = context.flow_arg(args.first())?;
    match context.session.submit(flow)? {
        FlowOutcome::Results => output::hint("Results are loading. Use `wait` then `results`."),
        FlowOutcome::Success => output::line(render::flow_status(&context.session, flow)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Session;
    use crate::cli::core::CliMode;
    use crate::config::{Config, ConfigManager};
    use crate::domain::View;

    fn context() -> (ShellContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        let session = Session::in_memory(Config::default());
        (ShellContext::with_session(CliMode::Script, session, manager), dir)
    }

    #[test]
    fn explicit_flow_prefix_is_optional() {
        let (mut context, _dir) = context();
        context.session.show_view(View::ParentFlow);
        cmd_set(&mut context, &["child_name", "נועה"]).unwrap();
        cmd_set(&mut context, &["therapist", "full_name", "דנה", "לוי"]).unwrap();
        assert_eq!(
            context.session.state().parent_flow.field("child_name"),
            Some("נועה")
        );
        assert_eq!(
            context.session.state().therapist_flow.field("full_name"),
            Some("דנה לוי")
        );
    }

    #[test]
    fn category_slots_are_one_based() {
        let (mut context, _dir) = context();
        assert!(matches!(
            cmd_category(&mut context, &["0", "speech"]),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            cmd_category(&mut context, &["1"]),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn category_none_empties_the_slot() {
        let (mut context, _dir) = context();
        cmd_category(&mut context, &["2", "speech"]).unwrap();
        assert_eq!(context.session.category_slots().selected().count(), 1);
        cmd_category(&mut context, &["2", "none"]).unwrap();
        assert_eq!(context.session.category_slots().selected().count(), 0);
    }
}
