use std::time::Duration;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;
use crate::domain::View;

use super::{parse_number, required, rest};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "view",
            "Switch to another view",
            "view <landing|parent|therapist|insurance|demo>",
            cmd_view,
        ),
        CommandEntry::new(
            "demo",
            "List demo screens or switch to one",
            "demo [screen]",
            cmd_demo,
        ),
        CommandEntry::new(
            "status",
            "Show the current step and fields of a flow",
            "status [parent|therapist]",
            cmd_status,
        ),
        CommandEntry::new(
            "cities",
            "Suggest city names",
            "cities <text>",
            cmd_cities,
        ),
        CommandEntry::new("toasts", "List visible notifications", "toasts", cmd_toasts),
        CommandEntry::new(
            "dismiss",
            "Dismiss a notification by its number",
            "dismiss <n>",
            cmd_dismiss,
        ),
        CommandEntry::new(
            "wait",
            "Let time pass so pending work can finish",
            "wait <ms>",
            cmd_wait,
        ),
    ]
}

fn cmd_view(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let view = ShellContext::view_arg(required(args, 0, "view")?)?;
    context.session.show_view(view);
    Ok(())
}

fn cmd_demo(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(id) = args.first() {
        let screen = context.session.switch_demo(id)?;
        output::section(format!("Demo: {}", screen.title));
        return Ok(());
    }
    let demo = context.session.demo();
    let active = demo.active().map(|screen| screen.id);
    for screen in demo.screens() {
        let marker = if Some(screen.id) == active { "*" } else { " " };
        output::line(format!("{} {:<18} {}", marker, screen.id, screen.title));
    }
    Ok(())
}

fn cmd_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let state = context.session.state();
    output::section(format!("View: {}", state.current_view.display_name()));
    if state.current_view == View::Insurance {
        let insurance = context.session.insurance();
        output::line(insurance.policy_status());
        output::line(render::analysis_status(insurance.status()));
        return Ok(());
    }
    if state.current_view == View::DemoCenter && args.is_empty() {
        if let Some(screen) = context.session.demo().active() {
            output::line(format!("Screen: {} ({})", screen.title, screen.id));
        }
        return Ok(());
    }
    let flow = context.flow_arg(args.first())?;
    output::line(render::flow_status(&context.session, flow));
    Ok(())
}

fn cmd_cities(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let suggestions = context.session.city_suggestions(&rest(args, 0));
    if suggestions.is_empty() {
        output::info("No matching cities.");
    } else {
        output::line(suggestions.join(", "));
    }
    Ok(())
}

fn cmd_toasts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let toasts = context.session.toasts();
    if toasts.is_empty() {
        output::info("No notifications.");
    }
    for (index, toast) in toasts.iter().enumerate() {
        output::line(format!("{}. {}", index + 1, render::toast_line(toast)));
    }
    Ok(())
}

fn cmd_dismiss(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index: usize = parse_number(required(args, 0, "n")?, "n")?;
    let id = index
        .checked_sub(1)
        .and_then(|position| context.session.toasts().get(position))
        .map(|toast| toast.id)
        .ok_or_else(|| CommandError::InvalidArguments(format!("No notification #{}.", index)))?;
    context.session.dismiss_toast(id);
    Ok(())
}

fn cmd_wait(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ms: u64 = parse_number(required(args, 0, "ms")?, "ms")?;
    let ran = context.advance(Duration::from_millis(ms));
    if ran == 0 {
        output::info(format!("{} ms passed.", ms));
    }
    Ok(())
}
