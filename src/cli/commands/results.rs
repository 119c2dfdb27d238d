use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;

use super::{required, rest};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("results", "Show match results", "results", cmd_results),
        CommandEntry::new(
            "details",
            "Expand or collapse a match's reasons",
            "details <match-id>",
            cmd_details,
        ),
        CommandEntry::new(
            "save-match",
            "Save or un-save a match",
            "save-match <match-id>",
            cmd_save_match,
        ),
        CommandEntry::new(
            "not-relevant",
            "Give \"not relevant\" feedback on a match",
            "not-relevant <match-id>",
            cmd_not_relevant,
        ),
        CommandEntry::new(
            "book",
            "Open the booking calendar for a therapist or match",
            "book <match-id|therapist name...>",
            cmd_book,
        ),
        CommandEntry::new(
            "slot",
            "Pick a day and time in the open calendar",
            "slot <day> <time>",
            cmd_slot,
        ),
        CommandEntry::new(
            "confirm-booking",
            "Book the selected slot",
            "confirm-booking",
            cmd_confirm_booking,
        ),
        CommandEntry::new(
            "close-booking",
            "Close the booking calendar",
            "close-booking",
            cmd_close_booking,
        ),
    ]
}

fn cmd_results(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let results = context.session.results();
    if !results.is_revealed() {
        output::info("No results yet. Submit the parent flow and `wait` for them to load.");
        return Ok(());
    }
    output::section(crate::messages::PARENT_RESULTS_READY);
    output::line(render::results_table(
        results,
        &context.session.state().saved_matches,
    ));
    Ok(())
}

fn cmd_details(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required(args, 0, "match-id")?;
    let expanded = context.session.toggle_details(id)?;
    if expanded {
        if let Some(card) = context.session.results().card(id) {
            for reason in &card.reasons {
                output::line(format!("  - {}", reason));
            }
        }
    }
    Ok(())
}

fn cmd_save_match(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required(args, 0, "match-id")?;
    context.session.toggle_saved_match(id)?;
    Ok(())
}

fn cmd_not_relevant(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required(args, 0, "match-id")?;
    context.session.not_relevant(id)?;
    Ok(())
}

fn cmd_book(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = rest(args, 0);
    if target.trim().is_empty() {
        return Err(CommandError::InvalidArguments(
            "Missing argument `therapist`.".into(),
        ));
    }
    let therapist = context
        .session
        .results()
        .card(&target)
        .map(|card| card.name.clone())
        .unwrap_or(target);
    let calendar = context.session.open_booking(&therapist)?;
    output::line(render::calendar_grid(calendar));
    Ok(())
}

fn cmd_slot(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let day = required(args, 0, "day")?;
    let time = required(args, 1, "time")?;
    let pending = context.session.select_slot(day, time)?;
    output::section("Selected");
    output::line(pending.summary());
    Ok(())
}

fn cmd_confirm_booking(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let confirmation = context.session.confirm_booking()?;
    output::line(render::confirmation_text(&confirmation));
    Ok(())
}

fn cmd_close_booking(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.close_booking();
    Ok(())
}
