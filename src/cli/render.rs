//! Text rendering of session state for the terminal.

use crate::app::Session;
use crate::domain::{format_file_size, FlowDefinition, FlowKind};
use crate::insurance::AnalysisStatus;
use crate::notify::{Toast, ToastSink};
use crate::presenter::{BookingCalendar, BookingConfirmation, ResultsView};
use crate::wizard::{FlowOutcome, FormSurface, Progress};

use super::output::{self, MessageKind};

/// Prints each toast as it is raised.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalToasts;

impl ToastSink for TerminalToasts {
    fn raised(&mut self, toast: &Toast) {
        output::print(MessageKind::from(toast.severity), toast_line(toast));
    }
}

pub fn toast_line(toast: &Toast) -> String {
    format!("{} {}", toast.severity.icon(), toast.message)
}

fn progress_bar(progress: Progress) -> String {
    let filled = usize::from(progress.step);
    let empty = usize::from(progress.total.saturating_sub(progress.step));
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(empty),
        progress.percent()
    )
}

/// Current step, progress, field values and errors of one flow.
pub fn flow_status(session: &Session, flow: FlowKind) -> String {
    let definition = FlowDefinition::for_kind(flow);
    let surface = session.surface();
    let state = session.state().flow(flow);
    let mut lines = Vec::new();

    if let Some(progress) = surface.progress(flow) {
        lines.push(format!("{} {}", progress.label(), progress_bar(progress)));
    }
    match (surface.outcome(flow), surface.visible_panel(flow)) {
        (Some(FlowOutcome::Results), _) => lines.push("Showing: results".to_string()),
        (Some(FlowOutcome::Success), _) => lines.push("Showing: registration complete".to_string()),
        (None, Some(step)) => {
            if let Some(panel) = definition.step(step) {
                lines.push(format!("Step {}: {}", panel.number, panel.title));
                for field in panel.fields() {
                    let marker = if panel.required.contains(&field) { "*" } else { " " };
                    let value = surface.field_value(flow, field).unwrap_or_default();
                    let mut line = format!("  {}{} = {}", marker, field, value);
                    if let Some(error) = surface.field_error(flow, field) {
                        line.push_str(&format!("  <- {}", error));
                    }
                    lines.push(line);
                }
            }
        }
        (None, None) => lines.push("No panel visible".to_string()),
    }
    for file in &state.uploaded_file_descriptors {
        lines.push(format!(
            "  {} {} ({})",
            file.kind().icon(),
            file.name,
            format_file_size(file.size_bytes)
        ));
    }
    lines.join("\n")
}

pub fn results_table(results: &ResultsView, saved: &[String]) -> String {
    let mut lines = Vec::new();
    for card in results.cards() {
        let mark = if saved.contains(&card.id) { " [saved]" } else { "" };
        lines.push(format!(
            "{} | {} | {} | {} | {}%{}",
            card.id, card.name, card.profession, card.city, card.score, mark
        ));
        if results.is_expanded(&card.id) {
            for reason in &card.reasons {
                lines.push(format!("    - {}", reason));
            }
        }
    }
    lines.join("\n")
}

/// One line per day; `✓` marks available cells.
pub fn calendar_grid(calendar: &BookingCalendar) -> String {
    let mut lines = vec![format!("Calendar: {}", calendar.therapist)];
    let mut current_day: Option<&str> = None;
    let mut row = String::new();
    for cell in calendar.cells() {
        if current_day != Some(cell.day.as_str()) {
            if let Some(day) = current_day {
                lines.push(format!("{}:{}", day, row));
            }
            current_day = Some(cell.day.as_str());
            row.clear();
        }
        let mark = if cell.available { "✓" } else { "✗" };
        row.push_str(&format!(" {} {}", cell.time, mark));
    }
    if let Some(day) = current_day {
        lines.push(format!("{}:{}", day, row));
    }
    lines.join("\n")
}

pub fn confirmation_text(confirmation: &BookingConfirmation) -> String {
    format!(
        "{}\nטלפון: {}",
        confirmation.booking.summary(),
        confirmation.phone
    )
}

pub fn analysis_status(status: &AnalysisStatus) -> String {
    match status {
        AnalysisStatus::Idle => "Analysis: idle".to_string(),
        AnalysisStatus::Analyzing(_) => format!("Analysis: {}", crate::messages::ANALYSIS_RUNNING),
        AnalysisStatus::Done(analysis) => analysis.summary(),
    }
}
