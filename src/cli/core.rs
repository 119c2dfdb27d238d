//! Shell context, dispatch and error reporting.

use std::{
    io,
    time::{Duration, Instant},
};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    app::Session,
    config::ConfigManager,
    domain::{FlowDefinition, FlowKind, View},
    errors::{ConfigError, SessionError, StorageError, WizardError},
    storage::{JsonFileStorage, StateStore},
    utils::paths,
    wizard::MemorySurface,
};

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
use super::render::TerminalToasts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Failures that stop the shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: Session,
    pub config_manager: ConfigManager,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
    last_tick: Instant,
}

impl ShellContext {
    /// Opens the persisted session under the application data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = paths::app_data_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let storage = JsonFileStorage::new(paths::storage_dir_in(&base))?;
        let store = StateStore::new(Box::new(storage), config.storage_slot.clone());
        let session = Session::open(config, store, MemorySurface::new())
            .with_toast_sink(Box::new(TerminalToasts));
        Ok(Self::with_session(mode, session, config_manager))
    }

    pub fn with_session(mode: CliMode, session: Session, config_manager: ConfigManager) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        Self {
            mode,
            registry,
            session,
            config_manager,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
            last_tick: Instant::now(),
        }
    }

    /// Interactive sessions follow wall-clock time; scripts only move with `wait`.
    pub(crate) fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        if self.mode == CliMode::Interactive {
            self.advance(elapsed);
        }
    }

    pub(crate) fn advance(&mut self, by: Duration) -> usize {
        self.session.advance(by)
    }

    pub(crate) fn prompt(&self) -> String {
        let state = self.session.state();
        let view = state.current_view;
        let flow = FlowKind::ALL.into_iter().find(|flow| flow.view() == view);
        match flow {
            Some(flow) => format!(
                "flowmatch[{} {}/{}]> ",
                view.id(),
                state.flow(flow).current_step,
                FlowDefinition::for_kind(flow).total_steps()
            ),
            None => format!("flowmatch[{}]> ", view.id()),
        }
    }

    /// Flow named by `arg`, or the flow of the current view when omitted.
    pub(crate) fn flow_arg(&self, arg: Option<&&str>) -> Result<FlowKind, CommandError> {
        if let Some(raw) = arg {
            return raw.parse().map_err(CommandError::InvalidArguments);
        }
        let view = self.session.state().current_view;
        FlowKind::ALL
            .into_iter()
            .find(|flow| flow.view() == view)
            .ok_or_else(|| {
                CommandError::InvalidArguments(
                    "Specify a flow (`parent` or `therapist`) or open a flow view first.".into(),
                )
            })
    }

    pub(crate) fn view_arg(raw: &str) -> Result<View, CommandError> {
        raw.parse().map_err(CommandError::InvalidArguments)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::hint(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true)
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Session(SessionError::Wizard(WizardError::MissingFields {
                step,
                fields,
            })) => {
                output::error(format!("Step {} is incomplete: {}", step, fields.join(", ")));
                Ok(())
            }
            CommandError::Io(err) if self.mode == CliMode::Script => Err(err.into()),
            other => {
                output::error(other.to_string());
                Ok(())
            }
        }
    }

    /// Persists the session before the shell exits.
    pub(crate) fn shutdown(&mut self) {
        self.session.shutdown();
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn context() -> (ShellContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        let session = Session::in_memory(Config::default());
        (ShellContext::with_session(CliMode::Script, session, manager), dir)
    }

    #[test]
    fn flow_argument_defaults_to_current_view() {
        let (mut context, _dir) = context();
        assert!(context.flow_arg(None).is_err());
        context.session.show_view(View::TherapistFlow);
        assert_eq!(context.flow_arg(None).unwrap(), FlowKind::Therapist);
        assert_eq!(context.flow_arg(Some(&"parent")).unwrap(), FlowKind::Parent);
        assert!(context.flow_arg(Some(&"nobody")).is_err());
    }

    #[test]
    fn prompt_shows_view_and_step() {
        let (mut context, _dir) = context();
        assert_eq!(context.prompt(), "flowmatch[landing]> ");
        context.session.show_view(View::ParentFlow);
        assert_eq!(context.prompt(), "flowmatch[parent-flow 1/4]> ");
    }

    #[test]
    fn unknown_commands_do_not_fail_dispatch() {
        let (mut context, _dir) = context();
        let control = context.dispatch("nxt", "nxt", &[]).expect("dispatch");
        assert_eq!(control, LoopControl::Continue);
        assert!(context.command("next").is_some());
    }
}
