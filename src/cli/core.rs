//! Shell context, dispatch and error types shared by all commands.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    core::ExpenseStore,
    errors::StoreError,
    storage::JsonFileStore,
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::output;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("readline error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("expense `{0}` not found")]
    ExpenseNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// State shared by every command for the lifetime of one shell session.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) store: ExpenseStore,
    pub(crate) files: JsonFileStore,
    pub(crate) config: Config,
    pub(crate) config_manager: ConfigManager,
    pub(crate) registry: CommandRegistry,
    pub(crate) running: bool,
    theme: ColorfulTheme,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let files =
            JsonFileStore::with_retention(config_manager.data_dir(), config.backup_retention)?;
        let store = ExpenseStore::new(Box::new(files.clone()));
        tracing::debug!(data_dir = %files.root().display(), ?mode, "shell context ready");
        Ok(Self {
            mode,
            store,
            files,
            config,
            config_manager,
            registry: CommandRegistry::new(commands::all_definitions()),
            running: true,
            theme: ColorfulTheme::default(),
        })
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        "expenses> ".to_string()
    }

    /// Formats a magnitude with the configured currency symbol.
    pub(crate) fn money(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.config.currency_symbol, amount.abs())
        } else {
            format!("{}{:.2}", self.config.currency_symbol, amount)
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|definition| definition.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    /// Asks for confirmation in interactive mode; scripts are always confirmed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit shell?").or_else(|err| match err {
            CommandError::Prompt(dialoguer::Error::IO(io_err)) => Err(CliError::Io(io_err)),
            _ => Ok(true),
        })
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::ExpenseNotFound(id) => {
                output::error(format!("No expense with id `{id}`."));
                output::hint("Use `list all` to see expense ids.");
                Ok(())
            }
            other => {
                output::error(other.to_string());
                Ok(())
            }
        }
    }
}
