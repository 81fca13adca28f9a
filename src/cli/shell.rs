//! Read-dispatch loop shared by the interactive editor and script mode.

use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;

/// Setting this variable switches the shell to line-by-line stdin with plain output.
pub const SCRIPT_ENV: &str = "EXPENSE_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    output::set_plain(mode == CliMode::Script);

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => {
            let mut source = EditorSource::new(context.command_names())?;
            output::section("Expense tracker");
            output::hint("Type `help` for commands, `exit` to quit.");
            run_session(&mut context, &mut source)
        }
        CliMode::Script => {
            let stdin = io::stdin();
            run_session(&mut context, &mut ScriptSource::new(stdin.lock()))
        }
    }
}

enum Input {
    Line(String),
    Interrupted,
    Closed,
}

/// Where the session pulls its next command line from.
trait LineSource {
    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError>;

    fn remember(&mut self, _line: &str) {}
}

struct EditorSource {
    editor: Editor<CommandCompleter, DefaultHistory>,
}

impl EditorSource {
    fn new(names: Vec<&'static str>) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandCompleter, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandCompleter::new(names)));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn next_line(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Closed),
            Err(err) => Err(err.into()),
        }
    }

    fn remember(&mut self, line: &str) {
        self.editor.add_history_entry(line).ok();
    }
}

/// Non-interactive input; `#` starts a comment line.
struct ScriptSource<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> ScriptSource<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn next_line(&mut self, _prompt: &str) -> Result<Input, CliError> {
        loop {
            match self.lines.next() {
                None => return Ok(Input::Closed),
                Some(line) => {
                    let line = line?;
                    if !line.trim_start().starts_with('#') {
                        return Ok(Input::Line(line));
                    }
                }
            }
        }
    }
}

fn run_session(context: &mut ShellContext, source: &mut dyn LineSource) -> Result<(), CliError> {
    while context.running {
        let line = match source.next_line(&context.prompt())? {
            Input::Line(line) => line,
            Input::Interrupted if context.confirm_exit()? => break,
            Input::Interrupted => continue,
            Input::Closed => {
                if context.mode == CliMode::Interactive {
                    output::info("Exiting shell.");
                }
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        source.remember(trimmed);

        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    tracing::debug!("shell session finished");
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse input: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    tracing::debug!(%command, argc = args.len(), "dispatching");

    let outcome = context.dispatch(&command, raw, &args)?;
    if outcome == LoopControl::Exit {
        context.running = false;
    }
    Ok(outcome)
}

/// Completes the command word only; arguments are free text.
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new(mut commands: Vec<&'static str>) -> Self {
        commands.sort_unstable();
        commands.dedup();
        Self { commands }
    }

    fn candidates(&self, word: &str) -> Vec<Pair> {
        let word = word.to_ascii_lowercase();
        self.commands
            .iter()
            .filter(|name| name.starts_with(&word))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let start = before.len() - before.trim_start().len();
        let word = &before[start..];
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((start, self.candidates(word)))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for CommandCompleter {}
