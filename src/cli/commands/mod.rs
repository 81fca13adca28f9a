//! Command table for the shell. Each submodule contributes its definitions.

use std::collections::HashMap;

pub mod expense;
pub mod report;
pub mod system;

use crate::cli::core::{CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    [expense::definitions(), report::definitions(), system::definitions()].concat()
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone, Copy)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Definitions in registration order with a name index. The first definition
/// registered under a name wins.
pub struct CommandRegistry {
    definitions: Vec<CommandDefinition>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new(candidates: Vec<CommandDefinition>) -> Self {
        let mut definitions = Vec::with_capacity(candidates.len());
        let mut index = HashMap::with_capacity(candidates.len());
        for definition in candidates {
            if index.contains_key(definition.name) {
                tracing::warn!(name = definition.name, "duplicate command ignored");
                continue;
            }
            index.insert(definition.name, definitions.len());
            definitions.push(definition);
        }
        Self { definitions, index }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.index.get(name).map(|&slot| &self.definitions[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.definitions.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.iter().map(|definition| definition.name)
    }
}
