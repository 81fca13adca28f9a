use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::storage::{KeyValueStore, BUDGETS_KEY, EXPENSES_KEY};
use crate::utils::build_info;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new(
            "config",
            "Show or change preferences",
            "config [currency <symbol> | retention <count>]",
            cmd_config,
        ),
        CommandDefinition::new(
            "backups",
            "List snapshots kept before each write",
            "backups",
            cmd_backups,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(command) => {
                output::info(format!("{} - {}", command.name, command.description));
                output::info(format!("usage: {}", command.usage));
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    output::section("Commands");
    for command in context.registry.iter() {
        output::info(format!("  {:<11} {}", command.name, command.description));
    }
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section("Configuration");
            output::info(format!("  File       : {}", context.config_manager.path().display()));
            output::info(format!("  Data dir   : {}", context.files.root().display()));
            output::info(format!("  Locale     : {}", context.config.locale));
            output::info(format!("  Currency   : {}", context.config.currency_symbol));
            output::info(format!("  Retention  : {}", context.config.backup_retention));
            output::info(format!(
                "  Export dir : {}",
                context.config_manager.export_dir(&context.config).display()
            ));
            Ok(())
        }
        ["currency", symbol] => {
            let mut updated = context.config.clone();
            updated.currency_symbol = (*symbol).to_string();
            context.config_manager.save(&updated)?;
            context.config = updated;
            output::success(format!("Currency symbol set to {symbol}"));
            Ok(())
        }
        ["retention", count] => {
            let count = count.parse::<usize>().map_err(|_| {
                CommandError::InvalidArguments(format!("invalid retention `{count}`"))
            })?;
            let mut updated = context.config.clone();
            updated.backup_retention = count;
            context.config_manager.save(&updated)?;
            context.config = updated;
            output::success(format!("Keeping {count} snapshot(s); applies from next start"));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [currency <symbol> | retention <count>]".into(),
        )),
    }
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Snapshots");
    let stored = context.files.keys()?;
    for key in [EXPENSES_KEY, BUDGETS_KEY] {
        let backups = context.files.list_backups(key)?;
        let state = if stored.iter().any(|name| name == key) {
            "stored"
        } else {
            "empty"
        };
        output::info(format!("{key} ({state}, {} snapshot(s))", backups.len()));
        for backup in backups {
            output::info(format!(
                "  {}  {} bytes  {}",
                backup.created_at.format("%Y-%m-%d %H:%M:%S"),
                backup.size_bytes,
                backup.path.display()
            ));
        }
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Expense Core {}", meta.version));
    output::info(format!("  Build hash : {} ({})", meta.git_hash, meta.git_status));
    output::info(format!("  Built at   : {}", meta.timestamp));
    output::info(format!("  Target     : {}", meta.target));
    output::info(format!("  Profile    : {}", meta.profile));
    Ok(())
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.running = false;
    Err(CommandError::ExitRequested)
}

#[cfg(test)]
mod tests {
    use crate::cli::core::tests::script_context;

    #[test]
    fn currency_change_is_persisted() {
        let (mut context, _guard) = script_context();
        context
            .dispatch("config", "config", &["currency", "$"])
            .unwrap();
        assert_eq!(context.money(5.0), "$5.00");
        let reloaded = context.config_manager.load().unwrap();
        assert_eq!(reloaded.currency_symbol, "$");
    }

    #[test]
    fn zero_retention_is_refused() {
        let (mut context, _guard) = script_context();
        assert!(context
            .dispatch("config", "config", &["retention", "0"])
            .is_err());
    }
}
