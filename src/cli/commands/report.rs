use std::path::PathBuf;

use chrono::Utc;

use crate::cli::args::{parse_budget_amount, parse_period};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::{ExportService, SummaryService};

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "budget",
            "Show or set the budget for a month",
            "budget <month> <year> [amount]",
            cmd_budget,
        ),
        CommandDefinition::new(
            "summary",
            "Category breakdown and budget status for a month",
            "summary [month [year]]",
            cmd_summary,
        ),
        CommandDefinition::new(
            "trend",
            "Compare a month's spending with the month before",
            "trend [month [year]]",
            cmd_trend,
        ),
        CommandDefinition::new(
            "export",
            "Write a month's expenses to CSV",
            "export [month [year]] [--dir PATH]",
            cmd_export,
        ),
    ]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [month, year] => {
            let period = parse_period(&[*month, *year])?;
            match context.store.budget_for(period) {
                Some(amount) => {
                    output::info(format!("Budget for {period}: {}", context.money(amount)))
                }
                None => output::info(format!("No budget set for {period}.")),
            }
            Ok(())
        }
        [month, year, amount] => {
            let period = parse_period(&[*month, *year])?;
            let amount = parse_budget_amount(amount)?;
            context.store.set_budget(period, amount);
            output::success(format!("Budget for {period} set to {}", context.money(amount)));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: budget <month> <year> [amount]".into(),
        )),
    }
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = parse_period(args)?;
    let report = SummaryService::month_report(&context.store, period);
    output::section(format!("Summary for {period}"));
    output::info(format!(
        "Total spent : {} across {} item(s)",
        context.money(report.total),
        report.expense_count
    ));
    match (report.budget, report.remaining, report.budget_used_percentage) {
        (Some(budget), Some(remaining), Some(used)) => {
            output::info(format!("Budget      : {}", context.money(budget)));
            output::info(format!(
                "Remaining   : {} ({used:.1}% used)",
                context.money(remaining)
            ));
            if remaining < 0.0 {
                output::warning("Budget exceeded.");
            }
        }
        _ => output::info("Budget      : not set"),
    }
    output::info(format!("Daily avg   : {}", context.money(report.daily_average)));
    for row in &report.breakdown {
        output::info(format!(
            "  {:<8} {:>12} {:>6.1}%  ({} item(s))",
            row.category.as_str(),
            context.money(row.total),
            row.percentage,
            row.count
        ));
    }
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = parse_period(args)?;
    let current = SummaryService::total_for_month(&context.store, period);
    let prior = SummaryService::total_for_month(&context.store, period.previous());
    let delta = SummaryService::month_over_month_delta(current, prior);
    output::section(format!("Trend for {period}"));
    output::info(format!("This month : {}", context.money(current)));
    output::info(format!("Last month : {}", context.money(prior)));
    let daily = SummaryService::daily_average(current, period, Utc::now());
    output::info(format!("Daily avg  : {}", context.money(daily)));
    if delta.absolute_diff >= 0.0 {
        output::info(format!(
            "Spending is up by {:.1}% compared to last month.",
            delta.percentage_change.abs()
        ));
    } else {
        output::success(format!(
            "Spending is down by {:.1}% compared to last month.",
            delta.percentage_change.abs()
        ));
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, dir) = match args.iter().position(|arg| *arg == "--dir") {
        Some(index) => {
            let dir = args.get(index + 1).ok_or_else(|| {
                CommandError::InvalidArguments("flag `--dir` needs a value".into())
            })?;
            (&args[..index], PathBuf::from(*dir))
        }
        None => (args, context.config_manager.export_dir(&context.config)),
    };
    let period = parse_period(positional)?;
    let path = ExportService::export_month(&context.store, period, &dir)?;
    output::success(format!("Exported {period} to {}", path.display()));
    Ok(())
}
