use crate::cli::args::{
    parse_amount, parse_category, parse_date, parse_optional_date, parse_patch, parse_period,
};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::core::services::SummaryService;
use crate::domain::{Category, Displayable, Expense, NewExpense};

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add",
            "Record an expense",
            "add <amount> <category> [YYYY-MM-DD|today] [note...]",
            cmd_add,
        ),
        CommandDefinition::new(
            "edit",
            "Change fields of an expense",
            "edit <id> [--amount N] [--category C] [--date YYYY-MM-DD] [--note TEXT]",
            cmd_edit,
        ),
        CommandDefinition::new("delete", "Delete an expense", "delete <id>", cmd_delete),
        CommandDefinition::new(
            "list",
            "List expenses, most recent first",
            "list [all | <month> [year]]",
            cmd_list,
        ),
        CommandDefinition::new(
            "categories",
            "Show the available categories",
            "categories",
            cmd_categories,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [amount, category, rest @ ..] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: add <amount> <category> [date] [note...]".into(),
        ));
    };
    let amount = parse_amount(amount)?;
    let category = parse_category(category)?;
    let leading = match rest.first() {
        Some(first) => parse_optional_date(first)?,
        None => None,
    };
    let (date, note_words) = match leading {
        Some(date) => (date, &rest[1..]),
        None => (parse_date("today")?, rest),
    };
    let data = NewExpense::new(amount, category, date).with_note(note_words.join(" "));
    let expense = context.store.add_expense(data);
    output::success(format!(
        "Added expense {} ({} {})",
        expense.id,
        context.money(expense.amount),
        expense.category
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((id, flags)) = args.split_first() else {
        return Err(CommandError::InvalidArguments("usage: edit <id> [--field value]...".into()));
    };
    let patch = parse_patch(flags)?;
    if patch.is_empty() {
        return Err(CommandError::InvalidArguments("nothing to change".into()));
    }
    if context.store.find_expense(id).is_none() {
        return Err(CommandError::ExpenseNotFound((*id).to_string()));
    }
    context.store.update_expense(id, patch);
    output::success(format!("Updated expense {id}"));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::InvalidArguments("usage: delete <id>".into()));
    };
    let Some(expense) = context.store.find_expense(id) else {
        return Err(CommandError::ExpenseNotFound((*id).to_string()));
    };
    if !context.confirm(&format!("Delete {}?", expense.display_label()))? {
        output::info("Kept.");
        return Ok(());
    }
    context.store.delete_expense(id);
    output::success(format!(
        "Deleted expense {} ({})",
        expense.id,
        context.money(expense.amount)
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (title, expenses) = match args {
        ["all"] => ("All expenses".to_string(), context.store.list_expenses()),
        _ => {
            let period = parse_period(args)?;
            (
                format!("Expenses for {period}"),
                context.store.list_expenses_by_month(period),
            )
        }
    };
    output::section(title);
    if expenses.is_empty() {
        output::info("No expenses yet. Add one with `add`.");
        return Ok(());
    }
    for expense in &expenses {
        output::info(format_row(context, expense));
    }
    output::info(format!(
        "{} item(s), total {}",
        expenses.len(),
        context.money(SummaryService::monthly_total(&expenses))
    ));
    Ok(())
}

fn cmd_categories(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Categories");
    for category in Category::iter() {
        output::info(format!("  {category}"));
    }
    Ok(())
}

fn format_row(context: &ShellContext, expense: &Expense) -> String {
    format!(
        "{}  {}  {:<8}  {:>12}  {}",
        expense.id,
        expense.date.format("%Y-%m-%d"),
        expense.category.as_str(),
        context.money(expense.amount),
        expense.note
    )
    .trim_end()
    .to_string()
}

#[cfg(test)]
mod tests {
    use crate::cli::core::tests::script_context;

    #[test]
    fn add_stores_note_and_explicit_date() {
        let (mut context, _guard) = script_context();
        context
            .dispatch(
                "add",
                "add",
                &["12.5", "food", "2024-06-03", "coffee", "beans"],
            )
            .unwrap();
        let expenses = context.store.list_expenses();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].note, "coffee beans");
        assert_eq!(
            expenses[0].date.format("%Y-%m-%d").to_string(),
            "2024-06-03"
        );
    }

    #[test]
    fn add_rejects_non_positive_amounts_before_storing() {
        let (mut context, _guard) = script_context();
        assert!(context.dispatch("add", "add", &["0", "food"]).is_err());
        assert!(context.store.list_expenses().is_empty());
    }

    #[test]
    fn add_refuses_malformed_dates_instead_of_noting_them() {
        let (mut context, _guard) = script_context();
        let outcome = context.dispatch("add", "add", &["8", "food", "2024-13-01", "snack"]);
        assert!(outcome.is_err());
        assert!(context.store.list_expenses().is_empty());
    }

    #[test]
    fn add_without_date_keeps_every_word_in_the_note() {
        let (mut context, _guard) = script_context();
        context
            .dispatch("add", "add", &["8", "food", "late", "snack"])
            .unwrap();
        assert_eq!(context.store.list_expenses()[0].note, "late snack");
    }

    #[test]
    fn delete_and_edit_report_unknown_ids() {
        let (mut context, _guard) = script_context();
        assert!(context.dispatch("delete", "delete", &["nope"]).is_err());
        assert!(context
            .dispatch("edit", "edit", &["nope", "--amount", "3"])
            .is_err());
    }
}
