use clap::Parser;
use fintrack::analysis::{FinanceTracker, Period};
use fintrack::config::Cli;
use fintrack::db::{self, repository};
use fintrack::error::FinanceResult;
use fintrack::logging::init_tracing;
use fintrack::models::{BudgetUsageRecord, DateRange, Transaction, TrendPoint};
use fintrack::operations::add::add_transaction_to_db;
use fintrack::operations::budget::{
    add_category_db, decrease_budget_db, increase_budget_db, list_budgets_db, set_budget_db,
};
use fintrack::operations::clear::{clear_all_db, clear_range_db};
use fintrack::operations::import::{
    ImportOptions, ImportSummary, import_categories_to_db, import_transactions_to_db,
};
use fintrack::operations::remove::remove_transaction_from_db;
use fintrack::operations::report::run_report;
use fintrack::operations::search_by_category::search_transactions_by_category_db;
use fintrack::operations::seed::seed_if_empty;
use fintrack::parse::parse_date;
use rusqlite::Connection;
use std::io::{self, BufRead};
use std::path::Path;
use std::process;

const DEFAULT_RECENT_LIMIT: usize = 20;
const DEFAULT_TREND_MONTHS: u32 = 6;

pub enum UserCommands {
    Add,
    Category,
    Import,
    Remove,
    Search,
    Print,
    Range,
    Budget,
    Usage,
    Over,
    Spending,
    Total,
    Trend,
    Monthly,
    Months,
    Accounts,
    Clear,
    Report,
    Help,
    Exit,
    Unknown,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let conn = match db::connection::establish_connection(&cli.db) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Failed to open database '{}': {}", cli.db.display(), e);
            process::exit(1);
        }
    };

    match seed_if_empty(&conn, &cli.data_dir) {
        Ok(report) if report.categories_imported + report.default_categories + report.transactions_imported > 0 => {
            println!(
                "Initial setup: {} categories imported, {} default categories added, {} transactions imported.",
                report.categories_imported, report.default_categories, report.transactions_imported
            );
        }
        Ok(_) => {}
        Err(e) => println!("Error loading initial data: {}", e),
    }

    let tracker = FinanceTracker::new(&conn);
    println!("Welcome to the finance tracker! Type 'help' to list the commands.");

    loop {
        println!("Please enter a command:");

        let input = match read_user_input() {
            Ok(Some(cmd)) => cmd,
            Ok(None) => {
                println!("End of input. Exiting the application.");
                break;
            }
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        let args = &parts[1..];

        match check_for_command(parts[0]) {
            UserCommands::Add => {
                println!(
                    "Add command selected. Please enter transaction details in the format:\n\
                     date(YYYY-MM-DD), amount, category, description, account type, payment method"
                );
                let Some(details) = prompt() else { continue };
                match add_transaction_to_db(&conn, &details) {
                    Ok(id) => println!("Transaction {} added successfully!", id),
                    Err(e) => {
                        println!("Error adding transaction: {}", e);
                        println!("Please try again.");
                    }
                }
            }
            UserCommands::Category => {
                println!("Category command selected. Please enter: name, monthly budget, priority(High/Medium/Low)[, icon]");
                let Some(details) = prompt() else { continue };
                match add_category_db(&conn, &details) {
                    Ok(id) => println!("Category {} added successfully!", id),
                    Err(e) => println!("Error adding category: {}", e),
                }
            }
            UserCommands::Import => handle_import(&conn, args),
            UserCommands::Remove => {
                println!("Remove command selected. Provide the transaction ID to remove:");
                let Some(id) = prompt() else { continue };
                match remove_transaction_from_db(&conn, &id) {
                    Ok(_) => println!("Transaction removed successfully."),
                    Err(err) => println!("Error: {}", err),
                }
            }
            UserCommands::Search => {
                println!("Search command selected. Provide the category to search for:");
                let Some(category) = prompt() else { continue };
                match search_transactions_by_category_db(&conn, &category) {
                    Ok(transactions) if transactions.is_empty() => {
                        println!("No transactions found for category: {}", category);
                    }
                    Ok(transactions) => {
                        println!("Transactions found for category '{}':", category);
                        print_transactions(&transactions);
                    }
                    Err(err) => println!("Error searching transactions: {}", err),
                }
            }
            UserCommands::Print => {
                let limit = args
                    .first()
                    .and_then(|n| n.parse::<usize>().ok())
                    .unwrap_or(DEFAULT_RECENT_LIMIT);
                match repository::get_recent_transactions(&conn, limit) {
                    Ok(list) => {
                        println!("Most recent transactions:");
                        print_transactions(&list);
                    }
                    Err(err) => println!("Error listing transactions: {}", err),
                }
            }
            UserCommands::Range => {
                let [start, end] = args else {
                    println!("Usage: range <start YYYY-MM-DD> <end YYYY-MM-DD>");
                    continue;
                };
                let result = parse_date(start)
                    .and_then(|start| Ok(DateRange::between(start, parse_date(end)?)))
                    .and_then(|range| repository::get_transactions_in_range(&conn, range));
                match result {
                    Ok(list) => print_transactions(&list),
                    Err(err) => println!("Error: {}", err),
                }
            }
            UserCommands::Budget => handle_budget(&conn, args),
            UserCommands::Usage => {
                let period = period_arg(args);
                match tracker.calculate_budget_usage(period) {
                    Ok(usage) => {
                        println!("Budget usage ({}):", period.describe());
                        print_usage(&usage);
                    }
                    Err(err) => println!("Error calculating budget usage: {}", err),
                }
            }
            UserCommands::Over => {
                let period = period_arg(args);
                match tracker.get_over_budget_categories(period) {
                    Ok(over) if over.is_empty() => println!("No categories over budget ({}).", period.describe()),
                    Ok(over) => {
                        println!("Over budget ({}):", period.describe());
                        print_usage(&over);
                    }
                    Err(err) => println!("Error: {}", err),
                }
            }
            UserCommands::Spending => {
                let period = period_arg(args);
                match tracker.get_spending_by_category(period) {
                    Ok(spending) => {
                        println!("Spending by category ({}):", period.describe());
                        for (category, amount) in spending {
                            println!("  {:<20} {:>12}", category, amount.round_dp(2));
                        }
                    }
                    Err(err) => println!("Error: {}", err),
                }
            }
            UserCommands::Total => {
                let period = period_arg(args);
                match tracker.total_spent(period) {
                    Ok(total) => println!("Total spent ({}): {}", period.describe(), total.round_dp(2)),
                    Err(err) => println!("Error: {}", err),
                }
            }
            UserCommands::Trend => {
                let months = args
                    .first()
                    .and_then(|n| n.parse::<u32>().ok())
                    .unwrap_or(DEFAULT_TREND_MONTHS);
                match tracker.get_spending_trend(months) {
                    Ok(points) => print_trend(&points),
                    Err(err) => println!("Error: {}", err),
                }
            }
            UserCommands::Monthly => {
                let [start, end] = args else {
                    println!("Usage: monthly <start YYYY-MM-DD> <end YYYY-MM-DD>");
                    continue;
                };
                let result = parse_date(start)
                    .and_then(|start| Ok((start, parse_date(end)?)))
                    .and_then(|(start, end)| tracker.get_monthly_trend(start, end));
                match result {
                    Ok(points) => print_trend(&points),
                    Err(err) => println!("Error: {}", err),
                }
            }
            UserCommands::Months => match tracker.available_months() {
                Ok(months) => {
                    for (token, label) in months {
                        println!("  {}  {}", token, label);
                    }
                }
                Err(err) => println!("Error: {}", err),
            },
            UserCommands::Accounts => {
                let result = repository::distinct_account_types(&conn)
                    .and_then(|accounts| Ok((accounts, repository::distinct_payment_methods(&conn)?)));
                match result {
                    Ok((accounts, methods)) => {
                        println!("Account types: {}", accounts.join(", "));
                        println!("Payment methods: {}", methods.join(", "));
                    }
                    Err(err) => println!("Error: {}", err),
                }
            }
            UserCommands::Clear => handle_clear(&conn, args),
            UserCommands::Report => {
                let period = period_arg(args);
                if let Err(err) = run_report(&tracker, period, DEFAULT_TREND_MONTHS) {
                    println!("Error showing report: {}", err);
                }
            }
            UserCommands::Help => print_help(),
            UserCommands::Exit => {
                println!("Exiting the application.");
                break;
            }
            UserCommands::Unknown => {
                println!("Unknown command '{}'. Type 'help' to list the commands.", parts[0]);
            }
        }
    }
}

fn read_user_input() -> Result<Option<String>, String> {
    read_line_from(&mut io::stdin().lock())
}

/// Reads one trimmed line. `None` once the input is closed.
fn read_line_from(reader: &mut impl BufRead) -> Result<Option<String>, String> {
    let mut input = String::new();
    let read = reader
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn prompt() -> Option<String> {
    match read_user_input() {
        Ok(details) => details,
        Err(e) => {
            println!("Error reading input: {}", e);
            None
        }
    }
}

fn check_for_command(input: &str) -> UserCommands {
    match input {
        "add" => UserCommands::Add,
        "category" => UserCommands::Category,
        "import" => UserCommands::Import,
        "remove" => UserCommands::Remove,
        "search" => UserCommands::Search,
        "print" => UserCommands::Print,
        "range" => UserCommands::Range,
        "budget" => UserCommands::Budget,
        "usage" => UserCommands::Usage,
        "over" => UserCommands::Over,
        "spending" => UserCommands::Spending,
        "total" => UserCommands::Total,
        "trend" => UserCommands::Trend,
        "monthly" => UserCommands::Monthly,
        "months" => UserCommands::Months,
        "accounts" => UserCommands::Accounts,
        "clear" => UserCommands::Clear,
        "report" => UserCommands::Report,
        "help" => UserCommands::Help,
        "exit" | "quit" => UserCommands::Exit,
        _ => UserCommands::Unknown,
    }
}

fn period_arg(args: &[&str]) -> Period {
    args.first().map(|token| Period::lenient(token)).unwrap_or(Period::CurrentMonth)
}

fn handle_import(conn: &Connection, args: &[&str]) {
    let kind = args.first().copied().unwrap_or("transactions");
    println!("Import command selected. Please enter the CSV file path to import {} from:", kind);
    let Some(path) = prompt() else { return };
    let path = Path::new(&path);

    let result = match kind {
        "categories" => import_categories_to_db(conn, path),
        "transactions" => import_transactions_to_db(conn, path, ImportOptions::default()),
        other => {
            println!("Unknown import kind '{}'. Use 'categories' or 'transactions'.", other);
            return;
        }
    };
    match result {
        Ok(summary) => print_import_summary(&summary),
        Err(err) => println!("Error importing {}: {}", kind, err),
    }
}

fn handle_budget(conn: &Connection, args: &[&str]) {
    let result = match args {
        ["list"] | [] => list_budgets_db(conn).map(|categories| {
            for c in categories {
                println!(
                    "  {:<20} {:>10}  {:<6}  {}",
                    c.name,
                    c.monthly_budget.round_dp(2),
                    c.priority,
                    c.icon
                );
            }
        }),
        [action @ ("set" | "increase" | "decrease"), category @ .., amount] if !category.is_empty() => {
            let category = category.join(" ");
            let outcome = match *action {
                "set" => set_budget_db(conn, &category, amount),
                "increase" => increase_budget_db(conn, &category, amount),
                _ => decrease_budget_db(conn, &category, amount),
            };
            outcome.map(|_| println!("Budget for '{}' updated.", category))
        }
        _ => {
            println!("Usage: budget list | budget set|increase|decrease <category> <amount>");
            Ok(())
        }
    };
    if let Err(err) = result {
        println!("Error: {}", err);
    }
}

fn handle_clear(conn: &Connection, args: &[&str]) {
    let result: FinanceResult<Option<usize>> = match args {
        ["all"] => {
            println!("This deletes every transaction. Type 'yes' to confirm:");
            match prompt().as_deref() {
                Some("yes") => clear_all_db(conn).map(Some),
                _ => Ok(None),
            }
        }
        [start, end] => clear_range_db(conn, start, end).map(Some),
        _ => {
            println!("Usage: clear all | clear <start YYYY-MM-DD> <end YYYY-MM-DD>");
            return;
        }
    };
    match result {
        Ok(Some(deleted)) => println!("Deleted {} transactions.", deleted),
        Ok(None) => println!("Nothing deleted."),
        Err(err) => println!("Error clearing transactions: {}", err),
    }
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("  (none)");
    }
    for t in transactions {
        println!(
            "  #{:<5} {}  {:>10}  {:<16} {}  [{} / {}]",
            t.id,
            t.date,
            t.amount.round_dp(2),
            t.category,
            t.description,
            t.account_type,
            t.payment_method
        );
    }
}

fn print_usage(usage: &[BudgetUsageRecord]) {
    for record in usage {
        let flag = if record.is_over_budget() { " OVER" } else { "" };
        println!(
            "  {:<20} {:>10} / {:>10}  {:>7}%  left {:>10}{}",
            record.category,
            record.spent.round_dp(2),
            record.budget.round_dp(2),
            record.percentage.round_dp(1),
            record.remaining().round_dp(2),
            flag
        );
    }
}

fn print_trend(points: &[TrendPoint]) {
    for point in points {
        println!("  {:<10} {:>12}", point.month_label, point.total_spent.round_dp(2));
    }
}

fn print_import_summary(summary: &ImportSummary) {
    println!("Successfully imported {} rows.", summary.imported);
    for skipped in &summary.skipped {
        println!("  skipped line {}: {}", skipped.line, skipped.reason);
    }
}

fn print_help() {
    println!(
        "Commands:\n\
         \x20 add                                  add a transaction\n\
         \x20 category                             add a category\n\
         \x20 import [categories|transactions]     import a CSV file\n\
         \x20 remove                               remove a transaction by id\n\
         \x20 search                               list transactions of a category\n\
         \x20 print [n]                            show the n most recent transactions\n\
         \x20 range <start> <end>                  show transactions between two dates\n\
         \x20 budget list | set|increase|decrease <category> <amount>\n\
         \x20 usage|over|spending|total [period]   period: month, prev_month, year, all, YYYY-MM\n\
         \x20 trend [n]                            spending of the last n months\n\
         \x20 monthly <start> <end>                spending per calendar month\n\
         \x20 months                               months with recorded history\n\
         \x20 accounts                             account types and payment methods in use\n\
         \x20 clear all | clear <start> <end>      delete transactions\n\
         \x20 report [period]                      dashboard (press q to leave)\n\
         \x20 exit"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_line_from_trims_lines() {
        let mut input = io::Cursor::new("  usage month \n\nexit\n");
        assert_eq!(read_line_from(&mut input).unwrap(), Some("usage month".to_string()));
        assert_eq!(read_line_from(&mut input).unwrap(), Some(String::new()));
        assert_eq!(read_line_from(&mut input).unwrap(), Some("exit".to_string()));
    }

    #[test]
    fn test_read_line_from_reports_end_of_input() {
        let mut input = io::Cursor::new("last");
        assert_eq!(read_line_from(&mut input).unwrap(), Some("last".to_string()));
        assert_eq!(read_line_from(&mut input).unwrap(), None);
        assert_eq!(read_line_from(&mut io::empty()).unwrap(), None);
    }
}
