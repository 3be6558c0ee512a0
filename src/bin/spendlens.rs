use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use spendlens::{
    AnalyticsPeriod, Category, CategoryFilter, Clock, Config, Coordinator, DEFAULT_CURRENCY_SYMBOL,
    DEFAULT_DB_PATH, DEFAULT_TIMEZONE, DatePreset, DateRange, SQLiteStore, SortKey, SystemClock,
    Transaction, TransactionId, TransactionPatch, format_currency, format_currency_rounded,
    parse_occurred_at, range_label, relative_time_label, setup_logging,
};

/// Track, filter and summarise personal expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// File path to the SQLite database.
    #[arg(long, env = "SPENDLENS_DB", default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// Canonical IANA name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, env = "SPENDLENS_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Symbol printed before amounts.
    #[arg(long, env = "SPENDLENS_CURRENCY", default_value = DEFAULT_CURRENCY_SYMBOL)]
    currency: String,

    /// Also write debug logs to this file.
    #[arg(long)]
    debug_log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List transactions matching the filters.
    List(ListArgs),
    /// Summarise spending over a period.
    Analytics(AnalyticsArgs),
    /// Record a new expense.
    Add(AddArgs),
    /// Change fields of an existing expense.
    Update(UpdateArgs),
    /// Delete an expense.
    Remove {
        /// ID of the transaction to delete.
        id: String,
    },
    /// List the category names.
    Categories,
    /// Delete every stored transaction.
    Clear,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Only show this category, or "All Categories".
    #[arg(long, default_value = "All Categories")]
    category: String,

    /// Only show transactions whose description or category contains this text.
    #[arg(long, default_value = "")]
    search: String,

    /// Date range preset: "Last 7 Days", "Last 30 Days", "Last 90 Days" or "This Year".
    #[arg(long, default_value = "Last 30 Days")]
    range: String,

    /// Start of a custom date range (YYYY-MM-DD or RFC 3339). Overrides --range.
    #[arg(long)]
    from: Option<String>,

    /// End of a custom date range (YYYY-MM-DD or RFC 3339). Defaults to today.
    #[arg(long)]
    to: Option<String>,

    /// Sort order: Date, Amount, Category or Name.
    #[arg(long, default_value = "Date")]
    sort: String,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct AnalyticsArgs {
    /// Period: Day, Week, Month, 3M or Year.
    #[arg(long, default_value = "Week")]
    period: String,

    /// How many categories to show in the top spending list.
    #[arg(long, default_value_t = 4)]
    top: usize,

    /// Print JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Amount spent, e.g. 15.50.
    amount: String,

    /// Category name. Unknown names are recorded as "Other".
    category: String,

    #[arg(long)]
    description: Option<String>,

    /// When the expense happened (YYYY-MM-DD or RFC 3339). Defaults to now.
    #[arg(long)]
    date: Option<String>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    /// ID of the transaction to change.
    id: String,

    #[arg(long)]
    amount: Option<String>,

    #[arg(long)]
    category: Option<String>,

    /// New description. An empty string removes it.
    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    date: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = setup_logging(LevelFilter::WARN, cli.debug_log.as_deref()) {
        eprintln!("Could not open the debug log: {error}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = Config {
        db_path: cli.db_path,
        local_timezone: cli.timezone,
        currency_symbol: cli.currency,
        ..Default::default()
    };

    match cli.command {
        Command::List(args) => {
            config.date_range = DateRange::Preset(DatePreset::from_label(&args.range));
            config.sort_key = SortKey::from_label(&args.sort);
            let mut coordinator = config.open_coordinator().await?;
            warn_if_load_failed(&coordinator);

            coordinator.set_category_filter(CategoryFilter::from_label(&args.category));
            coordinator.set_search_text(&args.search);

            if args.from.is_some() || args.to.is_some() {
                let now = config.clock()?.now();
                let start = parse_occurred_at(args.from.as_deref(), now)?;
                let end = parse_occurred_at(args.to.as_deref(), now)?;
                coordinator.set_date_range(DateRange::Custom { start, end });
            }

            print_list(&coordinator, &config, args.json)?;
        }
        Command::Analytics(args) => {
            config.analytics_period = AnalyticsPeriod::from_label(&args.period);
            let coordinator = config.open_coordinator().await?;
            warn_if_load_failed(&coordinator);

            print_analytics(&coordinator, &config, args.top, args.json)?;
        }
        Command::Add(args) => {
            let mut coordinator = config.open_coordinator().await?;

            let mut builder = Transaction::build(&args.amount, &args.category);
            if let Some(description) = &args.description {
                builder = builder.description(description);
            }
            if let Some(date) = &args.date {
                builder = builder.occurred_at(date);
            }

            let transaction = coordinator.add(builder).await?;
            println!(
                "Added {} {} ({})",
                format_currency(transaction.amount, &config.currency_symbol),
                transaction.display_name(),
                transaction.id
            );
        }
        Command::Update(args) => {
            let mut coordinator = config.open_coordinator().await?;
            let patch = TransactionPatch {
                amount: args.amount,
                category: args.category,
                description: args.description,
                occurred_at: args.date,
            };

            let transaction = coordinator
                .update(&TransactionId::new_unchecked(&args.id), patch)
                .await?;
            println!(
                "Updated {}: {} {}",
                transaction.id,
                format_currency(transaction.amount, &config.currency_symbol),
                transaction.display_name()
            );
        }
        Command::Remove { id } => {
            let mut coordinator = config.open_coordinator().await?;

            let transaction = coordinator.remove(&TransactionId::new_unchecked(&id)).await?;
            println!("Removed {}", transaction.id);
        }
        Command::Categories => {
            for category in Category::ALL {
                println!("{category}");
            }
        }
        Command::Clear => {
            SQLiteStore::open(&config.db_path)?.clear()?;
            println!("Deleted all transactions in {}", config.db_path.display());
        }
    }

    Ok(())
}

fn warn_if_load_failed(coordinator: &Coordinator<SQLiteStore, SystemClock>) {
    if coordinator.load_failed() {
        eprintln!("Warning: the stored transactions could not be read, showing nothing.");
    }
}

fn print_list(
    coordinator: &Coordinator<SQLiteStore, SystemClock>,
    config: &Config,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let transactions = coordinator.filtered_sorted_view();

    if json {
        println!("{}", serde_json::to_string_pretty(transactions)?);
        return Ok(());
    }

    let now = config.clock()?.now();
    for transaction in transactions {
        println!(
            "{:<28} {:<14} {:<28} {:>12}  {}",
            relative_time_label(transaction.occurred_at, now)?,
            transaction.category,
            transaction.display_name(),
            format_currency(transaction.amount, &config.currency_symbol),
            transaction.id
        );
    }

    let total: f64 = transactions.iter().map(|transaction| transaction.amount).sum();
    println!(
        "{} transactions, {} total",
        transactions.len(),
        format_currency(total, &config.currency_symbol)
    );

    Ok(())
}

fn print_analytics(
    coordinator: &Coordinator<SQLiteStore, SystemClock>,
    config: &Config,
    top: usize,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let view = coordinator.analytics_view();
    let symbol = &config.currency_symbol;

    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!("{} ({})", view.label, range_label(&view.range)?);
    println!("Total spent:   {}", format_currency(view.total_amount, symbol));
    println!(
        "Daily average: {}",
        format_currency(view.avg_daily_spending, symbol)
    );
    match view.most_spent_category {
        Some(entry) => println!(
            "Most spent:    {} ({})",
            entry.category,
            format_currency(entry.total, symbol)
        ),
        None => println!("Most spent:    -"),
    }

    println!();
    println!("By category:");
    for share in view.category_shares() {
        println!(
            "  {:<14} {:>12} {:>4}%",
            share.category,
            format_currency(share.total, symbol),
            share.percent
        );
    }

    println!();
    println!("Top {top}:");
    for entry in view.top_categories(top) {
        println!(
            "  {:<14} {:>12}",
            entry.category,
            format_currency(entry.total, symbol)
        );
    }

    println!();
    println!("Trend:");
    for (label, total) in view.series.labels.iter().zip(view.series.rounded_series()) {
        println!("  {:<6} {:>10}", label, format_currency_rounded(total, symbol));
    }

    Ok(())
}
