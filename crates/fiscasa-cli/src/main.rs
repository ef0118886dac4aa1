mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::cashflow::{AnnualArgs, MonthlyNetArgs, YtdArgs};
use commands::records::{AddExpenseArgs, GenerateRecordsArgs, RegisterIncomeArgs, RemoveExpenseArgs};
use commands::report::ReportArgs;
use commands::schedule::{ScheduleArgs, TogglePaidArgs};
use commands::taxes::{FlatRateArgs, ImuArgs};

/// Fiscal calendar and cash-flow bookkeeping for a residential rental
#[derive(Parser)]
#[command(
    name = "fiscasa",
    version,
    about = "Fiscal calendar and cash-flow bookkeeping for a residential rental",
    long_about = "A CLI for owners of a single Italian residential rental. Computes IMU and \
                  cedolare secca with cent precision, builds the yearly payment calendar, \
                  tracks which obligations are paid and reports the monthly and annual \
                  cash-basis net."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log to stderr. Repeat for more detail (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute annual IMU and its June/December split
    Imu(ImuArgs),
    /// Compute the cedolare secca installments for a year
    FlatRate(FlatRateArgs),
    /// Build the fiscal calendar for a year with paid state
    Schedule(ScheduleArgs),
    /// Mark a fiscal obligation paid or unpaid in the ledger file
    TogglePaid(TogglePaidArgs),
    /// Net result for a single month
    MonthlyNet(MonthlyNetArgs),
    /// Full-year balance breakdown
    Annual(AnnualArgs),
    /// Running net from January through a month
    Ytd(YtdArgs),
    /// Full fiscal and cash-flow overview
    Report(ReportArgs),
    /// Create the monthly register for the lease term
    GenerateRecords(GenerateRecordsArgs),
    /// Register, clear or flag late the rent of a month
    RegisterIncome(RegisterIncomeArgs),
    /// Attach an extra expense to a month
    AddExpense(AddExpenseArgs),
    /// Remove an extra expense by id
    RemoveExpense(RemoveExpenseArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Imu(args) => commands::taxes::run_imu(args),
        Commands::FlatRate(args) => commands::taxes::run_flat_rate(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::TogglePaid(args) => commands::schedule::run_toggle_paid(args),
        Commands::MonthlyNet(args) => commands::cashflow::run_monthly_net(args),
        Commands::Annual(args) => commands::cashflow::run_annual(args),
        Commands::Ytd(args) => commands::cashflow::run_ytd(args),
        Commands::Report(args) => commands::report::run_report(args),
        Commands::GenerateRecords(args) => commands::records::run_generate_records(args),
        Commands::RegisterIncome(args) => commands::records::run_register_income(args),
        Commands::AddExpense(args) => commands::records::run_add_expense(args),
        Commands::RemoveExpense(args) => commands::records::run_remove_expense(args),
        Commands::Version => {
            println!("fiscasa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
