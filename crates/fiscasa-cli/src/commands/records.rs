use chrono::Local;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use fiscasa_core::property::records::find_record_mut;
use fiscasa_core::property::{generate_monthly_records, ExpenseCategory, MonthlyRecord, NewExpense};
use fiscasa_core::report::PropertyDataset;

use crate::commands::{check_month, date_or_today};
use crate::input;

/// Arguments for creating the monthly register
#[derive(Args)]
pub struct GenerateRecordsArgs {
    /// Path to the property dataset; updated in place
    #[arg(long)]
    pub data: String,
}

/// Arguments for recording a month's rent
#[derive(Args)]
pub struct RegisterIncomeArgs {
    /// Path to the property dataset; updated in place
    #[arg(long)]
    pub data: String,

    /// Month (1-12)
    #[arg(long)]
    pub month: u32,

    #[arg(long)]
    pub year: i32,

    /// Rent received; zero clears the month
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Date the rent was received (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Flag the rent as overdue instead of registering it
    #[arg(long, conflicts_with_all = ["amount", "clear"])]
    pub late: bool,

    /// Forget the rent recorded for the month
    #[arg(long, conflicts_with = "amount")]
    pub clear: bool,
}

/// Arguments for adding an extra expense
#[derive(Args)]
pub struct AddExpenseArgs {
    /// Path to the property dataset; updated in place
    #[arg(long)]
    pub data: String,

    /// Month (1-12)
    #[arg(long)]
    pub month: u32,

    #[arg(long)]
    pub year: i32,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub amount: Decimal,

    /// Date of the expense (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Count as an ordinary expense (default: extraordinary)
    #[arg(long)]
    pub ordinary: bool,
}

/// Arguments for removing an extra expense
#[derive(Args)]
pub struct RemoveExpenseArgs {
    /// Path to the property dataset; updated in place
    #[arg(long)]
    pub data: String,

    /// Month (1-12)
    #[arg(long)]
    pub month: u32,

    #[arg(long)]
    pub year: i32,

    /// Expense id, e.g. exp-202603-1
    pub id: String,
}

pub fn run_generate_records(args: GenerateRecordsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut dataset = load(&args.data)?;
    let generated = generate_monthly_records(&dataset.profile);
    if generated.is_empty() {
        return Err("lease start and end dates are required to generate records".into());
    }

    let mut added = 0;
    for record in generated {
        if find_record_mut(&mut dataset.records, record.month, record.year).is_none() {
            dataset.records.push(record);
            added += 1;
        }
    }
    dataset.records.sort_by_key(|r| (r.year, r.month));
    save(&args.data, &dataset)?;

    Ok(json!({ "added": added, "records": dataset.records.len() }))
}

pub fn run_register_income(args: RegisterIncomeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let month = check_month(args.month)?;
    let mut dataset = load(&args.data)?;
    let today = Local::now().date_naive();
    let received = args.date.as_deref().map(|d| date_or_today(Some(d))).transpose()?;

    let record = record_for(&mut dataset, month, args.year);
    if args.late {
        record.mark_late();
    } else if args.clear {
        record.clear_income();
    } else {
        let amount = args.amount.ok_or("--amount is required (or pass --clear / --late)")?;
        record.register_income(Some(amount), received, today);
    }
    let value = serde_json::to_value(&*record)?;
    save(&args.data, &dataset)?;
    Ok(value)
}

pub fn run_add_expense(args: AddExpenseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let month = check_month(args.month)?;
    let mut dataset = load(&args.data)?;
    let date = args.date.as_deref().map(|d| date_or_today(Some(d))).transpose()?;

    let record = record_for(&mut dataset, month, args.year);
    let added = record.add_expense(NewExpense {
        description: args.description,
        date,
        amount: args.amount,
        category: if args.ordinary {
            ExpenseCategory::Ordinary
        } else {
            ExpenseCategory::Extraordinary
        },
    });
    let value = serde_json::to_value(added)?;
    save(&args.data, &dataset)?;
    Ok(value)
}

pub fn run_remove_expense(args: RemoveExpenseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let month = check_month(args.month)?;
    let mut dataset = load(&args.data)?;

    let removed = find_record_mut(&mut dataset.records, month, args.year)
        .is_some_and(|r| r.remove_expense(&args.id));
    if !removed {
        return Err(format!("no expense '{}' in {:02}/{}", args.id, month, args.year).into());
    }
    save(&args.data, &dataset)?;
    Ok(json!({ "removed": args.id }))
}

fn load(path: &str) -> Result<PropertyDataset, Box<dyn std::error::Error>> {
    Ok(PropertyDataset::from_json(&input::file::read_text(path)?)?)
}

fn save(path: &str, dataset: &PropertyDataset) -> Result<(), Box<dyn std::error::Error>> {
    input::file::write_text(path, &serde_json::to_string_pretty(dataset)?)
}

/// The record for a month, created empty if the register lacks it.
fn record_for(dataset: &mut PropertyDataset, month: u32, year: i32) -> &mut MonthlyRecord {
    let index = match dataset.records.iter().position(|r| r.is_for(month, year)) {
        Some(i) => i,
        None => {
            let fee = dataset.profile.condominium_fee;
            dataset.records.push(MonthlyRecord::awaited(month, year, fee));
            dataset.records.len() - 1
        }
    };
    &mut dataset.records[index]
}
