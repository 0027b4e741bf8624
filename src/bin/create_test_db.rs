use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{
    OffsetDateTime,
    macros::{date, datetime},
};

use finance_tracker::{
    auth::{PasswordHash, create_user, verify_user_email},
    budget::{BudgetUpsert, upsert_budget},
    income_source::{NewIncomeSource, create_income_source},
    initialize_db,
    transaction::{NewTransaction, TransactionKind, create_transaction},
};

/// A utility for creating a test database for the finance tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "test";

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let mut conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {DEMO_EMAIL} with the password \"{DEMO_PASSWORD}\"...");
    let password_hash = PasswordHash::new(DEMO_PASSWORD, PasswordHash::DEFAULT_COST)?;
    let user = create_user(DEMO_EMAIL, &password_hash, "demo-verification", &conn)?;
    verify_user_email("demo-verification", &conn)?;

    println!("Creating transactions...");
    let transactions = [
        (3000.0, TransactionKind::Income, "Salary", "Monthly pay", date!(2024 - 01 - 01)),
        (1200.0, TransactionKind::Expense, "Rent", "January rent", date!(2024 - 01 - 02)),
        (84.3, TransactionKind::Expense, "Groceries", "Weekly shop", date!(2024 - 01 - 06)),
        (12.5, TransactionKind::Expense, "Dining", "Lunch", date!(2024 - 01 - 09)),
        (45.0, TransactionKind::Expense, "Transport", "Bus pass", date!(2024 - 01 - 10)),
        (91.75, TransactionKind::Expense, "groceries", "Weekly shop", date!(2024 - 01 - 13)),
        (250.0, TransactionKind::Income, "Freelance", "Logo design", date!(2024 - 01 - 20)),
    ];
    for (amount, kind, category, description, date) in transactions {
        create_transaction(
            user.id,
            &NewTransaction {
                amount,
                kind,
                category: category.to_owned(),
                description: description.to_owned(),
                date,
            },
            &conn,
        )?;
    }

    println!("Creating budgets...");
    for (category, amount) in [("Groceries", 400.0), ("Dining", 100.0), ("Transport", 80.0)] {
        upsert_budget(
            user.id,
            &BudgetUpsert {
                category: category.to_owned(),
                amount,
            },
            &mut conn,
        )?;
    }

    println!("Creating income sources...");
    create_income_source(
        user.id,
        &NewIncomeSource {
            source_name: "Salary".to_owned(),
            amount: 3000.0,
            frequency: "monthly".to_owned(),
            next_date: date!(2024 - 02 - 01),
        },
        datetime!(2024-01-01 09:00 UTC),
        &conn,
    )?;
    create_income_source(
        user.id,
        &NewIncomeSource {
            source_name: "Freelance".to_owned(),
            amount: 250.0,
            frequency: "irregular".to_owned(),
            next_date: OffsetDateTime::now_utc().date(),
        },
        OffsetDateTime::now_utc(),
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
