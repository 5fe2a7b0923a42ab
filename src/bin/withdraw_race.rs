//! Concurrent Withdrawal Stress Tool
//!
//! Fires many simultaneous withdrawals at one user and checks that the
//! ledger never overdraws.
//!
//! Run with: cargo run --bin withdraw_race --release -- --requests 200 --deposit 1000 --amount 7.50

use std::sync::Arc;
use std::time::Instant;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use statement_ledger::db;
use statement_ledger::handlers::StatementService;
use statement_ledger::ledger::PgStatementRepository;
use statement_ledger::users::PgUserRepository;
use statement_ledger::{AppError, DomainError};

fn arg<T: std::str::FromStr>(args: &[String], name: &str, default: T) -> T {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Number of withdrawals of `amount` that `deposit` can cover, capped at `requests`
fn expected_accepted(deposit: Decimal, amount: Decimal, requests: usize) -> anyhow::Result<usize> {
    anyhow::ensure!(amount > Decimal::ZERO, "--amount must be positive, got {}", amount);
    anyhow::ensure!(deposit > Decimal::ZERO, "--deposit must be positive, got {}", deposit);

    Ok((deposit / amount)
        .floor()
        .to_usize()
        .unwrap_or(usize::MAX)
        .min(requests))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let requests: usize = arg(&args, "--requests", 200);
    let deposit: Decimal = arg(&args, "--deposit", Decimal::new(1000, 0));
    let amount: Decimal = arg(&args, "--amount", Decimal::new(750, 2));

    let expected_accepted = expected_accepted(deposit, amount, requests)?;

    let database_url = std::env::var("DATABASE_URL")?;

    println!("Withdraw Race - {} withdrawals of {} against {}", requests, amount, deposit);
    println!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    db::apply_migrations(&pool).await?;

    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, name, email, password) VALUES ($1, 'withdraw race', $2, 'unused')")
        .bind(user_id)
        .bind(format!("{}@withdraw-race.local", user_id))
        .execute(&pool)
        .await?;

    let service = Arc::new(StatementService::new(
        PgStatementRepository::new(pool.clone()),
        PgUserRepository::new(pool.clone()),
    ));

    service.create_deposit(user_id, deposit, "withdraw race funding").await?;

    let start = Instant::now();
    let mut handles = Vec::with_capacity(requests);

    for _ in 0..requests {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.create_withdraw(user_id, amount, "withdraw race").await
        }));
    }

    let mut accepted = 0usize;
    let mut refused = 0usize;
    let mut failed = 0usize;

    for handle in handles {
        match handle.await? {
            Ok(_) => accepted += 1,
            Err(AppError::Domain(DomainError::InsufficientFunds { .. })) => refused += 1,
            Err(e) => {
                eprintln!("Unexpected error: {}", e);
                failed += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    let (balance, statements) = service.get_balance(user_id).await?;

    println!("\n=== Withdraw Race Results ===");
    println!("Requests: {}", requests);
    println!("Accepted: {} (expected {})", accepted, expected_accepted);
    println!("Refused: {}", refused);
    println!("Failed: {}", failed);
    println!("Statements: {}", statements.len());
    println!("Final balance: {}", balance);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} requests/sec", requests as f64 / elapsed.as_secs_f64());

    anyhow::ensure!(balance.value() >= Decimal::ZERO, "balance went negative: {}", balance);
    anyhow::ensure!(statements.len() == accepted + 1, "statement count does not match accepted withdrawals");
    if failed == 0 {
        anyhow::ensure!(accepted == expected_accepted, "accepted {} withdrawals, expected {}", accepted, expected_accepted);
    }

    Ok(())
}
