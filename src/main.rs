//! Mortgage System CLI
//!
//! Runs a single loan configuration and prints the schedule plus summary
//! metrics, optionally writing the full schedule to CSV.

use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use mortgage_system::config::{BankLoanTerms, FamilyLoanTerms, LoanKind};
use mortgage_system::{build_schedule, LoanConfiguration};

#[derive(Parser, Debug)]
#[command(name = "mortgage_system", about = "Home-purchase financing projector")]
struct Args {
    /// JSON file holding a LoanConfiguration; omit to run the built-in demo
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the full monthly schedule as CSV
    #[arg(long, default_value = "schedule_output.csv")]
    output: PathBuf,

    /// How many leading months to print to the console
    #[arg(long, default_value_t = 24)]
    print_months: usize,
}

/// Demo configuration: $1M purchase, 20% down, 6.3% fixed bank loan with a
/// $300k family loan at 4.5%
fn demo_config() -> LoanConfiguration {
    LoanConfiguration {
        home_price: 1_000_000.0,
        down_payment: 200_000.0,
        bank: BankLoanTerms {
            kind: LoanKind::Fixed,
            annual_rate_pct: 6.3,
            term_months: 360,
            ..Default::default()
        },
        closing_costs: 12_000.0,
        family: Some(FamilyLoanTerms {
            principal: 300_000.0,
            annual_rate_pct: 4.5,
            term_months: 360,
            alternative_return_pct: 7.0,
            alternative_return_tax_rate: 0.25,
            reinvestment_return_pct: 5.0,
            ..Default::default()
        }),
        horizon_years: 30,
        discount_rate_pct: 5.0,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading configuration {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing configuration {}", path.display()))?
        }
        None => demo_config(),
    };

    println!("Mortgage System v0.1.0");
    println!("======================\n");
    println!("Home price:      ${:>12.2}", config.home_price);
    println!("Down payment:    ${:>12.2}", config.down_payment);
    println!("Bank principal:  ${:>12.2}", config.bank_principal());
    println!("Family loan:     ${:>12.2}", config.family_principal());
    println!();

    let result = build_schedule(&config);

    println!("Schedule ({} months):", result.rows.len());
    println!(
        "{:>5} {:>4} {:>11} {:>11} {:>12} {:>11} {:>12} {:>8} {:>11} {:>12}",
        "Month", "Year", "BankPmt", "BankInt", "BankBal", "FamPmt", "FamBal", "PMI", "Total", "Equity"
    );
    println!("{}", "-".repeat(110));

    for row in result.rows.iter().take(args.print_months) {
        println!(
            "{:>5} {:>4} {:>11.2} {:>11.2} {:>12.2} {:>11.2} {:>12.2} {:>8.2} {:>11.2} {:>12.2}",
            row.month,
            row.year,
            row.bank_payment,
            row.bank_interest,
            row.bank_balance,
            row.family_payment,
            row.family_balance,
            row.pmi,
            row.total_monthly,
            row.equity,
        );
    }
    if result.rows.len() > args.print_months {
        println!("... ({} more months)", result.rows.len() - args.print_months);
    }

    mortgage_system::export::write_csv_file(&args.output, &result.rows)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("\nFull schedule written to: {}", args.output.display());

    println!("\nSummary:");
    println!("  Total bank interest:      ${:>14.2}", result.cumulative_bank_interest);
    println!("  Total family interest:    ${:>14.2}", result.cumulative_family_interest);
    println!("  Reinvestment earnings:    ${:>14.2}", result.cumulative_reinvestment_earnings);
    println!("  Reinvestment pot:         ${:>14.2}", result.reinvestment_pot);
    println!("  Owner NPV:                ${:>14.2}", result.owner_npv);
    println!("  Household NPV:            ${:>14.2}", result.household_npv);
    println!("  Owner IRR (annualized):   {:>14.4}", result.owner_irr);
    println!("  Household IRR:            {:>14.4}", result.household_irr);

    for track in &result.investment_tracks {
        println!(
            "  Track {:<20} balance ${:>12.2}  profit ${:>12.2}",
            track.label, track.final_balance, track.profit
        );
    }

    Ok(())
}
