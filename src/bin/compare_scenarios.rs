//! Side-by-side comparison of named financing scenarios
//!
//! Runs every scenario's schedule in parallel and prints yearly cumulative
//! values aligned on a shared year axis.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use mortgage_system::config::{BankLoanTerms, FamilyLoanTerms, LoanConfiguration, LoanKind};
use mortgage_system::{ComparisonMetric, FinancingVariant, Scenario, ScenarioRunner};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    /// Cumulative household-inclusive cost
    HouseholdCost,
    /// Cumulative bank + family interest
    Interest,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    BankOnly,
    FamilyAssisted,
}

#[derive(Parser, Debug)]
#[command(name = "compare_scenarios", about = "Compare named financing scenarios year by year")]
struct Args {
    /// JSON file holding a list of scenarios; omit to run the built-in set
    #[arg(long)]
    scenarios: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "household-cost")]
    metric: MetricArg,

    #[arg(long, value_enum, default_value = "family-assisted")]
    variant: VariantArg,
}

/// Built-in demo: the same purchase financed three ways
fn demo_scenarios() -> Vec<Scenario> {
    let base = LoanConfiguration {
        home_price: 1_000_000.0,
        down_payment: 200_000.0,
        bank: BankLoanTerms {
            kind: LoanKind::Fixed,
            annual_rate_pct: 6.3,
            term_months: 360,
            ..Default::default()
        },
        horizon_years: 30,
        discount_rate_pct: 5.0,
        ..Default::default()
    };

    let mut family_30 = base.clone();
    family_30.family = Some(FamilyLoanTerms {
        principal: 300_000.0,
        annual_rate_pct: 4.5,
        term_months: 360,
        alternative_return_pct: 7.0,
        alternative_return_tax_rate: 0.25,
        reinvestment_return_pct: 5.0,
        ..Default::default()
    });

    let mut family_15 = family_30.clone();
    if let Some(f) = family_15.family.as_mut() {
        f.term_months = 180;
    }

    vec![
        Scenario::new("bank only", base),
        Scenario::new("family 30y", family_30),
        Scenario::new("family 15y", family_15),
    ]
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenarios = match &args.scenarios {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading scenarios {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing scenarios {}", path.display()))?
        }
        None => demo_scenarios(),
    };

    let metric = match args.metric {
        MetricArg::HouseholdCost => ComparisonMetric::HouseholdCost,
        MetricArg::Interest => ComparisonMetric::CumulativeInterest,
    };
    let variant = match args.variant {
        VariantArg::BankOnly => FinancingVariant::BankOnly,
        VariantArg::FamilyAssisted => FinancingVariant::FamilyAssisted,
    };

    let runner = ScenarioRunner::new(scenarios);
    let start = Instant::now();
    let comparison = runner.compare_yearly(variant, metric);
    log::info!("comparison built in {:?}", start.elapsed());

    print!("{:>5}", "Year");
    for series in &comparison.series {
        print!(" {:>18}", series.name);
    }
    println!();
    println!("{}", "-".repeat(6 + 19 * comparison.series.len()));

    for (i, year) in comparison.years.iter().enumerate() {
        print!("{:>5}", year);
        for series in &comparison.series {
            print!(" {:>18.2}", series.values[i]);
        }
        println!();
    }

    Ok(())
}
