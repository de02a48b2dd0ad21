//! Variant and multi-scenario orchestration
//!
//! A thin composition layer over the pure schedule engine: variants are
//! produced by deriving configurations and calling [`build_schedule`] again,
//! never by threading variant flags through the engine itself.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::LoanConfiguration;
use crate::schedule::{build_schedule, ScheduleResult};

/// Which financing strategy a schedule run models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingVariant {
    /// Family loan removed; the bank carries everything above the
    /// bank-only down payment
    BankOnly,
    /// Configuration as supplied, family loan included
    FamilyAssisted,
}

/// Yearly cumulative metric used for scenario alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMetric {
    /// Cumulative household-inclusive monthly cost
    HouseholdCost,
    /// Cumulative bank plus family interest
    CumulativeInterest,
}

/// A named scenario: a base configuration plus the down payment the buyer
/// would make without family help
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name for comparison output
    pub name: String,

    /// Family-assisted configuration (the family leg may still be `None`,
    /// in which case both variants coincide)
    pub config: LoanConfiguration,

    /// Down payment for the bank-only variant; defaults to the base
    /// configuration's down payment
    #[serde(default)]
    pub bank_only_down_payment: Option<f64>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, config: LoanConfiguration) -> Self {
        Self {
            name: name.into(),
            config,
            bank_only_down_payment: None,
        }
    }

    /// Derive the configuration for a variant
    pub fn variant_config(&self, variant: FinancingVariant) -> LoanConfiguration {
        match variant {
            FinancingVariant::FamilyAssisted => self.config.clone(),
            FinancingVariant::BankOnly => {
                let mut config = self.config.clone();
                config.family = None;
                config.down_payment = self
                    .bank_only_down_payment
                    .unwrap_or(self.config.down_payment);
                config
            }
        }
    }

    /// Build the full schedule for one variant
    pub fn build(&self, variant: FinancingVariant) -> ScheduleResult {
        build_schedule(&self.variant_config(variant))
    }

    /// Build both variants for side-by-side inspection
    pub fn build_both(&self) -> VariantPair {
        VariantPair {
            bank_only: self.build(FinancingVariant::BankOnly),
            family_assisted: self.build(FinancingVariant::FamilyAssisted),
        }
    }
}

/// Both financing variants of one scenario
#[derive(Debug, Clone)]
pub struct VariantPair {
    pub bank_only: ScheduleResult,
    pub family_assisted: ScheduleResult,
}

impl VariantPair {
    /// Lifetime interest saved by the family arrangement (bank + family
    /// interest, bank-only minus family-assisted)
    pub fn interest_saved(&self) -> f64 {
        let bank_only =
            self.bank_only.cumulative_bank_interest + self.bank_only.cumulative_family_interest;
        let assisted = self.family_assisted.cumulative_bank_interest
            + self.family_assisted.cumulative_family_interest;
        bank_only - assisted
    }
}

/// One scenario's values on the shared year axis
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Yearly cumulative values for several scenarios on a shared axis
///
/// Scenarios shorter than the axis hold their final cumulative value for
/// the remaining years.
#[derive(Debug, Clone, Serialize)]
pub struct YearlyComparison {
    /// 1-indexed year axis
    pub years: Vec<u32>,
    pub series: Vec<ScenarioSeries>,
}

/// Runs many independently configured named scenarios
pub struct ScenarioRunner {
    scenarios: Vec<Scenario>,
}

impl ScenarioRunner {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Build the chosen variant of every scenario in parallel
    ///
    /// Each run allocates its own state, so the fan-out is embarrassingly
    /// parallel.
    pub fn run_all(&self, variant: FinancingVariant) -> Vec<(String, ScheduleResult)> {
        log::info!(
            "running {} scenario(s), variant {:?}",
            self.scenarios.len(),
            variant
        );
        self.scenarios
            .par_iter()
            .map(|s| (s.name.clone(), s.build(variant)))
            .collect()
    }

    /// Align yearly cumulative values across all scenarios for a variant
    pub fn compare_yearly(
        &self,
        variant: FinancingVariant,
        metric: ComparisonMetric,
    ) -> YearlyComparison {
        let results = self.run_all(variant);
        align_yearly(&results, metric)
    }
}

/// Put per-scenario yearly cumulative series onto a shared year axis
pub fn align_yearly(
    results: &[(String, ScheduleResult)],
    metric: ComparisonMetric,
) -> YearlyComparison {
    let series_raw: Vec<(String, Vec<f64>)> = results
        .iter()
        .map(|(name, result)| {
            let values = match metric {
                ComparisonMetric::HouseholdCost => result.yearly_cumulative_household_cost(),
                ComparisonMetric::CumulativeInterest => result.yearly_cumulative_interest(),
            };
            (name.clone(), values)
        })
        .collect();

    let max_years = series_raw.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

    let series = series_raw
        .into_iter()
        .map(|(name, mut values)| {
            let last = values.last().copied().unwrap_or(0.0);
            values.resize(max_years, last);
            ScenarioSeries { name, values }
        })
        .collect();

    YearlyComparison {
        years: (1..=max_years as u32).collect(),
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BankLoanTerms, FamilyLoanTerms, LoanKind};
    use approx::assert_relative_eq;

    fn test_scenario(name: &str, horizon_years: u32) -> Scenario {
        Scenario::new(
            name,
            LoanConfiguration {
                home_price: 1_000_000.0,
                down_payment: 200_000.0,
                bank: BankLoanTerms {
                    kind: LoanKind::Fixed,
                    annual_rate_pct: 6.3,
                    term_months: 360,
                    ..Default::default()
                },
                family: Some(FamilyLoanTerms {
                    principal: 300_000.0,
                    annual_rate_pct: 4.5,
                    term_months: 360,
                    ..Default::default()
                }),
                horizon_years,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_bank_only_variant_strips_family_loan() {
        let scenario = test_scenario("base", 30);
        let bank_only = scenario.variant_config(FinancingVariant::BankOnly);
        assert!(bank_only.family.is_none());
        assert_eq!(bank_only.bank_principal(), 800_000.0);

        // The engine itself is untouched: the assisted config still nets
        // the family principal out of the bank leg
        let assisted = scenario.variant_config(FinancingVariant::FamilyAssisted);
        assert_eq!(assisted.bank_principal(), 500_000.0);
    }

    #[test]
    fn test_bank_only_down_payment_override() {
        let mut scenario = test_scenario("base", 30);
        scenario.bank_only_down_payment = Some(150_000.0);

        let bank_only = scenario.variant_config(FinancingVariant::BankOnly);
        assert_eq!(bank_only.down_payment, 150_000.0);
        assert_eq!(bank_only.bank_principal(), 850_000.0);
    }

    #[test]
    fn test_family_assistance_saves_interest() {
        let pair = test_scenario("base", 30).build_both();

        // 4.5% family money displacing 6.3% bank money must come out ahead
        assert!(pair.interest_saved() > 0.0);
        assert_relative_eq!(
            pair.bank_only.rows[0].bank_payment,
            4951.78,
            epsilon = 0.01
        );
    }

    #[test]
    fn test_yearly_alignment_pads_short_scenarios() {
        let runner = ScenarioRunner::new(vec![
            test_scenario("thirty", 30),
            test_scenario("ten", 10),
        ]);

        let comparison =
            runner.compare_yearly(FinancingVariant::FamilyAssisted, ComparisonMetric::HouseholdCost);

        assert_eq!(comparison.years.len(), 30);
        assert_eq!(comparison.series.len(), 2);
        let short = &comparison.series[1];
        assert_eq!(short.values.len(), 30);
        // Held flat at its final cumulative value after year 10
        assert_eq!(short.values[10], short.values[9]);
        assert_eq!(short.values[29], short.values[9]);

        // Cumulative series are non-decreasing
        let long = &comparison.series[0];
        for w in long.values.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn test_cumulative_interest_metric() {
        let runner = ScenarioRunner::new(vec![test_scenario("base", 2)]);
        let results = runner.run_all(FinancingVariant::FamilyAssisted);
        let comparison = align_yearly(&results, ComparisonMetric::CumulativeInterest);

        let expected: f64 = results[0]
            .1
            .rows
            .iter()
            .map(|r| r.bank_interest + r.family_interest)
            .sum();
        assert_relative_eq!(comparison.series[0].values[1], expected, epsilon = 0.01);
    }
}
