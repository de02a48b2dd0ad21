//! Financial primitives shared by the schedule builder and the
//! derived-metrics aggregator
//!
//! All rate arguments are annual percentages (6.3 means 6.3%) unless a
//! function name says otherwise.

/// Convert an annual percentage rate to a monthly decimal rate
pub fn monthly_rate_from_annual_pct(annual_pct: f64) -> f64 {
    annual_pct / 100.0 / 12.0
}

/// Standard level-payment amortization formula
///
/// Returns the fixed monthly payment that retires `principal` over
/// `term_months` at the given annual rate. A zero monthly rate degenerates
/// to straight-line `principal / term_months`.
///
/// Caller contract: `term_months > 0`. A zero or negative term is not
/// guarded here and yields an undefined numeric result.
pub fn amortized_payment(principal: f64, annual_rate_pct: f64, term_months: u32) -> f64 {
    let r = monthly_rate_from_annual_pct(annual_rate_pct);
    let n = term_months as f64;
    if r == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + r).powf(n);
    principal * r * growth / (growth - 1.0)
}

/// Periodic internal rate of return via Newton-Raphson
///
/// `cashflows[0]` is time zero (undiscounted); `cashflows[t]` is discounted
/// by `(1+rate)^t`. Iterates at most 100 times from `initial_guess`,
/// stopping once successive estimates differ by less than 1e-7. A non-finite
/// iterate truncates the search and returns the last finite rate reached —
/// a soft degradation, never a failure.
///
/// Convergence is not guaranteed for pathological sign patterns
/// (all-positive series, multiple sign changes with multiple roots). The
/// returned rate is best-effort; callers wanting certainty should
/// sanity-check it against the cashflow signs.
pub fn internal_rate_of_return(cashflows: &[f64], initial_guess: f64) -> f64 {
    let mut rate = initial_guess;

    for _ in 0..100 {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);
        let next = rate - npv / dnpv;

        if !next.is_finite() {
            return rate;
        }
        if (next - rate).abs() < 1e-7 {
            return next;
        }
        rate = next;
    }

    rate
}

/// NPV and its derivative with respect to the periodic rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}

/// Net present value of a monthly cashflow series at an annual discount rate
///
/// Discounts at the monthly-equivalent of `annual_discount_pct`;
/// `cashflows[0]` is undiscounted.
pub fn net_present_value(annual_discount_pct: f64, monthly_cashflows: &[f64]) -> f64 {
    let r = monthly_rate_from_annual_pct(annual_discount_pct);
    monthly_cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + r).powi(t as i32))
        .sum()
}

/// Bound `v` to `[lo, hi]`
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// Round a currency amount to whole cents
///
/// Applied only at row-emission time; internal schedule state carries full
/// precision between months.
pub fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
