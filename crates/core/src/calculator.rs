//! Chamber contribution calculation for the Bremen and Saarland regimes.
//!
//! Bremen assesses the full salary at 0.12%. Saarland assesses at most the
//! contribution ceiling (BBG, €8.050 per month) at 0.15%. Amounts are computed
//! in exact decimal arithmetic and rounded half away from zero to cents, so
//! €8.050 × 0.15% = €12,075 becomes €12,08.

use crate::types::{ComparisonRow, ContributionConfig, ContributionRegime, ContributionResult, SalaryAmount};
use rust_decimal::{Decimal, RoundingStrategy};

/// Bremen contribution rate (0.12%).
pub const BREMEN_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 4);

/// Saarland contribution rate (0.15%).
pub const SAARLAND_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 4);

/// Saarland monthly contribution assessment ceiling in EUR.
pub const SAARLAND_CEILING: Decimal = Decimal::from_parts(8050, 0, 0, false, 0);

/// Salary levels shown in the comparison table.
pub const TABLE_SALARY_LEVELS: [u32; 5] = [5000, 8050, 10000, 15000, 20000];

/// Salary levels plotted in the charts.
pub const CHART_SALARY_LEVELS: [u32; 7] = [5000, 8050, 10000, 15000, 20000, 25000, 30000];

/// Salary used for the worked example on the summary and calculation slides.
pub const REFERENCE_SALARY: u32 = 10000;

/// The Bremen regime: 0.12% of the full salary.
pub fn bremen() -> ContributionRegime {
    ContributionRegime::uncapped("Bremen", BREMEN_RATE)
}

/// The Saarland regime: 0.15% of the salary up to €8.050.
pub fn saarland() -> ContributionRegime {
    ContributionRegime::capped("Saarland", SAARLAND_RATE, SalaryAmount::from_constant(SAARLAND_CEILING))
}

/// Convert whole-euro levels into salaries, preserving order.
pub fn salary_levels(levels: &[u32]) -> Vec<SalaryAmount> {
    levels.iter().copied().map(SalaryAmount::from_euros).collect()
}

/// Round to cents, half away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl ContributionRegime {
    /// The part of the salary subject to contribution.
    pub fn assessment_base(&self, salary: SalaryAmount) -> Decimal {
        match self.ceiling {
            Some(ceiling) => salary.value().min(ceiling.value()),
            None => salary.value(),
        }
    }

    /// Compute the contribution for a salary under this regime.
    pub fn contribution(&self, salary: SalaryAmount) -> ContributionResult {
        compute_contribution(salary, self)
    }
}

/// Compute the monthly contribution for `salary` under `regime`.
pub fn compute_contribution(salary: SalaryAmount, regime: &ContributionRegime) -> ContributionResult {
    let assessment_base = regime.assessment_base(salary);
    let raw_amount = assessment_base * regime.rate;
    let amount = round_cents(raw_amount);
    let effective_rate = if salary.is_zero() {
        Decimal::ZERO
    } else {
        amount / salary.value()
    };

    log::debug!(
        "{}: salary {} -> base {} -> raw {} -> amount {}",
        regime.name,
        salary.value(),
        assessment_base,
        raw_amount,
        amount
    );

    ContributionResult {
        salary,
        assessment_base,
        raw_amount,
        amount,
        effective_rate,
    }
}

/// Contribution divided by salary. Zero for a zero salary.
pub fn compute_effective_rate(salary: SalaryAmount, regime: &ContributionRegime) -> Decimal {
    compute_contribution(salary, regime).effective_rate
}

/// Compare both regimes at each salary level, in input order.
pub fn build_comparison_table(config: &ContributionConfig, levels: &[SalaryAmount]) -> Vec<ComparisonRow> {
    levels
        .iter()
        .map(|&salary| {
            let bremen = compute_contribution(salary, &config.bremen);
            let saarland = compute_contribution(salary, &config.saarland);
            ComparisonRow {
                salary,
                bremen_amount: bremen.amount,
                saarland_amount: saarland.amount,
                difference: saarland.amount - bremen.amount,
                bremen_rate: config.bremen.rate,
                saarland_effective_rate: saarland.effective_rate,
            }
        })
        .collect()
}

/// The comparison table at the fixed reference levels.
pub fn reference_comparison(config: &ContributionConfig) -> Vec<ComparisonRow> {
    build_comparison_table(config, &salary_levels(&TABLE_SALARY_LEVELS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn salary(euros: u32) -> SalaryAmount {
        SalaryAmount::from_euros(euros)
    }

    #[test]
    fn test_constants() {
        assert_eq!(BREMEN_RATE, dec!(0.0012));
        assert_eq!(SAARLAND_RATE, dec!(0.0015));
        assert_eq!(SAARLAND_CEILING, dec!(8050));
    }

    #[test]
    fn test_bremen_is_proportional() {
        let regime = bremen();
        assert_eq!(regime.contribution(salary(5000)).amount, dec!(6.00));
        assert_eq!(regime.contribution(salary(8050)).amount, dec!(9.66));
        assert_eq!(regime.contribution(salary(30000)).amount, dec!(36.00));
    }

    #[test]
    fn test_saarland_is_capped() {
        let regime = saarland();
        assert_eq!(regime.contribution(salary(5000)).amount, dec!(7.50));
        assert_eq!(regime.contribution(salary(8050)).amount, dec!(12.08));
        assert_eq!(regime.contribution(salary(30000)).amount, dec!(12.08));
    }

    #[test]
    fn test_midpoint_rounds_up() {
        let result = saarland().contribution(salary(10000));
        assert_eq!(result.assessment_base, dec!(8050));
        assert_eq!(result.raw_amount, dec!(12.075));
        assert_eq!(result.amount, dec!(12.08));
        assert!(result.is_capped());
    }

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(round_cents(dec!(0.005)), dec!(0.01));
        assert_eq!(round_cents(dec!(0.004999)), dec!(0.00));
        assert_eq!(round_cents(dec!(-5.925)), dec!(-5.93));
    }

    #[test]
    fn test_zero_salary_has_zero_rate() {
        assert_eq!(compute_effective_rate(SalaryAmount::ZERO, &bremen()), Decimal::ZERO);
        assert_eq!(compute_effective_rate(SalaryAmount::ZERO, &saarland()), Decimal::ZERO);
        assert_eq!(saarland().contribution(SalaryAmount::ZERO).amount, Decimal::ZERO);
    }

    #[test]
    fn test_effective_rate() {
        assert_eq!(compute_effective_rate(salary(10000), &bremen()), dec!(0.0012));
        assert_eq!(compute_effective_rate(salary(10000), &saarland()), dec!(0.001208));
        assert_eq!(compute_effective_rate(salary(5000), &saarland()), dec!(0.0015));
    }

    #[test]
    fn test_uncapped_below_ceiling() {
        let result = saarland().contribution(salary(5000));
        assert!(!result.is_capped());
        assert_eq!(result.assessment_base, dec!(5000));
    }

    #[test]
    fn test_comparison_table_literal_scenarios() {
        let rows = reference_comparison(&ContributionConfig::default());
        let expected = [
            (5000, dec!(6.00), dec!(7.50), dec!(1.50)),
            (8050, dec!(9.66), dec!(12.08), dec!(2.42)),
            (10000, dec!(12.00), dec!(12.08), dec!(0.08)),
            (15000, dec!(18.00), dec!(12.08), dec!(-5.92)),
            (20000, dec!(24.00), dec!(12.08), dec!(-11.92)),
        ];

        assert_eq!(rows.len(), expected.len());
        for (row, (level, bremen, saarland, difference)) in rows.iter().zip(expected) {
            assert_eq!(row.salary, salary(level));
            assert_eq!(row.bremen_amount, bremen);
            assert_eq!(row.saarland_amount, saarland);
            assert_eq!(row.difference, difference);
            assert_eq!(row.bremen_rate, dec!(0.0012));
        }
    }

    #[test]
    fn test_comparison_table_preserves_order_and_duplicates() {
        let levels = salary_levels(&[20000, 5000, 20000]);
        let rows = build_comparison_table(&ContributionConfig::default(), &levels);
        let salaries: Vec<_> = rows.iter().map(|r| r.salary).collect();
        assert_eq!(salaries, levels);
    }

    #[test]
    fn test_comparison_table_empty() {
        assert!(build_comparison_table(&ContributionConfig::default(), &[]).is_empty());
    }

    #[test]
    fn test_leader() {
        let rows = reference_comparison(&ContributionConfig::default());
        assert_eq!(rows[0].leader(), Some(crate::types::Leader::Saarland));
        assert_eq!(rows[3].leader(), Some(crate::types::Leader::Bremen));
    }

    #[test]
    fn test_custom_config() {
        let config = ContributionConfig {
            bremen: ContributionRegime::uncapped("Bremen", dec!(0.001)),
            saarland: ContributionRegime::capped("Saarland", dec!(0.002), salary(1000)),
        };
        let rows = build_comparison_table(&config, &[salary(2000)]);
        assert_eq!(rows[0].bremen_amount, dec!(2.00));
        assert_eq!(rows[0].saarland_amount, dec!(2.00));
        assert_eq!(rows[0].leader(), None);
    }
}
