use kammer_core::calculator::{bremen, round_cents, saarland, SAARLAND_CEILING};
use kammer_core::{
    build_comparison_table, compute_contribution, compute_effective_rate, ContributionConfig,
    SalaryAmount,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn salaries(step: u32, max: u32) -> impl Iterator<Item = SalaryAmount> {
    (0..=max / step).map(move |i| SalaryAmount::from_euros(i * step))
}

#[test]
fn bremen_amount_is_rounded_proportion() {
    let regime = bremen();
    for salary in salaries(37, 40000) {
        let expected = round_cents(salary.value() * dec!(0.0012));
        assert_eq!(compute_contribution(salary, &regime).amount, expected);
    }
}

#[test]
fn saarland_amount_is_rounded_capped_proportion() {
    let regime = saarland();
    for salary in salaries(37, 40000) {
        let expected = round_cents(salary.value().min(dec!(8050)) * dec!(0.0015));
        assert_eq!(compute_contribution(salary, &regime).amount, expected);
    }
}

#[test]
fn bremen_strictly_increases() {
    let regime = bremen();
    let amounts: Vec<Decimal> = salaries(10, 40000)
        .map(|s| compute_contribution(s, &regime).amount)
        .collect();
    assert!(amounts.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn saarland_never_decreases_and_flattens_at_ceiling() {
    let regime = saarland();
    let amounts: Vec<Decimal> = salaries(10, 40000)
        .map(|s| compute_contribution(s, &regime).amount)
        .collect();
    assert!(amounts.windows(2).all(|w| w[0] <= w[1]));

    let at_ceiling = compute_contribution(SalaryAmount::new(SAARLAND_CEILING).unwrap(), &regime).amount;
    for salary in salaries(1000, 100000).filter(|s| s.value() >= SAARLAND_CEILING) {
        assert_eq!(compute_contribution(salary, &regime).amount, at_ceiling);
    }
}

#[test]
fn crossover_lies_between_ten_and_fifteen_thousand() {
    let config = ContributionConfig::default();
    let rows = build_comparison_table(&config, &salaries(100, 30000).collect::<Vec<_>>());

    let crossover = rows
        .iter()
        .find(|row| row.bremen_amount > row.saarland_amount)
        .map(|row| row.salary.value());
    let crossover = crossover.expect("Bremen overtakes Saarland");
    assert!(crossover > dec!(10000) && crossover < dec!(15000));

    let five = SalaryAmount::from_euros(5000);
    let fifteen = SalaryAmount::from_euros(15000);
    assert!(compute_contribution(five, &config.saarland).amount > compute_contribution(five, &config.bremen).amount);
    assert!(compute_contribution(fifteen, &config.bremen).amount > compute_contribution(fifteen, &config.saarland).amount);
}

#[test]
fn effective_rate_of_zero_salary_is_zero() {
    assert_eq!(compute_effective_rate(SalaryAmount::ZERO, &bremen()), Decimal::ZERO);
    assert_eq!(compute_effective_rate(SalaryAmount::ZERO, &saarland()), Decimal::ZERO);
}

#[test]
fn negative_and_non_finite_salaries_are_rejected() {
    assert!(SalaryAmount::new(dec!(-1)).is_err());
    assert!(SalaryAmount::from_f64(f64::NAN).is_err());
    assert!(SalaryAmount::from_f64(f64::INFINITY).is_err());
}
