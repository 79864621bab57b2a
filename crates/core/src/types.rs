//! Domain types for the contribution comparison.

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Monthly gross salary in EUR. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct SalaryAmount(Decimal);

impl SalaryAmount {
    /// Zero salary.
    pub const ZERO: SalaryAmount = SalaryAmount(Decimal::ZERO);

    /// Create a salary from a decimal value, rejecting negatives.
    pub fn new(value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO {
            log::warn!("Rejected negative salary {}", value);
            return Err(Error::InvalidArgument(format!(
                "salary must not be negative, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Wrap a compile-time constant known to be non-negative.
    pub(crate) const fn from_constant(value: Decimal) -> Self {
        Self(value)
    }

    /// Create a salary from whole euros.
    pub fn from_euros(euros: u32) -> Self {
        Self(Decimal::from(euros))
    }

    /// Create a salary from a floating point value.
    ///
    /// NaN and infinities are rejected along with negatives.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            log::warn!("Rejected non-finite salary {}", value);
            return Err(Error::InvalidArgument(format!(
                "salary must be a finite number, got {}",
                value
            )));
        }
        let decimal = Decimal::try_from(value)
            .map_err(|e| Error::InvalidArgument(format!("salary {} out of range: {}", value, e)))?;
        Self::new(decimal)
    }

    /// The underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for SalaryAmount {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SalaryAmount> for Decimal {
    fn from(salary: SalaryAmount) -> Self {
        salary.0
    }
}

/// A named rate-and-ceiling policy applied to a salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRegime {
    /// Display name, e.g. "Bremen".
    pub name: String,

    /// Contribution rate as a fraction (0.0012 = 0.12%).
    pub rate: Decimal,

    /// Assessment ceiling (BBG). `None` means salary is assessed in full.
    #[serde(default)]
    pub ceiling: Option<SalaryAmount>,
}

impl ContributionRegime {
    /// Create a regime with no ceiling.
    pub fn uncapped(name: impl Into<String>, rate: Decimal) -> Self {
        Self {
            name: name.into(),
            rate,
            ceiling: None,
        }
    }

    /// Create a regime whose assessment base is capped at `ceiling`.
    pub fn capped(name: impl Into<String>, rate: Decimal, ceiling: SalaryAmount) -> Self {
        Self {
            name: name.into(),
            rate,
            ceiling: Some(ceiling),
        }
    }

    /// Check that the rate is a fraction in `[0, 1)`.
    pub fn validate(&self) -> Result<()> {
        if self.rate < Decimal::ZERO || self.rate >= Decimal::ONE {
            return Err(Error::InvalidConfig(format!(
                "{}: rate must be in [0, 1), got {}",
                self.name, self.rate
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidConfig("regime name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// The pair of regimes every calculation in the deck is run against.
///
/// Passed explicitly to calculator operations instead of living in
/// process-wide constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionConfig {
    pub bremen: ContributionRegime,
    pub saarland: ContributionRegime,
}

impl Default for ContributionConfig {
    fn default() -> Self {
        Self {
            bremen: crate::calculator::bremen(),
            saarland: crate::calculator::saarland(),
        }
    }
}

impl ContributionConfig {
    /// Validate both regimes.
    pub fn validate(&self) -> Result<()> {
        self.bremen.validate()?;
        self.saarland.validate()
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Loaded contribution config from {}", path.display());
        Ok(config)
    }
}

/// Contribution owed for one salary under one regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionResult {
    /// The salary the result was computed for.
    pub salary: SalaryAmount,

    /// Salary actually assessed (capped at the ceiling, if any).
    pub assessment_base: Decimal,

    /// `assessment_base * rate` before rounding.
    pub raw_amount: Decimal,

    /// Monthly contribution rounded to cents.
    pub amount: Decimal,

    /// `amount / salary`, or zero for a zero salary.
    pub effective_rate: Decimal,
}

impl ContributionResult {
    /// Whether the ceiling cut the assessment base below the salary.
    pub fn is_capped(&self) -> bool {
        self.assessment_base < self.salary.value()
    }
}

/// Which regime charges more at a given salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Leader {
    /// Saarland charges more ("SL").
    Saarland,
    /// Bremen charges more ("HB").
    Bremen,
}

impl Leader {
    /// Short label used in the comparison table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Saarland => "SL",
            Self::Bremen => "HB",
        }
    }
}

/// One row of the Bremen vs. Saarland comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub salary: SalaryAmount,
    pub bremen_amount: Decimal,
    pub saarland_amount: Decimal,

    /// `saarland_amount - bremen_amount`; positive when Saarland is higher.
    pub difference: Decimal,

    /// Nominal Bremen rate (Bremen has no ceiling, so this is also its effective rate).
    pub bremen_rate: Decimal,
    pub saarland_effective_rate: Decimal,
}

impl ComparisonRow {
    /// The regime charging more, or `None` if both are equal.
    pub fn leader(&self) -> Option<Leader> {
        if self.difference > Decimal::ZERO {
            Some(Leader::Saarland)
        } else if self.difference < Decimal::ZERO {
            Some(Leader::Bremen)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_salary_rejects_negative() {
        assert!(SalaryAmount::new(dec!(-0.01)).is_err());
        assert!(SalaryAmount::new(dec!(0)).is_ok());
        assert!(SalaryAmount::from_f64(-5.0).is_err());
    }

    #[test]
    fn test_salary_rejects_non_finite() {
        assert!(matches!(
            SalaryAmount::from_f64(f64::NAN),
            Err(Error::InvalidArgument(_))
        ));
        assert!(SalaryAmount::from_f64(f64::INFINITY).is_err());
        assert!(SalaryAmount::from_f64(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_salary_from_f64() {
        let salary = SalaryAmount::from_f64(8050.0).unwrap();
        assert_eq!(salary.value(), dec!(8050));
    }

    #[test]
    fn test_regime_validation() {
        assert!(ContributionRegime::uncapped("Bremen", dec!(0.0012)).validate().is_ok());
        assert!(ContributionRegime::uncapped("Bremen", dec!(1.2)).validate().is_err());
        assert!(ContributionRegime::uncapped("Bremen", dec!(-0.1)).validate().is_err());
        assert!(ContributionRegime::uncapped("  ", dec!(0.1)).validate().is_err());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "bremen": { "name": "Bremen", "rate": 0.0012 },
            "saarland": { "name": "Saarland", "rate": 0.0015, "ceiling": 8050 }
        }"#;
        let config = ContributionConfig::from_json_str(json).unwrap();
        assert_eq!(config, ContributionConfig::default());
    }

    #[test]
    fn test_config_rejects_negative_ceiling() {
        let json = r#"{
            "bremen": { "name": "Bremen", "rate": 0.0012 },
            "saarland": { "name": "Saarland", "rate": 0.0015, "ceiling": -1 }
        }"#;
        assert!(ContributionConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_config_rejects_bad_rate() {
        let json = r#"{
            "bremen": { "name": "Bremen", "rate": 12 },
            "saarland": { "name": "Saarland", "rate": 0.0015 }
        }"#;
        assert!(matches!(
            ContributionConfig::from_json_str(json),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_leader_labels() {
        assert_eq!(Leader::Saarland.label(), "SL");
        assert_eq!(Leader::Bremen.label(), "HB");
    }
}
