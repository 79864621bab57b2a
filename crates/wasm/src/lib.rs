//! WASM bindings for the contribution comparison.
//!
//! This crate exposes the calculator, the deck content, and the slide
//! navigator to the browser presentation. Amounts cross the boundary as
//! JavaScript numbers.

use kammer_core::calculator::{salary_levels, CHART_SALARY_LEVELS, TABLE_SALARY_LEVELS};
use kammer_core::chart::{contribution_chart, effective_rate_chart, ChartDataset};
use kammer_core::{
    build_comparison_table, compute_contribution, export_filename, ComparisonRow,
    ContributionConfig, ContributionRegime, Deck, SalaryAmount, SlideNavigator,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Contribution for one salary under one regime.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContributionView {
    pub regime: String,
    pub salary: Decimal,
    pub amount: Decimal,
    pub effective_rate: Decimal,
    pub capped: bool,
}

/// Both chart datasets for the analysis slide.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartsView {
    pub contribution: ChartDataset,
    pub effective_rate: ChartDataset,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn select_regime<'a>(config: &'a ContributionConfig, name: &str) -> Result<&'a ContributionRegime, String> {
    match name.to_lowercase().as_str() {
        "bremen" | "hb" => Ok(&config.bremen),
        "saarland" | "sl" => Ok(&config.saarland),
        _ => Err(format!("Unknown regime: {}", name)),
    }
}

fn contribution_impl(salary: f64, regime: &str) -> Result<ContributionView, String> {
    let config = ContributionConfig::default();
    let regime = select_regime(&config, regime)?;
    let salary = SalaryAmount::from_f64(salary).map_err(|e| e.to_string())?;
    let result = compute_contribution(salary, regime);

    Ok(ContributionView {
        regime: regime.name.clone(),
        salary: salary.value(),
        amount: result.amount,
        effective_rate: result.effective_rate,
        capped: result.is_capped(),
    })
}

fn comparison_impl(levels: &[f64]) -> Result<Vec<ComparisonRow>, String> {
    let levels = if levels.is_empty() {
        salary_levels(&TABLE_SALARY_LEVELS)
    } else {
        levels
            .iter()
            .map(|&l| SalaryAmount::from_f64(l))
            .collect::<kammer_core::Result<Vec<_>>>()
            .map_err(|e| e.to_string())?
    };
    Ok(build_comparison_table(&ContributionConfig::default(), &levels))
}

/// Compute the contribution for a monthly salary.
///
/// # Arguments
/// * `salary` - Monthly gross salary in EUR; must be finite and non-negative
/// * `regime` - `"bremen"` or `"saarland"`
///
/// # Returns
/// A JavaScript object with amount and effective rate, or throws on invalid input.
#[wasm_bindgen]
pub fn compute(salary: f64, regime: &str) -> Result<JsValue, JsValue> {
    let view = contribution_impl(salary, regime).map_err(|e| JsValue::from_str(&e))?;
    to_js(&view)
}

/// Comparison rows for the given salaries, or the reference levels if empty.
#[wasm_bindgen]
pub fn comparison_table(levels: Vec<f64>) -> Result<JsValue, JsValue> {
    let rows = comparison_impl(&levels).map_err(|e| JsValue::from_str(&e))?;
    to_js(&rows)
}

/// Chart datasets at the chart reference levels.
#[wasm_bindgen]
pub fn charts() -> Result<JsValue, JsValue> {
    let config = ContributionConfig::default();
    let levels = salary_levels(&CHART_SALARY_LEVELS);
    to_js(&ChartsView {
        contribution: contribution_chart(&config, &levels),
        effective_rate: effective_rate_chart(&config, &levels),
    })
}

/// The full deck content.
#[wasm_bindgen]
pub fn deck() -> Result<JsValue, JsValue> {
    to_js(&Deck::build(&ContributionConfig::default()))
}

/// Filename the PDF download should be saved under.
#[wasm_bindgen]
pub fn pdf_filename() -> String {
    let deck = Deck::build(&ContributionConfig::default());
    export_filename(&deck.subject, deck.year, "pdf")
}

/// Format an amount as German currency, e.g. `€12,08`.
#[wasm_bindgen]
pub fn format_currency(amount: f64) -> Result<String, JsValue> {
    let amount = Decimal::try_from(amount).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(kammer_core::format_currency(amount))
}

/// Format a fractional rate as a percentage, e.g. `0.12%`.
#[wasm_bindgen]
pub fn format_percentage(rate: f64) -> Result<String, JsValue> {
    let rate = Decimal::try_from(rate).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(kammer_core::format_percentage(rate))
}

/// Slide navigator handle for the presentation surface.
#[wasm_bindgen]
#[derive(Default)]
pub struct Navigator {
    inner: SlideNavigator,
}

#[wasm_bindgen]
impl Navigator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Navigator {
        Self::default()
    }

    /// Zero-based index of the current slide.
    pub fn current(&self) -> usize {
        self.inner.current()
    }

    pub fn total(&self) -> usize {
        self.inner.total()
    }

    pub fn go_to(&mut self, index: i32) -> bool {
        self.inner.go_to(index as isize)
    }

    pub fn next(&mut self) -> bool {
        self.inner.next()
    }

    pub fn previous(&mut self) -> bool {
        self.inner.previous()
    }

    pub fn reset(&mut self) -> bool {
        self.inner.reset()
    }

    /// Handle a `KeyboardEvent.key` value. Returns whether the slide changed.
    pub fn handle_key(&mut self, key: &str) -> bool {
        self.inner.handle_key(key)
    }

    pub fn is_first(&self) -> bool {
        self.inner.is_first()
    }

    pub fn is_last(&self) -> bool {
        self.inner.is_last()
    }

    pub fn counter_label(&self) -> String {
        self.inner.counter_label()
    }
}
