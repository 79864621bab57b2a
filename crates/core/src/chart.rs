//! Chart datasets for the analysis slide and the renderer seam.
//!
//! The calculator produces the data; drawing is left to a [`ChartRenderer`]
//! supplied by the surface.

use crate::calculator::compute_contribution;
use crate::format::{format_currency_whole, format_decimal_de};
use crate::types::{ContributionConfig, SalaryAmount};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One labelled point of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Decimal,
}

/// A named line in a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<ChartPoint>,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub title: String,
    pub y_axis: String,
    pub series: Vec<ChartSeries>,
}

impl ChartDataset {
    /// Largest value across all series, or zero for an empty chart.
    pub fn max_value(&self) -> Decimal {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.value))
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Draws a chart. Implementations own their output target.
pub trait ChartRenderer {
    fn render(&mut self, dataset: &ChartDataset);
}

fn series<F>(label: String, levels: &[SalaryAmount], value: F) -> ChartSeries
where
    F: Fn(SalaryAmount) -> Decimal,
{
    ChartSeries {
        label,
        points: levels
            .iter()
            .map(|&salary| ChartPoint {
                label: format_currency_whole(salary.value()),
                value: value(salary),
            })
            .collect(),
    }
}

/// Monthly contribution per salary level for both regimes.
pub fn contribution_chart(config: &ContributionConfig, levels: &[SalaryAmount]) -> ChartDataset {
    ChartDataset {
        title: "Beitrag nach Bruttogehalt".to_string(),
        y_axis: "Beitrag in €".to_string(),
        series: vec![
            series(format!("{} (unbegrenzt)", config.bremen.name), levels, |s| {
                compute_contribution(s, &config.bremen).amount
            }),
            series(format!("{} (gedeckelt)", config.saarland.name), levels, |s| {
                compute_contribution(s, &config.saarland).amount
            }),
        ],
    }
}

/// Effective contribution rate in percent per salary level for both regimes.
pub fn effective_rate_chart(config: &ContributionConfig, levels: &[SalaryAmount]) -> ChartDataset {
    let percent = |rate: Decimal| (rate * Decimal::ONE_HUNDRED).normalize();
    ChartDataset {
        title: "Effektiver Beitragssatz".to_string(),
        y_axis: "Effektiver Satz in %".to_string(),
        series: vec![
            series(format!("{} (konstant)", config.bremen.name), levels, |s| {
                percent(compute_contribution(s, &config.bremen).effective_rate)
            }),
            series(format!("{} (degressiv)", config.saarland.name), levels, |s| {
                percent(compute_contribution(s, &config.saarland).effective_rate)
            }),
        ],
    }
}

/// Renders horizontal text bars into a string buffer.
#[derive(Debug, Clone)]
pub struct TextChartRenderer {
    width: usize,
    output: String,
}

impl Default for TextChartRenderer {
    fn default() -> Self {
        Self {
            width: 40,
            output: String::new(),
        }
    }
}

impl TextChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width of the longest bar in characters.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1); // At least one column
        self
    }

    /// Everything rendered so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn bar_len(&self, value: Decimal, max: Decimal) -> usize {
        if max <= Decimal::ZERO || value <= Decimal::ZERO {
            return 0;
        }
        (value / max * Decimal::from(self.width))
            .round()
            .to_usize()
            .unwrap_or(self.width)
    }
}

impl ChartRenderer for TextChartRenderer {
    fn render(&mut self, dataset: &ChartDataset) {
        let max = dataset.max_value();
        let label_width = dataset
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.label.chars().count()))
            .max()
            .unwrap_or(0);

        self.output.push_str(&format!("{} ({})\n", dataset.title, dataset.y_axis));
        for series in &dataset.series {
            self.output.push_str(&format!("\n{}\n", series.label));
            for point in &series.points {
                let padding = label_width - point.label.chars().count();
                self.output.push_str(&format!(
                    "  {}{} | {} {}\n",
                    " ".repeat(padding),
                    point.label,
                    "#".repeat(self.bar_len(point.value, max)),
                    format_decimal_de(point.value, 2)
                ));
            }
        }
    }
}
