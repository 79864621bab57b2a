//! Chamber contribution calculator, slide navigator, and deck content for
//! the Bremen vs. Saarland comparison.

pub mod calculator;
pub mod chart;
pub mod deck;
pub mod error;
pub mod export;
pub mod format;
pub mod navigator;
pub mod types;

pub use calculator::{
    build_comparison_table, compute_contribution, compute_effective_rate, reference_comparison,
};
pub use chart::{ChartDataset, ChartRenderer, ChartSeries, TextChartRenderer};
pub use deck::{Deck, Slide, SlideBlock};
pub use error::{Error, Result};
pub use export::{export_filename, export_to_dir, ExportOptions, Exporter, JsonExporter, TextExporter};
pub use format::{format_currency, format_percentage, parse_amount};
pub use navigator::{KeyCommand, SlideNavigator, TOTAL_SLIDES};
pub use types::{
    ComparisonRow, ContributionConfig, ContributionRegime, ContributionResult, Leader, SalaryAmount,
};
