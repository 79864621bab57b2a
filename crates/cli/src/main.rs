//! CLI for the Bremen vs. Saarland chamber contribution comparison.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kammer_core::calculator::{salary_levels, CHART_SALARY_LEVELS, TABLE_SALARY_LEVELS};
use kammer_core::chart::{contribution_chart, effective_rate_chart};
use kammer_core::format::{format_difference, format_percentage};
use kammer_core::{
    build_comparison_table, compute_contribution, export_to_dir, format_currency, parse_amount,
    ChartRenderer, ContributionConfig, Deck, ExportOptions, Exporter, JsonExporter, SalaryAmount,
    SlideNavigator, TextChartRenderer, TextExporter,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Compare chamber contributions in Bremen and Saarland.
#[derive(Parser, Debug)]
#[command(name = "kammer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with custom regime rates and ceilings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute both contributions for one monthly gross salary
    Calc {
        /// Salary, e.g. 10000, 10.000 or €8.050,50
        salary: String,
    },

    /// Print the comparison table
    Table {
        /// Salary levels (default: 5000 8050 10000 15000 20000)
        levels: Vec<String>,

        /// Print JSON instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// Draw the contribution or effective rate chart as text bars
    Chart {
        /// Plot effective rates instead of amounts
        #[arg(long)]
        effective_rate: bool,

        /// Width of the longest bar
        #[arg(short, long, default_value = "40")]
        width: usize,
    },

    /// Show slides; reads navigation keys from stdin with --interactive
    Deck {
        /// 1-based slide to show (default: all)
        #[arg(short, long)]
        slide: Option<usize>,

        /// Navigate with n/p/esc/<number>, quit with q
        #[arg(short, long)]
        interactive: bool,
    },

    /// Export the deck to a file named after its subject
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ExportFormat,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", report_error(&e));
            ExitCode::FAILURE
        }
    }
}

/// Whether any error in the chain is a failed export.
fn is_export_failure(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<kammer_core::Error>(),
            Some(kammer_core::Error::ExportFailure(_))
        )
    })
}

/// Message shown to the user when a command fails.
///
/// Export failures get a dismissible notice; everything else is reported
/// with its full context chain.
fn report_error(error: &anyhow::Error) -> String {
    if is_export_failure(error) {
        format!(
            "Fehler beim Export: {:#}\nBitte versuchen Sie es erneut.\n",
            error
        )
    } else {
        format!("Error: {:#}\n", error)
    }
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &args.command {
        Command::Calc { salary } => {
            let salary = parse_amount(salary)?;
            write!(out, "{}", calc_report(&config, salary))?;
        }
        Command::Table { levels, json } => {
            let levels = if levels.is_empty() {
                salary_levels(&TABLE_SALARY_LEVELS)
            } else {
                levels
                    .iter()
                    .map(|l| parse_amount(l))
                    .collect::<kammer_core::Result<Vec<_>>>()?
            };
            if *json {
                let rows = build_comparison_table(&config, &levels);
                writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
            } else {
                write!(out, "{}", table_report(&config, &levels))?;
            }
        }
        Command::Chart {
            effective_rate,
            width,
        } => {
            let levels = salary_levels(&CHART_SALARY_LEVELS);
            let dataset = if *effective_rate {
                effective_rate_chart(&config, &levels)
            } else {
                contribution_chart(&config, &levels)
            };
            let mut renderer = TextChartRenderer::new().with_width(*width);
            renderer.render(&dataset);
            write!(out, "{}", renderer.output())?;
        }
        Command::Deck { slide, interactive } => {
            let deck = Deck::build(&config);
            if *interactive {
                let stdin = std::io::stdin();
                present(&deck, stdin.lock(), &mut out)?;
            } else {
                write!(out, "{}", show_slides(&deck, *slide)?)?;
            }
        }
        Command::Export { format, output } => {
            let deck = Deck::build(&config);
            let exporter: Box<dyn Exporter> = match format {
                ExportFormat::Text => Box::new(TextExporter::new()),
                ExportFormat::Json => Box::new(JsonExporter::new()),
            };
            let dir = output.clone().unwrap_or_else(|| PathBuf::from("."));
            let path = export_to_dir(exporter.as_ref(), &deck, &ExportOptions::default(), &dir)?;
            writeln!(out, "Export erfolgreich erstellt: {}", path.display())?;
        }
    }

    Ok(())
}

/// Load the regime configuration, falling back to the 2025 defaults.
fn load_config(path: Option<&Path>) -> Result<ContributionConfig> {
    match path {
        Some(path) => ContributionConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ContributionConfig::default()),
    }
}

fn calc_report(config: &ContributionConfig, salary: SalaryAmount) -> String {
    let bremen = compute_contribution(salary, &config.bremen);
    let saarland = compute_contribution(salary, &config.saarland);

    let mut report = format!("Bruttogehalt: {}\n", format_currency(salary.value()));
    for (name, result) in [(&config.bremen.name, &bremen), (&config.saarland.name, &saarland)] {
        report.push_str(&format!(
            "{}: {} (effektiv {}{})\n",
            name,
            format_currency(result.amount),
            format_percentage(result.effective_rate),
            if result.is_capped() { ", gedeckelt" } else { "" }
        ));
    }
    report.push_str(&format!(
        "Differenz: {}\n",
        format_difference(saarland.amount - bremen.amount)
    ));
    report
}

fn table_report(config: &ContributionConfig, levels: &[SalaryAmount]) -> String {
    let rows = build_comparison_table(config, levels);
    let mut report = format!(
        "{:>14} {:>10} {:>10} {:>14} {:>9}\n",
        "Bruttogehalt", config.bremen.name, config.saarland.name, "Differenz", "Eff. SL"
    );
    for row in rows {
        let leader = row.leader().map(|l| l.label()).unwrap_or("");
        report.push_str(&format!(
            "{:>14} {:>10} {:>10} {:>10} {:>3} {:>9}\n",
            format_currency(row.salary.value()),
            format_currency(row.bremen_amount),
            format_currency(row.saarland_amount),
            format_difference(row.difference),
            leader,
            format_percentage(row.saarland_effective_rate)
        ));
    }
    report
}

fn show_slides(deck: &Deck, slide: Option<usize>) -> Result<String> {
    let exporter = TextExporter::new();
    match slide {
        Some(number) => {
            let slide = number
                .checked_sub(1)
                .and_then(|i| deck.slide(i))
                .ok_or_else(|| anyhow::anyhow!("No slide {} (deck has {})", number, deck.slides.len()))?;
            Ok(format!("{}\n", exporter.format_slide(slide, deck.slides.len())))
        }
        None => Ok(exporter.format_with_newline(deck)),
    }
}

/// Map a typed command to the browser key it stands for.
fn key_for_input(input: &str) -> Option<&'static str> {
    match input {
        "n" | "next" | "" => Some("ArrowRight"),
        "p" | "prev" | "previous" => Some("ArrowLeft"),
        "esc" | "escape" | "r" | "reset" => Some("Escape"),
        _ => None,
    }
}

/// Interactive presentation loop over line-based input.
fn present<R: BufRead, W: Write>(deck: &Deck, input: R, out: &mut W) -> Result<()> {
    let exporter = TextExporter::new().with_counter(false);
    let mut navigator = SlideNavigator::new().with_total(deck.slides.len());

    let render = |navigator: &SlideNavigator, out: &mut W| -> Result<()> {
        if let Some(slide) = deck.slide(navigator.current()) {
            writeln!(out, "\n{}\n", exporter.format_slide(slide, navigator.total()))?;
        }
        writeln!(
            out,
            "Folie {} | {}{}",
            navigator.counter_label(),
            if navigator.is_first() { "" } else { "p=zurück " },
            if navigator.is_last() { "q=ende" } else { "n=weiter q=ende" }
        )?;
        Ok(())
    };

    render(&navigator, &mut *out)?;
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let command = line.trim();
        if command == "q" || command == "quit" {
            break;
        }

        let changed = if let Some(key) = key_for_input(command) {
            navigator.handle_key(key)
        } else if let Ok(number) = command.parse::<isize>() {
            navigator.go_to(number.saturating_sub(1))
        } else {
            log::debug!("Ignoring input {:?}", command);
            false
        };

        if changed {
            render(&navigator, &mut *out)?;
        }
    }
    Ok(())
}
