//! The five-slide Bremen vs. Saarland deck.
//!
//! Slide text is fixed; every number on a slide comes from the calculator so
//! the deck stays consistent with the configured regimes.

use crate::calculator::{compute_contribution, reference_comparison, REFERENCE_SALARY};
use crate::format::{
    format_currency, format_currency_exact, format_currency_whole, format_difference,
    format_percentage, format_percentage_de,
};
use crate::types::{ContributionConfig, ContributionRegime, SalaryAmount};
use serde::{Deserialize, Serialize};

/// Subject used for export filenames.
pub const DECK_SUBJECT: &str = "SD WORX Kammerbeiträge Bremen vs Saarland";

/// Year the contribution values apply to.
pub const DECK_YEAR: u16 = 2025;

/// Short navigation titles, in slide order.
pub const NAV_TITLES: [&str; 5] = [
    "Title",
    "Executive Summary",
    "Calculations & Process",
    "System Analysis",
    "Conclusions",
];

/// The whole presentation, in slide order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    pub subtitle: String,

    /// Subject matter the export filename is derived from.
    pub subject: String,
    pub year: u16,
    pub date: String,
    pub author: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            subject: DECK_SUBJECT.to_string(),
            year: DECK_YEAR,
            date: String::new(),
            author: String::new(),
            slides: Vec::new(),
        }
    }

    /// Build the five-slide comparison deck for a configuration.
    pub fn build(config: &ContributionConfig) -> Self {
        let mut deck = Self::new(
            format!(
                "Kammerbeiträge {} vs. {} {}",
                config.bremen.name, config.saarland.name, DECK_YEAR
            ),
            "Rechtsvergleichende Systemanalyse für SD WORX",
        );
        deck.date = "26. Juli 2025".to_string();
        deck.author = "Deniz Ülker".to_string();

        let title = title_slide(&deck);
        deck.add_slide(title);
        deck.add_slide(summary_slide(config));
        deck.add_slide(calculation_slide(config));
        deck.add_slide(analysis_slide(config));
        deck.add_slide(conclusion_slide(config));

        log::debug!("Built deck with {} slides", deck.slides.len());
        deck
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Slide at a zero-based index, as tracked by the navigator.
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// All text lines from all slides, flattened.
    pub fn all_lines(&self) -> Vec<&str> {
        self.slides.iter().flat_map(|s| s.all_lines()).collect()
    }
}

/// A single slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Short title shown on the navigation bar.
    pub nav_title: String,
    pub title: String,
    pub subtitle: String,

    /// Content blocks in reading order.
    pub blocks: Vec<SlideBlock>,
}

impl Slide {
    /// Create a new slide with the given number and titles.
    pub fn new(
        number: usize,
        nav_title: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        Self {
            number,
            nav_title: nav_title.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            blocks: Vec::new(),
        }
    }

    /// Append a block and return the slide, for chaining.
    pub fn with_block(mut self, block: SlideBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Title, subtitle, and block lines, skipping empty ones.
    pub fn all_lines(&self) -> Vec<&str> {
        std::iter::once(self.title.as_str())
            .chain(std::iter::once(self.subtitle.as_str()))
            .chain(self.blocks.iter().flat_map(|b| {
                b.heading
                    .as_deref()
                    .into_iter()
                    .chain(b.lines.iter().map(String::as_str))
            }))
            .filter(|s| !s.trim().is_empty())
            .collect()
    }
}

/// A headed group of lines on a slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideBlock {
    pub heading: Option<String>,
    pub lines: Vec<String>,
}

impl SlideBlock {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            lines: Vec::new(),
        }
    }

    /// A block without a heading.
    pub fn plain() -> Self {
        Self {
            heading: None,
            lines: Vec::new(),
        }
    }

    /// Add a text line to this block.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }
}

fn nav_title(number: usize) -> &'static str {
    NAV_TITLES.get(number - 1).copied().unwrap_or("")
}

fn title_slide(deck: &Deck) -> Slide {
    Slide::new(1, nav_title(1), deck.title.clone(), deck.subtitle.clone())
        .with_block(
            SlideBlock::new("Aufgabenstellung").line(format!(
                "Berechnung und Vergleich der Kammerbeiträge für ein monatliches Bruttogehalt von {}",
                format_currency_whole(REFERENCE_SALARY.into())
            )),
        )
        .with_block(SlideBlock::new("Datum").line(deck.date.clone()))
        .with_block(SlideBlock::new("Bearbeiter").line(deck.author.clone()))
}

fn summary_slide(config: &ContributionConfig) -> Slide {
    let salary = SalaryAmount::from_euros(REFERENCE_SALARY);
    let bremen = compute_contribution(salary, &config.bremen);
    let saarland = compute_contribution(salary, &config.saarland);

    Slide::new(
        2,
        nav_title(2),
        "Das Ergebnis auf einen Blick",
        format!(
            "Beiträge für {} monatliches Bruttogehalt ({})",
            format_currency_whole(salary.value()),
            DECK_YEAR
        ),
    )
    .with_block(
        SlideBlock::new(config.bremen.name.clone())
            .line(format!("Monatlicher Beitrag: {}", format_currency(bremen.amount)))
            .line(format!("Beitragssatz: {}", format_percentage_de(config.bremen.rate)))
            .line(ceiling_summary(&config.bremen)),
    )
    .with_block(
        SlideBlock::new(config.saarland.name.clone())
            .line(format!("Monatlicher Beitrag: {}", format_currency(saarland.amount)))
            .line(format!("Beitragssatz: {}", format_percentage_de(config.saarland.rate)))
            .line(ceiling_summary(&config.saarland)),
    )
    .with_block(SlideBlock::new("Differenz").line(format!(
        "{} pro Monat",
        format_difference(saarland.amount - bremen.amount)
    )))
}

fn ceiling_summary(regime: &ContributionRegime) -> String {
    match regime.ceiling {
        Some(ceiling) => format!("Gedeckelt bei {}", format_currency_whole(ceiling.value())),
        None => "Keine Beitragsbemessungsgrenze".to_string(),
    }
}

/// Step-by-step derivation of a contribution, as shown on the calculation slide.
pub fn calculation_steps(regime: &ContributionRegime, salary: SalaryAmount, legal_basis: &str) -> Vec<String> {
    let result = compute_contribution(salary, regime);
    let gross = format_currency_whole(salary.value());
    let base = format_currency_whole(result.assessment_base);
    let rate = format_percentage_de(regime.rate);

    let mut steps = vec![format!("Bruttogehalt: {}", gross), legal_basis.to_string()];
    match regime.ceiling {
        None => {
            steps.push(format!("Keine BBG-Prüfung: {}", gross));
        }
        Some(ceiling) if result.is_capped() => {
            steps.push(format!(
                "BBG-Prüfung: {} > {}",
                gross,
                format_currency_whole(ceiling.value())
            ));
            steps.push(format!("Gedeckelt: {}", base));
        }
        Some(ceiling) => {
            steps.push(format!(
                "BBG-Prüfung: {} ≤ {}",
                gross,
                format_currency_whole(ceiling.value())
            ));
        }
    }
    if result.raw_amount == result.amount {
        steps.push(format!("{} × {}", base, rate));
    } else {
        steps.push(format!(
            "{} × {} = {}",
            base,
            rate,
            format_currency_exact(result.raw_amount)
        ));
    }
    steps.push(format!("Ergebnis: {}", format_currency(result.amount)));
    steps
}

fn calculation_slide(config: &ContributionConfig) -> Slide {
    let salary = SalaryAmount::from_euros(REFERENCE_SALARY);

    let mut bremen_path = SlideBlock::new(format!("{}-Pfad", config.bremen.name));
    bremen_path.lines = calculation_steps(&config.bremen, salary, "Steuerpflichtiger Arbeitslohn");

    let mut saarland_path = SlideBlock::new(format!("{}-Pfad", config.saarland.name));
    saarland_path.lines = calculation_steps(&config.saarland, salary, "SV-pflichtiges Bruttoentgelt");

    Slide::new(
        3,
        nav_title(3),
        "Berechnungsdetails & Prozessfluss",
        "Schritt-für-Schritt Analyse der unterschiedlichen Systeme",
    )
    .with_block(bremen_path)
    .with_block(SlideBlock::plain().line("Rechtsbasis: Steuerpflichtiger Arbeitslohn nach LStDV"))
    .with_block(saarland_path)
    .with_block(SlideBlock::plain().line("Rechtsbasis: SV-pflichtiges Bruttoentgelt nach SGB IV"))
}

fn analysis_slide(config: &ContributionConfig) -> Slide {
    let mut table = SlideBlock::new("Beitragsvergleich nach Einkommensstufen").line(format!(
        "Bruttogehalt | {} | {} | Differenz | Eff. Satz {}",
        config.bremen.name, config.saarland.name, config.saarland.name
    ));
    for row in reference_comparison(config) {
        let leader = row.leader().map(|l| format!(" ({})", l.label())).unwrap_or_default();
        table.lines.push(format!(
            "{} | {} | {} | {}{} | {}",
            format_currency_whole(row.salary.value()),
            format_currency(row.bremen_amount),
            format_currency(row.saarland_amount),
            format_difference(row.difference),
            leader,
            format_percentage(row.saarland_effective_rate)
        ));
    }

    let high = SalaryAmount::from_euros(20000);
    let saarland_high = compute_contribution(high, &config.saarland);

    Slide::new(
        4,
        nav_title(4),
        "Systemanalyse & Vergleich",
        "Entwicklung der Beiträge und effektive Belastung",
    )
    .with_block(table)
    .with_block(SlideBlock::new(format!("{}: Proportional", config.bremen.name)).line(format!(
        "Konstanter Beitragssatz von {} auf das gesamte Gehalt. Die Belastung steigt linear mit dem Einkommen.",
        format_percentage_de(config.bremen.rate)
    )))
    .with_block(SlideBlock::new(format!("{}: Degressiv", config.saarland.name)).line(
        match config.saarland.ceiling {
            Some(ceiling) => format!(
                "Effektiver Beitragssatz sinkt bei Einkommen über {}. Bei {} nur noch {} effektive Belastung.",
                format_currency_whole(ceiling.value()),
                format_currency_whole(high.value()),
                format_percentage_de(saarland_high.effective_rate)
            ),
            None => "Ohne Beitragsbemessungsgrenze bleibt der Beitragssatz konstant.".to_string(),
        },
    ))
}

fn conclusion_slide(config: &ContributionConfig) -> Slide {
    let salary = SalaryAmount::from_euros(REFERENCE_SALARY);
    let difference = compute_contribution(salary, &config.saarland).amount
        - compute_contribution(salary, &config.bremen).amount;
    let ceiling = config
        .saarland
        .ceiling
        .map(|c| format!("Gedeckelt bei {}", format_currency_whole(c.value())))
        .unwrap_or_else(|| "Unbegrenzt".to_string());

    Slide::new(
        5,
        nav_title(5),
        "Systemunterschiede & Fazit",
        "Strukturelle Unterschiede und strategische Implikationen",
    )
    .with_block(
        SlideBlock::new("1. Beitragsbemessungsgrenze")
            .line(format!("{}: Unbegrenzt proportional", config.bremen.name))
            .line(format!("{}: {}", config.saarland.name, ceiling)),
    )
    .with_block(
        SlideBlock::new("2. Rechtssystematische Anbindung")
            .line(format!("{}: Steuerrecht (LStDV)", config.bremen.name))
            .line(format!("{}: Sozialversicherungsrecht (SGB IV)", config.saarland.name)),
    )
    .with_block(
        SlideBlock::new("Kernerkenntnisse")
            .line(format!(
                "1. Minimale nominale Differenz ({}) verschleiert fundamentale Systemunterschiede",
                format_currency(difference.abs())
            ))
            .line(format!(
                "2. {}: Steuerlogik ohne Obergrenze führt zu unbegrenzter proportionaler Belastung",
                config.bremen.name
            ))
            .line(format!(
                "3. {}: Sozialversicherungslogik mit BBG führt zu degressiver Belastung",
                config.saarland.name
            ))
            .line("4. Unterschiedliche rechtssystematische Anbindung erfordert separate Compliance-Workflows"),
    )
    .with_block(
        SlideBlock::new("Empfehlungen für SD WORX")
            .line("Technische Implementierung: Separate Berechnungsmodule für beide Systeme entwickeln, BBG-Monitoring für Saarland implementieren")
            .line("Compliance-Management: Regelmäßige Updates der BBG-Werte, Monitoring von Beitragssatzänderungen")
            .line("Strategische Überlegungen: Flexible, rechtssystemspezifische Lösungsarchitekturen für föderale Komplexität"),
    )
    .with_block(SlideBlock::new("Strategische Schlussfolgerung").line(
        "Die Existenz zweier fundamental verschiedener Kammersysteme in Deutschland unterstreicht die Notwendigkeit flexibler, rechtssystemspezifischer Lösungen.",
    ))
}
