//! Extract command - extract economics and validity from a single campaign text.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use console::style;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use kampanya_core::campaign::rules::format_turkish_amount;
use kampanya_core::{CampaignEngine, Extraction, ExtractionHints, KampanyaConfig, Participation};

use super::config::default_config_path;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file, or "-" for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(flatten)]
    options: ExtractionOptions,
}

/// Extraction flags shared by `extract` and `batch`.
#[derive(Args, Clone, Debug)]
pub struct ExtractionOptions {
    /// Reference date for year inference, YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE")]
    reference_date: Option<NaiveDate>,

    /// Source profile, e.g. "akbank"
    #[arg(long)]
    source: Option<String>,

    /// Treat the campaign as an installment-only offer
    #[arg(long, conflicts_with = "no_installment_only")]
    installment_only: bool,

    /// Never treat the campaign as an installment-only offer
    #[arg(long)]
    no_installment_only: bool,
}

impl ExtractionOptions {
    /// Reference date, falling back to the local calendar day.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Hints passed to the engine.
    pub fn hints(&self) -> ExtractionHints {
        let mut hints = ExtractionHints::new();
        if self.installment_only {
            hints = hints.with_installment_only(true);
        } else if self.no_installment_only {
            hints = hints.with_installment_only(false);
        }
        if let Some(source) = &self.source {
            hints = hints.with_source(source.clone());
        }
        hints
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let engine = CampaignEngine::new(config);

    let text = if args.input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        let path = Path::new(&args.input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        fs::read_to_string(path)?
    };

    info!("Extracting {} ({} bytes)", args.input, text.len());

    let reference_date = args.options.reference_date();
    debug!("Reference date: {}", reference_date);

    let extraction = engine.extract(&text, reference_date, &args.options.hints());
    let output = format_extraction(&extraction, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if extraction.partial {
        eprintln!(
            "{} Partial result, missing: {}",
            style("⚠").yellow(),
            extraction.missing_fields().join(", ")
        );
    }

    Ok(())
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<KampanyaConfig> {
    if let Some(path) = config_path {
        return Ok(KampanyaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(KampanyaConfig::from_file(&default_path)?)
    } else {
        Ok(KampanyaConfig::default())
    }
}

pub fn format_extraction(extraction: &Extraction, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(extraction)?),
        OutputFormat::Csv => format_csv(extraction),
        OutputFormat::Text => Ok(format_text(extraction)),
    }
}

/// Column names of one extraction in CSV form.
pub const CSV_HEADER: [&str; 12] = [
    "min_spend",
    "reward_amount",
    "reward_type",
    "reward_percentage",
    "reward_cap",
    "installment_count",
    "start_date",
    "end_date",
    "partial",
    "strategy",
    "participation",
    "reward_text",
];

/// One extraction as CSV fields, in `CSV_HEADER` order.
pub fn csv_fields(extraction: &Extraction) -> Vec<String> {
    let economics = &extraction.economics;
    let validity = &extraction.validity;

    vec![
        opt(economics.min_spend),
        opt(economics.reward_amount),
        label(&economics.reward_type),
        opt(economics.reward_percentage),
        opt(economics.reward_cap),
        opt(economics.installment_count),
        opt(validity.start_date),
        opt(validity.end_date),
        extraction.partial.to_string(),
        label(&extraction.strategy),
        extraction
            .participation
            .as_ref()
            .map(participation_text)
            .unwrap_or_default(),
        extraction.reward_text.clone().unwrap_or_default(),
    ]
}

fn format_csv(extraction: &Extraction) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_fields(extraction))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(extraction: &Extraction) -> String {
    let economics = &extraction.economics;
    let validity = &extraction.validity;
    let mut output = String::new();

    output.push_str(&format!(
        "Reward:        {}\n",
        extraction.reward_text.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Type:          {}\n", or_dash(label(&economics.reward_type))));
    output.push_str(&format!("Min spend:     {}\n", tl(economics.min_spend)));
    output.push_str(&format!("Reward amount: {}\n", tl(economics.reward_amount)));
    output.push_str(&format!("Cap:           {}\n", tl(economics.reward_cap)));
    if let Some(rate) = economics.reward_percentage {
        output.push_str(&format!("Percentage:    %{}\n", format_turkish_amount(rate)));
    }
    if let Some(count) = economics.installment_count {
        output.push_str(&format!("Installments:  {}\n", count));
    }
    output.push('\n');

    output.push_str(&format!(
        "Valid:         {} - {}\n",
        date_text(validity.start_date, validity.start_inferred),
        date_text(validity.end_date, validity.end_inferred)
    ));
    if let Some(participation) = &extraction.participation {
        output.push_str(&format!("Participation: {}\n", participation_text(participation)));
    }
    output.push_str(&format!("Strategy:      {}\n", or_dash(label(&extraction.strategy))));
    output.push_str(&format!(
        "Partial:       {}\n",
        if extraction.partial { "yes" } else { "no" }
    ));

    if !extraction.issues.is_empty() {
        output.push_str("\nIssues:\n");
        for issue in &extraction.issues {
            output.push_str(&format!("  - {}\n", issue));
        }
    }

    output
}

fn participation_text(participation: &Participation) -> String {
    match participation {
        Participation::Sms { keyword, number } => format!("SMS {} -> {}", keyword, number),
        Participation::App { name } => format!("App {}", name),
        Participation::Automatic => "automatic".to_string(),
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Serde name of a unit enum variant, e.g. "percentage_cap".
fn label<T: Serialize>(value: &Option<T>) -> String {
    value
        .as_ref()
        .and_then(|v| serde_json::to_value(v).ok())
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}

fn or_dash(s: String) -> String {
    if s.is_empty() { "-".to_string() } else { s }
}

fn tl(amount: Option<Decimal>) -> String {
    amount
        .map(|a| format!("{} TL", format_turkish_amount(a)))
        .unwrap_or_else(|| "-".to_string())
}

fn date_text(date: Option<NaiveDate>, inferred: bool) -> String {
    match date {
        Some(d) if inferred => format!("{} (inferred)", d),
        Some(d) => d.to_string(),
        None => "?".to_string(),
    }
}
