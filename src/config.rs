// ⚙️ CLI configuration
// Flags with env fallbacks; no flags at all reproduces the classic run
// (1000 rows → dados_importacao.xlsx).

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::generator::{
    GeneratorConfig, DEFAULT_AMOUNT_MAX, DEFAULT_AMOUNT_MIN, DEFAULT_MAX_DAYS_BACK, DEFAULT_ROWS,
};
use crate::export::read_table;
use crate::summary::BatchSummary;
use crate::validation::{TableValidator, ValidationReport};

pub const DEFAULT_OUTPUT: &str = "dados_importacao.xlsx";

#[derive(Debug, Parser)]
#[command(
    name = "movement-synth",
    version,
    about = "Generate a random table of financial movements and export it to a spreadsheet"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    // Generation flags, used when no subcommand is given
    #[command(flatten)]
    pub generate: GenerateArgs,

    #[arg(
        long,
        value_enum,
        env = "MOVEMENT_SYNTH_LOG_FORMAT",
        default_value_t = LogFormat::Compact,
        global = true,
        help = "Log output format"
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read a generated file back and verify its contents
    Inspect(InspectArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

// ============================================================================
// GENERATE
// ============================================================================

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    #[arg(
        long,
        env = "MOVEMENT_SYNTH_ROWS",
        value_name = "N",
        default_value_t = DEFAULT_ROWS,
        help = "Number of movements to generate"
    )]
    pub rows: usize,

    #[arg(
        short,
        long,
        env = "MOVEMENT_SYNTH_OUTPUT",
        value_name = "FILE",
        default_value = DEFAULT_OUTPUT,
        help = "Output file (.xlsx or .csv)"
    )]
    pub output: PathBuf,

    #[arg(long, env = "MOVEMENT_SYNTH_SEED", help = "Seed for a reproducible table")]
    pub seed: Option<u64>,

    #[arg(long, env = "MOVEMENT_SYNTH_AMOUNT_MIN", default_value_t = DEFAULT_AMOUNT_MIN)]
    pub amount_min: f64,

    #[arg(long, env = "MOVEMENT_SYNTH_AMOUNT_MAX", default_value_t = DEFAULT_AMOUNT_MAX)]
    pub amount_max: f64,

    #[arg(
        long,
        env = "MOVEMENT_SYNTH_DAYS_BACK",
        value_name = "DAYS",
        default_value_t = DEFAULT_MAX_DAYS_BACK,
        help = "Dates are drawn from the last DAYS days"
    )]
    pub days_back: u64,

    #[arg(
        long,
        env = "MOVEMENT_SYNTH_REFERENCE_DATE",
        value_name = "YYYY-MM-DD",
        help = "Latest possible date (defaults to today)"
    )]
    pub reference_date: Option<NaiveDate>,
}

impl GenerateArgs {
    pub fn to_config(&self) -> Result<GeneratorConfig> {
        let config = GeneratorConfig {
            rows: self.rows,
            amount_min: self.amount_min,
            amount_max: self.amount_max,
            max_days_back: self.days_back,
            reference_date: self
                .reference_date
                .unwrap_or_else(|| Local::now().date_naive()),
            seed: self.seed,
        };

        config.validate().context("Invalid generation settings")?;
        Ok(config)
    }
}

// ============================================================================
// INSPECT
// ============================================================================

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// File written by a previous run
    pub path: PathBuf,

    #[arg(long, value_name = "N", help = "Expected row count (defaults to the rows found)")]
    pub rows: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_AMOUNT_MIN)]
    pub amount_min: f64,

    #[arg(long, default_value_t = DEFAULT_AMOUNT_MAX)]
    pub amount_max: f64,

    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Check dates against the window ending on this date"
    )]
    pub reference_date: Option<NaiveDate>,

    #[arg(long, value_name = "DAYS", default_value_t = DEFAULT_MAX_DAYS_BACK)]
    pub days_back: u64,
}

impl InspectArgs {
    /// Build the validator; `found_rows` stands in when no row count was given
    pub fn validator(&self, found_rows: usize) -> Result<TableValidator> {
        let validator =
            TableValidator::new(self.rows.unwrap_or(found_rows), self.amount_min, self.amount_max);

        match self.reference_date {
            Some(reference) => {
                let earliest = reference
                    .checked_sub_days(Days::new(self.days_back))
                    .with_context(|| format!("Date window before {} is out of range", reference))?;
                Ok(validator.with_date_window(earliest, reference))
            }
            None => Ok(validator),
        }
    }

    /// Read the file back, summarize it and run every check
    pub fn inspect(&self) -> Result<(BatchSummary, ValidationReport)> {
        let table = read_table(&self.path)?;
        let summary = BatchSummary::from_movements(&table.movements);
        let report = self.validator(table.len())?.validate(&table);
        Ok((summary, report))
    }
}
