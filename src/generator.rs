// 🎲 Movement Generator
// N rows, each field drawn independently and uniformly from its value set.

use anyhow::{bail, Result};
use chrono::{Days, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::export::excel_min_date;
use crate::movement::{
    document_reference, Classification, CostCenter, Currency, Location, Movement, MovementType,
    DOCUMENT_MAX, DOCUMENT_MIN,
};

pub const DEFAULT_ROWS: usize = 1000;
pub const DEFAULT_AMOUNT_MIN: f64 = 50.0;
pub const DEFAULT_AMOUNT_MAX: f64 = 5000.0;
pub const DEFAULT_MAX_DAYS_BACK: u64 = 365;

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of records to generate
    pub rows: usize,

    /// Inclusive amount range
    pub amount_min: f64,
    pub amount_max: f64,

    /// Dates are `reference_date - U{0..=max_days_back}` days
    pub max_days_back: u64,
    pub reference_date: NaiveDate,

    /// Fixed seed for reproducible tables (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            rows: DEFAULT_ROWS,
            amount_min: DEFAULT_AMOUNT_MIN,
            amount_max: DEFAULT_AMOUNT_MAX,
            max_days_back: DEFAULT_MAX_DAYS_BACK,
            reference_date: Local::now().date_naive(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Builder: set row count
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Builder: set amount range
    pub fn with_amount_range(mut self, min: f64, max: f64) -> Self {
        self.amount_min = min;
        self.amount_max = max;
        self
    }

    /// Builder: set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: set the date window
    pub fn with_date_window(mut self, reference_date: NaiveDate, max_days_back: u64) -> Self {
        self.reference_date = reference_date;
        self.max_days_back = max_days_back;
        self
    }

    /// Oldest date the generator can produce
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.reference_date.checked_sub_days(Days::new(self.max_days_back))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount_min.is_finite() || !self.amount_max.is_finite() {
            bail!(
                "Amount range must be finite, got [{}, {}]",
                self.amount_min,
                self.amount_max
            );
        }
        if self.amount_min > self.amount_max {
            bail!(
                "amount_min ({}) is greater than amount_max ({})",
                self.amount_min,
                self.amount_max
            );
        }
        // rand's float sampler overflows when the span is not finite
        if !(self.amount_max - self.amount_min).is_finite() {
            bail!(
                "Amount range [{}, {}] is too wide",
                self.amount_min,
                self.amount_max
            );
        }
        if self.rows > u32::MAX as usize {
            bail!("Row count {} exceeds the movement code range", self.rows);
        }
        match self.earliest_date() {
            None => bail!(
                "Date window of {} days before {} is out of range",
                self.max_days_back,
                self.reference_date
            ),
            Some(earliest) if earliest < excel_min_date() => bail!(
                "Date window of {} days before {} starts at {}, before {}",
                self.max_days_back,
                self.reference_date,
                earliest,
                excel_min_date()
            ),
            Some(_) => Ok(()),
        }
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

pub struct MovementGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl MovementGenerator {
    /// Create a generator; fails if the config is invalid
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(MovementGenerator { config, rng })
    }

    /// Generate the whole table, codes 1..=rows
    pub fn generate(&mut self) -> Vec<Movement> {
        debug!(rows = self.config.rows, seed = ?self.config.seed, "Generating movements");

        (1..=self.config.rows as u32)
            .map(|code| self.next_movement(code))
            .collect()
    }

    /// Draw a single record with the given code
    pub fn next_movement(&mut self, code: u32) -> Movement {
        let days_back = self.rng.gen_range(0..=self.config.max_days_back);
        // validate() guarantees the whole window is representable
        let date = self.config.reference_date - Days::new(days_back);

        let movement_type = pick(&mut self.rng, &MovementType::ALL);
        let classification = pick(&mut self.rng, &Classification::ALL);
        let document = document_reference(self.rng.gen_range(DOCUMENT_MIN..=DOCUMENT_MAX));
        let cost_center = pick(&mut self.rng, &CostCenter::ALL);
        let location = pick(&mut self.rng, &Location::ALL);
        let amount = self
            .rng
            .gen_range(self.config.amount_min..=self.config.amount_max);
        let currency = pick(&mut self.rng, &Currency::ALL);

        Movement {
            code,
            date,
            movement_type,
            classification,
            document,
            cost_center,
            location,
            amount,
            currency,
        }
    }
}

/// Uniform choice over one of the `ALL` value sets (never empty)
fn pick<T: Copy, R: Rng, const N: usize>(rng: &mut R, values: &[T; N]) -> T {
    values.choose(rng).copied().unwrap_or(values[0])
}
