// Movement Synth - Core Library
// Random financial movement tables: generation, export, read-back and checks

pub mod movement;
pub mod generator;
pub mod export;
pub mod validation;
pub mod summary;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use movement::{
    Movement, MovementType, Classification, CostCenter, Location, Currency,
    COLUMNS, document_reference, parse_document_number,
};
pub use generator::{GeneratorConfig, MovementGenerator};
pub use export::{
    MovementTable, OutputFormat,
    write_table, read_table,
};
pub use validation::{TableValidator, ValidationReport, CheckResult};
pub use summary::BatchSummary;
pub use config::{CliArgs, Command, GenerateArgs, InspectArgs, LogFormat};
pub use logging::init_logging;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
