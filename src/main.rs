use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn};

use movement_synth::{
    init_logging, write_table, BatchSummary, CliArgs, Command, GenerateArgs,
    InspectArgs, MovementGenerator,
};

fn main() -> Result<()> {
    let cli = CliArgs::parse();
    init_logging(cli.log_format)?;

    match &cli.command {
        Some(Command::Inspect(args)) => run_inspect(args),
        None => run_generate(&cli.generate),
    }
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let config = args.to_config()?;
    info!(
        rows = config.rows,
        amount_min = config.amount_min,
        amount_max = config.amount_max,
        reference_date = %config.reference_date,
        days_back = config.max_days_back,
        seed = ?config.seed,
        "Generating movement table"
    );

    let mut generator = MovementGenerator::new(config)?;
    let movements = generator.generate();

    let summary = BatchSummary::from_movements(&movements);
    let summary_json = serde_json::to_string(&summary)?;
    info!(summary = %summary_json, "{}", summary.summary());

    write_table(&args.output, &movements)?;
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let (summary, report) = args.inspect()?;
    info!(path = %args.path.display(), "{}", summary.summary());

    for failure in report.failures() {
        warn!(check = %failure.check, "{}", failure.message);
    }

    if !report.passed() {
        bail!("{}: {}", args.path.display(), report.summary());
    }

    info!("{}", report.summary());
    Ok(())
}
