//! Turkey Run tooling entry point
//!
//! Native builds get a small CLI around the simulation core: dump the laser
//! catalog, prove each pattern survivable, or run a headless session.
//! The browser build drives the core through `turkey_run::wasm` instead.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::{Parser, Subcommand};

    use turkey_run::Tuning;
    use turkey_run::consts::*;
    use turkey_run::export::CatalogExport;
    use turkey_run::sim::{LaserCatalog, Session};
    use turkey_run::solvability::{SolverConfig, analyze_pattern};

    /// Hazard simulation tooling for Turkey Run
    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Enable verbose logging
        #[arg(short, long, global = true)]
        verbose: bool,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Print the laser catalog and replay constants as JSON
        Export {
            #[arg(long)]
            pretty: bool,
        },
        /// Check that laser patterns leave a reachable safe height
        Verify {
            /// Only check this pattern id
            #[arg(long)]
            pattern: Option<String>,
            /// Solver step in seconds
            #[arg(long, default_value_t = SIM_DT)]
            dt: f32,
            /// Exit with status 2 if any pattern fails
            #[arg(long)]
            strict: bool,
        },
        /// Run a headless session with a hovering autopilot
        Simulate {
            #[arg(long, default_value_t = 1)]
            seed: u64,
            #[arg(long, default_value_t = 60.0)]
            seconds: f32,
            /// Tuning JSON to load instead of the defaults
            #[arg(long)]
            tuning: Option<PathBuf>,
        },
    }

    fn init_logging(verbose: bool) {
        let level = if verbose { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        init_logging(args.verbose);

        match args.command {
            Command::Export { pretty } => {
                let export = CatalogExport::from_catalog(&LaserCatalog::standard());
                println!("{}", export.to_json(pretty)?);
            }
            Command::Verify { pattern, dt, strict } => {
                if !(dt > 0.0) {
                    bail!("--dt must be positive, got {dt}");
                }
                let catalog = LaserCatalog::standard();
                let patterns = match &pattern {
                    Some(id) => vec![catalog.find(id)?],
                    None => catalog.patterns().iter().collect(),
                };
                let config = SolverConfig::default();
                let mut failures = 0;
                for p in patterns {
                    let result = analyze_pattern(p, dt, &config);
                    println!("{}", result.report_line());
                    if !result.passed {
                        failures += 1;
                    }
                }
                println!("{failures} failing pattern(s)");
                if strict && failures > 0 {
                    std::process::exit(2);
                }
            }
            Command::Simulate { seed, seconds, tuning } => {
                let tuning = match tuning {
                    Some(path) => Tuning::load(&path)
                        .with_context(|| format!("loading tuning from {}", path.display()))?,
                    None => Tuning::default(),
                };
                simulate(seed, seconds, tuning)?;
            }
        }
        Ok(())
    }

    fn simulate(seed: u64, seconds: f32, tuning: Tuning) -> Result<()> {
        let mut session = Session::with_tuning(seed, tuning)?;
        let hover_y = GROUND_Y / 2.0;
        let frames = (seconds.max(0.0) / SIM_DT).round() as u64;

        log::info!("Simulating {seconds}s with seed {seed}");
        for frame in 0..frames {
            let thrusting = session.player().y > hover_y;
            if session.advance(SIM_DT, thrusting) {
                break;
            }
            if frame > 0 && frame % 600 == 0 {
                log::info!("{}m, {} coins", session.meters(), session.spawner().food().coins());
            }
        }

        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is turkey_run::wasm::wasm_start
}
