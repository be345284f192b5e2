use std::process::ExitCode;

use addram::machine::{self, MachineOptions};
use addram::run::{Outcome, RunReport};
use addram::splice::Splice;
use addram::{Config, logging};
use clap::Parser;
use drivers::platform::Platform;

#[derive(Parser, Debug)]
#[command(
    name = "addram",
    about = "Size the IDE board's bonus RAM and add it to the system free-memory list."
)]
struct Args {
    /// Detect and report only; leave the list and the board untouched
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Report every step
    #[arg(short, long)]
    verbose: bool,

    /// Grow the fast RAM region ending at the bonus window instead of adding a new region
    #[arg(short, long)]
    merge: bool,

    /// Allocation priority for the board's fast RAM (bonus RAM gets two less)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    priority: i8,

    /// Unmap the bonus RAM window and exit
    #[arg(short, long)]
    disable: bool,

    /// Simulated machine: bytes of bonus RAM fitted
    #[arg(long, value_name = "BYTES", value_parser = parse_size, default_value = "0x1f0000")]
    sim_bonus: u32,

    /// Simulated machine: the board is not configured
    #[arg(long)]
    sim_no_board: bool,

    /// Simulated machine: the board's fast RAM stops short of the bonus window
    #[arg(long)]
    sim_short_fast: bool,

    /// Simulated machine: the expansion service cannot be opened
    #[arg(long)]
    sim_no_expansion: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config::new()
            .dry_run(self.dry_run)
            .verbose(self.verbose)
            .merge_with_adjacent(self.merge)
            .target_priority(self.priority)
            .disable(self.disable)
    }

    fn machine(&self) -> MachineOptions {
        MachineOptions {
            bonus_backed: self.sim_bonus,
            board_present: !self.sim_no_board,
            adjacent_fast: !self.sim_short_fast,
            expansion_service: !self.sim_no_expansion,
            ..MachineOptions::default()
        }
    }
}

fn parse_size(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid size {s:?}: {e}"))
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = args.config();
    logging::init(config.verbose);

    let machine = machine::classic(args.machine());
    log::debug!("platform: {}", machine.name());

    let result = if config.disable {
        addram::run::disable(&machine, &config).map(|_| ())
    } else {
        addram::run::run(&machine, &config).map(|report| summarize(&report))
    };

    match result {
        Ok(()) => {
            for region in machine.snapshot().iter() {
                log::debug!(
                    "{:#08x}-{:#08x} pri {:4} {:?} {}",
                    region.lower(),
                    region.upper(),
                    region.priority,
                    region.attributes,
                    region.name.as_deref().unwrap_or("")
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn summarize(report: &RunReport) {
    let kib = report.detected >> 10;
    match report.outcome {
        Outcome::Skipped => log::info!("Found {kib}kB of bonus RAM."),
        Outcome::Spliced(Splice::Merged { base }) => {
            log::info!("Added {kib}kB of bonus RAM to the region at {base:#08x}.")
        }
        Outcome::Spliced(Splice::Added { priority }) => {
            log::info!("Added {kib}kB of bonus RAM at priority {priority}.")
        }
    }
}
