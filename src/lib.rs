pub mod align;
pub mod alphabet;
pub mod error;
pub mod genome;
pub mod index;
pub mod io;
pub mod params;
pub mod seed;

use log::info;

use crate::params::{Parameters, RunMode};

/// Top-level dispatcher. Called from `main()` after CLI parsing.
pub fn run(params: &Parameters) -> anyhow::Result<()> {
    params.validate()?;

    info!("methmap v{}", env!("CARGO_PKG_VERSION"));
    info!("mode: {}", params.run_mode);

    match params.run_mode {
        RunMode::MakeDb => {
            index::build_index(params)?;
        }
        RunMode::Map => {
            let stats = align::map_single_end(params)?;
            stats.log_summary();
        }
    }

    Ok(())
}
