use simplelog::ColorChoice;
use simplelog::ConfigBuilder;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;

use crate::error::Result;

pub fn level_filter(verbosity: usize) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Sets up the global logger, writing to stderr so that stdout only
/// carries the matrices and results.
pub fn init_logging(verbosity: usize) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    TermLogger::init(
        level_filter(verbosity),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}
