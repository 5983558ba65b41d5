use log::LevelFilter;

/// Initializes the global logger at the given level, still honoring any
/// `RUST_LOG` override from the environment.
pub fn init(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// Maps repeated `-v` flags to a log level: info by default, then debug,
/// then trace.
pub fn level_from_verbosity(verbose: usize) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/* Tests */

#[test]
fn verbosity_maps_to_levels() {
    assert_eq!(level_from_verbosity(0), LevelFilter::Info);
    assert_eq!(level_from_verbosity(1), LevelFilter::Debug);
    assert_eq!(level_from_verbosity(2), LevelFilter::Trace);
    assert_eq!(level_from_verbosity(7), LevelFilter::Trace);
}
