//! Logger setup for the demo binary.
//!
//! The library itself only talks to the `log` facade; embedding applications
//! are free to install their own logger instead of calling [`setup`].

use log::LevelFilter;

/// Environment variable holding the maximum log level (`error` .. `trace`).
pub const LOG_ENV: &str = "STREAMGRAPH_LOG";

/// Parse a level name; unknown or missing values fall back to `Info`.
///
/// ```
/// use log::LevelFilter;
/// use streamgraph::logging::parse_level;
///
/// assert_eq!(parse_level(Some("debug")), LevelFilter::Debug);
/// assert_eq!(parse_level(Some("bogus")), LevelFilter::Info);
/// assert_eq!(parse_level(None), LevelFilter::Info);
/// ```
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install a stderr logger with timestamps; level comes from `STREAMGRAPH_LOG`.
pub fn setup() -> Result<(), fern::InitError> {
    let level = parse_level(std::env::var(LOG_ENV).ok().as_deref());

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for("streamgraph", level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}
