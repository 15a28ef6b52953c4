use crate::gitlab::Environment;
use tracing::level_filters::LevelFilter;

/// Environment variable selecting the log threshold
pub const LOG_ENV: &str = "GITLAB_CI_SEMVER_LABELS_LOG";

/// Map a level name to a filter; unset or unknown names mean ERROR
pub fn level_filter(value: Option<&str>) -> LevelFilter {
    match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
        Some("TRACE") => LevelFilter::TRACE,
        Some("DEBUG") => LevelFilter::DEBUG,
        Some("INFO") => LevelFilter::INFO,
        Some("WARNING") | Some("WARN") => LevelFilter::WARN,
        _ => LevelFilter::ERROR,
    }
}

/// Install the stderr log subscriber
pub fn init<E: Environment>(env: &E) {
    let level = level_filter(env.var(LOG_ENV).as_deref());

    // Fails only if a subscriber is already set, which keeps the first one.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
