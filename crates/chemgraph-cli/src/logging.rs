use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    fmt::{self},
    prelude::*,
    registry::LookupSpan,
};

/// Targets whose events follow `-v`; everything else (rayon, dependencies) stays
/// at warnings or quieter.
const OWN_TARGETS: [&str; 2] = ["chemgraph", "chemgraph_cli"];

fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn target_filter(verbosity: u8, quiet: bool) -> Targets {
    let level = level_filter(verbosity, quiet);
    OWN_TARGETS
        .iter()
        .fold(Targets::new(), |targets, &target| targets.with_target(target, level))
        .with_default(level.min(LevelFilter::WARN))
}

/// Plain-text layer for `--log-file`: no colours, with thread ids so rayon
/// workers can be told apart.
fn file_layer<S>(file: File) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(target_filter(verbosity, quiet))
        .with(stderr_layer);

    match log_file {
        Some(path) => {
            let file = File::create(&path).map_err(CliError::Io)?;
            subscriber.with(file_layer(file)).init();
        }
        None => subscriber.init(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::{Level, debug, trace};

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::ERROR);
    }

    #[test]
    fn verbose_flags_only_open_up_our_own_targets() {
        let targets = target_filter(3, false);
        assert!(targets.would_enable("chemgraph::engine::perception::rp_path", &Level::TRACE));
        assert!(targets.would_enable("chemgraph_cli::commands::rings", &Level::DEBUG));
        assert!(!targets.would_enable("rayon_core::registry", &Level::DEBUG));
        assert!(targets.would_enable("rayon_core::registry", &Level::WARN));
    }

    #[test]
    fn quiet_keeps_only_errors_everywhere() {
        let targets = target_filter(2, true);
        assert!(!targets.would_enable("chemgraph::engine::connectivity", &Level::WARN));
        assert!(targets.would_enable("chemgraph::engine::connectivity", &Level::ERROR));
        assert!(!targets.would_enable("rayon_core::registry", &Level::WARN));
    }

    #[test]
    #[serial]
    fn log_file_receives_filtered_engine_events() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("rings.log");
        let file = File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(target_filter(2, false))
            .with(file_layer(file));

        tracing::subscriber::with_default(subscriber, || {
            debug!(target: "chemgraph::engine::perception", rings = 2, "Rings perceived");
            trace!(target: "chemgraph::engine::perception", "Candidate rejected");
            debug!(target: "rayon_core::registry", "Worker parked");
        });

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Rings perceived"));
        assert!(content.contains("rings=2"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains("Candidate rejected"));
        assert!(!content.contains("Worker parked"));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_is_an_io_error() {
        let directory = tempfile::tempdir().unwrap();
        let result = setup_logging(0, false, Some(directory.path().to_path_buf()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
