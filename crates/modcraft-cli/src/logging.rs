//! Tracing subscriber for the `modcraft` binary.
//!
//! The library crates only emit events. Each applied module runs inside a
//! `module{name=...}` span, so the formatter keeps span context on every
//! line. `-v` shows progress, `-vv` adds targets and `-vvv` also logs span
//! close timings. `--quiet` keeps errors only.
//!
//! `MODCRAFT_LOG` (then `RUST_LOG`) replaces the verbosity-derived filter
//! when it holds valid directives.

use std::io::IsTerminal as _;

use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    fmt::format::FmtSpan,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::cli::GlobalArgs;

const LOG_ENV: &str = "MODCRAFT_LOG";

/// Crates whose events reach the terminal by default.
const TARGETS: [&str; 3] = ["modcraft", "modcraft_core", "modcraft_adapters"];

pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let level = level_for(args);
    let env = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok();

    let spans = if level == LevelFilter::TRACE {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_target(level >= LevelFilter::DEBUG)
        .with_span_events(spans)
        .without_time();

    tracing_subscriber::registry()
        .with(build_filter(env.as_deref(), level))
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

fn level_for(args: &GlobalArgs) -> LevelFilter {
    match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// `modcraft=info,modcraft_core=info,...`; everything else stays silent.
fn directives(level: LevelFilter) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn build_filter(env: Option<&str>, level: LevelFilter) -> EnvFilter {
    env.filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(directives(level)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn args(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            output_format: OutputFormat::Auto,
        }
    }

    #[test]
    fn verbosity_maps_to_levels() {
        let levels: Vec<_> = (0..5).map(|v| level_for(&args(v, false))).collect();
        assert_eq!(
            levels,
            [
                LevelFilter::WARN,
                LevelFilter::INFO,
                LevelFilter::DEBUG,
                LevelFilter::TRACE,
                LevelFilter::TRACE
            ]
        );
        assert_eq!(level_for(&args(3, true)), LevelFilter::ERROR);
    }

    #[test]
    fn directives_cover_every_crate() {
        assert_eq!(
            directives(LevelFilter::DEBUG),
            "modcraft=debug,modcraft_core=debug,modcraft_adapters=debug"
        );
    }

    #[test]
    fn env_directives_replace_verbosity() {
        let filter = build_filter(Some("modcraft_adapters=trace"), LevelFilter::WARN);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn unusable_env_falls_back_to_verbosity() {
        for env in [None, Some(""), Some("modcraft=loud")] {
            let filter = build_filter(env, LevelFilter::INFO);
            assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO), "{env:?}");
        }
    }
}
