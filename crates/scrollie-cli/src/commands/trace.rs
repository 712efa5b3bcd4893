use anyhow::Result;
use clap::Args;

use scrollie_core::trace::{RunOutcome, Supersede};
use scrollie_core::{run_trace, AppConfig, EasingKind, FrameMode, TraceOptions, TraceReport};

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Target offset
    #[arg(long, allow_hyphen_values = true)]
    to: f64,
    /// Starting offset
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    from: f64,
    /// Duration in milliseconds (defaults to scroll.duration_ms)
    #[arg(long)]
    duration: Option<f64>,
    /// Easing preset: linear, quad, cubic, quintic, ease-out
    #[arg(long)]
    easing: Option<EasingKind>,
    /// Platform identifier used for frame source selection
    #[arg(long)]
    user_agent: Option<String>,
    /// Hide native frames and use the timer fallback
    #[arg(long)]
    timer: bool,
    /// Start a second animation at this virtual time (ms)
    #[arg(long, requires = "supersede_to")]
    supersede_at: Option<f64>,
    /// Target of the second animation
    #[arg(long, requires = "supersede_at", allow_hyphen_values = true)]
    supersede_to: Option<f64>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl TraceArgs {
    fn options(&self, config: &AppConfig) -> TraceOptions {
        let scroll = &config.scroll;
        TraceOptions {
            from: self.from,
            to: self.to,
            duration_ms: Some(self.duration.unwrap_or(scroll.duration_ms as f64)),
            easing: self.easing.unwrap_or(scroll.easing),
            user_agent: self
                .user_agent
                .clone()
                .or_else(|| scroll.user_agent.clone())
                .unwrap_or_default(),
            frames: if self.timer {
                FrameMode::Timer
            } else {
                scroll.frames
            },
            supersede: match (self.supersede_at, self.supersede_to) {
                (Some(at_ms), Some(to)) => Some(Supersede { at_ms, to }),
                _ => None,
            },
        }
    }
}

pub async fn run(config: &AppConfig, args: TraceArgs) -> Result<()> {
    let options = args.options(config);
    tracing::debug!(?options, "Tracing scroll animation");

    let report = run_trace(&options).await?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &TraceReport) {
    println!("Frames: {}\n", report.backend);
    println!("{:>9}  {:>3}  {:>12}", "time_ms", "run", "offset");
    for row in &report.rows {
        println!("{:>9.1}  {:>3}  {:>12.3}", row.time_ms, row.run, row.offset);
    }
    println!();

    for (i, outcome) in report.outcomes.iter().enumerate() {
        let outcome = match outcome {
            RunOutcome::Completed => "completed",
            RunOutcome::Cancelled => "cancelled",
        };
        println!("Run {}: {}", i + 1, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: TraceArgs,
    }

    fn parse(argv: &[&str]) -> TraceArgs {
        let mut full = vec!["trace"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_defaults_come_from_config() {
        let mut config = AppConfig::default();
        config.scroll.duration_ms = 250;
        config.scroll.easing = EasingKind::Cubic;
        config.scroll.user_agent = Some("iPod OS 6".to_string());

        let options = parse(&["--to", "120"]).options(&config);
        assert_eq!(options.to, 120.0);
        assert_eq!(options.from, 0.0);
        assert_eq!(options.duration_ms, Some(250.0));
        assert_eq!(options.easing, EasingKind::Cubic);
        assert_eq!(options.user_agent, "iPod OS 6");
        assert_eq!(options.frames, FrameMode::Auto);
        assert!(options.supersede.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let options = parse(&[
            "--to",
            "-10",
            "--duration",
            "80",
            "--easing",
            "ease-out",
            "--timer",
            "--supersede-at",
            "40",
            "--supersede-to",
            "5",
        ])
        .options(&AppConfig::default());

        assert_eq!(options.to, -10.0);
        assert_eq!(options.duration_ms, Some(80.0));
        assert_eq!(options.easing, EasingKind::EaseOut);
        assert_eq!(options.frames, FrameMode::Timer);
        assert_eq!(options.supersede, Some(Supersede { at_ms: 40.0, to: 5.0 }));
    }

    #[test]
    fn test_supersede_flags_come_in_pairs() {
        let result = Harness::try_parse_from(["trace", "--to", "1", "--supersede-at", "40"]);
        assert!(result.is_err());
    }
}
