// src/main.rs
mod analysis;
mod config;
mod recorder;
mod types;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use analysis::{
    baseline, dashboard, dataset, relabel, source, trainer, AnalysisError, PlotStyle,
};
use config::Config;
use recorder::DatasetRecorder;

#[derive(Parser)]
#[command(name = "mqsense")]
#[command(version)]
#[command(about = "Offline analysis tools for the MQ gas / PM2.5 smoke sensor prototype")]
#[command(long_about = None)]
struct Cli {
    /// JSON file overriding paths and thresholds
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate MQ-3 / MQ-135 resting baselines from a serial capture
    Baseline {
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Diagnostic chart (PNG)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Parse a smoke capture, drop contact-loss rows, relabel alarms
    Relabel {
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Cleaned CSV
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Verification chart (PNG)
        #[arg(long)]
        plot: Option<PathBuf>,
    },
    /// Render the three-panel dashboard for a cleaned CSV
    Visualize {
        #[arg(long, short)]
        input: Option<PathBuf>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Merge the labeled CSVs and grow the forest tree by tree
    Train {
        /// Learning curve (PNG)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

// 入口函数：每个子命令独立运行，失败只打印诊断信息，不改变退出码
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    let style = PlotStyle::for_host();
    let outcome = match cli.command {
        Commands::Baseline { input, output } => {
            let input = input.unwrap_or_else(|| config.paths.baseline_log.clone());
            let output = output.unwrap_or_else(|| config.paths.baseline_plot.clone());
            cmd_baseline(&config, &style, &input, &output)
        }
        Commands::Relabel {
            input,
            output,
            plot,
        } => {
            let input = input.unwrap_or_else(|| config.paths.smoke_log.clone());
            let output = output.unwrap_or_else(|| config.paths.cleaned_csv.clone());
            let plot = plot.unwrap_or_else(|| config.paths.verified_plot.clone());
            cmd_relabel(&config, &style, &input, &output, &plot)
        }
        Commands::Visualize { input, output } => {
            let input = input.unwrap_or_else(|| config.paths.dashboard_csv.clone());
            let output = output.unwrap_or_else(|| config.paths.dashboard_plot.clone());
            cmd_visualize(&style, &input, &output)
        }
        Commands::Train { output } => {
            let output = output.unwrap_or_else(|| config.paths.training_plot.clone());
            cmd_train(&config, &style, &output)
        }
    };
    if let Err(e) = outcome {
        // {:?} 带上完整的 "Caused by" 链
        log::error!("{e:?}");
    }
}

fn save_png(path: &Path, png: &[u8]) -> Result<()> {
    std::fs::write(path, png).with_context(|| format!("writing {}", path.display()))
}

fn cmd_baseline(config: &Config, style: &PlotStyle, input: &Path, output: &Path) -> Result<()> {
    let log = match source::read_log(input) {
        Err(AnalysisError::FileNotFound(path)) => {
            println!("❌ Save the serial capture as {} next to the binary first.", path.display());
            return Ok(());
        }
        other => other.with_context(|| format!("reading {}", input.display()))?,
    };
    println!("📂 Reading capture ({} lines, {})", log.lines.len(), log.encoding);
    let report = match baseline::analyze(&log, &config.baseline.marker, config.baseline.quantile) {
        Err(e @ AnalysisError::NoSamples { .. }) => {
            println!("❌ {e}; check the capture format.");
            return Ok(());
        }
        other => other?,
    };
    let pct = config.baseline.quantile * 100.0;
    println!("{}", "-".repeat(30));
    println!("📊 Baselines (bottom {pct:.0}% mean):");
    println!("🔹 MQ-3 (alcohol): {:.2}", report.mq3_baseline);
    println!("🔹 MQ-135 (air)  : {:.2}", report.mq135_baseline);
    println!("{}", "-".repeat(30));
    let style = style.clone().with_size(1400, 1000);
    let png = analysis::render_baseline_png(&report, config.baseline.histogram_bins, &style)
        .context("rendering baseline diagnostics")?;
    save_png(output, &png)?;
    println!("📈 Diagnostics saved to {}", output.display());
    Ok(())
}

fn cmd_relabel(
    config: &Config,
    style: &PlotStyle,
    input: &Path,
    output: &Path,
    plot: &Path,
) -> Result<()> {
    let log = match source::read_log(input) {
        Err(AnalysisError::FileNotFound(path)) => {
            println!("❌ File not found: {}", path.display());
            return Ok(());
        }
        other => other.with_context(|| format!("reading {}", input.display()))?,
    };
    println!("Read {} lines ({})", log.lines.len(), log.encoding);
    let outcome = match relabel::process(&log, &config.relabel) {
        Err(
            e @ (AnalysisError::NoMatches
            | AnalysisError::NoValidTimestamps
            | AnalysisError::EmptyAfterFilter),
        ) => {
            println!("⚠️ {e}; nothing written.");
            return Ok(());
        }
        other => other.context("cleaning capture")?,
    };
    let counts = &outcome.counts;
    println!("Regex matched {} rows", counts.matched);
    println!("Rows with valid time: {}", counts.timed);
    println!("Kept after contact-loss filter: {}", counts.kept);
    println!("Dropped disconnection rows: {}", counts.dropped_by_filter());
    println!("Relabeled {} smoke alarm points (Label=1)", counts.alarms);

    let png = analysis::render_verification_png(&outcome.readings, style)
        .context("rendering verification chart")?;
    save_png(plot, &png)?;
    println!("Chart saved: {}", plot.display());

    let mut recorder = DatasetRecorder::create(output)
        .with_context(|| format!("creating {}", output.display()))?;
    recorder.write_all(&outcome.readings)?;
    let rows = recorder.rows_written();
    recorder.finish()?;
    println!("💾 Cleaned data saved: {} ({rows} rows)", output.display());
    Ok(())
}

fn cmd_visualize(style: &PlotStyle, input: &Path, output: &Path) -> Result<()> {
    let series = dashboard::load(input).with_context(|| format!("loading {}", input.display()))?;
    if series.is_empty() {
        println!("⚠️ {} has no data rows; nothing to plot.", input.display());
        return Ok(());
    }
    log::info!("loaded {} rows from {}", series.len(), input.display());
    let style = style.clone().with_size(1200, 1200);
    let png = analysis::render_dashboard_png(&series, &style).context("rendering dashboard")?;
    save_png(output, &png)?;
    println!("Chart saved to {}", output.display());
    Ok(())
}

fn cmd_train(config: &Config, style: &PlotStyle, output: &Path) -> Result<()> {
    println!("🚀 Loading datasets...");
    let (merged, reports) = dataset::merge_sources(&config.paths.sources);
    let skipped: Vec<&str> = reports
        .iter()
        .filter(|r| r.outcome.is_err())
        .map(|r| r.name.as_str())
        .collect();
    if !skipped.is_empty() {
        println!(
            "⚠️ Skipped {} of {} sources: {}",
            skipped.len(),
            reports.len(),
            skipped.join(", ")
        );
    }
    let training = &config.training;
    let split = trainer::train_test_split(&merged, training.test_fraction, training.seed)
        .context("splitting merged dataset")?;
    println!("📊 Dataset ready: {} samples", merged.len());
    println!("🔄 Growing forest...");
    let rule = "-".repeat(50);
    println!("{rule}");
    println!("{:<6} | {:<8} | {:<12} | {:<12}", "Round", "Trees", "Train acc", "Test acc");
    println!("{rule}");
    let history = trainer::train_incrementally(&split, training, |round, train_acc, test_acc| {
        if trainer::is_report_round(round, training.report_every) {
            println!("Epoch {round:<2} | {round:<10} | {train_acc:.4}       | {test_acc:.4}");
        }
    })?;
    let style = style.clone().with_size(1000, 600);
    let png =
        analysis::render_training_png(&history, &style).context("rendering training curve")?;
    save_png(output, &png)?;
    println!("{rule}");
    println!("✅ Training finished ({} rounds)", history.len());
    println!("📈 Curve saved to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn relabel_accepts_path_overrides() {
        let cli = Cli::try_parse_from([
            "mqsense", "--config", "bench.json", "relabel", "-i", "cap.txt", "--plot", "v.png",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bench.json")));
        match cli.command {
            Commands::Relabel { input, output, plot } => {
                assert_eq!(input, Some(PathBuf::from("cap.txt")));
                assert_eq!(output, None);
                assert_eq!(plot, Some(PathBuf::from("v.png")));
            }
            _ => panic!("expected relabel"),
        }
    }
}
