use anyhow::{bail, Context};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use ideascope::chart;
use ideascope::config::AnalysisConfig;
use ideascope::multiline;
use ideascope::parser;
use ideascope::report::{self, DailyReport};
use ideascope::sources::{self, CollectedInputs, DirSource};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Once;
use tracing::{info, warn, Level};

fn init_parallelism() {
    static START: Once = Once::new();
    START.call_once(|| {
        let n = num_cpus::get();
        let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
    });
}

#[derive(Parser, Debug)]
#[command(name = "ideascope", version, about = "Daily trend analysis over startup idea logs")]
struct Cli {
    /// Idea log files read as the overall log (`-` for stdin). May be repeated.
    #[arg(required = false)]
    input: Vec<String>,

    /// Directory holding the full log layout (overall, daily, chart, generator)
    #[arg(long = "root")]
    root: Option<PathBuf>,

    /// Chart log files. May be repeated.
    #[arg(long = "chart")]
    chart: Vec<PathBuf>,

    /// Idea Generator log files. May be repeated.
    #[arg(long = "generator")]
    generator: Vec<PathBuf>,

    /// Report date (YYYY-MM-DD); defaults to today in UTC
    #[arg(long = "date")]
    date: Option<String>,

    /// JSON file overriding analysis thresholds
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Write `<dir>/<date>.json` instead of printing
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Print only a specific section: categories | clusters | heatmap | signal | validation | ideas
    #[arg(long = "only")]
    only: Option<String>,

    #[arg(long = "min-cluster-size")] min_cluster_size: Option<usize>,
    #[arg(long = "lookback-days")] lookback_days: Option<u32>,

    /// Debug logging on stderr
    #[arg(long = "verbose", short = 'v', default_value_t = false)] verbose: bool,
    /// Warnings only on stderr
    #[arg(long = "quiet", short = 'q', default_value_t = false)] quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn read_inputs(paths: &[String]) -> io::Result<String> {
    let mut body = String::new();
    for p in paths {
        if p == "-" {
            io::stdin().lock().read_to_string(&mut body)?;
        } else {
            body.push_str(&std::fs::read_to_string(p)?);
        }
        if !body.ends_with('\n') {
            body.push('\n');
        }
    }
    Ok(body)
}

fn load_config(cli: &Cli) -> anyhow::Result<AnalysisConfig> {
    let mut cfg = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(n) = cli.min_cluster_size {
        cfg.min_cluster_size = n;
    }
    if let Some(n) = cli.lookback_days {
        cfg.lookback_days = n;
    }
    Ok(cfg)
}

fn gather(cli: &Cli, date: NaiveDate, cfg: &AnalysisConfig) -> anyhow::Result<CollectedInputs> {
    let mut inputs = match &cli.root {
        Some(root) => sources::collect_inputs(&DirSource::new(root), date, cfg),
        None => CollectedInputs::default(),
    };
    if !cli.input.is_empty() {
        let body = read_inputs(&cli.input).context("reading idea logs")?;
        inputs.overall.extend(parser::parse_idea_lines(&body));
    }
    for path in &cli.chart {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("reading chart log {}", path.display()))?;
        inputs.chart.extend(chart::parse_chart_lines(&body));
    }
    for path in &cli.generator {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("reading generator log {}", path.display()))?;
        let (clean, rejected) = sources::screen_generator_entries(multiline::parse_generator_log(&body));
        inputs.generator.extend(clean);
        inputs.generator_rejected += rejected;
    }
    Ok(inputs)
}

fn print_section(report: &DailyReport, only: &str) -> anyhow::Result<()> {
    let out = match only {
        "categories" => serde_json::to_string_pretty(&report.categories)?,
        "clusters" => serde_json::to_string_pretty(&report.clusters)?,
        "heatmap" => serde_json::to_string_pretty(&report.problem_heatmap)?,
        "signal" => serde_json::to_string_pretty(&report.signal_score)?,
        "validation" => serde_json::to_string_pretty(&report.validation)?,
        "ideas" => serde_json::to_string_pretty(&report.ideas)?,
        other => bail!("unknown section '{}' for --only", other),
    };
    println!("{}", out);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    init_parallelism();

    let date = match &cli.date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .with_context(|| format!("invalid --date '{}', expected YYYY-MM-DD", d))?,
        None => Utc::now().date_naive(),
    };
    let cfg = load_config(&cli)?;
    let inputs = gather(&cli, date, &cfg)?;
    if inputs.overall.is_empty() && inputs.daily.is_empty() && inputs.chart.is_empty() && inputs.generator.is_empty() {
        warn!("no input records; report will be empty");
    }

    let report = report::build_report(date, &inputs, &cfg);

    if let Some(only) = cli.only.as_deref() {
        return print_section(&report, only);
    }
    match &cli.out_dir {
        Some(dir) => {
            let path = report::write_report(&report, dir)?;
            info!(path = %path.display(), "wrote report");
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
