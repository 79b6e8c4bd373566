//!
//! src/main.rs  Andrew Belles  Oct 8th, 2025
//!
//! Entry point of the chart trends service. Dispatches the collect, report
//! and plot subcommands over the configured data files
//!
//!

mod config;
mod errors;
mod logging;
mod types;

mod fetch;
mod sink;
mod collect;

mod genre;
mod clean;
mod dataset;
mod aggregate;
mod report;
mod chart;

use std::path::PathBuf;
use clap::{Parser, Subcommand};

use crate::config::DataConfig;
use crate::errors::TrendsError;
use crate::genre::GenreCategory;

#[derive(Debug, Parser)]
#[command(name = "chart-trends")]
#[command(about = "UK top 40 genre trends against unemployment")]
struct Cli {
    #[command(subcommand)]
    command: Command
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Enrich the raw chart listing with spotify track and genre data
    Collect {
        /// Raw listing, song,artist,date
        #[arg(short, long, value_name = "CSV")]
        input: Option<PathBuf>,

        /// Enriched chart table to write
        #[arg(short, long, value_name = "CSV")]
        output: Option<PathBuf>,
    },
    /// Print the markdown report
    Report {
        #[arg(long, value_name = "CSV")]
        charts: Option<PathBuf>,

        #[arg(long, value_name = "CSV")]
        unemployment: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Render every chart as svg
    Plot {
        #[arg(long, value_name = "CSV")]
        charts: Option<PathBuf>,

        #[arg(long, value_name = "CSV")]
        unemployment: Option<PathBuf>,

        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Genre for the overlay and single genre charts, by full label
        #[arg(short, long, default_value = "Pop")]
        genre: String,
    },
}

fn with_overrides(
    mut data: DataConfig,
    charts: Option<PathBuf>,
    unemployment: Option<PathBuf>
) -> DataConfig {
    if let Some(path) = charts {
        data.charts = path;
    }
    if let Some(path) = unemployment {
        data.unemployment = path;
    }
    data
}

fn parse_genre(label: &str) -> Result<GenreCategory, TrendsError> {
    GenreCategory::from_label(label).ok_or_else(|| TrendsError::Config(
        format!("unknown genre {label:?}")
    ))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), TrendsError> {
    let cli  = Cli::parse();
    let cfgs = config::load_config()?;
    let _guard = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service="chart-trends",
        version=%env!("CARGO_PKG_VERSION"),
        "starting"
    );

    match cli.command {
        Command::Collect { input, output } => {
            let spotify = config::load_spotify()?;
            let input  = input.unwrap_or(cfgs.data.raw_charts);
            let output = output.unwrap_or(cfgs.data.charts);
            collect::run_collect(&cfgs.http, &spotify, &input, &output).await?;
        },
        Command::Report { charts, unemployment, output } => {
            let data = with_overrides(cfgs.data, charts, unemployment);
            let records = dataset::load_records(&data)?;
            let text = report::render_report(&records);
            match output {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    tracing::info!(path = %path.display(), "report.written");
                },
                None => println!("{text}"),
            }
        },
        Command::Plot { charts, unemployment, out_dir, genre } => {
            let genre = parse_genre(&genre)?;
            let mut data = with_overrides(cfgs.data, charts, unemployment);
            if let Some(dir) = out_dir {
                data.plots_dir = dir;
            }
            let records = dataset::load_records(&data)?;
            let written = chart::render_all(
                &records,
                &data.plots_dir,
                genre,
                &chart::ChartStyle::default()
            )?;
            tracing::info!(charts = written.len(), dir = %data.plots_dir.display(), "plot.done");
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> DataConfig {
        DataConfig {
            raw_charts: "raw.csv".into(),
            charts: "charts.csv".into(),
            unemployment: "unemployment.csv".into(),
            plots_dir: "plots".into(),
        }
    }

    #[test]
    fn plot_arguments_parse() {
        let cli = Cli::try_parse_from([
            "chart-trends", "plot", "--genre", "Rap and Hip Hop", "--out-dir", "/tmp/x"
        ]).unwrap();
        match cli.command {
            Command::Plot { genre, out_dir, charts, .. } => {
                assert_eq!(parse_genre(&genre).unwrap(), GenreCategory::RapAndHipHop);
                assert_eq!(out_dir, Some(PathBuf::from("/tmp/x")));
                assert_eq!(charts, None);
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn plot_genre_defaults_to_pop() {
        let cli = Cli::try_parse_from(["chart-trends", "plot"]).unwrap();
        assert!(matches!(cli.command, Command::Plot { ref genre, .. } if genre == "Pop"));
    }

    #[test]
    fn unknown_genre_is_a_config_error() {
        assert!(matches!(parse_genre("polka"), Err(TrendsError::Config(_))));
    }

    #[test]
    fn overrides_replace_only_given_paths() {
        let data = with_overrides(data(), Some("other.csv".into()), None);
        assert_eq!(data.charts, PathBuf::from("other.csv"));
        assert_eq!(data.unemployment, PathBuf::from("unemployment.csv"));
    }

    #[test]
    fn missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["chart-trends"]).is_err());
    }
}
