//! AgriVerse CLI Module
//!
//! Command-line interface for training, prediction, evaluation and the crop
//! catalog.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::catalog::{self, SoilStatus};
use crate::config::{DataSource, PredictorConfig};
use crate::dataset::{synthetic::DEFAULT_SAMPLES_PER_CROP, Feature, Sample, SyntheticGenerator};
use crate::inference::CropPredictor;

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 200, 140) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn gauge_bar(percentage: f64) -> String {
    const CELLS: usize = 20;
    let filled = ((percentage / 100.0) * CELLS as f64).round() as usize;
    let filled = filled.min(CELLS);
    format!("{}{}", "█".repeat(filled).truecolor(120, 200, 140), dim(&"░".repeat(CELLS - filled)))
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "agriverse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Crop recommendation from soil and climate readings")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that needs a model
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Training data CSV (N,P,K,temperature,humidity,ph,rainfall,label)
    #[arg(short, long, conflicts_with = "synthetic")]
    pub data: Option<PathBuf>,

    /// Train on the seeded synthetic fixture instead of a CSV
    #[arg(long)]
    pub synthetic: bool,

    /// Model file to load from and save to
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Keep the model in memory only
    #[arg(long, conflicts_with = "model")]
    pub no_save: bool,

    /// Number of trees in the forest
    #[arg(long)]
    pub trees: Option<usize>,

    /// Seed for the split, the forest and the synthetic fixture
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ModelArgs {
    /// Configuration file values with command-line overrides applied
    pub fn resolve(&self) -> anyhow::Result<PredictorConfig> {
        let mut config = match &self.config {
            Some(path) => PredictorConfig::load(path)?,
            None => PredictorConfig::default(),
        };

        if let Some(seed) = self.seed {
            config = config.with_random_seed(seed);
        }
        if let Some(path) = &self.data {
            config = config.with_data_source(DataSource::Csv { path: path.clone() });
        }
        if self.synthetic {
            let samples_per_crop = match config.data_source {
                DataSource::Synthetic { samples_per_crop, .. } => samples_per_crop,
                DataSource::Csv { .. } => DEFAULT_SAMPLES_PER_CROP,
            };
            let seed = config.random_seed;
            config = config.with_data_source(DataSource::Synthetic {
                seed,
                samples_per_crop,
            });
        }
        if let Some(path) = &self.model {
            config = config.with_model_path(path.clone());
        }
        if self.no_save {
            config = config.without_persistence();
        }
        if let Some(trees) = self.trees {
            config = config.with_n_estimators(trees);
        }

        config.validate()?;
        Ok(config)
    }
}

/// The seven readings of a prediction request
#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    /// Nitrogen (ppm)
    #[arg(long = "n", short = 'N', allow_negative_numbers = true)]
    pub nitrogen: f64,

    /// Phosphorus (ppm)
    #[arg(long = "p", short = 'P', allow_negative_numbers = true)]
    pub phosphorus: f64,

    /// Potassium (ppm)
    #[arg(long = "k", short = 'K', allow_negative_numbers = true)]
    pub potassium: f64,

    /// Temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    pub temperature: f64,

    /// Relative humidity (%)
    #[arg(long, allow_negative_numbers = true)]
    pub humidity: f64,

    /// Soil pH
    #[arg(long, allow_negative_numbers = true)]
    pub ph: f64,

    /// Rainfall (mm)
    #[arg(long, allow_negative_numbers = true)]
    pub rainfall: f64,
}

impl SampleArgs {
    pub fn to_sample(&self) -> Sample {
        Sample::new(
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the model, or load it if a model file already exists
    Train {
        #[command(flatten)]
        model: ModelArgs,

        /// Retrain even if a model file exists
        #[arg(short, long)]
        force: bool,
    },

    /// Recommend a crop for one set of readings
    Predict {
        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        sample: SampleArgs,

        /// Number of ranked alternatives to show
        #[arg(long, default_value = "3")]
        top: usize,
    },

    /// Report accuracy on the held-out partition
    Evaluate {
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Write the synthetic fixture as CSV
    Synthesize {
        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Generator seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Rows per crop
        #[arg(long, default_value_t = DEFAULT_SAMPLES_PER_CROP)]
        per_crop: usize,
    },

    /// Show growing profiles from the crop catalog
    Crops {
        /// Crop to look up; lists all profiles when omitted
        name: Option<String>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(args: &ModelArgs, force: bool) -> anyhow::Result<()> {
    section("Train");

    let config = args.resolve()?;
    let predictor = CropPredictor::new(config)?;

    step_run(if force { "Training model" } else { "Loading or training model" });
    let start = Instant::now();
    let model = if force {
        predictor.retrain()?
    } else {
        predictor.train_or_load_model()?
    };
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!("  {:<16} {}", muted("Accuracy"), model.accuracy().to_string().white().bold());
    println!("  {:<16} {}", muted("Crops"), model.vocabulary().len());
    println!("  {:<16} {}", muted("Source"), model.source());
    println!("  {:<16} {}", muted("Trees"), model.n_trees());
    println!("  {:<16} {} / {}", muted("Train / test"), model.n_train(), model.n_test());
    println!("  {:<16} {}", muted("Trained at"), model.trained_at().format("%Y-%m-%d %H:%M:%S UTC"));
    match predictor.model_path() {
        Some(path) => println!("  {:<16} {}", muted("Model file"), path.display()),
        None => println!("  {:<16} {}", muted("Model file"), dim("not saved")),
    }
    println!();

    Ok(())
}

pub fn cmd_predict(args: &ModelArgs, sample_args: &SampleArgs, top: usize) -> anyhow::Result<()> {
    let sample = sample_args.to_sample();
    let predictor = CropPredictor::new(args.resolve()?)?;

    section("Readings");
    for feature in Feature::ALL {
        let value = sample.get(feature);
        let level = catalog::feature_gauge(feature, value);
        println!(
            "  {:<16} {:>8.1} {:<4} {} {}",
            muted(feature.display_name()),
            value,
            feature.unit(),
            gauge_bar(level),
            dim(&format!("{:.1}%", level))
        );
    }
    if let Err(e) = sample.validate() {
        println!();
        println!("  {} {}", "!".yellow(), e.to_string().yellow());
    }

    let soil = SoilStatus::from_ph(sample.ph);
    println!();
    println!("  {:<16} {}", muted("Soil"), soil.to_string().white().bold());
    println!("  {:<16} {}", "", dim(soil.advice()));

    println!();
    step_run("Analyzing");
    let start = Instant::now();
    let prediction = predictor.predict(&sample)?;
    let ranked = predictor.rank(&sample, top)?;
    step_done(&format!("{:?}", start.elapsed()));

    let profile = catalog::profile(&prediction.label);

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}  {}", profile.emoji, title_case(&prediction.label).white().bold()));
    line_box_center(&format!("{}", dim(&format!("{:.0}% of trees agree", prediction.confidence * 100.0))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Season     ", profile.season));
    line_box(&kv("Water need ", profile.water));
    line_box(&kv("Temperature", profile.temperature));
    line_box(&kv("Soil type  ", profile.soil));
    line_box_empty();
    line_box_bottom();

    if ranked.len() > 1 {
        section("Alternatives");
        for alt in ranked.iter().skip(1) {
            println!("  {:<16} {}", alt.label.white(), dim(&format!("{:.0}%", alt.confidence * 100.0)));
        }
    }

    section("Recommendations");
    for tip in catalog::advisories(&prediction.label) {
        println!("  {}", tip);
    }
    println!();

    Ok(())
}

pub fn cmd_evaluate(args: &ModelArgs) -> anyhow::Result<()> {
    section("Evaluate");

    let predictor = CropPredictor::new(args.resolve()?)?;

    step_run("Scoring held-out partition");
    let start = Instant::now();
    let model = predictor.train_or_load_model()?;
    let accuracy = predictor.evaluate()?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!("  {:<16} {}", muted("Accuracy"), accuracy.to_string().white().bold());
    println!("  {:<16} {}", muted("Test rows"), model.n_test());
    println!("  {:<16} {}", muted("Source"), model.source());
    println!("  {:<16} {}", muted("Crops"), model.vocabulary().len());

    section("Feature importance");
    let mut importances = model.feature_importances();
    importances.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (feature, importance) in importances {
        println!(
            "  {:<16} {} {}",
            muted(feature.display_name()),
            gauge_bar(importance * 100.0),
            dim(&format!("{:.3}", importance))
        );
    }
    println!();

    Ok(())
}

pub fn cmd_synthesize(output: &Path, seed: u64, per_crop: usize) -> anyhow::Result<()> {
    section("Synthesize");

    step_run("Generating rows");
    let set = SyntheticGenerator::new(seed).with_samples_per_crop(per_crop).generate()?;
    step_done(&format!("{} rows, {} crops", set.len(), set.n_classes()));

    step_run("Writing CSV");
    set.save_csv(output)?;
    step_done(&output.display().to_string());
    println!();

    Ok(())
}

pub fn cmd_crops(name: Option<&str>) -> anyhow::Result<()> {
    match name {
        Some(name) => {
            let profile = catalog::profile(name);
            println!();
            line_box_top();
            line_box_empty();
            line_box_center(&format!("{}  {}", profile.emoji, title_case(name).white().bold()));
            line_box_empty();
            line_box_sep();
            line_box_empty();
            line_box(&kv("Season     ", profile.season));
            line_box(&kv("Water need ", profile.water));
            line_box(&kv("Temperature", profile.temperature));
            line_box(&kv("Soil type  ", profile.soil));
            line_box_empty();
            line_box_bottom();
            println!();
        }
        None => {
            section("Crops");
            println!(
                "  {:<14} {:<13} {:<10} {:<10} {}",
                muted("Crop"), muted("Season"), muted("Water"), muted("Temp"), muted("Soil")
            );
            println!("  {}", dim(&"─".repeat(56)));
            for crop in catalog::known_crops() {
                let p = catalog::profile(crop);
                println!(
                    "  {} {:<11} {:<13} {:<10} {:<10} {}",
                    p.emoji, crop.white(), p.season, p.water, p.temperature, p.soil
                );
            }
            println!();
            println!("  {}", dim("other crops use a generic profile"));
            println!();
        }
    }
    Ok(())
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict() {
        let cli = Cli::try_parse_from([
            "agriverse", "predict", "--synthetic", "--no-save",
            "--n", "90", "--p", "42", "--k", "43",
            "--temperature", "20.9", "--humidity", "82", "--ph", "6.5", "--rainfall", "202.9",
        ])
        .unwrap();
        match cli.command {
            Commands::Predict { model, sample, top } => {
                assert!(model.synthetic && model.no_save);
                assert_eq!(top, 3);
                assert_eq!(sample.to_sample().to_features(), [90.0, 42.0, 43.0, 20.9, 82.0, 6.5, 202.9]);
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn test_missing_reading_rejected() {
        assert!(Cli::try_parse_from(["agriverse", "predict", "--n", "90"]).is_err());
    }

    #[test]
    fn test_data_conflicts_with_synthetic() {
        assert!(Cli::try_parse_from(["agriverse", "train", "--data", "x.csv", "--synthetic"]).is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let args = ModelArgs {
            synthetic: true,
            no_save: true,
            trees: Some(12),
            seed: Some(7),
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.forest.n_estimators, 12);
        assert_eq!(config.random_seed, 7);
        assert!(config.model_path.is_none());
        assert!(matches!(config.data_source, DataSource::Synthetic { seed: 7, .. }));
    }

    #[test]
    fn test_title_case_and_gauge_bar() {
        assert_eq!(title_case("rice"), "Rice");
        assert_eq!(title_case(""), "");
        assert_eq!(strip_ansi(&gauge_bar(50.0)).chars().count(), 20);
    }
}
