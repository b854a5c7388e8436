use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use health_risk::dataset::csv_io;
use health_risk::{training, FeatureVector, RiskConfig, RuleTable, SyntheticGenerator};
use std::path::PathBuf;
use tracing::info;

/// Health-risk categorization from age, medical visits and physical activity.
#[derive(Parser, Debug)]
#[command(name = "health-risk", version, about)]
struct Cli {
    /// JSON configuration file; defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train (or retrain with --force) and persist the model
    Train {
        /// Retrain even if a valid artifact exists
        #[arg(long)]
        force: bool,

        /// Train on a labeled CSV (as written by `generate`) instead of generated data
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Predict a category with the trained model, training it first if needed
    Predict(FeatureArgs),

    /// Apply the labeling rule table directly, without a model
    Label(FeatureArgs),

    /// Write a synthetic labeled dataset as CSV
    Generate {
        #[arg(long, default_value_t = 200)]
        samples: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value = "dataset.csv")]
        out: PathBuf,
    },
}

/// Raw feature values; parsed by the library so bad input gets its message.
#[derive(Args, Debug)]
struct FeatureArgs {
    #[arg(long)]
    age: Option<String>,

    /// Medical visits frequency
    #[arg(long)]
    visits: Option<String>,

    /// Physical activity level
    #[arg(long)]
    activity: Option<String>,
}

impl FeatureArgs {
    fn parse(&self) -> Result<FeatureVector> {
        Ok(FeatureVector::from_fields(
            self.age.as_deref(),
            self.visits.as_deref(),
            self.activity.as_deref(),
        )?)
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RiskConfig> {
    match path {
        Some(path) => RiskConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(RiskConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("health_risk=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Train { force, data } => {
            match data {
                Some(data) => training::train_from_csv(&config, &data)
                    .with_context(|| format!("training on {} failed", data.display()))?,
                None => training::load_or_train(&config, force).context("training failed")?,
            };
            println!("model saved to {}", config.artifact_path.display());
        }
        Commands::Predict(args) => {
            let features = args.parse()?;
            let predictor = training::load_or_train(&config, false)
                .context("could not obtain a trained model")?;
            let category = predictor.predict_features(&features)?;
            println!("{} ({})", category, category.description());
        }
        Commands::Label(args) => {
            let category = RuleTable::standard().classify(&args.parse()?);
            println!("{} ({})", category, category.description());
        }
        Commands::Generate { samples, seed, out } => {
            let generator =
                SyntheticGenerator::new(config.generator.ranges.clone(), RuleTable::standard())?;
            let data = generator.generate(samples, seed)?;
            csv_io::write_csv_file(&data, &out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(samples = data.len(), path = %out.display(), "wrote dataset");
        }
    }

    Ok(())
}
