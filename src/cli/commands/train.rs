//! Train command - Self-play training of both colors

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::CheckpointFormat,
    app::{AgentConfig, App},
    cli::output::{print_kv, print_section, print_training_result},
    pipeline::{
        EpsilonReportObserver, JsonlObserver, ProgressObserver, SelfPlayTrainer, TrainingConfig,
    },
    types::Color,
};

/// `--summary out/` and `--summary out/run` both end up at a `.json` file.
fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train red and black Q-learning agents by self-play")]
pub struct TrainArgs {
    /// Number of self-play episodes
    #[arg(long, short = 'e', default_value_t = 5000)]
    pub episodes: usize,

    /// Directory for the q_red / q_black checkpoints
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Turn cap per episode (0 disables the cap)
    #[arg(long, default_value_t = 500)]
    pub max_steps: usize,

    /// Log exploration rates every N episodes
    #[arg(long, default_value_t = 500)]
    pub report_every: usize,

    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    pub alpha: f64,

    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Initial exploration probability
    #[arg(long, default_value_t = 1.0)]
    pub epsilon: f64,

    /// Exploration floor
    #[arg(long, default_value_t = 0.05)]
    pub epsilon_min: f64,

    /// Per-episode exploration decay factor
    #[arg(long, default_value_t = 0.995)]
    pub epsilon_decay: f64,

    /// Checkpoint file format
    #[arg(long, value_enum, default_value_t = CheckpointFormat::MsgPack)]
    pub format: CheckpointFormat,

    /// Optional file for JSONL per-episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl TrainArgs {
    fn agent_config(&self) -> AgentConfig {
        AgentConfig::default()
            .with_alpha(self.alpha)
            .with_gamma(self.gamma)
            .with_epsilon(self.epsilon)
            .with_epsilon_min(self.epsilon_min)
            .with_epsilon_decay(self.epsilon_decay)
    }

    fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            episodes: self.episodes,
            seed: self.seed,
            max_steps: (self.max_steps > 0).then_some(self.max_steps),
            report_every: self.report_every,
        }
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let app = App::new();
    let config = args.agent_config();

    let mut red = app
        .create_agent(Color::Red, config)
        .context("invalid agent configuration")?;
    let mut black = app.create_agent(Color::Black, config)?;

    print_section("Checkers Q-Learning Self-Play");
    print_kv("Episodes", &args.episodes.to_string());
    print_kv(
        "Seed",
        &args
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string()),
    );
    print_kv(
        "Alpha / Gamma",
        &format!("{} / {}", config.alpha, config.gamma),
    );
    print_kv(
        "Epsilon",
        &format!(
            "{} -> {} (x{})",
            config.epsilon, config.epsilon_min, config.epsilon_decay
        ),
    );

    let mut trainer = SelfPlayTrainer::new(args.training_config())
        .with_observer(Box::new(EpsilonReportObserver::new(args.report_every)));
    if !args.no_progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to open observation log {}", path.display()))?;
        trainer = trainer.with_observer(Box::new(observer));
    }

    let result = trainer.run(&mut red, &mut black)?;
    print_training_result(&result);

    let (red_path, black_path) = trainer
        .save_checkpoints(
            app.checkpoint_repository().as_ref(),
            &red,
            &black,
            &args.output_dir,
            args.format,
        )
        .with_context(|| format!("failed to save Q-tables to {}", args.output_dir.display()))?;
    print_kv("Red Q-table", &red_path.display().to_string());
    print_kv("Black Q-table", &black_path.display().to_string());

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        result
            .save(&path)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        print_kv("Summary", &path.display().to_string());
    }

    Ok(())
}
