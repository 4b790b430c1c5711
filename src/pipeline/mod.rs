//! Training pipeline abstractions
//!
//! This module provides:
//! - The self-play trainer driving both Q-learning agents
//! - Reward computation
//! - Observers recording progress, metrics and per-episode logs

pub mod observers;
pub mod training;

pub use observers::{
    EpsilonReportObserver, JsonlObserver, MetricsObserver, Observation, ProgressObserver,
    TurnObservation,
};
pub use training::{
    CAPTURE_REWARD, EpisodeSummary, SelfPlayTrainer, TrainingConfig, TrainingResult, WIN_REWARD,
    compute_reward,
};

pub use crate::ports::Observer;
