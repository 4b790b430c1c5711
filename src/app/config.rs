//! Configuration types for agent creation.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hyperparameters for a Q-learning agent.
///
/// # Examples
///
/// ```
/// use checkers_rl::app::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_alpha(0.2)
///     .with_epsilon(0.5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Initial exploration probability ε
    pub epsilon: f64,
    /// Floor for ε; also the value ε is reset to after loading a table
    pub epsilon_min: f64,
    /// Multiplicative ε decay applied at the end of each episode
    pub epsilon_decay: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 1.0,
            epsilon_min: 0.05,
            epsilon_decay: 0.995,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_epsilon_min(mut self, epsilon_min: f64) -> Self {
        self.epsilon_min = epsilon_min;
        self
    }

    pub fn with_epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::InvalidConfiguration {
                    message: format!("{name} must be within [0, 1], got {value}"),
                })
            }
        };
        unit("alpha", self.alpha)?;
        unit("gamma", self.gamma)?;
        unit("epsilon", self.epsilon)?;
        unit("epsilon_min", self.epsilon_min)?;
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "epsilon_decay must be within (0, 1], got {}",
                    self.epsilon_decay
                ),
            });
        }
        Ok(())
    }
}

/// Play strength of a loaded agent, expressed as its exploration rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn epsilon(self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 0.2,
            Difficulty::Hard => 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.epsilon_min, 0.05);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(AgentConfig::default().with_alpha(1.5).validate().is_err());
        assert!(AgentConfig::default().with_gamma(-0.1).validate().is_err());
        assert!(
            AgentConfig::default()
                .with_epsilon_decay(0.0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_difficulty_epsilons() {
        assert_eq!(Difficulty::Easy.epsilon(), 0.5);
        assert_eq!(Difficulty::Medium.epsilon(), 0.2);
        assert_eq!(Difficulty::Hard.epsilon(), 0.05);
    }
}
