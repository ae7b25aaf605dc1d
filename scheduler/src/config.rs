use std::fmt::{self, Display};
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::Serialize;

use crate::{ConfigError, TieBreak};

/// How the quantum of every queue is computed.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantumAssignment {
    /// `quantum(i) = 2^i`
    Doubling,
    /// `quantum(0) = base`, every following level multiplies the previous
    /// quantum by `multiplier`, truncating.
    Geometric { base: usize, multiplier: f64 },
    /// One quantum per queue, highest priority first.
    Explicit(Vec<usize>),
}

impl QuantumAssignment {
    fn resolve(&self, num_queues: usize) -> Result<Vec<NonZeroUsize>, ConfigError> {
        let quanta: Vec<usize> = match self {
            QuantumAssignment::Doubling => (0..num_queues)
                .map(|level| 1usize.checked_shl(level as u32).unwrap_or(usize::MAX))
                .collect(),
            QuantumAssignment::Geometric { base, multiplier } => {
                if !multiplier.is_finite() || *multiplier < 1.0 {
                    return Err(ConfigError::Multiplier(*multiplier));
                }
                let mut quantum = *base;
                let mut quanta = Vec::with_capacity(num_queues);
                for _ in 0..num_queues {
                    quanta.push(quantum);
                    quantum = (quantum as f64 * multiplier) as usize;
                }
                quanta
            }
            QuantumAssignment::Explicit(quanta) => {
                if quanta.len() != num_queues {
                    return Err(ConfigError::QuantumCount {
                        expected: num_queues,
                        found: quanta.len(),
                    });
                }
                quanta.clone()
            }
        };

        quanta
            .into_iter()
            .enumerate()
            .map(|(queue, quantum)| {
                NonZeroUsize::new(quantum).ok_or(ConfigError::ZeroQuantum { queue })
            })
            .collect()
    }
}

/// A validated queue cascade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    quanta: Vec<NonZeroUsize>,
    boost_interval: Option<NonZeroUsize>,
    tie_break: TieBreak,
}

impl Config {
    /// Builds a configuration.
    ///
    /// * `num_queues` - the number of priority levels, queue 0 is the highest.
    /// * `quanta` - how the time quantum of each level is computed.
    /// * `boost_interval` - move every process back to queue 0 each time the
    ///                      clock is a multiple of this value, `None` disables
    ///                      boosting.
    /// * `tie_break` - insertion order in the lowest queue.
    pub fn new(
        num_queues: usize,
        quanta: QuantumAssignment,
        boost_interval: Option<usize>,
        tie_break: TieBreak,
    ) -> Result<Config, ConfigError> {
        if num_queues == 0 {
            return Err(ConfigError::NoQueues);
        }
        let quanta = quanta.resolve(num_queues)?;
        let boost_interval = match boost_interval {
            Some(interval) => {
                Some(NonZeroUsize::new(interval).ok_or(ConfigError::ZeroBoostInterval)?)
            }
            None => None,
        };
        Ok(Config {
            quanta,
            boost_interval,
            tie_break,
        })
    }

    pub fn preset(preset: Preset) -> Config {
        let (num_queues, base, multiplier, boost) = preset.parameters();
        let quanta = (0..num_queues)
            .scan(base, |quantum, _| {
                let current = *quantum;
                *quantum = (*quantum as f64 * multiplier) as usize;
                NonZeroUsize::new(current)
            })
            .collect();
        Config {
            quanta,
            boost_interval: NonZeroUsize::new(boost),
            tie_break: TieBreak::RoundRobin,
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Config {
        self.tie_break = tie_break;
        self
    }

    pub fn num_queues(&self) -> usize {
        self.quanta.len()
    }

    pub fn quanta(&self) -> &[NonZeroUsize] {
        &self.quanta
    }

    pub fn boost_interval(&self) -> Option<NonZeroUsize> {
        self.boost_interval
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::preset(Preset::Standard)
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} queues, quanta [", self.quanta.len())?;
        for (level, quantum) in self.quanta.iter().enumerate() {
            if level > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", quantum)?;
        }
        write!(f, "], ")?;
        match self.boost_interval {
            Some(interval) => write!(f, "boost every {}", interval)?,
            None => write!(f, "no boost")?,
        }
        write!(f, ", lowest queue: {}", self.tie_break)
    }
}

/// Ready made cascades.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Preset {
    /// 3 queues, quanta 4/8/16, boost every 100.
    Standard,
    /// 5 queues, quanta growing by 1.5 from 2, boost every 50.
    FineGrained,
    /// 2 queues, quanta 8/24, boost every 200.
    CoarseGrained,
    /// Standard quanta with a boost every 30.
    AggressiveBoost,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Standard,
        Preset::FineGrained,
        Preset::CoarseGrained,
        Preset::AggressiveBoost,
    ];

    /// (queues, base quantum, multiplier, boost interval)
    fn parameters(&self) -> (usize, usize, f64, usize) {
        match self {
            Preset::Standard => (3, 4, 2.0, 100),
            Preset::FineGrained => (5, 2, 1.5, 50),
            Preset::CoarseGrained => (2, 8, 3.0, 200),
            Preset::AggressiveBoost => (3, 4, 2.0, 30),
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Preset::Standard),
            "fine" | "fine-grained" => Ok(Preset::FineGrained),
            "coarse" | "coarse-grained" => Ok(Preset::CoarseGrained),
            "aggressive" | "aggressive-boost" => Ok(Preset::AggressiveBoost),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}
