//! Performance tiers and the capability probe that picks one
//!
//! A tier is a hint that scales population targets and gates the costlier
//! particle kinds. The probe is a replaceable strategy: the busy-loop probe
//! is inherently noisy, so tests use [`FixedTier`].

use crate::particle::ParticleKind;
use instant::Instant;
use neon_core::{NeonError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hint::black_box;
use std::str::FromStr;
use std::time::Duration;

/// Host capability class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    #[default]
    High,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Low, Tier::Medium, Tier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }

    /// Whether ambient particles of `kind` are seeded at this tier
    pub fn allows(&self, kind: ParticleKind) -> bool {
        match kind {
            ParticleKind::Circuit => *self != Tier::Low,
            ParticleKind::Data => *self == Tier::High,
            _ => true,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = NeonError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Tier::Low),
            "medium" => Ok(Tier::Medium),
            "high" => Ok(Tier::High),
            _ => Err(NeonError::InvalidTier(s.to_string())),
        }
    }
}

/// Strategy that classifies host capability
pub trait TierProbe {
    fn classify(&mut self) -> Tier;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

/// Always reports the same tier
#[derive(Debug, Clone, Copy)]
pub struct FixedTier(pub Tier);

impl TierProbe for FixedTier {
    fn classify(&mut self) -> Tier {
        self.0
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Counts how many cheap operations complete in a short wall-clock window
#[derive(Debug, Clone)]
pub struct BusyLoopProbe {
    pub window: Duration,
    /// Fewer completions than this classify as low
    pub medium_threshold: u64,
    /// Fewer completions than this classify as medium
    pub high_threshold: u64,
    last_count: Option<u64>,
}

impl Default for BusyLoopProbe {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(10),
            medium_threshold: 100_000,
            high_threshold: 500_000,
            last_count: None,
        }
    }
}

impl BusyLoopProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default thresholds with a custom measuring window
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Operation count from the most recent run
    pub fn last_count(&self) -> Option<u64> {
        self.last_count
    }

    /// Spin for the probe window and count completed operations
    pub fn count_operations(&self) -> u64 {
        let start = Instant::now();
        let mut operations = 0u64;
        let mut acc = 0x9E37_79B9u32;
        while start.elapsed() < self.window {
            operations += 1;
            acc = black_box(acc.wrapping_mul(1_664_525).wrapping_add(1_013_904_223));
        }
        black_box(acc);
        operations
    }

    /// Map an operation count onto a tier
    pub fn classify_count(&self, operations: u64) -> Tier {
        if operations < self.medium_threshold {
            Tier::Low
        } else if operations < self.high_threshold {
            Tier::Medium
        } else {
            Tier::High
        }
    }
}

impl TierProbe for BusyLoopProbe {
    fn classify(&mut self) -> Tier {
        let operations = self.count_operations();
        self.last_count = Some(operations);
        self.classify_count(operations)
    }

    fn name(&self) -> &str {
        "busy-loop"
    }
}
