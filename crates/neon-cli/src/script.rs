//! Scripted host input for headless runs
//!
//! A script is a TOML list of steps keyed by frame number:
//!
//! ```toml
//! [[steps]]
//! frame = 30
//! event = { type = "click", x = 640.0, y = 360.0 }
//!
//! [[steps]]
//! frame = 90
//! control = { type = "set_tier", tier = "low" }
//! ```

use anyhow::{Context, Result};
use neon_runtime::HostEvent;
use serde::Deserialize;
use std::path::Path;

/// Direct calls on the engine's control surface
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlAction {
    SetTier { tier: String },
    RedetectTier,
    Clear,
    AddParticle { x: f32, y: f32, kind: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptStep {
    pub frame: u64,
    #[serde(default)]
    pub event: Option<HostEvent>,
    #[serde(default)]
    pub control: Option<ControlAction>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    steps: Vec<ScriptStep>,
    #[serde(skip)]
    cursor: usize,
}

impl Script {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut script: Script = toml::from_str(source).context("Failed to parse script")?;
        // Stable, so same-frame steps keep file order
        script.steps.sort_by_key(|step| step.frame);
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_toml_str(&source)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps scheduled at or before `frame` that have not been taken yet
    pub fn take_due(&mut self, frame: u64) -> &[ScriptStep] {
        let start = self.cursor;
        while self.cursor < self.steps.len() && self.steps[self.cursor].frame <= frame {
            self.cursor += 1;
        }
        &self.steps[start..self.cursor]
    }
}
