use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Logical file every normalized line is appended to.
    pub data_file: String,
    /// If set, the full run is also saved as one CSV under this name at the end.
    pub final_dump_file: Option<String>,
    pub image_dir: String,
    pub image_extension: String,
    pub timing: Timing,
    pub observation: Vec<ObservationItem>,
    pub production: Vec<ProductionItem>,
    pub perception: PerceptionMode,
    pub slider_example: Option<SliderExample>,
    pub save: SaveConfig,
    pub text: ScreenText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Object alone, before its label appears.
    pub blank_ms: u64,
    /// Object with its label.
    pub label_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationItem {
    pub object: String,
    pub label: String,
    pub weight: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionItem {
    pub object: String,
    pub labels: Vec<String>,
    pub weight: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerceptionMode {
    /// One slider per object on a single screen.
    Sliders,
    /// One ratio-button trial per object.
    Buttons,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderExample {
    pub object: String,
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub endpoint: String,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    /// Local directory receiving lines whose save attempts were all
    /// exhausted, one file per logical file name.
    pub fallback_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenText {
    pub consent: String,
    pub consent_button: String,
    pub observation: String,
    pub production: String,
    pub perception: String,
    pub slider_example: String,
    pub slider_panel: String,
    pub finish: String,
    pub continue_button: String,
    pub finish_button: String,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        let observation = [
            ("object4", "buv", 6),
            ("object4", "cal", 4),
            ("object1", "fep", 6),
            ("object1", "pax", 4),
            ("object2", "qar", 6),
            ("object2", "tas", 4),
        ]
        .into_iter()
        .map(|(object, label, weight)| ObservationItem {
            object: object.into(),
            label: label.into(),
            weight,
        })
        .collect();

        let production = [
            ("object4", ["buv", "cal"]),
            ("object2", ["qar", "tas"]),
            ("object1", ["fep", "pax"]),
        ]
        .into_iter()
        .map(|(object, labels)| ProductionItem {
            object: object.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            weight: 10,
        })
        .collect();

        Self {
            data_file: "qlm_data.csv".into(),
            final_dump_file: None,
            image_dir: "images".into(),
            image_extension: "jpg".into(),
            timing: Timing::default(),
            observation,
            production,
            perception: PerceptionMode::Sliders,
            slider_example: Some(SliderExample {
                object: "object6".into(),
                left: "wol".into(),
                right: "maw".into(),
            }),
            save: SaveConfig::default(),
            text: ScreenText::default(),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            blank_ms: 1000,
            label_ms: 2000,
        }
    }
}

impl Timing {
    pub fn blank(&self) -> Duration {
        Duration::from_millis(self.blank_ms)
    }

    pub fn label(&self) -> Duration {
        Duration::from_millis(self.label_ms)
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/save_data".into(),
            max_attempts: 3,
            retry_delay_ms: 250,
            fallback_dir: "unsaved_data".into(),
        }
    }
}

impl Default for ScreenText {
    fn default() -> Self {
        Self {
            consent: "Welcome. This study looks at how people learn names for objects. \
                      Continuing means you agree to take part."
                .into(),
            consent_button: "I agree to take part".into(),
            observation: "Observation: you will see three objects, each shown with a name. \
                          Just watch."
                .into(),
            production: "Naming: you will see the same objects again. \
                         Pick the name you think fits, as you saw in the observation part."
                .into(),
            perception: "Estimation: think back to the observation part. \
                         For each object, estimate how often you saw each of its names."
                .into(),
            slider_example: "Example: if you saw the left name 20% of the time and the right \
                             name 80% of the time, set the slider to 80."
                .into(),
            slider_panel: "Your turn: rate how often you saw each name.".into(),
            finish: "All done, thank you for taking part. Your responses are listed below.".into(),
            continue_button: "Continue".into(),
            finish_button: "Finished".into(),
        }
    }
}

impl ExperimentConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.observation.is_empty() || self.observation.iter().all(|i| i.weight == 0) {
            return Err(ExperimentError::InvalidConfig(
                "observation block has no trials".into(),
            ));
        }
        if self.production.is_empty() || self.production.iter().all(|i| i.weight == 0) {
            return Err(ExperimentError::InvalidConfig(
                "production block has no trials".into(),
            ));
        }
        if let Some(item) = self.production.iter().find(|i| i.labels.len() != 2) {
            return Err(ExperimentError::InvalidConfig(format!(
                "production item {} needs exactly 2 labels, got {}",
                item.object,
                item.labels.len()
            )));
        }
        if self.save.max_attempts == 0 {
            return Err(ExperimentError::InvalidConfig(
                "save.max_attempts must be at least 1".into(),
            ));
        }
        if self.data_file.is_empty() {
            return Err(ExperimentError::InvalidConfig("data_file is empty".into()));
        }
        Ok(())
    }
}
