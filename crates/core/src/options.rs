//! Free-form generation options with recognized-key defaults.
//!
//! Options arrive from the API layer as an arbitrary JSON object.
//! The pipeline only interprets the keys below; everything else is
//! carried along untouched so future model backends can pick their
//! own parameters out of the same map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Layout constraint hint (archetype name or `"custom"`).
pub const KEY_CONSTRAINT: &str = "constraint";
/// Diffusion inference step count.
pub const KEY_NUM_INFERENCE_STEPS: &str = "num_inference_steps";
/// Classifier-free guidance scale.
pub const KEY_GUIDANCE_SCALE: &str = "guidance_scale";
/// ControlNet conditioning scale.
pub const KEY_CONTROLNET_SCALE: &str = "controlnet_conditioning_scale";

/// Default constraint when the caller does not hint a layout.
pub const DEFAULT_CONSTRAINT: &str = "custom";
/// Default diffusion step count.
pub const DEFAULT_NUM_INFERENCE_STEPS: u32 = 20;
/// Default guidance scale.
pub const DEFAULT_GUIDANCE_SCALE: f64 = 7.5;
/// Default ControlNet conditioning scale.
pub const DEFAULT_CONTROLNET_SCALE: f64 = 0.8;

/// Upper bound on inference steps accepted from callers.
const MAX_INFERENCE_STEPS: u32 = 150;

/// Validated key/value generation options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct GenerationOptions(Map<String, Value>);

impl GenerationOptions {
    /// Wrap a raw JSON object after validating the recognized keys.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, CoreError> {
        let options = Self(map);
        options.validate()?;
        Ok(options)
    }

    /// Insert or replace a key. Intended for tests and the API layer.
    pub fn set(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    /// Layout constraint hint, defaulting to [`DEFAULT_CONSTRAINT`].
    pub fn constraint(&self) -> &str {
        self.0
            .get(KEY_CONSTRAINT)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_CONSTRAINT)
    }

    /// Diffusion inference step count.
    pub fn num_inference_steps(&self) -> u32 {
        self.0
            .get(KEY_NUM_INFERENCE_STEPS)
            .and_then(Value::as_u64)
            .map(|v| v as u32)
            .unwrap_or(DEFAULT_NUM_INFERENCE_STEPS)
    }

    /// Classifier-free guidance scale.
    pub fn guidance_scale(&self) -> f64 {
        self.0
            .get(KEY_GUIDANCE_SCALE)
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_GUIDANCE_SCALE)
    }

    /// ControlNet conditioning scale.
    pub fn controlnet_conditioning_scale(&self) -> f64 {
        self.0
            .get(KEY_CONTROLNET_SCALE)
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_CONTROLNET_SCALE)
    }

    /// Check recognized keys for type and range errors.
    ///
    /// Unrecognized keys are allowed and ignored.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(v) = self.0.get(KEY_CONSTRAINT) {
            if !v.is_string() {
                return Err(CoreError::Validation(format!(
                    "'{KEY_CONSTRAINT}' must be a string"
                )));
            }
        }
        if let Some(v) = self.0.get(KEY_NUM_INFERENCE_STEPS) {
            match v.as_u64() {
                Some(n) if (1..=MAX_INFERENCE_STEPS as u64).contains(&n) => {}
                _ => {
                    return Err(CoreError::Validation(format!(
                        "'{KEY_NUM_INFERENCE_STEPS}' must be an integer in 1..={MAX_INFERENCE_STEPS}"
                    )))
                }
            }
        }
        for key in [KEY_GUIDANCE_SCALE, KEY_CONTROLNET_SCALE] {
            if let Some(v) = self.0.get(key) {
                match v.as_f64() {
                    Some(f) if f.is_finite() && f >= 0.0 => {}
                    _ => {
                        return Err(CoreError::Validation(format!(
                            "'{key}' must be a non-negative number"
                        )))
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_when_empty() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.constraint(), "custom");
        assert_eq!(opts.num_inference_steps(), 20);
        assert_eq!(opts.guidance_scale(), 7.5);
        assert_eq!(opts.controlnet_conditioning_scale(), 0.8);
    }

    #[test]
    fn recognized_keys_override_defaults() {
        let mut opts = GenerationOptions::default();
        opts.set(KEY_CONSTRAINT, json!("l_shaped"));
        opts.set(KEY_NUM_INFERENCE_STEPS, json!(40));
        opts.set(KEY_GUIDANCE_SCALE, json!(9.0));
        assert_eq!(opts.constraint(), "l_shaped");
        assert_eq!(opts.num_inference_steps(), 40);
        assert_eq!(opts.guidance_scale(), 9.0);
    }

    #[test]
    fn unrecognized_keys_are_carried() {
        let mut opts = GenerationOptions::default();
        opts.set("lora_path", json!("styles/blueprint.safetensors"));
        assert!(opts.validate().is_ok());
        let round_trip: GenerationOptions =
            serde_json::from_str(&serde_json::to_string(&opts).unwrap()).unwrap();
        assert_eq!(round_trip, opts);
    }

    #[test]
    fn zero_steps_rejected() {
        let mut opts = GenerationOptions::default();
        opts.set(KEY_NUM_INFERENCE_STEPS, json!(0));
        assert!(opts.validate().is_err());
    }

    #[test]
    fn negative_guidance_rejected() {
        let mut opts = GenerationOptions::default();
        opts.set(KEY_GUIDANCE_SCALE, json!(-1.0));
        assert!(opts.validate().is_err());
    }

    #[test]
    fn wrong_constraint_type_rejected() {
        let mut opts = GenerationOptions::default();
        opts.set(KEY_CONSTRAINT, json!(3));
        assert!(opts.validate().is_err());
    }
}
