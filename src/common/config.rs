//! Compaction configuration
//!
//! Holds the knobs a processing run is started with: which universal code to
//! use on the wire, how large an arbitrary-precision value may grow before a
//! decode is abandoned, and the switches the default encoding policy honours.

use crate::common::constants::DEFAULT_MAX_MAGNITUDE_BITS;
use crate::common::error::Result;
use serde::{Deserialize, Serialize};

/// Universal code used for every coded value in a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// Recursive Elias omega code
    Omega,
    /// Elias delta code (gamma-coded length prefix)
    Delta,
}

impl CodecKind {
    pub fn name(&self) -> &'static str {
        match self {
            CodecKind::Omega => "omega",
            CodecKind::Delta => "delta",
        }
    }
}

impl std::str::FromStr for CodecKind {
    type Err = crate::common::error::BitrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "omega" => Ok(CodecKind::Omega),
            "delta" => Ok(CodecKind::Delta),
            other => Err(crate::config_err!("unknown codec '{}'", other)),
        }
    }
}

/// Switches honoured by the default cost policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Allow the policy to prefer a universal code over a narrowed fixed field
    pub allow_universal_for_bounded: bool,
    /// Consult cardinality when no mean is available
    pub use_cardinality: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            allow_universal_for_bounded: true,
            use_cardinality: true,
        }
    }
}

/// Configuration for a compaction run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactionConfig {
    /// Universal code used for coded values
    pub codec: CodecKind,
    /// Largest arbitrary-precision magnitude (in bits) a decoder will accept
    pub max_magnitude_bits: u64,
    /// Default policy switches
    pub policy: PolicyConfig,
}

impl CompactionConfig {
    /// Parse a configuration from JSON; absent fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CompactionConfig = serde_json::from_str(json)?;
        if config.max_magnitude_bits < 32 {
            return Err(crate::config_err!(
                "max_magnitude_bits must be at least 32, got {}",
                config.max_magnitude_bits
            ));
        }
        Ok(config)
    }

    /// Create a configuration using the given codec
    pub fn with_codec(codec: CodecKind) -> Self {
        Self {
            codec,
            ..Default::default()
        }
    }
}

impl Default for CompactionConfig {
    fn default() -> Self {
        CompactionConfig {
            codec: CodecKind::Omega,
            max_magnitude_bits: DEFAULT_MAX_MAGNITUDE_BITS,
            policy: PolicyConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompactionConfig::default();
        assert_eq!(config.codec, CodecKind::Omega);
        assert_eq!(config.max_magnitude_bits, DEFAULT_MAX_MAGNITUDE_BITS);
        assert!(config.policy.allow_universal_for_bounded);
    }

    #[test]
    fn test_partial_json() {
        let config = CompactionConfig::from_json_str(r#"{"codec": "delta"}"#).unwrap();
        assert_eq!(config.codec, CodecKind::Delta);
        assert_eq!(config.max_magnitude_bits, DEFAULT_MAX_MAGNITUDE_BITS);

        let config =
            CompactionConfig::from_json_str(r#"{"policy": {"use_cardinality": false}}"#).unwrap();
        assert!(!config.policy.use_cardinality);
        assert!(config.policy.allow_universal_for_bounded);
    }

    #[test]
    fn test_rejects_tiny_magnitude_bound() {
        assert!(CompactionConfig::from_json_str(r#"{"max_magnitude_bits": 8}"#).is_err());
    }

    #[test]
    fn test_codec_from_str() {
        assert_eq!("Omega".parse::<CodecKind>().unwrap(), CodecKind::Omega);
        assert!("gamma".parse::<CodecKind>().is_err());
    }
}
