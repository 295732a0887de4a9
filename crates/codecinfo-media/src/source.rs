//! In-memory codec source, optionally loaded from a JSON dump.

use std::fs;
use std::path::Path;

use codecinfo_common::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CodecDescriptor, CodecSource, SourceTier};

/// On-disk shape of a codec enumeration dump.
///
/// ```json
/// { "tier": "canonical", "codecs": [ { "name": "c2.android.avc.decoder", ... } ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CodecDump {
    #[serde(default)]
    pub tier: SourceTier,
    #[serde(default)]
    pub codecs: Vec<CodecDescriptor>,
}

/// Serves a fixed descriptor list. Profile lookups read the levels recorded
/// on each descriptor.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    tier: SourceTier,
    codecs: Vec<CodecDescriptor>,
}

impl StaticSource {
    pub fn new(tier: SourceTier, codecs: Vec<CodecDescriptor>) -> Self {
        Self { tier, codecs }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let dump: CodecDump = serde_json::from_str(json)?;
        Ok(Self::from(dump))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let source = Self::from_json_str(&json)?;
        debug!(
            "loaded {} codec descriptors from {}",
            source.codecs.len(),
            path.display()
        );
        Ok(source)
    }

    /// Replaces the tier recorded in the dump.
    pub fn with_tier(mut self, tier: SourceTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl From<CodecDump> for StaticSource {
    fn from(dump: CodecDump) -> Self {
        Self::new(dump.tier, dump.codecs)
    }
}

impl CodecSource for StaticSource {
    fn tier(&self) -> SourceTier {
        self.tier
    }

    fn codecs(&self) -> Result<Vec<CodecDescriptor>> {
        Ok(self.codecs.clone())
    }
}
