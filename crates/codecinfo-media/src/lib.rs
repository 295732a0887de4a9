#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use codecinfo_common::{Error, Result};
use serde::{Deserialize, Serialize};

pub mod aliases;
pub mod normalize;
pub mod profiles;
pub mod report;
pub mod source;

pub use aliases::{collect_aliases, CanonicalGroup};
pub use normalize::{canonical_key, legacy_to_modern};
pub use profiles::{merge_profiles, profile_key, ProfileGroup};
pub use report::{build_report, Aggregator, CapabilityTag, CodecEntry, CodecReport};
pub use source::{CodecDump, StaticSource};

/// What a codec source is able to report about each descriptor.
///
/// Older platforms only expose raw names; newer ones add canonical names and
/// capability flags, and the newest also flag aliases explicitly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    /// Names only. Canonical keys are approximated from the name.
    #[default]
    Legacy,
    /// Canonical names plus hardware/software/vendor flags.
    Canonical,
    /// Everything in `Canonical` plus the alias flag.
    Extended,
}

impl SourceTier {
    pub fn reports_canonical_names(self) -> bool {
        !matches!(self, SourceTier::Legacy)
    }

    pub fn reports_codec_flags(self) -> bool {
        !matches!(self, SourceTier::Legacy)
    }

    pub fn reports_alias_flag(self) -> bool {
        matches!(self, SourceTier::Extended)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceTier::Legacy => "legacy",
            SourceTier::Canonical => "canonical",
            SourceTier::Extended => "extended",
        }
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(SourceTier::Legacy),
            "canonical" => Ok(SourceTier::Canonical),
            "extended" => Ok(SourceTier::Extended),
            other => Err(Error::config(format!("unknown source tier: {other}"))),
        }
    }
}

/// One profile/level pair as reported for a mime-type. Only the profile is
/// used for grouping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileLevel {
    pub profile: u32,
    #[serde(default)]
    pub level: u32,
}

impl ProfileLevel {
    pub const fn new(profile: u32, level: u32) -> Self {
        Self { profile, level }
    }
}

/// One raw codec enumeration entry.
///
/// Optional fields are `None` when the source cannot report them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CodecDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_name: Option<String>,
    #[serde(default)]
    pub is_encoder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_accelerated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<bool>,
    #[serde(default)]
    pub supported_types: Option<Vec<String>>,
    /// Per mime-type profile levels. A type missing here fails its lookup.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profile_levels: BTreeMap<String, Vec<ProfileLevel>>,
}

impl CodecDescriptor {
    pub fn decoder(name: impl Into<String>, types: &[&str]) -> Self {
        Self {
            name: name.into(),
            supported_types: Some(types.iter().map(|t| t.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn encoder(name: impl Into<String>, types: &[&str]) -> Self {
        Self {
            is_encoder: true,
            ..Self::decoder(name, types)
        }
    }

    pub fn with_canonical_name(mut self, canonical: impl Into<String>) -> Self {
        self.canonical_name = Some(canonical.into());
        self
    }

    pub fn with_flags(mut self, hardware: bool, software: bool, vendor: bool) -> Self {
        self.hardware_accelerated = Some(hardware);
        self.software_only = Some(software);
        self.vendor = Some(vendor);
        self
    }

    pub fn with_alias_flag(mut self, alias: bool) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn with_profiles(mut self, mime_type: &str, profiles: &[u32]) -> Self {
        let levels = profiles.iter().map(|&p| ProfileLevel::new(p, 1)).collect();
        self.profile_levels.insert(mime_type.to_string(), levels);
        self
    }

    /// Checks the fields every descriptor must carry and returns its
    /// supported types.
    pub fn inspect(&self) -> Result<&[String]> {
        if self.name.is_empty() {
            return Err(Error::malformed("descriptor has no name"));
        }
        self.supported_types
            .as_deref()
            .ok_or_else(|| Error::malformed(format!("{}: supported types unavailable", self.name)))
    }

    /// Profile levels recorded on the descriptor for `mime_type`.
    pub fn capabilities_for_type(&self, mime_type: &str) -> Result<&[ProfileLevel]> {
        self.profile_levels
            .get(mime_type)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                Error::capability_lookup(format!(
                    "{}: no capabilities for {}",
                    self.name, mime_type
                ))
            })
    }
}

/// Caller-selected filters for one report build.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReportOptions {
    pub video_only: bool,
    pub decode_only: bool,
}

impl ReportOptions {
    pub const fn new(video_only: bool, decode_only: bool) -> Self {
        Self {
            video_only,
            decode_only,
        }
    }

    pub fn video_only(mut self, enabled: bool) -> Self {
        self.video_only = enabled;
        self
    }

    pub fn decode_only(mut self, enabled: bool) -> Self {
        self.decode_only = enabled;
        self
    }
}

/// Supplies raw codec descriptors and their per-type capabilities.
pub trait CodecSource: Send + Sync {
    fn tier(&self) -> SourceTier;

    /// The full enumeration. An error here means the source is unusable.
    fn codecs(&self) -> Result<Vec<CodecDescriptor>>;

    fn profile_levels(
        &self,
        codec: &CodecDescriptor,
        mime_type: &str,
    ) -> Result<Vec<ProfileLevel>> {
        Ok(codec.capabilities_for_type(mime_type)?.to_vec())
    }
}

/// A source with nothing behind it. Every enumeration fails.
pub struct NullSource;

impl CodecSource for NullSource {
    fn tier(&self) -> SourceTier {
        SourceTier::Legacy
    }

    fn codecs(&self) -> Result<Vec<CodecDescriptor>> {
        Err(Error::source_unavailable("no codec source configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_capabilities() {
        assert!(!SourceTier::Legacy.reports_canonical_names());
        assert!(!SourceTier::Legacy.reports_codec_flags());
        assert!(SourceTier::Canonical.reports_canonical_names());
        assert!(!SourceTier::Canonical.reports_alias_flag());
        assert!(SourceTier::Extended.reports_alias_flag());
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!("Extended".parse::<SourceTier>().unwrap(), SourceTier::Extended);
        assert_eq!(" legacy ".parse::<SourceTier>().unwrap(), SourceTier::Legacy);
        assert!("q".parse::<SourceTier>().is_err());
    }

    #[test]
    fn test_inspect_requires_name_and_types() {
        let ok = CodecDescriptor::decoder("c2.android.aac.decoder", &["audio/mp4a-latm"]);
        assert_eq!(ok.inspect().unwrap(), ["audio/mp4a-latm".to_string()]);

        let unnamed = CodecDescriptor::decoder("", &["video/avc"]);
        assert!(unnamed.inspect().is_err());

        let no_types = CodecDescriptor {
            name: "OMX.broken".into(),
            ..Default::default()
        };
        assert!(matches!(
            no_types.inspect(),
            Err(Error::MalformedDescriptor(_))
        ));
    }

    #[test]
    fn test_capabilities_for_missing_type_fails() {
        let codec = CodecDescriptor::decoder("c2.android.avc.decoder", &["video/avc"])
            .with_profiles("video/avc", &[1, 2]);
        assert_eq!(codec.capabilities_for_type("video/avc").unwrap().len(), 2);
        assert!(matches!(
            codec.capabilities_for_type("video/hevc"),
            Err(Error::CapabilityLookup(_))
        ));
    }

    #[test]
    fn test_null_source_is_unavailable() {
        assert!(matches!(
            NullSource.codecs(),
            Err(Error::SourceUnavailable(_))
        ));
    }
}
