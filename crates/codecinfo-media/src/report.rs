//! Report building and text rendering.
//!
//! One build enumerates the source, groups aliases, merges profile sets per
//! representative and renders the result:
//!
//! ```text
//! D: c2.android.avc.decoder [SW]
//!    OMX.google.h264.decoder
//! - video/avc
//! -> 1, 2, 8
//! ```
//!
//! If the source cannot be enumerated at all, the text report is a single
//! `Error collecting codec information: ...` line instead.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use codecinfo_common::{Error, Result};
use serde::Serialize;
use tracing::{debug, error};

use crate::aliases::{collect_aliases, CanonicalGroup};
use crate::profiles::{merge_profiles, ProfileGroup};
use crate::{CodecDescriptor, CodecSource, ReportOptions, SourceTier};

const ERROR_PREFIX: &str = "Error collecting codec information";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTag {
    HardwareAccelerated,
    SoftwareOnly,
    Vendor,
    Alias,
}

impl CapabilityTag {
    pub fn label(self) -> &'static str {
        match self {
            CapabilityTag::HardwareAccelerated => "[HW]",
            CapabilityTag::SoftwareOnly => "[SW]",
            CapabilityTag::Vendor => "[V]",
            CapabilityTag::Alias => "[ALIAS]",
        }
    }

    /// Tags that apply to `codec`, in display order. A flag counts only when
    /// the tier reports it and it is set.
    pub fn for_codec(codec: &CodecDescriptor, tier: SourceTier) -> Vec<CapabilityTag> {
        let mut tags = Vec::new();
        if tier.reports_codec_flags() {
            if codec.hardware_accelerated == Some(true) {
                tags.push(CapabilityTag::HardwareAccelerated);
            }
            if codec.software_only == Some(true) {
                tags.push(CapabilityTag::SoftwareOnly);
            }
            if codec.vendor == Some(true) {
                tags.push(CapabilityTag::Vendor);
            }
        }
        if tier.reports_alias_flag() && codec.alias == Some(true) {
            tags.push(CapabilityTag::Alias);
        }
        tags
    }
}

/// One canonical codec as it appears in the report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CodecEntry {
    pub name: String,
    pub encoder: bool,
    pub tags: Vec<CapabilityTag>,
    /// Alias names, excluding `name` itself.
    pub aliases: Vec<String>,
    pub profile_groups: Vec<ProfileGroup>,
}

impl CodecEntry {
    fn from_group<S>(source: &S, tier: SourceTier, group: &CanonicalGroup) -> Self
    where
        S: CodecSource + ?Sized,
    {
        let codec = &group.representative;
        Self {
            name: codec.name.clone(),
            encoder: codec.is_encoder,
            tags: CapabilityTag::for_codec(codec, tier),
            aliases: group.other_names().map(str::to_string).collect(),
            profile_groups: merge_profiles(source, codec),
        }
    }

    fn header(&self) -> String {
        let mut line = String::from(if self.encoder { "E: " } else { "D: " });
        line.push_str(&self.name);
        for tag in &self.tags {
            line.push(' ');
            line.push_str(tag.label());
        }
        line
    }
}

/// The grouped, merged result of one build.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CodecReport {
    pub tier: SourceTier,
    pub options: ReportOptions,
    pub codecs: Vec<CodecEntry>,
}

impl CodecReport {
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for entry in &self.codecs {
            out.push(entry.header());
            for alias in &entry.aliases {
                out.push(format!("   {alias}"));
            }
            for group in &entry.profile_groups {
                out.push(format!("- {}", group.mime_types.join(", ")));
                if !group.profile_key.is_empty() {
                    out.push(format!("-> {}", group.profile_key));
                }
            }
        }
        out
    }

    /// All lines joined with newlines, plus a trailing newline.
    pub fn render(&self) -> String {
        let mut text = self.lines().join("\n");
        text.push('\n');
        text
    }

    /// The single line reported when collection fails outright.
    pub fn error_line(err: &Error) -> String {
        format!("{ERROR_PREFIX}: {err}\n")
    }
}

impl fmt::Display for CodecReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Builds reports from one codec source.
pub struct Aggregator<'a, S: ?Sized> {
    source: &'a S,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a, S> Aggregator<'a, S>
where
    S: CodecSource + ?Sized,
{
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            cancel: None,
        }
    }

    /// Checked between descriptors and between groups. A cancelled build returns
    /// [`Error::Cancelled`] and nothing else.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_deref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn build(&self, options: ReportOptions) -> Result<CodecReport> {
        let tier = self.source.tier();
        let codecs = self.source.codecs()?;
        debug!("building report from {} descriptors ({})", codecs.len(), tier);

        let groups = collect_aliases(codecs, tier, &options, self.cancel.as_deref())?;
        let mut codecs = Vec::with_capacity(groups.len());
        for group in &groups {
            if self.is_cancelled() {
                return Err(Error::Cancelled);
            }
            codecs.push(CodecEntry::from_group(self.source, tier, group));
        }

        Ok(CodecReport {
            tier,
            options,
            codecs,
        })
    }

    /// Text report, or the error line if the source could not be queried.
    pub fn report_text(&self, options: ReportOptions) -> String {
        match self.build(options) {
            Ok(report) => report.render(),
            Err(Error::Cancelled) => {
                debug!("codec report cancelled");
                CodecReport::error_line(&Error::Cancelled)
            }
            Err(e) => {
                error!("{}: {}", ERROR_PREFIX, e);
                CodecReport::error_line(&e)
            }
        }
    }
}

/// Builds the text report for `source` with the given filters.
pub fn build_report<S>(source: &S, video_only: bool, decode_only: bool) -> String
where
    S: CodecSource + ?Sized,
{
    Aggregator::new(source).report_text(ReportOptions::new(video_only, decode_only))
}
