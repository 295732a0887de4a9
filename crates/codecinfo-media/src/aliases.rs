//! Groups raw descriptors by canonical key.
//!
//! Filters run per descriptor before grouping. Within a group:
//!
//! - Sources with canonical names prefer the self-named descriptor
//!   (`name == key`) as representative, whatever the encounter order. A group
//!   that never sees its self-named entry keeps its first descriptor.
//! - Legacy sources have no such signal, so the last descriptor seen for a key
//!   wins. This is a compatibility quirk, not a correctness guarantee.
//!
//! Groups come back in the order their keys were first seen.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use codecinfo_common::{Error, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::normalize::canonical_key;
use crate::{CodecDescriptor, ReportOptions, SourceTier};

const VIDEO_PREFIX: &str = "video/";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CanonicalGroup {
    pub key: String,
    pub representative: CodecDescriptor,
    /// Every name seen for this key, in enumeration order, without repeats.
    pub aliases: Vec<String>,
}

impl CanonicalGroup {
    /// Alias names other than the representative's own.
    pub fn other_names(&self) -> impl Iterator<Item = &str> {
        self.aliases
            .iter()
            .map(String::as_str)
            .filter(move |name| *name != self.representative.name)
    }
}

struct PendingGroup {
    key: String,
    representative: CodecDescriptor,
    self_named: bool,
    aliases: Vec<String>,
}

fn is_video_type(mime_type: &str) -> bool {
    mime_type
        .get(..VIDEO_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(VIDEO_PREFIX))
}

fn passes_filters(codec: &CodecDescriptor, types: &[String], options: &ReportOptions) -> bool {
    if options.video_only && !types.iter().any(|t| is_video_type(t)) {
        return false;
    }
    if options.decode_only && codec.is_encoder {
        return false;
    }
    true
}

/// Builds the canonical groups for one report.
///
/// Descriptors that fail [`CodecDescriptor::inspect`] are logged and skipped.
/// The only error is [`Error::Cancelled`], returned when `cancel` is set
/// between two descriptors.
pub fn collect_aliases(
    codecs: Vec<CodecDescriptor>,
    tier: SourceTier,
    options: &ReportOptions,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<CanonicalGroup>> {
    let mut groups: Vec<PendingGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;
    let mut filtered = 0usize;

    for codec in codecs {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(Error::Cancelled);
        }

        let types = match codec.inspect() {
            Ok(types) => types,
            Err(e) => {
                warn!("skipping codec {:?}: {}", codec.name, e);
                skipped += 1;
                continue;
            }
        };
        if !passes_filters(&codec, types, options) {
            filtered += 1;
            continue;
        }

        let key = canonical_key(&codec, tier);
        let self_named = tier.reports_canonical_names() && codec.name == key;

        match index.get(&key).copied() {
            Some(slot) => {
                let group = &mut groups[slot];
                if !group.aliases.contains(&codec.name) {
                    group.aliases.push(codec.name.clone());
                }
                let replace = if tier.reports_canonical_names() {
                    self_named
                } else {
                    true
                };
                if replace {
                    group.representative = codec;
                    group.self_named |= self_named;
                }
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(PendingGroup {
                    key,
                    aliases: vec![codec.name.clone()],
                    representative: codec,
                    self_named,
                });
            }
        }
    }

    debug!(
        "collected {} codec groups ({} filtered, {} skipped)",
        groups.len(),
        filtered,
        skipped
    );

    Ok(groups
        .into_iter()
        .map(|g| {
            if tier.reports_canonical_names() && !g.self_named {
                debug!(
                    "group {} has no self-named entry, using {}",
                    g.key, g.representative.name
                );
            }
            CanonicalGroup {
                key: g.key,
                representative: g.representative,
                aliases: g.aliases,
            }
        })
        .collect())
}
