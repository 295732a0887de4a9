//! Merges a codec's mime-types that report the same profile set.
//!
//! Levels are ignored: decoder selection downstream only keys on profiles.

use serde::Serialize;
use tracing::warn;

use crate::{CodecDescriptor, CodecSource, ProfileLevel};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileGroup {
    pub mime_types: Vec<String>,
    /// Sorted, deduplicated profile ids joined with `", "`. Empty when the
    /// source reported no profile data.
    pub profile_key: String,
}

pub fn profile_key(levels: &[ProfileLevel]) -> String {
    let mut ids: Vec<u32> = levels.iter().map(|pl| pl.profile).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Groups `codec`'s supported types by profile key, in first-seen order.
///
/// A type whose lookup fails is logged and left out.
pub fn merge_profiles<S>(source: &S, codec: &CodecDescriptor) -> Vec<ProfileGroup>
where
    S: CodecSource + ?Sized,
{
    let mut groups: Vec<ProfileGroup> = Vec::new();
    let types = codec.supported_types.as_deref().unwrap_or_default();

    for mime_type in types {
        if groups
            .iter()
            .any(|g| g.mime_types.iter().any(|t| t == mime_type))
        {
            continue;
        }

        let levels = match source.profile_levels(codec, mime_type) {
            Ok(levels) => levels,
            Err(e) => {
                warn!(
                    "skipping {} for codec {}: {}",
                    mime_type, codec.name, e
                );
                continue;
            }
        };

        let key = profile_key(&levels);
        match groups.iter_mut().find(|g| g.profile_key == key) {
            Some(group) => group.mime_types.push(mime_type.clone()),
            None => groups.push(ProfileGroup {
                mime_types: vec![mime_type.clone()],
                profile_key: key,
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SourceTier, StaticSource};

    fn source() -> StaticSource {
        StaticSource::new(SourceTier::Legacy, Vec::new())
    }

    #[test]
    fn test_profile_key_sorts_and_dedups() {
        let levels = [
            ProfileLevel::new(8, 1),
            ProfileLevel::new(1, 4),
            ProfileLevel::new(2, 1),
            ProfileLevel::new(1, 8),
        ];
        assert_eq!(profile_key(&levels), "1, 2, 8");
        assert_eq!(profile_key(&[]), "");
    }

    #[test]
    fn test_profile_key_is_numeric_order() {
        let levels = [ProfileLevel::new(16, 1), ProfileLevel::new(4, 1)];
        assert_eq!(profile_key(&levels), "4, 16");
    }

    #[test]
    fn test_identical_sets_merge() {
        let codec = CodecDescriptor::decoder("c2.example.decoder", &["video/avc", "video/hevc"])
            .with_profiles("video/avc", &[1, 2])
            .with_profiles("video/hevc", &[2, 1]);

        let groups = merge_profiles(&source(), &codec);
        assert_eq!(
            groups,
            vec![ProfileGroup {
                mime_types: vec!["video/avc".into(), "video/hevc".into()],
                profile_key: "1, 2".into(),
            }]
        );
    }

    #[test]
    fn test_differing_sets_stay_apart() {
        let codec = CodecDescriptor::decoder(
            "c2.example.decoder",
            &["video/avc", "video/hevc", "video/av01"],
        )
        .with_profiles("video/avc", &[1, 2])
        .with_profiles("video/hevc", &[1, 2, 4])
        .with_profiles("video/av01", &[2, 1, 1]);

        let groups = merge_profiles(&source(), &codec);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].mime_types, vec!["video/avc", "video/av01"]);
        assert_eq!(groups[1].mime_types, vec!["video/hevc"]);
        assert_eq!(groups[1].profile_key, "1, 2, 4");
    }

    #[test]
    fn test_failed_lookup_is_skipped() {
        let codec = CodecDescriptor::decoder(
            "c2.android.raw.decoder",
            &["audio/raw", "audio/unknown", "audio/flac"],
        )
        .with_profiles("audio/raw", &[])
        .with_profiles("audio/flac", &[]);

        let groups = merge_profiles(&source(), &codec);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].mime_types, vec!["audio/raw", "audio/flac"]);
        assert!(groups[0].profile_key.is_empty());
    }
}
