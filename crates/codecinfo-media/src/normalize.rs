//! Canonical grouping keys for codec descriptors.

use crate::{CodecDescriptor, SourceTier};

const LEGACY_GOOGLE_PREFIX: &str = "OMX.google.";
const MODERN_GOOGLE_PREFIX: &str = "c2.android.";
const LEGACY_PREFIX: &str = "OMX.";
const MODERN_PREFIX: &str = "c2.";

/// Key used to merge every alias of one physical codec.
///
/// Sources that report canonical names are trusted verbatim. Otherwise the
/// key is approximated with [`legacy_to_modern`], which is only a heuristic.
pub fn canonical_key(codec: &CodecDescriptor, tier: SourceTier) -> String {
    if tier.reports_canonical_names() {
        return match codec.canonical_name.as_deref() {
            Some(canonical) if !canonical.is_empty() => canonical.to_string(),
            _ => codec.name.clone(),
        };
    }
    legacy_to_modern(&codec.name)
}

/// Rewrites an OMX-style name to the Codec2 naming scheme.
pub fn legacy_to_modern(name: &str) -> String {
    if let Some(rest) = name.strip_prefix(LEGACY_GOOGLE_PREFIX) {
        format!("{MODERN_GOOGLE_PREFIX}{rest}")
    } else if let Some(rest) = name.strip_prefix(LEGACY_PREFIX) {
        format!("{MODERN_PREFIX}{rest}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_to_modern_prefixes() {
        assert_eq!(
            legacy_to_modern("OMX.google.h264.decoder"),
            "c2.android.h264.decoder"
        );
        assert_eq!(legacy_to_modern("OMX.qcom.video.decoder.avc"), "c2.qcom.video.decoder.avc");
        assert_eq!(legacy_to_modern("c2.exynos.hevc.decoder"), "c2.exynos.hevc.decoder");
        // prefix match is case-sensitive and anchored
        assert_eq!(legacy_to_modern("omx.google.foo"), "omx.google.foo");
        assert_eq!(legacy_to_modern("vendor.OMX.foo"), "vendor.OMX.foo");
    }

    #[test]
    fn test_canonical_tier_uses_reported_name() {
        let codec = CodecDescriptor::decoder("OMX.google.h264.decoder", &["video/avc"])
            .with_canonical_name("c2.android.avc.decoder");
        assert_eq!(
            canonical_key(&codec, SourceTier::Canonical),
            "c2.android.avc.decoder"
        );
        // the heuristic ignores the canonical name entirely
        assert_eq!(
            canonical_key(&codec, SourceTier::Legacy),
            "c2.android.h264.decoder"
        );
    }

    #[test]
    fn test_missing_canonical_name_falls_back_to_name() {
        let codec = CodecDescriptor::decoder("OMX.vendor.decoder", &["video/avc"]);
        assert_eq!(
            canonical_key(&codec, SourceTier::Extended),
            "OMX.vendor.decoder"
        );

        let empty = codec.with_canonical_name("");
        assert_eq!(canonical_key(&empty, SourceTier::Canonical), "OMX.vendor.decoder");
    }
}
