//! Body-elision policy, a pure function of the composite score.

use serde::Serialize;

/// Lower bound (inclusive) of the keep-all band.
pub const KEEP_ALL_MIN: f64 = 0.80;
/// Lower bound (inclusive) of the keep-public band.
pub const KEEP_PUBLIC_MIN: f64 = 0.60;
/// Lower bound (inclusive) of the keep-one band.
pub const KEEP_ONE_MIN: f64 = 0.30;

/// How much of a file's function-like bodies survive rendering.
/// Ordered from least to most detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderPolicy {
    /// Elide every body.
    SignaturesOnly,
    /// Keep the first executable body in each container.
    KeepOne,
    /// Keep bodies of public/open constructs.
    KeepPublic,
    /// Keep everything; whitespace condensing only.
    KeepAll,
}

impl RenderPolicy {
    pub fn for_score(score: f64) -> Self {
        if score >= KEEP_ALL_MIN {
            RenderPolicy::KeepAll
        } else if score >= KEEP_PUBLIC_MIN {
            RenderPolicy::KeepPublic
        } else if score >= KEEP_ONE_MIN {
            RenderPolicy::KeepOne
        } else {
            RenderPolicy::SignaturesOnly
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RenderPolicy::SignaturesOnly => "signatures-only",
            RenderPolicy::KeepOne => "keep-one",
            RenderPolicy::KeepPublic => "keep-public",
            RenderPolicy::KeepAll => "keep-all",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_inclusive_at_lower_edge() {
        assert_eq!(RenderPolicy::for_score(1.0), RenderPolicy::KeepAll);
        assert_eq!(RenderPolicy::for_score(0.80), RenderPolicy::KeepAll);
        assert_eq!(RenderPolicy::for_score(0.7999), RenderPolicy::KeepPublic);
        assert_eq!(RenderPolicy::for_score(0.60), RenderPolicy::KeepPublic);
        assert_eq!(RenderPolicy::for_score(0.5999), RenderPolicy::KeepOne);
        assert_eq!(RenderPolicy::for_score(0.30), RenderPolicy::KeepOne);
        assert_eq!(RenderPolicy::for_score(0.2999), RenderPolicy::SignaturesOnly);
        assert_eq!(RenderPolicy::for_score(0.0), RenderPolicy::SignaturesOnly);
    }

    #[test]
    fn test_policies_ordered_by_detail() {
        assert!(RenderPolicy::SignaturesOnly < RenderPolicy::KeepOne);
        assert!(RenderPolicy::KeepOne < RenderPolicy::KeepPublic);
        assert!(RenderPolicy::KeepPublic < RenderPolicy::KeepAll);
    }
}
