/// Immutable animation clip data, owned by the asset layer.
///
/// Vulpine never samples keyframes itself; the host's animation subsystem
/// does. The engine only needs the clip's identity, the names of the animated
/// target properties (tracks), and its duration in seconds.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Target-property names, one per keyframe track. Two clips that share a
    /// track name cannot play together (see [`AnimationClip::conflicts_with`]).
    pub tracks: Vec<String>,
    pub duration: f32,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            tracks,
            duration,
        }
    }

    /// A zero-length clip with no tracks, used for synthetic placeholder
    /// animations such as the empty-hand hold poses.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), 0.0)
    }

    /// Two clips conflict iff they animate at least one common target
    /// property. Symmetric. Track counts are small (<20), so the quadratic
    /// scan is fine without an index.
    #[must_use]
    pub fn conflicts_with(&self, other: &AnimationClip) -> bool {
        for a in &self.tracks {
            for b in &other.tracks {
                if a == b {
                    return true;
                }
            }
        }
        false
    }
}
