use egui::{Pos2, Vec2};

use crate::landmark::Pose;

/// Frame-to-frame positional delta of the tracked landmark.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Displacement {
    pub dx: f32,
    pub dy: f32,
}

impl Displacement {
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }
}

/// The landmark the anchor is bound to, plus the cached position from the
/// previous detection used to compute displacement.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedLandmark {
    pub name: String,
    pub previous: Pos2,
}

impl TrackedLandmark {
    pub fn new(name: impl Into<String>, position: Pos2) -> Self {
        Self {
            name: name.into(),
            previous: position,
        }
    }

    /// Advances the cache from the first keypoint matching the tracked name
    /// and returns the new displacement, or `None` when the landmark is
    /// absent from this detection (the caller keeps the last displacement).
    ///
    /// When several detected people carry the same keypoint name, the first
    /// match in pose-then-keypoint order wins; there is no proximity
    /// disambiguation.
    pub fn observe(&mut self, poses: &[Pose]) -> Option<Displacement> {
        for pose in poses {
            for keypoint in &pose.keypoints {
                if keypoint.name == self.name {
                    let displacement = Displacement {
                        dx: keypoint.x - self.previous.x,
                        dy: keypoint.y - self.previous.y,
                    };
                    self.previous = keypoint.pos();
                    return Some(displacement);
                }
            }
        }
        None
    }
}
