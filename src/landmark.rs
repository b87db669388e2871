use egui::Pos2;

/// Keypoint names in model output order, matching the names the feed emits.
pub const KEYPOINT_NAMES: [&str; 17] = [
    "nose",
    "leftEye",
    "rightEye",
    "leftEar",
    "rightEar",
    "leftShoulder",
    "rightShoulder",
    "leftElbow",
    "rightElbow",
    "leftWrist",
    "rightWrist",
    "leftHip",
    "rightHip",
    "leftKnee",
    "rightKnee",
    "leftAnkle",
    "rightAnkle",
];

/// Connected keypoint pairs, as indices into [`KEYPOINT_NAMES`].
pub const SKELETON_CONNECTIONS: [(usize, usize); 19] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (3, 1),
    (4, 2),
    (1, 2),
    (5, 6),
    (5, 7),
    (5, 11),
    (6, 8),
    (6, 12),
    (7, 9),
    (8, 10),
    (11, 12),
    (11, 13),
    (12, 14),
    (13, 15),
    (14, 16),
];

/// One detected landmark in frame pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Keypoint {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            confidence,
        }
    }

    pub fn pos(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

/// One detected person. The pose list is replaced wholesale on every feed
/// event; no identity is preserved across frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }
}

/// Nearest keypoint to `at` across all poses and all keypoints, or `None`
/// when the pose list is empty. Ties resolve to the first keypoint
/// encountered in pose-then-keypoint order (strict `<` comparison).
pub fn nearest_keypoint(poses: &[Pose], at: Pos2) -> Option<&Keypoint> {
    let mut closest: Option<(&Keypoint, f32)> = None;

    for pose in poses {
        for keypoint in &pose.keypoints {
            let distance = (keypoint.pos() - at).length();
            match closest {
                Some((_, best)) if distance >= best => {}
                _ => closest = Some((keypoint, distance)),
            }
        }
    }

    closest.map(|(keypoint, _)| keypoint)
}

#[cfg(test)]
mod tests {
    use super::{nearest_keypoint, Keypoint, Pose, KEYPOINT_NAMES, SKELETON_CONNECTIONS};
    use egui::Pos2;

    #[test]
    fn nearest_keypoint_minimizes_distance() {
        let poses = vec![Pose::new(vec![
            Keypoint::new("nose", 400.0, 300.0, 0.9),
            Keypoint::new("leftEye", 410.0, 290.0, 0.8),
        ])];

        let hit = nearest_keypoint(&poses, Pos2::new(402.0, 301.0)).expect("keypoint");
        assert_eq!(hit.name, "nose");
    }

    #[test]
    fn nearest_keypoint_searches_across_poses() {
        let poses = vec![
            Pose::new(vec![Keypoint::new("nose", 0.0, 0.0, 0.9)]),
            Pose::new(vec![Keypoint::new("leftWrist", 99.0, 99.0, 0.4)]),
        ];

        let hit = nearest_keypoint(&poses, Pos2::new(100.0, 100.0)).expect("keypoint");
        assert_eq!(hit.name, "leftWrist");
    }

    #[test]
    fn nearest_keypoint_tie_prefers_first_encountered() {
        let poses = vec![Pose::new(vec![
            Keypoint::new("leftEye", 10.0, 0.0, 0.9),
            Keypoint::new("rightEye", -10.0, 0.0, 0.9),
        ])];

        let hit = nearest_keypoint(&poses, Pos2::new(0.0, 0.0)).expect("keypoint");
        assert_eq!(hit.name, "leftEye");
    }

    #[test]
    fn nearest_keypoint_empty_pose_list() {
        assert!(nearest_keypoint(&[], Pos2::new(400.0, 300.0)).is_none());
        assert!(nearest_keypoint(&[Pose::default()], Pos2::ZERO).is_none());
    }

    #[test]
    fn skeleton_connections_index_into_names() {
        for (a, b) in SKELETON_CONNECTIONS {
            assert!(a < KEYPOINT_NAMES.len());
            assert!(b < KEYPOINT_NAMES.len());
        }
    }
}
