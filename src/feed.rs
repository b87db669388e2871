use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use image::{Rgba, RgbaImage};

use crate::landmark::{Keypoint, Pose, KEYPOINT_NAMES};

/// One event from the pose source worker.
pub enum FeedEvent {
    /// A new video frame, in frame pixel coordinates.
    Frame(RgbaImage),
    /// A fresh pose list; replaces the previous one wholesale.
    Poses(Vec<Pose>),
    /// The source failed. The worker keeps polling; the UI surfaces the
    /// message.
    Error(String),
}

/// External capture-plus-detection backend. Implementations run on the feed
/// worker thread and may block in `next`.
pub trait PoseSource: Send {
    fn next(&mut self) -> Result<FeedEvent>;
}

/// Owns the worker thread that pumps a [`PoseSource`] into a channel. The
/// UI drains it with [`PoseFeed::try_recv`] at the top of every update, so
/// all state mutation stays on one thread.
pub struct PoseFeed {
    rx: Receiver<FeedEvent>,
    stop: Arc<AtomicBool>,
    _worker: thread::JoinHandle<()>,
}

impl PoseFeed {
    pub fn spawn(source: Box<dyn PoseSource>) -> Self {
        let (tx, rx) = mpsc::channel::<FeedEvent>();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let worker = thread::spawn(move || feed_loop(source, tx, stop_flag));

        Self {
            rx,
            stop,
            _worker: worker,
        }
    }

    pub fn try_recv(&self) -> Option<FeedEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for PoseFeed {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn feed_loop(mut source: Box<dyn PoseSource>, tx: Sender<FeedEvent>, stop: Arc<AtomicBool>) {
    tracing::info!("pose feed worker started");

    while !stop.load(Ordering::Relaxed) {
        let event = match source.next() {
            Ok(event) => event,
            Err(err) => {
                tracing::error!("pose source failed: {err:#}");
                FeedEvent::Error(format!("{err:#}"))
            }
        };
        if tx.send(event).is_err() {
            break;
        }
    }

    tracing::info!("pose feed worker stopped");
}

/// Joint offsets of the synthetic figure relative to its hip center, in
/// [`KEYPOINT_NAMES`] order, sized for a 480-pixel-tall frame.
const FIGURE_OFFSETS: [(f32, f32); 17] = [
    (0.0, -95.0),
    (6.0, -101.0),
    (-6.0, -101.0),
    (13.0, -97.0),
    (-13.0, -97.0),
    (34.0, -64.0),
    (-34.0, -64.0),
    (52.0, -30.0),
    (-52.0, -30.0),
    (62.0, 4.0),
    (-62.0, 4.0),
    (21.0, 6.0),
    (-21.0, 6.0),
    (24.0, 60.0),
    (-24.0, 60.0),
    (26.0, 112.0),
    (-26.0, 112.0),
];

/// Scripted stand-in for a camera plus detector: a single figure pacing a
/// figure-eight across the frame, emitting alternating frame and pose
/// events. Real backends replace this behind [`PoseSource`].
pub struct SyntheticSource {
    width: u32,
    height: u32,
    interval: Duration,
    phase: f32,
    emit_frame: bool,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, fps: f32) -> Self {
        Self {
            width,
            height,
            interval: Duration::from_secs_f32(1.0 / fps.max(1.0)),
            phase: 0.0,
            emit_frame: true,
        }
    }

    /// The figure at a given walk phase.
    pub fn pose_at(&self, phase: f32) -> Pose {
        let center_x = self.width as f32 * (0.5 + 0.25 * phase.sin());
        let center_y = self.height as f32 * (0.55 + 0.05 * (2.0 * phase).sin());
        let scale = self.height as f32 / 480.0;
        let swing = (2.0 * phase).sin() * 8.0 * scale;

        let keypoints = KEYPOINT_NAMES
            .iter()
            .zip(FIGURE_OFFSETS)
            .enumerate()
            .map(|(index, (name, (dx, dy)))| {
                let sway = if name.ends_with("Wrist") || name.ends_with("Ankle") {
                    swing * dx.signum()
                } else {
                    0.0
                };
                Keypoint::new(
                    *name,
                    center_x + dx * scale + sway,
                    center_y + dy * scale,
                    0.95 - index as f32 * 0.02,
                )
            })
            .collect();

        Pose::new(keypoints)
    }

    fn frame(&self) -> RgbaImage {
        let height = self.height.max(1);
        RgbaImage::from_fn(self.width, self.height, |_, y| {
            let shade = 24 + (y * 16 / height) as u8;
            Rgba([shade, shade + 2, shade + 8, 255])
        })
    }
}

impl PoseSource for SyntheticSource {
    fn next(&mut self) -> Result<FeedEvent> {
        thread::sleep(self.interval / 2);

        if self.emit_frame {
            self.emit_frame = false;
            Ok(FeedEvent::Frame(self.frame()))
        } else {
            self.emit_frame = true;
            self.phase += 0.03;
            Ok(FeedEvent::Poses(vec![self.pose_at(self.phase)]))
        }
    }
}
