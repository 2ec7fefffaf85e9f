//! Frame pacing and frame-rate measurement

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling window for the averaged frame rate
const FRAME_WINDOW: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    /// Averaged over the last [`FRAME_WINDOW`] frames
    pub fps: f32,
    /// Wall time of the frame just finished, including any sleep
    pub frame_time: Duration,
    pub sim_time: Duration,
}

/// Sleeps away whatever is left of each frame budget
pub struct FramePacer {
    budget: Duration,
    frame_start: Instant,
    last_frame_end: Instant,
    frame_times: VecDeque<f32>,
}

impl FramePacer {
    /// A pacer targeting `target_fps`; zero or negative disables sleeping.
    /// Rates too small to express as a frame budget saturate to `Duration::MAX`.
    pub fn new(target_fps: f32) -> Self {
        let budget = if target_fps > 0.0 {
            Duration::try_from_secs_f32(1.0 / target_fps).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        let now = Instant::now();

        Self {
            budget,
            frame_start: now,
            last_frame_end: now,
            frame_times: VecDeque::with_capacity(FRAME_WINDOW),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Sleep out the remaining budget, then report timings for this frame
    pub fn end_frame(&mut self, sim_time: Duration) -> FrameStats {
        let busy = self.frame_start.elapsed();
        if busy < self.budget {
            std::thread::sleep(self.budget - busy);
        }

        let now = Instant::now();
        let frame_time = now - self.last_frame_end;
        self.last_frame_end = now;

        self.frame_times.push_back(frame_time.as_secs_f32());
        if self.frame_times.len() > FRAME_WINDOW {
            self.frame_times.pop_front();
        }
        let avg = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;

        FrameStats {
            fps: if avg > 0.0 { 1.0 / avg } else { 0.0 },
            frame_time,
            sim_time,
        }
    }
}
