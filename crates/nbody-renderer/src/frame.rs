//! Frame sink interface
//!
//! A sink is whatever displays a frame: a window, a video encoder, or nothing
//! at all. Closing the sink ends the frame loop.

use crate::sprite::SpriteBatch;
use std::time::Duration;

/// One frame handed to a sink
pub struct Frame<'a> {
    pub index: u64,
    pub sprites: &'a SpriteBatch,
    /// Host time spent in the simulation step for this frame
    pub sim_time: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkStatus {
    Open,
    /// The display went away; stop after this frame
    Closed,
}

pub trait FrameSink {
    fn present(&mut self, frame: &Frame<'_>) -> SinkStatus;
}

/// Sink without a display. Closes after `frame_limit` frames, if set.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    frame_limit: Option<u64>,
    presented: u64,
}

impl HeadlessSink {
    pub fn new(frame_limit: Option<u64>) -> Self {
        Self {
            frame_limit,
            presented: 0,
        }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl FrameSink for HeadlessSink {
    fn present(&mut self, frame: &Frame<'_>) -> SinkStatus {
        self.presented += 1;
        log::debug!(
            "frame {}: {} sprites, sim {:?}",
            frame.index,
            frame.sprites.len(),
            frame.sim_time
        );

        match self.frame_limit {
            Some(limit) if self.presented >= limit => SinkStatus::Closed,
            _ => SinkStatus::Open,
        }
    }
}
