//! Accelerate/decelerate warp bounded by normal-speed windows.
//!
//! Speed is pinned to 1.0 while the source cursor is inside the active
//! normal range. Between ranges it ramps by a fixed step per destination
//! frame: up until the cursor passes the midpoint ("peak") between the range
//! just left and the next one, then down again, so it arrives back near 1.0.

use crate::{
    buffer::{OutputBuffer, SampleBuffer},
    error::{Error, Result},
    float::Float,
    range::NormalRanges,
};

pub const NORMAL_SPEED: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorUpdate {
    /// Advance once per destination frame; every channel of a frame is read
    /// from the same source position.
    #[default]
    PerFrame,
    /// Advance once per channel sample. Channels land on staggered
    /// destination frames and the cursor runs `channels` times as fast.
    PerChannel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RampConfig {
    /// Speed change per destination frame, in source frames.
    pub acceleration: f64,
    /// Normal-speed windows in frame units.
    pub ranges: NormalRanges,
    pub cursor_update: CursorUpdate,
    /// Lower bound on speed while decelerating. `None` lets the cursor reverse.
    pub min_speed: Option<f64>,
    /// End the run when a reversing cursor falls back across the stop of the
    /// range it last left. Without it such a cursor can re-enter that range,
    /// snap to normal speed and repeat the same cycle forever.
    pub reversal_guard: bool,
}

impl RampConfig {
    pub fn new(acceleration: f64, ranges: NormalRanges) -> Result<Self> {
        if !acceleration.is_finite() || acceleration <= 0.0 {
            return Err(Error::InvalidAcceleration {
                value: acceleration,
            });
        }
        Ok(Self {
            acceleration,
            ranges,
            cursor_update: CursorUpdate::default(),
            min_speed: None,
            reversal_guard: true,
        })
    }

    pub fn with_cursor_update(mut self, cursor_update: CursorUpdate) -> Self {
        self.cursor_update = cursor_update;
        self
    }

    pub fn with_reversal_guard(mut self, reversal_guard: bool) -> Self {
        self.reversal_guard = reversal_guard;
        self
    }

    pub fn with_min_speed(mut self, min_speed: f64) -> Result<Self> {
        // A zero floor can stall the cursor past a peak forever.
        if !min_speed.is_finite() || min_speed <= 0.0 {
            return Err(Error::InvalidMinSpeed { value: min_speed });
        }
        self.min_speed = Some(min_speed);
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampState {
    pub speed: f64,
    pub src_t: f64,
    pub dest_t: usize,
    pub next_range: usize,
    /// Position past which the ramp decelerates.
    pub next_peak: f64,
    /// Stop of the range the cursor most recently left.
    pub exited_stop: Option<f64>,
}

impl RampState {
    pub fn new(ranges: &NormalRanges) -> Self {
        Self {
            speed: NORMAL_SPEED,
            src_t: 0.0,
            dest_t: 0,
            next_range: 0,
            next_peak: ranges.first().start / 2.0,
            exited_stop: None,
        }
    }

    pub fn in_bounds(&self, total_frames: usize) -> bool {
        self.src_t >= 0.0 && self.src_t < total_frames as f64
    }

    /// Moving backward at or behind a range already played through.
    pub fn fell_back(&self) -> bool {
        self.speed < 0.0 && self.exited_stop.is_some_and(|stop| self.src_t <= stop)
    }

    pub fn running(&self, config: &RampConfig, total_frames: usize) -> bool {
        self.in_bounds(total_frames) && !(config.reversal_guard && self.fell_back())
    }

    pub fn due_for_report(&self, interval: usize) -> bool {
        self.dest_t % interval.max(1) == 0
    }

    /// Source frame under the cursor. Only meaningful while in bounds.
    pub fn source_frame(&self) -> usize {
        self.src_t.floor() as usize
    }

    /// Updates speed for the current position, then advances the cursor by
    /// one destination frame.
    pub fn step(&mut self, config: &RampConfig, total_frames: usize) {
        let ranges = &config.ranges;
        let range = ranges[self.next_range];

        if range.contains(self.src_t) {
            self.speed = NORMAL_SPEED;
        } else {
            if self.src_t > range.stop {
                let first = range.stop;
                self.exited_stop = Some(first);
                let last = match ranges.get(self.next_range + 1) {
                    Some(next) => {
                        self.next_range += 1;
                        next.start
                    }
                    None => total_frames as f64,
                };
                self.next_peak = (last - first) / 2.0 + first;
            }

            if self.src_t > self.next_peak {
                self.speed -= config.acceleration;
            } else {
                self.speed += config.acceleration;
            }

            if let Some(floor) = config.min_speed {
                self.speed = self.speed.max(floor);
            }
        }

        self.src_t += self.speed;
        self.dest_t += 1;
    }
}

pub fn accel_decel<T: Float>(source: &SampleBuffer<T>, config: &RampConfig) -> OutputBuffer<T> {
    let channels = source.channels();
    let total_frames = source.frames();
    let report_interval = (source.sample_rate() as usize).max(1);
    let mut output = OutputBuffer::with_capacity(channels, source.samples().len());
    let mut state = RampState::new(&config.ranges);

    tracing::info!(
        "input size is {} ({} frames x {} channels)",
        source.samples().len(),
        total_frames,
        channels
    );
    tracing::debug!(
        next_peak = state.next_peak,
        start = config.ranges.first().start,
        stop = config.ranges.first().stop,
        "first normal range"
    );

    match config.cursor_update {
        CursorUpdate::PerFrame => {
            while state.running(config, total_frames) {
                let frame = source.frame(state.source_frame());
                for (channel, &x) in frame.iter().enumerate() {
                    output.write(state.dest_t, channel, x);
                }
                state.step(config, total_frames);
                report_progress(&state, config, report_interval);
            }
        }
        CursorUpdate::PerChannel => {
            'frames: while state.running(config, total_frames) {
                for channel in 0..channels {
                    // The cursor can leave the buffer between two channels.
                    if !state.running(config, total_frames) {
                        break 'frames;
                    }
                    let x = source.frame(state.source_frame())[channel];
                    output.write(state.dest_t, channel, x);
                    state.step(config, total_frames);
                    report_progress(&state, config, report_interval);
                }
            }
        }
    }

    if state.in_bounds(total_frames) {
        tracing::warn!(
            src_t = state.src_t,
            dest_t = state.dest_t,
            "cursor fell back into a played range, stopping"
        );
    }
    tracing::info!("output size is {}", output.len());
    output
}

fn report_progress(state: &RampState, config: &RampConfig, interval: usize) {
    if state.due_for_report(interval) {
        let range = config.ranges[state.next_range];
        tracing::debug!(
            src_t = state.src_t,
            dest_t = state.dest_t,
            speed = state.speed,
            normal_start = range.start,
            normal_stop = range.stop,
            "progress"
        );
    }
}
