//! Sinusoidal speed wobble.
//!
//! Each channel runs its own cursor whose per-frame advance is
//! `sin(count * PI / (sample_rate * sweep_seconds) + phase) + bias`, with
//! channel `n` offset in phase by `n * PI`. Channels therefore finish at
//! different destination lengths.

use std::f64::consts::PI;

use crate::{
    buffer::{OutputBuffer, SampleBuffer},
    error::{Error, Result},
    float::Float,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OscillatorBias {
    /// Advance of `sin + 1.0`.
    Unit,
    /// Advance of `sin + (max - min) / 2 + 1.0`.
    SpeedRange { min: f64, max: f64 },
}

impl OscillatorBias {
    pub fn constant(&self) -> f64 {
        match *self {
            Self::Unit => 1.0,
            Self::SpeedRange { min, max } => (max - min) / 2.0 + 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorBound {
    #[default]
    Frames,
    /// At the interleaved sample count. Reads past the last frame are silent.
    InterleavedSamples,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorConfig {
    pub bias: OscillatorBias,
    pub bound: OscillatorBound,
    /// Destination seconds per half cycle of the sine.
    pub sweep_seconds: f64,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            bias: OscillatorBias::SpeedRange { min: 1.0, max: 3.0 },
            bound: OscillatorBound::Frames,
            sweep_seconds: 10.0,
        }
    }
}

impl OscillatorConfig {
    pub fn unit() -> Self {
        Self {
            bias: OscillatorBias::Unit,
            ..Self::default()
        }
    }

    pub fn with_speed_range(mut self, min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(Error::InvalidSpeedRange { min, max });
        }
        self.bias = OscillatorBias::SpeedRange { min, max };
        Ok(self)
    }

    pub fn with_bound(mut self, bound: OscillatorBound) -> Self {
        self.bound = bound;
        self
    }

    /// Radians the sine advances per destination frame.
    pub fn angular_step(&self, sample_rate: u32) -> f64 {
        PI / (sample_rate as f64 * self.sweep_seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorState {
    pub count: usize,
    pub offset: f64,
    pub phase: f64,
}

impl OscillatorState {
    pub fn new(channel: usize) -> Self {
        Self {
            count: 0,
            offset: 0.0,
            phase: channel as f64 * PI,
        }
    }

    pub fn in_bounds(&self, limit: usize) -> bool {
        self.offset >= 0.0 && self.offset < limit as f64
    }

    pub fn step(&mut self, angular_step: f64, bias: f64) {
        self.offset += (self.count as f64 * angular_step + self.phase).sin() + bias;
        self.count += 1;
    }
}

pub fn render_channel<T: Float>(
    source: &SampleBuffer<T>,
    channel: usize,
    config: &OscillatorConfig,
) -> Vec<T> {
    let limit = match config.bound {
        OscillatorBound::Frames => source.frames(),
        OscillatorBound::InterleavedSamples => source.samples().len(),
    };
    let angular_step = config.angular_step(source.sample_rate());
    let bias = config.bias.constant();

    let mut state = OscillatorState::new(channel);
    let mut column = Vec::with_capacity(source.frames());
    while state.in_bounds(limit) {
        let frame = state.offset.floor() as usize;
        column.push(source.get(frame, channel).unwrap_or_default());
        state.step(angular_step, bias);
    }
    column
}

/// Applies the wobble to every channel and interleaves the result, padding
/// channels that finish early with silence.
pub fn speed_cycle<T: Float>(
    source: &SampleBuffer<T>,
    config: &OscillatorConfig,
) -> OutputBuffer<T> {
    tracing::info!(
        "input size is {} ({} frames x {} channels)",
        source.samples().len(),
        source.frames(),
        source.channels()
    );

    let columns: Vec<Vec<T>> = (0..source.channels())
        .map(|channel| {
            let column = render_channel(source, channel, config);
            tracing::info!(channel, frames = column.len(), "channel done");
            column
        })
        .collect();

    let output = OutputBuffer::from_columns(columns);
    tracing::info!("output size is {}", output.len());
    output
}
