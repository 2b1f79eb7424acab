//! Offline time-warping of audio by nearest-sample resampling along a
//! variable source/destination time map.
//!
//! Two engines are provided: [`ramp::accel_decel`], which ramps speed up and
//! down between windows that must play at normal speed, and
//! [`oscillator::speed_cycle`], which wobbles speed sinusoidally per channel.

pub mod buffer;
pub mod cli;
pub mod error;
pub mod float;
pub mod logging;
pub mod oscillator;
pub mod ramp;
pub mod range;
pub mod sink;
pub mod wav;

pub use buffer::{OutputBuffer, SampleBuffer};
pub use error::{Error, Result};

/// RMS level of `buf`, or zero when empty.
pub fn power<T: float::Float>(buf: &[T]) -> f64 {
    if buf.is_empty() {
        return 0.0;
    }
    let sum: f64 = buf.iter().map(|&x| float::to_f64(x).powi(2)).sum();
    (sum / buf.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn power_of_square_wave() {
        assert_relative_eq!(power(&[0.5f32, -0.5, 0.5, -0.5]), 0.5);
        assert_eq!(power::<f64>(&[]), 0.0);
    }
}
