use std::ops::Index;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalRange {
    pub start: f64,
    pub stop: f64,
}

impl NormalRange {
    pub fn new(start: f64, stop: f64) -> Self {
        Self { start, stop }
    }

    /// Parses `"start,stop"` in seconds, e.g. `"12.5,30"`.
    pub fn parse_seconds(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidRange {
            text: text.to_string(),
        };
        let (start, stop) = text.split_once(',').ok_or_else(invalid)?;
        let start: f64 = start.trim().parse().map_err(|_| invalid())?;
        let stop: f64 = stop.trim().parse().map_err(|_| invalid())?;
        if !start.is_finite() || !stop.is_finite() {
            return Err(invalid());
        }
        Ok(Self { start, stop })
    }

    pub fn to_frames(self, sample_rate: u32) -> Self {
        let rate = sample_rate as f64;
        Self {
            start: self.start * rate,
            stop: self.stop * rate,
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.stop
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalRanges(Vec<NormalRange>);

impl NormalRanges {
    pub fn new(ranges: Vec<NormalRange>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(Error::EmptyRanges);
        }
        for (i, r) in ranges.iter().enumerate() {
            if r.start > r.stop {
                tracing::warn!("normal range {i} is inverted: {} > {}", r.start, r.stop);
            }
        }
        for (i, pair) in ranges.windows(2).enumerate() {
            if pair[1].start < pair[0].stop {
                tracing::warn!(
                    "normal range {} starts at {} before range {i} stops at {}",
                    i + 1,
                    pair[1].start,
                    pair[0].stop
                );
            }
        }
        Ok(Self(ranges))
    }

    /// Parses `"start,stop"` second pairs and scales them to frames.
    pub fn parse_seconds<S: AsRef<str>>(args: &[S], sample_rate: u32) -> Result<Self> {
        let ranges = args
            .iter()
            .map(|a| NormalRange::parse_seconds(a.as_ref()).map(|r| r.to_frames(sample_rate)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(ranges)
    }

    pub fn whole_track(frames: usize) -> Self {
        Self(vec![NormalRange::new(0.0, frames as f64)])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> &NormalRange {
        &self.0[0]
    }

    pub fn get(&self, index: usize) -> Option<&NormalRange> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalRange> {
        self.0.iter()
    }
}

impl Index<usize> for NormalRanges {
    type Output = NormalRange;

    fn index(&self, index: usize) -> &NormalRange {
        &self.0[index]
    }
}
