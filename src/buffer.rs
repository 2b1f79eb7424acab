use crate::{
    error::{Error, Result},
    float::Float,
};

pub const CHUNK_SAMPLES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer<T> {
    samples: Vec<T>,
    channels: usize,
    sample_rate: u32,
}

impl<T: Float> SampleBuffer<T> {
    /// Wraps interleaved samples. A trailing partial frame is dropped.
    pub fn new(mut samples: Vec<T>, channels: usize, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(Error::NoChannels);
        }
        let whole = samples.len() - samples.len() % channels;
        if whole != samples.len() {
            tracing::warn!(
                "dropping {} samples of a trailing partial frame",
                samples.len() - whole
            );
            samples.truncate(whole);
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    pub fn from_channels(columns: &[Vec<T>], sample_rate: u32) -> Result<Self> {
        let channels = columns.len();
        let frames = columns.first().map_or(0, Vec::len);
        let mut samples = Vec::with_capacity(frames * channels);
        for frame in 0..frames {
            samples.extend(columns.iter().map(|c| c.get(frame).copied().unwrap_or_default()));
        }
        Self::new(samples, channels, sample_rate)
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, frame: usize, channel: usize) -> Option<T> {
        if channel >= self.channels {
            return None;
        }
        self.samples.get(frame * self.channels + channel).copied()
    }

    pub fn frame(&self, frame: usize) -> &[T] {
        &self.samples[frame * self.channels..(frame + 1) * self.channels]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputBuffer<T> {
    samples: Vec<T>,
    channels: usize,
}

impl<T: Float> OutputBuffer<T> {
    pub fn new(channels: usize) -> Self {
        Self::with_capacity(channels, 0)
    }

    /// `capacity` is a reservation hint only, never a limit.
    pub fn with_capacity(channels: usize, capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            channels,
        }
    }

    /// Lays per-channel columns of differing lengths out as one interleaved
    /// buffer sized to the longest column. Shorter columns are zero filled.
    pub fn from_columns(columns: Vec<Vec<T>>) -> Self {
        let channels = columns.len();
        let frames = columns.iter().map(Vec::len).max().unwrap_or(0);
        let mut samples = vec![T::zero(); frames * channels];
        for (channel, column) in columns.into_iter().enumerate() {
            for (frame, x) in column.into_iter().enumerate() {
                samples[frame * channels + channel] = x;
            }
        }
        Self { samples, channels }
    }

    pub fn write(&mut self, frame: usize, channel: usize, value: T) {
        let index = frame * self.channels + channel;
        if self.samples.len() <= index {
            self.samples.resize(index + 1, T::zero());
        }
        self.samples[index] = value;
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len().div_ceil(self.channels)
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }

    pub fn channel(&self, channel: usize) -> impl Iterator<Item = T> + '_ {
        self.samples
            .iter()
            .skip(channel)
            .step_by(self.channels.max(1))
            .copied()
    }

    pub fn chunks(&self, size: usize) -> std::slice::Chunks<'_, T> {
        self.samples.chunks(size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_frames_and_access() {
        let buf = SampleBuffer::new(vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0], 2, 44100).unwrap();
        assert_eq!(buf.frames(), 3);
        assert_eq!(buf.get(1, 1), Some(3.0));
        assert_eq!(buf.get(3, 0), None);
        assert_eq!(buf.get(0, 2), None);
        assert_eq!(buf.frame(2), &[4.0, 5.0]);
    }

    #[test]
    fn partial_frame_is_dropped() {
        let buf = SampleBuffer::new(vec![0.0f32; 5], 2, 8000).unwrap();
        assert_eq!(buf.samples().len(), 4);
        assert_eq!(buf.frames(), 2);
    }

    #[test]
    fn zero_channels_is_rejected() {
        assert!(matches!(
            SampleBuffer::<f32>::new(vec![], 0, 8000),
            Err(Error::NoChannels)
        ));
    }

    #[test]
    fn from_channels_interleaves() {
        let buf = SampleBuffer::from_channels(&[vec![1.0f32, 2.0], vec![-1.0, -2.0]], 10).unwrap();
        assert_eq!(buf.samples(), &[1.0, -1.0, 2.0, -2.0]);
    }

    #[test]
    fn write_grows_to_exact_index() {
        let mut out = OutputBuffer::<f32>::with_capacity(2, 100);
        out.write(0, 1, 1.0);
        assert_eq!(out.len(), 2);
        out.write(2, 0, 3.0);
        assert_eq!(out.samples(), &[0.0, 1.0, 0.0, 0.0, 3.0]);
        assert_eq!(out.frames(), 3);
        out.write(1, 0, 2.0);
        assert_eq!(out.len(), 5);
        assert_eq!(out.channel(0).collect::<Vec<_>>(), vec![0.0, 2.0, 3.0]);
    }

    #[test]
    fn ragged_columns_are_zero_filled() {
        let out = OutputBuffer::from_columns(vec![vec![1.0f32, 2.0, 3.0], vec![9.0]]);
        assert_eq!(out.samples(), &[1.0, 9.0, 2.0, 0.0, 3.0, 0.0]);
        assert_eq!(out.len() % out.channels(), 0);
    }

    #[test]
    fn chunks_preserve_order() {
        let mut out = OutputBuffer::<f64>::new(1);
        for i in 0..10 {
            out.write(i, 0, i as f64);
        }
        let chunks: Vec<_> = out.chunks(4).map(<[f64]>::len).collect();
        assert_eq!(chunks, vec![4, 4, 2]);
        let flat: Vec<f64> = out.chunks(4).flatten().copied().collect();
        assert_eq!(flat, out.samples());
    }
}
