//! WAV decoding and encoding through `hound`.
//!
//! Integer PCM is normalized to `[-1, 1]` on load and scaled back, rounded and
//! clamped, on write, so an unmodified buffer survives a round trip exactly.

use std::{
    fs::File,
    io::{BufWriter, Read, Seek, Write},
    path::Path,
};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::{
    buffer::SampleBuffer,
    error::{Error, Result},
    sink::Sink,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Encoding {
    Float,
    Int { scale: f32, min: f32, max: f32 },
}

impl Encoding {
    fn of(spec: &WavSpec) -> Result<Self> {
        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => Ok(Self::Float),
            (SampleFormat::Int, bits @ 1..=32) => {
                let scale = (1i64 << (bits - 1)) as f32;
                Ok(Self::Int {
                    scale,
                    min: -scale,
                    max: scale - 1.0,
                })
            }
            (SampleFormat::Float, bits) => Err(Error::UnsupportedFormat {
                bits,
                format: "float",
            }),
            (SampleFormat::Int, bits) => Err(Error::UnsupportedFormat {
                bits,
                format: "integer",
            }),
        }
    }
}

/// Decodes a whole WAV file into memory.
pub fn load(path: impl AsRef<Path>) -> Result<(WavSpec, SampleBuffer<f32>)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    tracing::debug!("opened {}", path.display());
    load_from(reader)
}

pub fn load_from<R: Read>(mut reader: WavReader<R>) -> Result<(WavSpec, SampleBuffer<f32>)> {
    let spec = reader.spec();
    tracing::debug!(?spec, samples = reader.len(), "decoding");

    // `len` comes from the header and may be zero for streamed files; it is
    // only a capacity hint.
    let mut samples = Vec::with_capacity(reader.len() as usize);
    match Encoding::of(&spec)? {
        Encoding::Float => {
            for x in reader.samples::<f32>() {
                samples.push(x?);
            }
        }
        Encoding::Int { scale, .. } => {
            for x in reader.samples::<i32>() {
                samples.push(x? as f32 / scale);
            }
        }
    }

    let buffer = SampleBuffer::new(samples, spec.channels as usize, spec.sample_rate)?;
    if buffer.frames() == 0 {
        return Err(Error::EmptyInput);
    }
    Ok((spec, buffer))
}

/// Encodes chunks into a WAV stream with a fixed spec.
pub struct WavSink<W: Write + Seek> {
    writer: WavWriter<W>,
    encoding: Encoding,
    channels: usize,
    written: usize,
}

impl WavSink<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>, spec: WavSpec) -> Result<Self> {
        let encoding = Encoding::of(&spec)?;
        let writer = WavWriter::create(path, spec)?;
        Ok(Self::with_writer(writer, encoding, spec))
    }
}

impl<W: Write + Seek> WavSink<W> {
    pub fn new(inner: W, spec: WavSpec) -> Result<Self> {
        let encoding = Encoding::of(&spec)?;
        let writer = WavWriter::new(inner, spec)?;
        Ok(Self::with_writer(writer, encoding, spec))
    }

    fn with_writer(writer: WavWriter<W>, encoding: Encoding, spec: WavSpec) -> Self {
        Self {
            writer,
            encoding,
            channels: spec.channels.max(1) as usize,
            written: 0,
        }
    }

    /// Samples written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    fn write_sample(&mut self, x: f32) -> Result<()> {
        match self.encoding {
            Encoding::Float => self.writer.write_sample(x)?,
            Encoding::Int { scale, min, max } => {
                let x = (x * scale).round().clamp(min, max) as i32;
                self.writer.write_sample(x)?
            }
        }
        self.written += 1;
        Ok(())
    }
}

impl<W: Write + Seek> Sink<f32> for WavSink<W> {
    fn write_chunk(&mut self, chunk: &[f32]) -> Result<()> {
        for &x in chunk {
            self.write_sample(x)?;
        }
        Ok(())
    }

    fn finalize(mut self) -> Result<()> {
        // WAV data must end on a frame boundary.
        let partial = self.written % self.channels;
        if partial != 0 {
            tracing::warn!(
                "padding {} samples to complete the last frame",
                self.channels - partial
            );
            for _ in partial..self.channels {
                self.write_sample(0.0)?;
            }
        }
        self.writer.finalize()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::sink::emit;

    fn spec(channels: u16, bits: u16, sample_format: SampleFormat) -> WavSpec {
        WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: bits,
            sample_format,
        }
    }

    fn encode(spec: WavSpec, samples: &[f32]) -> Vec<u8> {
        let mut cursor = Cursor::new(vec![]);
        let mut sink = WavSink::new(&mut cursor, spec).unwrap();
        sink.write_chunk(samples).unwrap();
        sink.finalize().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn int16_round_trip_is_exact() {
        let spec = spec(2, 16, SampleFormat::Int);
        let samples = [0.0, 0.5, -0.5, -1.0, 16383.0 / 32768.0, 1.0 / 32768.0];
        let bytes = encode(spec, &samples);

        let (read_spec, buffer) = load_from(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap();
        assert_eq!(read_spec, spec);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.frames(), 3);
        assert_eq!(buffer.samples(), &samples);
    }

    #[test]
    fn int_writes_clamp() {
        let spec = spec(1, 16, SampleFormat::Int);
        let bytes = encode(spec, &[2.0, -2.0]);
        let mut reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let raw: Vec<i16> = reader.samples::<i16>().map(|x| x.unwrap()).collect();
        assert_eq!(raw, vec![i16::MAX, i16::MIN]);
    }

    #[test]
    fn float_round_trip() {
        let spec = spec(1, 32, SampleFormat::Float);
        let samples = [0.25, -0.75, 1.5];
        let bytes = encode(spec, &samples);
        let (_, buffer) = load_from(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap();
        assert_eq!(buffer.samples(), &samples);
    }

    #[test]
    fn finalize_pads_partial_frame() {
        let spec = spec(2, 16, SampleFormat::Int);
        let bytes = encode(spec, &[0.5, 0.5, 0.5]);
        let (_, buffer) = load_from(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap();
        assert_eq!(buffer.samples(), &[0.5, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn rejects_file_without_frames() {
        let bytes = encode(spec(2, 16, SampleFormat::Int), &[]);
        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        assert!(matches!(load_from(reader), Err(Error::EmptyInput)));
    }

    #[test]
    fn rejects_64_bit_float() {
        let mut cursor = Cursor::new(vec![]);
        assert!(matches!(
            WavSink::new(&mut cursor, spec(1, 64, SampleFormat::Float)),
            Err(Error::UnsupportedFormat { bits: 64, .. })
        ));
    }

    #[test]
    fn emit_counts_samples() {
        let spec = spec(1, 32, SampleFormat::Float);
        let mut output = crate::buffer::OutputBuffer::new(1);
        for i in 0..10 {
            output.write(i, 0, i as f32);
        }
        let mut cursor = Cursor::new(vec![]);
        let sink = WavSink::new(&mut cursor, spec).unwrap();
        assert_eq!(emit(&output, sink, 3).unwrap(), 10);
    }
}
