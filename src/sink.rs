use crate::{buffer::OutputBuffer, error::Result, float::Float};

pub trait Sink<T> {
    fn write_chunk(&mut self, chunk: &[T]) -> Result<()>;

    fn finalize(self) -> Result<()>
    where
        Self: Sized;
}

/// Hands `output` to `sink` in order, `chunk_size` samples at a time, then
/// finalizes the sink. Returns the number of samples written.
pub fn emit<T: Float, S: Sink<T>>(
    output: &OutputBuffer<T>,
    mut sink: S,
    chunk_size: usize,
) -> Result<usize> {
    let mut written = 0;
    for chunk in output.chunks(chunk_size) {
        sink.write_chunk(chunk)?;
        written += chunk.len();
    }
    sink.finalize()?;
    tracing::debug!(written, chunk_size, "flushed output");
    Ok(written)
}

#[derive(Debug, Default)]
pub struct VecSink<T> {
    pub samples: Vec<T>,
    pub chunk_lens: Vec<usize>,
}

impl<T: Copy> Sink<T> for &mut VecSink<T> {
    fn write_chunk(&mut self, chunk: &[T]) -> Result<()> {
        self.samples.extend_from_slice(chunk);
        self.chunk_lens.push(chunk.len());
        Ok(())
    }

    fn finalize(self) -> Result<()> {
        Ok(())
    }
}
