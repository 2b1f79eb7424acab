use rustfft::num_traits;

/// Sample type carried through the warp engines.
///
/// Cursor arithmetic is always done in `f64`; samples are only copied, so any
/// float width works.
pub trait Float: num_traits::Float + num_traits::FloatConst + Default + std::fmt::Debug {}

impl<T: num_traits::Float + num_traits::FloatConst + Default + std::fmt::Debug> Float for T {}

pub fn to_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(0.0)
}
