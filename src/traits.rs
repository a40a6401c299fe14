/// Lossy `usize` to `f32` for ring and slot indices, which stay far below 2^24
pub trait UsizeExt {
    fn to_f32(self) -> f32;
}

impl UsizeExt for usize {
    #[inline]
    #[allow(clippy::cast_precision_loss, reason = "indices stay far below 2^24")]
    fn to_f32(self) -> f32 { self as f32 }
}
