/// FNV-1a 64-bit hasher. Stable across runs and platforms, unlike `std`'s `RandomState`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Hash a string with [`Fnv1a64`].
pub(crate) fn fnv1a_str(s: &str) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_str(s);
    h.finish()
}

/// Scale a full-intensity channel by `t` in `[0, 1]`, truncating toward zero.
pub(crate) fn scale_u8(full: u8, t: f64) -> u8 {
    (f64::from(full) * t.clamp(0.0, 1.0)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
