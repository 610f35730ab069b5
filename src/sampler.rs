use rand_core::CryptoRngCore;


/// Bit-granular sampler over an external RNG: a 16-byte ring refilled on
/// demand, a consumed-bit counter, and the Knuth-Yao discrete distribution
/// generator for bounded draws. One instance lives per keypair or
/// encapsulation call, so a fixed RNG seed reproduces every draw.
pub(crate) struct Sampler<'a, R: CryptoRngCore> {
    rng: &'a mut R,
    buf: [u8; 16],
    used: usize,
}


pub(crate) const ERR_RNG: &str = "random number generator failed";


impl<'a, R: CryptoRngCore> Sampler<'a, R> {
    pub(crate) fn new(rng: &'a mut R) -> Self {
        Sampler { rng, buf: [0u8; 16], used: 128 }
    }

    pub(crate) fn bit(&mut self) -> Result<u32, &'static str> {
        if self.used == 128 {
            self.rng.try_fill_bytes(&mut self.buf).map_err(|_| ERR_RNG)?;
            self.used = 0;
        }
        let b = (self.buf[self.used >> 3] >> (self.used & 7)) & 1;
        self.used += 1;
        Ok(u32::from(b))
    }

    /// Uniform draw from [0, bound) by the Knuth-Yao DDG walk. No rejected
    /// bytes; the walk consumes exactly as many bits as the tree path needs.
    pub(crate) fn uint_bounded(&mut self, bound: u16) -> Result<u16, &'static str> {
        debug_assert!(bound > 0);
        let bound = u32::from(bound);
        let mut u = 1u32;
        let mut x = 0u32;
        loop {
            while u < bound {
                u *= 2;
                x = 2 * x + self.bit()?;
            }
            let d = u - bound;
            if x >= d {
                #[allow(clippy::cast_possible_truncation)] // x - d < bound <= u16::MAX
                return Ok((x - d) as u16);
            }
            u = d;
        }
    }

    /// Uniform field element: m fresh bits.
    pub(crate) fn gf_element(&mut self, m: u32) -> Result<u16, &'static str> {
        let mut e = 0u16;
        for i in 0..m {
            #[allow(clippy::cast_possible_truncation)] // single bit
            let b = self.bit()? as u16;
            e |= b << i;
        }
        Ok(e)
    }

    /// Fisher-Yates shuffle of the whole slice.
    pub(crate) fn shuffle(&mut self, arr: &mut [u16]) -> Result<(), &'static str> {
        for i in (1..arr.len()).rev() {
            #[allow(clippy::cast_possible_truncation)] // slice lengths stay below 2^16
            let j = self.uint_bounded((i + 1) as u16)?;
            arr.swap(i, usize::from(j));
        }
        Ok(())
    }

    /// Bulk bytes straight from the underlying RNG, bypassing the bit ring.
    pub(crate) fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), &'static str> {
        self.rng.try_fill_bytes(out).map_err(|_| ERR_RNG)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    #[test]
    fn test_bounded_in_range_and_deterministic() {
        let mut rng1 = rand_chacha::ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = rand_chacha::ChaCha8Rng::seed_from_u64(42);
        let mut s1 = Sampler::new(&mut rng1);
        let mut s2 = Sampler::new(&mut rng2);
        for bound in [1u16, 2, 3, 5, 100, 4096, 8191, 8192] {
            for _ in 0..200 {
                let a = s1.uint_bounded(bound).unwrap();
                let b = s2.uint_bounded(bound).unwrap();
                assert!(a < bound);
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_bounded_hits_every_residue() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(43);
        let mut s = Sampler::new(&mut rng);
        let mut seen = [false; 5];
        for _ in 0..500 {
            seen[usize::from(s.uint_bounded(5).unwrap())] = true;
        }
        assert!(seen.iter().all(|&b| b));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(44);
        let mut s = Sampler::new(&mut rng);
        let mut arr: [u16; 257] = core::array::from_fn(|i| i as u16);
        s.shuffle(&mut arr).unwrap();
        let mut seen = [false; 257];
        for &v in &arr {
            assert!(!seen[usize::from(v)]);
            seen[usize::from(v)] = true;
        }
        assert_ne!(arr[..8], [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_gf_element_width() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(45);
        let mut s = Sampler::new(&mut rng);
        for _ in 0..100 {
            assert!(s.gf_element(13).unwrap() < 8192);
            assert!(s.gf_element(12).unwrap() < 4096);
        }
    }
}
