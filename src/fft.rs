use crate::gf::Gf;
use alloc::vec;
use alloc::vec::Vec;


// Gao-Mateer additive FFT: evaluate a polynomial over GF(2^m) at every field
// element, and interpolate back. One recursion level peels the last basis
// element beta off the evaluation subspace:
//
//   twist        g(z) = f(beta * z)
//   radix split  g(z) = g0(z^2 + z) + z * g1(z^2 + z)
//   recurse      g0, g1 over the image basis { (b/beta)^2 + b/beta }
//   butterfly    g(v) = g0(w) + v * g1(w),  g(v+1) = g(v) + g1(w)
//
// Output index j holds f evaluated at the field element with polynomial-basis
// coordinates j, since the top-level basis is 1, z, ..., z^(m-1).


struct Level {
    beta: u16,
    beta_inv: u16,
    /// Point offsets of the half-size subspace: entry idx is the sum of the
    /// gammas selected by the bits of idx.
    offsets: Vec<u16>,
}


pub(crate) struct FftPlan {
    gf: Gf,
    levels: Vec<Level>,
}


impl FftPlan {
    pub(crate) fn new(gf: Gf) -> Self {
        let m = gf.m as usize;
        let mut basis: Vec<u16> = (0..m).map(|i| 1u16 << i).collect();
        let mut levels = Vec::with_capacity(m);
        for k in (1..=m).rev() {
            let beta = basis[k - 1];
            let beta_inv = gf.inv(beta);
            let gammas: Vec<u16> = basis[..k - 1].iter().map(|&b| gf.mul(b, beta_inv)).collect();
            let mut offsets = vec![0u16; 1 << (k - 1)];
            for idx in 1..offsets.len() {
                let low = idx.trailing_zeros() as usize;
                offsets[idx] = offsets[idx & (idx - 1)] ^ gammas[low];
            }
            basis = gammas.iter().map(|&g| gf.sqr(g) ^ g).collect();
            levels.push(Level { beta, beta_inv, offsets });
        }
        FftPlan { gf, levels }
    }

    /// Evaluate `f` (coefficients low-to-high) at all 2^m field elements.
    /// `out[j]` is f at the element whose bit pattern is j.
    pub(crate) fn eval_all(&self, f: &[u16]) -> Vec<u16> {
        debug_assert!(!f.is_empty());
        let mut out = vec![0u16; 1 << self.gf.m];
        self.eval_rec(f, 0, 0, &mut out);
        out
    }

    fn eval_rec(&self, f: &[u16], depth: usize, shift: u16, out: &mut [u16]) {
        if f.len() == 1 {
            out.fill(f[0]);
            return;
        }
        if depth == self.levels.len() {
            out[0] = horner(self.gf, f, shift);
            return;
        }
        let gf = self.gf;
        let lvl = &self.levels[depth];
        let half = out.len() / 2;

        // twist onto the scaled basis
        let mut g = Vec::with_capacity(f.len());
        let mut p = 1u16;
        for &c in f {
            g.push(gf.mul(c, p));
            p = gf.mul(p, lvl.beta);
        }
        let s1 = gf.mul(shift, lvl.beta_inv);

        let (g0, g1) = radix_split(&mut g);
        let down = gf.sqr(s1) ^ s1;
        let (lo, hi) = out.split_at_mut(half);
        self.eval_rec(&g0, depth + 1, down, lo);
        self.eval_rec(&g1, depth + 1, down, hi);

        for idx in 0..half {
            let v = s1 ^ lvl.offsets[idx];
            let w1 = hi[idx];
            let o = lo[idx] ^ gf.mul(v, w1);
            lo[idx] = o;
            hi[idx] = o ^ w1;
        }
    }

    /// Interpolate the unique polynomial of degree below 2^m taking the given
    /// values (`vals[j]` at element j). Exact inverse of [`Self::eval_all`].
    pub(crate) fn interp_all(&self, vals: &[u16]) -> Vec<u16> {
        debug_assert_eq!(vals.len(), 1 << self.gf.m);
        let mut work = vals.to_vec();
        self.interp_rec(&mut work, 0, 0)
    }

    fn interp_rec(&self, vals: &mut [u16], depth: usize, shift: u16) -> Vec<u16> {
        if vals.len() == 1 {
            return vec![vals[0]];
        }
        let gf = self.gf;
        let lvl = &self.levels[depth];
        let half = vals.len() / 2;
        let s1 = gf.mul(shift, lvl.beta_inv);
        let down = gf.sqr(s1) ^ s1;

        let (lo, hi) = vals.split_at_mut(half);
        for idx in 0..half {
            let v = s1 ^ lvl.offsets[idx];
            let w1 = lo[idx] ^ hi[idx];
            lo[idx] ^= gf.mul(v, w1);
            hi[idx] = w1;
        }
        let g0 = self.interp_rec(lo, depth + 1, down);
        let g1 = self.interp_rec(hi, depth + 1, down);

        // rebuild g by Horner in (z^2 + z), then untwist
        let mut g: Vec<u16> = Vec::new();
        for j in (0..g0.len()).rev() {
            let mut ng = vec![0u16; g.len() + 2];
            for (i, &c) in g.iter().enumerate() {
                ng[i + 2] ^= c;
                ng[i + 1] ^= c;
            }
            ng[0] ^= g0[j];
            ng[1] ^= g1[j];
            g = ng;
        }
        let mut p = 1u16;
        for c in &mut g {
            *c = gf.mul(*c, p);
            p = gf.mul(p, lvl.beta_inv);
        }
        g
    }
}


/// Taylor expansion of g at z^2 + z by repeated long division: the even and
/// odd remainder coefficients become g0 and g1.
fn radix_split(q: &mut [u16]) -> (Vec<u16>, Vec<u16>) {
    let l = q.len();
    let mut g0 = Vec::with_capacity((l + 1) / 2);
    let mut g1 = Vec::with_capacity(l / 2);
    let mut base = 0;
    while l - base > 2 {
        for i in ((base + 2)..l).rev() {
            let c = q[i];
            q[i - 1] ^= c;
        }
        g0.push(q[base]);
        g1.push(q[base + 1]);
        base += 2;
    }
    if l - base == 2 {
        g0.push(q[base]);
        g1.push(q[base + 1]);
    } else {
        g0.push(q[base]);
        g1.push(0);
    }
    (g0, g1)
}


/// Plain Horner evaluation, the base of the recursion and the reference the
/// transform is tested against.
pub(crate) fn horner(gf: Gf, f: &[u16], x: u16) -> u16 {
    let mut acc = 0u16;
    for &c in f.iter().rev() {
        acc = gf.mul(acc, x) ^ c;
    }
    acc
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf::{GF12, GF13};
    use rand::{Rng, SeedableRng};

    fn random_poly(rng: &mut impl Rng, gf: Gf, len: usize) -> Vec<u16> {
        (0..len).map(|_| rng.gen::<u16>() & gf.elt_mask()).collect()
    }

    #[test]
    fn test_eval_matches_horner_m12() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        let plan = FftPlan::new(GF12);
        for len in [1, 2, 3, 17, 65] {
            let f = random_poly(&mut rng, GF12, len);
            let evals = plan.eval_all(&f);
            for x in 0..4096u16 {
                assert_eq!(evals[usize::from(x)], horner(GF12, &f, x), "len={len} x={x}");
            }
        }
    }

    #[test]
    fn test_eval_matches_horner_m13() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(2);
        let plan = FftPlan::new(GF13);
        let f = random_poly(&mut rng, GF13, 137);
        let evals = plan.eval_all(&f);
        for _ in 0..512 {
            let x = rng.gen::<u16>() & GF13.elt_mask();
            assert_eq!(evals[usize::from(x)], horner(GF13, &f, x));
        }
        assert_eq!(evals[0], f[0]);
    }

    #[test]
    fn test_interp_roundtrip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
        for gf in [GF12, GF13] {
            let plan = FftPlan::new(gf);
            let deg_bound = 137.min(1 << gf.m);
            let f = random_poly(&mut rng, gf, deg_bound);
            let evals = plan.eval_all(&f);
            let back = plan.interp_all(&evals);
            assert_eq!(back.len(), 1 << gf.m);
            assert_eq!(&back[..f.len()], &f[..]);
            assert!(back[f.len()..].iter().all(|&c| c == 0));
        }
    }

    #[test]
    fn test_interp_of_random_values() {
        // arbitrary value vectors interpolate to a polynomial that reproduces them
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);
        let plan = FftPlan::new(GF12);
        let vals: Vec<u16> = (0..4096).map(|_| rng.gen::<u16>() & GF12.elt_mask()).collect();
        let f = plan.interp_all(&vals);
        let evals = plan.eval_all(&f);
        assert_eq!(evals, vals);
    }
}
