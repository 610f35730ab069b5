use crate::bits::{ct_eq, ct_lt, ct_mux};
use crate::bitslice::{
    lane_bit, lane_broadcast, lane_mux, lane_parity, lane_shl1, lane_xor, sliced_mul, Sliced,
    SLICED_ZERO,
};
use crate::gf::Gf;
use alloc::vec;
use alloc::vec::Vec;


// Bit-sliced Berlekamp-Massey. The register polynomials sigma, beta, delta
// and the syndrome window all live as m bit-planes whose bit index is the
// coefficient index, so every update is a handful of lane operations. Both
// branches of the classical algorithm are evaluated each round and a 0/1
// control word selects between them; division by the discrepancy is avoided
// by cross-multiplying with delta.
//
//   d       = parity-collapse of sigma * window
//   control = (d == 0) | (i < 2L)
//   psi     = delta * sigma + d * beta
//   (beta, L, delta) <- control ? (z*beta, L, delta) : (z*sigma, i-L+1, d)
//   sigma   <- psi


/// Recover the error-locator polynomial from 2t syndromes. The connection
/// polynomial psi is emitted reversed with its leading coefficient pinned to
/// position t, so the returned sigma-hat vanishes exactly on the error
/// locators of a weight-t pattern, the zero element included (a zero locator
/// drops deg psi to t-1 and the pinned reversal contributes the root at 0).
pub(crate) fn berlekamp_massey(gf: Gf, t: usize, syndromes: &[u16]) -> Vec<u16> {
    debug_assert_eq!(syndromes.len(), 2 * t);
    let m = gf.m as usize;

    let mut sigma = SLICED_ZERO;
    let mut beta = SLICED_ZERO;
    let mut delta = SLICED_ZERO;
    let mut window = SLICED_ZERO;
    sigma[0][0] = 1; // sigma = 1
    beta[0][0] = 2; // beta = z
    delta[0] = lane_broadcast(1); // delta = 1 at every position
    for (p, plane) in window.iter_mut().enumerate().take(m) {
        plane[0] = u64::from((syndromes[0] >> p) & 1);
    }

    let mut ll = 0u64;
    for i in 0..2 * t {
        let dd = sliced_mul(gf, &sigma, &window);
        let mut d_bit = 0u64;
        let mut d = SLICED_ZERO;
        for p in 0..m {
            let c = lane_parity(dd[p]);
            d[p] = lane_broadcast(c);
            d_bit |= c;
        }

        let control = ct_eq(d_bit, 0) | ct_lt(i as u64, 2 * ll);
        ll = ct_mux(control, ll, (i as u64).wrapping_sub(ll).wrapping_add(1));

        let tmp = sliced_mul(gf, &delta, &sigma);
        let mut psi = sliced_mul(gf, &d, &beta);
        for p in 0..m {
            psi[p] = lane_xor(psi[p], tmp[p]);
            beta[p] = lane_shl1(lane_mux(control, beta[p], sigma[p]));
            delta[p] = lane_mux(control, delta[p], d[p]);
        }
        sigma = psi;

        if i + 1 < 2 * t {
            for (p, plane) in window.iter_mut().enumerate().take(m) {
                *plane = lane_shl1(*plane);
                plane[0] |= u64::from((syndromes[i + 1] >> p) & 1);
            }
        }
    }

    let mut out = vec![0u16; t + 1];
    for (b, coeff) in out.iter_mut().enumerate() {
        let k = t - b;
        let mut e = 0u16;
        for (p, plane) in sigma.iter().enumerate().take(m) {
            #[allow(clippy::cast_possible_truncation)] // single bit
            let bit = lane_bit(*plane, k) as u16;
            e |= bit << p;
        }
        *coeff = e;
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::horner;
    use crate::gf::{GF12, GF13};
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    // syndromes of an error pattern with locators xs and column values hs:
    // S_i = sum_j h_j * x_j^i
    fn syndromes_direct(gf: Gf, t: usize, xs: &[u16], hs: &[u16]) -> Vec<u16> {
        let mut s = vec![0u16; 2 * t];
        for (&x, &h) in xs.iter().zip(hs.iter()) {
            let mut pw = h;
            for si in s.iter_mut() {
                *si ^= pw;
                pw = gf.mul(pw, x);
            }
        }
        s
    }

    fn check_recovery(gf: Gf, t: usize, seed: u64, include_zero: bool) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let n = 1usize << gf.m;
        let mut all: Vec<u16> = (0..n as u16).collect();
        all.shuffle(&mut rng);
        let mut xs: Vec<u16> = all.into_iter().filter(|&x| x != 0).take(t).collect();
        if include_zero {
            xs[0] = 0;
        }
        let hs: Vec<u16> = (0..t).map(|_| 1 + (rng.gen::<u16>() % (gf.elt_mask() - 1))).collect();
        let s = syndromes_direct(gf, t, &xs, &hs);
        let sigma_hat = berlekamp_massey(gf, t, &s);
        assert_eq!(sigma_hat.len(), t + 1);
        for x in 0..n as u16 {
            let is_root = horner(gf, &sigma_hat, x) == 0;
            assert_eq!(is_root, xs.contains(&x), "x={x}");
        }
    }

    #[test]
    fn test_recovers_locators_m12() {
        check_recovery(GF12, 64, 1001, false);
    }

    #[test]
    fn test_recovers_locators_m12_with_zero_locator() {
        check_recovery(GF12, 64, 1002, true);
    }

    #[test]
    fn test_recovers_locators_m13() {
        check_recovery(GF13, 80, 1003, false);
        check_recovery(GF13, 136, 1004, true);
    }

    #[test]
    fn test_small_weight_pattern_rejected_shape() {
        // fewer than t errors leaves psi short of full degree; sigma-hat then
        // has extra roots at 0 which the caller's weight check must catch
        let gf = GF12;
        let t = 8;
        let xs = [5u16, 9, 1000];
        let hs = [1u16, 2, 3];
        let s = syndromes_direct(gf, t, &xs, &hs);
        let sigma_hat = berlekamp_massey(gf, t, &s);
        for &x in &xs {
            assert_eq!(horner(gf, &sigma_hat, x), 0);
        }
    }
}
