use crate::bitslice::{pack, sliced_inv, sliced_mul, sliced_sqr, unpack, Sliced, LANE_BITS};
use crate::fft::FftPlan;
use crate::gf::GfTables;
use crate::matrix::MatrixF2;
use crate::poly::is_irreducible;
use crate::sampler::Sampler;
use crate::types::Params;
use alloc::vec;
use alloc::vec::Vec;
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, Zeroizing};


/// Secret half of a freshly generated key pair, before serialization.
/// `support` and `h` are already in ciphertext coordinates (the column swaps
/// of systemization have been applied), which is what lets decapsulation skip
/// a separate permutation-inversion step.
#[derive(Zeroize)]
#[zeroize(drop)]
pub(crate) struct GoppaSecret {
    /// Low t coefficients of the monic Goppa polynomial.
    pub(crate) a: Vec<u16>,
    /// Permuted support, a permutation of all of GF(2^m).
    pub(crate) support: Vec<u16>,
    /// 1/G(L_j)^2 per support position.
    pub(crate) h: Vec<u16>,
    /// Implicit-rejection secret.
    pub(crate) z: Vec<u8>,
}


/// Attempt bound across irreducibility and rank restarts. Hitting it means a
/// broken seed source, not a normal operating condition.
const MAX_ATTEMPTS: usize = 256;

/// Candidate polynomials screened per attempt before giving up on the draw.
const MAX_CANDIDATES: usize = 12 * 4096;


/// Niederreiter key generation over a random binary Goppa code:
/// sample an irreducible degree-t Goppa polynomial, shuffle the support,
/// build the mt x n binary parity-check matrix, systemize it to [I | A], and
/// emit A as the public key.
pub(crate) fn keygen(
    params: Params, rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, GoppaSecret), &'static str> {
    let gf = params.field();
    let n = params.n();
    let t = params.t;
    let mt = params.mt();
    let m = gf.m as usize;
    let tables = GfTables::new(gf);
    let plan = FftPlan::new(gf);
    let mut sampler = Sampler::new(rng);

    for _attempt in 0..MAX_ATTEMPTS {
        // monic degree-t Goppa polynomial, screened for irreducibility
        let gpoly = match sample_goppa_poly(&mut sampler, &tables, params)? {
            Some(g) => Zeroizing::new(g),
            None => continue,
        };

        // support: the whole field, shuffled
        #[allow(clippy::cast_possible_truncation)] // n <= 8192
        let mut support: Vec<u16> = (0..n).map(|j| j as u16).collect();
        sampler.shuffle(&mut support)?;

        // evaluate G everywhere; an irreducible G of degree >= 2 has no root
        // in the field, so a zero value means a corrupted draw
        let evals = Zeroizing::new(plan.eval_all(&gpoly));
        let gvals: Zeroizing<Vec<u16>> =
            Zeroizing::new(support.iter().map(|&x| evals[usize::from(x)]).collect());
        if gvals.iter().any(|&v| v == 0) {
            continue;
        }

        // 1/G(L_j) for the parity check and 1/G(L_j)^2 for the decoder,
        // inverted 256 elements at a time
        let mut hinv = Zeroizing::new(vec![0u16; n]);
        let mut hsq = Zeroizing::new(vec![0u16; n]);
        for blk in 0..n / LANE_BITS {
            let lo = blk * LANE_BITS;
            let s = pack(gf, &gvals[lo..lo + LANE_BITS]);
            let si = sliced_inv(gf, &s);
            unpack(gf, &si, &mut hinv[lo..lo + LANE_BITS]);
            let sq = sliced_sqr(gf, &si);
            unpack(gf, &sq, &mut hsq[lo..lo + LANE_BITS]);
        }

        // parity check in binary form: entry (i, j) of the t x n matrix is
        // L_j^i / G(L_j), expanded so that binary row i*m + p, column j is
        // bit p. Plane-sliced powering writes four row words per step.
        let mut mat = MatrixF2::zeros(mt, n);
        for blk in 0..n / LANE_BITS {
            let lo = blk * LANE_BITS;
            let lplanes = pack(gf, &support[lo..lo + LANE_BITS]);
            let mut pw: Sliced = pack(gf, &hinv[lo..lo + LANE_BITS]);
            for i in 0..t {
                for (p, plane) in pw.iter().enumerate().take(m) {
                    let row = mat.row_mut(i * m + p);
                    row[blk * 4..blk * 4 + 4].copy_from_slice(plane);
                }
                if i + 1 < t {
                    pw = sliced_mul(gf, &pw, &lplanes);
                }
            }
        }

        let (rank, swaps) = mat.rref();
        if rank < mt {
            continue;
        }
        for &(x, y) in &swaps {
            support.swap(x as usize, y as usize);
            hsq.swap(x as usize, y as usize);
        }

        // public key: the non-identity block, byte-packed row by row
        let mut pk = vec![0u8; params.pk_len()];
        let row_bytes = (n - mt) / 8;
        for r in 0..mt {
            let row = mat.row(r);
            let dst = &mut pk[r * row_bytes..(r + 1) * row_bytes];
            for (i, b) in dst.iter_mut().enumerate() {
                let bit = mt + 8 * i;
                #[allow(clippy::cast_possible_truncation)] // one byte extracted
                let byte = (row[bit >> 6] >> (bit & 63)) as u8;
                *b = byte;
            }
        }

        let mut z = vec![0u8; n];
        sampler.fill_bytes(&mut z)?;
        let a = gpoly[..t].to_vec();
        let h = hsq.to_vec();
        return Ok((pk, GoppaSecret { a, support, h, z }));
    }
    Err("key generation exhausted")
}


/// Draw monic candidates and keep the first irreducible one. The density of
/// irreducibles among monic degree-t polynomials is about 1/t, so the bound
/// is never reached with a live RNG.
fn sample_goppa_poly<R: CryptoRngCore>(
    sampler: &mut Sampler<'_, R>, tables: &GfTables, params: Params,
) -> Result<Option<Vec<u16>>, &'static str> {
    let t = params.t;
    for _ in 0..MAX_CANDIDATES {
        let mut g = vec![0u16; t + 1];
        for c in g.iter_mut().take(t) {
            *c = sampler.gf_element(tables.gf.m)?;
        }
        g[t] = 1;
        if is_irreducible(tables, &g) {
            return Ok(Some(g));
        }
        g.zeroize();
    }
    Ok(None)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::horner;
    use crate::types::NTS_KEM_12_64;
    use rand_core::SeedableRng;

    #[test]
    fn test_keygen_structure() {
        let params = NTS_KEM_12_64;
        let gf = params.field();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7777);
        let (pk, sk) = keygen(params, &mut rng).unwrap();
        assert_eq!(pk.len(), params.pk_len());
        assert_eq!(sk.a.len(), params.t);
        assert_eq!(sk.z.len(), params.n());

        // support is a permutation of the field
        let mut seen = vec![false; params.n()];
        for &x in &sk.support {
            assert!(!seen[usize::from(x)]);
            seen[usize::from(x)] = true;
        }

        // h matches 1/G(L)^2 recomputed from the stored coefficients
        let mut g = sk.a.clone();
        g.push(1);
        for j in (0..params.n()).step_by(97) {
            let gl = horner(gf, &g, sk.support[j]);
            assert_ne!(gl, 0);
            let expect = gf.sqr(gf.inv(gl));
            assert_eq!(sk.h[j], expect, "h at {j}");
        }
    }
}
