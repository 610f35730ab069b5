use crate::bits::ct_is_zero;
use crate::bitslice::{lane_and, lane_parity, pack, sliced_mul, Lane, LANE_BITS};
use crate::bma::berlekamp_massey;
use crate::fft::FftPlan;
use crate::helpers::{ensure, hash_reject, hash_tagged, TAG_CT, TAG_KEY};
use crate::sampler::Sampler;
use crate::types::Params;
use crate::SharedSecretKey;
use alloc::vec;
use alloc::vec::Vec;
use rand_core::CryptoRngCore;
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;


// KEM top level. The systemized parity check is H = [I | A] with A as the
// public key, so the syndrome of an error vector is its first mt bits plus
// A times the remaining n - mt bits. Decapsulation re-expands the syndrome
// to the word v = (c | 0), decodes, and masks every validity decision into a
// single constant-time bit; an invalid ciphertext silently yields the
// implicit-rejection key instead of an error.


/// Generate a key pair and serialize both halves.
///
/// Secret-key layout, little-endian u16 unless noted:
/// `a[0..t] || support[0..n] || h[0..n] || z[0..n bytes]`.
pub(crate) fn nts_kem_keypair(
    params: Params, rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    let (pk, secret) = crate::goppa::keygen(params, rng)?;
    let mut sk = Vec::with_capacity(params.sk_len());
    for &v in &secret.a {
        sk.extend_from_slice(&v.to_le_bytes());
    }
    for &v in &secret.support {
        sk.extend_from_slice(&v.to_le_bytes());
    }
    for &v in &secret.h {
        sk.extend_from_slice(&v.to_le_bytes());
    }
    sk.extend_from_slice(&secret.z);
    debug_assert_eq!(sk.len(), params.sk_len());
    Ok((pk, sk))
}


/// Encapsulate against a public key: sample a weight-t error vector, emit
/// its syndrome and tag as the ciphertext, and derive the shared secret.
pub(crate) fn nts_kem_encaps(
    params: Params, rng: &mut impl CryptoRngCore, pk: &[u8],
) -> Result<(SharedSecretKey, Vec<u8>), &'static str> {
    debug_assert_eq!(pk.len(), params.pk_len());
    let n = params.n();
    let mt = params.mt();
    let mut sampler = Sampler::new(rng);
    let e = sample_error_vector(&mut sampler, params)?;

    let mut ct = vec![0u8; params.ct_len()];
    let head = mt / 8;
    ct[..head].copy_from_slice(&e[..head]);
    let tail = &e[head..];
    let row_bytes = (n - mt) / 8;
    for r in 0..mt {
        let row = &pk[r * row_bytes..(r + 1) * row_bytes];
        ct[r >> 3] ^= dot_parity(row, tail) << (r & 7);
    }
    let tag = hash_tagged(TAG_CT, &e);
    ct[head..].copy_from_slice(&tag);
    let key = hash_tagged(TAG_KEY, &e);
    Ok((SharedSecretKey(key), ct))
}


/// Decapsulate. Always returns a key: syndrome decoding runs regardless, and
/// the weight, re-syndrome and tag checks fold into one selection bit.
pub(crate) fn nts_kem_decaps(
    params: Params, sk: &[u8], ct: &[u8],
) -> Result<SharedSecretKey, &'static str> {
    ensure!(sk.len() == params.sk_len(), "malformed secret key");
    ensure!(ct.len() == params.ct_len(), "malformed ciphertext");
    let gf = params.field();
    let n = params.n();
    let mt = params.mt();
    let t = params.t;
    let (support, h, z) = parse_sk(params, sk);
    let (c_bytes, c_tag) = ct.split_at(mt / 8);

    // received word v = (c | 0^(n - mt))
    let mut v_words = Zeroizing::new(vec![0u64; n / 64]);
    for (i, &b) in c_bytes.iter().enumerate() {
        v_words[i >> 3] |= u64::from(b) << (8 * (i & 7));
    }

    let syn_v = Zeroizing::new(syndromes(params, &support, &h, &v_words));
    let sigma = Zeroizing::new(berlekamp_massey(gf, t, &syn_v));
    let plan = FftPlan::new(gf);
    let evals = Zeroizing::new(plan.eval_all(&sigma));

    // error candidate: position j is in error when sigma-hat(L_j) = 0
    let mut e_words = Zeroizing::new(vec![0u64; n / 64]);
    for (j, &x) in support.iter().enumerate() {
        let bit = ct_is_zero(u64::from(evals[usize::from(x)]));
        e_words[j >> 6] |= bit << (j & 63);
    }
    let weight: u32 = e_words.iter().map(|w| w.count_ones()).sum();
    let syn_e = Zeroizing::new(syndromes(params, &support, &h, &e_words));
    let mut e_bytes = Zeroizing::new(vec![0u8; n / 8]);
    for (i, w) in e_words.iter().enumerate() {
        e_bytes[i * 8..i * 8 + 8].copy_from_slice(&w.to_le_bytes());
    }

    #[allow(clippy::cast_possible_truncation)] // t < 2^32
    let mut ok = weight.ct_eq(&(t as u32));
    ok &= syn_v.as_slice().ct_eq(syn_e.as_slice());
    ok &= hash_tagged(TAG_CT, &e_bytes).as_slice().ct_eq(c_tag);

    let mut key = hash_tagged(TAG_KEY, &e_bytes);
    let reject = hash_reject(z, ct);
    for (k, r) in key.iter_mut().zip(reject.iter()) {
        k.conditional_assign(r, !ok);
    }
    Ok(SharedSecretKey(key))
}


/// Uniform error vector of Hamming weight exactly t: partial Fisher-Yates
/// over all n positions with Knuth-Yao bounded draws, keeping the top t
/// entries. Rejection-free, so the draw count is fixed by the walk alone.
fn sample_error_vector<R: CryptoRngCore>(
    sampler: &mut Sampler<'_, R>, params: Params,
) -> Result<Zeroizing<Vec<u8>>, &'static str> {
    let n = params.n();
    let tau = params.t;
    #[allow(clippy::cast_possible_truncation)] // n <= 8192
    let mut idx: Vec<u16> = (0..n).map(|j| j as u16).collect();
    for i in ((n - tau)..n).rev() {
        #[allow(clippy::cast_possible_truncation)] // i + 1 <= n
        let j = sampler.uint_bounded((i + 1) as u16)?;
        idx.swap(i, usize::from(j));
    }
    let mut e = Zeroizing::new(vec![0u8; n / 8]);
    for &pos in &idx[n - tau..] {
        e[usize::from(pos) >> 3] |= 1 << (usize::from(pos) & 7);
    }
    Ok(e)
}


/// Parity of the AND of two equal-length byte strings.
#[allow(clippy::cast_possible_truncation)] // single-bit result
fn dot_parity(a: &[u8], b: &[u8]) -> u8 {
    debug_assert_eq!(a.len(), b.len());
    let mut acc = 0u64;
    let ai = a.chunks_exact(8);
    let bi = b.chunks_exact(8);
    let (ar, br) = (ai.remainder(), bi.remainder());
    for (ca, cb) in ai.zip(bi) {
        let x = u64::from_le_bytes(ca.try_into().unwrap());
        let y = u64::from_le_bytes(cb.try_into().unwrap());
        acc ^= x & y;
    }
    let mut tail = 0u64;
    for (i, (&x, &y)) in ar.iter().zip(br.iter()).enumerate() {
        tail |= u64::from(x & y) << (8 * i);
    }
    acc ^= tail;
    (acc.count_ones() & 1) as u8
}


/// Syndromes S_i = sum_j w_j * h_j * L_j^i for i < 2t, folded per 256-column
/// block: one componentwise plane multiply per power, one masked parity per
/// bit plane. The mask word is applied uniformly whether it is the public
/// received word or the secret error candidate.
fn syndromes(params: Params, support: &[u16], h: &[u16], word_mask: &[u64]) -> Vec<u16> {
    let gf = params.field();
    let m = gf.m as usize;
    let t2 = 2 * params.t;
    let n = params.n();
    let mut s = vec![0u16; t2];
    for blk in 0..n / LANE_BITS {
        let lo = blk * LANE_BITS;
        let lplanes = pack(gf, &support[lo..lo + LANE_BITS]);
        let mut pw = pack(gf, &h[lo..lo + LANE_BITS]);
        let mask: Lane = [
            word_mask[blk * 4],
            word_mask[blk * 4 + 1],
            word_mask[blk * 4 + 2],
            word_mask[blk * 4 + 3],
        ];
        for (i, si) in s.iter_mut().enumerate() {
            for p in 0..m {
                #[allow(clippy::cast_possible_truncation)] // single bit
                let par = lane_parity(lane_and(pw[p], mask)) as u16;
                *si ^= par << p;
            }
            if i + 1 < t2 {
                pw = sliced_mul(gf, &pw, &lplanes);
            }
        }
    }
    s
}


fn parse_sk(params: Params, sk: &[u8]) -> (Zeroizing<Vec<u16>>, Zeroizing<Vec<u16>>, &[u8]) {
    let t = params.t;
    let n = params.n();
    let sup_off = 2 * t;
    let h_off = sup_off + 2 * n;
    let z_off = h_off + 2 * n;
    let support = sk[sup_off..h_off]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    let h = sk[h_off..z_off]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    (Zeroizing::new(support), Zeroizing::new(h), &sk[z_off..])
}


/// Structural checks on a deserialized secret key: element ranges, support a
/// permutation, h free of zeros (1/G^2 never vanishes).
pub(crate) fn validate_sk(params: Params, sk: &[u8]) -> Result<(), &'static str> {
    ensure!(sk.len() == params.sk_len(), "malformed secret key");
    let mask = params.field().elt_mask();
    let t = params.t;
    let n = params.n();
    for c in sk[..2 * t].chunks_exact(2) {
        ensure!(u16::from_le_bytes([c[0], c[1]]) <= mask, "malformed goppa coefficients");
    }
    let (support, h, _z) = parse_sk(params, sk);
    let mut seen = vec![false; n];
    for &x in support.iter() {
        ensure!(usize::from(x) < n, "support element out of range");
        ensure!(!seen[usize::from(x)], "support is not a permutation");
        seen[usize::from(x)] = true;
    }
    for &v in h.iter() {
        ensure!(v != 0 && v <= mask, "malformed inverse table");
    }
    Ok(())
}
