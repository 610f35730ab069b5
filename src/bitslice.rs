use crate::bits::mask_from_bit;
use crate::gf::Gf;


// Bit-sliced GF(2^m) arithmetic. A `Sliced` value holds 256 field elements
// spread across m bit-planes: lane p, bit i is bit p of element i. One lane
// operation therefore advances 256 independent field operations, and the
// instruction trace never depends on the element values.

/// 256-bit software lane, four machine words.
pub(crate) type Lane = [u64; 4];

/// Number of elements carried per lane.
pub(crate) const LANE_BITS: usize = 256;

/// Upper bound on the plane count; lanes beyond m stay zero for m=12.
pub(crate) const M_MAX: usize = 13;

/// m bit-planes of 256 elements each.
pub(crate) type Sliced = [Lane; M_MAX];


pub(crate) const LANE_ZERO: Lane = [0u64; 4];

pub(crate) const SLICED_ZERO: Sliced = [LANE_ZERO; M_MAX];


#[inline(always)]
pub(crate) fn lane_and(a: Lane, b: Lane) -> Lane {
    [a[0] & b[0], a[1] & b[1], a[2] & b[2], a[3] & b[3]]
}


#[inline(always)]
pub(crate) fn lane_xor(a: Lane, b: Lane) -> Lane {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}


/// Shift every element index up by one (multiply a coefficient vector by z).
#[inline(always)]
pub(crate) fn lane_shl1(a: Lane) -> Lane {
    [
        a[0] << 1,
        (a[1] << 1) | (a[0] >> 63),
        (a[2] << 1) | (a[1] >> 63),
        (a[3] << 1) | (a[2] >> 63),
    ]
}


/// Parity of the whole lane. XOR-folding first preserves the popcount parity.
#[inline(always)]
pub(crate) fn lane_parity(a: Lane) -> u64 {
    u64::from((a[0] ^ a[1] ^ a[2] ^ a[3]).count_ones()) & 1
}


/// Lane-wide multiplexer driven by a 0/1 control word.
#[inline(always)]
pub(crate) fn lane_mux(ctl: u64, a: Lane, b: Lane) -> Lane {
    let m = mask_from_bit(ctl);
    [
        b[0] ^ (m & (a[0] ^ b[0])),
        b[1] ^ (m & (a[1] ^ b[1])),
        b[2] ^ (m & (a[2] ^ b[2])),
        b[3] ^ (m & (a[3] ^ b[3])),
    ]
}


/// Fill a lane from a 0/1 bit (all-ones or all-zeros).
#[inline(always)]
pub(crate) fn lane_broadcast(bit: u64) -> Lane {
    let m = mask_from_bit(bit);
    [m, m, m, m]
}


#[inline(always)]
pub(crate) fn lane_bit(a: Lane, i: usize) -> u64 { (a[i >> 6] >> (i & 63)) & 1 }


/// Pack up to 256 field elements into plane form.
pub(crate) fn pack(gf: Gf, elems: &[u16]) -> Sliced {
    debug_assert!(elems.len() <= LANE_BITS);
    let m = gf.m as usize;
    let mut s = SLICED_ZERO;
    for (i, &e) in elems.iter().enumerate() {
        let (w, b) = (i >> 6, i & 63);
        for (p, plane) in s.iter_mut().enumerate().take(m) {
            plane[w] |= u64::from((e >> p) & 1) << b;
        }
    }
    s
}


/// Inverse of [`pack`]; writes as many elements as `out` holds.
pub(crate) fn unpack(gf: Gf, s: &Sliced, out: &mut [u16]) {
    debug_assert!(out.len() <= LANE_BITS);
    let m = gf.m as usize;
    for (i, e) in out.iter_mut().enumerate() {
        let mut v = 0u16;
        for (p, plane) in s.iter().enumerate().take(m) {
            v |= ((lane_bit(*plane, i)) as u16) << p;
        }
        *e = v;
    }
}


/// Componentwise product of 256 element pairs. Schoolbook over the planes:
/// all 2m-1 partial-product planes are formed, then folded by the reduction
/// polynomial. AND/XOR only.
pub(crate) fn sliced_mul(gf: Gf, a: &Sliced, b: &Sliced) -> Sliced {
    let m = gf.m as usize;
    let mut pp = [LANE_ZERO; 2 * M_MAX - 1];
    for i in 0..m {
        for j in 0..m {
            pp[i + j] = lane_xor(pp[i + j], lane_and(a[i], b[j]));
        }
    }
    reduce_planes(gf, &mut pp);
    let mut out = SLICED_ZERO;
    out[..m].copy_from_slice(&pp[..m]);
    out
}


/// Componentwise square; squaring is linear so the partial products are just
/// the input planes at even positions.
pub(crate) fn sliced_sqr(gf: Gf, a: &Sliced) -> Sliced {
    let m = gf.m as usize;
    let mut pp = [LANE_ZERO; 2 * M_MAX - 1];
    for i in 0..m {
        pp[2 * i] = a[i];
    }
    reduce_planes(gf, &mut pp);
    let mut out = SLICED_ZERO;
    out[..m].copy_from_slice(&pp[..m]);
    out
}


fn reduce_planes(gf: Gf, pp: &mut [Lane; 2 * M_MAX - 1]) {
    let m = gf.m as usize;
    let low = gf.poly & ((1 << gf.m) - 1);
    for k in ((m)..=(2 * m - 2)).rev() {
        let v = pp[k];
        let mut p = low;
        while p != 0 {
            let e = p.trailing_zeros() as usize;
            pp[k - m + e] = lane_xor(pp[k - m + e], v);
            p &= p - 1;
        }
    }
}


fn sliced_sqr_n(gf: Gf, a: &Sliced, n: u32) -> Sliced {
    let mut r = *a;
    for _ in 0..n {
        r = sliced_sqr(gf, &r);
    }
    r
}


/// Componentwise inverse, 256 elements at once, same chain as `Gf::inv`.
/// Zero components stay zero.
pub(crate) fn sliced_inv(gf: Gf, a: &Sliced) -> Sliced {
    let e2 = sliced_mul(gf, &sliced_sqr(gf, a), a);
    if gf.m == 12 {
        let e4 = sliced_mul(gf, &sliced_sqr_n(gf, &e2, 2), &e2);
        let e5 = sliced_mul(gf, &sliced_sqr(gf, &e4), a);
        let e10 = sliced_mul(gf, &sliced_sqr_n(gf, &e5, 5), &e5);
        let e11 = sliced_mul(gf, &sliced_sqr(gf, &e10), a);
        sliced_sqr(gf, &e11)
    } else {
        let e3 = sliced_mul(gf, &sliced_sqr(gf, &e2), a);
        let e6 = sliced_mul(gf, &sliced_sqr_n(gf, &e3, 3), &e3);
        let e12 = sliced_mul(gf, &sliced_sqr_n(gf, &e6, 6), &e6);
        sliced_sqr(gf, &e12)
    }
}
