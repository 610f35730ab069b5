// Branch-free word helpers for the secret-dependent control decisions in the
// decoder. All inputs and outputs are plain u64 so they compose with the lane
// arithmetic in bitslice.rs; byte-level comparisons go through `subtle`.


/// Select `a` when `ctl == 1`, else `b`. `ctl` must be 0 or 1.
#[inline(always)]
pub(crate) fn ct_mux(ctl: u64, a: u64, b: u64) -> u64 { b ^ (ctl.wrapping_neg() & (a ^ b)) }


/// 1 when `a == 0`, else 0.
#[inline(always)]
pub(crate) fn ct_is_zero(a: u64) -> u64 { !(a | a.wrapping_neg()) >> 63 }


/// 1 when `a == b`, else 0.
#[inline(always)]
pub(crate) fn ct_eq(a: u64, b: u64) -> u64 { ct_is_zero(a ^ b) }


/// 1 when `a < b`, else 0.
#[inline(always)]
pub(crate) fn ct_lt(a: u64, b: u64) -> u64 {
    let c = a.wrapping_sub(b);
    (c ^ ((a ^ b) & (b ^ c))) >> 63
}


/// Expand a 0/1 bit into an all-zeros/all-ones mask.
#[inline(always)]
pub(crate) fn mask_from_bit(b: u64) -> u64 { b.wrapping_neg() }


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mux_and_predicates() {
        assert_eq!(ct_mux(1, 0xAA, 0x55), 0xAA);
        assert_eq!(ct_mux(0, 0xAA, 0x55), 0x55);
        assert_eq!(ct_is_zero(0), 1);
        assert_eq!(ct_is_zero(u64::MAX), 0);
        assert_eq!(ct_is_zero(1 << 63), 0);
        assert_eq!(ct_eq(42, 42), 1);
        assert_eq!(ct_eq(42, 43), 0);
        assert_eq!(mask_from_bit(1), u64::MAX);
        assert_eq!(mask_from_bit(0), 0);
    }

    #[test]
    fn test_ordering() {
        let cases = [(0u64, 0u64), (0, 1), (1, 0), (u64::MAX, 0), (0, u64::MAX), (7, 7), (u64::MAX, u64::MAX)];
        for (a, b) in cases {
            assert_eq!(ct_lt(a, b), u64::from(a < b), "lt {a} {b}");
        }
    }
}
