use alloc::vec::Vec;
use zeroize::{Zeroize, ZeroizeOnDrop};


/// A parameter set of the Goppa family: field degree m and correction
/// capacity t, with the code length fixed at n = 2^m and the error weight of
/// encapsulation equal to t.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Params {
    pub(crate) m: u32,
    pub(crate) t: usize,
}


pub(crate) const NTS_KEM_12_64: Params = Params { m: 12, t: 64 };
pub(crate) const NTS_KEM_13_80: Params = Params { m: 13, t: 80 };
pub(crate) const NTS_KEM_13_136: Params = Params { m: 13, t: 136 };


impl Params {
    /// Code length, all of GF(2^m).
    pub(crate) const fn n(self) -> usize { 1 << self.m }

    /// Binary parity-check rank m*t.
    pub(crate) const fn mt(self) -> usize { self.m as usize * self.t }

    /// Public key: the (n - mt)-column block of the systemized parity check,
    /// packed per row.
    pub(crate) const fn pk_len(self) -> usize { (self.n() - self.mt()) * self.mt() / 8 }

    /// Secret key: t Goppa coefficients, permuted support and h (u16 each),
    /// and the n-byte implicit-rejection secret.
    pub(crate) const fn sk_len(self) -> usize { 2 * self.t + 5 * self.n() }

    /// Ciphertext: mt-bit syndrome plus a 32-byte tag.
    pub(crate) const fn ct_len(self) -> usize { self.mt() / 8 + 32 }

    pub(crate) fn field(self) -> crate::gf::Gf {
        if self.m == 12 {
            crate::gf::GF12
        } else {
            crate::gf::GF13
        }
    }
}


/// Correctly sized public (encapsulation) key for one parameter set.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PublicKey<const PK_LEN: usize>(pub(crate) Vec<u8>);


/// Correctly sized secret (decapsulation) key for one parameter set.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey<const SK_LEN: usize>(pub(crate) Vec<u8>);


/// Correctly sized ciphertext for one parameter set.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherText<const CT_LEN: usize>(pub(crate) Vec<u8>);
