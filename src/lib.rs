#![no_std]
#![deny(unsafe_code, missing_docs)]
#![warn(clippy::pedantic)]
#![doc = include_str!("../README.md")]

// Implements the NTS-KEM key-encapsulation mechanism over binary Goppa codes
// for the (12, 64), (13, 80) and (13, 136) parameter sets.
//
// Functionality map
//
// Constant-time word helpers                 --> bits.rs
// GF(2^m) scalar arithmetic                  --> gf.rs
// Bit-sliced GF(2^m) arithmetic              --> bitslice.rs
// Additive FFT and interpolation             --> fft.rs
// Goppa-polynomial screening                 --> poly.rs
// Packed F2 matrix, Four-Russians rref       --> matrix.rs
// Bit ring and Knuth-Yao sampling            --> sampler.rs
// Berlekamp-Massey decoder                   --> bma.rs
// Key generation (code construction)         --> goppa.rs
// Keypair / encapsulate / decapsulate        --> kem.rs
// SHA3-256 tags and ensure!()                --> helpers.rs
//
// The three parameter sets are modules in this file with injected macro code
// that connects them to kem.rs. Keys are heap-backed: the largest public key
// is 1.4 MB, well past what stack arrays should carry. Randomness enters
// exclusively through rand_core, which both keeps the crate no_std and makes
// every output reproducible from a seeded RNG.

extern crate alloc;

/// The `rand_core` types are re-exported so that users of ntskem do not have
/// to worry about using the exact correct version of `rand_core`.
pub use rand_core::{CryptoRng, Error as RngError, RngCore};

use crate::traits::SerDes;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

mod bits;
mod bitslice;
mod bma;
mod fft;
mod gf;
mod goppa;
mod helpers;
mod kem;
mod matrix;
mod poly;
mod sampler;
mod types;

/// All functionality is covered by traits, such that consumers can utilize
/// trait objects if desired.
pub mod traits;


/// Shared secret length for all NTS-KEM variants (in bytes)
pub const SSK_LEN: usize = 32;


/// The (opaque) shared secret that can be de/serialized by each party.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey(pub(crate) [u8; SSK_LEN]);


impl SerDes for SharedSecretKey {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, &'static str> {
        // No validation opportunity yet; a Result keeps the signature open.
        Ok(SharedSecretKey(ssk))
    }
}


// Conservative (constant-time) support...
impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool { bool::from(self.0.ct_eq(&other.0)) }
}


// This common functionality is injected into each parameter set module
macro_rules! functionality {
    () => {
        use crate::helpers::ensure;
        use crate::kem::{nts_kem_decaps, nts_kem_encaps, nts_kem_keypair, validate_sk};
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::SharedSecretKey;
        use alloc::vec::Vec;
        use rand_core::CryptoRngCore;


        /// Correctly sized public key specific to the target parameter set.
        pub type PublicKey = crate::types::PublicKey<PK_LEN>;

        /// Correctly sized secret key specific to the target parameter set.
        pub type SecretKey = crate::types::SecretKey<SK_LEN>;

        /// Correctly sized ciphertext specific to the target parameter set.
        pub type CipherText = crate::types::CipherText<CT_LEN>;

        /// Supports the `KeyGen` trait, allowing for keypair generation
        pub struct KG();


        impl KeyGen for KG {
            type PublicKey = PublicKey;
            type SecretKey = SecretKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(PublicKey, SecretKey), &'static str> {
                let (pk, sk) = nts_kem_keypair(PARAMS, rng)?;
                Ok((PublicKey { 0: pk }, SecretKey { 0: sk }))
            }

            fn validate_keypair_vartime(pk: &PublicKey, sk: &SecretKey) -> bool {
                // A deterministic internal RNG so that validation does not
                // require an external one; splitmix64 gives the Knuth-Yao
                // walks bit variety (a constant fill would not terminate).
                struct ProbeRng(u64);
                impl rand_core::RngCore for ProbeRng {
                    #[allow(clippy::cast_possible_truncation)]
                    fn next_u32(&mut self) -> u32 { self.next_u64() as u32 }

                    fn next_u64(&mut self) -> u64 {
                        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
                        let mut z = self.0;
                        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
                        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
                        z ^ (z >> 31)
                    }

                    fn fill_bytes(&mut self, out: &mut [u8]) {
                        for chunk in out.chunks_mut(8) {
                            let b = self.next_u64().to_le_bytes();
                            chunk.copy_from_slice(&b[..chunk.len()]);
                        }
                    }

                    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
                        self.fill_bytes(out);
                        Ok(())
                    }
                }
                impl rand_core::CryptoRng for ProbeRng {}

                let mut rng = ProbeRng(0x4E54_534B_454D_2B31);
                let Ok((k1, ct)) = pk.try_encaps_with_rng(&mut rng) else {
                    return false;
                };
                let Ok(k2) = sk.try_decaps(&ct) else {
                    return false;
                };
                k1 == k2
            }
        }


        impl Encaps for PublicKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(SharedSecretKey, CipherText), &'static str> {
                let (ssk, ct) = nts_kem_encaps(PARAMS, rng, &self.0)?;
                Ok((ssk, CipherText { 0: ct }))
            }
        }


        impl Decaps for SecretKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecretKey, &'static str> {
                nts_kem_decaps(PARAMS, &self.0, &ct.0)
            }
        }


        impl SerDes for PublicKey {
            type ByteArray = Vec<u8>;

            fn into_bytes(self) -> Self::ByteArray { self.0.clone() }

            fn try_from_bytes(pk: Self::ByteArray) -> Result<Self, &'static str> {
                // Any bit pattern of the right length is a plausible matrix
                // block, so only the size is checked here.
                ensure!(pk.len() == PK_LEN, "malformed public key");
                Ok(PublicKey { 0: pk })
            }
        }


        impl SerDes for SecretKey {
            type ByteArray = Vec<u8>;

            fn into_bytes(self) -> Self::ByteArray { self.0.clone() }

            fn try_from_bytes(sk: Self::ByteArray) -> Result<Self, &'static str> {
                // Structural validation: coefficient ranges, the support a
                // permutation of the field, the inverse table free of zeros.
                validate_sk(PARAMS, &sk)?;
                Ok(SecretKey { 0: sk })
            }
        }


        impl SerDes for CipherText {
            type ByteArray = Vec<u8>;

            fn into_bytes(self) -> Self::ByteArray { self.0.clone() }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, &'static str> {
                ensure!(ct.len() == CT_LEN, "malformed ciphertext");
                Ok(CipherText { 0: ct })
            }
        }


        #[cfg(test)]
        mod tests {
            use super::*;
            use rand_core::SeedableRng;

            #[test]
            fn smoke_test() {
                let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
                for _i in 0..SMOKE_ITERATIONS {
                    let (pk, sk) = KG::try_keygen_with_rng(&mut rng).unwrap();
                    let (ssk1, ct) = pk.try_encaps_with_rng(&mut rng).unwrap();
                    let ssk2 = sk.try_decaps(&ct).unwrap();
                    assert_eq!(ssk1, ssk2);
                    assert!(KG::validate_keypair_vartime(&pk, &sk));
                    let pk2 = PublicKey::try_from_bytes(pk.clone().into_bytes()).unwrap();
                    let sk2 = SecretKey::try_from_bytes(sk.clone().into_bytes()).unwrap();
                    let (ssk3, ct3) = pk2.try_encaps_with_rng(&mut rng).unwrap();
                    assert_eq!(sk2.try_decaps(&ct3).unwrap(), ssk3);
                    let _ = ct.clone().into_bytes();
                }
            }
        }
    };
}


/// Functionality for the NTS-KEM(12, 64) parameter set: GF(2^12), length
/// 4096, 64 correctable errors.
#[cfg(feature = "nts-kem-12-64")]
pub mod nts_kem_12_64 {
    //!
    //! The smallest parameter set. Typical usage flow:
    //! 1. The originator runs `try_keygen()` to obtain `pk` and `sk`.
    //! 2. The originator serializes `pk` via `into_bytes()` and sends it.
    //! 3. The remote party deserializes with `try_from_bytes()` and runs
    //!    `try_encaps()` to obtain the shared secret and a ciphertext.
    //! 4. The originator runs `try_decaps(ct)` to recover the same secret.
    //!
    //! **--> See [`crate::traits`] for the keygen, encapsulation,
    //! decapsulation and serialization functionality.**

    const PARAMS: crate::types::Params = crate::types::NTS_KEM_12_64;

    /// Serialized public key length (in bytes)
    pub const PK_LEN: usize = PARAMS.pk_len();
    /// Serialized secret key length (in bytes)
    pub const SK_LEN: usize = PARAMS.sk_len();
    /// Serialized ciphertext length (in bytes)
    pub const CT_LEN: usize = PARAMS.ct_len();

    #[cfg(test)]
    const SMOKE_ITERATIONS: usize = 2;

    functionality!();
}


/// Functionality for the NTS-KEM(13, 80) parameter set: GF(2^13), length
/// 8192, 80 correctable errors.
#[cfg(feature = "nts-kem-13-80")]
pub mod nts_kem_13_80 {
    //!
    //! The middle parameter set. Typical usage flow:
    //! 1. The originator runs `try_keygen()` to obtain `pk` and `sk`.
    //! 2. The originator serializes `pk` via `into_bytes()` and sends it.
    //! 3. The remote party deserializes with `try_from_bytes()` and runs
    //!    `try_encaps()` to obtain the shared secret and a ciphertext.
    //! 4. The originator runs `try_decaps(ct)` to recover the same secret.
    //!
    //! **--> See [`crate::traits`] for the keygen, encapsulation,
    //! decapsulation and serialization functionality.**

    const PARAMS: crate::types::Params = crate::types::NTS_KEM_13_80;

    /// Serialized public key length (in bytes)
    pub const PK_LEN: usize = PARAMS.pk_len();
    /// Serialized secret key length (in bytes)
    pub const SK_LEN: usize = PARAMS.sk_len();
    /// Serialized ciphertext length (in bytes)
    pub const CT_LEN: usize = PARAMS.ct_len();

    #[cfg(test)]
    const SMOKE_ITERATIONS: usize = 1;

    functionality!();
}


/// Functionality for the NTS-KEM(13, 136) parameter set: GF(2^13), length
/// 8192, 136 correctable errors.
#[cfg(feature = "nts-kem-13-136")]
pub mod nts_kem_13_136 {
    //!
    //! The largest parameter set. Typical usage flow:
    //! 1. The originator runs `try_keygen()` to obtain `pk` and `sk`.
    //! 2. The originator serializes `pk` via `into_bytes()` and sends it.
    //! 3. The remote party deserializes with `try_from_bytes()` and runs
    //!    `try_encaps()` to obtain the shared secret and a ciphertext.
    //! 4. The originator runs `try_decaps(ct)` to recover the same secret.
    //!
    //! **--> See [`crate::traits`] for the keygen, encapsulation,
    //! decapsulation and serialization functionality.**

    const PARAMS: crate::types::Params = crate::types::NTS_KEM_13_136;

    /// Serialized public key length (in bytes)
    pub const PK_LEN: usize = PARAMS.pk_len();
    /// Serialized secret key length (in bytes)
    pub const SK_LEN: usize = PARAMS.sk_len();
    /// Serialized ciphertext length (in bytes)
    pub const CT_LEN: usize = PARAMS.ct_len();

    #[cfg(test)]
    const SMOKE_ITERATIONS: usize = 1;

    functionality!();
}
