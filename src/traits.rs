//! Keypair generation, encapsulation, decapsulation and serialization, each
//! behind its own trait so consumers can work with trait objects across the
//! three parameter sets.

use rand_core::CryptoRngCore;

#[cfg(feature = "default-rng")]
use rand_core::OsRng;


/// The `KeyGen` trait is defined to allow trait objects.
pub trait KeyGen {
    /// The public encapsulation key sent to the remote party.
    type PublicKey;
    /// The private decapsulation key retained by the originator.
    type SecretKey;

    /// Generates a public and secret key pair specific to this parameter set,
    /// using the OS default random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails, or when 256
    /// consecutive constructions fail the irreducibility or rank checks
    /// (a broken entropy source, never a normal operating condition).
    /// # Examples
    /// ```rust
    /// # fn main() -> Result<(), &'static str> {
    /// use ntskem::nts_kem_12_64;  // Could also be nts_kem_13_80 or nts_kem_13_136.
    /// use ntskem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (pk, sk) = nts_kem_12_64::KG::try_keygen()?;  // Party 1 generates both keys
    /// let pk_bytes = pk.clone().into_bytes();           // Party 1 serializes the public key
    ///
    /// let pk2 = nts_kem_12_64::PublicKey::try_from_bytes(pk_bytes)?;  // Party 2 deserializes
    /// let (ssk2, ct) = pk2.try_encaps()?;               // Party 2 encapsulates a shared secret
    ///
    /// let ssk1 = sk.try_decaps(&ct)?;                   // Party 1 decapsulates
    /// assert_eq!(ssk1, ssk2);                           // Both parties hold the same secret
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::PublicKey, Self::SecretKey), &'static str> {
        Self::try_keygen_with_rng(&mut OsRng)
    }

    /// Generates a public and secret key pair specific to this parameter set,
    /// using the provided random number generator. For a fixed seed the
    /// resulting pair is bit-exact reproducible.
    /// # Errors
    /// Returns an error when the random number generator fails, or when 256
    /// consecutive constructions fail the irreducibility or rank checks.
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::PublicKey, Self::SecretKey), &'static str>;

    /// Checks that a key pair corresponds: an encapsulation under the public
    /// key must decapsulate to the same shared secret under the secret key.
    /// This function is not intended to operate in constant time.
    fn validate_keypair_vartime(pk: &Self::PublicKey, sk: &Self::SecretKey) -> bool;
}


/// The `Encaps` trait uses the public key to generate a ciphertext and
/// shared secret.
pub trait Encaps {
    /// The common shared secret.
    type SharedSecretKey;
    /// The ciphertext transmitted to the originator.
    type CipherText;

    /// Generates a shared secret and ciphertext with the OS default random
    /// number generator. Runs in constant time relative to secret data.
    /// # Errors
    /// Returns an error when the random number generator fails.
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str> {
        self.try_encaps_with_rng(&mut OsRng)
    }

    /// Generates a shared secret and ciphertext with the provided random
    /// number generator. Runs in constant time relative to secret data.
    /// # Errors
    /// Returns an error when the random number generator fails.
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str>;
}


/// The `Decaps` trait uses the secret key to recover the shared secret from
/// a ciphertext.
pub trait Decaps {
    /// The common shared secret.
    type SharedSecretKey;
    /// The ciphertext received from the remote party.
    type CipherText;

    /// Recovers the shared secret. Decapsulation is implicitly rejecting:
    /// a ciphertext that fails any validity check yields a pseudo-random key
    /// derived from the secret key and the ciphertext rather than an error,
    /// so the caller cannot distinguish the two cases from this API alone.
    /// # Errors
    /// Returns an error only on malformed input lengths.
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecretKey, &'static str>;
}


/// Serialization and deserialization of keys and ciphertexts.
pub trait SerDes {
    /// Serialized form of the struct.
    type ByteArray;

    /// Produces the serialized form.
    fn into_bytes(self) -> Self::ByteArray;

    /// Consumes a serialized form; performs validation.
    /// # Errors
    /// Returns an error on malformed input.
    fn try_from_bytes(ba: Self::ByteArray) -> Result<Self, &'static str>
    where
        Self: Sized;
}
