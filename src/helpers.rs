use sha3::{Digest, Sha3_256};


/// If the condition is not met, return an error message. Borrowed from the
/// `anyhow` crate.
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($msg);
        }
    };
}

pub(crate) use ensure; // make available throughout crate


/// Domain-separation tags for the three SHA3-256 derivations.
pub(crate) const TAG_CT: u8 = 0x01;
pub(crate) const TAG_KEY: u8 = 0x02;
pub(crate) const TAG_REJECT: u8 = 0x03;


/// SHA3-256 over a single tag byte followed by the packed error vector.
/// Produces the ciphertext tag (tag 1) and the shared secret (tag 2).
#[must_use]
pub(crate) fn hash_tagged(tag: u8, data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, [tag]);
    Digest::update(&mut hasher, data);
    hasher.finalize().into()
}


/// Implicit-rejection key: SHA3-256(3 || z || ct). Binding the ciphertext in
/// makes the rejection key vary per ciphertext while staying deterministic
/// for a fixed secret key.
#[must_use]
pub(crate) fn hash_reject(z: &[u8], ct: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, [TAG_REJECT]);
    Digest::update(&mut hasher, z);
    Digest::update(&mut hasher, ct);
    hasher.finalize().into()
}
