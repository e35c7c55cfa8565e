//! Seed and number derivation for the commit-reveal protocol.
//!
//! ## Commit-Reveal Flow
//!
//! 1. **Commit** - Derive a seed from entropy available now (beacon,
//!    timestamp, counter, fuel, caller) and bind it to the current height
//! 2. **Capture** - A later call captures the block hash of that height,
//!    which did not exist at commit time
//! 3. **Reveal** - Derive the number from `hash(seed || captured_hash)`
//!
//! The committer cannot predict the outcome because the captured hash is
//! determined only after the commit is final; the proposer of the later block
//! cannot target a specific seed without also controlling the beacon.
//!
//! ## Determinism
//!
//! Every function here is a pure function of its inputs. Any party holding
//! the seed and the captured hash can reproduce the revealed number.

use commonware_codec::Encode;
use commonware_cryptography::{
    ed25519::PublicKey,
    sha256::{Digest, Sha256},
    Hasher,
};
use commonware_utils::modulo;
use fairdraw_types::Beacon;

/// Length of seeds and captured hashes in bytes.
pub const SEED_LEN: usize = 32;

const ZERO_SEED: [u8; SEED_LEN] = [0u8; SEED_LEN];

/// Whether a digest is the all-zero sentinel reserved for "no seed".
pub fn is_zero(digest: &Digest) -> bool {
    digest.as_ref() == ZERO_SEED
}

/// Derive a candidate seed from the entropy available at commit time.
///
/// The all-zero digest is reserved as "no seed"; a derived zero is replaced
/// with the digest of value 1.
pub fn derive_seed(
    beacon: &Beacon,
    timestamp: u64,
    counter: &Digest,
    fuel: u64,
    caller: &PublicKey,
) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(beacon.encode().as_ref());
    hasher.update(&timestamp.to_be_bytes());
    hasher.update(counter.as_ref());
    hasher.update(&fuel.to_be_bytes());
    hasher.update(caller.as_ref());
    hasher.update(b"seed"); // Domain separator
    let candidate = hasher.finalize();
    if is_zero(&candidate) {
        let mut one = ZERO_SEED;
        one[SEED_LEN - 1] = 1;
        return Digest::from(one);
    }
    candidate
}

/// Advance the internal entropy counter.
///
/// Folding the freshly derived candidate back in decouples future seeds from
/// this one even if every external input repeats.
pub fn advance_counter(timestamp: u64, candidate: &Digest, fuel: u64) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(&timestamp.to_be_bytes());
    hasher.update(candidate.as_ref());
    hasher.update(&fuel.to_be_bytes());
    hasher.update(b"counter"); // Domain separator
    hasher.finalize()
}

/// Derive the revealed number in `[1, max]` from a seed and its captured
/// hash. Callers must reject `max == 0` before calling.
///
/// The standard modulo-bias caveat applies for `max` close to 2^64; rejection
/// sampling is deliberately not used.
pub fn derive_number(seed: &Digest, captured: &Digest, max: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_ref());
    hasher.update(captured.as_ref());
    hasher.update(b"number"); // Domain separator
    modulo(hasher.finalize().as_ref(), max) + 1
}

/// Derive a number in `[1, max]` directly from a seed, without the
/// commit/reveal split. Callers must reject `max == 0` before calling.
pub fn instant_number(seed: &Digest, max: u64) -> u64 {
    modulo(seed.as_ref(), max) + 1
}
