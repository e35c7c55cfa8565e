use crate::ledger::Ledger;
use commonware_consensus::{
    simplex::types::view_message, threshold_simplex::types::seed_namespace,
};
use commonware_cryptography::{
    bls12381::primitives::{
        group::Private,
        ops,
        variant::{MinSig, Variant},
    },
    ed25519::{PrivateKey, PublicKey},
    sha256::{Digest, Sha256},
    Hasher, PrivateKeyExt, Signer,
};
use fairdraw_types::{Beacon, NAMESPACE};
use rand::{rngs::StdRng, SeedableRng};
use std::collections::BTreeMap;

/// How many completed heights the mock host keeps hashes for, mirroring the
/// retention of a production ledger.
const HOST_HASH_RETENTION: u64 = 256;

const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// Creates a master keypair for BLS signatures used to produce beacons
pub fn create_network_keypair() -> (Private, <MinSig as Variant>::Public) {
    let mut rng = StdRng::seed_from_u64(0);
    ops::keypair::<_, MinSig>(&mut rng)
}

/// Creates an account keypair for Ed25519 signatures used by callers
pub fn create_account_keypair(seed: u64) -> (PrivateKey, PublicKey) {
    let mut rng = StdRng::seed_from_u64(seed);
    let private = PrivateKey::from_rng(&mut rng);
    let public = private.public_key();
    (private, public)
}

/// Creates a test beacon for a height
pub fn create_beacon(network_secret: &Private, height: u64) -> Beacon {
    let seed_namespace = seed_namespace(NAMESPACE);
    let message = view_message(height);
    Beacon::new(
        height,
        ops::sign_message::<MinSig>(network_secret, Some(&seed_namespace), &message),
    )
}

/// Deterministic in-memory ledger for tests.
///
/// Tracks a movable tip, signs one beacon per height with a fixed network
/// key, and serves historical hashes only inside the host retention window.
pub struct MockLedger {
    network_secret: Private,
    tip: u64,
    fuel: u64,
    hashes: BTreeMap<u64, Digest>,
}

impl MockLedger {
    pub fn new() -> Self {
        let (network_secret, _) = create_network_keypair();
        Self {
            network_secret,
            tip: 0,
            fuel: 1_000_000,
            hashes: BTreeMap::new(),
        }
    }

    /// Advance the tip by `heights`, sealing a hash for each height left
    /// behind.
    pub fn advance(&mut self, heights: u64) {
        for _ in 0..heights {
            let mut hasher = Sha256::new();
            hasher.update(b"block");
            hasher.update(&self.tip.to_be_bytes());
            self.hashes.insert(self.tip, hasher.finalize());
            self.tip += 1;
        }
    }

    pub fn advance_to(&mut self, height: u64) {
        assert!(height >= self.tip, "the tip only moves forward");
        self.advance(height - self.tip);
    }

    pub fn set_fuel(&mut self, fuel: u64) {
        self.fuel = fuel;
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for MockLedger {
    fn height(&self) -> u64 {
        self.tip
    }

    fn timestamp(&self) -> u64 {
        // 3-second blocks.
        GENESIS_TIMESTAMP + self.tip * 3
    }

    fn beacon(&self) -> Beacon {
        create_beacon(&self.network_secret, self.tip)
    }

    fn fuel_remaining(&self) -> u64 {
        self.fuel
    }

    fn hash_of(&self, height: u64) -> Option<Digest> {
        if height >= self.tip || self.tip - height > HOST_HASH_RETENTION {
            return None;
        }
        self.hashes.get(&height).cloned()
    }
}
