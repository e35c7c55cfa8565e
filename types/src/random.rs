use bytes::{Buf, BufMut};
use commonware_codec::{Encode, EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use commonware_consensus::threshold_simplex::types::Seed as ThresholdSeed;
use commonware_cryptography::{
    bls12381::primitives::variant::{MinSig, Variant},
    ed25519,
    ed25519::PublicKey,
    sha256::{Digest, Sha256},
    Digestible, Hasher, Signer, Verifier,
};
use commonware_utils::union;
use std::collections::BTreeMap;

pub const NAMESPACE: &[u8] = b"_FAIRDRAW";
pub const TRANSACTION_SUFFIX: &[u8] = b"_TX";

/// Maximum length of the message carried by [Event::RandomFailed].
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 128;

/// Per-height beacon value finalized by the host ledger.
///
/// Unpredictable before its height finalizes and unbiasable by any single
/// proposer; both properties are inherited from the hosting ledger's
/// threshold scheme, not re-derived here.
pub type Beacon = ThresholdSeed<MinSig>;

/// Public identity of the network producing beacons.
pub type Identity = <MinSig as Variant>::Public;

#[inline]
pub fn transaction_namespace(namespace: &[u8]) -> Vec<u8> {
    union(namespace, TRANSACTION_SUFFIX)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub nonce: u64,
    pub instruction: Instruction,

    pub public: ed25519::PublicKey,
    pub signature: ed25519::Signature,
}

impl Transaction {
    fn payload(nonce: &u64, instruction: &Instruction) -> Vec<u8> {
        let mut payload = Vec::new();
        nonce.write(&mut payload);
        instruction.write(&mut payload);

        payload
    }

    pub fn sign(private: &ed25519::PrivateKey, nonce: u64, instruction: Instruction) -> Self {
        let signature = private.sign(
            Some(&transaction_namespace(NAMESPACE)),
            &Self::payload(&nonce, &instruction),
        );

        Self {
            nonce,
            instruction,
            public: private.public_key(),
            signature,
        }
    }

    pub fn verify(&self) -> bool {
        self.public.verify(
            Some(&transaction_namespace(NAMESPACE)),
            &Self::payload(&self.nonce, &self.instruction),
            &self.signature,
        )
    }
}

impl Write for Transaction {
    fn write(&self, writer: &mut impl BufMut) {
        self.nonce.write(writer);
        self.instruction.write(writer);
        self.public.write(writer);
        self.signature.write(writer);
    }
}

impl Read for Transaction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let nonce = u64::read(reader)?;
        let instruction = Instruction::read(reader)?;
        let public = ed25519::PublicKey::read(reader)?;
        let signature = ed25519::Signature::read(reader)?;

        Ok(Self {
            nonce,
            instruction,
            public,
            signature,
        })
    }
}

impl EncodeSize for Transaction {
    fn encode_size(&self) -> usize {
        self.nonce.encode_size()
            + self.instruction.encode_size()
            + self.public.encode_size()
            + self.signature.encode_size()
    }
}

impl Digestible for Transaction {
    type Digest = Digest;

    fn digest(&self) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(self.nonce.to_be_bytes().as_ref());
        hasher.update(self.instruction.encode().as_ref());
        hasher.update(self.public.as_ref());
        // We don't include the signature as part of the digest (any valid
        // signature will be valid for the transaction)
        hasher.finalize()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Commit to a future block hash and mint a fresh seed.
    /// Binary: [10]
    Commit,

    /// Reveal the number bound to a previously committed seed.
    /// Binary: [11] [seed:32] [max:u64 BE]
    Reveal { seed: Digest, max: u64 },

    /// Single-transaction shortcut without the commit/reveal split.
    /// Binary: [12] [max:u64 BE]
    Instant { max: u64 },

    /// Supply a historical hash for a height awaiting recovery (attester only).
    /// Binary: [13] [height:u64 BE] [hash:32]
    Attest { height: u64, hash: Digest },
}

impl Write for Instruction {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Commit => 10u8.write(writer),
            Self::Reveal { seed, max } => {
                11u8.write(writer);
                seed.write(writer);
                max.write(writer);
            }
            Self::Instant { max } => {
                12u8.write(writer);
                max.write(writer);
            }
            Self::Attest { height, hash } => {
                13u8.write(writer);
                height.write(writer);
                hash.write(writer);
            }
        }
    }
}

impl Read for Instruction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let instruction = match reader.get_u8() {
            10 => Self::Commit,
            11 => Self::Reveal {
                seed: Digest::read(reader)?,
                max: u64::read(reader)?,
            },
            12 => Self::Instant {
                max: u64::read(reader)?,
            },
            13 => Self::Attest {
                height: u64::read(reader)?,
                hash: Digest::read(reader)?,
            },
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(instruction)
    }
}

impl EncodeSize for Instruction {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Commit => 0,
                Self::Reveal { .. } => Digest::SIZE + u64::SIZE,
                Self::Instant { .. } => u64::SIZE,
                Self::Attest { .. } => u64::SIZE + Digest::SIZE,
            }
    }
}

/// Minimal account structure for transaction nonce tracking.
/// Used for replay protection across all instruction types.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Account {
    pub nonce: u64,
}

impl Write for Account {
    fn write(&self, writer: &mut impl BufMut) {
        self.nonce.write(writer);
    }
}

impl Read for Account {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            nonce: u64::read(reader)?,
        })
    }
}

impl EncodeSize for Account {
    fn encode_size(&self) -> usize {
        self.nonce.encode_size()
    }
}

/// Heights whose hash capture expired before it could happen, awaiting an
/// out-of-band attestation.
///
/// Membership is what matters; iteration order is an artifact of
/// insert/remove history and carries no meaning. Removal is
/// swap-with-last-and-pop, kept O(1) by a height -> position index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecoveryQueue {
    heights: Vec<u64>,
    index: BTreeMap<u64, usize>,
}

impl RecoveryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn contains(&self, height: u64) -> bool {
        self.index.contains_key(&height)
    }

    pub fn heights(&self) -> &[u64] {
        &self.heights
    }

    /// Insert a height. Returns false if it was already queued.
    pub fn insert(&mut self, height: u64) -> bool {
        if self.index.contains_key(&height) {
            return false;
        }
        self.index.insert(height, self.heights.len());
        self.heights.push(height);
        true
    }

    /// Remove a height by swapping the last entry into its slot.
    /// Returns false if the height was not queued.
    pub fn remove(&mut self, height: u64) -> bool {
        let Some(position) = self.index.remove(&height) else {
            return false;
        };
        self.heights.swap_remove(position);
        if let Some(&moved) = self.heights.get(position) {
            self.index.insert(moved, position);
        }
        true
    }
}

impl Write for RecoveryQueue {
    fn write(&self, writer: &mut impl BufMut) {
        (self.heights.len() as u32).write(writer);
        for height in &self.heights {
            height.write(writer);
        }
    }
}

impl Read for RecoveryQueue {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let len = u32::read(reader)? as usize;
        if reader.remaining() < len * u64::SIZE {
            return Err(Error::EndOfBuffer);
        }
        let mut queue = Self::new();
        for _ in 0..len {
            let height = u64::read(reader)?;
            if !queue.insert(height) {
                return Err(Error::Invalid("RecoveryQueue", "duplicate height"));
            }
        }
        Ok(queue)
    }
}

impl EncodeSize for RecoveryQueue {
    fn encode_size(&self) -> usize {
        4 + self.heights.len() * u64::SIZE
    }
}

#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Debug)]
pub enum Key {
    /// Account for nonce tracking (tag 0)
    Account(PublicKey),

    /// Registered seed -> bound height (tag 1)
    Seed(Digest),

    /// Captured block hash for a height (tag 2)
    Captured(u64),

    /// The single in-flight capture slot (tag 3)
    Pending,

    /// Heights awaiting attestation (tag 4)
    Recovery,

    /// Internal monotonic entropy counter (tag 5)
    Counter,
}

impl Write for Key {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Account(pk) => {
                0u8.write(writer);
                pk.write(writer);
            }
            Self::Seed(seed) => {
                1u8.write(writer);
                seed.write(writer);
            }
            Self::Captured(height) => {
                2u8.write(writer);
                height.write(writer);
            }
            Self::Pending => 3u8.write(writer),
            Self::Recovery => 4u8.write(writer),
            Self::Counter => 5u8.write(writer),
        }
    }
}

impl Read for Key {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let key = match reader.get_u8() {
            0 => Self::Account(PublicKey::read(reader)?),
            1 => Self::Seed(Digest::read(reader)?),
            2 => Self::Captured(u64::read(reader)?),
            3 => Self::Pending,
            4 => Self::Recovery,
            5 => Self::Counter,
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(key)
    }
}

impl EncodeSize for Key {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Account(_) => PublicKey::SIZE,
                Self::Seed(_) => Digest::SIZE,
                Self::Captured(_) => u64::SIZE,
                Self::Pending => 0,
                Self::Recovery => 0,
                Self::Counter => 0,
            }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Value {
    /// Account for nonce tracking (tag 0)
    Account(Account),

    /// Height a seed is bound to, always >= 1 (tag 1)
    SeedHeight(u64),

    /// Captured block hash, immutable once present (tag 2)
    Captured(Digest),

    /// Height armed in the pending slot (tag 3)
    Pending(u64),

    /// Recovery queue contents (tag 4)
    Recovery(RecoveryQueue),

    /// Entropy counter state (tag 5)
    Counter(Digest),
}

impl Write for Value {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Account(account) => {
                0u8.write(writer);
                account.write(writer);
            }
            Self::SeedHeight(height) => {
                1u8.write(writer);
                height.write(writer);
            }
            Self::Captured(hash) => {
                2u8.write(writer);
                hash.write(writer);
            }
            Self::Pending(height) => {
                3u8.write(writer);
                height.write(writer);
            }
            Self::Recovery(queue) => {
                4u8.write(writer);
                queue.write(writer);
            }
            Self::Counter(counter) => {
                5u8.write(writer);
                counter.write(writer);
            }
        }
    }
}

impl Read for Value {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = match reader.get_u8() {
            0 => Self::Account(Account::read(reader)?),
            1 => Self::SeedHeight(u64::read(reader)?),
            2 => Self::Captured(Digest::read(reader)?),
            3 => Self::Pending(u64::read(reader)?),
            4 => Self::Recovery(RecoveryQueue::read(reader)?),
            5 => Self::Counter(Digest::read(reader)?),
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(value)
    }
}

impl EncodeSize for Value {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Account(account) => account.encode_size(),
                Self::SeedHeight(height) => height.encode_size(),
                Self::Captured(hash) => hash.encode_size(),
                Self::Pending(height) => height.encode_size(),
                Self::Recovery(queue) => queue.encode_size(),
                Self::Counter(counter) => counter.encode_size(),
            }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Core protocol events (tags 10-15)
    SeedCommitted {
        player: PublicKey,
        seed: Digest,
        height: u64,
    },
    NumberRevealed {
        player: PublicKey,
        seed: Digest,
        number: u64,
        max: u64,
    },
    InstantGenerated {
        player: PublicKey,
        number: u64,
        max: u64,
    },
    HashCaptured {
        height: u64,
        hash: Digest,
    },
    CaptureMissed {
        height: u64,
    },
    HashAttested {
        height: u64,
        hash: Digest,
        attester: PublicKey,
    },

    // Role events (tags 20-22)
    AttesterAdded {
        attester: PublicKey,
    },
    AttesterRemoved {
        attester: PublicKey,
    },
    OwnershipTransferred {
        previous: Option<PublicKey>,
        new_owner: Option<PublicKey>,
    },

    // Error event (tag 29)
    RandomFailed {
        player: PublicKey,
        error_code: u8,
        message: String,
    },
}

impl Write for Event {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::SeedCommitted {
                player,
                seed,
                height,
            } => {
                10u8.write(writer);
                player.write(writer);
                seed.write(writer);
                height.write(writer);
            }
            Self::NumberRevealed {
                player,
                seed,
                number,
                max,
            } => {
                11u8.write(writer);
                player.write(writer);
                seed.write(writer);
                number.write(writer);
                max.write(writer);
            }
            Self::InstantGenerated {
                player,
                number,
                max,
            } => {
                12u8.write(writer);
                player.write(writer);
                number.write(writer);
                max.write(writer);
            }
            Self::HashCaptured { height, hash } => {
                13u8.write(writer);
                height.write(writer);
                hash.write(writer);
            }
            Self::CaptureMissed { height } => {
                14u8.write(writer);
                height.write(writer);
            }
            Self::HashAttested {
                height,
                hash,
                attester,
            } => {
                15u8.write(writer);
                height.write(writer);
                hash.write(writer);
                attester.write(writer);
            }
            Self::AttesterAdded { attester } => {
                20u8.write(writer);
                attester.write(writer);
            }
            Self::AttesterRemoved { attester } => {
                21u8.write(writer);
                attester.write(writer);
            }
            Self::OwnershipTransferred {
                previous,
                new_owner,
            } => {
                22u8.write(writer);
                previous.write(writer);
                new_owner.write(writer);
            }
            Self::RandomFailed {
                player,
                error_code,
                message,
            } => {
                29u8.write(writer);
                player.write(writer);
                error_code.write(writer);
                (message.len() as u32).write(writer);
                writer.put_slice(message.as_bytes());
            }
        }
    }
}

impl Read for Event {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let event = match reader.get_u8() {
            10 => Self::SeedCommitted {
                player: PublicKey::read(reader)?,
                seed: Digest::read(reader)?,
                height: u64::read(reader)?,
            },
            11 => Self::NumberRevealed {
                player: PublicKey::read(reader)?,
                seed: Digest::read(reader)?,
                number: u64::read(reader)?,
                max: u64::read(reader)?,
            },
            12 => Self::InstantGenerated {
                player: PublicKey::read(reader)?,
                number: u64::read(reader)?,
                max: u64::read(reader)?,
            },
            13 => Self::HashCaptured {
                height: u64::read(reader)?,
                hash: Digest::read(reader)?,
            },
            14 => Self::CaptureMissed {
                height: u64::read(reader)?,
            },
            15 => Self::HashAttested {
                height: u64::read(reader)?,
                hash: Digest::read(reader)?,
                attester: PublicKey::read(reader)?,
            },
            20 => Self::AttesterAdded {
                attester: PublicKey::read(reader)?,
            },
            21 => Self::AttesterRemoved {
                attester: PublicKey::read(reader)?,
            },
            22 => Self::OwnershipTransferred {
                previous: Option::<PublicKey>::read(reader)?,
                new_owner: Option::<PublicKey>::read(reader)?,
            },
            29 => {
                let player = PublicKey::read(reader)?;
                let error_code = u8::read(reader)?;
                let message_len = u32::read(reader)? as usize;
                if message_len > MAX_ERROR_MESSAGE_LENGTH {
                    return Err(Error::Invalid("Event", "error message too long"));
                }
                if reader.remaining() < message_len {
                    return Err(Error::EndOfBuffer);
                }
                let mut message_bytes = vec![0u8; message_len];
                reader.copy_to_slice(&mut message_bytes);
                let message = String::from_utf8(message_bytes)
                    .map_err(|_| Error::Invalid("Event", "invalid UTF-8 in error message"))?;
                Self::RandomFailed {
                    player,
                    error_code,
                    message,
                }
            }
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(event)
    }
}

impl EncodeSize for Event {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::SeedCommitted { .. } => PublicKey::SIZE + Digest::SIZE + u64::SIZE,
                Self::NumberRevealed { .. } => {
                    PublicKey::SIZE + Digest::SIZE + u64::SIZE + u64::SIZE
                }
                Self::InstantGenerated { .. } => PublicKey::SIZE + u64::SIZE + u64::SIZE,
                Self::HashCaptured { .. } => u64::SIZE + Digest::SIZE,
                Self::CaptureMissed { .. } => u64::SIZE,
                Self::HashAttested { .. } => u64::SIZE + Digest::SIZE + PublicKey::SIZE,
                Self::AttesterAdded { .. } => PublicKey::SIZE,
                Self::AttesterRemoved { .. } => PublicKey::SIZE,
                Self::OwnershipTransferred {
                    previous,
                    new_owner,
                } => previous.encode_size() + new_owner.encode_size(),
                Self::RandomFailed {
                    player,
                    error_code,
                    message,
                } => player.encode_size() + error_code.encode_size() + 4 + message.len(),
            }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Event(Event),
    Transaction(Transaction),
}

impl Write for Output {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Event(event) => {
                0u8.write(writer);
                event.write(writer);
            }
            Self::Transaction(transaction) => {
                1u8.write(writer);
                transaction.write(writer);
            }
        }
    }
}

impl Read for Output {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Self::Event(Event::read(reader)?)),
            1 => Ok(Self::Transaction(Transaction::read(reader)?)),
            _ => Err(Error::InvalidEnum(kind)),
        }
    }
}

impl EncodeSize for Output {
    fn encode_size(&self) -> usize {
        1 + match self {
            Self::Event(event) => event.encode_size(),
            Self::Transaction(transaction) => transaction.encode_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_cryptography::{ed25519::PrivateKey, PrivateKeyExt};
    use rand::{rngs::StdRng, SeedableRng};

    fn keypair(seed: u64) -> (PrivateKey, PublicKey) {
        let mut rng = StdRng::seed_from_u64(seed);
        let private = PrivateKey::from_rng(&mut rng);
        let public = private.public_key();
        (private, public)
    }

    fn digest(byte: u8) -> Digest {
        Digest::from([byte; 32])
    }

    #[test]
    fn test_recovery_queue_set_semantics() {
        let mut queue = RecoveryQueue::new();
        assert!(queue.is_empty());
        assert!(!queue.contains(100));

        assert!(queue.insert(100));
        assert!(queue.insert(360));
        assert!(queue.insert(720));
        assert!(!queue.insert(100), "duplicate insert must be rejected");
        assert_eq!(queue.len(), 3);

        // Removing the first entry swaps the last into its slot; the index
        // must keep tracking the moved entry.
        assert!(queue.remove(100));
        assert_eq!(queue.len(), 2);
        assert!(queue.contains(360));
        assert!(queue.contains(720));
        assert!(queue.remove(720));
        assert!(queue.remove(360));
        assert!(queue.is_empty());

        assert!(!queue.remove(100), "removing an absent height is a no-op");
    }

    #[test]
    fn test_recovery_queue_interleaved_removals() {
        let mut queue = RecoveryQueue::new();
        for height in 1..=50u64 {
            assert!(queue.insert(height));
        }
        // Remove every other height, in arbitrary positions.
        for height in (2..=50u64).step_by(2) {
            assert!(queue.remove(height));
        }
        assert_eq!(queue.len(), 25);
        for height in (1..=49u64).step_by(2) {
            assert!(queue.contains(height), "height {} lost", height);
        }
        for height in (2..=50u64).step_by(2) {
            assert!(!queue.contains(height));
        }
    }

    #[test]
    fn test_recovery_queue_codec() {
        let mut queue = RecoveryQueue::new();
        queue.insert(100);
        queue.insert(360);
        queue.remove(100);
        queue.insert(500);

        let encoded = queue.encode();
        let decoded = RecoveryQueue::read(&mut &encoded[..]).unwrap();
        assert_eq!(decoded, queue);
        assert!(decoded.contains(360));
        assert!(decoded.contains(500));
        assert!(!decoded.contains(100));
    }

    #[test]
    fn test_recovery_queue_codec_rejects_duplicates() {
        let mut raw = Vec::new();
        2u32.write(&mut raw);
        100u64.write(&mut raw);
        100u64.write(&mut raw);
        assert!(RecoveryQueue::read(&mut &raw[..]).is_err());
    }

    #[test]
    fn test_transaction_sign_verify() {
        let (private, public) = keypair(1);
        let tx = Transaction::sign(
            &private,
            0,
            Instruction::Reveal {
                seed: digest(7),
                max: 10,
            },
        );
        assert_eq!(tx.public, public);
        assert!(tx.verify());

        // Tampering with the nonce invalidates the signature.
        let mut tampered = tx.clone();
        tampered.nonce = 1;
        assert!(!tampered.verify());

        // So does swapping the instruction.
        let mut tampered = tx;
        tampered.instruction = Instruction::Commit;
        assert!(!tampered.verify());
    }

    #[test]
    fn test_instruction_codec() {
        let instructions = vec![
            Instruction::Commit,
            Instruction::Reveal {
                seed: digest(9),
                max: u64::MAX,
            },
            Instruction::Instant { max: 1 },
            Instruction::Attest {
                height: 100,
                hash: digest(3),
            },
        ];
        for instruction in instructions {
            let encoded = instruction.encode();
            let decoded = Instruction::read(&mut &encoded[..]).unwrap();
            assert_eq!(decoded, instruction);
        }
        assert!(Instruction::read(&mut &[99u8][..]).is_err());
    }

    #[test]
    fn test_key_encodings_are_distinct() {
        let (_, public) = keypair(2);
        let keys = vec![
            Key::Account(public),
            Key::Seed(digest(0)),
            Key::Captured(0),
            Key::Pending,
            Key::Recovery,
            Key::Counter,
        ];
        let mut encodings: Vec<Vec<u8>> = keys.iter().map(|k| k.encode().to_vec()).collect();
        encodings.sort();
        encodings.dedup();
        assert_eq!(encodings.len(), keys.len());
    }

    #[test]
    fn test_event_codec_ownership_and_failure() {
        let (_, public) = keypair(3);
        let events = vec![
            Event::OwnershipTransferred {
                previous: Some(public.clone()),
                new_owner: None,
            },
            Event::RandomFailed {
                player: public,
                error_code: 5,
                message: "hash not ready".to_string(),
            },
        ];
        for event in events {
            let encoded = event.encode();
            let decoded = Event::read(&mut &encoded[..]).unwrap();
            assert_eq!(decoded, event);
        }
    }
}
