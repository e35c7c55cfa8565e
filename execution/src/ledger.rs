use commonware_cryptography::sha256::Digest;
use fairdraw_types::Beacon;

/// Widest height gap across which the engine will still attempt an automatic
/// capture. Kept strictly inside the host's own retention limit (roughly the
/// most recent 256 heights) so a lookup at the edge of the window cannot race
/// the host's pruning.
pub const HASH_LOOKUP_WINDOW: u64 = 250;

/// Capability the host ledger injects into the engine.
///
/// The beacon returned by [`Ledger::beacon`] must be unpredictable before its
/// height finalizes and unbiasable by any single proposer. Both properties are
/// assumed from the hosting ledger's consensus; the engine does not (and
/// cannot) re-derive them.
pub trait Ledger {
    /// Current ledger height. At least 1 whenever transactions execute
    /// (height 0 is genesis and never executes).
    fn height(&self) -> u64;

    /// Timestamp of the executing block.
    fn timestamp(&self) -> u64;

    /// Beacon value finalized for the current height.
    fn beacon(&self) -> Beacon;

    /// Remaining compute budget of the executing call, mixed into seed
    /// derivation as a caller-influenced entropy field.
    fn fuel_remaining(&self) -> u64;

    /// Historical block hash for `height`, or `None` once the host has pruned
    /// it (heights older than its retention window) or if `height` has not
    /// completed yet.
    fn hash_of(&self, height: u64) -> Option<Digest>;
}
