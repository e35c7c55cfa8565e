//! End-to-end flows of the commit-reveal protocol: capture inside the lookup
//! window, expiry into recovery, attestation, and the failure modes around
//! them. Each block is one `Layer`; committed changes land in `Memory`
//! between blocks, the way a host applies them.

use crate::mocks::{create_account_keypair, MockLedger};
use crate::query;
use crate::roles::Roles;
use crate::state::{Memory, State};
use crate::{Layer, RandomError};
use commonware_cryptography::ed25519::PublicKey;
use commonware_cryptography::sha256::Digest;
use commonware_runtime::deterministic::Runner;
use commonware_runtime::Runner as _;
use fairdraw_types::{Event, Key, Value};

fn participants() -> (Roles, PublicKey, PublicKey) {
    let (_, owner) = create_account_keypair(0);
    let (_, attester) = create_account_keypair(100);
    let mut roles = Roles::new(owner.clone());
    roles.add_attester(&owner, attester.clone()).unwrap();
    (roles, owner, attester)
}

async fn commit_block(
    state: &mut Memory,
    ledger: &MockLedger,
    roles: &Roles,
    player: &PublicKey,
) -> (Digest, Vec<Event>) {
    let mut layer = Layer::new(&*state, ledger, roles);
    let (seed, events) = layer.commit_seed(player).await.unwrap();
    let changes = layer.commit();
    state.apply(changes).await.unwrap();
    (seed, events)
}

#[test]
fn test_reveal_blocked_until_next_height_captures() {
    // Scenario A/B: commit at height 100; reveal fails until a later
    // state-mutating call captures height 100's hash.
    let executor = Runner::default();
    executor.start(|_| async move {
        let mut state = Memory::default();
        let mut ledger = MockLedger::new();
        ledger.advance_to(100);
        let (roles, _, _) = participants();
        let (_, player) = create_account_keypair(1);

        let (seed, _) = commit_block(&mut state, &ledger, &roles, &player).await;

        // Same height: the hash does not exist yet.
        {
            let mut layer = Layer::new(&state, &ledger, &roles);
            let err = layer.reveal(&player, &seed, 10).await.unwrap_err();
            assert!(matches!(err, RandomError::HashNotReady { height: 100 }));
        }

        // Next height: the reveal itself triggers the capture.
        ledger.advance(1);
        {
            let mut layer = Layer::new(&state, &ledger, &roles);
            let (number, events) = layer.reveal(&player, &seed, 10).await.unwrap();
            assert!((1..=10).contains(&number));
            assert!(events
                .iter()
                .any(|e| matches!(e, Event::HashCaptured { height: 100, .. })));

            // Repeat reveals are pure: same seed, same hash, same number.
            let (again, _) = layer.reveal(&player, &seed, 10).await.unwrap();
            assert_eq!(number, again);

            let changes = layer.commit();
            state.apply(changes).await.unwrap();
        }

        // The slot is disarmed once the capture lands.
        assert_eq!(query::pending_age(&state, 101).await.unwrap(), 0);
    });
}

#[test]
fn test_missed_window_recovers_through_attestation() {
    // Scenario C: 260 heights pass between the commit and the next call, so
    // the hash can only arrive through an attester.
    let executor = Runner::default();
    executor.start(|_| async move {
        let mut state = Memory::default();
        let mut ledger = MockLedger::new();
        ledger.advance_to(100);
        let (roles, _, attester) = participants();
        let (_, player) = create_account_keypair(1);

        let (seed, _) = commit_block(&mut state, &ledger, &roles, &player).await;
        assert_eq!(query::pending_age(&state, 100).await.unwrap(), 0);

        ledger.advance_to(360);
        assert_eq!(query::pending_age(&state, 360).await.unwrap(), 260);

        // The next commit expires height 100 into the recovery queue.
        let (_, events) = commit_block(&mut state, &ledger, &roles, &player).await;
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::CaptureMissed { height: 100 })));
        assert_eq!(query::recovery_len(&state).await.unwrap(), 1);

        // Still not revealable.
        {
            let mut layer = Layer::new(&state, &ledger, &roles);
            let err = layer.reveal(&player, &seed, 10).await.unwrap_err();
            assert!(matches!(err, RandomError::HashNotReady { height: 100 }));
        }

        // Only an attester may supply the missing hash.
        let hash = Digest::from([42u8; 32]);
        {
            let mut layer = Layer::new(&state, &ledger, &roles);
            let err = layer.attest(&player, 100, &hash).await.unwrap_err();
            assert!(matches!(err, RandomError::PermissionDenied));
        }
        {
            let mut layer = Layer::new(&state, &ledger, &roles);
            let (applied, events) = layer.attest(&attester, 100, &hash).await.unwrap();
            assert!(applied);
            assert!(matches!(
                events.first(),
                Some(Event::HashAttested { height: 100, .. })
            ));
            let changes = layer.commit();
            state.apply(changes).await.unwrap();
        }
        assert_eq!(query::recovery_len(&state).await.unwrap(), 0);

        // The seed now reveals, and the captured value is immutable.
        {
            let mut layer = Layer::new(&state, &ledger, &roles);
            let (number, _) = layer.reveal(&player, &seed, 10).await.unwrap();
            assert!((1..=10).contains(&number));

            let err = layer.attest(&attester, 100, &hash).await.unwrap_err();
            assert!(matches!(err, RandomError::AlreadySet { height: 100 }));
        }
    });
}

#[test]
fn test_attested_hash_is_immutable_after_automatic_capture() {
    let executor = Runner::default();
    executor.start(|_| async move {
        let mut state = Memory::default();
        let mut ledger = MockLedger::new();
        ledger.advance_to(100);
        let (roles, _, attester) = participants();
        let (_, player) = create_account_keypair(1);

        commit_block(&mut state, &ledger, &roles, &player).await;
        ledger.advance(1);
        // Trigger the automatic capture of height 100.
        commit_block(&mut state, &ledger, &roles, &player).await;

        let mut layer = Layer::new(&state, &ledger, &roles);
        let err = layer
            .attest(&attester, 100, &Digest::from([1u8; 32]))
            .await
            .unwrap_err();
        assert!(matches!(err, RandomError::AlreadySet { height: 100 }));
    });
}

#[test]
fn test_reveal_with_zero_max_is_rejected_and_rolled_back() {
    // Scenario D, plus the atomicity contract: the failed reveal must also
    // undo the capture its check_pending performed.
    let executor = Runner::default();
    executor.start(|_| async move {
        let mut state = Memory::default();
        let mut ledger = MockLedger::new();
        ledger.advance_to(100);
        let (roles, _, _) = participants();
        let (_, player) = create_account_keypair(1);

        let (seed, _) = commit_block(&mut state, &ledger, &roles, &player).await;
        ledger.advance(1);

        let mut layer = Layer::new(&state, &ledger, &roles);
        let err = layer.reveal(&player, &seed, 0).await.unwrap_err();
        assert!(matches!(err, RandomError::InvalidDivisor));
        let changes = layer.commit();
        assert!(changes.is_empty(), "failed reveal must stage nothing");
        state.apply(changes).await.unwrap();

        // The slot is still armed: the capture was rolled back with the rest.
        assert_eq!(query::pending_age(&state, 101).await.unwrap(), 1);
    });
}

#[test]
fn test_attest_for_unqueued_height_is_a_noop() {
    // Scenario E: attesting a height the engine never flagged succeeds with
    // no state change.
    let executor = Runner::default();
    executor.start(|_| async move {
        let mut state = Memory::default();
        let mut ledger = MockLedger::new();
        ledger.advance_to(100);
        let (roles, _, attester) = participants();

        let mut layer = Layer::new(&state, &ledger, &roles);
        let (applied, events) = layer
            .attest(&attester, 42, &Digest::from([7u8; 32]))
            .await
            .unwrap();
        assert!(!applied);
        assert!(events.is_empty());
        let changes = layer.commit();
        assert!(changes.is_empty());
        state.apply(changes).await.unwrap();

        assert_eq!(query::recovery_len(&state).await.unwrap(), 0);
        assert!(state.get(&Key::Captured(42)).await.unwrap().is_none());
    });
}

#[test]
fn test_check_pending_is_idempotent() {
    let executor = Runner::default();
    executor.start(|_| async move {
        let mut state = Memory::default();
        let mut ledger = MockLedger::new();
        ledger.advance_to(100);
        let (roles, _, _) = participants();
        let (_, player) = create_account_keypair(1);

        commit_block(&mut state, &ledger, &roles, &player).await;
        ledger.advance(1);

        let mut layer = Layer::new(&state, &ledger, &roles);
        let events = layer.check_pending().await.unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::HashCaptured { height: 100, .. })));

        // A second pass over unchanged height finds the slot empty.
        let events = layer.check_pending().await.unwrap();
        assert!(events.is_empty());
        let changes = layer.commit();
        state.apply(changes).await.unwrap();
        assert_eq!(query::pending_age(&state, 101).await.unwrap(), 0);
    });
}

#[test]
fn test_commit_at_armed_height_is_a_noop_for_the_slot() {
    // Two commits in the same height share the eventual hash; the second
    // re-arms the slot at the same value.
    let executor = Runner::default();
    executor.start(|_| async move {
        let mut state = Memory::default();
        let mut ledger = MockLedger::new();
        ledger.advance_to(100);
        let (roles, _, _) = participants();
        let (_, alice) = create_account_keypair(1);
        let (_, bob) = create_account_keypair(2);

        let (seed_a, _) = commit_block(&mut state, &ledger, &roles, &alice).await;
        let (seed_b, events) = commit_block(&mut state, &ledger, &roles, &bob).await;
        assert_ne!(seed_a, seed_b);
        // The slot was already armed at 100; no capture or expiry happened.
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::HashCaptured { .. } | Event::CaptureMissed { .. })));
        assert!(matches!(
            state.get(&Key::Pending).await.unwrap(),
            Some(Value::Pending(100))
        ));

        // Both seeds reveal against the same captured hash.
        ledger.advance(1);
        let mut layer = Layer::new(&state, &ledger, &roles);
        let (number_a, _) = layer.reveal(&alice, &seed_a, 1000).await.unwrap();
        let (number_b, _) = layer.reveal(&bob, &seed_b, 1000).await.unwrap();
        assert!((1..=1000).contains(&number_a));
        assert!((1..=1000).contains(&number_b));
    });
}

#[test]
fn test_each_expiry_queues_a_height_exactly_once() {
    let executor = Runner::default();
    executor.start(|_| async move {
        let mut state = Memory::default();
        let mut ledger = MockLedger::new();
        ledger.advance_to(100);
        let (roles, _, _) = participants();
        let (_, player) = create_account_keypair(1);

        // Miss three separate commits, far enough apart that each expires.
        for target in [400u64, 700, 1000] {
            commit_block(&mut state, &ledger, &roles, &player).await;
            ledger.advance_to(target);
        }
        // One more call flushes the last armed height into the queue.
        commit_block(&mut state, &ledger, &roles, &player).await;

        // 100, 400 and 700 expired; 1000 is armed by the final commit.
        assert_eq!(query::recovery_len(&state).await.unwrap(), 3);
        match state.get(&Key::Recovery).await.unwrap() {
            Some(Value::Recovery(queue)) => {
                for height in [100u64, 400, 700] {
                    assert!(queue.contains(height), "height {} missing", height);
                }
                assert!(!queue.contains(1000));
            }
            other => panic!("unexpected recovery value: {:?}", other),
        }
        assert_eq!(query::pending_age(&state, 1000).await.unwrap(), 0);
    });
}

#[test]
fn test_committed_seeds_are_unique_across_blocks() {
    let executor = Runner::default();
    executor.start(|_| async move {
        let mut state = Memory::default();
        let mut ledger = MockLedger::new();
        ledger.advance_to(1);
        let (roles, _, _) = participants();
        let (_, player) = create_account_keypair(1);

        let mut seeds = Vec::new();
        for _ in 0..50 {
            let (seed, _) = commit_block(&mut state, &ledger, &roles, &player).await;
            seeds.push(seed);
            ledger.advance(1);
        }

        let unique = {
            let mut sorted: Vec<Vec<u8>> = seeds.iter().map(|s| s.as_ref().to_vec()).collect();
            sorted.sort();
            sorted.dedup();
            sorted.len()
        };
        assert_eq!(unique, seeds.len());

        // Every seed is registered with a real (>= 1) height.
        for seed in &seeds {
            match state.get(&Key::Seed(seed.clone())).await.unwrap() {
                Some(Value::SeedHeight(height)) => assert!(height >= 1),
                other => panic!("seed not registered: {:?}", other),
            }
        }
    });
}

#[test]
fn test_capture_still_works_at_window_edge() {
    let executor = Runner::default();
    executor.start(|_| async move {
        let mut state = Memory::default();
        let mut ledger = MockLedger::new();
        ledger.advance_to(100);
        let (roles, _, _) = participants();
        let (_, player) = create_account_keypair(1);

        let (seed, _) = commit_block(&mut state, &ledger, &roles, &player).await;

        // Exactly at the window boundary the capture still succeeds.
        ledger.advance_to(100 + crate::HASH_LOOKUP_WINDOW);
        let (_, events) = commit_block(&mut state, &ledger, &roles, &player).await;
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::HashCaptured { height: 100, .. })));

        let mut layer = Layer::new(&state, &ledger, &roles);
        let (number, _) = layer.reveal(&player, &seed, 6).await.unwrap();
        assert!((1..=6).contains(&number));
    });
}
