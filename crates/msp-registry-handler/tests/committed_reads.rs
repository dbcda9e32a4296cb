// crates/msp-registry-handler/tests/committed_reads.rs
// ============================================================================
// Module: Committed Manager Read Tests
// Description: Reader behavior across open proposals and commits.
// Purpose: Ensure readers see the old manager or the new one, never a mix.
// Dependencies: msp-registry-core, msp-registry-handler
// ============================================================================
//! ## Overview
//! Read handles keep serving the committed manager while a proposal is open,
//! switch on commit, and held snapshots keep their original provider set.
//!
//! Security posture: identity checks running concurrently with configuration
//! changes must never observe a partially applied set.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread;

use msp_registry_core::IdentityDeserializer;
use msp_registry_core::IdentityError;
use msp_registry_core::MspId;
use msp_registry_core::MspPrincipal;

use crate::common::Org;
use crate::common::builtin_handler;
use crate::common::signing_key;

/// Verifies a handle serves the committed set during a proposal and follows commit.
#[test]
fn handle_follows_commits_only() {
    let org1 = Org::new("org1", 1);
    let org2 = Org::new("org2", 2);
    let alice = signing_key(10);
    let mut handler = builtin_handler();
    handler.apply(&[org1.config()]).expect("genesis");
    let handle = handler.manager_handle();
    let snapshot = handle.current();

    handler.begin_config().expect("begin");
    handler.propose_msp(&org2.config()).expect("org2");
    handle.validate_identity(&org1.identity("alice", &alice)).expect("org1 while proposing");
    let err = handle.validate_identity(&org2.identity("alice", &alice)).err();
    assert_eq!(err, Some(IdentityError::UnknownMsp(MspId::new("org2"))));

    handler.commit_config().expect("commit");
    handle.validate_identity(&org2.identity("alice", &alice)).expect("org2 after commit");
    let err = handle.validate_identity(&org1.identity("alice", &alice)).err();
    assert_eq!(err, Some(IdentityError::UnknownMsp(MspId::new("org1"))));

    snapshot.validate_identity(&org1.identity("alice", &alice)).expect("snapshot keeps org1");
    assert!(snapshot.validate_identity(&org2.identity("alice", &alice)).is_err());
}

/// Verifies principal checks route through the committed set.
#[test]
fn principal_checks_use_committed_set() {
    let org1 = Org::new("org1", 1);
    let admin = signing_key(11);
    let mut body = org1.body();
    body.admins.push("root-admin".to_string());
    let mut handler = builtin_handler();
    handler.apply(&[body.to_msp_config().expect("encode")]).expect("genesis");

    let identity = org1.identity("root-admin", &admin);
    handler.satisfies_principal(&identity, &MspPrincipal::admin("org1")).expect("admin");
    let member = org1.identity("alice", &signing_key(10));
    let err = handler.satisfies_principal(&member, &MspPrincipal::admin("org1")).err();
    assert!(matches!(err, Some(IdentityError::PrincipalUnsatisfied(_))));
}

/// Verifies concurrent readers switch from the old set to the new one exactly once.
#[test]
fn concurrent_readers_observe_a_single_switch() {
    let org1 = Org::new("org1", 1);
    let org2 = Org::new("org2", 2);
    let alice = signing_key(10);
    let identity = org1.identity("alice", &alice);
    let mut handler = builtin_handler();
    handler.apply(&[org1.config()]).expect("genesis");
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handler.manager_handle();
                let identity = identity.clone();
                let done = &done;
                scope.spawn(move || {
                    let mut switched = false;
                    loop {
                        let finished = done.load(Ordering::SeqCst);
                        match handle.validate_identity(&identity) {
                            Ok(_) => assert!(!switched, "reader saw org1 again after the swap"),
                            Err(IdentityError::UnknownMsp(id)) if id.as_str() == "org1" => {
                                switched = true;
                            }
                            Err(err) => panic!("unexpected reader error: {err}"),
                        }
                        if finished {
                            return switched;
                        }
                    }
                })
            })
            .collect();

        handler.begin_config().expect("begin");
        handler.propose_msp(&org2.config()).expect("org2");
        handler.commit_config().expect("commit");
        done.store(true, Ordering::SeqCst);

        for reader in readers {
            assert!(reader.join().expect("reader thread"), "reader never saw the new set");
        }
    });
}
