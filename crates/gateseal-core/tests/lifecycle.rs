//! End-to-end lifecycle of a GateSeal instance against mock resources.

use std::sync::Arc;

use gateseal_core::{
    GateSeal, GateSealError, GateSealParams, GateSealStatus, MockFixture, ReentrantSealable,
    SealableMock, SharedGateSeal,
};
use gateseal_types::{Address, SECONDS_PER_DAY};

const START: u64 = 1_750_000_000;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("gateseal_core=debug")
        .with_test_writer()
        .try_init();
}

fn committee() -> Address {
    Address::derive(b"emergency-committee")
}

fn params(sealables: Vec<Address>) -> GateSealParams {
    GateSealParams::new(
        committee(),
        SECONDS_PER_DAY * 7,
        sealables,
        SECONDS_PER_DAY * 365,
        5,
        SECONDS_PER_DAY * 14,
    )
}

fn shared(fixture: &MockFixture) -> SharedGateSeal {
    let seal = GateSeal::new(
        Address::derive(b"gate-seal"),
        params(fixture.addresses().to_vec()),
        fixture.env(),
    )
    .unwrap();
    SharedGateSeal::new(seal)
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[test]
fn seal_one_of_two_then_everything_is_expired() {
    init_tracing();
    let fixture = MockFixture::new(START, 2);
    let (r1, r2) = (fixture.addresses()[0], fixture.addresses()[1]);
    let seal = shared(&fixture);

    let records = seal.seal(&committee(), &[r1]).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].resource, r1);
    assert_eq!(fixture.log.sealed(), records);
    assert_eq!(seal.read(|s| s.status()).unwrap(), GateSealStatus::Expired);
    assert!(fixture.mocks()[0].actually_paused());
    assert_eq!(fixture.mocks()[0].paused_until(), START + SECONDS_PER_DAY * 7);
    assert!(!fixture.mocks()[1].actually_paused());

    assert_eq!(
        seal.seal(&committee(), &[r2]).unwrap_err(),
        GateSealError::Expired
    );
    assert_eq!(
        seal.prolong_lifetime(&committee()).unwrap_err(),
        GateSealError::Expired
    );
    assert_eq!(fixture.log.len(), 1);
}

#[test]
fn prolong_through_every_renewal_then_expire_naturally() {
    init_tracing();
    let fixture = MockFixture::new(START, 1);
    let seal = shared(&fixture);

    for round in 1..=5u32 {
        let expiry = seal.read(|s| s.expiry_timestamp()).unwrap();
        fixture.clock.set(expiry - SECONDS_PER_DAY);
        let used = seal.prolong_lifetime(&committee()).unwrap();
        assert_eq!(used.new_expiry, expiry + SECONDS_PER_DAY * 365);
        assert_eq!(used.prolongations_remaining, 5 - round);
    }

    let expiry = seal.read(|s| s.expiry_timestamp()).unwrap();
    assert_eq!(expiry, START + SECONDS_PER_DAY * 365 * 6);
    fixture.clock.set(expiry - 1);
    assert_eq!(
        seal.prolong_lifetime(&committee()).unwrap_err(),
        GateSealError::ProlongationsExhausted
    );

    fixture.clock.set(expiry);
    assert_eq!(
        seal.seal(&committee(), fixture.addresses()).unwrap_err(),
        GateSealError::Expired
    );
    assert_eq!(fixture.log.count("ProlongationUsed"), 5);
    assert_eq!(fixture.log.count("Sealed"), 0);
}

#[test]
fn failed_seal_can_be_retried_with_a_smaller_subset() {
    init_tracing();
    let fixture = MockFixture::new(START, 3);
    fixture.replace(2, SealableMock::unpausable(fixture.clock.clone()));
    let seal = shared(&fixture);

    assert_eq!(
        seal.seal(&committee(), fixture.addresses()).unwrap_err(),
        GateSealError::SealFailure(vec![2])
    );
    assert_eq!(seal.read(|s| s.status()).unwrap(), GateSealStatus::Active);
    assert!(fixture.log.is_empty());

    let records = seal.seal(&committee(), &fixture.addresses()[..2]).unwrap();
    assert_eq!(records.len(), 2);
    assert!(seal.read(|s| s.is_expired()).unwrap());
}

// ---------------------------------------------------------------------------
// Misbehaving resources
// ---------------------------------------------------------------------------

#[test]
fn budget_burning_resource_still_seals() {
    let fixture = MockFixture::new(START, 2);
    fixture.replace(0, SealableMock::budget_burner(fixture.clock.clone(), 100_000));
    let seal = shared(&fixture);

    assert_eq!(seal.seal(&committee(), fixture.addresses()).unwrap().len(), 2);
    assert!(fixture.mocks()[0].actually_paused());
}

#[test]
fn compensation_unwinds_pauses_of_aborted_seal() {
    let fixture = MockFixture::new(START, 4);
    fixture.replace(3, SealableMock::reverting(fixture.clock.clone()));
    let seal = shared(&fixture);

    assert!(seal.seal(&committee(), fixture.addresses()).is_err());
    for mock in &fixture.mocks()[..3] {
        assert_eq!(mock.pause_calls(), 1);
        assert!(!mock.actually_paused());
        assert_eq!(mock.paused_until(), 0);
    }
}

#[test]
fn compensation_restores_pre_existing_pause_deadline() {
    let fixture = MockFixture::new(START, 2);
    fixture.mocks()[0].force_pause_for(SECONDS_PER_DAY);
    fixture.replace(1, SealableMock::reverting(fixture.clock.clone()));
    let seal = shared(&fixture);

    assert_eq!(
        seal.seal(&committee(), fixture.addresses()).unwrap_err(),
        GateSealError::SealFailure(vec![1])
    );
    // Still paused, but only until its own deadline.
    assert!(fixture.mocks()[0].actually_paused());
    assert_eq!(fixture.mocks()[0].paused_until(), START + SECONDS_PER_DAY);
    assert_eq!(fixture.mocks()[0].pause_calls(), 1);
}

// ---------------------------------------------------------------------------
// Re-entrancy
// ---------------------------------------------------------------------------

#[test]
fn resource_calling_back_in_is_rejected() {
    init_tracing();
    let fixture = MockFixture::new(START, 2);
    let reentrant = Arc::new(ReentrantSealable::new(
        fixture.clock.clone(),
        fixture.addresses()[..1].to_vec(),
    ));
    let sneaky = Address::derive(b"sneaky");
    fixture.registry.register(sneaky, reentrant.clone());

    let mut sealables = fixture.addresses().to_vec();
    sealables.push(sneaky);
    let seal = SharedGateSeal::new(
        GateSeal::new(Address::derive(b"gate-seal"), params(sealables.clone()), fixture.env())
            .unwrap(),
    );
    reentrant.arm(seal.downgrade(), committee());

    // Move into the prolongation window so a nested prolong would otherwise succeed.
    let expiry = seal.read(|s| s.expiry_timestamp()).unwrap();
    fixture.clock.set(expiry - 1);

    let records = seal.seal(&committee(), &sealables).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(
        reentrant.attempts(),
        vec![GateSealError::ReentrantCall, GateSealError::ReentrantCall]
    );
    assert!(reentrant.actually_paused());
    assert_eq!(seal.read(|s| s.prolongations_used()).unwrap(), 0);
    assert_eq!(seal.read(|s| s.expiry_timestamp()).unwrap(), expiry - 1);
    assert_eq!(fixture.log.count("ProlongationUsed"), 0);
    assert_eq!(fixture.log.count("Sealed"), 3);
}
