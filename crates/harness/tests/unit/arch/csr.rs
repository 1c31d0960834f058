//! Machine-mode CSR subset tests.

use pretty_assertions::assert_eq;

use lockstep_core::SimError;
use lockstep_core::arch::csr::{self, CsrFile};

#[test]
fn reset_values() {
    let csrs = CsrFile::new();
    assert_eq!(csrs.mstatus, 0x1800);
    assert_eq!(csrs.mtvec, 0);
    assert_eq!(csrs.mepc, 0);
    assert_eq!(csrs.mcause, 0);
}

#[test]
fn read_resolves_every_known_identifier() {
    let csrs = CsrFile::new();
    assert_eq!(csrs.read(csr::MSTATUS).unwrap(), 0x1800);
    assert_eq!(csrs.read(csr::MTVEC).unwrap(), 0);
    assert_eq!(csrs.read(csr::MEPC).unwrap(), 0);
    assert_eq!(csrs.read(csr::MCAUSE).unwrap(), 0);
}

#[test]
fn exchange_replaces_and_returns_old() {
    let mut csrs = CsrFile::new();
    let old = csrs.exchange(csr::MTVEC, 0x8000_0100).unwrap();
    assert_eq!(old, 0);
    assert_eq!(csrs.mtvec, 0x8000_0100);

    let old = csrs.exchange(csr::MSTATUS, 0).unwrap();
    assert_eq!(old, 0x1800);
    assert_eq!(csrs.mstatus, 0);
}

#[test]
fn set_bits_ors_and_returns_old() {
    let mut csrs = CsrFile::new();
    let old = csrs.set_bits(csr::MSTATUS, 0x0008).unwrap();
    assert_eq!(old, 0x1800);
    assert_eq!(csrs.mstatus, 0x1808);

    // A zero mask is a pure read.
    let old = csrs.set_bits(csr::MSTATUS, 0).unwrap();
    assert_eq!(old, 0x1808);
    assert_eq!(csrs.mstatus, 0x1808);
}

#[test]
fn unknown_identifier_is_fatal() {
    let mut csrs = CsrFile::new();
    for result in [
        csrs.read(0x306).err(),
        csrs.exchange(0xc00, 1).err(),
        csrs.set_bits(0x000, 1).err(),
    ] {
        match result {
            Some(SimError::InvalidCsr { .. }) => {}
            other => panic!("expected InvalidCsr, got {other:?}"),
        }
    }
    // Nothing was modified by the failed accesses.
    assert_eq!(csrs, CsrFile::new());
}
