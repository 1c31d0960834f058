//! RAM window tests: containment, word access, byte-lane masking.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use lockstep_core::soc::Memory;

const BASE: u32 = 0x8000_0000;

#[test]
fn containment_bounds() {
    let mem = Memory::new(BASE, 0x100);
    assert!(mem.contains(BASE));
    assert!(mem.contains(BASE + 0xff));
    assert!(!mem.contains(BASE + 0x100));
    assert!(!mem.contains(BASE - 4), "below-base must not wrap inside");
    assert!(!mem.contains(0));
}

#[test]
fn ragged_sizes_round_down_to_whole_words() {
    // A size that is not a multiple of 4 must not leave a contained aligned
    // address with a partial word of backing.
    let mut mem = Memory::new(BASE, 10);
    assert_eq!(mem.len(), 8);
    assert!(mem.contains(BASE + 7));
    assert!(!mem.contains(BASE + 8));

    // The last contained word is fully usable.
    mem.write_word(BASE + 4, 0xdead_beef, 0b1111);
    assert_eq!(mem.read_word(BASE + 4), 0xdead_beef);
}

#[test]
fn words_are_little_endian() {
    let mut mem = Memory::new(BASE, 0x10);
    mem.load(&[0x78, 0x56, 0x34, 0x12]);
    assert_eq!(mem.read_word(BASE), 0x1234_5678);
}

#[rstest]
#[case(0b0001, 0x1122_3344, 0xaaaa_aa44)]
#[case(0b0010, 0x1122_3344, 0xaaaa_33aa)]
#[case(0b1000, 0x1122_3344, 0x11aa_aaaa)]
#[case(0b0110, 0x1122_3344, 0xaa22_33aa)]
#[case(0b1111, 0x1122_3344, 0x1122_3344)]
#[case(0b0000, 0x1122_3344, 0xaaaa_aaaa)]
fn write_word_touches_only_selected_lanes(
    #[case] wmask: u8,
    #[case] value: u32,
    #[case] expected: u32,
) {
    let mut mem = Memory::new(BASE, 0x10);
    mem.write_word(BASE + 4, 0xaaaa_aaaa, 0b1111);
    mem.write_word(BASE + 4, value, wmask);
    assert_eq!(mem.read_word(BASE + 4), expected);
}

#[test]
fn sub_word_stores_compose() {
    let mut mem = Memory::new(BASE, 0x10);
    // Four byte stores assemble one word without read-modify-write.
    for lane in 0..4u32 {
        let byte = 0x10 * (lane + 1);
        mem.write_word(BASE, byte << (lane * 8), 1 << lane);
    }
    assert_eq!(mem.read_word(BASE), 0x4030_2010);
}

#[test]
fn load_truncates_oversized_images() {
    let mut mem = Memory::new(BASE, 8);
    mem.load(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    assert_eq!(mem.bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn slice_copies_round_trip() {
    let mut mem = Memory::new(BASE, 0x20);
    mem.write_slice(BASE + 8, &[9, 8, 7, 6]);
    let mut out = [0u8; 4];
    mem.read_slice(BASE + 8, &mut out);
    assert_eq!(out, [9, 8, 7, 6]);
}

proptest! {
    #[test]
    fn full_word_write_reads_back(offset in 0u32..0x40, value: u32) {
        let addr = BASE + offset * 4;
        let mut mem = Memory::new(BASE, 0x100);
        mem.write_word(addr, value, 0b1111);
        prop_assert_eq!(mem.read_word(addr), value);
    }

    #[test]
    fn unselected_lanes_survive_any_store(value: u32, wmask in 0u8..16) {
        let mut mem = Memory::new(BASE, 0x10);
        mem.write_word(BASE, 0x5a5a_5a5a, 0b1111);
        mem.write_word(BASE, value, wmask);
        let word = mem.read_word(BASE).to_le_bytes();
        for (lane, byte) in word.iter().enumerate() {
            if wmask & (1 << lane) == 0 {
                prop_assert_eq!(*byte, 0x5a);
            }
        }
    }
}
