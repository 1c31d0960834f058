//! Expression evaluator tests.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use lockstep_core::sdb::expr::{self, ExprError};

use crate::common::mocks::TableView;

fn view() -> TableView {
    TableView {
        regs: vec![
            ("a0", 16),
            ("t0", 0x8000_0000),
            ("pc", 0x8000_0004),
            ("zero", 0),
        ],
        mem: vec![(0x8000_0000, 0xdead_beef), (0x8000_0010, 3)],
    }
}

fn eval(text: &str) -> Result<u32, ExprError> {
    expr::eval(text, &view())
}

#[test]
fn literals() {
    assert_eq!(eval("0"), Ok(0));
    assert_eq!(eval("4096"), Ok(4096));
    assert_eq!(eval("0x10"), Ok(16), "hex must not lex as 0 then x10");
    assert_eq!(eval("0xFFFFffff"), Ok(u32::MAX));
}

#[test]
fn oversized_literals_are_rejected() {
    assert_eq!(
        eval("4294967296"),
        Err(ExprError::BadLiteral("4294967296".into()))
    );
    assert!(matches!(eval("0x100000000"), Err(ExprError::BadLiteral(_))));
}

#[test]
fn register_operands() {
    assert_eq!(eval("$a0"), Ok(16));
    assert_eq!(eval("$pc"), Ok(0x8000_0004));
    assert_eq!(eval("$zero + 1"), Ok(1));
    assert_eq!(
        eval("$nosuch"),
        Err(ExprError::UnknownRegister("nosuch".into()))
    );
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(eval("1 + 2 * 3"), Ok(7));
    assert_eq!(eval("(1 + 2) * 3"), Ok(9));
    assert_eq!(eval("8 / 2 + 1"), Ok(5));
    assert_eq!(eval("10 - 2 - 3"), Ok(5), "same precedence is left-assoc");
}

#[test]
fn comparisons_and_conjunction() {
    assert_eq!(eval("1 == 1"), Ok(1));
    assert_eq!(eval("1 != 1"), Ok(0));
    assert_eq!(eval("$a0 == 16 && $pc != 0"), Ok(1));
    assert_eq!(eval("0 && 1"), Ok(0));
    // Comparison binds tighter than conjunction.
    assert_eq!(eval("1 == 1 && 2 == 3"), Ok(0));
}

#[test]
fn unary_minus_wraps() {
    assert_eq!(eval("-1"), Ok(u32::MAX));
    assert_eq!(eval("0 - 1"), Ok(u32::MAX));
    assert_eq!(eval("--5"), Ok(5));
}

#[test]
fn dereference_reads_memory() {
    assert_eq!(eval("*0x80000000"), Ok(0xdead_beef));
    assert_eq!(eval("*$t0"), Ok(0xdead_beef));
    assert_eq!(eval("*($t0 + 0x10)"), Ok(3));
}

#[test]
fn dereference_of_unreadable_memory_fails() {
    assert_eq!(eval("*0x1000"), Err(ExprError::BadAddress(0x1000)));
}

#[test]
fn multiply_and_dereference_disambiguate_by_position() {
    // First `*` is binary (operands on both sides), second is a deref.
    assert_eq!(eval("2 * *$t0 == *$t0 + *$t0"), Ok(1));
}

#[test]
fn division_by_zero_is_reported() {
    assert_eq!(eval("5 / 0"), Err(ExprError::DivideByZero));
    assert_eq!(eval("5 / (1 - 1)"), Err(ExprError::DivideByZero));
}

#[test]
fn syntax_errors() {
    assert_eq!(eval(""), Err(ExprError::UnexpectedEnd));
    assert_eq!(eval("1 +"), Err(ExprError::UnexpectedEnd));
    assert_eq!(eval("(1 + 2"), Err(ExprError::UnbalancedParen));
    assert_eq!(eval("1 2"), Err(ExprError::TrailingInput));
    assert_eq!(eval("1 # 2"), Err(ExprError::BadToken(2)));
}

#[test]
fn whitespace_is_insignificant() {
    assert_eq!(eval("  1+2 *  3 "), Ok(7));
}

proptest! {
    #[test]
    fn decimal_literals_evaluate_to_themselves(value: u32) {
        prop_assert_eq!(eval(&value.to_string()), Ok(value));
    }

    #[test]
    fn addition_wraps_like_the_machine(a: u32, b: u32) {
        prop_assert_eq!(eval(&format!("{a} + {b}")), Ok(a.wrapping_add(b)));
    }

    #[test]
    fn equality_agrees_with_the_host(a: u32, b: u32) {
        prop_assert_eq!(eval(&format!("{a} == {b}")), Ok(u32::from(a == b)));
    }
}
