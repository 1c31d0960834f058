//! Expression evaluator.
//!
//! Evaluates operator-typed expressions against live machine state without
//! ever mutating it. The grammar covers:
//! 1. **Operands:** Decimal and `0x` hex word literals, `$name` register
//!    operands (ABI names, `$pc`, `$xN`).
//! 2. **Operators:** Unary `*` (word deref through the address space) and
//!    `-`, binary `* / + - == != &&` with C precedence, and parentheses.
//!
//! Tokenizing uses a compiled regex rule table tried in order at the current
//! position; evaluation is a precedence climber over the token stream. Any
//! failure yields an [`ExprError`]; callers surface it as text and continue.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Read-only view of machine state for expression evaluation.
///
/// Implementations read registers and memory but must never write.
pub trait MachineView {
    /// Resolves a register operand by name (`"a0"`, `"x3"`, `"pc"`).
    fn reg(&self, name: &str) -> Option<u32>;

    /// Reads the aligned word containing `addr`, if accessible.
    fn read_word(&self, addr: u32) -> Option<u32>;
}

/// Why an expression failed to tokenize or evaluate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExprError {
    /// No token rule matched at the given byte position.
    #[error("unexpected character at position {0}")]
    BadToken(usize),
    /// A numeric literal did not fit in a 32-bit word.
    #[error("bad literal '{0}'")]
    BadLiteral(String),
    /// The expression ended where an operand or operator was required.
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    /// Tokens remained after a complete expression was parsed.
    #[error("trailing input after expression")]
    TrailingInput,
    /// A closing parenthesis was missing.
    #[error("expected ')'")]
    UnbalancedParen,
    /// A `$name` operand named no known register.
    #[error("unknown register '{0}'")]
    UnknownRegister(String),
    /// A deref touched memory the debugger cannot read.
    #[error("cannot access memory at {0:#010x}")]
    BadAddress(u32),
    /// Division by zero.
    #[error("division by zero")]
    DivideByZero,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Num(u32),
    Reg(String),
    Plus,
    Minus,
    Star,
    Slash,
    Eq,
    Ne,
    And,
    LParen,
    RParen,
}

#[derive(Clone, Copy)]
enum RuleKind {
    Space,
    Hex,
    Dec,
    Reg,
    Eq,
    Ne,
    And,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// Token rules, tried in order at the current position. Hex precedes decimal
/// so `0x10` is not lexed as `0` `x10`.
fn rules() -> &'static [(Regex, RuleKind)] {
    static RULES: OnceLock<Vec<(Regex, RuleKind)>> = OnceLock::new();
    RULES.get_or_init(|| {
        let table: &[(&str, RuleKind)] = &[
            (r"^ +", RuleKind::Space),
            (r"^0x[0-9a-fA-F]+", RuleKind::Hex),
            (r"^[0-9]+", RuleKind::Dec),
            (r"^\$\w+", RuleKind::Reg),
            (r"^==", RuleKind::Eq),
            (r"^!=", RuleKind::Ne),
            (r"^&&", RuleKind::And),
            (r"^\+", RuleKind::Plus),
            (r"^-", RuleKind::Minus),
            (r"^\*", RuleKind::Star),
            (r"^/", RuleKind::Slash),
            (r"^\(", RuleKind::LParen),
            (r"^\)", RuleKind::RParen),
        ];
        table
            .iter()
            .map(|(pat, kind)| {
                let re = Regex::new(pat).unwrap_or_else(|e| {
                    // The table is static; a bad pattern is a build defect.
                    panic!("bad token rule {pat:?}: {e}")
                });
                (re, *kind)
            })
            .collect()
    })
}

fn tokenize(text: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let mut matched = false;
        for (re, kind) in rules() {
            let Some(m) = re.find(rest) else { continue };
            let lexeme = m.as_str();
            match kind {
                RuleKind::Space => {}
                RuleKind::Hex => {
                    let value = u32::from_str_radix(&lexeme[2..], 16)
                        .map_err(|_| ExprError::BadLiteral(lexeme.to_string()))?;
                    tokens.push(Token::Num(value));
                }
                RuleKind::Dec => {
                    let value = lexeme
                        .parse::<u32>()
                        .map_err(|_| ExprError::BadLiteral(lexeme.to_string()))?;
                    tokens.push(Token::Num(value));
                }
                RuleKind::Reg => tokens.push(Token::Reg(lexeme[1..].to_string())),
                RuleKind::Eq => tokens.push(Token::Eq),
                RuleKind::Ne => tokens.push(Token::Ne),
                RuleKind::And => tokens.push(Token::And),
                RuleKind::Plus => tokens.push(Token::Plus),
                RuleKind::Minus => tokens.push(Token::Minus),
                RuleKind::Star => tokens.push(Token::Star),
                RuleKind::Slash => tokens.push(Token::Slash),
                RuleKind::LParen => tokens.push(Token::LParen),
                RuleKind::RParen => tokens.push(Token::RParen),
            }
            pos += m.end();
            matched = true;
            break;
        }
        if !matched {
            return Err(ExprError::BadToken(pos));
        }
    }
    Ok(tokens)
}

/// Evaluates `text` against the given machine view.
pub fn eval(text: &str, view: &dyn MachineView) -> Result<u32, ExprError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        view,
    };
    let value = parser.binary(0)?;
    if parser.pos != parser.tokens.len() {
        return Err(ExprError::TrailingInput);
    }
    Ok(value)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    view: &'a dyn MachineView,
}

/// Binding strength of a binary operator; higher binds tighter.
fn precedence(token: &Token) -> Option<u8> {
    match token {
        Token::And => Some(1),
        Token::Eq | Token::Ne => Some(2),
        Token::Plus | Token::Minus => Some(3),
        Token::Star | Token::Slash => Some(4),
        _ => None,
    }
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn binary(&mut self, min_prec: u8) -> Result<u32, ExprError> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.peek().cloned() {
            let Some(prec) = precedence(&op) else { break };
            if prec < min_prec {
                break;
            }
            let _ = self.next();
            let rhs = self.binary(prec + 1)?;
            lhs = match op {
                Token::And => u32::from(lhs != 0 && rhs != 0),
                Token::Eq => u32::from(lhs == rhs),
                Token::Ne => u32::from(lhs != rhs),
                Token::Plus => lhs.wrapping_add(rhs),
                Token::Minus => lhs.wrapping_sub(rhs),
                Token::Star => lhs.wrapping_mul(rhs),
                Token::Slash => lhs.checked_div(rhs).ok_or(ExprError::DivideByZero)?,
                _ => unreachable!("precedence() admits only binary operators"),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<u32, ExprError> {
        match self.next().ok_or(ExprError::UnexpectedEnd)? {
            Token::Num(value) => Ok(value),
            Token::Reg(name) => self
                .view
                .reg(&name)
                .ok_or(ExprError::UnknownRegister(name)),
            Token::Star => {
                let addr = self.unary()?;
                self.view.read_word(addr).ok_or(ExprError::BadAddress(addr))
            }
            Token::Minus => Ok(self.unary()?.wrapping_neg()),
            Token::LParen => {
                let value = self.binary(0)?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(ExprError::UnbalancedParen),
                }
            }
            _ => Err(ExprError::BadToken(self.pos.saturating_sub(1))),
        }
    }
}
