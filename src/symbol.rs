//! Binary symbols and fixed-width integer coding
//!
//! Everything the context tree sees is a sequence of [`Symbol`]s. Actions,
//! observations and rewards are integers that are turned into fixed-width
//! symbol sequences before they reach the model, least significant bit first.

use std::fmt;

use crate::{AgentError, Result};

/// A single binary symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Zero,
    One,
}

impl Symbol {
    /// Both symbols, in index order
    pub const ALL: [Symbol; 2] = [Symbol::Zero, Symbol::One];

    /// Returns 0 for `Zero` and 1 for `One`
    pub fn index(self) -> usize {
        match self {
            Symbol::Zero => 0,
            Symbol::One => 1,
        }
    }

    /// Returns true for `One`
    pub fn is_set(self) -> bool {
        self == Symbol::One
    }
}

impl From<bool> for Symbol {
    fn from(bit: bool) -> Self {
        if bit {
            Symbol::One
        } else {
            Symbol::Zero
        }
    }
}

impl TryFrom<u8> for Symbol {
    type Error = AgentError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Symbol::Zero),
            1 => Ok(Symbol::One),
            other => Err(AgentError::InvalidSymbol(other)),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Parses a string of `0`/`1` characters into symbols
///
/// Any other character is reported as [`AgentError::InvalidSymbol`].
pub fn parse_symbols(bits: &str) -> Result<Vec<Symbol>> {
    bits.bytes()
        .map(|b| Symbol::try_from(b.wrapping_sub(b'0')).map_err(|_| AgentError::InvalidSymbol(b)))
        .collect()
}

/// Encodes `value` as exactly `bits` symbols, least significant bit first
///
/// # Errors
///
/// Returns [`AgentError::ValueOutOfRange`] if `value` does not fit in `bits` bits.
pub fn encode(value: u64, bits: usize) -> Result<Vec<Symbol>> {
    if bits < 64 && value >> bits != 0 {
        return Err(AgentError::ValueOutOfRange { value, bits });
    }

    Ok((0..bits)
        .map(|i| Symbol::from(i < 64 && (value >> i) & 1 == 1))
        .collect())
}

/// Decodes a symbol sequence produced by [`encode`]
///
/// Symbols beyond the 64th are ignored.
pub fn decode(symbols: &[Symbol]) -> u64 {
    symbols
        .iter()
        .take(64)
        .enumerate()
        .fold(0, |value, (i, s)| value | ((s.index() as u64) << i))
}

/// Number of bits needed to represent `value` (never less than one)
pub fn bits_required(value: u64) -> usize {
    (64 - value.leading_zeros() as usize).max(1)
}
