//! Error types for the compiler, the DFA algebra, and recognition.
//!
//! These follow the teacher's `DfaParseError`/`NfaParseError` shape: small `thiserror`-derived
//! enums with one variant per failure mode and an interpolated `#[error("...")]` message, rather
//! than a single stringly-typed error.

use crate::alphabet::Symbol;
use thiserror::Error;

/// A syntactic or semantic failure while parsing a regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected '{found}' at position {position} while parsing {expected}")]
    Unexpected {
        position: usize,
        expected: &'static str,
        found: char,
    },
    #[error("unexpected end of input at position {position} while parsing {expected}")]
    UnexpectedEnd {
        position: usize,
        expected: &'static str,
    },
    #[error("unterminated escape sequence at position {position}")]
    UnterminatedEscape { position: usize },
    #[error("unclosed group opened at position {position}")]
    UnclosedGroup { position: usize },
    #[error("unclosed count opened at position {position}")]
    UnclosedCount { position: usize },
    #[error("descending range {a}-{b} at position {position}: lower bound must not exceed upper bound")]
    DescendingRange { position: usize, a: u32, b: u32 },
}

/// A failure raised by recognition or by DFA algebra over an already-built automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("symbol '{0}' is not a member of this automaton's alphabet")]
    UnknownSymbol(Symbol),
    #[error("the two automata do not share the same ordered alphabet")]
    AlphabetMismatch,
    #[error("operation requires a complete automaton, but it is partial and auto-completion is disabled")]
    IncompleteAutomaton,
}

/// The single error type returned by [`crate::compile`], wrapping the only way compilation can
/// fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}
