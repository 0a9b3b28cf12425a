//! # setrex
//!
//! `setrex` compiles regular expressions - with negation, intersection, set difference and
//! explicit repetition counts on top of the usual alternation, concatenation and Kleene star -
//! into deterministic finite automata, and lets you recognise and enumerate the words they
//! accept.
//!
//! ## Usage
//!
//! ```rust
//! use setrex::compile;
//!
//! let dfa = compile(r"(a|b)*abb").unwrap();
//! assert!(dfa.accepts("aababb").unwrap());
//! assert!(!dfa.accepts("abba").unwrap());
//!
//! let mut words = setrex::enumerator(&dfa);
//! assert_eq!(words.next().unwrap().to_string(), "abb");
//! assert_eq!(words.next().unwrap().to_string(), "aabb");
//! ```
//!
//! ## Syntax
//!
//! * `a`, `b`, ... - literal symbols. The metacharacters `( ) [ ] ~ - | ^ * &` must be escaped
//!   with `\` to appear literally.
//! * `\A`, `\a`, `\0`, `\1` - character classes for `A..Z`, `a..z`, `0..9`, `1..9`.
//! * `RS` - concatenation (no explicit operator).
//! * `R|S`, `R&S`, `R-S` - union, intersection, set difference.
//! * `~R` - complement over the automaton's inferred alphabet.
//! * `R*` - Kleene star (zero or more).
//! * `R^n` - exactly `n` repetitions (`R^0` is the empty-word language).
//! * `R^[a-b]` - between `a` and `b` repetitions, inclusive.
//!
//! The alphabet of the resulting DFA is inferred from every literal symbol the source can emit;
//! see [`regex::parser::infer_alphabet`].
//!
//! ## Operations
//!
//! * [`compile`] parses and lowers a regex straight to a complete [`dfa::Dfa`].
//! * [`accepts`] and [`dfa::Dfa::accepts`] check membership.
//! * [`enumerator`] and [`dfa::Dfa::enumerator`] lazily enumerate accepted words in
//!   `(length, alphabet order)` order.
//! * [`dfa::Dfa::combine`], [`dfa::Dfa::negate`], [`dfa::Dfa::concat`] and [`dfa::Dfa::kleene`]
//!   expose the same algebra directly on DFAs, for callers building automata without going
//!   through the regex syntax.
//! * [`nfa::Nfa`] exposes the lower-level Thompson construction and subset construction, for
//!   callers who want to compose automata by hand.

pub mod alphabet;
pub mod dfa;
pub mod error;
pub mod nfa;
pub mod regex;

pub use dfa::Dfa;
pub use dfa::enumerate::{Enumerator, Word};
pub use error::{AutomatonError, CompileError, ParseError};

/// Parses and compiles a regular expression into a complete DFA over its inferred alphabet.
pub fn compile(source: &str) -> Result<Dfa, CompileError> {
    regex::compile(source)
}

/// Checks whether `dfa` accepts `word`.
pub fn accepts(dfa: &Dfa, word: &str) -> Result<bool, AutomatonError> {
    dfa.accepts(word)
}

/// A lazy, length-ordered enumeration of the words `dfa` accepts.
pub fn enumerator(dfa: &Dfa) -> Enumerator<'_> {
    dfa.enumerator()
}
