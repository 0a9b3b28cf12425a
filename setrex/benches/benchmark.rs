use criterion::{black_box, criterion_group, criterion_main, Criterion};
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::TestRunner;
use setrex::dfa::CombineMode;
use setrex::{compile, Dfa};

const UNION_LEFT: &str = "(a|b)*abb";
const UNION_RIGHT: &str = "a(a|b)*bb";
const COMPILE_TARGET: &str = r"(a|b)*&~(\A*)-(a^[1-20])";
const ENUMERATE_TARGET: &str = r"\0^[1-6]";

fn sample_pair() -> (Dfa, Dfa) {
    (compile(UNION_LEFT).unwrap(), compile(UNION_RIGHT).unwrap())
}

pub fn product_construction(c: &mut Criterion) {
    let (dfa1, dfa2) = sample_pair();
    c.bench_function("union", |b| {
        b.iter(|| dfa1.combine(black_box(&dfa2), CombineMode::Union))
    });
    c.bench_function("intersection", |b| {
        b.iter(|| dfa1.combine(black_box(&dfa2), CombineMode::Intersection))
    });
    c.bench_function("difference", |b| {
        b.iter(|| dfa1.combine(black_box(&dfa2), CombineMode::Difference))
    });
}

pub fn negate_and_roundtrip(c: &mut Criterion) {
    let (dfa, _) = sample_pair();
    c.bench_function("negate", |b| b.iter(|| dfa.negate()));
    c.bench_function("to_nfa then to_dfa", |b| {
        b.iter(|| dfa.to_nfa().to_dfa())
    });
}

pub fn regex_compile(c: &mut Criterion) {
    c.bench_function("regex compile", |b| {
        b.iter(|| compile(black_box(COMPILE_TARGET)).unwrap())
    });
}

pub fn regex_check(c: &mut Criterion) {
    let dfa = compile(COMPILE_TARGET).unwrap();
    let mut runner = TestRunner::default();
    let word = "[ab]{0,12}".new_tree(&mut runner).unwrap();

    c.bench_function("regex check", |b| {
        b.iter(|| dfa.accepts(black_box(&word.current())))
    });
}

pub fn enumerate_words(c: &mut Criterion) {
    let dfa = compile(ENUMERATE_TARGET).unwrap();
    c.bench_function("enumerate first 200 words", |b| {
        b.iter(|| dfa.enumerator().take(200).count())
    });
}

criterion_group!(
    benches,
    product_construction,
    negate_and_roundtrip,
    regex_compile,
    regex_check,
    enumerate_words
);
criterion_main!(benches);
