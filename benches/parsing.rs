//! Lexing and parsing throughput on a synthetic multi-generation family file.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ftt::lexer;
use ftt::parser;

fn synthetic_document(generations: usize, children_per_union: usize) -> String {
    let mut out = String::from("HEAD_FORMAT: 1\nHEAD_DATE: 2024-01-01\n");
    let mut prev_gen: Vec<String> = vec!["g0-0".to_string()];
    out.push_str("ID: g0-0\nNAME: Root Person\nSEX: F\nBORN: 1900-01-01\n");

    let mut counter = 1usize;
    for gen in 1..generations {
        let mut this_gen = Vec::new();
        for parent in &prev_gen {
            for i in 0..children_per_union {
                let id = format!("g{gen}-{counter}");
                counter += 1;
                out.push_str("---\n");
                out.push_str(&format!("ID: {id}\n"));
                out.push_str(&format!("NAME: Person {id}\n"));
                out.push_str(if i % 2 == 0 { "SEX: M\n" } else { "SEX: F\n" });
                out.push_str(&format!("BORN: {}-01-01\n", 1900 + gen * 25));
                out.push_str(&format!("PARENT: {parent}|BIO\n"));
                out.push_str(&format!("PARENT_SRC: ^src1|confirmed by record\n"));
                this_gen.push(id);
            }
        }
        prev_gen = this_gen;
    }
    out.push_str("---\nID: ^src1\nTITLE: Synthetic census record\n");
    out
}

fn bench_lexer(c: &mut Criterion) {
    let text = synthetic_document(6, 3);
    c.bench_function("lexer_split_lines_6gen_3children", |b| {
        b.iter(|| lexer::split_lines(black_box(&text)));
    });
}

fn bench_parser(c: &mut Criterion) {
    let text = synthetic_document(6, 3);
    c.bench_function("parser_parse_6gen_3children", |b| {
        b.iter(|| parser::parse(black_box(&text)));
    });
}

fn bench_parser_small(c: &mut Criterion) {
    let text = synthetic_document(3, 2);
    c.bench_function("parser_parse_3gen_2children", |b| {
        b.iter(|| parser::parse(black_box(&text)));
    });
}

criterion_group!(benches, bench_lexer, bench_parser, bench_parser_small);
criterion_main!(benches);
