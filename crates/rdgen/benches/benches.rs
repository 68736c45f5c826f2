use std::{env, fs, path::PathBuf};

use criterion::{criterion_group, criterion_main, Criterion};
use rdgen::{codegen::Codegen, grammar::Definition, scanner::ScannerDef, syntax};

criterion_main!(benches);
criterion_group!(benches, bench_arithmetic, bench_json, bench_statements);

fn bench_arithmetic(c: &mut Criterion) {
    bench_pipeline(c, "arithmetic");
}

fn bench_json(c: &mut Criterion) {
    bench_pipeline(c, "json");
}

fn bench_statements(c: &mut Criterion) {
    bench_pipeline(c, "statements");
}

fn scanner() -> ScannerDef {
    ScannerDef::define(|s| {
        s.pattern("Identifier", "[a-zA-Z_][a-zA-Z0-9_]*")?;
        s.pattern("Number", "[0-9]+")?;
        s.pattern("String", r#""[^"]*""#)?;
        Ok(())
    })
    .unwrap()
}

fn bench_pipeline(c: &mut Criterion, grammar_name: &str) {
    let project_root = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .expect("missing environment variable: `CARGO_MANIFEST_DIR'");
    let source =
        fs::read_to_string(project_root.join(format!("tests/{}.llg", grammar_name))).unwrap();
    let def = Definition::from_source(&source, scanner()).unwrap();

    let mut group = c.benchmark_group(grammar_name);
    group.bench_function("Parse", |b| {
        b.iter(|| syntax::parse(&source).unwrap());
    });
    group.bench_function("Analysis", |b| {
        b.iter(|| Definition::from_source(&source, scanner()).unwrap());
    });
    group.bench_function("Codegen", |b| {
        b.iter(|| Codegen::new(&def).to_string());
    });
    group.finish();
}
