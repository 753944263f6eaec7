use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use std::path::Path;

use nbgrade_core::{ok, CaseOutcome, GradingPolicy, TestCase};

fn ok_spec(cases: usize) -> Value {
    let cases: Vec<Value> = (0..cases)
        .map(|i| {
            json!({
                "name": format!("case-{i}"),
                "code": format!(">>> square({i})\n{}", i * i),
                "hidden": i % 3 == 0,
            })
        })
        .collect();
    json!({"name": "q1", "points": 5, "all_or_nothing": false, "cases": cases})
}

fn bench_parse_ok(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_ok");
    let small = ok_spec(4);
    let large = ok_spec(200);

    group.bench_function("4 cases", |b| {
        b.iter(|| ok::from_spec(black_box(&small), Path::new("hw.ipynb")))
    });
    group.bench_function("200 cases", |b| {
        b.iter(|| ok::from_spec(black_box(&large), Path::new("hw.ipynb")))
    });

    group.finish();
}

fn bench_run_and_grade(c: &mut Criterion) {
    let spec = ok_spec(200);
    let template = ok::from_spec(&spec, Path::new("hw.ipynb")).expect("valid spec");
    let exec = |case: &TestCase| {
        if case.is_hidden() {
            CaseOutcome::fail("hidden")
        } else {
            CaseOutcome::pass("")
        }
    };

    c.bench_function("run_and_grade 200 cases", |b| {
        b.iter(|| {
            let mut file = template.clone();
            file.run(&exec).expect("fresh file");
            black_box(file.grade().expect("graded"))
        })
    });

    let policy = GradingPolicy {
        value: 3.0,
        all_or_nothing: false,
    };
    c.bench_function("policy score", |b| {
        b.iter(|| policy.score(black_box(137), black_box(200)))
    });
}

criterion_group!(benches, bench_parse_ok, bench_run_and_grade);
criterion_main!(benches);
