use criterion::{criterion_group, criterion_main, Criterion};
use prism_binder::{parse_sql, Database, Statement};
use std::hint::black_box;

fn wide_database() -> Database {
    let db = Database::new_in_memory();
    for t in 0..8 {
        let columns: Vec<String> = (0..32).map(|c| format!("c{} INT", c)).collect();
        db.execute(&format!("CREATE TABLE t{} ({})", t, columns.join(", ")))
            .expect("create table");
    }
    db
}

fn bench_parse(c: &mut Criterion) {
    let sql = "SELECT t0.c1, t1.c2, t2.* FROM t0, t1, t2 WHERE t0.c0 = t1.c0 AND t1.c3 > 10";
    c.bench_function("parse_select", |b| {
        b.iter(|| parse_sql(black_box(sql)).expect("parse"))
    });
}

fn bench_bind(c: &mut Criterion) {
    let db = wide_database();

    c.bench_function("bind_single_table_star", |b| {
        b.iter(|| db.bind(black_box("SELECT * FROM t0")).expect("bind"))
    });

    c.bench_function("bind_eight_way_star", |b| {
        b.iter(|| {
            db.bind(black_box(
                "SELECT * FROM t0, t1, t2, t3, t4, t5, t6, t7 WHERE t0.c0 = t7.c0",
            ))
            .expect("bind")
        })
    });

    // Binder only, no parsing
    let select = match parse_sql("SELECT count(*) FROM t0, t1, t2, t3").expect("parse") {
        Statement::Select(select) => select,
        _ => unreachable!(),
    };
    let binder = prism_binder::SelectBinder::new_with_catalog(db.catalog().clone());
    c.bench_function("bind_count_all", |b| {
        b.iter(|| binder.bind_select(black_box(&select)).expect("bind"))
    });
}

criterion_group!(benches, bench_parse, bench_bind);
criterion_main!(benches);
