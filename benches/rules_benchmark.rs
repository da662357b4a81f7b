use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grouping_rules::rules::{EventAttributes, Field, GroupingRules, Rule};
use serde_json::{json, Value};

// Rule set where only the last rule matches the benchmark event
fn create_rule_set(size: usize) -> GroupingRules {
    let rules = GroupingRules::new();
    for i in 0..size.saturating_sub(1) {
        rules.add(
            Rule::new(
                vec![Field::ServicePath, Field::EntityType],
                format!("/zone{i}/.*Type{i}"),
                format!("dest{i}"),
            )
            .unwrap(),
        );
    }
    rules.add(Rule::new(vec![Field::EntityType], ".*", "catch-all").unwrap());
    rules
}

fn create_definitions(size: usize) -> Vec<Value> {
    (0..size)
        .map(|i| {
            json!({
                "fields": ["entityId", "entityType"],
                "regex": format!("Room{i}[0-9]*Room"),
                "destination": format!("rooms{i}"),
                "fiware_service_path": "/rooms"
            })
        })
        .collect()
}

fn bench_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("match");
    let event = EventAttributes::new("/building/floor", "Room42", "Room");

    for size in [1, 10, 100, 1000] {
        let rules = create_rule_set(size);
        group.bench_with_input(BenchmarkId::new("last_rule", size), &rules, |b, rules| {
            b.iter(|| rules.find_match(black_box(&event)))
        });
    }

    group.finish();
}

fn bench_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap");

    for size in [10, 100] {
        let definitions = create_definitions(size);
        group.bench_with_input(
            BenchmarkId::new("from_definitions", size),
            &definitions,
            |b, definitions| b.iter(|| GroupingRules::from_definitions(black_box(definitions))),
        );
    }

    group.finish();
}

fn bench_mutation(c: &mut Criterion) {
    let rules = create_rule_set(100);
    let replacement = Rule::new(vec![Field::EntityId], "e[0-9]+", "updated").unwrap();

    c.bench_function("update_in_place_100", |b| {
        b.iter(|| rules.update(black_box(50), replacement.clone()))
    });

    c.bench_function("add_then_delete_100", |b| {
        b.iter(|| {
            let id = rules.add(replacement.clone());
            rules.delete(black_box(id))
        })
    });
}

criterion_group!(benches, bench_match, bench_bootstrap, bench_mutation);
criterion_main!(benches);
