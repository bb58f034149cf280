use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rune_model::*;
use rune_serialization::JsonCodec;
use std::hint::black_box;

fn schema() -> std::sync::Arc<Schema> {
    Schema::builder("bench.trade")
        .data_type(
            TypeDef::new("Account")
                .field(FieldDef::scalar("number", ScalarKind::String).required()),
        )
        .data_type(
            TypeDef::new("Party")
                .field(FieldDef::scalar("name", ScalarKind::String).required())
                .field(FieldDef::object("account", "Account").multi()),
        )
        .data_type(
            TypeDef::new("Trade")
                .field(FieldDef::scalar("tradeId", ScalarKind::String).required())
                .field(FieldDef::object("party", "Party").multi())
                .field(FieldDef::object("counterparty", "Party").multi()),
        )
        .build()
        .expect("Bench schema is consistent")
}

fn trade(parties: usize) -> Document {
    let mut draft = DataObject::new("Trade").set("tradeId", "T-BENCH");
    for p in 0..parties {
        let party = DataObject::new("Party")
            .key(format!("p{p}"))
            .set("name", format!("Party {p}"))
            .push("account", DataObject::new("Account").set("number", format!("{p}-1")))
            .push("account", DataObject::new("Account").set("number", format!("{p}-2")));
        draft = draft.push("party", party).push("counterparty", Reference::new(format!("p{p}")));
    }
    let mut graph = Graph::new(schema());
    let root = graph.insert(draft).expect("Bench trade inserts");
    graph.resolve_references().expect("Bench references resolve");
    Document { graph, root }
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = JsonCodec::new(schema());

    for parties in [10usize, 100, 1_000] {
        let document = trade(parties);
        let text = codec.serialize(&document).expect("serialize failed");
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("serialize", parties), &document, |b, d| {
            b.iter(|| black_box(codec.serialize(d).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("deserialize", parties), &text, |b, t| {
            b.iter(|| black_box(codec.deserialize(t).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
