use criterion::{criterion_group, criterion_main, Criterion};
use postsearch_core::index::{InvertedIndexBuilder, TextIndex, TextIndexBuilder};
use postsearch_core::tokenizer::tokenize;

const TEXT: &str = "A fluffy cat sleeping on a warm windowsill while the rain falls outside. \
    Illustrations of seasonal events, animals, food and everyday life in Japan.";

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_paragraph", |b| b.iter(|| tokenize(TEXT)));
}

fn bench_query(c: &mut Criterion) {
    let mut builder = InvertedIndexBuilder::new();
    for doc_id in 0..1_000u32 {
        builder.index_contribution(doc_id, TEXT);
        builder.index_contribution(doc_id, &format!("item{doc_id} animal"));
    }
    let index = builder.finalize();
    c.bench_function("query_two_terms", |b| b.iter(|| index.query("fluffy animal")));
}

criterion_group!(benches, bench_tokenize, bench_query);
criterion_main!(benches);
