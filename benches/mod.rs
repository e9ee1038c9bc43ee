use criterion::{criterion_group, criterion_main};

mod mqtt;

criterion_group!(
    benches,
    mqtt::serializer::bench_publish,
    mqtt::serializer::bench_subscribe,
    mqtt::serializer::bench_connect,
    mqtt::deserializer::bench_publish,
    mqtt::deserializer::bench_acks
);
criterion_main!(benches);
