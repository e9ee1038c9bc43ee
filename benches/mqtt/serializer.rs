use criterion::{BatchSize, BenchmarkId, Criterion, Throughput};
use libiot_mqtt::mqtt::memory::Heap;
use libiot_mqtt::mqtt::wire::Lightweight;
use libiot_mqtt::mqtt::{ConnectInfo, PacketIdentifiers, PublishInfo, QoS, Serializer, Subscription};
use std::hint::black_box;

pub fn bench_publish(c: &mut Criterion) {
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);

    let mut group = c.benchmark_group("serialize_publish");
    for size in [16usize, 256, 4096] {
        let payload = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        for qos in [QoS::AtMostOnce, QoS::AtLeastOnce] {
            let message = PublishInfo {
                qos,
                retain: false,
                duplicate: false,
                topic_name: "libiot/bench-topic",
                payload: &payload,
            };
            group.bench_with_input(
                BenchmarkId::new(format!("{qos:?}"), size),
                &message,
                |b, message| b.iter(|| serializer.publish(black_box(message)).unwrap()),
            );
        }
    }
    group.finish();
}

pub fn bench_subscribe(c: &mut Criterion) {
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);
    let filters = [
        Subscription {
            qos: QoS::AtLeastOnce,
            topic_filter: "sensors/#",
        },
        Subscription {
            qos: QoS::AtMostOnce,
            topic_filter: "alerts/+",
        },
    ];

    c.bench_function("serialize_subscribe", |b| {
        b.iter(|| serializer.subscribe(black_box(&filters)).unwrap())
    });
}

pub fn bench_connect(c: &mut Criterion) {
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);
    let connect = ConnectInfo {
        client_identifier: "libiot-bench-connect",
        keep_alive_seconds: 60,
        clean_session: true,
        user_name: Some("bench"),
        password: Some(b"bench"),
        will: Some(PublishInfo {
            qos: QoS::AtLeastOnce,
            retain: true,
            duplicate: false,
            topic_name: "status/bench",
            payload: b"offline",
        }),
    };

    c.bench_function("serialize_connect", |b| {
        b.iter_batched(
            || connect,
            |connect| serializer.connect(&connect).unwrap(),
            BatchSize::SmallInput,
        )
    });
}
