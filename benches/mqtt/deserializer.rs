use criterion::{Criterion, Throughput};
use libiot_mqtt::mqtt::{Deserializer, IncomingPacket, PublishInfo, QoS, Serializer};
use std::hint::black_box;

pub fn bench_publish(c: &mut Criterion) {
    let deserializer = Deserializer::lightweight();
    let payload = vec![0x5Au8; 1024];
    let packet = Serializer::lightweight()
        .publish(&PublishInfo {
            qos: QoS::AtLeastOnce,
            retain: false,
            duplicate: false,
            topic_name: "libiot/bench-topic",
            payload: &payload,
        })
        .unwrap();

    let mut group = c.benchmark_group("deserialize_publish");
    group.throughput(Throughput::Bytes(packet.len() as u64));
    group.bench_function("qos1_1k", |b| {
        b.iter(|| {
            let mut incoming = IncomingPacket::from_frame(black_box(packet.buffer())).unwrap();
            deserializer.publish(&mut incoming).unwrap();
            incoming
        })
    });
    group.finish();
}

pub fn bench_acks(c: &mut Criterion) {
    let deserializer = Deserializer::lightweight();
    let puback = [0x40u8, 0x02, 0x00, 0x07];
    let suback = [0x90u8, 0x04, 0x00, 0x01, 0x01, 0x00];

    let mut group = c.benchmark_group("deserialize_ack");
    group.bench_function("puback", |b| {
        b.iter(|| {
            let mut incoming = IncomingPacket::from_frame(black_box(&puback)).unwrap();
            deserializer.puback(&mut incoming).unwrap();
            incoming.packet_identifier
        })
    });
    group.bench_function("suback", |b| {
        b.iter(|| {
            let mut incoming = IncomingPacket::from_frame(black_box(&suback)).unwrap();
            deserializer.suback(&mut incoming).unwrap();
            incoming.packet_identifier
        })
    });
    group.finish();
}
