use libiot_mqtt::mqtt::memory::Heap;
use libiot_mqtt::mqtt::wire::Lightweight;
use libiot_mqtt::mqtt::{
    Deserializer, IncomingPacket, PacketIdentifiers, PublishInfo, QoS, Serializer,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOPIC_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789/_-";

fn round_trip(serializer: &Serializer<'_>, message: &PublishInfo<'_>) {
    let packet = serializer.publish(message).unwrap();

    let mut incoming = IncomingPacket::from_frame(packet.buffer()).unwrap();
    Deserializer::lightweight().publish(&mut incoming).unwrap();
    let received = incoming.publish.unwrap();

    assert_eq!(received.qos, message.qos);
    assert_eq!(received.retain, message.retain);
    assert_eq!(
        received.duplicate,
        message.duplicate && message.qos != QoS::AtMostOnce
    );
    assert_eq!(received.topic_name, message.topic_name);
    assert_eq!(received.payload, message.payload);
    // QoS 0 draws an identifier but never puts it on the wire
    let on_wire = match message.qos {
        QoS::AtMostOnce => 0,
        QoS::AtLeastOnce | QoS::ExactlyOnce => packet.packet_identifier().unwrap(),
    };
    assert_eq!(incoming.packet_identifier, on_wire);
    assert_ne!(packet.packet_identifier(), None);
}

#[test]
fn test_publish_round_trip() {
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);

    for retain in [false, true] {
        round_trip(
            &serializer,
            &PublishInfo {
                qos: QoS::AtLeastOnce,
                retain,
                duplicate: false,
                topic_name: "a/b",
                payload: &[0x01, 0x02],
            },
        );
    }
}

#[test]
fn test_publish_round_trip_empty_payload() {
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);

    round_trip(
        &serializer,
        &PublishInfo {
            qos: QoS::AtMostOnce,
            retain: false,
            duplicate: false,
            topic_name: "heartbeat",
            payload: &[],
        },
    );
}

#[test]
fn test_randomized_publish_round_trips() {
    let mut rng = StdRng::seed_from_u64(0x4D51_5454);
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);

    for _ in 0..200 {
        let topic: String = (0..rng.gen_range(1..=48))
            .map(|_| TOPIC_ALPHABET[rng.gen_range(0..TOPIC_ALPHABET.len())] as char)
            .collect();
        // long enough payloads push the remaining length past one byte
        let mut payload = vec![0u8; rng.gen_range(0..=400)];
        rng.fill(&mut payload[..]);
        let qos = match rng.gen_range(0..3) {
            0 => QoS::AtMostOnce,
            1 => QoS::AtLeastOnce,
            _ => QoS::ExactlyOnce,
        };

        round_trip(
            &serializer,
            &PublishInfo {
                qos,
                retain: rng.gen_bool(0.5),
                duplicate: rng.gen_bool(0.5),
                topic_name: &topic,
                payload: &payload,
            },
        );
    }
}
