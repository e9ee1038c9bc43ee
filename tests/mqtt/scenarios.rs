use libiot_mqtt::mqtt::memory::Heap;
use libiot_mqtt::mqtt::types::{CONNACK, PUBACK, SUBACK};
use libiot_mqtt::mqtt::wire::Lightweight;
use libiot_mqtt::mqtt::{
    ConnectInfo, Deserializer, IncomingPacket, MqttError, PacketIdentifiers, PublishInfo, QoS,
    Serializer, Subscription,
};

#[test]
fn test_subscribe_two_filters() {
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

    let packet = serializer.subscribe(&filters).unwrap();
    let filter_bytes: usize = filters.iter().map(|f| f.topic_filter.len()).sum();
    assert!(packet.len() > filter_bytes);
    // header, identifier, then length-prefixed filters with their QoS byte
    assert_eq!(packet.len(), 2 + 2 + (2 + 9 + 1) + (2 + 8 + 1));
    assert_eq!(packet.buffer()[0], 0x82);

    let packet_identifier = packet.packet_identifier().unwrap();
    assert_eq!(packet_identifier % 2, 1);
    assert_eq!(&packet.buffer()[2..4], &packet_identifier.to_be_bytes());
}

#[test]
fn test_suback_for_sent_subscribe() {
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);
    let deserializer = Deserializer::lightweight();

    let sent = serializer
        .subscribe(&[Subscription {
            qos: QoS::ExactlyOnce,
            topic_filter: "sensors/#",
        }])
        .unwrap();
    let [high, low] = sent.packet_identifier().unwrap().to_be_bytes();

    let granted = [SUBACK, 0x03, high, low, 0x02];
    let mut incoming = IncomingPacket::from_frame(&granted).unwrap();
    deserializer.suback(&mut incoming).unwrap();
    assert_eq!(Some(incoming.packet_identifier), sent.packet_identifier());

    let refused = [SUBACK, 0x03, high, low, 0x80];
    let mut incoming = IncomingPacket::from_frame(&refused).unwrap();
    assert_eq!(deserializer.suback(&mut incoming), Err(MqttError::ServerRefused));
    assert_eq!(incoming.packet_identifier, 0);
}

#[test]
fn test_puback_for_received_publish() {
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);

    let packet = serializer.puback(0x0007).unwrap();
    assert_eq!(packet.len(), 4);
    assert_eq!(packet.buffer(), &[0x40, 0x02, 0x00, 0x07]);
    assert_eq!(packet.packet_identifier(), Some(7));

    let mut incoming = IncomingPacket::from_frame(packet.buffer()).unwrap();
    Deserializer::lightweight().puback(&mut incoming).unwrap();
    assert_eq!(incoming.packet_type, PUBACK);
    assert_eq!(incoming.packet_identifier, 7);
}

#[test]
fn test_connect_then_connack() {
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);
    let deserializer = Deserializer::lightweight();

    let packet = serializer
        .connect(&ConnectInfo {
            client_identifier: "weather_station",
            keep_alive_seconds: 60,
            clean_session: true,
            user_name: None,
            password: None,
            will: Some(PublishInfo {
                qos: QoS::AtLeastOnce,
                retain: true,
                duplicate: false,
                topic_name: "status/weather_station",
                payload: b"offline",
            }),
        })
        .unwrap();
    let frame = packet.buffer();
    assert_eq!(frame[0], 0x10);
    assert_eq!(&frame[2..8], b"\x00\x04MQTT");
    assert_eq!(frame[8], 4);
    // clean session, will flag, will QoS 1, will retain
    assert_eq!(frame[9], 0x02 | 0x04 | 0x08 | 0x20);
    assert_eq!(&frame[10..12], &60u16.to_be_bytes());
    assert_eq!(identifiers.next_identifier(), 1);

    let mut accepted = IncomingPacket::from_frame(&[CONNACK, 0x02, 0x00, 0x00]).unwrap();
    deserializer.connack(&mut accepted).unwrap();

    let mut refused = IncomingPacket::from_frame(&[CONNACK, 0x02, 0x00, 0x05]).unwrap();
    assert_eq!(deserializer.connack(&mut refused), Err(MqttError::ServerRefused));

    let mut garbled = IncomingPacket::from_frame(&[CONNACK, 0x02, 0x01, 0x02]).unwrap();
    assert_eq!(deserializer.connack(&mut garbled), Err(MqttError::BadResponse));
}

#[test]
fn test_keep_alive_exchange() {
    let serializer = Serializer::lightweight();
    let deserializer = Deserializer::lightweight();

    assert_eq!(serializer.pingreq().unwrap().buffer(), &[0xC0, 0x00]);

    let mut pingresp = IncomingPacket::from_frame(&[0xD0, 0x00]).unwrap();
    deserializer.pingresp(&mut pingresp).unwrap();

    let mut malformed = IncomingPacket::new(0xD0, &[0x00]);
    assert_eq!(deserializer.pingresp(&mut malformed), Err(MqttError::BadResponse));
}

#[test]
fn test_unsubscribe_and_unsuback() {
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);

    let packet = serializer
        .unsubscribe(&[Subscription {
            qos: QoS::AtMostOnce,
            topic_filter: "alerts/+",
        }])
        .unwrap();
    assert_eq!(packet.buffer(), b"\xA2\x0C\x00\x01\x00\x08alerts/+");

    let mut unsuback = IncomingPacket::from_frame(&[0xB0, 0x02, 0x00, 0x01]).unwrap();
    Deserializer::lightweight().unsuback(&mut unsuback).unwrap();
    assert_eq!(unsuback.packet_identifier, 1);
}

#[test]
fn test_retransmitted_publish_carries_dup() {
    let identifiers = PacketIdentifiers::new();
    let serializer = Serializer::new(Lightweight, Heap, &identifiers);
    let message = PublishInfo {
        qos: QoS::AtLeastOnce,
        retain: false,
        duplicate: false,
        topic_name: "a/b",
        payload: b"x",
    };

    let mut packet = serializer.publish(&message).unwrap();
    packet.set_duplicate().unwrap();

    let mut incoming = IncomingPacket::from_frame(packet.buffer()).unwrap();
    Deserializer::lightweight().publish(&mut incoming).unwrap();
    let received = incoming.publish.unwrap();
    assert!(received.duplicate);
    assert_eq!(Some(incoming.packet_identifier), packet.packet_identifier());
}

#[test]
fn test_frame_with_wrong_length_rejected() {
    assert_eq!(
        IncomingPacket::from_frame(&[0x40, 0x03, 0x00, 0x07]),
        Err(MqttError::BadResponse)
    );
    assert_eq!(IncomingPacket::from_frame(&[]), Err(MqttError::BadParameter));
}
