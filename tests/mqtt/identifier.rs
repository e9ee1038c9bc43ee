use std::collections::HashSet;
use std::thread;

use libiot_mqtt::mqtt::{PacketIdentifiers, PublishInfo, QoS, Serializer};

const THREADS: usize = 8;
const CALLS_PER_THREAD: usize = 1_000;

#[test]
fn test_concurrent_identifiers_are_distinct() {
    let identifiers = PacketIdentifiers::new();

    let seen: Vec<u16> = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    (0..CALLS_PER_THREAD)
                        .map(|_| identifiers.next_identifier())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|worker| worker.join().unwrap())
            .collect()
    });

    let distinct: HashSet<u16> = seen.iter().copied().collect();
    assert_eq!(distinct.len(), THREADS * CALLS_PER_THREAD);
    assert!(seen.iter().all(|id| id % 2 == 1));
}

#[test]
fn test_global_identifiers_stay_odd() {
    let serializer = Serializer::lightweight();
    let message = PublishInfo {
        qos: QoS::ExactlyOnce,
        retain: false,
        duplicate: false,
        topic_name: "a/b",
        payload: b"",
    };

    for _ in 0..10 {
        let packet_identifier = serializer.publish(&message).unwrap().packet_identifier();
        assert_eq!(packet_identifier.map(|id| id % 2), Some(1));
    }
    assert_eq!(PacketIdentifiers::global().next_identifier() % 2, 1);
}
