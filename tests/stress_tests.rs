//! Stress tests for concurrent use
//!
//! These tests verify:
//! - Concurrent appends keep per-thread order and never leak the SMS flag
//! - Registration can run while configurations are being built
//! - Configuration snapshots stay consistent while channels are added
//! - A live logger delivers every event under concurrent writers

use rust_channel_logger::prelude::*;
use rust_channel_logger::build_from_text;
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_appends_keep_thread_order() {
    let cache = Arc::new(CachedLogger::new());
    let mut handles = vec![];

    for t in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..500 {
                cache.information("thread {0} entry {1}", (t, i));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let entries = cache.buffer().entries();
    assert_eq!(entries.len(), 4000);

    // Entries from one thread stay in that thread's program order
    for t in 0..8i64 {
        let sequence: Vec<i64> = entries
            .iter()
            .filter(|e| e.args[0] == FieldValue::Int(t))
            .map(|e| match e.args[1] {
                FieldValue::Int(i) => i,
                _ => -1,
            })
            .collect();
        assert_eq!(sequence, (0..500).collect::<Vec<i64>>());
    }
}

#[test]
fn test_sms_requests_never_mark_more_entries_than_requested() {
    let buffer = Arc::new(EntryBuffer::new());
    let requests = 50;

    let requester = {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || {
            for _ in 0..requests {
                buffer.send_next_to_sms();
                thread::yield_now();
            }
        })
    };

    let mut writers = vec![];
    for _ in 0..4 {
        let buffer = Arc::clone(&buffer);
        writers.push(thread::spawn(move || {
            for _ in 0..1000 {
                buffer.append(LogLevel::Warning, "load", CallSite::default(), ());
            }
        }));
    }

    requester.join().unwrap();
    for writer in writers {
        writer.join().unwrap();
    }

    let flagged = buffer.entries().iter().filter(|e| e.send_to_sms).count();
    assert!(flagged <= requests);
}

#[test]
fn test_registration_during_builds() {
    let registry = Arc::new(ChannelRegistry::with_defaults());
    let text = r#"{ "Global": {}, "Channels": [ { "Channel": "Console" }, { "Channel": "Audit" } ] }"#;

    let registrar = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for i in 0..200 {
                registry
                    .register(&format!("Extra{i}"), SettingsType::of(ChannelKind::Debug), None)
                    .unwrap();
            }
            registry
                .register("Audit", SettingsType::of(ChannelKind::LastEvent), None)
                .unwrap();
        })
    };

    let mut builders = vec![];
    for _ in 0..4 {
        let registry = Arc::clone(&registry);
        builders.push(thread::spawn(move || {
            for _ in 0..100 {
                let configuration = build_from_text(text, &registry).unwrap();
                let count = configuration.channel_count();
                assert!(count == 1 || count == 2);
            }
        }));
    }

    registrar.join().unwrap();
    for builder in builders {
        builder.join().unwrap();
    }

    assert_eq!(build_from_text(text, &registry).unwrap().channel_count(), 2);
    assert_eq!(registry.len(), ChannelKind::ALL.len() + 201);
}

#[test]
fn test_channel_snapshots_while_adding() {
    let configuration = Arc::new(LoggerConfiguration::default());

    let writer = {
        let configuration = Arc::clone(&configuration);
        thread::spawn(move || {
            for i in 0..500 {
                configuration.add_channel(ChannelConfig::new(
                    format!("Debug{i}"),
                    ChannelKind::Debug.default_settings(),
                    true,
                ));
            }
        })
    };

    let reader = {
        let configuration = Arc::clone(&configuration);
        thread::spawn(move || {
            for _ in 0..200 {
                let snapshot = configuration.channels();
                for (i, channel) in snapshot.iter().enumerate() {
                    assert_eq!(channel.channel_id, format!("Debug{i}"));
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(configuration.channel_count(), 500);
}

#[test]
fn test_live_logger_under_concurrent_writers() {
    let configuration = LoggerConfiguration::default();
    configuration.add_channel(ChannelConfig::new("NetEvent", ChannelKind::NetEvent.default_settings(), true));
    configuration.add_channel(ChannelConfig::new("LastEvent", ChannelKind::LastEvent.default_settings(), true));

    let hub = NetEventHub::new();
    let events = hub.subscribe();
    let logger = Arc::new(
        Logger::builder()
            .configuration(&configuration)
            .net_event_hub(hub)
            .build()
            .unwrap(),
    );

    let mut handles = vec![];
    for t in 0..4 {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..250 {
                logger.information("worker {0} event {1}", (t, i));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(events.try_iter().count(), 1000);
    assert_eq!(logger.metrics().total_logged(), 1000);
    assert!(logger.last_event().get().is_some());
}
