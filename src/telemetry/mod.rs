//! Bridge telemetry collector.
//!
//! Method calls and effect lifecycle changes are kept in a bounded history
//! and fanned out to live subscribers over a broadcast channel.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LockResult, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::channel::MethodResult;

pub mod events;

pub use events::{BridgeEvent, CallOutcome, LifecyclePhase};

/// Counter key shared by every call that matched no method.
pub const UNKNOWN_METHOD_KEY: &str = "<unknown>";

/// Per-method call counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MethodStats {
    pub calls: u64,
    pub errors: u64,
}

/// Snapshot of collector state for CLI and FFI reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<BridgeEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
    pub methods: BTreeMap<String, MethodStats>,
}

/// Broadcast-based collector retaining a bounded history of events.
pub struct TelemetryCollector {
    tx: broadcast::Sender<BridgeEvent>,
    history: Mutex<VecDeque<BridgeEvent>>,
    history_capacity: usize,
    methods: Mutex<BTreeMap<String, MethodStats>>,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

fn recover<'a, T>(guard: LockResult<MutexGuard<'a, T>>) -> MutexGuard<'a, T> {
    guard.unwrap_or_else(PoisonError::into_inner)
}

impl TelemetryCollector {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        let history_capacity = history_capacity.max(1);
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            methods: Mutex::new(BTreeMap::new()),
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, event: BridgeEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        {
            let mut history = recover(self.history.lock());
            if history.len() >= self.history_capacity {
                history.pop_front();
                self.dropped_history.fetch_add(1, Ordering::Relaxed);
            }
            history.push_back(event.clone());
        }

        // No subscribers is not an error
        let _ = self.tx.send(event);
    }

    pub fn record_call(&self, method: &str, result: &MethodResult, elapsed: Duration) {
        let outcome = match result {
            MethodResult::Success { .. } => CallOutcome::Success,
            MethodResult::Error { code, .. } => CallOutcome::Error { code: code.clone() },
            MethodResult::NotImplemented => CallOutcome::NotImplemented,
        };

        {
            let mut methods = recover(self.methods.lock());
            let key = match outcome {
                CallOutcome::NotImplemented => UNKNOWN_METHOD_KEY,
                _ => method,
            };
            let stats = methods.entry(key.to_string()).or_default();
            stats.calls += 1;
            if matches!(outcome, CallOutcome::Error { .. }) {
                stats.errors += 1;
            }
        }

        self.publish(BridgeEvent::MethodCall {
            method: method.to_string(),
            outcome,
            elapsed_us: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        });
    }

    pub fn record_lifecycle(&self, phase: LifecyclePhase, audio_session: Option<i32>) {
        self.publish(BridgeEvent::Lifecycle {
            phase,
            audio_session,
            timestamp_ms: now_timestamp_ms(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.tx.subscribe()
    }

    /// Live events as a stream; events missed by a lagging reader are skipped.
    pub fn stream(&self) -> impl futures::Stream<Item = BridgeEvent> + Send + 'static {
        BroadcastStream::new(self.tx.subscribe()).filter_map(Result::ok)
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let recent = recover(self.history.lock()).iter().cloned().collect();
        TelemetrySnapshot {
            recent,
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
            methods: recover(self.methods.lock()).clone(),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new(256, 64)
    }
}

fn now_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_preserves_order_within_history() {
        let collector = TelemetryCollector::new(8, 3);
        collector.record_lifecycle(LifecyclePhase::EffectCreated, Some(1));
        collector.record_call("init", &MethodResult::success(true), Duration::from_micros(5));
        collector.record_call("bogus", &MethodResult::NotImplemented, Duration::ZERO);

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.recent.len(), 3);
        assert!(matches!(
            snapshot.recent[0],
            BridgeEvent::Lifecycle {
                phase: LifecyclePhase::EffectCreated,
                audio_session: Some(1),
                ..
            }
        ));
        assert!(matches!(
            &snapshot.recent[2],
            BridgeEvent::MethodCall { outcome: CallOutcome::NotImplemented, .. }
        ));
    }

    #[test]
    fn collector_drops_history_when_full() {
        let collector = TelemetryCollector::new(8, 2);
        for _ in 0..3 {
            collector.record_lifecycle(LifecyclePhase::Teardown, None);
        }

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.recent.len(), 2);
        assert_eq!(snapshot.total_events, 3);
        assert_eq!(snapshot.dropped_events, 1);
    }

    #[test]
    fn method_stats_count_errors() {
        let collector = TelemetryCollector::default();
        let error = MethodResult::Error {
            code: "LEVEL_ERROR".to_string(),
            message: None,
            details: serde_json::Value::Null,
        };
        collector.record_call("getBandLevel", &MethodResult::success(0), Duration::ZERO);
        collector.record_call("getBandLevel", &error, Duration::ZERO);

        let snapshot = collector.snapshot();
        assert_eq!(
            snapshot.methods.get("getBandLevel"),
            Some(&MethodStats {
                calls: 2,
                errors: 1
            })
        );
    }

    #[test]
    fn unknown_methods_share_one_counter() {
        let collector = TelemetryCollector::default();
        for method in ["getPresets", "usePreset", "shuffle", ""] {
            collector.record_call(method, &MethodResult::NotImplemented, Duration::ZERO);
        }
        collector.record_call("init", &MethodResult::success(true), Duration::ZERO);

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.methods.len(), 2);
        assert_eq!(
            snapshot.methods.get(UNKNOWN_METHOD_KEY),
            Some(&MethodStats {
                calls: 4,
                errors: 0
            })
        );
        assert!(!snapshot.methods.contains_key("getPresets"));
    }

    #[test]
    fn events_serialize_tagged() {
        let event = BridgeEvent::MethodCall {
            method: "init".to_string(),
            outcome: CallOutcome::Error {
                code: "INIT_ERROR".to_string(),
            },
            elapsed_us: 12,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "method_call");
        assert_eq!(json["payload"]["outcome"]["kind"], "error");
        assert_eq!(json["payload"]["outcome"]["code"], "INIT_ERROR");
    }

    #[tokio::test]
    async fn stream_delivers_published_events() {
        let collector = TelemetryCollector::new(8, 8);
        let mut stream = Box::pin(collector.stream());

        collector.record_lifecycle(LifecyclePhase::EffectReleased, Some(9));

        let event = stream.next().await.expect("stream closed");
        assert!(matches!(
            event,
            BridgeEvent::Lifecycle {
                phase: LifecyclePhase::EffectReleased,
                audio_session: Some(9),
                ..
            }
        ));
    }
}
