use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::config::ActivityWeights;
use crate::models::ActivityEvent;

/// Aggregates a user's raw activity history into per-topic signal weights.
///
/// Accumulation is purely additive; age decay is applied downstream by the
/// trending and feed scorers, not here. Events without a topic are skipped.
pub struct SignalAggregator {
    weights: ActivityWeights,
}

impl Default for SignalAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalAggregator {
    pub fn new() -> Self {
        Self {
            weights: ActivityWeights::default(),
        }
    }

    pub fn with_weights(weights: ActivityWeights) -> Self {
        Self { weights }
    }

    /// Fold the event list into `topic_id -> accumulated weight`.
    pub fn aggregate(&self, events: &[ActivityEvent]) -> HashMap<Uuid, f64> {
        let mut topic_weights: HashMap<Uuid, f64> = HashMap::new();

        for event in events {
            let Some(topic_id) = event.topic_id else {
                continue;
            };
            *topic_weights.entry(topic_id).or_insert(0.0) += self.weights.weight_for(event.kind);
        }

        debug!(
            event_count = events.len(),
            topic_count = topic_weights.len(),
            "Aggregated activity signals"
        );

        topic_weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityKind;
    use chrono::Utc;

    fn create_test_event(kind: ActivityKind, topic_id: Option<Uuid>) -> ActivityEvent {
        ActivityEvent {
            kind,
            topic_id,
            post_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_aggregate_sums_per_topic() {
        let aggregator = SignalAggregator::new();
        let topic = Uuid::new_v4();

        let events = vec![
            create_test_event(ActivityKind::Like, Some(topic)),
            create_test_event(ActivityKind::Bookmark, Some(topic)),
            create_test_event(ActivityKind::Follow, Some(topic)),
        ];

        let weights = aggregator.aggregate(&events);
        // 1.0 + 1.5 + 2.0
        assert!((weights[&topic] - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_skips_topicless_events() {
        let aggregator = SignalAggregator::new();
        let events = vec![
            create_test_event(ActivityKind::Like, None),
            create_test_event(ActivityKind::ViewPost, None),
        ];

        assert!(aggregator.aggregate(&events).is_empty());
    }

    #[test]
    fn test_aggregate_unrecognized_kind_uses_fallback() {
        let aggregator = SignalAggregator::new();
        let topic = Uuid::new_v4();
        let events = vec![create_test_event(ActivityKind::Other, Some(topic))];

        let weights = aggregator.aggregate(&events);
        assert!((weights[&topic] - 0.5).abs() < 1e-9);
    }
}
