use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Topic reference as projected by the data-access layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRef {
    pub id: Uuid,
    pub name: String,
}

/// User projection. `topics` is populated only where a scorer needs it
/// (user recommendations); other callers may leave it empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub topics: Vec<TopicRef>,
}

/// Activity event types tracked upstream. `Other` absorbs event types the
/// engine does not recognize; they still contribute the default signal
/// weight during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    ViewPost,
    Like,
    Bookmark,
    Comment,
    Follow,
    #[serde(other)]
    Other,
}

/// One row of a user's recent activity history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub topic_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Post with engagement counters.
///
/// `created_at` is `None` when the upstream row carried a missing or
/// unparseable timestamp; scorers that need an age skip such records
/// instead of failing the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMetrics {
    pub id: Uuid,
    pub author_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub topics: Vec<TopicRef>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub bookmarks_count: i64,
    pub views_count: i64,
}

/// Topic with aggregate engagement counters, pre-filtered upstream to
/// topics that have at least one post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicMetrics {
    pub id: Uuid,
    pub name: String,
    pub user_count: i64,
    pub post_count: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub total_views: i64,
}

/// One ranked entry in a recommendation list. The caller joins
/// `subject_id` back to the full entity and serializes the sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub subject_id: Uuid,
    pub score: f64,
    pub reason: String,
    #[serde(default)]
    pub metrics: HashMap<String, f64>,
}

impl RecommendationItem {
    pub fn new(subject_id: Uuid, score: f64, reason: impl Into<String>) -> Self {
        Self {
            subject_id,
            score,
            reason: reason.into(),
            metrics: HashMap::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: HashMap<String, f64>) -> Self {
        self.metrics = metrics;
        self
    }
}

/// Per-batch diagnostics for scorers that can drop or back-fill records.
/// Skips are counted, never silently swallowed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankStats {
    /// Records that produced a scored entry.
    pub scored: usize,
    /// Malformed records dropped (missing timestamp, negative counters).
    pub skipped: usize,
    /// Entries appended by a fallback filler.
    pub filled: usize,
}
