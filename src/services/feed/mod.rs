use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::FeedScoring;
use crate::models::{ActivityEvent, ActivityKind, PostMetrics, RankStats, RecommendationItem, TopicRef};
use crate::utils::{age_hours, exponential_decay};

const REASON_DEFAULT: &str = "based on your interests";
const REASON_RECENT_POPULAR: &str = "Recent popular post";

/// Ranks candidate posts for a user's feed by topic overlap, engagement,
/// recency decay and activity-pattern boost. Users without topics fall back
/// to a pure recency-and-engagement ranking.
pub struct FeedRanker {
    scoring: FeedScoring,
}

impl Default for FeedRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedRanker {
    pub fn new() -> Self {
        Self::with_config(FeedScoring::default())
    }

    pub fn with_config(scoring: FeedScoring) -> Self {
        Self { scoring }
    }

    /// Rank candidate posts as of `now`.
    ///
    /// Posts sharing no topic with the user (by id, then by lowercased
    /// name) are excluded. Posts without a timestamp are skipped and
    /// counted.
    pub fn rank(
        &self,
        user_topics: &[TopicRef],
        posts: &[PostMetrics],
        user_activity: &[ActivityEvent],
        now: DateTime<Utc>,
        limit: usize,
    ) -> (Vec<RecommendationItem>, RankStats) {
        if user_topics.is_empty() {
            return self.rank_by_recency(posts, now, limit);
        }

        let topic_ids: HashSet<Uuid> = user_topics.iter().map(|t| t.id).collect();
        let topic_names: HashSet<String> =
            user_topics.iter().map(|t| t.name.to_lowercase()).collect();
        let activity_boost = self.activity_boost(user_activity);

        let mut stats = RankStats::default();
        let mut items: Vec<RecommendationItem> = Vec::new();

        for post in posts {
            let post_topic_ids: HashSet<Uuid> = post.topics.iter().map(|t| t.id).collect();
            let id_matches = post_topic_ids.intersection(&topic_ids).count();

            let topic_score = if id_matches > 0 {
                id_matches as f64 * self.scoring.id_match_weight
            } else {
                let post_topic_names: HashSet<String> =
                    post.topics.iter().map(|t| t.name.to_lowercase()).collect();
                let name_matches = post_topic_names.intersection(&topic_names).count();
                if name_matches == 0 {
                    continue;
                }
                name_matches as f64 * self.scoring.name_match_weight
            };

            let Some(created_at) = post.created_at else {
                debug!(post_id = %post.id, "Skipping post without timestamp");
                stats.skipped += 1;
                continue;
            };
            let age = age_hours(now, created_at);

            let likes = post.likes_count.max(0) as f64;
            let comments = post.comments_count.max(0) as f64;
            let bookmarks = post.bookmarks_count.max(0) as f64;
            let views = post.views_count.max(0) as f64;
            let engagement = likes
                + comments * self.scoring.comment_weight
                + bookmarks * self.scoring.bookmark_weight
                + views * self.scoring.view_weight;

            let recency = exponential_decay(age, self.scoring.decay_hours);
            let score = topic_score
                * (1.0 + engagement.ln_1p() * self.scoring.engagement_log_weight)
                * recency
                * activity_boost;

            let metrics = HashMap::from([
                ("topic_matches".to_string(), id_matches as f64),
                ("engagement".to_string(), engagement),
                ("age_hours".to_string(), age),
                ("likes".to_string(), likes),
                ("comments".to_string(), comments),
            ]);

            items.push(
                RecommendationItem::new(post.id, score, self.compose_reason(id_matches, engagement, age))
                    .with_metrics(metrics),
            );
        }

        stats.scored = items.len();
        items.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        items.truncate(limit);

        info!(
            scored = stats.scored,
            skipped = stats.skipped,
            "Personalized feed ranked"
        );

        (items, stats)
    }

    /// Fallback for users without topics: engagement with a weekly decay.
    fn rank_by_recency(
        &self,
        posts: &[PostMetrics],
        now: DateTime<Utc>,
        limit: usize,
    ) -> (Vec<RecommendationItem>, RankStats) {
        let mut stats = RankStats::default();
        let mut items: Vec<RecommendationItem> = Vec::new();

        for post in posts {
            let Some(created_at) = post.created_at else {
                stats.skipped += 1;
                continue;
            };
            let age = age_hours(now, created_at);

            let likes = post.likes_count.max(0) as f64;
            let comments = post.comments_count.max(0) as f64;
            let engagement = likes + comments * self.scoring.fallback_comment_weight;
            let score = engagement * exponential_decay(age, self.scoring.decay_hours);

            items.push(RecommendationItem::new(post.id, score, REASON_RECENT_POPULAR));
        }

        stats.scored = items.len();
        items.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        items.truncate(limit);

        info!(
            scored = stats.scored,
            skipped = stats.skipped,
            "Feed fallback ranked by recency"
        );

        (items, stats)
    }

    /// Users who interact a lot get a small multiplier on everything; the
    /// boost reflects how engaged the user is, not which posts they touched.
    fn activity_boost(&self, user_activity: &[ActivityEvent]) -> f64 {
        let mut counts: HashMap<ActivityKind, usize> = HashMap::new();
        for event in user_activity {
            *counts.entry(event.kind).or_insert(0) += 1;
        }

        let mut boost = 1.0;
        if counts.get(&ActivityKind::Like).copied().unwrap_or(0) > self.scoring.like_boost_threshold
        {
            boost += self.scoring.like_boost;
        }
        if counts.get(&ActivityKind::Comment).copied().unwrap_or(0)
            > self.scoring.comment_boost_threshold
        {
            boost += self.scoring.comment_boost;
        }
        boost
    }

    fn compose_reason(&self, id_matches: usize, engagement: f64, age: f64) -> String {
        let mut reasons: Vec<String> = Vec::new();
        if id_matches > 0 {
            reasons.push(format!("{id_matches} matching interests"));
        }
        if engagement > self.scoring.high_engagement_threshold {
            reasons.push("high engagement".to_string());
        }
        if age < self.scoring.recent_hours {
            reasons.push("recent".to_string());
        }

        if reasons.is_empty() {
            REASON_DEFAULT.to_string()
        } else {
            reasons.join(", ")
        }
    }
}
