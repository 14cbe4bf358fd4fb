use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::TrendingPostScoring;
use crate::models::{PostMetrics, RankStats, RecommendationItem};
use crate::utils::{age_hours, exponential_decay};

const REASON_TRENDING: &str = "Trending post";
const REASON_RECENT: &str = "Recent post with engagement";

/// Ranks posts inside a time window by decayed engagement velocity, with a
/// discussion-ratio boost. A recency filler tops short result lists up to
/// `limit` with recent engaged posts from outside the scored set.
pub struct TrendingPostsScorer {
    scoring: TrendingPostScoring,
}

impl Default for TrendingPostsScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendingPostsScorer {
    pub fn new() -> Self {
        Self::with_config(TrendingPostScoring::default())
    }

    pub fn with_config(scoring: TrendingPostScoring) -> Self {
        Self { scoring }
    }

    pub fn with_window_hours(mut self, window_hours: f64) -> Self {
        self.scoring.window_hours = window_hours;
        self
    }

    pub fn with_min_engagement(mut self, min_engagement: f64) -> Self {
        self.scoring.min_engagement = min_engagement;
        self
    }

    /// Score and rank a batch of posts as of `now`.
    ///
    /// Posts without a timestamp are skipped and counted; posts outside the
    /// window or under the engagement floor are filtered without counting
    /// as malformed.
    pub fn rank(
        &self,
        posts: &[PostMetrics],
        now: DateTime<Utc>,
        limit: usize,
    ) -> (Vec<RecommendationItem>, RankStats) {
        let mut stats = RankStats::default();
        let mut items: Vec<RecommendationItem> = Vec::new();

        for post in posts {
            let Some(created_at) = post.created_at else {
                debug!(post_id = %post.id, "Skipping post without timestamp");
                stats.skipped += 1;
                continue;
            };

            let age = age_hours(now, created_at);
            if age > self.scoring.window_hours {
                continue;
            }

            let likes = post.likes_count.max(0) as f64;
            let comments = post.comments_count.max(0) as f64;
            let bookmarks = post.bookmarks_count.max(0) as f64;
            let views = post.views_count.max(0) as f64;

            let engagement = likes * self.scoring.like_weight
                + comments * self.scoring.comment_weight
                + bookmarks * self.scoring.bookmark_weight
                + views * self.scoring.view_weight;
            if engagement < self.scoring.min_engagement {
                continue;
            }

            let decay = exponential_decay(age, self.scoring.decay_hours);
            let velocity = if age > 0.0 { engagement / age } else { engagement };
            let mut score = engagement * decay * (1.0 + velocity.ln_1p() * self.scoring.velocity_boost);

            if likes > 0.0 {
                let discussion_factor = (comments / likes).min(self.scoring.discussion_cap);
                score *= 1.0 + discussion_factor * self.scoring.discussion_boost;
            }

            let metrics = HashMap::from([
                ("likes".to_string(), likes),
                ("comments".to_string(), comments),
                ("bookmarks".to_string(), bookmarks),
                ("views".to_string(), views),
                ("age_hours".to_string(), age),
                ("engagement".to_string(), engagement),
            ]);

            items.push(RecommendationItem::new(post.id, score, REASON_TRENDING).with_metrics(metrics));
        }

        stats.scored = items.len();
        items.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if items.len() < limit {
            self.fill_recent(posts, now, limit, &mut items, &mut stats);
        }
        items.truncate(limit);

        info!(
            scored = stats.scored,
            skipped = stats.skipped,
            filled = stats.filled,
            "Trending posts ranked"
        );

        (items, stats)
    }

    /// Top the list up with posts from the last day that drew any likes or
    /// comments, ranked by a flat engagement score and appended after the
    /// primary results. Guarantees a non-empty trending list whenever any
    /// recent engaged content exists.
    fn fill_recent(
        &self,
        posts: &[PostMetrics],
        now: DateTime<Utc>,
        limit: usize,
        items: &mut Vec<RecommendationItem>,
        stats: &mut RankStats,
    ) {
        let existing: HashSet<Uuid> = items.iter().map(|i| i.subject_id).collect();

        let mut fallback: Vec<RecommendationItem> = Vec::new();
        for post in posts {
            let Some(created_at) = post.created_at else {
                continue;
            };
            if age_hours(now, created_at) > self.scoring.fallback_window_hours {
                continue;
            }
            if existing.contains(&post.id) {
                continue;
            }

            let likes = post.likes_count.max(0) as f64;
            let comments = post.comments_count.max(0) as f64;
            if likes <= 0.0 && comments <= 0.0 {
                continue;
            }

            let score = likes * self.scoring.fallback_like_weight
                + comments * self.scoring.fallback_comment_weight;

            let metrics = HashMap::from([
                ("likes".to_string(), likes),
                ("comments".to_string(), comments),
                ("bookmarks".to_string(), 0.0),
                ("views".to_string(), 0.0),
                ("engagement".to_string(), score),
            ]);

            fallback.push(RecommendationItem::new(post.id, score, REASON_RECENT).with_metrics(metrics));
        }

        fallback.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for item in fallback.into_iter().take(limit - items.len()) {
            items.push(item);
            stats.filled += 1;
        }
    }
}
