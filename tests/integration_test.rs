use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use recommendation_engine::models::{
    ActivityEvent, ActivityKind, PostMetrics, RecommendationItem, TopicMetrics, TopicRef,
    UserProfile,
};
use recommendation_engine::{EngineConfig, RecommendationEngine};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn topic(name: &str) -> TopicRef {
    TopicRef {
        id: Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()),
        name: name.to_string(),
    }
}

fn user(username: &str, topics: &[&str]) -> UserProfile {
    UserProfile {
        id: Uuid::new_v5(&Uuid::NAMESPACE_OID, username.as_bytes()),
        username: username.to_string(),
        display_name: None,
        topics: topics.iter().map(|n| topic(n)).collect(),
    }
}

fn post(name: &str, topics: Vec<TopicRef>, age_hours: i64, likes: i64, comments: i64) -> PostMetrics {
    PostMetrics {
        id: Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()),
        author_id: None,
        created_at: Some(fixed_now() - Duration::hours(age_hours)),
        topics,
        likes_count: likes,
        comments_count: comments,
        bookmarks_count: 0,
        views_count: 0,
    }
}

fn activity(kind: ActivityKind, topic_id: Uuid) -> ActivityEvent {
    ActivityEvent {
        kind,
        topic_id: Some(topic_id),
        post_id: None,
        created_at: fixed_now(),
    }
}

fn keys(items: &[RecommendationItem]) -> Vec<(Uuid, u64)> {
    items
        .iter()
        .map(|i| (i.subject_id, i.score.to_bits()))
        .collect()
}

#[test]
fn test_topics_never_include_followed() {
    let engine = RecommendationEngine::new();
    let followed = topic("rust");
    let all = vec![followed.clone(), topic("go"), topic("zig")];

    // With activity signal on the followed topic itself
    let events = vec![activity(ActivityKind::Like, followed.id)];
    let items = engine.recommend_topics(&[followed.clone()], &events, &all, 10);
    assert!(items.iter().all(|i| i.subject_id != followed.id));

    // And on the cold-start path
    let items = engine.recommend_topics(&[followed.clone()], &[], &all, 10);
    assert!(items.iter().all(|i| i.subject_id != followed.id));
}

#[test]
fn test_topics_cold_start_returns_flat_list() {
    let engine = RecommendationEngine::new();
    let all = vec![topic("alpha"), topic("beta"), topic("gamma")];

    let items = engine.recommend_topics(&[], &[], &all, 10);

    assert_eq!(items.len(), all.len());
    for item in &items {
        assert!((item.score - 0.1).abs() < 1e-9);
        assert_eq!(item.reason, "Popular topic for new users");
    }
}

#[test]
fn test_users_jaccard_similarity() {
    let engine = RecommendationEngine::new();
    let requester = user("alice", &["a", "b", "c"]);
    let candidate = user("bob", &["a", "b", "d"]);

    let items = engine.recommend_users(requester.id, &requester.topics, &[candidate.clone()], &[], 10);

    assert_eq!(items.len(), 1);
    // {a,b,c} vs {a,b,d}: similarity 2/4, score 0.5 * (1 + 2 * 0.1)
    assert!((items[0].score - 0.6).abs() < 1e-9);
    assert_eq!(items[0].reason, "2 common interests");
}

#[test]
fn test_trending_posts_window_excludes_old_engagement() {
    let engine = RecommendationEngine::new();
    // Default window is 72h; this one is huge but a month old
    let viral_but_old = post("old", Vec::new(), 720, 9000, 4000);

    let (items, stats) = engine.trending_posts(&[viral_but_old], fixed_now(), 10);

    assert!(items.is_empty());
    assert_eq!(stats.scored, 0);
}

#[test]
fn test_trending_posts_recency_filler() {
    // Engagement floor high enough that nothing clears the primary path
    let mut config = EngineConfig::default();
    config.trending_posts.min_engagement = 10.0;
    let engine = RecommendationEngine::with_config(config);

    let too_old_for_filler = post("quiet", Vec::new(), 80, 3, 1);
    let recent = post("recent", Vec::new(), 12, 5, 0);

    let (items, stats) = engine.trending_posts(
        &[too_old_for_filler.clone(), recent.clone()],
        fixed_now(),
        10,
    );

    assert_eq!(stats.scored, 0);
    assert_eq!(stats.filled, 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].subject_id, recent.id);
    assert!((items[0].score - 5.0).abs() < 1e-9);
}

#[test]
fn test_feed_topic_gate_and_overlap_ordering() {
    let engine = RecommendationEngine::new();
    let a = topic("a");
    let b = topic("b");
    let interests = vec![a.clone(), b.clone()];

    let unrelated = post("unrelated", vec![topic("x")], 2, 100, 0);
    let single = post("single", vec![a.clone()], 2, 10, 0);
    let double = post("double", vec![a.clone(), b.clone()], 2, 10, 0);

    let (items, _) = engine.personalized_feed(
        &interests,
        &[unrelated.clone(), single.clone(), double.clone()],
        &[],
        fixed_now(),
        10,
    );

    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.subject_id != unrelated.id));
    assert_eq!(items[0].subject_id, double.id);
    assert!(items[0].score > items[1].score);
}

#[test]
fn test_all_operations_are_idempotent() {
    let engine = RecommendationEngine::new();
    let now = fixed_now();

    let followed = vec![topic("rust"), topic("databases")];
    let all_topics = vec![topic("rust"), topic("databases"), topic("go"), topic("zig")];
    let events = vec![
        activity(ActivityKind::Like, all_topics[2].id),
        activity(ActivityKind::Comment, all_topics[3].id),
    ];
    let users = vec![user("bob", &["rust", "go"]), user("carol", &["databases"])];
    let topic_metrics: Vec<TopicMetrics> = (0..4)
        .map(|i| TopicMetrics {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("tm{i}").as_bytes()),
            name: format!("tm{i}"),
            user_count: i * 7,
            post_count: i + 1,
            total_likes: i * 13,
            total_comments: i * 2,
            total_views: i * 40,
        })
        .collect();
    let posts = vec![
        post("p1", vec![topic("rust")], 2, 10, 3),
        post("p2", vec![topic("go")], 30, 50, 1),
        post("p3", vec![topic("databases")], 60, 2, 2),
    ];
    let requester = user("alice", &["rust", "databases"]);

    let first = (
        keys(&engine.recommend_topics(&followed, &events, &all_topics, 10)),
        keys(&engine.recommend_users(requester.id, &requester.topics, &users, &[], 10)),
        keys(&engine.trending_topics(&topic_metrics, 10).0),
        keys(&engine.trending_posts(&posts, now, 10).0),
        keys(&engine.personalized_feed(&requester.topics, &posts, &events, now, 10).0),
    );
    let second = (
        keys(&engine.recommend_topics(&followed, &events, &all_topics, 10)),
        keys(&engine.recommend_users(requester.id, &requester.topics, &users, &[], 10)),
        keys(&engine.trending_topics(&topic_metrics, 10).0),
        keys(&engine.trending_posts(&posts, now, 10).0),
        keys(&engine.personalized_feed(&requester.topics, &posts, &events, now, 10).0),
    );

    assert_eq!(first, second);
}

#[test]
fn test_no_operation_exceeds_limit() {
    let engine = RecommendationEngine::new();
    let now = fixed_now();
    let limit = 2;

    let all_topics: Vec<TopicRef> = (0..10).map(|i| topic(&format!("t{i}"))).collect();
    let users: Vec<UserProfile> = (0..10)
        .map(|i| user(&format!("u{i}"), &["a", "b"]))
        .collect();
    let topic_metrics: Vec<TopicMetrics> = (0..10)
        .map(|i| TopicMetrics {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("m{i}").as_bytes()),
            name: format!("m{i}"),
            user_count: i,
            post_count: 1,
            total_likes: i * 5,
            total_comments: 0,
            total_views: 0,
        })
        .collect();
    let posts: Vec<PostMetrics> = (0..10)
        .map(|i| post(&format!("p{i}"), vec![topic("a")], i + 1, 5, 1))
        .collect();
    let requester = user("alice", &["a"]);

    assert!(engine.recommend_topics(&[], &[], &all_topics, limit).len() <= limit);
    assert!(
        engine
            .recommend_users(requester.id, &requester.topics, &users, &[], limit)
            .len()
            <= limit
    );
    assert!(engine.trending_topics(&topic_metrics, limit).0.len() <= limit);
    assert!(engine.trending_posts(&posts, now, limit).0.len() <= limit);
    assert!(
        engine
            .personalized_feed(&requester.topics, &posts, &[], now, limit)
            .0
            .len()
            <= limit
    );
}

#[test]
fn test_sorted_descending_with_stable_ties() {
    let engine = RecommendationEngine::new();
    let all_topics: Vec<TopicRef> = (0..5).map(|i| topic(&format!("t{i}"))).collect();

    // Cold start: all scores equal, so the input order must be preserved
    let items = engine.recommend_topics(&[], &[], &all_topics, 10);
    let ids: Vec<Uuid> = items.iter().map(|i| i.subject_id).collect();
    let expected: Vec<Uuid> = all_topics.iter().map(|t| t.id).collect();
    assert_eq!(ids, expected);

    // Mixed scores stay descending
    let posts = vec![
        post("p1", Vec::new(), 2, 5, 0),
        post("p2", Vec::new(), 2, 50, 0),
        post("p3", Vec::new(), 2, 20, 0),
    ];
    let (ranked, _) = engine.trending_posts(&posts, fixed_now(), 10);
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_recommendation_item_wire_shape() {
    let engine = RecommendationEngine::new();
    let posts = vec![post("p1", Vec::new(), 2, 5, 1)];

    let (items, _) = engine.trending_posts(&posts, fixed_now(), 10);
    let value = serde_json::to_value(&items[0]).unwrap();

    assert!(value["subject_id"].is_string());
    assert!(value["score"].is_number());
    assert!(value["reason"].is_string());
    assert!(value["metrics"]["likes"].is_number());
    assert!(value["metrics"]["age_hours"].is_number());
}
