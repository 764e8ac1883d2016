use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use uuid::Uuid;

use super::id::{IdGenerator, RandomIdGenerator, TopicId};
use super::{Content, Selection, TopicStore, Viewport};
use crate::utils::error::{IdError, StoreError};

/// Generator whose entropy source is always unavailable.
pub(crate) struct BrokenEntropy;

impl IdGenerator for BrokenEntropy {
    fn generate(&self) -> Result<TopicId, IdError> {
        Err(IdError::Entropy("no entropy".to_string()))
    }
}

/// Hands out the same id every time.
struct Stuck;

impl IdGenerator for Stuck {
    fn generate(&self) -> Result<TopicId, IdError> {
        Ok("fixed".to_string())
    }
}

struct Counter(AtomicUsize);

impl IdGenerator for Counter {
    fn generate(&self) -> Result<TopicId, IdError> {
        Ok(format!("t{}", self.0.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

#[test]
fn test_random_ids_are_canonical_v4() {
    let id = RandomIdGenerator.generate().unwrap();
    let parsed = Uuid::parse_str(&id).unwrap();
    assert_eq!(parsed.get_version_num(), 4);
    assert_eq!(parsed.hyphenated().to_string(), id);
}

#[test]
fn test_random_ids_do_not_repeat() {
    let ids: HashSet<_> = (0..1000)
        .map(|_| RandomIdGenerator.generate().unwrap())
        .collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn test_create_initialises_every_facet() {
    let store = TopicStore::new();
    let topic = store.create().unwrap();

    assert_eq!(topic.content, Content::default());
    assert_eq!(topic.viewport, Viewport { x: 0.0, y: 0.0 });
    assert_eq!(topic.selection, Selection::new(json!({})).unwrap());
    assert_eq!(store.get(&topic.id).unwrap(), topic);
}

#[test]
fn test_create_fails_without_entropy() {
    let store = TopicStore::with_generator(BrokenEntropy);
    let err = store.create().unwrap_err();
    assert!(matches!(err, StoreError::Generation(_)));
    assert!(store.is_empty());
}

#[test]
fn test_create_rejects_colliding_id() {
    let store = TopicStore::with_generator(Stuck);
    store.create().unwrap();
    let content = Content {
        title: "kept".into(),
        data: "".into(),
    };
    store.set_content("fixed", content.clone()).unwrap();

    assert!(matches!(store.create(), Err(StoreError::Generation(_))));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get_content("fixed").unwrap(), content);
}

#[test]
fn test_selection_must_be_object_or_array() {
    assert!(Selection::new(json!([[0, 3], [5, 9]])).is_ok());
    assert!(Selection::new(json!({})).is_ok());
    for bad in [json!(null), json!(42), json!("range"), json!(true)] {
        assert!(Selection::new(bad.clone()).is_err(), "{}", bad);
        assert!(serde_json::from_value::<Selection>(bad).is_err());
    }
    assert_eq!(Selection::default().as_value(), &json!({}));
}

#[test]
fn test_set_content_replaces_both_fields() {
    let store = TopicStore::new();
    let id = store.create().unwrap().id;

    store
        .set_content(&id, Content { title: "A".into(), data: "a".into() })
        .unwrap();
    store
        .set_content(&id, Content { title: "T".into(), data: "D".into() })
        .unwrap();

    assert_eq!(
        store.get_content(&id).unwrap(),
        Content { title: "T".into(), data: "D".into() }
    );
}

#[test]
fn test_facets_are_independent() {
    let store = TopicStore::new();
    let id = store.create().unwrap().id;

    store.set_viewport(&id, Viewport { x: 2.5, y: -1.0 }).unwrap();
    store
        .set_selection(&id, Selection::new(json!({"ranges": [[0, 3]]})).unwrap())
        .unwrap();

    let topic = store.get(&id).unwrap();
    assert_eq!(topic.viewport, Viewport { x: 2.5, y: -1.0 });
    assert_eq!(topic.selection, Selection::new(json!({"ranges": [[0, 3]]})).unwrap());
    assert_eq!(topic.content, Content::default());
}

#[test]
fn test_absent_topic_is_not_found() {
    let store = TopicStore::new();

    assert!(matches!(store.get("nope"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.get_content("nope"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.get_viewport("nope"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.get_selection("nope"), Err(StoreError::NotFound(_))));
    assert!(matches!(
        store.set_content("nope", Content::default()),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.set_viewport("nope", Viewport::default()),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.set_selection("nope", Selection::default()),
        Err(StoreError::NotFound(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn test_delete_is_idempotent() {
    let store = TopicStore::new();
    let id = store.create().unwrap().id;

    store.delete(&id);
    store.delete(&id);
    store.delete("never-existed");

    assert!(matches!(store.get(&id), Err(StoreError::NotFound(_))));
    assert!(store.list().is_empty());
}

#[test]
fn test_list_and_status_are_ordered_by_id() {
    let store = TopicStore::with_generator(Counter(AtomicUsize::new(0)));
    for _ in 0..3 {
        store.create().unwrap();
    }
    store
        .set_content("t2", Content { title: "second".into(), data: "x".into() })
        .unwrap();

    let ids: Vec<_> = store.list().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["t1", "t2", "t3"]);
    assert_eq!(store.list(), store.list());

    let status = store.status();
    assert_eq!(status.count, 3);
    let titles: Vec<_> = status.sessions.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["", "second", ""]);
}

#[test]
fn test_created_id_never_seen_in_earlier_snapshots() {
    let store = TopicStore::new();
    let mut seen = HashSet::new();
    for _ in 0..50 {
        seen.extend(store.list().into_iter().map(|t| t.id));
        let topic = store.create().unwrap();
        assert!(!seen.contains(&topic.id));
    }
}

#[test]
fn test_concurrent_create_delete_and_updates() {
    let store = TopicStore::new();
    let workers = 8;
    let per_worker = 50;

    let survivors: Vec<Vec<String>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                let store = &store;
                s.spawn(move || {
                    let mut kept = Vec::new();
                    for i in 0..per_worker {
                        let id = store.create().unwrap().id;
                        store
                            .set_content(
                                &id,
                                Content { title: format!("w{}", w), data: i.to_string() },
                            )
                            .unwrap();
                        store
                            .set_viewport(&id, Viewport { x: w as f64, y: i as f64 })
                            .unwrap();
                        if i % 2 == 0 {
                            store.delete(&id);
                        } else {
                            kept.push(id);
                        }
                    }
                    kept
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let expected: HashSet<String> = survivors.into_iter().flatten().collect();
    let listed = store.list();
    let listed_ids: HashSet<String> = listed.iter().map(|t| t.id.clone()).collect();
    assert_eq!(listed_ids, expected);
    assert_eq!(store.status().count, expected.len());

    for topic in listed {
        // each facet pair was written together, so x matches the title's worker
        let worker: f64 = topic.content.title[1..].parse().unwrap();
        let row: f64 = topic.content.data.parse().unwrap();
        assert_eq!(topic.viewport, Viewport { x: worker, y: row });
        assert_eq!(topic.selection, Selection::default());
    }
}

#[test]
fn test_concurrent_facet_writers_on_one_topic_converge() {
    let store = TopicStore::new();
    let id = store.create().unwrap().id;
    let v1 = Viewport { x: 10.0, y: 20.0 };
    let c1 = Content { title: "T".into(), data: "D".into() };

    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 0..200 {
                store.set_viewport(&id, Viewport { x: i as f64, y: i as f64 }).unwrap();
            }
            store.set_viewport(&id, v1).unwrap();
        });
        s.spawn(|| {
            for i in 0..200 {
                store
                    .set_content(&id, Content { title: i.to_string(), data: i.to_string() })
                    .unwrap();
            }
            store.set_content(&id, c1.clone()).unwrap();
        });
        s.spawn(|| {
            for _ in 0..200 {
                // never a new x paired with an old y
                let v = store.get_viewport(&id).unwrap();
                assert!(v.x == v.y || v == v1);
                let c = store.get_content(&id).unwrap();
                assert!(c.title == c.data || c == c1);
            }
        });
    });

    assert_eq!(store.get_viewport(&id).unwrap(), v1);
    assert_eq!(store.get_content(&id).unwrap(), c1);
}
