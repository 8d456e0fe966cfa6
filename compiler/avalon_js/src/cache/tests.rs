use super::*;

#[test]
fn empty_cache_has_nothing() {
    let cache = ArtifactCache::new();
    assert!(cache.is_empty());
    assert!(cache.get(ObjectId::new(1)).is_none());
}

#[test]
fn first_artifact_wins() {
    let mut cache = ArtifactCache::new();
    let first = cache.insert(ObjectId::new(1), "a".to_owned());
    let second = cache.insert(ObjectId::new(1), "b".to_owned());
    assert_eq!(&*first, "a");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn artifacts_are_keyed_by_identity() {
    let mut cache = ArtifactCache::new();
    cache.insert(ObjectId::new(1), "a".to_owned());
    assert!(cache.contains(ObjectId::new(1)));
    assert!(!cache.contains(ObjectId::new(2)));
    assert_eq!(cache.get(ObjectId::new(1)).as_deref(), Some("a"));
}
