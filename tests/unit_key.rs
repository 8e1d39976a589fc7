use ferrous_automock::{key_of_named_type, key_of_trait, key_of_type, Key};
use std::collections::HashMap;

trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

trait Metrics: Send + Sync {}

struct Database;

#[test]
fn test_type_key_identity() {
    let a = key_of_type::<Database>();
    let b = key_of_type::<Database>();

    assert_eq!(a, b);
    assert_eq!(a.type_id(), b.type_id());
    assert!(a.display_name().contains("Database"));
    assert!(!a.is_named());
    assert_eq!(a.service_name(), None);
}

#[test]
fn test_trait_key_identity() {
    let a = key_of_trait::<dyn Logger>();
    let b = key_of_trait::<dyn Logger>();

    assert_eq!(a, b);
    assert!(a.display_name().contains("Logger"));
    assert!(!a.is_named());
}

#[test]
fn test_distinct_types_get_distinct_keys() {
    let type_key = key_of_type::<Database>();
    let logger_key = key_of_trait::<dyn Logger>();
    let metrics_key = key_of_trait::<dyn Metrics>();

    assert_ne!(type_key, logger_key);
    assert_ne!(logger_key, metrics_key);
    assert_ne!(logger_key.type_id(), metrics_key.type_id());
}

#[test]
fn test_named_key_distinct_from_unnamed() {
    let unnamed = key_of_type::<Database>();
    let primary = key_of_named_type::<Database>("primary");
    let replica = key_of_named_type::<Database>("replica");

    assert_ne!(unnamed, primary);
    assert_ne!(primary, replica);
    assert!(primary.is_named());
    assert_eq!(primary.service_name(), Some("primary"));
    // Named keys still report the same underlying type
    assert_eq!(unnamed.type_id(), primary.type_id());
    assert_eq!(unnamed.display_name(), primary.display_name());
}

#[test]
fn test_keys_usable_as_map_keys() {
    let mut map: HashMap<Key, u32> = HashMap::new();
    map.insert(key_of_type::<Database>(), 1);
    map.insert(key_of_trait::<dyn Logger>(), 2);
    map.insert(key_of_named_type::<Database>("primary"), 3);

    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&key_of_type::<Database>()), Some(&1));
    assert_eq!(map.get(&key_of_trait::<dyn Logger>()), Some(&2));
    assert_eq!(map.get(&key_of_named_type::<Database>("primary")), Some(&3));
    assert_eq!(map.get(&key_of_named_type::<Database>("replica")), None);
}
