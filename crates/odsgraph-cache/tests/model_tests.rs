//! Integration tests for schema and instance operations.

use odsgraph_cache::schema::{AttributeDef, RelationDef};
use odsgraph_cache::{CacheConfig, CacheError, ConstraintError, ModelCache, ModelState, NotFoundError, SchemaError};
use odsgraph_core::{DataKind, DataType, InstanceId, RelationRange, TypedValue, Value};

fn string() -> DataType {
    DataType::scalar(DataKind::String)
}

// ============================================================================
// End-to-end scenario
// ============================================================================

#[test]
fn test_measurement_channels_scenario() {
    let cache = ModelCache::new();
    let meas = cache.register_type("Measurement", "AoMeasurement").expect("register Measurement");
    let channel = cache.register_type("Channel", "AoMeasurementQuantity").expect("register Channel");
    cache
        .add_attribute(meas, AttributeDef::new("name").with_data_type(string()))
        .expect("add name");

    let channels = cache
        .add_relation(RelationDef::new("channels", "measurement", meas).with_target(channel))
        .expect("add channels");
    let measurement = cache
        .add_relation(
            RelationDef::new("measurement", "channels", channel)
                .with_target(meas)
                .with_range(RelationRange::new(0, 1)),
        )
        .expect("add measurement");

    let m1 = cache.insert(meas).unwrap();
    let c1 = cache.insert(channel).unwrap();
    let c2 = cache.insert(channel).unwrap();
    assert_eq!((m1.as_u64(), c1.as_u64(), c2.as_u64()), (1, 1, 2));

    cache.connect(meas, m1, channels, c1).unwrap();
    cache.connect(meas, m1, channels, c2).unwrap();

    assert_eq!(cache.query(meas, m1, channels).unwrap().into_iter().collect::<Vec<_>>(), vec![c1, c2]);
    assert_eq!(cache.query(channel, c1, measurement).unwrap().into_iter().collect::<Vec<_>>(), vec![m1]);
    assert_eq!(cache.query(channel, c2, measurement).unwrap().into_iter().collect::<Vec<_>>(), vec![m1]);
}

// ============================================================================
// Type Tests
// ============================================================================

#[test]
fn test_type_lookup_by_name_and_base() {
    let mut state = ModelState::default();
    let a = state.register_type("Unit", "AoUnit").unwrap();
    let b = state.register_type("OtherUnit", "AoUnit").unwrap();
    state.register_type("Test", "AoTest").unwrap();

    assert_eq!(state.type_by_name("Unit"), Some(a));
    assert_eq!(state.type_name(b).unwrap(), "OtherUnit");
    assert_eq!(state.base_type_of(b).unwrap(), "AoUnit");
    assert_eq!(state.types_by_base_type("aounit"), vec![a, b]);
    assert_eq!(state.list_types().len(), 3);
}

#[test]
fn test_rename_type() {
    let mut state = ModelState::default();
    let a = state.register_type("A", "AoAny").unwrap();
    state.register_type("B", "AoAny").unwrap();

    let err = state.rename_type(a, "B").unwrap_err();
    assert!(matches!(err, CacheError::Schema(SchemaError::DuplicateName(_))));

    state.rename_type(a, "C").unwrap();
    assert_eq!(state.type_by_name("C"), Some(a));
    assert!(state.type_by_name("A").is_none());
}

#[test]
fn test_unknown_type_is_not_found() {
    let state = ModelState::default();
    let err = state.list_ids(odsgraph_core::TypeId::new(42)).unwrap_err();
    assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownType(_))));
}

#[test]
fn test_configured_name_length() {
    let mut state = ModelState::new(CacheConfig::new().max_name_length(5));
    state.register_type("Short", "AoAny").unwrap();
    let err = state.register_type("TooLong", "AoAny").unwrap_err();
    assert!(matches!(err, CacheError::Schema(SchemaError::InvalidName { .. })));
}

// ============================================================================
// Attribute Tests
// ============================================================================

#[test]
fn test_rename_attribute_preserves_values() {
    let mut state = ModelState::default();
    let t = state.register_type("Test", "AoTest").unwrap();
    state.add_attribute(t, AttributeDef::new("label").with_data_type(string())).unwrap();
    let i = state.insert(t).unwrap();
    state.set_value(t, i, "label", "before").unwrap();
    let before = state.get_value(t, i, "label").unwrap();

    state.rename_attribute(t, "label", "title").unwrap();

    assert_eq!(state.get_value(t, i, "title").unwrap(), before);
    let err = state.get_value(t, i, "label").unwrap_err();
    assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownAttribute { .. })));
}

#[test]
fn test_failed_rename_changes_nothing() {
    let mut state = ModelState::default();
    let t = state.register_type("Test", "AoTest").unwrap();
    state.add_attribute(t, AttributeDef::new("a").with_data_type(string())).unwrap();
    state.add_attribute(t, AttributeDef::new("b").with_data_type(string())).unwrap();
    let i = state.insert(t).unwrap();
    state.set_value(t, i, "a", "kept").unwrap();

    assert!(state.rename_attribute(t, "a", "b").is_err());
    assert_eq!(state.get_value(t, i, "a").unwrap(), TypedValue::from("kept"));
}

#[test]
fn test_remove_attribute_drops_values() {
    let mut state = ModelState::default();
    let t = state.register_type("Test", "AoTest").unwrap();
    state.add_attribute(t, AttributeDef::new("a").with_data_type(string())).unwrap();
    let i = state.insert(t).unwrap();
    state.set_value(t, i, "a", "gone").unwrap();

    state.remove_attribute(t, "a").unwrap();
    assert!(state.get_values(t, i).unwrap().is_empty());

    // a new attribute of the same name starts empty
    state.add_attribute(t, AttributeDef::new("a").with_data_type(string())).unwrap();
    assert!(!state.get_value(t, i, "a").unwrap().is_set());
}

#[test]
fn test_obligatory_lock_in() {
    let cache = ModelCache::new();
    let t = cache.register_type("Test", "AoTest").unwrap();
    cache.add_attribute(t, AttributeDef::new("iname").with_base("name")).unwrap();

    let err = cache.set_obligatory(t, "iname", false).unwrap_err();
    assert!(matches!(err, CacheError::Constraint(ConstraintError::ObligatoryDowngradeRejected { .. })));
    assert!(cache.is_obligatory(t, "iname").unwrap());
}

#[test]
fn test_derived_data_type_is_fixed() {
    let mut state = ModelState::default();
    let t = state.register_type("Test", "AoTest").unwrap();
    state.add_attribute(t, AttributeDef::new("iname").with_base("name")).unwrap();
    let err = state.set_data_type(t, "iname", DataType::scalar(DataKind::Int32)).unwrap_err();
    assert!(matches!(err, CacheError::Schema(SchemaError::IncompatibleDataType { .. })));

    // setting the same type again is a no-op
    state.set_data_type(t, "iname", string()).unwrap();
}

#[test]
fn test_attribute_flags() {
    let mut state = ModelState::default();
    let unit = state.register_type("Unit", "AoUnit").unwrap();
    let t = state.register_type("Test", "AoTest").unwrap();
    state.add_attribute(t, AttributeDef::new("speed").with_data_type(DataType::scalar(DataKind::Float64))).unwrap();
    let u = state.insert(unit).unwrap();

    state.set_unique(t, "speed", true).unwrap();
    state.set_autogenerated(t, "speed", true).unwrap();
    state.set_length(t, "speed", 8).unwrap();
    state.set_unit(t, "speed", Some(u)).unwrap();

    let attr = state.attribute(t, "speed").unwrap();
    assert!(attr.is_unique());
    assert!(attr.is_autogenerated());
    assert_eq!(attr.length(), 8);
    assert_eq!(attr.unit(), Some(u));

    let err = state.set_enumeration_type(t, "speed", Some("colors".into())).unwrap_err();
    assert!(err.is_schema_error());
}

#[test]
fn test_list_attributes_in_definition_order() {
    let mut state = ModelState::default();
    let t = state.register_type("Test", "AoTest").unwrap();
    for name in ["zeta", "alpha", "mid"] {
        state.add_attribute(t, AttributeDef::new(name).with_data_type(string())).unwrap();
    }
    let names: Vec<_> = state.list_attributes(t).unwrap().iter().map(|a| a.name().to_owned()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

// ============================================================================
// Instance Tests
// ============================================================================

#[test]
fn test_instance_id_reuse_after_full_delete() {
    let cache = ModelCache::new();
    let t = cache.register_type("Test", "AoTest").unwrap();
    assert_eq!(cache.insert(t).unwrap(), InstanceId::new(1));
    assert_eq!(cache.insert(t).unwrap(), InstanceId::new(2));
    cache.delete(t, InstanceId::new(1)).unwrap();
    cache.delete(t, InstanceId::new(2)).unwrap();
    assert_eq!(cache.next_instance_id(t).unwrap(), InstanceId::new(1));
    assert_eq!(cache.insert(t).unwrap(), InstanceId::new(1));
}

#[test]
fn test_get_values_returns_only_set_values() {
    let mut state = ModelState::default();
    let t = state.register_type("Test", "AoTest").unwrap();
    state.add_attribute(t, AttributeDef::new("a").with_data_type(string())).unwrap();
    state.add_attribute(t, AttributeDef::new("b").with_data_type(DataType::sequence(DataKind::Float64))).unwrap();
    state.add_attribute(t, AttributeDef::new("c").with_data_type(string())).unwrap();
    let i = state.insert(t).unwrap();
    state.set_value(t, i, "b", Value::from(Vec::<f64>::new())).unwrap();
    state.set_value(t, i, "a", "x").unwrap();

    let values = state.get_values(t, i).unwrap();
    let names: Vec<_> = values.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    // an empty sequence is a value, not "unset"
    assert!(values[1].1.is_set());
    assert_eq!(values[1].1.value().and_then(Value::as_sequence).map(|s| s.len()), Some(0));
}

#[test]
fn test_instance_attributes() {
    let mut state = ModelState::default();
    let t = state.register_type("Test", "AoTest").unwrap();
    let i = state.insert(t).unwrap();

    state.set_instance_attribute(t, i, "operator", "jane").unwrap();
    state.set_instance_attribute(t, i, "bench", 4i32).unwrap();
    assert_eq!(state.list_instance_attribute_names(t, i).unwrap(), vec!["operator", "bench"]);
    assert_eq!(state.get_instance_attribute(t, i, "bench").unwrap(), TypedValue::from(4i32));

    state.remove_instance_attribute(t, i, "operator").unwrap();
    assert!(state.get_instance_attribute(t, i, "operator").unwrap_err().is_not_found());
    assert!(state.remove_instance_attribute(t, i, "operator").unwrap_err().is_not_found());
}

#[test]
fn test_delete_unknown_instance() {
    let cache = ModelCache::new();
    let t = cache.register_type("Test", "AoTest").unwrap();
    let err = cache.delete(t, InstanceId::new(1)).unwrap_err();
    assert!(matches!(err, CacheError::NotFound(NotFoundError::UnknownInstance { .. })));
}

#[test]
fn test_cursor_snapshot() {
    let cache = ModelCache::new();
    let t = cache.register_type("Test", "AoTest").unwrap();
    for _ in 0..4 {
        cache.insert(t).unwrap();
    }
    let mut cursor = cache.cursor(t).unwrap();
    cache.delete(t, InstanceId::new(1)).unwrap();

    assert_eq!(cursor.count(), 4);
    let ids: Vec<_> = cursor.next_n(3).iter().map(|h| h.instance_id.as_u64()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(cursor.next_one().unwrap().instance_id.as_u64(), 4);
    assert!(cursor.next_one().unwrap_err().is_not_found());
}
