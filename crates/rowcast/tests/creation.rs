//! End-to-end creation over the reference in-memory collaborator.

use rowcast::{prelude::*, record};
use std::sync::Arc;

fn basic() -> (Arc<MemoryModel>, Serializer) {
    let model = MemoryModel::new("BasicModel", ["name"]);
    let schema = Schema::builder(model.clone()).field("name").resolve().unwrap();

    (model, Serializer::new(schema))
}

fn name_of(instance: &Instance) -> Option<Value> {
    instance
        .as_any()
        .downcast_ref::<MemoryInstance>()
        .and_then(|instance| instance.get("name").cloned())
}

#[test]
fn single_normal_creation() {
    let (model, serializer) = basic();

    serializer
        .create(record! { "name" => "TestCreation" }.into(), "normal")
        .unwrap();

    let rows = model.instances();
    assert_eq!(rows.len(), 1);
    assert_eq!(name_of(&rows[0]), Some(Value::Text("TestCreation".to_string())));
}

#[test]
fn multiple_normal_creation() {
    let (model, serializer) = basic();

    let payload = Payload::Batch(vec![
        record! { "name" => "TestCreation" },
        record! { "name" => "TestCreation2" },
    ]);
    serializer.create(payload, "normal").unwrap();

    let rows = model.instances();
    assert_eq!(rows.len(), 2);
    assert_eq!(name_of(&rows[0]), Some(Value::Text("TestCreation".to_string())));
    assert_eq!(name_of(&rows[1]), Some(Value::Text("TestCreation2".to_string())));
}

#[test]
fn invalid_normal_creation_persists_nothing() {
    let (model, serializer) = basic();

    let err = serializer
        .create(record! { "na" => "TestCreation" }.into(), "normal")
        .unwrap_err();

    assert!(matches!(err, Error::Validation(ValidationError::KeysMismatch { .. })));
    assert!(model.is_empty());
}

#[test]
fn invalid_creation_mode_persists_nothing() {
    let (model, serializer) = basic();

    let err = serializer
        .create(record! { "name" => "x" }.into(), "bogus")
        .unwrap_err();

    assert!(matches!(err, Error::Dispatch(DispatchError::Creation { ref mode }) if mode == "bogus"));
    assert!(model.is_empty());
}

#[test]
fn single_split_creation() {
    let (model, serializer) = basic();

    let payload = SplitPayload {
        model: vec!["name".to_string()],
        data: vec![vec![Value::Text("TestSplitCreation".to_string())]],
    };
    serializer.create(payload.into(), "split").unwrap();

    let rows = model.instances();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        name_of(&rows[0]),
        Some(Value::Text("TestSplitCreation".to_string()))
    );
}

#[test]
fn multiple_split_creation() {
    let (model, serializer) = basic();

    let payload = SplitPayload {
        model: vec!["name".to_string()],
        data: vec![
            vec![Value::Text("TestSplitCreation".to_string())],
            vec![Value::Text("TestSplitCreation2Two".to_string())],
        ],
    };
    serializer.create(payload.into(), "split").unwrap();

    let rows = model.instances();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        name_of(&rows[1]),
        Some(Value::Text("TestSplitCreation2Two".to_string()))
    );
}

#[test]
fn invalid_split_creation_persists_nothing() {
    let (model, serializer) = basic();

    let payload = SplitPayload {
        model: vec!["nam".to_string()],
        data: vec![vec![Value::Text("TestSplitCreation".to_string())]],
    };
    let err = serializer.create(payload.into(), "split").unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::FieldListMismatch { .. })
    ));
    assert!(model.is_empty());
}

#[test]
fn loose_split_payload_decodes_from_json() {
    let (model, serializer) = basic();

    let record: Record =
        serde_json::from_str(r#"{"model": ["name"], "data": [["FromJson"]]}"#).unwrap();
    serializer.create(record.into(), "split").unwrap();

    let rows = model.instances();
    assert_eq!(rows.len(), 1);
    assert_eq!(name_of(&rows[0]), Some(Value::Text("FromJson".to_string())));
}

#[test]
fn relation_creation_persists_parent_then_child() {
    let parent_model = MemoryModel::new("ModelSimpleParent", ["name"]);
    let parent_schema = Schema::builder(parent_model.clone())
        .field("name")
        .resolve()
        .unwrap();

    let child_model = MemoryModel::new("ModelChild", ["name", "related"]);
    let child_schema = Schema::builder(child_model.clone())
        .field("name")
        .field("related")
        .relation("related", parent_schema)
        .resolve()
        .unwrap();

    Serializer::new(child_schema)
        .create(
            record! {
                "name" => "ChildName",
                "related" => record! { "name" => "ParentName" }
            }
            .into(),
            "normal",
        )
        .unwrap();

    let parents = parent_model.instances();
    assert_eq!(parents.len(), 1);

    let children = child_model.instances();
    assert_eq!(children.len(), 1);

    let child = children[0]
        .as_any()
        .downcast_ref::<MemoryInstance>()
        .unwrap();
    assert_eq!(
        child.get("related"),
        Some(&Value::Ref(parents[0].id())),
        "child must hold a reference to the created parent"
    );
}

#[test]
fn relation_payload_must_match_the_related_schema() {
    let parent_model = MemoryModel::new("ModelSimpleParent", ["name"]);
    let parent_schema = Schema::builder(parent_model.clone())
        .field("name")
        .resolve()
        .unwrap();

    let child_model = MemoryModel::new("ModelChild", ["name", "related"]);
    let child_schema = Schema::builder(child_model.clone())
        .field("name")
        .field("related")
        .relation("related", parent_schema)
        .resolve()
        .unwrap();

    let err = Serializer::new(child_schema)
        .create(
            record! {
                "name" => "ChildName",
                "related" => record! { "wrong" => "ParentName" }
            }
            .into(),
            "normal",
        )
        .unwrap_err();

    assert!(matches!(err, Error::Validation(ValidationError::KeysMismatch { .. })));
    assert!(parent_model.is_empty());
    assert!(child_model.is_empty());
}

#[test]
fn unknown_schema_field_fails_at_declaration_time() {
    let model = MemoryModel::new("BasicModel", ["name"]);

    let err = Schema::builder(model).field("nam").resolve().unwrap_err();

    assert!(
        matches!(err, SchemaError::UnknownField { ref field, ref model } if field == "nam" && model == "BasicModel")
    );
}
