use docmap::common::{ObjectId, Value};
use docmap::doc;
use docmap::entity::InstanceState;
use docmap::errors::ErrorKind;
use docmap_int_test::test_util::{cleanup, collection_test, create_test_context, run_test, WireCall};

#[tokio::test]
async fn test_update_tracks_changed_attrs() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = collection_test(&ctx)?;
            let mut doc_test = entity.new_instance();
            doc_test.set("_id", ObjectId::new());
            doc_test.set("string_attr", "should be string value");
            doc_test.save().await?;
            assert!(doc_test.dirty_fields().is_empty());

            doc_test.set("string_attr", "should be new string value");
            assert!(doc_test.dirty_fields().contains(&"string_attr"));
            assert!(!doc_test.dirty_fields().contains(&"_id"));
            assert_eq!(doc_test.state(), InstanceState::PersistedDirty);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_assigning_identity_never_dirties() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = collection_test(&ctx)?;
            let mut doc_test = entity.new_instance();
            doc_test.set("_id", ObjectId::new());
            doc_test.save().await?;

            doc_test.set("_id", ObjectId::new());
            assert!(!doc_test.is_dirty());
            assert_eq!(doc_test.state(), InstanceState::PersistedClean);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_load_obj_does_not_set_dirty_keys() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = collection_test(&ctx)?;
            let id = ObjectId::new();
            let mut doc_test = entity.new_instance();
            doc_test.set("_id", id);
            doc_test.set("string_attr", "should be string value");
            doc_test.save().await?;

            let db_doc_test = entity
                .objects()
                .find_one(id)
                .await?
                .into_result()?
                .flatten()
                .expect("document should exist");
            assert!(db_doc_test.dirty_fields().is_empty());
            assert_eq!(db_doc_test.state(), InstanceState::PersistedClean);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_failed_update_keeps_dirty_fields_for_retry() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = collection_test(&ctx)?;
            let id = ObjectId::new();
            let mut doc_test = entity.new_instance();
            doc_test.set("_id", id);
            doc_test.set("string_attr", "a");
            doc_test.save().await?;

            doc_test.set("string_attr", "b");
            ctx.gateway().memory().fail_next(ErrorKind::BackendError);
            let (result, error) = doc_test.update(false).await?.into_parts();
            assert!(result.is_none());
            assert_eq!(error.map(|e| e.kind().clone()), Some(ErrorKind::BackendError));
            assert_eq!(doc_test.dirty_fields(), vec!["string_attr"]);

            doc_test.update(false).await?;
            let updates = ctx.gateway().update_calls();
            assert_eq!(updates.len(), 2);
            assert_eq!(updates[0], updates[1]);
            assert!(!doc_test.is_dirty());
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_unset_and_ad_hoc_attributes_in_partial_update() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = collection_test(&ctx)?;
            let id = ObjectId::new();
            let mut doc_test = entity.new_instance();
            doc_test.set("_id", id);
            doc_test.set("string_attr", "a");
            doc_test.save().await?;

            doc_test.unset("string_attr");
            doc_test.set("note", "ad hoc");
            doc_test.update(false).await?;

            match &ctx.gateway().update_calls()[0] {
                WireCall::Update { document, force, .. } => {
                    assert!(!force);
                    assert_eq!(document, &doc! { string_attr: (Value::Null), note: "ad hoc" });
                }
                other => panic!("expected an update, got {:?}", other),
            }

            let stored = &ctx.gateway().memory().documents("collection_test")[0];
            assert_eq!(stored.get("string_attr"), Some(&Value::Null));
            assert_eq!(stored.get("note"), Some(&Value::from("ad hoc")));
            Ok(())
        },
        cleanup,
    )
    .await;
}
