use docmap::common::ObjectId;
use docmap::entity::{EntityType, InstanceState};
use docmap::errors::ErrorKind;
use docmap::gateway::memory::MemoryGateway;
use docmap::gateway::{Database, DatabaseConfig};
use docmap::schema::FieldDescriptor;
use docmap_int_test::test_util::{cleanup, collection_test, create_test_context, run_test, ENDPOINTS};
use std::time::Duration;

#[tokio::test]
async fn test_duplicate_identity_is_write_conflict() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = collection_test(&ctx)?;
            let id = ObjectId::new();

            let mut first = entity.new_instance();
            first.set("_id", id);
            first.save().await?;

            let mut second = entity.new_instance();
            second.set("_id", id);
            second.set("string_attr", "conflict");
            let (result, error) = second.save().await?.into_parts();
            assert!(result.is_none());
            assert_eq!(error.map(|e| e.kind().clone()), Some(ErrorKind::WriteConflict));
            assert_eq!(second.state(), InstanceState::Transient);
            assert_eq!(second.dirty_fields(), vec!["string_attr"]);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_failed_remove_keeps_instance_alive() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = collection_test(&ctx)?;
            let mut instance = entity.new_instance();
            instance.set("_id", ObjectId::new());
            instance.save().await?;

            ctx.gateway().memory().fail_next(ErrorKind::BackendError);
            let completion = instance.remove().await?;
            assert!(!completion.is_ok());
            assert_eq!(instance.state(), InstanceState::PersistedClean);

            assert!(instance.remove().await?.is_ok());
            assert_eq!(instance.state(), InstanceState::Removed);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_failed_query_is_delivered_not_raised() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = collection_test(&ctx)?;
            ctx.gateway().memory().fail_next(ErrorKind::BackendError);

            let completion = entity.objects().find_one(ObjectId::new()).await?;
            let err = completion.into_result().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::BackendError);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_concurrent_saves_through_slow_gateway() {
    let db = Database::new();
    let config = DatabaseConfig::new(&ENDPOINTS, "test").unwrap();
    let gateway = MemoryGateway::with_latency(Duration::from_millis(5));
    db.connect(config, gateway.clone()).unwrap();

    let entity = EntityType::builder("Slow")
        .collection("slow")
        .field(FieldDescriptor::integer("n"))
        .database(&db)
        .build()
        .unwrap();

    let handles = (0..8)
        .map(|n| {
            let entity = entity.clone();
            tokio::spawn(async move {
                let mut instance = entity.new_instance();
                instance.set("n", n);
                instance.save().await.map(|completion| completion.is_ok())
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }
    assert_eq!(gateway.documents("slow").len(), 8);
}
