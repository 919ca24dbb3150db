use docmap::entity::EntityType;
use docmap::errors::ErrorKind;
use docmap::gateway::memory::MemoryGateway;
use docmap::gateway::{Database, ReadPreference};
use docmap_int_test::test_util::{cleanup, create_test_context, run_test, DATABASE_NAME, ENDPOINTS};

#[test]
fn test_builder_connects_with_all_options() {
    let db = Database::builder()
        .endpoints(&ENDPOINTS)
        .database_name(DATABASE_NAME)
        .max_connections(4)
        .read_preference(ReadPreference::SecondaryPreferred)
        .connect(MemoryGateway::new())
        .unwrap();

    let config = db.config().unwrap();
    assert_eq!(config.endpoints().len(), 2);
    assert_eq!(config.endpoints()[1].port(), 27028);
    assert_eq!(config.max_connections(), 4);
    assert_eq!(config.read_preference(), ReadPreference::SecondaryPreferred);
    db.disconnect().unwrap();
}

#[test]
fn test_builder_reports_bad_endpoint() {
    let err = Database::builder()
        .endpoint("localhost")
        .database_name(DATABASE_NAME)
        .connect(MemoryGateway::new())
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidConfiguration);
}

#[tokio::test]
async fn test_disconnect_and_reconnect() {
    run_test(
        create_test_context,
        |ctx| async move {
            assert!(ctx.db().is_connected());
            ctx.db().disconnect()?;
            assert!(!ctx.db().is_connected());
            assert!(ctx.db().disconnect().unwrap_err().is_connection_error());

            ctx.reconnect()?;
            assert!(ctx.db().is_connected());
            let err = ctx.reconnect().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_entity_types_follow_their_database_handle() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = EntityType::builder("Handle")
                .database(ctx.db())
                .register(ctx.registry())?;
            assert!(entity.database().same_as(ctx.db()));

            ctx.db().disconnect()?;
            let err = entity.new_instance().save().await.unwrap_err();
            assert_eq!(err.message(), "you must be connect");
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[test]
fn test_global_database_handle() {
    let entity = EntityType::builder("GlobalHandle").build().unwrap();
    assert!(entity.database().same_as(&Database::global()));
}
