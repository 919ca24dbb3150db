use docmap::entity::{EntityType, TypeRegistry};
use docmap::errors::ErrorKind;
use docmap_int_test::test_util::{cleanup, create_test_context, run_test};

#[tokio::test]
async fn test_can_be_load_lazy_class() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = EntityType::builder("CollectionTest")
                .database(ctx.db())
                .register(ctx.registry())?;

            let resolved = ctx.registry().resolve("CollectionTest")?;
            assert!(resolved.is_subtype_of(&entity));
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_can_be_load_child_lazy_class() {
    run_test(
        create_test_context,
        |ctx| async move {
            let base = EntityType::builder("CollectionTest")
                .database(ctx.db())
                .register(ctx.registry())?;
            let child = EntityType::builder("ChildCollectionTest")
                .extends(&base)
                .register(ctx.registry())?;

            let resolved = ctx.registry().resolve("ChildCollectionTest")?;
            assert!(resolved.is_subtype_of(&child));
            assert_eq!(ctx.registry().resolve("CollectionTest")?, child);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_name_resolves_to_subtype_declared_later() {
    run_test(
        create_test_context,
        |ctx| async move {
            let base = EntityType::builder("Forward")
                .database(ctx.db())
                .register(ctx.registry())?;
            assert_eq!(ctx.registry().resolve("Forward")?, base);

            let child = EntityType::builder("ForwardChild")
                .extends(&base)
                .register(ctx.registry())?;
            let grandchild = EntityType::builder("ForwardGrandchild")
                .extends(&child)
                .register(ctx.registry())?;

            let resolved = ctx.registry().resolve("Forward")?;
            assert_eq!(resolved, grandchild);
            assert_eq!(resolved.collection_name(), "Forward");
            assert_eq!(ctx.registry().get("Forward"), Some(base));
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_unregistered_name_fails() {
    run_test(
        create_test_context,
        |ctx| async move {
            let err = ctx.registry().resolve("NeverDeclared").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::TypeNotRegistered);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_global_registry() {
    let base = EntityType::builder("GlobalRegistryBase")
        .register(&TypeRegistry::global())
        .unwrap();
    let child = EntityType::builder("GlobalRegistryChild")
        .extends(&base)
        .register(&TypeRegistry::global())
        .unwrap();

    assert!(TypeRegistry::global().contains("GlobalRegistryBase"));
    assert_eq!(TypeRegistry::global().resolve("GlobalRegistryBase").unwrap(), child);
}
