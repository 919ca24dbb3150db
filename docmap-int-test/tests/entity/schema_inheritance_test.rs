use docmap::common::Value;
use docmap::schema::FieldType;
use docmap_int_test::test_util::{base_class_chain, cleanup, create_test_context, run_test};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

#[tokio::test]
async fn test_get_fields_from_base_classes() {
    run_test(
        create_test_context,
        |ctx| async move {
            let (_, _, second_child) = base_class_chain(&ctx)?;

            let test_instance = second_child.new_instance();
            let test_dict = test_instance.as_dict();
            assert_eq!(test_dict.size(), 6);
            assert_eq!(
                test_dict.keys().collect::<Vec<_>>(),
                vec![
                    "_id",
                    "base_url_field",
                    "base_decimal_field",
                    "child_uuid_field",
                    "child_email_field",
                    "second_child_long_field",
                ]
            );
            assert_eq!(test_dict.get("second_child_long_field"), Some(&Value::I64(1000)));
            assert_eq!(
                test_dict.get("base_decimal_field"),
                Decimal::from_f64(2.1).map(Value::Decimal).as_ref()
            );
            assert!(!test_instance.is_dirty());
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_schemas_include_every_ancestor_field() {
    run_test(
        create_test_context,
        |ctx| async move {
            let (base, child, second_child) = base_class_chain(&ctx)?;

            for (ancestor, descendant) in [(&base, &child), (&child, &second_child)] {
                for name in ancestor.schema().field_names() {
                    assert!(descendant.schema().has_field(name), "{} missing", name);
                }
            }
            assert_eq!(base.schema().len(), 3);
            assert_eq!(child.schema().len(), 5);
            assert_eq!(second_child.schema().len(), 6);
            assert_eq!(
                second_child.schema().field("child_uuid_field").map(|f| f.field_type()),
                Some(FieldType::Uuid)
            );
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_factory_defaults_differ_per_instance() {
    run_test(
        create_test_context,
        |ctx| async move {
            let (_, _, second_child) = base_class_chain(&ctx)?;

            let first = second_child.new_instance();
            let second = second_child.new_instance();
            assert_ne!(first.id(), second.id());
            assert_ne!(first.get("child_uuid_field"), second.get("child_uuid_field"));
            assert_eq!(first.get("base_url_field"), second.get("base_url_field"));
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_subtype_saves_into_inherited_collection() {
    run_test(
        create_test_context,
        |ctx| async move {
            let (_, _, second_child) = base_class_chain(&ctx)?;

            let mut instance = second_child.new_instance();
            instance.save().await?;

            let stored = ctx.gateway().memory().documents("collection_test");
            assert_eq!(stored.len(), 1);
            assert_eq!(stored[0], instance.as_dict());
            Ok(())
        },
        cleanup,
    )
    .await;
}
