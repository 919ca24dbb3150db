use chrono::Utc;
use docmap::common::{ObjectId, Value};
use docmap::doc;
use docmap::entity::{EntityType, InstanceState};
use docmap::schema::FieldDescriptor;
use docmap_int_test::test_util::{cleanup, create_test_context, dictionary_test, run_test};

#[tokio::test]
async fn test_can_create_collection_from_dictionary() {
    run_test(
        create_test_context,
        |ctx| async move {
            let object_id = ObjectId::new();
            let object_dict = doc! {
                string_attr: "string_attr",
                integer_attr: 1,
                bool_attr: true,
                float_attr: 1.0,
                list_attr: [1, 2, 3],
                object_attr: { chave: "valor" },
                object_id_attr: object_id,
            };

            let entity = dictionary_test(&ctx)?;
            let instance = entity.create(object_dict.clone());

            assert_eq!(instance.get("string_attr"), Some(&Value::from("string_attr")));
            assert_eq!(instance.get("integer_attr"), Some(&Value::I32(1)));
            assert_eq!(instance.get("bool_attr"), Some(&Value::Bool(true)));
            assert_eq!(instance.get("float_attr"), Some(&Value::F64(1.0)));
            assert_eq!(
                instance.get("list_attr"),
                Some(&Value::Array(vec![Value::I32(1), Value::I32(2), Value::I32(3)]))
            );
            assert_eq!(
                instance.get("object_attr"),
                Some(&Value::Document(doc! { chave: "valor" }))
            );
            assert_eq!(instance.get("object_id_attr"), Some(&Value::ObjectId(object_id)));
            assert!(instance.get("unknow_object").is_none());

            assert_eq!(instance.as_dict(), object_dict);
            assert!(instance.dirty_fields().is_empty());
            assert_eq!(instance.state(), InstanceState::Transient);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_create_attribute_if_model_does_not_contains_field() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = EntityType::builder("CollectionTest")
                .field(FieldDescriptor::string("string_attr"))
                .database(ctx.db())
                .register(ctx.registry())?;

            let instance = entity.objects().create(doc! {
                string_attr: "string_attr",
                integer_attr: 1,
            });
            assert_eq!(instance.get("string_attr"), Some(&Value::from("string_attr")));
            assert_eq!(instance.get("integer_attr"), Some(&Value::I32(1)));
            assert_eq!(instance.as_dict().size(), 2);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_ignore_attribute_with_different_field_type() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = EntityType::builder("CollectionTest")
                .field(FieldDescriptor::datetime("string_attr"))
                .database(ctx.db())
                .register(ctx.registry())?;

            let instance = entity.create(doc! { string_attr: "duvido" });
            assert!(instance.get("string_attr").is_none());
            assert!(!instance.as_dict().contains_key("string_attr"));

            let now = Utc::now();
            let instance = entity.create(doc! { string_attr: now });
            assert_eq!(instance.get("string_attr"), Some(&Value::DateTime(now)));
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_numeric_coercion_on_create() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = EntityType::builder("Numbers")
                .field(FieldDescriptor::long("long_attr"))
                .field(FieldDescriptor::float("float_attr"))
                .field(FieldDescriptor::integer("integer_attr"))
                .database(ctx.db())
                .register(ctx.registry())?;

            let instance = entity.create(doc! {
                long_attr: 7,
                float_attr: 2,
                integer_attr: (i64::MAX),
            });
            assert_eq!(instance.get("long_attr"), Some(&Value::I64(7)));
            assert_eq!(instance.get("float_attr"), Some(&Value::F64(2.0)));
            assert!(instance.get("integer_attr").is_none());
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_uuid_field_accepts_uuid_and_string() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = EntityType::builder("Tokens")
                .field(FieldDescriptor::uuid("token"))
                .database(ctx.db())
                .register(ctx.registry())?;

            let token = uuid::Uuid::new_v4();
            let instance = entity.create(doc! { token: token });
            assert_eq!(instance.get("token"), Some(&Value::Uuid(token)));

            let instance = entity.create(doc! { token: (token.to_string()) });
            assert_eq!(instance.get("token"), Some(&Value::String(token.to_string())));
            Ok(())
        },
        cleanup,
    )
    .await;
}
