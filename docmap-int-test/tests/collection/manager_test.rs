use docmap::common::{ObjectId, Value};
use docmap::doc;
use docmap::entity::{EntityType, Manager};
use docmap::errors::OdmResult;
use docmap::gateway::Query;
use docmap::schema::FieldDescriptor;
use docmap_int_test::test_util::{cleanup, create_test_context, run_test, TestContext, WireCall};

fn people(ctx: &TestContext) -> OdmResult<EntityType> {
    EntityType::builder("Person")
        .collection("people")
        .field(FieldDescriptor::object_id("_id"))
        .field(FieldDescriptor::string("name"))
        .field(FieldDescriptor::string("city"))
        .field(FieldDescriptor::integer("age"))
        .database(ctx.db())
        .register(ctx.registry())
}

async fn seed(manager: &Manager) -> OdmResult<()> {
    for (name, city, age) in [("ana", "recife", 30), ("bia", "natal", 25), ("caio", "recife", 41)] {
        let mut person = manager.create(doc! { name: name, city: city, age: age });
        manager.save(&mut person).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_can_set_manager_object_in_collection() {
    run_test(
        create_test_context,
        |ctx| async move {
            let entity = EntityType::builder("CollectionTest")
                .field(FieldDescriptor::string("should_be_value"))
                .database(ctx.db())
                .register(ctx.registry())?;

            let manager: Manager = entity.objects();
            assert_eq!(manager.entity_type(), &entity);
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_find_returns_hydrated_instances_lazily() {
    run_test(
        create_test_context,
        |ctx| async move {
            let manager = people(&ctx)?.objects();
            seed(&manager).await?;

            let cursor = manager.find(doc! { city: "recife" }).await?.into_result()?;
            let names = cursor
                .expect("query result")
                .map(|person| {
                    assert!(!person.is_dirty());
                    person.get("name").cloned()
                })
                .collect::<Vec<_>>();
            assert_eq!(names, vec![Some(Value::from("ana")), Some(Value::from("caio"))]);

            match ctx.gateway().calls().last() {
                Some(WireCall::Query { collection, single, .. }) => {
                    assert_eq!(collection, "people");
                    assert!(!single);
                }
                other => panic!("expected a query, got {:?}", other),
            }
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_find_one_by_identity_and_missing() {
    run_test(
        create_test_context,
        |ctx| async move {
            let manager = people(&ctx)?.objects();
            let id = ObjectId::new();
            let mut person = manager.create(doc! { "_id": id, name: "dora" });
            manager.save(&mut person).await?;

            let found = manager.find_one(id).await?.into_result()?.flatten();
            assert_eq!(found.and_then(|p| p.get("name").cloned()), Some(Value::from("dora")));

            let missing = manager.find_one(ObjectId::new()).await?;
            assert!(missing.is_ok());
            assert!(missing.into_result()?.flatten().is_none());
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_count_distinct_and_truncate() {
    run_test(
        create_test_context,
        |ctx| async move {
            let manager = people(&ctx)?.objects();
            seed(&manager).await?;

            assert_eq!(manager.count(Query::All).await?.into_result()?, Some(3));
            assert_eq!(manager.count(doc! { city: "natal" }).await?.into_result()?, Some(1));
            assert_eq!(
                manager.distinct("city", Query::All).await?.into_result()?,
                Some(vec![Value::from("recife"), Value::from("natal")])
            );

            let truncated = manager.truncate().await?.into_result()?;
            assert_eq!(truncated.map(|r| r.ack_count()), Some(3));
            assert_eq!(manager.count(Query::All).await?.into_result()?, Some(0));
            Ok(())
        },
        cleanup,
    )
    .await;
}

#[tokio::test]
async fn test_manager_delegates_update_and_remove() {
    run_test(
        create_test_context,
        |ctx| async move {
            let manager = people(&ctx)?.objects();
            let id = ObjectId::new();
            let mut person = manager.create(doc! { "_id": id, name: "eva", age: 20 });
            manager.save(&mut person).await?;

            person.set("age", 21);
            manager.update(&mut person, false).await?;
            let stored = manager.find_one(id).await?.into_result()?.flatten().expect("stored");
            assert_eq!(stored.get("age"), Some(&Value::I32(21)));

            manager.remove(&mut person).await?;
            assert_eq!(manager.count(Query::All).await?.into_result()?, Some(0));
            Ok(())
        },
        cleanup,
    )
    .await;
}
