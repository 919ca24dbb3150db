use async_trait::async_trait;
use docmap::common::Document;
use docmap::entity::{EntityType, TypeRegistry};
use docmap::errors::OdmResult;
use docmap::gateway::memory::MemoryGateway;
use docmap::gateway::{
    Completion, Database, DatabaseConfig, DatabaseGateway, Query, RawCursor, UpdateOptions,
    WriteResult,
};
use docmap::schema::{DefaultValue, FieldDescriptor};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

pub const ENDPOINTS: [&str; 2] = ["localhost:27027", "localhost:27028"];
pub const DATABASE_NAME: &str = "test";

/// Runs `test` between `before` and `after`.
///
/// `after` runs even when the test fails; the failure is then reported with
/// its error chain.
pub async fn run_test<B, T, F, A>(before: B, test: T, after: A)
where
    B: FnOnce() -> OdmResult<TestContext>,
    T: FnOnce(TestContext) -> F,
    F: Future<Output = OdmResult<()>>,
    A: FnOnce(TestContext) -> OdmResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let result = test(ctx.clone()).await;
    let after_result = after(ctx);

    if let Err(e) = result {
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

/// One wire operation seen by a [CountingGateway].
#[derive(Debug, Clone, PartialEq)]
pub enum WireCall {
    Insert {
        collection: String,
        document: Document,
    },
    Update {
        collection: String,
        query: Query,
        document: Document,
        force: bool,
    },
    Delete {
        collection: String,
        query: Query,
    },
    Query {
        collection: String,
        query: Query,
        single: bool,
    },
}

/// A [MemoryGateway] that records every wire call it executes.
#[derive(Clone, Default)]
pub struct CountingGateway {
    memory: MemoryGateway,
    calls: Arc<Mutex<Vec<WireCall>>>,
}

impl CountingGateway {
    pub fn new() -> Self {
        CountingGateway::default()
    }

    pub fn memory(&self) -> &MemoryGateway {
        &self.memory
    }

    pub fn calls(&self) -> Vec<WireCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn update_calls(&self) -> Vec<WireCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, WireCall::Update { .. }))
            .cloned()
            .collect()
    }

    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: WireCall) {
        log::debug!("Wire call {:?}", call);
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl DatabaseGateway for CountingGateway {
    fn open(&self, config: &DatabaseConfig) -> OdmResult<()> {
        self.memory.open(config)
    }

    fn close(&self) -> OdmResult<()> {
        self.memory.close()
    }

    async fn execute_insert(&self, collection_name: &str, document: Document) -> Completion<WriteResult> {
        self.record(WireCall::Insert {
            collection: collection_name.to_string(),
            document: document.clone(),
        });
        self.memory.execute_insert(collection_name, document).await
    }

    async fn execute_update(
        &self,
        collection_name: &str,
        identity_query: &Query,
        document: Document,
        options: &UpdateOptions,
    ) -> Completion<WriteResult> {
        self.record(WireCall::Update {
            collection: collection_name.to_string(),
            query: identity_query.clone(),
            document: document.clone(),
            force: options.is_force_full_replace(),
        });
        self.memory
            .execute_update(collection_name, identity_query, document, options)
            .await
    }

    async fn execute_delete(&self, collection_name: &str, query: &Query) -> Completion<WriteResult> {
        self.record(WireCall::Delete {
            collection: collection_name.to_string(),
            query: query.clone(),
        });
        self.memory.execute_delete(collection_name, query).await
    }

    async fn execute_query(&self, collection_name: &str, query: &Query, single: bool) -> Completion<RawCursor> {
        self.record(WireCall::Query {
            collection: collection_name.to_string(),
            query: query.clone(),
            single,
        });
        self.memory.execute_query(collection_name, query, single).await
    }
}

/// A connected database handle, its recording gateway and a private registry.
#[derive(Clone)]
pub struct TestContext {
    db: Database,
    gateway: CountingGateway,
    registry: TypeRegistry,
}

impl TestContext {
    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn gateway(&self) -> &CountingGateway {
        &self.gateway
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn reconnect(&self) -> OdmResult<()> {
        let config = DatabaseConfig::new(&ENDPOINTS, DATABASE_NAME)?;
        self.db.connect(config, self.gateway.clone())
    }
}

pub fn create_test_context() -> OdmResult<TestContext> {
    let ctx = TestContext {
        db: Database::new(),
        gateway: CountingGateway::new(),
        registry: TypeRegistry::new(),
    };
    ctx.reconnect()?;
    Ok(ctx)
}

pub fn cleanup(ctx: TestContext) -> OdmResult<()> {
    if ctx.db.is_connected() {
        ctx.db.disconnect()?;
    }
    ctx.gateway.memory().clear();
    Ok(())
}

/// `CollectionTest { _id: identifier, string_attr: string }` on `collection_test`.
pub fn collection_test(ctx: &TestContext) -> OdmResult<EntityType> {
    EntityType::builder("CollectionTest")
        .collection("collection_test")
        .field(FieldDescriptor::object_id("_id"))
        .field(FieldDescriptor::string("string_attr"))
        .database(ctx.db())
        .register(ctx.registry())
}

/// An entity declaring one field of most types.
pub fn dictionary_test(ctx: &TestContext) -> OdmResult<EntityType> {
    EntityType::builder("CollectionTest")
        .fields([
            FieldDescriptor::string("string_attr"),
            FieldDescriptor::integer("integer_attr"),
            FieldDescriptor::boolean("bool_attr"),
            FieldDescriptor::float("float_attr"),
            FieldDescriptor::list("list_attr"),
            FieldDescriptor::object("object_attr"),
            FieldDescriptor::object_id("object_id_attr"),
            FieldDescriptor::string("unknow_object"),
        ])
        .database(ctx.db())
        .register(ctx.registry())
}

/// A three-level chain, every level adding fields with defaults.
pub fn base_class_chain(ctx: &TestContext) -> OdmResult<(EntityType, EntityType, EntityType)> {
    let base = EntityType::builder("CollectionTest")
        .collection("collection_test")
        .field(FieldDescriptor::object_id("_id").with_default(DefaultValue::new_object_id()))
        .field(FieldDescriptor::url("base_url_field").with_fixed_default("https://www.test.com"))
        .field(FieldDescriptor::decimal("base_decimal_field").with_fixed_default(2.1))
        .database(ctx.db())
        .register(ctx.registry())?;

    let child = EntityType::builder("ChildCollectionTest")
        .extends(&base)
        .field(FieldDescriptor::uuid("child_uuid_field").with_default(DefaultValue::new_uuid()))
        .field(FieldDescriptor::email("child_email_field").with_fixed_default("test@test.com"))
        .register(ctx.registry())?;

    let second_child = EntityType::builder("SecondChildCollectionTest")
        .extends(&child)
        .field(FieldDescriptor::long("second_child_long_field").with_fixed_default(1000))
        .register(ctx.registry())?;

    Ok((base, child, second_child))
}
