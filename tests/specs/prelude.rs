//! Shared harness for engine specs

use pantry_adapters::{FakeCredentialStore, FakeItemStore, LocalListLock};
use pantry_core::{FakeClock, Item, ItemId, ListId, SequentialIdGen, Snapshot};
use pantry_engine::{EngineConfig, EngineDeps, ListSession, SessionEngine};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub const LIST: ListId = ListId(1);

pub type SpecEngine =
    SessionEngine<FakeCredentialStore, FakeItemStore, LocalListLock, FakeClock, SequentialIdGen>;

pub struct Harness {
    pub engine: Arc<SpecEngine>,
    pub credentials: FakeCredentialStore,
    pub items: FakeItemStore,
}

pub fn harness() -> Harness {
    let credentials = FakeCredentialStore::new();
    let items = FakeItemStore::new();
    items.register_list(LIST);
    let engine = Arc::new(SessionEngine::new(
        EngineDeps {
            credentials: credentials.clone(),
            items: items.clone(),
            locks: LocalListLock::new(),
        },
        FakeClock::new(),
        SequentialIdGen::new("item"),
        EngineConfig::default(),
    ));
    Harness {
        engine,
        credentials,
        items,
    }
}

/// Issue, authorize, and open a connection against `LIST`
pub async fn connect(harness: &Harness) -> (ListSession, UnboundedReceiver<Snapshot>) {
    let token = harness.engine.issue_session(LIST).await.unwrap();
    let credential = harness.engine.authorize(&token).await.unwrap();
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let session = harness.engine.open(token, &credential, tx).await.unwrap();
    (session, rx)
}

/// Pop everything currently queued on a receiver
pub fn drain(rx: &mut UnboundedReceiver<Snapshot>) -> Vec<Snapshot> {
    let mut seen = Vec::new();
    while let Ok(snapshot) = rx.try_recv() {
        seen.push(snapshot);
    }
    seen
}

pub fn item(id: &str, completed: bool, order: i32) -> Item {
    Item {
        id: ItemId::new(id),
        list_id: LIST,
        content: id.to_string(),
        notes: None,
        completed,
        order,
    }
}

/// Partition invariant: orders within each partition are exactly 1..=len
pub fn assert_partitions(items: &[Item]) {
    for completed in [false, true] {
        let mut orders: Vec<i32> = items
            .iter()
            .filter(|item| item.completed == completed)
            .map(|item| item.order)
            .collect();
        orders.sort_unstable();
        assert_eq!(orders, (1..=orders.len() as i32).collect::<Vec<_>>());
    }
}
