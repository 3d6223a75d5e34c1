use crate::backend::DocumentBackend;
use crate::file::JsonFileBackend;
use crate::model::{Client, Document, NewClient, NewTicket, Ticket};
use crate::{StoreError, StoreResult};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Id-assigning store over a single document.
///
/// Each call works on a fresh copy of the document; nothing is cached between
/// calls. Appends run the load-mutate-save cycle under one in-process lock, so
/// concurrent appends never hand out the same id. Reads skip the lock.
pub struct DocumentStore {
    backend: Arc<dyn DocumentBackend>,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Store bound to a JSON file.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(JsonFileBackend::new(path)))
    }

    pub fn backend_label(&self) -> &'static str {
        self.backend.label()
    }

    pub async fn load(&self) -> StoreResult<Document> {
        self.backend.load().await
    }

    /// Replace the whole document, serialized with in-flight appends.
    pub async fn save(&self, document: &Document) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.backend.save(document).await
    }

    pub async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        Ok(self.load().await?.clients)
    }

    pub async fn list_tickets(&self) -> StoreResult<Vec<Ticket>> {
        Ok(self.load().await?.tickets)
    }

    /// Validate, assign the next client id, append at the end and persist.
    pub async fn append_client(&self, input: NewClient) -> StoreResult<Client> {
        input.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.backend.load().await?;
        let id = document.next_client_id;
        document.next_client_id = next_id(id, "client")?;

        let client = input.into_client(id);
        document.clients.push(client.clone());
        self.backend.save(&document).await?;

        info!(client_id = client.id, company = %client.company, "client created");
        Ok(client)
    }

    /// Validate, assign the next ticket id, insert at the front and persist.
    pub async fn append_ticket(&self, input: NewTicket) -> StoreResult<Ticket> {
        input.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.backend.load().await?;
        let id = document.next_ticket_id;
        document.next_ticket_id = next_id(id, "ticket")?;

        let ticket = input.into_ticket(id, Utc::now());
        document.tickets.insert(0, ticket.clone());
        self.backend.save(&document).await?;

        info!(ticket_id = ticket.id, company = %ticket.company, "ticket created");
        Ok(ticket)
    }
}

fn next_id(current: u64, kind: &str) -> StoreResult<u64> {
    current
        .checked_add(1)
        .ok_or_else(|| StoreError::InvalidDocument(format!("{kind} id counter exhausted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::DEFAULT_STAGE;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn memory_store() -> (Arc<MemoryBackend>, DocumentStore) {
        let backend = Arc::new(MemoryBackend::new());
        let store = DocumentStore::new(backend.clone());
        (backend, store)
    }

    #[tokio::test]
    async fn append_client_applies_defaults() {
        let (_, store) = memory_store();

        let client = store
            .append_client(NewClient::new("Acme", "Jane"))
            .await
            .unwrap();

        assert_eq!(client.id, 1);
        assert_eq!(client.company, "Acme");
        assert_eq!(client.name, "Jane");
        assert_eq!(client.amount, 0.0);
        assert_eq!(client.stage, DEFAULT_STAGE);
        assert_eq!(client.source, "");
        assert_eq!(client.advisor, "");
        assert_eq!(store.list_clients().await.unwrap(), vec![client]);
    }

    #[tokio::test]
    async fn rejected_client_leaves_document_untouched() {
        let (backend, store) = memory_store();
        store
            .append_client(NewClient::new("Acme", "Jane"))
            .await
            .unwrap();

        let err = store
            .append_client(NewClient {
                company: Some("Acme".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(backend.saves(), 1);
        let document = store.load().await.unwrap();
        assert_eq!(document.clients.len(), 1);
        assert_eq!(document.next_client_id, 2);
    }

    #[tokio::test]
    async fn clients_keep_insertion_order() {
        let (_, store) = memory_store();
        for name in ["Ana", "Beto", "Caro"] {
            store
                .append_client(NewClient::new("Acme", name))
                .await
                .unwrap();
        }

        let names = store
            .list_clients()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["Ana", "Beto", "Caro"]);
    }

    #[tokio::test]
    async fn tickets_list_most_recent_first() {
        let (_, store) = memory_store();
        let first = store
            .append_ticket(NewTicket::new("Acme", "Jane", "Printer jam"))
            .await
            .unwrap();
        let second = store
            .append_ticket(NewTicket::new("Acme", "Jane", "VPN down"))
            .await
            .unwrap();

        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(store.list_tickets().await.unwrap(), vec![second, first]);
    }

    #[tokio::test]
    async fn rejected_ticket_does_not_consume_an_id() {
        let (backend, store) = memory_store();
        let err = store
            .append_ticket(NewTicket::new("Acme", "", "Printer jam"))
            .await
            .unwrap_err();
        match err {
            StoreError::Validation(err) => assert_eq!(err.missing(), ["cliente"]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(backend.saves(), 0);

        let ticket = store
            .append_ticket(NewTicket::new("Acme", "Jane", "Printer jam"))
            .await
            .unwrap();
        assert_eq!(ticket.id, 1);
    }

    #[tokio::test]
    async fn ids_continue_from_existing_counters() {
        let mut document = Document::seed();
        document.next_client_id = 41;
        document.next_ticket_id = 7;
        let store = DocumentStore::new(Arc::new(MemoryBackend::with_document(document)));

        let client = store
            .append_client(NewClient::new("Acme", "Jane"))
            .await
            .unwrap();
        let ticket = store
            .append_ticket(NewTicket::new("Acme", "Jane", "Printer"))
            .await
            .unwrap();

        assert_eq!(client.id, 41);
        assert_eq!(ticket.id, 7);
        let document = store.load().await.unwrap();
        assert_eq!(document.next_client_id, 42);
        assert_eq!(document.next_ticket_id, 8);
    }

    #[tokio::test]
    async fn save_replaces_the_whole_document() {
        let (backend, store) = memory_store();
        store
            .append_client(NewClient::new("Acme", "Jane"))
            .await
            .unwrap();

        let mut document = store.load().await.unwrap();
        document.clients.clear();
        store.save(&document).await.unwrap();

        assert_eq!(backend.saves(), 2);
        let reloaded = store.load().await.unwrap();
        assert!(reloaded.clients.is_empty());
        assert_eq!(reloaded.next_client_id, 2);
    }

    #[tokio::test]
    async fn save_with_broken_counters_is_rejected() {
        let (backend, store) = memory_store();
        store
            .append_client(NewClient::new("Acme", "Jane"))
            .await
            .unwrap();

        let mut document = store.load().await.unwrap();
        document.next_client_id = 1;
        let err = store.save(&document).await.unwrap_err();

        assert!(matches!(err, StoreError::InvalidDocument(_)));
        assert_eq!(backend.saves(), 1);
        assert_eq!(store.load().await.unwrap().next_client_id, 2);
    }

    #[tokio::test]
    async fn exhausted_counters_fail_without_saving() {
        let mut document = Document::seed();
        document.next_client_id = u64::MAX;
        document.next_ticket_id = u64::MAX;
        let backend = Arc::new(MemoryBackend::with_document(document.clone()));
        let store = DocumentStore::new(backend.clone());

        let err = store
            .append_client(NewClient::new("Acme", "Jane"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
        let err = store
            .append_ticket(NewTicket::new("Acme", "Jane", "Printer"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));

        assert_eq!(backend.saves(), 0);
        assert_eq!(store.load().await.unwrap(), document);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_never_share_an_id() {
        let (_, store) = memory_store();
        let store = Arc::new(store);

        let handles = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .append_client(NewClient::new("Acme", format!("contact-{i}")))
                        .await
                        .map(|c| c.id)
                })
            })
            .collect::<Vec<_>>();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.sort_unstable();

        assert_eq!(ids, (1..=32).collect::<Vec<u64>>());
        let document = store.load().await.unwrap();
        assert_eq!(document.clients.len(), 32);
        assert_eq!(document.next_client_id, 33);
    }

    #[tokio::test]
    async fn appended_records_survive_reopening_the_file() {
        let path = std::env::temp_dir()
            .join(format!("ofilink-store-{}", Uuid::new_v4()))
            .join("data.json");

        let (client, ticket) = {
            let store = DocumentStore::open(&path);
            let mut input = NewClient::new("Acme", "Jane");
            input.amount = Some(1500.5);
            input.stage = Some("negotiation".to_string());
            let client = store.append_client(input).await.unwrap();

            let mut input = NewTicket::new("Acme", "Jane", "Printer jam");
            input.channel = Some("WhatsApp".to_string());
            input.created_at = Some("2026-01-02 03:04".to_string());
            let ticket = store.append_ticket(input).await.unwrap();
            (client, ticket)
        };

        let reopened = DocumentStore::open(&path);
        assert_eq!(reopened.backend_label(), "json-file");
        assert_eq!(reopened.list_clients().await.unwrap(), vec![client]);
        assert_eq!(reopened.list_tickets().await.unwrap(), vec![ticket]);
    }

    #[derive(Debug, Clone)]
    enum AppendOp {
        Client { valid: bool },
        Ticket { valid: bool },
    }

    fn op_strategy() -> impl Strategy<Value = Vec<AppendOp>> {
        proptest::collection::vec(
            prop_oneof![
                any::<bool>().prop_map(|valid| AppendOp::Client { valid }),
                any::<bool>().prop_map(|valid| AppendOp::Ticket { valid }),
            ],
            0..24,
        )
    }

    proptest! {
        #[test]
        fn property_ids_strictly_increase_without_gaps(start in 1u64..1_000, ops in op_strategy()) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");

            rt.block_on(async move {
                let mut document = Document::seed();
                document.next_client_id = start;
                document.next_ticket_id = start;
                let store = DocumentStore::new(Arc::new(MemoryBackend::with_document(document)));

                let mut client_ids = Vec::new();
                let mut ticket_ids = Vec::new();
                for op in ops {
                    match op {
                        AppendOp::Client { valid } => {
                            let name = if valid { "Jane" } else { "" };
                            let result = store.append_client(NewClient::new("Acme", name)).await;
                            assert_eq!(result.is_ok(), valid);
                            if let Ok(client) = result {
                                client_ids.push(client.id);
                            }
                        }
                        AppendOp::Ticket { valid } => {
                            let subject = if valid { "Printer" } else { " " };
                            let result = store
                                .append_ticket(NewTicket::new("Acme", "Jane", subject))
                                .await;
                            assert_eq!(result.is_ok(), valid);
                            if let Ok(ticket) = result {
                                ticket_ids.push(ticket.id);
                            }
                        }
                    }
                }

                let expected_clients = (start..start + client_ids.len() as u64).collect::<Vec<_>>();
                let expected_tickets = (start..start + ticket_ids.len() as u64).collect::<Vec<_>>();
                assert_eq!(client_ids, expected_clients);
                assert_eq!(ticket_ids, expected_tickets);

                let document = store.load().await.unwrap();
                assert_eq!(document.next_client_id, start + client_ids.len() as u64);
                assert_eq!(document.next_ticket_id, start + ticket_ids.len() as u64);
                assert!(document.check_counters().is_ok());
            });
        }
    }
}
