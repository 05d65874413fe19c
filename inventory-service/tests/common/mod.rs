//! Test helper module for inventory-service integration tests.
//!
//! Spawns the application on a random port with the in-memory store, so the
//! suites run without any external services.

#![allow(dead_code)]

use inventory_service::config::{InventoryConfig, StoreBackend, StoreConfig};
use inventory_service::startup::Application;
use service_core::config::Config as CoreConfig;

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn a new test application on a random port.
    pub async fn spawn() -> Self {
        let config = InventoryConfig {
            common: CoreConfig {
                port: 0, // Random port
                log_level: "warn".to_string(),
            },
            service_name: "inventory-service-test".to_string(),
            store: StoreConfig {
                backend: StoreBackend::Memory,
                database_url: None,
                max_connections: 5,
                min_connections: 1,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let address = format!("http://127.0.0.1:{}", port);
        let client = reqwest::Client::new();

        // Wait for the server to be ready by polling the health endpoint.
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, client }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Open a fresh draft of the given kind and return its JSON body.
    pub async fn open_draft(&self, kind: &str) -> serde_json::Value {
        let response = self
            .client
            .post(self.url("/api/drafts"))
            .json(&serde_json::json!({ "kind": kind }))
            .send()
            .await
            .expect("Failed to open draft");
        assert_eq!(response.status(), 201);
        response.json().await.expect("Draft body was not JSON")
    }

    /// Current number of documents matching the query string.
    pub async fn document_count(&self, query: &str) -> usize {
        let response = self
            .client
            .get(self.url(&format!("/api/documents{}", query)))
            .send()
            .await
            .expect("Failed to list documents");
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.expect("List body was not JSON");
        body["count"].as_u64().expect("count missing") as usize
    }
}
