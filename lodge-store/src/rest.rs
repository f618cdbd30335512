use async_trait::async_trait;
use lodge_core::{BackendError, DataApi, SelectQuery};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::http::{send, BackendClient};

/// [`DataApi`] over the backend's PostgREST endpoint (`/rest/v1`).
#[derive(Debug, Clone)]
pub struct RestClient {
    client: BackendClient,
}

impl RestClient {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn table_url(&self, table: &str) -> String {
        self.client.url(&format!("rest/v1/{}", table))
    }
}

/// Query-string pairs for a select: `select`, `order` and `limit`.
pub fn query_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.select_clause())];
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

fn id_filter(id: Uuid) -> [(&'static str, String); 1] {
    [("id", format!("eq.{}", id))]
}

#[async_trait]
impl DataApi for RestClient {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, BackendError> {
        debug!(table = %query.table, "select");
        let request = self
            .client
            .authorize(self.client.http().get(self.table_url(&query.table)))
            .query(&query_params(query));

        let response = send(request).await?;
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), BackendError> {
        debug!(table, "insert");
        let request = self
            .client
            .authorize(self.client.http().post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(&row);
        send(request).await?;
        Ok(())
    }

    async fn update(&self, table: &str, id: Uuid, patch: Value) -> Result<(), BackendError> {
        debug!(table, %id, "update");
        let request = self
            .client
            .authorize(self.client.http().patch(self.table_url(table)))
            .query(&id_filter(id))
            .header("Prefer", "return=minimal")
            .json(&patch);
        send(request).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), BackendError> {
        debug!(table, %id, "delete");
        let request = self
            .client
            .authorize(self.client.http().delete(self.table_url(table)))
            .query(&id_filter(id));
        send(request).await?;
        Ok(())
    }
}
