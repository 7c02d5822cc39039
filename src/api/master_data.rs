//! Saved cart documents over the Master Data v2 REST API.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{HttpContext, SnapshotSource, send, send_json};
use crate::Result;
use crate::models::{SaveSnapshotRequest, SnapshotRecord};
use crate::query::SnapshotQuery;

/// Documents requested per search page.
const PAGE_SIZE: usize = 100;

/// Most documents a search may page through.
const MAX_RECORDS: usize = 10_000;

/// Response header carrying `resources {from}-{to}/{total}`.
const CONTENT_RANGE_HEADER: &str = "REST-Content-Range";

/// Fields projected by every search.
const FIELDS: &str = "id,createdIn,title,organizationId,costCenterId,parentCartId,data";

/// [`SnapshotSource`] backed by `/api/dataentities/{entity}`.
#[derive(Debug, Clone)]
pub struct MasterDataClient {
    context: HttpContext,
    entity: String,
}

/// Response to a document create call.
#[derive(Debug, Deserialize)]
struct CreatedDocument {
    #[serde(rename = "DocumentId")]
    document_id: String,
}

impl MasterDataClient {
    #[must_use]
    pub fn new(context: HttpContext, entity: &str) -> Self {
        Self {
            context,
            entity: entity.to_string(),
        }
    }

    /// `REST-Range` header value for the page starting at `offset`.
    fn range(offset: usize) -> String {
        format!("resources={}-{}", offset, offset + PAGE_SIZE)
    }
}

/// Total document count from a `REST-Content-Range` value.
fn content_range_total(value: &str) -> Option<usize> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl SnapshotSource for MasterDataClient {
    async fn query_snapshots(&self, query: &SnapshotQuery) -> Result<Vec<SnapshotRecord>> {
        let path = format!("/api/dataentities/{}/search", self.entity);
        let mut records: Vec<SnapshotRecord> = Vec::new();
        let mut total = None;

        loop {
            let offset = records.len();
            let request = self
                .context
                .request(Method::GET, &path)
                .header("REST-Range", Self::range(offset))
                .query(&[
                    ("_where", query.filter.as_str()),
                    ("_sort", query.sort.as_str()),
                    ("_fields", FIELDS),
                ]);
            let response = send(request).await?;
            if let Some(header) = response.headers().get(CONTENT_RANGE_HEADER) {
                total = header.to_str().ok().and_then(content_range_total).or(total);
            }
            let page: Vec<SnapshotRecord> = response.json().await?;
            let page_len = page.len();
            debug!(entity = %self.entity, offset, page_len, ?total, "Fetched saved cart page");

            let previous_first = offset
                .checked_sub(PAGE_SIZE)
                .and_then(|start| records.get(start));
            if previous_first.is_some() && page.first().map(|r| &r.id) == previous_first.map(|r| &r.id) {
                warn!(entity = %self.entity, offset, "Search ignored REST-Range, stopping");
                break;
            }
            records.extend(page);

            if page_len < PAGE_SIZE || total.is_some_and(|total| records.len() >= total) {
                break;
            }
            if records.len() >= MAX_RECORDS {
                warn!(entity = %self.entity, count = records.len(), "Saved cart search truncated");
                break;
            }
        }

        info!(
            entity = %self.entity,
            count = records.len(),
            "Queried saved carts"
        );
        Ok(records)
    }

    async fn create_snapshot(&self, request: &SaveSnapshotRequest) -> Result<String> {
        let path = format!("/api/dataentities/{}/documents", self.entity);
        let http = self.context.request(Method::POST, &path).json(request);
        let created: CreatedDocument = send_json(http).await?;
        info!(
            entity = %self.entity,
            document_id = %created.document_id,
            title = %request.title,
            "Saved cart"
        );

        Ok(created.document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_header_pages_forward() {
        assert_eq!(MasterDataClient::range(0), "resources=0-100");
        assert_eq!(MasterDataClient::range(100), "resources=100-200");
    }

    #[test]
    fn content_range_total_parses_count() {
        assert_eq!(content_range_total("resources 0-100/250"), Some(250));
        assert_eq!(content_range_total("resources 0-0/0"), Some(0));
        assert_eq!(content_range_total("resources 0-100"), None);
        assert_eq!(content_range_total("resources 0-100/*"), None);
    }

    #[test]
    fn created_document_reads_document_id() {
        let created: CreatedDocument = serde_json::from_str(
            r#"{"Id": "SC-5f1a", "Href": "http://x/documents/5f1a", "DocumentId": "5f1a"}"#,
        )
        .unwrap();
        assert_eq!(created.document_id, "5f1a");
    }
}
