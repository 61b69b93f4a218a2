use crate::client::{HttpClient, segment};
use crate::envelope::{ApiResponse, Paginated};
use crate::error::Error;
use crate::models::AuditLog;
use crate::query::Query;

/// Filters for `GET /audit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub action: Option<String>,
    pub ip_address_id: Option<String>,
    pub search: Option<String>,
}

impl AuditListParams {
    fn to_query(&self) -> Query {
        Query::new()
            .push_nonzero("page", self.page)
            .push_nonzero("limit", self.limit)
            .push("action", self.action.as_deref())
            .push("ipAddressId", self.ip_address_id.as_deref())
            .push("search", self.search.as_deref())
    }
}

/// Read-only access to the audit trail.
#[derive(Debug, Clone)]
pub struct AuditClient {
    http: HttpClient,
}

impl AuditClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &AuditListParams,
    ) -> Result<ApiResponse<Paginated<AuditLog>>, Error> {
        self.http.get_with_query("/audit", params.to_query()).await
    }

    pub async fn get(&self, id: &str) -> Result<ApiResponse<AuditLog>, Error> {
        self.http.get(&format!("/audit/{}", segment(id))).await
    }
}
