use crate::client::{HttpClient, segment};
use crate::envelope::{ApiResponse, Paginated};
use crate::error::Error;
use crate::models::{AssignIpAddress, IpAddress, IpStatus, UpdateIpAddress};
use crate::query::Query;

/// Filters for `GET /ip-addresses`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpAddressListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<IpStatus>,
    pub subnet_id: Option<String>,
}

impl IpAddressListParams {
    fn to_query(&self) -> Query {
        Query::new()
            .push_nonzero("page", self.page)
            .push_nonzero("limit", self.limit)
            .push("search", self.search.as_deref())
            .push("status", self.status)
            .push("subnetId", self.subnet_id.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct IpAddressClient {
    http: HttpClient,
}

impl IpAddressClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &IpAddressListParams,
    ) -> Result<ApiResponse<Paginated<IpAddress>>, Error> {
        self.http
            .get_with_query("/ip-addresses", params.to_query())
            .await
    }

    /// Detail view; includes the change history.
    pub async fn get(&self, id: &str) -> Result<ApiResponse<IpAddress>, Error> {
        self.http.get(&format!("/ip-addresses/{}", segment(id))).await
    }

    /// Assign an address. Without `ip_address` the server picks the next
    /// free one in the subnet.
    pub async fn assign(&self, body: &AssignIpAddress) -> Result<ApiResponse<IpAddress>, Error> {
        self.http.post("/ip-addresses/assign", body).await
    }

    pub async fn update(
        &self,
        id: &str,
        body: &UpdateIpAddress,
    ) -> Result<ApiResponse<IpAddress>, Error> {
        self.http.put(&format!("/ip-addresses/{}", segment(id)), body).await
    }

    /// Return an address to the pool.
    pub async fn release(&self, id: &str) -> Result<ApiResponse<IpAddress>, Error> {
        self.http
            .post_empty(&format!("/ip-addresses/{}/release", segment(id)))
            .await
    }
}
