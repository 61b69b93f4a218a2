use crate::client::{HttpClient, segment};
use crate::envelope::{ApiResponse, Paginated};
use crate::error::Error;
use crate::models::{CreateSubnet, MessageResponse, Subnet, UpdateSubnet};
use crate::query::Query;

/// Filters for `GET /subnets`. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub vlan_id: Option<u16>,
}

impl SubnetListParams {
    fn to_query(&self) -> Query {
        Query::new()
            .push_nonzero("page", self.page)
            .push_nonzero("limit", self.limit)
            .push("search", self.search.as_deref())
            .push("location", self.location.as_deref())
            .push_nonzero("vlanId", self.vlan_id)
    }
}

#[derive(Debug, Clone)]
pub struct SubnetClient {
    http: HttpClient,
}

impl SubnetClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &SubnetListParams,
    ) -> Result<ApiResponse<Paginated<Subnet>>, Error> {
        self.http.get_with_query("/subnets", params.to_query()).await
    }

    /// Detail view; includes the `utilization` snapshot.
    pub async fn get(&self, id: &str) -> Result<ApiResponse<Subnet>, Error> {
        self.http.get(&format!("/subnets/{}", segment(id))).await
    }

    pub async fn create(&self, body: &CreateSubnet) -> Result<ApiResponse<Subnet>, Error> {
        self.http.post("/subnets", body).await
    }

    pub async fn update(
        &self,
        id: &str,
        body: &UpdateSubnet,
    ) -> Result<ApiResponse<Subnet>, Error> {
        self.http.put(&format!("/subnets/{}", segment(id)), body).await
    }

    pub async fn delete(&self, id: &str) -> Result<ApiResponse<MessageResponse>, Error> {
        self.http.delete(&format!("/subnets/{}", segment(id))).await
    }
}
