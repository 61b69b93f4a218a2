use crate::client::{HttpClient, segment};
use crate::envelope::ApiResponse;
use crate::error::Error;
use crate::models::{CreateReservation, MessageResponse, Reservation, UpdateReservation};
use crate::query::Query;

/// Filters for `GET /reservations`. The endpoint is not paginated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationListParams {
    pub subnet_id: Option<String>,
    pub search: Option<String>,
}

impl ReservationListParams {
    fn to_query(&self) -> Query {
        Query::new()
            .push("subnetId", self.subnet_id.as_deref())
            .push("search", self.search.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct ReservationClient {
    http: HttpClient,
}

impl ReservationClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        params: &ReservationListParams,
    ) -> Result<ApiResponse<Vec<Reservation>>, Error> {
        self.http
            .get_with_query("/reservations", params.to_query())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<ApiResponse<Reservation>, Error> {
        self.http.get(&format!("/reservations/{}", segment(id))).await
    }

    pub async fn create(
        &self,
        body: &CreateReservation,
    ) -> Result<ApiResponse<Reservation>, Error> {
        self.http.post("/reservations", body).await
    }

    pub async fn update(
        &self,
        id: &str,
        body: &UpdateReservation,
    ) -> Result<ApiResponse<Reservation>, Error> {
        self.http.put(&format!("/reservations/{}", segment(id)), body).await
    }

    pub async fn delete(&self, id: &str) -> Result<ApiResponse<MessageResponse>, Error> {
        self.http.delete(&format!("/reservations/{}", segment(id))).await
    }
}
