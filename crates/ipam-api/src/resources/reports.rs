use crate::client::HttpClient;
use crate::envelope::ApiResponse;
use crate::error::Error;
use crate::models::{StatusReport, UtilizationReport};

#[derive(Debug, Clone)]
pub struct ReportClient {
    http: HttpClient,
}

impl ReportClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Per-subnet utilization plus totals across all subnets.
    pub async fn utilization(&self) -> Result<ApiResponse<UtilizationReport>, Error> {
        self.http.get("/reports/utilization").await
    }

    /// Address counts per status.
    pub async fn status(&self) -> Result<ApiResponse<StatusReport>, Error> {
        self.http.get("/reports/status").await
    }
}
