// ── Aggregation facade ──
//
// One object, built once per process, that owns the shared HTTP client,
// every resource client and the session. Resource calls pass straight
// through; only the session-aware calls add behaviour.

use std::fmt;
use std::sync::Arc;

use futures_util::future::join_all;
use ipam_api::{
    ApiResponse, AssignIpAddress, AuditClient, AuditListParams, AuditLog, AuthClient,
    ChangePassword, CreateReservation, CreateSubnet, CreateUser, Error as ApiError, HttpClient,
    IpAddress, IpAddressClient, IpAddressListParams, LoginResponse, MessageResponse, Paginated,
    ReportClient, Reservation, ReservationClient, ReservationListParams, StatusReport, Subnet,
    SubnetClient, SubnetListParams, TokenSource, UpdateIpAddress, UpdateProfile,
    UpdateReservation, UpdateSubnet, UpdateUser, User, UserClient, UserRole, UtilizationReport,
};
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::session::{Session, SessionState};
use crate::token_store::TokenStore;

/// Subnets shown on the landing view, fetched together with the report.
const OVERVIEW_SUBNET_LIMIT: u32 = 100;

/// Dashboard data: the first page of subnets and the utilization report.
#[derive(Debug, Clone)]
pub struct Overview {
    pub subnets: Paginated<Subnet>,
    pub utilization: UtilizationReport,
}

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<IpamInner>`. Every clone shares the same
/// session, so a login through one is visible to all.
#[derive(Clone)]
pub struct Ipam {
    inner: Arc<IpamInner>,
}

struct IpamInner {
    config: ClientConfig,
    session: Arc<Session>,
    http: HttpClient,
    subnets: SubnetClient,
    ip_addresses: IpAddressClient,
    reservations: ReservationClient,
    audit: AuditClient,
    reports: ReportClient,
    users: UserClient,
    auth: AuthClient,
}

impl fmt::Debug for Ipam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ipam")
            .field("api_url", &self.inner.config.api_url)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl Ipam {
    /// Build the client stack. Does not touch the network or the token
    /// store; call [`restore_session`](Self::restore_session) for that.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let session = Arc::new(Session::new(store));
        let tokens: Arc<dyn TokenSource> = session.clone();
        let http = HttpClient::new(&config.api_url, &config.transport(), tokens)?;
        debug!(api_url = %http.base_url(), timeout = ?http.timeout(), "ipam client ready");

        Ok(Self {
            inner: Arc::new(IpamInner {
                subnets: SubnetClient::new(http.clone()),
                ip_addresses: IpAddressClient::new(http.clone()),
                reservations: ReservationClient::new(http.clone()),
                audit: AuditClient::new(http.clone()),
                reports: ReportClient::new(http.clone()),
                users: UserClient::new(http.clone()),
                auth: AuthClient::new(http.clone()),
                http,
                config,
                session,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    // ── Resource clients ─────────────────────────────────────────

    pub fn subnets(&self) -> &SubnetClient {
        &self.inner.subnets
    }

    pub fn ip_addresses(&self) -> &IpAddressClient {
        &self.inner.ip_addresses
    }

    pub fn reservations(&self) -> &ReservationClient {
        &self.inner.reservations
    }

    pub fn audit(&self) -> &AuditClient {
        &self.inner.audit
    }

    pub fn reports(&self) -> &ReportClient {
        &self.inner.reports
    }

    pub fn users(&self) -> &UserClient {
        &self.inner.users
    }

    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    // ── Session ──────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        self.inner
            .session
            .login(&self.inner.auth, email, password)
            .await
    }

    pub fn logout(&self) {
        self.inner.session.logout();
    }

    /// Revalidate a persisted token, see [`Session::restore`].
    pub async fn restore_session(&self) -> Result<Option<User>, CoreError> {
        self.inner.session.restore(&self.inner.auth).await
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.session.current_user()
    }

    pub fn session_state(&self) -> SessionState {
        self.inner.session.state()
    }

    /// The logged-in user, or [`CoreError::NotAuthenticated`].
    pub fn require_user(&self) -> Result<User, CoreError> {
        self.current_user().ok_or(CoreError::NotAuthenticated)
    }

    // ── Auth ─────────────────────────────────────────────────────

    /// Create an account. Does not log in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: SecretString,
        role: Option<UserRole>,
    ) -> Result<ApiResponse<LoginResponse>, ApiError> {
        self.inner
            .auth
            .register(username, email, password, role)
            .await
    }

    pub async fn get_me(&self) -> Result<ApiResponse<User>, ApiError> {
        self.inner.auth.me().await
    }

    /// Update the own profile; the session's cached user follows.
    pub async fn update_profile(
        &self,
        body: &UpdateProfile,
    ) -> Result<ApiResponse<User>, ApiError> {
        let resp = self.inner.auth.update_profile(body).await?;
        if let Some(user) = resp.data() {
            self.inner.session.refresh_user(user);
        }
        Ok(resp)
    }

    pub async fn change_password(
        &self,
        body: &ChangePassword,
    ) -> Result<ApiResponse<MessageResponse>, ApiError> {
        self.inner.auth.change_password(body).await
    }

    // ── Subnets ──────────────────────────────────────────────────

    pub async fn get_subnets(
        &self,
        params: &SubnetListParams,
    ) -> Result<ApiResponse<Paginated<Subnet>>, ApiError> {
        self.inner.subnets.list(params).await
    }

    pub async fn get_subnet_by_id(&self, id: &str) -> Result<ApiResponse<Subnet>, ApiError> {
        self.inner.subnets.get(id).await
    }

    pub async fn create_subnet(&self, body: &CreateSubnet) -> Result<ApiResponse<Subnet>, ApiError> {
        self.inner.subnets.create(body).await
    }

    pub async fn update_subnet(
        &self,
        id: &str,
        body: &UpdateSubnet,
    ) -> Result<ApiResponse<Subnet>, ApiError> {
        self.inner.subnets.update(id, body).await
    }

    pub async fn delete_subnet(&self, id: &str) -> Result<ApiResponse<MessageResponse>, ApiError> {
        self.inner.subnets.delete(id).await
    }

    // ── IP addresses ─────────────────────────────────────────────

    pub async fn get_ip_addresses(
        &self,
        params: &IpAddressListParams,
    ) -> Result<ApiResponse<Paginated<IpAddress>>, ApiError> {
        self.inner.ip_addresses.list(params).await
    }

    pub async fn get_ip_address_by_id(
        &self,
        id: &str,
    ) -> Result<ApiResponse<IpAddress>, ApiError> {
        self.inner.ip_addresses.get(id).await
    }

    pub async fn assign_ip_address(
        &self,
        body: &AssignIpAddress,
    ) -> Result<ApiResponse<IpAddress>, ApiError> {
        self.inner.ip_addresses.assign(body).await
    }

    pub async fn update_ip_address(
        &self,
        id: &str,
        body: &UpdateIpAddress,
    ) -> Result<ApiResponse<IpAddress>, ApiError> {
        self.inner.ip_addresses.update(id, body).await
    }

    pub async fn release_ip_address(
        &self,
        id: &str,
    ) -> Result<ApiResponse<IpAddress>, ApiError> {
        self.inner.ip_addresses.release(id).await
    }

    // ── Reservations ─────────────────────────────────────────────

    pub async fn get_reservations(
        &self,
        params: &ReservationListParams,
    ) -> Result<ApiResponse<Vec<Reservation>>, ApiError> {
        self.inner.reservations.list(params).await
    }

    pub async fn get_reservation_by_id(
        &self,
        id: &str,
    ) -> Result<ApiResponse<Reservation>, ApiError> {
        self.inner.reservations.get(id).await
    }

    pub async fn create_reservation(
        &self,
        body: &CreateReservation,
    ) -> Result<ApiResponse<Reservation>, ApiError> {
        self.inner.reservations.create(body).await
    }

    pub async fn update_reservation(
        &self,
        id: &str,
        body: &UpdateReservation,
    ) -> Result<ApiResponse<Reservation>, ApiError> {
        self.inner.reservations.update(id, body).await
    }

    pub async fn delete_reservation(
        &self,
        id: &str,
    ) -> Result<ApiResponse<MessageResponse>, ApiError> {
        self.inner.reservations.delete(id).await
    }

    // ── Reports ──────────────────────────────────────────────────

    pub async fn get_utilization_report(
        &self,
    ) -> Result<ApiResponse<UtilizationReport>, ApiError> {
        self.inner.reports.utilization().await
    }

    pub async fn get_status_report(&self) -> Result<ApiResponse<StatusReport>, ApiError> {
        self.inner.reports.status().await
    }

    // ── Audit ────────────────────────────────────────────────────

    pub async fn get_audit_logs(
        &self,
        params: &AuditListParams,
    ) -> Result<ApiResponse<Paginated<AuditLog>>, ApiError> {
        self.inner.audit.list(params).await
    }

    pub async fn get_audit_log_by_id(&self, id: &str) -> Result<ApiResponse<AuditLog>, ApiError> {
        self.inner.audit.get(id).await
    }

    // ── Users ────────────────────────────────────────────────────

    pub async fn get_users(&self) -> Result<ApiResponse<Vec<User>>, ApiError> {
        self.inner.users.list().await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<ApiResponse<User>, ApiError> {
        self.inner.users.get(id).await
    }

    pub async fn create_user(&self, body: &CreateUser) -> Result<ApiResponse<User>, ApiError> {
        self.inner.users.create(body).await
    }

    pub async fn update_user(
        &self,
        id: &str,
        body: &UpdateUser,
    ) -> Result<ApiResponse<User>, ApiError> {
        self.inner.users.update(id, body).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<ApiResponse<MessageResponse>, ApiError> {
        self.inner.users.delete(id).await
    }

    // ── Composite views ──────────────────────────────────────────

    /// First page of subnets and the utilization report, fetched
    /// concurrently. Fails if either request fails.
    pub async fn overview(&self) -> Result<Overview, ApiError> {
        let params = SubnetListParams {
            page: Some(1),
            limit: Some(OVERVIEW_SUBNET_LIMIT),
            ..SubnetListParams::default()
        };
        let (subnets, utilization) = tokio::try_join!(
            self.inner.subnets.list(&params),
            self.inner.reports.utilization(),
        )?;
        Ok(Overview {
            subnets: subnets.into_data()?,
            utilization: utilization.into_data()?,
        })
    }

    /// List subnets and fill in each missing `utilization` snapshot from
    /// the detail endpoint, all detail requests running concurrently.
    ///
    /// The list request itself must succeed. A failed detail request only
    /// leaves that subnet without utilization.
    pub async fn subnets_with_utilization(
        &self,
        params: &SubnetListParams,
    ) -> Result<Paginated<Subnet>, ApiError> {
        let mut page = self.inner.subnets.list(params).await?.into_data()?;

        let details = join_all(
            page.data
                .iter()
                .filter(|s| s.utilization.is_none())
                .map(|s| self.inner.subnets.get(&s.id)),
        )
        .await;

        let pending = page.data.iter_mut().filter(|s| s.utilization.is_none());
        for (subnet, detail) in pending.zip(details) {
            match detail {
                Ok(resp) => subnet.utilization = resp.data.and_then(|d| d.utilization),
                Err(err) => {
                    warn!(subnet = %subnet.cidr, error = %err, "failed to fetch subnet utilization");
                }
            }
        }

        Ok(page)
    }
}
