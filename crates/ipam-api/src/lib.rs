// ipam-api: Async Rust client for the IPAM server REST API
//
// One shared request executor (`HttpClient`) and a thin typed client per
// resource family. Session ownership lives one layer up, in `ipam-core`;
// this crate only asks a `TokenSource` for the current bearer token.

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod query;
pub mod resources;
pub mod transport;

pub use auth::{Anonymous, StaticToken, TokenSource};
pub use client::{ApiRequest, HttpClient};
pub use envelope::{ApiResponse, Paginated};
pub use error::Error;
pub use query::Query;
pub use transport::{TlsMode, TransportConfig};

pub use models::{
    AssignIpAddress, AuditIpRef, AuditLog, ChangePassword, CidrRef, CreateReservation,
    CreateSubnet, CreateUser, IpAddress, IpHistory, IpStatus, LoginResponse, MessageResponse,
    Registration, Reservation, StatusReport, Subnet, SubnetRef, UpdateIpAddress, UpdateProfile,
    UpdateReservation, UpdateSubnet, UpdateUser, User, UserRole, Utilization, UtilizationItem,
    UtilizationReport,
};
pub use resources::{
    AuditClient, AuditListParams, AuthClient, IpAddressClient, IpAddressListParams,
    ReportClient, ReservationClient, ReservationListParams, SubnetClient, SubnetListParams,
    UserClient,
};
