//! Typed clients, one per resource family.
//!
//! Each client owns a clone of the shared [`HttpClient`](crate::HttpClient)
//! and only knows its endpoints and DTOs: no retries, no caching, and every
//! error reaches the caller unchanged.

mod audit;
mod auth;
mod ip_addresses;
mod reports;
mod reservations;
mod subnets;
mod users;

pub use audit::{AuditClient, AuditListParams};
pub use auth::AuthClient;
pub use ip_addresses::{IpAddressClient, IpAddressListParams};
pub use reports::ReportClient;
pub use reservations::{ReservationClient, ReservationListParams};
pub use subnets::{SubnetClient, SubnetListParams};
pub use users::UserClient;
