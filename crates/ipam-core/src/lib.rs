// ipam-core: Session lifecycle and the aggregation facade over ipam-api.

pub mod config;
pub mod error;
pub mod ipam;
pub mod session;
pub mod token_store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{API_URL_ENV, ClientConfig, DEFAULT_API_URL, TlsVerification};
pub use error::CoreError;
pub use ipam::{Ipam, Overview};
pub use session::{Session, SessionState};
pub use token_store::{MemoryTokenStore, TokenStore};

// Re-export the wire layer so embedders only need one dependency.
pub use ipam_api as api;
pub use ipam_api::{ApiResponse, Paginated};
