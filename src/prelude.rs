//! # b1-client Prelude
//!
//! Import everything needed for day to day use:
//!
//! ```rust
//! use b1_client::prelude::*;
//!
//! let config = ClientConfig::with_base_url(
//!     "https://localhost:50000/b1s/v1",
//!     Credentials::new("SBODEMO", "manager", "secret"),
//! );
//! let client = SessionClient::new(config).unwrap();
//! assert!(client.is_expired());
//! ```

// ============================================================================
// CORE CONFIGURATION AND SETUP
// ============================================================================

pub use crate::application::config::{AuthenticationMode, ClientConfig, ClientSettings, Credentials};

pub use crate::{VERSION, version};

// ============================================================================
// ERROR HANDLING
// ============================================================================

pub use crate::error::{AppError, ErrorKind};

// ============================================================================
// CLIENT AND SESSION
// ============================================================================

pub use crate::application::actions::NamedAction;
pub use crate::application::auth::{AuthState, SessionState};
pub use crate::application::client::SessionClient;

// ============================================================================
// TRANSPORT AND MODELS
// ============================================================================

pub use crate::model::http::{
    ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse,
};
pub use crate::model::requests::{RequestBody, RequestRecord, RequestSpec};
pub use crate::model::responses::{LoginResponse, ResponseRecord};

// ============================================================================
// UTILITIES
// ============================================================================

pub use crate::utils::logger::setup_logger;
