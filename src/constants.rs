/// Endpoint path used to open a Service Layer session
pub const LOGIN_PATH: &str = "Login";
/// Endpoint path used to close a Service Layer session
pub const LOGOUT_PATH: &str = "Logout";
/// Name of the cookie carrying the session identifier
pub const SESSION_COOKIE_NAME: &str = "B1SESSION";
/// Route id appended to the session cookie so the load balancer keeps the node affinity
pub const ROUTE_ID: &str = "ROUTEID:.node0;";
/// Default base URL used when `B1_BASE_URL` is not configured
pub const DEFAULT_BASE_URL: &str = "https://localhost:50000/b1s/v1";
/// Default value of the `Prefer: odata.maxpagesize` header
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;
/// Safety margin in milliseconds subtracted from the reported session expiry.
///
/// A session whose expiry falls inside this window is treated as already expired,
/// so re-authentication happens before the server drops the session.
pub const DEFAULT_EXPIRY_GUARD_MS: i64 = 300_000;
/// Milliseconds in one minute, the unit of the `SessionTimeout` login field
pub const MILLIS_PER_MINUTE: i64 = 60_000;
/// User agent string sent with every request
pub const USER_AGENT: &str = "b1-client/0.1.0";
