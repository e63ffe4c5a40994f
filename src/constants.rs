/// Default query parameter carrying the page index
pub const DEFAULT_PAGE_KEY: &str = "page";
/// Default page size requested when paginating
pub const DEFAULT_PAGE_LIMIT: u64 = 100;
/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";
/// Body key a server may use to report its own page size
pub const PER_PAGE_KEY: &str = "per_page";
/// Status code that is always accepted as a successful login
pub const DEFAULT_LOGIN_STATUS: u16 = 200;
/// Lowest status code accepted by `set_login_status`
pub const MIN_LOGIN_STATUS: u16 = 200;
/// Highest status code accepted by `set_login_status`
pub const MAX_LOGIN_STATUS: u16 = 599;
/// User agent string sent with every request
pub const USER_AGENT: &str = concat!("http-client-utils/", env!("CARGO_PKG_VERSION"));
/// Prefix shared by every environment variable read by `Settings::from_env`
pub const ENV_PREFIX: &str = "HTTP_CLIENT_";
