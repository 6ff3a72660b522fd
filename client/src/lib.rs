pub mod api;
pub mod context;
pub mod http;
pub mod notify;
pub mod router;
pub mod session;

pub use self::context::AppContext;
