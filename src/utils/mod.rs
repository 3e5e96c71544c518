pub mod http;
pub mod timeout;

pub use http::HttpClient;
pub use timeout::with_timeout;
