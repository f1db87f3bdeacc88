pub mod dispatcher;
pub mod models;
pub mod response;
pub mod strategy;
pub mod transport;

pub use dispatcher::{DispatchSettings, Dispatcher};
pub use response::extract_response;
pub use strategy::{RelayProxy, Strategy};
pub use transport::{HttpTransport, Transport, TransportResponse};
