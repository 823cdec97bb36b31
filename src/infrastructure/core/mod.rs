pub mod http_client_factory;
pub mod response;

#[cfg(test)]
pub(crate) mod stub_server;

pub use http_client_factory::HttpClientFactory;
