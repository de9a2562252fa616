//! Top-level fetch: parse, connect, send, hand off to the engine.

use crate::config::ClientConfig;
use crate::engine::{EngineSettings, Outcome, ResponseEngine};
use crate::error::{ClientError, Result};
use crate::http::{request, ConnectionTarget, QueryString};
use crate::net::{send_request, Connector, TcpConnector};

/// A single-request HTTP client.
pub struct Client<C: Connector = TcpConnector> {
    engine: ResponseEngine<C>,
}

impl Client<TcpConnector> {
    /// Client over real TCP sockets.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_connector(TcpConnector::new(&config.timeouts), config)
    }
}

impl<C: Connector> Client<C> {
    pub fn with_connector(connector: C, config: &ClientConfig) -> Self {
        Self {
            engine: ResponseEngine::new(connector, EngineSettings::from(config)),
        }
    }

    /// GET `url` with `query` appended and drive the response to an outcome.
    pub fn fetch(&mut self, url: &str, query: &QueryString) -> Result<Outcome> {
        let target = ConnectionTarget::parse(url)?;
        if !target.is_plain_http() {
            return Err(ClientError::HttpsUnsupported(url.to_string()));
        }

        let _span = tracing::info_span!("fetch", host = %target.host, port = target.port).entered();

        let request = request::build_for(&target, query.as_str());
        let mut stream = self.engine.connector_mut().connect(&target)?;
        send_request(&mut stream, &target, &request)?;

        self.engine.run(stream, target)
    }
}
