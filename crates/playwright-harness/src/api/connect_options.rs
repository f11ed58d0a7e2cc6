use std::collections::HashMap;

/// Options for connecting to a pre-existing browser engine endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectOptions {
    /// WebSocket endpoint of the running engine (e.g. from
    /// `npx playwright launch-server`).
    pub ws_endpoint: String,
    /// Additional HTTP headers to send with the WebSocket handshake.
    pub headers: Option<HashMap<String, String>>,
    /// Slows down engine operations by the specified amount of milliseconds.
    pub slow_mo: Option<f64>,
    /// Maximum time in milliseconds to wait for the connection to be
    /// established. Defaults to 30000 (30 seconds). Pass 0 to disable.
    pub timeout: Option<f64>,
}

impl ConnectOptions {
    /// Creates a new `ConnectOptions` for the given endpoint.
    pub fn new(ws_endpoint: impl Into<String>) -> Self {
        Self {
            ws_endpoint: ws_endpoint.into(),
            ..Self::default()
        }
    }

    /// Set additional HTTP headers to send with the WebSocket handshake.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Set slow mo delay in milliseconds.
    pub fn slow_mo(mut self, slow_mo: f64) -> Self {
        self.slow_mo = Some(slow_mo);
        self
    }

    /// Set connection timeout in milliseconds.
    pub fn timeout(mut self, timeout: f64) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
