/// Configuration for WebSocket connections
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound frame buffer size per connection (bounded to handle backpressure)
    pub send_buffer_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: 100,
        }
    }
}

impl From<&crew_config::WebSocketConfig> for ConnectionConfig {
    fn from(config: &crew_config::WebSocketConfig) -> Self {
        Self {
            send_buffer_size: config.send_buffer_size,
        }
    }
}
