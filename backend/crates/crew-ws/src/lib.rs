pub mod app_state;
pub mod chat_router;
pub mod chat_socket;
pub mod connection_config;
pub mod connection_handle;
pub mod connection_id;
pub mod connection_info;
pub mod connection_limits;
pub mod error;
pub mod fanout_policy;
pub mod metrics;
pub mod notification_channel;
pub mod notification_socket;
pub mod presence_registry;
pub mod protocol;
pub mod shutdown;

pub use app_state::{AppState, chat_handler, notification_handler};
pub use chat_router::{ChatRouter, DeliveryOutcome};
pub use chat_socket::{ChatSession, ChatSocket, SessionState};
pub use connection_config::ConnectionConfig;
pub use connection_handle::ConnectionHandle;
pub use connection_id::ConnectionId;
pub use connection_info::ConnectionInfo;
pub use connection_limits::ConnectionLimits;
pub use error::{Result, WsError};
pub use fanout_policy::FanoutPolicy;
pub use metrics::Metrics;
pub use notification_channel::NotificationChannel;
pub use notification_socket::{NotificationSession, NotificationSocket};
pub use presence_registry::PresenceRegistry;
pub use protocol::{
    ChatClientEvent, ErrorEvent, NotificationClientEvent, NotificationEvent, ReceiveMessage,
    SendMessage, ServerEvent,
};
pub use shutdown::{ShutdownCoordinator, ShutdownGuard};

#[cfg(test)]
mod tests;
