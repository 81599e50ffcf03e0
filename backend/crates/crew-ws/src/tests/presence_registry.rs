use crate::tests::frame_queue;
use crate::{ConnectionLimits, FanoutPolicy, PresenceRegistry, WsError};

use crew_core::UserId;

fn registry(policy: FanoutPolicy) -> PresenceRegistry {
    PresenceRegistry::new(policy, ConnectionLimits::default())
}

#[tokio::test]
async fn given_register_then_disconnect_when_resolve_then_empty() {
    // Given
    let registry = registry(FanoutPolicy::AllSessions);
    let (tx, _rx) = frame_queue();
    let conn = registry.connect(tx).await.unwrap();
    registry.register(conn, UserId::new(7)).await.unwrap();

    // When
    registry.disconnect(conn).await;

    // Then
    assert!(registry.resolve(UserId::new(7)).await.is_empty());
    assert_eq!(registry.connection_count().await, 0);
    assert_eq!(registry.session_count().await, 0);
}

#[tokio::test]
async fn given_two_tabs_with_all_sessions_policy_when_resolve_then_both_returned() {
    // Given - same identity registered from two connections
    let registry = registry(FanoutPolicy::AllSessions);
    let (tx_a, _rx_a) = frame_queue();
    let (tx_b, _rx_b) = frame_queue();
    let conn_a = registry.connect(tx_a).await.unwrap();
    let conn_b = registry.connect(tx_b).await.unwrap();
    registry.register(conn_a, UserId::new(1)).await.unwrap();
    registry.register(conn_b, UserId::new(1)).await.unwrap();

    // When
    let handles = registry.resolve(UserId::new(1)).await;

    // Then
    let ids: Vec<_> = handles.iter().map(|h| h.connection_id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&conn_a));
    assert!(ids.contains(&conn_b));
}

#[tokio::test]
async fn given_duplicate_register_with_all_sessions_policy_then_single_handle() {
    // Given - group join is idempotent
    let registry = registry(FanoutPolicy::AllSessions);
    let (tx, _rx) = frame_queue();
    let conn = registry.connect(tx).await.unwrap();
    registry.register(conn, UserId::new(4)).await.unwrap();
    registry.register(conn, UserId::new(4)).await.unwrap();

    // When
    let handles = registry.resolve(UserId::new(4)).await;

    // Then
    assert_eq!(handles.len(), 1);
}

#[tokio::test]
async fn given_reregister_with_latest_session_policy_when_resolve_then_only_newest() {
    // Given - identity registers on A, then on B without A disconnecting
    let registry = registry(FanoutPolicy::LatestSession);
    let (tx_a, _rx_a) = frame_queue();
    let (tx_b, _rx_b) = frame_queue();
    let conn_a = registry.connect(tx_a).await.unwrap();
    let conn_b = registry.connect(tx_b).await.unwrap();
    registry.register(conn_a, UserId::new(9)).await.unwrap();
    registry.register(conn_b, UserId::new(9)).await.unwrap();

    // When
    let handles = registry.resolve(UserId::new(9)).await;

    // Then - last register wins
    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].connection_id, conn_b);
}

#[tokio::test]
async fn given_stale_disconnect_with_latest_session_policy_then_newer_entry_survives() {
    // Given - A was overwritten by B, then A's delayed disconnect arrives
    let registry = registry(FanoutPolicy::LatestSession);
    let (tx_a, _rx_a) = frame_queue();
    let (tx_b, _rx_b) = frame_queue();
    let conn_a = registry.connect(tx_a).await.unwrap();
    let conn_b = registry.connect(tx_b).await.unwrap();
    registry.register(conn_a, UserId::new(9)).await.unwrap();
    registry.register(conn_b, UserId::new(9)).await.unwrap();

    // When
    registry.disconnect(conn_a).await;

    // Then - B's registration is untouched
    let handles = registry.resolve(UserId::new(9)).await;
    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].connection_id, conn_b);
}

#[tokio::test]
async fn given_unknown_identity_when_resolve_then_empty_without_error() {
    // Given
    let registry = registry(FanoutPolicy::AllSessions);

    // When / Then
    assert!(registry.resolve(UserId::new(12345)).await.is_empty());
}

#[tokio::test]
async fn given_unknown_connection_when_register_then_error() {
    // Given
    let registry = registry(FanoutPolicy::AllSessions);
    let (tx, _rx) = frame_queue();
    let conn = registry.connect(tx).await.unwrap();
    registry.disconnect(conn).await;

    // When
    let result = registry.register(conn, UserId::new(1)).await;

    // Then
    assert!(matches!(
        result.unwrap_err(),
        WsError::UnknownConnection { .. }
    ));
}

#[tokio::test]
async fn given_connection_limit_reached_when_connect_then_error() {
    // Given
    let registry = PresenceRegistry::new(
        FanoutPolicy::AllSessions,
        ConnectionLimits { max_total: 1 },
    );
    let (tx_a, _rx_a) = frame_queue();
    let (tx_b, _rx_b) = frame_queue();
    registry.connect(tx_a).await.unwrap();

    // When
    let result = registry.connect(tx_b).await;

    // Then
    assert!(matches!(
        result.unwrap_err(),
        WsError::ConnectionLimitExceeded { current: 1, max: 1, .. }
    ));
}

#[tokio::test]
async fn given_reregister_under_new_identity_then_old_binding_removed() {
    // Given - one connection rebinds from user 1 to user 2
    let registry = registry(FanoutPolicy::AllSessions);
    let (tx, _rx) = frame_queue();
    let conn = registry.connect(tx).await.unwrap();
    registry.register(conn, UserId::new(1)).await.unwrap();

    // When
    registry.register(conn, UserId::new(2)).await.unwrap();

    // Then
    assert!(registry.resolve(UserId::new(1)).await.is_empty());
    assert_eq!(registry.resolve(UserId::new(2)).await.len(), 1);
}
