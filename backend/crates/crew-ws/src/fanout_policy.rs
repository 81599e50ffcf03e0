/// How a registry resolves the live connections of one user identity.
///
/// The two delivery paths want different semantics for the same "reach a
/// user's live session" problem, so the policy is chosen per registry
/// instance rather than duplicating the bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanoutPolicy {
    /// Group semantics: every registered connection of the identity is
    /// resolved (one browser tab each). Used by the notification channel.
    AllSessions,
    /// Single-slot semantics: the most recent registration wins and is the
    /// only resolvable connection. Used by the chat router.
    LatestSession,
}
