use chrono::{DateTime, TimeDelta, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::ImageAttachment;

/// An open add-destination form
#[derive(Debug, Clone)]
pub struct Draft {
    pub id: Uuid,
    /// Resolved photos waiting for submit, in completion order
    pub pending: Vec<ImageAttachment>,
    /// Cancelled when the form is dismissed or expires
    pub token: CancellationToken,
    pub created_at: DateTime<Utc>,
    pub last_touched_at: DateTime<Utc>,
}

impl Draft {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            pending: Vec::new(),
            token: CancellationToken::new(),
            created_at: now,
            last_touched_at: now,
        }
    }

    pub fn is_dismissed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn touch(&mut self) {
        self.last_touched_at = Utc::now();
    }

    /// Idle for longer than `ttl` as of `now`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.last_touched_at > ttl
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_resets_idle_time() {
        let mut draft = Draft::new();
        let later = draft.created_at + TimeDelta::minutes(30);
        assert!(draft.is_expired(later, TimeDelta::minutes(10)));

        draft.last_touched_at = later - TimeDelta::minutes(1);
        assert!(!draft.is_expired(later, TimeDelta::minutes(10)));

        draft.touch();
        assert!(draft.last_touched_at >= draft.created_at);
    }
}
