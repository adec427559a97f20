// src/db/session_repo.rs

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    db::store::Tables,
    models::{auth::UserId, session::Session},
};

#[derive(Clone, Default)]
pub struct SessionRepository;

impl SessionRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn insert(&self, tx: &mut Tables, session: Session) -> Session {
        tx.sessions.insert(session.id, session.clone());
        session
    }

    pub fn find<'t>(&self, tx: &'t Tables, id: Uuid) -> Option<&'t Session> {
        tx.sessions.get(&id)
    }

    pub fn find_mut<'t>(&self, tx: &'t mut Tables, id: Uuid) -> Option<&'t mut Session> {
        tx.sessions.get_mut(&id)
    }

    pub fn delete(&self, tx: &mut Tables, id: Uuid) -> Option<Session> {
        tx.sessions.remove(&id)
    }

    /// Todas as sessões vivas de um usuário.
    pub fn for_user_mut<'t>(
        &self,
        tx: &'t mut Tables,
        user_id: UserId,
    ) -> impl Iterator<Item = &'t mut Session> {
        tx.sessions.values_mut().filter(move |s| s.user_id == user_id)
    }

    /// Remove sessões cujo token já expirou sem logout.
    pub fn delete_expired(&self, tx: &mut Tables, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = tx.sessions.len();
        tx.sessions.retain(|_, s| !s.is_expired(now, ttl));
        before - tx.sessions.len()
    }

    pub fn delete_for_user(&self, tx: &mut Tables, user_id: UserId) -> usize {
        let before = tx.sessions.len();
        tx.sessions.retain(|_, s| s.user_id != user_id);
        before - tx.sessions.len()
    }
}
