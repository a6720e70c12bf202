//! Server-side session store.
//!
//! Sessions live in an in-memory map keyed by opaque uuid tokens; none of the
//! session state ever travels to the client, so a session can be revoked
//! instantly by dropping its entry. Deactivating an employee invalidates every
//! session that belongs to them.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

/// Authenticated principal stored against a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Employee row id; None for the built-in admin account.
    pub employee_id: Option<i32>,
    pub name: String,
    pub team: String,
    pub role: String,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn is_team_leader(&self) -> bool {
        self.role == "team_leader"
    }
}

/// In-memory session map behind a `RwLock`.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for the given principal and return its opaque token.
    pub fn create(&self, session: Session) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(token.clone(), session);
        token
    }

    /// Look up the principal for a token, if the session is still live.
    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions
            .read()
            .expect("session store lock poisoned")
            .get(token)
            .cloned()
    }

    /// Drop a single session (logout).
    pub fn remove(&self, token: &str) -> bool {
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .remove(token)
            .is_some()
    }

    /// Drop every session belonging to the given employee. Returns how many
    /// sessions were invalidated.
    pub fn invalidate_employee(&self, employee_id: i32) -> usize {
        let mut sessions = self.sessions.write().expect("session store lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, s| s.employee_id != Some(employee_id));
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .expect("session store lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
