//! In-memory sheet sessions
//!
//! Each session owns one [`SheetQueue`]. Sessions live until deleted, until
//! they sit idle longer than the configured TTL, or until the process exits.

use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

use crate::domain::SheetSlot;
use crate::engine::SheetQueue;

struct Session {
    queue: SheetQueue,
    touched: Instant,
}

impl Session {
    fn idle_longer_than(&self, ttl: Duration) -> bool {
        self.touched.elapsed() > ttl
    }
}

pub struct SessionStore {
    sheets: DashMap<Uuid, Session>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        SessionStore {
            sheets: DashMap::new(),
            idle_ttl,
        }
    }

    pub fn create(&self) -> Uuid {
        self.evict_idle();
        let id = Uuid::new_v4();
        self.sheets.insert(
            id,
            Session {
                queue: SheetQueue::new(),
                touched: Instant::now(),
            },
        );
        id
    }

    /// Run `f` against a session's queue, or `None` if it does not exist or has expired
    pub fn with<R>(&self, id: &Uuid, f: impl FnOnce(&mut SheetQueue) -> R) -> Option<R> {
        let mut session = self.live(id)?;
        session.touched = Instant::now();
        Some(f(&mut session.queue))
    }

    /// Copy of a session's slots, for rendering without holding the lock
    pub fn snapshot(&self, id: &Uuid) -> Option<Vec<SheetSlot>> {
        self.with(id, |queue| queue.slots().to_vec())
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sheets.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Drop every session idle past the TTL, returning how many went
    pub fn evict_idle(&self) -> usize {
        let before = self.sheets.len();
        self.sheets.retain(|_, session| !session.idle_longer_than(self.idle_ttl));
        before.saturating_sub(self.sheets.len())
    }

    fn live(&self, id: &Uuid) -> Option<RefMut<'_, Uuid, Session>> {
        let session = self.sheets.get_mut(id)?;
        if !session.idle_longer_than(self.idle_ttl) {
            return Some(session);
        }
        // The shard lock must be released before removing
        drop(session);
        if self.sheets.remove_if(id, |_, s| s.idle_longer_than(self.idle_ttl)).is_some() {
            debug!(sheet_id = %id, "Sheet session expired");
        }
        None
    }
}
