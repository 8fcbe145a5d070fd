use std::collections::HashMap;

use uuid::Uuid;

use crate::model::Incident;

/// Optimistic state of a single incident's resolve request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveState {
    /// Request in flight, incident hidden.
    Pending,
    /// Server accepted the resolve. Stays hidden until a fetch issued after
    /// `fetches_issued` lands.
    Committed { fetches_issued: u64 },
}

/// Issue order of a list fetch. Only the newest issued fetch may overwrite
/// the cached list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Last fetched incident list plus per-incident optimistic resolve state.
#[derive(Default, Debug)]
pub struct OptimisticCache {
    incidents: Vec<Incident>,
    states: HashMap<Uuid, ResolveState>,
    issued: u64,
    applied: u64,
}

impl OptimisticCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: Uuid) -> Option<ResolveState> {
        self.states.get(&id).copied()
    }

    pub fn is_pending(&self, id: Uuid) -> bool {
        self.state(id) == Some(ResolveState::Pending)
    }

    /// Hides `id` ahead of the server. Returns false if a resolve for it is
    /// already pending or committed, in which case no request should be sent.
    pub fn begin_resolve(&mut self, id: Uuid) -> bool {
        if self.states.contains_key(&id) {
            return false;
        }
        self.states.insert(id, ResolveState::Pending);
        true
    }

    pub fn commit(&mut self, id: Uuid) {
        if let Some(state) = self.states.get_mut(&id) {
            *state = ResolveState::Committed {
                fetches_issued: self.issued,
            };
        }
    }

    /// Drops the optimistic marker so the incident shows again.
    pub fn rollback(&mut self, id: Uuid) {
        if self.states.get(&id) == Some(&ResolveState::Pending) {
            self.states.remove(&id);
        }
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Installs a fetched list. Responses older than one already applied are
    /// discarded and `false` is returned.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, incidents: Vec<Incident>) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        self.incidents = incidents;
        self.states.retain(|_, state| match state {
            ResolveState::Pending => true,
            ResolveState::Committed { fetches_issued } => *fetches_issued >= ticket.0,
        });
        true
    }

    /// Fetched incidents minus those optimistically resolved.
    pub fn visible(&self) -> impl Iterator<Item = &Incident> + '_ {
        self.incidents
            .iter()
            .filter(|x| !self.states.contains_key(&x.id))
    }

    /// Count of fetched incidents currently hidden.
    pub fn hidden_count(&self) -> usize {
        self.incidents.len() - self.visible().count()
    }
}
