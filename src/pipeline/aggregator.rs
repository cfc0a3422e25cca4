//! Per-client aggregation of valid sessions
//!
//! Sessions are folded by client hardware address. The first session for an
//! address fixes its identifier and username; later sessions only add to the
//! three totals. Clients are kept in first-seen order so repeated runs over
//! the same rows produce identical tables.

use crate::models::{ClientAggregate, ValidSession};
use std::collections::HashMap;
use tracing::debug;

/// Aggregates keyed by client hardware address, built fresh per report run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientAggregates {
    index: HashMap<String, usize>,
    clients: Vec<ClientAggregate>,
}

impl ClientAggregates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one valid session into its client's aggregate
    pub fn add(&mut self, session: &ValidSession) {
        match self.index.get(&session.client_mac) {
            Some(&position) => {
                self.clients[position].absorb(session);
            }
            None => {
                debug!("New client {}", session.client_mac);
                self.index
                    .insert(session.client_mac.clone(), self.clients.len());
                self.clients.push(ClientAggregate::seed(session));
            }
        }
    }

    pub fn get(&self, client_mac: &str) -> Option<&ClientAggregate> {
        self.index
            .get(client_mac)
            .map(|&position| &self.clients[position])
    }

    /// Number of distinct clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Aggregates in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &ClientAggregate> {
        self.clients.iter()
    }

    pub fn into_vec(self) -> Vec<ClientAggregate> {
        self.clients
    }
}

impl<'a> FromIterator<&'a ValidSession> for ClientAggregates {
    fn from_iter<I: IntoIterator<Item = &'a ValidSession>>(sessions: I) -> Self {
        let mut aggregates = Self::new();
        for session in sessions {
            aggregates.add(session);
        }
        aggregates
    }
}
