// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client pool for concurrent transfers
//!
//! A [`Client`] is not meant to be shared while being configured. The pool
//! hands out independent instances instead and resets each one to the
//! template configuration when it comes back.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::client::Client;
use crate::config::ClientConfig;

/// Idle clients kept by default
const DEFAULT_MAX_IDLE: usize = 16;

/// Client pool
pub struct ClientPool {
    /// Configuration every handed-out client starts from
    template: ClientConfig,
    /// Reset clients ready for reuse
    idle: Mutex<Vec<Client>>,
    /// Upper bound on `idle`
    max_idle: usize,
    /// Pool statistics
    stats: RwLock<PoolStats>,
}

/// Pool statistics
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Clients built from the template
    pub clients_created: u64,
    /// Acquisitions served from the idle list
    pub clients_reused: u64,
    /// Clients returned to the pool
    pub clients_released: u64,
    /// Clients currently handed out
    pub active_clients: u64,
    /// Peak concurrently handed-out clients
    pub peak_active: u64,
}

/// A client acquired from the pool; goes back on drop
pub struct PooledClient {
    client: Client,
    pool: Arc<ClientPool>,
}

impl std::ops::Deref for PooledClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl std::ops::DerefMut for PooledClient {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.client
    }
}

impl Drop for PooledClient {
    fn drop(&mut self) {
        let client = std::mem::take(&mut self.client);
        self.pool.release(client);
    }
}

impl ClientPool {
    /// Create a pool whose clients start from `template`
    pub fn new(template: ClientConfig) -> Arc<Self> {
        Self::with_max_idle(template, DEFAULT_MAX_IDLE)
    }

    /// Create a pool keeping at most `max_idle` clients around
    pub fn with_max_idle(template: ClientConfig, max_idle: usize) -> Arc<Self> {
        Arc::new(Self {
            template,
            idle: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
            stats: RwLock::new(PoolStats::default()),
        })
    }

    /// Take a fresh or fully reset client
    pub fn acquire(self: &Arc<Self>) -> PooledClient {
        let reused = self.idle.lock().pop();

        let client = {
            let mut stats = self.stats.write();
            stats.active_clients += 1;
            stats.peak_active = stats.peak_active.max(stats.active_clients);
            match reused {
                Some(client) => {
                    stats.clients_reused += 1;
                    client
                }
                None => {
                    stats.clients_created += 1;
                    Client::with_config(self.template.clone())
                }
            }
        };

        PooledClient {
            client,
            pool: Arc::clone(self),
        }
    }

    fn release(&self, mut client: Client) {
        client.reset(&self.template);

        {
            let mut stats = self.stats.write();
            stats.clients_released += 1;
            stats.active_clients = stats.active_clients.saturating_sub(1);
        }

        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(client);
        } else {
            debug!(max_idle = self.max_idle, "Pool full, dropping client");
        }
    }

    /// Configuration handed-out clients start from
    pub fn template(&self) -> &ClientConfig {
        &self.template
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        self.stats.read().clone()
    }

    /// Reset statistics
    pub fn reset_stats(&self) {
        let mut stats = self.stats.write();
        *stats = PoolStats::default();
    }

    /// Clients waiting for reuse
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }
}
