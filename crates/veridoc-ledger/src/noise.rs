//! Operational noise model for the simulated network.
//!
//! The registry fabricates the operational texture of a distributed ledger
//! (confirmation counts, hash rate, block cadence) without running one.
//! Everything random or fabricated sits behind [`NetworkModel`] so tests can
//! substitute a deterministic implementation.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fabricated network-level descriptors reported by ledger stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescriptors {
    /// Claimed network hash rate in TH/s.
    pub hash_rate_ths: f64,

    /// Average interval between blocks, in milliseconds.
    pub average_block_interval_ms: u64,

    /// Claimed mining difficulty.
    pub difficulty: u64,

    /// Timestamp of the most recent registration, if any (Unix milliseconds).
    pub last_block_at: Option<i64>,
}

/// Source of operational noise for the registry.
pub trait NetworkModel: Send + Sync {
    /// Confirmation count assigned to a fresh registration.
    fn confirmations(&self) -> u32;

    /// Network descriptors for the stats report.
    fn descriptors(&self, total_registrations: u64, last_registered_at: Option<i64>)
        -> NetworkDescriptors;
}

/// Default noise model: uniform confirmation counts, fixed network shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedNetwork;

impl NetworkModel for SimulatedNetwork {
    fn confirmations(&self) -> u32 {
        // Settled registrations report between 10 and 59 confirmations
        rand::thread_rng().gen_range(10..60)
    }

    fn descriptors(
        &self,
        _total_registrations: u64,
        last_registered_at: Option<i64>,
    ) -> NetworkDescriptors {
        NetworkDescriptors {
            hash_rate_ths: 1.2,
            average_block_interval_ms: 2500,
            difficulty: 3_456_789_012_345,
            last_block_at: last_registered_at,
        }
    }
}
