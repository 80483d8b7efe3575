//! Application services that need I/O (database, network).

pub mod health;

pub use health::{default_probes, run_probes, ConfigStoreProbe, DatabaseProbe, HealthProbe};
