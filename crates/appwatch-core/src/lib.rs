pub mod adhoc;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod paths;
pub mod store;
pub mod tracker;
pub mod upstream;

pub use adhoc::{AdhocChecker, AdhocRequest};
pub use config::{Config, StoreConfig, TrackedApp};
pub use error::{CheckError, ConfigError, NotifyError, StoreError, UpstreamError};
pub use notify::{Notifier, WebhookClient};
pub use paths::*;
pub use store::{ConcurrencyToken, Snapshot, VersionStore};
pub use tracker::{RunReport, TrackerOptions, UpdateTracker};
pub use upstream::{AppDetails, GraphClient, LatestBinary, MetadataSource, PrimaryBinary};

/// User Agent string for service-originated requests
pub const USER_AGENT: &str = concat!("appwatch/", env!("CARGO_PKG_VERSION"));
