//! # homeserver-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SystemApi`: stats, service list and service control
//!   - `NetworkApi`: DNS records and Pi-hole
//!   - `GameserverApi`: provisioning, lifecycle, config and console
//!   - `HostingApi`: webspaces and Apache logs
//!   - `PowerApi`: power actions and Wake-on-LAN
//!   - `SshApi`: SSH command sessions
//!   - `SettingsApi`: stored Linux credentials
//!   - `FileApi`: remote file manager
//!   - `Notifier`: user-facing notifications
//! - Provide the **request gateway** every call goes through (timeout and
//!   liveness accounting) and the **liveness monitor** that flips the
//!   online/offline state on its own timer
//! - Provide **scheduled tasks** (periodic refresh, one-shot delays) owned by views
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DashboardService`, `NetworkService`, `GameserverService`,
//!     `InstallationTracker`, `GameConsole`, `SshTerminal`, `HostingService`,
//!     `PowerService`, `SettingsService`, `FileManager`
//!
//! ## Dependency rule
//! Depends on `homeserver-domain` only (plus `tokio` for time and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod gateway;
pub mod liveness;
pub mod ports;
pub mod scheduler;
pub mod services;
