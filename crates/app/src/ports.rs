//! Port definitions: traits that adapters implement.
//!
//! Every backend port returns [`ApiError`](homeserver_domain::error::ApiError)
//! so the request gateway can tell transport failures from application-level
//! rejections. Ports are split by backend area; [`HomeServerApi`] bundles them
//! for adapters that implement the whole surface.

pub mod files;
pub mod gameserver;
pub mod hosting;
pub mod network;
pub mod notifier;
pub mod power;
pub mod settings;
pub mod ssh;
pub mod system;

pub use files::FileApi;
pub use gameserver::GameserverApi;
pub use hosting::HostingApi;
pub use network::NetworkApi;
pub use notifier::Notifier;
pub use power::PowerApi;
pub use settings::SettingsApi;
pub use ssh::SshApi;
pub use system::SystemApi;

/// The complete backend surface.
pub trait HomeServerApi:
    SystemApi
    + NetworkApi
    + GameserverApi
    + HostingApi
    + PowerApi
    + SshApi
    + SettingsApi
    + FileApi
    + Send
    + Sync
    + 'static
{
}

impl<T> HomeServerApi for T where
    T: SystemApi
        + NetworkApi
        + GameserverApi
        + HostingApi
        + PowerApi
        + SshApi
        + SettingsApi
        + FileApi
        + Send
        + Sync
        + 'static
{
}
