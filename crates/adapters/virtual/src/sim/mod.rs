//! Simulated backend state and the port implementations over it.

mod filesystem;
mod gameservers;
mod host;
mod shell;

use std::collections::{BTreeMap, HashMap};

use homeserver_domain::dns::DnsEntry;
use homeserver_domain::gameserver::Gameserver;
use homeserver_domain::id::{InstallationId, SessionId};
use homeserver_domain::service::ServiceState;
use homeserver_domain::session::StoredCredentials;
use homeserver_domain::webspace::Webspace;

pub(crate) use filesystem::Node;
pub(crate) use gameservers::Installation;
pub(crate) use shell::ShellSession;

/// Everything the simulated homeserver remembers.
#[derive(Default)]
pub(crate) struct State {
    /// Number of `system/stats` calls, drives the drifting numbers.
    pub ticks: u64,
    pub services: BTreeMap<String, ServiceState>,
    pub dns: Vec<DnsEntry>,
    pub blocklists: Vec<String>,
    pub gameservers: Vec<Gameserver>,
    pub installations: HashMap<InstallationId, Installation>,
    pub consoles: HashMap<String, Vec<String>>,
    pub configs: HashMap<String, String>,
    pub webspaces: Vec<Webspace>,
    pub sessions: HashMap<SessionId, ShellSession>,
    pub credentials: Option<StoredCredentials>,
    pub files: BTreeMap<String, Node>,
}

impl State {
    pub fn seeded() -> Self {
        let mut state = Self::default();
        for name in ["apache2", "bind9", "pihole-FTL", "ssh"] {
            state.services.insert(name.to_string(), ServiceState::Running);
        }
        state.dns.push(DnsEntry {
            domain: "pi.home".to_string(),
            ip: "192.168.0.205".to_string(),
            created: None,
        });
        state.webspaces.push(Webspace {
            domain: "default.home".to_string(),
            path: "/var/www/html".to_string(),
        });
        state.files = filesystem::seed();
        state
    }
}
