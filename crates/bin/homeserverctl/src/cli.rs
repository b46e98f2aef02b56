//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{BackendKind, DEFAULT_CONFIG_FILE};

#[derive(Debug, Parser)]
#[command(name = "homeserverctl", version, about = "Manage a Raspberry Pi home server")]
pub struct Cli {
    /// Configuration file.
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Backend API base URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show CPU, RAM, disk and temperature once.
    Stats,
    /// Live dashboard, refreshed until Ctrl-C.
    Watch {
        /// Seconds between refreshes (overrides the config).
        #[arg(long)]
        interval: Option<u64>,
    },
    /// List monitored services.
    Services,
    /// Control a systemd service: start, stop, restart, enable or disable.
    Service { name: String, action: String },
    #[command(subcommand)]
    Dns(DnsCommand),
    #[command(subcommand)]
    Pihole(PiholeCommand),
    #[command(subcommand)]
    Gameserver(GameserverCommand),
    #[command(subcommand)]
    Webspace(WebspaceCommand),
    /// Print the Apache error log.
    ApacheLogs,
    /// Shut down, reboot or suspend the server.
    Power {
        action: String,
        /// Skip the confirmation question.
        #[arg(long, short)]
        yes: bool,
    },
    /// Send a Wake-on-LAN packet.
    Wake { mac: String },
    /// Interactive SSH terminal.
    Ssh(LoginArgs),
    #[command(subcommand)]
    Settings(SettingsCommand),
    #[command(subcommand)]
    Files(FilesCommand),
}

#[derive(Debug, Subcommand)]
pub enum DnsCommand {
    List,
    Add { domain: String, ip: String },
    Delete { domain: String },
}

#[derive(Debug, Subcommand)]
pub enum PiholeCommand {
    Stats,
    /// Add a blocklist URL.
    Blocklist { url: String },
    /// Rebuild the gravity database.
    Gravity,
}

#[derive(Debug, Subcommand)]
pub enum GameserverCommand {
    List,
    /// Install a new server and follow its progress.
    Create {
        /// minecraft-java, minecraft-bedrock, beammp, valheim or battlefield2-aix.
        #[arg(long, default_value = "minecraft-java")]
        kind: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 25565)]
        port: u16,
        /// RAM in GB.
        #[arg(long, default_value_t = 2)]
        ram: u16,
        /// Return once the backend accepted the job.
        #[arg(long)]
        detach: bool,
    },
    Start { name: String },
    Stop { name: String },
    Restart { name: String },
    Delete { name: String },
    /// Print the main configuration file, or replace it.
    Config {
        name: String,
        /// Local file whose content becomes the new configuration.
        #[arg(long)]
        set: Option<PathBuf>,
    },
    Logs { name: String },
    /// Follow the live console; lines typed on stdin are sent as commands.
    Console { name: String },
}

#[derive(Debug, Subcommand)]
pub enum WebspaceCommand {
    List,
    Create { domain: String, path: String },
    Delete { domain: String },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the stored Linux credentials.
    Show,
    Save(LoginArgs),
    Delete,
    /// Check that the credentials work and have sudo rights.
    Test(LoginArgs),
}

#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// List a directory.
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    Cat { path: String },
    /// Replace a text file with the content of a local file.
    Write { path: String, source: PathBuf },
    Mkdir { parent: String, name: String },
    Mv { path: String, new_name: String },
    Rm { path: String },
    /// Download a remote file.
    Get { path: String, dest: PathBuf },
    /// Upload a local file into a remote directory.
    Put { source: PathBuf, dir: String },
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub host: String,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long, short)]
    pub username: String,
    #[arg(long, env = "HOMESERVER_SSH_PASSWORD", hide_env_values = true)]
    pub password: String,
}
