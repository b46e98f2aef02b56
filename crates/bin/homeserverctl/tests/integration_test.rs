//! End-to-end tests for the full homeserverctl stack.
//!
//! Each test wires the real application services to the in-memory virtual
//! backend through the request gateway, the same way `main` does for the
//! `virtual` backend kind. No network is involved.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use homeserver_adapter_virtual::VirtualBackend;
use homeserver_app::gateway::RequestGateway;
use homeserver_app::ports::Notifier;
use homeserver_app::services::{
    DashboardService, FileManager, GameConsole, GameserverService, InstallationTracker,
    ServiceContext, SshTerminal, Submission,
};
use homeserver_domain::gameserver::{GameserverAction, GameserverKind, GameserverSpec, GameserverStatus};
use homeserver_domain::installation::InstallPhase;
use homeserver_domain::notification::{Notification, NotificationLevel};
use homeserver_domain::service::{ServiceAction, ServiceState};
use homeserver_domain::session::SshCredentials;
use homeserver_domain::terminal::LineKind;

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Notification>>,
}

impl Recorder {
    fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl Notifier for Recorder {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

fn context() -> (ServiceContext<VirtualBackend, Recorder>, Arc<Recorder>) {
    let notifier = Arc::new(Recorder::default());
    let ctx = ServiceContext::new(
        Arc::new(VirtualBackend::default()),
        Arc::clone(&notifier),
        RequestGateway::default(),
    );
    (ctx, notifier)
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_refresh_dashboard_snapshot() {
    let (ctx, _) = context();
    let dashboard = DashboardService::new(ctx);

    let snapshot = dashboard.refresh().await.unwrap();

    assert!(snapshot.stats.is_some());
    assert!(snapshot.services.iter().any(|s| s.name == "ssh"));
    assert!(!snapshot.dimmed);
}

#[tokio::test]
async fn should_stop_service_and_report_new_status() {
    let (ctx, notifier) = context();
    let dashboard = DashboardService::new(ctx);

    dashboard
        .control_service("apache2", ServiceAction::Stop)
        .await
        .unwrap();
    let services = dashboard.load_services().await.unwrap();

    let apache = services.iter().find(|s| s.name == "apache2").unwrap();
    assert_eq!(apache.status, ServiceState::Stopped);
    assert_eq!(notifier.last().unwrap().level, NotificationLevel::Success);
}

// ---------------------------------------------------------------------------
// Game servers
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_install_then_start_gameserver() {
    let (ctx, notifier) = context();
    let spec = GameserverSpec::new(GameserverKind::Valheim, "viking", 2456, 4).unwrap();

    let mut handle = InstallationTracker::new(ctx.clone())
        .start(spec)
        .await
        .unwrap();
    let last = handle.wait().await;

    assert_eq!(last.phase, InstallPhase::Complete);
    assert_eq!(last.progress, 100);
    assert_eq!(
        notifier.last().unwrap(),
        Notification::success("viking installed successfully")
    );

    let servers = GameserverService::new(ctx);
    let server = servers.find("viking").await.unwrap();
    assert_eq!(server.status, GameserverStatus::Stopped);

    servers.control(&server, GameserverAction::Start).await.unwrap();
    let server = servers.find("viking").await.unwrap();
    assert_eq!(server.status, GameserverStatus::Running);
}

#[tokio::test(start_paused = true)]
async fn should_not_poll_when_name_is_taken() {
    let (ctx, notifier) = context();
    let tracker = InstallationTracker::new(ctx);
    let spec = GameserverSpec::new(GameserverKind::MinecraftJava, "survival", 25565, 2).unwrap();
    let mut first = tracker.start(spec.clone()).await.unwrap();
    first.wait().await;

    let second = tracker.start(spec).await;

    assert!(second.is_err());
    assert_eq!(notifier.last().unwrap().level, NotificationLevel::Error);
}

#[tokio::test(start_paused = true)]
async fn should_show_console_command_after_follow_up_refresh() {
    let (ctx, _) = context();
    let spec = GameserverSpec::new(GameserverKind::MinecraftJava, "survival", 25565, 2).unwrap();
    InstallationTracker::new(ctx.clone())
        .start(spec)
        .await
        .unwrap()
        .wait()
        .await;
    let servers = GameserverService::new(ctx.clone());
    let server = servers.find("survival").await.unwrap();
    servers.control(&server, GameserverAction::Start).await.unwrap();

    let mut view = GameConsole::new(ctx).open("survival");
    tokio::time::sleep(Duration::from_millis(100)).await;
    view.send_command("list").await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert!(view.output().contains("There are 0 of a max of 20 players online"));
    view.close();
}

// ---------------------------------------------------------------------------
// SSH terminal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_run_commands_and_exit_locally() {
    let (ctx, _) = context();
    let mut terminal = SshTerminal::new(ctx);
    terminal
        .connect(SshCredentials::new("pi.local", None, "pi", "raspberry"))
        .await
        .unwrap();

    let result = terminal.submit("whoami").await.unwrap();
    assert!(matches!(result, Submission::Executed(out) if out.output == "pi\n"));

    let result = terminal.submit("EXIT").await.unwrap();
    assert_eq!(result, Submission::Exited);
    assert!(!terminal.is_connected());
    assert_eq!(terminal.history().entries()[0], "EXIT");
}

#[tokio::test]
async fn should_autofill_sudo_password() {
    let (ctx, _) = context();
    let mut terminal = SshTerminal::new(ctx);
    terminal
        .connect(SshCredentials::new("pi.local", None, "pi", "raspberry"))
        .await
        .unwrap();

    terminal.submit("sudo apt update").await.unwrap();
    assert!(terminal.awaiting_password());
    terminal.autofill_password().await.unwrap();

    let masked = terminal
        .lines()
        .iter()
        .any(|line| line.kind == LineKind::Output && line.text == "*********");
    assert!(masked);
}

// ---------------------------------------------------------------------------
// File manager
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_rename_and_delete_folder() {
    let (ctx, _) = context();
    let mut files = FileManager::new(ctx);
    files.open("/home/pi").await.unwrap();

    files.create_folder("backups").await.unwrap();
    assert!(files.listing().items.iter().any(|i| i.name == "backups" && i.is_directory));

    files.rename("/home/pi/backups", "archive").await.unwrap();
    assert!(files.listing().items.iter().any(|i| i.name == "archive"));

    files.delete("/home/pi/archive").await.unwrap();
    assert!(!files.listing().items.iter().any(|i| i.name == "archive"));
}

#[tokio::test]
async fn should_upload_and_download_same_bytes() {
    let (ctx, _) = context();
    let mut files = FileManager::new(ctx);
    files.open("/home/pi").await.unwrap();

    files.upload("blob.bin", vec![0, 1, 2, 255]).await.unwrap();
    let bytes = files.download("/home/pi/blob.bin").await.unwrap();

    assert_eq!(bytes, vec![0, 1, 2, 255]);
}
