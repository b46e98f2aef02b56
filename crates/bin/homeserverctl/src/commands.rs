//! Command execution against any backend implementing the full API surface.

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, bail};
use homeserver_app::gateway::RequestGateway;
use homeserver_app::liveness::{LIVENESS_TICK, spawn_liveness_monitor};
use homeserver_app::ports::HomeServerApi;
use homeserver_app::services::{
    DashboardService, FileManager, GameConsole, GameserverService, HostingService,
    InstallationTracker, NetworkService, PowerService, ServiceContext, SettingsService,
    SshTerminal, Submission,
};
use homeserver_domain::gameserver::{GameserverAction, GameserverKind, GameserverSpec};
use homeserver_domain::installation::InstallPhase;
use homeserver_domain::power::PowerAction;
use homeserver_domain::service::ServiceAction;
use homeserver_domain::session::SshCredentials;
use homeserver_domain::terminal::LineKind;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::signal;

use crate::cli::{
    Command, DnsCommand, FilesCommand, GameserverCommand, LoginArgs, PiholeCommand,
    SettingsCommand, WebspaceCommand,
};
use crate::output::{self, ConsoleNotifier};

type Ctx<A> = ServiceContext<A, ConsoleNotifier>;

/// Local REPL command that sends the login password to the remote shell.
const PASSWORD_COMMAND: &str = ":password";

/// Run `command` against `api`.
///
/// # Errors
///
/// Returns the failure of the command. Service failures have already been
/// reported through `notifier` by the time they get here.
pub async fn run<A: HomeServerApi>(
    api: Arc<A>,
    notifier: Arc<ConsoleNotifier>,
    gateway: RequestGateway,
    refresh: Duration,
    command: Command,
) -> anyhow::Result<()> {
    let _monitor = spawn_liveness_monitor(gateway.liveness().clone(), LIVENESS_TICK);
    let ctx = ServiceContext::new(api, notifier, gateway);

    match command {
        Command::Stats => {
            let stats = DashboardService::new(ctx).load_stats().await?;
            println!("{stats}");
        }
        Command::Watch { interval } => {
            let period = interval.map_or(refresh, Duration::from_secs);
            watch(ctx, period).await?;
        }
        Command::Services => {
            let services = DashboardService::new(ctx).load_services().await?;
            print!("{}", output::services_table(&services));
        }
        Command::Service { name, action } => {
            let action: ServiceAction = action.parse()?;
            let status = DashboardService::new(ctx)
                .control_service(&name, action)
                .await?;
            println!("{name}: {status}");
        }
        Command::Dns(command) => dns(ctx, command).await?,
        Command::Pihole(command) => pihole(ctx, command).await?,
        Command::Gameserver(command) => gameserver(ctx, command).await?,
        Command::Webspace(command) => webspace(ctx, command).await?,
        Command::ApacheLogs => {
            let logs = HostingService::new(ctx).apache_logs().await?;
            println!("{logs}");
        }
        Command::Power { action, yes } => {
            let action: PowerAction = action.parse()?;
            if !yes && !confirm(action.confirmation_prompt()).await? {
                eprintln!("aborted");
                return Ok(());
            }
            PowerService::new(ctx).power(action).await?;
        }
        Command::Wake { mac } => {
            PowerService::new(ctx).wake(&mac).await?;
        }
        Command::Ssh(login) => ssh(ctx, login).await?,
        Command::Settings(command) => settings(ctx, command).await?,
        Command::Files(command) => files(ctx, command).await?,
    }
    Ok(())
}

async fn watch<A: HomeServerApi>(ctx: Ctx<A>, period: Duration) -> anyhow::Result<()> {
    let liveness = ctx.gateway().liveness().clone();
    let dashboard = DashboardService::new(ctx);
    let _refresh = dashboard.start_auto_refresh_every(period);
    let _dimming = dashboard.watch_liveness();
    let mut snapshots = dashboard.subscribe();
    let mut online = liveness.subscribe();

    loop {
        tokio::select! {
            changed = snapshots.changed() => changed?,
            changed = online.changed() => changed?,
            _ = signal::ctrl_c() => break,
        }
        let snapshot = snapshots.borrow_and_update().clone();
        let is_online = *online.borrow_and_update();
        print!("\x1b[2J\x1b[H{}", output::dashboard(&snapshot, is_online));
        std::io::stdout().flush()?;
    }
    Ok(())
}

async fn dns<A: HomeServerApi>(ctx: Ctx<A>, command: DnsCommand) -> anyhow::Result<()> {
    let network = NetworkService::new(ctx);
    match command {
        DnsCommand::List => {
            let entries = network.list_dns().await?;
            print!("{}", output::dns_table(&entries));
        }
        DnsCommand::Add { domain, ip } => {
            network.add_dns(&domain, &ip).await?;
        }
        DnsCommand::Delete { domain } => network.delete_dns(&domain).await?,
    }
    Ok(())
}

async fn pihole<A: HomeServerApi>(ctx: Ctx<A>, command: PiholeCommand) -> anyhow::Result<()> {
    let network = NetworkService::new(ctx);
    match command {
        PiholeCommand::Stats => {
            let stats = network.pihole_stats().await?;
            println!(
                "{} of {} queries blocked ({}%)",
                stats.blocked, stats.total, stats.block_rate
            );
        }
        PiholeCommand::Blocklist { url } => network.add_blocklist(&url).await?,
        PiholeCommand::Gravity => network.update_gravity().await?,
    }
    Ok(())
}

async fn gameserver<A: HomeServerApi>(
    ctx: Ctx<A>,
    command: GameserverCommand,
) -> anyhow::Result<()> {
    let servers = GameserverService::new(ctx.clone());
    match command {
        GameserverCommand::List => {
            print!("{}", output::gameserver_table(&servers.list().await?));
        }
        GameserverCommand::Create {
            kind,
            name,
            port,
            ram,
            detach,
        } => {
            let spec = GameserverSpec::new(GameserverKind::from(kind.as_str()), &name, port, ram)?;
            install(ctx, spec, detach).await?;
        }
        GameserverCommand::Start { name } => {
            control(&servers, &name, GameserverAction::Start).await?;
        }
        GameserverCommand::Stop { name } => {
            control(&servers, &name, GameserverAction::Stop).await?;
        }
        GameserverCommand::Restart { name } => {
            control(&servers, &name, GameserverAction::Restart).await?;
        }
        GameserverCommand::Delete { name } => {
            let server = servers.find(&name).await?;
            servers.delete(&server).await?;
        }
        GameserverCommand::Config { name, set: None } => {
            let config = servers.config(&name).await?;
            eprintln!("# {}", config.file);
            println!("{}", config.content);
        }
        GameserverCommand::Config {
            name,
            set: Some(source),
        } => {
            let content = read_text(&source).await?;
            servers.save_config(&name, &content).await?;
        }
        GameserverCommand::Logs { name } => {
            let logs = servers.logs(&name).await?;
            if let Some(error) = logs.last_error.filter(|e| !e.is_empty()) {
                eprintln!("last error: {error}");
            }
            println!("{}", logs.logs);
        }
        GameserverCommand::Console { name } => console(ctx, &name).await?,
    }
    Ok(())
}

async fn control<A: HomeServerApi>(
    servers: &GameserverService<A, ConsoleNotifier>,
    name: &str,
    action: GameserverAction,
) -> anyhow::Result<()> {
    let server = servers.find(name).await?;
    servers.control(&server, action).await?;
    Ok(())
}

async fn install<A: HomeServerApi>(
    ctx: Ctx<A>,
    spec: GameserverSpec,
    detach: bool,
) -> anyhow::Result<()> {
    let mut handle = InstallationTracker::new(ctx).start(spec).await?;
    if detach {
        println!("{}", handle.id());
        return Ok(());
    }

    let mut updates = handle.subscribe();
    loop {
        let progress = updates.borrow_and_update().clone();
        eprint!("\r{}\x1b[K", output::progress_line(&progress));
        if progress.is_terminal() {
            break;
        }
        tokio::select! {
            changed = updates.changed() => changed?,
            _ = signal::ctrl_c() => handle.cancel(),
        }
    }
    eprintln!();

    let last = handle.wait().await;
    match last.phase {
        InstallPhase::Complete => Ok(()),
        InstallPhase::Cancelled => bail!("installation abandoned, the backend may still be working on it"),
        _ => bail!("{}", last.message),
    }
}

async fn console<A: HomeServerApi>(ctx: Ctx<A>, server: &str) -> anyhow::Result<()> {
    let mut view = GameConsole::new(ctx).open(server);
    let mut updates = view.subscribe();
    let mut input = stdin_lines();
    let mut shown = String::new();
    eprintln!("# console of {server}, Ctrl-C or 'quit' to leave");

    loop {
        tokio::select! {
            changed = updates.changed() => {
                changed?;
                let current = updates.borrow_and_update().clone();
                print!("{}", output::console_delta(&shown, &current));
                std::io::stdout().flush()?;
                shown = current;
            }
            line = input.next_line() => {
                let Some(line) = line? else { break };
                if line.trim() == "quit" {
                    break;
                }
                // already notified
                let _ = view.send_command(&line).await;
            }
            _ = signal::ctrl_c() => break,
        }
    }
    view.close();
    Ok(())
}

async fn webspace<A: HomeServerApi>(ctx: Ctx<A>, command: WebspaceCommand) -> anyhow::Result<()> {
    let hosting = HostingService::new(ctx);
    match command {
        WebspaceCommand::List => print!("{}", output::webspace_table(&hosting.list().await?)),
        WebspaceCommand::Create { domain, path } => {
            hosting.create(&domain, &path).await?;
        }
        WebspaceCommand::Delete { domain } => hosting.delete(&domain).await?,
    }
    Ok(())
}

async fn ssh<A: HomeServerApi>(ctx: Ctx<A>, login: LoginArgs) -> anyhow::Result<()> {
    let mut terminal = SshTerminal::new(ctx);
    terminal.connect(credentials(login)).await?;
    print_terminal(&mut terminal);
    let mut input = stdin_lines();

    while terminal.is_connected() {
        print!("{} ", terminal.prompt());
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = input.next_line() => line?,
            _ = signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            terminal.disconnect().await;
            break;
        };

        if is_password_request(&line) {
            if let Err(err) = terminal.autofill_password().await {
                tracing::debug!(error = %err, "saved password not sent");
            }
            print_terminal(&mut terminal);
            continue;
        }

        match terminal.submit(&line).await {
            Ok(Submission::Executed(_)) => {
                print_terminal(&mut terminal);
                if terminal.awaiting_password() {
                    println!("(type {PASSWORD_COMMAND} to send the saved password)");
                }
            }
            Ok(_) => print_terminal(&mut terminal),
            Err(err) => {
                tracing::debug!(error = %err, "command failed");
                print_terminal(&mut terminal);
            }
        }
    }
    Ok(())
}

fn is_password_request(line: &str) -> bool {
    line.trim() == PASSWORD_COMMAND
}

fn print_terminal<A: HomeServerApi>(terminal: &mut SshTerminal<A, ConsoleNotifier>) {
    for line in terminal.drain_lines() {
        // the user just typed it
        if line.kind == LineKind::Command {
            continue;
        }
        println!("{}", output::terminal_line(&line));
    }
}

async fn settings<A: HomeServerApi>(ctx: Ctx<A>, command: SettingsCommand) -> anyhow::Result<()> {
    let settings = SettingsService::new(ctx);
    match command {
        SettingsCommand::Show => match settings.credentials().await? {
            Some(stored) => println!("{}@{}:{}", stored.username, stored.host, stored.port),
            None => println!("no credentials stored"),
        },
        SettingsCommand::Save(login) => settings.save(&credentials(login)).await?,
        SettingsCommand::Delete => settings.delete().await?,
        SettingsCommand::Test(login) => {
            let result = settings.test(&credentials(login)).await?;
            if !result.has_sudo {
                bail!("the account has no sudo rights");
            }
        }
    }
    Ok(())
}

async fn files<A: HomeServerApi>(ctx: Ctx<A>, command: FilesCommand) -> anyhow::Result<()> {
    let mut manager = FileManager::new(ctx);
    match command {
        FilesCommand::Ls { path } => {
            let listing = manager.open(&path).await?;
            print!("{}", output::listing(listing));
        }
        FilesCommand::Cat { path } => {
            let file = manager.read(&path).await?;
            print!("{}", file.content);
        }
        FilesCommand::Write { path, source } => {
            let content = read_text(&source).await?;
            manager.write(&path, &content).await?;
        }
        FilesCommand::Mkdir { parent, name } => {
            manager.open(&parent).await?;
            manager.create_folder(&name).await?;
        }
        FilesCommand::Mv { path, new_name } => manager.rename(&path, &new_name).await?,
        FilesCommand::Rm { path } => manager.delete(&path).await?,
        FilesCommand::Get { path, dest } => {
            let bytes = manager.download(&path).await?;
            tokio::fs::write(&dest, &bytes)
                .await
                .with_context(|| format!("writing {}", dest.display()))?;
            eprintln!("{} bytes written to {}", bytes.len(), dest.display());
        }
        FilesCommand::Put { source, dir } => {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .with_context(|| format!("{} has no file name", source.display()))?;
            let bytes = tokio::fs::read(&source)
                .await
                .with_context(|| format!("reading {}", source.display()))?;
            manager.open(&dir).await?;
            manager.upload(&name, bytes).await?;
        }
    }
    Ok(())
}

fn credentials(login: LoginArgs) -> SshCredentials {
    SshCredentials::new(login.host, login.port, login.username, login.password)
}

fn stdin_lines() -> Lines<BufReader<Stdin>> {
    BufReader::new(tokio::io::stdin()).lines()
}

async fn read_text(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

async fn confirm(question: &str) -> anyhow::Result<bool> {
    eprint!("{question} [y/N] ");
    std::io::stderr().flush()?;
    let answer = stdin_lines().next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
