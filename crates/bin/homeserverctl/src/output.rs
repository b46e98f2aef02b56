//! Terminal rendering and the stderr notifier.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};

use homeserver_app::ports::Notifier;
use homeserver_app::services::DashboardSnapshot;
use homeserver_domain::dns::DnsEntry;
use homeserver_domain::files::DirectoryListing;
use homeserver_domain::gameserver::Gameserver;
use homeserver_domain::installation::{InstallPhase, InstallationProgress};
use homeserver_domain::notification::{Notification, NotificationLevel};
use homeserver_domain::service::ServiceInfo;
use homeserver_domain::terminal::{LineKind, TerminalLine};
use homeserver_domain::webspace::Webspace;

/// Prints every notification on stderr, so stdout only carries data.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    errors: AtomicUsize,
}

impl ConsoleNotifier {
    /// Whether a failure (error or warning) has been shown to the user.
    #[must_use]
    pub fn reported_error(&self) -> bool {
        self.errors.load(Ordering::Relaxed) > 0
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if matches!(
            notification.level,
            NotificationLevel::Error | NotificationLevel::Warning
        ) {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        let tag = match notification.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
        };
        eprintln!("[{tag}] {}", notification.message);
    }
}

#[must_use]
pub fn services_table(services: &[ServiceInfo]) -> String {
    let width = services.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for service in services {
        let _ = writeln!(out, "{:<width$}  {}", service.name, service.status);
    }
    out
}

#[must_use]
pub fn dashboard(snapshot: &DashboardSnapshot, online: bool) -> String {
    let mut out = String::new();
    if !online {
        out.push_str("!! backend offline, values may be stale\n");
    }
    match &snapshot.stats {
        Some(stats) => {
            let _ = writeln!(out, "{stats}");
        }
        None => out.push_str("no statistics yet\n"),
    }
    out.push_str(&services_table(&snapshot.services));
    if let Some(at) = snapshot.updated_at {
        let _ = writeln!(out, "updated {}", at.format("%H:%M:%S"));
    }
    out
}

#[must_use]
pub fn dns_table(entries: &[DnsEntry]) -> String {
    let width = entries.iter().map(|e| e.domain.len()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        let _ = write!(out, "{:<width$}  {}", entry.domain, entry.ip);
        if let Some(created) = entry.created_at() {
            let _ = write!(out, "  {}", created.format("%Y-%m-%d %H:%M"));
        }
        out.push('\n');
    }
    out
}

#[must_use]
pub fn gameserver_table(servers: &[Gameserver]) -> String {
    if servers.is_empty() {
        return "no game servers installed\n".to_string();
    }
    let width = servers.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for server in servers {
        let _ = writeln!(
            out,
            "{:<width$}  {:<10}  port {:<5}  {} GB  {}",
            server.name,
            server.status.to_string(),
            server.port,
            server.ram,
            server.kind.label()
        );
    }
    out
}

#[must_use]
pub fn webspace_table(webspaces: &[Webspace]) -> String {
    let width = webspaces.iter().map(|w| w.domain.len()).max().unwrap_or(0);
    let mut out = String::new();
    for webspace in webspaces {
        let _ = writeln!(out, "{:<width$}  {}", webspace.domain, webspace.path);
    }
    out
}

#[must_use]
pub fn listing(listing: &DirectoryListing) -> String {
    let mut out = format!("{}\n", listing.path);
    for item in &listing.items {
        let marker = if item.is_directory { 'd' } else { '-' };
        let size = if item.is_directory {
            String::new()
        } else {
            item.size_label()
        };
        let modified = item
            .modified_at()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "{marker} {size:>9}  {modified:<16}  {}", item.name);
    }
    out
}

/// One-line progress bar for a running installation.
#[must_use]
pub fn progress_line(progress: &InstallationProgress) -> String {
    const WIDTH: usize = 30;
    let filled = usize::from(progress.progress.min(100)) * WIDTH / 100;
    let bar = format!("{}{}", "#".repeat(filled), ".".repeat(WIDTH - filled));
    let state = match progress.phase {
        InstallPhase::Complete => "done",
        InstallPhase::Error => "failed",
        InstallPhase::TimedOut => "timed out",
        InstallPhase::Cancelled => "cancelled",
        InstallPhase::Idle | InstallPhase::Active => "",
    };
    format!(
        "[{bar}] {:>3}% {} {state}",
        progress.progress, progress.message
    )
    .trim_end()
    .to_string()
}

/// Part of `current` not printed yet.
///
/// The backend returns a rolling tail of the console on every refresh, so
/// the lines already shown are the longest run of whole lines that ends
/// `shown` and starts `current`. Without any overlap everything is new.
#[must_use]
pub fn console_delta<'a>(shown: &str, current: &'a str) -> &'a str {
    if let Some(rest) = current.strip_prefix(shown) {
        return rest;
    }
    let overlap = current
        .match_indices('\n')
        .map(|(at, _)| at + 1)
        .filter(|&end| end <= shown.len())
        .rev()
        .find(|&end| {
            let head = &current[..end];
            if !shown.ends_with(head) {
                return false;
            }
            let before = &shown[..shown.len() - end];
            before.is_empty() || before.ends_with('\n')
        });
    overlap.map_or(current, |end| &current[end..])
}

#[must_use]
pub fn terminal_line(line: &TerminalLine) -> String {
    match line.kind {
        LineKind::Error => format!("! {}", line.text),
        LineKind::Success | LineKind::Info => format!("# {}", line.text),
        LineKind::Command | LineKind::Output => line.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeserver_domain::files::FileItem;
    use homeserver_domain::service::ServiceState;
    use homeserver_domain::stats::SystemStats;

    #[test]
    fn should_align_service_names() {
        let services = vec![
            ServiceInfo {
                name: "ssh".to_string(),
                status: ServiceState::Running,
            },
            ServiceInfo {
                name: "apache2".to_string(),
                status: ServiceState::Stopped,
            },
        ];
        assert_eq!(
            services_table(&services),
            "ssh      running\napache2  stopped\n"
        );
    }

    #[test]
    fn should_flag_offline_dashboard() {
        let snapshot = DashboardSnapshot {
            stats: Some(SystemStats {
                cpu: 5.0,
                ram: 20.0,
                disk: 30.0,
                temp: 40.0,
            }),
            ..DashboardSnapshot::default()
        };
        let text = dashboard(&snapshot, false);
        assert!(text.starts_with("!! backend offline"));
        assert!(text.contains("CPU 5%"));
    }

    #[test]
    fn should_mention_empty_gameserver_list() {
        assert_eq!(gameserver_table(&[]), "no game servers installed\n");
    }

    #[test]
    fn should_mark_directories_in_listing() {
        let listing = DirectoryListing {
            path: "/home/pi".to_string(),
            items: vec![
                FileItem {
                    name: "docs".to_string(),
                    path: "/home/pi/docs".to_string(),
                    is_directory: true,
                    size: None,
                    modified: None,
                },
                FileItem {
                    name: "notes.txt".to_string(),
                    path: "/home/pi/notes.txt".to_string(),
                    is_directory: false,
                    size: Some(2048),
                    modified: None,
                },
            ],
        };
        let text = super::listing(&listing);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "/home/pi");
        assert!(lines[1].starts_with("d "));
        assert!(lines[1].ends_with("docs"));
        assert!(lines[2].contains("2.0 KB"));
    }

    #[test]
    fn should_draw_progress_bar() {
        let progress = InstallationProgress {
            phase: InstallPhase::Active,
            progress: 50,
            message: "Downloading".to_string(),
            ..InstallationProgress::default()
        };
        assert_eq!(
            progress_line(&progress),
            "[###############...............]  50% Downloading"
        );
    }

    #[test]
    fn should_print_only_new_console_lines() {
        assert_eq!(console_delta("a\nb\n", "a\nb\nc\n"), "c\n");
    }

    #[test]
    fn should_print_only_new_lines_of_rotated_tail() {
        assert_eq!(console_delta("a\nb\n", "b\nc\n"), "c\n");
    }

    #[test]
    fn should_follow_shifted_fifty_line_window() {
        let window = |from: usize| -> String {
            (from..from + 50).map(|n| format!("[Server] line {n}\n")).collect()
        };
        let shown = window(1);

        assert_eq!(console_delta(&shown, &window(2)), "[Server] line 51\n");
        assert_eq!(
            console_delta(&shown, &window(4)),
            "[Server] line 51\n[Server] line 52\n[Server] line 53\n"
        );
    }

    #[test]
    fn should_not_match_partial_lines() {
        assert_eq!(console_delta("xab\n", "ab\ncd\n"), "ab\ncd\n");
    }

    #[test]
    fn should_reprint_when_nothing_overlaps() {
        assert_eq!(console_delta("a\nb\n", "x\ny\n"), "x\ny\n");
    }

    #[test]
    fn should_count_only_problems_as_reported_errors() {
        let notifier = ConsoleNotifier::default();
        notifier.notify(Notification::success("done"));
        assert!(!notifier.reported_error());
        notifier.notify(Notification::warning("port missing"));
        assert!(notifier.reported_error());
    }

    #[test]
    fn should_prefix_error_lines() {
        let line = TerminalLine::new(LineKind::Error, "permission denied");
        assert_eq!(terminal_line(&line), "! permission denied");
    }
}
