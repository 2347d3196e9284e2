use crate::commands::{info, nav, systemctl, viewer, Capabilities};
use crate::config::TerminalConfig;
use crate::content::SiteContent;
use crate::history::CommandHistory;
use crate::manual;
use crate::neofetch::{format_neofetch, HostInfo};
use crate::rescue::{RescueMode, RescueState};
use crate::services::{ServiceManager, NETWORK_MANAGER};
use crate::shell::{self, ProgramRegistry};
use crate::storage::{self, Storage, TERMINAL_OPEN_KEY};
use crate::vfs::Vfs;
use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Text(String),
    Clear,
    Exit,
    Reload,
}

impl Output {
    /// Encodes for the page script: plain text, or one of the control sentinels.
    pub fn into_wire(self) -> String {
        match self {
            Output::Text(s) => s,
            Output::Clear => "\x1b[CLEAR]".into(),
            Output::Exit => "\x1b[EXIT]".into(),
            Output::Reload => "\x1b[RELOAD]".into(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Output::Text(s) => s,
            _ => "",
        }
    }
}

impl From<String> for Output {
    fn from(s: String) -> Self {
        Output::Text(s)
    }
}

pub struct Terminal {
    config: TerminalConfig,
    content: SiteContent,
    vfs: Vfs,
    cwd: Vec<String>,
    services: ServiceManager,
    rescue: RescueState,
    history: CommandHistory,
    registry: ProgramRegistry,
    caps: Capabilities,
    storage: Box<dyn Storage>,
    rng: SmallRng,
    loaded_at_ms: f64,
    screen: (u32, u32),
    open: bool,
}

impl Terminal {
    pub fn new(
        config: TerminalConfig,
        content: SiteContent,
        mut storage: Box<dyn Storage>,
        now_ms: f64,
    ) -> Self {
        let rescue = RescueState::restore(storage.as_mut(), now_ms);
        let mut services = ServiceManager::new(now_ms);
        if let Some(since_ms) = rescue.started_at() {
            let _ = services.stop(NETWORK_MANAGER, since_ms);
        }
        let history = CommandHistory::restore(storage.as_ref());
        let open = storage::load(storage.as_ref(), TERMINAL_OPEN_KEY).unwrap_or(false);
        let seed = config.seed.unwrap_or(now_ms as u64);

        Terminal {
            vfs: Vfs::new(&content),
            config,
            content,
            cwd: Vec::new(),
            services,
            rescue,
            history,
            registry: ProgramRegistry::new(),
            caps: Capabilities::default(),
            storage,
            rng: SmallRng::seed_from_u64(seed),
            loaded_at_ms: now_ms,
            screen: (1920, 1080),
            open,
        }
    }

    pub fn exec(&mut self, line: &str, now_ms: f64) -> Output {
        self.history.reset_cursor();
        let trimmed = line.trim();
        let Some(cmd) = shell::parse(trimmed) else {
            return Output::Text(String::new());
        };
        debug!("exec: {} {:?}", cmd.verb, cmd.args);

        let out = self.dispatch(cmd.verb, &cmd.args, now_ms);
        if cmd.verb != "clear-history" {
            self.history.push(trimmed, self.storage.as_mut());
        }
        out
    }

    fn dispatch(&mut self, verb: &str, args: &[&str], now_ms: f64) -> Output {
        let uptime_ms = now_ms - self.loaded_at_ms;
        if let Some(name) = verb.strip_prefix("./") {
            return viewer::launch(name, &self.content, &self.cwd, &mut self.caps).into();
        }
        let text = match verb {
            "ls" => nav::ls(&self.vfs, &self.cwd, args),
            "cd" => nav::cd(&self.vfs, &mut self.cwd, args),
            "pwd" => nav::pwd(&self.cwd),
            "read" => viewer::read(&self.vfs, &self.content, &self.cwd, args, &mut self.caps),
            "systemctl" => systemctl::run(
                args,
                &mut self.services,
                &mut self.rescue,
                self.storage.as_mut(),
                &mut self.rng,
                now_ms,
            ),
            "ps" => info::ps(&self.services, uptime_ms),
            "top" => info::top(&self.services, uptime_ms, &mut self.rng),
            "man" => info::man(args),
            "whoami" => info::whoami(&self.config.profile),
            "status" => info::status(
                &self.services,
                self.rescue.mode(),
                &self.cwd,
                uptime_ms,
                now_ms,
            ),
            "neofetch" => {
                let host = HostInfo {
                    screen: self.screen,
                    uptime_ms,
                    rescue: self.rescue.is_active(),
                };
                format_neofetch(&self.config, &host, &mut self.rng)
            }
            "history" => self.history.render(),
            "clear-history" => {
                self.history.clear(self.storage.as_mut());
                "Command history cleared".into()
            }
            "help" => self.registry.help(),
            "echo" => args.join(" "),
            "clear" => return Output::Clear,
            "reload" => return Output::Reload,
            "exit" | "quit" => {
                self.set_open(false);
                return Output::Exit;
            }
            _ => format!(
                "command not found: {}. Type 'help' for available commands.",
                verb
            ),
        };
        Output::Text(text)
    }

    pub fn prompt(&self) -> String {
        shell::prompt(&self.config, &self.cwd, self.rescue.is_active())
    }

    /// Candidates for the last word of `partial`: verbs for the first word,
    /// page names after `man`, entries of the current directory otherwise.
    pub fn complete(&self, partial: &str) -> Vec<String> {
        let ends_with_space = partial.ends_with(char::is_whitespace);
        let words: Vec<&str> = partial.split_whitespace().collect();
        let last = if ends_with_space {
            ""
        } else {
            words.last().copied().unwrap_or("")
        };
        let completing_verb = words.len() <= 1 && !ends_with_space;

        let mut matches: Vec<String> = Vec::new();
        if completing_verb {
            if let Some(prefix) = last.strip_prefix("./") {
                if self.cwd.len() == 1 && self.cwd[0] == "projects" {
                    matches.extend(
                        self.content
                            .projects
                            .iter()
                            .filter(|p| p.id.starts_with(prefix))
                            .map(|p| format!("./{}", p.id)),
                    );
                }
            } else {
                matches.extend(
                    self.registry
                        .names()
                        .filter(|n| n.starts_with(last))
                        .map(String::from),
                );
            }
        } else if words.first() == Some(&"man") {
            matches.extend(
                manual::pages()
                    .map(|p| p.name)
                    .filter(|n| n.starts_with(last))
                    .map(String::from),
            );
        } else if let Some(children) = self.vfs.node_at(&self.cwd).and_then(|n| n.children()) {
            matches.extend(
                children
                    .iter()
                    .filter(|(name, _)| name.starts_with(last))
                    .map(|(name, node)| {
                        if node.is_dir() {
                            format!("{}/", name)
                        } else {
                            name.clone()
                        }
                    }),
            );
        }
        matches.sort();
        matches
    }

    pub fn history_prev(&mut self) -> Option<String> {
        self.history.prev().map(String::from)
    }

    pub fn history_next(&mut self) -> Option<String> {
        self.history.next().map(String::from)
    }

    pub fn rescue_mode(&self) -> RescueMode {
        self.rescue.mode()
    }

    pub fn subscribe_rescue(&mut self, listener: impl FnMut(RescueMode) + 'static) {
        self.rescue.subscribe(listener);
    }

    pub fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.caps
    }

    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.screen = (width, height);
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
        storage::save(self.storage.as_mut(), TERMINAL_OPEN_KEY, &open);
    }

    pub fn cwd(&self) -> &[String] {
        &self.cwd
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn services(&self) -> &ServiceManager {
        &self.services
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::systemctl::RESCUE_REFUSAL;
    use crate::services::ServiceStatus;
    use crate::storage::{MemoryStorage, HISTORY_KEY, RESCUE_MODE_KEY};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn term() -> Terminal {
        term_with(MemoryStorage::new())
    }

    fn term_with(storage: MemoryStorage) -> Terminal {
        let config = TerminalConfig {
            seed: Some(11),
            ..TerminalConfig::default()
        };
        Terminal::new(config, SiteContent::sample(), Box::new(storage), 0.0)
    }

    fn run(t: &mut Terminal, line: &str) -> String {
        t.exec(line, 1_000.0).text().to_string()
    }

    #[test]
    fn test_unknown_verb() {
        let mut t = term();
        run(&mut t, "cd blog");
        let out = run(&mut t, "hack");
        assert_eq!(out, "command not found: hack. Type 'help' for available commands.");
        assert_eq!(t.cwd(), ["blog".to_string()]);
        assert_eq!(t.rescue_mode(), RescueMode::Normal);
    }

    #[test]
    fn test_empty_line_not_recorded() {
        let mut t = term();
        assert_eq!(t.exec("   ", 0.0), Output::Text(String::new()));
        assert!(t.history().is_empty());
    }

    #[test]
    fn test_cd_dotdot_at_root() {
        let mut t = term();
        assert_eq!(run(&mut t, "cd .."), "");
        assert!(t.cwd().is_empty());
        assert_eq!(run(&mut t, "pwd"), "/home/guest");
    }

    #[test]
    fn test_ls_root_children() {
        let mut t = term();
        let out = run(&mut t, "ls");
        let entries: Vec<&str> = out.split("  ").collect();
        assert_eq!(entries.len(), 4);
        assert!(entries[0].contains("blog/"));
        assert!(entries[1].contains("projects/"));
        assert_eq!(&entries[2..], ["about.txt", "contact.txt"]);
    }

    #[test]
    fn test_control_outputs() {
        let mut t = term();
        t.set_open(true);
        assert_eq!(t.exec("clear", 0.0), Output::Clear);
        assert_eq!(t.exec("reload", 0.0), Output::Reload);
        assert_eq!(t.exec("quit", 0.0), Output::Exit);
        assert!(!t.is_open());
        assert_eq!(Output::Exit.into_wire(), "\x1b[EXIT]");
        assert_eq!(Output::Clear.into_wire(), "\x1b[CLEAR]");
    }

    #[test]
    fn test_rescue_blocks_other_units() {
        let mut t = term();
        run(&mut t, "systemctl stop NetworkManager");
        assert_eq!(run(&mut t, "systemctl start sshd"), RESCUE_REFUSAL);
        assert_eq!(
            t.services().status(NETWORK_MANAGER),
            Some(ServiceStatus::Inactive)
        );
        // non-systemctl commands are unaffected
        assert_eq!(run(&mut t, "pwd"), "/home/guest");
        assert!(t.prompt().starts_with("root@cyberdeck(rescue)"));
    }

    #[test]
    fn test_rescue_round_trip() {
        let mut t = term();
        run(&mut t, "systemctl stop NetworkManager");
        assert!(matches!(t.rescue_mode(), RescueMode::Rescue { .. }));
        run(&mut t, "systemctl start NetworkManager");
        assert_eq!(t.rescue_mode(), RescueMode::Normal);
        assert_eq!(run(&mut t, "systemctl stop sshd"), "[  OK  ] Stopped OpenSSH server daemon.");
    }

    #[test]
    fn test_rescue_survives_reload() {
        let mut storage = MemoryStorage::new();
        storage::save(&mut storage, RESCUE_MODE_KEY, &true);
        let t = term_with(storage);
        assert!(matches!(t.rescue_mode(), RescueMode::Rescue { .. }));
        assert_eq!(
            t.services().status(NETWORK_MANAGER),
            Some(ServiceStatus::Inactive)
        );
    }

    #[test]
    fn test_rescue_flag_without_start_time() {
        let loaded_at = 1.76e12;
        let mut storage = MemoryStorage::new();
        storage::save(&mut storage, RESCUE_MODE_KEY, &true);
        let config = TerminalConfig {
            seed: Some(11),
            ..TerminalConfig::default()
        };
        let mut t = Terminal::new(config, SiteContent::sample(), Box::new(storage), loaded_at);

        let status = t.exec("status", loaded_at + 90_000.0);
        assert!(status
            .text()
            .contains("Network:   OFFLINE (rescue mode for 1 mins, 30 secs)"));
        let restored = t.exec("systemctl start NetworkManager", loaded_at + 125_000.0);
        assert!(restored
            .text()
            .contains("Uplink restored after 2 mins, 5 secs."));
    }

    #[test]
    fn test_open_flag_survives_restart() {
        let mut t = term();
        assert!(!t.is_open());
        t.set_open(true);
        let raw = t.storage.get(TERMINAL_OPEN_KEY).unwrap().unwrap();
        let mut storage = MemoryStorage::new();
        storage.set(TERMINAL_OPEN_KEY, &raw).unwrap();
        assert!(term_with(storage).is_open());

        t.exec("exit", 0.0);
        let raw = t.storage.get(TERMINAL_OPEN_KEY).unwrap().unwrap();
        let mut storage = MemoryStorage::new();
        storage.set(TERMINAL_OPEN_KEY, &raw).unwrap();
        assert!(!term_with(storage).is_open());
    }

    #[test]
    fn test_rescue_subscriber_notified() {
        let mut t = term();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        t.subscribe_rescue(move |mode| sink.borrow_mut().push(mode));
        run(&mut t, "systemctl stop NetworkManager");
        run(&mut t, "systemctl start NetworkManager");
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1], RescueMode::Normal);
    }

    #[test]
    fn test_history_three_commands() {
        let mut t = term();
        for line in ["ls", "cd blog", "whoami"] {
            run(&mut t, line);
        }
        let out = run(&mut t, "history");
        let rows: Vec<&str> = out
            .lines()
            .filter(|l| l.starts_with('|') && !l.contains("COMMAND"))
            .collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("1 | ls"));
        assert!(rows[1].contains("2 | cd blog"));
        assert!(rows[2].contains("3 | whoami"));

        assert_eq!(run(&mut t, "clear-history"), "Command history cleared");
        assert_eq!(run(&mut t, "history"), "No commands in history");
    }

    #[test]
    fn test_history_persisted() {
        let mut t = term();
        run(&mut t, "ls");
        run(&mut t, "pwd");
        let restored = CommandHistory::restore(t.storage.as_ref());
        assert_eq!(restored.entries(), ["ls".to_string(), "pwd".to_string()]);
        assert_eq!(t.history_prev().as_deref(), Some("pwd"));
        assert!(storage::load::<Vec<String>>(t.storage.as_ref(), HISTORY_KEY).is_some());
    }

    #[test]
    fn test_read_project_without_viewer() {
        let mut t = term();
        run(&mut t, "cd projects");
        assert_eq!(
            run(&mut t, "read demo-project"),
            "Error: Project viewer not available"
        );
    }

    #[test]
    fn test_demo_launch_outside_projects() {
        let mut t = term();
        assert_eq!(
            run(&mut t, "./demo-project"),
            "./demo-project: execution only supported in /projects"
        );
        run(&mut t, "cd blog");
        assert_eq!(
            run(&mut t, "./demo-project"),
            "./demo-project: execution only supported in /projects"
        );
    }

    #[test]
    fn test_demo_launch_opens_url() {
        let mut t = term();
        let opened = Rc::new(RefCell::new(Vec::new()));
        let sink = opened.clone();
        t.capabilities_mut().open_url = Some(Box::new(move |url: &str| {
            sink.borrow_mut().push(url.to_string())
        }));
        run(&mut t, "cd ~/projects");
        assert_eq!(run(&mut t, "./demo-project"), "Launching Demo Project demo...");
        assert_eq!(*opened.borrow(), vec!["https://example.com/demo".to_string()]);
    }

    #[test]
    fn test_complete() {
        let mut t = term();
        assert_eq!(t.complete("sys"), vec!["systemctl".to_string()]);
        assert_eq!(t.complete("cd pr"), vec!["projects/".to_string()]);
        assert_eq!(t.complete("ls ").len(), 4);
        assert_eq!(t.complete("man sy"), vec!["systemctl".to_string()]);
        run(&mut t, "cd projects");
        assert_eq!(t.complete("./d"), vec!["./demo-project".to_string()]);
    }

    #[test]
    fn test_storage_failure_is_not_fatal() {
        let mut t = term_with(MemoryStorage::unavailable());
        run(&mut t, "ls");
        run(&mut t, "systemctl stop NetworkManager");
        assert!(matches!(t.rescue_mode(), RescueMode::Rescue { .. }));
        assert_eq!(t.history(), ["ls".to_string(), "systemctl stop NetworkManager".to_string()]);
    }

    #[test]
    fn test_neofetch_and_status() {
        let mut t = term();
        t.set_screen_size(800, 600);
        assert!(run(&mut t, "neofetch").contains("Resolution: 800x600"));
        assert!(run(&mut t, "status").contains("Network:   ONLINE"));
        assert!(run(&mut t, "whoami").starts_with("Netrunner"));
        assert_eq!(run(&mut t, "echo hello   there"), "hello there");
    }
}
