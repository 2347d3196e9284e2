use crate::config::TerminalConfig;
use crate::vfs::display_path;
use std::collections::BTreeMap;

pub struct ProgramRegistry {
    progs: BTreeMap<&'static str, &'static str>,
}
impl Default for ProgramRegistry {
    fn default() -> Self {
        Self::new()
    }
}
impl ProgramRegistry {
    pub fn new() -> Self {
        let mut r = ProgramRegistry {
            progs: BTreeMap::new(),
        };
        for (name, about) in [
            ("cd", "change directory"),
            ("clear", "clear the screen"),
            ("clear-history", "erase command history"),
            ("echo", "print arguments"),
            ("exit", "close the terminal"),
            ("help", "show this list"),
            ("history", "show command history"),
            ("ls", "list directory contents"),
            ("man", "show the manual for a command"),
            ("neofetch", "show system information"),
            ("ps", "list processes"),
            ("pwd", "print working directory"),
            ("quit", "close the terminal"),
            ("read", "open a blog post or project"),
            ("reload", "reload the page"),
            ("status", "show system status"),
            ("systemctl", "control services"),
            ("top", "show process usage"),
            ("whoami", "about the site owner"),
        ] {
            r.progs.insert(name, about);
        }
        r
    }
    pub fn has(&self, name: &str) -> bool {
        self.progs.contains_key(name)
    }
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.progs.keys().copied()
    }
    pub fn help(&self) -> String {
        let mut out = String::from("Available commands:\n");
        for (name, about) in &self.progs {
            out.push_str(&format!("  {:<15} {}\n", name, about));
        }
        out.push_str("  ./<project>     launch a project demo (in ~/projects)\n");
        out.push_str("\nType 'man <command>' for details.");
        out
    }
}

/// A tokenised input line. Quotes are not interpreted.
#[derive(Debug, PartialEq)]
pub struct CommandLine<'a> {
    pub verb: &'a str,
    pub args: Vec<&'a str>,
}

pub fn parse(line: &str) -> Option<CommandLine<'_>> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;
    Some(CommandLine {
        verb,
        args: parts.collect(),
    })
}

pub fn prompt(config: &TerminalConfig, cwd: &[String], rescue: bool) -> String {
    if rescue {
        format!("root@{}(rescue):{}# ", config.hostname, display_path(cwd))
    } else {
        format!("{}@{}:{}$ ", config.user, config.hostname, display_path(cwd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(parse("   "), None);
        let cmd = parse("  systemctl   stop  NetworkManager ").unwrap();
        assert_eq!(cmd.verb, "systemctl");
        assert_eq!(cmd.args, vec!["stop", "NetworkManager"]);
        assert_eq!(parse("ls").unwrap().args.len(), 0);
    }

    #[test]
    fn test_prompt() {
        let config = TerminalConfig::default();
        assert_eq!(prompt(&config, &[], false), "guest@cyberdeck:~$ ");
        assert_eq!(
            prompt(&config, &["blog".to_string()], true),
            "root@cyberdeck(rescue):~/blog# "
        );
    }

    #[test]
    fn test_registry() {
        let registry = ProgramRegistry::new();
        assert!(registry.has("systemctl"));
        assert!(!registry.has("rm"));
        assert!(registry.help().contains("systemctl"));
    }
}
