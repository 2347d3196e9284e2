use std::collections::BTreeMap;
use std::sync::OnceLock;

pub struct ManPage {
    pub name: &'static str,
    pub summary: &'static str,
    pub synopsis: &'static str,
    pub description: &'static [&'static str],
}

const PAGES: &[ManPage] = &[
    ManPage {
        name: "cd",
        summary: "change the working directory",
        synopsis: "cd [DIRECTORY]",
        description: &[
            "Change the current directory to DIRECTORY.",
            "With no argument, '~' or '/', return to the home directory.",
            "'..' moves to the parent directory; at home it does nothing.",
        ],
    },
    ManPage {
        name: "clear",
        summary: "clear the terminal screen",
        synopsis: "clear",
        description: &["Clear the scrollback buffer."],
    },
    ManPage {
        name: "clear-history",
        summary: "forget all previously entered commands",
        synopsis: "clear-history",
        description: &["Erase the stored command history."],
    },
    ManPage {
        name: "echo",
        summary: "display a line of text",
        synopsis: "echo [STRING]...",
        description: &["Print the STRINGs separated by single spaces."],
    },
    ManPage {
        name: "exit",
        summary: "close the terminal",
        synopsis: "exit | quit",
        description: &["Close the terminal window. History is kept."],
    },
    ManPage {
        name: "help",
        summary: "list available commands",
        synopsis: "help",
        description: &["Print every command with a one-line description."],
    },
    ManPage {
        name: "history",
        summary: "show previously entered commands",
        synopsis: "history",
        description: &[
            "Print the stored command history as a numbered table.",
            "Entries longer than 50 characters are shortened.",
        ],
    },
    ManPage {
        name: "ls",
        summary: "list directory contents",
        synopsis: "ls [PATH]",
        description: &[
            "List the entries of PATH, or of the current directory.",
            "Directories are shown first with a trailing '/'.",
        ],
    },
    ManPage {
        name: "man",
        summary: "an interface to the system reference manuals",
        synopsis: "man COMMAND",
        description: &["Display the manual page for COMMAND."],
    },
    ManPage {
        name: "neofetch",
        summary: "show system information with an ASCII logo",
        synopsis: "neofetch",
        description: &["Print host, kernel, uptime, resolution and memory beside the logo."],
    },
    ManPage {
        name: "ps",
        summary: "report a snapshot of the current processes",
        synopsis: "ps",
        description: &["List running service processes and the shell."],
    },
    ManPage {
        name: "pwd",
        summary: "print name of current directory",
        synopsis: "pwd",
        description: &["Print the full path of the current directory."],
    },
    ManPage {
        name: "read",
        summary: "open a blog post or project",
        synopsis: "read FILE",
        description: &[
            "Open FILE from the current directory in its viewer.",
            "Files under blog/ open as posts, files under projects/ as projects.",
        ],
    },
    ManPage {
        name: "reload",
        summary: "reload the page",
        synopsis: "reload",
        description: &["Ask the host page to reload itself."],
    },
    ManPage {
        name: "status",
        summary: "show a system overview",
        synopsis: "status",
        description: &["Print uptime, service health, rescue mode state and location."],
    },
    ManPage {
        name: "systemctl",
        summary: "control the service manager",
        synopsis: "systemctl [status|list-units|start|stop|restart] [UNIT]",
        description: &[
            "status         show all units, or the detailed state of UNIT",
            "list-units     show all units",
            "start UNIT     activate UNIT",
            "stop UNIT      deactivate UNIT",
            "restart UNIT   stop then start UNIT",
            "",
            "Stopping NetworkManager drops the machine into rescue mode.",
            "Only 'systemctl start NetworkManager' is accepted until it is restored.",
        ],
    },
    ManPage {
        name: "top",
        summary: "display processes",
        synopsis: "top",
        description: &["Print a single snapshot of load, tasks and per-process usage."],
    },
    ManPage {
        name: "whoami",
        summary: "print information about the site owner",
        synopsis: "whoami",
        description: &["Print name, role, location and a short bio."],
    },
];

fn index() -> &'static BTreeMap<&'static str, &'static ManPage> {
    static INDEX: OnceLock<BTreeMap<&'static str, &'static ManPage>> = OnceLock::new();
    INDEX.get_or_init(|| PAGES.iter().map(|p| (p.name, p)).collect())
}

pub fn lookup(name: &str) -> Option<&'static ManPage> {
    let name = if name == "quit" { "exit" } else { name };
    index().get(name).copied()
}

/// Every page, ordered by name.
pub fn pages() -> impl Iterator<Item = &'static ManPage> {
    index().values().copied()
}

impl ManPage {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let title = self.name.to_uppercase();
        out.push_str(&format!(
            "{}(1)                User Commands                {}(1)\n\n",
            title, title
        ));
        out.push_str("NAME\n");
        out.push_str(&format!("       {} - {}\n\n", self.name, self.summary));
        out.push_str("SYNOPSIS\n");
        out.push_str(&format!("       {}\n\n", self.synopsis));
        out.push_str("DESCRIPTION\n");
        for line in self.description {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("       {}\n", line));
            }
        }
        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert!(lookup("systemctl").is_some());
        assert_eq!(lookup("quit").map(|p| p.name), Some("exit"));
        assert!(lookup("rm").is_none());
    }

    #[test]
    fn test_pages_unique_and_ordered() {
        let names: Vec<&str> = pages().map(|p| p.name).collect();
        assert_eq!(names.len(), PAGES.len());
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_render_sections() {
        let page = lookup("ls").unwrap().render();
        assert!(page.starts_with("LS(1)"));
        assert!(page.contains("NAME\n       ls - list directory contents"));
        assert!(page.contains("SYNOPSIS\n       ls [PATH]"));
        assert!(page.contains("DESCRIPTION"));
    }
}
