use crate::config::TerminalConfig;
use rand::Rng;

pub struct NeofetchLogo {
    pub lines: Vec<&'static str>,
    pub color: &'static str,
}

pub fn get_logo(rescue: bool) -> NeofetchLogo {
    if rescue {
        NeofetchLogo {
            lines: vec![
                "   _____________   ",
                "  /             \\  ",
                " |   X       X   | ",
                " |               | ",
                " |    _______    | ",
                " |   /       \\   | ",
                "  \\_____________/  ",
                "   NO CARRIER      ",
            ],
            color: "#ff2a6d",
        }
    } else {
        NeofetchLogo {
            lines: vec![
                "      .--------.      ",
                "    .'  ______  '.    ",
                "   /  .'      '.  \\   ",
                "  |  /  .----.  \\  |  ",
                "  | |  | () |   | |   ",
                "  |  \\  '----'  /  |  ",
                "   \\  '.______.'  /   ",
                "    '.   CYBER  .'    ",
                "      '--DECK--'      ",
            ],
            color: "#05d9e8",
        }
    }
}

pub struct HostInfo {
    pub screen: (u32, u32),
    pub uptime_ms: f64,
    pub rescue: bool,
}

pub fn format_uptime(ms: f64) -> String {
    let total = (ms.max(0.0) / 1000.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{} hours, {} mins", h, m)
    } else if m > 0 {
        format!("{} mins, {} secs", m, s)
    } else {
        format!("{} secs", s)
    }
}

pub fn format_neofetch(config: &TerminalConfig, host: &HostInfo, rng: &mut impl Rng) -> String {
    let logo = get_logo(host.rescue);
    let mut output = String::new();

    let title = format!("{}@{}", config.user, config.hostname);
    let used_mem: u32 = rng.random_range(2048..9216);
    let packages: u32 = rng.random_range(1200..1900);
    let info_lines = [
        title.clone(),
        "─".repeat(title.chars().count()),
        format!("OS: {}", config.os_name),
        "Host: Portfolio Mainframe".to_string(),
        format!("Kernel: {}", config.kernel),
        format!("Uptime: {}", format_uptime(host.uptime_ms)),
        format!("Packages: {} (cargo)", packages),
        "Shell: deck-sh".to_string(),
        format!("Resolution: {}x{}", host.screen.0, host.screen.1),
        "Terminal: web-tty".to_string(),
        "CPU: Arasaka NeuroCore X9 (16) @ 4.20GHz".to_string(),
        format!("Memory: {}MiB / 16384MiB", used_mem),
        "Theme: Neon Noir".to_string(),
    ];

    let max_logo_width = logo.lines.iter().map(|l| l.len()).max().unwrap_or(0);

    for i in 0..logo.lines.len().max(info_lines.len()) {
        let logo_line = logo.lines.get(i).copied().unwrap_or("");
        let info_line = info_lines.get(i).map(|s| s.as_str()).unwrap_or("");
        let padding = " ".repeat(max_logo_width - strip_color_tokens(logo_line).len() + 3);
        output.push_str(&format!(
            "\x1b[COLOR:{}]{}{}{}\n",
            logo.color, logo_line, padding, info_line
        ));
    }

    output
}

// Helper to measure visible length ignoring our color tokens.
fn strip_color_tokens(s: &str) -> String {
    let mut out = String::new();
    let mut rest = s;
    while let Some(start) = rest.find("\x1b[COLOR:") {
        out.push_str(&rest[..start]);
        match rest[start..].find(']') {
            Some(end) => rest = &rest[start + end + 1..],
            None => {
                rest = &rest[start..];
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
