use crate::config::Profile;
use crate::manual;
use crate::neofetch::format_uptime;
use crate::rescue::RescueMode;
use crate::services::{ServiceManager, ServiceStatus, SHELL_PID};
use crate::vfs::absolute_path;
use rand::Rng;

pub fn man(args: &[&str]) -> String {
    match args.first() {
        None => "What manual page do you want?\nFor example, try 'man man'.".into(),
        Some(name) => match manual::lookup(name) {
            Some(page) => page.render(),
            None => format!("No manual entry for {}", name),
        },
    }
}

pub fn whoami(profile: &Profile) -> String {
    let mut out = vec![
        profile.name.clone(),
        format!("{} // {}", profile.role, profile.location),
        String::new(),
    ];
    out.extend(profile.bio.iter().cloned());
    if !profile.links.is_empty() {
        out.push(String::new());
        out.extend(profile.links.iter().map(|l| format!("-> {}", l)));
    }
    out.join("\n")
}

pub fn status(
    services: &ServiceManager,
    rescue: RescueMode,
    cwd: &[String],
    uptime_ms: f64,
    now_ms: f64,
) -> String {
    let total = services.iter().count();
    let network = match rescue {
        RescueMode::Normal => "ONLINE".to_string(),
        RescueMode::Rescue { since_ms } => format!(
            "OFFLINE (rescue mode for {})",
            format_uptime(now_ms - since_ms)
        ),
    };
    [
        "SYSTEM STATUS".to_string(),
        "─────────────".to_string(),
        format!("  Uptime:    {}", format_uptime(uptime_ms)),
        format!("  Services:  {}/{} active", services.active_count(), total),
        format!("  Network:   {}", network),
        format!("  Location:  {}", absolute_path(cwd)),
    ]
    .join("\n")
}

struct ProcRow {
    pid: u32,
    tty: &'static str,
    cpu_secs: u64,
    cmd: String,
}

fn processes(services: &ServiceManager, uptime_ms: f64, current: &str) -> Vec<ProcRow> {
    let uptime_secs = (uptime_ms.max(0.0) / 1000.0) as u64;
    let mut rows = vec![ProcRow {
        pid: 1,
        tty: "?",
        cpu_secs: uptime_secs / 60,
        cmd: "systemd".into(),
    }];
    rows.extend(
        services
            .iter()
            .filter(|s| s.status == ServiceStatus::Active)
            .filter_map(|s| {
                s.pid.map(|pid| ProcRow {
                    pid,
                    tty: "?",
                    cpu_secs: uptime_secs / (20 + s.name.len() as u64),
                    cmd: s.name.clone(),
                })
            }),
    );
    rows.push(ProcRow {
        pid: SHELL_PID,
        tty: "pts/0",
        cpu_secs: 0,
        cmd: "deck-sh".into(),
    });
    rows.push(ProcRow {
        pid: SHELL_PID + 1,
        tty: "pts/0",
        cpu_secs: 0,
        cmd: current.into(),
    });
    rows.sort_by_key(|r| r.pid);
    rows
}

pub fn ps(services: &ServiceManager, uptime_ms: f64) -> String {
    let mut out = String::from("  PID TTY          TIME CMD\n");
    for p in processes(services, uptime_ms, "ps") {
        out.push_str(&format!(
            "{:5} {:<8} {:02}:{:02}:{:02} {}\n",
            p.pid,
            p.tty,
            p.cpu_secs / 3600,
            (p.cpu_secs % 3600) / 60,
            p.cpu_secs % 60,
            p.cmd
        ));
    }
    out.trim_end().to_string()
}

pub fn top(services: &ServiceManager, uptime_ms: f64, rng: &mut impl Rng) -> String {
    let procs = processes(services, uptime_ms, "top");
    let load: [f64; 3] = [
        rng.random_range(0.05..1.5),
        rng.random_range(0.05..1.2),
        rng.random_range(0.05..1.0),
    ];
    let mut out = vec![
        format!(
            "top - up {},  1 user,  load average: {:.2}, {:.2}, {:.2}",
            format_uptime(uptime_ms),
            load[0],
            load[1],
            load[2]
        ),
        format!(
            "Tasks: {} total,   1 running, {} sleeping,   0 stopped,   0 zombie",
            procs.len(),
            procs.len() - 1
        ),
        format!(
            "MiB Mem :  16384.0 total, {:>8.1} free",
            rng.random_range(4096.0..12288.0)
        ),
        String::new(),
        "  PID USER      %CPU %MEM COMMAND".to_string(),
    ];
    for p in &procs {
        let user = if p.tty == "?" { "root" } else { "guest" };
        let cpu: f64 = rng.random_range(0.0..12.5);
        let mem: f64 = rng.random_range(0.1..4.0);
        out.push(format!(
            "{:5} {:<8} {:5.1} {:4.1} {}",
            p.pid, user, cpu, mem, p.cmd
        ));
    }
    out.join("\n")
}
