use crate::error::ServiceError;
use crate::neofetch::format_uptime;
use crate::rescue::RescueState;
use crate::services::{Service, ServiceManager, ServiceStatus, NETWORK_MANAGER};
use crate::storage::Storage;
use log::info;
use rand::Rng;

pub const RESCUE_REFUSAL: &str = "systemctl: action not permitted during rescue mode. \
Restore network connectivity first: systemctl start NetworkManager";

const USAGE: &str = "Usage: systemctl [status|list-units|start|stop|restart] [UNIT]";

pub fn run(
    args: &[&str],
    services: &mut ServiceManager,
    rescue: &mut RescueState,
    storage: &mut dyn Storage,
    rng: &mut impl Rng,
    now_ms: f64,
) -> String {
    let action = args.first().copied().unwrap_or("");
    let unit = args.get(1).map(|u| u.trim_end_matches(".service"));

    if rescue.is_active() && !(action == "start" && unit == Some(NETWORK_MANAGER)) {
        return RESCUE_REFUSAL.into();
    }

    match (action, unit) {
        ("", _) => USAGE.into(),
        ("status", None) | ("list-units", _) => unit_table(services),
        ("status", Some(name)) => match services.get(name) {
            Ok(service) => status_report(service, rng, now_ms),
            Err(e) => format!("Unit could not be found. ({})", e),
        },
        ("start" | "stop" | "restart", None) => {
            format!("systemctl: missing argument: {} requires a unit name\n{}", action, USAGE)
        }
        ("start", Some(NETWORK_MANAGER)) if rescue.is_active() => {
            match services.start(NETWORK_MANAGER, now_ms) {
                Ok(()) | Err(ServiceError::AlreadyActive(_)) => {}
                Err(e) => return failed("start", NETWORK_MANAGER, e),
            }
            let since = rescue.leave(storage).unwrap_or(now_ms);
            recovery_banner(now_ms - since)
        }
        ("stop", Some(NETWORK_MANAGER)) => match services.stop(NETWORK_MANAGER, now_ms) {
            Ok(()) => {
                rescue.enter(now_ms, storage);
                failure_banner()
            }
            Err(e) => failed("stop", NETWORK_MANAGER, e),
        },
        ("start", Some(name)) => match services.start(name, now_ms) {
            Ok(()) => {
                info!("systemctl: started {}", name);
                format!("[  OK  ] Started {}.", description(services, name))
            }
            Err(e) => failed("start", name, e),
        },
        ("stop", Some(name)) => match services.stop(name, now_ms) {
            Ok(()) => {
                info!("systemctl: stopped {}", name);
                format!("[  OK  ] Stopped {}.", description(services, name))
            }
            Err(e) => failed("stop", name, e),
        },
        ("restart", Some(name)) => match services.restart(name, now_ms) {
            Ok(()) => format!("[  OK  ] Restarted {}.", description(services, name)),
            Err(e) => failed("restart", name, e),
        },
        (other, _) => format!("systemctl: unknown command '{}'\n{}", other, USAGE),
    }
}

fn description(services: &ServiceManager, name: &str) -> String {
    services
        .get(name)
        .map(|s| s.description.clone())
        .unwrap_or_else(|_| name.into())
}

fn failed(action: &str, name: &str, e: ServiceError) -> String {
    match e {
        ServiceError::NotFound(_) => format!("Failed to {} {}.service: {}", action, name, e),
        _ => e.to_string(),
    }
}

fn unit_table(services: &ServiceManager) -> String {
    let rows: Vec<[String; 4]> = services
        .iter()
        .map(|s| {
            [
                format!("{}.service", s.name),
                s.status.as_str().to_string(),
                s.pid.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                s.description.clone(),
            ]
        })
        .collect();
    let headers = ["UNIT", "STATE", "PID", "DESCRIPTION"];
    let mut widths = headers.map(|h| h.len());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let line = |cells: [&str; 4]| {
        let inner: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!(" {:<w$} ", c, w = *w))
            .collect();
        format!("|{}|", inner.join("|"))
    };

    let mut out = vec![border.clone(), line(headers), border.clone()];
    for row in &rows {
        out.push(line([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ]));
    }
    out.push(border);
    out.push(format!(
        "{} units listed, {} active.",
        rows.len(),
        services.active_count()
    ));
    out.join("\n")
}

fn status_report(service: &Service, rng: &mut impl Rng, now_ms: f64) -> String {
    let ago = format_uptime(now_ms - service.since_ms);
    let mut out = vec![
        format!("● {}.service - {}", service.name, service.description),
        format!(
            "     Loaded: loaded (/lib/systemd/system/{}.service; enabled; vendor preset: enabled)",
            service.name
        ),
    ];
    match (service.status, service.pid) {
        (ServiceStatus::Active, Some(pid)) => {
            let memory: f64 = rng.random_range(2.0..256.0);
            let cpu_ms: u32 = rng.random_range(40..90_000);
            out.push(format!("     Active: active (running) since {} ago", ago));
            out.push(format!("   Main PID: {} ({})", pid, service.name));
            out.push(format!("     Memory: {:.1}M", memory));
            out.push(format!("        CPU: {}.{:03}s", cpu_ms / 1000, cpu_ms % 1000));
        }
        _ => {
            out.push(format!("     Active: inactive (dead) since {} ago", ago));
            out.push("     Memory: 0B".into());
            out.push("        CPU: 0ms".into());
        }
    }
    out.join("\n")
}

fn failure_banner() -> String {
    [
        "[  OK  ] Stopped Network Manager.",
        "[FAILED] Lost carrier on eth0.",
        "[FAILED] Dependency failed for Network is Online.",
        "",
        "\x1b[COLOR:#ff2a6d]██████████████████████████████████████████",
        "        *** SYSTEM FAILURE ***",
        "  Network subsystem offline. Uplink severed.",
        "  Entering rescue mode...",
        "██████████████████████████████████████████\x1b[COLOR:reset]",
        "",
        "Only 'systemctl start NetworkManager' will be accepted.",
    ]
    .join("\n")
}

fn recovery_banner(downtime_ms: f64) -> String {
    [
        "[  OK  ] Started Network Manager.".to_string(),
        "[  OK  ] Reached target Network is Online.".to_string(),
        String::new(),
        "\x1b[COLOR:#05d9e8]*** SYSTEM RECOVERED ***".to_string(),
        format!("  Uplink restored after {}.", format_uptime(downtime_ms)),
        "  Leaving rescue mode.\x1b[COLOR:reset]".to_string(),
    ]
    .join("\n")
}
