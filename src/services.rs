use crate::error::ServiceError;
use std::collections::BTreeMap;

pub const NETWORK_MANAGER: &str = "NetworkManager";

const FIRST_PID: u32 = 312;
/// Reserved for the login shell and its foreground command; service pids stay below.
pub const SHELL_PID: u32 = 1337;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Active,
    Inactive,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Active => "active",
            ServiceStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    pub description: String,
    pub status: ServiceStatus,
    /// When the service last changed status, in ms since the epoch.
    pub since_ms: f64,
    pub pid: Option<u32>,
}

impl Service {
    fn new(name: &str, description: &str) -> Self {
        Service {
            name: name.into(),
            description: description.into(),
            status: ServiceStatus::Inactive,
            since_ms: 0.0,
            pid: None,
        }
    }

    fn start(&mut self, pid: u32, now_ms: f64) -> bool {
        if self.status == ServiceStatus::Active {
            return false;
        }
        self.status = ServiceStatus::Active;
        self.pid = Some(pid);
        self.since_ms = now_ms;
        true
    }

    fn stop(&mut self, now_ms: f64) -> bool {
        if self.status == ServiceStatus::Inactive {
            return false;
        }
        self.status = ServiceStatus::Inactive;
        self.pid = None;
        self.since_ms = now_ms;
        true
    }
}

pub struct ServiceManager {
    services: BTreeMap<String, Service>,
    next_pid: u32,
}

impl ServiceManager {
    /// Registers the fixed service set, all active as of `boot_ms`.
    pub fn new(boot_ms: f64) -> Self {
        let mut manager = ServiceManager {
            services: BTreeMap::new(),
            next_pid: FIRST_PID,
        };

        manager.register(NETWORK_MANAGER, "Network Manager");
        manager.register("sshd", "OpenSSH server daemon");
        manager.register("nginx", "A high performance web server and a reverse proxy server");
        manager.register("neural-link", "Neural interface bridge");
        manager.register("ice-daemon", "Intrusion Countermeasures Electronics");
        manager.register("cron", "Regular background program processing daemon");

        let names: Vec<String> = manager.services.keys().cloned().collect();
        for name in names {
            let _ = manager.start(&name, boot_ms);
        }
        manager
    }

    fn register(&mut self, name: &str, description: &str) {
        self.services.insert(name.into(), Service::new(name, description));
    }

    pub fn get(&self, name: &str) -> Result<&Service, ServiceError> {
        self.services
            .get(name)
            .ok_or_else(|| ServiceError::NotFound(name.into()))
    }

    pub fn start(&mut self, name: &str, now_ms: f64) -> Result<(), ServiceError> {
        match self.status(name) {
            None => return Err(ServiceError::NotFound(name.into())),
            Some(ServiceStatus::Active) => return Err(ServiceError::AlreadyActive(name.into())),
            Some(ServiceStatus::Inactive) => {}
        }
        let pid = self.allocate_pid();
        let service = self
            .services
            .get_mut(name)
            .ok_or_else(|| ServiceError::NotFound(name.into()))?;
        service.start(pid, now_ms);
        Ok(())
    }

    /// Next free pid in `FIRST_PID..SHELL_PID`, wrapping around.
    fn allocate_pid(&mut self) -> u32 {
        loop {
            let pid = self.next_pid;
            self.next_pid += 1 + pid % 7;
            if self.next_pid >= SHELL_PID {
                self.next_pid = FIRST_PID + self.next_pid % 7;
            }
            if self.services.values().all(|s| s.pid != Some(pid)) {
                return pid;
            }
        }
    }

    pub fn stop(&mut self, name: &str, now_ms: f64) -> Result<(), ServiceError> {
        let service = self
            .services
            .get_mut(name)
            .ok_or_else(|| ServiceError::NotFound(name.into()))?;
        if !service.stop(now_ms) {
            return Err(ServiceError::AlreadyInactive(name.into()));
        }
        Ok(())
    }

    pub fn restart(&mut self, name: &str, now_ms: f64) -> Result<(), ServiceError> {
        match self.stop(name, now_ms) {
            Ok(()) | Err(ServiceError::AlreadyInactive(_)) => {}
            Err(e) => return Err(e),
        }
        self.start(name, now_ms)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    pub fn active_count(&self) -> usize {
        self.iter()
            .filter(|s| s.status == ServiceStatus::Active)
            .count()
    }

    pub fn status(&self, name: &str) -> Option<ServiceStatus> {
        self.services.get(name).map(|s| s.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_services_start_active() {
        let manager = ServiceManager::new(1000.0);
        assert!(manager.iter().all(|s| s.status == ServiceStatus::Active));
        assert!(manager.iter().all(|s| s.pid.is_some()));
        assert_eq!(manager.active_count(), manager.iter().count());
    }

    #[test]
    fn test_stop_then_start() {
        let mut manager = ServiceManager::new(0.0);
        let old_pid = manager.get("sshd").unwrap().pid;
        manager.stop("sshd", 10.0).unwrap();
        let sshd = manager.get("sshd").unwrap();
        assert_eq!(sshd.status, ServiceStatus::Inactive);
        assert_eq!(sshd.pid, None);
        assert_eq!(sshd.since_ms, 10.0);

        manager.start("sshd", 20.0).unwrap();
        let sshd = manager.get("sshd").unwrap();
        assert_eq!(sshd.status, ServiceStatus::Active);
        assert_ne!(sshd.pid, old_pid);
    }

    #[test]
    fn test_redundant_transitions_rejected() {
        let mut manager = ServiceManager::new(0.0);
        assert_eq!(
            manager.start("nginx", 1.0),
            Err(ServiceError::AlreadyActive("nginx".into()))
        );
        manager.stop("nginx", 1.0).unwrap();
        assert_eq!(
            manager.stop("nginx", 2.0),
            Err(ServiceError::AlreadyInactive("nginx".into()))
        );
    }

    #[test]
    fn test_unknown_service() {
        let mut manager = ServiceManager::new(0.0);
        assert_eq!(
            manager.start("httpd", 0.0),
            Err(ServiceError::NotFound("httpd".into()))
        );
        assert!(manager.get("httpd").is_err());
        assert_eq!(manager.status("httpd"), None);
    }

    #[test]
    fn test_pids_stay_below_shell() {
        let mut manager = ServiceManager::new(0.0);
        for i in 0..500 {
            manager.restart("cron", i as f64).unwrap();
            let pids: Vec<u32> = manager.iter().filter_map(|s| s.pid).collect();
            assert!(pids.iter().all(|&p| (FIRST_PID..SHELL_PID).contains(&p)));
            let mut unique = pids.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), pids.len());
        }
    }

    #[test]
    fn test_restart_inactive_service() {
        let mut manager = ServiceManager::new(0.0);
        manager.stop("cron", 1.0).unwrap();
        manager.restart("cron", 2.0).unwrap();
        assert_eq!(manager.status("cron"), Some(ServiceStatus::Active));
    }
}
