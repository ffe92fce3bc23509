// src/services.rs

use std::sync::Arc;

use serde::Serialize;
use strum_macros::{Display, EnumString};
use tracing::{debug, info};

use crate::{errors::ServiceError, utils::command::CommandExecutor};

/// What we suggest doing with a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Recommendation {
    Disable,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Service key name as understood by `sc.exe`.
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub recommendation: Recommendation,
}

pub static SERVICES: [ServiceDescriptor; 6] = [
    ServiceDescriptor {
        name: "DiagTrack",
        display_name: "Connected User Experiences and Telemetry",
        description: "Collects telemetry data. Safe to disable.",
        recommendation: Recommendation::Disable,
    },
    ServiceDescriptor {
        name: "dmwappushservice",
        display_name: "Device Management Wireless Application Protocol",
        description: "WAP push message routing. Rarely needed.",
        recommendation: Recommendation::Disable,
    },
    ServiceDescriptor {
        name: "WSearch",
        display_name: "Windows Search",
        description: "Search indexing. Can cost disk performance.",
        recommendation: Recommendation::Optional,
    },
    ServiceDescriptor {
        name: "SysMain",
        display_name: "Superfetch/SysMain",
        description: "Preloads frequently used programs into RAM. Optional on SSDs.",
        recommendation: Recommendation::Optional,
    },
    ServiceDescriptor {
        name: "TabletInputService",
        display_name: "Touch Keyboard and Handwriting Panel Service",
        description: "Only needed on touchscreen devices.",
        recommendation: Recommendation::Disable,
    },
    ServiceDescriptor {
        name: "RetailDemo",
        display_name: "Retail Demo Service",
        description: "Store demo mode. Not needed.",
        recommendation: Recommendation::Disable,
    },
];

pub fn find_service(name: &str) -> Option<&'static ServiceDescriptor> {
    SERVICES.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Startup type as reported by `sc qc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StartupMode {
    #[strum(to_string = "auto", serialize = "automatic")]
    #[serde(rename = "auto")]
    Automatic,
    Manual,
    Disabled,
    #[default]
    Unknown,
}

impl StartupMode {
    fn from_qc_output(output: &str) -> Self {
        if output.contains("AUTO_START") {
            StartupMode::Automatic
        } else if output.contains("DEMAND_START") {
            StartupMode::Manual
        } else if output.contains("DISABLED") {
            StartupMode::Disabled
        } else {
            StartupMode::Unknown
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub exists: bool,
    pub running: bool,
    pub stopped: bool,
    pub startup_type: StartupMode,
}

impl ServiceStatus {
    pub fn is_disabled(&self) -> bool {
        self.startup_type == StartupMode::Disabled
    }
}

/// Starts, stops and reconfigures services through `sc.exe`.
pub struct ServiceManager {
    executor: Arc<dyn CommandExecutor>,
}

impl ServiceManager {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Re-enables the service with its original startup type and tries to start it.
    ///
    /// Anything other than [`StartupMode::Automatic`] is restored as manual start.
    pub fn enable(&self, name: &str, original: StartupMode) -> Result<String, ServiceError> {
        let start_type = if original == StartupMode::Automatic {
            "auto"
        } else {
            "demand"
        };
        self.configure(name, start_type)?;

        // Fails when the service is already running.
        if let Err(e) = self.executor.execute(&format!("sc start \"{}\"", name)) {
            debug!("{} -> Start skipped: {}", name, e);
        }

        info!("{} -> Enabled ({})", name, start_type);
        Ok(format!(
            "Service enabled ({})",
            if start_type == "auto" { "automatic" } else { "manual" }
        ))
    }

    /// Stops the service and sets its startup type to disabled.
    pub fn disable(&self, name: &str) -> Result<String, ServiceError> {
        // Fails when the service is already stopped.
        if let Err(e) = self.executor.execute(&format!("sc stop \"{}\"", name)) {
            debug!("{} -> Stop skipped: {}", name, e);
        }
        self.configure(name, "disabled")?;

        info!("{} -> Disabled", name);
        Ok("Service disabled and stopped".to_string())
    }

    fn configure(&self, name: &str, start_type: &str) -> Result<(), ServiceError> {
        self.executor
            .execute(&format!("sc config \"{}\" start= {}", name, start_type))
            .map(|_| ())
            .map_err(|source| ServiceError::Configure {
                name: name.to_string(),
                source,
            })
    }

    /// Queries run state and startup type. Any query failure reads as "does not exist".
    pub fn status(&self, name: &str) -> ServiceStatus {
        let query = self.executor.execute(&format!("sc query \"{}\"", name));
        let config = self.executor.execute(&format!("sc qc \"{}\"", name));

        match (query, config) {
            (Ok(query), Ok(config)) => ServiceStatus {
                exists: true,
                running: query.contains("RUNNING"),
                stopped: query.contains("STOPPED"),
                startup_type: StartupMode::from_qc_output(&config),
            },
            (Err(e), _) | (_, Err(e)) => {
                debug!("{} -> Status query failed: {}", name, e);
                ServiceStatus::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::command::testing::FakeExecutor;

    fn manager() -> (Arc<FakeExecutor>, ServiceManager) {
        let executor = Arc::new(FakeExecutor::new());
        (executor.clone(), ServiceManager::new(executor))
    }

    #[test]
    fn test_enable_restores_auto_and_ignores_start_failure() {
        let (executor, manager) = manager();
        executor.fail("sc start", "An instance of the service is already running.");

        let message = manager
            .enable("DiagTrack", StartupMode::Automatic)
            .unwrap();

        assert_eq!(message, "Service enabled (automatic)");
        assert_eq!(
            executor.calls(),
            vec![
                "sc config \"DiagTrack\" start= auto".to_string(),
                "sc start \"DiagTrack\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_enable_defaults_to_demand() {
        let (executor, manager) = manager();
        manager.enable("WSearch", StartupMode::Unknown).unwrap();
        assert_eq!(
            executor.calls_starting_with("sc config"),
            vec!["sc config \"WSearch\" start= demand".to_string()]
        );
    }

    #[test]
    fn test_disable_stops_then_configures() {
        let (executor, manager) = manager();
        executor.fail("sc stop", "The service has not been started.");

        manager.disable("SysMain").unwrap();

        assert_eq!(
            executor.calls(),
            vec![
                "sc stop \"SysMain\"".to_string(),
                "sc config \"SysMain\" start= disabled".to_string(),
            ]
        );
    }

    #[test]
    fn test_disable_reports_config_failure() {
        let (executor, manager) = manager();
        executor.fail("sc config", "Access is denied.");

        let err = manager.disable("SysMain").unwrap_err();
        assert!(err.to_string().contains("SysMain"));
    }

    #[test]
    fn test_status_parses_sc_output() {
        let (executor, manager) = manager();
        executor.respond(
            "sc query",
            "SERVICE_NAME: WSearch\n        TYPE               : 10  WIN32_OWN_PROCESS\n        STATE              : 4  RUNNING\n",
        );
        executor.respond(
            "sc qc",
            "SERVICE_NAME: WSearch\n        START_TYPE         : 2   AUTO_START  (DELAYED)\n",
        );

        let status = manager.status("WSearch");
        assert!(status.exists);
        assert!(status.running);
        assert!(!status.stopped);
        assert_eq!(status.startup_type, StartupMode::Automatic);
        assert!(!status.is_disabled());
    }

    #[test]
    fn test_status_of_missing_service() {
        let (executor, manager) = manager();
        executor.fail("sc query", "The specified service does not exist as an installed service.");

        let status = manager.status("Nope");
        assert_eq!(status, ServiceStatus::default());
        assert_eq!(status.startup_type, StartupMode::Unknown);
    }

    #[test]
    fn test_startup_mode_names() {
        assert_eq!(StartupMode::Automatic.to_string(), "auto");
        assert_eq!("manual".parse::<StartupMode>(), Ok(StartupMode::Manual));
        assert_eq!("auto".parse::<StartupMode>(), Ok(StartupMode::Automatic));
        assert_eq!("automatic".parse::<StartupMode>(), Ok(StartupMode::Automatic));
        assert!(find_service("diagtrack").is_some());
    }
}
