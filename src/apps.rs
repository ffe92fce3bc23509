// src/apps.rs

use std::sync::Arc;

use tracing::{debug, info};

use crate::{errors::AppError, utils::command::CommandExecutor};

/// A preinstalled Store app that can be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPackage {
    /// Fragment matched against the package name (`*name*`).
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

pub static APPS: [AppPackage; 11] = [
    AppPackage {
        name: "3DBuilder",
        display_name: "3D Builder",
        description: "3D modelling app",
        category: "Optional",
    },
    AppPackage {
        name: "BingWeather",
        display_name: "Bing Weather",
        description: "Microsoft weather app",
        category: "Optional",
    },
    AppPackage {
        name: "XboxApp",
        display_name: "Xbox",
        description: "Xbox console companion",
        category: "Gaming",
    },
    AppPackage {
        name: "ZuneMusic",
        display_name: "Groove Music",
        description: "Microsoft music player",
        category: "Media",
    },
    AppPackage {
        name: "WindowsMaps",
        display_name: "Maps",
        description: "Microsoft maps app",
        category: "Optional",
    },
    AppPackage {
        name: "OneNote",
        display_name: "OneNote",
        description: "Note-taking app (UWP version)",
        category: "Productivity",
    },
    AppPackage {
        name: "People",
        display_name: "People",
        description: "Contact management",
        category: "Optional",
    },
    AppPackage {
        name: "SkypeApp",
        display_name: "Skype",
        description: "Skype UWP app",
        category: "Communication",
    },
    AppPackage {
        name: "GetStarted",
        display_name: "Tips",
        description: "Windows tips app",
        category: "Optional",
    },
    AppPackage {
        name: "Solitaire",
        display_name: "Solitaire Collection",
        description: "Microsoft card games",
        category: "Games",
    },
    AppPackage {
        name: "CandyCrush",
        display_name: "Candy Crush",
        description: "Preinstalled game",
        category: "Games",
    },
];

pub fn find_app(name: &str) -> Option<&'static AppPackage> {
    APPS.iter().find(|a| a.name.eq_ignore_ascii_case(name))
}

fn appx_command(name: &str, pipeline: &str) -> String {
    format!(
        "powershell -Command \"Get-AppxPackage *{}* | {}\"",
        name, pipeline
    )
}

/// Queries and removes Appx packages through PowerShell.
pub struct AppManager {
    executor: Arc<dyn CommandExecutor>,
}

impl AppManager {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// True when at least one package matches. Query failures read as not installed.
    pub fn is_installed(&self, name: &str) -> bool {
        match self
            .executor
            .execute(&appx_command(name, "Select-Object -ExpandProperty Name"))
        {
            Ok(output) => !output.trim().is_empty(),
            Err(e) => {
                debug!("{} -> Package query failed: {}", name, e);
                false
            }
        }
    }

    pub fn remove(&self, name: &str) -> Result<String, AppError> {
        self.executor
            .execute(&appx_command(name, "Remove-AppxPackage"))
            .map_err(|source| AppError::Remove {
                name: name.to_string(),
                source,
            })?;
        info!("{} -> Removed", name);
        Ok(format!("{} was removed", name))
    }
}
