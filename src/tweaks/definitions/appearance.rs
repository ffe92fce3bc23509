// src/tweaks/definitions/appearance.rs

use crate::{
    tweaks::{Impact, Tweak, TweakCategory::Appearance},
    utils::registry::{reg_add_command, RegValueType::Dword, RegistryTarget},
};

const PERSONALIZE: &str = "HKCU:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize";
const EXPLORER_ADVANCED: &str =
    "HKCU:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Explorer\\Advanced";

/// Dark mode flips both the app and the system theme; only the app value is tracked.
fn dark_mode() -> Tweak {
    let tweak = Tweak::registry(
        "dark-mode",
        "Enable Dark Mode",
        "Switches apps and the system shell to the dark theme.",
        Appearance,
        Impact::Low,
        PERSONALIZE,
        "AppsUseLightTheme",
        Dword,
        "0",
    )
    .with_default("1");

    let system_theme = RegistryTarget::new(PERSONALIZE, "SystemUsesLightTheme");
    let command = format!(
        "{} && {}",
        tweak.command,
        reg_add_command(&system_theme, Dword, "0")
    );
    tweak.with_command(command)
}

pub fn tweaks() -> Vec<Tweak> {
    vec![
        dark_mode(),
        Tweak::registry(
            "taskbar-small",
            "Small Taskbar Icons",
            "Shrinks taskbar icons to save space (Windows 10 only).",
            Appearance,
            Impact::Low,
            EXPLORER_ADVANCED,
            "TaskbarSmallIcons",
            Dword,
            "1",
        )
        .with_default("0"),
        Tweak::registry(
            "show-file-extensions",
            "Show File Extensions",
            "Shows file extensions in Explorer.",
            Appearance,
            Impact::Low,
            EXPLORER_ADVANCED,
            "HideFileExt",
            Dword,
            "0",
        )
        .with_default("1"),
        Tweak::registry(
            "show-hidden-files",
            "Show Hidden Files",
            "Shows hidden files and folders in Explorer.",
            Appearance,
            Impact::Low,
            EXPLORER_ADVANCED,
            "Hidden",
            Dword,
            "1",
        )
        .with_default("2"),
        Tweak::registry(
            "taskbar-search-icon",
            "Taskbar Search as Icon",
            "Collapses the taskbar search box to an icon.",
            Appearance,
            Impact::Low,
            "HKCU:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Search",
            "SearchboxTaskbarMode",
            Dword,
            "1",
        )
        // 0 = hidden, 1 = icon, 2 = search box.
        .with_default("2"),
        Tweak::registry(
            "compact-mode",
            "Compact Explorer Mode",
            "Uses the compact view in File Explorer (Windows 11 only).",
            Appearance,
            Impact::Low,
            EXPLORER_ADVANCED,
            "UseCompactMode",
            Dword,
            "1",
        )
        .with_default("0"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_mode_sets_both_themes() {
        let tweak = dark_mode();
        assert!(tweak.command.contains("/v \"AppsUseLightTheme\""));
        assert!(tweak.command.contains(" && "));
        assert!(tweak.command.contains("/v \"SystemUsesLightTheme\""));
        assert_eq!(tweak.target.name, "AppsUseLightTheme");
    }
}
