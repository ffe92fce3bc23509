// src/tweaks/definitions/performance.rs

use crate::{
    tweaks::{Impact, Tweak, TweakCategory::Performance},
    utils::registry::RegValueType::{Dword, String as Sz},
};

pub fn tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "visual-effects",
            "Optimize Visual Effects",
            "Reduces animations in favour of performance.",
            Performance,
            Impact::Medium,
            "HKCU:\\Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\VisualEffects",
            "VisualFXSetting",
            Dword,
            "2",
        ),
        Tweak::registry(
            "startup-delay",
            "Remove Startup Delay",
            "Starts autostart programs without the built-in delay.",
            Performance,
            Impact::Low,
            "HKCU:\\Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\Serialize",
            "StartupDelayInMSec",
            Dword,
            "0",
        ),
        Tweak::registry(
            "superfetch",
            "Optimize Superfetch",
            "Disables Superfetch prefetching, which brings little on SSDs.",
            Performance,
            Impact::Medium,
            "HKLM:\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Memory Management\\PrefetchParameters",
            "EnableSuperfetch",
            Dword,
            "0",
        ),
        Tweak::registry(
            "game-mode",
            "Enable Game Mode",
            "Turns on Windows Game Mode for better gaming performance.",
            Performance,
            Impact::Low,
            "HKCU:\\Software\\Microsoft\\GameBar",
            "AutoGameModeEnabled",
            Dword,
            "1",
        )
        .with_default("0"),
        Tweak::registry(
            "background-apps",
            "Disable Background Apps",
            "Prevents apps from running in the background.",
            Performance,
            Impact::Medium,
            "HKCU:\\Software\\Microsoft\\Windows\\CurrentVersion\\BackgroundAccessApplications",
            "GlobalUserDisabled",
            Dword,
            "1",
        ),
        Tweak::registry(
            "transparency-disable",
            "Disable Transparency Effects",
            "Turns off transparency for better performance.",
            Performance,
            Impact::Low,
            "HKCU:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize",
            "EnableTransparency",
            Dword,
            "0",
        )
        .with_default("1"),
        Tweak::registry(
            "animations-disable",
            "Disable Animations",
            "Turns off window animations for a snappier UI.",
            Performance,
            Impact::Medium,
            "HKCU:\\Control Panel\\Desktop\\WindowMetrics",
            "MinAnimate",
            Sz,
            "0",
        )
        .with_default("1"),
        Tweak::registry(
            "fast-startup-disable",
            "Disable Fast Startup",
            "Turns off hybrid boot, which causes trouble on some systems.",
            Performance,
            Impact::Low,
            "HKLM:\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Power",
            "HiberbootEnabled",
            Dword,
            "0",
        )
        .with_default("1"),
        Tweak::registry(
            "search-indexing",
            "Optimize Search Indexing",
            "Excludes Outlook from indexing to reduce disk activity.",
            Performance,
            Impact::Medium,
            "HKLM:\\SOFTWARE\\Policies\\Microsoft\\Windows\\Windows Search",
            "PreventIndexingOutlook",
            Dword,
            "1",
        ),
        Tweak::registry(
            "game-dvr-disable",
            "Disable Game DVR",
            "Turns off Xbox Game DVR recording.",
            Performance,
            Impact::Medium,
            "HKCU:\\System\\GameConfigStore",
            "GameDVR_Enabled",
            Dword,
            "0",
        )
        .with_default("1"),
        Tweak::registry(
            "notification-disable",
            "Reduce Notifications",
            "Turns off toast notifications.",
            Performance,
            Impact::Low,
            "HKCU:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\PushNotifications",
            "ToastEnabled",
            Dword,
            "0",
        ),
        Tweak::registry(
            "sysmain-disable",
            "Disable SysMain",
            "Sets the SysMain service to disabled, saving RAM on SSD systems.",
            Performance,
            Impact::Medium,
            "HKLM:\\SYSTEM\\CurrentControlSet\\Services\\SysMain",
            "Start",
            Dword,
            "4",
        ),
        Tweak::registry(
            "power-throttling",
            "Disable Power Throttling",
            "Prevents processes from being throttled for power saving.",
            Performance,
            Impact::High,
            "HKLM:\\SYSTEM\\CurrentControlSet\\Control\\Power\\PowerThrottling",
            "PowerThrottlingOff",
            Dword,
            "1",
        ),
    ]
}
