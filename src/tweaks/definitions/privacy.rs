// src/tweaks/definitions/privacy.rs

use crate::{
    tweaks::{Impact, Tweak, TweakCategory::Privacy},
    utils::registry::RegValueType::{Dword, String as Sz},
};

const CONSENT_STORE: &str =
    "HKLM:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\CapabilityAccessManager\\ConsentStore";

pub fn tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "telemetry-disable",
            "Disable Windows Telemetry",
            "Stops diagnostic data from being collected and sent to Microsoft.",
            Privacy,
            Impact::High,
            "HKLM:\\SOFTWARE\\Policies\\Microsoft\\Windows\\DataCollection",
            "AllowTelemetry",
            Dword,
            "0",
        )
        // 3 = full telemetry, the Windows default.
        .with_default("3"),
        Tweak::registry(
            "cortana-disable",
            "Disable Cortana",
            "Turns off the Cortana voice assistant completely.",
            Privacy,
            Impact::Medium,
            "HKLM:\\SOFTWARE\\Policies\\Microsoft\\Windows\\Windows Search",
            "AllowCortana",
            Dword,
            "0",
        )
        .with_default("1"),
        Tweak::registry(
            "activity-history",
            "Disable Activity History",
            "Prevents app and browsing activity from being recorded.",
            Privacy,
            Impact::Low,
            "HKLM:\\SOFTWARE\\Policies\\Microsoft\\Windows\\System",
            "PublishUserActivities",
            Dword,
            "0",
        )
        .with_default("1"),
        Tweak::registry(
            "location-tracking",
            "Disable Location Tracking",
            "Turns off location services system-wide.",
            Privacy,
            Impact::Medium,
            &format!("{}\\location", CONSENT_STORE),
            "Value",
            Sz,
            "Deny",
        ),
        Tweak::registry(
            "advertising-id",
            "Disable Advertising ID",
            "Prevents personalised advertising based on a unique device ID.",
            Privacy,
            Impact::Low,
            "HKCU:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\AdvertisingInfo",
            "Enabled",
            Dword,
            "0",
        )
        .with_default("1"),
        Tweak::registry(
            "feedback",
            "Disable Windows Feedback",
            "Stops Windows from asking for feedback.",
            Privacy,
            Impact::Low,
            "HKCU:\\SOFTWARE\\Microsoft\\Siuf\\Rules",
            "NumberOfSIUFInPeriod",
            Dword,
            "0",
        )
        // Not present on a stock install.
        .with_default("DELETE"),
        Tweak::registry(
            "wifi-sense",
            "Disable WiFi Sense",
            "Prevents WiFi passwords from being shared automatically.",
            Privacy,
            Impact::High,
            "HKLM:\\SOFTWARE\\Microsoft\\PolicyManager\\default\\WiFi\\AllowWiFiHotSpotReporting",
            "value",
            Dword,
            "0",
        ),
        Tweak::registry(
            "timeline",
            "Disable Windows Timeline",
            "Turns off the Timeline feed that stores past activities.",
            Privacy,
            Impact::Low,
            "HKLM:\\SOFTWARE\\Policies\\Microsoft\\Windows\\System",
            "EnableActivityFeed",
            Dword,
            "0",
        ),
        Tweak::registry(
            "onedrive-disable",
            "Disable OneDrive",
            "Prevents OneDrive from starting and syncing files.",
            Privacy,
            Impact::Medium,
            "HKLM:\\SOFTWARE\\Policies\\Microsoft\\Windows\\OneDrive",
            "DisableFileSyncNGSC",
            Dword,
            "1",
        ),
        Tweak::registry(
            "web-search-disable",
            "Disable Start Menu Web Search",
            "Removes Bing web results from the Start menu search.",
            Privacy,
            Impact::Low,
            "HKCU:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Search",
            "BingSearchEnabled",
            Dword,
            "0",
        ),
        Tweak::registry(
            "suggested-apps",
            "Disable Suggested Apps",
            "Removes app suggestions from the Start menu.",
            Privacy,
            Impact::Low,
            "HKCU:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\ContentDeliveryManager",
            "SubscribedContent-338388Enabled",
            Dword,
            "0",
        ),
        Tweak::registry(
            "camera-access",
            "Block Camera Access for Apps",
            "Prevents apps from using the camera.",
            Privacy,
            Impact::Medium,
            &format!("{}\\webcam", CONSENT_STORE),
            "Value",
            Sz,
            "Deny",
        ),
        Tweak::registry(
            "microphone-access",
            "Block Microphone Access for Apps",
            "Prevents apps from using the microphone.",
            Privacy,
            Impact::Medium,
            &format!("{}\\microphone", CONSENT_STORE),
            "Value",
            Sz,
            "Deny",
        ),
        Tweak::registry(
            "handwriting-data",
            "Disable Handwriting Data Collection",
            "Stops handwriting and typing data from being collected.",
            Privacy,
            Impact::Low,
            "HKCU:\\SOFTWARE\\Microsoft\\InputPersonalization",
            "RestrictImplicitTextCollection",
            Dword,
            "1",
        )
        .with_default("0"),
        Tweak::registry(
            "feedback-frequency",
            "Set Feedback Frequency to Never",
            "Sets the Windows feedback request frequency to never.",
            Privacy,
            Impact::Low,
            "HKCU:\\SOFTWARE\\Microsoft\\Siuf\\Rules",
            "PeriodInNanoSeconds",
            Dword,
            "0",
        )
        .with_default("DELETE"),
        Tweak::registry(
            "app-diagnostics",
            "Disable App Diagnostics",
            "Prevents apps from reading diagnostic information.",
            Privacy,
            Impact::Low,
            &format!("{}\\appDiagnostics", CONSENT_STORE),
            "Value",
            Sz,
            "Deny",
        ),
        Tweak::registry(
            "windows-tips",
            "Disable Windows Tips",
            "Turns off tips, tricks and suggestions.",
            Privacy,
            Impact::Low,
            "HKCU:\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\ContentDeliveryManager",
            "SubscribedContent-338389Enabled",
            Dword,
            "0",
        ),
        Tweak::registry(
            "update-p2p",
            "Disable Windows Update P2P",
            "Stops updates from being shared over peer-to-peer delivery.",
            Privacy,
            Impact::Medium,
            "HKLM:\\SOFTWARE\\Policies\\Microsoft\\Windows\\DeliveryOptimization",
            "DODownloadMode",
            Dword,
            "0",
        ),
    ]
}
