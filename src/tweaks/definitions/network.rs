// src/tweaks/definitions/network.rs

use crate::{
    tweaks::{Impact, Tweak, TweakCategory::Network},
    utils::registry::RegValueType::Dword,
};

pub fn tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "dns-cache-size",
            "Increase DNS Cache",
            "Enlarges the DNS cache for faster name resolution.",
            Network,
            Impact::Low,
            "HKLM:\\SYSTEM\\CurrentControlSet\\Services\\Dnscache\\Parameters",
            "CacheHashTableBucketSize",
            Dword,
            "1",
        ),
        Tweak::registry(
            "network-throttling",
            "Disable Network Throttling",
            "Turns off multimedia network throttling.",
            Network,
            Impact::Medium,
            "HKLM:\\SOFTWARE\\Microsoft\\Windows NT\\CurrentVersion\\Multimedia\\SystemProfile",
            "NetworkThrottlingIndex",
            Dword,
            // 0xFFFFFFFF
            "4294967295",
        ),
        Tweak::registry(
            "tcp-optimizer",
            "TCP Optimizer",
            "Acknowledges every TCP segment immediately.",
            Network,
            Impact::Medium,
            "HKLM:\\SYSTEM\\CurrentControlSet\\Services\\Tcpip\\Parameters",
            "TcpAckFrequency",
            Dword,
            "1",
        ),
        Tweak::registry(
            "qos-disable",
            "Disable QoS Bandwidth Reservation",
            "Stops the QoS packet scheduler from reserving bandwidth.",
            Network,
            Impact::Low,
            "HKLM:\\SOFTWARE\\Policies\\Microsoft\\Windows\\Psched",
            "NonBestEffortLimit",
            Dword,
            "0",
        ),
        Tweak::registry(
            "nagle-disable",
            "Disable Nagle's Algorithm",
            "Reduces network latency for games.",
            Network,
            Impact::Medium,
            "HKLM:\\SYSTEM\\CurrentControlSet\\Services\\Tcpip\\Parameters\\Interfaces",
            "TcpAckFrequency",
            Dword,
            "1",
        ),
    ]
}
