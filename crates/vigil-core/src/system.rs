use std::fs;

use vigil_model::EndpointInfo;

const ADVERTISE_HOST_ENV: &str = "VIGIL_ADVERTISE_HOST";
const FALLBACK_HOST: &str = "127.0.0.1";

/// Get platform (OS family).
#[inline]
pub fn platform() -> &'static str {
    std::env::consts::OS
}

/// Get architecture.
#[inline]
pub fn arch() -> &'static str {
    std::env::consts::ARCH
}

/// OS distribution name from `/etc/os-release` (Linux only, best effort).
///
/// Empty where the host does not report one.
pub fn os_info() -> String {
    #[cfg(target_os = "linux")]
    {
        if let Ok(content) = fs::read_to_string("/etc/os-release") {
            return parse_os_release(&content).unwrap_or_default();
        }
    }

    String::new()
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_os_release(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|name| name.trim().trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Host name other nodes should use to reach workers started here.
///
/// `VIGIL_ADVERTISE_HOST` wins, then the machine hostname.
pub fn advertise_host() -> String {
    if let Ok(host) = std::env::var(ADVERTISE_HOST_ENV)
        && !host.trim().is_empty()
    {
        return host.trim().to_string();
    }
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| FALLBACK_HOST.to_string())
}

/// Fresh capacity snapshot of this host. Never cached.
///
/// Memory figures are zero where `/proc/meminfo` is unavailable.
pub fn endpoint_info() -> EndpointInfo {
    let (total_memory_mb, free_memory_mb) = fs::read_to_string("/proc/meminfo")
        .ok()
        .and_then(|content| parse_meminfo(&content))
        .unwrap_or((0, 0));

    EndpointInfo {
        os_name: platform().to_string(),
        os_distribution: os_info(),
        arch: arch().to_string(),
        total_memory_mb,
        free_memory_mb,
    }
}

/// `(MemTotal, MemAvailable)` in MiB; `MemFree` stands in on old kernels.
fn parse_meminfo(content: &str) -> Option<(u64, u64)> {
    let mut total = None;
    let mut available = None;
    let mut free = None;

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(kib) = value.parse::<u64>() else {
            continue;
        };
        match key {
            "MemTotal:" => total = Some(kib),
            "MemAvailable:" => available = Some(kib),
            "MemFree:" => free = Some(kib),
            _ => {}
        }
    }

    let total = total?;
    let free = available.or(free).unwrap_or(0);
    Some((total / 1024, free / 1024))
}
