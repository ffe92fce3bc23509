// src/utils/registry.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::errors::RegistryError;

/// Storage type of a registry value. Serialized with the `reg.exe` type names.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum RegValueType {
    #[default]
    #[serde(rename = "REG_SZ")]
    #[strum(serialize = "REG_SZ")]
    String,
    #[serde(rename = "REG_DWORD")]
    #[strum(serialize = "REG_DWORD")]
    Dword,
    #[serde(rename = "REG_BINARY")]
    #[strum(serialize = "REG_BINARY")]
    Binary,
    #[serde(rename = "REG_MULTI_SZ")]
    #[strum(serialize = "REG_MULTI_SZ")]
    MultiString,
    #[serde(rename = "REG_EXPAND_SZ")]
    #[strum(serialize = "REG_EXPAND_SZ")]
    ExpandString,
}

/// Identifies a single value in the registry: the key path plus the value name.
///
/// Paths may use the PowerShell drive form (`HKLM:\...`) or the `reg.exe` form (`HKLM\...`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryTarget {
    pub path: String,
    pub name: String,
}

impl RegistryTarget {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Key path in the form accepted by `reg.exe`.
    pub fn reg_path(&self) -> String {
        normalize_registry_path(&self.path)
    }
}

impl fmt::Display for RegistryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}", self.reg_path(), self.name)
    }
}

/// Converts PowerShell drive prefixes (`HKLM:\`, `HKCU:\`) into `reg.exe` prefixes.
pub fn normalize_registry_path(path: &str) -> String {
    match path.split_once(":\\") {
        Some((hive, rest)) if !hive.contains('\\') => format!("{}\\{}", hive, rest),
        _ => path.to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hive {
    LocalMachine,
    CurrentUser,
    ClassesRoot,
    Users,
    CurrentConfig,
}

/// Parses a full registry path into its hive and subkey path.
pub fn parse_registry_path(path: &str) -> Result<(Hive, String), RegistryError> {
    let normalized = normalize_registry_path(path);
    let (hive, subkey) = normalized
        .split_once('\\')
        .filter(|(_, subkey)| !subkey.is_empty())
        .ok_or_else(|| RegistryError::InvalidPath(path.to_string()))?;

    let hive = match hive.to_uppercase().as_str() {
        "HKEY_LOCAL_MACHINE" | "HKLM" => Hive::LocalMachine,
        "HKEY_CURRENT_USER" | "HKCU" => Hive::CurrentUser,
        "HKEY_CLASSES_ROOT" | "HKCR" => Hive::ClassesRoot,
        "HKEY_USERS" | "HKU" => Hive::Users,
        "HKEY_CURRENT_CONFIG" | "HKCC" => Hive::CurrentConfig,
        other => return Err(RegistryError::UnsupportedHive(other.to_string())),
    };
    Ok((hive, subkey.to_string()))
}

/// `reg add` command writing `value` with the given type, overwriting any existing value.
pub fn reg_add_command(target: &RegistryTarget, value_type: RegValueType, value: &str) -> String {
    format!(
        "reg add \"{}\" /v \"{}\" /t {} /d \"{}\" /f",
        target.reg_path(),
        target.name,
        value_type,
        value
    )
}

pub fn reg_delete_command(target: &RegistryTarget) -> String {
    format!(
        "reg delete \"{}\" /v \"{}\" /f",
        target.reg_path(),
        target.name
    )
}

pub fn reg_query_command(target: &RegistryTarget) -> String {
    format!("reg query \"{}\" /v \"{}\"", target.reg_path(), target.name)
}

/// Extracts the type and data of `value_name` from `reg query` output.
///
/// DWORD data is reported by `reg.exe` in hex (`0x1`) and is converted to decimal so it
/// compares equal to catalog values and can be written back verbatim. String data is kept
/// as printed after the column separator, surrounding whitespace included.
pub fn parse_reg_query_output(output: &str, value_name: &str) -> Option<(RegValueType, String)> {
    output.lines().find_map(|line| {
        let mut parts = line.trim_start().splitn(3, "    ");
        let name = parts.next()?.trim();
        if !name.eq_ignore_ascii_case(value_name) {
            return None;
        }
        let value_type = parts.next()?.trim().parse::<RegValueType>().ok()?;
        let data = parts.next().unwrap_or("").trim_end_matches('\r');
        let data = match value_type {
            RegValueType::Dword => {
                let data = data.trim();
                parse_dword(data)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| data.to_string())
            }
            _ => data.to_string(),
        };
        Some((value_type, data))
    })
}

fn parse_dword(data: &str) -> Option<u32> {
    match data.strip_prefix("0x").or_else(|| data.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => data.parse().ok(),
    }
}

#[cfg(windows)]
pub use native::read_registry_value;

#[cfg(windows)]
mod native {
    use anyhow::{Context, Result};
    use winreg::{
        enums::{
            RegType::{REG_BINARY, REG_DWORD, REG_EXPAND_SZ, REG_MULTI_SZ, REG_SZ},
            HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE,
            HKEY_USERS, KEY_READ,
        },
        RegKey,
    };

    use super::{parse_registry_path, Hive, RegValueType, RegistryTarget};

    fn predef(hive: Hive) -> RegKey {
        RegKey::predef(match hive {
            Hive::LocalMachine => HKEY_LOCAL_MACHINE,
            Hive::CurrentUser => HKEY_CURRENT_USER,
            Hive::ClassesRoot => HKEY_CLASSES_ROOT,
            Hive::Users => HKEY_USERS,
            Hive::CurrentConfig => HKEY_CURRENT_CONFIG,
        })
    }

    /// Reads a registry value and renders it in the textual form `reg add /d` accepts.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((type, data)))` if the value exists.
    /// - `Ok(None)` if the key or the value doesn't exist.
    /// - `Err(anyhow::Error)` for any other failure.
    pub fn read_registry_value(target: &RegistryTarget) -> Result<Option<(RegValueType, String)>> {
        let (hive, subkey_path) = parse_registry_path(&target.path)
            .with_context(|| format!("Failed to parse registry path '{}'", target.path))?;

        let subkey = match predef(hive).open_subkey_with_flags(&subkey_path, KEY_READ) {
            Ok(key) => key,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open subkey '{}'", subkey_path))
            }
        };

        let value = match subkey.get_raw_value(&target.name) {
            Ok(value) => value,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read value '{}'", target.name))
            }
        };

        let decode_utf16 = |bytes: &[u8]| {
            String::from_utf16_lossy(
                &bytes
                    .chunks_exact(2)
                    .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
                    .collect::<Vec<u16>>(),
            )
        };

        let rendered = match value.vtype {
            REG_DWORD => {
                if value.bytes.len() < 4 {
                    anyhow::bail!("REG_DWORD data too small for value '{}'", target.name);
                }
                let dword = u32::from_le_bytes([
                    value.bytes[0],
                    value.bytes[1],
                    value.bytes[2],
                    value.bytes[3],
                ]);
                (RegValueType::Dword, dword.to_string())
            }
            REG_BINARY => (
                RegValueType::Binary,
                value.bytes.iter().map(|b| format!("{:02X}", b)).collect(),
            ),
            REG_SZ => (
                RegValueType::String,
                decode_utf16(&value.bytes).trim_end_matches('\0').to_string(),
            ),
            REG_EXPAND_SZ => (
                RegValueType::ExpandString,
                decode_utf16(&value.bytes).trim_end_matches('\0').to_string(),
            ),
            REG_MULTI_SZ => (
                RegValueType::MultiString,
                decode_utf16(&value.bytes)
                    .trim_end_matches('\0')
                    .split('\0')
                    .collect::<Vec<_>>()
                    .join("\\0"),
            ),
            other => anyhow::bail!("Unsupported registry value type: {:?}", other),
        };
        Ok(Some(rendered))
    }
}
