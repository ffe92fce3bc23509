// src/utils/windows.rs

use std::{thread, time::Duration};

use tracing::info;

use super::command::CommandExecutor;
use crate::{constants::EXPLORER_RESTART_DELAY_MS, errors::CommandError};

/// Checks if the current process is running with elevated (administrator) privileges.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    use tracing::warn;
    use windows::Win32::{
        Foundation::{CloseHandle, HANDLE},
        Security::{GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY},
        System::Threading::{GetCurrentProcess, OpenProcessToken},
    };

    let mut handle = HANDLE::default();
    if unsafe { OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut handle) }.is_err() {
        return false;
    }

    let mut elevation = TOKEN_ELEVATION::default();
    let mut ret_size = 0u32;
    let queried = unsafe {
        GetTokenInformation(
            handle,
            TokenElevation,
            Some(&mut elevation as *mut _ as *mut _),
            std::mem::size_of::<TOKEN_ELEVATION>() as u32,
            &mut ret_size,
        )
    };

    if unsafe { CloseHandle(handle) }.is_err() {
        warn!("Failed to close process token handle");
    }

    queried.is_ok() && elevation.TokenIsElevated != 0
}

/// Elevation only exists on Windows.
#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    false
}

/// Kills explorer.exe and starts it again so shell settings take effect.
pub fn restart_explorer(executor: &dyn CommandExecutor) -> Result<(), CommandError> {
    executor.execute("taskkill /f /im explorer.exe")?;
    thread::sleep(Duration::from_millis(EXPLORER_RESTART_DELAY_MS));
    executor.execute("start explorer.exe")?;
    info!("Explorer restarted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::command::testing::FakeExecutor;

    #[test]
    fn test_restart_explorer_kills_then_starts() {
        let executor = FakeExecutor::new();
        restart_explorer(&executor).unwrap();
        assert_eq!(
            executor.calls(),
            vec![
                "taskkill /f /im explorer.exe".to_string(),
                "start explorer.exe".to_string(),
            ]
        );
    }

    #[test]
    fn test_restart_explorer_stops_on_kill_failure() {
        let executor = FakeExecutor::new();
        executor.fail("taskkill", "ERROR: The process \"explorer.exe\" not found.");

        assert!(restart_explorer(&executor).is_err());
        assert_eq!(executor.calls().len(), 1);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_never_elevated_off_windows() {
        assert!(!is_elevated());
    }

    #[cfg(windows)]
    #[test]
    fn test_elevation_query_is_stable() {
        assert_eq!(is_elevated(), is_elevated());
    }
}
