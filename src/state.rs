// src/state.rs

use std::sync::Arc;

use tracing::{debug, trace};

use crate::utils::{
    command::CommandExecutor,
    registry::{parse_reg_query_output, reg_query_command, RegValueType, RegistryTarget},
};

/// Observed state of a registry value.
///
/// `exists` is the authority on presence: an existing value may hold an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueState {
    pub exists: bool,
    pub value: Option<String>,
    pub value_type: Option<RegValueType>,
}

impl ValueState {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn present(value_type: RegValueType, value: impl Into<String>) -> Self {
        Self {
            exists: true,
            value: Some(value.into()),
            value_type: Some(value_type),
        }
    }
}

/// Reads the current value of a configuration target.
///
/// Implementations never fail: any query error is reported as an absent value.
pub trait StateReader: Send + Sync {
    fn read(&self, target: &RegistryTarget) -> ValueState;
}

/// Reads values by running `reg query` through a [`CommandExecutor`].
pub struct CommandStateReader {
    executor: Arc<dyn CommandExecutor>,
}

impl CommandStateReader {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }
}

impl StateReader for CommandStateReader {
    fn read(&self, target: &RegistryTarget) -> ValueState {
        let output = match self.executor.execute(&reg_query_command(target)) {
            Ok(output) => output,
            Err(e) => {
                debug!("{} -> Query failed, treating as absent: {}", target, e);
                return ValueState::absent();
            }
        };

        match parse_reg_query_output(&output, &target.name) {
            Some((value_type, value)) => {
                trace!("{} -> Found {} '{}'", target, value_type, value);
                ValueState::present(value_type, value)
            }
            None => {
                debug!("{} -> Value not present in query output", target);
                ValueState::absent()
            }
        }
    }
}

/// Reads values directly through the Windows registry API.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryStateReader;

#[cfg(windows)]
impl StateReader for RegistryStateReader {
    fn read(&self, target: &RegistryTarget) -> ValueState {
        match crate::utils::registry::read_registry_value(target) {
            Ok(Some((value_type, value))) => ValueState::present(value_type, value),
            Ok(None) => ValueState::absent(),
            Err(e) => {
                debug!("{} -> Read failed, treating as absent: {:?}", target, e);
                ValueState::absent()
            }
        }
    }
}

/// Platform default reader.
pub fn default_state_reader(executor: Arc<dyn CommandExecutor>) -> Box<dyn StateReader> {
    #[cfg(windows)]
    {
        let _ = executor;
        Box::new(RegistryStateReader)
    }

    #[cfg(not(windows))]
    {
        Box::new(CommandStateReader::new(executor))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{collections::HashMap, sync::Mutex};

    use super::*;

    /// In-memory reader keyed by target.
    #[derive(Default)]
    pub struct MapStateReader {
        values: Mutex<HashMap<RegistryTarget, ValueState>>,
    }

    impl MapStateReader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set(&self, target: &RegistryTarget, state: ValueState) {
            self.values.lock().unwrap().insert(target.clone(), state);
        }
    }

    impl StateReader for MapStateReader {
        fn read(&self, target: &RegistryTarget) -> ValueState {
            self.values
                .lock()
                .unwrap()
                .get(target)
                .cloned()
                .unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::command::testing::FakeExecutor;

    fn target() -> RegistryTarget {
        RegistryTarget::new(
            "HKLM:\\SOFTWARE\\Policies\\Microsoft\\Windows\\DataCollection",
            "AllowTelemetry",
        )
    }

    #[test]
    fn test_reads_existing_value() {
        let executor = Arc::new(FakeExecutor::new());
        executor.respond(
            "reg query",
            "HKEY_LOCAL_MACHINE\\SOFTWARE\\Policies\\Microsoft\\Windows\\DataCollection\r\n    AllowTelemetry    REG_DWORD    0x1\r\n",
        );
        let reader = CommandStateReader::new(executor.clone());

        assert_eq!(
            reader.read(&target()),
            ValueState::present(RegValueType::Dword, "1")
        );
        assert_eq!(
            executor.calls(),
            vec!["reg query \"HKLM\\SOFTWARE\\Policies\\Microsoft\\Windows\\DataCollection\" /v \"AllowTelemetry\"".to_string()]
        );
    }

    #[test]
    fn test_query_failure_is_absent() {
        let executor = Arc::new(FakeExecutor::new());
        executor.fail("reg query", "ERROR: The system was unable to find the specified registry key or value.");
        let reader = CommandStateReader::new(executor);

        let state = reader.read(&target());
        assert!(!state.exists);
        assert_eq!(state.value, None);
        assert_eq!(state.value_type, None);
    }

    #[test]
    fn test_empty_string_value_still_exists() {
        let executor = Arc::new(FakeExecutor::new());
        executor.respond("reg query", "HKEY_LOCAL_MACHINE\\X\n    AllowTelemetry    REG_SZ    \n");
        let reader = CommandStateReader::new(executor);

        let state = reader.read(&target());
        assert!(state.exists);
        assert_eq!(state.value.as_deref(), Some(""));
    }
}
