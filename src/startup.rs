//! Launch-at-login registration
//!
//! One string value under the per-user Run key, keyed by the application
//! name and holding the absolute executable path. The comparison is exact:
//! a moved executable reads as disabled until it is re-enabled from its new
//! location.

pub use imp::{disable, enable, is_enabled};

#[cfg(target_os = "windows")]
mod imp {
    use std::io;

    use anyhow::{Context, Result};
    use tracing::info;
    use winreg::RegKey;
    use winreg::enums::{HKEY_CURRENT_USER, KEY_READ, KEY_SET_VALUE};

    use crate::constants::app::NAME;
    use crate::constants::startup::RUN_KEY;

    fn exe_path() -> Result<String> {
        let path = std::env::current_exe().context("Failed to resolve executable path")?;
        Ok(path.to_string_lossy().into_owned())
    }

    fn read_value(name: &str) -> Option<String> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let key = hkcu.open_subkey_with_flags(RUN_KEY, KEY_READ).ok()?;
        key.get_value(name).ok()
    }

    fn write_value(name: &str, value: &str) -> Result<()> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let (key, _) = hkcu
            .create_subkey(RUN_KEY)
            .context("Failed to open the Run key for writing")?;
        key.set_value(name, &value.to_string())
            .context("Failed to write the startup entry")
    }

    fn remove_value(name: &str) -> Result<()> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let key = match hkcu.open_subkey_with_flags(RUN_KEY, KEY_SET_VALUE) {
            Ok(key) => key,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err).context("Failed to open the Run key"),
        };
        match key.delete_value(name) {
            Ok(()) => Ok(()),
            // Missing entry counts as already disabled
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).context("Failed to remove the startup entry"),
        }
    }

    /// True iff the registry entry exists and points at this executable
    pub fn is_enabled() -> bool {
        match (read_value(NAME), exe_path()) {
            (Some(stored), Ok(current)) => stored == current,
            _ => false,
        }
    }

    pub fn enable() -> Result<()> {
        write_value(NAME, &exe_path()?)?;
        info!("Enabled launch at login");
        Ok(())
    }

    pub fn disable() -> Result<()> {
        remove_value(NAME)?;
        info!("Disabled launch at login");
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        const TEST_VALUE: &str = "Hotkey Notifier (test)";

        #[test]
        fn test_registry_round_trip() {
            // Start from a clean slate; a missing value is not an error
            remove_value(TEST_VALUE).unwrap();
            assert_eq!(read_value(TEST_VALUE), None);

            write_value(TEST_VALUE, r"C:\some\path\notifier.exe").unwrap();
            assert_eq!(
                read_value(TEST_VALUE).as_deref(),
                Some(r"C:\some\path\notifier.exe")
            );

            remove_value(TEST_VALUE).unwrap();
            assert_eq!(read_value(TEST_VALUE), None);
            // Removing twice is still fine
            remove_value(TEST_VALUE).unwrap();
        }
    }
}

#[cfg(not(target_os = "windows"))]
mod imp {
    use anyhow::{Result, bail};

    /// Autostart registration only exists on Windows
    pub fn is_enabled() -> bool {
        false
    }

    pub fn enable() -> Result<()> {
        bail!("Launch at login is only supported on Windows")
    }

    pub fn disable() -> Result<()> {
        bail!("Launch at login is only supported on Windows")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_stub_reports_disabled() {
            assert!(!is_enabled());
            assert!(enable().is_err());
            assert!(disable().is_err());
        }
    }
}
