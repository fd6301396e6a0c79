//! Flag-aware wrappers over `portsec-config`.
//!
//! Resolution order for every field: CLI flag (or its env var) > profile >
//! built-in default. Core only ever sees the resulting `SwitchConfig`.

use std::time::Duration;

use secrecy::SecretString;

use portsec_config::{Config, Profile};
use portsec_core::{SwitchConfig, SwitchMode, ViolationAction};

use crate::cli::{GlobalOpts, ModeArg, ViolationArg};
use crate::error::CliError;

impl From<ModeArg> for SwitchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Mock => Self::Mock,
            ModeArg::Real => Self::Real,
        }
    }
}

impl From<ViolationArg> for ViolationAction {
    fn from(v: ViolationArg) -> Self {
        match v {
            ViolationArg::Shutdown => Self::Shutdown,
            ViolationArg::Restrict => Self::Restrict,
            ViolationArg::Protect => Self::Protect,
        }
    }
}

/// Load the config file, surfacing parse errors only when a profile was
/// asked for by name.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    match portsec_config::load_config() {
        Ok(cfg) => Ok(cfg),
        Err(e) if global.profile.is_some() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config file");
            Ok(Config::default())
        }
    }
}

/// Select the active profile, listing alternatives when it is missing.
pub fn active_profile(global: &GlobalOpts, cfg: &Config) -> Result<Profile, CliError> {
    cfg.profile(global.profile.as_deref()).map_err(|_| CliError::ProfileNotFound {
        name: cfg.active_profile_name(global.profile.as_deref()).to_string(),
        available: if cfg.profiles.is_empty() {
            "(none)".into()
        } else {
            cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
        },
    })
}

/// Build the `SwitchConfig` for this invocation.
pub fn build_switch_config(global: &GlobalOpts) -> Result<SwitchConfig, CliError> {
    let cfg = load(global)?;
    let mut profile = active_profile(global, &cfg)?;

    // 1. Flags that shape the profile itself
    if let Some(mode) = global.mode {
        profile.mode = mode.into();
    }
    if let Some(ref address) = global.address {
        profile.address.clone_from(address);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }

    let mut switch = portsec_config::profile_to_switch_config(&profile, &cfg.defaults)?;

    // 2. Password (flag > prompt > profile chain)
    if let Some(ref password) = global.password {
        switch.password = SecretString::from(password.clone());
    } else if global.ask_password {
        let password = rpassword::prompt_password(format!("Password for {}: ", switch.username))?;
        switch.password = SecretString::from(password);
    }

    // 3. Timeout
    if let Some(secs) = global.timeout {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        switch.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(mode = %switch.mode, address = %switch.address, "resolved switch config");
    Ok(switch)
}
