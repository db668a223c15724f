// src/common/dev_mode.rs
//! Development mode configuration and utilities
//! Allows bypassing identity verification for local testing

use std::env;

/// Identity used for every request while dev mode is on
const DEFAULT_DEV_IDENTITY: &str = "dev-identity-0000000001";

#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub identity: String,
    pub email: String,
}

impl DevModeConfig {
    pub fn from_env() -> Self {
        let enabled = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        let identity =
            env::var("DEV_IDENTITY").unwrap_or_else(|_| DEFAULT_DEV_IDENTITY.to_string());

        let email = env::var("DEV_EMAIL").unwrap_or_else(|_| "dev@test.com".to_string());

        Self {
            enabled,
            identity,
            email,
        }
    }

    /// Dev mode off; used by tests and as the production default
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            identity: DEFAULT_DEV_IDENTITY.to_string(),
            email: "dev@test.com".to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Print dev mode status on startup
pub fn print_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        println!("⚠️  🔓 DEV MODE ENABLED 🔓 ⚠️");
        println!("   Identity verification bypassed for testing");
        println!("   Dev identity: {} ({})", config.identity, config.email);
        println!("   ⚠️  DO NOT USE IN PRODUCTION ⚠️");
        println!();
    } else {
        println!("🔒 Production mode - verified identity required");
    }
}

/// CLI argument parsing for dev mode
pub fn parse_dev_mode_args<I>(args: I) -> Option<bool>
where
    I: IntoIterator<Item = String>,
{
    for arg in args {
        match arg.as_str() {
            "--dev" | "--dev-mode" => return Some(true),
            "--no-dev" | "--prod" | "--production" => return Some(false),
            _ => {}
        }
    }

    None
}

/// Override dev mode from CLI args
pub fn apply_cli_override(mut config: DevModeConfig) -> DevModeConfig {
    if let Some(cli_dev_mode) = parse_dev_mode_args(env::args()) {
        println!("🔧 CLI override: DEV_MODE = {}", cli_dev_mode);
        config.enabled = cli_dev_mode;
    }

    config
}
