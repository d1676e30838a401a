use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use userkey_authz::DEFAULT_KEY_BASE_URL;

// Checker configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub key_base_url: String,
    pub clock_skew_secs: u64,
    pub unknown_key_policy: UnknownKeyPolicy,
}

/// What to do with the sentinel "unknown" instance key: pass it through
/// without an opinion (the lenient default) or deny it outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    Passthrough,
    Deny,
}

impl UnknownKeyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownKeyPolicy::Passthrough => "passthrough",
            UnknownKeyPolicy::Deny => "deny",
        }
    }
}

impl std::str::FromStr for UnknownKeyPolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "passthrough" => Ok(UnknownKeyPolicy::Passthrough),
            "deny" => Ok(UnknownKeyPolicy::Deny),
            other => anyhow::bail!("unknown instance-key policy {other:?}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CheckerConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    key_base_url: Option<String>,
    clock_skew_secs: Option<u64>,
    unknown_key_policy: Option<UnknownKeyPolicy>,
}

impl CheckerConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("USERKEY_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9070".to_string())
            .parse()
            .with_context(|| "parse USERKEY_BIND")?;
        let metrics_bind = std::env::var("USERKEY_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse USERKEY_METRICS_BIND")?;
        let key_base_url = std::env::var("USERKEY_KEY_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_KEY_BASE_URL.to_string());
        let clock_skew_secs = std::env::var("USERKEY_CLOCK_SKEW_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .with_context(|| "parse USERKEY_CLOCK_SKEW_SECS")?;
        let unknown_key_policy = std::env::var("USERKEY_UNKNOWN_KEY_POLICY")
            .unwrap_or_else(|_| "passthrough".to_string())
            .parse()
            .with_context(|| "parse USERKEY_UNKNOWN_KEY_POLICY")?;
        Ok(Self {
            bind_addr,
            metrics_bind,
            key_base_url,
            clock_skew_secs,
            unknown_key_policy,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("USERKEY_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read USERKEY_CONFIG: {path}"))?;
            let override_cfg: CheckerConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse checker config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.key_base_url {
                config.key_base_url = value;
            }
            if let Some(value) = override_cfg.clock_skew_secs {
                config.clock_skew_secs = value;
            }
            if let Some(value) = override_cfg.unknown_key_policy {
                config.unknown_key_policy = value;
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::set_var(key, value);
            }
            Self { key, prev }
        }

        fn unset(key: &'static str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::remove_var(key);
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.prev {
                Some(value) => unsafe {
                    std::env::set_var(self.key, value);
                },
                None => unsafe {
                    std::env::remove_var(self.key);
                },
            }
        }
    }

    #[test]
    #[serial]
    fn from_env_defaults() {
        let _g1 = EnvGuard::unset("USERKEY_BIND");
        let _g2 = EnvGuard::unset("USERKEY_METRICS_BIND");
        let _g3 = EnvGuard::unset("USERKEY_KEY_BASE_URL");
        let _g4 = EnvGuard::unset("USERKEY_CLOCK_SKEW_SECS");
        let _g5 = EnvGuard::unset("USERKEY_UNKNOWN_KEY_POLICY");

        let config = CheckerConfig::from_env().expect("config");
        assert_eq!(config.bind_addr.port(), 9070);
        assert_eq!(config.metrics_bind.port(), 8080);
        assert_eq!(config.key_base_url, DEFAULT_KEY_BASE_URL);
        assert_eq!(config.clock_skew_secs, 60);
        assert_eq!(config.unknown_key_policy, UnknownKeyPolicy::Passthrough);
    }

    #[test]
    #[serial]
    fn from_env_reads_overrides() {
        let _g1 = EnvGuard::set("USERKEY_BIND", "127.0.0.1:7000");
        let _g2 = EnvGuard::set("USERKEY_KEY_BASE_URL", "http://127.0.0.1:9999");
        let _g3 = EnvGuard::set("USERKEY_CLOCK_SKEW_SECS", "0");
        let _g4 = EnvGuard::set("USERKEY_UNKNOWN_KEY_POLICY", "deny");

        let config = CheckerConfig::from_env().expect("config");
        assert_eq!(config.bind_addr.port(), 7000);
        assert_eq!(config.key_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.clock_skew_secs, 0);
        assert_eq!(config.unknown_key_policy, UnknownKeyPolicy::Deny);
    }

    #[test]
    #[serial]
    fn from_env_rejects_bad_policy() {
        let _g1 = EnvGuard::set("USERKEY_UNKNOWN_KEY_POLICY", "maybe");
        let err = CheckerConfig::from_env().err().expect("bad policy");
        assert!(err.to_string().contains("USERKEY_UNKNOWN_KEY_POLICY"));
    }

    #[test]
    #[serial]
    fn yaml_override_takes_precedence() {
        let path = std::env::temp_dir().join("userkey-checker-config-test.yaml");
        fs::write(
            &path,
            "bind_addr: \"127.0.0.1:7100\"\nunknown_key_policy: deny\n",
        )
        .expect("write yaml");
        let _g1 = EnvGuard::unset("USERKEY_BIND");
        let _g2 = EnvGuard::set("USERKEY_CONFIG", path.to_str().expect("path"));

        let config = CheckerConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.bind_addr.port(), 7100);
        assert_eq!(config.unknown_key_policy, UnknownKeyPolicy::Deny);

        let _ = fs::remove_file(&path);
    }
}
