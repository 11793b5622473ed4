//! Connection guard.
//!
//! The host-facing entry point: the host builds one guard at startup and calls
//! [`ConnectionGuard::check`] for every connection attempt, then admits or
//! rejects the client based on the returned [`Verdict`].

use std::net::IpAddr;

use crate::config::{GuardConfig, TableFailureMode};
use crate::geo::{RangeTable, TableLoader};
use crate::policy::AccessPolicy;
use crate::types::Decision;

/// Decision plus the message the host should show a denied client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,
    /// Deny message, `None` when the connection is allowed
    pub message: Option<String>,
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        self.decision.is_allowed()
    }
}

/// Configured guard. `policy` is `None` when the guard is disabled.
#[derive(Debug, Clone)]
pub struct ConnectionGuard {
    policy: Option<AccessPolicy>,
    deny_message: String,
    verbose: bool,
}

impl ConnectionGuard {
    /// Build the guard from configuration, loading the range table once.
    ///
    /// Never fails: a table that cannot be loaded is reported and handled
    /// according to `on-table-error`.
    pub fn from_config(config: &GuardConfig, loader: &dyn TableLoader) -> Self {
        let verbose = config.is_verbose();

        if config.disable {
            tracing::info!("IP guard disabled in config, allowing every connection");
            return Self::disabled(config);
        }

        if config.is_outdated() {
            tracing::warn!(
                found = config.config_version,
                expected = crate::config::CURRENT_CONFIG_VERSION,
                "outdated config detected, please update or regenerate it"
            );
        }

        let table = match loader.load_table() {
            Ok(table) => {
                if verbose {
                    tracing::info!(ranges = table.len(), "IP ranges ready");
                } else {
                    tracing::debug!(ranges = table.len(), "IP ranges ready");
                }
                table
            }
            Err(e) => match config.on_table_error {
                TableFailureMode::Deny => {
                    tracing::error!(error = %e, "failed to load IP ranges, denying all non-excluded connections");
                    RangeTable::empty()
                }
                TableFailureMode::Allow => {
                    tracing::error!(error = %e, "failed to load IP ranges, guard disabled");
                    return Self::disabled(config);
                }
            },
        };

        let policy = AccessPolicy::builder()
            .allowed_countries(&config.allowed_countries)
            .excluded_addresses(&config.excluded_ips)
            .table(table)
            .verbose(verbose)
            .build();

        Self::with_policy(policy, config)
    }

    /// Wrap an already built policy
    pub fn with_policy(policy: AccessPolicy, config: &GuardConfig) -> Self {
        Self {
            policy: Some(policy),
            deny_message: config.deny_message.clone(),
            verbose: config.is_verbose(),
        }
    }

    fn disabled(config: &GuardConfig) -> Self {
        Self {
            policy: None,
            deny_message: config.deny_message.clone(),
            verbose: config.is_verbose(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.policy.is_some()
    }

    pub fn policy(&self) -> Option<&AccessPolicy> {
        self.policy.as_ref()
    }

    /// Check a connection from the given textual address
    pub fn check(&self, address: &str) -> Verdict {
        let decision = match &self.policy {
            Some(policy) => policy.evaluate(address),
            None => Decision::Allow,
        };
        self.verdict(address, decision)
    }

    /// Check a connection from a socket peer address
    pub fn check_ip(&self, ip: IpAddr) -> Verdict {
        let decision = match &self.policy {
            Some(policy) => policy.evaluate_ip(ip),
            None => Decision::Allow,
        };
        self.verdict(&ip.to_string(), decision)
    }

    fn verdict(&self, address: &str, decision: Decision) -> Verdict {
        let message = match decision.deny_reason() {
            None => None,
            Some(reason) => {
                if self.verbose {
                    tracing::info!(address, %reason, "denied connection");
                } else {
                    tracing::debug!(address, %reason, "denied connection");
                }
                Some(self.deny_message.clone())
            }
        };
        Verdict { decision, message }
    }
}
