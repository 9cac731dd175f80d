use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::defaults::{self, DEFAULT_PROFILE_NAME};
use crate::lenient;

use super::new_id;

/// API and SSH access to one firewall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConnectionSettings {
    #[serde(deserialize_with = "lenient::string")]
    pub api_base_url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub api_key: String,
    #[serde(deserialize_with = "lenient::string")]
    pub api_secret: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ssh_host: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ssh_user: String,
    #[serde(deserialize_with = "lenient::string")]
    pub ssh_pass: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        use defaults::connection::*;
        Self {
            api_base_url: API_BASE_URL.to_string(),
            api_key: API_KEY.to_string(),
            api_secret: API_SECRET.to_string(),
            ssh_host: SSH_HOST.to_string(),
            ssh_user: SSH_USER.to_string(),
            ssh_pass: SSH_PASS.to_string(),
        }
    }
}

/// Connection payload for an update; absent keys reset to their default.
///
/// Keys outside the recognized set are dropped when decoding from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectionUpdate {
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub ssh_host: Option<String>,
    pub ssh_user: Option<String>,
    pub ssh_pass: Option<String>,
}

impl ConnectionUpdate {
    /// Resolve against the defaults and trim every value.
    pub fn into_settings(self) -> ConnectionSettings {
        let base = ConnectionSettings::default();
        let pick = |value: Option<String>, fallback: String| {
            value.unwrap_or(fallback).trim().to_string()
        };
        ConnectionSettings {
            api_base_url: pick(self.api_base_url, base.api_base_url),
            api_key: pick(self.api_key, base.api_key),
            api_secret: pick(self.api_secret, base.api_secret),
            ssh_host: pick(self.ssh_host, base.ssh_host),
            ssh_user: pick(self.ssh_user, base.ssh_user),
            ssh_pass: pick(self.ssh_pass, base.ssh_pass),
        }
    }
}

impl From<&ConnectionSettings> for ConnectionUpdate {
    fn from(current: &ConnectionSettings) -> Self {
        Self {
            api_base_url: Some(current.api_base_url.clone()),
            api_key: Some(current.api_key.clone()),
            api_secret: Some(current.api_secret.clone()),
            ssh_host: Some(current.ssh_host.clone()),
            ssh_user: Some(current.ssh_user.clone()),
            ssh_pass: Some(current.ssh_pass.clone()),
        }
    }
}

/// Object names generated on the firewall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NamePatterns {
    #[serde(deserialize_with = "lenient::string")]
    pub ca_prefix: String,
    #[serde(deserialize_with = "lenient::string")]
    pub server_cn: String,
    #[serde(deserialize_with = "lenient::string")]
    pub static_key_prefix: String,
    #[serde(deserialize_with = "lenient::string")]
    pub instance_prefix: String,
}

impl Default for NamePatterns {
    fn default() -> Self {
        use defaults::automation::*;
        Self {
            ca_prefix: CA_PREFIX.to_string(),
            server_cn: SERVER_CN.to_string(),
            static_key_prefix: STATIC_KEY_PREFIX.to_string(),
            instance_prefix: INSTANCE_PREFIX.to_string(),
        }
    }
}

/// Certificate lifetimes in days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LifetimesRecord")]
pub struct Lifetimes {
    #[serde(rename = "CALifetimeDays")]
    pub ca_days: u32,
    #[serde(rename = "ServerCertLifetimeDays")]
    pub server_cert_days: u32,
    #[serde(rename = "ClientCertLifetimeDays")]
    pub client_cert_days: u32,
}

/// On-disk lifetimes; each missing or unreadable count falls back on its own.
#[derive(Deserialize)]
struct LifetimesRecord {
    #[serde(rename = "CALifetimeDays", default, deserialize_with = "lenient::opt_day_count")]
    ca_days: Option<u32>,
    #[serde(
        rename = "ServerCertLifetimeDays",
        default,
        deserialize_with = "lenient::opt_day_count"
    )]
    server_cert_days: Option<u32>,
    #[serde(
        rename = "ClientCertLifetimeDays",
        default,
        deserialize_with = "lenient::opt_day_count"
    )]
    client_cert_days: Option<u32>,
}

impl From<LifetimesRecord> for Lifetimes {
    fn from(record: LifetimesRecord) -> Self {
        let defaults = Lifetimes::default();
        Self {
            ca_days: record.ca_days.unwrap_or(defaults.ca_days),
            server_cert_days: record.server_cert_days.unwrap_or(defaults.server_cert_days),
            client_cert_days: record.client_cert_days.unwrap_or(defaults.client_cert_days),
        }
    }
}

impl Default for Lifetimes {
    fn default() -> Self {
        use defaults::automation::*;
        Self {
            ca_days: CA_LIFETIME_DAYS,
            server_cert_days: SERVER_CERT_LIFETIME_DAYS,
            client_cert_days: CLIENT_CERT_LIFETIME_DAYS,
        }
    }
}

/// OpenVPN listener on the firewall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct FirewallSettings {
    #[serde(deserialize_with = "lenient::string")]
    pub vpn_listen_port: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vpn_proto: String,
}

impl Default for FirewallSettings {
    fn default() -> Self {
        use defaults::automation::*;
        Self {
            vpn_listen_port: VPN_LISTEN_PORT.to_string(),
            vpn_proto: VPN_PROTO.to_string(),
        }
    }
}

/// Parameters driving certificate and tunnel provisioning.
///
/// Keys the editor does not know are kept in `extra` and written back
/// unchanged, so the scripts can grow settings ahead of the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AutomationSettings {
    #[serde(deserialize_with = "lenient::string")]
    pub group_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub group_desc: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vpn_tunnel_network: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vpn_local_network: String,
    #[serde(deserialize_with = "lenient::string")]
    pub static_key_mode: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vpn_dev_type: String,
    #[serde(deserialize_with = "lenient::string")]
    pub vpn_topology: String,
    #[serde(deserialize_with = "lenient::string")]
    pub interface_desc: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub name_patterns: NamePatterns,
    #[serde(deserialize_with = "lenient::or_default")]
    pub lifetimes: Lifetimes,
    #[serde(deserialize_with = "lenient::or_default")]
    pub firewall: FirewallSettings,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        use defaults::automation::*;
        Self {
            group_name: GROUP_NAME.to_string(),
            group_desc: GROUP_DESC.to_string(),
            vpn_tunnel_network: VPN_TUNNEL_NETWORK.to_string(),
            vpn_local_network: VPN_LOCAL_NETWORK.to_string(),
            static_key_mode: STATIC_KEY_MODE.to_string(),
            vpn_dev_type: VPN_DEV_TYPE.to_string(),
            vpn_topology: VPN_TOPOLOGY.to_string(),
            interface_desc: INTERFACE_DESC.to_string(),
            name_patterns: NamePatterns::default(),
            lifetimes: Lifetimes::default(),
            firewall: FirewallSettings::default(),
            extra: BTreeMap::new(),
        }
    }
}

/// Connection plus automation settings of one OPNsense profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    #[serde(deserialize_with = "lenient::or_default")]
    pub connection: ConnectionSettings,
    #[serde(deserialize_with = "lenient::or_default")]
    pub automation: AutomationSettings,
}

/// A named firewall target: credentials plus automation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OpnsenseProfileRecord")]
pub struct OpnsenseProfile {
    pub id: String,
    pub name: String,
    pub settings: ProfileSettings,
}

impl OpnsenseProfile {
    /// New profile with a fresh id.
    pub fn new(name: impl Into<String>, settings: ProfileSettings) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            settings,
        }
    }

    /// Independent copy, optionally under a new identity and name.
    pub fn clone_with(&self, id: Option<String>, name: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| self.id.clone()),
            name: name.unwrap_or_else(|| self.name.clone()),
            settings: self.settings.clone(),
        }
    }
}

/// On-disk shape: every key optional, blanks replaced on conversion.
#[derive(Deserialize)]
struct OpnsenseProfileRecord {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    settings: ProfileSettings,
}

impl From<OpnsenseProfileRecord> for OpnsenseProfile {
    fn from(record: OpnsenseProfileRecord) -> Self {
        Self {
            id: record.id.filter(|id| !id.is_empty()).unwrap_or_else(new_id),
            name: record
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string()),
            settings: record.settings,
        }
    }
}
