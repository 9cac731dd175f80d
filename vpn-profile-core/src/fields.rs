//! Text access to automation settings by dotted path.
//!
//! Front ends edit automation settings as a flat form of text fields; this
//! table maps each form field to its place in [`AutomationSettings`].

use crate::error::StoreError;
use crate::model::AutomationSettings;

/// Every editable automation field, in form order.
pub const AUTOMATION_FIELDS: &[&str] = &[
    "GroupName",
    "GroupDesc",
    "VpnTunnelNetwork",
    "VpnLocalNetwork",
    "StaticKeyMode",
    "VpnDevType",
    "VpnTopology",
    "InterfaceDesc",
    "NamePatterns.CaPrefix",
    "NamePatterns.ServerCn",
    "NamePatterns.StaticKeyPrefix",
    "NamePatterns.InstancePrefix",
    "Lifetimes.CALifetimeDays",
    "Lifetimes.ServerCertLifetimeDays",
    "Lifetimes.ClientCertLifetimeDays",
    "Firewall.VpnListenPort",
    "Firewall.VpnProto",
];

/// Current value of `path` rendered as text.
pub fn get_automation_field(
    settings: &AutomationSettings,
    path: &str,
) -> Result<String, StoreError> {
    let value = match path {
        "GroupName" => settings.group_name.clone(),
        "GroupDesc" => settings.group_desc.clone(),
        "VpnTunnelNetwork" => settings.vpn_tunnel_network.clone(),
        "VpnLocalNetwork" => settings.vpn_local_network.clone(),
        "StaticKeyMode" => settings.static_key_mode.clone(),
        "VpnDevType" => settings.vpn_dev_type.clone(),
        "VpnTopology" => settings.vpn_topology.clone(),
        "InterfaceDesc" => settings.interface_desc.clone(),
        "NamePatterns.CaPrefix" => settings.name_patterns.ca_prefix.clone(),
        "NamePatterns.ServerCn" => settings.name_patterns.server_cn.clone(),
        "NamePatterns.StaticKeyPrefix" => settings.name_patterns.static_key_prefix.clone(),
        "NamePatterns.InstancePrefix" => settings.name_patterns.instance_prefix.clone(),
        "Lifetimes.CALifetimeDays" => settings.lifetimes.ca_days.to_string(),
        "Lifetimes.ServerCertLifetimeDays" => settings.lifetimes.server_cert_days.to_string(),
        "Lifetimes.ClientCertLifetimeDays" => settings.lifetimes.client_cert_days.to_string(),
        "Firewall.VpnListenPort" => settings.firewall.vpn_listen_port.clone(),
        "Firewall.VpnProto" => settings.firewall.vpn_proto.clone(),
        other => return Err(unknown_field(other)),
    };
    Ok(value)
}

/// Assign the trimmed `value` to `path`.
///
/// Lifetime fields must hold a non-negative integer. Nothing is changed
/// when an error is returned.
pub fn set_automation_field(
    settings: &mut AutomationSettings,
    path: &str,
    value: &str,
) -> Result<(), StoreError> {
    let value = value.trim();
    let text = value.to_string();
    match path {
        "GroupName" => settings.group_name = text,
        "GroupDesc" => settings.group_desc = text,
        "VpnTunnelNetwork" => settings.vpn_tunnel_network = text,
        "VpnLocalNetwork" => settings.vpn_local_network = text,
        "StaticKeyMode" => settings.static_key_mode = text,
        "VpnDevType" => settings.vpn_dev_type = text,
        "VpnTopology" => settings.vpn_topology = text,
        "InterfaceDesc" => settings.interface_desc = text,
        "NamePatterns.CaPrefix" => settings.name_patterns.ca_prefix = text,
        "NamePatterns.ServerCn" => settings.name_patterns.server_cn = text,
        "NamePatterns.StaticKeyPrefix" => settings.name_patterns.static_key_prefix = text,
        "NamePatterns.InstancePrefix" => settings.name_patterns.instance_prefix = text,
        "Lifetimes.CALifetimeDays" => settings.lifetimes.ca_days = parse_days(path, value)?,
        "Lifetimes.ServerCertLifetimeDays" => {
            settings.lifetimes.server_cert_days = parse_days(path, value)?
        }
        "Lifetimes.ClientCertLifetimeDays" => {
            settings.lifetimes.client_cert_days = parse_days(path, value)?
        }
        "Firewall.VpnListenPort" => settings.firewall.vpn_listen_port = text,
        "Firewall.VpnProto" => settings.firewall.vpn_proto = text,
        other => return Err(unknown_field(other)),
    }
    Ok(())
}

fn parse_days(path: &str, value: &str) -> Result<u32, StoreError> {
    let field = path.rsplit('.').next().unwrap_or(path);
    value
        .parse::<u32>()
        .map_err(|_| StoreError::validation(field, format!("Field '{field}' must be an integer")))
}

fn unknown_field(path: &str) -> StoreError {
    StoreError::validation(path, "unknown automation field")
}
