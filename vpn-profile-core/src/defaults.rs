//! Baseline values for new entities and for backfilling older files.
//!
//! These are only ever copied out: the `Default` impls in [`crate::model`]
//! build fresh owned values from them, so no two profiles share state.

/// Name used when a profile name is missing or blank.
pub const DEFAULT_PROFILE_NAME: &str = "Default";

/// Suffix format used when duplicating a profile under a taken name.
pub const DEFAULT_COPY_SUFFIX: &str = " (copy)";

/// API/SSH connection defaults for a new OPNsense profile.
pub mod connection {
    pub const API_BASE_URL: &str = "https://firewall.example.com:4443";
    pub const API_KEY: &str = "";
    pub const API_SECRET: &str = "";
    pub const SSH_HOST: &str = "firewall.example.com";
    pub const SSH_USER: &str = "root";
    pub const SSH_PASS: &str = "";
}

/// Automation defaults (group, tunnel, naming, lifetimes, listener).
pub mod automation {
    pub const GROUP_NAME: &str = "vpn-users";
    pub const GROUP_DESC: &str = "VPN users (auto-generated)";
    pub const VPN_TUNNEL_NETWORK: &str = "10.99.0.0/24";
    pub const VPN_LOCAL_NETWORK: &str = "192.168.1.0/24";
    pub const STATIC_KEY_MODE: &str = "tls-crypt";
    pub const VPN_DEV_TYPE: &str = "tun";
    pub const VPN_TOPOLOGY: &str = "subnet";
    pub const INTERFACE_DESC: &str = "VPN_TUNNEL_AUTO";

    pub const CA_PREFIX: &str = "AutoCA_VPN";
    pub const SERVER_CN: &str = "AutoVPN_Gateway";
    pub const STATIC_KEY_PREFIX: &str = "AutoTLSKey";
    pub const INSTANCE_PREFIX: &str = "AutoVPN_Server";

    pub const CA_LIFETIME_DAYS: u32 = 3650;
    pub const SERVER_CERT_LIFETIME_DAYS: u32 = 3650;
    pub const CLIENT_CERT_LIFETIME_DAYS: u32 = 3650;

    pub const VPN_LISTEN_PORT: &str = "1194";
    pub const VPN_PROTO: &str = "udp4";
}

/// Template for a brand-new VPN user.
pub mod user_template {
    pub const USERNAME: &str = "user1";
    pub const PASSWORD: &str = "changeme";
    pub const FULL_NAME: &str = "New VPN User";
    pub const EMAIL: &str = "user@example.com";
}
