use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::tempdir;
use vpn_profile_core::{AutomationSettings, ConfigManager, ConnectionSettings, StorePaths};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
        .join(path)
}

fn load_primary(dir: &Path, fixture_name: &str) -> ConfigManager {
    let paths = StorePaths::in_dir(dir);
    fs::copy(fixture(fixture_name), &paths.primary).expect("copy fixture");
    ConfigManager::load(paths)
}

fn stored(dir: &Path) -> Value {
    let raw = fs::read_to_string(StorePaths::in_dir(dir).primary).expect("primary store");
    serde_json::from_str(&raw).expect("valid JSON")
}

#[test]
fn flat_single_profile_becomes_one_pair() {
    let dir = tempdir().expect("tempdir");
    let manager = load_primary(dir.path(), "gen_a.json");

    let opnsense = manager.list_opnsense_profiles();
    let users = manager.list_user_profiles();
    assert_eq!(opnsense.len(), 1);
    assert_eq!(users.len(), 1);
    assert_eq!(opnsense[0].id, "x");
    assert_eq!(opnsense[0].name, "N");
    assert_eq!(users[0].name, "N");
    assert_ne!(users[0].id, "x");

    let automation = &opnsense[0].settings.automation;
    assert_eq!(automation.group_name, "office-vpn");
    assert_eq!(automation.name_patterns.ca_prefix, "OfficeCA");
    assert_eq!(automation.name_patterns.server_cn, "AutoVPN_Gateway");
    assert_eq!(automation.lifetimes.ca_days, 1825);
    assert_eq!(automation.lifetimes.server_cert_days, 3650);
    assert_eq!(automation.lifetimes.client_cert_days, 365);
    assert_eq!(automation.firewall.vpn_proto, "udp4");
    assert_eq!(opnsense[0].settings.connection, ConnectionSettings::default());

    let names: Vec<&str> = users[0].users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);
    assert_eq!(users[0].users[1].full_name, "Bob Example");

    assert_eq!(manager.selected_opnsense_profile_id(), Some("x"));
}

#[test]
fn migration_rewrites_primary_store_once() {
    let dir = tempdir().expect("tempdir");
    let manager = load_primary(dir.path(), "gen_a.json");

    let on_disk = stored(dir.path());
    assert!(on_disk.get("opnsense_profiles").is_some());
    assert!(on_disk.get("user_profiles").is_some());
    assert!(on_disk.get("settings").is_none());

    let user_profile_id = manager.list_user_profiles()[0].id.clone();
    let reloaded = ConfigManager::load(StorePaths::in_dir(dir.path()));
    assert_eq!(reloaded.list_user_profiles()[0].id, user_profile_id);
}

#[test]
fn single_axis_bundles_split_per_axis() {
    let dir = tempdir().expect("tempdir");
    let manager = load_primary(dir.path(), "gen_b.json");

    let opnsense: Vec<(&str, &str)> = manager
        .list_opnsense_profiles()
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();
    assert_eq!(
        opnsense,
        vec![
            ("hq-0001", "Headquarters"),
            ("branch-0002", "Branch"),
            ("branch-0003", "branch (copy)")
        ]
    );
    let user_names: Vec<&str> = manager
        .list_user_profiles()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(user_names, vec!["Headquarters", "Branch", "branch (copy)"]);

    let hq = manager.get_opnsense_profile("hq-0001").expect("hq");
    assert_eq!(hq.settings.connection.api_key, "hq-key");
    assert_eq!(hq.settings.connection.ssh_user, "admin");
    assert_eq!(hq.settings.connection.ssh_pass, "");
    assert_eq!(hq.settings.automation.group_name, "hq-vpn");
    assert_eq!(hq.settings.automation.firewall.vpn_listen_port, "1195");
    assert_eq!(hq.settings.automation.vpn_topology, "subnet");

    let branch = manager.get_opnsense_profile("branch-0002").expect("branch");
    assert_eq!(branch.settings.automation, AutomationSettings::default());
    assert_eq!(manager.list_user_profiles()[1].users.len(), 2);

    assert_eq!(manager.selected_opnsense_profile_id(), Some("branch-0002"));
    assert_eq!(
        manager.selected_user_profile_id(),
        Some(manager.list_user_profiles()[0].id.as_str())
    );
}

#[test]
fn current_store_is_backfilled_without_rewrite() {
    let dir = tempdir().expect("tempdir");
    let paths = StorePaths::in_dir(dir.path());
    fs::copy(fixture("current.json"), &paths.primary).expect("copy fixture");
    let before = fs::read_to_string(&paths.primary).expect("read");

    let manager = ConfigManager::load(paths.clone());
    assert_eq!(fs::read_to_string(&paths.primary).expect("read"), before);

    let lab = manager.get_opnsense_profile("opn-1").expect("lab");
    assert_eq!(lab.settings.automation.lifetimes.ca_days, 730);
    assert_eq!(lab.settings.automation.lifetimes.client_cert_days, 3650);
    assert_eq!(
        lab.settings.automation.extra.get("CustomHook"),
        Some(&Value::String("post-setup.ps1".to_string()))
    );

    let production = manager.get_opnsense_profile("opn-2").expect("production");
    assert_eq!(production.settings.connection, ConnectionSettings::default());

    assert_eq!(manager.selected_opnsense_profile_id(), Some("opn-2"));
    assert_eq!(manager.selected_user_profile_id(), Some("up-1"));
}

#[test]
fn legacy_split_files_fan_out_shared_settings_and_users() {
    let dir = tempdir().expect("tempdir");
    let paths = StorePaths::in_dir(dir.path());
    fs::copy(fixture("legacy/config.profiles.json"), &paths.legacy_profiles).expect("copy");
    fs::copy(fixture("legacy/config.settings.json"), &paths.legacy_settings).expect("copy");
    fs::copy(fixture("legacy/config.users.json"), &paths.legacy_users).expect("copy");

    let manager = ConfigManager::load(paths.clone());
    assert!(paths.primary.exists());

    let opnsense = manager.list_opnsense_profiles();
    assert_eq!(opnsense.len(), 2);
    assert_eq!(opnsense[0].name, "Main Office");
    assert_eq!(opnsense[0].settings.connection.ssh_pass, "pw");
    assert_eq!(opnsense[1].name, "Warehouse");
    assert_eq!(opnsense[1].settings.connection.ssh_host, "warehouse.example.net");
    assert_eq!(opnsense[1].settings.connection.ssh_user, "root");
    for profile in opnsense {
        assert_eq!(profile.settings.automation.group_name, "legacy-vpn");
        assert_eq!(profile.settings.automation.lifetimes.server_cert_days, 825);
    }

    let users = manager.list_user_profiles();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Main Office");
    assert_eq!(users[0].users, users[1].users);
    assert_eq!(users[0].users[0].username, "frank");
    assert_eq!(users[0].users[1].email, "grace@example.com");
}

#[test]
fn malformed_primary_store_starts_fresh() {
    let dir = tempdir().expect("tempdir");
    let paths = StorePaths::in_dir(dir.path());
    fs::write(&paths.primary, "{ this is not json").expect("write");
    fs::copy(fixture("legacy/config.users.json"), &paths.legacy_users).expect("copy");

    let manager = ConfigManager::load(paths);
    assert_eq!(manager.list_opnsense_profiles().len(), 1);
    assert_eq!(manager.list_opnsense_profiles()[0].name, "Default");
    assert!(manager.list_user_profiles()[0].users.is_empty());
}

#[test]
fn damaged_entries_are_skipped_without_losing_their_neighbours() {
    let dir = tempdir().expect("tempdir");
    let manager = load_primary(dir.path(), "partially_damaged.json");

    let names: Vec<&str> = manager
        .list_opnsense_profiles()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "Bravo"]);
    assert_eq!(manager.selected_opnsense_profile_id(), Some("opn-b"));

    let lifetimes = &manager.list_opnsense_profiles()[0].settings.automation.lifetimes;
    assert_eq!(lifetimes.ca_days, 9999);
    assert_eq!(lifetimes.server_cert_days, 3650);

    let staff = manager.get_user_profile("up-a").expect("user profile");
    assert_eq!(manager.list_user_profiles().len(), 1);
    let usernames: Vec<&str> = staff.users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(usernames, vec!["alice", "bob"]);
}
