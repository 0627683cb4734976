//! End-to-end scenarios run through the agent with fake probes.

use std::sync::atomic::Ordering;

use cntrl::core::control::{MediaAction, PowerAction};
use cntrl::core::telemetry::DiskStats;
use cntrl::{CntrlError, Config};

use super::fakes::{sample, FakeSystem};

const MB: u64 = 1024 * 1024;

#[test]
fn test_disk_half_used_reports_fifty_percent() {
    let h = FakeSystem {
        disks: Some(vec![DiskStats::new(
            "/dev/sda1".to_string(),
            "ext4".to_string(),
            "/".to_string(),
            500,
            250,
            250,
        )]),
        ..Default::default()
    }
    .build(Config::default());

    let disks = h.agent.list_disks().unwrap();
    assert_eq!(disks.len(), 1);
    assert_eq!(disks[0].used_percent, 50.0);

    let json = serde_json::to_value(&disks[0]).unwrap();
    assert_eq!(json["usedPercent"], 50.0);
    assert_eq!(json["type"], "ext4");
}

#[test]
fn test_browser_processes_grouped_by_name() {
    let h = FakeSystem {
        processes: vec![
            sample(101, "chrome", 100 * MB, 2.0),
            sample(102, "/opt/google/chrome/chrome", 200 * MB, 3.0),
            sample(103, "chrome", 300 * MB, 10.0),
            sample(200, "code", 250 * MB, 1.0),
        ],
        ..Default::default()
    }
    .build(Config::default());

    let processes = h.agent.list_processes().unwrap();
    assert_eq!(processes.len(), 2);

    let chrome = &processes[0];
    assert_eq!(chrome.name, "chrome");
    assert_eq!(chrome.count, 3);
    assert_eq!(chrome.memory, 600 * MB);
    assert_eq!(chrome.memory_mb, 600.0);
    assert_eq!(chrome.cpu_time, 15.0);
    assert_eq!(processes[1].name, "code");
}

#[test]
fn test_unknown_media_action_rejected_without_dispatch() {
    let h = FakeSystem::default().build(Config::default());

    let err = h.agent.control_media_str("rewind").unwrap_err();
    assert!(matches!(err, CntrlError::UnknownAction(ref a) if a == "rewind"));
    assert!(h.media.sent.lock().unwrap().is_empty());

    h.agent.control_media_str("next").unwrap();
    assert_eq!(*h.media.sent.lock().unwrap(), vec![MediaAction::Next]);
}

#[test]
fn test_shutdown_disabled_is_forbidden_and_never_dispatched() {
    let h = FakeSystem::default().build(Config::default());

    let err = h.agent.issue_power(PowerAction::Shutdown).unwrap_err();
    assert!(err.is_forbidden());
    assert_eq!(err.to_string(), "Shutdown feature is disabled");
    assert!(h.power.issued.lock().unwrap().is_empty());
}

#[test]
fn test_missing_gpu_keeps_rest_of_snapshot() {
    let h = FakeSystem {
        gpu: None,
        ..Default::default()
    }
    .build(Config::default());

    let info = h.agent.system_info().unwrap();
    assert!(info.gpu.is_none());
    assert_eq!(info.cpu.manufacturer, "Intel");
    assert_eq!(info.disks.len(), 1);
    assert!(info.memory.total > 0);

    let json = serde_json::to_value(&info).unwrap();
    assert!(json["gpu"].is_null());
}

#[test]
fn test_failing_memory_probe_zeroes_only_its_section() {
    let h = FakeSystem {
        memory: None,
        ..Default::default()
    }
    .build(Config::default());

    let usage = h.agent.system_usage().unwrap();
    assert_eq!(usage.memory.used, 0);
    assert_eq!(usage.memory.used_percent, 0.0);
    assert_eq!(usage.disks.len(), 1);
    assert_eq!(usage.uptime, 3_600);

    // The per-kind read still surfaces the failure.
    assert!(h.agent.memory_stats().is_err());
}

#[test]
fn test_failing_disk_enumeration_yields_empty_list() {
    let h = FakeSystem {
        disks: None,
        ..Default::default()
    }
    .build(Config::default());

    assert!(h.agent.list_disks().unwrap().is_empty());
    assert!(h.agent.system_stats().unwrap().disks.is_empty());
    assert!(h.calls.disks.load(Ordering::SeqCst) >= 1);
}
