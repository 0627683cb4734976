use std::sync::atomic::Ordering;
use std::time::Duration;

use cntrl::core::control::{MediaStatus, PlaybackState, PowerAction};
use cntrl::core::telemetry::{GpuStats, MemoryStats};
use cntrl::Config;

use super::fakes::{FakeSystem, GIB};

fn all_disabled() -> Config {
    let mut config = Config::default();
    let f = &mut config.features;
    f.enable_shutdown = false;
    f.enable_restart = false;
    f.enable_hibernate = false;
    f.enable_sleep = false;
    f.enable_system = false;
    f.enable_usage = false;
    f.enable_stats = false;
    f.enable_media = false;
    f.enable_processes = false;
    config
}

fn rtx() -> GpuStats {
    GpuStats {
        vendor: "NVIDIA".to_string(),
        model: "NVIDIA GeForce RTX 4070 Ti SUPER".to_string(),
        vram: Some(16376),
        vram_used: Some(12.5),
        temperature_gpu: Some(41),
        utilization_gpu: Some(3),
    }
}

#[test]
fn test_disabled_features_touch_no_probe() {
    let h = FakeSystem::default().build(all_disabled());
    let a = &h.agent;

    assert!(a.system_info().unwrap_err().is_forbidden());
    assert!(a.system_usage().unwrap_err().is_forbidden());
    assert!(a.system_stats().unwrap_err().is_forbidden());
    assert!(a.cpu_info().unwrap_err().is_forbidden());
    assert!(a.cpu_usage().unwrap_err().is_forbidden());
    assert!(a.cpu_stats().unwrap_err().is_forbidden());
    assert!(a.memory_info().unwrap_err().is_forbidden());
    assert!(a.memory_usage().unwrap_err().is_forbidden());
    assert!(a.memory_stats().unwrap_err().is_forbidden());
    assert!(a.gpu_info().unwrap_err().is_forbidden());
    assert!(a.gpu_usage().unwrap_err().is_forbidden());
    assert!(a.gpu_stats().unwrap_err().is_forbidden());
    assert!(a.disk_info().unwrap_err().is_forbidden());
    assert!(a.disk_usage().unwrap_err().is_forbidden());
    assert!(a.list_disks().unwrap_err().is_forbidden());
    assert!(a.list_processes().unwrap_err().is_forbidden());
    assert!(a.media_status().unwrap_err().is_forbidden());
    assert!(a.control_media_str("rewind").unwrap_err().is_forbidden());
    for action in PowerAction::ALL {
        assert!(a.issue_power(action).unwrap_err().is_forbidden());
    }

    assert_eq!(h.calls.probes(), 0);
    assert_eq!(h.calls.media_status.load(Ordering::SeqCst), 0);
    assert!(h.power.issued.lock().unwrap().is_empty());
    assert!(h.media.sent.lock().unwrap().is_empty());
}

#[test]
fn test_power_follows_live_config() {
    let h = FakeSystem::default().build(Config::default());

    h.agent.issue_power(PowerAction::Sleep).unwrap();
    assert!(h.agent.issue_power(PowerAction::Restart).is_err());

    h.agent.update_config(|c| c.features.enable_restart = true);
    h.agent.issue_power(PowerAction::Restart).unwrap();

    assert_eq!(
        *h.power.issued.lock().unwrap(),
        vec![PowerAction::Sleep, PowerAction::Restart]
    );
}

#[test]
fn test_gpu_disabled_skips_backends() {
    let mut config = Config::default();
    config.stats.gpu_enabled = false;
    let h = FakeSystem {
        gpu: Some(rtx()),
        ..Default::default()
    }
    .build(config);

    assert!(h.agent.gpu_stats().unwrap().is_none());
    assert!(h.agent.system_usage().unwrap().gpu.is_none());
    assert_eq!(h.calls.gpu.load(Ordering::SeqCst), 0);
}

#[test]
fn test_gpu_projections() {
    let h = FakeSystem {
        gpu: Some(rtx()),
        ..Default::default()
    }
    .build(Config::default());

    let info = h.agent.gpu_info().unwrap().unwrap();
    assert_eq!(info.vendor, "NVIDIA");
    assert_eq!(info.vram, Some(16376));

    let usage = h.agent.gpu_usage().unwrap().unwrap();
    assert_eq!(usage.temperature_gpu, Some(41));
    assert_eq!(usage.vram_used, Some(12.5));

    // Detection is cached for the GPU TTL.
    assert_eq!(h.calls.gpu.load(Ordering::SeqCst), 1);
}

#[test]
fn test_memory_cached_between_reads() {
    let h = FakeSystem {
        memory: Some(MemoryStats::from_used(8 * GIB, 2 * GIB)),
        ..Default::default()
    }
    .build(Config::default());

    let first = h.agent.memory_stats().unwrap();
    let second = h.agent.memory_usage().unwrap();
    assert_eq!(first.used_percent, 25.0);
    assert_eq!(second.used, 2 * GIB);
    assert_eq!(h.calls.memory.load(Ordering::SeqCst), 1);
}

#[test]
fn test_disk_ttl_taken_from_config() {
    let mut config = Config::default();
    config.stats.disk_cache_seconds = 90;
    let h = FakeSystem::default().build(config);

    h.agent.list_disks().unwrap();
    assert_eq!(h.agent.telemetry().disks.ttl(), Duration::from_secs(90));

    h.agent.update_config(|c| c.stats.disk_cache_seconds = 0);
    h.agent.disk_usage().unwrap();
    assert_eq!(h.agent.telemetry().disks.ttl(), Duration::from_secs(30));
}

#[test]
fn test_usage_applies_configured_disk_ttl() {
    let mut config = Config::default();
    config.stats.disk_cache_seconds = 5;
    let h = FakeSystem::default().build(config);
    assert_eq!(h.agent.telemetry().disks.ttl(), Duration::from_secs(5));

    h.agent.update_config(|c| c.stats.disk_cache_seconds = 12);
    h.agent.system_usage().unwrap();
    assert_eq!(h.agent.telemetry().disks.ttl(), Duration::from_secs(12));
}

#[test]
fn test_hostname_override_and_status() {
    let h = FakeSystem::default().build(Config::default());
    let status = h.agent.status();
    assert_eq!(status.status, "ok");
    assert_eq!(status.hostname, "ROG-GT502");
    assert_eq!(status.platform, "linux");

    h.agent.update_config(|c| c.display.hostname = "living-room-pc".to_string());
    assert_eq!(h.agent.system_info().unwrap().hostname, "living-room-pc");
}

#[test]
fn test_cpu_identity_and_load_before_sampling() {
    let h = FakeSystem::default().build(Config::default());

    let info = h.agent.cpu_info().unwrap();
    assert_eq!(info.physical_cores, 8);
    assert_eq!(info.base_speed, 3.6);

    let stats = h.agent.cpu_stats().unwrap();
    assert_eq!(stats.current_load, 0.0);
    assert_eq!(h.calls.cpu.load(Ordering::SeqCst), 0);
}

#[test]
fn test_media_status_passthrough() {
    let h = FakeSystem {
        media: MediaStatus {
            status: PlaybackState::Playing,
            source: Some("Spotify".to_string()),
            title: Some("Teardrop".to_string()),
            artist: Some("Massive Attack".to_string()),
        },
        ..Default::default()
    }
    .build(Config::default());

    let status = h.agent.media_status().unwrap();
    assert_eq!(status.status, PlaybackState::Playing);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["status"], "playing");
    assert_eq!(json["artist"], "Massive Attack");
}

#[test]
fn test_media_status_with_no_player_is_stopped() {
    let h = FakeSystem::default().build(Config::default());

    let status = h.agent.media_status().unwrap();
    assert_eq!(status.status, PlaybackState::Stopped);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "stopped" }));
    assert_eq!(h.calls.media_status.load(Ordering::SeqCst), 1);
}
