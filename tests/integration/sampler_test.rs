use std::sync::atomic::Ordering;
use std::time::Duration;

use cntrl::core::telemetry::CpuLoadSampler;
use cntrl::Config;

use super::fakes::FakeSystem;

#[tokio::test]
async fn test_sampler_feeds_agent_usage() {
    let h = FakeSystem::default().build(Config::default());
    let cpu = &h.agent.telemetry().cpu;
    let mut load = cpu.subscribe_load();

    let sampler =
        CpuLoadSampler::spawn(&tokio::runtime::Handle::current(), cpu, Duration::from_secs(60));
    tokio::time::timeout(Duration::from_secs(5), load.changed())
        .await
        .unwrap()
        .unwrap();
    sampler.shutdown().await;

    let usage = h.agent.system_usage().unwrap();
    assert_eq!(usage.cpu.current_load, 25.0);
    assert_eq!(usage.cpu.current_speed, 3.6);
    assert_eq!(h.calls.cpu.load(Ordering::SeqCst), 1);
}
