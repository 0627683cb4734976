//! The agent ties telemetry and control to the live configuration.
//!
//! Every operation checks its feature flag first. A disabled feature
//! returns [`CntrlError::FeatureDisabled`] before any probe or OS command
//! runs.

use parking_lot::RwLock;
use std::sync::Arc;

use super::config::Config;
use super::control::{MediaAction, MediaActuator, MediaStatus, PowerAction, PowerActuator};
use super::telemetry::{
    AgentStatus, CpuInfo, CpuStats, CpuUsage, DiskInfo, DiskStats, DiskUsage, GpuInfo, GpuStats,
    GpuUsage, MemoryInfo, MemoryStats, MemoryUsage, ProcessAggregate, SystemInfo, SystemStats,
    SystemUsage, Telemetry,
};
use crate::error::{CntrlError, Result};

pub struct Agent {
    config: Arc<RwLock<Config>>,
    telemetry: Telemetry,
    power: Box<dyn PowerActuator>,
    media: Box<dyn MediaActuator>,
}

impl Agent {
    pub fn new(
        config: Config,
        telemetry: Telemetry,
        power: Box<dyn PowerActuator>,
        media: Box<dyn MediaActuator>,
    ) -> Self {
        telemetry.disks.set_ttl(config.stats.disk_cache_ttl());
        Self {
            config: Arc::new(RwLock::new(config)),
            telemetry,
            power,
            media,
        }
    }

    /// An agent wired to this machine's probes and actuators.
    pub fn native(config: Config) -> Self {
        Self::new(
            config,
            Telemetry::new(crate::platform::native_probes()),
            crate::platform::native_power(),
            crate::platform::native_media(),
        )
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Shared handle to the live configuration. Changes made through it
    /// are seen by the next operation.
    pub fn config_handle(&self) -> Arc<RwLock<Config>> {
        Arc::clone(&self.config)
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn update_config<F: FnOnce(&mut Config)>(&self, update: F) {
        update(&mut self.config.write());
    }

    fn require(enabled: bool, feature: &str) -> Result<()> {
        if enabled {
            Ok(())
        } else {
            log::info!("Rejected request: {} feature is disabled", feature);
            Err(CntrlError::feature_disabled(feature))
        }
    }

    pub fn status(&self) -> AgentStatus {
        let config = self.config();
        AgentStatus {
            status: "ok".to_string(),
            hostname: self.telemetry.hostname(config.hostname_override()),
            platform: self.telemetry.platform().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn system_info(&self) -> Result<SystemInfo> {
        let config = self.config();
        Self::require(config.features.enable_system, "System")?;
        self.apply_disk_ttl(&config);
        Ok(self
            .telemetry
            .system_info(config.hostname_override(), config.stats.gpu_enabled))
    }

    pub fn system_usage(&self) -> Result<SystemUsage> {
        let config = self.config();
        Self::require(config.features.enable_usage, "Usage")?;
        self.apply_disk_ttl(&config);
        Ok(self.telemetry.system_usage(config.stats.gpu_enabled))
    }

    pub fn system_stats(&self) -> Result<SystemStats> {
        let config = self.config();
        Self::require(config.features.enable_stats, "Stats")?;
        self.apply_disk_ttl(&config);
        Ok(self
            .telemetry
            .system_stats(config.hostname_override(), config.stats.gpu_enabled))
    }

    pub fn cpu_info(&self) -> Result<CpuInfo> {
        Self::require(self.config().features.enable_system, "System")?;
        Ok(self.telemetry.cpu.info())
    }

    pub fn cpu_usage(&self) -> Result<CpuUsage> {
        Self::require(self.config().features.enable_usage, "Usage")?;
        let cpu = &self.telemetry.cpu;
        Ok(cpu.info().usage(cpu.current_load()))
    }

    pub fn cpu_stats(&self) -> Result<CpuStats> {
        Self::require(self.config().features.enable_stats, "Stats")?;
        let cpu = &self.telemetry.cpu;
        Ok(cpu.info().with_load(cpu.current_load()))
    }

    pub fn memory_info(&self) -> Result<MemoryInfo> {
        Self::require(self.config().features.enable_system, "System")?;
        Ok(self.telemetry.memory.stats()?.info())
    }

    pub fn memory_usage(&self) -> Result<MemoryUsage> {
        Self::require(self.config().features.enable_usage, "Usage")?;
        Ok(self.telemetry.memory.stats()?.usage())
    }

    pub fn memory_stats(&self) -> Result<MemoryStats> {
        Self::require(self.config().features.enable_stats, "Stats")?;
        self.telemetry.memory.stats()
    }

    pub fn gpu_info(&self) -> Result<Option<GpuInfo>> {
        let config = self.config();
        Self::require(config.features.enable_system, "System")?;
        Ok(self.gpu_if(&config).map(|gpu| gpu.info()))
    }

    pub fn gpu_usage(&self) -> Result<Option<GpuUsage>> {
        let config = self.config();
        Self::require(config.features.enable_usage, "Usage")?;
        Ok(self.gpu_if(&config).map(|gpu| gpu.usage()))
    }

    /// `Ok(None)` when no GPU is detected or GPU stats are turned off.
    pub fn gpu_stats(&self) -> Result<Option<GpuStats>> {
        let config = self.config();
        Self::require(config.features.enable_stats, "Stats")?;
        Ok(self.gpu_if(&config))
    }

    pub fn disk_info(&self) -> Result<Vec<DiskInfo>> {
        let config = self.config();
        Self::require(config.features.enable_system, "System")?;
        self.apply_disk_ttl(&config);
        Ok(self.telemetry.disks_or_empty().iter().map(DiskStats::info).collect())
    }

    pub fn disk_usage(&self) -> Result<Vec<DiskUsage>> {
        let config = self.config();
        Self::require(config.features.enable_usage, "Usage")?;
        self.apply_disk_ttl(&config);
        Ok(self.telemetry.disks_or_empty().iter().map(DiskStats::usage).collect())
    }

    /// Every physical volume. An enumeration failure yields an empty list.
    pub fn list_disks(&self) -> Result<Vec<DiskStats>> {
        let config = self.config();
        Self::require(config.features.enable_stats, "Stats")?;
        self.apply_disk_ttl(&config);
        Ok(self.telemetry.disks_or_empty())
    }

    pub fn list_processes(&self) -> Result<Vec<ProcessAggregate>> {
        let config = self.config();
        Self::require(config.features.enable_processes, "Processes")?;
        self.telemetry.processes.list()
    }

    /// Ask the OS for a power transition. Returns once the request has been
    /// accepted, not once the transition has happened.
    pub fn issue_power(&self, action: PowerAction) -> Result<()> {
        let features = self.config().features;
        let enabled = match action {
            PowerAction::Shutdown => features.enable_shutdown,
            PowerAction::Restart => features.enable_restart,
            PowerAction::Hibernate => features.enable_hibernate,
            PowerAction::Sleep => features.enable_sleep,
        };
        Self::require(enabled, action.feature_name())?;

        log::info!("Issuing power action: {}", action);
        self.power.execute(action)
    }

    pub fn control_media(&self, action: MediaAction) -> Result<()> {
        Self::require(self.config().features.enable_media, "Media")?;
        log::debug!("Sending media action: {}", action);
        self.media.send(action)
    }

    /// Parse then dispatch a textual media action. The feature gate is
    /// checked before the action string is looked at.
    pub fn control_media_str(&self, action: &str) -> Result<()> {
        Self::require(self.config().features.enable_media, "Media")?;
        let action: MediaAction = action.parse()?;
        self.control_media(action)
    }

    pub fn media_status(&self) -> Result<MediaStatus> {
        Self::require(self.config().features.enable_media, "Media")?;
        self.media.status()
    }

    fn gpu_if(&self, config: &Config) -> Option<GpuStats> {
        if config.stats.gpu_enabled {
            self.telemetry.gpu.stats()
        } else {
            None
        }
    }

    fn apply_disk_ttl(&self, config: &Config) {
        self.telemetry.disks.set_ttl(config.stats.disk_cache_ttl());
    }
}
