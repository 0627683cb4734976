//! Display adapter inventory (WMI on Windows), used for vendor lookups
//! when no vendor tool is present.

use crate::core::telemetry::gpu::GpuBackend;
use crate::core::telemetry::GpuStats;
use crate::error::Result;

/// One installed display adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoAdapter {
    pub name: String,
    pub compatibility: Option<String>,
    pub ram_bytes: Option<u64>,
}

pub trait AdapterEnumerator: Send + Sync {
    fn adapters(&self) -> Result<Vec<VideoAdapter>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterVendor {
    Amd,
    Intel,
}

impl AdapterVendor {
    fn label(&self) -> &'static str {
        match self {
            AdapterVendor::Amd => "AMD",
            AdapterVendor::Intel => "Intel",
        }
    }

    fn matches(&self, adapter: &VideoAdapter) -> bool {
        let name = adapter.name.to_lowercase();
        let compat = adapter
            .compatibility
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        match self {
            AdapterVendor::Amd => {
                name.contains("amd")
                    || name.contains("radeon")
                    || compat.contains("amd")
                    || compat.contains("advanced micro devices")
            }
            AdapterVendor::Intel => name.contains("intel") || compat.contains("intel"),
        }
    }
}

/// Identity of the first adapter from `vendor`. Dynamic readings are not
/// available from an inventory and stay absent.
pub fn find_vendor_adapter(adapters: &[VideoAdapter], vendor: AdapterVendor) -> Option<GpuStats> {
    adapters.iter().find(|a| vendor.matches(a)).map(|adapter| {
        let mut stats = GpuStats::identity(vendor.label(), adapter.name.trim());
        stats.vram = adapter
            .ram_bytes
            .filter(|bytes| *bytes > 0)
            .map(|bytes| bytes / (1024 * 1024));
        stats
    })
}

/// Backend that reports the first adapter of one vendor from an inventory.
pub struct VendorAdapterBackend {
    vendor: AdapterVendor,
    inventory: Box<dyn AdapterEnumerator>,
}

impl VendorAdapterBackend {
    pub fn new(vendor: AdapterVendor, inventory: Box<dyn AdapterEnumerator>) -> Self {
        Self { vendor, inventory }
    }
}

impl GpuBackend for VendorAdapterBackend {
    fn name(&self) -> &'static str {
        match self.vendor {
            AdapterVendor::Amd => "adapter-amd",
            AdapterVendor::Intel => "adapter-intel",
        }
    }

    fn detect(&self) -> Result<Option<GpuStats>> {
        Ok(find_vendor_adapter(&self.inventory.adapters()?, self.vendor))
    }
}

#[cfg(windows)]
mod wmi_inventory {
    use serde::Deserialize;
    use wmi::WMIConnection;

    use super::{AdapterEnumerator, VideoAdapter};
    use crate::error::{CntrlError, Result};

    #[derive(Deserialize, Debug)]
    #[serde(rename = "Win32_VideoController")]
    #[serde(rename_all = "PascalCase")]
    struct Win32VideoController {
        name: Option<String>,
        adapter_compatibility: Option<String>,
        #[serde(rename = "AdapterRAM")]
        adapter_ram: Option<u32>,
    }

    /// `Win32_VideoController` via WMI.
    #[derive(Debug, Default)]
    pub struct WmiAdapterEnumerator;

    impl AdapterEnumerator for WmiAdapterEnumerator {
        fn adapters(&self) -> Result<Vec<VideoAdapter>> {
            let wmi_con = WMIConnection::new()
                .map_err(|e| CntrlError::other(format!("Failed to connect to WMI: {}", e)))?;

            let controllers: Vec<Win32VideoController> = wmi_con
                .query()
                .map_err(|e| CntrlError::other(format!("WMI query failed: {}", e)))?;

            Ok(controllers
                .into_iter()
                .filter_map(|c| {
                    Some(VideoAdapter {
                        name: c.name?,
                        compatibility: c.adapter_compatibility,
                        ram_bytes: c.adapter_ram.map(u64::from),
                    })
                })
                .collect())
        }
    }
}

#[cfg(windows)]
pub use wmi_inventory::WmiAdapterEnumerator;
