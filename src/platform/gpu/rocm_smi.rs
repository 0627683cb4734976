use crate::core::telemetry::gpu::{vram_used_percent, GpuBackend};
use crate::core::telemetry::GpuStats;
use crate::error::Result;
use crate::platform::command;

use super::adapters::{find_vendor_adapter, AdapterEnumerator, AdapterVendor};

const ROCM_SMI: &str = "rocm-smi";
const DEFAULT_MODEL: &str = "AMD GPU";
const QUERY: [&str; 5] = ["--showtemp", "--showuse", "--showmeminfo", "vram", "--csv"];
const BYTES_PER_MB: u64 = 1024 * 1024;

/// Readings from one `rocm-smi --csv` device row. VRAM is in megabytes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RocmReading {
    pub temperature: Option<i64>,
    pub utilization: Option<i64>,
    pub vram_total: Option<u64>,
    pub vram_used: Option<u64>,
}

/// AMD GPU via `rocm-smi`, falling back to an adapter inventory for
/// identity when the tool is missing or reports nothing.
pub struct AmdBackend {
    inventory: Option<Box<dyn AdapterEnumerator>>,
}

impl AmdBackend {
    pub fn new(inventory: Option<Box<dyn AdapterEnumerator>>) -> Self {
        Self { inventory }
    }

    fn from_rocm_smi() -> Result<Option<GpuStats>> {
        if !command::is_available(ROCM_SMI) {
            return Ok(None);
        }
        let csv = command::run(ROCM_SMI, &QUERY)?;
        let Some(reading) = parse_rocm_csv(&csv) else {
            return Ok(None);
        };

        let model = command::run(ROCM_SMI, &["--showproductname"])
            .ok()
            .and_then(|out| parse_rocm_product_name(&out))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mut stats = GpuStats::identity("AMD", model);
        stats.temperature_gpu = reading.temperature;
        stats.utilization_gpu = reading.utilization;
        stats.vram = reading.vram_total;
        stats.vram_used = match (reading.vram_used, reading.vram_total) {
            (Some(used), Some(total)) => vram_used_percent(used, total),
            _ => None,
        };
        Ok(Some(stats))
    }
}

impl GpuBackend for AmdBackend {
    fn name(&self) -> &'static str {
        "amd"
    }

    fn is_available(&self) -> bool {
        self.inventory.is_some() || command::is_available(ROCM_SMI)
    }

    fn detect(&self) -> Result<Option<GpuStats>> {
        match Self::from_rocm_smi() {
            Ok(Some(stats)) => return Ok(Some(stats)),
            Ok(None) => {}
            Err(e) => log::debug!("rocm-smi failed: {}", e),
        }

        match &self.inventory {
            Some(inventory) => Ok(find_vendor_adapter(&inventory.adapters()?, AdapterVendor::Amd)),
            None => Ok(None),
        }
    }
}

/// First device row of `rocm-smi --showtemp --showuse --showmeminfo vram
/// --csv`, with columns located by header name. Fractional readings are
/// rounded and VRAM bytes are converted to megabytes.
pub fn parse_rocm_csv(output: &str) -> Option<RocmReading> {
    let mut lines = output.lines().map(str::trim).filter(|line| !line.is_empty());
    let header: Vec<String> = lines
        .find(|line| line.starts_with("device,"))?
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();
    let column = |name: &str| header.iter().position(|h| h.contains(name));

    let temp = column("temperature");
    let util = column("gpu use");
    let total = column("vram total memory");
    let used = column("vram total used");

    let row: Vec<&str> = lines.next()?.split(',').map(str::trim).collect();
    let field = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(|s| s.parse::<f64>().ok());
    let megabytes = |idx: Option<usize>| field(idx).map(|bytes| bytes as u64 / BYTES_PER_MB);

    let reading = RocmReading {
        temperature: field(temp).map(|v| v.round() as i64),
        utilization: field(util).map(|v| v.round() as i64),
        vram_total: megabytes(total),
        vram_used: megabytes(used),
    };
    (reading != RocmReading::default()).then_some(reading)
}

/// Product name from `rocm-smi --showproductname`, taken from the first
/// line mentioning "Card".
pub fn parse_rocm_product_name(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains("Card"))
        .and_then(|line| line.rsplit(':').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::gpu::adapters::VideoAdapter;

    #[test]
    fn test_parse_rocm_csv() {
        let csv = "device,Temperature (Sensor edge) (C),GPU use (%)\ncard0,45.0,12\n";
        let reading = parse_rocm_csv(csv).unwrap();
        assert_eq!(reading.temperature, Some(45));
        assert_eq!(reading.utilization, Some(12));
    }

    #[test]
    fn test_parse_rocm_csv_with_vram() {
        let csv = "device,Temperature (Sensor edge) (C),GPU use (%),VRAM Total Memory (B),VRAM Total Used Memory (B)\ncard0,51.0,7,17163091968,1073741824\n";
        let reading = parse_rocm_csv(csv).unwrap();
        assert_eq!(reading.temperature, Some(51));
        assert_eq!(reading.utilization, Some(7));
        assert_eq!(reading.vram_total, Some(16368));
        assert_eq!(reading.vram_used, Some(1024));
    }

    #[test]
    fn test_parse_rocm_csv_unparseable_row() {
        assert_eq!(parse_rocm_csv("device,GPU use (%)\ncard0,N/A\n"), None);
    }

    #[test]
    fn test_parse_rocm_csv_empty() {
        assert_eq!(parse_rocm_csv("device,Temperature (Sensor edge) (C),GPU use (%)\n"), None);
    }

    #[test]
    fn test_parse_rocm_product_name() {
        let out = "========= Product Info =========\nGPU[0]\t\t: Card series: \t\tNavi 21 [Radeon RX 6800]\nGPU[0]\t\t: Card vendor: \t\tAdvanced Micro Devices\n";
        assert_eq!(
            parse_rocm_product_name(out).as_deref(),
            Some("Navi 21 [Radeon RX 6800]")
        );
        assert_eq!(parse_rocm_product_name("nothing"), None);
    }

    struct FixedInventory(Vec<VideoAdapter>);

    impl AdapterEnumerator for FixedInventory {
        fn adapters(&self) -> Result<Vec<VideoAdapter>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_falls_back_to_inventory() {
        if command::is_available(ROCM_SMI) {
            return;
        }
        let backend = AmdBackend::new(Some(Box::new(FixedInventory(vec![VideoAdapter {
            name: "AMD Radeon RX 6700 XT".into(),
            compatibility: Some("Advanced Micro Devices, Inc.".into()),
            ram_bytes: Some(12 * 1024 * 1024 * 1024),
        }]))));

        let gpu = backend.detect().unwrap().unwrap();
        assert_eq!(gpu.vendor, "AMD");
        assert_eq!(gpu.model, "AMD Radeon RX 6700 XT");
        assert_eq!(gpu.vram, Some(12 * 1024));
    }
}
