use crate::core::telemetry::gpu::{vram_used_percent, GpuBackend};
use crate::core::telemetry::GpuStats;
use crate::error::{CntrlError, Result};
use crate::platform::command;

const NVIDIA_SMI: &str = "nvidia-smi";
const QUERY: &str =
    "--query-gpu=name,memory.total,memory.used,temperature.gpu,utilization.gpu,driver_version";

/// NVIDIA GPU via the `nvidia-smi` CLI.
#[derive(Debug, Default)]
pub struct NvidiaSmiBackend;

impl GpuBackend for NvidiaSmiBackend {
    fn name(&self) -> &'static str {
        NVIDIA_SMI
    }

    fn is_available(&self) -> bool {
        command::is_available(NVIDIA_SMI)
    }

    fn detect(&self) -> Result<Option<GpuStats>> {
        let output = command::run(NVIDIA_SMI, &[QUERY, "--format=csv,noheader,nounits"])?;
        parse_nvidia_smi(&output)
    }
}

/// Parse the first row of `nvidia-smi --query-gpu=... --format=csv,noheader,nounits`.
///
/// Readings reported as `[N/A]` (or otherwise unparseable) are left
/// absent.
pub fn parse_nvidia_smi(output: &str) -> Result<Option<GpuStats>> {
    let Some(line) = output.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return Ok(None);
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 6 {
        return Err(CntrlError::parse(format!(
            "nvidia-smi row has {} fields, expected 6",
            fields.len()
        )));
    }

    let number = |s: &str| s.parse::<u64>().ok();
    let total = number(fields[1]);
    let used = number(fields[2]);

    Ok(Some(GpuStats {
        vendor: "NVIDIA".to_string(),
        model: fields[0].to_string(),
        vram: total,
        vram_used: match (used, total) {
            (Some(used), Some(total)) => vram_used_percent(used, total),
            _ => None,
        },
        temperature_gpu: fields[3].parse().ok(),
        utilization_gpu: fields[4].parse().ok(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nvidia_smi() {
        let output = "NVIDIA GeForce RTX 3080, 10240, 2560, 54, 17, 546.33\n";
        let gpu = parse_nvidia_smi(output).unwrap().unwrap();
        assert_eq!(gpu.vendor, "NVIDIA");
        assert_eq!(gpu.model, "NVIDIA GeForce RTX 3080");
        assert_eq!(gpu.vram, Some(10240));
        assert_eq!(gpu.vram_used, Some(25.0));
        assert_eq!(gpu.temperature_gpu, Some(54));
        assert_eq!(gpu.utilization_gpu, Some(17));
    }

    #[test]
    fn test_parse_nvidia_smi_not_available_fields() {
        let output = "Tesla T4, 15360, 0, [N/A], [N/A], 535.104\n";
        let gpu = parse_nvidia_smi(output).unwrap().unwrap();
        assert_eq!(gpu.vram_used, Some(0.0));
        assert_eq!(gpu.temperature_gpu, None);
        assert_eq!(gpu.utilization_gpu, None);
    }

    #[test]
    fn test_parse_nvidia_smi_takes_first_gpu() {
        let output = "GPU A, 8192, 4096, 40, 10, 550.1\nGPU B, 8192, 0, 30, 0, 550.1\n";
        assert_eq!(parse_nvidia_smi(output).unwrap().unwrap().model, "GPU A");
    }

    #[test]
    fn test_parse_nvidia_smi_short_row() {
        assert!(parse_nvidia_smi("GPU A, 8192\n").is_err());
        assert_eq!(parse_nvidia_smi("\n").unwrap(), None);
    }
}
