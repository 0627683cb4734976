use serde::Deserialize;

use crate::core::telemetry::gpu::{parse_vram_mb, vendor_from_model, GpuBackend};
use crate::core::telemetry::GpuStats;
use crate::error::Result;
use crate::platform::command;

const SYSTEM_PROFILER: &str = "system_profiler";
const DATA_TYPE: &str = "SPDisplaysDataType";

/// macOS graphics inventory via `system_profiler SPDisplaysDataType`.
///
/// Only identity and VRAM size are available; utilization and
/// temperature stay absent.
#[derive(Debug, Default)]
pub struct SystemProfilerBackend;

impl GpuBackend for SystemProfilerBackend {
    fn name(&self) -> &'static str {
        SYSTEM_PROFILER
    }

    fn is_available(&self) -> bool {
        command::is_available(SYSTEM_PROFILER)
    }

    fn detect(&self) -> Result<Option<GpuStats>> {
        match command::run(SYSTEM_PROFILER, &[DATA_TYPE, "-json"]) {
            Ok(json) => match parse_profiler_json(&json) {
                Ok(Some(stats)) => return Ok(Some(stats)),
                Ok(None) => {}
                Err(e) => log::debug!("system_profiler JSON unusable: {}", e),
            },
            Err(e) => log::debug!("system_profiler -json failed: {}", e),
        }

        let text = command::run(SYSTEM_PROFILER, &[DATA_TYPE])?;
        Ok(parse_profiler_text(&text))
    }
}

#[derive(Debug, Deserialize)]
struct ProfilerReport {
    #[serde(rename = "SPDisplaysDataType", default)]
    displays: Vec<ProfilerDisplay>,
}

#[derive(Debug, Deserialize)]
struct ProfilerDisplay {
    #[serde(rename = "_name", default)]
    name: Option<String>,
    #[serde(rename = "sppci_model", default)]
    model: Option<String>,
    #[serde(rename = "spdisplays_vendor", default)]
    vendor: Option<String>,
    #[serde(rename = "sppci_cores", default)]
    cores: Option<String>,
    #[serde(rename = "spdisplays_vram", default)]
    vram: Option<String>,
    #[serde(rename = "spdisplays_vram_dynamic", default)]
    vram_dynamic: Option<String>,
    #[serde(rename = "spdisplays_vram_shared", default)]
    vram_shared: Option<String>,
}

/// Turn the internal product keys system_profiler sometimes emits into
/// readable names, e.g. `kHW_AppleM1Item` into `Apple M1`.
fn humanize_model(raw: &str) -> String {
    match raw.strip_prefix("kHW_").and_then(|r| r.strip_suffix("Item")) {
        Some(inner) => match inner.strip_prefix("Apple") {
            Some(chip) => format!("Apple {}", chip),
            None => inner.to_string(),
        },
        None => raw.to_string(),
    }
}

/// Vendor label. The reported vendor field wins when it names a known
/// vendor; the model name is only consulted when it is missing or opaque.
fn resolve_vendor(model: &str, vendor_field: Option<&str>) -> String {
    let field = vendor_field
        .map(|v| v.trim().trim_start_matches("sppci_vendor_"))
        .filter(|v| !v.is_empty());

    field
        .and_then(vendor_from_model)
        .or_else(|| vendor_from_model(model))
        .map(str::to_string)
        .or_else(|| field.map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}

/// First display adapter from `system_profiler SPDisplaysDataType -json`.
pub fn parse_profiler_json(json: &str) -> Result<Option<GpuStats>> {
    let report: ProfilerReport = serde_json::from_str(json)?;
    let Some(display) = report.displays.into_iter().next() else {
        return Ok(None);
    };

    let raw_model = display
        .model
        .or(display.name)
        .unwrap_or_else(|| "Unknown GPU".to_string());
    let mut model = humanize_model(&raw_model);
    let vendor = resolve_vendor(&model, display.vendor.as_deref());

    if vendor == "Apple" {
        if let Some(cores) = display.cores.as_deref().filter(|c| !c.is_empty()) {
            model = format!("{} ({}-core GPU)", model, cores);
        }
    }

    let vram = [display.vram, display.vram_dynamic, display.vram_shared]
        .iter()
        .flatten()
        .find_map(|v| parse_vram_mb(v));

    let mut stats = GpuStats::identity(vendor, model);
    stats.vram = vram;
    Ok(Some(stats))
}

/// Fallback for the human-readable `system_profiler SPDisplaysDataType`
/// output.
pub fn parse_profiler_text(text: &str) -> Option<GpuStats> {
    let mut model = None;
    let mut vendor_field = None;
    let mut vram = None;

    for line in text.lines().map(str::trim) {
        if let Some(value) = line.strip_prefix("Chipset Model:") {
            if model.is_none() {
                model = Some(value.trim().to_string());
            }
        } else if let Some(value) = line.strip_prefix("Vendor:") {
            if vendor_field.is_none() {
                vendor_field = Some(value.trim().to_string());
            }
        } else if line.starts_with("VRAM") {
            if let Some((_, value)) = line.split_once(':') {
                if vram.is_none() {
                    vram = parse_vram_mb(value);
                }
            }
        }
    }

    let model = model?;
    let vendor = resolve_vendor(&model, vendor_field.as_deref());
    let mut stats = GpuStats::identity(vendor, model);
    stats.vram = vram;
    Some(stats)
}
