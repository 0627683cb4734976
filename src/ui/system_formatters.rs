use colored::*;

use super::formatters::{format_bytes, format_cpu_time, format_percent, format_uptime};
use crate::core::control::{MediaStatus, PlaybackState};
use crate::core::telemetry::{
    AgentStatus, CpuInfo, CpuStats, CpuUsage, DiskInfo, DiskStats, DiskUsage, GpuInfo, GpuStats,
    GpuUsage, MemoryInfo, MemoryStats, MemoryUsage, ProcessAggregate, SystemInfo, SystemStats,
    SystemUsage,
};

fn print_section_header(title: &str) {
    println!("\n{}", title.bold().green());
    println!("{}", "-".repeat(title.len()));
}

pub fn print_status(status: &AgentStatus) {
    println!(
        "{} {} ({}) v{}",
        status.status.to_uppercase().bold().bright_green(),
        status.hostname.bold(),
        status.platform,
        status.version
    );
}

pub fn print_system_info(info: &SystemInfo) {
    println!("\n{}", "SYSTEM INFORMATION".bold().bright_cyan());
    println!("{}", "=".repeat(60));
    println!("  Host: {} ({})", info.hostname.bold(), info.platform);

    print_cpu(&info.cpu);
    print_memory_info(&info.memory);
    print_gpu_info(info.gpu.as_ref());
    print_disk_info(&info.disks);
    println!();
}

pub fn print_memory_info(memory: &MemoryInfo) {
    print_section_header("Memory");
    println!("  Total: {}", format_bytes(memory.total));
}

pub fn print_gpu_info(gpu: Option<&GpuInfo>) {
    print_section_header("GPU");
    match gpu {
        Some(gpu) => {
            let vram = gpu.vram.map(|mb| format!("  VRAM {} MB", mb)).unwrap_or_default();
            println!("  {} ({}){}", gpu.model, gpu.vendor, vram);
        }
        None => println!("  {}", "No GPU detected".dimmed()),
    }
}

pub fn print_disk_info(disks: &[DiskInfo]) {
    print_section_header("Disks");
    if disks.is_empty() {
        println!("  {}", "No disks reported".dimmed());
    }
    for disk in disks {
        println!(
            "  {} {:<8} {:>10}  {}",
            format!("{:<24}", disk.mount).bold(),
            disk.fs_type,
            format_bytes(disk.size),
            disk.fs.dimmed()
        );
    }
}

pub fn print_system_stats(stats: &SystemStats) {
    println!("\n{}", "SYSTEM STATS".bold().bright_cyan());
    println!("{}", "=".repeat(60));
    println!("  Host: {} ({})", stats.hostname.bold(), stats.platform);
    println!("  Uptime: {}", format_uptime(stats.uptime));

    print_cpu_stats(&stats.cpu);
    print_memory(&stats.memory);
    print_gpu(stats.gpu.as_ref());
    print_disks(&stats.disks);
    println!();
}

/// One-line usage summary, used by `usage` and `monitor`.
pub fn print_usage(usage: &SystemUsage) {
    let mut line = format!(
        "CPU {}  MEM {} ({} free)",
        format_percent(usage.cpu.current_load),
        format_percent(usage.memory.used_percent),
        format_bytes(usage.memory.free)
    );
    if let Some(gpu) = &usage.gpu {
        if let Some(util) = gpu.utilization_gpu {
            line.push_str(&format!("  GPU {}", format_percent(util as f64)));
        }
        if let Some(temp) = gpu.temperature_gpu {
            line.push_str(&format!(" {}°C", temp));
        }
    }
    for disk in &usage.disks {
        line.push_str(&format!("  {} {}", disk.fs, format_percent(disk.used_percent)));
    }
    line.push_str(&format!("  UP {}", format_uptime(usage.uptime)));
    println!("{}", line);
}

pub fn print_cpu_usage(cpu: &CpuUsage) {
    println!("{}", cpu_usage_line(cpu));
}

pub fn print_memory_usage(memory: &MemoryUsage) {
    println!("{}", memory_usage_line(memory));
}

pub fn print_gpu_usage(gpu: Option<&GpuUsage>) {
    match gpu {
        Some(gpu) => println!("{}", gpu_usage_line(gpu)),
        None => println!("{}", "No GPU detected".dimmed()),
    }
}

fn cpu_usage_line(cpu: &CpuUsage) -> String {
    format!("CPU {}  {:.2} GHz", format_percent(cpu.current_load), cpu.current_speed)
}

fn memory_usage_line(memory: &MemoryUsage) -> String {
    format!(
        "MEM {}  {} used, {} free",
        format_percent(memory.used_percent),
        format_bytes(memory.used),
        format_bytes(memory.free)
    )
}

fn gpu_usage_line(gpu: &GpuUsage) -> String {
    let mut line = "GPU".to_string();
    match gpu.utilization_gpu {
        Some(util) => line.push_str(&format!(" {}", format_percent(util as f64))),
        None => line.push_str(" n/a"),
    }
    if let Some(temp) = gpu.temperature_gpu {
        line.push_str(&format!("  {}°C", temp));
    }
    if let Some(used) = gpu.vram_used {
        line.push_str(&format!("  VRAM {}", format_percent(used)));
    }
    line
}

pub fn print_disk_usage(disks: &[DiskUsage]) {
    if disks.is_empty() {
        println!("{}", "No disks reported".dimmed());
    }
    for disk in disks {
        println!(
            "{} {:>10} used {:>10} free  {}",
            format!("{:<24}", disk.fs).bold(),
            format_bytes(disk.used),
            format_bytes(disk.available),
            format_percent(disk.used_percent)
        );
    }
}

pub fn print_cpu(cpu: &CpuInfo) {
    print_section_header("CPU");
    println!("  Model: {}", cpu.brand);
    println!("  Vendor: {}", cpu.manufacturer);
    println!(
        "  Cores: {} physical, {} logical",
        cpu.physical_cores, cpu.cores
    );
    if cpu.base_speed > 0.0 {
        println!("  Base Frequency: {:.2} GHz", cpu.base_speed);
    }
}

pub fn print_cpu_stats(cpu: &CpuStats) {
    print_section_header("CPU");
    println!("  Model: {} ({})", cpu.brand, cpu.manufacturer);
    println!(
        "  Cores: {} physical, {} logical",
        cpu.physical_cores, cpu.cores
    );
    if cpu.speed > 0.0 {
        println!("  Base Frequency: {:.2} GHz", cpu.speed);
    }
    println!("  Load: {}", format_percent(cpu.current_load));
}

pub fn print_memory(memory: &MemoryStats) {
    print_section_header("Memory");
    println!(
        "  Used: {} / {} ({})",
        format_bytes(memory.used),
        format_bytes(memory.total),
        format_percent(memory.used_percent)
    );
    println!("  Free: {}", format_bytes(memory.free));
}

pub fn print_gpu(gpu: Option<&GpuStats>) {
    print_section_header("GPU");
    match gpu {
        Some(gpu) => print_gpu_line(gpu),
        None => println!("  {}", "No GPU detected".dimmed()),
    }
}

fn print_gpu_line(gpu: &GpuStats) {
    let mut line = format!("  {} ({})", gpu.model, gpu.vendor);
    if let Some(vram) = gpu.vram {
        line.push_str(&format!("  VRAM {} MB", vram));
    }
    if let Some(used) = gpu.vram_used {
        line.push_str(&format!(" [{} used]", format_percent(used)));
    }
    if let Some(util) = gpu.utilization_gpu {
        line.push_str(&format!("  Util {}%", util));
    }
    if let Some(temp) = gpu.temperature_gpu {
        line.push_str(&format!("  {}°C", temp));
    }
    println!("{}", line);
}

pub fn print_disks(disks: &[DiskStats]) {
    print_section_header("Disks");
    if disks.is_empty() {
        println!("  {}", "No disks reported".dimmed());
        return;
    }
    for disk in disks {
        println!(
            "  {} {:<8} {:>10} / {:>10}  {}",
            format!("{:<24}", disk.mount).bold(),
            disk.fs_type,
            format_bytes(disk.used),
            format_bytes(disk.size),
            format_percent(disk.used_percent)
        );
    }
}

pub fn print_processes(processes: &[ProcessAggregate]) {
    println!(
        "{}",
        format!("{:<32} {:>5} {:>12} {:>14}", "NAME", "COUNT", "MEMORY", "CPU TIME").bold()
    );
    for p in processes {
        println!(
            "{:<32} {:>5} {:>12} {:>14}",
            p.name,
            p.count,
            format_bytes(p.memory),
            format_cpu_time(p.cpu_time)
        );
    }
}

pub fn print_media_status(status: &MediaStatus) {
    let state = match status.status {
        PlaybackState::Playing => "playing".green(),
        PlaybackState::Paused => "paused".yellow(),
        PlaybackState::Active => "active".green(),
        PlaybackState::Idle => "idle".dimmed(),
        PlaybackState::Stopped => "stopped".dimmed(),
        PlaybackState::Unknown => "unknown".red(),
    };
    print!("{}", state.bold());
    if let Some(source) = &status.source {
        print!(" [{}]", source);
    }
    match (&status.title, &status.artist) {
        (Some(title), Some(artist)) => println!("  {} - {}", title, artist),
        (Some(title), None) => println!("  {}", title),
        (None, Some(artist)) => println!("  {}", artist),
        (None, None) => println!(),
    }
}
