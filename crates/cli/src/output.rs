//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use space_lib::{CapacityEstimate, InstanceCapacity, ResourceFootprint};
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the per-instance capacity table
#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "Instance")]
    instance: String,
    #[tabled(rename = "By CPU")]
    by_cpu: String,
    #[tabled(rename = "By Memory")]
    by_memory: String,
    #[tabled(rename = "Schedulable")]
    schedulable: u64,
}

impl From<&InstanceCapacity> for InstanceRow {
    fn from(capacity: &InstanceCapacity) -> Self {
        Self {
            instance: capacity.instance_id.clone(),
            by_cpu: format_bound(capacity.by_cpu),
            by_memory: format_bound(capacity.by_memory),
            schedulable: capacity.schedulable,
        }
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// A per-dimension bound, `∞` when the dimension is unconstrained
pub fn format_bound(bound: Option<u64>) -> String {
    match bound {
        Some(n) => n.to_string(),
        None => "∞".to_string(),
    }
}

/// Format CPU units (1024 per vCPU)
pub fn format_cpu(units: u64) -> String {
    format!("{} ({:.2} vCPU)", units, units as f64 / 1024.0)
}

/// Format memory given in MiB
pub fn format_memory(mib: u64) -> String {
    if mib >= 1024 {
        format!("{:.2}Gi", mib as f64 / 1024.0)
    } else {
        format!("{}Mi", mib)
    }
}

/// Color the total: red when nothing fits, yellow when tight
pub fn color_total(total: u64) -> String {
    match total {
        0 => total.to_string().red().bold().to_string(),
        1..=2 => total.to_string().yellow().bold().to_string(),
        _ => total.to_string().green().bold().to_string(),
    }
}

pub fn print_footprint(footprint: &ResourceFootprint, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(footprint)?,
        OutputFormat::Table => {
            println!("{}", "Largest Container Footprint".bold());
            println!("{}", "=".repeat(40));
            println!("CPU:     {}", format_cpu(footprint.cpu).cyan());
            println!("Memory:  {}", format_memory(footprint.memory).cyan());
            if footprint.is_degenerate() {
                print_warning("No container reserves CPU or memory");
            }
        }
    }
    Ok(())
}

pub fn print_estimate(estimate: &CapacityEstimate, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(estimate)?,
        OutputFormat::Table => {
            print_footprint(&estimate.footprint, format)?;
            println!();

            if estimate.instances.is_empty() {
                print_info("No active container instances");
            } else {
                let rows: Vec<InstanceRow> = estimate.instances.iter().map(InstanceRow::from).collect();
                println!("{}", Table::new(rows).with(Style::rounded()));
            }

            println!("{} {}", "Schedulable containers:".bold(), color_total(estimate.total));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bound() {
        assert_eq!(format_bound(Some(3)), "3");
        assert_eq!(format_bound(None), "∞");
    }

    #[test]
    fn test_format_memory() {
        assert_eq!(format_memory(512), "512Mi");
        assert_eq!(format_memory(2048), "2.00Gi");
    }

    #[test]
    fn test_format_cpu() {
        assert_eq!(format_cpu(512), "512 (0.50 vCPU)");
    }
}
