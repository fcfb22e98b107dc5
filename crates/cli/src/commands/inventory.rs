//! Reservation listing and normalized capacity summary

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use reservation_lib::{
    normalize, Lifecycle, NormalizedTotals, NormalizedUnits, ReservationRecord, SizeWeights,
};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{color_lifecycle, color_time_left, or_dash, print_error, print_warning};

/// Row for reservations table
#[derive(Tabled)]
struct ReservationRow {
    #[tabled(rename = "Reserved Id")]
    id: String,
    #[tabled(rename = "Instances")]
    instance_count: u32,
    #[tabled(rename = "Type")]
    instance_type: String,
    #[tabled(rename = "Product Description")]
    product_description: String,
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Duration")]
    duration_days: i64,
    #[tabled(rename = "Time Left")]
    time_left_days: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Offering")]
    offering_type: String,
    #[tabled(rename = "State")]
    lifecycle: String,
}

/// Reservation as emitted in JSON output
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReservationView<'a> {
    #[serde(flatten)]
    pub record: &'a ReservationRecord,
    pub duration_days: i64,
    pub time_left_days: i64,
    pub lifecycle: Lifecycle,
}

impl<'a> ReservationView<'a> {
    pub fn new(record: &'a ReservationRecord, now: DateTime<Utc>) -> Self {
        Self {
            record,
            duration_days: record.duration_days(),
            time_left_days: record.time_left_days(now),
            lifecycle: record.lifecycle(now),
        }
    }
}

/// Normalize, reporting input errors before propagating them
pub fn compute_totals(
    records: &[ReservationRecord],
    weights: &SizeWeights,
    now: DateTime<Utc>,
) -> Result<NormalizedTotals> {
    normalize(records, weights, now).map_err(|e| {
        print_error(&format!("Normalization aborted: {}", e));
        e.into()
    })
}

/// Print the reservations table
pub fn print_reservations(records: &[ReservationRecord], now: DateTime<Utc>) {
    if records.is_empty() {
        print_warning("No reserved instances found");
        return;
    }

    let rows: Vec<ReservationRow> = records
        .iter()
        .map(|r| ReservationRow {
            id: r.id.clone(),
            instance_count: r.instance_count,
            instance_type: r.instance_type.clone(),
            product_description: r.product_description.clone(),
            scope: r.scope.to_string(),
            zone: or_dash(r.availability_zone.as_deref()),
            duration_days: r.duration_days(),
            time_left_days: color_time_left(r.time_left_days(now)),
            end: r.end.format("%Y-%m-%d %H:%M:%S").to_string(),
            offering_type: r.offering_type.clone(),
            lifecycle: color_lifecycle(r.lifecycle(now)),
        })
        .collect();

    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);
}

/// Print normalized units grouped by family and size or zone
pub fn print_summary(totals: &NormalizedTotals, weights: &SizeWeights) {
    println!();
    println!("{}", "Summary".bold());
    println!("{}", "=".repeat(50));

    println!();
    println!("{}", "Active Regional Reserved Instances (by type and size)".bold());
    if totals.region.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for (family, sizes) in &totals.region {
        println!("  Instance Type: {}", family.cyan());
        for (size, units) in sizes {
            print_size_line("    ", size, *units, weights);
        }
    }

    println!();
    println!("{}", "Active Zonal Reserved Instances (by type, zone and size)".bold());
    if totals.zone.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for (family, zones) in &totals.zone {
        println!("  Instance Type: {}", family.cyan());
        for (zone, sizes) in zones {
            println!("    Zone: {}", zone);
            for (size, units) in sizes {
                print_size_line("      ", size, *units, weights);
            }
        }
    }

    println!();
    println!("{}", "-".repeat(50));
    println!("Regional total (normalized): {}", totals.region_total());
    println!("Zonal total (normalized):    {}", totals.zone_total());
    println!(
        "{} {}",
        "Total (normalized):".bold(),
        totals.total().to_string().green().bold()
    );
}

/// `size: weight x count = units`
fn print_size_line(indent: &str, size: &str, units: NormalizedUnits, weights: &SizeWeights) {
    match weights.get(size) {
        Some(weight) if weight.quarters() > 0 => {
            let count = units.quarters() / weight.quarters();
            println!("{}{}: {} x {} = {}", indent, size, weight, count, units);
        }
        _ => println!("{}{}: {}", indent, size, units),
    }
}
