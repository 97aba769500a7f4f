use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use lxbread::fcs::FcsWriter;

/// Bead classification channels plus two reporter channels, as on a Luminex 200
const DEMO_CHANNELS: &[(&str, Option<&str>)] = &[
    ("DD", None),
    ("CL1", None),
    ("CL2", None),
    ("RP1", Some("IL_6")),
    ("RP1_L", Some("TNF_alpha")),
];

const PLATE_ROWS: &[char] = &['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
const PLATE_COLUMNS: usize = 12;

/// Generate a synthetic plate of LXB files
pub fn run(output: PathBuf, wells: usize, events: usize) -> Result<()> {
    info!("lxb-convert - Synthetic Plate Generator");
    info!("=======================================");

    let capacity = PLATE_ROWS.len() * PLATE_COLUMNS;
    if wells > capacity {
        anyhow::bail!("A plate holds at most {} wells, got {}", capacity, wells);
    }

    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let writer = DEMO_CHANNELS
        .iter()
        .fold(FcsWriter::new(), |writer, (name, marker)| writer.channel(name, *marker))
        .keyword("$CYT", "Luminex 200 (synthetic)");

    for (index, well) in well_ids(wells).enumerate() {
        let path = output.join(format!("demo_plate_{}.lxb", well));
        write_well(&writer, &path, index, events)?;
    }

    info!("Generated {} wells x {} events in {}", wells, events, output.display());
    info!("\nConvert with:");
    info!("  lxb-convert convert {}", output.display());

    Ok(())
}

/// A01, A02, ..., A12, B01, ...
fn well_ids(count: usize) -> impl Iterator<Item = String> {
    PLATE_ROWS
        .iter()
        .flat_map(|row| (1..=PLATE_COLUMNS).map(move |column| format!("{}{:02}", row, column)))
        .take(count)
}

fn write_well(writer: &FcsWriter, path: &Path, well_index: usize, events: usize) -> Result<()> {
    let channels = writer.channel_count();
    let mut values = Vec::with_capacity(events * channels);

    // Deterministic pseudo-random intensities; a simple LCG keeps output stable
    let mut state = 0x9E37_79B9_u64 ^ (well_index as u64 + 1);
    let mut next = move || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    for event in 0..events {
        let region = (event % 50) as f64;
        values.push(8_000.0 + next() * 4_000.0);
        values.push(1_000.0 + region * 300.0 + next() * 50.0);
        values.push(2_000.0 + region * 250.0 + next() * 50.0);
        values.push((well_index as f64 + 1.0) * 150.0 + next() * 500.0);
        values.push(next() * 100.0);
    }

    writer
        .write(path, &values)
        .with_context(|| format!("Failed to write {}", path.display()))
}
