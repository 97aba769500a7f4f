use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use lxbread::channels::{sorted_descriptors, ChannelDescriptor, ChannelMapping};
use lxbread::config::DEFAULT_EXTENSION;
use lxbread::fcs::FcsFile;
use lxbread::source::RawEventSource;
use lxbread::table::{extract_well_id, EventMatrix};
use lxbread::LXBREAD_VERSION;

#[derive(Serialize)]
struct InfoReport {
    lxbread_version: &'static str,
    file: String,
    version: String,
    well: Option<String>,
    events: usize,
    reported_events: Option<usize>,
    channel_count: usize,
    data_type: String,
    channels: Vec<ChannelRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<Vec<(String, String)>>,
}

#[derive(Serialize)]
struct ChannelRow {
    #[serde(flatten)]
    descriptor: ChannelDescriptor,
    label: String,
}

/// Display information about one LXB file
pub fn run(file: PathBuf, show_keywords: bool, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let fcs = FcsFile::open(&file)
        .with_context(|| format!("Failed to decode {}", file.display()))?;
    let descriptors =
        sorted_descriptors(fcs.channels()).context("Invalid channel metadata")?;
    // Surfaces reshape errors the conversion would hit
    EventMatrix::from_flat(fcs.events().to_vec(), fcs.channel_count())
        .context("Event buffer does not reshape into whole events")?;

    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let report = InfoReport {
        lxbread_version: LXBREAD_VERSION,
        file: file.display().to_string(),
        version: fcs.version().to_string(),
        well: extract_well_id(&file_name, DEFAULT_EXTENSION).ok(),
        events: fcs.event_count(),
        reported_events: fcs.reported_event_count(),
        channel_count: fcs.channel_count(),
        data_type: fcs.layout().data_type.keyword().to_string(),
        channels: descriptors
            .into_iter()
            .map(|descriptor| ChannelRow {
                label: ChannelMapping::from(&descriptor).marker,
                descriptor,
            })
            .collect(),
        keywords: show_keywords.then(|| {
            fcs.keywords()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        }),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

fn heading(text: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        style(text).bold().cyan().to_string()
    }
    #[cfg(not(feature = "colorized_output"))]
    {
        text.to_string()
    }
}

fn print_report(report: &InfoReport) {
    println!("{}", heading("LXB File Information"));
    println!("====================");
    println!("File: {}", report.file);
    println!("Version: {}", report.version);
    println!("Well: {}", report.well.as_deref().unwrap_or("<none>"));
    println!();

    println!("{}", heading("Events:"));
    println!("  Decoded: {}", report.events);
    match report.reported_events {
        Some(total) if total != report.events => println!("  $TOT:    {} (mismatch)", total),
        Some(total) => println!("  $TOT:    {}", total),
        None => println!("  $TOT:    <absent>"),
    }
    println!("  Data type: {}", report.data_type);
    println!();

    println!("{}", heading("Channels:"));
    for row in &report.channels {
        println!(
            "  {:3}. {:<12} {:<20} -> {:?}",
            row.descriptor.index,
            row.descriptor.name,
            row.descriptor.marker.as_deref().unwrap_or("-"),
            row.label
        );
    }

    if let Some(keywords) = &report.keywords {
        println!();
        println!("{}", heading("Keywords:"));
        for (key, value) in keywords {
            println!("  {}: {}", key, preview(value));
        }
    }
}

fn preview(value: &str) -> String {
    const MAX_PREVIEW: usize = 100;
    if value.len() <= MAX_PREVIEW {
        return value.to_string();
    }
    let cut = value
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= MAX_PREVIEW)
        .last()
        .unwrap_or(0);
    format!("{}... ({} bytes)", &value[..cut], value.len())
}
