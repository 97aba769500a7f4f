//! Integration tests for lxbread
//!
//! These tests run the full pipeline from LXB files on disk to CSV output.

use lxbread::channels::{ChannelKeywords, ChannelMetadata};
use lxbread::config::{ConversionConfig, EntryPolicy};
use lxbread::dataset::{aggregate_directory, write_csv, ConversionStats, CsvOptions};
use lxbread::error::{DecodeError, LxbError, NamingError};
use lxbread::fcs::{FcsFile, FcsWriter};
use lxbread::source::{MemoryEventSource, RawEventSource};
use lxbread::table::{load_well_file, EventTable};
use std::fs;
use tempfile::tempdir;

fn cd4_writer() -> FcsWriter {
    FcsWriter::new()
        .channel("FL1", Some("CD4"))
        .channel("FL2", None)
}

/// Synthetic 2-channel, 3-event file keeps its raw values and labels
#[test]
fn test_two_channel_three_event_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plate1_A01.lxb");
    let events = [101.0, 7.0, 202.0, 8.0, 303.0, 9.0];
    cd4_writer().write(&path, &events).unwrap();

    let table = load_well_file(&path, "lxb").unwrap();

    assert_eq!(table.labels().collect::<Vec<_>>(), vec!["CD4", ""]);
    assert_eq!(table.rows(), 3);
    assert_eq!(table.matrix().as_slice(), &events);
    assert_eq!(table.well(), "A01");
}

/// Two files with 3 and 2 events stack into 5 rows tagged with their wells
#[test]
fn test_directory_to_csv() {
    let dir = tempdir().unwrap();
    let plate = dir.path().join("plate");
    fs::create_dir(&plate).unwrap();

    cd4_writer()
        .write(plate.join("run7_A01.lxb"), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .unwrap();
    cd4_writer()
        .write(plate.join("run7_A02.lxb"), &[7.0, 8.0, 9.0, 10.0])
        .unwrap();

    let config = ConversionConfig::default();
    let dataset = aggregate_directory(&plate, &config).unwrap();
    assert_eq!(dataset.row_count(), 5);

    let output = dir.path().join("luminex_data.csv");
    let rows = write_csv(&dataset, &output, &CsvOptions::from(&config)).unwrap();
    assert_eq!(rows, 5);

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], "CD4,,Well");
    assert_eq!(lines[1], "1.0,2.0,A01");
    assert_eq!(lines[3], "5.0,6.0,A01");
    assert_eq!(lines[4], "7.0,8.0,A02");
    assert_eq!(lines[5], "9.0,10.0,A02");
    assert_eq!(lines.len(), 6);

    let stats = ConversionStats::from(&dataset);
    assert_eq!(
        stats.to_string(),
        "Converted 2 files (2 wells): 5 events x 2 channel columns"
    );
}

/// Channel order follows the declared index, not dictionary order
#[test]
fn test_columns_follow_channel_index() {
    let mut channels = ChannelMetadata::new();
    for (key, name, marker) in [
        ("3", "RP1", Some("IL_6")),
        ("1", "DD", None),
        ("2", "CL1", Some("bead_region")),
    ] {
        channels.insert(
            key.to_string(),
            ChannelKeywords::new(name, marker.map(str::to_string)),
        );
    }
    let source = MemoryEventSource {
        channel_count: 3,
        events: vec![1.0, 2.0, 3.0],
        channels,
    };

    let table = EventTable::from_source(&source, "C07").unwrap();
    assert_eq!(
        table.labels().collect::<Vec<_>>(),
        vec!["", "bead-region", "IL-6"]
    );
    let names: Vec<_> = table.mappings().iter().map(|m| m.channel.as_str()).collect();
    assert_eq!(names, vec!["DD", "CL1", "RP1"]);
}

/// A corrupt file anywhere in the plate aborts the run and writes nothing
#[test]
fn test_corrupt_file_aborts_without_output() {
    let dir = tempdir().unwrap();
    let plate = dir.path().join("plate");
    fs::create_dir(&plate).unwrap();

    cd4_writer()
        .write(plate.join("run7_A01.lxb"), &[1.0, 2.0])
        .unwrap();
    // Three values across two channels: a partial trailing event
    cd4_writer()
        .write(plate.join("run7_A02.lxb"), &[1.0, 2.0, 3.0])
        .unwrap();

    let result = aggregate_directory(&plate, &ConversionConfig::default());
    match result {
        Err(LxbError::Decode { path, source }) => {
            assert!(path.ends_with("run7_A02.lxb"));
            assert!(matches!(
                source,
                DecodeError::UnevenEvents {
                    len: 3,
                    channels: 2
                }
            ));
        }
        other => panic!("expected decode error, got {:?}", other.map(|d| d.row_count())),
    }
}

#[test]
fn test_unnamed_file_is_naming_error() {
    let dir = tempdir().unwrap();
    cd4_writer()
        .write(dir.path().join("A01.lxb"), &[1.0, 2.0])
        .unwrap();

    assert!(matches!(
        aggregate_directory(dir.path(), &ConversionConfig::default()),
        Err(LxbError::Naming(NamingError::MissingWell(_)))
    ));
}

#[test]
fn test_skip_policy_ignores_stray_files() {
    let dir = tempdir().unwrap();
    cd4_writer()
        .write(dir.path().join("run7_B02.lxb"), &[1.0, 2.0])
        .unwrap();
    fs::write(dir.path().join(".DS_Store"), b"\0\0\0\x01Bud1").unwrap();
    fs::write(dir.path().join("run7_export.csv"), b"a,b\n").unwrap();

    let config = ConversionConfig {
        entry_policy: EntryPolicy::Skip,
        ..Default::default()
    };
    let dataset = aggregate_directory(dir.path(), &config).unwrap();
    assert_eq!(dataset.table_count(), 1);
    assert_eq!(dataset.tables().next().unwrap().well(), "B02");
}

#[test]
fn test_decoder_matches_writer_metadata() {
    let bytes = cd4_writer()
        .keyword("$TOT", "99")
        .to_bytes(&[5.0, 6.0, 7.0, 8.0]);
    let file = FcsFile::from_bytes(&bytes).unwrap();

    // $TOT mismatch is only a warning; the DATA segment wins
    assert_eq!(file.reported_event_count(), Some(99));
    assert_eq!(file.event_count(), 2);
    assert_eq!(file.channel_count(), 2);
    assert_eq!(file.channels()["2"].pnn, "FL2");
}
