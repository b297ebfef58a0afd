use plw_reader::core::test_support::PlwBuilder;
use plw_reader::{HeaderField, PlwError, PlwReader, SamplingUnit};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".plw").tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

fn three_channel_log(records: i32) -> PlwBuilder {
    let mut builder = PlwBuilder::new(3)
        .counts(records as u32, records as u32)
        .interval(500, 4)
        .start(737_425, 3_600);
    for i in 0..records {
        let base = i as f32;
        builder = builder.record(i, &[base, base * 0.5, -base]);
    }
    builder
}

#[test]
fn test_open_round_trip() {
    let file = write_file(&three_channel_log(6).build());
    let reader = PlwReader::open(file.path()).unwrap();

    assert_eq!(reader.channel_count(), 3);
    assert_eq!(reader.sample_count(), 6);
    assert_eq!(reader.rows_decoded(), 6);
    assert_eq!(reader.sample_interval(), 500);
    assert_eq!(reader.sampling_unit(), SamplingUnit::Millisecond);
    assert_eq!(reader.minimum_sample(), Some(-5.0));
    assert_eq!(reader.maximum_sample(), Some(5.0));

    let row = &reader.table().rows()[4];
    assert_eq!(row.time, 4);
    assert_eq!(row.channels, vec![4.0, 2.0, -4.0]);
}

#[test]
fn test_every_cut_inside_data_keeps_whole_records() {
    let full = three_channel_log(5).build();
    let record_size = 16;
    let data_start = 1684;

    for cut in data_start..full.len() {
        let file = write_file(&full[..cut]);
        let reader = PlwReader::open(file.path()).unwrap();
        assert_eq!(
            reader.rows_decoded(),
            (cut - data_start) / record_size,
            "cut at byte {cut}"
        );
    }
}

#[test]
fn test_trusted_count_ignores_physical_records() {
    let mut builder = PlwBuilder::new(2).counts(5, 3);
    for i in 0..5 {
        builder = builder.record(100 + i, &[1.0, 2.0]);
    }
    let file = write_file(&builder.build());
    let reader = PlwReader::open(file.path()).unwrap();

    let times: Vec<i32> = reader.table().rows().iter().map(|r| r.time).collect();
    assert_eq!(times, vec![100, 101, 102]);
}

#[test]
fn test_stray_tail_bytes() {
    let mut builder = PlwBuilder::new(1).counts(10, 10);
    for i in 0..4 {
        builder = builder.record(i, &[i as f32]);
    }
    let file = write_file(&builder.trailing(&[0xEE, 0xEE]).build());
    let reader = PlwReader::open(file.path()).unwrap();

    assert_eq!(reader.rows_decoded(), 4);
    assert!(reader.is_truncated());
}

#[test]
fn test_version_two_rejected() {
    let file = write_file(&PlwBuilder::new(1).version(2).build());
    let err = PlwReader::open(file.path()).unwrap_err();
    assert!(matches!(err, PlwError::UnsupportedFormatVersion(2)));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = PlwReader::open(dir.path().join("absent.plw")).unwrap_err();
    match err {
        PlwError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_header_cut_short() {
    let mut bytes = PlwBuilder::new(1).build();
    bytes.truncate(588);
    let file = write_file(&bytes);

    let err = PlwReader::open(file.path()).unwrap_err();
    assert!(matches!(
        err,
        PlwError::HeaderField {
            field: HeaderField::StartDate,
            ..
        }
    ));
    assert!(matches!(err.root(), PlwError::TruncatedRead { .. }));
}

#[test]
fn test_data_section_missing_entirely() {
    // Header fields intact but the reserved area is cut off
    let mut bytes = PlwBuilder::new(1).counts(3, 3).build();
    bytes.truncate(1000);
    let file = write_file(&bytes);

    let err = PlwReader::open(file.path()).unwrap_err();
    assert!(matches!(err, PlwError::TruncatedRead { position: 1000, .. }));
}

#[test]
fn test_read_summary_skips_data() {
    // Garbage after the header does not matter for a summary
    let bytes = three_channel_log(2).trailing(&[0xFF; 7]).build();
    let file = write_file(&bytes);

    let summary = PlwReader::read_summary(file.path()).unwrap();
    assert_eq!(summary.channel_count, 3);
    assert_eq!(summary.record_count, 2);
    assert_eq!(summary.start_text(), "1/1/2020 1:0:0");
    assert!(summary.to_string().contains("Sample Interval: 500ms"));
}

#[test]
fn test_file_released_after_decode() {
    let file = write_file(&three_channel_log(1).build());
    let path = file.path().to_path_buf();
    let reader = PlwReader::open(&path).unwrap();

    file.close().unwrap();
    assert!(!path.exists());
    assert_eq!(reader.rows_decoded(), 1);
}

#[test]
fn test_unrepresentable_start_date_still_decodes() {
    let mut builder = PlwBuilder::new(1).counts(3, 3).start(u32::MAX, 0);
    for i in 0..3 {
        builder = builder.record(i, &[i as f32]);
    }
    let file = write_file(&builder.build());

    let reader = PlwReader::open(file.path()).unwrap();
    assert_eq!(reader.rows_decoded(), 3);
    assert!(reader.start_timestamp().is_none());

    let summary = PlwReader::read_summary(file.path()).unwrap();
    assert!(summary.start.is_none());
    assert_eq!(summary.start_text(), "invalid date");
}
