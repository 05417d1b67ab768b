#[path = "../test_utils/lib.rs"]
mod test_utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tech_sniffer::{DocumentReader, Error, PostType, ReaderStats};
use test_utils::constants::{TEST_MALFORMED_POSTS_XML_PATH, TEST_POSTS_XML_PATH};
use test_utils::timestamp_utc;

#[cfg(test)]
mod document_reader_tests {
    use super::*;

    fn document_ids<R: std::io::BufRead>(document_reader: &mut DocumentReader<R>) -> Vec<String> {
        document_reader.map(|document| document.id).collect()
    }

    #[test]
    fn test_reads_every_row_in_order() {
        let mut document_reader =
            DocumentReader::from_path(Path::new(TEST_POSTS_XML_PATH)).unwrap();

        assert_eq!(
            document_ids(&mut document_reader),
            vec!["1", "2", "3", "4", "5", "6"]
        );
        assert_eq!(
            document_reader.stats(),
            ReaderStats {
                scanned: 6,
                malformed: 0,
                anomalies: 2,
            }
        );
    }

    #[test]
    fn test_extracts_fields() {
        let documents: Vec<_> = DocumentReader::from_path(Path::new(TEST_POSTS_XML_PATH))
            .unwrap()
            .collect();

        let first = &documents[0];
        assert_eq!(first.post_type, PostType::Question);
        assert_eq!(first.title, "I love go and C# today");
        assert_eq!(first.body, "<p>Nothing else here</p>");
        assert_eq!(first.tags, "|react-native|go|");
        assert_eq!(first.view_count, 100);
        assert_eq!(
            first.created_at,
            Some(timestamp_utc("2024-01-10T08:00:00"))
        );

        let answer = &documents[2];
        assert_eq!(answer.post_type, PostType::Answer);
        assert!(!answer.is_primary());
        assert_eq!(answer.title, "");

        assert_eq!(documents[1].tags, "<python><docker>");
        assert_eq!(documents[1].normalized_title(), "Python packaging");
        assert_eq!(
            documents[1].canonical_url(),
            "https://stackoverflow.com/questions/2"
        );
    }

    #[test]
    fn test_bad_fields_fall_back_to_defaults() {
        let documents: Vec<_> = DocumentReader::from_path(Path::new(TEST_POSTS_XML_PATH))
            .unwrap()
            .collect();

        // ViewCount="abc"
        assert_eq!(documents[3].view_count, 0);
        assert_eq!(
            documents[3].created_at,
            Some(timestamp_utc("2024-01-12T12:00:00Z"))
        );

        // CreationDate="not a date"
        assert_eq!(documents[4].view_count, 30);
        assert_eq!(documents[4].created_at, None);
    }

    #[test]
    fn test_skips_malformed_rows() {
        let mut document_reader =
            DocumentReader::from_path(Path::new(TEST_MALFORMED_POSTS_XML_PATH)).unwrap();

        assert_eq!(document_ids(&mut document_reader), vec!["1", "4"]);

        let stats = document_reader.stats();
        assert_eq!(stats.scanned, 4);
        assert_eq!(stats.malformed, 2);
        assert_eq!(stats.anomalies, 2);
    }

    #[test]
    fn test_row_limit() {
        let mut document_reader = DocumentReader::from_path(Path::new(TEST_POSTS_XML_PATH))
            .unwrap()
            .with_row_limit(3);

        // The limit counts rows of every type
        assert_eq!(document_ids(&mut document_reader), vec!["1", "2", "3"]);
        assert_eq!(document_reader.stats().scanned, 3);
    }

    #[test]
    fn test_zero_row_limit_is_unlimited() {
        let mut document_reader = DocumentReader::from_path(Path::new(TEST_POSTS_XML_PATH))
            .unwrap()
            .with_row_limit(0);

        assert_eq!(document_ids(&mut document_reader).len(), 6);
    }

    #[test]
    fn test_truncated_input_ends_the_stream() {
        let xml = r#"<posts><row Id="1" PostTypeId="1" Title="go" /><row Id="2" PostTy"#;
        let mut document_reader = DocumentReader::new(xml.as_bytes());

        assert_eq!(document_ids(&mut document_reader), vec!["1"]);
        assert_eq!(document_reader.next(), None);
        assert_eq!(document_reader.stats().malformed, 1);
    }

    #[test]
    fn test_broken_markup_between_rows_is_skipped() {
        let xml = concat!(
            r#"<posts><row Id="1" PostTypeId="1" />"#,
            r#"<!- broken comment >"#,
            r#"<row Id="3" PostTypeId="1" /></posts>"#,
        );
        let mut document_reader = DocumentReader::new(xml.as_bytes());

        assert_eq!(document_ids(&mut document_reader), vec!["1", "3"]);
        assert_eq!(document_reader.stats().scanned, 2);
        assert_eq!(document_reader.stats().malformed, 0);
    }

    #[test]
    fn test_corrupt_row_mid_corpus_does_not_stop_the_scan() {
        let xml = concat!(
            "<posts>\n",
            r#"  <row Id="1" PostTypeId="1" Title="go" />"#,
            "\n",
            r#"  <row Id="2" PostTypeId="1" Title="never closed"#,
            "\n",
            r#"  <row Id="3" PostTypeId="1" Title="a > b" />"#,
            "\n",
            r#"  <rows Id="4" />"#,
            "\n",
            r#"  <row Id="5" PostTypeId="1" Title='single quotes' />"#,
            "\n</posts>\n",
        );
        let mut document_reader = DocumentReader::new(xml.as_bytes());

        let documents: Vec<_> = document_reader.by_ref().collect();
        let ids: Vec<&str> = documents.iter().map(|document| document.id.as_str()).collect();

        assert_eq!(ids, vec!["1", "3", "5"]);
        assert_eq!(documents[1].title, "a > b");
        assert_eq!(documents[2].title, "single quotes");

        let stats = document_reader.stats();
        assert_eq!(stats.scanned, 4);
        assert_eq!(stats.malformed, 1);
    }

    #[test]
    fn test_units_split_across_buffer_boundaries() {
        let xml = concat!(
            r#"<posts><row Id="1" PostTypeId="1" Title="go" />"#,
            r#"<row Id="2" PostTypeId="1" /></posts>"#,
        );
        let source = std::io::BufReader::with_capacity(3, xml.as_bytes());
        let mut document_reader = DocumentReader::new(source);

        assert_eq!(document_ids(&mut document_reader), vec!["1", "2"]);
        assert_eq!(document_reader.stats().malformed, 0);
    }

    #[test]
    fn test_rows_with_children_are_read() {
        let xml = r#"<posts><row Id="7" PostTypeId="1" Title="Rust"></row></posts>"#;
        let mut document_reader = DocumentReader::new(xml.as_bytes());

        assert_eq!(document_ids(&mut document_reader), vec!["7"]);
    }

    #[test]
    fn test_empty_input() {
        let mut document_reader = DocumentReader::new("".as_bytes());

        assert!(document_ids(&mut document_reader).is_empty());
        assert_eq!(document_reader.stats(), ReaderStats::default());
    }

    #[test]
    fn test_reads_gzipped_corpus() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("Posts.xml.gz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder
            .write_all(&fs::read(TEST_POSTS_XML_PATH).unwrap())
            .unwrap();
        encoder.finish().unwrap();

        let mut document_reader = DocumentReader::from_path(&path).unwrap();
        assert_eq!(document_ids(&mut document_reader).len(), 6);
    }

    #[test]
    fn test_missing_corpus_file() {
        let result = DocumentReader::from_path(Path::new("tests/test_files/missing.xml"));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}
