#![allow(dead_code)]

use chrono::{DateTime, Utc};
use csv::StringRecord;
use std::fs::File;
use std::path::Path;
use tech_sniffer::utils::parse_creation_timestamp;
use tech_sniffer::{Document, PostType, Vocabulary};
pub mod constants;

/// Builds a primary post with the given fields; body and creation date are empty.
pub fn question(id: &str, title: &str, tags: &str, view_count: u64) -> Document {
    Document {
        id: id.to_string(),
        post_type: PostType::Question,
        title: title.to_string(),
        body: String::new(),
        tags: tags.to_string(),
        view_count,
        created_at: None,
    }
}

/// Builds an answer, which the filter always rejects.
pub fn answer(id: &str, body: &str, view_count: u64) -> Document {
    Document {
        id: id.to_string(),
        post_type: PostType::Answer,
        title: String::new(),
        body: body.to_string(),
        tags: String::new(),
        view_count,
        created_at: None,
    }
}

pub fn with_body(mut document: Document, body: &str) -> Document {
    document.body = body.to_string();
    document
}

pub fn created_at(mut document: Document, timestamp: &str) -> Document {
    document.created_at = Some(timestamp_utc(timestamp));
    document
}

pub fn timestamp_utc(timestamp: &str) -> DateTime<Utc> {
    parse_creation_timestamp(timestamp).expect("Failed to parse test timestamp")
}

pub fn vocabulary(names: &[&str]) -> Vocabulary {
    Vocabulary::from_names(names).expect("Failed to build test vocabulary")
}

/// Names of the matched technologies, in match order.
pub fn technology_names(vocabulary: &Vocabulary, matches: &[usize]) -> Vec<String> {
    matches
        .iter()
        .map(|technology_index| {
            vocabulary
                .get(*technology_index)
                .expect("Match outside the vocabulary")
                .canonical_name
                .clone()
        })
        .collect()
}

/// Reads a CSV file into its header and records.
pub fn read_csv(path: &Path) -> (StringRecord, Vec<StringRecord>) {
    let file = File::open(path).expect("Failed to open CSV output");
    read_csv_from(file)
}

pub fn read_csv_from<R: std::io::Read>(reader: R) -> (StringRecord, Vec<StringRecord>) {
    let mut reader = csv::Reader::from_reader(reader);

    let header = reader.headers().expect("Failed to read CSV header").clone();
    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("Failed to read CSV records");

    (header, records)
}

/// Finds the record whose first column equals `key`.
pub fn find_record<'a>(records: &'a [StringRecord], key: &str) -> Option<&'a StringRecord> {
    records.iter().find(|record| record.get(0) == Some(key))
}
