#[path = "../test_utils/lib.rs"]
mod test_utils;

use std::fs::File;
use std::io::Write;
use std::path::Path;
use tech_sniffer::{Error, Vocabulary};
use test_utils::constants::TEST_TECH_STACKS_CSV_PATH;

#[cfg(test)]
mod vocabulary_tests {
    use super::*;

    fn normalized_names(vocabulary: &Vocabulary) -> Vec<&str> {
        vocabulary
            .entries()
            .iter()
            .map(|entry| entry.normalized_name.as_str())
            .collect()
    }

    #[test]
    fn test_normalizes_names() {
        let vocabulary = Vocabulary::from_names(["  React \t  Native ", "Node.JS"]).unwrap();

        let entry = &vocabulary.entries()[0];
        assert_eq!(entry.canonical_name, "React Native");
        assert_eq!(entry.normalized_name, "react native");
        assert_eq!(entry.tokens, vec!["react", "native"]);
        assert!(entry.is_multi_token());

        assert_eq!(vocabulary.entries()[1].normalized_name, "node.js");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let vocabulary = Vocabulary::from_names(["Go", "Rust", "GO", "go "]).unwrap();

        assert_eq!(normalized_names(&vocabulary), vec!["go", "rust"]);
        assert_eq!(vocabulary.entries()[0].canonical_name, "Go");
    }

    #[test]
    fn test_excludes_generic_words() {
        let vocabulary = Vocabulary::from_names(["Make", "Stream", "Crystal", "Kotlin"]).unwrap();

        assert_eq!(normalized_names(&vocabulary), vec!["kotlin"]);
        assert_eq!(vocabulary.excluded(), &["make", "stream", "crystal"]);
    }

    #[test]
    fn test_excludes_short_alphabetic_names() {
        let vocabulary = Vocabulary::from_names(["JS", "x", "Vue", "k8"]).unwrap();

        // "k8" is not purely alphabetic, "vue" is longer than two characters
        assert_eq!(normalized_names(&vocabulary), vec!["vue", "k8"]);
    }

    #[test]
    fn test_allow_list_wins() {
        let vocabulary =
            Vocabulary::from_names(["Go", "R", "C", "C#", "C++", "Qt", "D3", "D"]).unwrap();

        assert_eq!(
            normalized_names(&vocabulary),
            vec!["go", "r", "c", "c#", "c++", "qt", "d3"]
        );
        assert_eq!(vocabulary.excluded(), &["d"]);
    }

    #[test]
    fn test_names_without_tokens_are_excluded() {
        let vocabulary = Vocabulary::from_names(["!!!", "", "   ", "Rust"]).unwrap();

        assert_eq!(normalized_names(&vocabulary), vec!["rust"]);
        assert_eq!(vocabulary.excluded(), &["!!!"]);
    }

    #[test]
    fn test_empty_vocabulary_is_an_error() {
        let result = Vocabulary::from_names(["make", "js", ""]);
        assert!(matches!(result, Err(Error::EmptyVocabulary)));

        let result = Vocabulary::from_names(Vec::<String>::new());
        assert!(matches!(result, Err(Error::EmptyVocabulary)));
    }

    #[test]
    fn test_find_normalizes_the_query() {
        let vocabulary = Vocabulary::from_names(["Go", "React Native"]).unwrap();

        assert_eq!(vocabulary.find("  react   NATIVE"), Some(1));
        assert_eq!(vocabulary.find("GO"), Some(0));
        assert_eq!(vocabulary.find("rust"), None);
    }

    #[test]
    fn test_is_noise() {
        assert!(Vocabulary::is_noise("", &[]));
        assert!(Vocabulary::is_noise("js", &["js".to_string()]));
        assert!(!Vocabulary::is_noise("go", &["go".to_string()]));
        assert!(!Vocabulary::is_noise(
            "ab cd",
            &["ab".to_string(), "cd".to_string()]
        ));
    }

    #[test]
    fn test_from_csv_path() {
        let vocabulary = Vocabulary::from_csv_path(Path::new(TEST_TECH_STACKS_CSV_PATH)).unwrap();

        assert_eq!(
            normalized_names(&vocabulary),
            vec!["go", "react native", "c#", "python", "rust", "docker"]
        );
        assert_eq!(vocabulary.excluded(), &["make", "js"]);
    }

    #[test]
    fn test_from_gzipped_csv_path() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("tech_stacks.csv.gz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"Name\nRust\nGo\n").unwrap();
        encoder.finish().unwrap();

        let vocabulary = Vocabulary::from_csv_path(&path).unwrap();
        assert_eq!(normalized_names(&vocabulary), vec!["rust", "go"]);
    }

    #[test]
    fn test_csv_without_name_column() {
        let result = Vocabulary::read_names_from_csv("Title,Link\nRust,x\n".as_bytes());
        assert!(matches!(result, Err(Error::ParserError(_))));
    }

    #[test]
    fn test_missing_csv_file() {
        let result = Vocabulary::from_csv_path(Path::new("tests/test_files/does_not_exist.csv"));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}
