#[path = "../test_utils/lib.rs"]
mod test_utils;

use tech_sniffer::{Error, TechnologyTokenProcessor, Vocabulary};
use test_utils::{question, technology_names, vocabulary, with_body};

#[cfg(test)]
mod match_engine_tests {
    use super::*;

    fn matched_names(vocabulary: &Vocabulary, text: &str) -> Vec<String> {
        let technology_token_processor = TechnologyTokenProcessor::new(vocabulary).unwrap();
        let matches = technology_token_processor.process_text_doc(text);

        technology_names(vocabulary, &matches)
    }

    #[test]
    fn test_single_token_match() {
        let vocabulary = vocabulary(&["Go", "Rust"]);

        assert_eq!(
            matched_names(&vocabulary, "i write go every day"),
            vec!["Go"]
        );
    }

    #[test]
    fn test_multi_token_match_is_contiguous() {
        let vocabulary = vocabulary(&["React Native"]);

        assert_eq!(
            matched_names(&vocabulary, "built with react native today"),
            vec!["React Native"]
        );
        assert!(matched_names(&vocabulary, "native development using react").is_empty());
        assert!(matched_names(&vocabulary, "react is not native").is_empty());
    }

    #[test]
    fn test_multi_token_match_at_document_edges() {
        let vocabulary = vocabulary(&["Ruby on Rails"]);

        assert_eq!(
            matched_names(&vocabulary, "ruby on rails"),
            vec!["Ruby on Rails"]
        );
        assert_eq!(
            matched_names(&vocabulary, "ruby ruby on rails"),
            vec!["Ruby on Rails"]
        );
        assert!(matched_names(&vocabulary, "ruby on").is_empty());
    }

    #[test]
    fn test_unknown_tokens_break_contiguity() {
        let vocabulary = vocabulary(&["Spring Boot"]);

        assert!(matched_names(&vocabulary, "spring xyz boot").is_empty());
    }

    #[test]
    fn test_mentions_are_deduplicated() {
        let vocabulary = vocabulary(&["Go", "React Native"]);

        assert_eq!(
            matched_names(&vocabulary, "go go go react native and react native again"),
            vec!["Go", "React Native"]
        );
    }

    #[test]
    fn test_matches_follow_vocabulary_order() {
        let vocabulary = vocabulary(&["Rust", "Go", "Python"]);

        assert_eq!(
            matched_names(&vocabulary, "python then go then rust"),
            vec!["Rust", "Go", "Python"]
        );
    }

    #[test]
    fn test_overlapping_names_all_match() {
        let vocabulary = vocabulary(&["React", "React Native"]);

        assert_eq!(
            matched_names(&vocabulary, "react native"),
            vec!["React", "React Native"]
        );
    }

    #[test]
    fn test_no_punctuation_normalization() {
        let vocabulary = vocabulary(&["Go", "Node.js"]);

        // A trailing period stays part of the token
        assert!(matched_names(&vocabulary, "i use go.").is_empty());
        assert_eq!(matched_names(&vocabulary, "on node.js"), vec!["Node.js"]);
        assert!(matched_names(&vocabulary, "on node js").is_empty());
    }

    #[test]
    fn test_noise_names_never_match() {
        let vocabulary = vocabulary(&["JS", "Make", "Go", "Kotlin"]);

        assert_eq!(
            matched_names(&vocabulary, "make js work, go kotlin"),
            vec!["Go", "Kotlin"]
        );
    }

    #[test]
    fn test_empty_document() {
        let vocabulary = vocabulary(&["Go"]);

        assert!(matched_names(&vocabulary, "").is_empty());
    }

    #[test]
    fn test_multi_token_name_longer_than_document() {
        let vocabulary = vocabulary(&["Visual Studio Code"]);

        assert!(matched_names(&vocabulary, "visual studio").is_empty());
    }

    #[test]
    fn test_document_scenario() {
        let vocabulary = vocabulary(&["go", "react native", "c#"]);
        let technology_token_processor = TechnologyTokenProcessor::new(&vocabulary).unwrap();

        let document = question("1", "I love go and C# today", "react-native|go", 100);
        let matches = technology_token_processor.process_document(&document);

        assert_eq!(
            technology_names(&vocabulary, &matches),
            vec!["go", "react native", "c#"]
        );
    }

    #[test]
    fn test_document_body_and_angle_tags() {
        let vocabulary = vocabulary(&["Python", "Docker", "Spring Boot"]);
        let technology_token_processor = TechnologyTokenProcessor::new(&vocabulary).unwrap();

        let document = with_body(
            question("2", "Packaging question", "<spring-boot><docker>", 10),
            "<p>Calling Python from a container</p>",
        );
        let matches = technology_token_processor.process_document(&document);

        assert_eq!(
            technology_names(&vocabulary, &matches),
            vec!["Python", "Docker", "Spring Boot"]
        );
    }

    #[test]
    fn test_contains_contiguous_sequence() {
        let query = [Some(1), None, Some(2), Some(3)];

        assert!(TechnologyTokenProcessor::contains_contiguous_sequence(
            &query,
            &[2, 3]
        ));
        assert!(!TechnologyTokenProcessor::contains_contiguous_sequence(
            &query,
            &[1, 2]
        ));
        assert!(!TechnologyTokenProcessor::contains_contiguous_sequence(
            &query,
            &[]
        ));
        assert!(!TechnologyTokenProcessor::contains_contiguous_sequence(
            &query,
            &[1, 2, 3, 4, 5]
        ));
    }

    #[test]
    fn test_index_layout() {
        let vocabulary = vocabulary(&["Go", "React Native", "React"]);
        let technology_token_processor = TechnologyTokenProcessor::new(&vocabulary).unwrap();
        let technology_token_mapper = technology_token_processor.technology_token_mapper();

        let react_token_id = technology_token_mapper
            .token_mapper
            .get_token_id("react")
            .unwrap();

        assert_eq!(
            technology_token_mapper.get_single_token_technologies(&react_token_id),
            &[2]
        );
        assert_eq!(
            technology_token_mapper.get_multi_token_candidates(&react_token_id),
            &[1]
        );
        assert_eq!(
            technology_token_mapper
                .get_technology_token_sequence(1)
                .len(),
            2
        );
    }

    #[test]
    fn test_index_is_reproducible() {
        let names = ["Go", "React Native", "C#", "Ruby on Rails", "Rust"];

        let first = TechnologyTokenProcessor::new(&vocabulary(&names)).unwrap();
        let second = TechnologyTokenProcessor::new(&vocabulary(&names)).unwrap();

        let text = "ruby on rails with go and c# and react native";
        assert_eq!(
            first.process_text_doc(text),
            second.process_text_doc(text)
        );
        assert_eq!(
            first.technology_token_mapper().token_mapper.get_token_count(),
            second.technology_token_mapper().token_mapper.get_token_count()
        );
    }

    #[test]
    fn test_processor_requires_indexable_vocabulary() {
        let result = Vocabulary::from_names(["make"]).and_then(|v| {
            TechnologyTokenProcessor::new(&v).map(|_| ())
        });

        assert!(matches!(result, Err(Error::EmptyVocabulary)));
    }
}
