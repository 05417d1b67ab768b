use tech_sniffer::Tokenizer;

#[cfg(test)]
mod text_doc_tokenizer_tests {
    use super::*;

    #[test]
    fn test_lowercases_input() {
        let tokenizer = Tokenizer::text_doc_parser();

        let tokens = tokenizer.tokenize("Learning RUST with Go");
        assert_eq!(tokens, vec!["learning", "rust", "with", "go"]);
    }

    #[test]
    fn test_keeps_token_punctuation() {
        let tokenizer = Tokenizer::text_doc_parser();

        let tokens = tokenizer.tokenize("C# vs C++ vs node.js vs objective-c");
        assert_eq!(
            tokens,
            vec!["c#", "vs", "c++", "vs", "node.js", "vs", "objective-c"]
        );
    }

    #[test]
    fn test_splits_on_markup_and_other_punctuation() {
        let tokenizer = Tokenizer::text_doc_parser();

        let tokens = tokenizer.tokenize("<p>Use (rust), not: 'go'!</p>");
        assert_eq!(tokens, vec!["p", "use", "rust", "not", "go", "p"]);
    }

    #[test]
    fn test_non_ascii_letters_separate_tokens() {
        let tokenizer = Tokenizer::text_doc_parser();

        let tokens = tokenizer.tokenize("파이썬python과rust");
        assert_eq!(tokens, vec!["python", "rust"]);
    }

    #[test]
    fn test_empty_text() {
        let tokenizer = Tokenizer::text_doc_parser();

        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("  !!! ??? ").is_empty());
    }
}

#[cfg(test)]
mod technology_name_tokenizer_tests {
    use super::*;

    #[test]
    fn test_multi_word_name() {
        let tokenizer = Tokenizer::technology_name_parser();

        let tokens = tokenizer.tokenize("ruby on rails");
        assert_eq!(tokens, vec!["ruby", "on", "rails"]);
    }
}

#[cfg(test)]
mod tag_normalization_tests {
    use super::*;

    #[test]
    fn test_pipe_delimited_tags() {
        assert_eq!(Tokenizer::normalize_tags("|python|django|"), "python django");
    }

    #[test]
    fn test_angle_bracket_tags() {
        assert_eq!(Tokenizer::normalize_tags("<Python><Django>"), "python django");
    }

    #[test]
    fn test_hyphenated_tags_are_also_spaced() {
        assert_eq!(
            Tokenizer::normalize_tags("|react-native|go|"),
            "react-native react native go"
        );
    }

    #[test]
    fn test_empty_tags() {
        assert_eq!(Tokenizer::normalize_tags(""), "");
        assert_eq!(Tokenizer::normalize_tags("||"), "");
    }

    #[test]
    fn test_build_searchable_text() {
        let text = Tokenizer::build_searchable_text(
            "  Hello   World ",
            "Some\n\tBody",
            "<c#><asp.net-core>",
        );

        assert_eq!(text, "hello world some body c# asp.net-core asp.net core");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            Tokenizer::normalize_whitespace("  Ruby \t on\n\nRails  "),
            "Ruby on Rails"
        );
    }
}
