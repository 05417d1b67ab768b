pub const TEST_FILES_DIRECTORY: &str = "tests/test_files";

pub const TEST_POSTS_XML_PATH: &str = "tests/test_files/posts_sample.xml";

pub const TEST_MALFORMED_POSTS_XML_PATH: &str = "tests/test_files/posts_malformed.xml";

pub const TEST_TECH_STACKS_CSV_PATH: &str = "tests/test_files/tech_stacks.csv";
