pub mod canonical_post_url;
pub use canonical_post_url::canonical_post_url;

pub mod open_input;
pub use open_input::open_input;

pub mod parse_creation_timestamp;
pub use parse_creation_timestamp::parse_creation_timestamp;

pub mod parse_date_argument;
pub use parse_date_argument::parse_date_argument;

pub mod slugify;
pub use slugify::slugify;
