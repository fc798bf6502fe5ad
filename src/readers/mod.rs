pub mod response_parser;

pub use response_parser::{parse_timestamp, ResponseParser};
