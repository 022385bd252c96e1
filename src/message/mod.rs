//! Inbound line decoding

mod parser;

pub use parser::{ParsedLine, encode_user_message, parse_line};
