pub mod braces;
pub mod class_header;
pub mod imports;
pub mod noise;
pub mod punctuation;
pub mod semicolon;
pub mod strings;
pub mod throws;
