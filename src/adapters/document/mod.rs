//! Document adapters: filesystem reading and markdown parsing.

mod fs_document_reader;
mod markdown_decision_parser;

pub use fs_document_reader::FsDocumentReader;
pub use markdown_decision_parser::MarkdownDecisionParser;
