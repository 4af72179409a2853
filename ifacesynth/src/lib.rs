//! Generate Go interface declarations from the method sets of Go structs.
//!
//! The pipeline reads Go sources with a pest grammar, resolves which methods
//! belong to a struct (optionally including methods promoted through
//! embedding), rewrites their parameter types for the destination package and
//! prints a formatted interface file.

pub mod ast;
pub mod comments;
pub mod config;
pub mod embedding;
pub mod emitter;
pub mod extractor;
pub mod formatter;
pub mod input_handling;
pub mod parser;
pub mod scanner;
pub mod synthesis;
pub mod type_ref;

pub use config::{GeneratorConfig, DEFAULT_COMMENT};
pub use embedding::{scan_embedding_graph, EmbeddingGraph};
pub use emitter::{emit, InterfaceDecl};
pub use extractor::{extract_methods, extract_methods_from_source, ExtractOptions, Extraction, Method};
pub use formatter::{CodeFormatter, FormatError, GoFormatter, ImportOptions};
pub use input_handling::{expand_file_patterns, FsSourceReader, InputError, SourceReader};
pub use parser::{ParseError, ParsedFile};
pub use scanner::{scan_declared_types, DeclaredType};
pub use synthesis::{synthesize, RunContext, SynthesisError, SynthesisOptions, Synthesizer};
pub use type_ref::{format_field_list, format_type_ref, TypeRefFormatter};
