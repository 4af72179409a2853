//! End-to-end interface synthesis over a set of Go source files.
//!
//! A run reads every input file once, then:
//!
//! 1. collects declared types and embedding relations from all files,
//! 2. checks that the target struct is declared somewhere,
//! 3. extracts methods per file and merges them, direct methods of every
//!    file ahead of promoted ones, first occurrence of a name winning,
//! 4. drops excluded methods and emits the formatted interface.

use std::collections::HashSet;
use std::path::PathBuf;

use indexmap::IndexSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::embedding::EmbeddingGraph;
use crate::emitter::{emit, InterfaceDecl};
use crate::extractor::{extract_methods, ExtractOptions, Extraction, Method};
use crate::formatter::{CodeFormatter, FormatError, GoFormatter};
use crate::input_handling::{FsSourceReader, SourceReader};
use crate::parser::{ParseError, ParsedFile};
use crate::scanner::{declared_types, DeclaredType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisOptions {
    pub files: Vec<PathBuf>,
    /// Struct whose methods form the interface.
    pub struct_type: String,
    /// Header comment, without the `//` marker.
    pub comment: String,
    pub pkg_name: String,
    pub with_promoted: bool,
    pub iface_name: String,
    pub iface_comment: String,
    /// Module imported with `.` into the generated file.
    pub import_module: Option<String>,
    pub copy_docs: bool,
    pub copy_type_doc: bool,
    pub exclude_methods: Vec<String>,
    pub with_not_exported: bool,
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("no input files")]
    NoInputFiles,

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{source}", .path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("\"{0}\" type not found in input files")]
    NotFound(String),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// State accumulated over one run. Nothing outlives the run.
#[derive(Debug, Default)]
pub struct RunContext {
    declared: Vec<DeclaredType>,
    graph: EmbeddingGraph,
    methods: Vec<Method>,
    method_names: HashSet<String>,
    imports: IndexSet<String>,
    type_doc: Option<String>,
    type_params: Option<String>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_declared_types(&mut self, types: impl IntoIterator<Item = DeclaredType>) {
        for declared in types {
            if self.declared.contains(&declared) {
                debug!("{} declared more than once", declared);
                continue;
            }
            self.declared.push(declared);
        }
    }

    /// Declared types in first-occurrence order, unique by name and package.
    pub fn known_types(&self) -> &[DeclaredType] {
        &self.declared
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.iter().any(|declared| declared.name == name)
    }

    pub fn merge_graph(&mut self, graph: EmbeddingGraph) {
        self.graph.merge(graph);
    }

    pub fn embedded_closure(&self, root: &str) -> IndexSet<String> {
        self.graph.closure(root)
    }

    /// Adds methods whose name has not been seen yet in this run.
    pub fn merge_methods<'m>(&mut self, methods: impl IntoIterator<Item = &'m Method>) {
        for method in methods {
            if self.method_names.insert(method.name.clone()) {
                self.methods.push(method.clone());
            } else {
                debug!("skipping duplicate method {}", method.name);
            }
        }
    }

    pub fn merge_imports(&mut self, imports: impl IntoIterator<Item = String>) {
        self.imports.extend(imports);
    }

    /// The first file that provides a type doc or type parameter list wins.
    pub fn merge_fragments(&mut self, extraction: &Extraction) {
        if self.type_doc.is_none() {
            self.type_doc = extraction.type_doc.clone();
        }
        if self.type_params.is_none() {
            self.type_params = extraction.type_params.clone();
        }
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn imports(&self) -> impl Iterator<Item = &String> {
        self.imports.iter()
    }

    pub fn type_doc(&self) -> Option<&str> {
        self.type_doc.as_deref()
    }

    pub fn type_params(&self) -> Option<&str> {
        self.type_params.as_deref()
    }
}

/// Interface doc from the user comment and the struct's own doc.
pub fn compose_iface_doc(iface_comment: &str, type_doc: Option<&str>) -> String {
    match type_doc {
        Some(type_doc) if iface_comment.is_empty() => type_doc.to_string(),
        Some(type_doc) => format!("{}\n{}", iface_comment, type_doc),
        None => iface_comment.to_string(),
    }
}

pub struct Synthesizer<R = FsSourceReader, F = GoFormatter> {
    reader: R,
    formatter: F,
}

impl Synthesizer {
    pub fn new() -> Self {
        Synthesizer {
            reader: FsSourceReader,
            formatter: GoFormatter,
        }
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SourceReader, F: CodeFormatter> Synthesizer<R, F> {
    pub fn with_parts(reader: R, formatter: F) -> Self {
        Synthesizer { reader, formatter }
    }

    fn load(&self, paths: &[PathBuf]) -> Result<Vec<ParsedFile>, SynthesisError> {
        paths
            .iter()
            .map(|path| {
                let bytes = self
                    .reader
                    .read_source(path)
                    .map_err(|source| SynthesisError::Io {
                        path: path.clone(),
                        source,
                    })?;
                ParsedFile::parse(&bytes).map_err(|source| SynthesisError::Syntax {
                    path: path.clone(),
                    source,
                })
            })
            .collect()
    }

    pub fn synthesize(&self, options: &SynthesisOptions) -> Result<String, SynthesisError> {
        if options.files.is_empty() {
            return Err(SynthesisError::NoInputFiles);
        }
        let files = self.load(&options.files)?;

        let mut ctx = RunContext::new();
        for (path, parsed) in options.files.iter().zip(&files) {
            let types = declared_types(&parsed.file);
            debug!(
                "{}: package {}, {} declared type(s)",
                path.display(),
                parsed.file.package,
                types.len()
            );
            ctx.add_declared_types(types);
            ctx.merge_graph(EmbeddingGraph::from_file(&parsed.file));
        }

        if !ctx.is_declared(&options.struct_type) {
            return Err(SynthesisError::NotFound(options.struct_type.clone()));
        }

        let closure = ctx.embedded_closure(&options.struct_type);
        let extractions: Vec<Extraction> = {
            let extract_options = ExtractOptions {
                copy_docs: options.copy_docs,
                copy_type_doc: options.copy_type_doc,
                dest_package: &options.pkg_name,
                known_types: ctx.known_types(),
                import_override: options.import_module.as_deref(),
                include_unexported: options.with_not_exported,
                embedded_closure: Some(&closure),
                include_promoted: options.with_promoted,
            };
            files
                .iter()
                .map(|parsed| extract_methods(parsed, &options.struct_type, &extract_options))
                .collect()
        };

        for extraction in &extractions {
            ctx.merge_methods(&extraction.direct);
        }
        for extraction in &extractions {
            ctx.merge_methods(&extraction.promoted);
        }
        for extraction in extractions {
            ctx.merge_fragments(&extraction);
            ctx.merge_imports(extraction.imports);
        }

        let excluded: HashSet<&str> = options.exclude_methods.iter().map(String::as_str).collect();
        let method_lines: Vec<String> = ctx
            .methods()
            .iter()
            .filter(|method| !excluded.contains(method.name.as_str()))
            .flat_map(Method::lines)
            .collect();
        let imports: Vec<String> = ctx.imports().cloned().collect();
        let doc = compose_iface_doc(&options.iface_comment, ctx.type_doc());

        info!(
            "generating {} with {} method(s) from {} file(s)",
            options.iface_name,
            ctx.methods().len(),
            files.len()
        );

        let decl = InterfaceDecl {
            header_comment: &options.comment,
            package: &options.pkg_name,
            name: &options.iface_name,
            doc: &doc,
            type_params: ctx.type_params().unwrap_or_default(),
            methods: &method_lines,
            imports: &imports,
        };
        Ok(emit(&decl, &self.formatter)?)
    }
}

/// Synthesizes an interface from files on disk.
pub fn synthesize(options: &SynthesisOptions) -> Result<String, SynthesisError> {
    Synthesizer::new().synthesize(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;

    #[derive(Default)]
    struct MemoryReader(HashMap<PathBuf, String>);

    impl MemoryReader {
        fn with(mut self, path: &str, content: &str) -> Self {
            self.0.insert(PathBuf::from(path), content.to_string());
            self
        }
    }

    impl SourceReader for MemoryReader {
        fn read_source(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.0
                .get(path)
                .map(|content| content.clone().into_bytes())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    /// Returns the unformatted text so tests can see exactly what was emitted.
    struct Identity;

    impl CodeFormatter for Identity {
        fn format(
            &self,
            code: &str,
            _options: &crate::formatter::ImportOptions,
        ) -> Result<String, FormatError> {
            Ok(code.to_string())
        }
    }

    const OUTER: &str = "package a\n\n// Outer doc.\ntype Outer struct {\n\tInner\n}\n\nfunc (o *Outer) Run() {}\n\nfunc (o *Outer) Shared() int { return 1 }\n";
    const INNER: &str = "package a\n\ntype Inner struct{}\n\nfunc (i *Inner) Shared() string { return \"\" }\n\nfunc (i *Inner) Help() {}\n\nfunc (o *Outer) Late() {}\n";

    fn options(files: &[&str]) -> SynthesisOptions {
        SynthesisOptions {
            files: files.iter().map(PathBuf::from).collect(),
            struct_type: "Outer".to_string(),
            comment: "generated".to_string(),
            pkg_name: "a".to_string(),
            iface_name: "OuterIface".to_string(),
            ..Default::default()
        }
    }

    fn reader() -> MemoryReader {
        MemoryReader::default().with("outer.go", OUTER).with("inner.go", INNER)
    }

    #[test]
    fn direct_methods_across_files_precede_promoted() {
        let synth = Synthesizer::with_parts(reader(), Identity);
        let opts = SynthesisOptions {
            with_promoted: true,
            ..options(&["outer.go", "inner.go"])
        };
        let out = synth.synthesize(&opts).unwrap();
        assert!(out.ends_with(
            "type OuterIface interface {\nRun()\nShared() (int)\nLate()\nHelp()\n}"
        ));
    }

    #[test]
    fn promoted_methods_need_opt_in() {
        let synth = Synthesizer::with_parts(reader(), Identity);
        let out = synth.synthesize(&options(&["outer.go", "inner.go"])).unwrap();
        assert!(out.ends_with("interface {\nRun()\nShared() (int)\nLate()\n}"));
    }

    #[test]
    fn exclusions_apply_after_merge() {
        let synth = Synthesizer::with_parts(reader(), Identity);
        let opts = SynthesisOptions {
            with_promoted: true,
            exclude_methods: vec!["Shared".to_string(), "Help".to_string()],
            ..options(&["outer.go", "inner.go"])
        };
        let out = synth.synthesize(&opts).unwrap();
        assert!(out.ends_with("interface {\nRun()\nLate()\n}"));
    }

    #[test]
    fn missing_target_is_reported() {
        let synth = Synthesizer::with_parts(reader(), Identity);
        let opts = SynthesisOptions {
            struct_type: "Ghost".to_string(),
            ..options(&["outer.go"])
        };
        let err = synth.synthesize(&opts).unwrap_err();
        assert_eq!(err.to_string(), "\"Ghost\" type not found in input files");
    }

    #[test]
    fn unreadable_and_invalid_files() {
        let synth = Synthesizer::with_parts(
            reader().with("broken.go", "package\n"),
            Identity,
        );
        assert!(matches!(
            synth.synthesize(&options(&["nope.go"])),
            Err(SynthesisError::Io { .. })
        ));
        assert!(matches!(
            synth.synthesize(&options(&["outer.go", "broken.go"])),
            Err(SynthesisError::Syntax { .. })
        ));
        assert!(matches!(
            synth.synthesize(&options(&[])),
            Err(SynthesisError::NoInputFiles)
        ));
    }

    #[test]
    fn type_doc_is_appended_to_comment() {
        let synth = Synthesizer::with_parts(reader(), GoFormatter);
        let opts = SynthesisOptions {
            copy_type_doc: true,
            iface_comment: "OuterIface wraps Outer.".to_string(),
            ..options(&["outer.go"])
        };
        let out = synth.synthesize(&opts).unwrap();
        assert_eq!(
            out,
            "// generated\n\npackage a\n\n// OuterIface wraps Outer.\n// Outer doc.\ntype OuterIface interface {\n\tRun()\n\tShared() int\n}\n"
        );
    }

    #[test]
    fn doc_composition() {
        assert_eq!(compose_iface_doc("", Some("T doc")), "T doc");
        assert_eq!(compose_iface_doc("c", Some("T doc")), "c\nT doc");
        assert_eq!(compose_iface_doc("c", None), "c");
        assert_eq!(compose_iface_doc("", None), "");
    }

    #[test]
    fn run_context_deduplicates() {
        let mut ctx = RunContext::new();
        let m = Method {
            name: "A".to_string(),
            signature: "A()".to_string(),
            docs: vec![],
        };
        ctx.merge_methods([&m, &m]);
        ctx.merge_imports(["\"fmt\"".to_string(), "\"fmt\"".to_string()]);
        assert_eq!(ctx.methods().len(), 1);
        assert_eq!(ctx.imports().count(), 1);
        ctx.add_declared_types([DeclaredType::new("T", "p"), DeclaredType::new("T", "p")]);
        ctx.add_declared_types([DeclaredType::new("T", "q")]);
        assert!(ctx.is_declared("T"));
        assert!(!ctx.is_declared("U"));
        assert_eq!(
            ctx.known_types(),
            &[DeclaredType::new("T", "p"), DeclaredType::new("T", "q")]
        );
    }
}
