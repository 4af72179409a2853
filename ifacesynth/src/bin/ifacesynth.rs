// ifacesynth command-line binary
// Generates a Go interface from the methods of a struct declared in one or more Go files

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ifacesynth::{
    config::{Defaults, GeneratorConfig},
    expand_file_patterns, synthesize, SynthesisOptions,
};

#[derive(Parser, Debug)]
#[command(name = "ifacesynth")]
#[command(about = "Generate a Go interface from the methods of a struct")]
#[command(version)]
struct Args {
    /// Go source file or glob pattern to read; repeatable
    #[arg(short = 'f', long = "file", value_name = "FILE", required = true)]
    files: Vec<String>,

    /// Name of the struct whose methods form the interface
    #[arg(short = 's', long = "struct", value_name = "NAME")]
    struct_type: String,

    /// Name of the generated interface
    #[arg(short = 'i', long = "iface", value_name = "NAME")]
    iface: String,

    /// Package of the generated file
    #[arg(short = 'p', long = "pkg", value_name = "NAME")]
    pkg: String,

    /// Comment placed above the interface
    #[arg(short = 'y', long = "iface-comment", value_name = "TEXT")]
    iface_comment: Option<String>,

    /// Copy method doc comments (-d=false to disable)
    #[arg(
        short = 'd',
        long = "doc",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    copy_docs: Option<bool>,

    /// Append the struct's doc comment to the interface comment
    #[arg(short = 'D', long = "type-doc")]
    copy_type_doc: bool,

    /// Header comment of the generated file
    #[arg(short = 'c', long = "comment", value_name = "TEXT")]
    comment: Option<String>,

    /// Write the result to this file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Module to dot-import into the generated file
    #[arg(short = 'm', long = "import-module", value_name = "MODULE")]
    import_module: Option<String>,

    /// Include methods promoted from embedded structs
    #[arg(short = 'P', long = "promoted")]
    promoted: bool,

    /// Include unexported methods
    #[arg(short = 'n', long = "not-exported")]
    not_exported: bool,

    /// Method to leave out of the interface; repeatable
    #[arg(short = 'e', long = "exclude", value_name = "METHOD")]
    exclude: Vec<String>,

    /// TOML file with default option values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let directive = if verbose {
        "ifacesynth=debug"
    } else {
        "ifacesynth=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_options(args: Args, files: Vec<PathBuf>, defaults: &Defaults) -> SynthesisOptions {
    let iface_comment = args
        .iface_comment
        .unwrap_or_else(|| format!("{} ...", args.iface));
    SynthesisOptions {
        files,
        struct_type: args.struct_type,
        comment: defaults.comment_or(args.comment),
        pkg_name: args.pkg,
        with_promoted: args.promoted || defaults.with_promoted.unwrap_or(false),
        iface_name: args.iface,
        iface_comment,
        import_module: defaults.import_module_or(args.import_module),
        copy_docs: args.copy_docs.or(defaults.copy_docs).unwrap_or(true),
        copy_type_doc: args.copy_type_doc || defaults.copy_type_doc.unwrap_or(false),
        exclude_methods: defaults.exclusions_with(args.exclude),
        with_not_exported: args.not_exported || defaults.with_not_exported.unwrap_or(false),
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::load_from_file(path)?,
        None => GeneratorConfig::default(),
    };
    let files = expand_file_patterns(&args.files)?;
    let output = args.output.clone();
    let options = build_options(args, files, &config.defaults);

    let result = synthesize(&options)?;
    match output {
        Some(path) => fs::write(&path, &result)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", result),
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}
