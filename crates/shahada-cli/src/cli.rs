//! CLI argument definitions using Clap v4

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// shahada - Arabic certificates from a template and four fields
#[derive(Parser, Debug)]
#[command(name = "shahada")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one certificate
    #[command(alias = "r")]
    Render(Box<RenderArgs>),

    /// Render one certificate per line of a JSONL file, in parallel
    Batch(BatchArgs),

    /// Collect the fields in a conversation on stdin, then render
    #[command(alias = "i")]
    Interactive(InteractiveArgs),
}

/// Template, font and layout shared by every command
#[derive(Args, Debug, Clone)]
pub struct ResourceArgs {
    /// Background template image
    #[arg(long = "template", default_value = "certificate_template.png")]
    pub template: PathBuf,

    /// Font file used for every field (.ttf, .otf)
    #[arg(long = "font", default_value = "NotoKufiArabic-Bold.ttf")]
    pub font: PathBuf,

    /// Face index for TTC/OTC collections
    #[arg(long = "face-index", default_value = "0")]
    pub face_index: u32,

    /// Layout JSON with anchors and body region (stock layout if omitted)
    #[arg(long = "layout")]
    pub layout: Option<PathBuf>,
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub resources: ResourceArgs,

    /// Title line
    #[arg(long = "title")]
    pub title: String,

    /// Recipient name
    #[arg(long = "name")]
    pub name: String,

    /// Role or subtitle line
    #[arg(long = "role")]
    pub role: String,

    /// Body paragraph
    #[arg(long = "body", conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the body paragraph from a file
    #[arg(long = "body-file", conflicts_with = "body")]
    pub body_file: Option<PathBuf>,

    /// Output file path
    #[arg(short = 'o', long = "output", default_value = "certificate.png")]
    pub output: PathBuf,

    /// Silent mode
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Arguments for the batch command
#[derive(Parser, Debug)]
pub struct BatchArgs {
    #[command(flatten)]
    pub resources: ResourceArgs,

    /// JSONL file with one job per line (reads from stdin if omitted)
    #[arg(short = 'j', long = "jobs")]
    pub jobs: Option<PathBuf>,

    /// Directory the certificates are written to
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// File name pattern for jobs without an output name ({} is the job number)
    #[arg(short = 'p', long = "pattern", default_value = "certificate-{}.png")]
    pub pattern: String,

    /// Silent mode
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Arguments for the interactive command
#[derive(Parser, Debug)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub resources: ResourceArgs,

    /// Output file path
    #[arg(short = 'o', long = "output", default_value = "certificate.png")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_args_parse() {
        let cli = Cli::parse_from([
            "shahada", "render", "--template", "t.png", "--font", "f.ttf", "--title", "عنوان",
            "--name", "اسم", "--role", "دور", "--body", "نص", "-o", "out.png",
        ]);
        let Commands::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.resources.template, PathBuf::from("t.png"));
        assert_eq!(args.title, "عنوان");
        assert_eq!(args.body.as_deref(), Some("نص"));
        assert_eq!(args.output, PathBuf::from("out.png"));
    }

    #[test]
    fn test_body_and_body_file_conflict() {
        let result = Cli::try_parse_from([
            "shahada", "render", "--title", "a", "--name", "b", "--role", "c", "--body", "d",
            "--body-file", "e.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_batch_defaults() {
        let cli = Cli::parse_from(["shahada", "batch", "--jobs", "jobs.jsonl"]);
        let Commands::Batch(args) = cli.command else {
            panic!("expected batch command");
        };
        assert_eq!(args.pattern, "certificate-{}.png");
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(args.resources.layout.is_none());
    }
}
