//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use schemaweave_codec::ConstPolicy;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Schemaweave CLI - JSON Schema composition codec
///
/// Decode JSON documents against declared shapes, re-encode them through the
/// fragment merger, and check shape declarations.
#[derive(Parser, Debug)]
#[command(
    name = "schemaweave",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SCHEMAWEAVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a JSON document against a shape and report how it was routed
    Decode(DecodeArgs),

    /// Decode a JSON document, then print its canonical re-encoding
    Encode(EncodeArgs),

    /// Validate a shape declaration and summarize it
    Check(CheckArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the decode command
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// JSON document to decode, or `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Shape declaration (JSON or YAML); defaults to the configured shape
    #[arg(short, long, value_name = "SHAPE_FILE")]
    pub shape: Option<PathBuf>,

    /// Override the const policy of every object in the shape
    #[arg(long, value_enum)]
    pub const_policy: Option<ConstPolicyArg>,
}

/// Arguments for the encode command
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// JSON document to re-encode, or `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Shape declaration (JSON or YAML); defaults to the configured shape
    #[arg(short, long, value_name = "SHAPE_FILE")]
    pub shape: Option<PathBuf>,

    /// Override the const policy of every object in the shape
    #[arg(long, value_enum)]
    pub const_policy: Option<ConstPolicyArg>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Shape declaration to check (JSON or YAML)
    #[arg(value_name = "SHAPE_FILE")]
    pub shape_file: PathBuf,

    /// Print the normalized declaration after the summary
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl OutputFormat {
    /// Parse a format name as written in configuration files
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Const policy as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConstPolicyArg {
    /// A missing const key fails the decode
    Strict,
    /// Consts are only checked when present
    Lenient,
}

impl From<ConstPolicyArg> for ConstPolicy {
    fn from(policy: ConstPolicyArg) -> Self {
        match policy {
            ConstPolicyArg::Strict => ConstPolicy::Strict,
            ConstPolicyArg::Lenient => ConstPolicy::Lenient,
        }
    }
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: None,
            no_color: false,
            command: Commands::Check(CheckArgs {
                shape_file: PathBuf::from("shape.json"),
                detailed: false,
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_decode_args() {
        let cli = Cli::parse_from([
            "schemaweave",
            "-o",
            "json-pretty",
            "decode",
            "doc.json",
            "--shape",
            "shape.yaml",
            "--const-policy",
            "strict",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::JsonPretty));
        match cli.command {
            Commands::Decode(args) => {
                assert_eq!(args.input, PathBuf::from("doc.json"));
                assert_eq!(args.shape, Some(PathBuf::from("shape.yaml")));
                assert_eq!(args.const_policy, Some(ConstPolicyArg::Strict));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_stdin_input() {
        let cli = Cli::parse_from(["schemaweave", "encode", "-", "--pretty"]);
        match cli.command {
            Commands::Encode(args) => {
                assert_eq!(args.input, PathBuf::from("-"));
                assert!(args.pretty);
                assert!(args.shape.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_format_from_name() {
        assert_eq!(OutputFormat::from_name("yaml"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_name("JSON-PRETTY"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::from_name("xml"), None);
    }
}
