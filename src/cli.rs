use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes an example book manifest to get started with
    Init {
        /// Where to write the manifest (.toml or .json)
        #[clap(default_value = "book.toml")]
        path: PathBuf,
    },
    /// Assembles the book described by a manifest into an EPUB
    Render {
        /// Book manifest (.toml or .json)
        #[clap(default_value = "book.toml")]
        manifest: PathBuf,
        /// Output path without the .epub extension, overriding the manifest
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Prints the stylesheet that would be generated for a manifest
    Stylesheet {
        /// Book manifest (.toml or .json)
        #[clap(default_value = "book.toml")]
        manifest: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Print detailed progress to stderr
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}
