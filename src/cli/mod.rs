// src/cli/mod.rs — CLI definition (clap derive)

pub mod draft;
pub mod publish;
pub mod styles;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wxdraft",
    about = "Draft articles with an LLM and push them to a WeChat Official Account draft box",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress at info level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish a Markdown file to the draft box
    Publish(PublishArgs),
    /// Generate a draft, optionally revise and publish it
    Draft(DraftArgs),
    /// List available style presets
    Styles,
}

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// Markdown file to publish
    #[arg(long)]
    pub md: PathBuf,
    /// Article title
    #[arg(long)]
    pub title: String,
    /// Cover image (jpg/png)
    #[arg(long)]
    pub cover: PathBuf,
    #[arg(long, default_value = "")]
    pub author: String,
    /// Summary shown in the feed; derived from the body when omitted
    #[arg(long, default_value = "")]
    pub digest: String,
}

#[derive(Args, Debug, Clone)]
pub struct DraftArgs {
    /// Article topic
    #[arg(long)]
    pub topic: String,
    /// Outline point (repeatable)
    #[arg(long = "outline")]
    pub outline: Vec<String>,
    /// Target length in characters
    #[arg(long, default_value_t = 0)]
    pub words: u32,
    /// Extra constraint (repeatable)
    #[arg(long = "constraint")]
    pub constraints: Vec<String>,
    /// Style preset key (see `wxdraft styles`)
    #[arg(long, default_value = "")]
    pub style: String,
    /// Revision comment, applied in order (repeatable)
    #[arg(long = "revise")]
    pub revisions: Vec<String>,
    /// Write the final Markdown here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Push the final draft to the draft box
    #[arg(long)]
    pub publish: bool,
    /// Cover image for --publish; falls back to wechat.default_cover
    #[arg(long)]
    pub cover: Option<PathBuf>,
    #[arg(long, default_value = "")]
    pub author: String,
}
