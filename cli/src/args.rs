use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shader_cat::{check_name, Config, DEFAULT_MERGED, DEFAULT_ROOT};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(subcommand)]
    pub commands: Commands,
    /// Directory containing the shader sources and the merged file
    #[clap(short, long, global = true, default_value = ".", value_parser)]
    pub dir: PathBuf,
    /// Root shader file, where inlining starts
    #[clap(short, long, global = true, default_value = DEFAULT_ROOT, value_parser = validate_name)]
    pub root: String,
    /// Merged shader file, with every include inlined
    #[clap(short, long, global = true, default_value = DEFAULT_MERGED, value_parser = validate_name)]
    pub merged: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inline every include of the root file into the merged file.
    Cat,
    /// Split the merged file back into the root file and its includes.
    Uncat,
    /// Verify that the merged file matches its sources.
    Check,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config::new(&self.dir)
            .with_root(&self.root)
            .with_merged(&self.merged)
    }
}

fn validate_name(s: &str) -> Result<String> {
    check_name(s)?;
    Ok(s.to_owned())
}
