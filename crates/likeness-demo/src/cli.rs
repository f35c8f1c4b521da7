use std::path::PathBuf;

use clap::Parser;

/// Register a schema, bind an observable model and print the rendered HTML.
#[derive(Debug, Clone, Parser)]
#[command(name = "likeness-demo", version, about)]
pub struct Cli {
    /// Schema file (.toml or .json). Defaults to the built-in people schema.
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Type to render.
    #[arg(long, default_value = "people")]
    pub root: String,

    /// JSON file seeding the model. Without it the model starts empty.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Simulate typing this value into the first input.
    #[arg(long)]
    pub edit: Option<String>,

    /// Click the first control labelled with this action name.
    #[arg(long)]
    pub click: Option<String>,

    /// Also print a JSON snapshot of the model after edits and clicks.
    #[arg(long = "dump-model")]
    pub dump_model: bool,

    /// Emit logs as JSON lines.
    #[arg(long = "log-json")]
    pub log_json: bool,
}
