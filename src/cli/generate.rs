//! Generate the ordered command script.
//!
//! All documents are resolved into one feature set before ordering, so a
//! feature declared in one file may depend on a capability provided by
//! another. The script goes to `--output`, else the configured `output`, else
//! stdout.
//!
//! ```bash
//! featurescript generate --catalog feature-specs wildfly.yml
//! featurescript generate base.yml logging.yml -o build/setup.cli --no-comments
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::{debug, info};

use super::common::{load_catalog, load_documents};
use crate::config::ToolConfig;
use crate::resolver::resolve_and_order;
use crate::script::{FileScriptWriter, Script, ScriptOptions, ScriptWriter, StreamScriptWriter};

/// Arguments for `featurescript generate`.
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Configuration documents (YAML), resolved together
    #[arg(value_name = "CONFIG", required = true)]
    pub configs: Vec<PathBuf>,

    /// Spec catalog directory
    #[arg(long, value_name = "DIR")]
    pub catalog: Option<PathBuf>,

    /// Write the script to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Omit the `# <path>` line before each feature block
    #[arg(long)]
    pub no_comments: bool,
}

impl GenerateCommand {
    pub fn execute(self, config: &ToolConfig) -> Result<()> {
        let catalog = load_catalog(self.catalog.as_deref(), config)?;
        let roots = load_documents(&self.configs)?;

        let ordered = resolve_and_order(&catalog, &roots)?;
        debug!("Ordered {} features", ordered.len());

        let options = ScriptOptions {
            comments: config.comments && !self.no_comments,
        };
        let script = Script::from_features(&ordered, options);

        let output = match self.output {
            Some(path) => Some(path),
            None => config.output_path()?,
        };

        match output {
            Some(path) => {
                let mut writer = FileScriptWriter::new(path);
                writer.write_script(&script)?;
                info!("Wrote script to {}", writer.path().display());
                println!(
                    "{} Generated {} commands for {} features in {}",
                    "✓".green(),
                    script.command_count(),
                    ordered.len(),
                    writer.path().display()
                );
            }
            None => {
                let mut writer = StreamScriptWriter::new(std::io::stdout().lock());
                writer.write_script(&script)?;
            }
        }

        Ok(())
    }
}
