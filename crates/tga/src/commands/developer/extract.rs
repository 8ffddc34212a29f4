use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{io::Write, path::PathBuf};
use tracing::{info, warn};

#[derive(Args)]
pub struct ExtractArgs {
    /// An input TGA file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let tga = crate::commands::open(&self.file)?;

        let Some(developer) = tga.developer_area.as_ref().filter(|area| !area.is_empty()) else {
            warn!("{} has no developer entries", self.file.display());
            return Ok(());
        };

        std::fs::create_dir_all(&self.directory)
            .into_diagnostic()
            .context(format!("creating {}", self.directory.display()))?;

        for (tag, entry) in &developer.entries {
            let p = self.directory.join(format!("{}.bin", tag));
            info!("writing {}", p.display());

            let mut out = crate::commands::create(&p, self.overwrite)?;
            out.write_all(&entry.data)
                .into_diagnostic()
                .context(format!("writing {}", p.display()))?;
        }
        Ok(())
    }
}
