use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Args)]
pub struct MergeArgs {
    /// An input directory of `<tag>.*` files
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// An input TGA file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target TGA file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

/// The developer tag a file name stands for, `12.bin` is tag 12
fn tag_for(path: &Path) -> Option<u16> {
    path.file_stem()?.to_str()?.parse().ok()
}

impl MergeArgs {
    pub fn handle(&self) -> Result<()> {
        let mut tga = crate::commands::open(&self.file)?;

        let files = WalkDir::new(&self.directory)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("directory is empty"));
        }

        for file in files {
            let Some(tag) = tag_for(file.path()) else {
                warn!("skipping {}, its name is not a tag", file.path().display());
                continue;
            };
            info!("merging {} as tag {}", file.path().display(), tag);

            let data = std::fs::read(file.path())
                .into_diagnostic()
                .context(format!("reading {}", file.path().display()))?;
            tga.developer_area_mut()
                .insert(tag, data)
                .context(format!("adding {}", file.path().display()))?;
        }

        info!("writing {}", self.output.display());
        crate::commands::save(&mut tga, &self.output, self.overwrite)?;

        Ok(())
    }
}
