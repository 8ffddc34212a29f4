use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

use miette::{Context, IntoDiagnostic, Result};
use tga_codec::Tga;

pub mod convert;
pub mod developer;
pub mod diff;
pub mod info;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Print the header and metadata of a TGA file
    Info(info::InfoArgs),
    /// Convert a TGA file into another TGA layout
    Convert(convert::ConvertArgs),
    /// Compare two TGA files
    Diff(diff::DiffArgs),
    /// Work with the developer area of a TGA file
    Developer {
        #[command(subcommand)]
        command: developer::DeveloperCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> Result<()> {
        match self {
            Commands::Info(info) => info.handle(),
            Commands::Convert(convert) => convert.handle(),
            Commands::Diff(diff) => diff.handle(),
            Commands::Developer { command } => command.handle(),
        }
    }
}

pub(crate) fn open(path: &Path) -> Result<Tga> {
    let f = File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;
    let tga = Tga::read_from(&mut BufReader::new(f))
        .context(format!("decoding {}", path.display()))?;
    Ok(tga)
}

pub(crate) fn create(path: &Path, overwrite: bool) -> Result<File> {
    if !overwrite {
        File::create_new(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    } else {
        File::create(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    }
}

/// Encode `tga` and only then create `path`, so a rejected image leaves no file behind
pub(crate) fn save(tga: &mut Tga, path: &Path, overwrite: bool) -> Result<()> {
    let bytes = tga
        .to_bytes()
        .context(format!("encoding {}", path.display()))?;

    let mut out = create(path, overwrite)?;
    out.write_all(&bytes)
        .into_diagnostic()
        .context(format!("writing {}", path.display()))?;
    Ok(())
}
