use clap::Args;
use miette::{Context, Result};
use std::path::PathBuf;
use tga_codec::{RasterOptions, Tga};
use tracing::info;

#[derive(Args)]
pub struct ConvertArgs {
    /// An input TGA file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// A target TGA file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Run-length encode the pixels
    #[arg(long, default_value_t = false)]
    rle: bool,

    /// Write a legacy file without extension area or footer
    #[arg(long, default_value_t = false)]
    legacy: bool,

    /// Store color map entries in 16 bits
    #[arg(long, default_value_t = false)]
    two_byte_palette: bool,

    /// Treat the alpha channel as meaningful even when the file does not say so
    #[arg(long, default_value_t = false)]
    force_alpha: bool,

    /// Skip generating a postage stamp
    #[arg(long, default_value_t = false)]
    no_postage_stamp: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ConvertArgs {
    pub fn handle(&self) -> Result<()> {
        let source = super::open(&self.input)?;
        let raster = source
            .to_raster(self.force_alpha)
            .context(format!("converting {}", self.input.display()))?;
        info!(
            "decoded {}x{} {:?} pixels",
            raster.width, raster.height, raster.format
        );

        let options = RasterOptions::builder()
            .use_rle(self.rle)
            .new_format(!self.legacy)
            .two_byte_color_map_entries(self.two_byte_palette)
            .postage_stamp(!self.no_postage_stamp)
            .build();
        let mut tga = Tga::from_raster(&raster, options)?;

        info!("writing {}", self.output.display());
        super::save(&mut tga, &self.output, self.overwrite)?;

        Ok(())
    }
}
