use clap::Args;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::path::PathBuf;
use tga_codec::Tga;

#[derive(Args)]
pub struct DiffArgs {
    /// An input TGA file
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input TGA file
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,
}

/// How the decoded pixels of two images relate
#[derive(Debug, PartialEq, Eq)]
enum PixelReport {
    Identical,
    Dimensions((usize, usize), (usize, usize)),
    Differs { pixels: usize, first: (usize, usize) },
}

fn compare_pixels(left: &Tga, right: &Tga) -> Result<PixelReport> {
    let l = left.to_raster(false)?;
    let r = right.to_raster(false)?;

    if (l.width, l.height) != (r.width, r.height) {
        return Ok(PixelReport::Dimensions(
            (l.width, l.height),
            (r.width, r.height),
        ));
    }

    let differing = (0..l.height)
        .cartesian_product(0..l.width)
        .filter(|&(y, x)| l.color(x, y) != r.color(x, y))
        .collect_vec();

    Ok(match differing.first() {
        None => PixelReport::Identical,
        Some(&(y, x)) => PixelReport::Differs {
            pixels: differing.len(),
            first: (x, y),
        },
    })
}

impl DiffArgs {
    pub fn handle(&self) -> Result<()> {
        let left = super::open(&self.left)?;
        let right = super::open(&self.right)?;

        let old = super::info::describe(&left).iter().join("\n") + "\n";
        let new = super::info::describe(&right).iter().join("\n") + "\n";

        let diff = TextDiff::from_lines(&old, &new);
        if diff.ratio() < 1.0 {
            println!("🔃 {} vs {}", self.left.display().red(), self.right.display().green());
            for op in diff.ops() {
                for change in diff.iter_inline_changes(op) {
                    let mut line = String::new();
                    for (emphasized, value) in change.iter_strings_lossy() {
                        let text = match (change.tag(), emphasized) {
                            (ChangeTag::Insert, true) => format!("{}", value.green().underline()),
                            (ChangeTag::Insert, false) => format!("{}", value.green()),
                            (ChangeTag::Delete, true) => format!("{}", value.red().underline()),
                            (ChangeTag::Delete, false) => format!("{}", value.red()),
                            (ChangeTag::Equal, _) => format!("{}", value.dimmed()),
                        };
                        line.push_str(&text);
                    }
                    let sign = match change.tag() {
                        ChangeTag::Insert => "+",
                        ChangeTag::Delete => "-",
                        ChangeTag::Equal => " ",
                    };
                    print!("{} {}", sign, line);
                    if change.missing_newline() {
                        println!();
                    }
                }
            }
        }

        match compare_pixels(&left, &right)? {
            PixelReport::Identical => println!("✅ {}", "pixels are identical".green()),
            PixelReport::Dimensions(l, r) => println!(
                "❌ {}: {}x{} vs {}x{}",
                "dimensions differ".red(),
                l.0,
                l.1,
                r.0,
                r.1
            ),
            PixelReport::Differs { pixels, first } => println!(
                "❌ {} pixels differ, first at {},{}",
                pixels.red(),
                first.0,
                first.1
            ),
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use tga_codec::{ImageType, PixelDepth};

    fn gray(pixels: &[u8]) -> Tga {
        let mut tga = Tga::new(2, 2, PixelDepth::Bits8, ImageType::UncompressedBlackWhite);
        tga.image_data = pixels.to_vec();
        tga
    }

    #[test]
    fn identical_pixels_ignore_encoding() -> Result<()> {
        let left = gray(&[1, 2, 3, 4]);
        let mut right = gray(&[1, 2, 3, 4]);
        right.header.image_type = ImageType::RleBlackWhite;

        assert_eq!(compare_pixels(&left, &right)?, PixelReport::Identical);
        Ok(())
    }

    #[test]
    fn differing_pixels_are_counted() -> Result<()> {
        let left = gray(&[1, 2, 3, 4]);
        let right = gray(&[1, 9, 3, 9]);

        // stored bottom up, so the first stored row is the last raster row
        assert_eq!(
            compare_pixels(&left, &right)?,
            PixelReport::Differs {
                pixels: 2,
                first: (1, 0),
            }
        );
        Ok(())
    }
}
