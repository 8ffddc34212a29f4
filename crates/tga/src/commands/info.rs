use clap::Args;
use itertools::Itertools;
use miette::{IntoDiagnostic, Result};
use serde_json::{json, Value};
use std::path::PathBuf;
use tga_codec::Tga;

#[derive(Args)]
pub struct InfoArgs {
    /// An input TGA file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Print the metadata as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// One line per metadata field, shared with `diff`
pub(crate) fn describe(tga: &Tga) -> Vec<String> {
    let header = &tga.header;
    let spec = &header.image_spec;
    let mut lines = vec![
        format!("format: {}", if tga.is_new_format() { "new" } else { "legacy" }),
        format!("image type: {:?}", header.image_type),
        format!("size: {}x{}", spec.width, spec.height),
        format!("origin: {:?} at {},{}", spec.descriptor.origin, spec.x_origin, spec.y_origin),
        format!("pixel depth: {}", spec.pixel_depth.bits()),
        format!("alpha bits: {}", spec.descriptor.alpha_bits),
        format!("image id: {:?}", tga.image_id_str()),
    ];

    if header.color_map_spec.length > 0 {
        lines.push(format!(
            "color map: {} entries of {} bits from index {}",
            header.color_map_spec.length,
            header.color_map_spec.entry_size.bits(),
            header.color_map_spec.first_entry_index
        ));
    }

    if let Some(developer) = &tga.developer_area {
        lines.extend(
            developer
                .entries
                .iter()
                .map(|(tag, entry)| format!("developer {}: {} bytes", tag, entry.data.len())),
        );
    }

    if let Some(area) = &tga.extension_area {
        lines.push(format!("author: {}", area.author_name));
        lines.extend(area.author_comments.lines().map(|l| format!("comment: {}", l)));
        if !area.timestamp.is_unset() {
            lines.push(format!("timestamp: {}", area.timestamp));
        }
        lines.push(format!("job: {} ({})", area.job_name, area.job_time));
        lines.push(format!("software: {} {}", area.software_id, area.software_version));
        lines.push(format!("key color: {:#010X}", area.key_color.0));
        if let Some(ratio) = area.pixel_aspect_ratio.value() {
            lines.push(format!("pixel aspect ratio: {}", ratio));
        }
        if let Some(gamma) = area.gamma.value() {
            lines.push(format!("gamma: {}", gamma));
        }
        lines.push(format!("attributes: {:?}", area.attributes_type));
        if let Some(table) = &area.scan_line_table {
            lines.push(format!("scan line table: {} rows", table.len()));
        }
        if let Some(stamp) = &area.postage_stamp {
            lines.push(format!("postage stamp: {}x{}", stamp.width, stamp.height));
        }
        if area.color_correction_table.is_some() {
            lines.push("color correction table: present".to_string());
        }
        if !area.trailing.is_empty() {
            lines.push(format!("extension trailing data: {} bytes", area.trailing.len()));
        }
    }

    lines
}

fn to_json(tga: &Tga) -> Value {
    let extension = tga.extension_area.as_ref().map(|area| {
        let mut fields = area.clone();
        let stamp = fields
            .postage_stamp
            .take()
            .map(|stamp| json!({ "width": stamp.width, "height": stamp.height }));
        let scan_lines = fields.scan_line_table.take().map(|table| table.len());
        let correction = fields.color_correction_table.take().is_some();
        fields.trailing.clear();
        json!({
            "fields": fields,
            "comments": area.comments(),
            "postage_stamp": stamp,
            "scan_lines": scan_lines,
            "color_correction": correction,
        })
    });

    let developer = tga.developer_area.as_ref().map(|developer| {
        developer
            .entries
            .iter()
            .map(|(tag, entry)| json!({ "tag": tag, "size": entry.data.len() }))
            .collect_vec()
    });

    json!({
        "header": tga.header,
        "image_id": tga.image_id_str(),
        "new_format": tga.is_new_format(),
        "developer": developer,
        "extension": extension,
    })
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let tga = super::open(&self.file)?;

        if self.json {
            let text = serde_json::to_string_pretty(&to_json(&tga)).into_diagnostic()?;
            println!("{}", text);
        } else {
            println!("{}", describe(&tga).iter().join("\n"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use tga_codec::{ImageType, PixelDepth};

    #[test]
    fn legacy_images_describe_their_header() {
        let tga = Tga::new(4, 2, PixelDepth::Bits24, ImageType::RleTrueColor);

        assert_eq!(
            describe(&tga),
            vec![
                "format: legacy",
                "image type: RleTrueColor",
                "size: 4x2",
                "origin: BottomLeft at 0,0",
                "pixel depth: 24",
                "alpha bits: 0",
                "image id: \"\"",
            ]
        );
    }

    #[test]
    fn extension_metadata_is_listed() -> miette::Result<()> {
        let mut tga = Tga::new(2, 2, PixelDepth::Bits32, ImageType::UncompressedTrueColor);
        tga.extension_area_mut().author_name = "Tester".into();
        tga.developer_area_mut().insert(7, vec![1, 2, 3])?;

        let lines = describe(&tga);
        assert!(lines.contains(&"format: new".to_string()));
        assert!(lines.contains(&"developer 7: 3 bytes".to_string()));
        assert!(lines.contains(&"author: Tester".to_string()));

        let value = to_json(&tga);
        assert_eq!(value["developer"][0]["tag"], 7);
        assert_eq!(value["extension"]["fields"]["author_name"], "Tester");
        Ok(())
    }
}
