use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

/// A 256x256 image made of horizontal bands, roughly half runs and half literals
fn banded_pixels(bytes_per_pixel: usize) -> Vec<u8> {
    let mut seed = 0x2545_F491u32;
    (0..256 * 256)
        .flat_map(|i| {
            let x = i % 256;
            let value = if x < 128 {
                (i / 256) as u8
            } else {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                seed as u8
            };
            std::iter::repeat(value).take(bytes_per_pixel)
        })
        .collect()
}

pub mod rle {
    use divan::Bencher;
    use std::io::Cursor;
    use tga_codec::image_data::{decode_rle, encode_rle};

    #[divan::bench(args = [1, 3, 4])]
    fn encode(bencher: Bencher, bytes_per_pixel: usize) {
        bencher
            .with_inputs(|| super::banded_pixels(bytes_per_pixel))
            .bench_refs(|pixels| {
                divan::black_box(encode_rle(pixels, 256, 256, bytes_per_pixel));
            });
    }

    #[divan::bench(args = [1, 3, 4])]
    fn decode(bencher: Bencher, bytes_per_pixel: usize) {
        bencher
            .with_inputs(|| encode_rle(&super::banded_pixels(bytes_per_pixel), 256, 256, bytes_per_pixel).0)
            .bench_refs(|packets| {
                divan::black_box(
                    decode_rle(&mut Cursor::new(packets), 256, 256, bytes_per_pixel).unwrap(),
                );
            });
    }
}

pub mod file {
    use divan::Bencher;
    use tga_codec::{ImageType, PixelDepth, Tga};

    fn image(image_type: ImageType) -> Tga {
        let mut tga = Tga::new(256, 256, PixelDepth::Bits32, image_type);
        tga.image_data = super::banded_pixels(4);
        tga.extension_area_mut().author_name = "bench".into();
        tga.update_postage_stamp();
        tga
    }

    #[divan::bench(args = [ImageType::UncompressedTrueColor, ImageType::RleTrueColor])]
    fn encode(bencher: Bencher, image_type: ImageType) {
        bencher
            .with_inputs(|| image(image_type))
            .bench_refs(|tga| {
                divan::black_box(tga.to_bytes().unwrap());
            });
    }

    #[divan::bench(args = [ImageType::UncompressedTrueColor, ImageType::RleTrueColor])]
    fn decode(bencher: Bencher, image_type: ImageType) {
        bencher
            .with_inputs(|| image(image_type).to_bytes().unwrap())
            .bench_refs(|bytes| {
                divan::black_box(Tga::from_bytes(bytes).unwrap());
            });
    }

    #[divan::bench]
    fn to_raster(bencher: Bencher) {
        bencher
            .with_inputs(|| image(ImageType::UncompressedTrueColor))
            .bench_refs(|tga| {
                divan::black_box(tga.to_raster(true).unwrap());
            });
    }
}
