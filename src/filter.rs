//! Box blur over 8-bit images of any channel layout.

use image::{ImageBuffer, Pixel};

/// Blur with a `(2 * radius + 1)` square box, one horizontal and one vertical
/// pass. Samples past the border repeat the edge pixel.
pub fn box_blur<P>(image: &ImageBuffer<P, Vec<u8>>, radius: u32) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (w, h) = image.dimensions();
    if radius == 0 || w == 0 || h == 0 {
        return image.clone();
    }
    let (w, h, r) = (w as usize, h as usize, radius as usize);
    let channels = usize::from(P::CHANNEL_COUNT);

    let rows = blur_lines(image.as_raw(), Lines {
        count: h,
        len: w,
        line_step: w * channels,
        pixel_step: channels,
        channels,
        radius: r,
    });
    let columns = blur_lines(&rows, Lines {
        count: w,
        len: h,
        line_step: channels,
        pixel_step: w * channels,
        channels,
        radius: r,
    });

    ImageBuffer::from_raw(image.width(), image.height(), columns).unwrap_or_else(|| image.clone())
}

/// Addressing of a set of parallel lines inside an interleaved buffer.
struct Lines {
    count: usize,
    len: usize,
    line_step: usize,
    pixel_step: usize,
    channels: usize,
    radius: usize,
}

fn blur_lines(src: &[u8], lines: Lines) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    let window = (2 * lines.radius + 1) as u32;
    let last = lines.len as isize - 1;
    let r = lines.radius as isize;

    for line in 0..lines.count {
        let base = line * lines.line_step;
        for c in 0..lines.channels {
            let at = |i: isize| -> u32 {
                let i = i.clamp(0, last) as usize;
                u32::from(src[base + i * lines.pixel_step + c])
            };
            let mut sum: u32 = (-r..=r).map(at).sum();
            for i in 0..lines.len {
                out[base + i * lines.pixel_step + c] = ((sum + window / 2) / window) as u8;
                let i = i as isize;
                sum += at(i + r + 1);
                sum -= at(i - r);
            }
        }
    }
    out
}
