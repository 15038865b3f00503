use std::path::Path;

use image::{ImageError, ImageReader, RgbImage};

use crate::distance::{Rgb, distance};
use crate::error::{Result, SenseError};
use crate::space::ColorSpace;

/// 每个颜色特征的平均距离，顺序与颜色空间中的特征一致
pub type RankingVector = Vec<f64>;

/// 已解码的图片
pub trait Raster {
    fn dimensions(&self) -> (u32, u32);

    fn pixel_rgb(&self, x: u32, y: u32) -> Rgb;

    /// 按行遍历所有像素
    fn for_each_rgb<F: FnMut(Rgb)>(&self, mut f: F) {
        let (width, height) = self.dimensions();
        for y in 0..height {
            for x in 0..width {
                f(self.pixel_rgb(x, y));
            }
        }
    }
}

impl Raster for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbImage::dimensions(self)
    }

    fn pixel_rgb(&self, x: u32, y: u32) -> Rgb {
        self.get_pixel(x, y).0
    }

    fn for_each_rgb<F: FnMut(Rgb)>(&self, mut f: F) {
        self.pixels().for_each(|p| f(p.0));
    }
}

/// 计算图片中所有像素到每个颜色特征的平均距离
///
/// 遍历全部像素，不做采样。先用整数累加距离，最后再除以像素数量，
/// 因此结果与像素的遍历顺序无关。
pub fn rank_image<R: Raster>(image: &R, space: &ColorSpace) -> Result<RankingVector> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(SenseError::DegenerateImage { width, height });
    }

    let targets = space.features().iter().map(|f| f.rgb()).collect::<Vec<_>>();
    let mut sums = vec![0u64; targets.len()];
    image.for_each_rgb(|pixel| {
        for (sum, target) in sums.iter_mut().zip(&targets) {
            *sum += distance(pixel, *target) as u64;
        }
    });

    let area = width as u64 * height as u64;
    Ok(sums.into_iter().map(|sum| sum as f64 / area as f64).collect())
}

/// 读取并解码图片文件后计算排名向量
///
/// 图片格式根据文件内容判断，与扩展名无关。解码后的图片在返回前释放
pub fn rank_file(path: impl AsRef<Path>, space: &ColorSpace) -> Result<RankingVector> {
    let path = path.as_ref();
    let image = decode(path)
        .map_err(|source| SenseError::ImageAccess { path: path.to_owned(), source })?
        .into_rgb8();
    rank_image(&image, space)
}

fn decode(path: &Path) -> Result<image::DynamicImage, ImageError> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}
