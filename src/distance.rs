/// RGB 三元组
pub type Rgb = [u8; 3];

/// 计算两个颜色的 RGB 欧氏距离的平方
///
/// 不开方：排序结果与欧氏距离一致，且最大值 3 * 255^2 不会溢出 u32
#[inline(always)]
pub fn distance(a: Rgb, b: Rgb) -> u32 {
    let dr = a[0].abs_diff(b[0]) as u32;
    let dg = a[1].abs_diff(b[1]) as u32;
    let db = a[2].abs_diff(b[2]) as u32;
    dr * dr + dg * dg + db * db
}
