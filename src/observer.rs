use std::time::Duration;

use crossbeam_channel::Sender;
use indicatif::ProgressBar;
use log::{debug, trace, warn};

/// 处理图片过程中产生的事件
///
/// 每张图片依次产生 `ImageStarted`，然后是 `ImageFinished` 或 `ImageFailed`。
/// `FeatureScored` 在整张图片扫描完成后才按特征顺序逐个发送，不反映扫描进度。
#[derive(Debug, Clone, PartialEq)]
pub enum RankEvent {
    ImageStarted { image: String },
    FeatureScored { image: String, index: usize, feature: String, value: f64 },
    ImageFinished { image: String, features: usize, elapsed: Duration },
    ImageFailed { image: String, error: String },
}

impl RankEvent {
    pub fn image(&self) -> &str {
        match self {
            Self::ImageStarted { image }
            | Self::FeatureScored { image, .. }
            | Self::ImageFinished { image, .. }
            | Self::ImageFailed { image, .. } => image,
        }
    }
}

/// 接收处理事件，会被多个工作线程同时调用
pub trait RankObserver: Sync {
    fn notify(&self, event: RankEvent);
}

impl RankObserver for () {
    fn notify(&self, _event: RankEvent) {}
}

impl<A: RankObserver, B: RankObserver> RankObserver for (A, B) {
    fn notify(&self, event: RankEvent) {
        self.0.notify(event.clone());
        self.1.notify(event);
    }
}

/// 以事件流的形式转发，接收端关闭后事件会被丢弃
impl RankObserver for Sender<RankEvent> {
    fn notify(&self, event: RankEvent) {
        let _ = self.send(event);
    }
}

/// 输出到日志
pub struct LogObserver;

impl RankObserver for LogObserver {
    fn notify(&self, event: RankEvent) {
        match event {
            RankEvent::ImageStarted { image } => debug!("开始处理 {}", image),
            RankEvent::FeatureScored { image, index, feature, value } => {
                trace!("{} [{}] {}: {:.2}", image, index, feature, value)
            }
            RankEvent::ImageFinished { image, features, elapsed } => {
                debug!("处理完成 {}: {} 个特征, 耗时 {:.2}ms", image, features, elapsed.as_secs_f64() * 1e3)
            }
            RankEvent::ImageFailed { image, error } => warn!("处理失败 {}: {}", image, error),
        }
    }
}

/// 更新进度条，每张图片完成或失败时前进一格
pub struct ProgressObserver(ProgressBar);

impl ProgressObserver {
    pub fn new(pb: ProgressBar) -> Self {
        Self(pb)
    }
}

impl RankObserver for ProgressObserver {
    fn notify(&self, event: RankEvent) {
        match event {
            RankEvent::ImageFinished { image, .. } => {
                self.0.set_message(image);
                self.0.inc(1);
            }
            RankEvent::ImageFailed { image, error } => {
                self.0.println(format!("[ERR] {}: {}", image, error));
                self.0.inc(1);
            }
            _ => {}
        }
    }
}
