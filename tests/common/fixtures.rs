use super::builders::*;
use research_player::models::VideoDescriptor;

pub const HLS_URL: &str = "https://stream.videoresearch.test/v/7f3a/master.m3u8";
pub const HLS_PATH_URL: &str = "https://stream.videoresearch.test/hls/7f3a/index";
pub const MP4_URL: &str = "https://stream.videoresearch.test/v/7f3a/source.mp4";
pub const WEBM_URL: &str = "https://stream.videoresearch.test/v/7f3a/source.webm";

pub struct Fixtures;

impl Fixtures {
    pub fn descriptors() -> Vec<VideoDescriptor> {
        vec![
            DescriptorBuilder::new(HLS_URL)
                .with_title("Quarterly earnings call")
                .with_thumbnail("https://stream.videoresearch.test/v/7f3a/thumb.jpg")
                .with_duration(3725.4)
                .build(),
            DescriptorBuilder::new(HLS_PATH_URL)
                .with_title("Product walkthrough")
                .build(),
            DescriptorBuilder::new(MP4_URL)
                .with_title("Raw upload")
                .with_duration(95.0)
                .build(),
        ]
    }
}
