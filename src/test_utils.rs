#![cfg(test)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::config::StreamingConfig;
use crate::player::capabilities::StaticCapabilities;
use crate::player::traits::{
    MediaElement, Platform, SessionEventSender, StreamingLibrary, StreamingSession,
};
use crate::player::types::SessionEvent;
use crate::utils::errors::{PlatformError, PlayRejection, SessionError};

/// Calls recorded by [`MockElement`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementCall {
    SetSrc(Option<String>),
    Load,
    Play,
    Pause,
    SetCurrentTime(f64),
    SetVolume(f64),
    SetMuted(bool),
    RequestFullscreen,
    ExitFullscreen,
}

#[derive(Debug)]
struct ElementInner {
    src: Option<String>,
    paused: bool,
    current_time: f64,
    duration: Option<f64>,
    volume: f64,
    muted: bool,
    fullscreen: bool,
    play_rejection: Option<PlayRejection>,
    deny_fullscreen: bool,
    calls: Vec<ElementCall>,
}

/// Playback element that records every call and reports whatever the test
/// has set.
#[derive(Debug)]
pub struct MockElement {
    inner: Mutex<ElementInner>,
}

impl MockElement {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(ElementInner {
                src: None,
                paused: true,
                current_time: 0.0,
                duration: None,
                volume: 1.0,
                muted: false,
                fullscreen: false,
                play_rejection: None,
                deny_fullscreen: false,
                calls: Vec::new(),
            }),
        })
    }

    pub fn calls(&self) -> Vec<ElementCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn count(&self, matcher: impl Fn(&ElementCall) -> bool) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| matcher(c))
            .count()
    }

    pub fn load_count(&self) -> usize {
        self.count(|c| *c == ElementCall::Load)
    }

    pub fn play_count(&self) -> usize {
        self.count(|c| *c == ElementCall::Play)
    }

    pub fn reject_play(&self, rejection: PlayRejection) {
        self.inner.lock().unwrap().play_rejection = Some(rejection);
    }

    pub fn allow_play(&self) {
        self.inner.lock().unwrap().play_rejection = None;
    }

    pub fn deny_fullscreen(&self) {
        self.inner.lock().unwrap().deny_fullscreen = true;
    }

    /// Simulates the element reporting new metadata.
    pub fn report_duration(&self, duration: Option<f64>) {
        self.inner.lock().unwrap().duration = duration;
    }

    /// Simulates playback progress without recording a call.
    pub fn report_time(&self, seconds: f64) {
        self.inner.lock().unwrap().current_time = seconds;
    }

    pub fn report_paused(&self, paused: bool) {
        self.inner.lock().unwrap().paused = paused;
    }

    pub fn report_volume(&self, volume: f64, muted: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.volume = volume;
        inner.muted = muted;
    }
}

#[async_trait]
impl MediaElement for MockElement {
    fn set_src(&self, url: Option<&str>) {
        let mut inner = self.inner.lock().unwrap();
        inner.src = url.map(str::to_string);
        let src = inner.src.clone();
        inner.calls.push(ElementCall::SetSrc(src));
    }

    fn src(&self) -> Option<String> {
        self.inner.lock().unwrap().src.clone()
    }

    fn load(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.paused = true;
        inner.current_time = 0.0;
        inner.calls.push(ElementCall::Load);
    }

    async fn play(&self) -> Result<(), PlayRejection> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(ElementCall::Play);
        match inner.play_rejection.clone() {
            Some(rejection) => Err(rejection),
            None => {
                inner.paused = false;
                Ok(())
            }
        }
    }

    fn pause(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.paused = true;
        inner.calls.push(ElementCall::Pause);
    }

    fn paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }

    fn current_time(&self) -> f64 {
        self.inner.lock().unwrap().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.current_time = seconds;
        inner.calls.push(ElementCall::SetCurrentTime(seconds));
    }

    fn duration(&self) -> Option<f64> {
        self.inner.lock().unwrap().duration
    }

    fn volume(&self) -> f64 {
        self.inner.lock().unwrap().volume
    }

    fn set_volume(&self, volume: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.volume = volume;
        inner.calls.push(ElementCall::SetVolume(volume));
    }

    fn muted(&self) -> bool {
        self.inner.lock().unwrap().muted
    }

    fn set_muted(&self, muted: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.muted = muted;
        inner.calls.push(ElementCall::SetMuted(muted));
    }

    fn is_fullscreen(&self) -> bool {
        self.inner.lock().unwrap().fullscreen
    }

    fn request_fullscreen(&self) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(ElementCall::RequestFullscreen);
        if inner.deny_fullscreen {
            return Err(PlatformError::FullscreenDenied("not allowed".to_string()));
        }
        inner.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&self) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(ElementCall::ExitFullscreen);
        inner.fullscreen = false;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct LibraryLog {
    calls: Vec<String>,
    created: usize,
    destroyed: usize,
    senders: Vec<SessionEventSender>,
    configs: Vec<StreamingConfig>,
    fail_create: bool,
    fail_start_load: bool,
    fail_recover: bool,
}

/// Streaming library whose sessions share one ordered call log, e.g.
/// `["create#1", "load_source#1 https://…", "attach_media#1", "destroy#1"]`.
#[derive(Debug, Clone, Default)]
pub struct MockLibrary {
    log: Arc<Mutex<LibraryLog>>,
}

impl MockLibrary {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().calls.clone()
    }

    pub fn created(&self) -> usize {
        self.log.lock().unwrap().created
    }

    pub fn destroyed(&self) -> usize {
        self.log.lock().unwrap().destroyed
    }

    pub fn live_sessions(&self) -> usize {
        let log = self.log.lock().unwrap();
        log.created - log.destroyed
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn last_config(&self) -> Option<StreamingConfig> {
        self.log.lock().unwrap().configs.last().cloned()
    }

    /// Sender handed to the most recently created session.
    pub fn last_sender(&self) -> Option<SessionEventSender> {
        self.log.lock().unwrap().senders.last().cloned()
    }

    /// Emits an event from the most recently created session.
    pub fn emit(&self, event: SessionEvent) -> bool {
        match self.last_sender() {
            Some(sender) => sender.send(event),
            None => false,
        }
    }

    pub fn fail_create(&self, fail: bool) {
        self.log.lock().unwrap().fail_create = fail;
    }

    pub fn fail_start_load(&self, fail: bool) {
        self.log.lock().unwrap().fail_start_load = fail;
    }

    pub fn fail_recover(&self, fail: bool) {
        self.log.lock().unwrap().fail_recover = fail;
    }
}

impl StreamingLibrary for MockLibrary {
    fn create_session(
        &self,
        config: &StreamingConfig,
        events: SessionEventSender,
    ) -> Result<Box<dyn StreamingSession>, SessionError> {
        let mut log = self.log.lock().unwrap();
        if log.fail_create {
            return Err(SessionError("media source unavailable".to_string()));
        }
        log.created += 1;
        let id = log.created;
        log.calls.push(format!("create#{}", id));
        log.senders.push(events);
        log.configs.push(config.clone());

        Ok(Box::new(MockSession {
            id,
            log: self.log.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct MockSession {
    id: usize,
    log: Arc<Mutex<LibraryLog>>,
}

impl StreamingSession for MockSession {
    fn load_source(&mut self, url: &str) -> Result<(), SessionError> {
        self.log
            .lock()
            .unwrap()
            .calls
            .push(format!("load_source#{} {}", self.id, url));
        Ok(())
    }

    fn attach_media(&mut self, _element: Arc<dyn MediaElement>) -> Result<(), SessionError> {
        self.log
            .lock()
            .unwrap()
            .calls
            .push(format!("attach_media#{}", self.id));
        Ok(())
    }

    fn start_load(&mut self) -> Result<(), SessionError> {
        let mut log = self.log.lock().unwrap();
        log.calls.push(format!("start_load#{}", self.id));
        if log.fail_start_load {
            return Err(SessionError("loader torn down".to_string()));
        }
        Ok(())
    }

    fn recover_media_error(&mut self) -> Result<(), SessionError> {
        let mut log = self.log.lock().unwrap();
        log.calls.push(format!("recover_media_error#{}", self.id));
        if log.fail_recover {
            return Err(SessionError("source buffer detached".to_string()));
        }
        Ok(())
    }

    fn destroy(self: Box<Self>) {
        let mut log = self.log.lock().unwrap();
        log.destroyed += 1;
        log.calls.push(format!("destroy#{}", self.id));
    }
}

/// A platform wired to fresh mocks.
pub struct TestPlatform {
    pub platform: Platform,
    pub element: Arc<MockElement>,
    pub library: Arc<MockLibrary>,
}

impl TestPlatform {
    pub fn new(capabilities: StaticCapabilities) -> Self {
        let element = MockElement::new();
        let library = MockLibrary::new();
        let platform = Platform::new(element.clone(), Arc::new(capabilities), library.clone());
        Self {
            platform,
            element,
            library,
        }
    }

    pub fn safari() -> Self {
        Self::new(StaticCapabilities::safari())
    }

    pub fn chromium() -> Self {
        Self::new(StaticCapabilities::chromium())
    }

    pub fn bare() -> Self {
        Self::new(StaticCapabilities::bare())
    }
}

pub const HLS_URL: &str = "https://cdn.videoresearch.test/v/abc123/master.m3u8";
pub const HLS_URL_2: &str = "https://cdn.videoresearch.test/v/def456/master.m3u8";
pub const MP4_URL: &str = "https://cdn.videoresearch.test/v/abc123/source.mp4";

/// Common test utilities
pub mod common {
    use std::future::Future;
    use std::time::Duration;
    use tokio::time::timeout;

    /// Run a future with a timeout
    pub async fn timeout_future<T>(
        duration: Duration,
        future: impl Future<Output = T>,
    ) -> Result<T, tokio::time::error::Elapsed> {
        timeout(duration, future).await
    }
}
