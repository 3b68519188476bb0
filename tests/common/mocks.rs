use async_trait::async_trait;
use research_player::config::StreamingConfig;
use research_player::player::{
    MediaElement, SessionEvent, SessionEventSender, StreamingLibrary, StreamingSession,
};
use research_player::utils::errors::{PlatformError, PlayRejection, SessionError};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct ElementState {
    src: Option<String>,
    paused: bool,
    current_time: f64,
    duration: Option<f64>,
    volume: f64,
    muted: bool,
    fullscreen: bool,
    block_autoplay: bool,
    loads: usize,
    plays: usize,
}

/// Browser video element stand-in.
#[derive(Debug)]
pub struct FakeVideoElement {
    state: Mutex<ElementState>,
}

impl FakeVideoElement {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ElementState {
                paused: true,
                volume: 1.0,
                ..Default::default()
            }),
        })
    }

    pub fn block_autoplay(&self, block: bool) {
        self.state.lock().unwrap().block_autoplay = block;
    }

    pub fn set_duration(&self, duration: f64) {
        self.state.lock().unwrap().duration = Some(duration);
    }

    pub fn loads(&self) -> usize {
        self.state.lock().unwrap().loads
    }

    pub fn plays(&self) -> usize {
        self.state.lock().unwrap().plays
    }
}

#[async_trait]
impl MediaElement for FakeVideoElement {
    fn set_src(&self, url: Option<&str>) {
        self.state.lock().unwrap().src = url.map(str::to_string);
    }

    fn src(&self) -> Option<String> {
        self.state.lock().unwrap().src.clone()
    }

    fn load(&self) {
        let mut state = self.state.lock().unwrap();
        state.loads += 1;
        state.paused = true;
        state.current_time = 0.0;
        state.duration = None;
    }

    async fn play(&self) -> Result<(), PlayRejection> {
        let mut state = self.state.lock().unwrap();
        state.plays += 1;
        if state.block_autoplay {
            return Err(PlayRejection::NotAllowed(
                "play() failed because the user didn't interact with the document first"
                    .to_string(),
            ));
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&self) {
        self.state.lock().unwrap().paused = true;
    }

    fn paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    fn current_time(&self) -> f64 {
        self.state.lock().unwrap().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        self.state.lock().unwrap().current_time = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.state.lock().unwrap().duration
    }

    fn volume(&self) -> f64 {
        self.state.lock().unwrap().volume
    }

    fn set_volume(&self, volume: f64) {
        self.state.lock().unwrap().volume = volume;
    }

    fn muted(&self) -> bool {
        self.state.lock().unwrap().muted
    }

    fn set_muted(&self, muted: bool) {
        self.state.lock().unwrap().muted = muted;
    }

    fn is_fullscreen(&self) -> bool {
        self.state.lock().unwrap().fullscreen
    }

    fn request_fullscreen(&self) -> Result<(), PlatformError> {
        self.state.lock().unwrap().fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&self) -> Result<(), PlatformError> {
        self.state.lock().unwrap().fullscreen = false;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct LibraryState {
    live: usize,
    created: usize,
    start_loads: usize,
    senders: Vec<SessionEventSender>,
    loaded_urls: Vec<String>,
}

/// Streaming library stand-in that counts live sessions.
#[derive(Debug, Clone, Default)]
pub struct FakeHlsLibrary {
    state: Arc<Mutex<LibraryState>>,
}

impl FakeHlsLibrary {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn live_sessions(&self) -> usize {
        self.state.lock().unwrap().live
    }

    pub fn created(&self) -> usize {
        self.state.lock().unwrap().created
    }

    pub fn start_loads(&self) -> usize {
        self.state.lock().unwrap().start_loads
    }

    pub fn loaded_urls(&self) -> Vec<String> {
        self.state.lock().unwrap().loaded_urls.clone()
    }

    /// Emits from the newest session, as the library's worker would.
    pub fn emit(&self, event: SessionEvent) {
        let sender = self.state.lock().unwrap().senders.last().cloned();
        if let Some(sender) = sender {
            sender.send(event);
        }
    }
}

impl StreamingLibrary for FakeHlsLibrary {
    fn create_session(
        &self,
        _config: &StreamingConfig,
        events: SessionEventSender,
    ) -> Result<Box<dyn StreamingSession>, SessionError> {
        let mut state = self.state.lock().unwrap();
        state.live += 1;
        state.created += 1;
        state.senders.push(events);
        Ok(Box::new(FakeHlsSession {
            state: self.state.clone(),
        }))
    }
}

struct FakeHlsSession {
    state: Arc<Mutex<LibraryState>>,
}

impl StreamingSession for FakeHlsSession {
    fn load_source(&mut self, url: &str) -> Result<(), SessionError> {
        self.state.lock().unwrap().loaded_urls.push(url.to_string());
        Ok(())
    }

    fn attach_media(&mut self, _element: Arc<dyn MediaElement>) -> Result<(), SessionError> {
        Ok(())
    }

    fn start_load(&mut self) -> Result<(), SessionError> {
        self.state.lock().unwrap().start_loads += 1;
        Ok(())
    }

    fn recover_media_error(&mut self) -> Result<(), SessionError> {
        Ok(())
    }

    fn destroy(self: Box<Self>) {
        self.state.lock().unwrap().live -= 1;
    }
}
