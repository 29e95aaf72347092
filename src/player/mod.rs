// marley-service/src/player/mod.rs
//
// Uniform playback control surface over the three backends a video can
// resolve to: direct element playback for uploads and plain URLs, the
// event-driven YouTube controller, and a bare iframe embed for Vimeo and
// anything else. Callers hold one handle and drive it identically
// regardless of backend; controls a backend cannot honour are no-ops.
use crate::models::VideoSourceType;
use std::time::{Duration, Instant};

/// Everything the handle needs to pick a backend, taken from the video
/// row and its resolved playback URL.
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    pub source_type: VideoSourceType,
    pub external_id: Option<String>,
    pub external_url: Option<String>,
    pub playback_url: Option<String>,
}

/// Handle on a directly-controlled media element.
#[derive(Debug, Clone)]
pub struct MediaElement {
    pub src: String,
    current_time: f64,
    paused: bool,
}

impl MediaElement {
    fn new(src: String) -> Self {
        Self {
            src,
            current_time: 0.0,
            paused: true,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn seek(&mut self, seconds: f64) {
        self.current_time = seconds.max(0.0);
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Ended,
}

// The YouTube controller only pushes state-change events, so progress is
// approximated by polling: densely while playing, sparsely while paused
// (scrubbing still has to be observed), not at all once ended.
const POLL_WHILE_PLAYING: Duration = Duration::from_millis(250);
const POLL_WHILE_PAUSED: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
struct Poller {
    interval: Duration,
    next_due: Instant,
}

impl Poller {
    fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }
}

/// Control shim over the YouTube embedded-player API.
#[derive(Debug, Clone)]
pub struct YouTubeController {
    pub video_id: String,
    current_time: f64,
    state: PlaybackState,
    poller: Option<Poller>,
}

impl YouTubeController {
    fn new(video_id: String) -> Self {
        Self {
            video_id,
            current_time: 0.0,
            state: PlaybackState::Paused,
            poller: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poller.as_ref().map(|poller| poller.interval)
    }

    /// Feed a state-change event from the underlying player. Returns an
    /// immediate time sample; the poll rate is retuned to the new state.
    pub fn handle_state_change(&mut self, state: PlaybackState, now: Instant) -> f64 {
        self.state = state;
        self.poller = match state {
            PlaybackState::Playing => Some(Poller::new(POLL_WHILE_PLAYING, now)),
            PlaybackState::Paused => Some(Poller::new(POLL_WHILE_PAUSED, now)),
            PlaybackState::Ended => None,
        };
        self.current_time
    }

    /// Take a time sample if one is due. While playing, the sampled time
    /// advances with the wall clock.
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        let poller = self.poller.as_mut()?;
        if now < poller.next_due {
            return None;
        }

        if self.state == PlaybackState::Playing {
            self.current_time += now
                .saturating_duration_since(poller.next_due - poller.interval)
                .as_secs_f64();
        }
        poller.next_due = now + poller.interval;

        Some(self.current_time)
    }

    fn seek(&mut self, seconds: f64, now: Instant) {
        self.current_time = seconds.max(0.0);
        // Seeking resumes playback, matching the embedded player
        self.handle_state_change(PlaybackState::Playing, now);
    }

    fn pause(&mut self, now: Instant) {
        self.handle_state_change(PlaybackState::Paused, now);
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Native(MediaElement),
    YouTube(YouTubeController),
    Embed,
}

/// One ref-like handle usable identically regardless of backend.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    backend: Backend,
}

impl PlayerHandle {
    pub fn for_source(descriptor: &SourceDescriptor) -> Self {
        let backend = match descriptor.source_type {
            VideoSourceType::Upload => match &descriptor.playback_url {
                Some(url) => Backend::Native(MediaElement::new(url.clone())),
                None => Backend::Embed,
            },
            VideoSourceType::Youtube => match &descriptor.external_id {
                Some(id) => Backend::YouTube(YouTubeController::new(id.clone())),
                None => Backend::Embed,
            },
            VideoSourceType::Vimeo => Backend::Embed,
            VideoSourceType::External => match &descriptor.external_url {
                Some(url) => Backend::Native(MediaElement::new(url.clone())),
                None => Backend::Embed,
            },
        };
        Self { backend }
    }

    pub fn seek(&mut self, seconds: f64) {
        match &mut self.backend {
            Backend::Native(element) => element.seek(seconds),
            Backend::YouTube(controller) => controller.seek(seconds, Instant::now()),
            // An iframe embed exposes no seek control
            Backend::Embed => {}
        }
    }

    pub fn current_time(&self) -> f64 {
        match &self.backend {
            Backend::Native(element) => element.current_time(),
            Backend::YouTube(controller) => controller.current_time,
            Backend::Embed => 0.0,
        }
    }

    pub fn pause(&mut self) {
        match &mut self.backend {
            Backend::Native(element) => element.pause(),
            Backend::YouTube(controller) => controller.pause(Instant::now()),
            Backend::Embed => {}
        }
    }

    pub fn underlying_element(&self) -> Option<&MediaElement> {
        match &self.backend {
            Backend::Native(element) => Some(element),
            _ => None,
        }
    }

    pub fn youtube_controller_mut(&mut self) -> Option<&mut YouTubeController> {
        match &mut self.backend {
            Backend::YouTube(controller) => Some(controller),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_descriptor() -> SourceDescriptor {
        SourceDescriptor {
            source_type: VideoSourceType::Upload,
            external_id: None,
            external_url: None,
            playback_url: Some("http://127.0.0.1:9090/storage/videos/p1/clip.mp4".to_string()),
        }
    }

    fn youtube_descriptor() -> SourceDescriptor {
        SourceDescriptor {
            source_type: VideoSourceType::Youtube,
            external_id: Some("dQw4w9WgXcQ".to_string()),
            external_url: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
            playback_url: None,
        }
    }

    fn vimeo_descriptor() -> SourceDescriptor {
        SourceDescriptor {
            source_type: VideoSourceType::Vimeo,
            external_id: Some("76979871".to_string()),
            external_url: Some("https://vimeo.com/76979871".to_string()),
            playback_url: None,
        }
    }

    #[test]
    fn native_backend_exposes_the_element() {
        let mut handle = PlayerHandle::for_source(&upload_descriptor());

        assert!(handle.underlying_element().is_some());

        handle.seek(12.5);
        assert_eq!(handle.current_time(), 12.5);
        assert!(!handle.underlying_element().unwrap().is_paused());

        handle.pause();
        assert!(handle.underlying_element().unwrap().is_paused());
    }

    #[test]
    fn embed_backend_is_a_graceful_no_op() {
        let mut handle = PlayerHandle::for_source(&vimeo_descriptor());

        assert!(handle.underlying_element().is_none());

        // None of these should do anything, and none should panic
        handle.seek(30.0);
        handle.pause();
        assert_eq!(handle.current_time(), 0.0);
    }

    #[test]
    fn youtube_poll_rate_follows_playback_state() {
        let mut handle = PlayerHandle::for_source(&youtube_descriptor());
        let controller = handle.youtube_controller_mut().unwrap();
        let now = Instant::now();

        assert_eq!(controller.poll_interval(), None);

        controller.handle_state_change(PlaybackState::Playing, now);
        assert_eq!(controller.poll_interval(), Some(POLL_WHILE_PLAYING));

        controller.handle_state_change(PlaybackState::Paused, now);
        assert_eq!(controller.poll_interval(), Some(POLL_WHILE_PAUSED));

        controller.handle_state_change(PlaybackState::Ended, now);
        assert_eq!(controller.poll_interval(), None);
    }

    #[test]
    fn youtube_polling_samples_only_when_due() {
        let mut handle = PlayerHandle::for_source(&youtube_descriptor());
        let controller = handle.youtube_controller_mut().unwrap();
        let start = Instant::now();

        controller.handle_state_change(PlaybackState::Playing, start);

        // Not yet due
        assert!(controller.poll(start + Duration::from_millis(100)).is_none());

        // Due: the sampled time has advanced with the clock
        let sample = controller.poll(start + Duration::from_millis(300));
        assert!(sample.is_some());
        assert!(sample.unwrap() > 0.0);

        // Ended stops sampling entirely
        controller.handle_state_change(PlaybackState::Ended, start + Duration::from_millis(300));
        assert!(controller.poll(start + Duration::from_secs(10)).is_none());
    }

    #[test]
    fn youtube_seek_resumes_playback() {
        let mut handle = PlayerHandle::for_source(&youtube_descriptor());

        handle.seek(45.0);
        assert_eq!(handle.current_time(), 45.0);

        let controller = handle.youtube_controller_mut().unwrap();
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert_eq!(controller.poll_interval(), Some(POLL_WHILE_PLAYING));
    }

    #[test]
    fn paused_polling_still_observes_scrubbing() {
        let mut handle = PlayerHandle::for_source(&youtube_descriptor());
        let controller = handle.youtube_controller_mut().unwrap();
        let start = Instant::now();

        controller.handle_state_change(PlaybackState::Paused, start);

        // Paused polling is sparser but still live
        assert!(controller.poll(start + Duration::from_millis(300)).is_none());
        let sample = controller.poll(start + Duration::from_millis(600));
        assert_eq!(sample, Some(0.0));
    }
}
