//! Player application and event loop glue
//!
//! Single-threaded cooperative model: the playback clock, the render
//! pipeline and the palette all live on the event-loop thread, one frame
//! per redraw. Tuning events are applied between renders, and a retuned
//! palette replaces the previous one before the next decode step reads it.
//! The audio device runs independently on the pre-assembled track; nothing
//! here feeds it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use avf_codec::{
    FRAME_HEIGHT, FRAME_WIDTH, Palette, PlaybackClock, PlaybackState, TUNING_STEP, VideoFrame,
    VideoStandard, render_frame,
};

use crate::audio::PlayerAudio;
use crate::graphics::PlayerGraphics;

/// Interval between debug stats reports
const STATS_INTERVAL: Duration = Duration::from_secs(1);

/// The player application driven by the winit event loop
pub struct PlayerApp {
    file_name: String,
    standard: VideoStandard,
    scale: u32,
    frames: Vec<VideoFrame>,

    state: PlaybackState,
    palette: Palette,
    audio: PlayerAudio,

    window: Option<Arc<Window>>,
    graphics: Option<PlayerGraphics>,
    clock: Option<PlaybackClock>,

    shift_held: bool,
    should_exit: bool,
    current_index: usize,

    frames_rendered: u32,
    last_stats: Instant,
}

impl PlayerApp {
    pub fn new(
        file_name: String,
        standard: VideoStandard,
        scale: u32,
        debug: bool,
        frames: Vec<VideoFrame>,
        audio: PlayerAudio,
    ) -> Self {
        let state = PlaybackState {
            debug,
            ..PlaybackState::default()
        };
        let palette = state.palette();

        Self {
            file_name,
            standard,
            scale,
            frames,
            state,
            palette,
            audio,
            window: None,
            graphics: None,
            clock: None,
            shift_held: false,
            should_exit: false,
            current_index: 0,
            frames_rendered: 0,
            last_stats: Instant::now(),
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn toggle_pause(&mut self) {
        let Some(clock) = &mut self.clock else {
            return;
        };
        let now = Instant::now();
        if clock.is_paused() {
            clock.resume(now);
            self.audio.resume();
            tracing::info!("Resumed");
        } else {
            clock.pause(now);
            self.audio.pause();
            tracing::info!("Paused");
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        let mut retune = false;
        match key {
            KeyCode::Escape => {
                event_loop.exit();
                return;
            }
            KeyCode::Space => self.toggle_pause(),
            KeyCode::KeyS => {
                let on = self.state.toggle_scanlines();
                tracing::info!("Scanlines: {}", if on { "on" } else { "off" });
            }
            KeyCode::KeyB => {
                let on = self.state.toggle_blending();
                tracing::info!("Blending: {}", if on { "on" } else { "off" });
            }
            KeyCode::KeyL => {
                let on = self.state.toggle_looping();
                tracing::info!("Loop: {}", if on { "on" } else { "off" });
            }
            KeyCode::KeyD => {
                self.state.toggle_debug();
            }
            KeyCode::BracketLeft => {
                retune = if self.shift_held {
                    self.state.adjust_saturation(-TUNING_STEP)
                } else {
                    self.state.adjust_phase(-TUNING_STEP)
                };
            }
            KeyCode::BracketRight => {
                retune = if self.shift_held {
                    self.state.adjust_saturation(TUNING_STEP)
                } else {
                    self.state.adjust_phase(TUNING_STEP)
                };
            }
            _ => return,
        }

        if retune {
            // Complete rebuild, swapped in before the next render reads it
            self.palette = self.state.palette();
            tracing::info!(
                "Palette: phase {:.2}, saturation {:.2}",
                self.state.phase_shift,
                self.state.saturation
            );
        }
        self.request_redraw();
    }

    /// Render the frame the clock points at, handling end-of-file
    fn render_tick(&mut self) {
        let now = Instant::now();
        let Some(clock) = &mut self.clock else {
            return;
        };

        let fps = self.standard.fps();
        let mut index = clock.frame_index(now, fps);

        if index >= self.frames.len() && !clock.is_paused() {
            if self.state.looping {
                // Restart the session: new timing reference, audio from the top
                clock.restart(now);
                self.audio.rewind();
                index = 0;
                tracing::debug!("Loop restart");
            } else {
                self.audio.stop();
                self.should_exit = true;
                return;
            }
        }
        self.current_index = index.min(self.frames.len() - 1);

        let rgb = render_frame(
            &self.frames[self.current_index],
            &self.palette,
            self.standard,
            &self.state,
        );

        if let Some(graphics) = &mut self.graphics {
            graphics.upload_frame(&rgb);
            graphics.present();
        }

        self.frames_rendered += 1;
        if self.state.debug && now.duration_since(self.last_stats) >= STATS_INTERVAL {
            tracing::debug!(
                "frame {}/{}, {} rendered in the last {:?}, phase {:.2}, sat {:.2}",
                self.current_index,
                self.frames.len(),
                self.frames_rendered,
                STATS_INTERVAL,
                self.state.phase_shift,
                self.state.saturation
            );
            self.frames_rendered = 0;
            self.last_stats = now;
        }
    }

    /// When the next frame is due, or None to wait for events
    fn next_frame_time(&self) -> Option<Instant> {
        let clock = self.clock.as_ref()?;
        if clock.is_paused() || self.should_exit {
            return None;
        }
        Some(clock.frame_deadline(self.current_index + 1, self.standard.fps()))
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        // Source pixels are wide: double the horizontal scale
        let window_attributes = Window::default_attributes()
            .with_title(format!("AVF Player | {}", self.file_name))
            .with_inner_size(winit::dpi::LogicalSize::new(
                (FRAME_WIDTH as u32) * 2 * self.scale,
                (FRAME_HEIGHT as u32) * self.scale,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match PlayerGraphics::new_blocking(Arc::clone(&window)) {
            Ok(graphics) => self.graphics = Some(graphics),
            Err(e) => {
                tracing::error!("Failed to initialize graphics: {}", e);
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);

        // Session starts now: audio and clock share the reference point
        self.clock = Some(PlaybackClock::new(Instant::now()));
        self.audio.play();
        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.resize(size.width, size.height);
                }
                self.request_redraw();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_held = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.handle_key(event_loop, key);
            }
            WindowEvent::RedrawRequested => {
                self.render_tick();
                if self.should_exit {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        match self.next_frame_time() {
            Some(next_time) => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(next_time));
                // Still request redraw so we wake up at the right time
                self.request_redraw();
            }
            None => {
                event_loop.set_control_flow(ControlFlow::Wait);
            }
        }
    }
}
