//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Owns the window and the winit event loop on the main thread.
//
// Architecture:
// ```text
//  Main thread                          Logic thread
//  ┌─────────────────────────────┐     ┌──────────────────────┐
//  │ winit event loop            │     │ CoreSystemsOrchestr. │
//  │   ↓                         │     │                      │
//  │ InputProcessor (modifiers)  │     │ EventCollector       │
//  │   ↓                         │     │   ↓                  │
//  │ InputBuffer                 │     │ EngineSystems::tick  │
//  │   ↓ RedrawRequested         │     │                      │
//  │ Sender<PlatformEvent> ──────┼────►│                      │
//  │                             │     │                      │
//  │ user_event(Shutdown) ◄──────┼─────┤ EventLoopProxy       │
//  └─────────────────────────────┘     └──────────────────────┘
// ```
//
// A redraw is the frame boundary: buffered input goes out as one
// `PlatformEvent::Inputs`, empty frames send nothing. If the core thread
// is gone the platform keeps running so the window can still be closed.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::{debug, error, info, trace, warn};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

//=== Internal Dependencies ===============================================

use crate::config::WindowConfig;
use crate::core::platform_bridge::PlatformEvent;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== CoreSignal ==========================================================

/// Messages from the logic thread, delivered through the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoreSignal {
    /// The core loop has ended; close the window.
    Shutdown,
}

//=== PlatformError =======================================================

#[derive(Debug, Error)]
pub(crate) enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),
}

//=== Platform ============================================================

/// Window owner and input batcher. Must stay on the main thread.
pub(crate) struct Platform {
    /// Created in `resumed()`.
    window: Option<Window>,
    window_config: WindowConfig,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    input_processor: InputProcessor,
}

impl Platform {
    pub(crate) fn new(event_sender: Sender<PlatformEvent>, window_config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            window_config,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
        }
    }

    /// Creates the event loop. Call on the main thread, before the core
    /// thread starts, so its proxy can be handed over.
    pub(crate) fn event_loop() -> Result<EventLoop<CoreSignal>, PlatformError> {
        EventLoop::<CoreSignal>::with_user_event()
            .build()
            .map_err(PlatformError::EventLoopCreation)
    }

    /// Runs `event_loop` until the window closes or the core shuts down.
    pub(crate) fn run(mut self, event_loop: EventLoop<CoreSignal>) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    fn flush_input_buffer(&mut self) {
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };
        let counts = (discrete.len(), continuous.len());

        trace!(
            target: "platform::input",
            "Flushing {} discrete + {} continuous events",
            counts.0,
            counts.1
        );

        if self
            .event_sender
            .send(PlatformEvent::Inputs { discrete, continuous })
            .is_err()
        {
            warn!(
                target: "platform::input",
                "Core disconnected, dropped {} discrete + {} continuous events",
                counts.0,
                counts.1
            );
        }
    }

    fn notify_closed(&self) {
        if self.event_sender.send(PlatformEvent::WindowClosed).is_err() {
            debug!(target: "platform", "Core already stopped");
        }
    }

    fn window_attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.window_config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ))
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler<CoreSignal> for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Resumed with existing window");
            return;
        }

        match event_loop.create_window(self.window_attributes()) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window \"{}\" created: {}x{} @ {}x",
                    self.window_config.title,
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.notify_closed();
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, signal: CoreSignal) {
        match signal {
            CoreSignal::Shutdown => {
                info!(target: "platform", "Core requested shutdown");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.notify_closed();
                event_loop.exit();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                trace!(target: "platform::input", "Modifiers: {:?}", modifiers.state());
                self.input_processor.update_modifiers(modifiers.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_cursor(position.x, position.y);
                self.buffer.push_continuous(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.input_processor.process_key_event(&key_event) {
                    Some(event) => self.buffer.push_discrete(event),
                    None => trace!(target: "platform::input", "Unmapped key {:?}", key_event.physical_key),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(button, state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode};
    use crossbeam_channel::unbounded;

    fn platform() -> (Platform, crossbeam_channel::Receiver<PlatformEvent>) {
        let (tx, rx) = unbounded();
        (Platform::new(tx, WindowConfig::default()), rx)
    }

    #[test]
    fn window_is_created_lazily() {
        let (platform, _rx) = platform();
        assert!(platform.window.is_none());
    }

    #[test]
    fn empty_frame_sends_nothing() {
        let (mut platform, rx) = platform();
        platform.flush_input_buffer();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_sends_one_batch() {
        let (mut platform, rx) = platform();
        platform.buffer.push_discrete(InputEvent::key_down(KeyCode::Space));
        platform.buffer.push_continuous(InputEvent::MouseMoved { x: 1.0, y: 1.0 });

        platform.flush_input_buffer();
        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                assert_eq!(discrete, vec![InputEvent::key_down(KeyCode::Space)]);
                assert_eq!(continuous.len(), 1);
            }
            other => panic!("Expected Inputs, got {:?}", other),
        }
        assert!(rx.try_recv().is_err(), "second flush should be empty");
    }

    #[test]
    fn flush_survives_disconnected_core() {
        let (mut platform, rx) = platform();
        platform.buffer.push_discrete(InputEvent::key_down(KeyCode::KeyA));
        drop(rx);

        platform.flush_input_buffer();
        platform.notify_closed();
        assert!(platform.buffer.is_empty());
    }

    #[test]
    fn close_notification_reaches_core() {
        let (platform, rx) = platform();
        platform.notify_closed();
        assert!(matches!(rx.try_recv(), Ok(PlatformEvent::WindowClosed)));
    }

    #[test]
    fn attributes_follow_window_config() {
        let (tx, _rx) = unbounded();
        let config = WindowConfig {
            title: "Demo".to_string(),
            width: 1024,
            height: 768,
        };
        let platform = Platform::new(tx, config);
        let attrs = platform.window_attributes();
        assert_eq!(attrs.title, "Demo");
    }

    #[test]
    fn platform_error_is_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }
}
