//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{WindowAttributes, WindowId};

use restyle_sync::Visibility;
use restyle_webview::build_preview;

use super::core::PreviewApp;
use super::sink::UserEvent;

impl ApplicationHandler<UserEvent> for PreviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.window_config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.window_config.width as f64,
                self.window_config.height as f64,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match build_preview(&window, &self.preview, self.page.clone(), self.events.clone()) {
            Ok(webview) => self.webview = Some(webview),
            Err(e) => {
                tracing::error!("Failed to create webview: {e}");
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
        self.flush_scripts();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Scripts => self.flush_scripts(),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(webview) = &self.webview {
                    let bounds = wry::Rect {
                        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(
                            0.0, 0.0,
                        )),
                        size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(
                            size.width,
                            size.height,
                        )),
                    };
                    if let Err(e) = webview.set_bounds(bounds) {
                        tracing::warn!("Failed to resize webview: {e}");
                    }
                }
            }

            WindowEvent::Occluded(occluded) => {
                let visibility = if occluded {
                    Visibility::Hidden
                } else {
                    Visibility::Visible
                };
                self.forward_visibility(visibility);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.flush_scripts();
    }
}
