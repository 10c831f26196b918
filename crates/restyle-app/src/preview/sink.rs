use std::sync::mpsc;
use std::sync::Mutex;

use restyle_webview::ScriptSink;
use winit::event_loop::EventLoopProxy;

/// Wake-ups sent to the window's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    /// Page scripts are queued.
    Scripts,
}

/// Queues scripts for the UI thread and wakes its event loop.
pub struct ProxySink {
    scripts: mpsc::Sender<String>,
    proxy: Mutex<EventLoopProxy<UserEvent>>,
}

impl ProxySink {
    pub fn new(scripts: mpsc::Sender<String>, proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            scripts,
            proxy: Mutex::new(proxy),
        }
    }
}

impl ScriptSink for ProxySink {
    fn run(&self, script: String) -> bool {
        if self.scripts.send(script).is_err() {
            return false;
        }
        if let Ok(proxy) = self.proxy.lock() {
            // A closed loop means the window is gone; the queue is moot then.
            let _ = proxy.send_event(UserEvent::Scripts);
        }
        true
    }
}
