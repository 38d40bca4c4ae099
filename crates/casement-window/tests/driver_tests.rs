//! Render-loop driver and window-contract tests over a scripted backend.
//!
//! The fake backend implements the window contract without any GPU, so
//! these cover the driver's ordering and lifecycle guarantees everywhere.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use casement_core::geometry::{Rect, Size};
use casement_core::time::FrameTime;
use casement_window::{
    App, Color, Event, EventBatch, EventQueue, GlVersion, KeyCode, Mods, Window, WindowConfig, run,
};

/// One scripted native occurrence per pump.
enum Action {
    Push(Event),
    NativeResize(u32, u32),
}

type Log = Rc<RefCell<Vec<String>>>;

/// A backend whose "native events" come from a script. Once the script is
/// exhausted every further pump reports a close request, so loops always
/// terminate.
struct ScriptedWindow {
    config: WindowConfig,
    size: Size<u32>,
    queue: EventQueue,
    script: VecDeque<Vec<Action>>,
    frames: u64,
    closing: bool,
    destroy_calls: Rc<RefCell<u32>>,
    log: Log,
}

impl ScriptedWindow {
    fn new(script: Vec<Vec<Action>>, log: Log, destroy_calls: Rc<RefCell<u32>>) -> Self {
        let config = WindowConfig::default();
        Self {
            size: config.size,
            config,
            queue: EventQueue::new(),
            script: script.into(),
            frames: 0,
            closing: false,
            destroy_calls,
            log,
        }
    }
}

impl Window for ScriptedWindow {
    fn backend_name(&self) -> &'static str {
        "scripted"
    }

    fn config(&self) -> &WindowConfig {
        &self.config
    }

    fn size(&self) -> Size<u32> {
        self.size
    }

    fn gl_version(&self) -> GlVersion {
        self.config.gl_version
    }

    fn frames(&self) -> u64 {
        self.frames
    }

    fn is_focused(&self) -> bool {
        true
    }

    fn bind(&mut self) {}

    fn clear(&mut self, _color: Color, _depth: f32, _viewport: Option<Rect<u32>>) {
        self.log.borrow_mut().push("clear".to_string());
    }

    fn swap_buffers(&mut self) {
        self.frames += 1;
        self.log.borrow_mut().push("swap".to_string());
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Size::new(width, height);
        self.queue.push(Event::Resized(self.size));
    }

    fn pump_events(&mut self) -> EventBatch {
        match self.script.pop_front() {
            Some(actions) => {
                for action in actions {
                    match action {
                        Action::Push(event) => self.queue.push(event),
                        Action::NativeResize(w, h) => self.resize(w, h),
                    }
                }
            }
            None => self.queue.push(Event::CloseRequested),
        }
        self.queue.drain()
    }

    fn should_close(&self) -> bool {
        self.closing
    }

    fn close(&mut self) {
        self.closing = true;
    }

    fn destroy(&mut self) {
        if *self.destroy_calls.borrow() == 0 {
            self.closing = true;
        }
        *self.destroy_calls.borrow_mut() += 1;
    }
}

/// Consumer that logs every callback it receives.
struct RecordingApp {
    log: Log,
    sizes_at_frame: Vec<Size<u32>>,
    close_vetoes: u32,
}

impl RecordingApp {
    fn new(log: Log) -> Self {
        Self {
            log,
            sizes_at_frame: Vec::new(),
            close_vetoes: 0,
        }
    }
}

impl App for RecordingApp {
    fn frame(&mut self, window: &mut dyn Window, _time: &FrameTime) {
        self.sizes_at_frame.push(window.size());
        self.log.borrow_mut().push("frame".to_string());
    }

    fn on_key_down(&mut self, key: KeyCode, _mods: Mods) {
        self.log.borrow_mut().push(format!("key_down:{:?}", key));
    }

    fn on_resize(&mut self, size: Size<u32>) {
        self.log
            .borrow_mut()
            .push(format!("resize:{}x{}", size.width, size.height));
    }

    fn on_close_request(&mut self) -> bool {
        self.log.borrow_mut().push("close_request".to_string());
        if self.close_vetoes > 0 {
            self.close_vetoes -= 1;
            false
        } else {
            true
        }
    }
}

fn harness(script: Vec<Vec<Action>>) -> (Log, Rc<RefCell<u32>>, RecordingApp, ScriptedWindow) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let destroy_calls = Rc::new(RefCell::new(0));
    let app = RecordingApp::new(log.clone());
    let window = ScriptedWindow::new(script, log.clone(), destroy_calls.clone());
    (log, destroy_calls, app, window)
}

#[test]
fn events_are_dispatched_before_the_frame_callback() {
    let script = vec![vec![Action::Push(Event::KeyDown {
        key: KeyCode::A,
        mods: Mods::empty(),
    })]];
    let (log, _, mut app, window) = harness(script);

    run(Box::new(window), &mut app);

    let log = log.borrow();
    let key_pos = log.iter().position(|e| e == "key_down:A").unwrap();
    let frame_pos = log.iter().position(|e| e == "frame").unwrap();
    assert!(
        key_pos < frame_pos,
        "event dispatched after frame callback: {:?}",
        *log
    );
}

#[test]
fn frame_counter_matches_swap_count() {
    // Three empty pumps -> three frames before the script-exhausted close.
    let script = vec![vec![], vec![], vec![]];
    let (log, _, mut app, window) = harness(script);

    run(Box::new(window), &mut app);

    let log = log.borrow();
    let frames = log.iter().filter(|e| *e == "frame").count();
    let swaps = log.iter().filter(|e| *e == "swap").count();
    assert_eq!(frames, 3);
    assert_eq!(swaps, 3, "one swap per completed frame");
}

#[test]
fn driver_destroys_exactly_once() {
    let (_, destroy_calls, mut app, window) = harness(vec![vec![]]);

    run(Box::new(window), &mut app);

    assert_eq!(*destroy_calls.borrow(), 1);
}

#[test]
fn destroy_is_idempotent_on_the_contract() {
    let (_, destroy_calls, _, mut window) = harness(vec![]);

    window.destroy();
    window.destroy();
    window.destroy();

    // Further calls must not un-close the window.
    assert!(window.should_close());
    assert_eq!(*destroy_calls.borrow(), 3);
}

#[test]
fn close_flag_is_monotonic() {
    let (_, _, _, mut window) = harness(vec![]);
    assert!(!window.should_close());

    window.close();
    assert!(window.should_close());

    // Pumping, swapping and resizing never clear the flag.
    let _ = window.pump_events();
    window.swap_buffers();
    window.resize(100, 100);
    assert!(window.should_close());
}

#[test]
fn resize_is_observed_before_the_next_frame_callback() {
    // Frame 1 at the default size, then a native resize between frames.
    let script = vec![vec![], vec![Action::NativeResize(400, 300)]];
    let (log, _, mut app, window) = harness(script);

    run(Box::new(window), &mut app);

    assert_eq!(app.sizes_at_frame.len(), 2);
    assert_eq!(app.sizes_at_frame[1], Size::new(400, 300));

    // The resize handler fired before the second frame callback.
    let log = log.borrow();
    let resize_pos = log.iter().position(|e| e == "resize:400x300").unwrap();
    let second_frame_pos = log.iter().rposition(|e| e == "frame").unwrap();
    assert!(resize_pos < second_frame_pos, "{:?}", *log);
}

#[test]
fn close_request_can_be_vetoed() {
    let (log, _, mut app, window) = harness(vec![vec![
        Action::Push(Event::CloseRequested),
    ]]);
    app.close_vetoes = 1;

    run(Box::new(window), &mut app);

    let log = log.borrow();
    let requests = log.iter().filter(|e| *e == "close_request").count();
    let frames = log.iter().filter(|e| *e == "frame").count();
    assert_eq!(requests, 2, "vetoed once, accepted once");
    assert!(frames >= 1, "loop survived the vetoed close: {:?}", *log);
}
