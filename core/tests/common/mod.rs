// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use parking_lot::Mutex;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use strata::{
  async_trait, factory_fn, Branch, Context, ForkArms, ForkedMiddleware, Middleware, MiddlewareFactory, Payload,
};

// --- Recorder shared by test middleware ---

/// Records what test middleware observed, in call order.
#[derive(Debug, Default)]
pub struct Recorder {
  events: Mutex<Vec<String>>,
  context_addrs: Mutex<Vec<usize>>,
  instances: AtomicUsize,
}

impl Recorder {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn record(&self, event: impl Into<String>) {
    self.events.lock().push(event.into());
  }

  pub fn record_context(&self, context: &Context) {
    self.context_addrs.lock().push(context as *const Context as usize);
  }

  pub fn events(&self) -> Vec<String> {
    self.events.lock().clone()
  }

  pub fn context_addrs(&self) -> Vec<usize> {
    self.context_addrs.lock().clone()
  }

  pub fn count(&self, event: &str) -> usize {
    self.events.lock().iter().filter(|e| e.as_str() == event).count()
  }

  pub fn instances(&self) -> usize {
    self.instances.load(Ordering::SeqCst)
  }

  fn instance_created(&self) {
    self.instances.fetch_add(1, Ordering::SeqCst);
  }
}

// --- Test middleware ---

/// A middleware that logs `before:ID` / `after:ID` and the address of the context it saw.
/// `ID` gives each stage its own type so it can be registered separately.
pub struct Stage<const ID: usize> {
  recorder: Arc<Recorder>,
  passes: bool,
}

impl<const ID: usize> Stage<ID> {
  pub fn passing(recorder: Arc<Recorder>) -> Self {
    recorder.instance_created();
    Self { recorder, passes: true }
  }

  pub fn failing(recorder: Arc<Recorder>) -> Self {
    recorder.instance_created();
    Self {
      recorder,
      passes: false,
    }
  }
}

#[async_trait]
impl<const ID: usize> Middleware for Stage<ID> {
  async fn before(&mut self, context: &mut Context, _payload: &Payload) -> bool {
    self.recorder.record(format!("before:{}", ID));
    self.recorder.record_context(context);
    self.passes
  }

  async fn after(&mut self, context: &mut Context, _payload: &Payload) {
    self.recorder.record(format!("after:{}", ID));
    self.recorder.record_context(context);
  }
}

pub fn passing<const ID: usize>(recorder: &Arc<Recorder>) -> MiddlewareFactory {
  let recorder = recorder.clone();
  factory_fn(move || Stage::<ID>::passing(recorder.clone()))
}

pub fn failing<const ID: usize>(recorder: &Arc<Recorder>) -> MiddlewareFactory {
  let recorder = recorder.clone();
  factory_fn(move || Stage::<ID>::failing(recorder.clone()))
}

/// Writes `key` into the context in `before` and checks it is still there in `after`.
pub struct WriteKey {
  recorder: Arc<Recorder>,
  key: &'static str,
  value: String,
}

impl WriteKey {
  pub fn new(recorder: Arc<Recorder>, key: &'static str, value: impl Into<String>) -> Self {
    Self {
      recorder,
      key,
      value: value.into(),
    }
  }
}

#[async_trait]
impl Middleware for WriteKey {
  async fn before(&mut self, context: &mut Context, _payload: &Payload) -> bool {
    self.recorder.record_context(context);
    context.insert(self.key, self.value.clone());
    true
  }

  async fn after(&mut self, context: &mut Context, _payload: &Payload) {
    let seen = context.get::<String>(self.key).cloned().unwrap_or_default();
    self.recorder.record(format!("after-saw:{}={}", self.key, seen));
  }
}

/// Reads `key` from the context in `before`, recording what it found.
pub struct ReadKey {
  recorder: Arc<Recorder>,
  key: &'static str,
}

impl ReadKey {
  pub fn new(recorder: Arc<Recorder>, key: &'static str) -> Self {
    Self { recorder, key }
  }
}

#[async_trait]
impl Middleware for ReadKey {
  async fn before(&mut self, context: &mut Context, _payload: &Payload) -> bool {
    self.recorder.record_context(context);
    let seen = context.get::<String>(self.key).cloned().unwrap_or_else(|| "<missing>".to_string());
    self.recorder.record(format!("read:{}={}", self.key, seen));
    true
  }

  async fn after(&mut self, _context: &mut Context, _payload: &Payload) {}
}

/// Records the payload it was given, downcast to `String`.
pub struct PayloadProbe {
  recorder: Arc<Recorder>,
}

impl PayloadProbe {
  pub fn new(recorder: Arc<Recorder>) -> Self {
    Self { recorder }
  }
}

#[async_trait]
impl Middleware for PayloadProbe {
  async fn before(&mut self, _context: &mut Context, payload: &Payload) -> bool {
    match payload.downcast_ref::<String>() {
      Some(s) => self.recorder.record(format!("payload:{}", s)),
      None => self.recorder.record("payload:<not a string>"),
    }
    true
  }

  async fn after(&mut self, _context: &mut Context, _payload: &Payload) {}
}

// --- Test fork ---

/// Routes `"L"` left, `"R"` right and anything else nowhere. Logs its own `after`.
pub struct LetterFork {
  arms: ForkArms,
  recorder: Arc<Recorder>,
}

impl LetterFork {
  pub fn new(arms: ForkArms, recorder: Arc<Recorder>) -> Self {
    recorder.instance_created();
    Self { arms, recorder }
  }
}

pub fn choose_by_letter(payload: &Payload) -> Branch {
  match payload.downcast_ref::<String>().map(String::as_str) {
    Some("L") => Branch::Left,
    Some("R") => Branch::Right,
    _ => Branch::Neither,
  }
}

#[async_trait]
impl ForkedMiddleware for LetterFork {
  fn arms(&self) -> &ForkArms {
    &self.arms
  }

  fn choose_pipeline(&self, payload: &Payload) -> Branch {
    choose_by_letter(payload)
  }

  async fn after(&mut self, context: &mut Context, _payload: &Payload) {
    self.recorder.record("after:fork");
    self.recorder.record_context(context);
  }
}

// --- Middleware built through `Default`, counted process-wide ---

pub static COUNTED_INSTANCES: Lazy<AtomicUsize> = Lazy::new(|| AtomicUsize::new(0));

pub struct Counted;

impl Default for Counted {
  fn default() -> Self {
    COUNTED_INSTANCES.fetch_add(1, Ordering::SeqCst);
    Counted
  }
}

#[async_trait]
impl Middleware for Counted {
  async fn before(&mut self, _context: &mut Context, _payload: &Payload) -> bool {
    true
  }

  async fn after(&mut self, _context: &mut Context, _payload: &Payload) {}
}

pub fn reset_counters() {
  COUNTED_INSTANCES.store(0, Ordering::SeqCst);
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
