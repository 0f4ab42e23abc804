//! Kinetic Application
//!
//! [`App`] owns one of everything: the document, the gesture bus and
//! session, the animation driver and sequencer, and the flux dispatcher. The
//! host loop feeds it [`Event`]s; nothing happens in between.

use std::path::Path;
use std::time::Instant;

use kinetic_animation::{
    AnimationDriver, CharacterId, CompletionCallback, FrameDriver, KeyframeSequencer, KeyframeSpec,
    Pose,
};
use kinetic_core::{Dispatcher, Document, FluxDispatcher, FluxStore, ListenerId, NodeId, Source};
use kinetic_gesture::{EventResponse, GestureNotification, GestureSession};
use kinetic_platform::Event;
use serde_json::Value;

use crate::config::{AppConfig, StoreConfig};
use crate::error::Result;

/// The application root
pub struct App {
    config: AppConfig,
    document: Document,
    bus: Dispatcher<GestureNotification>,
    gestures: GestureSession,
    driver: FrameDriver,
    sequencer: KeyframeSequencer,
    flux: FluxDispatcher,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("nodes", &self.document.len())
            .field("listeners", &self.bus.len())
            .field("mode", &self.gestures.mode())
            .field("characters", &self.driver.len())
            .finish()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create an application with custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let document = Document::new();
        let bus = Dispatcher::new();
        let gestures = GestureSession::new(config.gesture.clone(), &config.platform);
        let mut driver = FrameDriver::new();
        driver.set_target_fps(config.animation.target_fps);
        let sequencer = KeyframeSequencer::new();
        let flux = FluxDispatcher::new();

        tracing::info!(
            "App: ready ({}, {} fps)",
            config.platform.name(),
            driver.target_fps()
        );

        Self {
            config,
            document,
            bus,
            gestures,
            driver,
            sequencer,
            flux,
        }
    }

    /// Create an application from a configuration file
    pub fn from_path(path: &Path) -> Result<Self> {
        let config = AppConfig::load_from_path(path)?;
        Ok(Self::with_config(config))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn gestures(&self) -> &GestureSession {
        &self.gestures
    }

    pub fn gestures_mut(&mut self) -> &mut GestureSession {
        &mut self.gestures
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn sequencer(&self) -> &KeyframeSequencer {
        &self.sequencer
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Listen to gesture notifications
    pub fn on_gesture<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&GestureNotification) + 'static,
    {
        self.bus.subscribe(listener)
    }

    pub fn remove_gesture_listener(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Handle one event from the host loop
    ///
    /// Malformed input is logged and dropped; the application keeps running.
    pub fn handle_event(&mut self, event: &Event) -> Result<EventResponse> {
        match event {
            Event::Input { event, at } => {
                match self
                    .gestures
                    .handle(event, *at, &self.document, &mut self.bus)
                {
                    Ok(response) => Ok(response),
                    Err(err) => {
                        tracing::warn!("App: dropping input event: {}", err);
                        Ok(EventResponse::Ignored)
                    }
                }
            }
            Event::Frame(now) => {
                self.frame(*now)?;
                Ok(EventResponse::Handled)
            }
        }
    }

    /// Run deferred gesture jobs and advance animations
    ///
    /// Returns the characters whose keyframe sequence completed.
    pub fn frame(&mut self, now: Instant) -> Result<Vec<CharacterId>> {
        self.gestures.poll(now);
        Ok(self.sequencer.tick(&mut self.driver, now)?)
    }

    /// Feed a batch of events in order
    pub fn run<'a, I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        for event in events {
            self.handle_event(event)?;
        }
        Ok(())
    }

    /// Whether the host should keep delivering frames
    pub fn needs_frame(&self) -> bool {
        self.driver.has_active() || self.gestures.is_reset_pending()
    }

    /// When the host should deliver the next frame
    ///
    /// Running animations ask for frames at the configured target rate; a
    /// pending gesture reset asks for one at its deadline.
    pub fn next_frame_at(&self, now: Instant) -> Option<Instant> {
        match (self.driver.next_frame_at(now), self.gestures.next_deadline()) {
            (Some(frame), Some(deadline)) => Some(frame.min(deadline)),
            (frame, deadline) => frame.or(deadline),
        }
    }

    /// Earliest deadline of a deferred gesture job
    pub fn next_deadline(&self) -> Option<Instant> {
        self.gestures.next_deadline()
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Register the character for `node`, showing `pose`
    pub fn add_character(&mut self, node: NodeId, pose: Pose) -> CharacterId {
        self.driver.add_character(node, pose)
    }

    /// Play `spec` on `node`, registering an empty-pose character if needed
    pub fn animate(
        &mut self,
        node: NodeId,
        spec: KeyframeSpec,
        now: Instant,
        on_complete: Option<CompletionCallback>,
    ) -> Result<CharacterId> {
        let id = self.driver.add_character(node, Pose::new());
        self.sequencer
            .animate(&mut self.driver, id, spec, now, on_complete)?;
        Ok(id)
    }

    /// Send the animation on `node` back to its start. False if nothing is
    /// animating there.
    pub fn reverse(&mut self, node: NodeId, now: Instant) -> bool {
        self.sequencer.reverse(&mut self.driver, node, now)
    }

    /// Current pose shown by `node`
    pub fn pose(&self, node: NodeId) -> Option<&Pose> {
        let id = self.driver.find(node)?;
        self.driver.character(id).map(|character| character.current())
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// A registered store using the configured defaults
    pub fn create_store(&mut self) -> FluxStore {
        self.create_store_with(self.config.store.clone())
    }

    pub fn create_store_with(&mut self, options: StoreConfig) -> FluxStore {
        FluxStore::with_dispatcher(options, &mut self.flux)
    }

    /// Listen to a store's updates, registering it first if needed
    pub fn listen<F>(&mut self, store: &mut FluxStore, listener: F) -> Result<()>
    where
        F: FnMut(&Value) + 'static,
    {
        let id = store.register(&mut self.flux);
        self.flux.listen(id, listener)?;
        Ok(())
    }

    /// Fetch into `store` and notify its listeners
    pub fn fetch(&mut self, store: &mut FluxStore, source: &mut dyn Source) -> Result<()> {
        store.fetch(source, &mut self.flux)?;
        Ok(())
    }
}
