//! Hand-off of map mutations to the context that owns the surface.
//!
//! The surface never leaves its [`MapContext`]. Other tasks hold a
//! [`MapHandle`] and submit closures over an unbounded channel; each closure
//! runs on the owning context and its result comes back over a oneshot.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

type Command<S> = Box<dyn FnOnce(&mut S) + Send>;

/// The owning context stopped before a command completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The [`MapContext`] was dropped.
    #[error("map context is no longer running")]
    ContextClosed,
}

/// Owner of a map surface; executes commands sent through [`MapHandle`]s.
///
/// # Examples
/// ```
/// use trailside_core::map::{MapContext, MapSurface, MemoryMapSurface};
/// use geojson::FeatureCollection;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let (context, handle) = MapContext::new(MemoryMapSurface::new());
/// let work = async move {
///     let empty = FeatureCollection { bbox: None, features: vec![], foreign_members: None };
///     handle
///         .run(move |surface| surface.add_source("trails", empty))
///         .await
///         .expect("context running")
///         .expect("fresh source");
/// };
/// let (surface, ()) = tokio::join!(context.run(), work);
/// assert!(surface.source("trails").is_some());
/// # });
/// ```
#[derive(Debug)]
pub struct MapContext<S> {
    surface: S,
    commands: mpsc::UnboundedReceiver<Command<S>>,
}

/// Cloneable sender of commands to a [`MapContext`].
#[derive(Debug)]
pub struct MapHandle<S> {
    commands: mpsc::UnboundedSender<Command<S>>,
}

impl<S> Clone for MapHandle<S> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
        }
    }
}

impl<S: 'static> MapContext<S> {
    /// Take ownership of `surface` and return the first handle to it.
    pub fn new(surface: S) -> (Self, MapHandle<S>) {
        let (sender, commands) = mpsc::unbounded_channel();
        (Self { surface, commands }, MapHandle { commands: sender })
    }

    /// Execute commands until every handle is dropped, then return the
    /// surface.
    pub async fn run(mut self) -> S {
        log::debug!("map context started");
        while let Some(command) = self.commands.recv().await {
            command(&mut self.surface);
        }
        log::debug!("map context stopped: all handles dropped");
        self.surface
    }

    /// Execute every command already queued and return how many ran.
    ///
    /// Suited to hosts that pump the context once per frame.
    pub fn run_pending(&mut self) -> usize {
        let mut executed = 0;
        while let Ok(command) = self.commands.try_recv() {
            command(&mut self.surface);
            executed += 1;
        }
        executed
    }

    /// Read access to the surface between command batches.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Give the surface back, discarding queued commands.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

impl<S: 'static> MapHandle<S> {
    /// Run `operation` on the owning context and return its result.
    ///
    /// # Errors
    /// [`DispatchError::ContextClosed`] if the context is gone before the
    /// operation runs.
    pub async fn run<F, R>(&self, operation: F) -> Result<R, DispatchError>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, outcome) = oneshot::channel();
        let command: Command<S> = Box::new(move |surface| {
            if reply.send(operation(surface)).is_err() {
                log::debug!("map command finished after its caller went away");
            }
        });
        self.commands
            .send(command)
            .map_err(|_| DispatchError::ContextClosed)?;
        outcome.await.map_err(|_| DispatchError::ContextClosed)
    }
}
