//! Error types for the spiral drawer and its drawing surfaces.

use crate::spiral::SpiralPhase;

/// Errors that can end a drawing session.
///
/// Surface failures (no display, no GPU) are fatal: they are returned to the
/// caller unchanged and never retried.
#[derive(Debug, thiserror::Error)]
pub enum SpiralError {
    /// The event loop could not be created or failed while running.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// wgpu could not create a surface for the window.
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// No GPU adapter is compatible with the window surface.
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The GPU device could not be created.
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// A drawer operation was called out of order.
    #[error("cannot {operation} while {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: SpiralPhase,
    },

    /// `finalize` was called before the step counter reached its end.
    #[error("step counter is still running (counter = {counter})")]
    LoopStillRunning { counter: i64 },

    /// `done` was already called on this surface.
    #[error("drawing surface was already closed")]
    AlreadyClosed,

    /// Drawing parameters the surface cannot use.
    #[error("invalid drawing parameters: {0}")]
    InvalidParams(String),
}

pub type Result<T, E = SpiralError> = std::result::Result<T, E>;
