pub mod bounds;
pub mod buffer;
pub mod capture;
pub mod geometry;
pub mod history;
pub mod logging;
pub mod model;
pub mod pointer;
pub mod raster;
pub mod recognition;
pub mod session;
pub mod settings;
pub mod shortcuts;
pub mod stroke;
pub mod surface;

pub use session::{
    CanvasSession, CursorPreview, ResultOverlay, SessionPhase, SolveRequest, SolveStart,
};
