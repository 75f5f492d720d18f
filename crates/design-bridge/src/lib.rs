//! Message bridge between a UI (or render adapter) and the design engine.
//!
//! The UI speaks [`UiToEngine`] and receives [`EngineToUi`], both tagged JSON.
//! Rendering data is served as a [`RenderFrame`] that is rebuilt only when the
//! live parameters change.

pub mod dispatch;
pub mod frame;
pub mod messages;
pub mod state;

pub use dispatch::{dispatch, dispatch_json};
pub use frame::{FrameCache, RenderFrame};
pub use messages::{EngineToUi, UiToEngine};
pub use state::{BridgeError, BridgeState};
