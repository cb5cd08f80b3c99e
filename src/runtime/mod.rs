//! External-handle model: the runtime traits, the shared slot, pre-load
//! hooks, and simulated doubles for tests and demos.

pub mod handle;
pub mod preload;
pub mod simulated;
pub mod slot;

pub use handle::{LegacyHub, Renderer, RendererSettings, StartupLifecycle, TypesetRuntime};
pub use preload::PreloadConfig;
pub use simulated::{SimulatedHub, SimulatedRuntime, SimulatedStartup};
pub use slot::HandleSlot;
