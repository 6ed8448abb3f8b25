// Managers Module
//
// EqualizerManager owns the native effect handle; the bridge dispatcher
// validates arguments and delegates every operation to it.

pub mod equalizer_manager;

pub use equalizer_manager::EqualizerManager;
