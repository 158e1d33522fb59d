//! Sight systems (registration + per-frame evaluation)

pub mod evaluate;
pub mod register;


// Re-export all systems
pub use evaluate::*;
pub use register::*;
