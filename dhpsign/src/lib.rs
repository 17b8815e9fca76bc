#![doc = include_str!("../README.md")]

pub use dhpsign_core::*;

mod context;
pub use context::default_context;

pub mod client {
    //! Signing client for the DHP platform.
    pub use dhpsign_client::*;
}

pub mod gate {
    //! Concurrent token validation over several identity backends.
    pub use dhpsign_gate::*;
}
