// AdBlocker Ultimate popup shared type definitions
// Each submodule defines types used across the popup and background layers.

pub mod errors;
pub mod feedback;
pub mod popup;
pub mod rank;
pub mod settings;
pub mod stats;
pub mod tab_info;
pub mod view;
