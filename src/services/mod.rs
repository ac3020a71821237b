// AdBlocker Ultimate popup services
// Services provide the popup's core behaviour: persistence, blocked stats, rank, view resolution and settings.

pub mod rank_engine;
pub mod settings_engine;
pub mod share_links;
pub mod stats_store;
pub mod storage;
pub mod view_resolver;
