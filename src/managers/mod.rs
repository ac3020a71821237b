// AdBlocker Ultimate popup state managers
// Managers own stateful, per-instance workflows such as one open popup.

pub mod popup_session;
