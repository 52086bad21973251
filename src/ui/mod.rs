/// Presentation helpers for the results screen
///
/// Everything in here renders read-only from the result store; no
/// state lives in the UI layer.

pub mod cards;
pub mod overlays;
