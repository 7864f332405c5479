// crates/quickcut-core/src/lib.rs
//
// Pure timeline data and math — no channels, no threads, no presentation
// handles. Serializable via serde. Used by both quickcut-timeline and
// quickcut-media consumers.

pub mod clip;
pub mod helpers;
