//! Entity repositories.
//!
//! A repository owns one entity table and the indexes over it, and is the
//! only thing allowed to write to them. Single-entity deletes run as one
//! atomic script; batch saves and cascading deletes are sequences of
//! individually atomic commands and may be observed half-applied.

mod channel;

pub use self::channel::ChannelRepository;
