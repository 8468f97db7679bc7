#![allow(clippy::needless_return)]

//! A polymorphic value/container runtime.
//!
//! `vessel` provides a small set of thread-safe, reference-counted container
//! types — [`VString`], [`VList`], [`VMap`], [`VSet`], and [`VBuffer`] — built
//! around a single tagged value, [`ValueCell`]. Every container is a cheap
//! handle around a lock-guarded control block: cloning a handle shares the
//! underlying data, while inserting a value into a container or reading one
//! back out always deep-copies, so the value graph a program builds is always
//! a tree, never a graph with cycles or aliasing surprises.
//!
//! There is no exception channel in the public API. Every operation resolves
//! to a value: an out-of-range index clamps or returns a zero value, a
//! type-mismatched accessor returns the zero value of the requested type, and
//! malformed JSON/CSV input parses as far as it can and fills in the rest with
//! nulls and zeros. This mirrors how the system this crate was modeled on
//! behaves, and it means every method signature here returns `T`, not
//! `Result<T, _>` or `Option<T>`.
//!
//! ### Modules
//! - [`cell`] — the `ValueCell` tagged union and its numeric-coercion rules.
//! - [`vstring`], [`vlist`], [`vmap`], [`vset`], [`vbuffer`] — the five
//!   container types.
//! - [`json`], [`csv`], [`base64`] — hand-rolled codecs (no external crates).
//! - [`format`] — `{token}` string interpolation against a list or map.
//! - [`utf8`] — byte/character index conversion shared by every `VString` op.

pub mod base64;
pub mod cell;
#[cfg(feature = "cipher")]
pub mod cipher;
#[cfg(feature = "compress")]
pub mod compress;
pub mod csv;
pub mod error;
pub mod format;
pub mod json;
mod shared;
pub mod utf8;
pub mod vbuffer;
pub mod vlist;
pub mod vmap;
pub mod vset;
pub mod vstring;

pub use cell::{CellType, FromCell, ValueCell};
pub use error::VesselError;
pub use format::FormatSource;
pub use vbuffer::VBuffer;
pub use vlist::{IntoCell, VList};
pub use vmap::VMap;
pub use vset::VSet;
pub use vstring::VString;
