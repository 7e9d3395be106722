//! Storage layer for the menu studio service

mod repo;

pub use repo::{MenuPatch, MenuRepository, NewMenu};
