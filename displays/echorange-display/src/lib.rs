//! Display surface and rendering for echorange
//!
//! This crate provides:
//! - `Surface` trait: the drawing contract the pipeline renders through
//! - `Framebuffer`: a 128x32 monochrome buffer that implements the drawing
//!   half of the contract on top of embedded-graphics
//! - `render`: turns a coordinator [`Frame`](echorange_core::Frame) into
//!   surface calls
//!
//! # Architecture
//!
//! The renderer only knows the `Surface` trait. The firmware pairs a
//! `Framebuffer` with a panel driver (SSD1306 over I2C) whose `present`
//! pushes the buffer out; host tests use a recording surface instead.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod framebuffer;
pub mod renderer;

// Re-export key types
pub use backend::{DisplayError, Surface};
pub use framebuffer::{Framebuffer, HEIGHT, WIDTH};
pub use renderer::{render, render_or_reinit, render_splash};
