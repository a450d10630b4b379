//! `f64conv` converts between decimal text and `f64` without
//! allocating.
//!
//! Parsing is correctly rounded (round half to even) for inputs of
//! any length. Rendering supports C's `%f`, `%e` and `%g` notations
//! at any precision up to [`MAX_PRECISION`], and the shortest
//! rendering that parses back to the same `f64`.
//!
//! # Example
//!
//! ```
//! use f64conv::{parse_number_f64, render_number_f64, ParseOptions, RenderOptions};
//!
//! let x = parse_number_f64(b"3.141592653589793", ParseOptions::empty()).unwrap();
//! assert_eq!(x, core::f64::consts::PI);
//!
//! let mut buf = [0u8; 32];
//! let n = render_number_f64(&mut buf, x, 3, RenderOptions::EXPONENT_ABSENT);
//! assert_eq!(&buf[..n], b"3.142");
//!
//! let n = render_number_f64(&mut buf, x, 0, RenderOptions::JUST_ENOUGH_PRECISION);
//! assert_eq!(&buf[..n], b"3.141592653589793");
//! ```
//!
//! # Algorithms
//!
//! Most inputs are parsed with the [Eisel-Lemire] algorithm. The
//! rest, and every rendering, go through a fixed precision decimal
//! type with 800 digits, which is enough to hold every `f64`
//! exactly.
//!
//! # Cargo Features
//!
//! - `alloc`: Include [`alloc`] support. This is currently
//!   unused, but may be used in the future.
//!
//! - `std`: Include [`std`] support, which implements
//!   [`std::error::Error`] for [`ParseError`]. Implies the `alloc`
//!   feature.
//!
//! [Eisel-Lemire]: https://arxiv.org/abs/2101.11408
//! [`alloc`]: https://doc.rust-lang.org/alloc/
//! [`std`]: https://doc.rust-lang.org/std/

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(feature = "std", test)), deny(clippy::std_instead_of_core))]
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::cast_precision_loss)]
#![deny(clippy::cast_sign_loss)]
#![deny(clippy::expect_used)]
#![deny(clippy::implicit_saturating_sub)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::missing_panics_doc)]
#![deny(clippy::panic)]
#![deny(clippy::ptr_as_ptr)]
#![deny(clippy::string_slice)]
#![deny(clippy::transmute_ptr_to_ptr)]
#![deny(clippy::undocumented_unsafe_blocks)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::wildcard_imports)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(unused_lifetimes)]
#![deny(unused_qualifications)]
#![forbid(unsafe_code)]

mod arith;
mod atof;
mod conv;
mod ctx;
mod eisel_lemire;
mod fptest;
mod ftoa;
mod hpd;
mod ieee754;
mod tables;
mod util;

pub use atof::parse_number_f64;
pub use conv::{Buffer, ErrorKind, ParseError, Status};
pub use ctx::{ParseOptions, RenderOptions, MAX_PRECISION};
pub use ftoa::render_number_f64;
pub use ieee754::{f64_to_f16_bits_truncate, f64_to_f32_bits_truncate, LossyValue};
