//! # Lightmeter
//!
//! Derives photographic exposure parameters — aperture, shutter speed, ISO,
//! focal length, exposure value, scene luminance — from the sparse EXIF
//! metadata embedded in an image file. Cameras rarely record every tag, so
//! each quantity resolves either directly from its primary tag or by
//! reconstruction from related tags through the APEX formulas.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lightmeter::ExposureResolver;
//! use std::path::Path;
//!
//! let resolver = ExposureResolver::from_path(Path::new("photo.jpg"))?;
//! println!(
//!     "f/{:.1} at 1/{:.0} s, {:.0} cd/m²",
//!     resolver.f_number()?,
//!     1.0 / resolver.exposure_time()?,
//!     resolver.average_luminance()?,
//! );
//! # Ok::<(), lightmeter::ExposureError>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | The [`TagSource`] boundary and the kamadak-exif production adapter |
//! | [`calculations`] | Pure APEX / photometric / sensor-geometry formulas |
//! | [`resolver`] | Query surface with per-quantity tag-fallback chains |
//! | [`summary`] | One-pass resolution into a serializable summary, display formatting |
//!
//! # Design Decisions
//!
//! ## Fallback Chains as Result Composition
//!
//! Every query is a `Result` pipeline: try the primary tag, `or_else` try
//! the single alternate tag and convert. APEX values are log-base-2
//! encodings, so the conversions are exact inverses and a value derived
//! through a fallback is interchangeable with a stored one. Errors keep
//! their granularity: both tags missing is [`ExposureError::TagNotFound`],
//! while a composite formula that exhausted several independent sub-queries
//! reports [`ExposureError::InsufficientData`] naming the quantity.
//!
//! ## No Caching
//!
//! Composite quantities (exposure value, luminance) call their sibling
//! queries directly and recompute everything on every call. Queries are
//! cheap pure reads over an in-memory store; recomputation keeps every
//! result consistent with the store's current contents and keeps the
//! resolver free of interior mutability, so sharing one across threads
//! needs nothing beyond a shareable store.
//!
//! ## The Tag Store is Injected
//!
//! Byte-level EXIF decoding belongs to the parser, not to this crate. The
//! resolver sees metadata only through the [`TagSource`] trait; the shipped
//! implementation wraps the `kamadak-exif` parser, and tests substitute
//! in-memory stores. The one non-photometric datum carried across the
//! boundary is the metadata block's byte offset within the source file,
//! needed to turn the stored thumbnail offset into an absolute position.

pub mod calculations;
pub mod resolver;
pub mod store;
pub mod summary;

pub use calculations::ResolutionUnit;
pub use resolver::{ExposureError, ExposureResolver};
pub use store::{ExifStore, TagSource};
pub use summary::{ExposureSummary, format_exposure_time, format_f_number};
