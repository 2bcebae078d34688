//! Exposure queries over a tag store, with tag-fallback chains.
//!
//! Each query tries its primary tag first; if that is absent it tries one
//! alternate tag and converts through the matching APEX formula. There are
//! no further fallback levels — a miss on the alternate propagates as the
//! same tag-not-found failure. Composite quantities (exposure value,
//! luminance) call the sibling queries directly, so their inputs resolve
//! through the same chains.
//!
//! ## Fallback table
//!
//! | Query | Primary tag | Alternate tag | Conversion |
//! |---|---|---|---|
//! | `f_number` | FNumber | ApertureValue | `2^(Av/2)` |
//! | `exposure_time` | ExposureTime | ShutterSpeedValue | `2^(-Tv)` |
//! | `iso` | PhotographicSensitivity | ExposureIndex | identity |
//! | `aperture_value` | ApertureValue | FNumber | `2·log2(N)` |
//! | `time_value` | ShutterSpeedValue | ExposureTime | `log2(1/T)` |
//!
//! Nothing is cached: every query re-reads the store, so results always
//! reflect its current contents and a failed query leaves no residue.

use std::path::Path;

use exif::Tag;
use thiserror::Error;

use crate::calculations::{self, ResolutionUnit};
use crate::store::{ExifStore, TagSource};

#[derive(Error, Debug)]
pub enum ExposureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("EXIF parse error: {0}")]
    Parse(#[from] exif::Error),
    #[error("Could not read EXIF tag {0}")]
    TagNotFound(Tag),
    #[error("Insufficient EXIF information to compute {0}")]
    InsufficientData(&'static str),
    #[error("Illegal value for {0}")]
    InvalidValue(&'static str),
}

/// Stateless query surface over one tag store.
///
/// Construct once per decoded image, query as often as needed. Every query
/// is a pure function of the store's contents; the resolver itself holds no
/// mutable state, so it is `Send`/`Sync` whenever the store is.
pub struct ExposureResolver<S: TagSource> {
    store: S,
}

impl ExposureResolver<ExifStore> {
    /// Parse the EXIF block out of an image file and wrap it.
    ///
    /// Parser and IO failures of the underlying store surface here as
    /// [`ExposureError::Parse`] and [`ExposureError::Io`].
    pub fn from_path(path: &Path) -> Result<Self, ExposureError> {
        Ok(Self::new(ExifStore::from_path(path)?))
    }
}

impl<S: TagSource> From<S> for ExposureResolver<S> {
    fn from(store: S) -> Self {
        Self::new(store)
    }
}

impl<S: TagSource> ExposureResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // Typed lookup atoms. The sole point of contact with the store, and the
    // sole source of `TagNotFound`: absence and type mismatch are the same
    // failure.

    fn int_tag(&self, tag: Tag) -> Result<i64, ExposureError> {
        self.store.int(tag).ok_or(ExposureError::TagNotFound(tag))
    }

    fn float_tag(&self, tag: Tag) -> Result<f64, ExposureError> {
        self.store.float(tag).ok_or(ExposureError::TagNotFound(tag))
    }

    fn text_tag(&self, tag: Tag) -> Result<String, ExposureError> {
        self.store.text(tag).ok_or(ExposureError::TagNotFound(tag))
    }

    /// Camera manufacturer. Mandatory tag, no fallback.
    pub fn make(&self) -> Result<String, ExposureError> {
        self.text_tag(Tag::Make)
    }

    /// Camera model. Mandatory tag, no fallback.
    pub fn model(&self) -> Result<String, ExposureError> {
        self.text_tag(Tag::Model)
    }

    /// Arithmetic f-number, from FNumber or from the APEX aperture value.
    pub fn f_number(&self) -> Result<f64, ExposureError> {
        self.float_tag(Tag::FNumber).or_else(|_| {
            self.float_tag(Tag::ApertureValue)
                .map(calculations::f_number_from_aperture_value)
        })
    }

    /// Exposure time in seconds, from ExposureTime or from the APEX
    /// shutter-speed value.
    pub fn exposure_time(&self) -> Result<f64, ExposureError> {
        self.float_tag(Tag::ExposureTime).or_else(|_| {
            self.float_tag(Tag::ShutterSpeedValue)
                .map(calculations::exposure_time_from_shutter_speed)
        })
    }

    /// Arithmetic film speed, from the ISO speed rating or the exposure
    /// index. Cameras that record neither would need MakerNote digging,
    /// which this resolver does not do.
    pub fn iso(&self) -> Result<f64, ExposureError> {
        self.float_tag(Tag::PhotographicSensitivity)
            .or_else(|_| self.float_tag(Tag::ExposureIndex))
    }

    /// APEX aperture value (Av), stored or derived from the f-number.
    pub fn aperture_value(&self) -> Result<f64, ExposureError> {
        self.float_tag(Tag::ApertureValue).or_else(|_| {
            self.float_tag(Tag::FNumber)
                .map(calculations::aperture_value_from_f_number)
        })
    }

    /// APEX time value (Tv), stored or derived from the exposure time.
    pub fn time_value(&self) -> Result<f64, ExposureError> {
        self.float_tag(Tag::ShutterSpeedValue).or_else(|_| {
            self.float_tag(Tag::ExposureTime)
                .map(calculations::time_value_from_exposure_time)
        })
    }

    /// APEX exposure value, `Ev = Tv + Av`. Fails if either component is
    /// unresolvable through its fallback chain.
    pub fn exposure_value(&self) -> Result<f64, ExposureError> {
        Ok(self.time_value()? + self.aperture_value()?)
    }

    /// APEX film speed value, `Sv = log2(ISO · N)`.
    pub fn film_speed_value(&self) -> Result<f64, ExposureError> {
        Ok(calculations::film_speed_value(self.iso()?))
    }

    /// APEX luminance value (Bv): the stored brightness value, or
    /// `Av + Tv − Sv` reconstructed from the sibling queries.
    pub fn luminance_value(&self) -> Result<f64, ExposureError> {
        if let Ok(brightness) = self.float_tag(Tag::BrightnessValue) {
            return Ok(brightness);
        }
        match (
            self.aperture_value(),
            self.time_value(),
            self.film_speed_value(),
        ) {
            (Ok(av), Ok(tv), Ok(sv)) => Ok(av + tv - sv),
            _ => Err(ExposureError::InsufficientData("brightness value")),
        }
    }

    /// Average scene luminance in cd/m², `B = (N² · K) / (T · S)`.
    ///
    /// There is no tag for this; it is always computed from f-number,
    /// exposure time, and ISO (each resolved through its own chain).
    pub fn average_luminance(&self) -> Result<f64, ExposureError> {
        match (self.f_number(), self.exposure_time(), self.iso()) {
            (Ok(f_number), Ok(time), Ok(iso)) => {
                Ok(calculations::average_scene_luminance(f_number, time, iso))
            }
            _ => Err(ExposureError::InsufficientData("average scene luminance")),
        }
    }

    /// Focal length in millimeters as if the sensor were a 36×24 mm frame.
    ///
    /// Prefers the dedicated FocalLengthIn35mmFilm tag (where a stored 0
    /// means "unknown" and is treated as absent). Otherwise the physical
    /// sensor size is backed out of the pixel dimensions and focal-plane
    /// resolutions, and the actual focal length is rescaled by the diagonal
    /// ratio.
    pub fn focal_length_35mm(&self) -> Result<f64, ExposureError> {
        if let Ok(stored) = self.float_tag(Tag::FocalLengthIn35mmFilm) {
            if stored > 0.0 {
                return Ok(stored);
            }
        }

        let focal_length = self.float_tag(Tag::FocalLength)?;
        let pixel_x = self.float_tag(Tag::PixelXDimension)?;
        let pixel_y = self.float_tag(Tag::PixelYDimension)?;
        let resolution_x = self.float_tag(Tag::FocalPlaneXResolution)?;
        if resolution_x <= 0.0 {
            return Err(ExposureError::InvalidValue("FocalPlaneXResolution"));
        }
        let resolution_y = self.float_tag(Tag::FocalPlaneYResolution)?;
        if resolution_y <= 0.0 {
            return Err(ExposureError::InvalidValue("FocalPlaneYResolution"));
        }
        // Absent unit defaults to inch; a present but unrecognized code is
        // an error, not a default.
        let unit = match self.int_tag(Tag::FocalPlaneResolutionUnit) {
            Ok(code) => ResolutionUnit::from_code(code)
                .ok_or(ExposureError::InvalidValue("FocalPlaneResolutionUnit"))?,
            Err(_) => ResolutionUnit::Inch,
        };

        let diagonal = calculations::sensor_diagonal_mm(
            unit,
            (pixel_x, pixel_y),
            (resolution_x, resolution_y),
        );
        if diagonal == 0.0 {
            return Err(ExposureError::InvalidValue("sensor diagonal"));
        }
        Ok(calculations::focal_length_35mm_equiv(focal_length, diagonal))
    }

    /// Absolute byte offset of the embedded thumbnail within the source
    /// file: the stored thumbnail-offset tag plus the store's base offset.
    pub fn thumbnail_location(&self) -> Result<u64, ExposureError> {
        let offset = self.int_tag(Tag::JPEGInterchangeFormat)?;
        Ok(offset as u64 + self.store.base_offset())
    }
}
