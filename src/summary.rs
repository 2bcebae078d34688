//! Bulk resolution into a serializable capture-settings summary.
//!
//! Pipelines that consume every quantity at once (cataloguers, metadata
//! panels) should not have to thread thirteen `Result`s. [`ExposureSummary`]
//! resolves everything in one pass, mapping each failed query to `None` —
//! the per-query error detail is available by calling the resolver directly.

use serde::{Deserialize, Serialize};

use crate::resolver::ExposureResolver;
use crate::store::TagSource;

/// Every derivable quantity, resolved once. Absent fields mean the
/// corresponding query failed for that image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureSummary {
    pub make: Option<String>,
    pub model: Option<String>,
    /// Arithmetic f-number
    pub f_number: Option<f64>,
    /// Exposure time in seconds
    pub exposure_time: Option<f64>,
    /// Arithmetic ISO film speed
    pub iso: Option<f64>,
    /// APEX aperture value (Av)
    pub aperture_value: Option<f64>,
    /// APEX time value (Tv)
    pub time_value: Option<f64>,
    /// APEX exposure value (Ev = Tv + Av)
    pub exposure_value: Option<f64>,
    /// APEX film speed value (Sv)
    pub film_speed_value: Option<f64>,
    /// APEX luminance value (Bv)
    pub luminance_value: Option<f64>,
    /// Average scene luminance in cd/m²
    pub average_luminance: Option<f64>,
    /// 35mm-equivalent focal length in millimeters
    pub focal_length_35mm: Option<f64>,
}

impl<S: TagSource> ExposureResolver<S> {
    /// Resolve every quantity, swallowing per-query failures into `None`.
    pub fn summary(&self) -> ExposureSummary {
        ExposureSummary {
            make: self.make().ok(),
            model: self.model().ok(),
            f_number: self.f_number().ok(),
            exposure_time: self.exposure_time().ok(),
            iso: self.iso().ok(),
            aperture_value: self.aperture_value().ok(),
            time_value: self.time_value().ok(),
            exposure_value: self.exposure_value().ok(),
            film_speed_value: self.film_speed_value().ok(),
            luminance_value: self.luminance_value().ok(),
            average_luminance: self.average_luminance().ok(),
            focal_length_35mm: self.focal_length_35mm().ok(),
        }
    }
}

/// Photographic display form of an f-number: `f/2.8`.
pub fn format_f_number(f_number: f64) -> String {
    format!("f/{f_number:.1}")
}

/// Photographic display form of an exposure time: `1/250 s` below one
/// second, decimal seconds at or above it.
pub fn format_exposure_time(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{seconds:.1} s")
    } else {
        format!("1/{:.0} s", seconds.recip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::MockStore;
    use exif::Tag;

    #[test]
    fn summary_resolves_available_quantities() {
        let resolver = ExposureResolver::new(
            MockStore::new()
                .with_text(Tag::Make, "Canon")
                .with_float(Tag::FNumber, 4.0)
                .with_float(Tag::ExposureTime, 0.01)
                .with_float(Tag::PhotographicSensitivity, 100.0),
        );
        let summary = resolver.summary();

        assert_eq!(summary.make.as_deref(), Some("Canon"));
        assert_eq!(summary.f_number, Some(4.0));
        assert!((summary.average_luminance.unwrap() - 200.0).abs() < 1e-9);
        // Derived APEX values come through the fallback chains
        assert!((summary.aperture_value.unwrap() - 4.0).abs() < 1e-9);
        // No sensor geometry in the store
        assert_eq!(summary.focal_length_35mm, None);
        assert_eq!(summary.model, None);
    }

    #[test]
    fn summary_of_empty_store_is_all_absent() {
        let resolver = ExposureResolver::new(MockStore::new());
        assert_eq!(resolver.summary(), ExposureSummary::default());
    }

    #[test]
    fn summary_round_trips_through_json() {
        let resolver = ExposureResolver::new(
            MockStore::new()
                .with_text(Tag::Model, "EOS 5D")
                .with_float(Tag::ApertureValue, 4.0),
        );
        let summary = resolver.summary();

        let json = serde_json::to_string(&summary).unwrap();
        let deserialized: ExposureSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, deserialized);
    }

    #[test]
    fn f_number_display_form() {
        assert_eq!(format_f_number(2.8), "f/2.8");
        assert_eq!(format_f_number(4.0), "f/4.0");
        assert_eq!(format_f_number(11.0), "f/11.0");
    }

    #[test]
    fn exposure_time_display_form() {
        assert_eq!(format_exposure_time(0.004), "1/250 s");
        assert_eq!(format_exposure_time(0.5), "1/2 s");
        assert_eq!(format_exposure_time(1.0), "1.0 s");
        assert_eq!(format_exposure_time(2.5), "2.5 s");
    }
}
