//! Pure photometric and sensor-geometry formulas.
//!
//! All functions here are pure and testable without any I/O or tag store.
//! APEX quantities are log-base-2 encodings, so the conversions below are
//! exact inverses of each other; the resolver relies on these sign and
//! scale conventions when it combines quantities additively.

/// Scaling constant relating ASA arithmetic film speed to the ASA speed
/// value, `N = 1/3.125`, as defined by the EXIF 2.2 specification.
pub const SPEED_SCALE_N: f64 = 1.0 / 3.125;

/// Reflected-light meter calibration constant `K`.
pub const METER_CALIBRATION_K: f64 = 12.5;

/// Reference 35mm film frame, in millimeters.
const FRAME_35MM_WIDTH_MM: f64 = 36.0;
const FRAME_35MM_HEIGHT_MM: f64 = 24.0;

/// Physical unit of the focal-plane resolution tags.
///
/// EXIF encodes this as an integer code: 2 for inch, 3 for centimeter.
/// Every other code is rejected rather than defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionUnit {
    Inch,
    Centimeter,
}

impl ResolutionUnit {
    /// Decode the EXIF unit code. Returns `None` for unrecognized codes.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            2 => Some(ResolutionUnit::Inch),
            3 => Some(ResolutionUnit::Centimeter),
            _ => None,
        }
    }

    /// Length of one resolution unit in millimeters.
    pub fn millimeters(self) -> f64 {
        match self {
            ResolutionUnit::Inch => 25.4,
            ResolutionUnit::Centimeter => 10.0,
        }
    }
}

/// Convert an APEX aperture value (Av) to an arithmetic f-number.
///
/// `N = 2^(Av/2)` — the inverse of [`aperture_value_from_f_number`].
///
/// # Examples
/// ```
/// # use lightmeter::calculations::f_number_from_aperture_value;
/// // Av = 4 → f/4
/// assert!((f_number_from_aperture_value(4.0) - 4.0).abs() < 1e-9);
/// ```
pub fn f_number_from_aperture_value(aperture_value: f64) -> f64 {
    (aperture_value * 0.5).exp2()
}

/// Convert an arithmetic f-number to an APEX aperture value, `Av = 2·log2(N)`.
pub fn aperture_value_from_f_number(f_number: f64) -> f64 {
    2.0 * f_number.log2()
}

/// Convert an APEX shutter-speed value (Tv) to an exposure time in seconds,
/// `T = 2^(-Tv)`.
pub fn exposure_time_from_shutter_speed(shutter_speed_value: f64) -> f64 {
    (-shutter_speed_value).exp2()
}

/// Convert an exposure time in seconds to an APEX time value, `Tv = log2(1/T)`.
pub fn time_value_from_exposure_time(exposure_time: f64) -> f64 {
    exposure_time.recip().log2()
}

/// APEX film speed value, `Sv = log2(ISO · N)` with `N` = [`SPEED_SCALE_N`].
///
/// # Examples
/// ```
/// # use lightmeter::calculations::film_speed_value;
/// // ISO 100 → log2(32) = 5
/// assert!((film_speed_value(100.0) - 5.0).abs() < 1e-9);
/// ```
pub fn film_speed_value(iso: f64) -> f64 {
    (iso * SPEED_SCALE_N).log2()
}

/// Average scene luminance in cd/m², from the reflected-light meter
/// equation `B = (N² · K) / (T · S)`.
///
/// # Arguments
/// * `f_number` - Arithmetic aperture (N)
/// * `exposure_time` - Shutter duration in seconds (T)
/// * `iso` - Arithmetic film speed (S)
pub fn average_scene_luminance(f_number: f64, exposure_time: f64, iso: f64) -> f64 {
    (f_number * f_number * METER_CALIBRATION_K) / (exposure_time * iso)
}

/// Physical sensor diagonal in millimeters, backed out from pixel counts
/// and focal-plane resolutions.
///
/// Per-axis pixel pitch is `unit_mm / resolution`; the sensor edge is pitch
/// times pixel count; the diagonal is the hypotenuse of the two edges.
///
/// # Arguments
/// * `unit` - Physical unit of both resolution values
/// * `pixels` - Image dimensions in pixels (x, y)
/// * `resolution` - Focal-plane resolutions in pixels per unit (x, y)
pub fn sensor_diagonal_mm(unit: ResolutionUnit, pixels: (f64, f64), resolution: (f64, f64)) -> f64 {
    let unit_mm = unit.millimeters();
    let (pixel_x, pixel_y) = pixels;
    let (resolution_x, resolution_y) = resolution;
    let width_mm = (unit_mm / resolution_x) * pixel_x;
    let height_mm = (unit_mm / resolution_y) * pixel_y;
    width_mm.hypot(height_mm)
}

/// Rescale an actual focal length to its 35mm-film equivalent: what the
/// focal length would be if the sensor were the reference 36×24 mm frame.
pub fn focal_length_35mm_equiv(focal_length_mm: f64, sensor_diagonal_mm: f64) -> f64 {
    focal_length_mm * FRAME_35MM_WIDTH_MM.hypot(FRAME_35MM_HEIGHT_MM) / sensor_diagonal_mm
}
