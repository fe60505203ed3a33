/// Depth (cm) above which a pixel counts as damaged.
pub const DEFAULT_DAMAGE_EPSILON_CM: f32 = 0.5;

/// Divisor of the elliptical distance in the mask falloff `exp(-d / MASK_FALLOFF)`.
pub const MASK_FALLOFF: f32 = 1.5;
/// Normalised elliptical distance beyond which a feature leaves no footprint.
pub const MASK_CUTOFF: f32 = 3.0;
pub const MASK_NOISE_MEAN: f32 = 1.0;
pub const MASK_NOISE_STD_DEV: f32 = 0.2;

/// Bounding box half-extent of a feature, in radii.
pub const FOOTPRINT_RADII: f32 = 2.0;

/// Column radius is the row radius scaled by a factor in `[min, max)`.
pub const ASPECT_JITTER_MIN: f32 = 0.8;
pub const ASPECT_JITTER_MAX: f32 = 1.2;

/// Rough degrees of latitude per meter.
pub const DEGREES_PER_METER: f64 = 0.000009;
