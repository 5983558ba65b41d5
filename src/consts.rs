// Runtime parameters
pub const NUM_THREADS: usize = 4;
pub const OUT_FILE: &'static str = "./out.ppm";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Minimum valid hit parameter, keeps surfaces from shadowing themselves
pub const HIT_EPSILON: f64 = 1e-5;

// Maximum recursion depth for a ray
pub const RECURSION_DEPTH: u32 = 3;

// How far a positional light's shadow ray reaches, in multiples of the
// surface-to-light displacement (t = 1 lands on the light itself)
pub const SHADOW_CUTOFF: f64 = 200.0;

// Default camera parameters
pub const DEFAULT_FOVY: f64 = 50.0;
pub const DEFAULT_NEAR: f64 = 1.0;
