//! Kernel backends and runtime CPU dispatch.
//!
//! The scalar backend is the auto-vectorized loop in `core::kernel`. The x86_64
//! backends use AVX2 / AVX-512F intrinsics and are only entered after runtime
//! feature detection.

use once_cell::sync::Lazy;

use crate::core::{kernel::filter_rows_scalar, params::FilterParams};

#[cfg(target_arch = "x86_64")]
pub mod filter_x86;

#[cfg(target_arch = "x86_64")]
#[inline]
pub fn has_avx2() -> bool {
    std::is_x86_feature_detected!("avx2")
}

#[cfg(not(target_arch = "x86_64"))]
#[inline]
pub fn has_avx2() -> bool {
    false
}

#[cfg(target_arch = "x86_64")]
#[inline]
pub fn has_avx512f() -> bool {
    std::is_x86_feature_detected!("avx512f")
}

#[cfg(not(target_arch = "x86_64"))]
#[inline]
pub fn has_avx512f() -> bool {
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Portable branchless loop, left to the compiler to vectorize.
    Scalar,
    /// 32 rows per iteration on 256-bit lanes.
    Avx2,
    /// 16 rows per iteration with mask registers.
    Avx512,
}

static DETECTED: Lazy<Backend> = Lazy::new(|| {
    if has_avx512f() {
        Backend::Avx512
    } else if has_avx2() {
        Backend::Avx2
    } else {
        Backend::Scalar
    }
});

impl Backend {
    /// Best backend the running CPU supports. Detected once per process,
    /// without logging, so it is safe on the C entry path.
    pub fn detect() -> Backend {
        *DETECTED
    }

    pub fn is_available(self) -> bool {
        match self {
            Backend::Scalar => true,
            Backend::Avx2 => has_avx2(),
            Backend::Avx512 => has_avx512f(),
        }
    }

    /// Every backend usable on this CPU, scalar first.
    pub fn available() -> Vec<Backend> {
        [Backend::Scalar, Backend::Avx2, Backend::Avx512]
            .into_iter()
            .filter(|b| b.is_available())
            .collect()
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            Backend::Avx2 => "avx2",
            Backend::Avx512 => "avx512",
        }
    }
}

/// Runs `backend` over equal-length slices, falling back to the scalar loop
/// when the CPU lacks the requested instructions.
#[inline]
pub(crate) fn run_backend(
    backend: Backend,
    ship_date: &[i32],
    discount: &[i32],
    quantity: &[i32],
    params: &FilterParams,
    result: &mut [u8],
) {
    debug_assert!(ship_date.len() == result.len());
    debug_assert!(discount.len() == result.len());
    debug_assert!(quantity.len() == result.len());

    match backend {
        #[cfg(target_arch = "x86_64")]
        Backend::Avx512 if has_avx512f() => {
            // Safety: guarded by runtime feature detection.
            unsafe { filter_x86::filter_avx512(ship_date, discount, quantity, params, result) }
        }
        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 if has_avx2() => unsafe {
            filter_x86::filter_avx2(ship_date, discount, quantity, params, result)
        },
        _ => filter_rows_scalar(ship_date, discount, quantity, params, result),
    }
}
