//! Backend capability record.
//!
//! `build.rs` selects exactly one backend per build and publishes it as a `cfg`
//! flag (`avx512`, `avx2`, `sse`, `neon` or `fallback`), plus an independent `fma`
//! flag. A backend is only selected when the crate is compiled with the target
//! features its intrinsics need (the workspace builds with `-C target-cpu=native`),
//! so every native lane operation inlines into its caller. This module turns those flags into a value the rest of the crate (and its
//! users) can inspect, so the choice made by the width-resolution table is visible
//! and testable instead of hidden behind preprocessor switches.

use std::fmt;

use crate::element::ElementType;

/// Instruction-set family backing the native registers of this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Isa {
    /// No SIMD registers: every vector is a scalar-lane array.
    Fallback,
    /// SSE4.1, 128-bit float registers.
    Sse,
    /// AVX2, 128 and 256-bit float registers plus 32-bit integer registers.
    Avx2,
    /// AVX-512F on top of AVX2, adds 512-bit float registers.
    Avx512,
    /// AArch64 Advanced SIMD, 128-bit float registers.
    Neon,
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Isa::Fallback => "fallback",
            Isa::Sse => "sse4.1",
            Isa::Avx2 => "avx2",
            Isa::Avx512 => "avx512f",
            Isa::Neon => "neon",
        };
        f.write_str(name)
    }
}

/// Capabilities of the backend compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Active instruction-set family.
    pub isa: Isa,
    /// Whether `mul_add` and friends use a fused multiply-add.
    pub fused_multiply_add: bool,
}

impl Capabilities {
    /// Capabilities selected by the build script for this build.
    pub const fn active() -> Self {
        Capabilities {
            isa: ACTIVE_ISA,
            fused_multiply_add: cfg!(fma),
        }
    }

    /// Bit widths of the hardware registers available for `element`.
    ///
    /// An empty slice means the element type has no native register on this
    /// backend and resolves to scalar-lane registers at every width.
    pub const fn native_widths(&self, element: ElementType) -> &'static [usize] {
        match (self.isa, element) {
            (Isa::Fallback, _) => &[],
            (Isa::Sse | Isa::Neon, ElementType::F32 | ElementType::F64) => &[128],
            (Isa::Sse | Isa::Neon, _) => &[],
            (Isa::Avx2, ElementType::F32 | ElementType::F64) => &[128, 256],
            (Isa::Avx512, ElementType::F32 | ElementType::F64) => &[128, 256, 512],
            (Isa::Avx2 | Isa::Avx512, ElementType::I32 | ElementType::U32) => &[128, 256],
            (Isa::Avx2 | Isa::Avx512, _) => &[],
        }
    }

    /// Whether `lanes` elements of `element` fit exactly one native register.
    pub fn is_native(&self, element: ElementType, lanes: usize) -> bool {
        let bits = element.bits() * lanes;
        self.native_widths(element).contains(&bits)
    }

    /// Checks that the running CPU supports the compiled backend.
    ///
    /// The backend follows the target features the crate was compiled with;
    /// binaries moved to another machine may land on a CPU without them. Returns `false` (and logs a
    /// warning) when a required feature is missing.
    pub fn check_runtime(&self) -> bool {
        let missing = self.missing_runtime_features();

        if missing.is_empty() {
            log::debug!(
                "lanefold backend {} (fma: {}) supported by this CPU",
                self.isa,
                self.fused_multiply_add
            );
            true
        } else {
            log::warn!(
                "lanefold backend {} requires CPU features not present at runtime: {}",
                self.isa,
                missing.join(", ")
            );
            false
        }
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    fn missing_runtime_features(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        let required: &[&'static str] = match self.isa {
            Isa::Sse => &["sse4.1"],
            Isa::Avx2 => &["sse4.1", "avx", "avx2"],
            Isa::Avx512 => &["sse4.1", "avx", "avx2", "avx512f"],
            Isa::Fallback | Isa::Neon => &[],
        };

        for &feature in required {
            let present = match feature {
                "sse4.1" => std::is_x86_feature_detected!("sse4.1"),
                "avx" => std::is_x86_feature_detected!("avx"),
                "avx2" => std::is_x86_feature_detected!("avx2"),
                "avx512f" => std::is_x86_feature_detected!("avx512f"),
                _ => true,
            };
            if !present {
                missing.push(feature);
            }
        }

        if self.fused_multiply_add
            && self.isa != Isa::Fallback
            && !std::is_x86_feature_detected!("fma")
        {
            missing.push("fma");
        }

        missing
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    fn missing_runtime_features(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::active()
    }
}

#[cfg(avx512)]
const ACTIVE_ISA: Isa = Isa::Avx512;

#[cfg(avx2)]
const ACTIVE_ISA: Isa = Isa::Avx2;

#[cfg(sse)]
const ACTIVE_ISA: Isa = Isa::Sse;

#[cfg(neon)]
const ACTIVE_ISA: Isa = Isa::Neon;

#[cfg(fallback)]
const ACTIVE_ISA: Isa = Isa::Fallback;
