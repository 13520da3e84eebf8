//! Shape and coefficient arguments supplied by the CLI layer.

use serde::{Deserialize, Serialize};

use crate::compare::CheckMode;
use crate::layout::FillMode;
use crate::real::Real;

/// Which device entry-point family a driver resolves at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Native,
    Fortran,
}

/// Immutable configuration record for one harness invocation.
///
/// The harness only reads it; producing it (flag parsing, JSON files) is
/// the runner's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationArguments {
    pub rows: i32,
    pub cols: i32,
    pub m: i32,
    pub n: i32,
    pub lda: i32,
    pub ldb: i32,
    pub ldc: i32,
    pub incx: i32,
    pub incy: i32,
    pub stride_scale: f64,
    pub batch_count: i32,
    /// Fill-mode selector character, `'U'` or `'L'`.
    pub uplo: char,
    pub alpha: f64,
    pub beta: f64,
    pub unit_check: bool,
    pub norm_check: bool,
    pub timing: bool,
    pub fortran_binding: bool,
}

impl Default for OperationArguments {
    fn default() -> Self {
        Self {
            rows: 32,
            cols: 32,
            m: 32,
            n: 32,
            lda: 32,
            ldb: 32,
            ldc: 32,
            incx: 1,
            incy: 1,
            stride_scale: 1.0,
            batch_count: 1,
            uplo: 'U',
            alpha: 1.0,
            beta: 1.0,
            unit_check: true,
            norm_check: false,
            timing: false,
            fortran_binding: false,
        }
    }
}

impl OperationArguments {
    pub fn get_alpha<T: Real>(&self) -> T {
        T::from_f64(self.alpha)
    }

    pub fn get_beta<T: Real>(&self) -> T {
        T::from_f64(self.beta)
    }

    /// Parses the fill-mode selector character; anything that is not a
    /// lower-triangle selector means upper.
    pub fn fill_mode(&self) -> FillMode {
        match self.uplo {
            'L' | 'l' => FillMode::Lower,
            _ => FillMode::Upper,
        }
    }

    pub fn binding(&self) -> Binding {
        if self.fortran_binding {
            Binding::Fortran
        } else {
            Binding::Native
        }
    }

    /// Selects the comparison mode for this invocation. The modes are
    /// mutually exclusive; when both flags are set the unit check wins,
    /// since it must precede any norm check.
    pub fn check_mode(&self) -> Option<CheckMode> {
        if self.unit_check {
            Some(CheckMode::Unit)
        } else if self.norm_check {
            Some(CheckMode::Norm)
        } else {
            None
        }
    }
}
