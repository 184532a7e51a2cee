//! Matrices
//!
//! [`Matrix`] is the element-level contract shared by every matrix type: get/set by
//! `(row, col)`, shape queries and a column-major view for GPU upload.
//!
//! # Index wrapping
//!
//! Indices outside `0..rows` / `0..cols` are not rejected; they wrap around:
//! `get(4, 4)` on a 4×4 matrix reads `(0, 0)` and `get(-1, 0)` reads `(3, 0)`.
//! See [`wrap_index`].
//!
//! # Storage
//!
//! [`StandardMatrix`] stores its elements column by column, so
//! [`col_major_data`](Matrix::col_major_data) is a plain view of the storage and can
//! be handed to a shader uniform as-is.

use std::ops::Mul;

use glam::Mat4;

use crate::errors::{Result, SurrealError};
use crate::math::DEG_TO_RAD;
use crate::math::vector::Vector3f;

/// Element access shared by every matrix representation.
pub trait Matrix {
    /// Element at `(row, col)`. Out-of-range indices wrap.
    fn get(&self, row: isize, col: isize) -> f32;

    /// Writes the element at `(row, col)`. Out-of-range indices wrap.
    fn set(&mut self, row: isize, col: isize, value: f32);

    fn num_rows(&self) -> usize;

    fn num_cols(&self) -> usize;

    /// All elements in column-major order.
    fn col_major_data(&self) -> &[f32];
}

/// Maps any index onto `0..count` by modular wrap-around.
///
/// `count` must be non-zero.
#[inline]
#[must_use]
pub fn wrap_index(raw: isize, count: usize) -> usize {
    let count = count as isize;
    ((count + raw % count) % count) as usize
}

/// Multiplies two matrices of runtime shape into `out` (`out = lhs · rhs`).
///
/// # Panics
///
/// Panics when `lhs.num_cols() != rhs.num_rows()` or when `out` is not
/// `lhs.num_rows() × rhs.num_cols()`. Mismatched shapes are a programming error.
pub fn multiply_into(lhs: &dyn Matrix, rhs: &dyn Matrix, out: &mut dyn Matrix) {
    assert!(
        lhs.num_cols() == rhs.num_rows(),
        "Invalid operation: matrix dimensions are incompatible for inner product ({}x{} · {}x{})",
        lhs.num_rows(),
        lhs.num_cols(),
        rhs.num_rows(),
        rhs.num_cols(),
    );
    assert!(
        out.num_rows() == lhs.num_rows() && out.num_cols() == rhs.num_cols(),
        "Invalid operation: output matrix is {}x{}, product is {}x{}",
        out.num_rows(),
        out.num_cols(),
        lhs.num_rows(),
        rhs.num_cols(),
    );

    for row in 0..lhs.num_rows() as isize {
        for col in 0..rhs.num_cols() as isize {
            let mut sum = 0.0;
            for k in 0..lhs.num_cols() as isize {
                sum += lhs.get(row, k) * rhs.get(k, col);
            }
            out.set(row, col, sum);
        }
    }
}

/// Dense, column-major matrix with a compile-time shape.
///
/// Multiplication is only defined between compatible shapes
/// (`ROWS×COLS · COLS×K`), so an incompatible product does not compile.
/// Both dimensions must be non-zero; an empty shape is rejected at compile time:
///
/// ```compile_fail
/// use surreal::math::StandardMatrix;
///
/// let empty = StandardMatrix::<0, 4>::zeros();
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMatrix<const ROWS: usize, const COLS: usize> {
    cols: [[f32; ROWS]; COLS],
}

/// Homogeneous 4×4 transform matrix.
pub type Matrix4 = StandardMatrix<4, 4>;

impl<const ROWS: usize, const COLS: usize> StandardMatrix<ROWS, COLS> {
    const NON_EMPTY: () = assert!(ROWS > 0 && COLS > 0, "matrix dimensions must be non-zero");

    /// All elements zero.
    #[must_use]
    pub const fn zeros() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            cols: [[0.0; ROWS]; COLS],
        }
    }

    /// Ones on the leading diagonal, zeros elsewhere. Works for any shape.
    #[must_use]
    pub fn identity() -> Self {
        let mut m = Self::zeros();
        for i in 0..ROWS.min(COLS) {
            m.cols[i][i] = 1.0;
        }
        m
    }

    /// Builds a matrix from its columns.
    #[must_use]
    pub const fn from_cols(cols: [[f32; ROWS]; COLS]) -> Self {
        let () = Self::NON_EMPTY;
        Self { cols }
    }

    /// Builds a matrix from column-major data. Values past `ROWS * COLS` are ignored.
    pub fn from_col_major(data: &[f32]) -> Result<Self> {
        let expected = ROWS * COLS;
        if data.len() < expected {
            return Err(SurrealError::MatrixDataLength {
                expected,
                actual: data.len(),
            });
        }

        let mut m = Self::zeros();
        m.cols
            .as_flattened_mut()
            .copy_from_slice(&data[..expected]);
        Ok(m)
    }

    /// Column `col` without wrapping.
    #[inline]
    #[must_use]
    pub fn column(&self, col: usize) -> &[f32; ROWS] {
        &self.cols[col]
    }

    /// Naive `self · other`.
    #[must_use]
    #[allow(clippy::needless_range_loop)]
    pub fn mul_m<const K: usize>(&self, other: &StandardMatrix<COLS, K>) -> StandardMatrix<ROWS, K> {
        let mut out = StandardMatrix::<ROWS, K>::zeros();
        for row in 0..ROWS {
            for col in 0..K {
                let mut sum = 0.0;
                for k in 0..COLS {
                    sum += self.cols[k][row] * other.cols[col][k];
                }
                out.cols[col][row] = sum;
            }
        }
        out
    }

    #[must_use]
    #[allow(clippy::needless_range_loop)]
    pub fn transpose(&self) -> StandardMatrix<COLS, ROWS> {
        let mut out = StandardMatrix::<COLS, ROWS>::zeros();
        for col in 0..COLS {
            for row in 0..ROWS {
                out.cols[row][col] = self.cols[col][row];
            }
        }
        out
    }

    /// Element-wise comparison within `epsilon`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.col_major_data()
            .iter()
            .zip(other.col_major_data())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Raw bytes of the column-major data, for buffer uploads.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.col_major_data())
    }

    #[inline]
    fn put(&mut self, row: usize, col: usize, value: f32) {
        self.cols[col][row] = value;
    }
}

impl<const ROWS: usize, const COLS: usize> Matrix for StandardMatrix<ROWS, COLS> {
    #[inline]
    fn get(&self, row: isize, col: isize) -> f32 {
        self.cols[wrap_index(col, COLS)][wrap_index(row, ROWS)]
    }

    #[inline]
    fn set(&mut self, row: isize, col: isize, value: f32) {
        self.cols[wrap_index(col, COLS)][wrap_index(row, ROWS)] = value;
    }

    #[inline]
    fn num_rows(&self) -> usize {
        ROWS
    }

    #[inline]
    fn num_cols(&self) -> usize {
        COLS
    }

    #[inline]
    fn col_major_data(&self) -> &[f32] {
        self.cols.as_flattened()
    }
}

impl<const ROWS: usize, const COLS: usize, const K: usize> Mul<StandardMatrix<COLS, K>>
    for StandardMatrix<ROWS, COLS>
{
    type Output = StandardMatrix<ROWS, K>;

    fn mul(self, rhs: StandardMatrix<COLS, K>) -> Self::Output {
        self.mul_m(&rhs)
    }
}

impl<const ROWS: usize, const COLS: usize, const K: usize> Mul<&StandardMatrix<COLS, K>>
    for &StandardMatrix<ROWS, COLS>
{
    type Output = StandardMatrix<ROWS, K>;

    fn mul(self, rhs: &StandardMatrix<COLS, K>) -> Self::Output {
        self.mul_m(rhs)
    }
}

// ============================================================================
// Homogeneous transforms
// ============================================================================

impl StandardMatrix<4, 4> {
    /// Translation by `offset`.
    #[must_use]
    pub fn translation(offset: Vector3f) -> Self {
        let mut m = Self::identity();
        m.cols[3] = [offset.x, offset.y, offset.z, 1.0];
        m
    }

    /// Axis-aligned scale.
    #[must_use]
    pub fn scale(factors: Vector3f) -> Self {
        let mut m = Self::identity();
        m.put(0, 0, factors.x);
        m.put(1, 1, factors.y);
        m.put(2, 2, factors.z);
        m
    }

    /// Rotation block built from Euler angles in degrees.
    ///
    /// Trigonometry runs in `f64`; the stored elements are `f32`.
    #[must_use]
    pub fn euler_rotation(degrees: Vector3f) -> Self {
        let radians = |d: f32| f64::from(d * DEG_TO_RAD);
        let (sx, cx) = radians(degrees.x).sin_cos();
        let (sy, cy) = radians(degrees.y).sin_cos();
        let (sz, cz) = radians(degrees.z).sin_cos();

        let mut m = Self::zeros();
        m.put(0, 0, (cy * cz) as f32);
        m.put(1, 0, (-cy * sz) as f32);
        m.put(2, 0, sy as f32);
        m.put(0, 1, (sx * sy * cz + cx * sz) as f32);
        m.put(1, 1, (-sx * sy * sz + cx * cz) as f32);
        m.put(2, 1, (-sx * cy) as f32);
        m.put(0, 2, (-cx * sy * cz + sx * sz) as f32);
        m.put(1, 2, (cx * sy * sz + sx * cz) as f32);
        m.put(2, 2, (cx * cy) as f32);
        m.put(3, 3, 1.0);
        m
    }

    /// The translation column `(m03, m13, m23)`.
    #[inline]
    #[must_use]
    pub fn translation_part(&self) -> Vector3f {
        let [x, y, z, _] = self.cols[3];
        Vector3f::new(x, y, z)
    }

    /// Flat column-major copy, the layout shader uniforms expect.
    #[must_use]
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.col_major_data());
        out
    }
}

impl From<Matrix4> for Mat4 {
    fn from(m: Matrix4) -> Self {
        Mat4::from_cols_array_2d(&m.cols)
    }
}

impl From<Mat4> for Matrix4 {
    fn from(m: Mat4) -> Self {
        Self::from_cols(m.to_cols_array_2d())
    }
}
