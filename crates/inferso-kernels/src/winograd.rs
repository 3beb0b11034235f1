//! Winograd F(2,3) transforms for 3x3 convolution at stride 1
//!
//! The fast convolution path evaluates `Y = A^T ((G g G^T) (.) (B^T d B)) A`
//! per tile, where `g` is a 3x3 kernel plane, `d` a 4x4 input tile, `(.)`
//! the element-wise product, and the fixed matrices are
//!
//! ```text
//! G   = [[1, 0, 0], [1/2, 1/2, 1/2], [1/2, -1/2, 1/2], [0, 0, 1]]
//! B^T = [[1, 0, -1, 0], [0, 1, 1, 0], [0, -1, 1, 0], [0, 1, 0, -1]]
//! A^T = [[1, 1, 1, 0], [0, 1, -1, -1]]
//! ```
//!
//! Each 4x4 input tile produces a 2x2 output tile; tile origins advance by
//! 2 so adjacent input tiles overlap by two cells. The kernel transform
//! depends only on the kernel and is computed once per
//! (output-channel, input-channel) pair, then reused for every tile.
//!
//! All transforms are unrolled over stack arrays; there is no heap
//! traffic per tile.

use ndarray::ArrayView2;

/// Transform a 3x3 kernel plane into the 4x4 Winograd domain: `U = G g G^T`.
///
/// # Arguments
///
/// * `g` - One kernel plane, indexed `g[row][col]`
///
/// # Returns
///
/// The transformed kernel `U`, reusable across all tiles of a plane
///
/// # Examples
///
/// ```
/// use inferso_kernels::transform_kernel;
///
/// let u = transform_kernel(&[[1.0; 3]; 3]);
/// // Center element of G * ones * G^T is 9/4
/// assert_eq!(u[1][1], 2.25);
/// ```
pub fn transform_kernel(g: &[[f32; 3]; 3]) -> [[f32; 4]; 4] {
    // Columns: t = G * g
    let mut t = [[0.0f32; 3]; 4];
    for c in 0..3 {
        let (g0, g1, g2) = (g[0][c], g[1][c], g[2][c]);
        t[0][c] = g0;
        t[1][c] = 0.5 * (g0 + g1 + g2);
        t[2][c] = 0.5 * (g0 - g1 + g2);
        t[3][c] = g2;
    }

    // Rows: U = t * G^T
    let mut u = [[0.0f32; 4]; 4];
    for (t_row, u_row) in t.iter().zip(u.iter_mut()) {
        let (t0, t1, t2) = (t_row[0], t_row[1], t_row[2]);
        u_row[0] = t0;
        u_row[1] = 0.5 * (t0 + t1 + t2);
        u_row[2] = 0.5 * (t0 - t1 + t2);
        u_row[3] = t2;
    }
    u
}

/// Transform a 3x3 kernel plane given as an array view.
///
/// Convenience wrapper over [`transform_kernel`] for kernel tensors stored
/// in channel-major planes.
///
/// # Panics
///
/// Panics if the view is not 3x3.
pub fn transform_kernel_plane(g: &ArrayView2<'_, f32>) -> [[f32; 4]; 4] {
    assert_eq!(
        g.dim(),
        (3, 3),
        "Winograd F(2,3) requires a 3x3 kernel plane, got {:?}",
        g.dim()
    );
    let mut plane = [[0.0f32; 3]; 3];
    for (r, row) in plane.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = g[[r, c]];
        }
    }
    transform_kernel(&plane)
}

/// Transform a 4x4 input tile into the Winograd domain: `V = B^T d B`.
///
/// # Arguments
///
/// * `d` - One input tile, indexed `d[row][col]`
pub fn transform_input(d: &[[f32; 4]; 4]) -> [[f32; 4]; 4] {
    // Columns: t = B^T * d
    let mut t = [[0.0f32; 4]; 4];
    for c in 0..4 {
        let (d0, d1, d2, d3) = (d[0][c], d[1][c], d[2][c], d[3][c]);
        t[0][c] = d0 - d2;
        t[1][c] = d1 + d2;
        t[2][c] = d2 - d1;
        t[3][c] = d1 - d3;
    }

    // Rows: V = t * B
    let mut v = [[0.0f32; 4]; 4];
    for (t_row, v_row) in t.iter().zip(v.iter_mut()) {
        let (t0, t1, t2, t3) = (t_row[0], t_row[1], t_row[2], t_row[3]);
        v_row[0] = t0 - t2;
        v_row[1] = t1 + t2;
        v_row[2] = t2 - t1;
        v_row[3] = t1 - t3;
    }
    v
}

/// Collapse a 4x4 element-wise product back to the 2x2 output tile:
/// `Y = A^T m A`.
pub fn transform_output(m: &[[f32; 4]; 4]) -> [[f32; 2]; 2] {
    // Columns: t = A^T * m
    let mut t = [[0.0f32; 4]; 2];
    for c in 0..4 {
        let (m0, m1, m2, m3) = (m[0][c], m[1][c], m[2][c], m[3][c]);
        t[0][c] = m0 + m1 + m2;
        t[1][c] = m1 - m2 - m3;
    }

    // Rows: Y = t * A
    let mut y = [[0.0f32; 2]; 2];
    for (t_row, y_row) in t.iter().zip(y.iter_mut()) {
        let (t0, t1, t2, t3) = (t_row[0], t_row[1], t_row[2], t_row[3]);
        y_row[0] = t0 + t1 + t2;
        y_row[1] = t1 - t2 - t3;
    }
    y
}

/// Evaluate one Winograd tile: input transform, element-wise product with
/// the pre-transformed kernel, output transform.
///
/// # Arguments
///
/// * `u` - Transformed kernel from [`transform_kernel`]
/// * `d` - The 4x4 input tile
///
/// # Returns
///
/// The 2x2 output tile for this position
///
/// # Examples
///
/// ```
/// use inferso_kernels::{transform_kernel, winograd_f23};
///
/// let u = transform_kernel(&[[1.0; 3]; 3]);
/// let out = winograd_f23(&u, &[[1.0; 4]; 4]);
/// assert_eq!(out, [[9.0, 9.0], [9.0, 9.0]]);
/// ```
pub fn winograd_f23(u: &[[f32; 4]; 4], d: &[[f32; 4]; 4]) -> [[f32; 2]; 2] {
    let v = transform_input(d);
    let mut m = [[0.0f32; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            m[i][j] = u[i][j] * v[i][j];
        }
    }
    transform_output(&m)
}
