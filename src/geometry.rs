//! Static mesh data for the extruded letter "F".
//!
//! The letter is 100 units wide, 150 tall and 30 deep, with its local origin
//! at the top-left front corner (y grows downwards). It is made of 16 face
//! groups of two triangles each; every group has one flat colour.
//!
//! Both tables are sized by [`VERTEX_COUNT`], so a position without a colour
//! (or the reverse) fails to compile.

/// Vertices per face group (two independent triangles).
pub const VERTICES_PER_FACE: usize = 6;

/// Number of face groups.
pub const FACE_COUNT: usize = 16;

/// Total vertices in the mesh, drawn as a plain triangle list.
pub const VERTEX_COUNT: usize = FACE_COUNT * VERTICES_PER_FACE;

/// A named face group and its colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub name: &'static str,
    pub color: [u8; 3],
}

const fn face(name: &'static str, color: [u8; 3]) -> Face {
    Face { name, color }
}

/// Face groups in the order their vertices appear in [`POSITIONS`].
pub const FACES: [Face; FACE_COUNT] = [
    face("left column front", [200, 70, 120]),
    face("top rung front", [200, 70, 120]),
    face("middle rung front", [200, 70, 120]),
    face("left column back", [80, 70, 200]),
    face("top rung back", [80, 70, 200]),
    face("middle rung back", [80, 70, 200]),
    face("top", [70, 200, 210]),
    face("top rung right", [200, 200, 70]),
    face("under top rung", [210, 100, 70]),
    face("between top rung and middle", [210, 160, 70]),
    face("top of middle rung", [70, 180, 210]),
    face("right of middle rung", [100, 70, 210]),
    face("bottom of middle rung", [76, 210, 100]),
    face("right of bottom", [140, 210, 80]),
    face("bottom", [90, 130, 110]),
    face("left side", [160, 160, 220]),
];

/// Model-space positions, three floats per vertex.
#[rustfmt::skip]
pub const POSITIONS: [[f32; 3]; VERTEX_COUNT] = [
    // left column front
    [  0.0,   0.0,   0.0],
    [  0.0, 150.0,   0.0],
    [ 30.0,   0.0,   0.0],
    [  0.0, 150.0,   0.0],
    [ 30.0, 150.0,   0.0],
    [ 30.0,   0.0,   0.0],

    // top rung front
    [ 30.0,   0.0,   0.0],
    [ 30.0,  30.0,   0.0],
    [100.0,   0.0,   0.0],
    [ 30.0,  30.0,   0.0],
    [100.0,  30.0,   0.0],
    [100.0,   0.0,   0.0],

    // middle rung front
    [ 30.0,  60.0,   0.0],
    [ 30.0,  90.0,   0.0],
    [ 67.0,  60.0,   0.0],
    [ 30.0,  90.0,   0.0],
    [ 67.0,  90.0,   0.0],
    [ 67.0,  60.0,   0.0],

    // left column back
    [  0.0,   0.0,  30.0],
    [ 30.0,   0.0,  30.0],
    [  0.0, 150.0,  30.0],
    [  0.0, 150.0,  30.0],
    [ 30.0,   0.0,  30.0],
    [ 30.0, 150.0,  30.0],

    // top rung back
    [ 30.0,   0.0,  30.0],
    [100.0,   0.0,  30.0],
    [ 30.0,  30.0,  30.0],
    [ 30.0,  30.0,  30.0],
    [100.0,   0.0,  30.0],
    [100.0,  30.0,  30.0],

    // middle rung back
    [ 30.0,  60.0,  30.0],
    [ 67.0,  60.0,  30.0],
    [ 30.0,  90.0,  30.0],
    [ 30.0,  90.0,  30.0],
    [ 67.0,  60.0,  30.0],
    [ 67.0,  90.0,  30.0],

    // top
    [  0.0,   0.0,   0.0],
    [100.0,   0.0,   0.0],
    [100.0,   0.0,  30.0],
    [  0.0,   0.0,   0.0],
    [100.0,   0.0,  30.0],
    [  0.0,   0.0,  30.0],

    // top rung right
    [100.0,   0.0,   0.0],
    [100.0,  30.0,   0.0],
    [100.0,  30.0,  30.0],
    [100.0,   0.0,   0.0],
    [100.0,  30.0,  30.0],
    [100.0,   0.0,  30.0],

    // under top rung
    [ 30.0,  30.0,   0.0],
    [ 30.0,  30.0,  30.0],
    [100.0,  30.0,  30.0],
    [ 30.0,  30.0,   0.0],
    [100.0,  30.0,  30.0],
    [100.0,  30.0,   0.0],

    // between top rung and middle
    [ 30.0,  30.0,   0.0],
    [ 30.0,  60.0,  30.0],
    [ 30.0,  30.0,  30.0],
    [ 30.0,  30.0,   0.0],
    [ 30.0,  60.0,   0.0],
    [ 30.0,  60.0,  30.0],

    // top of middle rung
    [ 30.0,  60.0,   0.0],
    [ 67.0,  60.0,  30.0],
    [ 30.0,  60.0,  30.0],
    [ 30.0,  60.0,   0.0],
    [ 67.0,  60.0,   0.0],
    [ 67.0,  60.0,  30.0],

    // right of middle rung
    [ 67.0,  60.0,   0.0],
    [ 67.0,  90.0,  30.0],
    [ 67.0,  60.0,  30.0],
    [ 67.0,  60.0,   0.0],
    [ 67.0,  90.0,   0.0],
    [ 67.0,  90.0,  30.0],

    // bottom of middle rung
    [ 30.0,  90.0,   0.0],
    [ 30.0,  90.0,  30.0],
    [ 67.0,  90.0,  30.0],
    [ 30.0,  90.0,   0.0],
    [ 67.0,  90.0,  30.0],
    [ 67.0,  90.0,   0.0],

    // right of bottom
    [ 30.0,  90.0,   0.0],
    [ 30.0, 150.0,  30.0],
    [ 30.0,  90.0,  30.0],
    [ 30.0,  90.0,   0.0],
    [ 30.0, 150.0,   0.0],
    [ 30.0, 150.0,  30.0],

    // bottom
    [  0.0, 150.0,   0.0],
    [  0.0, 150.0,  30.0],
    [ 30.0, 150.0,  30.0],
    [  0.0, 150.0,   0.0],
    [ 30.0, 150.0,  30.0],
    [ 30.0, 150.0,   0.0],

    // left side
    [  0.0,   0.0,   0.0],
    [  0.0,   0.0,  30.0],
    [  0.0, 150.0,  30.0],
    [  0.0,   0.0,   0.0],
    [  0.0, 150.0,  30.0],
    [  0.0, 150.0,   0.0],
];

/// Per-vertex RGB colours, expanded from [`FACES`].
pub const COLORS: [[u8; 3]; VERTEX_COUNT] = expand_face_colors(&FACES);

const fn expand_face_colors(faces: &[Face; FACE_COUNT]) -> [[u8; 3]; VERTEX_COUNT] {
    let mut out = [[0; 3]; VERTEX_COUNT];
    let mut i = 0;
    while i < VERTEX_COUNT {
        out[i] = faces[i / VERTICES_PER_FACE].color;
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_and_color_tables_match() {
        assert_eq!(POSITIONS.len(), 96);
        assert_eq!(COLORS.len(), 96);
        assert_eq!(POSITIONS.len(), COLORS.len());
    }

    #[test]
    fn every_face_group_is_one_color() {
        for (group, colors) in COLORS.chunks(VERTICES_PER_FACE).enumerate() {
            assert!(colors.iter().all(|c| *c == FACES[group].color));
        }
    }

    #[test]
    fn letter_fits_its_bounding_box() {
        for p in POSITIONS {
            assert!((0.0..=100.0).contains(&p[0]));
            assert!((0.0..=150.0).contains(&p[1]));
            assert!(p[2] == 0.0 || p[2] == 30.0);
        }
    }

    #[test]
    fn front_and_back_faces_sit_on_their_planes() {
        let front = &POSITIONS[..3 * VERTICES_PER_FACE];
        let back = &POSITIONS[3 * VERTICES_PER_FACE..6 * VERTICES_PER_FACE];
        assert!(front.iter().all(|p| p[2] == 0.0));
        assert!(back.iter().all(|p| p[2] == 30.0));
    }

    #[test]
    fn no_triangle_is_degenerate() {
        for tri in POSITIONS.chunks(3) {
            let a = glam::Vec3::from(tri[0]);
            let b = glam::Vec3::from(tri[1]);
            let c = glam::Vec3::from(tri[2]);
            assert!((b - a).cross(c - a).length() > 0.0);
        }
    }
}
