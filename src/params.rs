//! Live transform parameters and their documented ranges.
//!
//! [`TransformParameters`] has exactly two writers: the parameter control
//! (keyboard or command line) writes every field except `angle_y`, and the
//! frame renderer writes only `angle_y`, which it advances once per frame.

use std::f32::consts::PI;
use std::fmt;

/// Position, scale and rotation of the letter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformParameters {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub sx: f32,
    pub sy: f32,
    pub sz: f32,
    /// Radians.
    pub angle_x: f32,
    /// Radians. Advanced by the renderer every frame.
    pub angle_y: f32,
    /// Radians.
    pub angle_z: f32,
}

impl Default for TransformParameters {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: -400.0,
            sx: 1.0,
            sy: 1.0,
            sz: 1.0,
            angle_x: 0.0,
            angle_y: 0.0,
            angle_z: 0.0,
        }
    }
}

/// One of the nine named parameter fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    X,
    Y,
    Z,
    Sx,
    Sy,
    Sz,
    AngleX,
    AngleY,
    AngleZ,
}

/// Inclusive bounds and step of a parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

impl Param {
    pub const ALL: [Param; 9] = [
        Param::X,
        Param::Y,
        Param::Z,
        Param::Sx,
        Param::Sy,
        Param::Sz,
        Param::AngleX,
        Param::AngleY,
        Param::AngleZ,
    ];

    /// Fields the parameter control may write. `AngleY` belongs to the renderer.
    pub const USER_OWNED: [Param; 8] = [
        Param::X,
        Param::Y,
        Param::Z,
        Param::Sx,
        Param::Sy,
        Param::Sz,
        Param::AngleX,
        Param::AngleZ,
    ];

    pub const fn range(self) -> ParamRange {
        match self {
            Param::X | Param::Y => ParamRange::new(-1000.0, 1000.0, 1.0),
            Param::Z => ParamRange::new(-1000.0, 0.0, 1.0),
            Param::Sx | Param::Sy | Param::Sz => ParamRange::new(-20.0, 20.0, 0.1),
            Param::AngleX | Param::AngleY | Param::AngleZ => ParamRange::new(-PI, PI, 0.1),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Param::X => "x",
            Param::Y => "y",
            Param::Z => "z",
            Param::Sx => "sx",
            Param::Sy => "sy",
            Param::Sz => "sz",
            Param::AngleX => "angleX",
            Param::AngleY => "angleY",
            Param::AngleZ => "angleZ",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TransformParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, param: Param) -> f32 {
        match param {
            Param::X => self.x,
            Param::Y => self.y,
            Param::Z => self.z,
            Param::Sx => self.sx,
            Param::Sy => self.sy,
            Param::Sz => self.sz,
            Param::AngleX => self.angle_x,
            Param::AngleY => self.angle_y,
            Param::AngleZ => self.angle_z,
        }
    }

    fn slot(&mut self, param: Param) -> &mut f32 {
        match param {
            Param::X => &mut self.x,
            Param::Y => &mut self.y,
            Param::Z => &mut self.z,
            Param::Sx => &mut self.sx,
            Param::Sy => &mut self.sy,
            Param::Sz => &mut self.sz,
            Param::AngleX => &mut self.angle_x,
            Param::AngleY => &mut self.angle_y,
            Param::AngleZ => &mut self.angle_z,
        }
    }

    /// Set a field, clamped to its range. Returns the stored value.
    pub fn set(&mut self, param: Param, value: f32) -> f32 {
        let clamped = param.range().clamp(value);
        *self.slot(param) = clamped;
        clamped
    }

    /// Move a field by `steps` multiples of its step size, clamped to its range.
    pub fn nudge(&mut self, param: Param, steps: i32) -> f32 {
        let range = param.range();
        let value = self.get(param) + steps as f32 * range.step;
        self.set(param, value)
    }

    /// Clamp every field into its documented range.
    pub fn clamped(mut self) -> Self {
        for param in Param::ALL {
            let value = self.get(param);
            self.set(param, value);
        }
        self
    }

    /// Restore the user-owned fields to their defaults, leaving `angle_y` alone.
    pub fn reset_user_owned(&mut self) {
        let defaults = Self::default();
        for param in Param::USER_OWNED {
            *self.slot(param) = defaults.get(param);
        }
    }
}
