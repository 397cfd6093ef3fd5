use clap::Parser;

use letterspin::{AppConfig, RendererConfig, TransformParameters};

/// Spin a colourful extruded "F" in a window.
///
/// Tab / Shift+Tab picks a parameter, Up/Down and PageUp/PageDown change it,
/// R resets, Escape quits.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Window title
    #[arg(long, default_value = "Letterspin")]
    title: String,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    x: f32,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    y: f32,

    #[arg(long, default_value_t = -400.0, allow_negative_numbers = true)]
    z: f32,

    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    sx: f32,

    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    sy: f32,

    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    sz: f32,

    /// Rotation about X in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    angle_x: f32,

    /// Starting rotation about Y in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    angle_y: f32,

    /// Rotation about Z in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    angle_z: f32,

    /// Radians added to the Y rotation every frame
    #[arg(long, default_value_t = 0.01, allow_negative_numbers = true)]
    angle_step: f32,

    /// Keep the Y rotation fixed
    #[arg(long)]
    no_rotate: bool,
}

impl Args {
    fn into_config(self) -> AppConfig {
        let params = TransformParameters {
            x: self.x,
            y: self.y,
            z: self.z,
            sx: self.sx,
            sy: self.sy,
            sz: self.sz,
            angle_x: self.angle_x,
            angle_y: self.angle_y,
            angle_z: self.angle_z,
        };
        let renderer = RendererConfig {
            angle_step: if self.no_rotate { 0.0 } else { self.angle_step },
            ..Default::default()
        };

        AppConfig::new()
            .title(self.title)
            .size(self.width, self.height)
            .params(params)
            .renderer(renderer)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::debug!("{:?}", args);
    letterspin::run_with_config(args.into_config())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_scene() {
        let config = Args::parse_from(["letterspin"]).into_config();
        assert_eq!(config.params, TransformParameters::default());
        assert_eq!(config.renderer, RendererConfig::default());
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn negative_values_and_clamping() {
        let args = Args::parse_from(["letterspin", "--x", "-20", "--z", "250", "--no-rotate"]);
        let config = args.into_config();
        assert_eq!(config.params.x, -20.0);
        assert_eq!(config.params.z, 0.0);
        assert_eq!(config.renderer.angle_step, 0.0);
    }
}
