//! Builds each subsystem's parameters from the loaded [`Config`].

use std::path::PathBuf;

use glam::Vec3;
use orbiter_config::Config;
use orbiter_input::InputSettings;
use orbiter_render::{Light, RendererParams, SPACE_BLACK, TextureSlot};
use orbiter_scene::SceneParams;

pub fn scene_params(config: &Config) -> SceneParams {
    SceneParams {
        earth_rotation_rpm: config.earth.rotation_rpm,
        earth_scale: config.earth.scale,
        orbit_radius: config.satellite.orbit_radius,
        min_orbit_radius: config.satellite.min_orbit_radius,
        orbit_rpm: config.satellite.orbit_rpm,
        orbit_angle: config.satellite.orbit_angle,
        satellite_scale: config.satellite.scale,
        camera_translation: Vec3::from(config.camera.initial_translation),
        camera_pitch: config.camera.initial_pitch,
        zoom: config.camera.zoom,
        near: config.camera.near,
        far: config.camera.far,
        rotate_divisor: config.input.rotate_divisor,
    }
}

pub fn renderer_params(config: &Config) -> RendererParams {
    let lighting = &config.lighting;
    RendererParams {
        latitude_strips: config.earth.latitude_strips,
        longitude_strips: config.earth.longitude_strips,
        earth_radius: config.earth.radius,
        satellite_half_extent: config.satellite.half_extent,
        light: Light {
            position: Vec3::from(lighting.light_position),
            ambient: Vec3::from(lighting.ambient),
            diffuse: Vec3::from(lighting.diffuse),
            specular: Vec3::from(lighting.specular),
            shininess: lighting.shininess,
        },
        clear_color: SPACE_BLACK,
    }
}

pub fn input_settings(config: &Config) -> InputSettings {
    InputSettings {
        radius_step: config.input.radius_step,
        rate_step: config.input.rate_step,
        orbit_rate_floor: config.input.orbit_rate_floor,
        zoom_step: config.input.zoom_step,
        translate_divisor: config.input.translate_divisor,
    }
}

/// Image path for every texture slot, in [`TextureSlot::ALL`] order.
pub fn texture_requests(config: &Config) -> [(TextureSlot, PathBuf); 3] {
    let assets = &config.assets;
    [
        (TextureSlot::Earth, assets.earth_texture.clone()),
        (
            TextureSlot::SatellitePrimary,
            assets.satellite_primary_texture.clone(),
        ),
        (
            TextureSlot::SatelliteSecondary,
            assets.satellite_secondary_texture.clone(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_agree_across_crates() {
        let config = Config::default();
        assert_eq!(scene_params(&config), SceneParams::default());
        assert_eq!(renderer_params(&config), RendererParams::default());
        assert_eq!(input_settings(&config), InputSettings::default());
    }

    #[test]
    fn test_overrides_flow_through() {
        let mut config = Config::default();
        config.satellite.orbit_rpm = -3.0;
        config.earth.latitude_strips = 8;
        config.input.orbit_rate_floor = Some(0.0);
        config.lighting.shininess = 4.0;

        assert_eq!(scene_params(&config).orbit_rpm, -3.0);
        assert_eq!(renderer_params(&config).latitude_strips, 8);
        assert_eq!(renderer_params(&config).light.shininess, 4.0);
        assert_eq!(input_settings(&config).orbit_rate_floor, Some(0.0));
    }

    #[test]
    fn test_texture_requests_cover_every_slot() {
        let requests = texture_requests(&Config::default());
        let slots: Vec<_> = requests.iter().map(|(slot, _)| *slot).collect();
        assert_eq!(slots, TextureSlot::ALL.to_vec());
        assert_eq!(requests[0].1, PathBuf::from("assets/earth.jpg"));
    }
}
