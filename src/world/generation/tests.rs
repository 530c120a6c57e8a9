#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::{NoiseSettings, NormalizeMode, TerrainBand};
    use crate::world::Color;
    use cgmath::Vector2;

    fn local_settings() -> NoiseSettings {
        NoiseSettings {
            scale: 50.0,
            seed: 1,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: [0.0, 0.0],
            normalize_mode: NormalizeMode::Local,
        }
    }

    fn global_settings() -> NoiseSettings {
        NoiseSettings {
            normalize_mode: NormalizeMode::Global,
            scale: 27.0,
            ..local_settings()
        }
    }

    #[test]
    fn test_local_noise_map_shape_and_range() {
        let map = generate_noise_map(10, 10, &local_settings(), Vector2::new(0.0, 0.0));
        assert_eq!(map.width(), 10);
        assert_eq!(map.height(), 10);
        for &value in map.values() {
            assert!((0.0..=1.0).contains(&value), "value {} out of range", value);
        }
    }

    #[test]
    fn test_local_normalization_hits_both_ends() {
        let map = generate_noise_map(48, 48, &local_settings(), Vector2::new(13.0, -7.0));
        let (min, max) = map.min_max().unwrap();
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_noise_is_deterministic() {
        let settings = local_settings();
        let first = generate_noise_map(10, 10, &settings, Vector2::new(0.0, 0.0));
        for _ in 0..3 {
            let again = generate_noise_map(10, 10, &settings, Vector2::new(0.0, 0.0));
            assert_eq!(first, again);
        }

        let field = NoiseField::new(&global_settings());
        assert_eq!(
            field.sample(17, 17, Vector2::new(238.0, 0.0)),
            field.sample(17, 17, Vector2::new(238.0, 0.0))
        );
    }

    #[test]
    fn test_seed_changes_output() {
        let a = generate_noise_map(16, 16, &local_settings(), Vector2::new(0.0, 0.0));
        let other = NoiseSettings {
            seed: 2,
            ..local_settings()
        };
        let b = generate_noise_map(16, 16, &other, Vector2::new(0.0, 0.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_global_normalization_is_non_negative() {
        let map = generate_noise_map(32, 32, &global_settings(), Vector2::new(5.0, 5.0));
        assert!(map.values().iter().all(|&v| v >= 0.0 && v.is_finite()));
    }

    #[test]
    fn test_zero_octaves_yields_flat_zero() {
        for mode in [NormalizeMode::Local, NormalizeMode::Global] {
            let settings = NoiseSettings {
                octaves: 0,
                normalize_mode: mode,
                ..local_settings()
            };
            let map = generate_noise_map(8, 8, &settings, Vector2::new(0.0, 0.0));
            assert!(map.values().iter().all(|&v| v == 0.0), "{:?}", mode);
        }
    }

    #[test]
    fn test_non_positive_scale_is_corrected() {
        let settings = NoiseSettings {
            scale: 0.0,
            ..local_settings()
        };
        let map = generate_noise_map(8, 8, &settings, Vector2::new(0.0, 0.0));
        assert!(map.values().iter().all(|v| v.is_finite()));

        let negative = NoiseSettings {
            scale: -4.0,
            ..local_settings()
        };
        assert_eq!(map, generate_noise_map(8, 8, &negative, Vector2::new(0.0, 0.0)));
    }

    #[test]
    fn test_falloff_symmetry() {
        for size in [1, 2, 7, 10, 97] {
            let map = generate_falloff_map(size);
            let last = size - 1;
            for y in 0..size {
                for x in 0..size {
                    let value = map.get(x, y);
                    assert_eq!(value, map.get(last - x, last - y), "rotation at {} {}", x, y);
                    assert_eq!(value, map.get(last - x, y), "x reflection at {} {}", x, y);
                    assert_eq!(value, map.get(x, last - y), "y reflection at {} {}", x, y);
                }
            }
        }
    }

    #[test]
    fn test_falloff_shape() {
        let map = generate_falloff_map(41);
        assert!(map.get(20, 20) < 1e-6);
        assert!((map.get(0, 0) - 1.0).abs() < 1e-6);
        assert!((map.get(40, 20) - 1.0).abs() < 1e-6);
        assert!(map.get(20, 20) < map.get(30, 20));
        assert!(map.get(30, 20) < map.get(38, 20));
    }

    #[test]
    fn test_classify_sorted_bands_picks_highest_reached() {
        let bands = TerrainBand::default_bands();
        assert_eq!(classify_height(0.0, &bands), bands[0].color);
        assert_eq!(classify_height(0.42, &bands), bands[2].color);
        assert_eq!(classify_height(0.45, &bands), bands[3].color);
        assert_eq!(classify_height(1.3, &bands), bands[7].color);
        assert_eq!(classify_height(-0.1, &bands), Color::CLEAR);
    }

    #[test]
    fn test_classify_unsorted_bands_stops_at_first_miss() {
        let low = Color::rgb(1.0, 0.0, 0.0);
        let high = Color::rgb(0.0, 1.0, 0.0);
        let late = Color::rgb(0.0, 0.0, 1.0);
        let bands = vec![
            TerrainBand::new("low", 0.1, low),
            TerrainBand::new("high", 0.8, high),
            TerrainBand::new("late", 0.2, late),
        ];
        // 0.5 clears "late" but the scan stopped at "high"
        assert_eq!(classify_height(0.5, &bands), low);
        assert_eq!(classify_height(0.9, &bands), late);
        assert_eq!(classify_height(0.05, &bands), Color::CLEAR);
    }

    #[test]
    fn test_height_field_includes_border_ring() {
        let builder = HeightFieldBuilder::new(23, &global_settings(), TerrainBand::default_bands(), false);
        let field = builder.build(Vector2::new(0.0, 0.0));
        assert_eq!(field.size(), 25);
        assert_eq!(field.colors().len(), 25 * 25);
        assert_eq!(
            field.color_at(3, 4),
            classify_height(field.height_at(3, 4), &TerrainBand::default_bands())
        );
        assert!(builder.falloff_map().is_none());
    }

    #[test]
    fn test_falloff_carves_island() {
        let builder = HeightFieldBuilder::new(23, &local_settings(), TerrainBand::default_bands(), true);
        let field = builder.build(Vector2::new(0.0, 0.0));
        let falloff = builder.falloff_map().unwrap();
        assert_eq!(falloff.width(), 25);

        let plain = HeightFieldBuilder::new(23, &local_settings(), TerrainBand::default_bands(), false)
            .build(Vector2::new(0.0, 0.0));
        for y in 0..25 {
            for x in 0..25 {
                let expected = (plain.height_at(x, y) - falloff.get(x, y)).clamp(0.0, 1.0);
                assert_eq!(field.height_at(x, y), expected);
            }
        }
        assert_eq!(field.height_at(0, 0), 0.0);
        assert_eq!(field.height_at(24, 24), 0.0);
    }

    #[test]
    fn test_global_mode_seams_line_up() {
        let chunk_size = 23;
        let tile_world_size = (chunk_size - 1) as f32;
        let settings = NoiseSettings {
            offset: [1.0, 1.0],
            ..global_settings()
        };
        let builder = HeightFieldBuilder::new(chunk_size, &settings, Vec::new(), false);

        let origin = builder.build(Vector2::new(0.0, 0.0));
        let east = builder.build(Vector2::new(tile_world_size, 0.0));
        let north = builder.build(Vector2::new(0.0, tile_world_size));

        let shift = chunk_size - 1;
        for y in 0..origin.size() {
            for x in 0..3 {
                assert_eq!(east.height_at(x, y), origin.height_at(x + shift, y), "east seam at {} {}", x, y);
            }
        }
        for x in 0..origin.size() {
            for y in 0..3 {
                assert_eq!(north.height_at(x, y + shift), origin.height_at(x, y), "north seam at {} {}", x, y);
            }
        }
    }

    #[test]
    fn test_cloud_field_is_uniformly_colored() {
        let settings = crate::config::CloudSettings {
            size: 12,
            ..Default::default()
        };
        let field = build_cloud_field(&settings, Vector2::new(0.0, 0.0));
        assert_eq!(field.size(), 12);
        assert!(field.colors().iter().all(|&c| c == settings.color));
    }
}
