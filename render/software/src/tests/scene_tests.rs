#[cfg(test)]
mod scene_tests {
    use level::prefab::{self, HUE_CEIL, HUE_FLOOR, HUE_GRATE, HUE_STEP, HUE_WALL};
    use level::INVERSECOLORMAP;
    use math::{ANG45, Angle, Fixed};
    use render_trait::{Detail, DisplayConfig, IndexedBuffer, PixelBuffer, PlayViewRenderer};

    use crate::SoftwareRenderer;
    use crate::tests::{RecordingBuffer, count_hue};

    fn config(width: usize, height: usize) -> DisplayConfig {
        DisplayConfig {
            width,
            height,
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn square_room_counts() {
        let room = prefab::square_room().unwrap();
        let mut renderer = SoftwareRenderer::new(config(320, 200));
        let mut buffer = IndexedBuffer::new(320, 200);
        let stats = renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);

        // West, both halves of north and east. South is behind the camera.
        assert_eq!(stats.segs, 4);
        // One floor, one ceiling
        assert_eq!(stats.visplanes, 2);
        assert_eq!(stats.vissprites, 0);
        assert_eq!(stats.sprite_columns, 0);
        assert_eq!(stats.bsp_nodes, 1);

        let buf = buffer.buf();
        assert!(count_hue(buf, HUE_WALL) > 0);
        assert!(count_hue(buf, HUE_FLOOR) > 0);
        assert!(count_hue(buf, HUE_CEIL) > 0);
        assert_eq!(
            count_hue(buf, HUE_WALL) + count_hue(buf, HUE_FLOOR) + count_hue(buf, HUE_CEIL),
            320 * 200
        );
    }

    #[test]
    fn closed_room_writes_every_pixel_once() {
        let room = prefab::square_room().unwrap();
        let mut renderer = SoftwareRenderer::new(config(320, 200));
        let mut buffer = RecordingBuffer::new(320, 200);
        renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
        let width = buffer.size().width_usize();
        for (i, count) in buffer.writes.iter().enumerate() {
            assert_eq!(*count, 1, "pixel {}, {}", i % width, i / width);
        }
    }

    #[test]
    fn two_sided_rooms_write_each_pixel_once_per_layer() {
        let rooms = [
            prefab::step_room().unwrap(),
            prefab::pillar_room().unwrap(),
            prefab::window_room().unwrap(),
        ];
        let sizes = [(320, 200, Detail::High), (640, 400, Detail::High), (320, 200, Detail::Low)];
        for (r, mut room) in rooms.into_iter().enumerate() {
            room.things.clear();
            room.view.psprites.clear();
            for (width, height, detail) in sizes {
                let mut renderer = SoftwareRenderer::new(DisplayConfig {
                    detail,
                    ..config(width, height)
                });
                let mut buffer = RecordingBuffer::new(width, height);
                for turn in 0..8u32 {
                    room.view.angle = Angle::new(ANG45.wrapping_mul(turn) + ANG45 / 3);
                    renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
                    for (i, count) in buffer.writes.iter().enumerate() {
                        // Only the masked grate may draw over walls and planes
                        let masked = buffer.buf()[i] & 0xf0 == HUE_GRATE;
                        assert!(
                            *count <= 1 || (*count == 2 && masked),
                            "room {r}, {width}x{height} {detail:?}, turn {turn}: pixel {}, {} written {count} times",
                            i % width,
                            i / width
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn step_shows_lower_texture() {
        let room = prefab::step_room().unwrap();
        let mut renderer = SoftwareRenderer::new(config(320, 200));
        let mut buffer = IndexedBuffer::new(320, 200);
        let stats = renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);

        // Low floor, high floor and the ceiling both sectors share
        assert_eq!(stats.visplanes, 3);
        // The node and both subsectors
        assert_eq!(stats.bsp_nodes, 3);
        assert!(count_hue(buffer.buf(), HUE_STEP) > 0);

        // The step is below the horizon
        let step_rows: Vec<usize> = buffer
            .buf()
            .chunks(320)
            .enumerate()
            .filter(|(_, row)| count_hue(row, HUE_STEP) > 0)
            .map(|(y, _)| y)
            .collect();
        assert!(step_rows.iter().all(|y| *y > 100));
    }

    #[test]
    fn planes_match_across_resolutions() {
        let room = prefab::step_room().unwrap();
        let mut keys = Vec::new();
        for (width, height) in [(320, 200), (640, 400)] {
            let mut renderer = SoftwareRenderer::new(config(width, height));
            let mut buffer = IndexedBuffer::new(width, height);
            let stats = renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
            let mut planes: Vec<(Fixed, usize, i32)> = renderer
                .r_data
                .visplane_render
                .planes()
                .iter()
                .map(|p| (p.height, p.picnum, p.lightlevel))
                .collect();
            planes.sort();
            keys.push((stats.visplanes, stats.segs, planes));
        }
        assert_eq!(keys[0], keys[1]);
    }

    #[test]
    fn buffer_size_change_resizes_view() {
        let room = prefab::square_room().unwrap();
        let mut renderer = SoftwareRenderer::new(config(320, 200));
        let mut buffer = IndexedBuffer::new(640, 400);
        let stats = renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
        assert_eq!(renderer.config().width, 640);
        assert_eq!(renderer.config().height, 400);
        assert_eq!(stats.segs, 4);
        assert_eq!(count_hue(buffer.buf(), 0), 0);
    }

    #[test]
    fn low_detail_doubles_columns() {
        let room = prefab::square_room().unwrap();
        let mut renderer = SoftwareRenderer::new(DisplayConfig {
            detail: Detail::Low,
            ..config(320, 200)
        });
        let mut buffer = IndexedBuffer::new(320, 200);
        let stats = renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
        assert_eq!(stats.segs, 4);
        for row in buffer.buf().chunks(320) {
            for pair in row.chunks(2) {
                assert_eq!(pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn looking_down_shows_more_floor() {
        let mut room = prefab::square_room().unwrap();
        let mut renderer = SoftwareRenderer::new(config(320, 200));
        let mut buffer = IndexedBuffer::new(320, 200);

        renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
        let level = count_hue(buffer.buf(), HUE_FLOOR);

        room.view.pitch = 40;
        renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
        let down = count_hue(buffer.buf(), HUE_FLOOR);
        assert!(down > level, "{down} <= {level}");

        room.view.pitch = -40;
        renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
        let up = count_hue(buffer.buf(), HUE_FLOOR);
        assert!(up < level, "{up} >= {level}");
    }

    #[test]
    fn fixed_colormap_applies_everywhere() {
        let mut room = prefab::square_room().unwrap();
        room.view.fixed_colormap = Some(INVERSECOLORMAP);
        let mut renderer = SoftwareRenderer::new(config(320, 200));
        let mut buffer = IndexedBuffer::new(320, 200);
        renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
        // The inverse map drops the hue
        assert!(buffer.buf().iter().all(|c| *c < 16));
    }

    #[test]
    fn extra_light_brightens() {
        let mut room = prefab::square_room().unwrap();
        let mut renderer = SoftwareRenderer::new(config(320, 200));
        let mut buffer = IndexedBuffer::new(320, 200);

        renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
        let dark: u32 = buffer.buf().iter().map(|c| (*c & 0xf) as u32).sum();
        room.view.extralight = 2;
        renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
        let bright: u32 = buffer.buf().iter().map(|c| (*c & 0xf) as u32).sum();
        assert!(bright > dark);
    }

    #[test]
    fn peaks_are_kept_between_frames() {
        let pillar = prefab::pillar_room().unwrap();
        let square = prefab::square_room().unwrap();
        let mut renderer = SoftwareRenderer::new(config(320, 200));
        let mut buffer = IndexedBuffer::new(320, 200);

        let first = renderer.render_player_view(&pillar.view, &pillar.map, &pillar.things, &pillar.pics, &mut buffer);
        let second = renderer.render_player_view(&square.view, &square.map, &square.things, &square.pics, &mut buffer);
        assert_eq!(second.vissprites, 0);
        assert_eq!(second.peak_vissprites, first.vissprites);
        assert!(second.peak_drawsegs >= first.segs);
        assert_eq!(renderer.peaks().peak_vissprites, 1);
    }
}
