#[cfg(test)]
mod map_data_tests {
    use math::{Angle, Fixed};

    use crate::prefab::{pillar_room, step_room};
    use crate::{
        IS_SSECTOR_MASK, LumpLineDef, LumpSegment, LumpSubSector, MapData, MapDataError, MapLumps,
        Node, Sector, SideDef, SlopeType, Vertex,
    };

    /// A triangle sector, enough to build a valid map
    fn triangle() -> MapLumps {
        let vertexes = vec![
            Vertex::from_int(0, 0),
            Vertex::from_int(0, 64),
            Vertex::from_int(64, 0),
        ];
        let sectors = vec![Sector::new(0, Fixed::ZERO, Fixed::from_int(64), 0, 0, 128)];
        let sidedefs = (0..3).map(|_| SideDef::solid(0, 0)).collect();
        let linedefs = [(0, 1), (1, 2), (2, 0)]
            .iter()
            .enumerate()
            .map(|(i, (a, b))| LumpLineDef {
                start_vertex: *a,
                end_vertex: *b,
                flags: 1,
                front_sidedef: i,
                back_sidedef: None,
            })
            .collect();
        let segments = [(0, 1), (1, 2), (2, 0)]
            .iter()
            .enumerate()
            .map(|(i, (a, b))| LumpSegment {
                start_vertex: *a,
                end_vertex: *b,
                angle: Angle::ZERO,
                linedef: i,
                side: 0,
                offset: Fixed::ZERO,
            })
            .collect();
        MapLumps {
            vertexes,
            sectors,
            sidedefs,
            linedefs,
            segments,
            subsectors: vec![LumpSubSector {
                seg_count: 3,
                start_seg: 0,
            }],
            nodes: Vec::new(),
        }
    }

    #[test]
    fn builds_triangle() {
        let map = MapData::new(triangle()).unwrap();
        assert_eq!(map.start_node(), IS_SSECTOR_MASK);
        assert_eq!(map.linedefs()[0].slopetype, SlopeType::Vertical);
        assert_eq!(map.linedefs()[1].slopetype, SlopeType::Negative);
        assert_eq!(map.linedefs()[2].slopetype, SlopeType::Horizontal);
        assert_eq!(map.sectors()[0].lines, vec![0, 1, 2]);
        assert_eq!(map.point_in_subsector(Fixed::from_int(8), Fixed::from_int(8)), 0);
    }

    #[test]
    fn rejects_bad_references() {
        let mut lumps = triangle();
        lumps.linedefs[1].end_vertex = 9;
        assert_eq!(
            MapData::new(lumps).unwrap_err(),
            MapDataError::BadVertex {
                linedef: 1,
                vertex: 9
            }
        );

        let mut lumps = triangle();
        lumps.sidedefs[2].sector = 4;
        assert_eq!(
            MapData::new(lumps).unwrap_err(),
            MapDataError::BadSector {
                sidedef: 2,
                sector: 4
            }
        );

        let mut lumps = triangle();
        lumps.segments[0].side = 1;
        assert_eq!(
            MapData::new(lumps).unwrap_err(),
            MapDataError::MissingBackSide { segment: 0 }
        );

        let mut lumps = triangle();
        lumps.subsectors[0].seg_count = 4;
        assert_eq!(
            MapData::new(lumps).unwrap_err(),
            MapDataError::BadSegRange { subsector: 0 }
        );

        let mut lumps = triangle();
        lumps.subsectors.clear();
        assert_eq!(MapData::new(lumps).unwrap_err(), MapDataError::NoSubSectors);
    }

    #[test]
    fn rejects_bad_child() {
        let mut lumps = triangle();
        lumps.nodes.push(Node {
            x: Fixed::ZERO,
            y: Fixed::ZERO,
            dx: Fixed::from_int(64),
            dy: Fixed::ZERO,
            bboxes: [[Fixed::ZERO; 4]; 2],
            children: [IS_SSECTOR_MASK, IS_SSECTOR_MASK | 3],
        });
        let err = MapData::new(lumps).unwrap_err();
        assert_eq!(
            err,
            MapDataError::BadChild {
                node: 0,
                child: IS_SSECTOR_MASK | 3
            }
        );
        assert_eq!(err.to_string(), "node 0 has an invalid child 0x80000003");
    }

    #[test]
    fn two_sided_segs_know_both_sectors() {
        let map = step_room().unwrap().map;
        let two_sided: Vec<_> = map
            .segments()
            .iter()
            .filter(|s| s.backsector.is_some())
            .collect();
        assert_eq!(two_sided.len(), 2);
        assert_eq!(two_sided[0].frontsector, 0);
        assert_eq!(two_sided[0].backsector, Some(1));
        assert_eq!(two_sided[1].frontsector, 1);
        assert_eq!(two_sided[1].backsector, Some(0));
        // The back seg runs the other way, octant 3 is one short of ANG180
        assert!(two_sided[1].angle.bam().abs_diff(Angle::A180.bam()) <= 1);
        assert_eq!(map.subsectors()[1].sector, 1);
    }

    #[test]
    fn pillar_room_tree() {
        let map = pillar_room().unwrap().map;
        assert_eq!(map.nodes().len(), 3);
        assert_eq!(map.start_node(), 2);

        let ss = |x, y| map.point_in_subsector(Fixed::from_int(x), Fixed::from_int(y));
        assert_eq!(ss(0, -128), 0);
        assert_eq!(ss(0, 160), 1);
        assert_eq!(ss(100, 64), 2);
        assert_eq!(ss(-100, 64), 3);

        // West wall split in three, offsets run from the line start
        let offsets: Vec<i32> = map
            .segments()
            .iter()
            .filter(|s| s.linedef == 0)
            .map(|s| s.offset.to_int())
            .collect();
        assert_eq!(offsets, vec![0, 352, 288]);
    }
}
