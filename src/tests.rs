#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};
    use std::num::NonZero;

    use itertools::Itertools;

    use crate::board::{Board, BoardError};
    use crate::color::Affiliation;
    use crate::position::Position;
    use crate::shape::{HexStep, SquareStep};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn square(text: &str) -> Board<SquareStep> {
        init_logging();
        text.parse().unwrap()
    }

    fn aff(c: char) -> Affiliation {
        Affiliation::new(c).unwrap()
    }

    fn affs(colors: &str) -> Vec<Affiliation> {
        colors.chars().map(aff).collect_vec()
    }

    mod parsing {
        use super::*;

        #[test]
        fn round_trip() {
            for text in ["O-O", "Y---\nB-BY", "#Yy-\nBB--\n#Oo-", "AbbbA\n-B-B-\n-----", "a?-\n#Z-"] {
                assert_eq!(square(text).to_string(), text);
            }
        }

        #[test]
        fn round_trip_random_boards() {
            use rand::rngs::StdRng;
            use rand::{Rng, SeedableRng};

            let alphabet = "#-ABCabcRr".chars().collect_vec();
            let mut rng = StdRng::seed_from_u64(3);
            for _ in 0..50 {
                let (width, height) = (rng.gen_range(1..=6), rng.gen_range(1..=6));
                let text = (0..height)
                    .map(|_| (0..width).map(|_| alphabet[rng.gen_range(0..alphabet.len())]).collect::<String>())
                    .join("\n");

                assert_eq!(square(&text).to_string(), text);
            }
        }

        #[test]
        fn surrounding_whitespace_is_dropped() {
            assert_eq!(square("\nO-O\n-o-\n").to_string(), "O-O\n-o-");
        }

        #[test]
        fn bad_text() {
            assert_eq!("O-O\n--".parse::<Board<SquareStep>>(), Err(BoardError::Ragged { row: 1, expected: 3, found: 2 }));
            assert_eq!("".parse::<Board<SquareStep>>(), Err(BoardError::Empty));
            assert_eq!(" \n ".parse::<Board<SquareStep>>(), Err(BoardError::Empty));
        }

        #[test]
        fn positions() {
            assert_eq!("3,4".parse::<Position>(), Ok(Position(3, 4)));
            assert_eq!(" 3 , 4 ".parse::<Position>(), Ok(Position(3, 4)));
            assert!("3;4".parse::<Position>().is_err());
            assert!("x,4".parse::<Position>().is_err());
            assert_eq!(Position(3, 4).to_string(), "3,4");
            assert_eq!(Position(3, 4).manhattan(Position(1, 7)), 5);
            assert_eq!(Position(1, 1).delta_to(Position(0, 2)), (-1, 1));
            assert_eq!(Position(1, 1).offset_by((-1, 1)), Position(0, 2));
        }

        #[test]
        fn defaults() {
            assert_eq!(Position::default(), Position(0, 0));

            let cell = crate::cell::Cell::default();
            assert_eq!(cell.position, Position(0, 0));
            assert!(cell.is_empty());
            assert!(!cell.is_endpoint);
        }
    }

    mod cells {
        use crate::cell::CellType;
        use crate::color::Color;
        use crate::shape::{BoardShape, Step};

        use super::*;

        #[test]
        fn cell_types() {
            let board = square("Aa-#?");
            let types = board.iterate_cells().map(|cell| cell.cell_type()).collect_vec();
            assert_eq!(types, vec![CellType::Endpoint, CellType::LineSegment, CellType::Empty, CellType::Wall, CellType::Unknown]);
            assert_eq!(board[Position(1, 0)].color, Color::Line(aff('A')));
        }

        #[test]
        fn tails() {
            let board = square("Aa--A");
            let tails = board.iterate_tails().map(|cell| cell.position).collect_vec();
            assert_eq!(tails, vec![Position(1, 0), Position(4, 0)]);

            let empty = board[Position(2, 0)];
            assert!(!empty.is_tail(&board));
            assert!(empty.is_active(&board));
            assert!(!board[Position(0, 0)].is_active(&board));
        }

        #[test]
        fn walls_are_not_neighbors() {
            let board = square("A#A");
            assert_eq!(board.neighbor_positions(Position(0, 0)).count(), 0);
            assert_eq!(board.iterate_tails().count(), 2);
            assert!(!board.is_valid_position(Position(1, 0)));
            assert!(!board.is_valid_position(Position(3, 0)));
        }

        #[test]
        fn hex_neighbors() {
            let lowered = HexStep::neighbors_of(Position(2, 2)).into_iter().map(|(_, p)| p).collect_vec();
            assert_eq!(lowered, vec![Position(1, 2), Position(2, 1), Position(3, 2), Position(3, 3), Position(2, 3), Position(1, 3)]);

            let raised = HexStep::neighbors_of(Position(1, 1)).into_iter().map(|(_, p)| p).collect_vec();
            assert_eq!(raised, vec![Position(0, 0), Position(1, 0), Position(2, 0), Position(2, 1), Position(1, 2), Position(0, 1)]);

            assert_eq!(HexStep::neighbor_directions(Position(1, 1))[0], (-1, -1));
        }

        #[test]
        fn steps_invert() {
            for position in [Position(1, 1), Position(2, 2)] {
                for (direction, neighbor) in HexStep::neighbors_of(position) {
                    assert_eq!(HexStep::direction_to(neighbor, position), Some(direction.invert()));
                }
                for (direction, neighbor) in SquareStep::neighbors_of(position) {
                    assert_eq!(SquareStep::direction_to(neighbor, position), Some(direction.invert()));
                }
            }
            assert_eq!(SquareStep::direction_to(Position(0, 0), Position(2, 0)), None);
        }

        #[test]
        fn clockwise() {
            assert_eq!(SquareStep::Left.next_clockwise(), SquareStep::Up);
            assert_eq!(HexStep::DownLeft.next_clockwise(), HexStep::UpLeft);
            assert_eq!(
                SquareStep::Down.clockwise_from(),
                vec![SquareStep::Down, SquareStep::Left, SquareStep::Up, SquareStep::Right]
            );
        }
    }

    mod board_queries {
        use crate::color::Color;

        use super::*;

        #[test]
        fn derived_values() {
            let board = square("Yyyy\nBbBY");
            assert_eq!(board.dimensions(), (4, 2));
            assert_eq!(board.colors(), BTreeSet::from([aff('B'), aff('Y')]));
            assert_eq!(board.connections(Position(1, 0)), vec![Position(2, 0), Position(0, 0)]);
            assert_eq!(board.empty_count(), 0);

            let open = square("Y---\nB-BY");
            assert_eq!(open.connections(Position(1, 0)), vec![]);
            assert_eq!(open.empty_count(), 4);
            assert_eq!(open.iterate_filled_cells().count(), 4);
        }

        #[test]
        fn set_color() {
            let mut board = square("Y---\nB-BY");
            board.set_color(Position(1, 0), Color::Line(aff('Y'))).unwrap();
            assert_eq!(board.to_string(), "Yy--\nB-BY");
            assert_eq!(board.set_color(Position(9, 9), Color::Empty), Err(BoardError::OutOfBounds(Position(9, 9))));
            assert!(board.get_cell(Position(4, 0)).is_err());
            assert!(board.cell(Position(3, 1)).is_some_and(|cell| cell.is_endpoint));
        }

        #[test]
        #[should_panic]
        fn index_out_of_range() {
            let board = square("O-O");
            let _ = board[Position(5, 5)];
        }

        #[test]
        fn can_connect() {
            assert!(!square("O-#-O").can_connect(Position(0, 0), Position(4, 0)));
            assert!(square("O---O").can_connect(Position(0, 0), Position(4, 0)));
            // lines of the same color are passable, others are not
            assert!(square("OoyoO").can_connect(Position(0, 0), Position(1, 0)));
            assert!(!square("OoyoO").can_connect(Position(0, 0), Position(4, 0)));
        }

        #[test]
        fn completeness() {
            assert!(square("BYO\nbyo\nBYO").is_complete());
            assert!(square("B\nb\nB").is_complete());
            assert!(square("AaaA\nBbbB").is_complete());
            assert!(!square("ByY\nby-\nBY-").is_complete());
            assert!(!square("OBbY\no#bb\noo#B\nYooO").is_complete());
            // a loop of segments with no endpoints
            assert!(!square("AaaA\n#bb#\n#bb#").is_complete());
        }
    }

    mod areas {
        use crate::area::{Area, AreaError};
        use crate::knot::AreaColors;

        use super::*;

        fn open_rectangle(width: usize, height: usize) -> Board<SquareStep> {
            square(&(0..height).map(|_| "-".repeat(width)).join("\n"))
        }

        #[test]
        fn two_by_two() {
            let areas = open_rectangle(2, 2).open_areas().unwrap();
            assert_eq!(areas.len(), 1);
            assert_eq!(areas[0].perimeter.len(), 4);
            assert!(areas[0].body.is_empty());
        }

        #[test]
        fn rectangles() {
            for (width, height) in [(2, 2), (3, 3), (4, 3), (5, 5), (6, 2)] {
                let areas = open_rectangle(width, height).open_areas().unwrap();
                assert_eq!(areas.len(), 1);
                assert_eq!(areas[0].perimeter.len(), 2 * width + 2 * height - 4);
                assert_eq!(areas[0].body.len(), (width - 2) * (height - 2));
                assert_eq!(areas[0].positions.len(), width * height);
            }
        }

        #[test]
        fn clockwise_ring() {
            let board = open_rectangle(3, 3);
            let area = Area::from_cell(&board, Position(1, 1)).unwrap();
            assert_eq!(area.perimeter, vec![
                Position(0, 0), Position(1, 0), Position(2, 0), Position(2, 1),
                Position(2, 2), Position(1, 2), Position(0, 2), Position(0, 1),
            ]);
            assert_eq!(area.body, HashSet::from([Position(1, 1)]));
            assert_eq!(area.render(&board), "@@@\n@^@\n@@@");
        }

        #[test]
        fn enclosed_cell() {
            let areas = square("###\n#-#\n###").open_areas().unwrap();
            assert_eq!(areas.len(), 1);
            assert_eq!(areas[0].perimeter, vec![Position(1, 1)]);
            assert!(areas[0].body.is_empty());
        }

        #[test]
        fn thin_channels_are_walked_on_both_sides() {
            let areas = square("##-#\n----\n##-#").open_areas().unwrap();
            assert_eq!(areas.len(), 1);
            assert_eq!(areas[0].perimeter, vec![
                Position(0, 1), Position(1, 1), Position(2, 1), Position(2, 0), Position(2, 1),
                Position(3, 1), Position(2, 1), Position(2, 2), Position(2, 1), Position(1, 1),
            ]);
            assert!(areas[0].body.is_empty());
        }

        #[test]
        fn lines_split_areas() {
            let areas = square("--B--\n--b--\n--B--").open_areas().unwrap();
            assert_eq!(areas.len(), 2);
            for area in &areas {
                assert_eq!(area.positions.len(), 6);
                assert_eq!(area.perimeter.len(), 6);
            }
        }

        #[test]
        fn tails_join_every_area_they_touch() {
            let areas = square("--A--").open_areas().unwrap();
            assert_eq!(areas.len(), 2);
            assert!(areas.iter().all(|area| area.positions.contains(&Position(2, 0))));
        }

        #[test]
        fn stranded_tails_are_areas_of_their_own() {
            let board = square("A#-");
            let areas = board.open_areas().unwrap();
            assert_eq!(areas.len(), 2);
            assert_eq!(areas[0].perimeter, vec![Position(2, 0)]);
            assert_eq!(areas[1].perimeter, vec![Position(0, 0)]);
            assert_eq!(Area::from_cell(&board, Position(1, 0)), Err(AreaError::InactiveSeed(Position(1, 0))));
        }

        #[test]
        fn hexagonal() {
            let board: Board<HexStep> = "---\n---\n---".parse().unwrap();
            let areas = board.open_areas().unwrap();
            assert_eq!(areas.len(), 1);
            assert_eq!(areas[0].perimeter.len(), 8);
            assert_eq!(areas[0].body, HashSet::from([Position(1, 1)]));
        }

        #[test]
        fn perimeter_colors() {
            let board = square("B-Y\n---\nY-B");
            let areas = board.open_areas().unwrap();
            assert_eq!(areas.len(), 1);

            let colors = board.area_colors(&areas[0]);
            assert_eq!(colors, AreaColors::new(affs("BYBY"), BTreeSet::new()));
            assert_eq!(colors.original_perimeter_colors, affs("BYBY"));
            assert!(colors.inner_colors.is_empty());
        }

        #[test]
        fn shared_tails_are_released() {
            let board = square("---B\n-BA-\nA---");
            let areas = board.open_areas().unwrap();
            assert_eq!(areas.len(), 2);
            for tail in [Position(3, 0), Position(1, 1), Position(2, 1), Position(0, 2)] {
                assert!(areas.iter().all(|area| area.positions.contains(&tail)), "{}", tail);
            }

            // read on its own, each side is a knot
            let separate = crate::knot::simplify_edge_color_orderings(
                &areas.iter().map(|area| board.area_colors(area)).collect_vec()
            );
            assert!(separate.iter().all(|colors| !colors.is_resolved()));

            for colors in board.open_area_colors(&areas) {
                assert!(colors.perimeter_colors.is_empty());
                assert_eq!(colors.line_colors, BTreeSet::from_iter(affs("AB")));
            }
        }
    }

    mod knots {
        use crate::knot::{simplify_edge_color_orderings, AreaColors};

        use super::*;

        fn area(perimeter: &str, inner: &str) -> AreaColors {
            AreaColors::new(affs(perimeter), affs(inner).into_iter().collect())
        }

        #[test]
        fn crossing_is_left_alone() {
            let simplified = simplify_edge_color_orderings(&[area("BYBY", "")]);
            assert_eq!(simplified[0].perimeter_colors, affs("BYBY"));
            assert!(simplified[0].line_colors.is_empty());
            assert!(!simplified[0].is_resolved());
        }

        #[test]
        fn nested_pairs() {
            let simplified = simplify_edge_color_orderings(&[area("YBBY", "")]);
            assert!(simplified[0].perimeter_colors.is_empty());
            assert_eq!(simplified[0].line_colors, BTreeSet::from([aff('B'), aff('Y')]));
            assert_eq!(simplified[0].original_perimeter_colors, affs("YBBY"));
        }

        #[test]
        fn pairs_wrap_around() {
            let simplified = simplify_edge_color_orderings(&[area("RBYR", "")]);
            assert_eq!(simplified[0].perimeter_colors, affs("BY"));
            assert_eq!(simplified[0].line_colors, BTreeSet::from([aff('R')]));
        }

        #[test]
        fn singles_reach_inwards() {
            let simplified = simplify_edge_color_orderings(&[area("YBRBGY", "RG")]);
            assert!(simplified[0].perimeter_colors.is_empty());
            assert_eq!(simplified[0].line_colors, BTreeSet::from_iter(affs("BGRY")));

            let simplified = simplify_edge_color_orderings(&[area("RYR", "Y")]);
            assert!(simplified[0].is_resolved());
        }

        #[test]
        fn resolution_crosses_areas() {
            let simplified = simplify_edge_color_orderings(&[area("RORO", ""), area("RR", "")]);
            assert!(simplified.iter().all(AreaColors::is_resolved));
            assert_eq!(simplified[0].line_colors, BTreeSet::from([aff('O')]));
        }

        #[test]
        fn fixpoint_is_stable() {
            let orderings = [area("YBRBGY", "RG"), area("BYBY", ""), area("RORO", ""), area("OO", "")];
            let once = simplify_edge_color_orderings(&orderings);
            assert_eq!(simplify_edge_color_orderings(&once), once);
        }

        #[test]
        fn contained_lines() {
            let colors = area("", "R");
            assert_eq!(colors.line_colors, BTreeSet::from([aff('R')]));
            assert!(colors.is_resolved());
            assert!(!area("", "").is_resolved());
        }

        #[test]
        fn released_colors_leave_the_perimeter() {
            let mut colors = area("ABAB", "");
            colors.release_shared(&BTreeSet::from_iter(affs("AB")), &BTreeSet::from([aff('A')]));
            assert!(colors.perimeter_colors.is_empty());
            assert_eq!(colors.original_perimeter_colors, affs("ABAB"));
            assert_eq!(colors.line_colors, BTreeSet::from([aff('A')]));
            assert!(colors.is_resolved());

            let mut colors = area("RBRB", "");
            colors.release_shared(&BTreeSet::from([aff('B')]), &BTreeSet::new());
            assert_eq!(colors.perimeter_colors, affs("RR"));
            assert!(colors.line_colors.is_empty());
        }

        #[test]
        fn singles_resolve_across_shared_walls() {
            let board = square("---B--\n-B-G--\n---G--\n---R-R");
            let orderings = board.open_areas().unwrap().iter().map(|area| board.area_colors(area)).collect_vec();
            assert_eq!(orderings.len(), 2);

            let simplified = simplify_edge_color_orderings(&orderings);
            assert!(simplified.iter().all(|colors| colors.perimeter_colors.is_empty()));
            assert!(simplified.iter().all(AreaColors::is_resolved));
        }

        #[test]
        fn line_less_areas() {
            let board = square("--B####\n---G###\n-G-----\n-Y---Bb\n----Y--");
            let orderings = board.open_areas().unwrap().iter().map(|area| board.area_colors(area)).collect_vec();
            assert_eq!(orderings.len(), 2);

            let simplified = simplify_edge_color_orderings(&orderings);
            assert_eq!(simplified[0].line_colors, BTreeSet::from_iter(affs("BGY")));
            assert!(simplified[1].line_colors.is_empty());
            assert!(!simplified[1].is_resolved());
        }
    }

    mod validity {
        use super::*;

        #[test]
        fn crossed_endpoints() {
            assert!(!square("B-Y\n---\nY-B").is_valid_partial().unwrap());
        }

        #[test]
        fn open_board() {
            assert!(square("O-Y-G\n--y--\nO-Y-G").is_valid_partial().unwrap());
            assert!(square("Y---\nB-BY").is_valid_partial().unwrap());
        }

        #[test]
        fn closed_loop() {
            assert!(!square("Aaa-\n-aa-\n---A").is_valid_partial().unwrap());
        }

        #[test]
        fn cut_off() {
            assert!(!square("A-#-A").is_valid_partial().unwrap());
            assert!(!square("ObB\nBbY\nOYy").is_valid_partial().unwrap());
        }

        #[test]
        fn unreachable_area() {
            assert!(!square("A--A\n####\n----").is_valid_partial().unwrap());
        }

        #[test]
        fn only_move() {
            let board = square("---\n-B-\n---\nYBY");
            assert_eq!(board.valid_moves_from(Position(1, 1)).unwrap(), vec![(SquareStep::Down, Position(1, 2))]);
        }

        #[test]
        fn tails_shared_by_two_areas() {
            let board = square("---B\n-BA-\nA---");
            assert!(board.is_valid_partial().unwrap());
            assert_eq!(board.is_completable(), Ok(true));
        }

        #[test]
        fn neighboring_lines_stay_open() {
            let board = square("---B\nb--Y\nBY##");
            assert_eq!(board.valid_moves_from(Position(0, 1)).unwrap(), vec![(SquareStep::Up, Position(0, 0))]);
        }

        #[test]
        fn corners_are_not_closed_off() {
            // going down would trap the bottom right corner behind three tails whose partners are all elsewhere
            let board = square("Cc--rrR\nO-OCRbB\n-----bG\n------g\n-G-----\n-Y---B-\n----Y--");
            assert_eq!(board.valid_moves_from(Position(6, 3)).unwrap(), vec![(SquareStep::Left, Position(5, 3))]);

            let board = square("CcccrrR\nOoOCRbB\n--bbbbG\n---gggg\n-G-----\n-Y---B-\n----Y--");
            assert_eq!(
                board.valid_moves_from(Position(5, 5)).unwrap(),
                vec![(SquareStep::Down, Position(5, 6)), (SquareStep::Left, Position(4, 5))]
            );
        }
    }

    mod solving {
        use crate::solver::SolverConfig;

        use super::*;

        #[test]
        fn one_gap() {
            let outcome = square("O-O").solve().unwrap();
            assert!(outcome.is_complete);
            assert_eq!(outcome.attempts, 0);
            assert_eq!(outcome.board.to_string(), "OoO");
        }

        #[test]
        fn two_lines() {
            let outcome = square("Y---\nB-BY").solve().unwrap();
            assert!(outcome.is_complete);
            assert_eq!(outcome.board.to_string(), "Yyyy\nBbBY");
        }

        #[test]
        fn wrap_around() {
            let outcome = square("---\n-B-\n---\nYBY").solve().unwrap();
            assert!(outcome.is_complete);
            assert_eq!(outcome.board.to_string(), "yyy\nyBy\nyby\nYBY");
        }

        #[test]
        fn choiceless_moves_are_logged() {
            let mut board = square("O--O");
            let commits = board.solve_choiceless_moves().unwrap();
            assert_eq!(commits, vec![(Position(1, 0), aff('O')), (Position(2, 0), aff('O'))]);
            assert_eq!(board.to_string(), "OooO");
        }

        #[test]
        fn straight_rows() {
            let outcome = square("A-A\nB-B\nC-C").solve().unwrap();
            assert!(outcome.is_complete);
            assert_eq!(outcome.board.to_string(), "AaA\nBbB\nCcC");
        }

        #[test]
        fn classic_level() {
            let outcome = square("A-B-D\n--C-E\n-----\n-B-D-\n-ACE-").solve().unwrap();
            assert!(outcome.is_complete);
            assert_eq!(outcome.board.to_string(), "AbBdD\nabCdE\nabcde\naBcDe\naACEe");
        }

        #[test]
        fn budget() {
            let config = SolverConfig::default();
            assert_eq!(config.max_attempts, 4096);

            // a single color can never fill a block without touching itself, but nothing here can tell yet
            let text = "A--\n---\n--A";
            let outcome = square(text).solve_with(&config.with_max_attempts(0)).unwrap();
            assert!(!outcome.is_complete);
            assert_eq!(outcome.attempts, 0);
            assert_eq!(outcome.board.to_string(), text);
        }

        #[test]
        fn hopeless() {
            let outcome = square("B-Y\n---\nY-B").solve().unwrap();
            assert!(!outcome.is_complete);
            assert_eq!(outcome.attempts, 0);
        }

        #[test]
        fn diagonal_endpoints() {
            let outcome = square("---B\n-BA-\nA---").solve().unwrap();
            assert!(outcome.is_complete);
            assert_eq!(outcome.board.to_string(), "aaaB\naBAb\nAbbb");

            let outcome = square("A---\n--B-\n-A--\n---B").solve().unwrap();
            assert!(outcome.is_complete);
            assert!(outcome.board.is_complete());
        }
    }

    mod paths {
        use crate::search::{find_path, NonColliding, Path, SearchLimits};
        use crate::color::Color;

        use super::*;

        #[test]
        fn straight_line() {
            let board = square("A---A");
            let policy = NonColliding { color: Color::Line(aff('A')) };
            let path = find_path(&board, Position(0, 0), Position(4, 0), &policy, &SearchLimits::default()).unwrap();
            assert_eq!(path, Path((0..5).map(|x| Position(x, 0)).collect_vec()));
            assert_eq!(path.render(&board), "@@@@@");
        }

        #[test]
        fn connect_without_collisions() {
            let mut board = square("A---A");
            assert!(board.connect_path_to_position(Position(0, 0), Position(4, 0), aff('A')));
            assert_eq!(board.to_string(), "AaaaA");
            assert!(board.is_complete());

            let mut blocked = square("A-#-A");
            assert!(!blocked.connect_path_to_position(Position(0, 0), Position(4, 0), aff('A')));
            assert_eq!(blocked.to_string(), "A-#-A");

            let mut wrong_start = square("A---A");
            assert!(!wrong_start.connect_path_to_position(Position(1, 0), Position(4, 0), aff('A')));
        }

        #[test]
        fn expansion_budget() {
            let mut board = square("A---\n----\n----\n---A");
            let limits = SearchLimits { max_expansions: 1 };
            assert!(!board.connect_path_to_position_with(Position(0, 0), Position(3, 3), aff('A'), &limits));
            assert_eq!(board.empty_count(), 14);
        }

        #[test]
        fn render_path() {
            let board = square("---\n---");
            assert_eq!(Path(vec![Position(0, 0), Position(1, 0), Position(1, 1)]).render(&board), "@@-\n-@-");
        }

        #[test]
        fn pushing_reroutes_the_displaced_line() {
            let mut board = square("AbbbA\n-B-B-\n-----");
            assert!(board.connect_path_with_pushing(Position(0, 0), Position(4, 0), aff('A'), &[]));
            assert_eq!(board.to_string(), "AaaaA\n-BbB-\n-----");
        }

        #[test]
        fn avoided_lines_stay_put() {
            let mut board = square("AbbbA\n-B-B-\n-----");
            assert!(board.connect_path_with_pushing(Position(0, 0), Position(4, 0), aff('A'), &[aff('B')]));
            assert_eq!(board.to_string().lines().next(), Some("AbbbA"));
            assert_eq!(board[Position(1, 1)].color, Color::Line(aff('B')));
            assert_eq!(board[Position(3, 1)].color, Color::Line(aff('B')));
            assert!(board.can_connect(Position(0, 0), Position(4, 0)));
        }

        #[test]
        fn endpoints_do_not_move() {
            let mut board = square("A-B");
            assert!(!board.push_color(Position(2, 0), aff('A'), &[]));
            assert!(board.push_color(Position(0, 0), aff('A'), &[]));
            assert!(board.push_color(Position(1, 0), aff('A'), &[]));
            assert_eq!(board.to_string(), "AaB");
        }

        #[test]
        fn stranded_lines_are_left_broken() {
            let mut board = square("AbbbA\n#B#B#");
            assert!(board.connect_path_with_pushing(Position(0, 0), Position(4, 0), aff('A'), &[]));
            assert_eq!(board.to_string(), "AaaaA\n#B#B#");
            assert!(!board.can_connect(Position(1, 1), Position(3, 1)));
        }
    }

    mod edges {
        use crate::edges::{EdgeError, EdgeMap, EdgeState, EdgeUpdate};

        use super::*;

        #[test]
        fn from_board() {
            let board = square("Aa-\n#--");
            let edges = EdgeMap::from_board(&board);

            let around = edges.edges_of(Position(1, 0));
            assert_eq!(around.iter().map(|(neighbor, _)| *neighbor).collect_vec(), vec![Position(2, 0), Position(1, 1), Position(0, 0)]);
            assert!(around[0].1.is_possible() && !around[0].1.is_connected());
            assert!(around[2].1.is_connected());

            let wall = edges.get_edge(Position(0, 0), Position(0, 1)).unwrap();
            assert!(!wall.is_possible());
        }

        #[test]
        fn edge_counts() {
            let edges = EdgeMap::<SquareStep>::with_dims((3, 3));
            assert_eq!(edges.edge_ids_for_cell(Position(1, 1)).len(), 4);
            assert_eq!(edges.edge_ids_for_cell(Position(0, 0)).len(), 2);
            assert_eq!(edges.edge_ids_for_cell(Position(1, 0)).len(), 3);
        }

        #[test]
        fn set_edges() {
            let mut edges = EdgeMap::<SquareStep>::with_dims((3, 3));
            assert_eq!(edges.get_edge(Position(0, 0), Position(0, 1)), Some(EdgeState::default()));
            assert_eq!(edges.get_edge(Position(0, 0), Position(1, 1)), None);

            let connected = edges.set_edge(Position(0, 1), Position(0, 0), EdgeUpdate { connected: Some(true), ..Default::default() }).unwrap();
            assert!(connected.is_connected() && connected.is_possible());
            assert_eq!(edges.get_edge(Position(0, 0), Position(0, 1)), Some(connected));

            assert_eq!(
                edges.set_edge(Position(0, 0), Position(0, 1), EdgeUpdate { possible: Some(false), ..Default::default() }),
                Err(EdgeError::ConnectedImpossible(Position(0, 0), Position(0, 1)))
            );
            assert_eq!(
                edges.set_edge(Position(0, 0), Position(2, 2), EdgeUpdate::default()),
                Err(EdgeError::NotAdjacent(Position(0, 0), Position(2, 2)))
            );
        }

        #[test]
        fn impossible_edges() {
            let mut edges = EdgeMap::<SquareStep>::with_dims((3, 3));
            let center = Position(1, 1);
            let connect = EdgeUpdate { connected: Some(true), ..Default::default() };

            edges.set_edge(center, Position(1, 0), connect).unwrap();
            edges.mark_impossible_edges(center);
            assert!(edges.edges_of(center).iter().all(|(_, state)| state.is_possible()));

            edges.set_edge(center, Position(2, 1), connect).unwrap();
            edges.mark_impossible_edges(center);
            let possible = edges.edges_of(center)
                .into_iter()
                .filter(|(_, state)| state.is_possible())
                .map(|(neighbor, _)| neighbor)
                .collect_vec();
            assert_eq!(possible, vec![Position(1, 0), Position(2, 1)]);
        }
    }

    mod exact {
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::{Rng, SeedableRng};

        use crate::color::{Color, ENDPOINT_COLORS};
        use crate::exact::SolverFailure;
        use crate::solver::SolverConfig;

        use super::*;

        // cover an empty board with random lines that never touch themselves, returning the board and each line in order
        fn random_solution(rng: &mut StdRng, width: usize, height: usize) -> (Board<SquareStep>, Vec<Vec<Position>>) {
            'attempt: loop {
                let mut board = square(&vec!["-".repeat(width); height].join("\n"));
                let mut order = board.iterate_cells().map(|cell| cell.position).collect_vec();
                order.shuffle(rng);

                let mut lines: Vec<Vec<Position>> = Vec::new();
                for start in order {
                    if !board[start].is_empty() {
                        continue;
                    }

                    let color = Color::Line(aff(ENDPOINT_COLORS.chars().nth(lines.len()).unwrap()));
                    board.set_color(start, color).unwrap();
                    let mut line = vec![start];
                    while line.len() < 2 || rng.gen_bool(0.85) {
                        let last = *line.last().unwrap();
                        let options = board.empty_neighbor_cells(last)
                            .map(|cell| cell.position)
                            .filter(|next| board.neighbor_cells(*next).all(|cell| cell.color != color || cell.position == last))
                            .collect_vec();
                        let Some(next) = options.choose(rng) else {
                            break;
                        };
                        board.set_color(*next, color).unwrap();
                        line.push(*next);
                    }
                    if line.len() < 2 {
                        continue 'attempt;
                    }

                    board[line[0]].is_endpoint = true;
                    board[line[line.len() - 1]].is_endpoint = true;
                    lines.push(line);
                }

                assert!(board.is_complete(), "\n{}", board);
                return (board, lines);
            }
        }

        #[test]
        fn matches_search() {
            for (text, solved) in [("O-O", "OoO"), ("Y---\nB-BY", "Yyyy\nBbBY"), ("A-A\nB-B\nC-C", "AaA\nBbB\nCcC")] {
                assert_eq!(square(text).solve_exact().unwrap().to_string(), solved);
            }
        }

        #[test]
        fn lines_never_touch_themselves() {
            assert_eq!(square("A--\n---\n--A").is_completable(), Ok(false));
            assert_eq!(square("A-\n-A").is_completable(), Ok(false));
            assert_eq!(square("A-\nA-").is_completable(), Ok(false));
        }

        #[test]
        fn failures() {
            assert_eq!(square("B-Y\n---\nY-B").is_completable(), Ok(false));
            assert_eq!(square("A-#-A").solve_exact(), Err(SolverFailure::Inconsistent));
            assert_eq!(square("A?A").solve_exact(), Err(SolverFailure::UnknownCell(Position(1, 0))));
            assert_eq!(square("---").solve_exact(), Err(SolverFailure::Inconsistent));
            assert_eq!(square("#").is_completable(), Ok(true));
        }

        #[test]
        fn rejected_boards_cannot_be_completed() {
            for text in ["B-Y\n---\nY-B", "A-#-A", "Aaa-\n-aa-\n---A", "ObB\nBbY\nOYy", "A--A\n####\n----"] {
                let board = square(text);
                assert!(!board.is_valid_partial().unwrap());
                assert_eq!(board.is_completable(), Ok(false), "{}", text);
            }
        }

        #[test]
        fn classic_five_by_five() {
            let board = square("A-B-D\n--C-E\n-----\n-B-D-\n-ACE-");
            assert_eq!(board.solve_exact().unwrap().to_string(), "AbBdD\nabCdE\nabcde\naBcDe\naACEe");
        }

        #[test]
        fn search_agrees_with_exact() {
            let mut rng = StdRng::seed_from_u64(17);
            for _ in 0..30 {
                let (width, height) = (rng.gen_range(2..=4), rng.gen_range(3..=4));
                let mut cells = vec!['-'; width * height];
                let spots = rand::seq::index::sample(&mut rng, width * height, 5).into_vec();
                for (spot, c) in spots.iter().zip("AABB#".chars()) {
                    cells[*spot] = c;
                }
                if rng.gen_bool(0.5) {
                    cells[spots[4]] = '-';
                }
                let text = cells.chunks(width).map(|row| row.iter().collect::<String>()).join("\n");

                let board = square(&text);
                let exact = board.solve_exact();
                match &exact {
                    Ok(solved) => assert!(solved.is_complete(), "{}", text),
                    Err(failure) => assert_eq!(*failure, SolverFailure::Inconsistent),
                }

                let outcome = board.solve_with(&SolverConfig::default().with_max_attempts(200)).unwrap();
                if outcome.is_complete {
                    assert!(outcome.board.is_complete());
                    assert!(exact.is_ok(), "{}", text);
                }
            }
        }

        #[test]
        fn partial_solutions_are_never_rejected() {
            let mut rng = StdRng::seed_from_u64(29);
            for _ in 0..30 {
                let (width, height) = (rng.gen_range(3..=5), rng.gen_range(3..=5));
                let (solution, lines) = random_solution(&mut rng, width, height);

                let mut puzzle = solution.clone();
                for line in &lines {
                    for position in &line[1..line.len() - 1] {
                        puzzle.set_color(*position, Color::Empty).unwrap();
                    }
                }
                assert_eq!(puzzle.is_completable(), Ok(true), "\n{}", puzzle);

                // draw every line partway in from both of its endpoints
                for _ in 0..8 {
                    let mut partial = puzzle.clone();
                    for line in &lines {
                        let inner = &line[1..line.len() - 1];
                        let cut = rng.gen_range(0..=inner.len());
                        let resume = rng.gen_range(cut..=inner.len());
                        for position in inner[..cut].iter().chain(&inner[resume..]) {
                            partial.set_color(*position, solution[*position].color).unwrap();
                        }
                    }
                    assert_eq!(partial.is_valid_partial(), Ok(true), "\n{}", partial);
                }

                let outcome = puzzle.solve().unwrap();
                assert!(outcome.is_complete, "\n{}", puzzle);
            }
        }
    }

    mod builder {
        use crate::builder::{BoardBuilder, BuilderInvalidReason};

        use super::*;

        fn dims(width: usize, height: usize) -> (NonZero<usize>, NonZero<usize>) {
            (NonZero::new(width).unwrap(), NonZero::new(height).unwrap())
        }

        #[test]
        fn remove_termini() {
            let board = BoardBuilder::with_dims(dims(5, 5))
                .add_termini('A', (Position(0, 0), Position(1, 4)))
                .pop_termini()
                .build::<SquareStep>()
                .unwrap();

            assert_eq!(format!("{}", board), "-----
-----
-----
-----
-----");
        }

        #[test]
        fn features() {
            let board = BoardBuilder::with_dims(dims(3, 2))
                .add_termini('a', (Position(0, 0), Position(2, 1)))
                .add_wall(Position(1, 0))
                .build::<SquareStep>()
                .unwrap();

            assert_eq!(board.to_string(), "A#-\n--A");
            assert!(board[Position(2, 1)].is_endpoint);
        }

        #[test]
        fn invalid() {
            let mut builder = BoardBuilder::with_dims(dims(3, 3));
            builder.add_termini('A', (Position(0, 0), Position(3, 0)));
            assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::FeatureOutOfBounds]));
            assert!(builder.build::<SquareStep>().is_err());

            let mut builder = BoardBuilder::default();
            builder.add_termini('1', (Position(0, 0), Position(1, 0)));
            assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::NotALetter]));
            // invalid builders ignore everything after
            builder.add_wall(Position(9, 9));
            assert_eq!(builder.is_valid().map(Vec::len), Some(1));
        }

        #[test]
        fn solve_most_basic() {
            // flow free classic pack level 1
            let board = BoardBuilder::with_dims(dims(5, 5))
                .add_termini('A', (Position(0, 0), Position(1, 4)))
                .add_termini('B', (Position(2, 0), Position(1, 3)))
                .add_termini('C', (Position(2, 1), Position(2, 4)))
                .add_termini('D', (Position(4, 0), Position(3, 3)))
                .add_termini('E', (Position(4, 1), Position(3, 4)))
                .build::<SquareStep>()
                .unwrap();

            assert_eq!(format!("{}", board), "A-B-D
--C-E
-----
-B-D-
-ACE-");

            let solved = board.solve_exact().unwrap();
            assert_eq!(format!("{}", solved), "AbBdD
abCdE
abcde
aBcDe
aACEe");
        }
    }

    #[cfg(feature = "wasm")]
    mod wasm {
        use crate::wasm::WasmBoard;

        #[test]
        fn editing_session() {
            let Ok(mut board) = WasmBoard::new("O--O\n----") else {
                panic!("board should parse");
            };
            assert_eq!(board.width(), 4);
            assert_eq!(board.get_color(0, 0), Some('O'));
            assert_eq!(board.get_color(7, 0), None);
            assert!(matches!(board.connect_path_to_position(0, 0, 3, 0, 'O'), Ok(true)));
            assert_eq!(board.to_text(), "OooO\n----");
            assert!(matches!(board.is_valid_partial(), Ok(false)));
        }
    }
}
