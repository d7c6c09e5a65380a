use crate::game::types::Direction;
use rand::Rng;
use rand::seq::IteratorRandom;

/// Number of empty rows at the top of every level (player spawn / sky)
pub const SKY_ROWS: i32 = 3;

/// One cell of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Dirt,
    Rock,
    Tunnel,
    Bonus,
}

/// The tile matrix the whole simulation runs on.
///
/// All coordinate-taking methods treat out-of-bounds positions as a defined
/// negative outcome (None / no-op / false) rather than an error.
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let mut grid = Grid {
            tiles: Vec::new(),
            width,
            height,
        };
        grid.initialize();
        grid
    }

    /// Reset to the starting layout: sky rows empty, everything else dirt
    pub fn initialize(&mut self) {
        self.tiles = (0..self.height)
            .map(|y| {
                let fill = if y < SKY_ROWS { Tile::Empty } else { Tile::Dirt };
                vec![fill; self.width as usize]
            })
            .collect();
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Option<Tile> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.tiles[y as usize][x as usize])
    }

    /// Silent no-op for out-of-bounds positions
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            self.tiles[y as usize][x as usize] = tile;
        }
    }

    /// True iff the tile can be occupied without digging
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        matches!(self.get_tile(x, y), Some(Tile::Empty) | Some(Tile::Tunnel))
    }

    pub fn is_diggable(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y) == Some(Tile::Dirt)
    }

    /// Convert dirt to tunnel. Returns false (and changes nothing) for any
    /// other tile, including out-of-bounds.
    pub fn dig(&mut self, x: i32, y: i32) -> bool {
        if self.is_diggable(x, y) {
            self.set_tile(x, y, Tile::Tunnel);
            return true;
        }
        false
    }

    /// A cell is supported if it sits on the bottom row or the cell below is
    /// solid (dirt or rock).
    pub fn has_support(&self, x: i32, y: i32) -> bool {
        if y >= self.height - 1 {
            return true;
        }
        !matches!(
            self.get_tile(x, y + 1),
            Some(Tile::Empty) | Some(Tile::Tunnel) | None
        )
    }

    /// Reset and carve `2 + level` random horizontal tunnels. Always succeeds;
    /// tunnels may overlap.
    pub fn generate_level(&mut self, level: u32, rng: &mut impl Rng) {
        self.initialize();

        let tunnel_count = 2 + level;
        for _ in 0..tunnel_count {
            self.carve_random_tunnel(rng);
        }
    }

    fn carve_random_tunnel(&mut self, rng: &mut impl Rng) {
        let y = rng.random_range(5..self.height - 3);
        let start_x = rng.random_range(0..=self.width - 10);
        let length = rng.random_range(5..=15);

        for x in start_x..(start_x + length).min(self.width) {
            if self.get_tile(x, y) == Some(Tile::Dirt) {
                self.set_tile(x, y, Tile::Tunnel);
            }
        }
    }

    /// Random dirt cell below the sky rows, for spawn placement. Falls back to
    /// the grid center if no dirt exists anywhere (unreachable with normal
    /// level generation, but placement must never fail).
    pub fn find_random_dirt_position(&self, rng: &mut impl Rng) -> (i32, i32) {
        (SKY_ROWS..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get_tile(x, y) == Some(Tile::Dirt))
            .choose(rng)
            .unwrap_or((self.width / 2, self.height / 2))
    }

    /// Neighbor cell in the given direction, if it exists
    pub fn neighbor(&self, x: i32, y: i32, direction: Direction) -> Option<(i32, i32)> {
        let (dx, dy) = direction.vector();
        let (nx, ny) = (x + dx, y + dy);
        self.in_bounds(nx, ny).then_some((nx, ny))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_initial_layout() {
        let grid = Grid::new(14, 15);
        for y in 0..15 {
            for x in 0..14 {
                let expected = if y < SKY_ROWS { Tile::Empty } else { Tile::Dirt };
                assert_eq!(grid.get_tile(x, y), Some(expected));
            }
        }
    }

    #[test]
    fn test_get_after_set_in_bounds() {
        let mut grid = Grid::new(14, 15);
        grid.set_tile(5, 7, Tile::Rock);
        assert_eq!(grid.get_tile(5, 7), Some(Tile::Rock));
    }

    #[test]
    fn test_out_of_bounds_set_is_a_no_op() {
        let mut grid = Grid::new(14, 15);
        grid.set_tile(-1, 5, Tile::Rock);
        grid.set_tile(14, 5, Tile::Rock);
        grid.set_tile(5, 15, Tile::Rock);
        assert_eq!(grid.get_tile(-1, 5), None);
        assert_eq!(grid.get_tile(14, 5), None);
        assert_eq!(grid.get_tile(5, 15), None);
        // No in-bounds cell changed
        assert_eq!(grid.get_tile(0, 5), Some(Tile::Dirt));
        assert_eq!(grid.get_tile(13, 5), Some(Tile::Dirt));
    }

    #[test]
    fn test_dig_only_succeeds_on_dirt() {
        let mut grid = Grid::new(14, 15);
        assert!(grid.dig(4, 6));
        assert_eq!(grid.get_tile(4, 6), Some(Tile::Tunnel));

        // Already a tunnel now
        assert!(!grid.dig(4, 6));
        assert_eq!(grid.get_tile(4, 6), Some(Tile::Tunnel));

        // Sky, rock and out-of-bounds all fail without mutation
        assert!(!grid.dig(4, 0));
        grid.set_tile(8, 8, Tile::Rock);
        assert!(!grid.dig(8, 8));
        assert_eq!(grid.get_tile(8, 8), Some(Tile::Rock));
        assert!(!grid.dig(-3, 2));
    }

    #[test]
    fn test_walkable_tiles() {
        let mut grid = Grid::new(14, 15);
        assert!(grid.is_walkable(0, 0)); // sky
        assert!(!grid.is_walkable(0, 5)); // dirt
        grid.dig(0, 5);
        assert!(grid.is_walkable(0, 5)); // tunnel
        grid.set_tile(1, 5, Tile::Rock);
        assert!(!grid.is_walkable(1, 5));
        assert!(!grid.is_walkable(-1, 0)); // off-grid
    }

    #[test]
    fn test_bottom_row_always_has_support() {
        let mut grid = Grid::new(14, 15);
        for x in 0..14 {
            grid.set_tile(x, 14, Tile::Empty);
            assert!(grid.has_support(x, 14));
        }
    }

    #[test]
    fn test_support_depends_on_cell_below() {
        let mut grid = Grid::new(14, 15);
        assert!(grid.has_support(5, 5)); // dirt below
        grid.dig(5, 6);
        assert!(!grid.has_support(5, 5)); // tunnel below
        grid.set_tile(5, 6, Tile::Rock);
        assert!(grid.has_support(5, 5)); // rock below
        grid.set_tile(5, 6, Tile::Empty);
        assert!(!grid.has_support(5, 5));
    }

    #[test]
    fn test_generate_level_keeps_sky_clear_and_carves_tunnels() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(14, 15);
        grid.generate_level(1, &mut rng);

        for y in 0..SKY_ROWS {
            for x in 0..14 {
                assert_eq!(grid.get_tile(x, y), Some(Tile::Empty));
            }
        }

        // Carved tunnels only appear in the allowed row band
        let mut tunnel_rows = Vec::new();
        for y in SKY_ROWS..15 {
            let count = (0..14)
                .filter(|&x| grid.get_tile(x, y) == Some(Tile::Tunnel))
                .count();
            if count > 0 {
                tunnel_rows.push((y, count));
            }
        }
        assert!(!tunnel_rows.is_empty());
        for &(y, count) in &tunnel_rows {
            assert!((5..15 - 3).contains(&y), "tunnel in forbidden row {}", y);
            assert!(count >= 5, "tunnel run shorter than minimum in row {}", y);
        }
    }

    #[test]
    fn test_generate_level_is_idempotent_reset() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::new(14, 15);
        grid.set_tile(2, 10, Tile::Rock);
        grid.generate_level(2, &mut rng);
        // Previous rock wiped by the reset
        assert_ne!(grid.get_tile(2, 10), Some(Tile::Rock));
    }

    #[test]
    fn test_random_dirt_position_returns_dirt() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = Grid::new(14, 15);
        for _ in 0..20 {
            let (x, y) = grid.find_random_dirt_position(&mut rng);
            assert_eq!(grid.get_tile(x, y), Some(Tile::Dirt));
            assert!(y >= SKY_ROWS);
        }
    }

    #[test]
    fn test_random_dirt_position_falls_back_to_center() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut grid = Grid::new(14, 15);
        for y in 0..15 {
            for x in 0..14 {
                grid.set_tile(x, y, Tile::Tunnel);
            }
        }
        assert_eq!(grid.find_random_dirt_position(&mut rng), (7, 7));
    }

    #[test]
    fn test_neighbor_lookup() {
        let grid = Grid::new(14, 15);
        assert_eq!(grid.neighbor(0, 0, Direction::Left), None);
        assert_eq!(grid.neighbor(0, 0, Direction::Right), Some((1, 0)));
        assert_eq!(grid.neighbor(13, 14, Direction::Down), None);
        assert_eq!(grid.neighbor(13, 14, Direction::Up), Some((13, 13)));
    }
}
