//! Linked teleport cells

use serde::{Deserialize, Serialize};

use super::grid::{Arena, Point};

/// One end of a portal link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub position: Point,
    pub destination: Point,
    pub active: bool,
}

/// The session's two bidirectionally linked portals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalPair {
    portals: [Portal; 2],
}

impl PortalPair {
    /// Link two cells in both directions
    pub fn linking(a: Point, b: Point) -> Self {
        Self {
            portals: [
                Portal {
                    position: a,
                    destination: b,
                    active: true,
                },
                Portal {
                    position: b,
                    destination: a,
                    active: true,
                },
            ],
        }
    }

    /// Portals at opposite interior corners: top-left and bottom-right
    pub fn corners(arena: &Arena) -> Self {
        Self::linking(
            Point::new(1, 1),
            Point::new(arena.width - 2, arena.height - 2),
        )
    }

    pub fn portals(&self) -> &[Portal; 2] {
        &self.portals
    }

    pub fn positions(&self) -> [Point; 2] {
        [self.portals[0].position, self.portals[1].position]
    }

    pub fn contains(&self, point: Point) -> bool {
        self.portals.iter().any(|p| p.position == point)
    }

    /// Destination for a head at `head`, first matching portal wins.
    ///
    /// Nothing fires while the snake is already in transit.
    pub fn resolve(&self, head: Point, in_transit: bool) -> Option<Point> {
        if in_transit {
            return None;
        }
        self.portals
            .iter()
            .find(|p| p.active && p.position == head)
            .map(|p| p.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_pair_is_bidirectional() {
        let pair = PortalPair::corners(&Arena::new(20, 20, true));
        assert_eq!(pair.positions(), [Point::new(1, 1), Point::new(18, 18)]);
        assert_eq!(pair.resolve(Point::new(1, 1), false), Some(Point::new(18, 18)));
        assert_eq!(pair.resolve(Point::new(18, 18), false), Some(Point::new(1, 1)));
        assert_eq!(pair.resolve(Point::new(5, 5), false), None);
    }

    #[test]
    fn test_no_teleport_in_transit() {
        let pair = PortalPair::corners(&Arena::new(20, 20, true));
        assert_eq!(pair.resolve(Point::new(1, 1), true), None);
    }

    #[test]
    fn test_list_order_breaks_ties() {
        // Degenerate pair with both ends on one cell
        let cell = Point::new(3, 3);
        let mut pair = PortalPair::linking(cell, cell);
        pair.portals[0].destination = Point::new(4, 4);
        pair.portals[1].destination = Point::new(7, 7);
        assert_eq!(pair.resolve(cell, false), Some(Point::new(4, 4)));
    }
}
