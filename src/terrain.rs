use core::fmt;

/// The closed set of symbols a grid may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    Plain,
    Road,
    Grass,
    Forest,
    Mountain,
    Water,
    Wall,
    Start,
    Goal,
}

const N_TERRAIN: usize = 9;

impl Terrain {
    pub const ALL: [Terrain; N_TERRAIN] = [
        Terrain::Plain,
        Terrain::Road,
        Terrain::Grass,
        Terrain::Forest,
        Terrain::Mountain,
        Terrain::Water,
        Terrain::Wall,
        Terrain::Start,
        Terrain::Goal,
    ];

    pub fn from_symbol(symbol: char) -> Option<Terrain> {
        Some(match symbol {
            '.' => Terrain::Plain,
            'r' => Terrain::Road,
            'g' => Terrain::Grass,
            'f' => Terrain::Forest,
            'm' => Terrain::Mountain,
            'w' => Terrain::Water,
            '#' => Terrain::Wall,
            'A' => Terrain::Start,
            'B' => Terrain::Goal,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Terrain::Plain => '.',
            Terrain::Road => 'r',
            Terrain::Grass => 'g',
            Terrain::Forest => 'f',
            Terrain::Mountain => 'm',
            Terrain::Water => 'w',
            Terrain::Wall => '#',
            Terrain::Start => 'A',
            Terrain::Goal => 'B',
        }
    }

    pub fn is_passable(self) -> bool {
        self != Terrain::Wall
    }

    pub fn is_marker(self) -> bool {
        matches!(self, Terrain::Start | Terrain::Goal)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Cost of entering a cell of each terrain kind. Built once before a grid is
/// loaded and never mutated afterwards; the builder methods consume `self`.
/// Walls never carry a cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostTable {
    costs: [Option<u32>; N_TERRAIN],
}

impl Default for CostTable {
    fn default() -> CostTable {
        CostTable::empty()
            .with_cost(Terrain::Water, 100)
            .with_cost(Terrain::Mountain, 50)
            .with_cost(Terrain::Forest, 10)
            .with_cost(Terrain::Grass, 5)
            .with_cost(Terrain::Road, 1)
            .with_cost(Terrain::Plain, 1)
            .with_cost(Terrain::Start, 0)
            .with_cost(Terrain::Goal, 0)
    }
}

impl CostTable {
    pub fn empty() -> CostTable {
        CostTable {
            costs: [None; N_TERRAIN],
        }
    }

    /// Every passable symbol, start and goal markers included, costs 1. Search
    /// on such a grid minimises the number of steps.
    pub fn uniform() -> CostTable {
        Terrain::ALL
            .into_iter()
            .fold(CostTable::empty(), |table, t| table.with_cost(t, 1))
    }

    /// Registers a cost for `terrain`. Ignored for walls.
    pub fn with_cost(mut self, terrain: Terrain, cost: u32) -> CostTable {
        if terrain.is_passable() {
            self.costs[terrain.index()] = Some(cost);
        }
        self
    }

    pub fn without(mut self, terrain: Terrain) -> CostTable {
        self.costs[terrain.index()] = None;
        self
    }

    pub fn cost(&self, terrain: Terrain) -> Option<u32> {
        self.costs[terrain.index()]
    }
}
