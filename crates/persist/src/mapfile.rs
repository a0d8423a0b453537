//! Plain-text map format.
//!
//! ```text
//! 1                      start x
//! 2                      start y
//! Bob                    builder name
//! wood,soil              inventory (may be empty)
//!
//! total:3
//! 0 grass,soil,wood      tile 0 stands at the start position
//! 1 soil
//! 2
//!
//! exits
//! 0 north:1,east:2
//! 1 south:0
//! 2 west:0
//! ```
//!
//! Tile positions are derived from the exits: an exit `d` from tile `a` to
//! tile `b` puts `b` one step from `a` in direction `d`.

use crate::error::StoreError;
use blockworld_common::{BlockKind, Direction, GridPosition};
use blockworld_kernel::{BlockProperties, BlockWorld, Tile, TileId, WorldModel};
use std::collections::{BTreeMap, VecDeque};

/// Line cursor that remembers where it is for error messages.
struct Cursor<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            line: 0,
        }
    }

    fn optional(&mut self) -> Option<(usize, &'a str)> {
        let (i, text) = self.lines.next()?;
        self.line = i + 1;
        Some((self.line, text.trim_end()))
    }

    fn expect(&mut self, what: &str) -> Result<(usize, &'a str), StoreError> {
        let after = self.line + 1;
        self.optional()
            .ok_or_else(|| StoreError::parse(after, format!("expected {what}, found end of file")))
    }

    fn expect_blank(&mut self) -> Result<(), StoreError> {
        let (line, text) = self.expect("a blank line")?;
        if !text.trim().is_empty() {
            return Err(StoreError::parse(line, "expected a blank line"));
        }
        Ok(())
    }
}

/// Parse a map file into a world with the builder on tile 0.
pub fn parse_map(text: &str) -> Result<BlockWorld, StoreError> {
    let mut cursor = Cursor::new(text);

    let x = parse_coord(&mut cursor, "start x")?;
    let y = parse_coord(&mut cursor, "start y")?;
    let start = GridPosition::new(x, y);

    let (line, name) = cursor.expect("builder name")?;
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::parse(line, "builder name is empty"));
    }

    let (line, text) = cursor.expect("inventory")?;
    let inventory = parse_blocks(line, text)?;
    if let Some(kind) = inventory
        .iter()
        .find(|k| !BlockProperties::of(**k).carryable)
    {
        return Err(StoreError::parse(line, format!("builder cannot carry {kind}")));
    }
    cursor.expect_blank()?;

    let (line, text) = cursor.expect("`total:<count>`")?;
    let count: usize = text
        .trim()
        .strip_prefix("total:")
        .and_then(|n| n.trim().parse().ok())
        .ok_or_else(|| StoreError::parse(line, "expected `total:<count>`"))?;
    if count == 0 {
        return Err(StoreError::parse(line, "map has no tiles"));
    }

    let mut stacks = Vec::with_capacity(count);
    for expected in 0..count {
        let (line, text) = cursor.expect("a tile line")?;
        let (id, rest) = split_id(line, text)?;
        if id != expected {
            return Err(StoreError::parse(
                line,
                format!("expected tile {expected}, found {id}"),
            ));
        }
        stacks.push((line, parse_blocks(line, rest)?));
    }
    cursor.expect_blank()?;

    let (line, text) = cursor.expect("`exits`")?;
    if text.trim() != "exits" {
        return Err(StoreError::parse(line, "expected `exits`"));
    }
    let mut exits: Vec<Option<Vec<(Direction, usize)>>> = vec![None; count];
    while let Some((line, text)) = cursor.optional() {
        if text.trim().is_empty() {
            continue;
        }
        let (id, rest) = split_id(line, text)?;
        let slot = exits
            .get_mut(id)
            .ok_or_else(|| StoreError::parse(line, format!("unknown tile {id}")))?;
        if slot.is_some() {
            return Err(StoreError::parse(line, format!("exits for tile {id} listed twice")));
        }
        *slot = Some(parse_exits(line, rest, count)?);
    }
    let exits: Vec<Vec<(Direction, usize)>> =
        exits.into_iter().map(Option::unwrap_or_default).collect();

    let positions = layout(start, &exits)?;
    let tiles = stacks
        .into_iter()
        .zip(positions)
        .map(|((line, blocks), pos)| {
            Tile::new(pos, blocks).map_err(|e| StoreError::parse(line, e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut tiles = tiles.into_iter();
    let Some(first) = tiles.next() else {
        return Err(StoreError::Inconsistent("map has no tiles".into()));
    };
    let mut world = BlockWorld::new(name, first);
    for tile in tiles {
        world.add_tile(tile)?;
    }
    for (from, list) in exits.iter().enumerate() {
        for &(direction, to) in list {
            world.add_exit(TileId(from), direction, TileId(to))?;
        }
    }
    world.set_inventory(inventory);
    Ok(world)
}

/// Render a world in the map text format. The builder's current tile becomes
/// tile 0 and the start position; the other tiles are numbered breadth-first.
pub fn write_map(world: &BlockWorld) -> Result<String, StoreError> {
    let order = traversal_order(world)?;
    let renumber: BTreeMap<TileId, usize> = order
        .iter()
        .enumerate()
        .map(|(new, old)| (*old, new))
        .collect();

    let start = world.builder_position();
    let mut out = String::new();
    out.push_str(&format!("{}\n{}\n", start.x, start.y));
    out.push_str(&format!("{}\n", world.builder().name));
    out.push_str(&format!("{}\n\n", join_blocks(world.inventory())));

    out.push_str(&format!("total:{}\n", order.len()));
    for (new, old) in order.iter().enumerate() {
        let blocks = join_blocks(world.blocks(*old));
        if blocks.is_empty() {
            out.push_str(&format!("{new}\n"));
        } else {
            out.push_str(&format!("{new} {blocks}\n"));
        }
    }

    out.push_str("\nexits\n");
    for (new, old) in order.iter().enumerate() {
        let exits: Vec<String> = Direction::ALL
            .into_iter()
            .filter_map(|d| {
                let dest = world.exit(*old, d)?;
                Some(format!("{}:{}", d.name(), renumber[&dest]))
            })
            .collect();
        if exits.is_empty() {
            out.push_str(&format!("{new}\n"));
        } else {
            out.push_str(&format!("{new} {}\n", exits.join(",")));
        }
    }
    Ok(out)
}

fn parse_coord(cursor: &mut Cursor<'_>, what: &str) -> Result<i32, StoreError> {
    let (line, text) = cursor.expect(what)?;
    text.trim()
        .parse()
        .map_err(|_| StoreError::parse(line, format!("{what} is not an integer: {text:?}")))
}

fn split_id(line: usize, text: &str) -> Result<(usize, &str), StoreError> {
    let text = text.trim();
    let (id, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let id = id
        .parse()
        .map_err(|_| StoreError::parse(line, format!("bad tile id {id:?}")))?;
    Ok((id, rest))
}

fn parse_blocks(line: usize, text: &str) -> Result<Vec<BlockKind>, StoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|tag| tag.parse().map_err(|e: blockworld_common::ParseBlockKindError| {
            StoreError::parse(line, e.to_string())
        }))
        .collect()
}

fn parse_exits(
    line: usize,
    text: &str,
    count: usize,
) -> Result<Vec<(Direction, usize)>, StoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let mut exits: Vec<(Direction, usize)> = Vec::new();
    for entry in text.split(',') {
        let (dir, id) = entry
            .trim()
            .split_once(':')
            .ok_or_else(|| StoreError::parse(line, format!("bad exit {entry:?}")))?;
        let direction: Direction = dir
            .parse()
            .map_err(|e: blockworld_common::ParseDirectionError| {
                StoreError::parse(line, e.to_string())
            })?;
        let id: usize = id
            .trim()
            .parse()
            .map_err(|_| StoreError::parse(line, format!("bad tile id {id:?}")))?;
        if id >= count {
            return Err(StoreError::parse(line, format!("unknown tile {id}")));
        }
        if exits.iter().any(|(d, _)| *d == direction) {
            return Err(StoreError::parse(line, format!("two exits to the {direction}")));
        }
        exits.push((direction, id));
    }
    Ok(exits)
}

/// Assign a grid position to every tile by walking the exit graph from tile 0.
/// Exits are followed both ways so one-way passages still place their source.
fn layout(
    start: GridPosition,
    exits: &[Vec<(Direction, usize)>],
) -> Result<Vec<GridPosition>, StoreError> {
    let mut adjacency: Vec<Vec<(usize, Direction)>> = vec![Vec::new(); exits.len()];
    for (from, list) in exits.iter().enumerate() {
        for &(direction, to) in list {
            adjacency[from].push((to, direction));
            adjacency[to].push((from, direction.opposite()));
        }
    }

    let mut positions: Vec<Option<GridPosition>> = vec![None; exits.len()];
    positions[0] = Some(start);
    let mut queue = VecDeque::from([0usize]);
    while let Some(id) = queue.pop_front() {
        let Some(here) = positions[id] else {
            continue;
        };
        for &(next, direction) in &adjacency[id] {
            let expected = here.step(direction).ok_or_else(|| {
                StoreError::Inconsistent(format!(
                    "tile {next} would sit {direction} of {here}, off the grid"
                ))
            })?;
            match positions[next] {
                None => {
                    positions[next] = Some(expected);
                    queue.push_back(next);
                }
                Some(placed) if placed != expected => {
                    return Err(StoreError::Inconsistent(format!(
                        "tile {next} would sit at both {placed} and {expected}"
                    )));
                }
                Some(_) => {}
            }
        }
    }

    positions
        .into_iter()
        .enumerate()
        .map(|(id, pos)| {
            pos.ok_or_else(|| {
                StoreError::Inconsistent(format!("tile {id} is not connected to the start tile"))
            })
        })
        .collect()
}

/// Breadth-first tile order from the builder's tile over exits in both
/// directions.
fn traversal_order(world: &BlockWorld) -> Result<Vec<TileId>, StoreError> {
    let count = world.tile_count();
    let mut adjacency: Vec<Vec<TileId>> = vec![Vec::new(); count];
    for (i, tile) in world.tiles().iter().enumerate() {
        for dest in tile.exits().values() {
            adjacency[i].push(*dest);
            adjacency[dest.0].push(TileId(i));
        }
    }

    let root = world.builder_tile();
    let mut seen = vec![false; count];
    seen[root.0] = true;
    let mut order = vec![root];
    let mut queue = VecDeque::from([root]);
    while let Some(id) = queue.pop_front() {
        for next in &adjacency[id.0] {
            if !seen[next.0] {
                seen[next.0] = true;
                order.push(*next);
                queue.push_back(*next);
            }
        }
    }

    if let Some(lost) = seen.iter().position(|s| !s) {
        let pos = world.tiles()[lost].position();
        return Err(StoreError::Inconsistent(format!(
            "tile at {pos} is not connected to the builder"
        )));
    }
    Ok(order)
}

fn join_blocks(blocks: &[BlockKind]) -> String {
    blocks.iter().map(|k| k.tag()).collect::<Vec<_>>().join(",")
}
