//! Triangular board geometry: coordinate/index conversions, field naming,
//! and the precomputed adjacency table.

use std::sync::OnceLock;

use crate::utils::prelude::*;

/// Side length of the triangular board.
pub const SIZE: usize = 8;

/// Total number of fields on the board.
pub const NUM_FIELDS: usize = SIZE * (SIZE + 1) / 2;

const NO_NEIGHBOUR: u8 = u8::MAX;

/// The six hexagonal adjacency offsets, as (du, dv) pairs.
const NEIGHBOUR_OFFSETS: [(isize, isize); 6] =
    [(-1, 0), (1, 0), (0, -1), (0, 1), (-1, 1), (1, -1)];

static NEIGHBOUR_TABLE: OnceLock<[[u8; 6]; NUM_FIELDS]> = OnceLock::new();

/// Converts (u, v) board coordinates into a 0-based field index.
///
/// Rows are stored in decreasing-length order, so row `u` starts right
/// after the `u` rows before it.
pub fn coords_to_index(u: usize, v: usize) -> usize {
    let u = u as i64;
    let v = v as i64;
    let size = SIZE as i64;
    (size * u - u * (u - 1) / 2 + v) as usize
}

/// Converts a 0-based field index back into (u, v) board coordinates.
pub fn index_to_coords(mut index: usize) -> (usize, usize) {
    let mut u = 0;
    let mut row_len = SIZE;
    while index >= row_len {
        index -= row_len;
        u += 1;
        row_len -= 1;
    }
    (u, index)
}

/// Whether (u, v) names a field on the board.
pub fn are_coords_valid(u: usize, v: usize) -> bool {
    u < SIZE && v < SIZE && u + v < SIZE
}

fn neighbour_table() -> &'static [[u8; 6]; NUM_FIELDS] {
    NEIGHBOUR_TABLE.get_or_init(|| {
        let mut table = [[NO_NEIGHBOUR; 6]; NUM_FIELDS];
        for index in 0..NUM_FIELDS {
            let (u, v) = index_to_coords(index);
            let mut slot = 0;
            for (du, dv) in NEIGHBOUR_OFFSETS {
                let nu = u as isize + du;
                let nv = v as isize + dv;
                if nu >= 0 && nv >= 0 && are_coords_valid(nu as usize, nv as usize) {
                    table[index][slot] = coords_to_index(nu as usize, nv as usize) as u8;
                    slot += 1;
                }
            }
        }
        table
    })
}

/// Iterates the (up to six) in-board neighbours of a field.
pub fn neighbours(field: usize) -> impl Iterator<Item = usize> + 'static {
    neighbour_table()[field]
        .into_iter()
        .take_while(|&n| n != NO_NEIGHBOUR)
        .map(usize::from)
}

/// Formats a field index as its two-character name, e.g. `H1` for (7, 0).
pub fn field_name(field: usize) -> String {
    let (u, v) = index_to_coords(field);
    format!("{}{}", (b'A' + u as u8) as char, v + 1)
}

/// Parses a field name matching `[A-H][1-8]` into a field index.
pub fn parse_field_name(s: &str) -> Result<usize> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return Err(anyhow!("invalid field name {s:?}"));
    }
    let row = bytes[0];
    let col = bytes[1];
    if !row.is_ascii_uppercase() || !(b'1'..=b'9').contains(&col) {
        return Err(anyhow!("invalid field name {s:?}"));
    }
    let u = (row - b'A') as usize;
    let v = (col - b'1') as usize;
    if !are_coords_valid(u, v) {
        return Err(anyhow!("field name {s:?} is out of bounds"));
    }
    Ok(coords_to_index(u, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn index_roundtrips_through_coords() {
        for index in 0..NUM_FIELDS {
            let (u, v) = index_to_coords(index);
            assert!(are_coords_valid(u, v));
            assert_eq!(coords_to_index(u, v), index);
        }
    }

    #[test]
    fn field_name_roundtrips() {
        for index in 0..NUM_FIELDS {
            let name = field_name(index);
            assert_eq!(parse_field_name(&name).unwrap(), index);
        }
        assert_eq!(field_name(35), "H1");
        assert_eq!(index_to_coords(35), (7, 0));
    }

    #[test]
    fn parse_field_name_rejects_garbage() {
        assert!(parse_field_name("").is_err());
        assert!(parse_field_name("a1").is_err());
        assert!(parse_field_name("I1").is_err());
        assert!(parse_field_name("H9").is_err());
        assert!(parse_field_name("H10").is_err());
    }

    #[test]
    fn neighbours_are_symmetric_and_in_bounds() {
        let mut pairs = BTreeSet::new();
        for field in 0..NUM_FIELDS {
            let mut seen = BTreeSet::new();
            for n in neighbours(field) {
                assert!(n < NUM_FIELDS);
                assert!(seen.insert(n), "duplicate neighbour of {field}");
                pairs.insert((field, n));
            }
            assert!(neighbours(field).count() <= 6);
        }
        for &(a, b) in &pairs {
            assert!(pairs.contains(&(b, a)), "{a}-{b} neighbourhood isn't symmetric");
        }
    }

    #[test]
    fn corner_and_interior_liberty_counts() {
        // H1 = (7,0), a corner with only two neighbours.
        assert_eq!(neighbours(coords_to_index(7, 0)).count(), 2);
        // A1 = (0,0), a corner with only two neighbours.
        assert_eq!(neighbours(coords_to_index(0, 0)).count(), 2);
        // B2 = (1,1) is interior-ish and should have all six.
        assert_eq!(neighbours(coords_to_index(1, 1)).count(), 6);
    }
}
