//! Plain-text instance and solution formats.
//!
//! Input: one line `L W H` for the truck envelope, one line with the item
//! count, then one line `l w h deliveryOrder` per item, where a delivery
//! order of `-1` means untagged. Output: `SAT` followed by one line per
//! item in input order (`truckId x0 y0 z0 x1 y1 z1`), or `UNSAT` alone.

use crate::item::{Dims, Item};
use crate::report::SolveOutcome;
use crate::{Error, Result};

/// Parses a whitespace-separated line into exactly `expected` integers.
fn parse_fields(line: &str, expected: usize) -> Result<Vec<i64>> {
    let fields: Vec<i64> = line
        .split_whitespace()
        .map(|f| {
            f.parse::<i64>()
                .map_err(|_| Error::Parse(format!("invalid integer '{f}'")))
        })
        .collect::<Result<_>>()?;
    if fields.len() != expected {
        return Err(Error::Parse(format!(
            "expected {expected} fields, got {} in line '{}'",
            fields.len(),
            line.trim()
        )));
    }
    Ok(fields)
}

/// Parses an instance from its text form.
///
/// Blank lines are skipped. Item ids are assigned from the input order,
/// starting at zero.
pub fn parse_instance(input: &str) -> Result<(Dims, Vec<Item>)> {
    let mut lines = input.lines().filter(|l| !l.trim().is_empty());

    let truck_line = lines
        .next()
        .ok_or_else(|| Error::Parse("missing truck dimensions line".to_string()))?;
    let t = parse_fields(truck_line, 3)?;
    let truck_dims = Dims::new(t[0], t[1], t[2]);

    let count_line = lines
        .next()
        .ok_or_else(|| Error::Parse("missing item count line".to_string()))?;
    let count: usize = count_line
        .trim()
        .parse()
        .map_err(|_| Error::Parse(format!("invalid item count '{}'", count_line.trim())))?;

    let mut items = Vec::with_capacity(count);
    for id in 0..count {
        let line = lines
            .next()
            .ok_or_else(|| Error::Parse(format!("expected {count} item lines, found {id}")))?;
        let f = parse_fields(line, 4)?;

        let mut item = Item::new(id, Dims::new(f[0], f[1], f[2]));
        match f[3] {
            -1 => {}
            order if order >= 0 => {
                item = item.with_delivery_order(order as u32);
            }
            order => {
                return Err(Error::Parse(format!(
                    "item {id}: delivery order must be -1 or non-negative, got {order}"
                )));
            }
        }
        items.push(item);
    }

    Ok((truck_dims, items))
}

/// Formats an outcome in the text output form.
///
/// Placements are emitted in item-id order regardless of where they ended
/// up, so the k-th placement line describes the k-th input item.
pub fn format_outcome(outcome: &SolveOutcome) -> String {
    let solution = match outcome {
        SolveOutcome::Sat(solution) => solution,
        SolveOutcome::Unsat => return "UNSAT\n".to_string(),
    };

    let mut rows: Vec<(usize, String)> = Vec::with_capacity(solution.item_count());
    for (truck_id, truck) in solution.trucks().iter().enumerate() {
        for p in truck.placements() {
            let max = p.max_corner();
            rows.push((
                p.item.id(),
                format!(
                    "{truck_id} {} {} {} {} {} {}",
                    p.position.x, p.position.y, p.position.z, max.x, max.y, max.z
                ),
            ));
        }
    }
    rows.sort_by_key(|(id, _)| *id);

    let mut out = String::from("SAT\n");
    for (_, row) in rows {
        out.push_str(&row);
        out.push('\n');
    }
    out
}
