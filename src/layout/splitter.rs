//! Weighted binary splitting of a record table into leaf cells.

use crate::cell::{ColorRules, fit_label};
use crate::draw::DrawOp;
use crate::error::{Error, Result};
use crate::import::Record;

use super::Region;
use super::partition::{Buckets, KeyOrder, distinct_keys, group_weights};

/// Lays out records of one band by recursive weighted bisection.
///
/// Grouping depth is 1-based: depth `d` groups by the first `d` levels.
/// Depth `levels + 1` means the hierarchy is exhausted and whatever rows
/// remain form a single leaf.
#[derive(Debug, Clone, Copy)]
pub struct Splitter<'r> {
    levels: usize,
    label_level: usize,
    rules: &'r ColorRules,
}

impl<'r> Splitter<'r> {
    /// Create a splitter over the first `levels` grouping levels.
    ///
    /// Leaves are labelled with the value of `label_level` (0-based).
    pub fn new(levels: usize, label_level: usize, rules: &'r ColorRules) -> Result<Self> {
        if levels == 0 {
            return Err(Error::InvalidConfig(
                "at least one grouping level is required".to_string(),
            ));
        }
        if label_level >= levels {
            return Err(Error::InvalidConfig(format!(
                "label level {label_level} is outside the {levels} grouping levels"
            )));
        }
        Ok(Self {
            levels,
            label_level,
            rules,
        })
    }

    /// Lay out all `records` into `region`.
    ///
    /// Levels whose values are all numbers order their groups numerically.
    #[must_use]
    pub fn layout(&self, records: &[Record], region: Region) -> Vec<DrawOp> {
        debug_assert!(region.is_valid(), "invalid layout region {region:?}");

        let order = KeyOrder::from_records(records, self.levels);
        let refs: Vec<&Record> = records.iter().collect();
        let mut ops = Vec::with_capacity(records.len() * 2);
        self.split(&refs, 1, region, &order, &mut ops);
        ops
    }

    /// Split `records` into `region` starting at grouping `depth`, appending
    /// draw ops to `out` in depth-first, first-bucket-first order.
    pub fn split(
        &self,
        records: &[&Record],
        mut depth: usize,
        region: Region,
        order: &KeyOrder,
        out: &mut Vec<DrawOp>,
    ) {
        tracing::trace!(depth, rows = records.len(), "split");

        if records.is_empty() {
            return;
        }
        if records.len() == 1 || depth > self.levels {
            self.paint_leaf(records, region, out);
            return;
        }

        // A level with a single value tells nothing apart; look one deeper
        if distinct_keys(records, self.key_len(depth)) == 1 {
            depth += 1;
        }

        let groups = group_weights(records, self.key_len(depth), order);
        let buckets = Buckets::balance(groups.into_iter().map(|g| (g.records, g.weight)));

        let Some(first_share) = buckets.first_share() else {
            tracing::warn!(
                "Dropping {} records with zero total weight at depth {}",
                records.len(),
                depth
            );
            return;
        };

        let (first_region, second_region) = region.split(first_share);
        let Buckets {
            first,
            first_total,
            second,
            second_total,
        } = buckets;

        for (members, total, sub_region) in [
            (first, first_total, first_region),
            (second, second_total, second_region),
        ] {
            let members: Vec<&Record> = members.into_iter().flatten().collect();
            if total > 0.0 {
                self.split(&members, depth, sub_region, order, out);
            } else if !members.is_empty() {
                tracing::warn!(
                    "Dropping {} records with zero total weight at depth {}",
                    members.len(),
                    depth
                );
            }
        }
    }

    fn key_len(&self, depth: usize) -> usize {
        depth.min(self.levels)
    }

    fn paint_leaf(&self, records: &[&Record], region: Region, out: &mut Vec<DrawOp>) {
        let colors = self.rules.classify(records);
        let text = records
            .iter()
            .map(|r| r.level_value(self.label_level))
            .min()
            .unwrap_or_default()
            .to_string();
        let fit = fit_label(&region, &text);

        out.extend(DrawOp::cell(region, colors, text, fit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{ColorRule, Orientation};

    fn rules() -> ColorRules {
        ColorRules::new(vec![
            ColorRule::new(">80", "green", ""),
            ColorRule::new("<20", "red", ""),
            ColorRule::new("", "gray", "black"),
        ])
        .unwrap()
    }

    fn fills(ops: &[DrawOp]) -> Vec<(Region, &str)> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { region, color } => Some((*region, color.as_str())),
                DrawOp::Text { .. } => None,
            })
            .collect()
    }

    fn labels(ops: &[DrawOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::FillRect { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_single_group_single_level_is_one_leaf() {
        let records: Vec<Record> = [10.0, 50.0, 90.0, 100.0]
            .iter()
            .map(|&q| Record::new(["Sales"], 10.0, Some(q)))
            .collect();
        let rules = rules();
        let splitter = Splitter::new(1, 0, &rules).unwrap();
        let region = Region::new(0.0, 0.0, 100.0, 50.0);

        let ops = splitter.layout(&records, region);
        assert_eq!(ops.len(), 2);
        // mean quality 62.5 matches no threshold
        assert_eq!(fills(&ops), [(region, "gray")]);
        assert_eq!(labels(&ops), ["Sales"]);
    }

    #[test]
    fn test_two_groups_split_by_weight() {
        let records = vec![
            Record::new(["B"], 30.0, Some(10.0)),
            Record::new(["A"], 70.0, Some(90.0)),
        ];
        let rules = rules();
        let splitter = Splitter::new(1, 0, &rules).unwrap();

        let ops = splitter.layout(&records, Region::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(
            fills(&ops),
            [
                (Region::new(0.0, 0.0, 70.0, 50.0), "green"),
                (Region::new(70.0, 0.0, 100.0, 50.0), "red"),
            ]
        );
        assert_eq!(labels(&ops), ["A", "B"]);
    }

    #[test]
    fn test_portrait_region_stacks() {
        let records = vec![
            Record::new(["A"], 1.0, None),
            Record::new(["B"], 3.0, None),
        ];
        let rules = rules();
        let splitter = Splitter::new(1, 0, &rules).unwrap();

        let ops = splitter.layout(&records, Region::new(0.0, 0.0, 10.0, 40.0));
        let regions: Vec<Region> = fills(&ops).into_iter().map(|(r, _)| r).collect();
        assert_eq!(
            regions,
            [Region::new(0.0, 0.0, 10.0, 30.0), Region::new(0.0, 30.0, 10.0, 40.0)]
        );
        match &ops[1] {
            DrawOp::Text { orientation, .. } => assert_eq!(*orientation, Orientation::Rotated),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_capped_groups_become_leaves() {
        // Band for the outer level only: teams are merged into their department
        let records = vec![
            Record::new(["Ops", "Support"], 2.0, Some(10.0)),
            Record::new(["Ops", "Logistics"], 2.0, Some(30.0)),
            Record::new(["R&D", "Labs"], 4.0, Some(90.0)),
        ];
        let rules = rules();
        let splitter = Splitter::new(1, 0, &rules).unwrap();

        let ops = splitter.layout(&records, Region::new(0.0, 0.0, 80.0, 20.0));
        assert_eq!(labels(&ops), ["Ops", "R&D"]);
        // Ops mean is 20, which is not < 20
        assert_eq!(fills(&ops)[0].1, "gray");
        assert_eq!(fills(&ops)[1].1, "green");
    }

    #[test]
    fn test_resolved_level_auto_advances() {
        let records = vec![
            Record::new(["Ops", "Support"], 1.0, None),
            Record::new(["Ops", "Logistics"], 3.0, None),
        ];
        let rules = rules();
        let splitter = Splitter::new(2, 1, &rules).unwrap();

        let ops = splitter.layout(&records, Region::new(0.0, 0.0, 40.0, 10.0));
        assert_eq!(labels(&ops), ["Logistics", "Support"]);
        assert_eq!(fills(&ops)[0].0, Region::new(0.0, 0.0, 30.0, 10.0));
    }

    #[test]
    fn test_leaf_label_is_smallest_value() {
        let records = vec![
            Record::new(["Ops", "Support"], 1.0, None),
            Record::new(["Ops", "Logistics"], 1.0, None),
        ];
        let rules = rules();
        let splitter = Splitter::new(2, 1, &rules).unwrap();
        let refs: Vec<&Record> = records.iter().collect();

        let mut ops = Vec::new();
        splitter.split(
            &refs,
            3,
            Region::new(0.0, 0.0, 10.0, 10.0),
            &KeyOrder::default(),
            &mut ops,
        );
        assert_eq!(labels(&ops), ["Logistics"]);
    }

    #[test]
    fn test_numeric_level_places_nine_before_ten() {
        let records = vec![
            Record::new(["10"], 1.0, None),
            Record::new(["9"], 1.0, None),
        ];
        let rules = rules();
        let splitter = Splitter::new(1, 0, &rules).unwrap();
        let ops = splitter.layout(&records, Region::new(0.0, 0.0, 20.0, 10.0));

        // Equal weights: the smaller key fills the first (left) half
        assert_eq!(labels(&ops), ["9", "10"]);
        assert_eq!(fills(&ops)[0].0, Region::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_zero_weight_groups_are_dropped() {
        let records = vec![
            Record::new(["A"], 5.0, None),
            Record::new(["B"], 0.0, None),
            Record::new(["C"], 0.0, None),
        ];
        let rules = rules();
        let splitter = Splitter::new(1, 0, &rules).unwrap();
        let region = Region::new(0.0, 0.0, 50.0, 10.0);

        let ops = splitter.layout(&records, region);
        assert_eq!(fills(&ops), [(region, "gray")]);
        assert_eq!(labels(&ops), ["A"]);
    }

    #[test]
    fn test_all_zero_weight_emits_nothing() {
        let records = vec![Record::new(["A"], 0.0, None), Record::new(["B"], 0.0, None)];
        let rules = rules();
        let splitter = Splitter::new(1, 0, &rules).unwrap();
        assert!(splitter.layout(&records, Region::new(0.0, 0.0, 5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_empty_table_emits_nothing() {
        let rules = rules();
        let splitter = Splitter::new(2, 0, &rules).unwrap();
        assert!(splitter.layout(&[], Region::new(0.0, 0.0, 5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_area_conservation_and_no_overlap() {
        let mut records = Vec::new();
        for (i, outer) in ["X", "Y", "Z"].iter().enumerate() {
            for j in 0..7 {
                let weight = ((i * 7 + j * 3) % 11) as f64 + 1.0;
                let inner = format!("{outer}{j}");
                records.push(Record::new([outer.to_string(), inner], weight, Some(weight * 9.0)));
            }
        }
        let rules = rules();
        let region = Region::new(5.0, 5.0, 205.0, 73.0);
        let total: f64 = records.iter().map(|r| r.weight).sum();

        let splitter = Splitter::new(2, 1, &rules).unwrap();
        let ops = splitter.layout(&records, region);
        let cells = fills(&ops);
        assert_eq!(cells.len(), records.len());

        let area: f64 = cells.iter().map(|(r, _)| r.area()).sum();
        assert!((area - region.area()).abs() < 1e-6);

        // Each leaf's share of the band matches its share of the weight
        for ((cell, _), label) in cells.iter().zip(labels(&ops)) {
            let record = records.iter().find(|r| r.path[1] == label).unwrap();
            let expected = record.weight / total * region.area();
            assert!((cell.area() - expected).abs() < 1e-6, "{label}: {cell:?}");
        }

        for (i, (a, _)) in cells.iter().enumerate() {
            for (b, _) in &cells[i + 1..] {
                let overlap_w = a.x1.min(b.x1) - a.x0.max(b.x0);
                let overlap_h = a.y1.min(b.y1) - a.y0.max(b.y0);
                assert!(overlap_w <= 1e-9 || overlap_h <= 1e-9, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_identical_rows_terminate() {
        let records: Vec<Record> = (0..5).map(|_| Record::new(["A", "x"], 1.0, None)).collect();
        let rules = rules();
        let splitter = Splitter::new(2, 1, &rules).unwrap();

        let ops = splitter.layout(&records, Region::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(labels(&ops), ["x"]);
    }

    #[test]
    fn test_new_rejects_bad_levels() {
        let rules = rules();
        assert!(Splitter::new(0, 0, &rules).is_err());
        assert!(Splitter::new(2, 2, &rules).is_err());
    }
}
