//! Post-run checks over a finished stack.
//!
//! Every check appends to a `Report` instead of failing fast, so one pass
//! lists every fault.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::stack::Stack;
use crate::types::{Bounds, Item, Rect};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    #[error("expected {expected} items, found {actual}")]
    CountMismatch { expected: usize, actual: usize },

    /// Placed id or extent multiset disagrees with the catalog.
    #[error("item {id} does not match its catalog record")]
    IntegrityViolation { id: u32 },

    #[error("item {id} footprint {footprint} leaves the container")]
    BoundaryViolation { id: u32, footprint: Rect },

    #[error("layer {layer}: items {first} and {second} overlap")]
    OverlapViolation { layer: usize, first: u32, second: u32 },

    #[error("layer starting at z={upper_origin} overlaps the layer below ending at z={lower_top}")]
    LayerOrderViolation { lower_top: u32, upper_origin: u32 },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }
}

pub struct Validator<'a> {
    catalog: &'a Catalog,
    bounds: Bounds,
    expected_count: usize,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a Catalog, bounds: Bounds, expected_count: usize) -> Self {
        Self {
            catalog,
            bounds,
            expected_count,
        }
    }

    pub fn validate(&self, stack: &Stack) -> Report {
        let mut report = Report::default();
        self.check_count(stack, &mut report);
        self.check_integrity(stack, &mut report);
        self.check_bounds(stack, &mut report);
        self.check_overlaps(stack, &mut report);
        self.check_layer_order(stack, &mut report);
        report
    }

    fn check_count(&self, stack: &Stack, report: &mut Report) {
        let actual = stack.item_count();
        if actual != self.expected_count {
            report.push(Finding::CountMismatch {
                expected: self.expected_count,
                actual,
            });
        }
    }

    fn check_integrity(&self, stack: &Stack, report: &mut Report) {
        for item in stack.items() {
            if self.catalog.get(item.id) != Some(item) {
                report.push(Finding::IntegrityViolation { id: item.id });
            }
        }
    }

    fn check_bounds(&self, stack: &Stack, report: &mut Report) {
        for item in stack.items() {
            let footprint = item.footprint();
            if !self.bounds.contains(&footprint) {
                report.push(Finding::BoundaryViolation {
                    id: item.id,
                    footprint,
                });
            }
        }
    }

    /// Pairwise per layer, O(n^2). The slow path; the placement engines
    /// never produce overlaps on their own.
    fn check_overlaps(&self, stack: &Stack, report: &mut Report) {
        for (layer_idx, layer) in stack.layers().iter().enumerate() {
            let items: Vec<&Item> = layer.items().collect();
            for (i, a) in items.iter().enumerate() {
                for b in &items[i + 1..] {
                    if a.overlaps(b) {
                        report.push(Finding::OverlapViolation {
                            layer: layer_idx,
                            first: a.id,
                            second: b.id,
                        });
                    }
                }
            }
        }
    }

    /// Orders layers by their lowest occupied z and requires each to start
    /// strictly above every layer before it.
    fn check_layer_order(&self, stack: &Stack, report: &mut Report) {
        let mut spans: Vec<(u32, u32)> = stack
            .layers()
            .iter()
            .filter_map(|layer| {
                let bottom = layer.items().map(|i| i.z1()).min()?;
                let top = layer.items().map(|i| i.z2()).max()?;
                Some((bottom, top))
            })
            .collect();
        spans.sort_unstable();

        let mut highest: Option<u32> = None;
        for (bottom, top) in spans {
            if let Some(lower_top) = highest
                && lower_top >= bottom
            {
                report.push(Finding::LayerOrderViolation {
                    lower_top,
                    upper_origin: bottom,
                });
            }
            highest = Some(highest.map_or(top, |h| h.max(top)));
        }
    }
}
