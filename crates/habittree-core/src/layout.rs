//! Tree ornament placement.
//!
//! Leaves hang on a fixed set of slots around the trunk, cycling back to the
//! first slot once every slot is taken. Flowers use their own three slots.
//! Offsets are in pixels: `left` from the trunk centre line, `bottom` from
//! the base of the trunk.
//!
//! Delays are cosmetic. A renderer may stagger animations with them, but
//! state is already committed by the time placements are computed.

use serde::{Deserialize, Serialize};

use crate::habit::MAX_FLOWERS;

#[derive(Debug, Clone, Copy)]
struct LeafSlot {
    left: i32,
    bottom: i32,
    rotation_deg: i32,
}

const fn leaf(left: i32, bottom: i32, rotation_deg: i32) -> LeafSlot {
    LeafSlot {
        left,
        bottom,
        rotation_deg,
    }
}

const LEAF_SLOTS: [LeafSlot; 15] = [
    leaf(-42, 40, -30),
    leaf(30, 20, 20),
    leaf(-70, 120, -48),
    leaf(48, 90, 36),
    leaf(-30, 170, -18),
    leaf(18, 150, 10),
    leaf(-56, 230, -12),
    leaf(56, 200, 14),
    leaf(-18, 280, -6),
    leaf(36, 260, 6),
    leaf(-14, 70, -6),
    leaf(8, 320, 10),
    leaf(-88, 60, -60),
    leaf(88, 70, 60),
    leaf(0, 10, 0),
];

const FLOWER_SLOTS: [(i32, i32); 3] = [(-10, 320), (36, 210), (-52, 190)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafPlacement {
    pub index: u32,
    pub left: i32,
    pub bottom: i32,
    pub rotation_deg: i32,
    /// Every other leaf uses the alternate colour.
    pub alternate: bool,
    pub grow_delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowerPlacement {
    pub index: u32,
    pub left: i32,
    pub bottom: i32,
    pub bloom_delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLayout {
    pub leaves: Vec<LeafPlacement>,
    pub flowers: Vec<FlowerPlacement>,
}

impl TreeLayout {
    pub fn new(leaf_count: u32, flower_count: u32) -> Self {
        Self {
            leaves: leaf_placements(leaf_count),
            flowers: flower_placements(flower_count),
        }
    }
}

pub fn leaf_placements(count: u32) -> Vec<LeafPlacement> {
    (0..count)
        .map(|index| {
            let slot = LEAF_SLOTS[index as usize % LEAF_SLOTS.len()];
            LeafPlacement {
                index,
                left: slot.left,
                bottom: slot.bottom,
                rotation_deg: slot.rotation_deg,
                alternate: index % 2 == 0,
                grow_delay_ms: 40 + (index % 6) * 90,
            }
        })
        .collect()
}

/// Placements for up to [`MAX_FLOWERS`] flowers.
pub fn flower_placements(count: u32) -> Vec<FlowerPlacement> {
    (0..count.min(MAX_FLOWERS))
        .map(|index| {
            let (left, bottom) = FLOWER_SLOTS[index as usize % FLOWER_SLOTS.len()];
            FlowerPlacement {
                index,
                left,
                bottom,
                bloom_delay_ms: 200 + index * 180,
            }
        })
        .collect()
}
