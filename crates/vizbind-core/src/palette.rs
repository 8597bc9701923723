// File: crates/vizbind-core/src/palette.rs
// Summary: ColorBrewer palettes used by the chart presets.

use crate::types::Rgba;

/// Set2, 5 classes (qualitative).
pub const SET2_5: [Rgba; 5] = [
    Rgba::hex(0x66c2a5),
    Rgba::hex(0xfc8d62),
    Rgba::hex(0x8da0cb),
    Rgba::hex(0xe78ac3),
    Rgba::hex(0xa6d854),
];

/// PuBu, 9 classes (sequential purple-blue).
pub const PUBU_9: [Rgba; 9] = [
    Rgba::hex(0xfff7fb),
    Rgba::hex(0xece7f2),
    Rgba::hex(0xd0d1e6),
    Rgba::hex(0xa6bddb),
    Rgba::hex(0x74a9cf),
    Rgba::hex(0x3690c0),
    Rgba::hex(0x0570b0),
    Rgba::hex(0x045a8d),
    Rgba::hex(0x023858),
];

/// OrRd, 9 classes (sequential orange-red).
pub const ORRD_9: [Rgba; 9] = [
    Rgba::hex(0xfff7ec),
    Rgba::hex(0xfee8c8),
    Rgba::hex(0xfdd49e),
    Rgba::hex(0xfdbb84),
    Rgba::hex(0xfc8d59),
    Rgba::hex(0xef6548),
    Rgba::hex(0xd7301f),
    Rgba::hex(0xb30000),
    Rgba::hex(0x7f0000),
];

/// RdYlGn, 9 classes (diverging).
pub const RDYLGN_9: [Rgba; 9] = [
    Rgba::hex(0xd73027),
    Rgba::hex(0xf46d43),
    Rgba::hex(0xfdae61),
    Rgba::hex(0xfee08b),
    Rgba::hex(0xffffbf),
    Rgba::hex(0xd9ef8b),
    Rgba::hex(0xa6d96a),
    Rgba::hex(0x66bd63),
    Rgba::hex(0x1a9850),
];

/// Greens, 5 classes (sequential).
pub const GREENS_5: [Rgba; 5] = [
    Rgba::hex(0xedf8e9),
    Rgba::hex(0xbae4b3),
    Rgba::hex(0x74c476),
    Rgba::hex(0x31a354),
    Rgba::hex(0x006d2c),
];

/// Bright green used for single-series marks.
pub const ACCENT: Rgba = Rgba::hex(0x8cff79);
