//! Built-in biome tables for the terrain model.

use crate::types::{Band, Biome, Rgba};

const DEEP_WATER: Rgba = Rgba::rgb(0, 0, 139);
const WATER: Rgba = Rgba::rgb(0, 0, 255);
const SAND: Rgba = Rgba::rgb(238, 214, 175);
const FOREST_GREEN: Rgba = Rgba::rgb(34, 139, 34);
const DARK_GREEN: Rgba = Rgba::rgb(0, 100, 0);
const SADDLE_BROWN: Rgba = Rgba::rgb(139, 69, 19);
const SIENNA: Rgba = Rgba::rgb(160, 82, 45);
const SNOW: Rgba = Rgba::rgb(255, 250, 250);

pub fn plains() -> Biome {
    Biome::new(
        "Plains",
        vec![
            Band::new("Deep Water", DEEP_WATER, 0.2),
            Band::new("Water", WATER, 0.4),
            Band::new("Sand", SAND, 0.45),
            Band::new("Grass", FOREST_GREEN, 0.6),
            Band::new("High Grass", DARK_GREEN, 0.7),
            Band::new("Forest", FOREST_GREEN, 0.8),
            Band::new("Mountain", SADDLE_BROWN, 0.9),
            Band::new("Snow", SNOW, 1.0),
        ],
    )
}

pub fn desert() -> Biome {
    Biome::new(
        "Desert",
        vec![
            Band::new("Light Sand", Rgba::rgb(255, 235, 205), 0.3),
            Band::new("Sand", SAND, 0.6),
            Band::new("Dunes", Rgba::rgb(210, 180, 140), 0.75),
            Band::new("Rocky Sand", SIENNA, 0.9),
            Band::new("Rocky Outcrops", SADDLE_BROWN, 1.0),
        ],
    )
}

pub fn tundra() -> Biome {
    Biome::new(
        "Tundra",
        vec![
            Band::new("Deep Water", DEEP_WATER, 0.2),
            Band::new("Water", WATER, 0.4),
            Band::new("Ice", Rgba::rgb(240, 255, 240), 0.5),
            Band::new("Snowy Grass", Rgba::rgb(224, 255, 255), 0.6),
            Band::new("Frozen Tundra", Rgba::rgb(176, 196, 222), 0.75),
            Band::new("Snow", SNOW, 1.0),
        ],
    )
}

pub fn mountainous() -> Biome {
    Biome::new(
        "Mountainous",
        vec![
            Band::new("Deep Water", DEEP_WATER, 0.2),
            Band::new("Water", WATER, 0.3),
            Band::new("Rocky Terrain", SIENNA, 0.5),
            Band::new("Mountain Base", SADDLE_BROWN, 0.7),
            Band::new("Mountain", Rgba::rgb(105, 105, 105), 0.8),
            Band::new("High Mountain", Rgba::rgb(169, 169, 169), 0.9),
            Band::new("Snow Capped Peaks", SNOW, 1.0),
        ],
    )
}

pub fn forest() -> Biome {
    Biome::new(
        "Forest",
        vec![
            Band::new("Deep Forest", DARK_GREEN, 0.2),
            Band::new("Dense Forest", FOREST_GREEN, 0.5),
            Band::new("Light Forest", Rgba::rgb(107, 142, 35), 0.7),
            Band::new("Forest Edge", Rgba::rgb(85, 107, 47), 0.8),
            Band::new("Grassland", Rgba::rgb(154, 205, 50), 0.9),
            Band::new("Forest Path", SAND, 1.0),
        ],
    )
}

pub fn world_of_warcraft() -> Biome {
    Biome::new(
        "World of Warcraft",
        vec![
            Band::new("Deep Sea", Rgba::rgb(72, 61, 139), 0.2),
            Band::new("Ocean", Rgba::rgb(65, 105, 225), 0.4),
            Band::new("Coastal Sand", Rgba::rgb(255, 222, 173), 0.45),
            Band::new("Grasslands", FOREST_GREEN, 0.6),
            Band::new("Barrens", SADDLE_BROWN, 0.7),
            Band::new("Savanna", Rgba::rgb(210, 105, 30), 0.8),
            Band::new("Storm Peaks", Rgba::rgb(112, 128, 144), 0.9),
            Band::new("Snow Peaks", SNOW, 1.0),
        ],
    )
}

/// All built-in biomes, in the order the terrain model cycles through them
pub fn builtin_biomes() -> Vec<Biome> {
    vec![
        plains(),
        desert(),
        tundra(),
        mountainous(),
        forest(),
        world_of_warcraft(),
    ]
}
