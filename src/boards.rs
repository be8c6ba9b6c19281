//! Board profiles
//!
//! The only thing that differs between supported boards is where the SoC
//! places its peripheral block in physical memory. The GPIO register window
//! sits at a fixed offset from that base on every model.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

use crate::hal::regs::GPIO_OFFSET;

/// Physical memory layout of one board family
#[derive(Debug, Clone, Serialize)]
pub struct BoardProfile {
    /// Short identifier (e.g., "rpi3")
    pub id: &'static str,
    /// Board name
    pub name: &'static str,
    /// SoC part number
    pub soc: &'static str,
    /// Physical base of the peripheral block
    pub peripheral_base: u64,
}

impl BoardProfile {
    /// Physical address of the GPIO register window
    pub fn gpio_base(&self) -> u64 {
        self.peripheral_base + GPIO_OFFSET
    }
}

pub static RPI1_PROFILE: BoardProfile = BoardProfile {
    id: "rpi1",
    name: "Raspberry Pi 1 / Zero",
    soc: "BCM2835",
    peripheral_base: 0x2000_0000,
};

pub static RPI3_PROFILE: BoardProfile = BoardProfile {
    id: "rpi3",
    name: "Raspberry Pi 2 / 3",
    soc: "BCM2836/BCM2837",
    peripheral_base: 0x3F00_0000,
};

pub static RPI4_PROFILE: BoardProfile = BoardProfile {
    id: "rpi4",
    name: "Raspberry Pi 4",
    soc: "BCM2711",
    peripheral_base: 0xFE00_0000,
};

/// Profile used when neither the CLI nor the config file names one
pub const DEFAULT_BOARD: &str = "rpi3";

/// Registry of built-in board profiles
pub static BOARD_PROFILES: Lazy<HashMap<&'static str, &'static BoardProfile>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("rpi1", &RPI1_PROFILE);
    m.insert("rpi0", &RPI1_PROFILE);
    m.insert("zero", &RPI1_PROFILE);
    m.insert("rpi2", &RPI3_PROFILE);
    m.insert("rpi3", &RPI3_PROFILE);
    m.insert("rpi4", &RPI4_PROFILE);
    m.insert("raspberry-pi-4", &RPI4_PROFILE);
    m
});

/// Get a board profile by name
pub fn get_profile(name: &str) -> Option<&'static BoardProfile> {
    BOARD_PROFILES.get(name.to_lowercase().as_str()).copied()
}

/// Get profile names only (deduplicated)
pub fn profile_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = vec!["rpi1", "rpi3", "rpi4"];
    names.sort();
    names
}
